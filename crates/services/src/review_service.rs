use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use srs_core::{
    model::{Card, CardId, Quality},
    scheduler::{AppliedReview, Scheduler, SchedulerConfig},
    time::Clock,
};
use storage::repository::CardRepository;

use crate::error::ReviewServiceError;

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Coordinates applying a user's recall judgment to a card using the scheduler.
#[derive(Debug, Clone, Default)]
pub struct ReviewService {
    clock: Clock,
    scheduler: Scheduler,
}

impl ReviewService {
    /// Review service with the default SM-2 scheduler and real-time clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a review service with a custom scheduler (still uses default clock).
    #[must_use]
    pub fn with_scheduler(scheduler: Scheduler) -> Self {
        Self {
            clock: Clock::default(),
            scheduler,
        }
    }

    /// # Errors
    ///
    /// Returns `ReviewServiceError::Scheduler` if the configuration is invalid.
    pub fn try_from_config(config: SchedulerConfig) -> Result<Self, ReviewServiceError> {
        Ok(Self::with_scheduler(Scheduler::try_with_config(config)?))
    }

    /// Override the clock (usually for deterministic testing).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Current time according to the service's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Apply a quality to a card without touching storage.
    ///
    /// ```
    /// # use srs_core::model::{Card, CardBack, CardFront, CardId, DeckId, Quality};
    /// # use srs_core::time::fixed_now;
    /// # use services::review_service::ReviewService;
    /// let card = Card::new(
    ///     CardId::new(1),
    ///     DeckId::new(1),
    ///     CardFront::new("Invoice").unwrap(),
    ///     CardBack::new("A bill for services.").unwrap(),
    ///     fixed_now(),
    /// );
    /// let applied = ReviewService::new().review_card(&card, Quality::new(3).unwrap(), fixed_now());
    /// assert_eq!(applied.log.card_id, card.id());
    /// assert_eq!(applied.card.scheduling().consecutive_correct(), 1);
    /// ```
    #[must_use]
    pub fn review_card(
        &self,
        card: &Card,
        quality: Quality,
        reviewed_at: DateTime<Utc>,
    ) -> AppliedReview {
        self.scheduler.apply_review(card, quality, reviewed_at)
    }

    /// Apply a review and persist the updated card.
    ///
    /// The input card is never modified; on success the returned
    /// `AppliedReview::card` is what the repository now holds.
    ///
    /// # Errors
    ///
    /// Returns `ReviewServiceError::Storage` if persistence fails.
    pub fn review_card_persisted(
        &self,
        card: &Card,
        quality: Quality,
        reviewed_at: DateTime<Utc>,
        cards: &dyn CardRepository,
    ) -> Result<AppliedReview, ReviewServiceError> {
        let applied = self.review_card(card, quality, reviewed_at);

        if let Err(err) = cards.upsert_card(&applied.card) {
            warn!(card_id = %card.id(), error = %err, "failed to persist review");
            return Err(err.into());
        }

        debug!(
            card_id = %card.id(),
            quality = quality.value(),
            interval_days = applied.outcome.interval_days,
            knowledge_level = applied.outcome.knowledge_level,
            "review persisted"
        );
        Ok(applied)
    }

    /// Load a card, apply a review, and persist the updated card.
    ///
    /// Uses the service clock for `reviewed_at` to keep time deterministic.
    ///
    /// # Errors
    ///
    /// Returns `ReviewServiceError::CardNotFound` if the card is missing.
    /// Returns `ReviewServiceError::Storage` if loading or persistence fails.
    pub fn review_card_persisted_by_id(
        &self,
        card_id: CardId,
        cards: &dyn CardRepository,
        quality: Quality,
    ) -> Result<AppliedReview, ReviewServiceError> {
        let card = cards
            .get_card(card_id)?
            .ok_or(ReviewServiceError::CardNotFound(card_id))?;

        self.review_card_persisted(&card, quality, self.now(), cards)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
