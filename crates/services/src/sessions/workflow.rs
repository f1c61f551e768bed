use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use srs_core::SrsConfig;
use srs_core::config::SessionConfig;
use srs_core::model::{Card, DeckId, Quality, ReviewLog, SessionStats};
use storage::repository::{CardRepository, DeckRepository, Storage, StorageError};

use super::plan::SessionBuilder;
use super::progress::{SessionProgress, SessionState};
use super::service::ReviewSession;
use crate::Clock;
use crate::error::SessionError;
use crate::review_service::ReviewService;

/// Result of answering a single card in a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAnswer {
    pub log: ReviewLog,
    /// The card as persisted after the review.
    pub card: Card,
    pub progress: SessionProgress,
}

/// Drives one review session at a time against the injected card store.
///
/// State machine: `NotStarted -> InProgress -> Completed`. Starting a new
/// session replaces whatever session was held before.
pub struct SessionCoordinator {
    clock: Clock,
    decks: Arc<dyn DeckRepository>,
    cards: Arc<dyn CardRepository>,
    reviews: ReviewService,
    config: SessionConfig,
    session: Option<ReviewSession>,
}

impl SessionCoordinator {
    #[must_use]
    pub fn new(clock: Clock, decks: Arc<dyn DeckRepository>, cards: Arc<dyn CardRepository>) -> Self {
        Self {
            clock,
            decks,
            cards,
            reviews: ReviewService::new(),
            config: SessionConfig::default(),
            session: None,
        }
    }

    #[must_use]
    pub fn from_storage(clock: Clock, storage: &Storage) -> Self {
        Self::new(clock, Arc::clone(&storage.decks), Arc::clone(&storage.cards))
    }

    /// Coordinator with scheduler and session limits taken from `config`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Review` if the scheduler configuration is invalid
    /// and `SessionError::Config` if the session limits are.
    pub fn from_config(
        clock: Clock,
        storage: &Storage,
        config: &SrsConfig,
    ) -> Result<Self, SessionError> {
        let reviews = ReviewService::try_from_config(config.scheduler.clone())?;
        Self::from_storage(clock, storage)
            .with_review_service(reviews)
            .with_session_config(config.session.clone())
    }

    /// # Errors
    ///
    /// Returns `SessionError::Config` if `max_cards` is zero or the learned
    /// threshold is above 100.
    pub fn with_session_config(mut self, config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    #[must_use]
    pub fn with_review_service(mut self, reviews: ReviewService) -> Self {
        self.reviews = reviews;
        self
    }

    /// Mutable access to the clock, e.g. to advance a fixed clock between sessions.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::NotStarted, ReviewSession::state)
    }

    #[must_use]
    pub fn session(&self) -> Option<&ReviewSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        self.session.as_ref().and_then(ReviewSession::current_card)
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        self.session.as_ref().map(ReviewSession::progress)
    }

    /// Start a session over the deck's cards, soonest-due first.
    ///
    /// Cards are not modified by starting a session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidDeck` if the deck does not exist or has
    /// no cards, and `SessionError::Storage` if the store cannot be read. The
    /// previously held session is kept on error.
    pub fn start_session(&mut self, deck_id: DeckId) -> Result<&ReviewSession, SessionError> {
        if self.decks.get_deck(deck_id)?.is_none() {
            return Err(SessionError::InvalidDeck(deck_id));
        }

        let cards = self.cards.cards_for_deck(deck_id)?;
        let plan = SessionBuilder::new(self.config.max_cards).build(cards);
        let session = ReviewSession::new(deck_id, plan, self.clock.now())?;

        if self.state() == SessionState::InProgress {
            warn!(deck_id = %deck_id, "replacing a session that was still in progress");
        }
        info!(
            deck_id = %deck_id,
            cards = session.total_cards(),
            initial_mastery = session.initial_mastery(),
            "session started"
        );

        Ok(self.session.insert(session))
    }

    /// Answer the current card with a quality in `0..=5`.
    ///
    /// The reviewed card is persisted before any session state changes; if
    /// persistence fails the session is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` unless a session is in progress,
    /// `SessionError::InvalidQuality` for a value above 5, and
    /// `SessionError::Storage` if the card cannot be read or written.
    pub fn submit_response(&mut self, quality: u8) -> Result<SessionAnswer, SessionError> {
        let session = self
            .session
            .as_mut()
            .filter(|s| !s.is_complete())
            .ok_or(SessionError::NoActiveSession)?;
        let quality = Quality::new(quality).map_err(|_| SessionError::InvalidQuality(quality))?;
        let card_id = session
            .current_card_id()
            .ok_or(SessionError::NoActiveSession)?;

        // Latest stored value, not the snapshot taken at session start.
        let stored = self
            .cards
            .get_card(card_id)?
            .ok_or(StorageError::NotFound)?;
        let applied = self.reviews.review_card_persisted(
            &stored,
            quality,
            self.clock.now(),
            self.cards.as_ref(),
        )?;

        let card = applied.card.clone();
        let log = session.record_review(applied)?.clone();
        let progress = session.progress();

        debug!(
            deck_id = %session.deck_id(),
            card_id = %card_id,
            quality = quality.value(),
            position = progress.position,
            "response recorded"
        );
        if progress.is_complete() {
            info!(
                deck_id = %session.deck_id(),
                reviewed = progress.reviewed,
                correct = progress.correct,
                final_mastery = session.current_mastery(),
                "session completed"
            );
        }

        Ok(SessionAnswer {
            log,
            card,
            progress,
        })
    }

    /// End the session and report its statistics.
    ///
    /// Calling this again on a completed session returns the same report.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` if no session was ever started.
    pub fn end_session(&mut self) -> Result<SessionStats, SessionError> {
        let now = self.clock.now();
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;

        if !session.is_complete() {
            session.finish(now);
            info!(
                deck_id = %session.deck_id(),
                reviewed = session.progress().reviewed,
                remaining = session.total_cards() - session.position(),
                "session ended early"
            );
        }
        session.stats()
    }
}

impl fmt::Debug for SessionCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCoordinator")
            .field("clock", &self.clock)
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
