use chrono::{DateTime, Utc};
use std::fmt;
use srs_core::model::{Card, CardId, DeckId, ReviewLog, SessionStats, average_mastery};
use srs_core::scheduler::AppliedReview;

use crate::error::SessionError;
use super::plan::SessionPlan;
use super::progress::{SessionProgress, SessionState};

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One study run over a deck's selected cards.
///
/// Holds working copies of the selected cards. Each answered card is
/// replaced by the copy that was persisted, so `final_mastery` reflects the
/// latest stored values.
pub struct ReviewSession {
    deck_id: DeckId,
    cards: Vec<Card>,
    current: usize,
    reviewed: u32,
    correct: u32,
    incorrect: u32,
    logs: Vec<ReviewLog>,
    initial_mastery: u8,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl ReviewSession {
    /// Start a session over a planned card set.
    ///
    /// `started_at` should come from the services layer clock to keep time deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidDeck` if the plan is empty.
    pub fn new(
        deck_id: DeckId,
        plan: SessionPlan,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if plan.is_empty() {
            return Err(SessionError::InvalidDeck(deck_id));
        }

        Ok(Self {
            deck_id,
            initial_mastery: average_mastery(&plan.cards),
            cards: plan.cards,
            current: 0,
            reviewed: 0,
            correct: 0,
            incorrect: 0,
            logs: Vec::new(),
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn initial_mastery(&self) -> u8 {
        self.initial_mastery
    }

    /// Mastery over the session's cards as they stand now.
    #[must_use]
    pub fn current_mastery(&self) -> u8 {
        average_mastery(&self.cards)
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn logs(&self) -> &[ReviewLog] {
        &self.logs
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.is_complete() {
            SessionState::Completed
        } else {
            SessionState::InProgress
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.current
    }

    /// Total number of cards in this session.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    /// Number of remaining cards that have not been answered yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        if self.is_complete() {
            return 0;
        }
        self.cards.len().saturating_sub(self.current)
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            state: self.state(),
            position: self.current,
            total: self.total_cards(),
            reviewed: self.reviewed,
            correct: self.correct,
            incorrect: self.incorrect,
            remaining: self.remaining(),
        }
    }

    /// The card awaiting an answer, or `None` once the session is complete.
    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        if self.is_complete() {
            return None;
        }
        self.cards.get(self.current)
    }

    pub(crate) fn current_card_id(&self) -> Option<CardId> {
        self.current_card().map(Card::id)
    }

    /// Record a persisted review for the current card and advance.
    ///
    /// Completes the session at the review timestamp after the last card.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` if the session is already complete.
    pub(crate) fn record_review(&mut self, applied: AppliedReview) -> Result<&ReviewLog, SessionError> {
        if self.is_complete() || self.current >= self.cards.len() {
            return Err(SessionError::NoActiveSession);
        }

        if applied.log.quality.is_success() {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.reviewed += 1;

        let reviewed_at = applied.log.reviewed_at;
        self.cards[self.current] = applied.card;
        self.logs.push(applied.log);

        self.current += 1;
        if self.current >= self.cards.len() {
            self.completed_at = Some(reviewed_at);
        }

        self.logs.last().ok_or(SessionError::NoActiveSession)
    }

    /// Mark the session complete. A completed session keeps its original
    /// completion time.
    pub(crate) fn finish(&mut self, completed_at: DateTime<Utc>) {
        if self.completed_at.is_none() {
            self.completed_at = Some(completed_at.max(self.started_at));
        }
    }

    /// Frozen report for a completed session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` if the session has not completed,
    /// or `SessionError::Stats` if the counters are inconsistent.
    pub fn stats(&self) -> Result<SessionStats, SessionError> {
        let completed_at = self.completed_at.ok_or(SessionError::NoActiveSession)?;
        Ok(SessionStats::new(
            self.deck_id,
            self.started_at,
            completed_at,
            self.reviewed,
            self.correct,
            self.incorrect,
            self.initial_mastery,
            self.current_mastery(),
        )?)
    }
}

impl fmt::Debug for ReviewSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewSession")
            .field("deck_id", &self.deck_id)
            .field("cards_len", &self.cards.len())
            .field("current", &self.current)
            .field("reviewed", &self.reviewed)
            .field("correct", &self.correct)
            .field("incorrect", &self.incorrect)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
