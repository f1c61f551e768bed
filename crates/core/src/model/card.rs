use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    content::{CardBack, CardFront},
    ids::{CardId, DeckId},
    review::ReviewOutcome,
    tag::{Category, TagName},
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum CardError {
    #[error("difficulty must be between 1 and 5, got {0}")]
    InvalidDifficulty(u8),

    #[error("knowledge level must be between 0 and 100, got {0}")]
    InvalidKnowledgeLevel(u8),

    #[error("invalid scheduling state: {0}")]
    InvalidSchedulingState(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Author-assigned difficulty from 1 (easiest) to 5 (hardest).
///
/// Informational only; the scheduler never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    /// # Errors
    ///
    /// Returns `CardError::InvalidDifficulty` outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, CardError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CardError::InvalidDifficulty(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = CardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> Self {
        d.0
    }
}

//
// ─── SCHEDULING STATE ──────────────────────────────────────────────────────────
//

/// Spaced-repetition fields carried by every card.
///
/// Invariants: `ease_factor >= 1.3`, `interval_days >= 1`,
/// `knowledge_level <= 100`, and once reviewed
/// `next_review_at == last_reviewed + interval_days`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingState {
    last_reviewed: Option<DateTime<Utc>>,
    next_review_at: DateTime<Utc>,
    interval_days: u32,
    ease_factor: f64,
    consecutive_correct: u32,
    knowledge_level: u8,
}

impl SchedulingState {
    /// Hard floor for the ease factor.
    pub const MIN_EASE_FACTOR: f64 = 1.3;
    pub const INITIAL_EASE_FACTOR: f64 = 2.5;
    pub const INITIAL_INTERVAL_DAYS: u32 = 1;
    pub const MAX_KNOWLEDGE_LEVEL: u8 = 100;

    /// Baseline state for a card that has never been reviewed.
    #[must_use]
    pub fn new(due_at: DateTime<Utc>) -> Self {
        Self {
            last_reviewed: None,
            next_review_at: due_at,
            interval_days: Self::INITIAL_INTERVAL_DAYS,
            ease_factor: Self::INITIAL_EASE_FACTOR,
            consecutive_correct: 0,
            knowledge_level: 0,
        }
    }

    /// Rehydrate scheduling state from an external store, checking invariants.
    ///
    /// # Errors
    ///
    /// Returns `CardError::InvalidSchedulingState` if any invariant is broken,
    /// or `CardError::InvalidKnowledgeLevel` if the level exceeds 100.
    pub fn from_persisted(
        last_reviewed: Option<DateTime<Utc>>,
        next_review_at: DateTime<Utc>,
        interval_days: u32,
        ease_factor: f64,
        consecutive_correct: u32,
        knowledge_level: u8,
    ) -> Result<Self, CardError> {
        if interval_days == 0 {
            return Err(CardError::InvalidSchedulingState(
                "interval must be at least one day".into(),
            ));
        }
        if !ease_factor.is_finite() || ease_factor < Self::MIN_EASE_FACTOR {
            return Err(CardError::InvalidSchedulingState(format!(
                "ease factor {ease_factor} is below {}",
                Self::MIN_EASE_FACTOR
            )));
        }
        if knowledge_level > Self::MAX_KNOWLEDGE_LEVEL {
            return Err(CardError::InvalidKnowledgeLevel(knowledge_level));
        }
        if let Some(last) = last_reviewed {
            if last + Duration::days(i64::from(interval_days)) != next_review_at {
                return Err(CardError::InvalidSchedulingState(
                    "next review does not match last review plus interval".into(),
                ));
            }
        }

        Ok(Self {
            last_reviewed,
            next_review_at,
            interval_days,
            ease_factor,
            consecutive_correct,
            knowledge_level,
        })
    }

    /// Seed the starting mastery of a fresh card.
    ///
    /// # Errors
    ///
    /// Returns `CardError::InvalidKnowledgeLevel` if `level > 100`.
    pub fn with_knowledge_level(mut self, level: u8) -> Result<Self, CardError> {
        if level > Self::MAX_KNOWLEDGE_LEVEL {
            return Err(CardError::InvalidKnowledgeLevel(level));
        }
        self.knowledge_level = level;
        Ok(self)
    }

    #[must_use]
    pub fn last_reviewed(&self) -> Option<DateTime<Utc>> {
        self.last_reviewed
    }

    #[must_use]
    pub fn next_review_at(&self) -> DateTime<Utc> {
        self.next_review_at
    }

    #[must_use]
    pub fn interval_days(&self) -> u32 {
        self.interval_days
    }

    #[must_use]
    pub fn ease_factor(&self) -> f64 {
        self.ease_factor
    }

    #[must_use]
    pub fn consecutive_correct(&self) -> u32 {
        self.consecutive_correct
    }

    #[must_use]
    pub fn knowledge_level(&self) -> u8 {
        self.knowledge_level
    }

    fn apply(&mut self, outcome: &ReviewOutcome) {
        self.last_reviewed = Some(outcome.reviewed_at);
        self.next_review_at = outcome.next_review_at;
        self.interval_days = outcome.interval_days;
        self.ease_factor = outcome.ease_factor;
        self.consecutive_correct = outcome.consecutive_correct;
        self.knowledge_level = outcome.knowledge_level;
    }
}

//
// ─── CARD ──────────────────────────────────────────────────────────────────────
//

/// A flashcard belonging to exactly one deck.
///
/// Scheduling fields change only through [`Scheduler`](crate::scheduler::Scheduler)
/// or a validated [`SchedulingState`]; a hand-built outcome cannot be written in:
///
/// ```compile_fail
/// # use srs_core::model::{Card, CardBack, CardFront, CardId, DeckId, ReviewOutcome};
/// # use srs_core::time::fixed_now;
/// let mut card = Card::new(
///     CardId::new(1),
///     DeckId::new(1),
///     CardFront::new("Invoice").unwrap(),
///     CardBack::new("A bill for services.").unwrap(),
///     fixed_now(),
/// );
/// card.apply_review(&ReviewOutcome {
///     reviewed_at: fixed_now(),
///     next_review_at: fixed_now(),
///     interval_days: 0,
///     ease_factor: 0.4,
///     consecutive_correct: 0,
///     knowledge_level: 250,
/// });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    id: CardId,
    deck_id: DeckId,
    front: CardFront,
    back: CardBack,
    category: Option<Category>,
    tags: Vec<TagName>,
    difficulty: Difficulty,
    scheduling: SchedulingState,
    created_at: DateTime<Utc>,
}

impl Card {
    /// Create a card with baseline scheduling, due immediately.
    #[must_use]
    pub fn new(
        id: CardId,
        deck_id: DeckId,
        front: CardFront,
        back: CardBack,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            deck_id,
            front,
            back,
            category: None,
            tags: Vec::new(),
            difficulty: Difficulty::default(),
            scheduling: SchedulingState::new(created_at),
            created_at,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = TagName>) -> Self {
        for tag in tags {
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn with_scheduling(mut self, scheduling: SchedulingState) -> Self {
        self.scheduling = scheduling;
        self
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    #[must_use]
    pub fn front(&self) -> &CardFront {
        &self.front
    }

    #[must_use]
    pub fn back(&self) -> &CardBack {
        &self.back
    }

    #[must_use]
    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    #[must_use]
    pub fn tags(&self) -> &[TagName] {
        &self.tags
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.as_str().eq_ignore_ascii_case(tag))
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn scheduling(&self) -> &SchedulingState {
        &self.scheduling
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn next_review_at(&self) -> DateTime<Utc> {
        self.scheduling.next_review_at
    }

    #[must_use]
    pub fn last_reviewed(&self) -> Option<DateTime<Utc>> {
        self.scheduling.last_reviewed
    }

    #[must_use]
    pub fn knowledge_level(&self) -> u8 {
        self.scheduling.knowledge_level
    }

    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.scheduling.next_review_at <= now
    }

    #[must_use]
    pub fn is_learned(&self, threshold: u8) -> bool {
        self.scheduling.knowledge_level >= threshold
    }

    /// Overwrite the scheduling fields with a scheduler outcome.
    pub(crate) fn apply_review(&mut self, outcome: &ReviewOutcome) {
        self.scheduling.apply(outcome);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
