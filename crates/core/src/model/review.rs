use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::CardId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur when building review input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("review quality must be between 0 and 5, got {0}")]
    InvalidQuality(u8),
}

//
// ─── QUALITY ──────────────────────────────────────────────────────────────────
//

/// Recall quality on the SM-2 scale, 0 (no recall) to 5 (instant recall).
///
/// Values of 3 and above count as a successful recall. Out-of-range values
/// are rejected at construction, so every `Quality` the scheduler sees is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;
    /// Lowest quality that counts as a successful recall.
    pub const PASSING: u8 = 3;

    /// # Errors
    ///
    /// Returns `ReviewError::InvalidQuality` if `value > 5`.
    pub fn new(value: u8) -> Result<Self, ReviewError> {
        if value > Self::MAX {
            return Err(ReviewError::InvalidQuality(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_success(self) -> bool {
        self.0 >= Self::PASSING
    }
}

impl TryFrom<u8> for Quality {
    type Error = ReviewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

//
// ─── UI ACTIONS ───────────────────────────────────────────────────────────────
//

/// Horizontal drag distance, in pixels, past which a swipe counts as an answer.
pub const SWIPE_THRESHOLD_PX: f64 = 100.0;

/// Answer buttons shown under a flipped card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Forgot,
    Hard,
    Easy,
}

impl ReviewAction {
    #[must_use]
    pub fn quality(self) -> Quality {
        match self {
            ReviewAction::Forgot => Quality(1),
            ReviewAction::Hard => Quality(3),
            ReviewAction::Easy => Quality(5),
        }
    }

    /// Map a finished drag gesture to an answer.
    ///
    /// Right of the threshold means "known" (`Easy`), left of it means
    /// "unknown" (`Forgot`). Anything shorter snaps back and yields `None`.
    #[must_use]
    pub fn from_swipe(offset_x: f64) -> Option<Self> {
        if offset_x > SWIPE_THRESHOLD_PX {
            Some(ReviewAction::Easy)
        } else if offset_x < -SWIPE_THRESHOLD_PX {
            Some(ReviewAction::Forgot)
        } else {
            None
        }
    }
}

//
// ─── REVIEW LOG ───────────────────────────────────────────────────────────────
//

/// Record of a single card review event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewLog {
    pub card_id: CardId,
    pub reviewed_at: DateTime<Utc>,
    pub quality: Quality,
}

impl ReviewLog {
    #[must_use]
    pub fn new(card_id: CardId, quality: Quality, reviewed_at: DateTime<Utc>) -> Self {
        Self {
            card_id,
            reviewed_at,
            quality,
        }
    }
}

//
// ─── REVIEW OUTCOME ──────────────────────────────────────────────────────────
//

/// Scheduling fields produced by one SM-2 review step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub reviewed_at: DateTime<Utc>,
    pub next_review_at: DateTime<Utc>,
    pub interval_days: u32,
    pub ease_factor: f64,
    pub consecutive_correct: u32,
    pub knowledge_level: u8,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn quality_accepts_zero_through_five() {
        for value in 0..=5 {
            assert_eq!(Quality::new(value).unwrap().value(), value);
        }
        assert_eq!(Quality::new(6).unwrap_err(), ReviewError::InvalidQuality(6));
    }

    #[test]
    fn success_boundary_is_three() {
        assert!(!Quality::new(2).unwrap().is_success());
        assert!(Quality::new(3).unwrap().is_success());
    }

    #[test]
    fn buttons_map_to_one_three_five() {
        assert_eq!(ReviewAction::Forgot.quality().value(), 1);
        assert_eq!(ReviewAction::Hard.quality().value(), 3);
        assert_eq!(ReviewAction::Easy.quality().value(), 5);
    }

    #[test]
    fn swipe_needs_to_pass_threshold() {
        assert_eq!(ReviewAction::from_swipe(140.0), Some(ReviewAction::Easy));
        assert_eq!(ReviewAction::from_swipe(-101.0), Some(ReviewAction::Forgot));
        assert_eq!(ReviewAction::from_swipe(100.0), None);
        assert_eq!(ReviewAction::from_swipe(-40.0), None);
    }

    #[test]
    fn log_creation_works() {
        let q = Quality::new(4).unwrap();
        let log = ReviewLog::new(CardId::new(10), q, fixed_now());
        assert_eq!(log.card_id, CardId::new(10));
        assert_eq!(log.quality, q);
    }
}
