use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::DeckId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStatsError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("cards reviewed ({reviewed}) does not match correct + incorrect ({sum})")]
    CountMismatch { reviewed: u32, sum: u32 },

    #[error("mastery must be between 0 and 100, got {0}")]
    InvalidMastery(u8),
}

/// Frozen report for a finished review session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    deck_id: DeckId,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    cards_reviewed: u32,
    correct_answers: u32,
    incorrect_answers: u32,
    initial_mastery: u8,
    final_mastery: u8,
}

impl SessionStats {
    /// Build a report, checking that counters and timestamps agree.
    ///
    /// # Errors
    ///
    /// Returns `SessionStatsError::InvalidTimeRange` if `completed_at < started_at`,
    /// `SessionStatsError::CountMismatch` if the counters disagree, and
    /// `SessionStatsError::InvalidMastery` for a mastery above 100.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        deck_id: DeckId,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        cards_reviewed: u32,
        correct_answers: u32,
        incorrect_answers: u32,
        initial_mastery: u8,
        final_mastery: u8,
    ) -> Result<Self, SessionStatsError> {
        if completed_at < started_at {
            return Err(SessionStatsError::InvalidTimeRange);
        }
        let sum = correct_answers.saturating_add(incorrect_answers);
        if sum != cards_reviewed {
            return Err(SessionStatsError::CountMismatch {
                reviewed: cards_reviewed,
                sum,
            });
        }
        for mastery in [initial_mastery, final_mastery] {
            if mastery > 100 {
                return Err(SessionStatsError::InvalidMastery(mastery));
            }
        }

        Ok(Self {
            deck_id,
            started_at,
            completed_at,
            cards_reviewed,
            correct_answers,
            incorrect_answers,
            initial_mastery,
            final_mastery,
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
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn cards_reviewed(&self) -> u32 {
        self.cards_reviewed
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn incorrect_answers(&self) -> u32 {
        self.incorrect_answers
    }

    #[must_use]
    pub fn initial_mastery(&self) -> u8 {
        self.initial_mastery
    }

    #[must_use]
    pub fn final_mastery(&self) -> u8 {
        self.final_mastery
    }

    /// Signed change in mastery over the session, in percentage points.
    #[must_use]
    pub fn mastery_change(&self) -> i16 {
        i16::from(self.final_mastery) - i16::from(self.initial_mastery)
    }

    /// Whole seconds between start and completion.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn session_duration_secs(&self) -> u64 {
        // completed_at >= started_at is checked in `new`
        self.completed_at
            .signed_duration_since(self.started_at)
            .num_seconds()
            .max(0) as u64
    }

    /// Session duration divided by cards reviewed, rounded; 0 when nothing was reviewed.
    #[must_use]
    pub fn average_time_per_card_secs(&self) -> u64 {
        if self.cards_reviewed == 0 {
            return 0;
        }
        let reviewed = u64::from(self.cards_reviewed);
        (self.session_duration_secs() * 2 + reviewed) / (reviewed * 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn counts_and_timing_are_reported() {
        let start = fixed_now();
        let stats = SessionStats::new(
            DeckId::new(10),
            start,
            start + Duration::seconds(95),
            3,
            2,
            1,
            9,
            17,
        )
        .unwrap();

        assert_eq!(stats.session_duration_secs(), 95);
        // 95 / 3 = 31.67
        assert_eq!(stats.average_time_per_card_secs(), 32);
        assert_eq!(stats.mastery_change(), 8);
    }

    #[test]
    fn no_reviews_means_zero_average() {
        let start = fixed_now();
        let stats =
            SessionStats::new(DeckId::new(1), start, start + Duration::minutes(5), 0, 0, 0, 10, 10)
                .unwrap();
        assert_eq!(stats.average_time_per_card_secs(), 0);
    }

    #[test]
    fn mismatched_counts_are_rejected() {
        let now = fixed_now();
        let err = SessionStats::new(DeckId::new(1), now, now, 3, 1, 1, 0, 0).unwrap_err();
        assert_eq!(err, SessionStatsError::CountMismatch { reviewed: 3, sum: 2 });
    }

    #[test]
    fn backwards_time_range_is_rejected() {
        let now = fixed_now();
        let err = SessionStats::new(
            DeckId::new(1),
            now,
            now - Duration::seconds(1),
            0,
            0,
            0,
            0,
            0,
        )
        .unwrap_err();
        assert_eq!(err, SessionStatsError::InvalidTimeRange);
    }
}
