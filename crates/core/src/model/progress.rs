use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Card;
use crate::time::start_of_day;

/// Average knowledge level over a set of cards, rounded to the nearest
/// whole percent. An empty set has mastery 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn average_mastery<'a>(cards: impl IntoIterator<Item = &'a Card>) -> u8 {
    let (sum, count) = cards.into_iter().fold((0_u64, 0_u64), |(sum, count), card| {
        (sum + u64::from(card.knowledge_level()), count + 1)
    });
    if count == 0 {
        return 0;
    }
    // Each level is <= 100, so the rounded mean fits in u8.
    ((sum * 2 + count) / (count * 2)) as u8
}

/// Study progress across a set of cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub total_cards: usize,
    /// Cards at or above the learned threshold.
    pub cards_learned: usize,
    /// Cards whose next review falls on or before the start of today (UTC).
    pub cards_due: usize,
    pub overall_mastery: u8,
}

impl ProgressStats {
    #[must_use]
    pub fn from_cards(cards: &[Card], now: DateTime<Utc>, learned_threshold: u8) -> Self {
        let today = start_of_day(now);
        Self {
            total_cards: cards.len(),
            cards_learned: cards
                .iter()
                .filter(|c| c.is_learned(learned_threshold))
                .count(),
            cards_due: cards.iter().filter(|c| c.is_due(today)).count(),
            overall_mastery: average_mastery(cards),
        }
    }
}
