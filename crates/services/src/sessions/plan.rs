use srs_core::model::Card;

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub cards: Vec<Card>,
    /// Cards left out because the deck exceeded the session size.
    pub skipped: usize,
}

impl SessionPlan {
    /// Total number of cards in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.cards.len()
    }

    /// Returns true when no cards were selected for this session.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Picks the soonest-due cards of a deck, up to a fixed session size.
#[derive(Debug, Clone, Copy)]
pub struct SessionBuilder {
    max_cards: usize,
}

impl SessionBuilder {
    #[must_use]
    pub fn new(max_cards: usize) -> Self {
        Self { max_cards }
    }

    /// Build a session plan from a deck's cards in store order.
    ///
    /// Cards are sorted ascending by `next_review_at`; the sort is stable, so
    /// equal due dates keep their store order.
    pub fn build(self, cards: impl IntoIterator<Item = Card>) -> SessionPlan {
        let mut cards: Vec<Card> = cards.into_iter().collect();
        cards.sort_by_key(Card::next_review_at);

        let skipped = cards.len().saturating_sub(self.max_cards);
        cards.truncate(self.max_cards);

        SessionPlan { cards, skipped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use srs_core::model::{CardBack, CardFront, CardId, DeckId, SchedulingState};
    use srs_core::time::fixed_now;

    fn build_card(id: u64, due_in_days: i64) -> Card {
        Card::new(
            CardId::new(id),
            DeckId::new(1),
            CardFront::new(format!("T{id}")).unwrap(),
            CardBack::new(format!("D{id}")).unwrap(),
            fixed_now(),
        )
        .with_scheduling(SchedulingState::new(fixed_now() + Duration::days(due_in_days)))
    }

    fn ids(plan: &SessionPlan) -> Vec<u64> {
        plan.cards.iter().map(|c| c.id().value()).collect()
    }

    #[test]
    fn builder_sorts_soonest_due_first() {
        let plan = SessionBuilder::new(20).build(vec![
            build_card(1, 3),
            build_card(2, -1),
            build_card(3, 0),
        ]);
        assert_eq!(ids(&plan), vec![2, 3, 1]);
        assert_eq!(plan.skipped, 0);
    }

    #[test]
    fn ties_keep_store_order() {
        let plan = SessionBuilder::new(20).build(vec![
            build_card(5, 0),
            build_card(1, 0),
            build_card(3, -2),
            build_card(4, 0),
        ]);
        assert_eq!(ids(&plan), vec![3, 5, 1, 4]);
    }

    #[test]
    fn builder_caps_session_size() {
        let cards: Vec<Card> = (0..25).map(|i| build_card(i, 25 - i as i64)).collect();
        let plan = SessionBuilder::new(20).build(cards);

        assert_eq!(plan.total(), 20);
        assert_eq!(plan.skipped, 5);
        // the five latest-due cards are dropped
        assert_eq!(plan.cards[0].id().value(), 24);
        assert!(plan.cards.iter().all(|c| c.id().value() >= 5));
    }

    #[test]
    fn empty_input_yields_empty_plan() {
        let plan = SessionBuilder::new(20).build(Vec::new());
        assert!(plan.is_empty());
    }
}
