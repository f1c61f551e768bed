use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use srs_core::model::{Card, CardBack, CardFront, CardId, DeckId, Quality, SchedulingState};
use srs_core::scheduler::Scheduler;
use srs_core::time::{add_days, fixed_now};

fn arb_state() -> impl Strategy<Value = SchedulingState> {
    (1u32..400, 1.3f64..3.5, 0u32..12, 0u8..=100, prop::bool::ANY).prop_map(
        |(interval, ease, consecutive, knowledge, reviewed)| {
            let last = reviewed.then(fixed_now);
            let next = match last {
                Some(at) => add_days(at, interval),
                None => fixed_now(),
            };
            SchedulingState::from_persisted(last, next, interval, ease, consecutive, knowledge)
                .unwrap()
        },
    )
}

fn arb_quality() -> impl Strategy<Value = Quality> {
    (0u8..=5).prop_map(|q| Quality::new(q).unwrap())
}

fn arb_reviewed_at() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..3650, 0i64..86_400).prop_map(|(days, secs)| {
        fixed_now() + Duration::days(days) + Duration::seconds(secs)
    })
}

fn card_with(state: SchedulingState) -> Card {
    Card::new(
        CardId::new(1),
        DeckId::new(1),
        CardFront::new("Amenities").unwrap(),
        CardBack::new("Extra services offered to guests.").unwrap(),
        fixed_now(),
    )
    .with_scheduling(state)
}

// ── Bounds ──────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn ease_never_drops_below_floor(
        state in arb_state(),
        quality in arb_quality(),
        at in arb_reviewed_at(),
    ) {
        let out = Scheduler::new().schedule(&state, quality, at);
        prop_assert!(out.ease_factor >= SchedulingState::MIN_EASE_FACTOR);
        prop_assert!(out.interval_days >= 1);
        prop_assert!(out.knowledge_level <= 100);
    }

    #[test]
    fn next_review_is_interval_after_review(
        state in arb_state(),
        quality in arb_quality(),
        at in arb_reviewed_at(),
    ) {
        let out = Scheduler::new().schedule(&state, quality, at);
        prop_assert_eq!(out.reviewed_at, at);
        prop_assert_eq!(out.next_review_at, at + Duration::days(i64::from(out.interval_days)));
    }
}

// ── Failure and success rules ─────────────────────────────────────────────

proptest! {
    #[test]
    fn failure_resets_streak_and_interval(
        state in arb_state(),
        q in 0u8..3,
        at in arb_reviewed_at(),
    ) {
        let out = Scheduler::new().schedule(&state, Quality::new(q).unwrap(), at);
        prop_assert_eq!(out.interval_days, 1);
        prop_assert_eq!(out.consecutive_correct, 0);
        let expected = (state.ease_factor() - 0.2).max(SchedulingState::MIN_EASE_FACTOR);
        prop_assert!((out.ease_factor - expected).abs() < 1e-9);
        prop_assert!(out.knowledge_level <= state.knowledge_level());
    }

    #[test]
    fn success_extends_streak_and_follows_graduation(
        state in arb_state(),
        q in 3u8..=5,
        at in arb_reviewed_at(),
    ) {
        let out = Scheduler::new().schedule(&state, Quality::new(q).unwrap(), at);
        prop_assert_eq!(out.consecutive_correct, state.consecutive_correct() + 1);
        let expected_interval = match out.consecutive_correct {
            1 => 1,
            2 => 6,
            _ => (f64::from(state.interval_days()) * state.ease_factor()).round() as u32,
        };
        prop_assert_eq!(out.interval_days, expected_interval);
        prop_assert!(out.knowledge_level >= state.knowledge_level());
    }

    #[test]
    fn applied_card_satisfies_invariants(
        state in arb_state(),
        quality in arb_quality(),
        at in arb_reviewed_at(),
    ) {
        let card = card_with(state);
        let applied = Scheduler::new().apply_review(&card, quality, at);
        let s = applied.card.scheduling();

        prop_assert_eq!(s.last_reviewed(), Some(at));
        prop_assert_eq!(s.next_review_at(), add_days(at, s.interval_days()));
        prop_assert!(SchedulingState::from_persisted(
            s.last_reviewed(),
            s.next_review_at(),
            s.interval_days(),
            s.ease_factor(),
            s.consecutive_correct(),
            s.knowledge_level(),
        ).is_ok());
        prop_assert_eq!(applied.card.id(), card.id());
        prop_assert_eq!(applied.card.front(), card.front());
    }
}

// ── Review sequences ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn invariants_hold_across_review_sequences(
        qualities in prop::collection::vec(arb_quality(), 1..60),
        knowledge in 0u8..=100,
    ) {
        let scheduler = Scheduler::new();
        let start = SchedulingState::new(fixed_now()).with_knowledge_level(knowledge).unwrap();
        let mut card = card_with(start);

        for quality in qualities {
            let at = card.next_review_at();
            let previous = card.scheduling().clone();
            card = scheduler.apply_review(&card, quality, at).card;
            let s = card.scheduling();

            prop_assert!(s.ease_factor() >= SchedulingState::MIN_EASE_FACTOR);
            prop_assert!(s.knowledge_level() <= SchedulingState::MAX_KNOWLEDGE_LEVEL);
            prop_assert!(s.interval_days() >= 1);
            prop_assert!(s.interval_days() <= scheduler.config().max_interval_days);
            prop_assert_eq!(s.last_reviewed(), Some(at));
            prop_assert_eq!(s.next_review_at(), at + Duration::days(i64::from(s.interval_days())));
            if quality.is_success() {
                prop_assert_eq!(s.consecutive_correct(), previous.consecutive_correct() + 1);
            } else {
                prop_assert_eq!(s.consecutive_correct(), 0);
                prop_assert_eq!(s.interval_days(), 1);
            }
        }
    }
}
