use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Card, Quality, ReviewAction, ReviewLog, ReviewOutcome, SchedulingState};
use crate::time::add_days;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("minimum ease factor must be at least {min}, got {provided}")]
    EaseFloorTooLow { min: f64, provided: f64 },
    #[error("lapse ease penalty must be finite and non-negative, got {provided}")]
    InvalidLapsePenalty { provided: f64 },
    #[error("graduating intervals must satisfy 1 <= first <= second, got {first} and {second}")]
    InvalidIntervals { first: u32, second: u32 },
    #[error("knowledge step must be finite and non-negative, got {provided}")]
    InvalidKnowledgeStep { provided: f64 },
    #[error("maximum interval must be between {second} and {limit} days, got {provided}")]
    InvalidMaxInterval { second: u32, limit: u32, provided: u32 },
}

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Tunable constants of the SM-2 update rule.
///
/// Defaults reproduce classic SM-2: ease floor 1.3, a 0.2 ease penalty on
/// lapses, graduating intervals of 1 and 6 days, and a knowledge swing of
/// 10 points per quality step away from the 2.5 midpoint. Grown intervals
/// are capped at `max_interval_days` (100 years).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    pub min_ease_factor: f64,
    pub lapse_ease_penalty: f64,
    pub first_interval_days: u32,
    pub second_interval_days: u32,
    pub knowledge_step: f64,
    pub max_interval_days: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_ease_factor: SchedulingState::MIN_EASE_FACTOR,
            lapse_ease_penalty: 0.2,
            first_interval_days: 1,
            second_interval_days: 6,
            knowledge_step: 10.0,
            max_interval_days: Self::DEFAULT_MAX_INTERVAL_DAYS,
        }
    }
}

impl SchedulerConfig {
    pub const DEFAULT_MAX_INTERVAL_DAYS: u32 = 36_500;
    /// Hard ceiling for `max_interval_days`; keeps due dates inside chrono's range.
    pub const INTERVAL_LIMIT_DAYS: u32 = 3_650_000;

    /// # Errors
    ///
    /// Returns the first `SchedulerError` describing an out-of-range constant.
    /// The ease floor may be raised but never set below 1.3.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if !self.min_ease_factor.is_finite()
            || self.min_ease_factor < SchedulingState::MIN_EASE_FACTOR
        {
            return Err(SchedulerError::EaseFloorTooLow {
                min: SchedulingState::MIN_EASE_FACTOR,
                provided: self.min_ease_factor,
            });
        }
        if !self.lapse_ease_penalty.is_finite() || self.lapse_ease_penalty < 0.0 {
            return Err(SchedulerError::InvalidLapsePenalty {
                provided: self.lapse_ease_penalty,
            });
        }
        if self.first_interval_days == 0 || self.first_interval_days > self.second_interval_days {
            return Err(SchedulerError::InvalidIntervals {
                first: self.first_interval_days,
                second: self.second_interval_days,
            });
        }
        if !self.knowledge_step.is_finite() || self.knowledge_step < 0.0 {
            return Err(SchedulerError::InvalidKnowledgeStep {
                provided: self.knowledge_step,
            });
        }
        if self.max_interval_days < self.second_interval_days
            || self.max_interval_days > Self::INTERVAL_LIMIT_DAYS
        {
            return Err(SchedulerError::InvalidMaxInterval {
                second: self.second_interval_days,
                limit: Self::INTERVAL_LIMIT_DAYS,
                provided: self.max_interval_days,
            });
        }
        Ok(())
    }
}

//
// ─── PREVIEW ───────────────────────────────────────────────────────────────────
//

/// Outcomes for each answer button, computed before the user picks one.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledStates {
    pub forgot: ReviewOutcome,
    pub hard: ReviewOutcome,
    pub easy: ReviewOutcome,
}

impl ScheduledStates {
    #[must_use]
    pub fn select(&self, action: ReviewAction) -> &ReviewOutcome {
        match action {
            ReviewAction::Forgot => &self.forgot,
            ReviewAction::Hard => &self.hard,
            ReviewAction::Easy => &self.easy,
        }
    }
}

/// A review applied to a card: the updated copy, the outcome, and a log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedReview {
    pub card: Card,
    pub outcome: ReviewOutcome,
    pub log: ReviewLog,
}

//
// ─── SCHEDULER ─────────────────────────────────────────────────────────────────
//

/// SM-2 spaced-repetition scheduler.
///
/// A failed recall (quality below 3) resets the card to daily review and
/// lowers its ease. Successful recalls graduate through the first and
/// second intervals and then grow geometrically by the card's ease factor.
/// Knowledge level moves independently of the interval.
///
/// The scheduler holds no state and never fails: every `Quality` is already
/// in range.
///
/// # Examples
///
/// ```
/// # use srs_core::model::{Card, CardBack, CardFront, CardId, DeckId, Quality};
/// # use srs_core::scheduler::Scheduler;
/// # use srs_core::time::fixed_now;
/// let card = Card::new(
///     CardId::new(1),
///     DeckId::new(1),
///     CardFront::new("Concierge")?,
///     CardBack::new("Hotel staff who arranges guest requests.")?,
///     fixed_now(),
/// );
/// let applied = Scheduler::new().apply_review(&card, Quality::new(5)?, fixed_now());
/// assert_eq!(applied.card.scheduling().interval_days(), 1);
/// assert_eq!(applied.card.scheduling().consecutive_correct(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    /// Scheduler with the classic SM-2 constants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `SchedulerError` if the configuration fails validation.
    pub fn try_with_config(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Compute the next scheduling fields for one recall judgment.
    #[must_use]
    pub fn schedule(
        &self,
        state: &SchedulingState,
        quality: Quality,
        reviewed_at: DateTime<Utc>,
    ) -> ReviewOutcome {
        let cfg = &self.config;
        let previous_ease = state.ease_factor();

        let (interval_days, consecutive_correct, ease_factor) = if quality.is_success() {
            let consecutive = state.consecutive_correct().saturating_add(1);
            let interval = match consecutive {
                1 => cfg.first_interval_days,
                2 => cfg.second_interval_days,
                _ => grow_interval(state.interval_days(), previous_ease, cfg.max_interval_days),
            };
            let miss = f64::from(Quality::MAX - quality.value());
            let ease = previous_ease + (0.1 - miss * (0.08 + miss * 0.02));
            (interval, consecutive, ease.max(cfg.min_ease_factor))
        } else {
            let ease = previous_ease - cfg.lapse_ease_penalty;
            (cfg.first_interval_days, 0, ease.max(cfg.min_ease_factor))
        };

        ReviewOutcome {
            reviewed_at,
            next_review_at: add_days(reviewed_at, interval_days),
            interval_days,
            ease_factor,
            consecutive_correct,
            knowledge_level: self.next_knowledge_level(state.knowledge_level(), quality),
        }
    }

    /// Outcomes for all three answer buttons, for "next review in N days" hints.
    #[must_use]
    pub fn preview(&self, state: &SchedulingState, reviewed_at: DateTime<Utc>) -> ScheduledStates {
        ScheduledStates {
            forgot: self.schedule(state, ReviewAction::Forgot.quality(), reviewed_at),
            hard: self.schedule(state, ReviewAction::Hard.quality(), reviewed_at),
            easy: self.schedule(state, ReviewAction::Easy.quality(), reviewed_at),
        }
    }

    /// Review a card, returning an updated copy. The input is left untouched.
    #[must_use]
    pub fn apply_review(
        &self,
        card: &Card,
        quality: Quality,
        reviewed_at: DateTime<Utc>,
    ) -> AppliedReview {
        let outcome = self.schedule(card.scheduling(), quality, reviewed_at);
        let mut updated = card.clone();
        updated.apply_review(&outcome);

        AppliedReview {
            log: ReviewLog::new(card.id(), quality, reviewed_at),
            card: updated,
            outcome,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn next_knowledge_level(&self, current: u8, quality: Quality) -> u8 {
        let delta = (f64::from(quality.value()) - 2.5) * self.config.knowledge_step;
        let next = (f64::from(current) + delta).clamp(0.0, f64::from(SchedulingState::MAX_KNOWLEDGE_LEVEL));
        next.round() as u8
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn grow_interval(previous_days: u32, ease_factor: f64, max_days: u32) -> u32 {
    let grown = (f64::from(previous_days) * ease_factor).round();
    grown.clamp(1.0, f64::from(max_days.max(1))) as u32
}

/// Review a card with the default SM-2 constants.
#[must_use]
pub fn review_card(card: &Card, quality: Quality, now: DateTime<Utc>) -> Card {
    Scheduler::new().apply_review(card, quality, now).card
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CardBack, CardFront, CardId, DeckId};
    use crate::time::{fixed_now, Clock};
    use chrono::Duration;

    const EPS: f64 = 1e-9;

    fn q(value: u8) -> Quality {
        Quality::new(value).unwrap()
    }

    fn build_card(knowledge: u8) -> Card {
        Card::new(
            CardId::new(1),
            DeckId::new(1),
            CardFront::new("Reservation").unwrap(),
            CardBack::new("A room held in advance.").unwrap(),
            fixed_now(),
        )
        .with_scheduling(
            SchedulingState::new(fixed_now())
                .with_knowledge_level(knowledge)
                .unwrap(),
        )
    }

    fn state(interval: u32, ease: f64, consecutive: u32, knowledge: u8) -> SchedulingState {
        SchedulingState::from_persisted(None, fixed_now(), interval, ease, consecutive, knowledge)
            .unwrap()
    }

    #[test]
    fn three_perfect_reviews_follow_the_sm2_chain() {
        let s = Scheduler::new();
        let mut clock = Clock::fixed(fixed_now());
        let mut card = build_card(10);

        let mut intervals = Vec::new();
        let mut eases = Vec::new();
        let mut knowledge = Vec::new();
        for _ in 0..3 {
            card = s.apply_review(&card, q(5), clock.now()).card;
            intervals.push(card.scheduling().interval_days());
            eases.push(card.scheduling().ease_factor());
            knowledge.push(card.knowledge_level());
            clock.advance(Duration::days(1));
        }

        // third interval = round(6 * 2.7) = 16
        assert_eq!(intervals, vec![1, 6, 16]);
        assert!((eases[0] - 2.6).abs() < EPS);
        assert!((eases[1] - 2.7).abs() < EPS);
        assert!((eases[2] - 2.8).abs() < EPS);
        assert_eq!(knowledge, vec![35, 60, 85]);
        assert_eq!(card.scheduling().consecutive_correct(), 3);
    }

    #[test]
    fn failure_resets_interval_and_streak() {
        let s = Scheduler::new();
        for quality in 0..3 {
            let out = s.schedule(&state(16, 2.8, 3, 85), q(quality), fixed_now());
            assert_eq!(out.interval_days, 1);
            assert_eq!(out.consecutive_correct, 0);
            assert!((out.ease_factor - 2.6).abs() < EPS);
        }
    }

    #[test]
    fn failure_ease_is_floored() {
        let s = Scheduler::new();
        let out = s.schedule(&state(1, 1.4, 0, 0), q(0), fixed_now());
        assert!((out.ease_factor - 1.3).abs() < EPS);
    }

    #[test]
    fn third_success_uses_previous_ease() {
        let s = Scheduler::new();
        // quality 3 lowers ease by 0.14, but the interval uses the old 2.5
        let out = s.schedule(&state(6, 2.5, 2, 50), q(3), fixed_now());
        assert_eq!(out.interval_days, 15);
        assert!((out.ease_factor - 2.36).abs() < EPS);
        assert_eq!(out.consecutive_correct, 3);
    }

    #[test]
    fn quality_four_keeps_ease_unchanged() {
        let s = Scheduler::new();
        let out = s.schedule(&state(1, 2.5, 1, 50), q(4), fixed_now());
        assert_eq!(out.interval_days, 6);
        assert!((out.ease_factor - 2.5).abs() < EPS);
        assert_eq!(out.knowledge_level, 65);
    }

    #[test]
    fn success_ease_is_floored() {
        let s = Scheduler::new();
        let out = s.schedule(&state(10, 1.3, 5, 50), q(3), fixed_now());
        assert!((out.ease_factor - 1.3).abs() < EPS);
        assert_eq!(out.interval_days, 13);
    }

    #[test]
    fn knowledge_level_moves_and_clamps() {
        let s = Scheduler::new();
        assert_eq!(s.schedule(&state(1, 2.5, 0, 10), q(0), fixed_now()).knowledge_level, 0);
        assert_eq!(s.schedule(&state(1, 2.5, 0, 10), q(2), fixed_now()).knowledge_level, 5);
        assert_eq!(s.schedule(&state(1, 2.5, 0, 90), q(5), fixed_now()).knowledge_level, 100);
        assert_eq!(s.schedule(&state(1, 2.5, 0, 40), q(1), fixed_now()).knowledge_level, 25);
    }

    #[test]
    fn next_review_is_interval_days_after_review() {
        let s = Scheduler::new();
        let reviewed_at = fixed_now() + Duration::hours(7);
        let out = s.schedule(&state(6, 2.5, 2, 50), q(5), reviewed_at);
        assert_eq!(out.reviewed_at, reviewed_at);
        assert_eq!(out.next_review_at, reviewed_at + Duration::days(15));
    }

    #[test]
    fn apply_review_leaves_input_untouched_and_logs() {
        let s = Scheduler::new();
        let card = build_card(10);
        let applied = s.apply_review(&card, q(1), fixed_now());

        assert_eq!(card.last_reviewed(), None);
        assert_eq!(applied.card.last_reviewed(), Some(fixed_now()));
        assert_eq!(applied.log.card_id, card.id());
        assert_eq!(applied.log.quality, q(1));
        assert_eq!(applied.card.scheduling().interval_days(), applied.outcome.interval_days);
    }

    #[test]
    fn preview_matches_button_qualities() {
        let s = Scheduler::new();
        let st = state(6, 2.5, 2, 50);
        let states = s.preview(&st, fixed_now());

        assert_eq!(states.select(ReviewAction::Forgot).interval_days, 1);
        assert_eq!(states.select(ReviewAction::Hard).interval_days, 15);
        assert_eq!(
            states.select(ReviewAction::Easy),
            &s.schedule(&st, q(5), fixed_now())
        );
    }

    #[test]
    fn review_card_matches_default_scheduler() {
        let card = build_card(10);
        let reviewed = review_card(&card, q(5), fixed_now());
        assert_eq!(reviewed, Scheduler::new().apply_review(&card, q(5), fixed_now()).card);
    }

    #[test]
    fn config_rejects_out_of_range_constants() {
        let low_floor = SchedulerConfig {
            min_ease_factor: 1.1,
            ..SchedulerConfig::default()
        };
        assert!(matches!(
            Scheduler::try_with_config(low_floor),
            Err(SchedulerError::EaseFloorTooLow { .. })
        ));

        let bad_intervals = SchedulerConfig {
            first_interval_days: 7,
            second_interval_days: 6,
            ..SchedulerConfig::default()
        };
        assert!(matches!(
            bad_intervals.validate(),
            Err(SchedulerError::InvalidIntervals { first: 7, second: 6 })
        ));

        let negative_penalty = SchedulerConfig {
            lapse_ease_penalty: -0.1,
            ..SchedulerConfig::default()
        };
        assert!(negative_penalty.validate().is_err());
    }

    #[test]
    fn long_easy_streak_is_capped_at_max_interval() {
        let s = Scheduler::new();
        let mut card = build_card(0);
        let mut at = fixed_now();
        for _ in 0..40 {
            card = s.apply_review(&card, q(5), at).card;
            let sched = card.scheduling();
            assert!(sched.interval_days() <= SchedulerConfig::DEFAULT_MAX_INTERVAL_DAYS);
            assert_eq!(sched.next_review_at(), at + Duration::days(i64::from(sched.interval_days())));
            at = sched.next_review_at();
        }
        assert_eq!(
            card.scheduling().interval_days(),
            SchedulerConfig::DEFAULT_MAX_INTERVAL_DAYS
        );
        assert_eq!(card.scheduling().consecutive_correct(), 40);
        assert_eq!(card.knowledge_level(), 100);
    }

    #[test]
    fn max_interval_is_configurable_and_validated() {
        let s = Scheduler::try_with_config(SchedulerConfig {
            max_interval_days: 30,
            ..SchedulerConfig::default()
        })
        .unwrap();
        assert_eq!(s.schedule(&state(20, 2.5, 4, 50), q(5), fixed_now()).interval_days, 30);

        let below_second = SchedulerConfig {
            max_interval_days: 5,
            ..SchedulerConfig::default()
        };
        assert!(matches!(
            below_second.validate(),
            Err(SchedulerError::InvalidMaxInterval { provided: 5, .. })
        ));
        let past_limit = SchedulerConfig {
            max_interval_days: SchedulerConfig::INTERVAL_LIMIT_DAYS + 1,
            ..SchedulerConfig::default()
        };
        assert!(past_limit.validate().is_err());
    }

    #[test]
    fn custom_graduating_intervals_are_used() {
        let s = Scheduler::try_with_config(SchedulerConfig {
            first_interval_days: 2,
            second_interval_days: 4,
            ..SchedulerConfig::default()
        })
        .unwrap();

        assert_eq!(s.schedule(&state(1, 2.5, 0, 0), q(5), fixed_now()).interval_days, 2);
        assert_eq!(s.schedule(&state(2, 2.5, 1, 0), q(5), fixed_now()).interval_days, 4);
        assert_eq!(s.schedule(&state(4, 2.5, 1, 0), q(1), fixed_now()).interval_days, 2);
    }
}
