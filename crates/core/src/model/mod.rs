mod card;
pub mod content;
mod deck;
mod ids;
mod progress;
mod review;
mod session;
mod tag;

pub use content::{
    AudioClip, CardBack, CardFront, MediaUri, MediaValidationError, TextError,
};
pub use ids::{CardId, DeckId, ParseIdError};

pub use card::{Card, CardError, Difficulty, SchedulingState};
pub use deck::{Deck, DeckError, DeckFilter};
pub use progress::{ProgressStats, average_mastery};
pub use review::{Quality, ReviewAction, ReviewError, ReviewLog, ReviewOutcome, SWIPE_THRESHOLD_PX};
pub use session::{SessionStats, SessionStatsError};
pub use tag::{Category, LabelError, TagName};
