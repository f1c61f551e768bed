use thiserror::Error;

use crate::config::ConfigError;
use crate::model::{
    CardError, DeckError, LabelError, MediaValidationError, ReviewError, SessionStatsError,
    TextError,
};
use crate::scheduler::SchedulerError;

/// Any error raised by the core crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    MediaValidation(#[from] MediaValidationError),
    #[error(transparent)]
    TextValidation(#[from] TextError),
    #[error(transparent)]
    Label(#[from] LabelError),
    #[error(transparent)]
    Card(#[from] CardError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Review(#[from] ReviewError),
    #[error(transparent)]
    SessionStats(#[from] SessionStatsError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
