//! Shared error types for the services crate.

use thiserror::Error;

use srs_core::ConfigError;
use srs_core::model::{CardId, DeckId, SessionStatsError};
use srs_core::scheduler::SchedulerError;
use storage::repository::StorageError;

/// Errors emitted by `ReviewService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReviewServiceError {
    #[error("card {0} not found")]
    CardNotFound(CardId),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `DeckService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeckServiceError {
    #[error("deck {0} not found")]
    DeckNotFound(DeckId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("deck {0} does not exist or has no cards")]
    InvalidDeck(DeckId),
    #[error("quality must be between 0 and 5, got {0}")]
    InvalidQuality(u8),
    #[error("no session in progress")]
    NoActiveSession,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Stats(#[from] SessionStatsError),
    #[error(transparent)]
    Review(ReviewServiceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ReviewServiceError> for SessionError {
    fn from(err: ReviewServiceError) -> Self {
        match err {
            ReviewServiceError::Storage(e) => SessionError::Storage(e),
            other => SessionError::Review(other),
        }
    }
}
