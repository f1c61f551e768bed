#![forbid(unsafe_code)]

pub mod deck_service;
pub mod error;
pub mod review_service;
pub mod sessions;

pub use srs_core::Clock;
pub use sessions as session;

pub use deck_service::{DeckOverview, DeckService};
pub use error::{DeckServiceError, ReviewServiceError, SessionError};
pub use review_service::ReviewService;

pub use sessions::{
    ReviewSession, SessionAnswer, SessionBuilder, SessionCoordinator, SessionPlan,
    SessionProgress, SessionState,
};
