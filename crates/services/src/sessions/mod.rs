mod plan;
mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SessionBuilder, SessionPlan};
pub use progress::{SessionProgress, SessionState};
pub use service::ReviewSession;
pub use workflow::{SessionAnswer, SessionCoordinator};
