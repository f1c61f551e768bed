use serde::Serialize;

/// Lifecycle of a review session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Completed,
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub state: SessionState,
    /// Zero-based index of the current card; equals `total` once exhausted.
    pub position: usize,
    pub total: usize,
    pub reviewed: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub remaining: usize,
}

impl SessionProgress {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Completed
    }
}
