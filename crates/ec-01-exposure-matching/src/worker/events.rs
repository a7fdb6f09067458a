use serde::{Deserialize, Serialize};

/// Message from a background run to its owner.
///
/// Exactly one terminal event (`Completed` or `Failed`) ends the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// `processed` of `total` keys are done.
    Progress { processed: usize, total: usize },
    /// The run finished; `partial` if it was cancelled early.
    Completed { partial: bool },
    /// The run aborted.
    Failed { reason: String },
}

impl MatchEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}
