//! Read-only controller state for presentation layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rollcall_core::{ChecklistStep, MediaStatus, SessionId, SessionPhase, SessionResult};

/// Everything a presentation layer needs to render the session.
///
/// Produced by [`SessionController::snapshot`](crate::SessionController::snapshot)
/// after any transition; serializable so it can be polled in-process or
/// shipped over whatever transport the UI uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Identity of the current session run, if one is active
    pub session_id: Option<SessionId>,
    /// Current phase
    pub phase: SessionPhase,
    /// Pre-session checklist (empty outside the precheck phase)
    pub pre_check_steps: Vec<ChecklistStep>,
    /// End-of-session checklist (empty outside the ending phase)
    pub end_session_steps: Vec<ChecklistStep>,
    /// Wall-clock time the camera went live
    pub started_at: Option<DateTime<Utc>>,
    /// Elapsed session seconds (frozen once the end is confirmed)
    pub elapsed_seconds: u64,
    /// Elapsed time rendered as `M:SS`
    pub elapsed_label: String,
    /// Camera device status
    pub media_status: MediaStatus,
    /// Final metrics, present only in the success phase
    pub result: Option<SessionResult>,
}

impl SessionSnapshot {
    /// The checklist currently animating, if any.
    pub fn animating_steps(&self) -> Option<&[ChecklistStep]> {
        match self.phase {
            SessionPhase::PreCheck => Some(&self.pre_check_steps),
            SessionPhase::Ending => Some(&self.end_session_steps),
            _ => None,
        }
    }
}
