//! Session phase type.

use serde::{Deserialize, Serialize};

/// Phase of an attendance session.
///
/// Exactly one phase is active at a time; the session controller owns the
/// current value and is the only component allowed to change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SessionPhase {
    /// No session in progress (initial and terminal phase)
    #[default]
    Idle,
    /// Pre-session checklist is animating
    PreCheck,
    /// Camera is live and attendance capture is running
    Camera,
    /// End requested, awaiting explicit confirmation (camera stays live)
    ConfirmEnd,
    /// End confirmed, end-of-session checklist is animating
    Ending,
    /// Session finished, final metrics available
    Success,
}

impl SessionPhase {
    /// Whether the camera is live in this phase.
    ///
    /// The confirmation dialog is an overlay over a still-running session,
    /// so `ConfirmEnd` counts as live: the device handle is kept and the
    /// clock keeps running until the end is confirmed.
    pub fn is_camera_live(&self) -> bool {
        matches!(self, SessionPhase::Camera | SessionPhase::ConfirmEnd)
    }

    /// Whether a checklist animation runs in this phase.
    pub fn is_animating(&self) -> bool {
        matches!(self, SessionPhase::PreCheck | SessionPhase::Ending)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::PreCheck => "precheck",
            SessionPhase::Camera => "camera",
            SessionPhase::ConfirmEnd => "confirm_end",
            SessionPhase::Ending => "ending",
            SessionPhase::Success => "success",
        };
        write!(f, "{name}")
    }
}
