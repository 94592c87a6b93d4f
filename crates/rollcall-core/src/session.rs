//! Session identity and value objects.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one attendance session run.
///
/// Assigned when a session starts, cleared when the controller resets to
/// idle. Used to correlate log lines and snapshots across transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The course an attendance session is taken for.
///
/// Supplied by the course-selection UI; immutable once a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedCourse {
    /// Course identifier in the surrounding system
    pub id: u32,
    /// Display name (e.g., "Introduction to Computer Science")
    pub name: String,
    /// Short course code (e.g., "CS101")
    pub code: String,
    /// Number of enrolled students
    pub enrolled_count: u32,
}

impl SelectedCourse {
    /// Create a new selected course.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        code: impl Into<String>,
        enrolled_count: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            code: code.into(),
            enrolled_count,
        }
    }
}

/// Final metrics of a completed session.
///
/// Computed exactly once, at the transition into the success phase, from
/// the selected course and the frozen session clock. Immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    /// Number of students marked present
    pub students_marked: u32,
    /// Frozen session duration, rendered as `M:SS`
    pub duration_label: String,
}

/// Presentation-facing status of the camera device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MediaStatus {
    /// No acquisition requested
    #[default]
    Idle,
    /// Acquisition requested, not yet resolved ("device not ready")
    Acquiring,
    /// Device handle held, preview streaming
    Live,
    /// Acquisition failed; session continues without a preview
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn test_session_id_display() {
        let id = SessionId::new();
        assert_eq!(id.to_string().len(), 36); // UUID format length
    }

    #[test]
    fn test_selected_course_new() {
        let course = SelectedCourse::new(1, "Intro to CS", "CS101", 32);
        assert_eq!(course.id, 1);
        assert_eq!(course.code, "CS101");
        assert_eq!(course.enrolled_count, 32);
    }

    #[test]
    fn test_media_status_default() {
        assert_eq!(MediaStatus::default(), MediaStatus::Idle);
    }

    #[test]
    fn test_session_result_serde() {
        let result = SessionResult {
            students_marked: 28,
            duration_label: "2:15".to_string(),
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: SessionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
