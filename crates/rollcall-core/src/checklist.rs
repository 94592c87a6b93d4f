//! Checklist step types.

use serde::{Deserialize, Serialize};

/// One labeled unit of a multi-step progress sequence.
///
/// Steps live in an ordered list (insertion order = execution order) and
/// are mutated only by the checklist animator; every other component sees
/// them read-only through snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistStep {
    /// Stable identifier within its list (e.g., "precheck-2")
    pub id: String,
    /// Human-readable step label
    pub label: String,
    /// Whether the step has finished
    pub completed: bool,
    /// Whether the step is the one currently in progress
    pub active: bool,
}

impl ChecklistStep {
    /// Create a pending step (neither active nor completed).
    pub fn pending(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            completed: false,
            active: false,
        }
    }
}

/// Build an ordered step list from labels, with ids `{prefix}-{index}`.
pub fn steps_from_labels(prefix: &str, labels: &[String]) -> Vec<ChecklistStep> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| ChecklistStep::pending(format!("{prefix}-{i}"), label))
        .collect()
}
