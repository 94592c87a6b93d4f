//! Configuration types for the session controller.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Controller configuration loaded from YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ControllerConfig {
    /// Checklist animation timing
    pub timing: TimingSettings,
    /// Checklist step labels
    pub checklists: ChecklistSettings,
}

impl ControllerConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: ControllerConfig = serde_yaml::from_str(yaml)
            .map_err(|e| crate::Error::Config(format!("invalid YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        if self.timing.step_delay_ms == 0 {
            return Err(crate::Error::Config(
                "timing.step_delay_ms must be > 0".to_string(),
            ));
        }

        // The settle pause must be shorter than a step, or completion would
        // look slower than the steps themselves.
        if self.timing.settle_delay_ms >= self.timing.step_delay_ms {
            return Err(crate::Error::Config(
                "timing.settle_delay_ms must be < timing.step_delay_ms".to_string(),
            ));
        }

        if self.timing.tick_interval_ms == 0 {
            return Err(crate::Error::Config(
                "timing.tick_interval_ms must be > 0".to_string(),
            ));
        }

        for (name, labels) in [
            ("checklists.pre_check", &self.checklists.pre_check),
            ("checklists.end_session", &self.checklists.end_session),
        ] {
            if labels.is_empty() {
                return Err(crate::Error::Config(format!("{name} must not be empty")));
            }
            if labels.iter().any(|l| l.trim().is_empty()) {
                return Err(crate::Error::Config(format!(
                    "{name} must not contain blank labels"
                )));
            }
        }

        Ok(())
    }
}

/// Timing settings for checklist animation and the session clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Delay between checklist step transitions, in milliseconds
    pub step_delay_ms: u64,
    /// Pause after the final step before signaling completion, in milliseconds
    pub settle_delay_ms: u64,
    /// Session clock tick cadence, in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            step_delay_ms: 2000,
            settle_delay_ms: 1000,
            tick_interval_ms: 1000,
        }
    }
}

impl TimingSettings {
    /// Delay between step transitions.
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// Settle pause after the final step.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Clock tick cadence.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Checklist step labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistSettings {
    /// Pre-session checklist labels, in execution order
    pub pre_check: Vec<String>,
    /// End-of-session checklist labels, in execution order
    pub end_session: Vec<String>,
}

impl Default for ChecklistSettings {
    fn default() -> Self {
        Self {
            pre_check: [
                "Checking camera permissions",
                "Loading enrolled students",
                "Preparing recognition models",
                "Starting session services",
            ]
            .map(String::from)
            .to_vec(),
            end_session: [
                "Stopping camera stream",
                "Aggregating attendance marks",
                "Computing session summary",
                "Releasing device resources",
                "Finalizing session",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ControllerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timing.step_delay(), Duration::from_millis(2000));
        assert_eq!(config.timing.settle_delay(), Duration::from_millis(1000));
        assert_eq!(config.checklists.pre_check.len(), 4);
        assert_eq!(config.checklists.end_session.len(), 5);
    }

    #[test]
    fn test_from_yaml_overrides() {
        let yaml = r#"
timing:
  step_delay_ms: 500
  settle_delay_ms: 100
"#;
        let config = ControllerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.timing.step_delay_ms, 500);
        assert_eq!(config.timing.settle_delay_ms, 100);
        // Unspecified sections keep their defaults
        assert_eq!(config.checklists.pre_check.len(), 4);
    }

    #[test]
    fn test_validate_zero_step_delay() {
        let mut config = ControllerConfig::default();
        config.timing.step_delay_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_settle_not_shorter_than_step() {
        let mut config = ControllerConfig::default();
        config.timing.settle_delay_ms = config.timing.step_delay_ms;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_checklist() {
        let mut config = ControllerConfig::default();
        config.checklists.end_session.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_blank_label() {
        let mut config = ControllerConfig::default();
        config.checklists.pre_check[1] = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_yaml_invalid() {
        assert!(ControllerConfig::from_yaml(": not yaml :").is_err());
    }
}
