//! # rollcall-core
//!
//! Core types for the rollcall attendance session controller.
//!
//! This crate contains all fundamental types with **no internal
//! dependencies** on other rollcall crates. It provides:
//!
//! - Session phase and identity types (SessionPhase, SessionId)
//! - Course and result value objects (SelectedCourse, SessionResult)
//! - Checklist step types
//! - Configuration types
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this
//! one, but this crate has no dependencies on other rollcall crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checklist;
pub mod config;
pub mod error;
pub mod phase;
pub mod session;

// Re-export commonly used types
pub use checklist::{steps_from_labels, ChecklistStep};
pub use config::{ChecklistSettings, ControllerConfig, TimingSettings};
pub use error::{Error, Result};
pub use phase::SessionPhase;
pub use session::{MediaStatus, SelectedCourse, SessionId, SessionResult};
