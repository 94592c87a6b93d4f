//! # rollcall-session
//!
//! Session orchestration for the rollcall attendance controller.
//!
//! This crate provides:
//! - The session state machine and its phase guards
//! - The sequential checklist animator
//! - The session clock
//! - Camera acquisition/release behind a capability trait
//! - Read-only snapshots for presentation layers
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on rollcall-core and
//! owns every timer and device handle a session uses, guaranteeing none
//! of them outlive the session they belong to.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod animator;
pub mod clock;
pub mod controller;
pub mod media;
pub mod snapshot;

// Re-export commonly used types
pub use animator::ChecklistAnimator;
pub use clock::{format_duration, SessionClock};
pub use controller::SessionController;
pub use media::{CaptureBackend, MediaHandle, MediaManager, StubCamera, StubFailure};
pub use snapshot::SessionSnapshot;
