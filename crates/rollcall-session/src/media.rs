//! Camera device acquisition and release.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use rollcall_core::{Error, MediaStatus, Result};

/// Exclusive handle to a video capture device.
///
/// Opaque to everything except the [`MediaManager`] that owns it; at most
/// one handle is outstanding per session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHandle {
    id: Uuid,
    device_label: String,
}

impl MediaHandle {
    /// Create a handle for the named device.
    pub fn new(device_label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            device_label: device_label.into(),
        }
    }

    /// Label of the device this handle was opened against.
    pub fn device_label(&self) -> &str {
        &self.device_label
    }
}

impl std::fmt::Display for MediaHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.device_label, self.id)
    }
}

/// Capability boundary around the platform camera API.
///
/// The session controller only ever asks for exclusive access to a video
/// capture device and gives it back; everything platform-specific lives
/// behind this trait, so the orchestration logic is testable without
/// hardware.
#[async_trait]
pub trait CaptureBackend: Send + Sync + std::fmt::Debug {
    /// Request exclusive access to a capture device.
    ///
    /// May resolve after an arbitrary delay. Fails with
    /// [`Error::CameraUnavailable`] or [`Error::PermissionDenied`] as
    /// reported by the platform.
    async fn open(&self) -> Result<MediaHandle>;

    /// Release a previously opened handle.
    ///
    /// Must tolerate handles from aborted or superseded sessions.
    fn close(&self, handle: &MediaHandle);
}

/// Failure mode injected into a [`StubCamera`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubFailure {
    /// Device exists but cannot be opened (busy, unplugged)
    Unavailable,
    /// Platform permission prompt denied
    Denied,
}

/// In-process camera backend with configurable latency and failure
/// injection. Used by the demo binary and tests; no hardware involved.
#[derive(Debug)]
pub struct StubCamera {
    device_label: String,
    latency: Duration,
    failure: Option<StubFailure>,
}

impl StubCamera {
    /// Create a stub camera that opens successfully after a short delay.
    pub fn new() -> Self {
        Self {
            device_label: "Stub Camera".to_string(),
            latency: Duration::from_millis(300),
            failure: None,
        }
    }

    /// Set the simulated acquisition latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every acquisition fail with the given mode.
    pub fn with_failure(mut self, failure: StubFailure) -> Self {
        self.failure = Some(failure);
        self
    }
}

impl Default for StubCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureBackend for StubCamera {
    async fn open(&self) -> Result<MediaHandle> {
        tokio::time::sleep(self.latency).await;
        match self.failure {
            Some(StubFailure::Unavailable) => {
                Err(Error::CameraUnavailable("device busy".to_string()))
            }
            Some(StubFailure::Denied) => {
                Err(Error::PermissionDenied("permission prompt denied".to_string()))
            }
            None => Ok(MediaHandle::new(self.device_label.clone())),
        }
    }

    fn close(&self, handle: &MediaHandle) {
        debug!("Stub camera closed: handle={}", handle);
    }
}

/// Owner of the camera handle for one session controller.
///
/// Tracks the presentation-facing [`MediaStatus`] alongside the handle.
/// `release` is idempotent and is invoked on every path that leaves the
/// live-camera phases, including force-abort and teardown.
#[derive(Debug)]
pub struct MediaManager {
    backend: Arc<dyn CaptureBackend>,
    handle: Option<MediaHandle>,
    status: MediaStatus,
}

impl MediaManager {
    /// Create a manager over the given backend, holding nothing.
    pub fn new(backend: Arc<dyn CaptureBackend>) -> Self {
        Self {
            backend,
            handle: None,
            status: MediaStatus::Idle,
        }
    }

    /// The backend, for spawning acquisition work.
    pub fn backend(&self) -> Arc<dyn CaptureBackend> {
        Arc::clone(&self.backend)
    }

    /// Mark acquisition as requested but not yet resolved.
    pub fn begin_acquisition(&mut self) {
        self.status = MediaStatus::Acquiring;
    }

    /// Install a freshly acquired handle.
    ///
    /// A second outstanding handle is a logic error; debug builds assert,
    /// release builds force-release the old handle and keep the new one.
    pub fn install(&mut self, handle: MediaHandle) {
        debug_assert!(
            self.handle.is_none(),
            "camera handle installed while one is already held"
        );
        if let Some(old) = self.handle.take() {
            warn!("Force-releasing superseded camera handle: {}", old);
            self.backend.close(&old);
        }
        info!("Camera handle acquired: {}", handle);
        self.handle = Some(handle);
        self.status = MediaStatus::Live;
    }

    /// Record a failed acquisition. Non-fatal: the session continues with
    /// a degraded (no-preview) state.
    pub fn fail(&mut self, error: &Error) {
        warn!("Camera acquisition failed: {}", error);
        self.status = MediaStatus::Failed(error.to_string());
    }

    /// Release the held handle, if any. Idempotent.
    pub fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            info!("Camera handle released: {}", handle);
            self.backend.close(&handle);
        }
        self.status = MediaStatus::Idle;
    }

    /// Whether a handle is currently held.
    pub fn is_held(&self) -> bool {
        self.handle.is_some()
    }

    /// Presentation-facing device status.
    pub fn status(&self) -> &MediaStatus {
        &self.status
    }
}

impl Drop for MediaManager {
    fn drop(&mut self) {
        // Leak guard: teardown must never strand a device handle.
        if self.is_held() {
            warn!("Camera handle still held at teardown, force-releasing");
            self.release();
        }
    }
}
