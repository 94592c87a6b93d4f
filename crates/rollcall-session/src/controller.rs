//! Attendance session state machine.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use rollcall_core::{
    steps_from_labels, ControllerConfig, Error, Result, SelectedCourse, SessionId, SessionPhase,
    SessionResult,
};

use crate::animator::ChecklistAnimator;
use crate::clock::SessionClock;
use crate::media::{CaptureBackend, MediaManager};
use crate::snapshot::SessionSnapshot;

/// Orchestrates one attendance session at a time.
///
/// Owns the phase, both checklist animators, the session clock and the
/// camera handle. User commands (`start`, `request_end`, `cancel_end`,
/// `confirm_end`, `close`) and internal completions (animator runs, device
/// acquisition, clock ticks) all funnel through one mutex, so state
/// mutations are strictly sequential. Commands issued from the wrong phase
/// are ignored, not errors; duplicate clicks must not corrupt state.
///
/// Cheap to clone; clones share the same session. Spawned work holds only
/// weak references back to the shared state, so dropping the last clone
/// cancels all outstanding timers and releases any held device handle.
#[derive(Debug, Clone)]
pub struct SessionController {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug)]
struct Inner {
    config: ControllerConfig,
    phase: SessionPhase,
    /// Bumped on every reset; spawned work re-validates it before mutating
    /// state, so a stale timer or late acquisition can never touch a newer
    /// session.
    epoch: u64,
    session_id: Option<SessionId>,
    course: Option<SelectedCourse>,
    pre_check: ChecklistAnimator,
    end_session: ChecklistAnimator,
    clock: SessionClock,
    media: MediaManager,
    result: Option<SessionResult>,
    ticker: Option<JoinHandle<()>>,
    acquisition: Option<JoinHandle<()>>,
}

impl Inner {
    fn set_phase(&mut self, new: SessionPhase) {
        let old = self.phase;
        self.phase = new;
        let id = self
            .session_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        info!("Session phase changed: id={}, {} → {}", id, old, new);
    }

    /// Cancel all outstanding work, release the device, reset to idle.
    fn reset(&mut self) {
        self.epoch += 1;
        if let Some(task) = self.ticker.take() {
            task.abort();
        }
        if let Some(task) = self.acquisition.take() {
            task.abort();
        }
        self.pre_check.clear();
        self.end_session.clear();
        if self.media.is_held() {
            // Leak guard: reset must never strand the device.
            warn!("Camera handle still held at reset, force-releasing");
        }
        self.media.release();
        self.clock.reset();
        self.course = None;
        self.result = None;
        if self.phase != SessionPhase::Idle {
            self.set_phase(SessionPhase::Idle);
        }
        self.session_id = None;
    }
}

impl SessionController {
    /// Create a controller with the given configuration and camera backend.
    pub fn new(config: ControllerConfig, backend: Arc<dyn CaptureBackend>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                config,
                phase: SessionPhase::Idle,
                epoch: 0,
                session_id: None,
                course: None,
                pre_check: ChecklistAnimator::new("precheck"),
                end_session: ChecklistAnimator::new("end-session"),
                clock: SessionClock::new(),
                media: MediaManager::new(backend),
                result: None,
                ticker: None,
                acquisition: None,
            })),
        })
    }

    /// Create a controller with default configuration.
    pub fn with_defaults(backend: Arc<dyn CaptureBackend>) -> Self {
        Self::new(ControllerConfig::default(), backend)
            .expect("default configuration is valid")
    }

    /// Start a session for the selected course.
    ///
    /// Fails with [`Error::NoCourseSelected`] when no course is selected.
    /// Starting over a session already in progress force-resets it first:
    /// all outstanding timers are cancelled and any device handle released,
    /// so rapid re-entry leaves exactly one live run.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, course: Option<SelectedCourse>) -> Result<SessionId> {
        let course = course.ok_or(Error::NoCourseSelected)?;

        let mut inner = self.inner.lock().unwrap();
        if inner.phase != SessionPhase::Idle {
            info!(
                "Session start requested while in phase '{}', force-resetting",
                inner.phase
            );
            inner.reset();
        }

        let session_id = SessionId::new();
        info!(
            "Starting session: id={}, course='{}' ({} enrolled)",
            session_id, course.code, course.enrolled_count
        );
        inner.session_id = Some(session_id);
        inner.course = Some(course);
        inner.set_phase(SessionPhase::PreCheck);

        let steps = steps_from_labels("precheck", &inner.config.checklists.pre_check);
        let timing = inner.config.timing.clone();
        let epoch = inner.epoch;
        // Weak: a completion callback must not keep the controller alive,
        // or teardown-by-drop would never run.
        let weak = Arc::downgrade(&self.inner);
        inner.pre_check.run(steps, &timing, move || {
            if let Some(inner) = weak.upgrade() {
                SessionController { inner }.on_precheck_complete(epoch);
            }
        });

        Ok(session_id)
    }

    /// Request to end the session. Accepted only while the camera is
    /// running; the camera keeps streaming so the user can still cancel.
    ///
    /// Returns whether the command was accepted.
    pub fn request_end(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.phase != SessionPhase::Camera {
            debug!("request_end ignored in phase '{}'", inner.phase);
            return false;
        }
        inner.set_phase(SessionPhase::ConfirmEnd);
        true
    }

    /// Dismiss the end-confirmation dialog and return to the camera. The
    /// clock was never paused, so elapsed time keeps accumulating.
    ///
    /// Returns whether the command was accepted.
    pub fn cancel_end(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.phase != SessionPhase::ConfirmEnd {
            debug!("cancel_end ignored in phase '{}'", inner.phase);
            return false;
        }
        inner.set_phase(SessionPhase::Camera);
        true
    }

    /// Confirm the end of the session: releases the camera, freezes the
    /// clock and starts the end-of-session checklist.
    ///
    /// Returns whether the command was accepted.
    pub fn confirm_end(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.phase != SessionPhase::ConfirmEnd {
            debug!("confirm_end ignored in phase '{}'", inner.phase);
            return false;
        }

        inner.media.release();
        let frozen = inner.clock.stop();
        if let Some(task) = inner.ticker.take() {
            task.abort();
        }
        info!(
            "Session end confirmed, duration frozen at {}",
            crate::clock::format_duration(frozen)
        );
        inner.set_phase(SessionPhase::Ending);

        let steps = steps_from_labels("end", &inner.config.checklists.end_session);
        let timing = inner.config.timing.clone();
        let epoch = inner.epoch;
        let weak = Arc::downgrade(&self.inner);
        inner.end_session.run(steps, &timing, move || {
            if let Some(inner) = weak.upgrade() {
                SessionController { inner }.on_ending_complete(epoch);
            }
        });

        true
    }

    /// Close the session and reset to idle.
    ///
    /// Normally called from the success screen, but callable from any
    /// phase as a force-abort: outstanding timers are cancelled and any
    /// held camera handle is released before the reset.
    ///
    /// Returns whether there was a session to close.
    pub fn close(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.phase == SessionPhase::Idle {
            debug!("close ignored: already idle");
            return false;
        }
        inner.reset();
        true
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.inner.lock().unwrap().phase
    }

    /// Read-only snapshot of the full controller state, for presentation
    /// layers to poll after every transition.
    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.lock().unwrap();
        SessionSnapshot {
            session_id: inner.session_id,
            phase: inner.phase,
            pre_check_steps: inner.pre_check.steps(),
            end_session_steps: inner.end_session.steps(),
            started_at: inner.clock.started_at(),
            elapsed_seconds: inner.clock.elapsed_seconds(),
            elapsed_label: inner.clock.label(),
            media_status: inner.media.status().clone(),
            result: inner.result.clone(),
        }
    }

    /// Pre-check finished: open the camera phase.
    fn on_precheck_complete(&self, epoch: u64) {
        let mut inner = self.inner.lock().unwrap();
        if inner.epoch != epoch || inner.phase != SessionPhase::PreCheck {
            debug!("Stale precheck completion ignored");
            return;
        }

        // The pre-check modal closes with its run; its steps are gone
        // outside the precheck phase.
        inner.pre_check.clear();
        inner.set_phase(SessionPhase::Camera);
        inner.clock.start();
        inner.media.begin_acquisition();

        let tick_interval = inner.config.timing.tick_interval();
        // Weak: the ticker loops for the life of the session and must not
        // keep the controller alive past its last external handle.
        let weak = Arc::downgrade(&self.inner);
        inner.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_interval);
            interval.tick().await; // first tick resolves immediately
            loop {
                interval.tick().await;
                let Some(inner) = weak.upgrade() else { break };
                let inner = inner.lock().unwrap();
                if inner.epoch != epoch || !inner.clock.is_running() {
                    break;
                }
                trace!("Session clock tick: elapsed={}", inner.clock.label());
            }
        }));

        let backend = inner.media.backend();
        let weak = Arc::downgrade(&self.inner);
        inner.acquisition = Some(tokio::spawn(async move {
            let outcome = backend.open().await;
            match weak.upgrade() {
                Some(inner) => SessionController { inner }.on_acquisition_resolved(epoch, outcome),
                None => {
                    if let Ok(handle) = outcome {
                        warn!(
                            "Acquisition resolved after controller teardown, releasing: {}",
                            handle
                        );
                        backend.close(&handle);
                    }
                }
            }
        }));
    }

    /// Device acquisition resolved, possibly long after it was requested.
    fn on_acquisition_resolved(&self, epoch: u64, outcome: Result<crate::media::MediaHandle>) {
        let mut inner = self.inner.lock().unwrap();
        let current = inner.epoch == epoch && inner.phase.is_camera_live();
        match outcome {
            Ok(handle) => {
                if current {
                    inner.media.install(handle);
                } else {
                    // The session moved on while the device was opening;
                    // close the handle right away rather than leak it.
                    warn!(
                        "Acquisition resolved after session left camera, releasing: {}",
                        handle
                    );
                    inner.media.backend().close(&handle);
                }
            }
            Err(error) => {
                if current {
                    inner.media.fail(&error);
                } else {
                    debug!("Stale acquisition failure ignored: {}", error);
                }
            }
        }
    }

    /// End checklist finished: compute the result and land on success.
    fn on_ending_complete(&self, epoch: u64) {
        let mut inner = self.inner.lock().unwrap();
        if inner.epoch != epoch || inner.phase != SessionPhase::Ending {
            debug!("Stale ending completion ignored");
            return;
        }

        let students_marked = inner
            .course
            .as_ref()
            .map(|course| course.enrolled_count)
            .unwrap_or(0);
        let result = SessionResult {
            students_marked,
            duration_label: inner.clock.label(),
        };
        info!(
            "Session complete: {} students marked, duration {}",
            result.students_marked, result.duration_label
        );
        // Like the pre-check modal, the ending checklist closes with its
        // run; steps exist only while their phase is animating.
        inner.end_session.clear();
        inner.result = Some(result);
        inner.set_phase(SessionPhase::Success);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(task) = self.ticker.take() {
            task.abort();
        }
        if let Some(task) = self.acquisition.take() {
            task.abort();
        }
        // Animators cancel and the media manager force-releases in their
        // own Drop impls.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::StubCamera;
    use rollcall_core::MediaStatus;

    fn course() -> SelectedCourse {
        SelectedCourse::new(1, "Intro to CS", "CS101", 32)
    }

    fn controller() -> SessionController {
        SessionController::with_defaults(Arc::new(StubCamera::new()))
    }

    #[tokio::test]
    async fn test_new_controller_is_idle() {
        let controller = controller();
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Idle);
        assert!(snapshot.session_id.is_none());
        assert!(snapshot.pre_check_steps.is_empty());
        assert!(snapshot.end_session_steps.is_empty());
        assert_eq!(snapshot.elapsed_label, "0:00");
        assert_eq!(snapshot.media_status, MediaStatus::Idle);
        assert!(snapshot.result.is_none());
    }

    #[tokio::test]
    async fn test_start_without_course_is_rejected() {
        let controller = controller();
        let result = controller.start(None);
        assert!(matches!(result, Err(Error::NoCourseSelected)));
        assert_eq!(controller.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn test_start_enters_precheck_with_steps() {
        let controller = controller();
        let id = controller.start(Some(course())).unwrap();

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::PreCheck);
        assert_eq!(snapshot.session_id, Some(id));
        assert_eq!(snapshot.pre_check_steps.len(), 4);
        assert!(snapshot.pre_check_steps[0].active);
    }

    #[tokio::test]
    async fn test_invalid_phase_commands_are_noops() {
        let controller = controller();

        assert!(!controller.request_end());
        assert!(!controller.cancel_end());
        assert!(!controller.confirm_end());
        assert!(!controller.close());
        assert_eq!(controller.phase(), SessionPhase::Idle);

        controller.start(Some(course())).unwrap();
        // None of these are valid during precheck
        assert!(!controller.request_end());
        assert!(!controller.cancel_end());
        assert!(!controller.confirm_end());
        assert_eq!(controller.phase(), SessionPhase::PreCheck);
    }

    #[tokio::test]
    async fn test_close_during_precheck_resets() {
        let controller = controller();
        controller.start(Some(course())).unwrap();

        assert!(controller.close());
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Idle);
        assert!(snapshot.pre_check_steps.is_empty());
        assert!(snapshot.session_id.is_none());
    }

    #[tokio::test]
    async fn test_restart_assigns_fresh_session_id() {
        let controller = controller();
        let first = controller.start(Some(course())).unwrap();
        let second = controller.start(Some(course())).unwrap();
        assert_ne!(first, second);
        assert_eq!(controller.snapshot().session_id, Some(second));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let mut config = ControllerConfig::default();
        config.timing.step_delay_ms = 0;
        let result = SessionController::new(config, Arc::new(StubCamera::new()));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
