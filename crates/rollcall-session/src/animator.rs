//! Sequential checklist animator.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{debug, trace};

use rollcall_core::{ChecklistStep, TimingSettings};

/// State shared between the animator and its driver task.
///
/// The generation counter invalidates driver tasks that were cancelled or
/// superseded: `JoinHandle::abort` only takes effect at the task's next
/// await point, so a task segment already past its sleep re-checks the
/// generation under the lock before touching any step.
#[derive(Debug, Default)]
struct Shared {
    generation: u64,
    steps: Vec<ChecklistStep>,
}

/// Drives an ordered checklist one step at a time.
///
/// A run marks step 0 active immediately, then on each `step_delay`
/// marks the current step completed and the next active. After the final
/// step completes, a shorter settle pause elapses before the completion
/// callback fires exactly once.
///
/// Restartable: a fresh [`run`](Self::run) fully replaces prior state.
/// Cancellable: [`cancel`](Self::cancel) guarantees no further step
/// mutations and that the completion callback never fires.
#[derive(Debug)]
pub struct ChecklistAnimator {
    /// Name used in log lines ("precheck" or "end-session")
    name: &'static str,
    shared: Arc<Mutex<Shared>>,
    task: Option<JoinHandle<()>>,
}

impl ChecklistAnimator {
    /// Create an idle animator with an empty step list.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            shared: Arc::new(Mutex::new(Shared::default())),
            task: None,
        }
    }

    /// Start animating the given steps, replacing any prior run.
    ///
    /// `on_complete` fires exactly once, after the last step's completion
    /// mutation is visible and the settle pause has elapsed. It is never
    /// invoked for a run that was cancelled or superseded.
    ///
    /// Must be called from within a tokio runtime.
    pub fn run(
        &mut self,
        steps: Vec<ChecklistStep>,
        timing: &TimingSettings,
        on_complete: impl FnOnce() + Send + 'static,
    ) {
        self.cancel();

        let total = steps.len();
        let my_generation = {
            let mut shared = self.shared.lock().unwrap();
            shared.steps = steps;
            if let Some(first) = shared.steps.first_mut() {
                first.active = true;
            }
            shared.generation
        };

        debug!("Animator '{}' starting: {} steps", self.name, total);

        let name = self.name;
        let shared = Arc::clone(&self.shared);
        let step_delay = timing.step_delay();
        let settle_delay = timing.settle_delay();

        self.task = Some(tokio::spawn(async move {
            for index in 0..total {
                tokio::time::sleep(step_delay).await;

                let mut guard = shared.lock().unwrap();
                if guard.generation != my_generation {
                    return;
                }
                guard.steps[index].completed = true;
                guard.steps[index].active = false;
                if let Some(next) = guard.steps.get_mut(index + 1) {
                    next.active = true;
                }
                trace!("Animator '{}' completed step {}/{}", name, index + 1, total);
            }

            tokio::time::sleep(settle_delay).await;

            // Final stale check before signaling; the callback must never
            // fire for a superseded run.
            if shared.lock().unwrap().generation != my_generation {
                return;
            }
            debug!("Animator '{}' run complete", name);
            on_complete();
        }));
    }

    /// Cancel the current run, if any. No further step mutations occur and
    /// the completion callback will not fire.
    pub fn cancel(&mut self) {
        self.shared.lock().unwrap().generation += 1;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Cancel and discard all steps.
    pub fn clear(&mut self) {
        self.cancel();
        self.shared.lock().unwrap().steps.clear();
    }

    /// Whether a driver task is still running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Read-only copy of the current step list.
    pub fn steps(&self) -> Vec<ChecklistStep> {
        self.shared.lock().unwrap().steps.clone()
    }
}

impl Drop for ChecklistAnimator {
    fn drop(&mut self) {
        self.cancel();
    }
}
