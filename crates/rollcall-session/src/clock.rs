//! Session duration clock.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Elapsed-time clock for one attendance session.
///
/// A plain value object: elapsed time is computed from a monotonic
/// [`Instant`] on demand, so delayed or dropped ticks never skew the
/// duration. The controller owns the ticker task that surfaces one
/// reading per second; the clock itself holds no timers.
///
/// Uses `tokio::time::Instant` so tests running under paused virtual
/// time observe the same timeline as the animator.
#[derive(Debug, Default)]
pub struct SessionClock {
    /// Monotonic start point (None while not started)
    started: Option<Instant>,
    /// Wall-clock start, for display in snapshots
    started_at: Option<DateTime<Utc>>,
    /// Elapsed value frozen by `stop`
    frozen: Option<Duration>,
}

impl SessionClock {
    /// Create a stopped clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock from zero.
    ///
    /// Starting while already running restarts from zero (guards against
    /// double-start bugs).
    pub fn start(&mut self) {
        if self.is_running() {
            debug!("Clock started while running, restarting from zero");
        }
        self.started = Some(Instant::now());
        self.started_at = Some(Utc::now());
        self.frozen = None;
    }

    /// Stop the clock, freezing the elapsed value.
    ///
    /// Stopping while not running is a no-op returning zero; a value
    /// frozen by an earlier stop stays visible through [`elapsed`](Self::elapsed).
    pub fn stop(&mut self) -> Duration {
        match self.started.take() {
            Some(started) => {
                let elapsed = started.elapsed();
                self.frozen = Some(elapsed);
                elapsed
            }
            None => Duration::ZERO,
        }
    }

    /// Reset to a stopped clock at zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the clock is currently accumulating time.
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Current elapsed duration: live while running, frozen after `stop`,
    /// zero otherwise.
    pub fn elapsed(&self) -> Duration {
        match (self.started, self.frozen) {
            (Some(started), _) => started.elapsed(),
            (None, Some(frozen)) => frozen,
            (None, None) => Duration::ZERO,
        }
    }

    /// Elapsed whole seconds.
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed().as_secs()
    }

    /// Elapsed time rendered as `M:SS` (e.g., `"2:15"`, `"0:00"`).
    pub fn label(&self) -> String {
        format_duration(self.elapsed())
    }

    /// Wall-clock time the clock was started, if it has been.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }
}

/// Render a duration as `M:SS`.
pub fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0:00");
        assert_eq!(format_duration(Duration::from_secs(9)), "0:09");
        assert_eq!(format_duration(Duration::from_secs(135)), "2:15");
        assert_eq!(format_duration(Duration::from_secs(3600)), "60:00");
    }

    #[test]
    fn test_new_clock_is_zero() {
        let clock = SessionClock::new();
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert_eq!(clock.label(), "0:00");
        assert!(clock.started_at().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_accumulates_while_running() {
        let mut clock = SessionClock::new();
        clock.start();
        assert!(clock.is_running());

        advance(Duration::from_secs(135)).await;
        assert_eq!(clock.elapsed_seconds(), 135);
        assert_eq!(clock.label(), "2:15");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_freezes_elapsed() {
        let mut clock = SessionClock::new();
        clock.start();
        advance(Duration::from_secs(42)).await;

        let frozen = clock.stop();
        assert_eq!(frozen, Duration::from_secs(42));
        assert!(!clock.is_running());

        // Time passing after stop does not change the frozen value
        advance(Duration::from_secs(60)).await;
        assert_eq!(clock.elapsed_seconds(), 42);
        assert_eq!(clock.label(), "0:42");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_while_not_running_is_noop_zero() {
        let mut clock = SessionClock::new();
        assert_eq!(clock.stop(), Duration::ZERO);
        assert_eq!(clock.label(), "0:00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_stop_returns_zero_keeps_frozen_value() {
        let mut clock = SessionClock::new();
        clock.start();
        advance(Duration::from_secs(42)).await;
        assert_eq!(clock.stop(), Duration::from_secs(42));

        // A second stop is a no-op returning zero; the frozen display
        // value is untouched
        assert_eq!(clock.stop(), Duration::ZERO);
        assert_eq!(clock.label(), "0:42");
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_restarts_from_zero() {
        let mut clock = SessionClock::new();
        clock.start();
        advance(Duration::from_secs(30)).await;

        clock.start();
        assert_eq!(clock.elapsed_seconds(), 0);

        advance(Duration::from_secs(5)).await;
        assert_eq!(clock.elapsed_seconds(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_frozen_value() {
        let mut clock = SessionClock::new();
        clock.start();
        advance(Duration::from_secs(10)).await;
        clock.stop();

        clock.reset();
        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert!(clock.started_at().is_none());
    }
}
