//! Countdown timer state machine

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Lifecycle phase of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    /// Configured (or freshly reset) but not counting
    Idle,
    /// Counting toward a deadline
    Running,
    /// Paused with an exact remaining span preserved
    Stopped,
    /// The deadline passed and the completion was delivered
    Elapsed,
}

impl TimerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Stopped => "stopped",
            TimerPhase::Elapsed => "elapsed",
        }
    }
}

/// Instruction to point the background alarm at a deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmRequest {
    pub deadline: Instant,
    pub epoch: u64,
}

/// The countdown state machine.
///
/// All transitions take `now` as an argument instead of sampling the clock,
/// so callers decide the observation instant and tests control it. Each
/// superseding transition (a new run, a stop, a reset) increments `epoch`;
/// an alarm firing tagged with an older epoch is discarded in [`complete`].
///
/// [`complete`]: CountdownTimer::complete
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    phase: TimerPhase,
    /// Span loaded by the last set or reset
    configured: Duration,
    /// Frozen remaining span; meaningful while not running
    remaining: Duration,
    /// Absolute deadline; `Some` exactly while running
    deadline: Option<Instant>,
    epoch: u64,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self {
            phase: TimerPhase::Idle,
            configured: Duration::ZERO,
            remaining: Duration::ZERO,
            deadline: None,
            epoch: 0,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn configured(&self) -> Duration {
        self.configured
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Configure the countdown span for the next run.
    ///
    /// Honored while idle or elapsed; a running or stopped countdown keeps
    /// its span until reset. Returns whether the span was taken.
    pub fn set_duration(&mut self, duration: Duration) -> bool {
        if matches!(self.phase, TimerPhase::Idle | TimerPhase::Elapsed) {
            self.configured = duration;
            return true;
        }
        false
    }

    /// Start or resume the countdown.
    ///
    /// Returns the arm request for the background alarm, or `None` when
    /// there is nothing to count. Starting while already running re-arms
    /// the existing deadline under the existing epoch.
    pub fn start(&mut self, now: Instant) -> Option<ArmRequest> {
        if self.phase == TimerPhase::Running {
            return self.deadline.map(|deadline| ArmRequest {
                deadline,
                epoch: self.epoch,
            });
        }

        // A fresh cycle draws its span from the configuration; a resume
        // keeps the span frozen by the stop.
        if self.phase != TimerPhase::Stopped && self.remaining.is_zero() {
            self.remaining = self.configured;
        }
        if self.remaining.is_zero() {
            return None;
        }

        self.epoch += 1;
        self.phase = TimerPhase::Running;
        let deadline = now + self.remaining;
        self.deadline = Some(deadline);
        Some(ArmRequest {
            deadline,
            epoch: self.epoch,
        })
    }

    /// Stop a running countdown, freezing the exact remaining span.
    ///
    /// Returns `false` when nothing was running.
    pub fn stop(&mut self, now: Instant) -> bool {
        if self.phase != TimerPhase::Running {
            return false;
        }

        // Recompute from the deadline; the display string is too coarse.
        if let Some(deadline) = self.deadline.take() {
            self.remaining = deadline.saturating_duration_since(now);
        }
        self.epoch += 1;
        self.phase = TimerPhase::Stopped;
        true
    }

    /// Clear the countdown and load a new span for the next start
    pub fn reset(&mut self, duration: Duration) {
        self.epoch += 1;
        self.phase = TimerPhase::Idle;
        self.configured = duration;
        self.remaining = Duration::ZERO;
        self.deadline = None;
    }

    /// Handle an alarm firing tagged with `epoch`.
    ///
    /// Returns `true` when the firing is current and the countdown moves to
    /// elapsed. A firing whose epoch was superseded by a stop, reset or
    /// restart is discarded and the state is left untouched.
    pub fn complete(&mut self, epoch: u64) -> bool {
        if self.phase != TimerPhase::Running || epoch != self.epoch {
            return false;
        }

        self.phase = TimerPhase::Elapsed;
        self.deadline = None;
        self.remaining = Duration::ZERO;
        true
    }

    /// Authoritative remaining span: live from the deadline while running,
    /// the frozen value otherwise.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        match self.deadline {
            Some(deadline) => deadline.saturating_duration_since(now),
            None => self.remaining,
        }
    }

    /// Remaining span for presentation. `Some` only while running and short
    /// of the deadline; the view hides the countdown everywhere else.
    pub fn display_remaining(&self, now: Instant) -> Option<Duration> {
        match self.deadline {
            Some(deadline) if now < deadline => Some(deadline - now),
            _ => None,
        }
    }
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    #[test]
    fn set_duration_then_start_counts_from_the_configured_span() {
        let mut timer = CountdownTimer::new();
        let t0 = Instant::now();

        timer.set_duration(minutes(5));
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.remaining_at(t0), Duration::ZERO);

        let arm = timer.start(t0).expect("start should arm the alarm");
        assert_eq!(timer.phase(), TimerPhase::Running);
        assert_eq!(arm.deadline, t0 + minutes(5));
        assert_eq!(timer.remaining_at(t0 + minutes(1)), minutes(4));
    }

    #[test]
    fn start_while_running_rearms_the_same_deadline() {
        let mut timer = CountdownTimer::new();
        let t0 = Instant::now();
        timer.set_duration(minutes(5));

        let first = timer.start(t0).expect("first start");
        let second = timer
            .start(t0 + Duration::from_secs(10))
            .expect("second start");

        assert_eq!(first, second);
        assert_eq!(timer.remaining_at(t0 + Duration::from_secs(10)), Duration::from_secs(290));
    }

    #[test]
    fn start_with_nothing_configured_is_a_noop() {
        let mut timer = CountdownTimer::new();
        assert!(timer.start(Instant::now()).is_none());
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert!(timer.deadline().is_none());
    }

    #[test]
    fn stop_captures_the_exact_remaining_span() {
        let mut timer = CountdownTimer::new();
        let t0 = Instant::now();
        timer.set_duration(minutes(5));
        timer.start(t0);

        assert!(timer.stop(t0 + Duration::from_secs(90)));
        assert_eq!(timer.phase(), TimerPhase::Stopped);
        assert!(timer.deadline().is_none());

        // The frozen span does not drain while stopped.
        assert_eq!(timer.remaining_at(t0 + Duration::from_secs(90)), Duration::from_secs(210));
        assert_eq!(timer.remaining_at(t0 + minutes(60)), Duration::from_secs(210));
    }

    #[test]
    fn stop_when_not_running_is_a_noop() {
        let mut timer = CountdownTimer::new();
        let t0 = Instant::now();

        assert!(!timer.stop(t0));
        timer.set_duration(minutes(5));
        assert!(!timer.stop(t0));
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn start_after_stop_resumes_from_the_frozen_span() {
        let mut timer = CountdownTimer::new();
        let t0 = Instant::now();
        timer.set_duration(minutes(5));
        timer.start(t0);
        timer.stop(t0 + Duration::from_secs(90));

        let t1 = t0 + minutes(5);
        let arm = timer.start(t1).expect("resume should arm");
        assert_eq!(arm.deadline, t1 + Duration::from_secs(210));
        assert_eq!(timer.phase(), TimerPhase::Running);
    }

    #[test]
    fn stop_at_the_deadline_freezes_at_zero() {
        let mut timer = CountdownTimer::new();
        let t0 = Instant::now();
        timer.set_duration(minutes(1));
        let arm = timer.start(t0).expect("start");

        assert!(timer.stop(t0 + minutes(1)));
        assert_eq!(timer.phase(), TimerPhase::Stopped);
        assert_eq!(timer.remaining_at(t0 + minutes(2)), Duration::ZERO);

        // The in-flight firing lost the race and must be discarded.
        assert!(!timer.complete(arm.epoch));
        assert_eq!(timer.phase(), TimerPhase::Stopped);

        // Nothing left to resume.
        assert!(timer.start(t0 + minutes(2)).is_none());
        assert_eq!(timer.phase(), TimerPhase::Stopped);
    }

    #[test]
    fn reset_clears_the_countdown_and_loads_the_new_span() {
        let mut timer = CountdownTimer::new();
        let t0 = Instant::now();
        timer.set_duration(minutes(5));
        timer.start(t0);
        timer.stop(t0 + minutes(1));

        timer.reset(minutes(2));
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert!(timer.deadline().is_none());
        assert_eq!(timer.remaining_at(t0 + minutes(1)), Duration::ZERO);

        // The next start uses the new span, not the pre-reset leftovers.
        let t1 = t0 + minutes(10);
        let arm = timer.start(t1).expect("start after reset");
        assert_eq!(arm.deadline, t1 + minutes(2));
    }

    #[test]
    fn stale_firing_after_stop_is_discarded() {
        let mut timer = CountdownTimer::new();
        let t0 = Instant::now();
        timer.set_duration(minutes(5));
        let arm = timer.start(t0).expect("start");
        timer.stop(t0 + minutes(1));

        assert!(!timer.complete(arm.epoch));
        assert_eq!(timer.phase(), TimerPhase::Stopped);
        assert_eq!(timer.remaining_at(t0 + minutes(1)), minutes(4));
    }

    #[test]
    fn stale_firing_after_reset_is_discarded() {
        let mut timer = CountdownTimer::new();
        let t0 = Instant::now();
        timer.set_duration(minutes(5));
        let arm = timer.start(t0).expect("start");

        timer.reset(minutes(1));
        assert!(!timer.complete(arm.epoch));
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn completion_fires_once_and_clears_the_countdown() {
        let mut timer = CountdownTimer::new();
        let t0 = Instant::now();
        timer.set_duration(minutes(5));
        let arm = timer.start(t0).expect("start");

        assert!(timer.complete(arm.epoch));
        assert_eq!(timer.phase(), TimerPhase::Elapsed);
        assert!(timer.deadline().is_none());
        assert_eq!(timer.remaining_at(t0 + minutes(5)), Duration::ZERO);

        // A duplicate firing for the same epoch is inert.
        assert!(!timer.complete(arm.epoch));
        assert_eq!(timer.phase(), TimerPhase::Elapsed);
    }

    #[test]
    fn start_after_elapse_runs_the_configured_span_again() {
        let mut timer = CountdownTimer::new();
        let t0 = Instant::now();
        timer.set_duration(minutes(5));
        let first = timer.start(t0).expect("first run");
        timer.complete(first.epoch);

        let t1 = t0 + minutes(30);
        let second = timer.start(t1).expect("second run");
        assert_eq!(second.deadline, t1 + minutes(5));
        assert_ne!(second.epoch, first.epoch);
    }

    #[test]
    fn set_duration_is_ignored_outside_idle_and_elapsed() {
        let mut timer = CountdownTimer::new();
        let t0 = Instant::now();
        assert!(timer.set_duration(minutes(5)));
        timer.start(t0);

        assert!(!timer.set_duration(minutes(1)));
        assert_eq!(timer.configured(), minutes(5));

        timer.stop(t0 + minutes(1));
        assert!(!timer.set_duration(minutes(1)));
        assert_eq!(timer.configured(), minutes(5));

        timer.reset(minutes(1));
        assert_eq!(timer.configured(), minutes(1));
    }

    #[test]
    fn display_remaining_is_hidden_when_not_running_or_past_due() {
        let mut timer = CountdownTimer::new();
        let t0 = Instant::now();
        timer.set_duration(minutes(5));
        assert!(timer.display_remaining(t0).is_none());

        timer.start(t0);
        assert_eq!(timer.display_remaining(t0 + minutes(1)), Some(minutes(4)));
        assert!(timer.display_remaining(t0 + minutes(5)).is_none());

        timer.stop(t0 + minutes(1));
        assert!(timer.display_remaining(t0 + minutes(1)).is_none());
    }
}
