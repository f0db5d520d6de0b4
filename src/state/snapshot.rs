//! Presentation snapshot of the countdown state

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

use super::countdown::{CountdownTimer, TimerPhase};

/// Layout of the snapshot's wall-clock field
const WALL_CLOCK_FORMAT: &str = "%Y/%m/%d %H:%M:%S %Z";

/// Read-only view of the countdown, rebuilt on every refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// Current local wall-clock time
    pub now: String,
    /// Remaining span as `HH:MM:SS.t`; empty when no countdown is showing
    pub remaining: String,
    pub is_started: bool,
    pub is_stopped: bool,
    pub phase: TimerPhase,
}

impl TimerSnapshot {
    /// Capture the presentation view of `timer` as observed at `now`
    pub fn capture(timer: &CountdownTimer, now: Instant) -> Self {
        let remaining = timer
            .display_remaining(now)
            .map(format_remaining)
            .unwrap_or_default();

        Self {
            now: Local::now().format(WALL_CLOCK_FORMAT).to_string(),
            remaining,
            is_started: timer.phase() == TimerPhase::Running,
            is_stopped: timer.phase() == TimerPhase::Stopped,
            phase: timer.phase(),
        }
    }
}

/// Render a remaining span as `HH:MM:SS.t`.
///
/// The hour field wraps modulo 24 so the string always reads like a clock
/// face. Callers needing unwrapped arithmetic use the duration itself.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.as_secs();
    let hours = (total / 3600) % 24;
    let minutes = (total / 60) % 60;
    let seconds = total % 60;
    let tenths = remaining.subsec_millis() / 100;
    format!("{:02}:{:02}:{:02}.{}", hours, minutes, seconds, tenths)
}

/// Render a span in the compact `1h 2m 3s` form used in logs, uptime
/// reporting and completion alerts
pub fn format_span(span: Duration) -> String {
    let total = span.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_renders_hours_minutes_seconds_and_tenths() {
        assert_eq!(format_remaining(Duration::from_secs(300)), "00:05:00.0");
        assert_eq!(format_remaining(Duration::from_secs(3661)), "01:01:01.0");
        assert_eq!(format_remaining(Duration::from_millis(90_400)), "00:01:30.4");
        assert_eq!(format_remaining(Duration::ZERO), "00:00:00.0");
    }

    #[test]
    fn remaining_hours_wrap_like_a_clock_face() {
        assert_eq!(format_remaining(Duration::from_secs(25 * 3600)), "01:00:00.0");
        assert_eq!(format_remaining(Duration::from_secs(24 * 3600)), "00:00:00.0");
    }

    #[test]
    fn spans_render_compactly() {
        assert_eq!(format_span(Duration::ZERO), "0s");
        assert_eq!(format_span(Duration::from_secs(45)), "45s");
        assert_eq!(format_span(Duration::from_secs(300)), "5m 0s");
        assert_eq!(format_span(Duration::from_secs(3 * 3600 + 90)), "3h 1m 30s");
    }

    #[test]
    fn capture_shows_the_countdown_only_while_running() {
        let mut timer = CountdownTimer::new();
        let t0 = Instant::now();
        timer.set_duration(Duration::from_secs(300));

        let idle = TimerSnapshot::capture(&timer, t0);
        assert_eq!(idle.remaining, "");
        assert!(!idle.is_started);
        assert!(!idle.is_stopped);
        assert_eq!(idle.phase, TimerPhase::Idle);
        assert!(!idle.now.is_empty());

        timer.start(t0);
        let running = TimerSnapshot::capture(&timer, t0 + Duration::from_secs(60));
        assert_eq!(running.remaining, "00:04:00.0");
        assert!(running.is_started);
        assert_eq!(running.phase, TimerPhase::Running);

        // At the deadline the view goes blank even before the alarm lands.
        let due = TimerSnapshot::capture(&timer, t0 + Duration::from_secs(300));
        assert_eq!(due.remaining, "");
        assert!(due.is_started);

        timer.stop(t0 + Duration::from_secs(60));
        let stopped = TimerSnapshot::capture(&timer, t0 + Duration::from_secs(60));
        assert_eq!(stopped.remaining, "");
        assert!(stopped.is_stopped);
        assert_eq!(stopped.phase, TimerPhase::Stopped);
    }
}
