//! Main application state management

use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{info, warn};

use super::countdown::{CountdownTimer, TimerPhase};
use super::snapshot::{format_span, TimerSnapshot};

/// Command for the background alarm task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmCommand {
    /// Point the alarm at a deadline, tagged with the arming epoch
    Arm { deadline: Instant, epoch: u64 },
    /// Park the alarm, tagged with the epoch of the superseding transition.
    /// The alarm task drops a disarm older than the epoch it has armed, so
    /// delayed delivery behind a newer arm cannot park a live countdown.
    Disarm { epoch: u64 },
}

/// Completion alert handed to the dispatch task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEvent {
    pub title: String,
    pub message: String,
}

impl AlertEvent {
    /// Build the alert announcing a finished countdown
    pub fn countdown_elapsed(configured: Duration) -> Self {
        Self {
            title: "Timer".to_string(),
            message: format!("{} passed", format_span(configured)),
        }
    }
}

/// Shared application state: the countdown machine plus server metadata.
///
/// Every countdown transition and the alarm firing check run under the
/// single `timer` mutex, which is what serializes a stop or reset against
/// a concurrent firing. Channel sends happen after the lock is released;
/// the epoch carried by every alarm command keeps them correct even when
/// concurrent operations deliver their commands out of order.
#[derive(Debug)]
pub struct AppState {
    /// Countdown state machine; this one lock guards all timer fields
    timer: Mutex<CountdownTimer>,
    /// Commands for the alarm task
    alarm_tx: mpsc::UnboundedSender<AlarmCommand>,
    /// Completion alerts for the dispatch task
    alert_tx: mpsc::UnboundedSender<AlertEvent>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        alarm_tx: mpsc::UnboundedSender<AlarmCommand>,
        alert_tx: mpsc::UnboundedSender<AlertEvent>,
    ) -> Self {
        Self {
            timer: Mutex::new(CountdownTimer::new()),
            alarm_tx,
            alert_tx,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Configure the countdown duration (honored while idle or elapsed).
    /// Returns the snapshot and whether the duration was taken.
    pub fn set_duration(
        &self,
        hours: u64,
        minutes: u64,
        seconds: u64,
    ) -> Result<(TimerSnapshot, bool), String> {
        let duration = compose_duration(hours, minutes, seconds);

        let now = Instant::now();
        let mut timer = self.lock_timer()?;
        let honored = timer.set_duration(duration);
        let snapshot = TimerSnapshot::capture(&timer, now);
        drop(timer);

        if honored {
            info!("Configured countdown duration: {}", format_span(duration));
            self.record_action("set");
        }
        Ok((snapshot, honored))
    }

    /// Start the countdown, or re-arm the current one when already running
    pub fn start(&self) -> Result<TimerSnapshot, String> {
        let now = Instant::now();
        let mut timer = self.lock_timer()?;
        let arm = timer.start(now);
        let snapshot = TimerSnapshot::capture(&timer, now);
        drop(timer);

        if let Some(arm) = arm {
            info!("Countdown armed (epoch {})", arm.epoch);
            if let Err(e) = self.alarm_tx.send(AlarmCommand::Arm {
                deadline: arm.deadline,
                epoch: arm.epoch,
            }) {
                warn!("Failed to send alarm command: {}", e);
            }
            self.record_action("start");
        }
        Ok(snapshot)
    }

    /// Stop the countdown, freezing the exact remaining span
    pub fn stop(&self) -> Result<TimerSnapshot, String> {
        let now = Instant::now();
        let mut timer = self.lock_timer()?;
        let stopped = timer.stop(now);
        let remaining = timer.remaining_at(now);
        let epoch = timer.epoch();
        let snapshot = TimerSnapshot::capture(&timer, now);
        drop(timer);

        if stopped {
            info!("Countdown stopped with {} remaining", format_span(remaining));
            self.send_disarm(epoch);
            self.record_action("stop");
        }
        Ok(snapshot)
    }

    /// Clear the countdown and load a new duration
    pub fn reset(
        &self,
        hours: u64,
        minutes: u64,
        seconds: u64,
    ) -> Result<TimerSnapshot, String> {
        let duration = compose_duration(hours, minutes, seconds);
        info!("Resetting countdown to {}", format_span(duration));

        let now = Instant::now();
        let mut timer = self.lock_timer()?;
        timer.reset(duration);
        let epoch = timer.epoch();
        let snapshot = TimerSnapshot::capture(&timer, now);
        drop(timer);

        self.send_disarm(epoch);
        self.record_action("reset");
        Ok(snapshot)
    }

    /// Refresh the presentation snapshot. Never mutates the countdown;
    /// completion is delivered by the alarm task alone.
    pub fn update(&self) -> Result<TimerSnapshot, String> {
        let now = Instant::now();
        let timer = self.lock_timer()?;
        Ok(TimerSnapshot::capture(&timer, now))
    }

    /// Authoritative countdown arithmetic for the status endpoint:
    /// `(remaining, configured)` in whole seconds. Remaining is live while
    /// running, frozen while stopped and absent otherwise.
    pub fn durations(&self) -> Result<(Option<u64>, u64), String> {
        let now = Instant::now();
        let timer = self.lock_timer()?;
        let remaining = match timer.phase() {
            TimerPhase::Running | TimerPhase::Stopped => Some(timer.remaining_at(now).as_secs()),
            TimerPhase::Idle | TimerPhase::Elapsed => None,
        };
        Ok((remaining, timer.configured().as_secs()))
    }

    /// Entry point for the alarm task when its sleep fires.
    ///
    /// The epoch comparison happens under the same lock as the epoch
    /// increments in stop, reset and start, so exactly one of "the firing
    /// landed" and "the transition superseded it" wins. Returns whether
    /// the completion was delivered.
    pub fn handle_alarm_fired(&self, epoch: u64) -> Result<bool, String> {
        let mut timer = self.lock_timer()?;
        let fired = timer.complete(epoch);
        let configured = timer.configured();
        drop(timer);

        if fired {
            info!("Countdown elapsed after {}", format_span(configured));
            if let Err(e) = self.alert_tx.send(AlertEvent::countdown_elapsed(configured)) {
                warn!("Failed to send completion alert: {}", e);
            }
            self.record_action("elapsed");
        }
        Ok(fired)
    }

    /// Record the last action for status reporting
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get the last recorded action and its timestamp
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Get server uptime as a human-readable string
    pub fn get_uptime(&self) -> String {
        format_span(self.start_time.elapsed())
    }

    fn lock_timer(&self) -> Result<MutexGuard<'_, CountdownTimer>, String> {
        self.timer
            .lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    fn send_disarm(&self, epoch: u64) {
        if let Err(e) = self.alarm_tx.send(AlarmCommand::Disarm { epoch }) {
            warn!("Failed to send alarm command: {}", e);
        }
    }
}

/// Compose clock-face components into one span. Range validation happens
/// at the API boundary before this is reached.
fn compose_duration(hours: u64, minutes: u64, seconds: u64) -> Duration {
    Duration::from_secs(hours * 3600 + minutes * 60 + seconds)
}
