//! Background alarm task

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info};

use crate::state::{AlarmCommand, AppState};

/// Park deadline used while nothing is armed
const IDLE_PARK: Duration = Duration::from_secs(30 * 24 * 3600);

/// Background task owning the single countdown alarm.
///
/// One sleep primitive serves every countdown for the life of the process:
/// an `Arm` command re-targets it with `reset` instead of allocating a new
/// wait, and `Disarm` parks it unless a newer arm already superseded the
/// disarming transition. When the sleep fires, the firing is routed
/// through [`AppState::handle_alarm_fired`], which discards it if a stop,
/// reset or restart superseded the armed epoch in the meantime.
pub async fn alarm_task(state: Arc<AppState>, mut commands: mpsc::UnboundedReceiver<AlarmCommand>) {
    info!("Starting alarm task");

    let sleep = sleep(IDLE_PARK);
    tokio::pin!(sleep);
    let mut armed: Option<u64> = None;

    loop {
        tokio::select! {
            command = commands.recv() => {
                match command {
                    Some(AlarmCommand::Arm { deadline, epoch }) => {
                        debug!("Alarm armed (epoch {})", epoch);
                        sleep.as_mut().reset(deadline);
                        armed = Some(epoch);
                    }
                    Some(AlarmCommand::Disarm { epoch }) => {
                        // A disarm delivered behind a newer arm is stale and
                        // must not park the live countdown.
                        if armed.is_some_and(|current| epoch < current) {
                            debug!("Discarded stale disarm (epoch {})", epoch);
                        } else {
                            debug!("Alarm disarmed");
                            sleep.as_mut().reset(Instant::now() + IDLE_PARK);
                            armed = None;
                        }
                    }
                    None => {
                        info!("Alarm channel closed, stopping alarm task");
                        break;
                    }
                }
            }
            () = &mut sleep, if armed.is_some() => {
                if let Some(epoch) = armed.take() {
                    match state.handle_alarm_fired(epoch) {
                        Ok(true) => debug!("Alarm delivered (epoch {})", epoch),
                        Ok(false) => debug!("Discarded stale alarm (epoch {})", epoch),
                        Err(e) => error!("Failed to handle alarm firing: {}", e),
                    }
                }
                sleep.as_mut().reset(Instant::now() + IDLE_PARK);
            }
        }
    }
}
