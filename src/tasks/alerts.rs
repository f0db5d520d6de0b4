//! Completion alert dispatch task

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::services::send_desktop_alert;
use crate::state::AlertEvent;

/// Background task delivering completion alerts to the desktop.
///
/// Delivery failures are logged and dropped; they never feed back into the
/// countdown state.
pub async fn alert_dispatch_task(mut alerts: mpsc::UnboundedReceiver<AlertEvent>) {
    info!("Starting alert dispatch task");

    while let Some(alert) = alerts.recv().await {
        info!("Dispatching alert: {}", alert.title);
        if let Err(e) = send_desktop_alert(&alert.title, &alert.message).await {
            warn!("Failed to deliver desktop alert: {}", e);
        }
    }

    info!("Alert channel closed, stopping alert dispatch task");
}
