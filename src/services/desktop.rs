//! Desktop notification delivery

use tokio::process::Command;
use tracing::{debug, info};

/// Deliver a desktop alert via notify-send
pub async fn send_desktop_alert(title: &str, message: &str) -> Result<(), String> {
    debug!("Sending desktop alert: {}", title);

    let output = Command::new("notify-send")
        .args([title, message])
        .output()
        .await
        .map_err(|e| format!("Failed to execute notify-send: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("notify-send failed: {}", stderr));
    }

    info!("Desktop alert delivered: {}", title);
    Ok(())
}

/// Check if notify-send is available on the system
pub async fn check_notify_send_available() -> Result<(), String> {
    Command::new("notify-send")
        .arg("--version")
        .output()
        .await
        .map_err(|_| "notify-send is not available. This server requires libnotify.".to_string())?;

    info!("notify-send is available");
    Ok(())
}
