//! Sandglass - a state-managed HTTP countdown timer with desktop alerts
//!
//! This is the main entry point for the sandglass application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;

use sandglass::{
    api::create_router,
    config::Config,
    services::check_notify_send_available,
    state::AppState,
    tasks::{alarm_task, alert_dispatch_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "sandglass={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting sandglass server v1.2.0");
    info!(
        "Configuration: host={}, port={}, duration={}min, autostart={}",
        config.host, config.port, config.minutes, config.start
    );

    // Completion alerts go through notify-send; refuse to run without it
    if let Err(e) = check_notify_send_available().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    // Create the shared state and the channels feeding the background tasks
    let (alarm_tx, alarm_rx) = mpsc::unbounded_channel();
    let (alert_tx, alert_rx) = mpsc::unbounded_channel();
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        alarm_tx,
        alert_tx,
    ));

    // Preload the configured duration, arming it right away when requested
    state
        .set_duration(0, config.minutes, 0)
        .map_err(anyhow::Error::msg)?;
    if config.start {
        state.start().map_err(anyhow::Error::msg)?;
    }

    // Start the background alarm and alert dispatch tasks
    let alarm_state = Arc::clone(&state);
    tokio::spawn(async move {
        alarm_task(alarm_state, alarm_rx).await;
    });
    tokio::spawn(async move {
        alert_dispatch_task(alert_rx).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /set    - Configure the countdown duration");
    info!("  POST /start  - Start or resume the countdown");
    info!("  POST /stop   - Stop the countdown, keeping the remaining span");
    info!("  POST /reset  - Clear the countdown and load a new duration");
    info!("  GET  /status - Check the countdown and server status");
    info!("  GET  /health - Health check");

    // Serve until a shutdown signal arrives
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
