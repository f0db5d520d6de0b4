//! Sandglass - a state-managed HTTP countdown timer with desktop alerts
//!
//! This library provides a single countdown timer per process, driven over
//! a small HTTP API and backed by one long-lived alarm task that delivers a
//! desktop alert exactly once when the countdown elapses.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
