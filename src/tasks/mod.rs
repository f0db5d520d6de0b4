//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server:
//! the alarm owning the countdown deadline and the alert dispatcher.

pub mod alarm;
pub mod alerts;

// Re-export main functions
pub use alarm::alarm_task;
pub use alerts::alert_dispatch_task;
