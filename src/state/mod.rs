//! State management module
//!
//! This module contains the countdown state machine, its presentation
//! snapshot and the shared application state wrapper.

pub mod countdown;
pub mod snapshot;
pub mod app_state;

// Re-export main types
pub use countdown::{ArmRequest, CountdownTimer, TimerPhase};
pub use snapshot::TimerSnapshot;
pub use app_state::{AlarmCommand, AlertEvent, AppState};
