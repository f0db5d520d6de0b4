//! External service integration module
//!
//! This module contains the outward-facing calls for delivering desktop
//! notifications.

pub mod desktop;

// Re-export main functions
pub use desktop::*;
