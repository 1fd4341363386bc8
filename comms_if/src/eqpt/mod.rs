//! # Equipment interfaces

/// Servo controller board command string.
pub mod servo;

pub use servo::{ServoCmd, ServoCommand};
