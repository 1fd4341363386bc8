//! # Communications interface crate.
//!
//! Provides the interfaces crossing the boundary of the kinematics software:
//! the servo command string handed to the transport and the arm commands
//! accepted from the operator.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Arm telecommands
pub mod tc;

/// Command definitions for equipment (servo controller board)
pub mod eqpt;
