//! # Arm library.
//!
//! Kinematics and actuator mapping for short planar serial arms (2 or 3
//! links). Solvers are pure functions over explicit inputs, the only state
//! lives in [`arm_ctrl::ArmCtrl`] which holds the configuration snapshot used
//! by the executable.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Arm control module - forward/inverse kinematics and reachability of the link chain
pub mod arm_ctrl;

/// Servo control module - converts joint angles into servo commands and gripper pulses into jaw
/// openings
pub mod servo_ctrl;
