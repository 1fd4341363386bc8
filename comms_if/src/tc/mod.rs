//! # Telecommand module
//!
//! Commands an operator (or script) can send to the arm software.

pub mod arm_ctrl;

pub use arm_ctrl::ArmCmd;
