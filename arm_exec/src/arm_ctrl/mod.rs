//! Arm control module
//!
//! Kinematics of a planar serial arm of 2 or 3 revolute links:
//!
//! ```text
//! JointAngles ──► forward_kinematics ──► Pose
//! Pose ──► ReachAnnulus::check ──► inverse_kinematics ──► IkSolutions (elbow A, elbow B)
//! ```
//!
//! All angles crossing this module's API are in degrees in the display frame,
//! see [`AngleConvention`]. Lengths are in millimeters.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod angle_convention;
mod chain;
mod forward_kinematics;
mod inverse_kinematics;
mod params;
mod reachability;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use angle_convention::*;
pub use chain::*;
pub use forward_kinematics::*;
pub use inverse_kinematics::*;
pub use params::*;
pub use reachability::*;
pub use state::*;

use crate::servo_ctrl::ServoError;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The fewest links a chain can have.
pub const MIN_NUM_LINKS: usize = 2;

/// The most links a chain can have.
pub const MAX_NUM_LINKS: usize = 3;

/// Tolerance applied to both edges of the reach annulus.
///
/// Units: millimeters
pub const REACH_TOLERANCE_MM: f64 = 1e-6;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised by the kinematics solvers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KinError {
    #[error(
        "Target is out of reach: distance {distance_mm} mm is outside the reach annulus \
         [{min_mm}, {max_mm}] mm"
    )]
    Unreachable {
        distance_mm: f64,
        min_mm: f64,
        max_mm: f64,
    },

    #[error(
        "Elbow cosine {cos_theta_2} is outside [-1, 1] for a target that passed the \
         reachability check"
    )]
    InvalidCosine { cos_theta_2: f64 },

    #[error("A chain must have between 2 and 3 links, found {0}")]
    InvalidLinkCount(usize),

    #[error("Link {index} has an invalid length ({length_mm} mm), lengths must be positive")]
    InvalidLinkLength { index: usize, length_mm: f64 },

    #[error("Expected {expected} joint angles (one per link), found {found}")]
    AngleCountMismatch { expected: usize, found: usize },

    #[error("An end effector orientation is required to solve a 3 link chain")]
    MissingOrientation,
}

/// Possible errors that can occur during ArmCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ArmCtrlError {
    #[error("Kinematics error: {0}")]
    Kinematics(#[from] KinError),

    #[error("Servo mapping error: {0}")]
    Servo(#[from] ServoError),

    #[error("Expected {expected} servo channels (one per link), found {found}")]
    ServoCountMismatch { expected: usize, found: usize },

    #[error("There is no inverse kinematics solution with index {0}, expected 0 or 1")]
    InvalidSolutionIndex(usize),

    #[error("ArmCtrl has not been initialised")]
    NotInitialised,
}
