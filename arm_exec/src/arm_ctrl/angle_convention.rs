//! Angle convention between the display frame and the mathematical frame

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Offset between the frame angles are displayed in and the frame the
/// trigonometry is evaluated in.
///
/// The mathematical frame measures the base joint from the positive x axis.
/// The display frame may measure it from elsewhere, most commonly from the
/// vertical (an offset of 90 degrees). Only the base joint is affected, every
/// other joint angle is relative to the previous link in both frames.
///
/// Solvers must convert through this type rather than adding the offset
/// themselves.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngleConvention {
    /// Units: degrees
    pub offset_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AngleConvention {
    /// Base joint zero points along the positive x axis.
    pub const X_AXIS_ZERO: Self = Self { offset_deg: 0.0 };

    /// Base joint zero points straight up.
    pub const VERTICAL_ZERO: Self = Self { offset_deg: 90.0 };

    pub fn new(offset_deg: f64) -> Self {
        Self { offset_deg }
    }

    /// Convert a base joint angle from the display frame to the mathematical frame.
    pub fn to_math_frame(&self, angle_deg: f64) -> f64 {
        angle_deg + self.offset_deg
    }

    /// Convert a base joint angle from the mathematical frame to the display frame.
    pub fn to_display_frame(&self, angle_deg: f64) -> f64 {
        angle_deg - self.offset_deg
    }
}
