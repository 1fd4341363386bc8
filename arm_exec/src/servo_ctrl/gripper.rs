//! Gripper pulse width to jaw opening map

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::ServoError;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Calibration of the gripper servo.
///
/// The open pulse may be above or below the closed pulse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GripperConfig {
    /// Pulse width at which the jaws are fully open.
    ///
    /// Units: microseconds
    pub pulse_open_us: f64,

    /// Pulse width at which the jaws are closed.
    ///
    /// Units: microseconds
    pub pulse_closed_us: f64,

    /// Jaw opening when fully open.
    ///
    /// Units: millimeters
    pub mm_open: f64,
}

/// A validated gripper calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GripperMap {
    config: GripperConfig,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GripperMap {
    pub fn new(config: GripperConfig) -> Result<Self, ServoError> {
        if !config.pulse_open_us.is_finite()
            || !config.pulse_closed_us.is_finite()
            || config.pulse_open_us == config.pulse_closed_us
        {
            return Err(ServoError::DegenerateGripper);
        }

        if !(config.mm_open.is_finite() && config.mm_open > 0.0) {
            return Err(ServoError::InvalidGripperOpening(config.mm_open));
        }

        Ok(Self { config })
    }

    /// Estimate the jaw opening for the pulse currently applied to the gripper.
    ///
    /// Pulses beyond either end of the calibration are clamped into
    /// `[0, mm_open]`. A `NaN` pulse reads as closed.
    ///
    /// Units: millimeters
    pub fn opening_mm(&self, pulse_us: f64) -> f64 {
        let cfg = &self.config;

        if pulse_us.is_nan() {
            return 0.0;
        }

        let t = (pulse_us - cfg.pulse_open_us) / (cfg.pulse_closed_us - cfg.pulse_open_us);

        clamp(&(cfg.mm_open * (1.0 - t)), &0.0, &cfg.mm_open)
    }
}
