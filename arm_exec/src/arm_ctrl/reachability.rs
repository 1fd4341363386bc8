//! Reachability of a target by a 2 link (sub)chain

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use serde::Serialize;

use super::{KinError, LinkChain, REACH_TOLERANCE_MM};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The ring of distances from the base a 2 link chain can reach,
/// `[|a1 - a2|, a1 + a2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReachAnnulus {
    /// Units: millimeters
    pub min_mm: f64,

    /// Units: millimeters
    pub max_mm: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ReachAnnulus {
    /// Annulus of two links of lengths `a1_mm` and `a2_mm`.
    pub fn new(a1_mm: f64, a2_mm: f64) -> Self {
        Self {
            min_mm: (a1_mm - a2_mm).abs(),
            max_mm: a1_mm + a2_mm,
        }
    }

    /// Annulus of the first two links of the chain.
    ///
    /// For a 3 link chain this is the annulus the wrist point must lie in.
    pub fn for_chain(chain: &LinkChain) -> Self {
        let lengths = chain.lengths_mm();
        Self::new(lengths[0], lengths[1])
    }

    /// Whether the distance lies in the annulus, within [`REACH_TOLERANCE_MM`].
    ///
    /// A `NaN` distance is never reachable.
    pub fn contains(&self, distance_mm: f64) -> bool {
        self.min_mm - REACH_TOLERANCE_MM <= distance_mm
            && distance_mm <= self.max_mm + REACH_TOLERANCE_MM
    }

    /// Check the distance is reachable, giving an [`KinError::Unreachable`] if it isn't.
    pub fn check(&self, distance_mm: f64) -> Result<(), KinError> {
        trace!(
            "Reach check: {} mm in [{}, {}] mm",
            distance_mm,
            self.min_mm,
            self.max_mm
        );

        if self.contains(distance_mm) {
            Ok(())
        } else {
            Err(KinError::Unreachable {
                distance_mm,
                min_mm: self.min_mm,
                max_mm: self.max_mm,
            })
        }
    }
}

/// Whether links `a1_mm` and `a2_mm` can reach a point `distance_mm` from the base.
pub fn is_reachable(distance_mm: f64, a1_mm: f64, a2_mm: f64) -> bool {
    ReachAnnulus::new(a1_mm, a2_mm).contains(distance_mm)
}
