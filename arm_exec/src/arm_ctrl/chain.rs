//! Link chain, joint angle and pose value types

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, ops::Index};

// Internal
use super::{KinError, MAX_NUM_LINKS, MIN_NUM_LINKS};
use util::maths::wrap_deg_180;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Ordered link lengths of the arm, base link first.
///
/// The number of links is fixed at construction and every length is
/// positive, a chain can't be built otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct LinkChain {
    /// Units: millimeters
    lengths_mm: Vec<f64>,
}

/// Joint angles of the arm, one per link, base joint first.
///
/// Each angle is relative to the previous link, the base joint angle is
/// relative to the frame's zero direction.
///
/// Units: degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointAngles(Vec<f64>);

/// Position and orientation of the end effector in the arm plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position of the end effector relative to the base joint.
    ///
    /// Units: millimeters
    pub position_mm: Point2<f64>,

    /// Orientation of the last link in the display frame.
    ///
    /// Only a 3 link chain has an independent orientation, for a 2 link chain
    /// this is `None`.
    ///
    /// Units: degrees
    pub orientation_deg: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LinkChain {
    /// Create a new chain from link lengths, base link first.
    pub fn new(lengths_mm: Vec<f64>) -> Result<Self, KinError> {
        if lengths_mm.len() < MIN_NUM_LINKS || lengths_mm.len() > MAX_NUM_LINKS {
            return Err(KinError::InvalidLinkCount(lengths_mm.len()));
        }

        for (index, &length_mm) in lengths_mm.iter().enumerate() {
            if !length_mm.is_finite() || length_mm <= 0.0 {
                return Err(KinError::InvalidLinkLength { index, length_mm });
            }
        }

        Ok(Self { lengths_mm })
    }

    /// Link lengths in millimeters.
    pub fn lengths_mm(&self) -> &[f64] {
        &self.lengths_mm
    }

    pub fn num_links(&self) -> usize {
        self.lengths_mm.len()
    }

    /// Distance from the base to the end effector with the arm fully extended.
    pub fn max_reach_mm(&self) -> f64 {
        self.lengths_mm.iter().sum()
    }

    /// Check that `angles` has one angle per link.
    pub fn check_angles(&self, angles: &JointAngles) -> Result<(), KinError> {
        if angles.len() != self.num_links() {
            return Err(KinError::AngleCountMismatch {
                expected: self.num_links(),
                found: angles.len(),
            });
        }

        Ok(())
    }
}

impl Default for LinkChain {
    /// The 3 link arm, 120, 210 and 100 mm.
    fn default() -> Self {
        Self {
            lengths_mm: vec![120.0, 210.0, 100.0],
        }
    }
}

impl TryFrom<Vec<f64>> for LinkChain {
    type Error = KinError;

    fn try_from(lengths_mm: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(lengths_mm)
    }
}

impl From<LinkChain> for Vec<f64> {
    fn from(chain: LinkChain) -> Self {
        chain.lengths_mm
    }
}

impl JointAngles {
    pub fn new(angles_deg: Vec<f64>) -> Self {
        Self(angles_deg)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    /// Return a copy with every angle wrapped into `(-180, 180]`.
    pub fn normalised(&self) -> Self {
        Self(self.0.iter().map(|&a| wrap_deg_180(a)).collect())
    }
}

impl From<Vec<f64>> for JointAngles {
    fn from(angles_deg: Vec<f64>) -> Self {
        Self(angles_deg)
    }
}

impl Index<usize> for JointAngles {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl Pose {
    /// A pose with no orientation, as used for a 2 link chain.
    pub fn new(px_mm: f64, py_mm: f64) -> Self {
        Self {
            position_mm: Point2::new(px_mm, py_mm),
            orientation_deg: None,
        }
    }

    /// A pose with an end effector orientation, as used for a 3 link chain.
    pub fn with_orientation(px_mm: f64, py_mm: f64, orientation_deg: f64) -> Self {
        Self {
            position_mm: Point2::new(px_mm, py_mm),
            orientation_deg: Some(orientation_deg),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_chain_new() {
        let chain = LinkChain::new(vec![120.0, 210.0, 100.0]).unwrap();
        assert_eq!(chain.num_links(), 3);
        assert_eq!(chain.max_reach_mm(), 430.0);

        assert_eq!(
            LinkChain::new(vec![100.0]),
            Err(KinError::InvalidLinkCount(1))
        );
        assert_eq!(
            LinkChain::new(vec![1.0, 2.0, 3.0, 4.0]),
            Err(KinError::InvalidLinkCount(4))
        );
        assert_eq!(
            LinkChain::new(vec![100.0, 0.0]),
            Err(KinError::InvalidLinkLength {
                index: 1,
                length_mm: 0.0
            })
        );
        assert!(LinkChain::new(vec![-5.0, 10.0]).is_err());
        assert!(LinkChain::new(vec![f64::NAN, 10.0]).is_err());
    }

    #[test]
    fn test_chain_deserialise_validates() {
        let chain: LinkChain = serde_json::from_str("[100.0, 60.0]").unwrap();
        assert_eq!(chain.lengths_mm(), &[100.0, 60.0]);

        assert!(serde_json::from_str::<LinkChain>("[100.0, -60.0]").is_err());
        assert!(serde_json::from_str::<LinkChain>("[100.0]").is_err());
    }

    #[test]
    fn test_check_angles() {
        let chain = LinkChain::new(vec![100.0, 60.0]).unwrap();
        assert!(chain.check_angles(&vec![0.0, 0.0].into()).is_ok());
        assert_eq!(
            chain.check_angles(&vec![0.0, 0.0, 0.0].into()),
            Err(KinError::AngleCountMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_normalised() {
        let angles = JointAngles::new(vec![190.0, -180.0, 45.0]).normalised();
        assert_eq!(angles.as_slice(), &[-170.0, 180.0, 45.0]);
    }
}
