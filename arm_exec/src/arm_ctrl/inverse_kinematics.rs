//! Arm inverse kinematics calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, trace};
use nalgebra::{Point2, Vector2};
use serde::Serialize;

// Internal imports
use super::{AngleConvention, JointAngles, KinError, LinkChain, Pose, ReachAnnulus, REACH_TOLERANCE_MM};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The two joint angle solutions reaching one target.
///
/// Both are valid and are always returned in the same order, callers pick one
/// by index (0 = A, 1 = B) or by their own feasibility rules. Angles are in
/// the display frame and wrapped into `(-180, 180]`.
///
/// The elbow angles satisfy `θ2_A = -θ2_B` modulo 360. On the inner edge of
/// the reach annulus both are 180, since -180 wraps onto +180.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IkSolutions {
    /// Configuration A, the `+acos` elbow branch.
    pub elbow_a: JointAngles,

    /// Configuration B, the `-acos` elbow branch.
    pub elbow_b: JointAngles,
}

/// One solution of the 2 link closed form, in the mathematical frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoLinkSolution {
    /// Units: radians
    pub theta_1_rad: f64,

    /// Units: radians
    pub theta_2_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl IkSolutions {
    /// Get a solution by index, 0 for configuration A and 1 for configuration B.
    pub fn get(&self, index: usize) -> Option<&JointAngles> {
        match index {
            0 => Some(&self.elbow_a),
            1 => Some(&self.elbow_b),
            _ => None,
        }
    }

    /// Iterate over the solutions in order A, B.
    pub fn iter(&self) -> impl Iterator<Item = &JointAngles> {
        std::iter::once(&self.elbow_a).chain(std::iter::once(&self.elbow_b))
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Perform the inverse kinematics calculations.
///
/// A 2 link chain is solved in closed form against the target position, any
/// orientation in the target is ignored.
///
/// A 3 link chain is reduced to the 2 link problem by wrist decoupling: the
/// last link is subtracted from the target along the desired orientation to
/// give the wrist point, the first two links are solved against the wrist
/// point and the last joint takes up whatever orientation is left,
/// `θ3 = φ - (θ1 + θ2)`.
///
/// Either both solutions are returned or an error is.
pub fn inverse_kinematics(
    chain: &LinkChain,
    target: &Pose,
    convention: &AngleConvention,
) -> Result<IkSolutions, KinError> {
    let lengths_mm = chain.lengths_mm();
    let (a1_mm, a2_mm) = (lengths_mm[0], lengths_mm[1]);

    trace!("IK target {:?} for chain {:?}", target, lengths_mm);

    let (solutions, phi_math_rad) = match lengths_mm.get(2) {
        None => {
            if target.orientation_deg.is_some() {
                debug!("Ignoring target orientation for a 2 link chain");
            }

            (solve_two_link(a1_mm, a2_mm, &target.position_mm)?, None)
        }
        Some(&a3_mm) => {
            let phi_deg = target
                .orientation_deg
                .ok_or(KinError::MissingOrientation)?;
            let phi_math_rad = convention.to_math_frame(phi_deg).to_radians();

            let (sin, cos) = phi_math_rad.sin_cos();
            let wrist_mm = target.position_mm - Vector2::new(cos, sin) * a3_mm;

            trace!("Wrist point: {:?}", wrist_mm);

            (solve_two_link(a1_mm, a2_mm, &wrist_mm)?, Some(phi_math_rad))
        }
    };

    let to_display = |sol: &TwoLinkSolution| {
        let mut angles_deg = vec![
            convention.to_display_frame(sol.theta_1_rad.to_degrees()),
            sol.theta_2_rad.to_degrees(),
        ];

        if let Some(phi_rad) = phi_math_rad {
            angles_deg.push((phi_rad - (sol.theta_1_rad + sol.theta_2_rad)).to_degrees());
        }

        JointAngles::new(angles_deg).normalised()
    };

    let solutions = IkSolutions {
        elbow_a: to_display(&solutions[0]),
        elbow_b: to_display(&solutions[1]),
    };

    debug!(
        "IK solutions: A = {:?}, B = {:?}",
        solutions.elbow_a.as_slice(),
        solutions.elbow_b.as_slice()
    );

    Ok(solutions)
}

/// Solve a 2 link chain of lengths `a1_mm`, `a2_mm` for a target position.
///
/// The target is first checked against the reach annulus, then the elbow
/// cosine is validated. Returns `[A, B]` where A takes `θ2 = +acos(cos θ2)`
/// and B takes `θ2 = -acos(cos θ2)`, with
/// `θ1 = atan2(py, px) - atan2(a2 sin θ2, a1 + a2 cos θ2)`.
pub fn solve_two_link(
    a1_mm: f64,
    a2_mm: f64,
    target_mm: &Point2<f64>,
) -> Result<[TwoLinkSolution; 2], KinError> {
    let distance_sq = target_mm.coords.norm_squared();

    ReachAnnulus::new(a1_mm, a2_mm).check(distance_sq.sqrt())?;

    let cos_theta_2 =
        validate_elbow_cosine(elbow_cosine(a1_mm, a2_mm, distance_sq), a1_mm, a2_mm)?;

    let target_angle_rad = target_mm.y.atan2(target_mm.x);
    let theta_2_rad = cos_theta_2.acos();

    let solve = |theta_2_rad: f64| {
        let (sin, cos) = theta_2_rad.sin_cos();
        TwoLinkSolution {
            theta_1_rad: target_angle_rad - (a2_mm * sin).atan2(a1_mm + a2_mm * cos),
            theta_2_rad,
        }
    };

    Ok([solve(theta_2_rad), solve(-theta_2_rad)])
}

/// Cosine of the elbow angle for a target at squared distance `distance_sq`,
/// `(r² - a1² - a2²) / (2 a1 a2)`.
pub fn elbow_cosine(a1_mm: f64, a2_mm: f64, distance_sq: f64) -> f64 {
    (distance_sq - a1_mm.powi(2) - a2_mm.powi(2)) / (2.0 * a1_mm * a2_mm)
}

/// How far outside `[-1, 1]` the elbow cosine can be for a target inside the
/// reach annulus tolerance.
///
/// This is the cosine of a target [`REACH_TOLERANCE_MM`] beyond full
/// extension minus one, plus a few ulps of rounding.
pub fn elbow_cosine_tolerance(a1_mm: f64, a2_mm: f64) -> f64 {
    let eps = REACH_TOLERANCE_MM;

    (2.0 * (a1_mm + a2_mm) * eps + eps.powi(2)) / (2.0 * a1_mm * a2_mm) + 4.0 * f64::EPSILON
}

/// Validate an elbow cosine.
///
/// A cosine outside `[-1, 1]` by no more than [`elbow_cosine_tolerance`]
/// comes from a target on the edge of the reach annulus and is snapped onto
/// the boundary. Anything further out (or `NaN`) should have been caught by
/// the reachability check and is reported as [`KinError::InvalidCosine`].
pub fn validate_elbow_cosine(cos_theta_2: f64, a1_mm: f64, a2_mm: f64) -> Result<f64, KinError> {
    let limit = 1.0 + elbow_cosine_tolerance(a1_mm, a2_mm);

    if cos_theta_2.abs() <= limit {
        Ok(cos_theta_2.max(-1.0).min(1.0))
    } else {
        Err(KinError::InvalidCosine { cos_theta_2 })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::arm_ctrl::forward_kinematics;
    use approx::assert_abs_diff_eq;
    use util::maths::wrap_deg_180;

    const ANGLE_TOL_DEG: f64 = 1e-4;

    fn angle_dist_deg(a: f64, b: f64) -> f64 {
        wrap_deg_180(a - b).abs()
    }

    fn contains_solution(solutions: &IkSolutions, expected: &JointAngles) -> bool {
        solutions.iter().any(|sol| {
            sol.iter()
                .zip(expected.iter())
                .all(|(a, b)| angle_dist_deg(*a, *b) < ANGLE_TOL_DEG)
        })
    }

    fn angle_grid() -> Vec<f64> {
        (-3..=3).map(|i| i as f64 * 30.0).collect()
    }

    #[test]
    fn test_known_solution() {
        let chain = LinkChain::new(vec![100.0, 100.0]).unwrap();
        let sols =
            inverse_kinematics(&chain, &Pose::new(100.0, 100.0), &AngleConvention::X_AXIS_ZERO)
                .unwrap();

        assert_abs_diff_eq!(sols.elbow_a[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sols.elbow_a[1], 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sols.elbow_b[0], 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sols.elbow_b[1], -90.0, epsilon = 1e-9);

        // The offset only moves the base joint
        let sols =
            inverse_kinematics(&chain, &Pose::new(100.0, 100.0), &AngleConvention::VERTICAL_ZERO)
                .unwrap();

        assert_abs_diff_eq!(sols.elbow_a[0], -90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sols.elbow_a[1], 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sols.elbow_b[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sols.elbow_b[1], -90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_solution_order() {
        let chain = LinkChain::new(vec![100.0, 60.0]).unwrap();
        let sols =
            inverse_kinematics(&chain, &Pose::new(90.0, 70.0), &AngleConvention::X_AXIS_ZERO)
                .unwrap();

        assert!(sols.elbow_a[1] > 0.0);
        assert!(sols.elbow_b[1] < 0.0);
        assert_eq!(sols.get(0), Some(&sols.elbow_a));
        assert_eq!(sols.get(1), Some(&sols.elbow_b));
        assert_eq!(sols.get(2), None);
        assert_eq!(sols.iter().count(), 2);
    }

    #[test]
    fn test_reach_boundary() {
        // Fully extended
        assert_abs_diff_eq!(elbow_cosine(100.0, 60.0, 160.0_f64.powi(2)), 1.0, epsilon = 1e-12);
        let sols = solve_two_link(100.0, 60.0, &Point2::new(160.0, 0.0)).unwrap();
        assert_abs_diff_eq!(sols[0].theta_2_rad, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(sols[1].theta_2_rad, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(sols[0].theta_1_rad, 0.0, epsilon = 1e-6);

        // Fully folded
        assert!(solve_two_link(100.0, 60.0, &Point2::new(0.0, 40.0000001)).is_ok());

        assert!(matches!(
            solve_two_link(100.0, 60.0, &Point2::new(39.9999, 0.0)),
            Err(KinError::Unreachable { .. })
        ));
        assert!(matches!(
            solve_two_link(100.0, 60.0, &Point2::new(0.0, -160.0001)),
            Err(KinError::Unreachable { .. })
        ));
    }

    #[test]
    fn test_invalid_cosine() {
        assert_eq!(validate_elbow_cosine(0.5, 100.0, 60.0), Ok(0.5));
        assert_eq!(validate_elbow_cosine(1.0 + 1e-12, 100.0, 60.0), Ok(1.0));
        assert_eq!(validate_elbow_cosine(-1.0 - 1e-12, 100.0, 60.0), Ok(-1.0));

        assert_eq!(
            validate_elbow_cosine(1.5, 100.0, 60.0),
            Err(KinError::InvalidCosine { cos_theta_2: 1.5 })
        );
        assert!(matches!(
            validate_elbow_cosine(f64::NAN, 100.0, 60.0),
            Err(KinError::InvalidCosine { .. })
        ));
    }

    #[test]
    fn test_unreachable_not_reported_as_invalid_cosine() {
        let chain = LinkChain::new(vec![100.0, 60.0]).unwrap();
        assert!(matches!(
            inverse_kinematics(&chain, &Pose::new(500.0, 0.0), &AngleConvention::default()),
            Err(KinError::Unreachable { .. })
        ));
        assert!(matches!(
            inverse_kinematics(&chain, &Pose::new(f64::NAN, 0.0), &AngleConvention::default()),
            Err(KinError::Unreachable { .. })
        ));
    }

    #[test]
    fn test_three_link_requires_orientation() {
        let chain = LinkChain::new(vec![120.0, 210.0, 100.0]).unwrap();
        assert_eq!(
            inverse_kinematics(&chain, &Pose::new(200.0, 100.0), &AngleConvention::default()),
            Err(KinError::MissingOrientation)
        );
    }

    #[test]
    fn test_three_link_wrist_unreachable() {
        // End effector is in reach of the whole chain but the wrist point isn't
        let chain = LinkChain::new(vec![120.0, 210.0, 100.0]).unwrap();
        assert!(matches!(
            inverse_kinematics(
                &chain,
                &Pose::with_orientation(400.0, 0.0, 180.0),
                &AngleConvention::X_AXIS_ZERO
            ),
            Err(KinError::Unreachable { .. })
        ));
    }

    #[test]
    fn test_elbow_symmetry() {
        let chain = LinkChain::new(vec![100.0, 60.0]).unwrap();
        let conv = AngleConvention::VERTICAL_ZERO;

        for target in &[
            Pose::new(90.0, 70.0),
            Pose::new(-50.0, 120.0),
            Pose::new(0.0, -45.0),
            Pose::new(150.0, 10.0),
        ] {
            let sols = inverse_kinematics(&chain, target, &conv).unwrap();

            assert_abs_diff_eq!(sols.elbow_a[1], -sols.elbow_b[1], epsilon = 1e-9);

            for sol in sols.iter() {
                let pose = forward_kinematics(&chain, sol, &conv).unwrap();
                assert_abs_diff_eq!(pose.position_mm.x, target.position_mm.x, epsilon = 1e-6);
                assert_abs_diff_eq!(pose.position_mm.y, target.position_mm.y, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_elbow_symmetry_folded() {
        let chain = LinkChain::new(vec![100.0, 60.0]).unwrap();
        let conv = AngleConvention::X_AXIS_ZERO;
        let target = Pose::new(40.0, 0.0);

        let sols = inverse_kinematics(&chain, &target, &conv).unwrap();

        // Both elbows fold back on the first link
        assert_abs_diff_eq!(angle_dist_deg(sols.elbow_a[1], 180.0), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angle_dist_deg(sols.elbow_b[1], 180.0), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            angle_dist_deg(sols.elbow_a[1], -sols.elbow_b[1]),
            0.0,
            epsilon = 1e-9
        );

        for sol in sols.iter() {
            let pose = forward_kinematics(&chain, sol, &conv).unwrap();
            assert_abs_diff_eq!(pose.position_mm.x, 40.0, epsilon = 1e-6);
            assert_abs_diff_eq!(pose.position_mm.y, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_round_trip_two_link() {
        // Long first link, short first link and equal links
        for lengths_mm in &[vec![100.0, 60.0], vec![60.0, 100.0], vec![100.0, 100.0]] {
            let chain = LinkChain::new(lengths_mm.clone()).unwrap();

            for conv in &[AngleConvention::X_AXIS_ZERO, AngleConvention::VERTICAL_ZERO] {
                for &t1 in &angle_grid() {
                    for &t2 in &angle_grid() {
                        let angles = JointAngles::new(vec![t1, t2]);
                        let pose = forward_kinematics(&chain, &angles, conv).unwrap();
                        let sols = inverse_kinematics(&chain, &pose, conv).unwrap();

                        assert!(
                            contains_solution(&sols, &angles),
                            "{:?} not in {:?} (chain {:?}, offset {})",
                            angles,
                            sols,
                            lengths_mm,
                            conv.offset_deg
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_round_trip_three_link() {
        for lengths_mm in &[
            vec![120.0, 210.0, 100.0],
            vec![210.0, 120.0, 100.0],
            vec![150.0, 150.0, 50.0],
        ] {
            let chain = LinkChain::new(lengths_mm.clone()).unwrap();
            round_trip_three_link(&chain);
        }
    }

    fn round_trip_three_link(chain: &LinkChain) {
        for conv in &[AngleConvention::X_AXIS_ZERO, AngleConvention::VERTICAL_ZERO] {
            for &t1 in &angle_grid() {
                for &t2 in &angle_grid() {
                    for &t3 in &angle_grid() {
                        let angles = JointAngles::new(vec![t1, t2, t3]);
                        let pose = forward_kinematics(chain, &angles, conv).unwrap();
                        let sols = inverse_kinematics(chain, &pose, conv).unwrap();

                        assert!(
                            contains_solution(&sols, &angles),
                            "{:?} not in {:?} (chain {:?}, offset {})",
                            angles,
                            sols,
                            chain.lengths_mm(),
                            conv.offset_deg
                        );

                        for sol in sols.iter() {
                            let check = forward_kinematics(chain, sol, conv).unwrap();
                            assert_abs_diff_eq!(
                                angle_dist_deg(
                                    check.orientation_deg.unwrap(),
                                    pose.orientation_deg.unwrap()
                                ),
                                0.0,
                                epsilon = ANGLE_TOL_DEG
                            );
                        }
                    }
                }
            }
        }
    }
}
