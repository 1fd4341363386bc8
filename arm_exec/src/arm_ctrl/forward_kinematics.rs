//! Arm forward kinematics calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use nalgebra::{Point2, Vector2};

use super::{AngleConvention, JointAngles, KinError, LinkChain, Pose};
use util::maths::wrap_deg_180;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Positions of every joint of the chain, starting with the base at the
/// origin and ending with the end effector.
pub fn joint_positions(
    chain: &LinkChain,
    angles: &JointAngles,
    convention: &AngleConvention,
) -> Result<Vec<Point2<f64>>, KinError> {
    Ok(forward_kinematics_with_joints(chain, angles, convention)?.1)
}

/// Compute the end effector pose for the given joint angles.
///
/// Forward kinematics is defined for any angle, no limits are applied here.
/// The only failure is an angle count that doesn't match the chain.
pub fn forward_kinematics(
    chain: &LinkChain,
    angles: &JointAngles,
    convention: &AngleConvention,
) -> Result<Pose, KinError> {
    Ok(forward_kinematics_with_joints(chain, angles, convention)?.0)
}

/// Compute the end effector pose and the position of every joint in a
/// single walk along the chain.
///
/// Joint `k + 1` is found by stepping along link `k` at the cumulative angle
/// of joints `0..=k`. Only the base angle goes through the convention.
pub fn forward_kinematics_with_joints(
    chain: &LinkChain,
    angles: &JointAngles,
    convention: &AngleConvention,
) -> Result<(Pose, Vec<Point2<f64>>), KinError> {
    chain.check_angles(angles)?;

    let mut positions = Vec::with_capacity(chain.num_links() + 1);
    let mut position = Point2::origin();
    let mut cum_angle_deg: f64 = 0.0;
    positions.push(position);

    for (i, (&angle_deg, length_mm)) in angles.iter().zip(chain.lengths_mm()).enumerate() {
        cum_angle_deg += match i {
            0 => convention.to_math_frame(angle_deg),
            _ => angle_deg,
        };

        let (sin, cos) = cum_angle_deg.to_radians().sin_cos();
        position += Vector2::new(cos, sin) * *length_mm;
        positions.push(position);
    }

    // The last link's direction is the cumulative angle of the whole chain
    let orientation_deg = match chain.num_links() {
        2 => None,
        _ => Some(wrap_deg_180(convention.to_display_frame(cum_angle_deg))),
    };

    let pose = Pose {
        position_mm: position,
        orientation_deg,
    };

    trace!("FK {:?} -> {:?}", angles.as_slice(), pose);

    Ok((pose, positions))
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_fk_straight_three_link() {
        let chain = LinkChain::new(vec![120.0, 210.0, 100.0]).unwrap();
        let pose = forward_kinematics(
            &chain,
            &vec![0.0, 0.0, 0.0].into(),
            &AngleConvention::X_AXIS_ZERO,
        )
        .unwrap();

        assert_abs_diff_eq!(pose.position_mm.x, 430.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pose.position_mm.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pose.orientation_deg.unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fk_vertical_zero() {
        // With the vertical convention a zero pose points straight up
        let chain = LinkChain::new(vec![100.0, 60.0]).unwrap();
        let pose = forward_kinematics(
            &chain,
            &vec![0.0, 0.0].into(),
            &AngleConvention::VERTICAL_ZERO,
        )
        .unwrap();

        assert_abs_diff_eq!(pose.position_mm.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pose.position_mm.y, 160.0, epsilon = 1e-9);
        assert_eq!(pose.orientation_deg, None);
    }

    #[test]
    fn test_fk_elbow_bent() {
        let chain = LinkChain::new(vec![100.0, 60.0]).unwrap();
        let pose = forward_kinematics(
            &chain,
            &vec![0.0, 90.0].into(),
            &AngleConvention::X_AXIS_ZERO,
        )
        .unwrap();

        assert_abs_diff_eq!(pose.position_mm.x, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pose.position_mm.y, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fk_orientation_display_frame() {
        let chain = LinkChain::new(vec![120.0, 210.0, 100.0]).unwrap();
        let pose = forward_kinematics(
            &chain,
            &vec![30.0, -45.0, 60.0].into(),
            &AngleConvention::VERTICAL_ZERO,
        )
        .unwrap();

        assert_abs_diff_eq!(pose.orientation_deg.unwrap(), 45.0, epsilon = 1e-9);

        let pose = forward_kinematics(
            &chain,
            &vec![170.0, 20.0, 0.0].into(),
            &AngleConvention::X_AXIS_ZERO,
        )
        .unwrap();

        assert_abs_diff_eq!(pose.orientation_deg.unwrap(), -170.0, epsilon = 1e-9);
    }

    #[test]
    fn test_joint_positions() {
        let chain = LinkChain::new(vec![100.0, 60.0, 20.0]).unwrap();
        let joints = joint_positions(
            &chain,
            &vec![90.0, -90.0, -90.0].into(),
            &AngleConvention::X_AXIS_ZERO,
        )
        .unwrap();

        assert_eq!(joints.len(), 4);
        assert_eq!(joints[0], Point2::origin());
        assert_abs_diff_eq!(joints[1].x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(joints[1].y, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(joints[2].x, 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(joints[2].y, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(joints[3].x, 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(joints[3].y, 80.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fk_angle_count_mismatch() {
        let chain = LinkChain::new(vec![100.0, 60.0]).unwrap();
        assert!(matches!(
            forward_kinematics(&chain, &vec![0.0].into(), &AngleConvention::default()),
            Err(KinError::AngleCountMismatch { .. })
        ));
    }

    #[test]
    fn test_fk_with_joints_matches_parts() {
        let chain = LinkChain::new(vec![120.0, 210.0, 100.0]).unwrap();
        let angles: JointAngles = vec![-30.0, 45.0, 20.0].into();
        let conv = AngleConvention::VERTICAL_ZERO;

        let (pose, joints) = forward_kinematics_with_joints(&chain, &angles, &conv).unwrap();

        assert_eq!(pose, forward_kinematics(&chain, &angles, &conv).unwrap());
        assert_eq!(joints, joint_positions(&chain, &angles, &conv).unwrap());
        assert_eq!(joints.len(), 4);
        assert_eq!(joints[3], pose.position_mm);
    }
}
