//! Implementations for the ArmCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::fmt;

// Internal
use super::{
    forward_kinematics_with_joints, inverse_kinematics, AngleConvention, ArmCtrlError,
    IkSolutions, JointAngles, Params, Pose,
};
use crate::servo_ctrl::{GripperMap, ServoMap};
use comms_if::{eqpt::servo::ServoCommand, tc::arm_ctrl::ArmCmd};
use util::{module::State, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Arm control module state
#[derive(Default)]
pub struct ArmCtrl {
    pub(crate) params: Params,

    pub(crate) convention: AngleConvention,

    pub(crate) servo_map: Option<ServoMap>,

    pub(crate) gripper_map: Option<GripperMap>,

    pub(crate) report: StatusReport,
}

/// Status report for ArmCtrl processing.
#[derive(Clone, Default, Serialize, Deserialize, Debug, PartialEq)]
pub struct StatusReport {
    /// One flag per joint, `true` if the joint's angle was outside its servo
    /// limits and the demanded pulse has been clamped.
    pub servo_limited: Vec<bool>,
}

/// Result of a forward kinematics command, or of running an inverse solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForwardOutput {
    pub angles_deg: JointAngles,

    pub pose: Pose,

    /// Base, elbow(s) and end effector.
    ///
    /// Units: millimeters
    pub joint_positions_mm: Vec<Point2<f64>>,

    pub command: ServoCommand,
}

/// Output of ArmCtrl processing, one variant per command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArmOutput {
    Forward(ForwardOutput),

    Inverse {
        target: Pose,

        solutions: IkSolutions,

        /// The solution chosen to run and its index, if one was requested.
        run: Option<(usize, ForwardOutput)>,
    },

    Gripper {
        pulse_us: f64,

        opening_mm: f64,
    },

    OffsetChanged {
        offset_deg: f64,
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for ArmCtrl {
    type InitData = Params;
    type InitError = ArmCtrlError;

    type InputData = ArmCmd;
    type OutputData = ArmOutput;
    type StatusReport = StatusReport;
    type ProcError = ArmCtrlError;

    /// Initialise the ArmCtrl module.
    ///
    /// The parameters are validated and the servo and gripper maps built from
    /// them, nothing is modified if they are invalid.
    fn init(
        &mut self,
        init_data: Self::InitData,
        _session: Option<&Session>,
    ) -> Result<(), Self::InitError> {
        let (servo_map, gripper_map) = init_data.validate()?;

        info!(
            "ArmCtrl initialised with {} links {:?} mm, convention offset {} deg",
            init_data.link_lengths_mm.num_links(),
            init_data.link_lengths_mm.lengths_mm(),
            init_data.angle_offset_deg
        );

        self.convention = init_data.convention();
        self.servo_map = Some(servo_map);
        self.gripper_map = Some(gripper_map);
        self.params = init_data;

        Ok(())
    }

    /// Process a single arm command.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        debug!("New ArmCtrl ArmCmd::{:?}", input_data);

        let output = match input_data {
            ArmCmd::ForwardKinematics { angles_deg } => {
                ArmOutput::Forward(self.calc_forward(JointAngles::new(angles_deg.clone()))?)
            }
            ArmCmd::InverseKinematics {
                px_mm,
                py_mm,
                phi_deg,
                run,
            } => {
                let target = match phi_deg {
                    Some(phi_deg) => Pose::with_orientation(*px_mm, *py_mm, *phi_deg),
                    None => Pose::new(*px_mm, *py_mm),
                };

                self.calc_inverse(target, *run)?
            }
            ArmCmd::Gripper { pulse_us } => {
                let gripper_map = self
                    .gripper_map
                    .as_ref()
                    .ok_or(ArmCtrlError::NotInitialised)?;

                ArmOutput::Gripper {
                    pulse_us: *pulse_us,
                    opening_mm: gripper_map.opening_mm(*pulse_us),
                }
            }
            ArmCmd::SetOffset { offset_deg } => {
                self.convention = AngleConvention::new(*offset_deg);

                info!("Angle convention offset set to {} deg", offset_deg);

                ArmOutput::OffsetChanged {
                    offset_deg: *offset_deg,
                }
            }
        };

        Ok((output, self.report.clone()))
    }
}

impl ArmCtrl {
    /// The parameters the module was initialised with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The convention currently applied to commands.
    pub fn convention(&self) -> AngleConvention {
        self.convention
    }

    /// Pose, joint positions and servo command for a set of joint angles.
    fn calc_forward(&mut self, angles_deg: JointAngles) -> Result<ForwardOutput, ArmCtrlError> {
        let servo_map = self
            .servo_map
            .as_ref()
            .ok_or(ArmCtrlError::NotInitialised)?;
        let chain = &self.params.link_lengths_mm;

        let (pose, joint_positions_mm) =
            forward_kinematics_with_joints(chain, &angles_deg, &self.convention)?;

        let (command, limited) = servo_map.command(&angles_deg)?;

        for (i, &clamped) in limited.iter().enumerate() {
            if clamped {
                warn!(
                    "Joint {} angle {:.3} deg is outside its servo limits and has been clamped",
                    i + 1,
                    angles_deg[i]
                );
            }
        }
        self.report.servo_limited = limited;

        Ok(ForwardOutput {
            angles_deg,
            pose,
            joint_positions_mm,
            command,
        })
    }

    /// Both inverse solutions for a target, optionally running one of them.
    fn calc_inverse(&mut self, target: Pose, run: Option<usize>) -> Result<ArmOutput, ArmCtrlError> {
        if self.servo_map.is_none() {
            return Err(ArmCtrlError::NotInitialised);
        }

        let solutions =
            match inverse_kinematics(&self.params.link_lengths_mm, &target, &self.convention) {
                Ok(s) => s,
                Err(e) => {
                    warn!("Target {:?} rejected: {}", target, e);
                    return Err(e.into());
                }
            };

        let run = match run {
            Some(index) => {
                let angles = solutions
                    .get(index)
                    .cloned()
                    .ok_or(ArmCtrlError::InvalidSolutionIndex(index))?;

                Some((index, self.calc_forward(angles)?))
            }
            None => None,
        };

        Ok(ArmOutput::Inverse {
            target,
            solutions,
            run,
        })
    }
}

impl fmt::Display for ForwardOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "angles:  {}", fmt_angles(&self.angles_deg))?;
        writeln!(f, "pose:    {}", fmt_pose(&self.pose))?;

        write!(f, "joints: ")?;
        for p in self.joint_positions_mm.iter() {
            write!(f, " ({:.3}, {:.3})", p.x, p.y)?;
        }
        writeln!(f)?;

        write!(f, "command: {}", self.command)
    }
}

impl fmt::Display for ArmOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArmOutput::Forward(fwd) => write!(f, "{}", fwd),
            ArmOutput::Inverse {
                target,
                solutions,
                run,
            } => {
                writeln!(f, "target:  {}", fmt_pose(target))?;
                writeln!(f, "elbow A: {}", fmt_angles(&solutions.elbow_a))?;
                write!(f, "elbow B: {}", fmt_angles(&solutions.elbow_b))?;

                if let Some((index, fwd)) = run {
                    write!(f, "\n-- running solution {} --\n{}", index, fwd)?;
                }

                Ok(())
            }
            ArmOutput::Gripper {
                pulse_us,
                opening_mm,
            } => write!(f, "gripper: {} us -> {:.2} mm", pulse_us, opening_mm),
            ArmOutput::OffsetChanged { offset_deg } => {
                write!(f, "convention offset: {} deg", offset_deg)
            }
        }
    }
}

fn fmt_angles(angles: &JointAngles) -> String {
    let list: Vec<String> = angles.iter().map(|a| format!("{:.3}", a)).collect();
    format!("[{}] deg", list.join(", "))
}

fn fmt_pose(pose: &Pose) -> String {
    let mut s = format!(
        "x = {:.3} mm, y = {:.3} mm",
        pose.position_mm.x, pose.position_mm.y
    );

    if let Some(phi_deg) = pose.orientation_deg {
        s.push_str(&format!(", phi = {:.3} deg", phi_deg));
    }

    s
}
