//! Host platform utility functions

use std::{env, path::PathBuf};

/// Environment variable pointing at the root of the software checkout.
///
/// Parameter files are read from `$ARM_SW_ROOT/params` and sessions are
/// created under `$ARM_SW_ROOT/sessions`.
pub const SW_ROOT_ENV_VAR: &str = "ARM_SW_ROOT";

/// Get the software root directory from the environment.
pub fn get_arm_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
