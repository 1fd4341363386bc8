//! Main arm executable entry point.
//!
//! # Architecture
//!
//! The executable runs in one of two ways:
//!
//!     - With a subcommand (`fk`, `ik`, `grip`, `offset`) the command is
//!       processed once and the result printed.
//!     - Without a subcommand an interactive shell is started, each line is
//!       parsed as an arm command and processed in turn.
//!
//! In both cases every result is archived in the session directory, unless
//! `--no-session` is given.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{error, info, warn};
use rustyline::{error::ReadlineError, DefaultEditor};
use serde::Serialize;
use std::path::PathBuf;
use structopt::StructOpt;

// Internal
use arm_lib::arm_ctrl::{ArmCtrl, ArmCtrlError, ArmOutput, Params, StatusReport};
use comms_if::tc::arm_ctrl::ArmCmd;
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    params::LoadError,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

const PROMPT: &str = "arm $ ";

/// Name of the parameter file under `$ARM_SW_ROOT/params`.
const PARAMS_FILE: &str = "arm_exec.toml";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Planar arm kinematics and servo command generation.
#[derive(Debug, StructOpt)]
#[structopt(name = "arm_exec")]
struct Opts {
    /// Parameter file to use instead of `$ARM_SW_ROOT/params/arm_exec.toml`.
    #[structopt(long = "params", parse(from_os_str))]
    params: Option<PathBuf>,

    /// Override the angle convention offset from the parameters, in degrees.
    #[structopt(long = "offset", allow_hyphen_values = true)]
    offset_deg: Option<f64>,

    /// Don't start a session, only log to stdout and don't archive results.
    #[structopt(long = "no-session")]
    no_session: bool,

    /// Increase the log level, once for debug and twice for trace.
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: u64,

    /// Command to process, if not given the interactive shell is started.
    #[structopt(subcommand)]
    cmd: Option<ArmCmd>,
}

/// A single archived command and its result.
#[derive(Serialize)]
struct ArchRecord<'a> {
    cmd: &'a ArmCmd,
    output: &'a ArmOutput,
    report: &'a StatusReport,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = if opts.no_session {
        None
    } else {
        Some(
            Session::new("arm_exec", "sessions").wrap_err(
                "Failed to create the session, set ARM_SW_ROOT or pass --no-session",
            )?,
        )
    };

    let log_level = match opts.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    // Initialise logger
    logger_init(log_level, session.as_ref()).wrap_err("Failed to initialise logging")?;

    info!("Arm Kinematics Executable\n");

    if let Some(ref s) = session {
        info!("Session directory: {:?}\n", s.session_root);
    }

    // ---- LOAD PARAMETERS ----

    let mut params = load_params(&opts)?;

    if let Some(offset_deg) = opts.offset_deg {
        info!("Convention offset overridden to {} deg", offset_deg);
        params.angle_offset_deg = offset_deg;
    }

    if let Some(ref s) = session {
        s.save("params.json", &params)
            .wrap_err("Failed to archive the parameters")?;
    }

    // ---- INITIALISE MODULES ----

    let mut arm_ctrl = ArmCtrl::default();
    arm_ctrl
        .init(params, session.as_ref())
        .wrap_err("Failed to initialise ArmCtrl")?;

    info!("ArmCtrl init complete");

    // ---- PROCESS ----

    match opts.cmd {
        Some(ref cmd) => {
            process(&mut arm_ctrl, cmd, session.as_ref())
                .wrap_err("Failed to process the command")?;
        }
        None => run_shell(&mut arm_ctrl, session.as_ref())?,
    }

    Ok(())
}

/// Load the parameters from the file given on the command line, or the
/// default file if none was given.
///
/// Without a software root the built in parameters are used.
fn load_params(opts: &Opts) -> Result<Params, Report> {
    let params: Params = match opts.params {
        Some(ref path) => util::params::load_path(path)
            .wrap_err_with(|| format!("Could not load arm params from {:?}", path))?,
        None => match util::params::load(PARAMS_FILE) {
            Ok(p) => p,
            Err(LoadError::SwRootNotSet) => {
                warn!("ARM_SW_ROOT is not set, using the built in arm params");
                Params::default()
            }
            Err(e) => return Err(e).wrap_err("Could not load arm params"),
        },
    };

    info!(
        "Arm parameters loaded: links {:?} mm, {} servos",
        params.link_lengths_mm.lengths_mm(),
        params.servos.len()
    );

    Ok(params)
}

/// Process one command, print the output and archive it.
fn process(
    arm_ctrl: &mut ArmCtrl,
    cmd: &ArmCmd,
    session: Option<&Session>,
) -> Result<(), ArmCtrlError> {
    let (output, report) = arm_ctrl.proc(cmd)?;

    println!("{}", output);

    if let Some(s) = session {
        let record = ArchRecord {
            cmd,
            output: &output,
            report: &report,
        };

        if let Err(e) = s.save_with_timestamp("arm_ctrl/output.json", &record) {
            warn!("Could not archive the command output: {}", e);
        }
    }

    Ok(())
}

/// Run the interactive shell until the user exits.
fn run_shell(arm_ctrl: &mut ArmCtrl, session: Option<&Session>) -> Result<(), Report> {
    let mut rl = DefaultEditor::new().wrap_err("Failed to start the shell")?;

    let history_path = session.map(|s| s.session_root.join("history.txt"));

    println!("Type \"help\" for the list of commands, \"exit\" to quit");

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(l) => l,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).wrap_err("Failed to read from the shell"),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Rejected history entries are ignored
        let _ = rl.add_history_entry(line);

        match line {
            "exit" | "quit" => break,
            "help" => {
                ArmCmd::clap()
                    .print_long_help()
                    .wrap_err("Failed to print help")?;
                println!();
            }
            _ => match ArmCmd::from_line(line) {
                Ok(cmd) => {
                    if let Err(e) = process(arm_ctrl, &cmd, session) {
                        error!("{}", e);
                    }
                }
                // Includes `--help` on a subcommand
                Err(e) => println!("{}", e),
            },
        }
    }

    if let Some(path) = history_path {
        if let Err(e) = rl.save_history(&path) {
            warn!("Could not save the shell history to {:?}: {}", path, e);
        }
    }

    info!("Exiting shell");

    Ok(())
}
