//! Module interfaces
//!
//! Each processing module of `arm_exec` shall implement the [`State`] trait.
//! Initialisation receives the configuration snapshot the module works with,
//! processing is then called once per command.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// The module's internal state.
pub trait State {
    /// Data required during initialisation
    type InitData;
    /// An error which can occur during initialisation.
    type InitError;

    /// Data required for processing.
    type InputData;
    /// Data produced by processing.
    type OutputData;
    /// A report on the status of the processing.
    type StatusReport;
    /// An error which can occur during processing.
    type ProcError;

    /// Initialise the module.
    ///
    /// # Inputs
    /// - `init_data`: The configuration the module is initialised with.
    /// - `session`: The current session, if one was started.
    ///
    /// # Outputs
    /// - On success `Ok(())`.
    /// - On error an `InitError` instance.
    fn init(&mut self, init_data: Self::InitData, session: Option<&Session>)
        -> Result<(), Self::InitError>;

    /// Main module processing function.
    ///
    /// # Outputs
    /// - On success a tuple of the output data and status report.
    /// - On error a `ProcError` instance, no partial output is produced.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
