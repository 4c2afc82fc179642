//! Circuit simulator plugin API.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Inputs passed to a [`Simulator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimInput {
    /// The synthesized deck to simulate.
    pub deck: PathBuf,
    /// The directory to place simulator output files.
    ///
    /// The directory is removed once the output has been read.
    pub work_dir: PathBuf,
}

/// Outputs emitted by a [`Simulator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimOutput {
    /// The text of the measurement report.
    Report(String),
    /// The simulator ran but produced no report.
    Failed(String),
}

/// The trait that simulator plugins must implement.
pub trait Simulator {
    /// Simulates one deck, blocking until the simulator exits.
    ///
    /// Returns [`Err`] only if the simulator could not be run at all.
    fn simulate(&self, input: SimInput) -> Result<SimOutput>;
}
