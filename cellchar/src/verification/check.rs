//! Structural checker plugin API.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::deps::arcstr::ArcStr;
use crate::error::Result;

/// Inputs passed to a [`StructuralChecker`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CheckInput {
    /// The name of the cell to check.
    pub cell_name: ArcStr,
    /// The directory containing the layout of the cell.
    pub layout_dir: PathBuf,
    /// The directory to place intermediate and output files.
    pub work_dir: PathBuf,
}

/// An enumeration describing the high-level result of a structural check.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CheckSummary {
    /// The cell passed.
    Pass,
    /// The cell failed.
    Fail,
}

impl CheckSummary {
    /// Checks if a [`CheckSummary`] describes a passing check.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Outputs emitted by a [`StructuralChecker`].
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CheckOutput {
    /// A summary of the check.
    pub summary: CheckSummary,
    /// Whatever the tool reported, for diagnostics.
    pub log: String,
}

/// The trait that structural checker plugins must implement.
pub trait StructuralChecker {
    /// Runs the checker on one cell.
    ///
    /// Returns [`Err`] only if the tool could not be run at all; a cell that
    /// fails the check yields [`CheckSummary::Fail`].
    fn check(&self, input: CheckInput) -> Result<CheckOutput>;
}
