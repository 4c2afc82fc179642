//! Layout-to-circuit extractor plugin API.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::deps::arcstr::ArcStr;
use crate::error::Result;

/// Inputs passed to an [`Extractor`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExtractInput {
    /// The name of the cell to extract.
    pub cell_name: ArcStr,
    /// The directory containing the layout of the cell.
    pub layout_dir: PathBuf,
    /// The directory to place intermediate and output files.
    pub work_dir: PathBuf,
}

/// An enumeration describing the high-level result of an extraction.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ExtractOutput {
    /// The extracted SPICE netlist was written to the given path.
    Netlist(PathBuf),
    /// Extraction failed with the given reason.
    Failed(String),
}

/// The trait that extractor plugins must implement.
pub trait Extractor {
    /// Extracts a SPICE netlist for one cell.
    fn extract(&self, input: ExtractInput) -> Result<ExtractOutput>;
}
