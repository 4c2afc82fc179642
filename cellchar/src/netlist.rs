//! Extracted circuits of cells.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::deps::arcstr::ArcStr;
use crate::error::{with_err_context, ErrorContext, ErrorSource, Result};
use crate::io::read_to_string;
use crate::port::net_name;
use crate::units::{parse_spice_number, SiPrefix};

/// A capacitor card of an extracted netlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parasitic {
    pub net: ArcStr,
    /// Capacitance, in fF.
    pub capacitance: f64,
}

/// The subcircuit the extractor produced for one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedCircuit {
    /// The subcircuit name.
    pub name: ArcStr,
    /// The netlist file defining the subcircuit.
    pub path: PathBuf,
    /// Subcircuit ports, in declaration order.
    pub ports: Vec<ArcStr>,
    /// Capacitor cards in netlist order.
    pub parasitics: Vec<Parasitic>,
}

impl ExtractedCircuit {
    /// Reads the netlist at `path` and locates the subcircuit `cell_name`.
    pub fn from_file(cell_name: &str, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_to_string(path)?;
        with_err_context(Self::from_netlist(cell_name, path, &text), || {
            ErrorContext::ReadFile(path.to_path_buf())
        })
    }

    /// Locates the subcircuit `cell_name` in `text`, the contents of the
    /// netlist at `path`.
    pub fn from_netlist(cell_name: &str, path: impl Into<PathBuf>, text: &str) -> Result<Self> {
        let parsed = subspice::parse(text)?;
        let subckt = parsed.subcircuit_named(cell_name).ok_or_else(|| {
            ErrorSource::ExtractionFailure {
                cell: cell_name.into(),
                reason: "netlist does not define the cell subcircuit".to_string(),
            }
        })?;

        let parasitics = parsed
            .capacitors()
            .filter_map(|cap| {
                let capacitance = parse_spice_number(cap.value)?;
                Some(Parasitic {
                    net: cap.pos.into(),
                    capacitance: SiPrefix::Femto.scale(capacitance),
                })
            })
            .collect();

        Ok(Self {
            name: subckt.name.into(),
            path: path.into(),
            ports: subckt.ports.iter().map(|&p| ArcStr::from(p)).collect(),
            parasitics,
        })
    }

    /// The capacitance of the last capacitor card attached to `net`, in fF.
    ///
    /// Later cards on the same net replace earlier ones. A trailing `!` on
    /// either name is ignored.
    pub fn parasitic_capacitance(&self, net: &str) -> Option<f64> {
        self.parasitics
            .iter()
            .rev()
            .find(|p| net_name(&p.net) == net_name(net))
            .map(|p| p.capacitance)
    }
}
