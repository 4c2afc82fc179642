//! Simulation decks for characterizing input ports.
//!
//! Every input port is paired with each output port of its cell, except an
//! output sharing the input's name. Each [`Pairing`] yields one deck per
//! [`Mode`]. Decks are rendered from the templates in `templates/` and written
//! to a [`DeckArtifact`], a scratch directory removed when the artifact is
//! dropped.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempdir::TempDir;

use crate::config::CharParams;
use crate::deps::arcstr::ArcStr;
use crate::error::{with_err_context, ErrorContext, Result};
use crate::netlist::ExtractedCircuit;
use crate::port::{net_name, Direction, Port};
use crate::units::{SiPrefix, SiValue};

use self::templates::{
    render_deck, CapFitCtx, DeckCtx, PulseCtx, CAPFIT_TEMPLATE, DELAY_TEMPLATE,
};

pub(crate) mod templates;

pub const SUPPLY_NODE: &str = "vdd";
pub const GROUND_NODE: &str = "0";
pub const INPUT_NODE: &str = "in";
pub const BIAS_NODE: &str = "bias";
pub const OUTPUT_NODE: &str = "out";

/// File name of the deck inside its artifact directory.
pub const DECK_FILE_NAME: &str = "deck.sp";

/// The experiment a deck describes.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mode {
    /// Fit the load that matches the delay into the input port.
    CapacitanceFit,
    /// Measure crossing delays with a fixed load on the output, in fF.
    DelaySweep { load: f64 },
}

impl Mode {
    /// A short tag identifying the mode in artifact names.
    pub fn tag(&self) -> String {
        match self {
            Mode::CapacitanceFit => "capfit".to_string(),
            Mode::DelaySweep { load } => format!("delay_{}", load_literal(*load)),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::CapacitanceFit => write!(f, "capacitance fit"),
            Mode::DelaySweep { load } => write!(f, "delay sweep at {load} fF"),
        }
    }
}

/// One (input port, output port) combination.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Pairing {
    pub input: ArcStr,
    pub output: ArcStr,
}

impl Pairing {
    /// Pairs `input` with every output port in `ports`, in order, except one
    /// with the same name.
    pub fn for_input(input: &Port, ports: &[Port]) -> Vec<Pairing> {
        ports
            .iter()
            .filter(|p| p.is_output() && p.name() != input.name())
            .map(|output| Pairing {
                input: input.name().clone(),
                output: output.name().clone(),
            })
            .collect()
    }
}

impl Display for Pairing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.input, self.output)
    }
}

/// Renders a load capacitance given in fF as a SPICE literal.
pub fn load_literal(load: f64) -> String {
    SiValue::with_precision(load * SiPrefix::Femto.multiplier(), SiPrefix::Atto).to_string()
}

/// The testbench node a subcircuit port connects to.
///
/// A trailing `!` on `net` is ignored, as it is on port names.
pub fn node_for(net: &str, ports: &[Port], pairing: &Pairing) -> String {
    let stem = net_name(net);
    let port = ports.iter().find(|p| p.net_name() == stem);
    match port.map(|p| (p, p.direction())) {
        Some((_, Direction::Power)) if is_ground(stem) => GROUND_NODE.to_string(),
        Some((_, Direction::Power)) => SUPPLY_NODE.to_string(),
        Some((p, Direction::Input)) if *p.name() == pairing.input => INPUT_NODE.to_string(),
        Some((_, Direction::Input)) => BIAS_NODE.to_string(),
        Some((p, Direction::Output)) if *p.name() == pairing.output => OUTPUT_NODE.to_string(),
        _ => format!("float_{net}"),
    }
}

fn is_ground(net: &str) -> bool {
    ["gnd", "vss", "0"]
        .iter()
        .any(|name| net.eq_ignore_ascii_case(name))
}

fn seconds(t: f64) -> String {
    format!("{t:e}")
}

/// Synthesizes the deck for one pairing of `circuit`.
///
/// The result depends only on the arguments.
pub fn synthesize(
    circuit: &ExtractedCircuit,
    ports: &[Port],
    pairing: &Pairing,
    mode: Mode,
    params: &CharParams,
) -> Result<String> {
    let connections = circuit
        .ports
        .iter()
        .map(|net| node_for(net, ports, pairing))
        .collect();

    let (template, capfit, load) = match mode {
        Mode::CapacitanceFit => {
            let cf = &params.capfit;
            let capfit = CapFitCtx {
                initial: load_literal(cf.initial),
                lower: load_literal(cf.lower),
                upper: load_literal(cf.upper),
                resistance: cf.driver_resistance.to_string(),
                iterations: cf.iterations,
            };
            (CAPFIT_TEMPLATE, Some(capfit), None)
        }
        Mode::DelaySweep { load } => (DELAY_TEMPLATE, None, Some(load_literal(load))),
    };

    let ctx = DeckCtx {
        title: format!("{mode} of {} for {pairing}", circuit.name),
        libs: &params.libs,
        includes: &params.includes,
        netlist: &circuit.path,
        subckt: &circuit.name,
        connections,
        temp: params.temp.map(|t| t.to_string()),
        supply: params.supply.to_string(),
        bias: params.bias().to_string(),
        half: (params.supply / 2.0).to_string(),
        pulse: PulseCtx {
            delay: seconds(params.pulse.delay),
            slew: seconds(params.pulse.slew),
            width: seconds(params.pulse.width),
            period: seconds(params.pulse.period),
        },
        step: seconds(params.tran.step),
        stop: seconds(params.tran.stop),
        capfit,
        load,
    };

    render_deck(template, ctx)
}

/// A deck written to its own scratch directory.
///
/// The directory and everything the simulator writes into it are removed
/// when the artifact is dropped.
pub struct DeckArtifact {
    dir: TempDir,
    deck: PathBuf,
}

impl DeckArtifact {
    /// Writes `deck` to a new directory inside `parent`.
    pub fn create(
        parent: impl AsRef<Path>,
        pairing: &Pairing,
        mode: Mode,
        deck: &str,
    ) -> Result<Self> {
        let parent = parent.as_ref();
        let prefix = format!("{}_{}_{}", pairing.input, pairing.output, mode.tag());
        let dir = with_err_context(TempDir::new_in(parent, &prefix), || {
            ErrorContext::CreateDir(parent.join(&prefix))
        })?;
        let path = dir.path().join(DECK_FILE_NAME);
        with_err_context(std::fs::write(&path, deck), || {
            ErrorContext::CreateFile(path.clone())
        })?;
        Ok(Self { dir, deck: path })
    }

    #[inline]
    pub fn deck(&self) -> &Path {
        &self.deck
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests;
