//! Cell ports and their electrical measurements.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::deps::arcstr::ArcStr;
use crate::geometry::Coordinate;

/// The direction of a cell port.
///
/// The declaration order is the order ports are sorted in.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub enum Direction {
    Input,
    Output,
    Inout,
    Power,
    NotConnected,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Direction::Input => "Input",
            Direction::Output => "Output",
            Direction::Inout => "Inout",
            Direction::Power => "Power",
            Direction::NotConnected => "Not Connected",
        };
        write!(f, "{s}")
    }
}

/// A propagation delay sample at one load capacitance.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationDelay {
    /// Load capacitance, in fF.
    pub load_capacitance: f64,
    /// Rise delay, in ps.
    pub rise_delay: f64,
    /// Fall delay, in ps.
    pub fall_delay: f64,
    /// Mean of the rise and fall delays, in ps.
    pub average_delay: f64,
}

impl PropagationDelay {
    pub fn new(load_capacitance: f64, rise_delay: f64, fall_delay: f64) -> Self {
        Self {
            load_capacitance,
            rise_delay,
            fall_delay,
            average_delay: (rise_delay + fall_delay) / 2.0,
        }
    }
}

/// A named terminal of a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    name: ArcStr,
    direction: Direction,
    positions: Vec<Coordinate>,
    capacitance: Option<f64>,
    parasitic_capacitance: Option<f64>,
    delays: Vec<PropagationDelay>,
}

impl Port {
    pub fn new(name: impl Into<ArcStr>, direction: Direction, position: Coordinate) -> Self {
        Self {
            name: name.into(),
            direction,
            positions: vec![position],
            capacitance: None,
            parasitic_capacitance: None,
            delays: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The port name as it appears in SPICE netlists, without a trailing `!`.
    #[inline]
    pub fn net_name(&self) -> &str {
        net_name(&self.name)
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Every location the port appears at, in encounter order.
    #[inline]
    pub fn positions(&self) -> &[Coordinate] {
        &self.positions
    }

    /// Effective input capacitance, in fF.
    #[inline]
    pub fn capacitance(&self) -> Option<f64> {
        self.capacitance
    }

    /// Extracted parasitic capacitance, in fF.
    #[inline]
    pub fn parasitic_capacitance(&self) -> Option<f64> {
        self.parasitic_capacitance
    }

    #[inline]
    pub fn delays(&self) -> &[PropagationDelay] {
        &self.delays
    }

    #[inline]
    pub fn is_input(&self) -> bool {
        self.direction == Direction::Input
    }

    #[inline]
    pub fn is_output(&self) -> bool {
        self.direction == Direction::Output
    }

    pub(crate) fn add_position(&mut self, position: Coordinate) {
        self.positions.push(position);
    }

    pub(crate) fn set_capacitance(&mut self, capacitance: Option<f64>) {
        self.capacitance = capacitance;
    }

    pub(crate) fn set_parasitic_capacitance(&mut self, capacitance: Option<f64>) {
        self.parasitic_capacitance = capacitance;
    }

    pub(crate) fn set_delays(&mut self, delays: Vec<PropagationDelay>) {
        self.delays = delays;
    }

    /// The key ports are sorted by.
    #[inline]
    pub(crate) fn sort_key(&self) -> (Direction, &str) {
        (self.direction, &self.name)
    }
}

/// Strips the global-net marker `!` from a layout port name.
#[inline]
pub fn net_name(name: &str) -> &str {
    name.strip_suffix('!').unwrap_or(name)
}
