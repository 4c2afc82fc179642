//! Standard cell families and their port capability tables.
//!
//! Every cell in the library belongs to a [`Family`], named by the cell name
//! with its trailing size/arity digit removed (`nand2` and `nand3` both belong
//! to [`Family::Nand`]). Each family carries a [`PortTable`] that assigns every
//! port the family may expose to exactly one [`Direction`].

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use self::error::ClassifyError;
use crate::port::Direction;

pub mod error;


/// Supply rails shared by every family.
const POWER: &[&str] = &["Vdd!", "GND!"];
/// Row-level signals routed over a cell without touching its logic.
const FEEDTHROUGH: &[&str] = &["ScanReturn", "Scan", "Test", "Clock", "nReset"];
const NONE: &[&str] = &[];

/// Disjoint port name groups for one cell family.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PortTable {
    pub input: &'static [&'static str],
    pub output: &'static [&'static str],
    pub inout: &'static [&'static str],
    pub power: &'static [&'static str],
    pub not_connected: &'static [&'static str],
}

impl PortTable {
    /// Returns each direction paired with the names declared for it.
    pub fn groups(&self) -> [(Direction, &'static [&'static str]); 5] {
        [
            (Direction::Input, self.input),
            (Direction::Output, self.output),
            (Direction::Inout, self.inout),
            (Direction::Power, self.power),
            (Direction::NotConnected, self.not_connected),
        ]
    }

    /// Looks up the direction of the port named `name`.
    pub fn direction(&self, name: &str) -> Option<Direction> {
        self.groups()
            .into_iter()
            .find(|(_, names)| names.contains(&name))
            .map(|(dir, _)| dir)
    }

    /// Iterates over every declared port name.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.groups()
            .into_iter()
            .flat_map(|(_, names)| names.iter().copied())
    }
}

static RDTYPE: PortTable = PortTable {
    input: &["D", "Clock", "nReset"],
    output: &["Q", "nQ"],
    inout: NONE,
    power: POWER,
    not_connected: &["ScanReturn", "Test"],
};

static SMUX: PortTable = PortTable {
    input: &["D", "Load", "Q", "Test", "SDI"],
    output: &["M"],
    inout: NONE,
    power: POWER,
    not_connected: &["ScanReturn", "Clock", "nReset"],
};

static FULL_ADDER: PortTable = PortTable {
    input: &["A", "B", "Cin"],
    output: &["S", "Cout"],
    inout: NONE,
    power: POWER,
    not_connected: FEEDTHROUGH,
};

static HALF_ADDER: PortTable = PortTable {
    input: &["A", "B"],
    output: &["S", "C"],
    inout: NONE,
    power: POWER,
    not_connected: FEEDTHROUGH,
};

static MUX: PortTable = PortTable {
    input: &["I0", "I1", "S"],
    output: &["Y"],
    inout: NONE,
    power: POWER,
    not_connected: FEEDTHROUGH,
};

static LEFT_BUF: PortTable = PortTable {
    input: &["Test", "Clock", "nReset", "nSDO"],
    output: &["TestOut", "ClockOut", "nResetOut", "SDO"],
    inout: NONE,
    power: POWER,
    not_connected: &["SDI"],
};

static RIGHT_END: PortTable = PortTable {
    input: &["Scan"],
    output: &["nScan"],
    inout: NONE,
    power: POWER,
    not_connected: NONE,
};

static TRIS_BUF: PortTable = PortTable {
    input: &["A", "Enable"],
    output: &["Y"],
    inout: NONE,
    power: POWER,
    not_connected: FEEDTHROUGH,
};

static TIE_HIGH: PortTable = PortTable {
    input: NONE,
    output: &["High"],
    inout: NONE,
    power: POWER,
    not_connected: FEEDTHROUGH,
};

static TIE_LOW: PortTable = PortTable {
    input: NONE,
    output: &["Low"],
    inout: NONE,
    power: POWER,
    not_connected: FEEDTHROUGH,
};

static ROW_CROSSER: PortTable = PortTable {
    input: NONE,
    output: NONE,
    inout: &["Low"],
    power: POWER,
    not_connected: FEEDTHROUGH,
};

static SINGLE_INPUT: PortTable = PortTable {
    input: &["A"],
    output: &["Y"],
    inout: NONE,
    power: POWER,
    not_connected: FEEDTHROUGH,
};

static TWO_INPUT: PortTable = PortTable {
    input: &["A", "B"],
    output: &["Y"],
    inout: NONE,
    power: POWER,
    not_connected: FEEDTHROUGH,
};

static NAND: PortTable = PortTable {
    input: &["A", "B", "C", "D"],
    output: &["Y"],
    inout: NONE,
    power: POWER,
    not_connected: FEEDTHROUGH,
};

static NOR: PortTable = PortTable {
    input: &["A", "B", "C"],
    output: &["Y"],
    inout: NONE,
    power: POWER,
    not_connected: FEEDTHROUGH,
};

/// A standard cell family.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Rdtype,
    Smux,
    FullAdder,
    HalfAdder,
    Xor,
    Mux,
    LeftBuf,
    RightEnd,
    TrisBuf,
    TieHigh,
    TieLow,
    RowCrosser,
    Inv,
    Buffer,
    Nand,
    Nor,
    And,
    Or,
}

impl Family {
    pub const ALL: [Family; 18] = [
        Family::Rdtype,
        Family::Smux,
        Family::FullAdder,
        Family::HalfAdder,
        Family::Xor,
        Family::Mux,
        Family::LeftBuf,
        Family::RightEnd,
        Family::TrisBuf,
        Family::TieHigh,
        Family::TieLow,
        Family::RowCrosser,
        Family::Inv,
        Family::Buffer,
        Family::Nand,
        Family::Nor,
        Family::And,
        Family::Or,
    ];

    /// The family stem used in cell names.
    pub fn name(&self) -> &'static str {
        match self {
            Family::Rdtype => "rdtype",
            Family::Smux => "smux",
            Family::FullAdder => "fulladder",
            Family::HalfAdder => "halfadder",
            Family::Xor => "xor",
            Family::Mux => "mux",
            Family::LeftBuf => "leftbuf",
            Family::RightEnd => "rightend",
            Family::TrisBuf => "trisbuf",
            Family::TieHigh => "tiehigh",
            Family::TieLow => "tielow",
            Family::RowCrosser => "rowcrosser",
            Family::Inv => "inv",
            Family::Buffer => "buffer",
            Family::Nand => "nand",
            Family::Nor => "nor",
            Family::And => "and",
            Family::Or => "or",
        }
    }

    /// The port capability table of this family.
    pub fn ports(&self) -> &'static PortTable {
        match self {
            Family::Rdtype => &RDTYPE,
            Family::Smux => &SMUX,
            Family::FullAdder => &FULL_ADDER,
            Family::HalfAdder => &HALF_ADDER,
            Family::Xor | Family::And | Family::Or => &TWO_INPUT,
            Family::Mux => &MUX,
            Family::LeftBuf => &LEFT_BUF,
            Family::RightEnd => &RIGHT_END,
            Family::TrisBuf => &TRIS_BUF,
            Family::TieHigh => &TIE_HIGH,
            Family::TieLow => &TIE_LOW,
            Family::RowCrosser => &ROW_CROSSER,
            Family::Inv | Family::Buffer => &SINGLE_INPUT,
            Family::Nand => &NAND,
            Family::Nor => &NOR,
        }
    }

    /// Resolves the family of the cell named `cell_name`.
    ///
    /// A single trailing digit is stripped first, so `nand2`, `nand3` and
    /// `nand` all resolve to [`Family::Nand`].
    pub fn from_cell_name(cell_name: &str) -> Result<Self, ClassifyError> {
        let (stem, _) = split_variant(cell_name);
        stem.parse()
            .map_err(|_| ClassifyError::UnknownCellFamily(cell_name.to_string()))
    }

    /// Classifies the port named `port` of a cell in this family.
    pub fn classify(&self, port: &str) -> Result<Direction, ClassifyError> {
        self.ports()
            .direction(port)
            .ok_or_else(|| ClassifyError::UnknownPort {
                port: port.to_string(),
                family: *self,
            })
    }

    /// Whether cells of this family terminate a row.
    ///
    /// Boundary cells are exempt from the width grid rule.
    pub fn is_boundary(&self) -> bool {
        matches!(self, Family::RightEnd)
    }

    /// A human-readable description of the function of the cell named `cell_name`.
    pub fn function(&self, cell_name: &str) -> String {
        let (_, variant) = split_variant(cell_name);
        let arity = |kind: &str| match variant {
            Some(n) => format!("{} Input {kind}", number_word(n)),
            None => kind.to_string(),
        };
        match self {
            Family::Rdtype => "Raw D-Type Flip-Flop".to_string(),
            Family::Smux | Family::Mux => arity("Multiplexer"),
            Family::FullAdder => "Full Adder".to_string(),
            Family::HalfAdder => "Half Adder".to_string(),
            Family::Xor => arity("XOR Gate"),
            Family::LeftBuf => "Left End of Row Buffer".to_string(),
            Family::RightEnd => "Right End of Row Cell".to_string(),
            Family::TrisBuf => "Tri-State Buffer".to_string(),
            Family::TieHigh => "Tie High".to_string(),
            Family::TieLow => "Tie Low".to_string(),
            Family::RowCrosser => "Row Crosser".to_string(),
            Family::Inv => "Inverter".to_string(),
            Family::Buffer => "Buffer".to_string(),
            Family::Nand => arity("NAND Gate"),
            Family::Nor => arity("NOR Gate"),
            Family::And => arity("AND Gate"),
            Family::Or => arity("OR Gate"),
        }
    }
}

impl FromStr for Family {
    type Err = ClassifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Family::ALL
            .into_iter()
            .find(|family| family.name() == s)
            .ok_or_else(|| ClassifyError::UnknownCellFamily(s.to_string()))
    }
}

impl Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Splits a cell name into its family stem and optional trailing digit.
fn split_variant(cell_name: &str) -> (&str, Option<u32>) {
    match cell_name.chars().last().and_then(|c| c.to_digit(10)) {
        Some(digit) => (&cell_name[..cell_name.len() - 1], Some(digit)),
        None => (cell_name, None),
    }
}

fn number_word(n: u32) -> String {
    match n {
        0 => "Zero".to_string(),
        1 => "One".to_string(),
        2 => "Two".to_string(),
        3 => "Three".to_string(),
        4 => "Four".to_string(),
        5 => "Five".to_string(),
        6 => "Six".to_string(),
        7 => "Seven".to_string(),
        8 => "Eight".to_string(),
        9 => "Nine".to_string(),
        n => n.to_string(),
    }
}
