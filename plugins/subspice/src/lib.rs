use error::{Error, Result};
use parser::{CapacitorLine, SpiceLine, SubcktLine};
use serde::Serialize;

pub mod error;
pub mod parser;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedSpice<'a> {
    pub lines: Vec<SpiceLine<'a>>,
}

/// Parse the given SPICE netlist.
pub fn parse<T>(input: &T) -> Result<ParsedSpice<'_>>
where
    T: AsRef<str> + ?Sized,
{
    match parser::parse_spice(input.as_ref()) {
        Ok((_, lines)) => Ok(ParsedSpice { lines }),
        Err(_) => Err(Error::Parse),
    }
}

impl<'a> ParsedSpice<'a> {
    /// Return an iterator over the lines in the parsed SPICE netlist.
    pub fn lines(&self) -> impl Iterator<Item = &SpiceLine> {
        self.lines.iter()
    }

    /// Return an iterator over the subcircuit definitions in the netlist.
    pub fn subcircuits(&self) -> impl Iterator<Item = &SubcktLine> {
        self.lines.iter().filter_map(|line| line.subckt())
    }

    /// Return an iterator over the capacitor cards in the netlist, in file order.
    pub fn capacitors(&self) -> impl Iterator<Item = &CapacitorLine> {
        self.lines.iter().filter_map(|line| line.capacitor())
    }

    /// Return the subcircuit definition with the given name.
    ///
    /// Note that this operation takes `O(N)` time, where `N`
    /// is the number of lines in the parsed netlist.
    pub fn subcircuit_named(&self, name: impl AsRef<str>) -> Option<&SubcktLine> {
        let name = name.as_ref();
        self.subcircuits().find(|ckt| ckt.name == name)
    }
}
