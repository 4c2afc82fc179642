//! Characterized cells.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::deps::arcstr::ArcStr;
use crate::family::Family;
use crate::geometry::Dimensions;
use crate::port::Port;

/// The complete record of one characterized cell.
///
/// Cells are immutable once built. Deserialized cells go through
/// [`CellBuilder`], so they are validated the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
#[serde(try_from = "CellRecord")]
pub struct Cell {
    #[builder(setter(into))]
    name: ArcStr,
    family: Family,
    /// A human-readable description of what the cell does.
    #[builder(setter(into))]
    function: String,
    dimensions: Dimensions,
    /// Ports sorted by (direction, name).
    ports: Vec<Port>,
}

#[derive(Deserialize)]
struct CellRecord {
    name: ArcStr,
    family: Family,
    function: String,
    dimensions: Dimensions,
    ports: Vec<Port>,
}

impl TryFrom<CellRecord> for Cell {
    type Error = CellBuilderError;

    fn try_from(record: CellRecord) -> Result<Self, Self::Error> {
        Cell::builder()
            .name(record.name)
            .family(record.family)
            .function(record.function)
            .dimensions(record.dimensions)
            .ports(record.ports)
            .build()
    }
}

impl CellBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ports) = &self.ports {
            if ports
                .windows(2)
                .any(|w| w[0].sort_key() > w[1].sort_key())
            {
                return Err("ports must be sorted by direction and name".to_string());
            }
        }
        Ok(())
    }
}

impl Cell {
    #[inline]
    pub fn builder() -> CellBuilder {
        CellBuilder::default()
    }

    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    #[inline]
    pub fn family(&self) -> Family {
        self.family
    }

    #[inline]
    pub fn function(&self) -> &str {
        &self.function
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Width, in µm.
    #[inline]
    pub fn width(&self) -> f64 {
        self.dimensions.width
    }

    /// Height, in µm.
    #[inline]
    pub fn height(&self) -> f64 {
        self.dimensions.height
    }

    /// Area, in µm².
    #[inline]
    pub fn area(&self) -> f64 {
        self.dimensions.area()
    }

    #[inline]
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name().as_str() == name)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.is_input())
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.is_output())
    }
}
