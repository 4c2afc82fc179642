//! Layout geometry: coordinates, Magic layout records and port extraction.

use std::fmt::Display;
use std::ops::Div;

use serde::{Deserialize, Serialize};

use self::error::LayoutError;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::family::Family;
use crate::port::Port;

pub mod error;

#[cfg(test)]
mod tests;

/// Tolerance used when comparing positions against the grid and cell edges.
pub const GRID_TOLERANCE: f64 = 1e-10;

/// A point in two-dimensional space.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    /// Creates a new [`Coordinate`] from (x,y) coordinates.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Div<f64> for Coordinate {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Returns `true` if `value` is an integer multiple of `pitch`.
pub fn is_on_grid(value: f64, pitch: f64) -> bool {
    let steps = value / pitch;
    (steps - steps.round()).abs() < GRID_TOLERANCE
}

#[inline]
fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < GRID_TOLERANCE
}

/// Cell outline dimensions, in microns.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// A record of a Magic layout file that is relevant to characterization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Record {
    /// A `rect xbot ybot xtop ytop` record.
    Rect { ll: Coordinate, ur: Coordinate },
    /// A `rlabel layer xbot ybot xtop ytop position text` record.
    Label {
        layer: String,
        position: Coordinate,
        name: String,
    },
}

/// The records of one layout file, in file order, in native layout units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    records: Vec<Record>,
}

impl Layout {
    /// Parses the text of a Magic layout file.
    ///
    /// Only `rect` and `rlabel` records are kept.
    pub fn parse(text: &str) -> std::result::Result<Self, LayoutError> {
        let mut records = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let malformed = |kind| LayoutError::MalformedRecord {
                kind,
                line: i + 1,
                record: line.trim().to_string(),
            };
            match tokens.first().copied() {
                Some("rect") => {
                    let coords =
                        parse_coords(tokens.get(1..5)).ok_or_else(|| malformed("rect"))?;
                    records.push(Record::Rect {
                        ll: Coordinate::new(coords[0], coords[1]),
                        ur: Coordinate::new(coords[2], coords[3]),
                    });
                }
                Some("rlabel") => {
                    if tokens.len() < 8 {
                        return Err(malformed("rlabel"));
                    }
                    let coords =
                        parse_coords(tokens.get(2..4)).ok_or_else(|| malformed("rlabel"))?;
                    records.push(Record::Label {
                        layer: tokens[1].to_string(),
                        position: Coordinate::new(coords[0], coords[1]),
                        name: tokens[tokens.len() - 1].to_string(),
                    });
                }
                _ => {}
            }
        }
        Ok(Self { records })
    }

    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterates over the port labels as `(name, position)`, in file order.
    pub fn labels(&self) -> impl Iterator<Item = (&str, Coordinate)> {
        self.records.iter().filter_map(|r| match r {
            Record::Label { name, position, .. } => Some((name.as_str(), *position)),
            _ => None,
        })
    }

    /// The extent of all `rect` records, measured from the origin and
    /// converted to microns with `scale` layout units per micron.
    pub fn dimensions(&self, scale: f64) -> Option<Dimensions> {
        self.records
            .iter()
            .filter_map(|r| match r {
                Record::Rect { ur, .. } => Some(*ur),
                _ => None,
            })
            .reduce(|a, b| Coordinate::new(a.x.max(b.x), a.y.max(b.y)))
            .map(|ur| {
                let ur = ur / scale;
                Dimensions {
                    width: ur.x,
                    height: ur.y,
                }
            })
    }
}

fn parse_coords(tokens: Option<&[&str]>) -> Option<Vec<f64>> {
    tokens?.iter().map(|t| t.parse::<f64>().ok()).collect()
}

/// Parameters of the geometry extractor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeometryParams {
    /// Layout units per micron.
    pub scale: f64,
    /// Horizontal grid pitch, in microns.
    pub grid_pitch: f64,
}

/// The physical view of a cell: its outline and ports.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub dimensions: Dimensions,
    /// Ports sorted by (direction, name).
    pub ports: Vec<Port>,
}

/// Extracts the outline and classified ports of the cell `cell_name`.
///
/// Repeated labels of one port are merged into a single [`Port`]. Grid
/// violations are reported to `diags` as warnings.
pub fn extract_geometry(
    cell_name: &str,
    family: Family,
    layout: &Layout,
    params: GeometryParams,
    diags: &mut Diagnostics,
) -> Result<Geometry> {
    let dimensions = layout
        .dimensions(params.scale)
        .ok_or_else(|| LayoutError::NoGeometry(cell_name.to_string()))?;

    check_width(cell_name, family, dimensions, params.grid_pitch, diags);

    let mut ports: Vec<Port> = Vec::new();
    for (name, position) in layout.labels() {
        let position = position / params.scale;
        check_position(cell_name, name, position, dimensions, params.grid_pitch, diags);
        match ports.iter_mut().find(|p| p.name().as_str() == name) {
            Some(port) => port.add_position(position),
            None => {
                let direction = family.classify(name)?;
                ports.push(Port::new(name, direction, position));
            }
        }
    }

    ports.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    Ok(Geometry { dimensions, ports })
}

/// Warns if a port on the top or bottom cell edge is off the horizontal grid.
pub fn check_position(
    cell_name: &str,
    port_name: &str,
    position: Coordinate,
    dimensions: Dimensions,
    grid_pitch: f64,
    diags: &mut Diagnostics,
) {
    let on_edge = approx_eq(position.y, 0.0) || approx_eq(position.y, dimensions.height);
    if on_edge && !is_on_grid(position.x, grid_pitch) {
        diags.warn(format!(
            "Vertical port {port_name} at {position} in cell {cell_name} is not aligned to {grid_pitch} µm grid"
        ));
    }
}

/// Warns if the cell width is off the horizontal grid.
pub fn check_width(
    cell_name: &str,
    family: Family,
    dimensions: Dimensions,
    grid_pitch: f64,
    diags: &mut Diagnostics,
) {
    if !family.is_boundary() && !is_on_grid(dimensions.width, grid_pitch) {
        diags.warn(format!(
            "Width {} µm of cell {cell_name} is not aligned to {grid_pitch} µm grid",
            dimensions.width
        ));
    }
}
