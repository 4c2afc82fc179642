//! Libraries of characterized cells.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::diagnostics::Diagnostics;
use crate::error::{with_err_context, ErrorContext, Result};
use crate::geometry::GRID_TOLERANCE;
use crate::io::create_file;
use crate::log::Log;

/// Every characterized cell, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "LibraryRecord")]
pub struct Library {
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct LibraryRecord {
    cells: Vec<Cell>,
}

impl From<LibraryRecord> for Library {
    fn from(record: LibraryRecord) -> Self {
        let mut cells = record.cells;
        sort_by_name(&mut cells);
        Self { cells }
    }
}

fn sort_by_name(cells: &mut [Cell]) {
    cells.sort_by(|a, b| a.name().cmp(b.name()));
}

impl Library {
    /// Assembles a library, warning about every cell whose height differs
    /// from the tallest cell.
    pub fn new(mut cells: Vec<Cell>, diags: &mut Diagnostics) -> Self {
        sort_by_name(&mut cells);
        let library = Self { cells };

        let max_height = library.max_height();
        for cell in library.cells.iter() {
            if (cell.height() - max_height).abs() > GRID_TOLERANCE {
                diags.warn(format!(
                    "Height {} µm of cell {} differs from library height {max_height} µm",
                    cell.height(),
                    cell.name()
                ));
            }
        }

        library
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.cells
            .binary_search_by(|c| c.name().as_str().cmp(name))
            .ok()
            .map(|i| &self.cells[i])
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The height of the tallest cell, in µm, or zero for an empty library.
    pub fn max_height(&self) -> f64 {
        self.cells
            .iter()
            .map(Cell::height)
            .fold(0.0, f64::max)
    }

    /// Writes the library as JSON to `path`.
    pub fn write_report(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = create_file(path)?;
        with_err_context(serde_json::to_writer_pretty(&mut file, self), || {
            ErrorContext::CreateFile(path.to_path_buf())
        })?;
        with_err_context(writeln!(file), || {
            ErrorContext::CreateFile(path.to_path_buf())
        })?;
        Ok(())
    }
}

impl Log for Library {
    fn log(&self) {
        use crate::log::*;

        info!("Characterized {} cells", self.cells.len());
        for cell in self.cells.iter() {
            info!(
                "{} ({}): {:.2} x {:.2} µm, {} inputs, {} outputs",
                cell.name(),
                cell.function(),
                cell.width(),
                cell.height(),
                cell.inputs().count(),
                cell.outputs().count()
            );
            for port in cell.inputs() {
                if let Some(c) = port.capacitance() {
                    info!("  {}: {c:.3} fF", port.name());
                }
                for delay in port.delays() {
                    debug!(
                        "  {} at {} fF: rise {:.1} ps, fall {:.1} ps",
                        port.name(),
                        delay.load_capacitance,
                        delay.rise_delay,
                        delay.fall_delay
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;
    use crate::diagnostics::Severity;
    use crate::family::Family;
    use crate::geometry::Dimensions;

    fn cell(name: &str, height: f64) -> Cell {
        Cell::builder()
            .name(name)
            .family(Family::Inv)
            .function("Inverter")
            .dimensions(Dimensions {
                width: 1.98,
                height,
            })
            .ports(Vec::new())
            .build()
            .unwrap()
    }

    #[test]
    fn deviating_heights_warn_once_each() {
        let mut diags = Diagnostics::in_memory();
        let library = Library::new(
            vec![cell("inv", 10.0), cell("buffer", 10.0), cell("nand2", 12.0)],
            &mut diags,
        );

        assert_eq!(library.max_height(), 12.0);
        assert_eq!(diags.warning_count(), 2);
        let warned: Vec<_> = diags
            .with_severity(Severity::Warning)
            .map(|e| e.message.as_str())
            .collect();
        assert!(warned[0].contains("cell buffer"));
        assert!(warned[1].contains("cell inv"));
    }

    #[test]
    fn cells_are_sorted_by_name() {
        let mut diags = Diagnostics::in_memory();
        let library = Library::new(
            vec![cell("nor2", 10.0), cell("and2", 10.0), cell("inv", 10.0)],
            &mut diags,
        );
        let names: Vec<_> = library.cells().iter().map(|c| c.name().as_str()).collect();
        assert_eq!(names, vec!["and2", "inv", "nor2"]);
        assert!(library.cell("inv").is_some());
        assert!(library.cell("xor2").is_none());
        assert_eq!(diags.warning_count(), 0);
    }

    #[test]
    fn report_round_trips_through_json() {
        let dir = TempDir::new("cellchar_library").unwrap();
        let path = dir.path().join("library.json");
        let library = Library::new(vec![cell("inv", 10.0)], &mut Diagnostics::in_memory());

        library.write_report(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let read: Library = serde_json::from_str(&text).unwrap();
        assert_eq!(read, library);
    }

    #[test]
    fn loaded_reports_are_sorted_by_name() {
        let library = Library::new(
            vec![cell("and2", 10.0), cell("inv", 10.0)],
            &mut Diagnostics::in_memory(),
        );
        let mut value = serde_json::to_value(&library).unwrap();
        value["cells"].as_array_mut().unwrap().reverse();

        let read: Library = serde_json::from_value(value).unwrap();
        assert_eq!(read, library);
        assert!(read.cell("and2").is_some());
    }
}
