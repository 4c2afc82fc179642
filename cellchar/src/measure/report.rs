//! Reader for HSPICE `.mt0` measurement reports.
//!
//! A report looks like this:
//!
//! ```text
//! $DATA1 SOURCE='HSPICE' VERSION='P-2019.06'
//! .TITLE '* delay deck for nand2'
//!  trr              tfr              trf              tff
//!  temper           alter#
//!  4.1127e-11       failed           3.8855e-11       3.9017e-11
//!  25.0000          1
//! ```
//!
//! Column names run up to and including `alter#`, followed by exactly as
//! many values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::parse_spice_number;

/// The column that terminates the header of a report.
pub const LAST_COLUMN: &str = "alter#";
/// The marker HSPICE writes in place of a measurement it could not take.
pub const FAILED_MARKER: &str = "failed";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("report has no `alter#` column")]
    MissingHeader,
    #[error("report lists {columns} columns but only {values} values")]
    Truncated { columns: usize, values: usize },
    #[error("invalid value `{value}` for measurement `{name}`")]
    InvalidValue { name: String, value: String },
}

/// The outcome of one named measurement.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Measured {
    Value(f64),
    Failed,
}

impl Measured {
    #[inline]
    pub fn value(&self) -> Option<f64> {
        match self {
            Measured::Value(v) => Some(*v),
            Measured::Failed => None,
        }
    }

    /// Applies `f` to a successful measurement.
    #[inline]
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Measured::Value(v) => Measured::Value(f(v)),
            Measured::Failed => Measured::Failed,
        }
    }
}

/// The named measurements of one simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementReport {
    measurements: Vec<(String, Measured)>,
}

impl MeasurementReport {
    pub fn parse(text: &str) -> Result<Self, ReportError> {
        let mut tokens = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('$') && !is_title(line))
            .flat_map(str::split_whitespace);

        let mut columns = Vec::new();
        for token in tokens.by_ref() {
            let column = token.to_ascii_lowercase();
            let last = column == LAST_COLUMN;
            columns.push(column);
            if last {
                break;
            }
        }
        if columns.last().map(String::as_str) != Some(LAST_COLUMN) {
            return Err(ReportError::MissingHeader);
        }

        let values: Vec<&str> = tokens.take(columns.len()).collect();
        if values.len() < columns.len() {
            return Err(ReportError::Truncated {
                columns: columns.len(),
                values: values.len(),
            });
        }

        let measurements = columns
            .into_iter()
            .zip(values)
            .map(|(name, value)| -> Result<(String, Measured), ReportError> {
                let measured = if value.eq_ignore_ascii_case(FAILED_MARKER) {
                    Measured::Failed
                } else {
                    parse_spice_number(value)
                        .map(Measured::Value)
                        .ok_or_else(|| ReportError::InvalidValue {
                            name: name.clone(),
                            value: value.to_string(),
                        })?
                };
                Ok((name, measured))
            })
            .collect::<Result<Vec<_>, ReportError>>()?;

        Ok(Self { measurements })
    }

    /// Looks up a measurement by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<Measured> {
        self.measurements
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, m)| *m)
    }

    /// Like [`MeasurementReport::get`], but treats an absent measurement as failed.
    #[inline]
    pub fn measured(&self, name: &str) -> Measured {
        self.get(name).unwrap_or(Measured::Failed)
    }
}

fn is_title(line: &str) -> bool {
    line.get(..6)
        .map_or(false, |s| s.eq_ignore_ascii_case(".title"))
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use super::*;

    const DELAY_REPORT: &str = r#"$DATA1 SOURCE='HSPICE' VERSION='P-2019.06-SP1'
.TITLE '* delay deck for nand2'
 trr              tfr              trf              tff
 temper           alter#
 4.1127e-11       failed           3.8855e-11       3.9017e-11
 25.0000          1
"#;

    #[test]
    fn parses_values_and_failures() {
        let report = MeasurementReport::parse(DELAY_REPORT).unwrap();
        assert_eq!(report.measurements.len(), 6);
        assert_eq!(report.get("ALTER#"), Some(Measured::Value(1.0)));
        assert_float_eq!(
            report.get("trr").unwrap().value().unwrap(),
            4.1127e-11,
            rmax <= 1e-12
        );
        assert_eq!(report.get("TFR"), Some(Measured::Failed));
        assert_eq!(report.get("cfit"), None);
        assert_eq!(report.measured("cfit"), Measured::Failed);
    }

    #[test]
    fn scale_suffixes_are_accepted() {
        let report = MeasurementReport::parse("cfit alter#\n1.25f 1\n").unwrap();
        assert_float_eq!(
            report.get("cfit").unwrap().value().unwrap(),
            1.25e-15,
            rmax <= 1e-12
        );
    }

    #[test]
    fn malformed_reports() {
        assert_eq!(
            MeasurementReport::parse("cfit temper\n1.0 25.0\n"),
            Err(ReportError::MissingHeader)
        );
        assert_eq!(
            MeasurementReport::parse("cfit temper alter#\n1.0 25.0\n"),
            Err(ReportError::Truncated {
                columns: 3,
                values: 2
            })
        );
        assert!(matches!(
            MeasurementReport::parse("cfit alter#\nbogus 1\n"),
            Err(ReportError::InvalidValue { .. })
        ));
    }
}
