//! Aggregation of per-pairing measurements into per-port results.
//!
//! Every input port is paired with each output port of its cell. A pairing
//! whose simulation fails is dropped from the aggregate rather than aborting
//! the run.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::port::PropagationDelay;
use crate::units::SiPrefix;

use self::report::{Measured, MeasurementReport};

pub mod report;

/// Name of the converged load parameter in a capacitance-fit report.
pub const CAPACITANCE_MEASURE: &str = "cfit";
/// Input rise to output rise.
pub const RISE_RISE_MEASURE: &str = "trr";
/// Input fall to output rise.
pub const FALL_RISE_MEASURE: &str = "tfr";
/// Input rise to output fall.
pub const RISE_FALL_MEASURE: &str = "trf";
/// Input fall to output fall.
pub const FALL_FALL_MEASURE: &str = "tff";

/// Reads the fitted capacitance of one pairing, in fF.
pub fn fitted_capacitance(report: &MeasurementReport) -> Measured {
    report
        .measured(CAPACITANCE_MEASURE)
        .map(|c| SiPrefix::Femto.scale(c))
}

/// Averages the fitted capacitances of an input port.
///
/// `attempted` is the number of qualifying pairings that were simulated,
/// including those that failed; `samples` holds the values of the ones that
/// succeeded. Returns [`None`] if nothing succeeded.
pub fn average_capacitance(attempted: usize, samples: &[f64]) -> Option<f64> {
    if attempted == 0 || samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / attempted as f64)
}

/// The four crossing delays of one delay-sweep pairing, in ps.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayFigures {
    pub rise_rise: Measured,
    pub fall_rise: Measured,
    pub rise_fall: Measured,
    pub fall_fall: Measured,
}

impl DelayFigures {
    pub fn from_report(report: &MeasurementReport) -> Self {
        let ps = |name: &str| report.measured(name).map(|t| SiPrefix::Pico.scale(t));
        Self {
            rise_rise: ps(RISE_RISE_MEASURE),
            fall_rise: ps(FALL_RISE_MEASURE),
            rise_fall: ps(RISE_FALL_MEASURE),
            fall_fall: ps(FALL_FALL_MEASURE),
        }
    }

    /// The slower of the two transitions ending in an output rise.
    pub fn rise(&self) -> Option<f64> {
        max_of(self.rise_rise, self.fall_rise)
    }

    /// The slower of the two transitions ending in an output fall.
    pub fn fall(&self) -> Option<f64> {
        max_of(self.rise_fall, self.fall_fall)
    }

    /// The (rise, fall) delay of this pairing, or [`None`] if either
    /// direction could not be measured at all.
    pub fn rise_fall(&self) -> Option<(f64, f64)> {
        Some((self.rise()?, self.fall()?))
    }
}

/// The larger of two figures. A failed figure yields to its sibling.
fn max_of(a: Measured, b: Measured) -> Option<f64> {
    match (a.value(), b.value()) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}

/// Averages the (rise, fall) delays of the pairings that succeeded at one
/// load. Returns [`None`] if none did.
pub fn average_delay(load: f64, samples: &[(f64, f64)]) -> Option<PropagationDelay> {
    if samples.is_empty() {
        return None;
    }
    let n = samples.len() as f64;
    let rise = samples.iter().map(|(r, _)| r).sum::<f64>() / n;
    let fall = samples.iter().map(|(_, f)| f).sum::<f64>() / n;
    Some(PropagationDelay::new(load, rise, fall))
}

/// The result of sweeping an input port across the load set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sweep {
    /// One sample per load that produced a result, in sweep order.
    pub delays: Vec<PropagationDelay>,
    /// The load at which the sweep was abandoned, if any.
    pub abandoned_at: Option<f64>,
}

/// Measures each load of `loads` in order using `measure_at`.
///
/// The first load for which `measure_at` yields no sample ends the sweep;
/// larger loads are not attempted.
pub fn sweep<F>(loads: &[f64], mut measure_at: F) -> Result<Sweep>
where
    F: FnMut(f64) -> Result<Option<PropagationDelay>>,
{
    let mut sweep = Sweep::default();
    for &load in loads {
        match measure_at(load)? {
            Some(delay) => sweep.delays.push(delay),
            None => {
                sweep.abandoned_at = Some(load);
                break;
            }
        }
    }
    Ok(sweep)
}
