//! Characterization parameters.
//!
//! [`CharParams`] can be built in code or loaded from a TOML file. Every field
//! has a default, so a TOML file only needs to list what it overrides:
//!
//! ```toml
//! supply = 3.3
//! loads = [0.1, 1.0, 10.0]
//!
//! [capfit]
//! upper = 200.0
//! ```

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::diagnostics::DiagnosticsOpts;
use crate::error::{ErrorSource, Result};
use crate::geometry::GeometryParams;
use crate::io::read_to_string;

/// Load capacitances of the delay sweep, in fF.
pub const DEFAULT_LOADS: [f64; 5] = [0.01, 0.1, 1.0, 10.0, 50.0];
/// Layout units per micron.
pub const DEFAULT_LAYOUT_SCALE: f64 = 50.0;
/// Horizontal placement grid pitch, in microns.
pub const DEFAULT_GRID_PITCH: f64 = 0.66;

/// A library of device models to include in every deck.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Lib {
    pub path: PathBuf,
    pub section: String,
}

/// Input stimulus timing. All values in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseParams {
    pub delay: f64,
    /// Rise and fall time.
    pub slew: f64,
    pub width: f64,
    pub period: f64,
}

impl Default for PulseParams {
    fn default() -> Self {
        Self {
            delay: 1e-9,
            slew: 100e-12,
            width: 5e-9,
            period: 10e-9,
        }
    }
}

/// Transient analysis settings. All values in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranParams {
    pub step: f64,
    pub stop: f64,
}

impl Default for TranParams {
    fn default() -> Self {
        Self {
            step: 1e-12,
            stop: 20e-9,
        }
    }
}

/// Capacitance-fit optimizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapFitParams {
    /// Initial guess, in fF.
    pub initial: f64,
    /// Lower bound of the search range, in fF.
    pub lower: f64,
    /// Upper bound of the search range, in fF.
    pub upper: f64,
    /// Resistance of the twin drivers, in ohms.
    pub driver_resistance: f64,
    /// Maximum number of optimizer iterations.
    pub iterations: usize,
}

impl Default for CapFitParams {
    fn default() -> Self {
        Self {
            initial: 1.0,
            lower: 0.01,
            upper: 100.0,
            driver_resistance: 10e3,
            iterations: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(default)]
#[builder(default)]
pub struct CharParams {
    /// Layout units per micron.
    pub layout_scale: f64,
    /// Horizontal placement grid pitch, in microns.
    pub grid_pitch: f64,
    /// Load capacitances of the delay sweep, in fF, in ascending order.
    pub loads: Vec<f64>,
    /// Supply voltage, in volts.
    pub supply: f64,
    /// Voltage that inputs other than the driven one are held at.
    ///
    /// Defaults to the supply voltage.
    #[builder(setter(strip_option))]
    pub bias: Option<f64>,
    pub pulse: PulseParams,
    pub tran: TranParams,
    pub capfit: CapFitParams,
    /// Simulation temperature, in degrees Celsius.
    #[builder(setter(strip_option))]
    pub temp: Option<f64>,
    /// Files to `.include` in every deck.
    pub includes: Vec<PathBuf>,
    /// Model libraries to `.lib` in every deck.
    pub libs: Vec<Lib>,
    pub diagnostics: DiagnosticsOpts,
}

impl Default for CharParams {
    fn default() -> Self {
        Self {
            layout_scale: DEFAULT_LAYOUT_SCALE,
            grid_pitch: DEFAULT_GRID_PITCH,
            loads: DEFAULT_LOADS.to_vec(),
            supply: 1.8,
            bias: None,
            pulse: PulseParams::default(),
            tran: TranParams::default(),
            capfit: CapFitParams::default(),
            temp: None,
            includes: Vec::new(),
            libs: Vec::new(),
            diagnostics: DiagnosticsOpts::default(),
        }
    }
}

impl CharParams {
    #[inline]
    pub fn builder() -> CharParamsBuilder {
        CharParamsBuilder::default()
    }

    /// Reads parameters from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reads parameters from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let params: Self = toml::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    /// The voltage inputs other than the driven one are held at.
    #[inline]
    pub fn bias(&self) -> f64 {
        self.bias.unwrap_or(self.supply)
    }

    #[inline]
    pub fn geometry(&self) -> GeometryParams {
        GeometryParams {
            scale: self.layout_scale,
            grid_pitch: self.grid_pitch,
        }
    }

    /// Checks that the parameters describe a usable run.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| -> Result<()> {
            Err(ErrorSource::InvalidArgs(msg.to_string()).into())
        };
        if !is_positive(self.layout_scale) {
            return invalid("layout scale must be positive");
        }
        if !is_positive(self.grid_pitch) {
            return invalid("grid pitch must be positive");
        }
        if !self.loads.iter().all(|&c| is_positive(c)) {
            return invalid("load capacitances must be positive");
        }
        if self.loads.windows(2).any(|w| w[0] >= w[1]) {
            return invalid("load capacitances must be strictly ascending");
        }
        if !is_positive(self.supply) {
            return invalid("supply voltage must be positive");
        }
        if !self.bias().is_finite() {
            return invalid("bias voltage must be finite");
        }
        let p = &self.pulse;
        if !(p.delay.is_finite() && p.delay >= 0.0)
            || ![p.slew, p.width, p.period].into_iter().all(is_positive)
        {
            return invalid("pulse delay must be non-negative and its other timings positive");
        }
        let cf = &self.capfit;
        if !(is_positive(cf.lower)
            && cf.upper.is_finite()
            && cf.lower <= cf.initial
            && cf.initial <= cf.upper)
        {
            return invalid("capacitance-fit range must satisfy 0 < lower <= initial <= upper");
        }
        if !is_positive(cf.driver_resistance) {
            return invalid("driver resistance must be positive");
        }
        if !is_positive(self.tran.step)
            || !self.tran.stop.is_finite()
            || self.tran.stop <= self.tran.step
        {
            return invalid("transient stop time must exceed a positive step");
        }
        Ok(())
    }
}

/// Whether `x` is a finite, strictly positive number.
fn is_positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}
