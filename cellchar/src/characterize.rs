//! The characterization run.
//!
//! Cells are characterized one at a time, in file-name order. For each cell
//! the structural checker runs first, then the layout is read and its ports
//! are classified, then the extracted circuit is simulated once per pairing
//! for the capacitance fit and once per pairing and load for the delay sweep.
//!
//! Any [`Err`] aborts the run. Measurement failures are recorded as warnings
//! and only drop the affected pairings.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempdir::TempDir;

use crate::cell::Cell;
use crate::config::CharParams;
use crate::deps::arcstr::{self, ArcStr};
use crate::diagnostics::{Diagnostics, Verdict};
use crate::error::{with_err_context, ErrorContext, ErrorSource, Result};
use crate::family::Family;
use crate::geometry::{extract_geometry, Layout};
use crate::io::{create_dir_all, layout_files, read_to_string, LAYOUT_EXTENSION};
use crate::library::Library;
use crate::log::Log;
use crate::measure::report::{Measured, MeasurementReport};
use crate::measure::{average_capacitance, average_delay, fitted_capacitance, sweep, DelayFigures};
use crate::netlist::ExtractedCircuit;
use crate::port::{Port, PropagationDelay};
use crate::testbench::{synthesize, DeckArtifact, Mode, Pairing};
use crate::verification::check::{CheckInput, StructuralChecker};
use crate::verification::extract::{ExtractInput, ExtractOutput, Extractor};
use crate::verification::simulation::{SimInput, SimOutput, Simulator};

/// Tools and parameters of a characterization run.
pub struct CharacterizerConfig {
    pub checker: Option<Arc<dyn StructuralChecker>>,
    pub extractor: Option<Arc<dyn Extractor>>,
    pub simulator: Option<Arc<dyn Simulator>>,
    pub params: CharParams,
    /// Directory to create per-cell scratch directories in.
    ///
    /// Defaults to the system temporary directory.
    pub work_dir: Option<PathBuf>,
}

#[derive(Default)]
pub struct CharacterizerConfigBuilder {
    pub checker: Option<Arc<dyn StructuralChecker>>,
    pub extractor: Option<Arc<dyn Extractor>>,
    pub simulator: Option<Arc<dyn Simulator>>,
    pub params: Option<CharParams>,
    pub work_dir: Option<PathBuf>,
}

impl CharacterizerConfig {
    #[inline]
    pub fn builder() -> CharacterizerConfigBuilder {
        CharacterizerConfigBuilder::default()
    }
}

impl CharacterizerConfigBuilder {
    pub fn checker<T>(&mut self, checker: T) -> &mut Self
    where
        T: StructuralChecker + 'static,
    {
        self.checker = Some(Arc::new(checker));
        self
    }

    pub fn extractor<T>(&mut self, extractor: T) -> &mut Self
    where
        T: Extractor + 'static,
    {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    pub fn simulator<T>(&mut self, simulator: T) -> &mut Self
    where
        T: Simulator + 'static,
    {
        self.simulator = Some(Arc::new(simulator));
        self
    }

    pub fn params(&mut self, params: CharParams) -> &mut Self {
        self.params = Some(params);
        self
    }

    pub fn work_dir<P>(&mut self, path: P) -> &mut Self
    where
        P: Into<PathBuf>,
    {
        self.work_dir = Some(path.into());
        self
    }

    pub fn build(&self) -> CharacterizerConfig {
        CharacterizerConfig {
            checker: self.checker.clone(),
            extractor: self.extractor.clone(),
            simulator: self.simulator.clone(),
            params: self.params.clone().unwrap_or_default(),
            work_dir: self.work_dir.clone(),
        }
    }
}

/// The outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub library: Library,
    pub verdict: Verdict,
}

/// Drives the external tools over a directory of cell layouts.
pub struct Characterizer {
    cfg: CharacterizerConfig,
}

/// Everything a deck of one cell is synthesized from.
struct CellCtx<'a> {
    name: &'a ArcStr,
    scratch: &'a Path,
    circuit: &'a ExtractedCircuit,
    ports: &'a [Port],
}

impl Characterizer {
    pub fn new(cfg: CharacterizerConfig) -> Result<Self> {
        cfg.params.validate()?;
        Ok(Self { cfg })
    }

    #[inline]
    pub fn params(&self) -> &CharParams {
        &self.cfg.params
    }

    /// Characterizes every cell in `layout_dir`, owning the diagnostics
    /// lifecycle.
    ///
    /// Diagnostics are opened according to the configured options and closed
    /// before returning, whether or not the run succeeds. If `report` is
    /// given, the library is written there as JSON once every cell has been
    /// characterized.
    pub fn characterize(
        &self,
        layout_dir: impl AsRef<Path>,
        report: Option<&Path>,
    ) -> Result<Outcome> {
        let mut diags = Diagnostics::open(self.cfg.params.diagnostics.clone())?;

        let result = self.run(layout_dir, &mut diags).and_then(|library| {
            if let Some(path) = report {
                library.write_report(path)?;
            }
            Ok(library)
        });
        let library = match result {
            Ok(library) => library,
            Err(e) => {
                // The run error takes precedence over a close error.
                let _ = diags.close();
                return Err(e);
            }
        };

        let verdict = diags.close()?;
        Ok(Outcome { library, verdict })
    }

    /// Characterizes every cell in `layout_dir`.
    ///
    /// A fatal error is recorded in `diags` before it is returned.
    pub fn run(&self, layout_dir: impl AsRef<Path>, diags: &mut Diagnostics) -> Result<Library> {
        let result = self.run_inner(layout_dir.as_ref(), diags);
        if let Err(e) = &result {
            diags.error(e.to_string());
        }
        result
    }

    fn run_inner(&self, layout_dir: &Path, diags: &mut Diagnostics) -> Result<Library> {
        let mut cells = Vec::new();
        for path in layout_files(layout_dir)? {
            let name = match path.file_stem().and_then(|s| s.to_str()) {
                Some(name) => name,
                None => {
                    return Err(ErrorSource::InvalidArgs(format!(
                        "layout file name {path:?} is not valid UTF-8"
                    ))
                    .into())
                }
            };
            diags.info(format!("Characterizing cell {name}"));
            cells.push(self.characterize_cell(name, layout_dir, diags)?);
        }

        let library = Library::new(cells, diags);
        library.log();
        Ok(library)
    }

    /// Characterizes the cell `name`, whose layout is in `layout_dir`.
    pub fn characterize_cell(
        &self,
        name: &str,
        layout_dir: impl AsRef<Path>,
        diags: &mut Diagnostics,
    ) -> Result<Cell> {
        let name = ArcStr::from(name);
        with_err_context(
            self.characterize_cell_inner(&name, layout_dir.as_ref(), diags),
            || ErrorContext::CharacterizeCell(name.clone()),
        )
    }

    fn characterize_cell_inner(
        &self,
        name: &ArcStr,
        layout_dir: &Path,
        diags: &mut Diagnostics,
    ) -> Result<Cell> {
        let family = Family::from_cell_name(name)?;
        let scratch = self.scratch_dir(name)?;

        self.check(name, layout_dir, scratch.path(), diags)?;

        let layout_path = layout_dir.join(format!("{name}.{LAYOUT_EXTENSION}"));
        let layout = with_err_context(Layout::parse(&read_to_string(&layout_path)?), || {
            ErrorContext::ReadFile(layout_path.clone())
        })?;
        let geometry = extract_geometry(
            name,
            family,
            &layout,
            self.cfg.params.geometry(),
            diags,
        )?;

        let circuit = self.extract(name, layout_dir, scratch.path())?;
        let mut ports = geometry.ports;
        for port in ports.iter_mut() {
            let parasitic = circuit.parasitic_capacitance(port.net_name());
            port.set_parasitic_capacitance(parasitic);
        }

        let ctx = CellCtx {
            name,
            scratch: scratch.path(),
            circuit: &circuit,
            ports: &ports,
        };
        let mut results = Vec::new();
        for (i, port) in ports.iter().enumerate().filter(|(_, p)| p.is_input()) {
            let pairings = Pairing::for_input(port, ctx.ports);
            let capacitance = self.fit_capacitance(&ctx, port, &pairings, diags)?;
            let delays = self.sweep_delays(&ctx, port, &pairings, diags)?;
            results.push((i, capacitance, delays));
        }
        for (i, capacitance, delays) in results {
            ports[i].set_capacitance(capacitance);
            ports[i].set_delays(delays);
        }

        let cell = Cell::builder()
            .name(name.clone())
            .family(family)
            .function(family.function(name))
            .dimensions(geometry.dimensions)
            .ports(ports)
            .build()
            .map_err(|e| ErrorSource::Internal(e.to_string()))?;
        Ok(cell)
    }

    fn scratch_dir(&self, name: &str) -> Result<TempDir> {
        let root = self
            .cfg
            .work_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        create_dir_all(&root)?;
        let dir = with_err_context(TempDir::new_in(&root, name), || {
            ErrorContext::CreateDir(root.join(name))
        })?;
        Ok(dir)
    }

    fn check(
        &self,
        name: &ArcStr,
        layout_dir: &Path,
        work_dir: &Path,
        diags: &mut Diagnostics,
    ) -> Result<()> {
        let checker = self
            .cfg
            .checker
            .as_ref()
            .ok_or(ErrorSource::ToolNotSpecified("structural checker"))?;
        let output = with_err_context(
            checker.check(CheckInput {
                cell_name: name.clone(),
                layout_dir: layout_dir.to_path_buf(),
                work_dir: work_dir.to_path_buf(),
            }),
            || ErrorContext::Task(arcstr::format!("running structural check of cell {name}")),
        )?;

        if !output.summary.is_ok() {
            diags.warn(format!("{name} failed cell check. Reason:\n{}", output.log.trim_end()));
        }
        Ok(())
    }

    fn extract(
        &self,
        name: &ArcStr,
        layout_dir: &Path,
        work_dir: &Path,
    ) -> Result<ExtractedCircuit> {
        let extractor = self
            .cfg
            .extractor
            .as_ref()
            .ok_or(ErrorSource::ToolNotSpecified("extractor"))?;
        let output = with_err_context(
            extractor.extract(ExtractInput {
                cell_name: name.clone(),
                layout_dir: layout_dir.to_path_buf(),
                work_dir: work_dir.to_path_buf(),
            }),
            || ErrorContext::ExtractCell(name.clone()),
        )?;

        match output {
            ExtractOutput::Netlist(path) => with_err_context(
                ExtractedCircuit::from_file(name, path),
                || ErrorContext::ExtractCell(name.clone()),
            ),
            ExtractOutput::Failed(reason) => Err(ErrorSource::ExtractionFailure {
                cell: name.clone(),
                reason,
            }
            .into()),
        }
    }

    /// Simulates one deck, returning [`None`] if the simulator produced no
    /// report.
    fn simulate(
        &self,
        ctx: &CellCtx<'_>,
        pairing: &Pairing,
        mode: Mode,
        diags: &mut Diagnostics,
    ) -> Result<Option<MeasurementReport>> {
        let simulator = self
            .cfg
            .simulator
            .as_ref()
            .ok_or(ErrorSource::ToolNotSpecified("simulator"))?;

        let deck = synthesize(ctx.circuit, ctx.ports, pairing, mode, &self.cfg.params)?;
        let artifact = DeckArtifact::create(ctx.scratch, pairing, mode, &deck)?;
        let output = with_err_context(
            simulator.simulate(SimInput {
                deck: artifact.deck().to_path_buf(),
                work_dir: artifact.dir().to_path_buf(),
            }),
            || ErrorContext::Simulate {
                cell: ctx.name.clone(),
                input: pairing.input.clone(),
                output: pairing.output.clone(),
            },
        )?;

        match output {
            SimOutput::Report(text) => Ok(Some(MeasurementReport::parse(&text)?)),
            SimOutput::Failed(reason) => {
                diags.warn(format!(
                    "Simulation of {pairing} in cell {} ({mode}) failed: {reason}",
                    ctx.name
                ));
                Ok(None)
            }
        }
    }

    fn fit_capacitance(
        &self,
        ctx: &CellCtx<'_>,
        input: &Port,
        pairings: &[Pairing],
        diags: &mut Diagnostics,
    ) -> Result<Option<f64>> {
        let mut samples = Vec::with_capacity(pairings.len());
        for pairing in pairings {
            let Some(report) = self.simulate(ctx, pairing, Mode::CapacitanceFit, diags)? else {
                continue;
            };
            match fitted_capacitance(&report) {
                Measured::Value(c) => samples.push(c),
                Measured::Failed => diags.warn(format!(
                    "Capacitance fit of {pairing} in cell {} failed",
                    ctx.name
                )),
            }
        }

        let capacitance = average_capacitance(pairings.len(), &samples);
        if capacitance.is_none() && !pairings.is_empty() {
            diags.warn(format!(
                "No capacitance recorded for input port {} of cell {}",
                input.name(),
                ctx.name
            ));
        }
        Ok(capacitance)
    }

    fn sweep_delays(
        &self,
        ctx: &CellCtx<'_>,
        input: &Port,
        pairings: &[Pairing],
        diags: &mut Diagnostics,
    ) -> Result<Vec<PropagationDelay>> {
        if pairings.is_empty() {
            return Ok(Vec::new());
        }

        let result = sweep(&self.cfg.params.loads, |load| {
            let mode = Mode::DelaySweep { load };
            let mut samples = Vec::with_capacity(pairings.len());
            for pairing in pairings {
                let Some(report) = self.simulate(ctx, pairing, mode, diags)? else {
                    continue;
                };
                match DelayFigures::from_report(&report).rise_fall() {
                    Some(sample) => samples.push(sample),
                    None => diags.warn(format!(
                        "Delay measurement of {pairing} in cell {} at {load} fF failed",
                        ctx.name
                    )),
                }
            }
            Ok(average_delay(load, &samples))
        })?;

        if let Some(load) = result.abandoned_at {
            diags.warn(format!(
                "Every delay measurement of input port {} of cell {} failed at {load} fF; \
                 larger loads were not attempted",
                input.name(),
                ctx.name
            ));
        }
        Ok(result.delays)
    }
}
