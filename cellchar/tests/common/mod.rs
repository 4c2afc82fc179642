#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use cellchar::characterize::{Characterizer, CharacterizerConfig};
use cellchar::config::CharParams;
use cellchar::error::Result;
use cellchar::verification::check::{CheckInput, CheckOutput, CheckSummary, StructuralChecker};
use cellchar::verification::extract::{ExtractInput, ExtractOutput, Extractor};
use cellchar::verification::simulation::{SimInput, SimOutput, Simulator};
use tempdir::TempDir;

pub mod layouts;

/// Passes every cell except the named ones.
#[derive(Default)]
pub struct FakeChecker {
    pub failing: HashSet<String>,
}

impl StructuralChecker for FakeChecker {
    fn check(&self, input: CheckInput) -> Result<CheckOutput> {
        let summary = if self.failing.contains(input.cell_name.as_str()) {
            CheckSummary::Fail
        } else {
            CheckSummary::Pass
        };
        Ok(CheckOutput {
            summary,
            log: format!("checked {}", input.cell_name),
        })
    }
}

/// Writes a canned netlist for every known cell.
#[derive(Default)]
pub struct FakeExtractor {
    pub netlists: HashMap<String, String>,
}

impl FakeExtractor {
    pub fn with(mut self, cell: &str, netlist: &str) -> Self {
        self.netlists.insert(cell.to_string(), netlist.to_string());
        self
    }
}

impl Extractor for FakeExtractor {
    fn extract(&self, input: ExtractInput) -> Result<ExtractOutput> {
        let Some(netlist) = self.netlists.get(input.cell_name.as_str()) else {
            return Ok(ExtractOutput::Failed(format!(
                "no circuit for {}",
                input.cell_name
            )));
        };
        let path = input.work_dir.join(format!("{}.spice", input.cell_name));
        std::fs::write(&path, netlist)?;
        Ok(ExtractOutput::Netlist(path))
    }
}

/// What a deck asked the simulator to do, recovered from its title line.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckInfo {
    pub cell: String,
    pub input: String,
    pub output: String,
    /// The load of a delay-sweep deck, in fF; [`None`] for a capacitance fit.
    pub load: Option<f64>,
    pub dir: PathBuf,
}

impl DeckInfo {
    fn parse(deck: &Path, text: &str) -> Self {
        let title = text.lines().next().unwrap().trim_start_matches("* ");
        let (mode, rest) = title.split_once(" of ").unwrap();
        let (cell, pairing) = rest.split_once(" for ").unwrap();
        let (input, output) = pairing.split_once(" -> ").unwrap();
        let load = mode
            .strip_prefix("delay sweep at ")
            .map(|load| load.trim_end_matches(" fF").parse().unwrap());
        Self {
            cell: cell.to_string(),
            input: input.to_string(),
            output: output.to_string(),
            load,
            dir: deck.parent().unwrap().to_path_buf(),
        }
    }
}

pub type Script = dyn Fn(&DeckInfo) -> SimOutput + Send + Sync;

/// Answers each deck with the output of a script and records every call.
pub struct ScriptedSimulator {
    script: Box<Script>,
    pub calls: Arc<Mutex<Vec<DeckInfo>>>,
}

impl ScriptedSimulator {
    pub fn new(script: impl Fn(&DeckInfo) -> SimOutput + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Simulator for ScriptedSimulator {
    fn simulate(&self, input: SimInput) -> Result<SimOutput> {
        assert!(input.deck.is_file(), "deck {:?} was not written", input.deck);
        assert!(input.deck.starts_with(&input.work_dir));
        let text = std::fs::read_to_string(&input.deck)?;
        let info = DeckInfo::parse(&input.deck, &text);
        let output = (self.script)(&info);
        self.calls.lock().unwrap().push(info);
        Ok(output)
    }
}

/// A capacitance-fit report, with `c` in fF.
pub fn capfit_report(c: f64) -> SimOutput {
    SimOutput::Report(format!(
        "$DATA1 SOURCE='HSPICE' VERSION='P-2019.06'\n.TITLE '* capacitance fit'\n \
         tdut tref tdiff cfit\n temper alter#\n 1e-11 1e-11 0 {}e-15\n 25.0 1\n",
        c
    ))
}

/// A delay-sweep report, with every figure in ps.
pub fn delay_report(trr: &str, tfr: &str, trf: &str, tff: &str) -> SimOutput {
    let s = |t: &str| match t.parse::<f64>() {
        Ok(ps) => format!("{ps}e-12"),
        Err(_) => t.to_string(),
    };
    SimOutput::Report(format!(
        "trr tfr trf tff temper alter#\n{} {} {} {} 25.0 1\n",
        s(trr),
        s(tfr),
        s(trf),
        s(tff)
    ))
}

/// A report in which every measurement failed.
pub fn failed_report() -> SimOutput {
    SimOutput::Report(
        "trr tfr trf tff cfit temper alter#\nfailed failed failed failed failed 25.0 1\n"
            .to_string(),
    )
}

/// A library of layouts on disk.
pub struct Fixture {
    pub layouts: TempDir,
    pub work: TempDir,
}

impl Fixture {
    pub fn new(cells: &[(&str, &str)]) -> Self {
        let layouts = TempDir::new("cellchar_layouts").unwrap();
        for (name, layout) in cells {
            std::fs::write(layouts.path().join(format!("{name}.mag")), layout).unwrap();
        }
        let work = TempDir::new("cellchar_work").unwrap();
        Self { layouts, work }
    }

    pub fn layout_dir(&self) -> &Path {
        self.layouts.path()
    }

    /// Builds a characterizer around the given fakes, with scratch space
    /// inside this fixture.
    pub fn characterizer(
        &self,
        checker: FakeChecker,
        extractor: FakeExtractor,
        simulator: ScriptedSimulator,
        params: CharParams,
    ) -> Characterizer {
        let cfg = CharacterizerConfig::builder()
            .checker(checker)
            .extractor(extractor)
            .simulator(simulator)
            .params(params)
            .work_dir(self.work.path())
            .build();
        Characterizer::new(cfg).unwrap()
    }

    /// Whether every scratch directory has been removed.
    pub fn scratch_is_empty(&self) -> bool {
        std::fs::read_dir(self.work.path()).unwrap().next().is_none()
    }
}
