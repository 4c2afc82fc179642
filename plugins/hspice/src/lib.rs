use std::path::{Path, PathBuf};
use std::process::Command;

pub(crate) use cellchar::error::Result;
use cellchar::error::{with_err_context, ErrorContext};
use cellchar::verification::simulation::{SimInput, SimOutput, Simulator};


/// Extension of the measurement file of the first transient analysis.
pub const MEASUREMENT_EXTENSION: &str = "mt0";

/// Runs HSPICE in batch mode and returns its measurement file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hspice {
    executable: PathBuf,
}

impl Default for Hspice {
    fn default() -> Self {
        Self::new()
    }
}

impl Hspice {
    pub fn new() -> Self {
        Self::with_executable("hspice")
    }

    /// Uses the HSPICE binary at `executable` rather than the one on `PATH`.
    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub(crate) fn command(&self, deck: &Path, output_prefix: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("-i").arg(deck).arg("-o").arg(output_prefix);
        cmd
    }
}

/// The measurement file HSPICE writes for the output prefix `prefix`.
pub(crate) fn measurement_path(prefix: &Path) -> PathBuf {
    prefix.with_extension(MEASUREMENT_EXTENSION)
}

impl Simulator for Hspice {
    fn simulate(&self, input: SimInput) -> Result<SimOutput> {
        cellchar::io::create_dir_all(&input.work_dir)?;
        let stem = input
            .deck
            .file_stem()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("deck"));
        let prefix = input.work_dir.join(stem);

        let output = self
            .command(&input.deck, &prefix)
            .current_dir(&input.work_dir)
            .output()?;

        if !output.status.success() {
            let mut reason = format!("hspice exited with {}", output.status);
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                reason.push_str(":\n");
                reason.push_str(stderr.trim_end());
            }
            return Ok(SimOutput::Failed(reason));
        }

        let path = measurement_path(&prefix);
        if !path.is_file() {
            return Ok(SimOutput::Failed(format!(
                "hspice wrote no measurement file {path:?}"
            )));
        }

        let report = with_err_context(std::fs::read_to_string(&path), || {
            ErrorContext::ReadFile(path.clone())
        })?;
        Ok(SimOutput::Report(report))
    }
}
