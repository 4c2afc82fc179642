use std::path::Path;
use std::process::{Command, Output};

use cellchar::error::{with_err_context, ErrorContext, Result};
use cellchar::io::LAYOUT_EXTENSION;
use cellchar::verification::check::{CheckInput, CheckOutput, CheckSummary, StructuralChecker};
use cellchar::verification::extract::{ExtractInput, ExtractOutput, Extractor};
use derive_builder::Builder;


/// Runs `check_magic_leaf_cell` on each cell.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[non_exhaustive]
#[builder(pattern = "owned")]
pub struct MagicCheck {
    #[builder(setter(into), default = "String::from(\"tsmc180\")")]
    pub technology: String,
    #[builder(default = "2")]
    pub metal_layers: u8,
}

impl MagicCheck {
    pub fn builder() -> MagicCheckBuilder {
        MagicCheckBuilder::default()
    }

    pub(crate) fn command(&self, cell_name: &str) -> Command {
        let mut cmd = Command::new("check_magic_leaf_cell");
        cmd.arg("-T")
            .arg(&self.technology)
            .arg("-M")
            .arg(self.metal_layers.to_string())
            .arg(cell_name);
        cmd
    }
}

impl Default for MagicCheck {
    fn default() -> Self {
        Self {
            technology: String::from("tsmc180"),
            metal_layers: 2,
        }
    }
}

/// Extracts a SPICE netlist of each cell with `ext2sp`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct Ext2Sp {}

impl Ext2Sp {
    pub fn new() -> Self {
        Self {}
    }

    pub(crate) fn command(&self, cell_name: &str) -> Command {
        let mut cmd = Command::new("ext2sp");
        cmd.arg(cell_name);
        cmd
    }
}

/// Copies the layout of `cell_name` into `work_dir`, where the Magic scripts
/// expect to find it.
pub(crate) fn stage_layout(cell_name: &str, layout_dir: &Path, work_dir: &Path) -> Result<()> {
    let file_name = format!("{cell_name}.{LAYOUT_EXTENSION}");
    let src = layout_dir.join(&file_name);
    let dst = work_dir.join(&file_name);
    cellchar::io::create_dir_all(work_dir)?;
    with_err_context(std::fs::copy(&src, &dst), || ErrorContext::ReadFile(src.clone()))?;
    Ok(())
}

/// The combined standard output and error of a finished tool.
pub(crate) fn transcript(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

impl StructuralChecker for MagicCheck {
    fn check(&self, input: CheckInput) -> Result<CheckOutput> {
        stage_layout(&input.cell_name, &input.layout_dir, &input.work_dir)?;

        let output = self
            .command(&input.cell_name)
            .current_dir(&input.work_dir)
            .output()?;

        let summary = if output.status.success() {
            CheckSummary::Pass
        } else {
            CheckSummary::Fail
        };

        Ok(CheckOutput {
            summary,
            log: transcript(&output),
        })
    }
}

impl Extractor for Ext2Sp {
    fn extract(&self, input: ExtractInput) -> Result<ExtractOutput> {
        stage_layout(&input.cell_name, &input.layout_dir, &input.work_dir)?;

        let output = self
            .command(&input.cell_name)
            .current_dir(&input.work_dir)
            .output()?;

        if !output.status.success() {
            return Ok(ExtractOutput::Failed(format!(
                "Failed to convert {} cell to spice. Reason:\n{}",
                input.cell_name,
                transcript(&output)
            )));
        }

        let netlist = input.work_dir.join(format!("{}.spice", input.cell_name));
        if !netlist.is_file() {
            return Ok(ExtractOutput::Failed(format!(
                "ext2sp did not produce {netlist:?}"
            )));
        }

        Ok(ExtractOutput::Netlist(netlist))
    }
}
