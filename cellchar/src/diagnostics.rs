//! Diagnostics collected over a characterization run.
//!
//! A [`Diagnostics`] sink is an append-only log of [`Entry`]s. Every entry is
//! forwarded to the interactive [`log`](::log) stream and, when the sink was
//! opened with a directory, appended to a per-severity file in that directory.
//! The final [`Verdict`] is computed from the recorded entries.

use std::fmt::Display;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{with_err_context, ErrorContext, Result};
use crate::io::{create_dir_all, open_append};
use crate::log;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Info, Severity::Warning, Severity::Error];

    /// The name of the file entries of this severity are persisted to.
    pub fn file_name(&self) -> &'static str {
        match self {
            Severity::Info => "info.log",
            Severity::Warning => "warning.log",
            Severity::Error => "error.log",
        }
    }

    #[inline]
    fn index(&self) -> usize {
        *self as usize
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        write!(f, "{s}")
    }
}

/// One recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub severity: Severity,
    pub message: String,
    pub timestamp: Option<DateTime<Local>>,
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ts) = self.timestamp {
            write!(f, "[{}] ", ts.format("%Y-%m-%d %H:%M:%S"))?;
        }
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// The pass/fail outcome of a run.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// No warnings or errors were recorded.
    Pass,
    /// At least one warning or error was recorded.
    Fail,
}

impl Verdict {
    #[inline]
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// The process exit code corresponding to this verdict.
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Pass => 0,
            Verdict::Fail => 1,
        }
    }
}

/// Options controlling where and how diagnostics are persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct DiagnosticsOpts {
    /// Directory to write the per-severity log files to.
    ///
    /// If [`None`], entries are only kept in memory and sent to the log stream.
    #[builder(default, setter(strip_option, into))]
    pub dir: Option<PathBuf>,
    /// Whether to timestamp each entry.
    #[builder(default)]
    pub timestamps: bool,
    /// Whether to make the log files read-only when the sink is closed.
    #[builder(default)]
    pub lock_on_close: bool,
}

impl DiagnosticsOpts {
    #[inline]
    pub fn builder() -> DiagnosticsOptsBuilder {
        DiagnosticsOptsBuilder::default()
    }
}

struct Sinks {
    dir: PathBuf,
    files: [File; 3],
}

impl Sinks {
    fn open(dir: &Path) -> Result<Self> {
        create_dir_all(dir)?;
        let [info, warning, error] = Severity::ALL;
        Ok(Self {
            dir: dir.to_path_buf(),
            files: [
                open_append(dir.join(info.file_name()))?,
                open_append(dir.join(warning.file_name()))?,
                open_append(dir.join(error.file_name()))?,
            ],
        })
    }

    fn path(&self, severity: Severity) -> PathBuf {
        self.dir.join(severity.file_name())
    }
}

/// An append-only diagnostic log.
pub struct Diagnostics {
    entries: Vec<Entry>,
    sinks: Option<Sinks>,
    opts: DiagnosticsOpts,
    sink_error: Option<std::io::Error>,
}

impl Diagnostics {
    /// Creates a sink that keeps entries in memory only.
    pub fn in_memory() -> Self {
        Self {
            entries: Vec::new(),
            sinks: None,
            opts: DiagnosticsOpts::default(),
            sink_error: None,
        }
    }

    /// Opens a sink according to `opts`, creating the log directory if needed.
    pub fn open(opts: DiagnosticsOpts) -> Result<Self> {
        let sinks = opts.dir.as_deref().map(Sinks::open).transpose()?;
        Ok(Self {
            entries: Vec::new(),
            sinks,
            opts,
            sink_error: None,
        })
    }

    #[inline]
    pub fn info(&mut self, message: impl Into<String>) {
        self.record(Severity::Info, message.into());
    }

    #[inline]
    pub fn warn(&mut self, message: impl Into<String>) {
        self.record(Severity::Warning, message.into());
    }

    #[inline]
    pub fn error(&mut self, message: impl Into<String>) {
        self.record(Severity::Error, message.into());
    }

    fn record(&mut self, severity: Severity, message: String) {
        match severity {
            Severity::Info => log::info!("{message}"),
            Severity::Warning => log::warn!("{message}"),
            Severity::Error => log::error!("{message}"),
        }

        let entry = Entry {
            severity,
            message,
            timestamp: self.opts.timestamps.then(Local::now),
        };

        if let Some(sinks) = self.sinks.as_mut() {
            if let Err(e) = writeln!(sinks.files[severity.index()], "{entry}") {
                log::error!("failed to persist diagnostic: {e}");
                self.sink_error.get_or_insert(e);
            }
        }

        self.entries.push(entry);
    }

    /// All entries, in the order they were recorded.
    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entries of the given severity, in the order they were recorded.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(move |e| e.severity == severity)
    }

    /// The number of recorded warnings.
    pub fn warning_count(&self) -> usize {
        self.with_severity(Severity::Warning).count()
    }

    /// Computes the verdict of the entries recorded so far.
    pub fn verdict(&self) -> Verdict {
        self.entries.iter().fold(Verdict::Pass, |verdict, entry| {
            if entry.severity >= Severity::Warning {
                Verdict::Fail
            } else {
                verdict
            }
        })
    }

    /// Flushes and closes the sink, returning the final verdict.
    ///
    /// If the sink was opened with `lock_on_close`, the log files are made
    /// read-only.
    pub fn close(mut self) -> Result<Verdict> {
        let verdict = self.verdict();
        if let Some(e) = self.sink_error.take() {
            return Err(e.into());
        }
        if let Some(sinks) = self.sinks.take() {
            for file in sinks.files.iter() {
                file.sync_all()?;
            }
            if self.opts.lock_on_close {
                for severity in Severity::ALL {
                    let path = sinks.path(severity);
                    let mut perms = with_err_context(std::fs::metadata(&path), || {
                        ErrorContext::ReadFile(path.clone())
                    })?
                    .permissions();
                    perms.set_readonly(true);
                    with_err_context(std::fs::set_permissions(&path, perms), || {
                        ErrorContext::CreateFile(path.clone())
                    })?;
                }
            }
        }
        Ok(verdict)
    }
}
