//! Run configuration and context.
//!
//! The embedding suite decides what ran; this module carries that as
//! plain typed data, plus the per-run identity (id + timestamp) every
//! log line and the archive filename hang off.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::logging::structured::LogContext;

/// One operating system whose results take part in the merge.
#[derive(Debug, Clone)]
pub struct OsTarget {
    /// Name archived into `os` records and audit rows.
    pub name: String,
    /// Short name, how operators and the result tree refer to the OS.
    pub short_name: String,
    /// Directory holding this OS's result files.
    pub results_dir: PathBuf,
}

/// Configuration for one merge run, assembled by the embedding suite.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// OS targets in run order.
    pub targets: Vec<OsTarget>,
    /// Directory of hardware-only (logic regression) results, if the
    /// run produced any.
    pub hardware_results_dir: Option<PathBuf>,
    /// Where the combined archive lands.
    pub archive_dir: PathBuf,
    /// Free-text run tags, archived in the date record's status field.
    pub tags: String,
    /// Flat audit file for non-passing tests.
    pub audit_path: PathBuf,
}

impl RunConfig {
    pub fn new(targets: Vec<OsTarget>, archive_dir: impl Into<PathBuf>, tags: &str) -> Self {
        Self {
            targets,
            hardware_results_dir: None,
            archive_dir: archive_dir.into(),
            tags: tags.to_string(),
            audit_path: PathBuf::from("errorFile.csv"),
        }
    }
}

/// Identity of one merge run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Local>,
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            run_id: format!("run-{}", &Uuid::new_v4().to_string()[..8]),
            started_at: Local::now(),
        }
    }

    /// Timestamp text archived in the date record.
    pub fn stamp(&self) -> String {
        self.started_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Stem of the archive filename: the stamp with filesystem-safe
    /// separators.
    pub fn archive_stem(&self) -> String {
        self.started_at.format("%Y-%m-%d_%H-%M-%S").to_string()
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.run_id)
    }

    /// Narrow the context to one result file.
    pub fn file_context(&self, file: &str) -> LogContext {
        self.log_context().with_file(file)
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
