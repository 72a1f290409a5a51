//! Error-audit output.
//!
//! A flat CSV of tests that did not pass, one `os,test` row each,
//! appended as merges find them. The file is advisory, a quick place
//! for operators to look before the website has the run; nothing in
//! the merge depends on it.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::logging::structured::LogContext;

/// Append-only sink for non-passing tests.
#[derive(Debug, Clone)]
pub struct AuditSink {
    path: PathBuf,
}

impl AuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `os,test` row. IO problems are logged and swallowed;
    /// the audit file is never allowed to sink a merge.
    pub fn append(&self, os_name: &str, test_name: &str, ctx: &LogContext) {
        let row = format!("{},{}\n", csv_field(os_name), csv_field(test_name));
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(row.as_bytes()));

        if let Err(e) = result {
            log::warn!(
                "{} AUDIT_WRITE_FAILED path={} error={}",
                ctx,
                self.path.display(),
                e
            );
        }
    }
}

/// Quote a field only when it needs it.
fn csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
