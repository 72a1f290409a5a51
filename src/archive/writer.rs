//! Archive output.
//!
//! Writes the combined record set as one JSON array named after the
//! run timestamp, and stamps merged source files so the next run
//! leaves them alone.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::MergeError;
use crate::extract::fields::content_hash;
use crate::logging::structured::LogContext;
use crate::model::record::Record;

/// Trailer appended to a result file once its records are archived.
/// Its presence anywhere in a file marks the file as done.
pub const ARCHIVED_TRAILER: &str = "File in database";

/// Write the combined archive into `dir` as `<stem>.json`.
///
/// An existing file with the same name is overwritten; two merges in
/// the same second produce one archive, the later one. This is the one
/// step of a merge that must not fail quietly, so an IO problem is an
/// error, not a log line.
pub fn write_archive(
    dir: &Path,
    stem: &str,
    records: &[Record],
    ctx: &LogContext,
) -> Result<PathBuf, MergeError> {
    let path = dir.join(format!("{}.json", stem));

    let json = serde_json::to_string_pretty(records).map_err(|e| MergeError::Archive {
        path: path.clone(),
        source: e.into(),
    })?;
    fs::write(&path, &json).map_err(|e| MergeError::Archive {
        path: path.clone(),
        source: e,
    })?;

    log::info!(
        "{} ARCHIVE_WRITTEN path={} records={} sha256={}",
        ctx,
        path.display(),
        records.len(),
        content_hash(&json)
    );

    Ok(path)
}

/// Append the archived trailer to a merged source file.
///
/// Best-effort: the website already refuses duplicate entries, so a
/// file that cannot be stamped only costs a warning next run.
pub fn mark_archived(path: &Path, ctx: &LogContext) {
    let result = OpenOptions::new()
        .append(true)
        .open(path)
        .and_then(|mut file| write!(file, "\n{}", ARCHIVED_TRAILER));

    if let Err(e) = result {
        log::warn!(
            "{} TRAILER_WRITE_FAILED path={} error={}",
            ctx,
            path.display(),
            e
        );
    }
}
