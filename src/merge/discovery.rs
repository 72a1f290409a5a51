//! Result-file discovery.
//!
//! Lists the result files of one OS directory, tags the ones a past
//! run already archived, and pulls the chassis token out of each
//! filename. Everything here tolerates an unhappy filesystem: a
//! missing directory or an unreadable file is logged and skipped, the
//! run goes on.

use std::fs;
use std::path::{Path, PathBuf};

use crate::archive::writer::ARCHIVED_TRAILER;
use crate::logging::structured::LogContext;

/// Chassis token used when a filename does not follow the naming
/// scheme. Still merges; the website shows the bucket as-is.
pub const UNKNOWN_CHASSIS: &str = "unknown";

/// One result file found for an OS.
#[derive(Debug, Clone)]
pub struct ResultFile {
    pub path: PathBuf,
    pub file_name: String,
    /// Chassis token from the filename, e.g. `101_5`.
    pub chassis: String,
    /// True when the file carries the archived trailer from a previous
    /// run. Skipped for extraction, still counted as identity.
    pub archived: bool,
}

/// Chassis token embedded in a result filename.
///
/// Result files are named `<os>_test_<token>_result.json`; the token
/// sits between the `test_` marker and the `_result.json` suffix.
pub fn chassis_token(file_name: &str) -> Option<&str> {
    let start = file_name.find("test_")? + 5;
    let end = file_name.find(".json")?.checked_sub(7)?;
    if end <= start {
        return None;
    }
    file_name.get(start..end)
}

/// Scan one OS result directory.
pub fn discover_results(dir: &Path, ctx: &LogContext) -> Vec<ResultFile> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!(
                "{} RESULTS_DIR_MISSING dir={} error={}",
                ctx,
                dir.display(),
                e
            );
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    // Directory order is platform-dependent; sort for a stable merge
    // order.
    names.sort();

    let mut files = Vec::new();
    for file_name in names {
        let path = dir.join(&file_name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!(
                    "{} UNREADABLE_RESULT path={} error={}",
                    ctx,
                    path.display(),
                    e
                );
                continue;
            }
        };

        let archived = content.contains(ARCHIVED_TRAILER);
        let chassis = match chassis_token(&file_name) {
            Some(token) => token.to_string(),
            None => {
                log::error!("{} INVALID_RESULT_NAME file={}", ctx, file_name);
                UNKNOWN_CHASSIS.to_string()
            }
        };

        files.push(ResultFile {
            path,
            file_name,
            chassis,
            archived,
        });
    }

    files
}
