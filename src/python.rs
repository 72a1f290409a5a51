//! PyO3 boundary for the Python orchestrator.
//!
//! The suite driver stays in Python; it hands the run layout over as
//! plain strings and gets a summary dict back. Everything stateful
//! lives on the Rust side of this file.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::merge;
use crate::merge::context::{OsTarget, RunConfig};
use crate::status;

/// Initialize the module-level logger
fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_millis()
        .try_init();
}

/// Merge every result file of a finished run into one archive.
///
/// This is the main entry point from Python. It handles:
/// - Hardware (logic regression) result pass-through
/// - Result discovery per OS target
/// - Per-file record extraction and re-keying
/// - Status folds up the chassis hierarchy
/// - Archive write + source stamping
///
/// # Arguments
/// * `targets` - (name, short_name, results_dir) per merged OS
/// * `archive_dir` - Directory the combined archive lands in
/// * `tags` - Free-text run tags, archived in the date record
/// * `hardware_results_dir` - Optional directory of logic-only results
/// * `audit_path` - Optional override for the non-pass audit file
///
/// # Returns
/// Dict with archive_path (None when the run was skipped),
/// files_merged, records, status, and skipped
#[pyfunction]
#[pyo3(signature = (targets, archive_dir, tags, hardware_results_dir=None, audit_path=None))]
fn combine_results(
    py: Python<'_>,
    targets: Vec<(String, String, String)>,
    archive_dir: String,
    tags: String,
    hardware_results_dir: Option<String>,
    audit_path: Option<String>,
) -> PyResult<Py<PyAny>> {
    init_logger();

    let targets = targets
        .into_iter()
        .map(|(name, short_name, results_dir)| OsTarget {
            name,
            short_name,
            results_dir: results_dir.into(),
        })
        .collect();

    let mut config = RunConfig::new(targets, archive_dir, &tags);
    config.hardware_results_dir = hardware_results_dir.map(Into::into);
    if let Some(path) = audit_path {
        config.audit_path = path.into();
    }

    let outcome = merge::combine_results(&config)
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;

    let py_result = PyDict::new(py);
    py_result.set_item(
        "archive_path",
        outcome
            .archive_path
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned()),
    )?;
    py_result.set_item("files_merged", outcome.files_merged)?;
    py_result.set_item("records", outcome.records)?;
    py_result.set_item("status", outcome.status.as_str())?;
    py_result.set_item("skipped", outcome.archive_path.is_none())?;

    Ok(py_result.into())
}

/// Pick the worse of two status texts.
///
/// Returns the canonical text of the worse status. A single
/// unrecognized side loses to the recognized one; two unrecognized
/// sides raise ValueError.
#[pyfunction]
fn worse_status(a: String, b: String) -> PyResult<String> {
    init_logger();

    status::lattice::worse(&a, &b)
        .map(|status| status.as_str().to_string())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Python module definition
#[pymodule]
fn regdb_core(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(combine_results, m)?)?;
    m.add_function(wrap_pyfunction!(worse_status, m)?)?;
    Ok(())
}
