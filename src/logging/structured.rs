//! Structured logging utilities.
//!
//! Provides context-aware logging with the run id and current result
//! file included in every log message.

use std::fmt;

/// Logging context for a merge run.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
    pub file: Option<String>,
}

impl LogContext {
    pub fn new(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            file: None,
        }
    }

    pub fn with_file(&self, file: &str) -> Self {
        Self {
            run_id: self.run_id.clone(),
            file: Some(file.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "[run={}] [file={}]", self.run_id, file),
            None => write!(f, "[run={}]", self.run_id),
        }
    }
}
