//! PDI to Hop conversion
//!
//! Provides the document rewriter, the per-file conversion engine and the
//! batch driver that runs the engine over a folder of transformations.

pub mod batch;
pub mod engine;
pub mod rewriter;

use std::path::{Path, PathBuf};

pub use batch::{BatchSummary, discover_jobs, output_path_for, run_batch};
pub use engine::ConversionEngine;
pub use rewriter::DocumentRewriter;

/// Error while converting a single file.
///
/// Every variant counts as one error for the file it occurred in. None of them
/// stop the batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("Failed to read file {0}: {1}")]
    ReadError(PathBuf, String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Connection without a name")]
    MissingConnectionName,
    #[error("Connection name cannot be used as a file name: {0}")]
    InvalidConnectionName(String),
    #[error("Unknown type '{type_id}' for connection '{connection}'")]
    UnresolvedConnectionType { connection: String, type_id: String },
    #[error("Failed to render metadata for connection '{connection}': {message}")]
    RenderError { connection: String, message: String },
    #[error("Failed to write file {0}: {1}")]
    WriteError(PathBuf, String),
}

/// One input file and the path its converted output goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl ConversionJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// File name of the input, for log messages.
    pub fn name(&self) -> String {
        self.input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.display().to_string())
    }
}

/// Outcome of converting one file.
#[derive(Debug, Default)]
#[must_use = "file reports carry the error count of the conversion"]
pub struct FileReport {
    /// Errors encountered, in the order they happened
    pub errors: Vec<ConversionError>,
    /// Files created by this run (metadata files, then the output)
    pub written: Vec<PathBuf>,
    /// Targets that already existed and were left untouched
    pub skipped: Vec<PathBuf>,
    /// Connection names that appeared more than once; the first definition was used
    pub duplicates: Vec<String>,
}

impl FileReport {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn record_write(&mut self, path: &Path, created: bool) {
        if created {
            self.written.push(path.to_path_buf());
        } else {
            self.skipped.push(path.to_path_buf());
        }
    }
}
