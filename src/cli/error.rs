//! CLI-specific error types

use crate::config::ConfigError;
use crate::convert::ConversionError;
use crate::export::TemplateError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read file {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Failed to write file {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Template error: {0}")]
    TemplateError(#[from] TemplateError),

    #[error("Conversion error: {0}")]
    ConversionError(#[from] ConversionError),

    #[error("XML validation error: {0}")]
    ValidationError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
