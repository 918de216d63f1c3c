//! Export functionality
//!
//! Provides the renderer for Hop connection metadata files.

pub mod metadata;

/// Error while loading or compiling a metadata template
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Template syntax error: {0}")]
    SyntaxError(String),
}

// Re-export for convenience
pub use metadata::{DEFAULT_TEMPLATE, MetadataContext, MetadataRenderer};
