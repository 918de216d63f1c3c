//! Hop import tool - converts Pentaho Data Integration files to Apache Hop
//!
//! PDI transformations (`.ktr`) and Hop pipelines (`.hpl`) are both XML and
//! largely share their structure. Converting one into the other means:
//! - renaming the elements and attributes that differ between the dialects
//! - moving the database connections embedded in the PDI file into Hop
//!   metadata files, one per connection name
//!
//! Neither converted files nor metadata files are ever overwritten, so a
//! conversion can be re-run over the same folders safely.
//!
//! ```no_run
//! use hop_import::{ConversionEngine, ConversionJob, ConverterConfig};
//! use std::path::Path;
//!
//! let config = ConverterConfig::new();
//! let engine = ConversionEngine::from_config(&config, Path::new("/home/me/hop-config")).unwrap();
//! let errors = engine.process_file(&ConversionJob::new("in/load.ktr", "out/load.hpl"));
//! assert_eq!(errors, 0);
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod convert;
pub mod export;
pub mod import;
pub mod models;
pub mod xml;

// Re-export commonly used types
pub use config::{ConfigError, ConverterConfig};
pub use convert::{
    BatchSummary, ConversionEngine, ConversionError, ConversionJob, DocumentRewriter, FileReport,
    discover_jobs, run_batch,
};
pub use export::{MetadataRenderer, TemplateError};
pub use import::{ConnectionExtractor, ExtractedConnections};
pub use models::{ConnectionDefinition, ConnectionTypeMap, RewriteMap};
pub use xml::{Document, Element, Node, XmlError, parse_document, write_document};
