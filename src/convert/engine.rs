//! Conversion engine
//!
//! Converts one PDI transformation at a time:
//!
//! 1. parse the input file
//! 2. extract the embedded connections
//! 3. write a metadata file for every connection that does not have one yet
//! 4. rewrite the document
//! 5. write the output file unless it already exists
//!
//! Files are only ever created, never overwritten. Running the same job twice
//! leaves the filesystem as the first run left it.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::config::ConverterConfig;
use crate::convert::{ConversionError, ConversionJob, DocumentRewriter, FileReport};
use crate::export::{MetadataRenderer, TemplateError};
use crate::import::ConnectionExtractor;
use crate::models::{ConnectionTypeMap, RewriteMap};
use crate::xml::{parse_document, write_document};

/// Default extension of connection metadata files
pub const METADATA_EXTENSION: &str = "json";

/// Converts PDI files to Hop files and externalizes their connections.
#[derive(Debug)]
pub struct ConversionEngine {
    rewriter: DocumentRewriter,
    connection_types: ConnectionTypeMap,
    renderer: MetadataRenderer,
    metadata_dir: PathBuf,
    metadata_extension: String,
}

impl ConversionEngine {
    /// Create an engine.
    ///
    /// # Arguments
    ///
    /// * `rewrite_map` - Element/attribute renames applied to every document
    /// * `connection_types` - PDI connection type to Hop descriptor lookup
    /// * `renderer` - Renderer for connection metadata files
    /// * `metadata_dir` - Directory receiving one metadata file per connection name
    pub fn new(
        rewrite_map: RewriteMap,
        connection_types: ConnectionTypeMap,
        renderer: MetadataRenderer,
        metadata_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            rewriter: DocumentRewriter::new(rewrite_map),
            connection_types,
            renderer,
            metadata_dir: metadata_dir.into(),
            metadata_extension: METADATA_EXTENSION.to_string(),
        }
    }

    /// Create an engine from a configuration and a Hop config directory.
    ///
    /// Loads the template named in the configuration, or the built-in one.
    pub fn from_config(config: &ConverterConfig, config_dir: &Path) -> Result<Self, TemplateError> {
        let renderer = match &config.metadata.template {
            Some(path) => MetadataRenderer::from_file(path)?,
            None => MetadataRenderer::with_default_template()?,
        };

        let mut engine = Self::new(
            config.rewrite.clone(),
            config.connection_types.clone(),
            renderer,
            config.metadata_dir(config_dir),
        );
        engine.rewriter = engine
            .rewriter
            .with_connection_tag(config.document.connection_tag.clone())
            .with_reference_tag(config.document.reference_tag.clone());
        engine.metadata_extension = config.metadata.extension.clone();
        Ok(engine)
    }

    /// Use a different tag for embedded connection blocks.
    pub fn with_connection_tag(mut self, connection_tag: impl Into<String>) -> Self {
        self.rewriter = self.rewriter.with_connection_tag(connection_tag);
        self
    }

    /// Replace removed connection blocks by `<tag>NAME</tag>` references.
    pub fn with_reference_tag(mut self, reference_tag: impl Into<String>) -> Self {
        self.rewriter = self.rewriter.with_reference_tag(Some(reference_tag.into()));
        self
    }

    pub fn with_metadata_extension(mut self, extension: impl Into<String>) -> Self {
        self.metadata_extension = extension.into();
        self
    }

    pub fn metadata_dir(&self) -> &Path {
        &self.metadata_dir
    }

    /// Path of the metadata file for a connection name.
    pub fn metadata_path(&self, connection_name: &str) -> PathBuf {
        self.metadata_dir
            .join(format!("{}.{}", connection_name, self.metadata_extension))
    }

    /// Convert one file and return its error count.
    ///
    /// Errors never escape: a count of 0 means the file converted cleanly or
    /// every target already existed.
    pub fn process_file(&self, job: &ConversionJob) -> usize {
        self.process_file_report(job).error_count()
    }

    /// Convert one file and return the full report.
    pub fn process_file_report(&self, job: &ConversionJob) -> FileReport {
        let mut report = FileReport::default();

        let content = match fs::read_to_string(&job.input) {
            Ok(content) => content,
            Err(e) => {
                report
                    .errors
                    .push(ConversionError::ReadError(job.input.clone(), e.to_string()));
                return report;
            }
        };

        let document = match parse_document(&content) {
            Ok(document) => document,
            Err(e) => {
                error!("File {} is not well-formed XML: {}", job.name(), e);
                report.errors.push(ConversionError::ParseError(e.to_string()));
                return report;
            }
        };

        let extracted = ConnectionExtractor::new(&self.connection_types)
            .with_connection_tag(self.rewriter.connection_tag())
            .extract(&document);
        report.errors.extend(extracted.errors);
        report.duplicates = extracted.duplicates;

        for connection in &extracted.connections {
            let path = self.metadata_path(&connection.name);
            if path.exists() {
                debug!(
                    "Metadata for connection '{}' already exists: {}",
                    connection.name,
                    path.display()
                );
                report.skipped.push(path);
                continue;
            }

            let rendered = match self.renderer.render(connection) {
                Ok(rendered) => rendered,
                Err(err) => {
                    report.errors.push(err);
                    continue;
                }
            };

            match write_new_file(&path, rendered.as_bytes()) {
                Ok(created) => {
                    if created {
                        info!(
                            "Wrote metadata for connection '{}' to {}",
                            connection.name,
                            path.display()
                        );
                    }
                    report.record_write(&path, created);
                }
                Err(err) => report.errors.push(err),
            }
        }

        if job.output.exists() {
            debug!("Output file already exists: {}", job.output.display());
            report.skipped.push(job.output.clone());
            return report;
        }

        let rewritten = self.rewriter.rewrite(document);
        let output = match write_document(&rewritten) {
            Ok(output) => output,
            Err(e) => {
                report
                    .errors
                    .push(ConversionError::WriteError(job.output.clone(), e.to_string()));
                return report;
            }
        };

        match write_new_file(&job.output, output.as_bytes()) {
            Ok(created) => {
                if created {
                    info!("Wrote {}", job.output.display());
                }
                report.record_write(&job.output, created);
            }
            Err(err) => report.errors.push(err),
        }

        report
    }
}

/// Create `path` with `content` unless it already exists.
///
/// Returns `Ok(false)` when the file was already there. The existence check and
/// the creation are a single `create_new` open, so two writers racing for the
/// same path cannot both create it.
fn write_new_file(path: &Path, content: &[u8]) -> Result<bool, ConversionError> {
    let write_error =
        |e: std::io::Error| ConversionError::WriteError(path.to_path_buf(), e.to_string());

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(write_error(e)),
    };

    if let Err(e) = file.write_all(content).and_then(|_| file.flush()) {
        // a truncated file would be skipped as existing by the next run
        let _ = fs::remove_file(path);
        return Err(write_error(e));
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_new_file_does_not_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("file.txt");

        assert!(write_new_file(&path, b"first").unwrap());
        assert!(!write_new_file(&path, b"second").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_engine_is_send_and_sync() {
        assert_send_sync::<ConversionEngine>();
    }

    #[test]
    fn test_from_config_uses_metadata_subfolder() {
        let mut config = ConverterConfig::new();
        config.metadata.subfolder = "databases".to_string();
        let engine = ConversionEngine::from_config(&config, Path::new("/hop/config")).unwrap();
        assert_eq!(
            engine.metadata_dir(),
            Path::new("/hop/config/metadata/databases")
        );
    }

    #[test]
    fn test_metadata_path() {
        let engine = ConversionEngine::new(
            RewriteMap::new(),
            ConnectionTypeMap::new(),
            MetadataRenderer::new("{{ name }}").unwrap(),
            "/hop/config/metadata/rdbms",
        )
        .with_metadata_extension("xml");
        assert_eq!(
            engine.metadata_path("SalesDB"),
            PathBuf::from("/hop/config/metadata/rdbms/SalesDB.xml")
        );
    }

    #[test]
    fn test_missing_input_counts_one_error() {
        let dir = tempdir().unwrap();
        let engine = ConversionEngine::new(
            RewriteMap::pdi_to_hop(),
            ConnectionTypeMap::pdi_to_hop(),
            MetadataRenderer::with_default_template().unwrap(),
            dir.path().join("metadata"),
        );
        let job = ConversionJob::new(dir.path().join("missing.ktr"), dir.path().join("out.hpl"));

        let report = engine.process_file_report(&job);
        assert_eq!(report.error_count(), 1);
        assert!(matches!(report.errors[0], ConversionError::ReadError(..)));
        assert!(report.written.is_empty());
        assert!(!dir.path().join("metadata").exists());
    }
}
