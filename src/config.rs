//! Converter configuration file support
//!
//! Handles parsing of `hop-import.toml` configuration files and environment
//! variable overrides. Every section is optional; a missing section takes the
//! built-in PDI to Hop defaults. A `[rewrite]` or `[connection_types]` table in
//! the file replaces the built-in table as a whole.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::import::CONNECTION_TAG;
use crate::models::{ConnectionTypeMap, RewriteMap};

/// Default configuration filename
pub const CONFIG_FILENAME: &str = "hop-import.toml";

/// Environment variable overriding the metadata subfolder
pub const ENV_METADATA_SUBFOLDER: &str = "HOP_IMPORT_METADATA_SUBFOLDER";

/// Environment variable overriding the metadata template path
pub const ENV_TEMPLATE: &str = "HOP_IMPORT_TEMPLATE";

/// Error while loading or saving the configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Configuration error: {0}")]
    ParseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Metadata file configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSection {
    /// Folder below `<config_dir>/metadata` receiving connection files
    #[serde(default = "default_subfolder")]
    pub subfolder: String,

    /// Extension of connection files
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Template file; the built-in rdbms template is used when unset
    #[serde(default)]
    pub template: Option<PathBuf>,
}

fn default_subfolder() -> String {
    "rdbms".to_string()
}

fn default_extension() -> String {
    crate::convert::engine::METADATA_EXTENSION.to_string()
}

impl Default for MetadataSection {
    fn default() -> Self {
        Self {
            subfolder: default_subfolder(),
            extension: default_extension(),
            template: None,
        }
    }
}

/// Document handling configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSection {
    /// Tag of embedded connection blocks
    #[serde(default = "default_connection_tag")]
    pub connection_tag: String,

    /// Tag written in place of each removed connection block
    #[serde(default)]
    pub reference_tag: Option<String>,

    /// Extension of files to convert
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Extension of converted files
    #[serde(default = "default_destination_extension")]
    pub destination_extension: String,
}

fn default_connection_tag() -> String {
    CONNECTION_TAG.to_string()
}

fn default_source_extension() -> String {
    "ktr".to_string()
}

fn default_destination_extension() -> String {
    "hpl".to_string()
}

impl Default for DocumentSection {
    fn default() -> Self {
        Self {
            connection_tag: default_connection_tag(),
            reference_tag: None,
            source_extension: default_source_extension(),
            destination_extension: default_destination_extension(),
        }
    }
}

/// Main configuration structure
///
/// Represents the `hop-import.toml` configuration file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Element and attribute renames
    #[serde(default = "RewriteMap::pdi_to_hop")]
    pub rewrite: RewriteMap,

    /// PDI connection type to Hop descriptor
    #[serde(default = "ConnectionTypeMap::pdi_to_hop")]
    pub connection_types: ConnectionTypeMap,

    #[serde(default)]
    pub metadata: MetadataSection,

    #[serde(default)]
    pub document: DocumentSection,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            rewrite: RewriteMap::pdi_to_hop(),
            connection_types: ConnectionTypeMap::pdi_to_hop(),
            metadata: MetadataSection::default(),
            document: DocumentSection::default(),
        }
    }
}

impl ConverterConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// Falls back to defaults when no path is given or the file does not exist.
    /// Environment variable overrides are applied in both cases.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    ConfigError::IoError(format!(
                        "Failed to read config {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Self::parse(&content)?
            }
            _ => Self::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse config: {}", e)))
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to serialize config: {}", e))
        })
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(subfolder) = std::env::var(ENV_METADATA_SUBFOLDER)
            && !subfolder.is_empty()
        {
            self.metadata.subfolder = subfolder;
        }

        if let Ok(template) = std::env::var(ENV_TEMPLATE)
            && !template.is_empty()
        {
            self.metadata.template = Some(PathBuf::from(template));
        }
    }

    /// Directory receiving connection metadata files for a Hop config directory
    pub fn metadata_dir(&self, config_dir: &Path) -> PathBuf {
        let metadata = config_dir.join("metadata");
        if self.metadata.subfolder.is_empty() {
            metadata
        } else {
            metadata.join(&self.metadata.subfolder)
        }
    }
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# Hop import tool configuration
# Every section is optional. Leave a section out to use the built-in defaults.

[metadata]
# Folder below <config dir>/metadata receiving one file per connection
subfolder = "rdbms"
extension = "json"
# Custom minijinja template for connection files
# template = "/path/to/connection.json.j2"

[document]
connection_tag = "connection"
# Write <connection_ref>NAME</connection_ref> where a connection block was removed
# reference_tag = "connection_ref"
source_extension = "ktr"
destination_extension = "hpl"

# Element and attribute renames. Replaces the built-in table when present.
# [rewrite]
# transformation = "pipeline"
# step = "transform"

# Connection types. Replaces the built-in table when present.
# [connection_types]
# MYSQL = "MySQL"
# POSTGRESQL = "PostgreSQL"
"#
}
