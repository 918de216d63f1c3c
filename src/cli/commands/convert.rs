//! Convert command implementation

use crate::cli::error::CliError;
use crate::config::ConverterConfig;
use crate::convert::{BatchSummary, ConversionEngine, discover_jobs, run_batch};
use std::path::PathBuf;
use tracing::info;

/// Environment variable Hop uses for its configuration directory
pub const ENV_HOP_CONFIG_DIRECTORY: &str = "HOP_CONFIG_DIRECTORY";

/// Arguments for the convert command
#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    /// Folder holding the PDI files
    pub input: PathBuf,
    /// Folder receiving the Hop files
    pub output: PathBuf,
    /// Files to convert; every file with the source extension when empty
    pub files: Vec<String>,
    /// Hop configuration directory
    pub config_dir: Option<PathBuf>,
    /// Converter settings file
    pub settings: Option<PathBuf>,
    /// Metadata template overriding the settings
    pub template: Option<PathBuf>,
}

impl ConvertArgs {
    /// Hop config directory from the arguments or `HOP_CONFIG_DIRECTORY`.
    pub fn resolve_config_dir(&self) -> Result<PathBuf, CliError> {
        if let Some(dir) = &self.config_dir {
            return Ok(dir.clone());
        }
        match std::env::var(ENV_HOP_CONFIG_DIRECTORY) {
            Ok(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
            _ => Err(CliError::InvalidArgument(format!(
                "a Hop config directory is required (--config-dir or {})",
                ENV_HOP_CONFIG_DIRECTORY
            ))),
        }
    }
}

/// Handle the convert command
pub fn handle_convert(args: &ConvertArgs) -> Result<BatchSummary, CliError> {
    let config_dir = args.resolve_config_dir()?;
    if !args.input.is_dir() {
        return Err(CliError::FileNotFound(args.input.clone()));
    }

    if let Some(settings) = &args.settings
        && !settings.exists()
    {
        return Err(CliError::FileNotFound(settings.clone()));
    }

    let mut config = ConverterConfig::load(args.settings.as_deref())?;
    if let Some(template) = &args.template {
        config.metadata.template = Some(template.clone());
    }

    info!("processing files from: {}", args.input.display());
    info!("output files to: {}", args.output.display());
    info!("config directory: {}", config_dir.display());

    std::fs::create_dir_all(&args.output)
        .map_err(|e| CliError::FileWriteError(args.output.clone(), e.to_string()))?;

    let engine = ConversionEngine::from_config(&config, &config_dir)?;
    let jobs = discover_jobs(
        &args.input,
        &args.output,
        &args.files,
        &config.document.source_extension,
        &config.document.destination_extension,
    )?;

    let summary = run_batch(&engine, &jobs);
    info!("processing complete");
    Ok(summary)
}
