//! CLI binary entry point for hop-import

use clap::{Parser, Subcommand};
use hop_import::cli::commands::convert::{ConvertArgs, handle_convert};
use hop_import::cli::commands::validate::handle_validate;
use hop_import::config::sample_config;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hop-import")]
#[command(about = "Convert Pentaho Data Integration transformations into Apache Hop pipelines")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert .ktr files to .hpl files and write connection metadata.
    /// Existing files are never overwritten.
    Convert {
        /// Folder where the PDI files are located
        #[arg(short, long)]
        input: PathBuf,
        /// Folder the Hop files are written to
        #[arg(short, long)]
        output: PathBuf,
        /// Name of a file in the input folder to convert; can be repeated.
        /// All files in the input folder are converted when omitted.
        #[arg(short, long = "file")]
        files: Vec<String>,
        /// Hop config directory receiving the connection metadata
        /// (default: $HOP_CONFIG_DIRECTORY)
        #[arg(short, long)]
        config_dir: Option<PathBuf>,
        /// Converter settings file (TOML)
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Template for connection metadata files
        #[arg(short, long)]
        template: Option<PathBuf>,
    },
    /// Check that files are well-formed XML
    Validate {
        /// Files to check
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Print a sample settings file
    SampleConfig,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            files,
            config_dir,
            settings,
            template,
        } => {
            info!("Version {}", env!("CARGO_PKG_VERSION"));
            let args = ConvertArgs {
                input,
                output,
                files,
                config_dir,
                settings,
                template,
            };
            handle_convert(&args).map(|summary| {
                if !summary.is_success() {
                    std::process::exit(1);
                }
            })
        }
        Commands::Validate { inputs } => handle_validate(&inputs),
        Commands::SampleConfig => {
            print!("{}", sample_config());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
