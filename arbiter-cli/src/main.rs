//! Arbiter CLI: decide which catalog algorithms apply to a dataset.

mod commands;

use arbiter_core::properties::parse_property_string_into;
use arbiter_core::{AlgorithmCategory, OutputFormat};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Arbiter: find the algorithms that can handle your dataset
#[derive(Parser, Debug)]
#[command(name = "arbiter", version, about, long_about = None)]
pub(crate) struct Cli {
    /// Workspace directory (holds `.arbiter/config.toml`)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog `params` directory (default: auto-detect)
    #[arg(long)]
    params_dir: Option<String>,

    /// Configuration overrides as `key=value:key=value`
    #[arg(long = "prop", value_name = "PROPERTIES")]
    props: Vec<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Commands {
    /// Resolve every applicable algorithm for an ARFF dataset
    Resolve {
        /// Dataset in ARFF format
        dataset: PathBuf,

        /// Only consider these classifier/filter identifiers (comma separated)
        #[arg(long, value_delimiter = ',')]
        allow: Option<Vec<String>>,

        /// Output format: text or json
        #[arg(long)]
        format: Option<OutputFormat>,
    },
    /// List catalog candidates for one category
    List {
        /// base_classifier, meta_classifier, ensemble_classifier, base_filter,
        /// meta_filter, attribute_search, attribute_evaluator
        category: AlgorithmCategory,
    },
    /// List the built-in algorithm implementations
    Algorithms,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum ConfigAction {
    /// Write a default `.arbiter/config.toml` into the workspace
    Init,
    /// Print the effective configuration
    Show,
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "arbiter", "arbiter")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "arbiter.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let mut config = arbiter_core::load_config(Some(&workspace), cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    // Apply CLI overrides
    let mut props = arbiter_core::properties::Properties::new();
    for prop in &cli.props {
        parse_property_string_into(&mut props, prop)?;
    }
    arbiter_core::apply_properties(&mut config, &props)?;
    if let Some(dir) = &cli.params_dir {
        config.catalog.params_dir = Some(arbiter_core::paths::expand_to_path(dir));
    }

    let context = commands::Context::new(config, workspace);
    let output = commands::handle_command(cli.command, &context)?;
    print!("{}", output);
    Ok(())
}
