//! ALTO Ingest - alto2txt archive to CSV converter

use alto_common::logging::{init_logging, LogConfig, LogLevel};
use alto_ingest::collection::list_collections;
use alto_ingest::config::{parse_delimiter, IngestConfig};
use alto_ingest::convert::convert_collection;
use alto_ingest::progress::create_entry_progress;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "alto-ingest")]
#[command(author, version, about = "Flatten alto2txt metadata and plain-text archives into CSV")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert one or more collections to CSV
    Convert {
        /// Collection ids, e.g. 0002645
        #[arg(required = true)]
        collections: Vec<String>,

        /// Directory containing metadata/ and plaintext/
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave out the article text column
        #[arg(long)]
        no_text: bool,

        /// Field delimiter (single character, or "tab")
        #[arg(long)]
        delimiter: Option<String>,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// List collections available in the data directory
    List {
        /// Directory containing metadata/ and plaintext/
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("alto-ingest")
        .build();

    // Environment variables take precedence over the defaults above
    let log_config = log_config
        .clone()
        .with_overrides(|key| std::env::var(key).ok())
        .unwrap_or(log_config);

    // The CLI still works without logging. The guard flushes file output on drop.
    let _guard = init_logging(&log_config).ok().flatten();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = format!("{:#}", e);
            error!(error = %message, "Command failed");
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        },
    }
}

fn run(command: Command) -> Result<()> {
    let mut config = IngestConfig::from_env().context("Invalid ALTO_* environment")?;

    match command {
        Command::Convert {
            collections,
            data_dir,
            output,
            no_text,
            delimiter,
            quiet,
        } => {
            if let Some(dir) = data_dir {
                config.set_data_dir(dir);
            }
            if let Some(dir) = output {
                config.set_output_dir(dir);
            }
            if no_text {
                config.set_include_text(false);
            }
            if let Some(delimiter) = delimiter {
                config.set_delimiter(parse_delimiter(&delimiter)?);
            }

            for collection_id in &collections {
                let progress = create_entry_progress(collection_id, !quiet);
                let summary = convert_collection(&config, collection_id, &progress)
                    .with_context(|| format!("Failed to convert collection {}", collection_id))?;

                info!(
                    collection = %summary.collection_id,
                    rows = summary.rows,
                    output = %summary.output.display(),
                    "Collection converted"
                );
                println!(
                    "{} -> {} ({} rows)",
                    summary.collection_id,
                    summary.output.display(),
                    summary.rows
                );
            }
        },
        Command::List { data_dir } => {
            if let Some(dir) = data_dir {
                config.set_data_dir(dir);
            }

            let ids = list_collections(&config.data_dir).with_context(|| {
                format!("Failed to list collections in {}", config.data_dir.display())
            })?;
            for id in ids {
                println!("{}", id);
            }
        },
    }

    Ok(())
}
