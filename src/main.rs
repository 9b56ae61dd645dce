// src/main.rs

//! Company enrichment CLI.
//!
//! Loads company records from CSV, resolves websites, emails and phone
//! numbers in phases, and writes a merged export. Progress is tracked in a
//! durable JSON file so interrupted runs resume where they stopped.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use enricher::error::Result;
use enricher::models::Config;
use enricher::pipeline::{Enricher, PhaseFilter, dated_output_path, load_companies};
use enricher::services::SourceClient;
use enricher::storage::ProgressTracker;

#[derive(Parser, Debug)]
#[command(
    name = "enricher",
    version,
    about = "Enrich company records with websites, emails and phone numbers"
)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    /// Input CSV (overrides the configured path)
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Output CSV (defaults to a dated file in the output directory)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run enrichment over the input records
    Run(RunArgs),
    /// Discard all recorded progress and start over
    Reset,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Only resolve websites
    #[arg(long, conflicts_with_all = ["emails_only", "phones_only"])]
    websites_only: bool,

    /// Only resolve emails (resolves missing websites first)
    #[arg(long, conflicts_with = "phones_only")]
    emails_only: bool,

    /// Only resolve phone numbers (resolves missing websites first)
    #[arg(long)]
    phones_only: bool,

    /// Report pending work without network calls or writes
    #[arg(long)]
    dry_run: bool,
}

impl RunArgs {
    fn filter(&self) -> PhaseFilter {
        if self.websites_only {
            PhaseFilter::WebsitesOnly
        } else if self.emails_only {
            PhaseFilter::EmailsOnly
        } else if self.phones_only {
            PhaseFilter::PhonesOnly
        } else {
            PhaseFilter::All
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();

    let config = Config::load_or_default(&cli.config);
    config.validate()?;

    match cli.command {
        Command::Run(args) => {
            let input = cli.input.as_deref().unwrap_or(&config.paths.input_csv);
            let output = cli
                .output
                .as_deref()
                .map(PathBuf::from)
                .unwrap_or_else(|| dated_output_path(&config.paths.output_dir));

            let companies = load_companies(input)?;
            let tracker = ProgressTracker::load(&config.paths.progress_file);
            let source = SourceClient::new(&config)?;

            let mut enricher = Enricher::new(config, companies, tracker, Box::new(source));
            enricher.run(args.filter(), args.dry_run, &output).await?;
        }
        Command::Reset => {
            let mut tracker = ProgressTracker::load(&config.paths.progress_file);
            tracker.reset()?;
            log::info!("Progress cleared at {}", config.paths.progress_file);
        }
    }

    Ok(())
}
