//! fincat: categorise bank statement CSV exports into monthly/weekly summaries.
//!
//! Usage:
//!   fincat run --input DIR --output DIR --keywords FILE
//!   fincat init-config
//!   fincat show-config

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fincat_finance::{FinanceProcessor, MatchStrategy, RunSummary};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod state;

use config::{config_path, init_config, load_config, Overrides};

#[derive(Parser, Debug)]
#[command(
    name = "fincat",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FINCAT_BUILD_SHA"), ")"),
    about = "Categorise bank statement exports by keyword"
)]
struct Cli {
    /// Config file (default: ~/.fincat/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load, categorise and export every statement in the input directory
    Run(RunArgs),

    /// Write a default config file if none exists
    InitConfig,

    /// Print the effective configuration as TOML
    ShowConfig,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Directory of statement CSV exports
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory for reports and summaries
    #[arg(long)]
    output: Option<PathBuf>,

    /// Keyword mapping file (category,keyword)
    #[arg(long)]
    keywords: Option<PathBuf>,

    /// Write monthly_summary.csv
    #[arg(long)]
    monthly: Option<bool>,

    /// Write weekly_summary.csv
    #[arg(long)]
    weekly: Option<bool>,

    /// Write the full categorised dataset
    #[arg(long)]
    full: Option<bool>,

    /// Keyword tie-break: longest or first
    #[arg(long)]
    strategy: Option<MatchStrategy>,

    /// Append a Total row to the summaries
    #[arg(long)]
    total_row: Option<bool>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            input: self.input.clone(),
            output: self.output.clone(),
            keywords: self.keywords.clone(),
            monthly: self.monthly,
            weekly: self.weekly,
            full: self.full,
            strategy: self.strategy,
            total_row: self.total_row,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let path = config_path(cli.config.as_deref())?;
    debug!(config = %path.display(), exists = path.exists(), "config file");

    match cli.command {
        Command::Run(args) => {
            let mut cfg = load_config(&path)?.pipeline;
            args.overrides().apply(&mut cfg);

            let summary = FinanceProcessor::new(cfg)
                .run()
                .context("processing failed")?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }

        Command::InitConfig => {
            init_config(&path)?;
        }

        Command::ShowConfig => {
            let cfg = load_config(&path)?;
            println!("# {}", path.display());
            print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
        }
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let stats = &summary.categorisation;
    println!(
        "Processed {} transactions with {} keywords",
        summary.transactions, summary.keywords
    );
    println!(
        "Categorised: {} | uncategorised: {} | card repayments: {}",
        stats.matched, stats.uncategorised, stats.repayments
    );
    println!("\nFiles written:");
    for path in &summary.files_written {
        println!("- {}", path.display());
    }
}
