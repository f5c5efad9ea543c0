mod config;
mod driver;
mod model;
mod normalizer;
mod parser;
mod report;
mod scraper;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Mode, load_settings_or_default};
use driver::{FetchDriver, build_source};
use report::{aggregate_results, render_summary_table, validate_inputs};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use utils::{read_json_file, write_json_file};

#[derive(Parser, Debug)]
#[command(name = "review-scraper", about = "Listing review scraper (unofficial API).")]
struct Cli {
    /// Input JSON containing {"roomids": [...], "limit_per_listing": 20}
    #[arg(long, value_name = "PATH", default_value = "data/inputs.sample.json")]
    input: PathBuf,

    /// Where to write the aggregated JSON output
    #[arg(long, value_name = "PATH", default_value = "output.json")]
    output: PathBuf,

    /// Settings JSON (see config/settings.example.json)
    #[arg(long, value_name = "PATH", default_value = "config/settings.example.json")]
    settings: PathBuf,

    /// Override the settings mode. Defaults to settings.mode or mock
    #[arg(long, value_enum)]
    mode: Option<Mode>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    // Panics inside listing tasks are reported by the driver; log the details here
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic occurred: {}", panic_info);
    }));

    let cli = Cli::parse();

    let raw_inputs: Value = read_json_file(&cli.input).context("Failed to load input file")?;
    let inputs = validate_inputs(&raw_inputs)
        .with_context(|| format!("Invalid input file {}", cli.input.display()))?;

    let settings = load_settings_or_default(&cli.settings);
    let mode = settings.resolve_mode(cli.mode);
    info!("Mode: {} | Concurrency: {}", mode, settings.concurrency);

    let source = build_source(mode, &settings).context("Failed to create review source")?;
    let driver = FetchDriver::new(source, settings.concurrency);
    let results = driver.run(&inputs.roomids, inputs.limit_per_listing).await;

    let final_results = aggregate_results(results);
    write_json_file(&cli.output, &final_results).context("Failed to write output")?;

    print!("{}", render_summary_table(&final_results));
    println!("Wrote {} record(s) to {}", final_results.len(), cli.output.display());
    Ok(())
}

/// `RUST_LOG` wins, then `LOG_LEVEL`, then `info`. Logs go to stderr so the
/// summary table on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into())))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
