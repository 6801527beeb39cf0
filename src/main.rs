//! listing-scraper - Extract an AirBnb listing with a headless browser.

use anyhow::Result;
use clap::Parser;
use listing_scraper::commands::ListingCommand;
use listing_scraper::config::{Config, OutputFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "listing-scraper",
    version,
    about = "Extract name, type, rooms and amenities from an AirBnb listing",
    long_about = "Opens an AirBnb listing in headless Chrome and prints its name, property type, bedroom and bathroom counts, and available amenities."
)]
struct Cli {
    /// Listing URL, e.g. https://www.airbnb.co.uk/rooms/12345
    url: Option<String>,

    /// Read a saved HTML page instead of launching Chrome
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format [table, json, markdown, csv]
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Show the browser window
    #[arg(long)]
    headful: bool,

    /// Chrome/Chromium executable (overrides LISTING_CHROME)
    #[arg(long)]
    chrome: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for the report
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(format) = cli.format {
        config.format = format;
    }
    if cli.headful {
        config.headless = false;
    }
    if let Some(chrome) = cli.chrome {
        config.chrome_executable = Some(chrome);
    }

    let cmd = ListingCommand::new(config);

    match cli.html {
        Some(path) => cmd.execute_snapshot(&path, cli.url.as_deref()).await,
        None => cmd.execute(cli.url.as_deref()).await,
    }
}
