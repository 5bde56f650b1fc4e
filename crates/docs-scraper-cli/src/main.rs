//! docs-scraper: entry point.

use clap::Parser;

use docs_scraper::Sites;
use docs_scraper_cli::{execute, logging, Cli, RunRequest, Settings};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    logging::init(&settings.log_file())?;

    let request = RunRequest::from(cli);
    if let Err(e) = execute(&request, &settings, &Sites::default()).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
