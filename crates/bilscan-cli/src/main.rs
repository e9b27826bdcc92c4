mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bilscan_core::{aggregate, CountryFilter};
use bilscan_scraper::Scanner;

#[derive(Debug, Parser)]
#[command(name = "bilscan-cli")]
#[command(about = "Scan vehicle listings and summarize them by country of import")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Discover, enrich and correlate listings from one search URL.
    Scan {
        /// Search results URL; any `page` parameter is rewritten per page.
        search_url: String,
        /// Upper bound on listings to collect (defaults to config).
        #[arg(long)]
        max_results: Option<usize>,
        /// `all`, `imported`, `unknown` or a country name.
        #[arg(long, default_value = "all")]
        country: String,
        /// Print the aggregate view as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = bilscan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Scan {
            search_url,
            max_results,
            country,
            json,
        }) => {
            let max_results = max_results.unwrap_or(config.default_max_results);
            if max_results == 0 {
                anyhow::bail!("--max-results must be greater than zero");
            }

            let scanner = Scanner::from_config(&config)?;
            let batch = scanner.scan(&search_url, max_results).await;
            tracing::info!(listings = batch.len(), "scan complete");
            let view = aggregate(&batch, &CountryFilter::parse(&country));

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", report::render(&view));
            }
        }
        None => println!("bilscan-cli: run `bilscan-cli scan <SEARCH_URL>`"),
    }

    Ok(())
}
