use anyhow::Result;
use api_agent::agent;
use api_agent::search::fetcher::SearchQuery;
use api_agent::server;
use api_agent::utils::config_loader;
use api_agent::utils::constants::{DEFAULT_CONFIG_PATH, NO_ADDRESS};
use api_agent::utils::logging;
use api_agent::utils::logging::LogLevel;
use clap::arg;
use clap::command;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// overrides the configured `location` query parameter
    #[arg(long)]
    location: Option<String>,
    /// overrides the configured `term` query parameter
    #[arg(long)]
    term: Option<String>,
    /// serve `/restaurants` and metrics instead of a single search
    #[arg(long)]
    serve: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level.to_owned()).await?;

    // -------------------------------
    // 2. Open token store, build caller and fetcher
    // -------------------------------

    let fetcher = agent::build_fetcher(&service_config).await?;

    // -------------------------------
    // 3. Serve or search once
    // -------------------------------

    if args.serve {
        info!("Service starting...");
        return server::server::start(&service_config.settings, fetcher).await;
    }

    let query = SearchQuery { location: args.location, term: args.term };
    let restaurants = fetcher.fetch(&query).await?;
    for restaurant in &restaurants {
        println!(
            "{}\t{}",
            restaurant.name,
            restaurant.primary_address().unwrap_or(NO_ADDRESS)
        );
    }
    Ok(())
}
