//! Quero FIAGROs command-line entry point.

use clap::{Parser, Subcommand};
use fiagro_core::{build_catalogue, parse_ticker_list};
use fiagro_server::config::{ConfigOverrides, ServerConfig};
use fiagro_server::{start, AppState};
use serde::Serialize;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "fiagro",
    about = "Brazilian agribusiness funds (FIAGROs): B3 registry plus scraped prices and yields",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Marketing site root [env: FIAGRO_SITE_URL].
    #[arg(long, global = true)]
    site_url: Option<String>,

    /// B3 registry listing endpoint [env: FIAGRO_REGISTRY_URL].
    #[arg(long, global = true)]
    registry_url: Option<String>,

    /// List cache lifetime in seconds [env: FIAGRO_CACHE_TTL].
    #[arg(long, global = true)]
    cache_ttl: Option<u64>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the REST API (default).
    Serve {
        /// Bind address [env: FIAGRO_ADDR].
        #[arg(long)]
        addr: Option<String>,
    },

    /// Print scraped records for the given tickers.
    Funds {
        /// Comma-separated tickers, e.g. FGAA,SNAG11.
        #[arg(long)]
        tickers: String,
    },

    /// Print one fund's detail-page record.
    Detail {
        /// Ticker, with or without the 11 suffix.
        ticker: String,
    },

    /// Print the B3 registry listing.
    Registry,

    /// Print the registry merged with scraped data.
    Catalogue,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.unwrap_or(Commands::Serve { addr: None });
    let addr = match &command {
        Commands::Serve { addr } => addr.clone(),
        _ => None,
    };

    let config = ServerConfig::resolve(&ConfigOverrides {
        addr,
        site_url: cli.site_url,
        registry_url: cli.registry_url,
        cache_ttl_secs: cli.cache_ttl,
    })?;
    let state = AppState::from_config(&config)?;

    match command {
        Commands::Serve { .. } => {
            tracing::info!("Quero FIAGROs v{}", env!("CARGO_PKG_VERSION"));
            tracing::info!("Site: {}", config.site_url);
            tracing::info!("List cache TTL: {}s", config.cache_ttl.as_secs());
            start(config.addr, Arc::new(state)).await?;
        }

        Commands::Funds { tickers } => {
            let tickers = parse_ticker_list(&tickers);
            let records = state.lists.fetch_by_tickers(&tickers).await?;
            print_json(&records)?;
        }

        Commands::Detail { ticker } => {
            let record = state.details.fetch(&ticker).await?;
            print_json(&record)?;
        }

        Commands::Registry => {
            let listing = state.registry.fetch().await?;
            print_json(&listing.raw)?;
        }

        Commands::Catalogue => {
            let records = build_catalogue(&state.registry, &state.lists).await?;
            print_json(&records)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
