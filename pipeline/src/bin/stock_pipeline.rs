use anyhow::Result;
use clap::{Parser, Subcommand};
use forecast_store::Store;
use price_feed::providers::alpha_vantage::AlphaVantageProvider;
use shared_utils::env::get_env_var;
use stock_pipeline::config::PipelineConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Daily stock price ETL + forecast pipeline")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Execute one pipeline run (the scheduler's per-period trigger).
    Run {
        /// TOML run configuration; defaults apply when omitted.
        #[arg(long, value_name = "FILE")]
        config: Option<String>,
        /// Store location; falls back to $DATABASE_URL.
        #[arg(long, value_name = "URL")]
        database_url: Option<String>,
    },
    /// Provision the store schema and exit.
    Migrate {
        /// Store location; falls back to $DATABASE_URL.
        #[arg(long, value_name = "URL")]
        database_url: Option<String>,
    },
}

fn resolve_database_url(flag: Option<String>) -> Result<String> {
    match flag {
        Some(url) => Ok(url),
        None => Ok(get_env_var("DATABASE_URL")?),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Migrate { database_url } => {
            let store = Store::new(resolve_database_url(database_url)?);
            store.provision()?;
            tracing::info!(database_url = store.database_url(), "store provisioned");
        }
        Cmd::Run {
            config,
            database_url,
        } => {
            let config = match config {
                Some(path) => PipelineConfig::from_toml_file(&path)?,
                None => PipelineConfig::default(),
            };
            let store = Store::new(resolve_database_url(database_url)?);
            let provider = AlphaVantageProvider::new()?;

            stock_pipeline::run_pipeline(&provider, &store, &config).await?;
        }
    }

    Ok(())
}
