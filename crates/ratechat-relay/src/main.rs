//! # ratechat
//!
//! Binary entry point: `serve` runs the WebSocket relay, `rates` performs a
//! single exchange-rate lookup and prints a table.

#![deny(unsafe_code)]

mod table;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ratechat_core::constants::MAX_DAYS_MESSAGE;
use ratechat_core::{CurrencySet, ExchangeError};
use ratechat_logging::FileCommandLog;
use ratechat_rates::{PrivatBankClient, RangeAggregator};
use ratechat_server::config::ServerConfig;
use ratechat_server::server::RelayServer;
use ratechat_server::shutdown::{DEFAULT_SHUTDOWN_TIMEOUT, shutdown_signal};
use ratechat_settings::RelaySettings;

/// Chat relay with PrivatBank exchange-rate lookups.
#[derive(Parser, Debug)]
#[command(name = "ratechat", version, about)]
struct Cli {
    /// Settings file (defaults to `~/.ratechat/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the WebSocket relay.
    Serve {
        /// Host to bind (overrides settings).
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides settings).
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print exchange rates for the last `num_days` days.
    Rates {
        /// Days to look back, today included (at most 10).
        num_days: u64,

        /// Extra currency codes besides EUR and USD.
        #[arg(long, num_args = 1..)]
        currencies: Vec<String>,
    },
}

fn load_settings(path: Option<&PathBuf>) -> Result<RelaySettings> {
    let path = path.cloned().unwrap_or_else(ratechat_settings::settings_path);
    ratechat_settings::load_settings_from_path(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))
}

fn rate_client(settings: &RelaySettings) -> RangeAggregator {
    let client = PrivatBankClient::new(
        settings.exchange.base_url.clone(),
        settings.exchange.timeout(),
    );
    RangeAggregator::new(Arc::new(client))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let settings = load_settings(cli.settings.as_ref())?;
    ratechat_logging::init_subscriber(
        settings.logging.level.as_filter_str(),
        settings.logging.json,
    );

    match cli.command {
        Command::Serve { host, port } => serve(settings, host, port).await,
        Command::Rates {
            num_days,
            currencies,
        } => rates(&settings, num_days, &currencies).await,
    }
}

async fn serve(
    mut settings: RelaySettings,
    host: Option<String>,
    port: Option<u16>,
) -> Result<ExitCode> {
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    let metrics = ratechat_server::metrics::install_recorder()
        .context("Failed to install metrics recorder")?;
    let command_log = Arc::new(FileCommandLog::new(&settings.logging.command_log_path));

    let server = RelayServer::new(
        ServerConfig::from(&settings.server),
        rate_client(&settings),
        command_log,
        metrics,
    );
    let (addr, handle) = server.listen().await.context("Failed to bind server")?;
    tracing::info!(
        %addr,
        upstream = %settings.exchange.base_url,
        command_log = %settings.logging.command_log_path,
        "ratechat relay ready on ws://{addr}/ws"
    );

    shutdown_signal().await;

    tracing::info!("shutting down");
    let clean = server
        .shutdown()
        .graceful_shutdown(vec![handle], DEFAULT_SHUTDOWN_TIMEOUT)
        .await;
    tracing::info!(clean, "shutdown complete");
    Ok(ExitCode::SUCCESS)
}

async fn rates(settings: &RelaySettings, num_days: u64, extras: &[String]) -> Result<ExitCode> {
    let currencies = CurrencySet::with_extras(extras);
    match rate_client(settings).collect(num_days, &currencies).await {
        Ok(result) => {
            print!("{}", table::render(&result));
            Ok(ExitCode::SUCCESS)
        }
        Err(ExchangeError::MaxDaysExceeded { .. }) => {
            eprintln!("{MAX_DAYS_MESSAGE}");
            Ok(ExitCode::FAILURE)
        }
    }
}
