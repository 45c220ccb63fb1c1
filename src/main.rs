use banksim::application::server::BankingServer;
use banksim::config::ServerConfig;
use banksim::interfaces::http;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .into_diagnostic()?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let server = if config.no_defaults {
        BankingServer::new()
    } else {
        BankingServer::with_defaults().await.into_diagnostic()?
    };
    info!(
        bind = %config.bind,
        defaults = !config.no_defaults,
        "banksim starting"
    );

    let listener = TcpListener::bind(config.bind).await.into_diagnostic()?;
    http::serve(listener, server).await.into_diagnostic()?;

    Ok(())
}
