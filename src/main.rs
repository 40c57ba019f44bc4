use clap::Parser;

use alcove::cli::Cli;
use alcove::config::Config;
use alcove::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(level)
        .init();

    let cfg = Config::load(cli.config.as_deref())?.merge_cli(&cli)?;
    let app = server::build(&cfg)?;

    tokio::select! {
        res = server::listener::run(&cfg.server, app) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
