use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use liquidity_planner::app::AppCfg;
use liquidity_planner::application::{Cli, CommandExecutor};
use liquidity_planner::shared::config::ConfigLoader;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_config(&cli.config)
        .with_context(|| format!("Loading {}", cli.config))?;

    // CLI flags > config file > defaults
    let app_cfg = AppCfg::from_config(config)?
        .with_overrides(cli.slippage.as_deref(), cli.log_level.as_deref())?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&app_cfg.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Slippage tolerance: {} bips", app_cfg.slippage.bips());
    CommandExecutor::execute(cli.command, app_cfg).await
}
