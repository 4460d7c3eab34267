//! CLI commands and handlers
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::app::{parse_slippage, AppCfg};
use crate::application::services::WithdrawalService;
use crate::application::siphon::SiphonService;
use crate::domain::debt::{StaticVault, VaultState};
use crate::domain::position::{PositionSource, StaticPosition};
use crate::domain::slippage::{self, SlippageBounds};
use crate::infrastructure::balancer::BoostedExitEncoder;
use crate::infrastructure::simulation::PaperAvatar;
use crate::report::{PlanReport, SimulationReport, SiphonReport};
use crate::shared::types::{Position, TOKEN_DECIMALS};
use crate::shared::utils::{format_amount, parse_amount};

#[derive(Parser, Debug)]
#[command(name = "liquidity-planner")]
#[command(version, about = "Plans withdrawals from a staked Balancer boosted-pool position")]
pub struct Cli {
    /// Path to config file
    #[arg(long, global = true, default_value = "Config.toml")]
    pub config: String,

    /// Log level (overrides config)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Slippage tolerance as an 18-decimal fraction (overrides config)
    #[arg(long, global = true)]
    pub slippage: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the instruction plan for a requested asset amount
    Plan {
        /// Asset amount to withdraw, in wei
        #[arg(long)]
        requested: String,

        /// Unstaked receipt token balance
        #[arg(long)]
        unstaked: String,

        /// Receipt tokens staked in the gauge
        #[arg(long)]
        staked: String,
    },

    /// Forecast the asset value of the whole position
    Value {
        #[arg(long)]
        unstaked: String,

        #[arg(long)]
        staked: String,
    },

    /// Slippage band around a forecast
    Bounds {
        #[arg(long)]
        forecast: String,

        /// Tolerance for this call only
        #[arg(long)]
        tolerance: Option<String>,
    },

    /// Plan, then execute against a paper avatar holding the given balances
    Simulate {
        #[arg(long)]
        requested: String,

        #[arg(long)]
        unstaked: String,

        #[arg(long)]
        staked: String,
    },

    /// Check a debt vault's ratio and plan the withdrawal that restores it
    Siphon {
        /// Locked collateral, 18 decimals
        #[arg(long)]
        ink: String,

        /// Normalized debt, 18 decimals
        #[arg(long)]
        art: String,

        /// Accumulated debt rate, 27 decimals
        #[arg(long)]
        rate: String,

        /// Collateral price over liquidation ratio, 27 decimals
        #[arg(long)]
        spot: String,

        /// Liquidation ratio, 27 decimals
        #[arg(long)]
        mat: String,

        #[arg(long)]
        unstaked: String,

        #[arg(long)]
        staked: String,
    },
}

#[derive(Debug, Serialize)]
struct ValueOutput {
    value: alloy_primitives::U256,
    value_ui: String,
    bounds: SlippageBounds,
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute the selected command
    pub async fn execute(command: Commands, cfg: AppCfg) -> Result<()> {
        match command {
            Commands::Plan {
                requested,
                unstaked,
                staked,
            } => Self::execute_plan_command(&requested, &unstaked, &staked, cfg).await,
            Commands::Value { unstaked, staked } => {
                Self::execute_value_command(&unstaked, &staked, cfg).await
            }
            Commands::Bounds { forecast, tolerance } => {
                Self::execute_bounds_command(&forecast, tolerance.as_deref(), cfg)
            }
            Commands::Simulate {
                requested,
                unstaked,
                staked,
            } => Self::execute_simulate_command(&requested, &unstaked, &staked, cfg).await,
            Commands::Siphon {
                ink,
                art,
                rate,
                spot,
                mat,
                unstaked,
                staked,
            } => {
                let state = VaultState {
                    ink: parse_amount(&ink).context("--ink")?,
                    art: parse_amount(&art).context("--art")?,
                    rate: parse_amount(&rate).context("--rate")?,
                    spot: parse_amount(&spot).context("--spot")?,
                    mat: parse_amount(&mat).context("--mat")?,
                };
                Self::execute_siphon_command(state, &unstaked, &staked, cfg).await
            }
        }
    }

    fn service(position: Arc<dyn PositionSource>, cfg: &AppCfg) -> Result<WithdrawalService> {
        Ok(WithdrawalService::new(
            position,
            cfg.build_curve()?,
            Arc::new(BoostedExitEncoder::new(cfg.contracts.clone())),
            cfg.slippage,
        ))
    }

    async fn execute_plan_command(requested: &str, unstaked: &str, staked: &str, cfg: AppCfg) -> Result<()> {
        let requested = parse_amount(requested).context("--requested")?;
        let position = parse_position(unstaked, staked)?;

        let service = Self::service(Arc::new(StaticPosition(position)), &cfg)?;
        let planned = service.plan_detailed(requested).await?;
        let report = PlanReport::new(&planned, cfg.slippage.bips());

        println!("{}", report.to_json()?);
        Ok(())
    }

    async fn execute_value_command(unstaked: &str, staked: &str, cfg: AppCfg) -> Result<()> {
        let position = parse_position(unstaked, staked)?;
        let service = Self::service(Arc::new(StaticPosition(position)), &cfg)?;

        let value = service.current_position_value().await?;
        info!("Position value: {}", format_amount(value, TOKEN_DECIMALS));

        let output = ValueOutput {
            value,
            value_ui: format_amount(value, TOKEN_DECIMALS),
            bounds: service.bounds(value),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn execute_bounds_command(forecast: &str, tolerance: Option<&str>, cfg: AppCfg) -> Result<()> {
        let forecast = parse_amount(forecast).context("--forecast")?;
        let tolerance = match tolerance {
            Some(raw) => parse_slippage(raw)?,
            None => cfg.slippage,
        };

        let bounds = slippage::bounds(forecast, tolerance);
        info!(
            "{} bips around {}: [{}, {}]",
            tolerance.bips(),
            forecast,
            bounds.lower,
            bounds.upper
        );
        println!("{}", serde_json::to_string_pretty(&bounds)?);
        Ok(())
    }

    async fn execute_simulate_command(requested: &str, unstaked: &str, staked: &str, cfg: AppCfg) -> Result<()> {
        let requested = parse_amount(requested).context("--requested")?;
        let position = parse_position(unstaked, staked)?;

        let avatar = Arc::new(PaperAvatar::new(cfg.contracts.clone(), cfg.build_curve()?, position));
        let service = Self::service(avatar.clone(), &cfg)?;

        let planned = service.plan_detailed(requested).await?;
        let plan = PlanReport::new(&planned, cfg.slippage.bips());

        let before = avatar.ledger().await;
        let outcome = avatar.exec_all(&planned.instructions).await;
        let after = avatar.ledger().await;

        let mut report = SimulationReport::new(plan, before, after);
        match outcome {
            Ok(()) => info!(
                "Simulation received {} (within bounds: {})",
                report.received_ui, report.within_bounds
            ),
            Err(e) => {
                warn!("Simulation stopped: {}", e);
                report = report.with_error(e.to_string());
            }
        }

        println!("{}", report.to_json()?);
        Ok(())
    }

    async fn execute_siphon_command(state: VaultState, unstaked: &str, staked: &str, cfg: AppCfg) -> Result<()> {
        let position = parse_position(unstaked, staked)?;
        let withdrawals = Self::service(Arc::new(StaticPosition(position)), &cfg)?;
        let siphon = SiphonService::new(Arc::new(StaticVault(state)), cfg.debt, withdrawals);

        let check = siphon.check().await?;
        match &check.plan {
            Some(planned) => info!(
                "Repaying {} needs {}",
                format_amount(check.delta, TOKEN_DECIMALS),
                planned.withdrawal.name()
            ),
            None => info!("Vault ratio {} needs no rebalance", check.ratio),
        }

        let report = SiphonReport::new(&check, cfg.debt, cfg.slippage.bips());
        println!("{}", report.to_json()?);
        Ok(())
    }
}

fn parse_position(unstaked: &str, staked: &str) -> Result<Position> {
    Ok(Position::new(
        parse_amount(unstaked).context("--unstaked")?,
        parse_amount(staked).context("--staked")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plan_command() {
        let cli = Cli::try_parse_from([
            "liquidity-planner",
            "--slippage",
            "5000000000000000",
            "plan",
            "--requested",
            "1_000",
            "--unstaked",
            "10",
            "--staked",
            "20",
        ])
        .unwrap();

        assert_eq!(cli.config, "Config.toml");
        assert_eq!(cli.slippage.as_deref(), Some("5000000000000000"));
        match cli.command {
            Commands::Plan { requested, .. } => assert_eq!(requested, "1_000"),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "liquidity-planner",
            "bounds",
            "--forecast",
            "100",
            "--log-level",
            "debug",
            "--config",
            "other.toml",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, "other.toml");
        assert!(matches!(cli.command, Commands::Bounds { tolerance: None, .. }));
    }

    #[test]
    fn test_missing_argument_rejected() {
        assert!(Cli::try_parse_from(["liquidity-planner", "simulate", "--requested", "1"]).is_err());
    }

    #[test]
    fn test_parse_siphon_command() {
        let cli = Cli::try_parse_from([
            "liquidity-planner",
            "siphon",
            "--ink",
            "1000000000000000000",
            "--art",
            "1000000000000000000000",
            "--rate",
            "1100000000000000000000000000",
            "--spot",
            "2000000000000000000000000000000",
            "--mat",
            "1500000000000000000000000000",
            "--unstaked",
            "1",
            "--staked",
            "2",
        ])
        .unwrap();

        match cli.command {
            Commands::Siphon { rate, staked, .. } => {
                assert_eq!(rate, "1100000000000000000000000000");
                assert_eq!(staked, "2");
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(Cli::try_parse_from(["liquidity-planner", "siphon", "--ink", "1"]).is_err());
    }

    #[test]
    fn test_parse_position() {
        let position = parse_position("1_000", "0x10").unwrap();
        assert_eq!(position.unstaked, alloy_primitives::U256::from(1_000u64));
        assert_eq!(position.staked, alloy_primitives::U256::from(16u64));
        assert!(parse_position("abc", "1").is_err());
    }
}
