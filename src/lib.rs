//! Liquidity planner - withdrawals from a staked Balancer boosted-pool position
//! Built with Domain-Driven Design principles

pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod report;
pub mod shared;

// Re-export main types for convenience
pub use application::{SiphonService, WithdrawalService};
pub use domain::debt::{RatioSettings, VaultState};
pub use domain::slippage::{SlippageBounds, SlippageTolerance};
pub use domain::withdrawal::{Withdrawal, WithdrawalPlanner};
pub use infrastructure::{BoostedExitEncoder, BoostedPoolContracts, LinearExitCurve, PaperAvatar};
pub use shared::types::{Amount, Instruction, Position, WithdrawalPlan, RAY};
