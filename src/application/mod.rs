//! Application layer - use cases and services

pub mod commands;
pub mod services;
pub mod siphon;

pub use commands::{Cli, CommandExecutor, Commands};
pub use services::{PlannedWithdrawal, WithdrawalService};
pub use siphon::{SiphonCheck, SiphonService};
