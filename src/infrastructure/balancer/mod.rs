//! Balancer boosted-pool calls: gauge withdrawals and Vault batch-swap exits

pub mod abi;
mod encoder;

pub use encoder::{BoostedExitEncoder, BoostedPoolContracts};
