//! Domain layer - position, quotes, slippage, debt and the withdrawal decision

pub mod debt;
pub mod execution;
pub mod pool;
pub mod position;
pub mod slippage;
pub mod withdrawal;
