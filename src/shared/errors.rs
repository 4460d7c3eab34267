//! Error handling for the application

use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Failures of the external balance and quote collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("Balance query failed: {0}")]
    BalanceQuery(String),

    #[error("Quote failed: {0}")]
    Quote(String),

    #[error("Insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity { requested: U256, available: U256 },

    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),
}

/// Instruction encoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Amount {0} does not fit a signed 256-bit limit")]
    LimitOutOfRange(U256),
}

/// Planning errors. Planning either returns a complete plan or one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// Slippage tolerance errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlippageError {
    #[error("Slippage tolerance {0} exceeds 100% (1e18)")]
    AboveOneHundredPercent(U256),
}

/// Paper execution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Unknown call target: {0}")]
    UnknownTarget(Address),

    #[error("Unsupported call on {target}: selector {selector}")]
    UnsupportedCall { target: Address, selector: String },

    #[error("Failed to decode payload: {0}")]
    Decode(String),

    #[error("Insufficient {tier} balance: required {required}, available {available}")]
    InsufficientBalance {
        tier: &'static str,
        required: U256,
        available: U256,
    },

    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("{tier} balance would overflow")]
    BalanceOverflow { tier: &'static str },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Planning error: {0}")]
    PlanningError(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        AppError::PlanningError(err.to_string())
    }
}

impl From<OracleError> for AppError {
    fn from(err: OracleError) -> Self {
        AppError::PlanningError(err.to_string())
    }
}

impl From<SlippageError> for AppError {
    fn from(err: SlippageError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<ExecutionError> for AppError {
    fn from(err: ExecutionError) -> Self {
        AppError::ExecutionError(err.to_string())
    }
}
