//! Common types used across the application

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::shared::errors::OracleError;

/// Token quantity in its smallest unit (18-decimal fixed point)
pub type Amount = U256;

/// 1.0 in 18-decimal fixed point
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// 1.0 in 27-decimal fixed point, the unit of debt-vault rates and ratios
pub const RAY: U256 = U256::from_limbs([11_515_845_246_265_065_472, 54_210_108, 0, 0]);

/// One basis point expressed in 18-decimal fixed point (1e14)
pub const WAD_PER_BIP: U256 = U256::from_limbs([100_000_000_000_000, 0, 0, 0]);

/// Basis points in 100%
pub const BIPS_DENOMINATOR: U256 = U256::from_limbs([10_000, 0, 0, 0]);

/// Token decimals of both the receipt token and the exit asset
pub const TOKEN_DECIMALS: u8 = 18;

/// Two-tier snapshot of the avatar's receipt-token holdings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub unstaked: Amount,
    pub staked: Amount,
}

impl Position {
    pub fn new(unstaked: Amount, staked: Amount) -> Self {
        Self { unstaked, staked }
    }

    /// Combined receipt-token balance across both tiers
    pub fn total(&self) -> Result<Amount, OracleError> {
        self.unstaked
            .checked_add(self.staked)
            .ok_or(OracleError::Overflow("position total"))
    }

    pub fn is_empty(&self) -> bool {
        self.unstaked.is_zero() && self.staked.is_zero()
    }
}

/// Already-encoded call handed to the avatar for execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub target: Address,
    pub value: Amount,
    pub payload: Bytes,
}

impl Instruction {
    pub fn call(target: Address, payload: impl Into<Bytes>) -> Self {
        Self {
            target,
            value: U256::ZERO,
            payload: payload.into(),
        }
    }

    /// First four bytes of the payload, if present
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.payload.get(..4).and_then(|s| s.try_into().ok())
    }
}

/// Ordered instruction list, consumed strictly in order by the executor
pub type WithdrawalPlan = Vec<Instruction>;
