//! Debt domain - collateralised debt position and the ratio it is kept at

use alloy_primitives::U256;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::errors::{AppError, OracleError};
use crate::shared::types::{Amount, RAY};

/// Raw vault readings.
///
/// `ink` and `art` are 18-decimal amounts; `rate`, `spot` and `mat` are
/// 27-decimal fixed point. `spot` is the collateral price already divided
/// by the liquidation ratio `mat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VaultState {
    pub ink: Amount,
    pub art: Amount,
    pub rate: U256,
    pub spot: U256,
    pub mat: U256,
}

impl VaultState {
    /// Collateral valued in the debt asset
    pub fn collateral_value(&self) -> Result<Amount, OracleError> {
        let safe_value = self
            .ink
            .checked_mul(self.spot)
            .ok_or(OracleError::Overflow("collateral value"))?
            / RAY;
        Ok(safe_value
            .checked_mul(self.mat)
            .ok_or(OracleError::Overflow("collateral value"))?
            / RAY)
    }

    /// Outstanding debt, rounded up
    pub fn debt(&self) -> Result<Amount, OracleError> {
        Ok(self
            .art
            .checked_mul(self.rate)
            .ok_or(OracleError::Overflow("debt"))?
            .div_ceil(RAY))
    }

    /// Collateral value over debt, 27-decimal fixed point. `U256::MAX` when
    /// there is no debt.
    pub fn ratio(&self) -> Result<U256, OracleError> {
        let debt = self.debt()?;
        if debt.is_zero() {
            return Ok(U256::MAX);
        }
        Ok(self
            .collateral_value()?
            .checked_mul(RAY)
            .ok_or(OracleError::Overflow("ratio"))?
            / debt)
    }
}

/// Ratio the position is rebalanced to, and the ratio that triggers it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioSettings {
    target: U256,
    trigger: U256,
}

impl RatioSettings {
    pub fn new(target: U256, trigger: U256) -> Result<Self, AppError> {
        if trigger.is_zero() {
            return Err(AppError::ConfigError("ratio trigger must be positive".to_string()));
        }
        if trigger > target {
            return Err(AppError::ConfigError(format!(
                "ratio trigger {} above target {}",
                trigger, target
            )));
        }
        Ok(Self { target, trigger })
    }

    pub fn target(&self) -> U256 {
        self.target
    }

    pub fn trigger(&self) -> U256 {
        self.trigger
    }

    pub fn needs_rebalance(&self, ratio: U256) -> bool {
        ratio < self.trigger
    }

    /// Debt to repay to bring the vault back to the target ratio; zero
    /// while the ratio stays at or above the trigger.
    pub fn delta(&self, state: &VaultState) -> Result<Amount, OracleError> {
        if !self.needs_rebalance(state.ratio()?) {
            return Ok(U256::ZERO);
        }
        let debt_at_target = state
            .collateral_value()?
            .checked_mul(RAY)
            .ok_or(OracleError::Overflow("debt at target"))?
            / self.target;
        Ok(state.debt()?.saturating_sub(debt_at_target))
    }
}

/// Live vault readings
#[async_trait]
pub trait VaultSource: Send + Sync {
    async fn vault_state(&self) -> Result<VaultState, OracleError>;
}

/// Fixed readings, for callers that already hold them
#[derive(Debug, Clone, Copy)]
pub struct StaticVault(pub VaultState);

#[async_trait]
impl VaultSource for StaticVault {
    async fn vault_state(&self) -> Result<VaultState, OracleError> {
        Ok(self.0)
    }
}
