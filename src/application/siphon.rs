//! Siphon service - keeps a debt vault at its target ratio by planning
//! withdrawals that cover the shortfall

use alloy_primitives::U256;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::services::{PlannedWithdrawal, WithdrawalService};
use crate::domain::debt::{RatioSettings, VaultSource, VaultState};
use crate::shared::errors::PlanError;
use crate::shared::types::Amount;

/// Vault reading and what it calls for
#[derive(Debug, Clone)]
pub struct SiphonCheck {
    pub state: VaultState,
    pub ratio: U256,
    pub delta: Amount,
    pub plan: Option<PlannedWithdrawal>,
}

pub struct SiphonService {
    vault: Arc<dyn VaultSource>,
    settings: RatioSettings,
    withdrawals: WithdrawalService,
}

impl SiphonService {
    pub fn new(vault: Arc<dyn VaultSource>, settings: RatioSettings, withdrawals: WithdrawalService) -> Self {
        Self {
            vault,
            settings,
            withdrawals,
        }
    }

    pub fn settings(&self) -> RatioSettings {
        self.settings
    }

    pub async fn ratio(&self) -> Result<U256, PlanError> {
        Ok(self.vault.vault_state().await?.ratio()?)
    }

    /// Debt the withdrawal has to cover, zero when the vault is healthy
    pub async fn delta(&self) -> Result<Amount, PlanError> {
        let state = self.vault.vault_state().await?;
        Ok(self.settings.delta(&state)?)
    }

    /// Reads the vault once and plans a withdrawal of the delta if the
    /// ratio fell under the trigger
    pub async fn check(&self) -> Result<SiphonCheck, PlanError> {
        let state = self.vault.vault_state().await?;
        let ratio = state.ratio()?;
        let delta = self.settings.delta(&state)?;

        if delta.is_zero() {
            debug!("Vault ratio {} at or above trigger {}", ratio, self.settings.trigger());
            return Ok(SiphonCheck {
                state,
                ratio,
                delta,
                plan: None,
            });
        }

        info!(
            "Vault ratio {} under trigger {}, withdrawing {} to repay",
            ratio,
            self.settings.trigger(),
            delta
        );
        let plan = self.withdrawals.plan_detailed(delta).await?;
        Ok(SiphonCheck {
            state,
            ratio,
            delta,
            plan: Some(plan),
        })
    }
}
