//! In-memory avatar that decodes and applies planned instructions

use alloy_primitives::{I256, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::pool::ExitCurve;
use crate::domain::position::PositionSource;
use crate::infrastructure::balancer::abi::{
    ILiquidityGauge, IVault, SwapKind, ASSET_INDEX, BPT_INDEX, LINEAR_BPT_INDEX,
};
use crate::infrastructure::balancer::BoostedPoolContracts;
use crate::shared::errors::{ExecutionError, OracleError};
use crate::shared::types::{Amount, Instruction, Position};

/// Balances held by the paper avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaperLedger {
    pub unstaked: Amount,
    pub staked: Amount,
    pub asset: Amount,
}

impl PaperLedger {
    pub fn position(&self) -> Position {
        Position::new(self.unstaked, self.staked)
    }
}

/// Executes gauge withdrawals and Vault exits against a [`PaperLedger`],
/// pricing exits with the supplied curve.
pub struct PaperAvatar {
    contracts: BoostedPoolContracts,
    curve: Arc<dyn ExitCurve>,
    ledger: RwLock<PaperLedger>,
}

impl PaperAvatar {
    pub fn new(contracts: BoostedPoolContracts, curve: Arc<dyn ExitCurve>, position: Position) -> Self {
        Self {
            contracts,
            curve,
            ledger: RwLock::new(PaperLedger {
                unstaked: position.unstaked,
                staked: position.staked,
                asset: U256::ZERO,
            }),
        }
    }

    pub async fn ledger(&self) -> PaperLedger {
        *self.ledger.read().await
    }

    /// Apply instructions one at a time, stopping at the first failure.
    /// Instructions applied before the failure stay applied.
    pub async fn exec_all(&self, instructions: &[Instruction]) -> Result<(), ExecutionError> {
        for (i, instruction) in instructions.iter().enumerate() {
            if let Err(e) = self.exec(instruction).await {
                warn!("Instruction {} of {} failed: {}", i + 1, instructions.len(), e);
                return Err(e);
            }
        }
        Ok(())
    }

    pub async fn exec(&self, instruction: &Instruction) -> Result<(), ExecutionError> {
        if instruction.target == self.contracts.gauge {
            self.exec_gauge(instruction).await
        } else if instruction.target == self.contracts.vault {
            self.exec_vault(instruction).await
        } else {
            Err(ExecutionError::UnknownTarget(instruction.target))
        }
    }

    async fn exec_gauge(&self, instruction: &Instruction) -> Result<(), ExecutionError> {
        if instruction.selector() != Some(ILiquidityGauge::withdrawCall::SELECTOR) {
            return Err(unsupported(instruction));
        }
        let call = ILiquidityGauge::withdrawCall::abi_decode(&instruction.payload)
            .map_err(|e| ExecutionError::Decode(e.to_string()))?;
        let amount = call._value;

        let mut ledger = self.ledger.write().await;
        if ledger.staked < amount {
            return Err(ExecutionError::InsufficientBalance {
                tier: "staked",
                required: amount,
                available: ledger.staked,
            });
        }
        let unstaked = checked_credit(ledger.unstaked, amount, "unstaked")?;
        ledger.staked -= amount;
        ledger.unstaked = unstaked;
        info!("Paper unstake: {} BPT withdrawn from gauge", amount);
        Ok(())
    }

    async fn exec_vault(&self, instruction: &Instruction) -> Result<(), ExecutionError> {
        if instruction.selector() != Some(IVault::batchSwapCall::SELECTOR) {
            return Err(unsupported(instruction));
        }
        let call = IVault::batchSwapCall::abi_decode(&instruction.payload)
            .map_err(|e| ExecutionError::Decode(e.to_string()))?;
        self.check_route(&call)?;

        let first_amount = call.swaps[0].amount;
        let (bpt_in, amount_out) = match SwapKind::from_u8(call.kind) {
            Some(SwapKind::GivenIn) => (first_amount, self.curve.out_given_in(first_amount).await?),
            Some(SwapKind::GivenOut) => (self.curve.in_given_out(first_amount).await?, first_amount),
            None => {
                return Err(ExecutionError::Decode(format!("unknown swap kind {}", call.kind)));
            }
        };

        let bpt_delta = signed(bpt_in)?;
        if bpt_delta > call.limits[BPT_INDEX] {
            return Err(ExecutionError::LimitExceeded(format!(
                "BPT in {} above limit {}",
                bpt_in, call.limits[BPT_INDEX]
            )));
        }
        let asset_delta = -signed(amount_out)?;
        if asset_delta > call.limits[ASSET_INDEX] {
            return Err(ExecutionError::LimitExceeded(format!(
                "asset out {} below limit {}",
                amount_out, call.limits[ASSET_INDEX]
            )));
        }

        let mut ledger = self.ledger.write().await;
        if ledger.unstaked < bpt_in {
            return Err(ExecutionError::InsufficientBalance {
                tier: "unstaked",
                required: bpt_in,
                available: ledger.unstaked,
            });
        }
        let asset = checked_credit(ledger.asset, amount_out, "asset")?;
        ledger.unstaked -= bpt_in;
        ledger.asset = asset;
        info!("Paper exit: {} BPT -> {} asset", bpt_in, amount_out);
        Ok(())
    }

    fn check_route(&self, call: &IVault::batchSwapCall) -> Result<(), ExecutionError> {
        let c = &self.contracts;
        let assets_match = call.assets.len() == 3
            && call.assets[BPT_INDEX] == c.bpt
            && call.assets[LINEAR_BPT_INDEX] == c.linear_bpt
            && call.assets[ASSET_INDEX] == c.asset;
        if !assets_match || call.swaps.len() != 2 || call.limits.len() != 3 {
            return Err(ExecutionError::Decode("batch swap does not follow the exit route".to_string()));
        }
        if call.funds.sender != c.avatar || call.funds.recipient != c.avatar {
            return Err(ExecutionError::Decode("batch swap funds are not the avatar's".to_string()));
        }
        Ok(())
    }
}

fn unsupported(instruction: &Instruction) -> ExecutionError {
    ExecutionError::UnsupportedCall {
        target: instruction.target,
        selector: instruction
            .selector()
            .map(|selector| format!("0x{}", hex::encode(selector)))
            .unwrap_or_else(|| "none".to_string()),
    }
}

fn checked_credit(balance: Amount, amount: Amount, tier: &'static str) -> Result<Amount, ExecutionError> {
    balance
        .checked_add(amount)
        .ok_or(ExecutionError::BalanceOverflow { tier })
}

fn signed(amount: Amount) -> Result<I256, ExecutionError> {
    if amount > I256::MAX.into_raw() {
        return Err(ExecutionError::LimitExceeded(format!("{} exceeds int256", amount)));
    }
    Ok(I256::from_raw(amount))
}

#[async_trait]
impl PositionSource for PaperAvatar {
    async fn balance_unstaked(&self) -> Result<Amount, OracleError> {
        Ok(self.ledger.read().await.unstaked)
    }

    async fn balance_staked(&self) -> Result<Amount, OracleError> {
        Ok(self.ledger.read().await.staked)
    }
}
