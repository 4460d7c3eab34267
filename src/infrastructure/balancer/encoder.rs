use alloy_primitives::{Address, Bytes, B256, I256, U256};
use alloy_sol_types::SolCall;
use tracing::debug;

use super::abi::{ILiquidityGauge, IVault, SwapKind, ASSET_INDEX, BPT_INDEX, LINEAR_BPT_INDEX};
use crate::domain::execution::{ExitRequest, InstructionEncoder};
use crate::shared::errors::EncodingError;
use crate::shared::types::{Amount, Instruction};

/// Addresses and pool ids of one boosted-pool position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoostedPoolContracts {
    pub avatar: Address,
    pub gauge: Address,
    pub vault: Address,
    pub bpt: Address,
    pub linear_bpt: Address,
    pub asset: Address,
    pub pool_id: B256,
    pub linear_pool_id: B256,
}

/// Encodes gauge withdrawals and two-hop Vault batch swaps
/// (boosted BPT -> linear BPT -> asset) on behalf of the avatar.
#[derive(Debug, Clone)]
pub struct BoostedExitEncoder {
    contracts: BoostedPoolContracts,
}

impl BoostedExitEncoder {
    pub fn new(contracts: BoostedPoolContracts) -> Self {
        Self { contracts }
    }

    pub fn contracts(&self) -> &BoostedPoolContracts {
        &self.contracts
    }

    fn assets(&self) -> Vec<Address> {
        let mut assets = vec![Address::ZERO; 3];
        assets[BPT_INDEX] = self.contracts.bpt;
        assets[LINEAR_BPT_INDEX] = self.contracts.linear_bpt;
        assets[ASSET_INDEX] = self.contracts.asset;
        assets
    }

    fn funds(&self) -> IVault::FundManagement {
        IVault::FundManagement {
            sender: self.contracts.avatar,
            fromInternalBalance: false,
            recipient: self.contracts.avatar,
            toInternalBalance: false,
        }
    }

    fn step(pool_id: B256, asset_in: usize, asset_out: usize, amount: Amount) -> IVault::BatchSwapStep {
        IVault::BatchSwapStep {
            poolId: pool_id,
            assetInIndex: U256::from(asset_in),
            assetOutIndex: U256::from(asset_out),
            amount,
            userData: Bytes::new(),
        }
    }

    /// Vault limits: positive is the most the avatar sends, negative the least it receives
    fn limits(max_bpt_in: Amount, min_asset_out: Amount) -> Result<Vec<I256>, EncodingError> {
        let mut limits = vec![I256::ZERO; 3];
        limits[BPT_INDEX] = signed(max_bpt_in)?;
        limits[ASSET_INDEX] = -signed(min_asset_out)?;
        Ok(limits)
    }
}

fn signed(amount: Amount) -> Result<I256, EncodingError> {
    if amount > I256::MAX.into_raw() {
        return Err(EncodingError::LimitOutOfRange(amount));
    }
    Ok(I256::from_raw(amount))
}

impl InstructionEncoder for BoostedExitEncoder {
    fn encode_unstake(&self, amount: Amount) -> Result<Instruction, EncodingError> {
        debug!("Encoding gauge withdraw of {}", amount);
        let payload = ILiquidityGauge::withdrawCall { _value: amount }.abi_encode();
        Ok(Instruction::call(self.contracts.gauge, payload))
    }

    fn encode_exit(&self, request: &ExitRequest) -> Result<Instruction, EncodingError> {
        let c = &self.contracts;
        let (kind, swaps, limits) = match *request {
            ExitRequest::GivenIn {
                bpt_in,
                min_amount_out,
            } => (
                SwapKind::GivenIn,
                vec![
                    Self::step(c.pool_id, BPT_INDEX, LINEAR_BPT_INDEX, bpt_in),
                    Self::step(c.linear_pool_id, LINEAR_BPT_INDEX, ASSET_INDEX, U256::ZERO),
                ],
                Self::limits(bpt_in, min_amount_out)?,
            ),
            // GIVEN_OUT hops are listed from the asset end backwards
            ExitRequest::GivenOut {
                amount_out,
                max_bpt_in,
            } => (
                SwapKind::GivenOut,
                vec![
                    Self::step(c.linear_pool_id, LINEAR_BPT_INDEX, ASSET_INDEX, amount_out),
                    Self::step(c.pool_id, BPT_INDEX, LINEAR_BPT_INDEX, U256::ZERO),
                ],
                Self::limits(max_bpt_in, amount_out)?,
            ),
        };

        debug!("Encoding {:?} batch swap exit: {:?}", kind, request);
        let payload = IVault::batchSwapCall {
            kind: kind as u8,
            swaps,
            assets: self.assets(),
            funds: self.funds(),
            limits,
            deadline: U256::MAX,
        }
        .abi_encode();

        Ok(Instruction::call(c.vault, payload))
    }
}
