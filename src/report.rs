// src/report.rs
use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::PlannedWithdrawal;
use crate::application::siphon::SiphonCheck;
use crate::domain::debt::{RatioSettings, VaultState};
use crate::domain::slippage::SlippageBounds;
use crate::domain::withdrawal::Withdrawal;
use crate::infrastructure::simulation::PaperLedger;
use crate::shared::types::{Instruction, TOKEN_DECIMALS};
use crate::shared::utils::{format_amount, generate_id};

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanReport {
    pub id: String,
    pub requested_out: U256,
    pub requested_out_ui: String,
    pub unstaked: U256,
    pub staked: U256,
    pub withdrawal: Withdrawal,
    /// Band the received asset should land in
    pub expected_out: SlippageBounds,
    pub slippage_bips: U256,
    pub instructions: Vec<InstructionDetails>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstructionDetails {
    pub target: Address,
    pub value: U256,
    pub selector: Option<String>,
    pub payload: String,
}

impl From<&Instruction> for InstructionDetails {
    fn from(ix: &Instruction) -> Self {
        Self {
            target: ix.target,
            value: ix.value,
            selector: ix.selector().map(|s| format!("0x{}", hex::encode(s))),
            payload: format!("0x{}", hex::encode(&ix.payload)),
        }
    }
}

impl PlanReport {
    pub fn new(planned: &PlannedWithdrawal, slippage_bips: U256) -> Self {
        Self {
            id: generate_id(),
            requested_out: planned.requested_out,
            requested_out_ui: format_amount(planned.requested_out, TOKEN_DECIMALS),
            unstaked: planned.position.unstaked,
            staked: planned.position.staked,
            withdrawal: planned.withdrawal,
            expected_out: planned.expected_out,
            slippage_bips,
            instructions: planned.instructions.iter().map(InstructionDetails::from).collect(),
            timestamp: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Plan plus the paper avatar's balances around its execution
#[derive(Debug, Serialize, Deserialize)]
pub struct SimulationReport {
    pub plan: PlanReport,
    pub before: PaperLedger,
    pub after: PaperLedger,
    pub received: U256,
    pub received_ui: String,
    pub within_bounds: bool,
    pub error: Option<String>,
}

impl SimulationReport {
    pub fn new(plan: PlanReport, before: PaperLedger, after: PaperLedger) -> Self {
        let received = after.asset.saturating_sub(before.asset);
        Self {
            within_bounds: plan.expected_out.contains(received),
            received_ui: format_amount(received, TOKEN_DECIMALS),
            received,
            plan,
            before,
            after,
            error: None,
        }
    }

    pub fn with_error(mut self, error: String) -> Self {
        self.within_bounds = false;
        self.error = Some(error);
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Vault health and, when it is under the trigger, the withdrawal that
/// covers the repayment
#[derive(Debug, Serialize, Deserialize)]
pub struct SiphonReport {
    pub vault: VaultState,
    pub ratio: U256,
    pub ratio_target: U256,
    pub ratio_trigger: U256,
    pub needs_rebalance: bool,
    pub delta: U256,
    pub delta_ui: String,
    pub plan: Option<PlanReport>,
}

impl SiphonReport {
    pub fn new(check: &SiphonCheck, settings: RatioSettings, slippage_bips: U256) -> Self {
        Self {
            vault: check.state,
            ratio: check.ratio,
            ratio_target: settings.target(),
            ratio_trigger: settings.trigger(),
            needs_rebalance: settings.needs_rebalance(check.ratio),
            delta: check.delta,
            delta_ui: format_amount(check.delta, TOKEN_DECIMALS),
            plan: check.plan.as_ref().map(|p| PlanReport::new(p, slippage_bips)),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
