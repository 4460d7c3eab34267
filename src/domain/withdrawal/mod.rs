//! Withdrawal domain - deciding how to unwind the position for a requested amount

mod planner;

pub use planner::WithdrawalPlanner;

use serde::{Deserialize, Serialize};

use crate::domain::execution::{ExitRequest, InstructionEncoder};
use crate::shared::errors::EncodingError;
use crate::shared::types::{Amount, WithdrawalPlan};

/// Outcome of the planning decision, before encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Withdrawal {
    /// Request meets or exceeds what the whole position yields: drain everything
    FullExit {
        unstake: Amount,
        bpt_in: Amount,
        min_amount_out: Amount,
    },
    /// Unstaked receipt tokens cover the request
    ExitOnly { amount_out: Amount, bpt_in: Amount },
    /// Part of the staked balance must be withdrawn from the gauge first
    PartialUnstake {
        unstake: Amount,
        amount_out: Amount,
        bpt_in: Amount,
    },
}

impl Withdrawal {
    pub fn name(&self) -> &'static str {
        match self {
            Withdrawal::FullExit { .. } => "full_exit",
            Withdrawal::ExitOnly { .. } => "exit_only",
            Withdrawal::PartialUnstake { .. } => "partial_unstake",
        }
    }

    /// Receipt tokens pulled out of the gauge
    pub fn unstake_amount(&self) -> Amount {
        match self {
            Withdrawal::FullExit { unstake, .. } | Withdrawal::PartialUnstake { unstake, .. } => {
                *unstake
            }
            Withdrawal::ExitOnly { .. } => Amount::ZERO,
        }
    }

    pub fn exit_request(&self) -> ExitRequest {
        match *self {
            Withdrawal::FullExit {
                bpt_in,
                min_amount_out,
                ..
            } => ExitRequest::GivenIn {
                bpt_in,
                min_amount_out,
            },
            Withdrawal::ExitOnly { amount_out, bpt_in }
            | Withdrawal::PartialUnstake {
                amount_out, bpt_in, ..
            } => ExitRequest::GivenOut {
                amount_out,
                max_bpt_in: bpt_in,
            },
        }
    }

    /// Lower the decision to instructions: unstake (when nonzero) then exit
    pub fn to_instructions(
        &self,
        encoder: &dyn InstructionEncoder,
    ) -> Result<WithdrawalPlan, EncodingError> {
        let mut instructions = Vec::with_capacity(2);

        let unstake = self.unstake_amount();
        if !unstake.is_zero() {
            instructions.push(encoder.encode_unstake(unstake)?);
        }
        instructions.push(encoder.encode_exit(&self.exit_request())?);

        Ok(instructions)
    }
}
