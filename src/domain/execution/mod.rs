//! Execution domain - turning withdrawal decisions into avatar instructions

use serde::{Deserialize, Serialize};

use crate::shared::errors::EncodingError;
use crate::shared::types::{Amount, Instruction};

/// How the pool exit is sized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExitRequest {
    /// Spend exactly `bpt_in`, accept no less than `min_amount_out`
    GivenIn { bpt_in: Amount, min_amount_out: Amount },
    /// Receive exactly `amount_out`, spend no more than `max_bpt_in`
    GivenOut { amount_out: Amount, max_bpt_in: Amount },
}

impl ExitRequest {
    /// Receipt tokens the exit is allowed to consume
    pub fn bpt_budget(&self) -> Amount {
        match self {
            ExitRequest::GivenIn { bpt_in, .. } => *bpt_in,
            ExitRequest::GivenOut { max_bpt_in, .. } => *max_bpt_in,
        }
    }
}

/// Builds the unstake and exit calls the avatar will execute
pub trait InstructionEncoder: Send + Sync {
    fn encode_unstake(&self, amount: Amount) -> Result<Instruction, EncodingError>;

    fn encode_exit(&self, request: &ExitRequest) -> Result<Instruction, EncodingError>;
}
