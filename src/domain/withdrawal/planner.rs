//! Withdrawal planner - unstake/exit decision for a requested asset amount

use tracing::{debug, info};

use super::Withdrawal;
use crate::domain::execution::InstructionEncoder;
use crate::domain::pool::ExitCurve;
use crate::shared::errors::PlanError;
use crate::shared::types::{Amount, Position, WithdrawalPlan};

/// Decides between full exit, exit-only and partial unstake.
///
/// Holds no state between calls: every decision is a function of the
/// requested amount, the position snapshot passed in, and the curve quotes.
pub struct WithdrawalPlanner<'a> {
    curve: &'a dyn ExitCurve,
}

impl<'a> WithdrawalPlanner<'a> {
    pub fn new(curve: &'a dyn ExitCurve) -> Self {
        Self { curve }
    }

    /// What exiting the whole position yields according to the curve
    pub async fn max_withdrawable(&self, position: &Position) -> Result<Amount, PlanError> {
        Ok(self.curve.out_given_in(position.total()?).await?)
    }

    pub async fn decide(
        &self,
        requested_out: Amount,
        position: &Position,
    ) -> Result<Withdrawal, PlanError> {
        let total = position.total()?;
        let max_withdrawable = self.curve.out_given_in(total).await?;

        if requested_out >= max_withdrawable {
            info!(
                "Requested {} >= withdrawable {}: full exit of {} BPT ({} staked)",
                requested_out, max_withdrawable, total, position.staked
            );
            return Ok(Withdrawal::FullExit {
                unstake: position.staked,
                bpt_in: total,
                min_amount_out: max_withdrawable,
            });
        }

        let bpt_needed = self.curve.in_given_out(requested_out).await?;

        if bpt_needed <= position.unstaked {
            info!(
                "Exit only: {} BPT of {} unstaked for {} out",
                bpt_needed, position.unstaked, requested_out
            );
            return Ok(Withdrawal::ExitOnly {
                amount_out: requested_out,
                bpt_in: bpt_needed,
            });
        }

        let shortfall = bpt_needed - position.unstaked;
        let unstake = if shortfall > position.staked {
            debug!(
                "Unstake of {} clamped to staked balance {}",
                shortfall, position.staked
            );
            position.staked
        } else {
            shortfall
        };

        info!(
            "Partial unstake: {} of {} staked, then exit {} BPT for {} out",
            unstake, position.staked, bpt_needed, requested_out
        );
        Ok(Withdrawal::PartialUnstake {
            unstake,
            amount_out: requested_out,
            bpt_in: bpt_needed,
        })
    }

    /// Decide and lower to the ordered instruction list
    pub async fn plan(
        &self,
        requested_out: Amount,
        position: &Position,
        encoder: &dyn InstructionEncoder,
    ) -> Result<WithdrawalPlan, PlanError> {
        let withdrawal = self.decide(requested_out, position).await?;
        Ok(withdrawal.to_instructions(encoder)?)
    }
}
