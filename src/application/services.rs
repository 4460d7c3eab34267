//! Withdrawal service - the adapter façade callers plan against

use std::sync::Arc;
use tracing::info;

use crate::domain::execution::InstructionEncoder;
use crate::domain::pool::ExitCurve;
use crate::domain::position::PositionSource;
use crate::domain::slippage::{self, SlippageBounds, SlippageTolerance};
use crate::domain::withdrawal::{Withdrawal, WithdrawalPlanner};
use crate::infrastructure::curve::SlippageGuardedCurve;
use crate::shared::errors::PlanError;
use crate::shared::types::{Amount, Position, WithdrawalPlan};

/// Everything one planning call produced
#[derive(Debug, Clone)]
pub struct PlannedWithdrawal {
    pub requested_out: Amount,
    pub position: Position,
    pub withdrawal: Withdrawal,
    pub instructions: WithdrawalPlan,
    /// Band the received asset should land in: around the raw forecast of
    /// the exited BPT for a full exit, around the request otherwise
    pub expected_out: SlippageBounds,
}

/// Plans withdrawals for one boosted-pool position.
///
/// Balances are re-read on every call. Decisions are taken on
/// slippage-guarded quotes; the position value is reported on raw quotes.
pub struct WithdrawalService {
    position: Arc<dyn PositionSource>,
    curve: Arc<dyn ExitCurve>,
    guarded_curve: SlippageGuardedCurve,
    encoder: Arc<dyn InstructionEncoder>,
    tolerance: SlippageTolerance,
}

impl WithdrawalService {
    pub fn new(
        position: Arc<dyn PositionSource>,
        curve: Arc<dyn ExitCurve>,
        encoder: Arc<dyn InstructionEncoder>,
        tolerance: SlippageTolerance,
    ) -> Self {
        Self {
            position,
            guarded_curve: SlippageGuardedCurve::new(curve.clone(), tolerance),
            curve,
            encoder,
            tolerance,
        }
    }

    pub fn slippage_tolerance(&self) -> SlippageTolerance {
        self.tolerance
    }

    pub fn bounds(&self, forecast: Amount) -> SlippageBounds {
        slippage::bounds(forecast, self.tolerance)
    }

    /// Forecast of what exiting the whole position yields
    pub async fn current_position_value(&self) -> Result<Amount, PlanError> {
        let position = self.position.snapshot().await?;
        Ok(self.curve.out_given_in(position.total()?).await?)
    }

    pub async fn plan(&self, requested_out: Amount) -> Result<WithdrawalPlan, PlanError> {
        Ok(self.plan_detailed(requested_out).await?.instructions)
    }

    pub async fn plan_detailed(&self, requested_out: Amount) -> Result<PlannedWithdrawal, PlanError> {
        let position = self.position.snapshot().await?;
        let planner = WithdrawalPlanner::new(&self.guarded_curve);
        let withdrawal = planner.decide(requested_out, &position).await?;
        let instructions = withdrawal.to_instructions(self.encoder.as_ref())?;

        let expected_out = match withdrawal {
            Withdrawal::FullExit { bpt_in, .. } => self.bounds(self.curve.out_given_in(bpt_in).await?),
            Withdrawal::ExitOnly { .. } | Withdrawal::PartialUnstake { .. } => self.bounds(requested_out),
        };

        info!(
            "Planned {} for {} out: {} instruction(s)",
            withdrawal.name(),
            requested_out,
            instructions.len()
        );

        Ok(PlannedWithdrawal {
            requested_out,
            position,
            withdrawal,
            instructions,
            expected_out,
        })
    }
}
