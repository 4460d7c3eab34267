use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::pool::ExitCurve;
use crate::domain::slippage::{bounds, SlippageTolerance};
use crate::shared::errors::OracleError;
use crate::shared::types::Amount;

/// Executable quotes derived from a mid-market curve.
///
/// Asset-out quotes are reduced to the lower slippage bound and
/// receipt-token-in quotes raised to the upper bound, so a plan built on
/// these quotes still clears once the exit curve moves within tolerance.
pub struct SlippageGuardedCurve {
    inner: Arc<dyn ExitCurve>,
    tolerance: SlippageTolerance,
}

impl SlippageGuardedCurve {
    pub fn new(inner: Arc<dyn ExitCurve>, tolerance: SlippageTolerance) -> Self {
        Self { inner, tolerance }
    }
}

#[async_trait]
impl ExitCurve for SlippageGuardedCurve {
    async fn out_given_in(&self, bpt_in: Amount) -> Result<Amount, OracleError> {
        let quoted = self.inner.out_given_in(bpt_in).await?;
        Ok(bounds(quoted, self.tolerance).lower)
    }

    async fn in_given_out(&self, amount_out: Amount) -> Result<Amount, OracleError> {
        let quoted = self.inner.in_given_out(amount_out).await?;
        Ok(bounds(quoted, self.tolerance).upper)
    }
}
