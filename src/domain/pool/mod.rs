//! Pool domain - exit quotes against the boosted pool

use async_trait::async_trait;
use std::sync::Arc;

use crate::shared::errors::OracleError;
use crate::shared::types::Amount;

/// Exit-curve oracle. Both directions must be monotonically non-decreasing.
#[async_trait]
pub trait ExitCurve: Send + Sync {
    /// Asset received for exiting `bpt_in` receipt tokens
    async fn out_given_in(&self, bpt_in: Amount) -> Result<Amount, OracleError>;

    /// Receipt tokens required to receive exactly `amount_out` of the asset
    async fn in_given_out(&self, amount_out: Amount) -> Result<Amount, OracleError>;
}

#[async_trait]
impl<C: ExitCurve + ?Sized> ExitCurve for Arc<C> {
    async fn out_given_in(&self, bpt_in: Amount) -> Result<Amount, OracleError> {
        (**self).out_given_in(bpt_in).await
    }

    async fn in_given_out(&self, amount_out: Amount) -> Result<Amount, OracleError> {
        (**self).in_given_out(amount_out).await
    }
}
