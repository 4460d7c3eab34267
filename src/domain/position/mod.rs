//! Position domain - the avatar's staked and unstaked receipt tokens

use async_trait::async_trait;

use crate::shared::errors::OracleError;
use crate::shared::types::{Amount, Position};

/// Live balance queries for the two holding tiers
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Receipt tokens held directly by the avatar
    async fn balance_unstaked(&self) -> Result<Amount, OracleError>;

    /// Receipt tokens deposited in the gauge
    async fn balance_staked(&self) -> Result<Amount, OracleError>;

    /// Fresh snapshot. The two reads are not atomic with respect to each other.
    async fn snapshot(&self) -> Result<Position, OracleError> {
        let unstaked = self.balance_unstaked().await?;
        let staked = self.balance_staked().await?;
        Ok(Position { unstaked, staked })
    }
}

/// Fixed snapshot, for callers that already hold the balances
#[derive(Debug, Clone, Copy)]
pub struct StaticPosition(pub Position);

#[async_trait]
impl PositionSource for StaticPosition {
    async fn balance_unstaked(&self) -> Result<Amount, OracleError> {
        Ok(self.0.unstaked)
    }

    async fn balance_staked(&self) -> Result<Amount, OracleError> {
        Ok(self.0.staked)
    }
}
