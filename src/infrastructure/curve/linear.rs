use alloy_primitives::U256;
use async_trait::async_trait;

use crate::domain::pool::ExitCurve;
use crate::shared::errors::{AppError, OracleError};
use crate::shared::types::{Amount, BIPS_DENOMINATOR, WAD};

/// Constant-rate exit with a proportional fee, for dry runs.
///
/// `out = floor(floor(bpt * rate / WAD) * (10000 - fee) / 10000)`; the inverse
/// rounds up at both steps so that `out_given_in(in_given_out(a)) >= a`.
#[derive(Debug, Clone)]
pub struct LinearExitCurve {
    rate: U256,
    fee_bps: u32,
    liquidity: Option<Amount>,
}

impl LinearExitCurve {
    pub fn new(rate: U256, fee_bps: u32) -> Result<Self, AppError> {
        if rate.is_zero() {
            return Err(AppError::ConfigError("curve rate must be positive".to_string()));
        }
        if U256::from(fee_bps) >= BIPS_DENOMINATOR {
            return Err(AppError::ConfigError(format!(
                "curve fee {} bps must be below 10000",
                fee_bps
            )));
        }
        Ok(Self {
            rate,
            fee_bps,
            liquidity: None,
        })
    }

    /// Cap on the asset the pool can pay out
    pub fn with_liquidity(mut self, liquidity: Amount) -> Self {
        self.liquidity = Some(liquidity);
        self
    }

    pub fn rate(&self) -> U256 {
        self.rate
    }

    fn fee_complement(&self) -> U256 {
        BIPS_DENOMINATOR - U256::from(self.fee_bps)
    }

    fn check_liquidity(&self, amount_out: Amount) -> Result<(), OracleError> {
        match self.liquidity {
            Some(available) if amount_out > available => Err(OracleError::InsufficientLiquidity {
                requested: amount_out,
                available,
            }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ExitCurve for LinearExitCurve {
    async fn out_given_in(&self, bpt_in: Amount) -> Result<Amount, OracleError> {
        let gross = bpt_in
            .checked_mul(self.rate)
            .ok_or(OracleError::Overflow("out_given_in"))?
            / WAD;
        let net = gross
            .checked_mul(self.fee_complement())
            .ok_or(OracleError::Overflow("out_given_in"))?
            / BIPS_DENOMINATOR;
        self.check_liquidity(net)?;
        Ok(net)
    }

    async fn in_given_out(&self, amount_out: Amount) -> Result<Amount, OracleError> {
        self.check_liquidity(amount_out)?;
        let gross = amount_out
            .checked_mul(BIPS_DENOMINATOR)
            .ok_or(OracleError::Overflow("in_given_out"))?
            .div_ceil(self.fee_complement());
        let bpt = gross
            .checked_mul(WAD)
            .ok_or(OracleError::Overflow("in_given_out"))?
            .div_ceil(self.rate);
        Ok(bpt)
    }
}
