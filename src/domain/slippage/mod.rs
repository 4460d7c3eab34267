//! Slippage domain - tolerance and forecast bounds

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::shared::errors::SlippageError;
use crate::shared::types::{Amount, BIPS_DENOMINATOR, WAD, WAD_PER_BIP};

/// Slippage tolerance as an 18-decimal fraction, `1e18` being 100%
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "U256", into = "U256")]
pub struct SlippageTolerance(U256);

impl TryFrom<U256> for SlippageTolerance {
    type Error = SlippageError;

    fn try_from(wad: U256) -> Result<Self, Self::Error> {
        Self::new(wad)
    }
}

impl From<SlippageTolerance> for U256 {
    fn from(tolerance: SlippageTolerance) -> Self {
        tolerance.0
    }
}

impl SlippageTolerance {
    pub fn new(wad: U256) -> Result<Self, SlippageError> {
        if wad > WAD {
            return Err(SlippageError::AboveOneHundredPercent(wad));
        }
        Ok(Self(wad))
    }

    pub fn from_bips(bips: u64) -> Result<Self, SlippageError> {
        Self::new(U256::from(bips).saturating_mul(WAD_PER_BIP))
    }

    pub fn as_wad(&self) -> U256 {
        self.0
    }

    /// Whole basis points; anything below 1e14 truncates away
    pub fn bips(&self) -> U256 {
        self.0 / WAD_PER_BIP
    }
}

/// Acceptable range around a forecast amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlippageBounds {
    pub forecast: Amount,
    pub slice: Amount,
    pub lower: Amount,
    pub upper: Amount,
}

impl SlippageBounds {
    pub fn contains(&self, amount: Amount) -> bool {
        amount >= self.lower && amount <= self.upper
    }

    /// Strict version used when the edges themselves count as a miss
    pub fn strictly_contains(&self, amount: Amount) -> bool {
        amount > self.lower && amount < self.upper
    }
}

/// `(forecast / 10000) * bips`. Division comes first, so amounts below
/// 10000 units always yield a zero slice.
pub fn slippage_slice(forecast: Amount, tolerance: SlippageTolerance) -> Amount {
    (forecast / BIPS_DENOMINATOR).saturating_mul(tolerance.bips())
}

pub fn bounds(forecast: Amount, tolerance: SlippageTolerance) -> SlippageBounds {
    let slice = slippage_slice(forecast, tolerance);
    SlippageBounds {
        forecast,
        slice,
        lower: forecast - slice,
        upper: forecast.saturating_add(slice),
    }
}
