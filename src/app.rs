// src/app.rs
use alloy_primitives::{Address, B256, U256};
use anyhow::{Context, Result};
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::debt::RatioSettings;
use crate::domain::pool::ExitCurve;
use crate::domain::slippage::SlippageTolerance;
use crate::infrastructure::balancer::BoostedPoolContracts;
use crate::infrastructure::curve::LinearExitCurve;
use crate::shared::config::Config;
use crate::shared::utils::parse_amount;

/// Settings of the simulated exit curve
#[derive(Debug, Clone)]
pub struct CurveSettings {
    pub rate: U256,
    pub fee_bps: u32,
    pub liquidity: Option<U256>,
}

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub slippage: SlippageTolerance,
    pub contracts: BoostedPoolContracts,
    pub curve: CurveSettings,
    pub debt: RatioSettings,
    pub log_level: String,
}

impl AppCfg {
    pub fn from_config(cfg: Config) -> Result<Self> {
        let contracts = BoostedPoolContracts {
            avatar: parse_address("contracts.avatar", &cfg.contracts.avatar)?,
            gauge: parse_address("contracts.gauge", &cfg.contracts.gauge)?,
            vault: parse_address("contracts.vault", &cfg.contracts.vault)?,
            bpt: parse_address("contracts.pool", &cfg.contracts.pool)?,
            linear_bpt: parse_address("contracts.linear_pool", &cfg.contracts.linear_pool)?,
            asset: parse_address("contracts.asset", &cfg.contracts.asset)?,
            pool_id: parse_pool_id("pools.pool_id", &cfg.pools.pool_id)?,
            linear_pool_id: parse_pool_id("pools.linear_pool_id", &cfg.pools.linear_pool_id)?,
        };

        let liquidity = match &cfg.curve.liquidity {
            Some(raw) => Some(parse_amount(raw).context("curve.liquidity")?),
            None => None,
        };

        let debt = RatioSettings::new(
            parse_amount(&cfg.debt.ratio_target).context("debt.ratio_target")?,
            parse_amount(&cfg.debt.ratio_trigger).context("debt.ratio_trigger")?,
        )?;

        Ok(Self {
            slippage: parse_slippage(&cfg.planner.slippage)?,
            contracts,
            curve: CurveSettings {
                rate: parse_amount(&cfg.curve.rate).context("curve.rate")?,
                fee_bps: cfg.curve.fee_bps,
                liquidity,
            },
            debt,
            log_level: cfg.logging.level,
        })
    }

    /// CLI values win over the file
    pub fn with_overrides(mut self, slippage: Option<&str>, log_level: Option<&str>) -> Result<Self> {
        if let Some(raw) = slippage {
            self.slippage = parse_slippage(raw)?;
        }
        if let Some(level) = log_level {
            self.log_level = level.to_string();
        }
        Ok(self)
    }

    pub fn build_curve(&self) -> Result<Arc<dyn ExitCurve>> {
        let mut curve = LinearExitCurve::new(self.curve.rate, self.curve.fee_bps)?;
        if let Some(liquidity) = self.curve.liquidity {
            curve = curve.with_liquidity(liquidity);
        }
        Ok(Arc::new(curve))
    }
}

pub fn parse_slippage(raw: &str) -> Result<SlippageTolerance> {
    let wad = parse_amount(raw).context("slippage")?;
    Ok(SlippageTolerance::new(wad)?)
}

fn parse_address(field: &str, raw: &str) -> Result<Address> {
    Address::from_str(raw.trim()).with_context(|| format!("Invalid address for {}: '{}'", field, raw))
}

fn parse_pool_id(field: &str, raw: &str) -> Result<B256> {
    B256::from_str(raw.trim()).with_context(|| format!("Invalid pool id for {}: '{}'", field, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::ConfigLoader;

    const CONFIG: &str = r#"
[planner]
slippage = "5000000000000000"

[contracts]
avatar = "0x1000000000000000000000000000000000000001"
gauge = "0x2000000000000000000000000000000000000002"
vault = "0xBA12222222228d8Ba445958a75a0704d566BF2C8"
pool = "0x3000000000000000000000000000000000000003"
linear_pool = "0x4000000000000000000000000000000000000004"
asset = "0x6B175474E89094C44Da98b954EedeAC495271d0F"

[pools]
pool_id = "0x7b50775383d3d6f0215a8f290f2c9e2eebbeceb20000000000000000000000fe"
linear_pool_id = "0x804cdb9116a10bb78768d3252355a1b18067bf8f0000000000000000000000fb"

[curve]
rate = "1_011_875_089_336_468_555"
fee_bps = 5
liquidity = "1000000000000000000000000"

[logging]
level = "debug"
"#;

    #[test]
    fn test_from_config() {
        let cfg = AppCfg::from_config(ConfigLoader::parse(CONFIG).unwrap()).unwrap();
        assert_eq!(cfg.slippage.bips(), U256::from(50u64));
        assert_eq!(cfg.contracts.avatar, Address::from_str("0x1000000000000000000000000000000000000001").unwrap());
        assert_eq!(cfg.curve.rate, U256::from(1_011_875_089_336_468_555u64));
        assert_eq!(cfg.curve.fee_bps, 5);
        assert!(cfg.curve.liquidity.is_some());
        assert_eq!(cfg.log_level, "debug");
        assert!(cfg.build_curve().is_ok());
        assert_eq!(cfg.debt.target(), U256::from(10u64).pow(U256::from(27)) * U256::from(3u64));
    }

    #[test]
    fn test_overrides() {
        let cfg = AppCfg::from_config(ConfigLoader::parse(CONFIG).unwrap())
            .unwrap()
            .with_overrides(Some("10000000000000000"), Some("warn"))
            .unwrap();
        assert_eq!(cfg.slippage.bips(), U256::from(100u64));
        assert_eq!(cfg.log_level, "warn");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_address = CONFIG.replace("0x2000000000000000000000000000000000000002", "0x20");
        assert!(AppCfg::from_config(ConfigLoader::parse(&bad_address).unwrap()).is_err());

        let too_loose = CONFIG.replace("5000000000000000", "2000000000000000000");
        assert!(AppCfg::from_config(ConfigLoader::parse(&too_loose).unwrap()).is_err());

        let inverted = format!("{}\n[debt]\nratio_target = \"1\"\nratio_trigger = \"2\"\n", CONFIG);
        assert!(AppCfg::from_config(ConfigLoader::parse(&inverted).unwrap()).is_err());
    }
}
