use std::fs;
use std::path::Path;
use serde::Deserialize;
use crate::shared::errors::AppError;

/// Planner settings
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerCfg {
    /// Slippage tolerance, 18-decimal fraction (1e18 = 100%)
    pub slippage: String,
}

/// Contract addresses the instructions are aimed at
#[derive(Debug, Clone, Deserialize)]
pub struct ContractsCfg {
    pub avatar: String,
    pub gauge: String,
    pub vault: String,
    /// Boosted pool receipt token (BPT)
    pub pool: String,
    /// Linear pool token sitting between the BPT and the asset
    pub linear_pool: String,
    pub asset: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolsCfg {
    pub pool_id: String,
    pub linear_pool_id: String,
}

/// Exit curve used for dry runs
#[derive(Debug, Clone, Deserialize)]
pub struct CurveCfg {
    /// Asset out per receipt token, 18-decimal fixed point
    pub rate: String,
    #[serde(default)]
    pub fee_bps: u32,
    /// Asset liquidity available for exits; unlimited when absent
    pub liquidity: Option<String>,
}

/// Ratios a debt vault is kept at, 27-decimal fixed point
#[derive(Debug, Clone, Deserialize)]
pub struct DebtCfg {
    #[serde(default = "default_ratio_target")]
    pub ratio_target: String,
    #[serde(default = "default_ratio_trigger")]
    pub ratio_trigger: String,
}

impl Default for DebtCfg {
    fn default() -> Self {
        Self {
            ratio_target: default_ratio_target(),
            ratio_trigger: default_ratio_trigger(),
        }
    }
}

fn default_ratio_target() -> String {
    "3000000000000000000000000000".to_string()
}

fn default_ratio_trigger() -> String {
    "2994000000000000000000000000".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingCfg {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingCfg {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub planner: PlannerCfg,
    pub contracts: ContractsCfg,
    pub pools: PoolsCfg,
    pub curve: CurveCfg,
    #[serde(default)]
    pub debt: DebtCfg,
    #[serde(default)]
    pub logging: LoggingCfg,
}

/// Config file loader
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, AppError> {
        let config_content = fs::read_to_string(path.as_ref()).map_err(|e| {
            AppError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::parse(&config_content)
    }

    pub fn parse(content: &str) -> Result<Config, AppError> {
        toml::from_str(content)
            .map_err(|e| AppError::ConfigError(format!("Failed to parse config file: {}", e)))
    }
}
