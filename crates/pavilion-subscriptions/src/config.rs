use crate::domain::types::Currency;
use anyhow::{anyhow, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Engine configuration.
///
/// Loaded from defaults, an optional `pavilion.toml`, and `PAVILION_`
/// environment overrides, in that order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Currency every plan price and payment must be denominated in.
    pub currency: Currency,
    /// Upper bound the freeze policy accepts for a single request.
    pub max_freeze_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency: Currency::Usd,
            max_freeze_days: 90,
        }
    }
}

impl EngineConfig {
    pub fn load(path_override: Option<PathBuf>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(EngineConfig::default()));

        if let Some(path) = path_override {
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
            }
        } else {
            let default_path = PathBuf::from("pavilion.toml");
            if default_path.exists() {
                figment = figment.merge(Toml::file(default_path));
            }
        }

        figment = figment.merge(Env::prefixed("PAVILION_"));

        let config: EngineConfig = figment
            .extract()
            .map_err(|e| anyhow!("Configuration error: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_freeze_days == 0 {
            return Err(anyhow!("max_freeze_days must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.currency, Currency::Usd);
        assert_eq!(config.max_freeze_days, 90);
    }

    #[test]
    fn test_zero_freeze_cap_rejected() {
        let config = EngineConfig {
            currency: Currency::Usd,
            max_freeze_days: 0,
        };
        assert!(config.validate().is_err());
    }
}
