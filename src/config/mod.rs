use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    domain::pricing_item::DEFAULT_BASE_SHOTS,
    errors::PricingError,
    pricing::DEFAULT_ROUND_UNIT,
    utils::paths::{config_file_in, ensure_dir, resolve_base, write_atomic},
};

/// User preferences that survive between sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_round_unit")]
    pub round_unit: i64,
    #[serde(default = "default_base_shots")]
    pub base_shots: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_branch: Option<String>,
}

fn default_round_unit() -> i64 {
    DEFAULT_ROUND_UNIT
}

fn default_base_shots() -> u32 {
    DEFAULT_BASE_SHOTS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            round_unit: DEFAULT_ROUND_UNIT,
            base_shots: DEFAULT_BASE_SHOTS,
            active_branch: None,
        }
    }
}

impl Config {
    /// Rejects settings the pricing engine cannot use.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.round_unit < 0 {
            return Err(PricingError::InvalidInput(format!(
                "round unit must not be negative (got {})",
                self.round_unit
            )));
        }
        if self.base_shots == 0 {
            return Err(PricingError::InvalidInput(
                "base shots must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, PricingError> {
        Self::from_base(resolve_base(None))
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, PricingError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, PricingError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, PricingError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: Config = serde_json::from_str(&data)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), PricingError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), "saved configuration");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_then_load_keeps_branch() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            round_unit: 100,
            base_shots: 300,
            active_branch: Some("강남점".into()),
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"active_branch":"홍대점"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.round_unit, DEFAULT_ROUND_UNIT);
        assert_eq!(config.active_branch.as_deref(), Some("홍대점"));
    }

    #[test]
    fn negative_round_unit_is_rejected() {
        let config = Config {
            round_unit: -10,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(PricingError::InvalidInput(_))));
    }
}
