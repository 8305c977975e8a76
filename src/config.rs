//! Tunables for the engine. The page may pass a JSON object to `start_game`;
//! any field it leaves out keeps its default.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Seconds on the clock when a time attack session starts.
    #[serde(default = "EngineConfig::default_time_attack_duration")]
    pub default_time_attack_duration: u32,
    /// Chance that a round draws from primes, squares, Fibonacci and legendary numbers.
    #[serde(default = "EngineConfig::default_special_bias")]
    pub special_bias: f64,
    /// A time attack find within this many attempts earns bonus seconds.
    #[serde(default = "EngineConfig::default_time_bonus_attempts")]
    pub time_bonus_attempts: u32,
    #[serde(default = "EngineConfig::default_time_bonus_min_secs")]
    pub time_bonus_min_secs: u32,
    #[serde(default = "EngineConfig::default_time_bonus_fraction")]
    pub time_bonus_fraction: f64,
}

impl EngineConfig {
    const fn default_time_attack_duration() -> u32 {
        60
    }

    const fn default_special_bias() -> f64 {
        0.2
    }

    const fn default_time_bonus_attempts() -> u32 {
        3
    }

    const fn default_time_bonus_min_secs() -> u32 {
        5
    }

    const fn default_time_bonus_fraction() -> f64 {
        0.05
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_time_attack_duration == 0 {
            return Err(ConfigError::Invalid("defaultTimeAttackDuration must be positive"));
        }
        if !(0.0..=1.0).contains(&self.special_bias) {
            return Err(ConfigError::Invalid("specialBias must be within 0..=1"));
        }
        if !(0.0..=1.0).contains(&self.time_bonus_fraction) {
            return Err(ConfigError::Invalid("timeBonusFraction must be within 0..=1"));
        }
        Ok(())
    }

    /// Bonus seconds for a quick time attack find: `max(min_secs, floor(duration * fraction))`.
    pub fn time_bonus(&self, duration: u32) -> u32 {
        let scaled = (duration as f64 * self.time_bonus_fraction).floor() as u32;
        scaled.max(self.time_bonus_min_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_time_attack_duration: Self::default_time_attack_duration(),
            special_bias: Self::default_special_bias(),
            time_bonus_attempts: Self::default_time_bonus_attempts(),
            time_bonus_min_secs: Self::default_time_bonus_min_secs(),
            time_bonus_fraction: Self::default_time_bonus_fraction(),
        }
    }
}
