//! Run configuration: generation knobs, starting stats and the seed.

use dungeon::{DungeonRng, GenerationConfig};
use error::{GameError, Result};
use hero::RunDefaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Path of a JSON config file to load instead of the defaults.
pub const CONFIG_ENV: &str = "PIXEL_CRAWL_CONFIG";
/// Fixed seed, overriding whatever the config file says.
pub const SEED_ENV: &str = "PIXEL_CRAWL_SEED";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// `None` draws a fresh seed from the OS for every run.
    pub seed: Option<u64>,
    pub generation: GenerationConfig,
    pub run: RunDefaults,
}

impl GameConfig {
    /// 从 JSON 文件加载配置；缺省字段取默认值
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config: GameConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`GameConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup(CONFIG_ENV) {
            Some(path) if !path.trim().is_empty() => Self::load(path.trim())?,
            _ => Self::default(),
        };
        if let Some(raw) = lookup(SEED_ENV) {
            let seed = raw.trim().parse::<u64>().map_err(|e| {
                GameError::InvalidConfig(format!("{SEED_ENV}={raw:?} is not a seed: {e}"))
            })?;
            config.seed = Some(seed);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.generation.validate()?;
        self.run
            .validate()
            .map_err(|e| GameError::InvalidConfig(e.to_string()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// RNG for a run, seeded from the config when a seed is fixed.
    pub fn rng(&self) -> DungeonRng {
        match self.seed {
            Some(seed) => DungeonRng::new(seed),
            None => DungeonRng::from_entropy(),
        }
    }
}
