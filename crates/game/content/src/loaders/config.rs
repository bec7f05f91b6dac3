//! Engine configuration loader (TOML).

use std::path::Path;

use serde::Deserialize;
use tileworld_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Config file schema: every knob optional, defaulting to the engine's
/// built-in values so a config file only states what it changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ConfigToml {
    unit: i32,
    block_units: i32,
    roam_period: u64,
    window_poll_period: u64,
    deferred_walk_delay: u64,
    grass_line_offset: i32,
    encounter_rate: u32,
}

impl Default for ConfigToml {
    fn default() -> Self {
        let defaults = GameConfig::new();
        Self {
            unit: defaults.unit,
            block_units: defaults.block_units,
            roam_period: defaults.roam_period,
            window_poll_period: defaults.window_poll_period,
            deferred_walk_delay: defaults.deferred_walk_delay,
            grass_line_offset: defaults.grass_line_offset,
            encounter_rate: defaults.encounter_rate,
        }
    }
}

/// Loader for engine configuration from a TOML file.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a configuration, rejecting values the engine cannot run with.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        let data: ConfigToml = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse config {}: {}", path.display(), e))?;

        if data.unit < 1 || data.block_units < 1 {
            anyhow::bail!("unit and block_units must be at least 1");
        }
        if data.encounter_rate > 256 {
            anyhow::bail!("encounter_rate is a chance out of 256");
        }

        Ok(GameConfig {
            unit: data.unit,
            block_units: data.block_units,
            roam_period: data.roam_period,
            window_poll_period: data.window_poll_period,
            deferred_walk_delay: data.deferred_walk_delay,
            grass_line_offset: data.grass_line_offset,
            encounter_rate: data.encounter_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let file = write_config("unit = 8\nencounter_rate = 64\n");

        let config = ConfigLoader::load(file.path()).unwrap();

        assert_eq!(config.unit, 8);
        assert_eq!(config.encounter_rate, 64);
        assert_eq!(config.block_units, GameConfig::DEFAULT_BLOCK_UNITS);
        assert_eq!(config.roam_period, GameConfig::DEFAULT_ROAM_PERIOD);
    }

    #[test]
    fn rejects_a_zero_unit() {
        let file = write_config("unit = 0\n");

        assert!(ConfigLoader::load(file.path()).is_err());
    }
}
