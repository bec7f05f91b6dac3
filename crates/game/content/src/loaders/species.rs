//! Species loader: the whole roster in one RON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tileworld_core::BaseStatistics;

use crate::catalog::{GrowthCurve, SpeciesCatalog, SpeciesRecord};
use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SpeciesRon {
    title: String,
    /// `(health, attack, defense, special, speed)`.
    base: (u16, u16, u16, u16, u16),
    base_experience: u32,
    #[serde(default)]
    growth: GrowthCurve,
    #[serde(default)]
    evolve_at: Option<u8>,
    #[serde(default)]
    evolve_into: Option<String>,
}

/// Loader for the species catalog from a RON file.
pub struct SpeciesLoader;

impl SpeciesLoader {
    /// Loads the species catalog. Evolution requires both `evolve_at` and
    /// `evolve_into`; one without the other is a content error.
    pub fn load(path: &Path) -> LoadResult<SpeciesCatalog> {
        let content = read_file(path)?;
        let options = ron::Options::default().with_default_extension(
            ron::extensions::Extensions::UNWRAP_NEWTYPES | ron::extensions::Extensions::IMPLICIT_SOME,
        );
        let data: Vec<SpeciesRon> = options
            .from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse species {}: {}", path.display(), e))?;

        let mut catalog = SpeciesCatalog::default();
        for entry in data {
            let evolution = match (entry.evolve_at, entry.evolve_into) {
                (Some(level), Some(into)) => Some((level, into)),
                (None, None) => None,
                _ => anyhow::bail!(
                    "species {:?} must set both evolve_at and evolve_into or neither",
                    entry.title,
                ),
            };
            let (health, attack, defense, special, speed) = entry.base;
            catalog.insert(SpeciesRecord {
                title: entry.title,
                base: BaseStatistics {
                    health,
                    attack,
                    defense,
                    special,
                    speed,
                },
                base_experience: entry.base_experience,
                growth: entry.growth,
                evolution,
            });
        }
        Ok(catalog)
    }
}
