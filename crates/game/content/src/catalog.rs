//! In-memory content catalogs implementing the core's oracle traits.
//!
//! Catalogs are plain lookup tables built either programmatically (tests,
//! embedded content) or by the loaders in [`crate::loaders`]. They own
//! their records; the core only ever sees them behind trait objects.

use std::collections::HashMap;

use tileworld_core::{BaseStatistics, MapLibrary, MapRecord, MoveOracle, MoveSchema, SpeciesOracle};

/// Experience growth curve families, matching the classic cubic formulas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum GrowthCurve {
    Fast,
    #[default]
    MediumFast,
    MediumSlow,
    Slow,
}

impl GrowthCurve {
    /// Total experience required to reach `level` from scratch.
    pub fn experience_to_level(self, level: u8) -> u32 {
        let n = i64::from(level);
        let total = match self {
            Self::Fast => 4 * n.pow(3) / 5,
            Self::MediumFast => n.pow(3),
            Self::MediumSlow => 6 * n.pow(3) / 5 - 15 * n.pow(2) + 100 * n - 140,
            Self::Slow => 5 * n.pow(3) / 4,
        };
        total.max(0) as u32
    }
}

/// One species entry: base statistics plus growth and evolution data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeciesRecord {
    pub title: String,
    pub base: BaseStatistics,
    pub base_experience: u32,
    pub growth: GrowthCurve,

    /// `(level, successor title)` when the species evolves by level.
    pub evolution: Option<(u8, String)>,
}

/// Species lookup table backing the battle pipeline.
#[derive(Debug, Default)]
pub struct SpeciesCatalog {
    species: HashMap<String, SpeciesRecord>,
}

impl SpeciesCatalog {
    pub fn new(records: impl IntoIterator<Item = SpeciesRecord>) -> Self {
        let species = records
            .into_iter()
            .map(|record| (record.title.clone(), record))
            .collect();
        Self { species }
    }

    pub fn insert(&mut self, record: SpeciesRecord) {
        self.species.insert(record.title.clone(), record);
    }

    pub fn get(&self, title: &str) -> Option<&SpeciesRecord> {
        self.species.get(title)
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

impl SpeciesOracle for SpeciesCatalog {
    fn base_statistics(&self, title: &str) -> Option<BaseStatistics> {
        self.species.get(title).map(|record| record.base)
    }

    fn experience_to_level(&self, title: &str, level: u8) -> Option<u32> {
        self.species
            .get(title)
            .map(|record| record.growth.experience_to_level(level))
    }

    fn evolution(&self, title: &str, level: u8) -> Option<String> {
        let (at, into) = self.species.get(title)?.evolution.as_ref()?;
        (level >= *at).then(|| into.clone())
    }

    fn base_experience(&self, title: &str) -> Option<u32> {
        self.species.get(title).map(|record| record.base_experience)
    }
}

/// Move lookup table backing the battle pipeline.
#[derive(Debug, Default)]
pub struct MoveCatalog {
    moves: HashMap<String, MoveSchema>,
}

impl MoveCatalog {
    pub fn new(schemas: impl IntoIterator<Item = MoveSchema>) -> Self {
        let moves = schemas
            .into_iter()
            .map(|schema| (schema.title.clone(), schema))
            .collect();
        Self { moves }
    }

    pub fn insert(&mut self, schema: MoveSchema) {
        self.moves.insert(schema.title.clone(), schema);
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl MoveOracle for MoveCatalog {
    fn move_schema(&self, title: &str) -> Option<&MoveSchema> {
        self.moves.get(title)
    }
}

/// Map lookup table backing the streaming component.
#[derive(Debug, Default)]
pub struct MapCatalog {
    maps: HashMap<String, MapRecord>,
}

impl MapCatalog {
    pub fn new(records: impl IntoIterator<Item = MapRecord>) -> Self {
        let maps = records
            .into_iter()
            .map(|record| (record.name.clone(), record))
            .collect();
        Self { maps }
    }

    pub fn insert(&mut self, record: MapRecord) {
        self.maps.insert(record.name.clone(), record);
    }

    /// Registered map names, sorted for stable iteration.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.maps.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl MapLibrary for MapCatalog {
    fn map(&self, name: &str) -> Option<&MapRecord> {
        self.maps.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species(title: &str, growth: GrowthCurve) -> SpeciesRecord {
        SpeciesRecord {
            title: title.to_owned(),
            base: BaseStatistics {
                health: 45,
                attack: 49,
                defense: 49,
                special: 65,
                speed: 45,
            },
            base_experience: 64,
            growth,
            evolution: Some((16, format!("{title}2"))),
        }
    }

    #[test]
    fn growth_curves_are_monotonic() {
        for curve in [
            GrowthCurve::Fast,
            GrowthCurve::MediumFast,
            GrowthCurve::MediumSlow,
            GrowthCurve::Slow,
        ] {
            let mut previous = 0;
            for level in 2..=100 {
                let total = curve.experience_to_level(level);
                assert!(total >= previous, "{curve:?} dipped at level {level}");
                previous = total;
            }
        }
    }

    #[test]
    fn medium_fast_is_the_plain_cube() {
        assert_eq!(GrowthCurve::MediumFast.experience_to_level(10), 1000);
        assert_eq!(GrowthCurve::MediumFast.experience_to_level(50), 125_000);
    }

    #[test]
    fn evolution_gates_on_level() {
        let catalog = SpeciesCatalog::new([species("Seed", GrowthCurve::MediumSlow)]);

        assert_eq!(catalog.evolution("Seed", 15), None);
        assert_eq!(catalog.evolution("Seed", 16), Some("Seed2".to_owned()));
        assert_eq!(catalog.evolution("Missing", 16), None);
    }

    #[test]
    fn catalogs_answer_unknown_titles_with_none() {
        let species = SpeciesCatalog::default();
        let moves = MoveCatalog::default();
        let maps = MapCatalog::default();

        assert_eq!(species.base_statistics("Nobody"), None);
        assert!(moves.move_schema("Nothing").is_none());
        assert!(maps.map("Nowhere").is_none());
    }
}
