//! Content factory for building every catalog from a data directory.

use std::path::{Path, PathBuf};

use tileworld_core::{GameConfig, SceneRoutine};

use crate::catalog::{MapCatalog, MoveCatalog, SpeciesCatalog};
use crate::loaders::{
    ConfigLoader, LoadResult, MapLoader, MoveLoader, SceneLoader, SpeciesLoader,
};

/// Loads all game content from one data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── species.ron
/// ├── moves.ron
/// ├── scenes.ron
/// └── maps/
///     ├── pallet.ron
///     └── route_one.ron
/// ```
///
/// `config.toml` and `scenes.ron` are optional; missing ones fall back to
/// defaults and an empty routine list respectively.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Loads engine configuration from `config.toml`, or defaults when
    /// the file does not exist.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(GameConfig::new());
        }
        ConfigLoader::load(&path)
    }

    /// Loads the species catalog from `species.ron`.
    pub fn load_species(&self) -> LoadResult<SpeciesCatalog> {
        SpeciesLoader::load(&self.data_dir.join("species.ron"))
    }

    /// Loads the move catalog from `moves.ron`.
    pub fn load_moves(&self) -> LoadResult<MoveCatalog> {
        MoveLoader::load(&self.data_dir.join("moves.ron"))
    }

    /// Loads scene routines from `scenes.ron`, or none when the file does
    /// not exist.
    pub fn load_scenes(&self) -> LoadResult<Vec<SceneRoutine>> {
        let path = self.data_dir.join("scenes.ron");
        if !path.exists() {
            return Ok(Vec::new());
        }
        SceneLoader::load(&path)
    }

    /// Loads one map from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<tileworld_core::MapRecord> {
        let path = self.data_dir.join("maps").join(format!("{map_name}.ron"));
        MapLoader::load(&path)
    }

    /// Loads every `.ron` file under `maps/` into one catalog.
    pub fn load_maps(&self) -> LoadResult<MapCatalog> {
        let maps_dir = self.data_dir.join("maps");
        let mut entries: Vec<PathBuf> = std::fs::read_dir(&maps_dir)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", maps_dir.display(), e))?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "ron"))
            .collect();
        // Directory order is platform-dependent; load deterministically.
        entries.sort();

        let mut catalog = MapCatalog::default();
        for path in entries {
            catalog.insert(MapLoader::load(&path)?);
        }
        Ok(catalog)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tileworld_core::MapLibrary;

    fn seed_data_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "unit = 4\n").unwrap();
        fs::write(
            dir.path().join("species.ron"),
            r#"[(title: "Sparrow", base: (40, 45, 40, 35, 56), base_experience: 55)]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("moves.ron"),
            r#"[(title: "Tackle", power: 35, accuracy: Some(95))]"#,
        )
        .unwrap();
        fs::create_dir(dir.path().join("maps")).unwrap();
        fs::write(
            dir.path().join("maps").join("town.ron"),
            r#"(
    name: "Town",
    default_location: "Center",
    areas: [(name: "Main", bounds: (0, 0, 256, 256))],
    locations: [(name: "Center", area: "Main", x: 128, y: 128)],
)"#,
        )
        .unwrap();
        dir
    }

    #[test]
    fn loads_a_full_data_directory() {
        let dir = seed_data_dir();
        let factory = ContentFactory::new(dir.path());

        let config = factory.load_config().unwrap();
        let species = factory.load_species().unwrap();
        let moves = factory.load_moves().unwrap();
        let scenes = factory.load_scenes().unwrap();
        let maps = factory.load_maps().unwrap();

        assert_eq!(config.unit, 4);
        assert_eq!(species.len(), 1);
        assert_eq!(moves.len(), 1);
        assert!(scenes.is_empty());
        assert!(maps.map("Town").is_some());
        assert!(maps.area("Town", "Main").is_some());
    }

    #[test]
    fn missing_optional_files_default() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_config().unwrap(), GameConfig::new());
        assert!(factory.load_scenes().unwrap().is_empty());
        // Maps are not optional.
        assert!(factory.load_maps().is_err());
    }
}
