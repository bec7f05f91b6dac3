//! Loaders turning authored data files into catalogs.
//!
//! Maps, species, moves, and scene routines are authored in RON; engine
//! configuration is TOML. Each loader parses one file format into the
//! corresponding catalog or core record.

pub mod config;
pub mod factory;
pub mod map;
pub mod moves;
pub mod scenes;
pub mod species;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use map::MapLoader;
pub use moves::MoveLoader;
pub use scenes::SceneLoader;
pub use species::SpeciesLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Reads a file with the path folded into the failure message.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))
}
