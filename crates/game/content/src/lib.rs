//! Data-driven content catalogs and loaders.
//!
//! This crate houses the authored-content side of tileworld:
//! - Map records, species, moves, and scene routines (data-driven via RON)
//! - Engine configuration (data-driven via TOML)
//! - In-memory catalogs implementing the core's oracle traits
//!
//! Content is consumed through the core's `Env` collaborators and never
//! appears in game state.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{GrowthCurve, MapCatalog, MoveCatalog, SpeciesCatalog, SpeciesRecord};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, MapLoader, MoveLoader, SceneLoader, SpeciesLoader,
};
