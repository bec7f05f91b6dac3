//! Collaborator interfaces the core calls out through.
//!
//! The core owns the rules; everything else (authored data, randomness,
//! menus, sprites, persistence, broadcast events) arrives through the traits
//! here. The [`Env`] aggregate bundles them so operations can take one
//! parameter without hard coupling to concrete implementations.
//!
//! Data collaborators (maps, species, moves, random) are load-bearing:
//! operations that need an absent one fail with [`OracleError`]. Presentation
//! collaborators (menus, graphics, store, events) are soft: operations skip
//! the call and continue.

mod error;
mod events;
mod graphics;
mod maps;
mod menus;
mod moves;
mod random;
mod species;
mod store;

pub use error::OracleError;
pub use events::{BattleSide, EventSink, WorldEvent};
pub use graphics::Graphics;
pub use maps::{AreaRecord, LocationRecord, MapLibrary, MapRecord, PreThing, WildEncounter};
pub use menus::{DialogFinish, MenuSystem};
pub use moves::{MoveEffectSchema, MoveOracle, MoveSchema, StatKind};
pub use random::{PcgRandom, RandomSource, mix_seed};
pub use species::{BaseStatistics, SpeciesOracle};
pub use store::{KeyValueStore, badge_key, thing_key};

/// Aggregates the collaborators an operation may need.
///
/// Every slot is optional so tests can wire only what they exercise.
#[derive(Clone, Copy, Default)]
pub struct Env<'a> {
    maps: Option<&'a dyn MapLibrary>,
    species: Option<&'a dyn SpeciesOracle>,
    moves: Option<&'a dyn MoveOracle>,
    random: Option<&'a dyn RandomSource>,
    menus: Option<&'a dyn MenuSystem>,
    graphics: Option<&'a dyn Graphics>,
    store: Option<&'a dyn KeyValueStore>,
    events: Option<&'a dyn EventSink>,
}

impl<'a> Env<'a> {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_maps(mut self, maps: &'a dyn MapLibrary) -> Self {
        self.maps = Some(maps);
        self
    }

    pub fn with_species(mut self, species: &'a dyn SpeciesOracle) -> Self {
        self.species = Some(species);
        self
    }

    pub fn with_moves(mut self, moves: &'a dyn MoveOracle) -> Self {
        self.moves = Some(moves);
        self
    }

    pub fn with_random(mut self, random: &'a dyn RandomSource) -> Self {
        self.random = Some(random);
        self
    }

    pub fn with_menus(mut self, menus: &'a dyn MenuSystem) -> Self {
        self.menus = Some(menus);
        self
    }

    pub fn with_graphics(mut self, graphics: &'a dyn Graphics) -> Self {
        self.graphics = Some(graphics);
        self
    }

    pub fn with_store(mut self, store: &'a dyn KeyValueStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_events(mut self, events: &'a dyn EventSink) -> Self {
        self.events = Some(events);
        self
    }

    /// Returns the map library, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::MapsNotAvailable` if no map library was provided.
    pub fn maps(&self) -> Result<&'a dyn MapLibrary, OracleError> {
        self.maps.ok_or(OracleError::MapsNotAvailable)
    }

    /// Returns the species oracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::SpeciesNotAvailable` if no species oracle was provided.
    pub fn species(&self) -> Result<&'a dyn SpeciesOracle, OracleError> {
        self.species.ok_or(OracleError::SpeciesNotAvailable)
    }

    /// Returns the move oracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::MovesNotAvailable` if no move oracle was provided.
    pub fn moves(&self) -> Result<&'a dyn MoveOracle, OracleError> {
        self.moves.ok_or(OracleError::MovesNotAvailable)
    }

    /// Returns the random source, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::RandomNotAvailable` if no random source was provided.
    pub fn random(&self) -> Result<&'a dyn RandomSource, OracleError> {
        self.random.ok_or(OracleError::RandomNotAvailable)
    }

    /// The menu system, if one is wired in. Presentation-soft.
    pub fn menus(&self) -> Option<&'a dyn MenuSystem> {
        self.menus
    }

    /// The graphics surface, if one is wired in. Presentation-soft.
    pub fn graphics(&self) -> Option<&'a dyn Graphics> {
        self.graphics
    }

    /// The key-value store, if one is wired in. Presentation-soft.
    pub fn store(&self) -> Option<&'a dyn KeyValueStore> {
        self.store
    }

    /// Fires a broadcast event if a sink is wired in.
    pub fn fire(&self, event: WorldEvent) {
        if let Some(events) = self.events {
            events.fire(&event);
        }
    }
}

impl std::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("maps", &self.maps.is_some())
            .field("species", &self.species.is_some())
            .field("moves", &self.moves.is_some())
            .field("random", &self.random.is_some())
            .field("menus", &self.menus.is_some())
            .field("graphics", &self.graphics.is_some())
            .field("store", &self.store.is_some())
            .field("events", &self.events.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_env_reports_missing_data_collaborators() {
        let env = Env::empty();
        assert_eq!(env.maps().unwrap_err(), OracleError::MapsNotAvailable);
        assert_eq!(env.random().unwrap_err(), OracleError::RandomNotAvailable);
        assert!(env.menus().is_none());
    }

    #[test]
    fn builder_wires_collaborators() {
        let random = PcgRandom;
        let env = Env::empty().with_random(&random);
        assert!(env.random().is_ok());
    }
}
