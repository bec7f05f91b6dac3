//! Mutable world state: things, characters, groups, and the viewport.
//!
//! The state is an explicitly passed value, never an ambient singleton, so
//! several worlds can coexist (one per test, or one per concurrent session).
//! All mutation flows through the engine's tick phases and the operations in
//! `movement`, `collision`, `maps`, and `battle`.

mod character;
mod common;
mod groups;
mod screen;
mod things;
mod world;

pub use character::{CharacterState, DirectionKeys, HopState};
pub use common::{GroupKind, ThingId, Tick};
pub use groups::GroupsState;
pub use screen::{MapScreen, Scrollability};
pub use things::{
    DetectorKind, DialogTable, GymStatue, ThingState, ThingTraits, TransportTarget,
};
pub use world::{AreaKey, AreaStatus, SpawnMarker, WorldRng, WorldState};
