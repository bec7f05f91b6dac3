//! Map library oracle: immutable authored map, area, and location records.

use std::collections::HashMap;

use crate::geometry::{Bounds, Direction};
use crate::state::{GroupKind, ThingTraits};

/// A thing as authored, before materialization into the live registry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreThing {
    pub title: String,
    pub group: GroupKind,

    /// Origin within the area, in pixels.
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,

    pub direction: Direction,

    /// Explicit id overriding the conventional scoped one.
    pub id: Option<String>,

    pub traits: ThingTraits,
}

/// One wild-encounter entry for an area's grass.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WildEncounter {
    pub title: String,

    /// Levels this species appears at; one is drawn uniformly.
    pub levels: Vec<u8>,

    /// Relative weight against the other entries.
    pub rate: u32,
}

/// An authored area: boundaries plus its pre-placed things.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaRecord {
    pub name: String,

    /// World-coordinate extent; scrollability derives from this.
    pub boundaries: Bounds,

    pub creation: Vec<PreThing>,

    pub wild_grass: Vec<WildEncounter>,

    /// Per-step wild encounter chance, out of 256. Zero disables encounters
    /// even when grass is present.
    pub encounter_rate: u32,
}

/// An authored entry point into an area.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationRecord {
    pub name: String,
    pub area: String,

    /// Player origin within the area, in pixels.
    pub x: i32,
    pub y: i32,

    pub direction: Direction,

    /// Id of the thing (a door, usually) the player emerges from, if any.
    pub entrance: Option<String>,
}

/// A full authored map.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapRecord {
    pub name: String,
    pub areas: HashMap<String, AreaRecord>,
    pub locations: HashMap<String, LocationRecord>,
    pub default_location: String,

    /// Map-specific entropy mixed into the world seed on entry.
    pub seed: u64,
}

impl MapRecord {
    pub fn area(&self, name: &str) -> Option<&AreaRecord> {
        self.areas.get(name)
    }

    pub fn location(&self, name: &str) -> Option<&LocationRecord> {
        self.locations.get(name)
    }
}

/// Read-only access to the full set of authored maps.
pub trait MapLibrary: Send + Sync {
    /// The record for a map, if the library knows it.
    fn map(&self, name: &str) -> Option<&MapRecord>;

    /// Convenience lookup for an area within a map.
    fn area(&self, map: &str, area: &str) -> Option<&AreaRecord> {
        self.map(map)?.area(area)
    }
}

impl std::fmt::Debug for dyn MapLibrary + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn MapLibrary")
    }
}
