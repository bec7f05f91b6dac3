//! Map loader: one RON file per map.
//!
//! The authored schema is a flattened, defaults-friendly mirror of the
//! core's [`MapRecord`]: areas list their pre-placed things and wild
//! encounter tables inline, and every optional trait falls back to its
//! quiet default so simple things stay one line.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tileworld_core::{
    AreaRecord, Bounds, DetectorKind, DialogTable, Direction, GroupKind, GymStatue, LocationRecord,
    MapRecord, PreThing, ThingTraits, TransportTarget, WildEncounter,
};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapRon {
    name: String,
    default_location: String,
    #[serde(default)]
    seed: u64,
    areas: Vec<AreaRon>,
    locations: Vec<LocationRon>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AreaRon {
    name: String,
    /// `(left, top, width, height)` in world pixels.
    bounds: (i32, i32, i32, i32),
    #[serde(default)]
    things: Vec<PreThingRon>,
    #[serde(default)]
    wild_grass: Vec<WildRon>,
    #[serde(default)]
    encounter_rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PreThingRon {
    title: String,
    group: GroupKind,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    #[serde(default)]
    direction: Direction,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    traits: TraitsRon,
}

/// Authored traits with every field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct TraitsRon {
    transport: Option<TransportTarget>,
    require_direction: Option<Direction>,
    dialog: Option<DialogTable>,
    switch_direction_on_dialog: bool,
    direction_preferred: Option<Direction>,
    gym_statue: Option<GymStatue>,
    ledge: bool,
    push_direction: Option<Direction>,
    grass: bool,
    detector: Option<DetectorKind>,
    roaming: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WildRon {
    title: String,
    levels: Vec<u8>,
    rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocationRon {
    name: String,
    area: String,
    x: i32,
    y: i32,
    #[serde(default)]
    direction: Direction,
    #[serde(default)]
    entrance: Option<String>,
}

impl From<TraitsRon> for ThingTraits {
    fn from(ron: TraitsRon) -> Self {
        ThingTraits {
            transport: ron.transport,
            require_direction: ron.require_direction,
            activated: false,
            dialog: ron.dialog,
            switch_direction_on_dialog: ron.switch_direction_on_dialog,
            direction_preferred: ron.direction_preferred,
            gym_statue: ron.gym_statue,
            ledge: ron.ledge,
            push_direction: ron.push_direction,
            grass: ron.grass,
            detector: ron.detector,
            roaming: ron.roaming,
        }
    }
}

/// Loader for map records from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Loads one map record from a RON file.
    pub fn load(path: &Path) -> LoadResult<MapRecord> {
        let content = read_file(path)?;
        let data: MapRon = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse map {}: {}", path.display(), e))?;

        let mut areas = HashMap::new();
        for area in data.areas {
            let (left, top, width, height) = area.bounds;
            let record = AreaRecord {
                name: area.name.clone(),
                boundaries: Bounds::from_origin(left, top, width, height),
                creation: area
                    .things
                    .into_iter()
                    .map(|thing| PreThing {
                        title: thing.title,
                        group: thing.group,
                        x: thing.x,
                        y: thing.y,
                        width: thing.width,
                        height: thing.height,
                        direction: thing.direction,
                        id: thing.id,
                        traits: thing.traits.into(),
                    })
                    .collect(),
                wild_grass: area
                    .wild_grass
                    .into_iter()
                    .map(|wild| WildEncounter {
                        title: wild.title,
                        levels: wild.levels,
                        rate: wild.rate,
                    })
                    .collect(),
                encounter_rate: area.encounter_rate,
            };
            areas.insert(area.name, record);
        }

        let mut locations = HashMap::new();
        for location in data.locations {
            locations.insert(
                location.name.clone(),
                LocationRecord {
                    name: location.name,
                    area: location.area,
                    x: location.x,
                    y: location.y,
                    direction: location.direction,
                    entrance: location.entrance,
                },
            );
        }

        let record = MapRecord {
            name: data.name,
            areas,
            locations,
            default_location: data.default_location,
            seed: data.seed,
        };

        if !record.locations.contains_key(&record.default_location) {
            anyhow::bail!(
                "map {} names default location {:?} but does not define it",
                path.display(),
                record.default_location,
            );
        }
        for location in record.locations.values() {
            if !record.areas.contains_key(&location.area) {
                anyhow::bail!(
                    "map {} location {:?} references unknown area {:?}",
                    path.display(),
                    location.name,
                    location.area,
                );
            }
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TOWN: &str = r#"(
    name: "Town",
    default_location: "Center",
    seed: 11,
    areas: [
        (
            name: "Main",
            bounds: (0, 0, 512, 512),
            things: [
                (title: "Tree", group: Solid, x: 0, y: 0, width: 32, height: 32),
                (
                    title: "Door",
                    group: Solid,
                    x: 64, y: 64, width: 32, height: 32,
                    traits: (
                        transport: Some(Map(map: "House", location: None)),
                        require_direction: Some(Top),
                    ),
                ),
                (
                    title: "Grass",
                    group: Terrain,
                    x: 96, y: 96, width: 32, height: 32,
                    traits: (grass: true),
                ),
            ],
            wild_grass: [
                (title: "Pidgey", levels: [2, 3], rate: 200),
            ],
            encounter_rate: 48,
        ),
    ],
    locations: [
        (name: "Center", area: "Main", x: 128, y: 128, direction: Top),
    ],
)"#;

    fn write_map(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_areas_things_and_locations() {
        let file = write_map(TOWN);

        let record = MapLoader::load(file.path()).unwrap();

        assert_eq!(record.name, "Town");
        assert_eq!(record.seed, 11);
        let main = record.area("Main").unwrap();
        assert_eq!(main.creation.len(), 3);
        assert_eq!(main.wild_grass[0].levels, vec![2, 3]);

        let door = &main.creation[1];
        assert_eq!(door.traits.require_direction, Some(Direction::Top));
        assert!(matches!(
            door.traits.transport,
            Some(TransportTarget::Map { ref map, .. }) if map == "House"
        ));
        assert!(main.creation[2].traits.grass);

        let center = record.location("Center").unwrap();
        assert_eq!(center.area, "Main");
    }

    #[test]
    fn rejects_a_dangling_default_location() {
        let file = write_map(
            r#"(
    name: "Broken",
    default_location: "Nowhere",
    areas: [(name: "Main", bounds: (0, 0, 64, 64))],
    locations: [(name: "Start", area: "Main", x: 0, y: 0)],
)"#,
        );

        assert!(MapLoader::load(file.path()).is_err());
    }

    #[test]
    fn rejects_a_location_in_an_unknown_area() {
        let file = write_map(
            r#"(
    name: "Broken",
    default_location: "Start",
    areas: [(name: "Main", bounds: (0, 0, 64, 64))],
    locations: [(name: "Start", area: "Basement", x: 0, y: 0)],
)"#,
        );

        assert!(MapLoader::load(file.path()).is_err());
    }
}
