//! Map streaming: entering maps and locations, activating transporters,
//! and the lazy spawning of neighboring areas.

mod persistence;
mod spawning;

pub use persistence::{apply_saved_state, persist_thing};
pub use spawning::{
    DetectorAction, activate_area_spawner, add_player, add_pre_thing, on_window_poll, spawn_area,
};

use crate::env::{Env, WorldEvent};
use crate::error::ContentError;
use crate::state::{Scrollability, SpawnMarker, TransportTarget, WorldState};
use crate::timeline::Timeline;

/// Enters a map at a named location: tears down the live registry and the
/// timeline, spawns the location's area, and materializes the player at
/// the location's position.
///
/// # Errors
///
/// Unknown maps or locations are content errors.
pub fn enter_location(
    world: &mut WorldState,
    env: &Env<'_>,
    timeline: &mut Timeline,
    map: &str,
    location: &str,
) -> Result<(), ContentError> {
    let (record_seed, location_record) = {
        let library = env
            .maps()
            .map_err(|_| ContentError::UnknownMap(map.to_owned()))?;
        let record = library
            .map(map)
            .ok_or_else(|| ContentError::UnknownMap(map.to_owned()))?;
        let location_record = record
            .location(location)
            .ok_or_else(|| ContentError::UnknownLocation {
                map: map.to_owned(),
                location: location.to_owned(),
            })?
            .clone();
        (record.seed, location_record)
    };
    let area = {
        let library = env
            .maps()
            .map_err(|_| ContentError::UnknownMap(map.to_owned()))?;
        library
            .area(map, &location_record.area)
            .ok_or_else(|| ContentError::UnknownArea {
                map: map.to_owned(),
                area: location_record.area.clone(),
            })?
            .clone()
    };

    world.groups.clear();
    timeline.clear();
    world.rng.seed ^= record_seed;
    world.transitions += 1;

    world.screen.map_name = map.to_owned();
    world.screen.area_name = location_record.area.clone();
    world.screen.location_name = location.to_owned();
    world.screen.player_direction = location_record.direction;
    world.screen.boundaries = area.boundaries;
    world.screen.scrollability =
        Scrollability::from_sizes(&world.screen.bounds, &area.boundaries);

    spawn_area(
        world,
        env,
        timeline,
        map,
        &location_record.area,
        area.boundaries.left,
        area.boundaries.top,
        Some(SpawnMarker::new(location, world.transitions)),
    )?;

    add_player(
        world,
        location_record.x,
        location_record.y,
        location_record.direction,
    );

    // Center the viewport on the player immediately rather than waiting
    // for the first maintenance pass.
    crate::movement::maintain_player(world);

    env.fire(WorldEvent::Transported {
        location: location.to_owned(),
    });
    Ok(())
}

/// Enters a map at its default location.
///
/// # Errors
///
/// Unknown maps are content errors.
pub fn enter_map(
    world: &mut WorldState,
    env: &Env<'_>,
    timeline: &mut Timeline,
    map: &str,
) -> Result<(), ContentError> {
    let default_location = env
        .maps()
        .map_err(|_| ContentError::UnknownMap(map.to_owned()))?
        .map(map)
        .ok_or_else(|| ContentError::UnknownMap(map.to_owned()))?
        .default_location
        .clone();
    enter_location(world, env, timeline, map, &default_location)
}

/// Follows a fired transporter to its destination.
///
/// # Errors
///
/// Unknown destinations are content errors.
pub fn enter_transport(
    world: &mut WorldState,
    env: &Env<'_>,
    timeline: &mut Timeline,
    target: &TransportTarget,
) -> Result<(), ContentError> {
    match target {
        TransportTarget::Location(location) => {
            let map = world.screen.map_name.clone();
            enter_location(world, env, timeline, &map, location)
        }
        TransportTarget::Map { map, location } => match location {
            Some(location) => enter_location(world, env, timeline, map, location),
            None => enter_map(world, env, timeline, map),
        },
    }
}
