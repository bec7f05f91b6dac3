//! Materialization of authored things and lazy area streaming.

use crate::env::{Env, PreThing, WorldEvent};
use crate::error::ContentError;
use crate::geometry::{Bounds, Direction};
use crate::movement::{kill_normal, roam};
use crate::state::{
    AreaKey, CharacterState, DetectorKind, GroupKind, Scrollability, SpawnMarker, ThingId,
    ThingState, WorldState,
};
use crate::timeline::{Repeats, StepKind, Timeline};

use super::persistence;

/// What a window detector asked for when it fired.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetectorAction {
    /// Play a named scene routine.
    StartScene(String),

    /// Broadcast a named event.
    FireEvent(String),
}

/// Materializes one authored thing at a world-coordinate origin.
///
/// Saved snapshots overlay the authored record, so a thing killed last
/// visit materializes dead and is swept on the next maintenance pass.
pub fn add_pre_thing(
    world: &mut WorldState,
    env: &Env<'_>,
    timeline: &mut Timeline,
    pre: &PreThing,
    map: &str,
    area: &str,
    index: usize,
    origin_x: i32,
    origin_y: i32,
) -> ThingId {
    let id = match &pre.id {
        Some(explicit) => ThingId::new(explicit.clone()),
        None => ThingId::scoped(map, area, &pre.title, index),
    };

    let bounds = Bounds::from_origin(origin_x + pre.x, origin_y + pre.y, pre.width, pre.height);
    let mut thing = ThingState::new(id.clone(), pre.title.clone(), pre.group, bounds)
        .with_traits(pre.traits.clone());
    thing.direction = pre.direction;
    thing.map_name = map.to_owned();
    thing.area_name = area.to_owned();
    persistence::apply_saved_state(env, &id, &mut thing);

    if pre.traits.detector.is_some() {
        timeline.add_event_interval(
            world.clock,
            world.config.window_poll_period,
            world.config.window_poll_period,
            Repeats::Forever,
            Some(id.clone()),
            StepKind::WindowDetectorPoll { thing: id.clone() },
        );
    }

    if pre.group == GroupKind::Character {
        let speed = (world.config.unit / 2).max(1);
        let mut character = CharacterState::new(thing, speed);
        character.direction = character.thing.direction;
        world.groups.insert_character(character);
        if pre.traits.roaming {
            roam::schedule_roaming(world, timeline, &id);
        }
    } else {
        world.groups.insert(thing);
    }

    id
}

/// Materializes the player at a position.
pub fn add_player(
    world: &mut WorldState,
    x: i32,
    y: i32,
    direction: Direction,
) -> ThingId {
    let id = ThingId::new("player");
    let size = world.config.unit * 4;
    let thing = ThingState::new(
        id.clone(),
        "Player",
        GroupKind::Character,
        Bounds::from_origin(x, y, size, size),
    );
    let mut player = CharacterState::new(thing, world.config.unit).into_player();
    player.direction = direction;
    player.thing.direction = direction;
    world.groups.insert_character(player);
    id
}

/// Spawns every pre-placed thing of an area at a world-coordinate origin
/// and stamps the area's spawn bookkeeping.
///
/// # Errors
///
/// Unknown maps or areas are content errors.
pub fn spawn_area(
    world: &mut WorldState,
    env: &Env<'_>,
    timeline: &mut Timeline,
    map: &str,
    area: &str,
    origin_x: i32,
    origin_y: i32,
    spawned_by: Option<SpawnMarker>,
) -> Result<(), ContentError> {
    let record = env
        .maps()
        .map_err(|_| ContentError::UnknownMap(map.to_owned()))?
        .area(map, area)
        .ok_or_else(|| ContentError::UnknownArea {
            map: map.to_owned(),
            area: area.to_owned(),
        })?
        .clone();

    for (index, pre) in record.creation.iter().enumerate() {
        add_pre_thing(world, env, timeline, pre, map, area, index, origin_x, origin_y);
    }

    let status = world.area_status_mut(AreaKey::new(map, area));
    status.spawned = true;
    status.spawned_by = spawned_by;

    env.fire(WorldEvent::AreaSpawned {
        map: map.to_owned(),
        area: area.to_owned(),
    });
    Ok(())
}

/// Activates an area-spawner detector: streams the neighboring area in,
/// flush against the detector, once per transition.
///
/// Streaming propagates the active area's spawn marker, so the guard stops
/// ping-ponging within one transition while a later location entry (which
/// stamps a fresh marker) streams the neighbor back in.
///
/// # Errors
///
/// Detectors naming unknown maps or areas are content errors.
pub fn activate_area_spawner(
    world: &mut WorldState,
    env: &Env<'_>,
    timeline: &mut Timeline,
    detector_id: &ThingId,
) -> Result<(), ContentError> {
    let (detector_bounds, detector_direction, target_map, target_area) = {
        let Some(detector) = world.groups.thing(detector_id) else {
            return Ok(());
        };
        let Some(DetectorKind::AreaSpawner { map, area }) = &detector.traits.detector else {
            return Err(ContentError::MissingDetector(detector_id.clone()));
        };
        (
            detector.bounds,
            detector.direction,
            map.clone(),
            area.clone(),
        )
    };

    let marker = world
        .area_status(&world.screen.active_area_key())
        .and_then(|status| status.spawned_by.clone());

    let key = AreaKey::new(target_map.clone(), target_area.clone());
    let already = world
        .area_status(&key)
        .is_some_and(|status| status.spawned && status.spawned_by == marker);
    if already {
        // The target was spawned by this same transition, either ahead of
        // us in a chain or as the area that spawned us; never spawn back.
        kill_normal(world, env, timeline, detector_id);
        return Ok(());
    }

    let boundaries = env
        .maps()
        .map_err(|_| ContentError::UnknownMap(target_map.clone()))?
        .area(&target_map, &target_area)
        .ok_or_else(|| ContentError::UnknownArea {
            map: target_map.clone(),
            area: target_area.clone(),
        })?
        .boundaries;

    // The new area sits flush against the detector in its facing direction.
    let (origin_x, origin_y) = match detector_direction {
        Direction::Top => (detector_bounds.left, detector_bounds.top - boundaries.height()),
        Direction::Right => (detector_bounds.right, detector_bounds.top),
        Direction::Bottom => (detector_bounds.left, detector_bounds.bottom),
        Direction::Left => (detector_bounds.left - boundaries.width(), detector_bounds.top),
    };

    spawn_area(
        world,
        env,
        timeline,
        &target_map,
        &target_area,
        origin_x,
        origin_y,
        marker,
    )?;
    kill_normal(world, env, timeline, detector_id);

    // The world just grew; the viewport may now scroll along an axis the
    // single entry area had locked.
    let placed = Bounds::from_origin(origin_x, origin_y, boundaries.width(), boundaries.height());
    world.screen.boundaries = world.screen.boundaries.union(&placed);
    world.screen.scrollability =
        Scrollability::from_sizes(&world.screen.bounds, &world.screen.boundaries);
    Ok(())
}

/// One poll of a window detector against the viewport. Fires the detector
/// when the viewport reaches it; area spawners are handled inline and
/// scene or event detectors are handed up to the caller.
///
/// # Errors
///
/// Propagates content errors from area spawning.
pub fn on_window_poll(
    world: &mut WorldState,
    env: &Env<'_>,
    timeline: &mut Timeline,
    detector_id: &ThingId,
) -> Result<Option<DetectorAction>, ContentError> {
    let kind = {
        let Some(detector) = world.groups.thing(detector_id) else {
            return Ok(None);
        };
        if !detector.alive || !world.screen.bounds.overlaps(&detector.bounds) {
            return Ok(None);
        }
        detector
            .traits
            .detector
            .clone()
            .ok_or_else(|| ContentError::MissingDetector(detector_id.clone()))?
    };

    match kind {
        DetectorKind::AreaSpawner { .. } => {
            activate_area_spawner(world, env, timeline, detector_id)?;
            Ok(None)
        }
        DetectorKind::Scene(routine) => {
            kill_normal(world, env, timeline, detector_id);
            Ok(Some(DetectorAction::StartScene(routine)))
        }
        DetectorKind::Event(name) => {
            kill_normal(world, env, timeline, detector_id);
            Ok(Some(DetectorAction::FireEvent(name)))
        }
    }
}
