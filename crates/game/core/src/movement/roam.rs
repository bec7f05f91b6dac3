//! Wandering NPCs: periodic random single-block walks.

use crate::env::{Env, OracleError};
use crate::geometry::Direction;
use crate::state::{ThingId, WorldState};
use crate::timeline::{Repeats, StepKind, Timeline};

/// Schedules the recurring roam pulse for a roaming NPC. Called once at
/// materialization; the pulse repeats until the NPC dies.
pub fn schedule_roaming(world: &WorldState, timeline: &mut Timeline, id: &ThingId) {
    timeline.add_event_interval(
        world.clock,
        world.config.roam_period,
        world.config.roam_period,
        Repeats::Forever,
        Some(id.clone()),
        StepKind::RoamPulse {
            character: id.clone(),
        },
    );
}

/// One roam pulse: maybe start a single-block walk in a random direction.
///
/// Directions currently bordered by something are excluded, so a cornered
/// NPC simply stands still. Mirrors the idle wander of overworld NPCs.
///
/// # Errors
///
/// Returns `OracleError::RandomNotAvailable` when no random source is
/// wired in.
pub fn roam_pulse(
    world: &mut WorldState,
    env: &Env<'_>,
    timeline: &mut Timeline,
    id: &ThingId,
) -> Result<(), OracleError> {
    let random = env.random()?;

    let open: Vec<Direction> = {
        let Some(character) = world.groups.character(id) else {
            return Ok(());
        };
        if character.walking || !character.may_walk() {
            return Ok(());
        }
        Direction::ALL
            .into_iter()
            .filter(|&direction| character.bordering(direction).is_none())
            .collect()
    };
    if open.is_empty() {
        return Ok(());
    }

    let pick = world.rng.random_int(random, open.len() as u32) as usize;
    super::start_walking(world, env, timeline, id, open[pick]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::PcgRandom;
    use crate::geometry::Bounds;
    use crate::state::{CharacterState, GroupKind, ThingState};

    fn world_with_npc() -> (WorldState, ThingId) {
        let mut world = WorldState::new(GameConfig::new(), 9);
        let id = ThingId::new("npc");
        let thing = ThingState::new(
            id.clone(),
            "npc",
            GroupKind::Character,
            Bounds::from_origin(32, 32, 16, 16),
        );
        world.groups.insert_character(CharacterState::new(thing, 2));
        (world, id)
    }

    #[test]
    fn pulse_starts_a_walk_in_an_open_direction() {
        let (mut world, id) = world_with_npc();
        let mut timeline = Timeline::new();
        let random = PcgRandom;
        let env = Env::empty().with_random(&random);

        roam_pulse(&mut world, &env, &mut timeline, &id).unwrap();

        assert!(world.groups.character(&id).unwrap().walking);
    }

    #[test]
    fn fully_cornered_npc_stays_put() {
        let (mut world, id) = world_with_npc();
        let mut timeline = Timeline::new();
        let random = PcgRandom;
        let env = Env::empty().with_random(&random);

        {
            let npc = world.groups.character_mut(&id).unwrap();
            for direction in Direction::ALL {
                npc.set_bordering(direction, ThingId::new("wall"));
            }
        }

        roam_pulse(&mut world, &env, &mut timeline, &id).unwrap();

        assert!(!world.groups.character(&id).unwrap().walking);
    }

    #[test]
    fn pulse_without_random_source_is_an_error() {
        let (mut world, id) = world_with_npc();
        let mut timeline = Timeline::new();

        let result = roam_pulse(&mut world, &Env::empty(), &mut timeline, &id);

        assert_eq!(result.unwrap_err(), OracleError::RandomNotAvailable);
    }
}
