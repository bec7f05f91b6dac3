//! Ledge hops: the one-way jump over a ledge thing.
//!
//! A hop is pure choreography over the timeline: the character keeps
//! walking straight through the ledge with collision disabled, while a
//! visual offset rises and falls in a triangular arc and a shadow tracks
//! the ground underneath.

use crate::env::Env;
use crate::state::{GroupKind, HopState, ThingId, ThingState, WorldState};
use crate::timeline::{Repeats, StepKind, Timeline};

use super::kill_normal;

/// Sprite title for the transient hop shadow.
const SHADOW_TITLE: &str = "Shadow";

/// Begins a hop over `ledge` for a character already walking into it.
///
/// Idempotent: a character mid-hop is never re-hopped.
pub fn start_ledge_hop(
    world: &mut WorldState,
    timeline: &mut Timeline,
    id: &ThingId,
    ledge: &ThingId,
) {
    let ticks = {
        let Some(character) = world.groups.character(id) else {
            return;
        };
        if character.hop.is_some() {
            return;
        }
        world.config.ticks_per_block(character.speed)
    };
    let rise = -(world.config.unit / 2).max(1);
    let now = world.clock;

    let shadow_id = ThingId::new(format!("{id}::shadow"));
    let shadow_bounds = {
        let Some(character) = world.groups.character_mut(id) else {
            return;
        };
        character.ledge = Some(ledge.clone());
        character.hop = Some(HopState { dy: rise });
        character.shadow = Some(shadow_id.clone());
        character.thing.nocollide = true;
        character.thing.bounds
    };

    let mut shadow = ThingState::new(
        shadow_id.clone(),
        SHADOW_TITLE,
        GroupKind::Scenery,
        shadow_bounds,
    );
    shadow.nocollide = true;
    world.groups.insert(shadow);

    // The arc: shift every tick, invert past the midpoint, land at the end.
    timeline.add_event_interval(
        now,
        1,
        1,
        Repeats::Count(ticks as u32 * 2),
        Some(id.clone()),
        StepKind::HopOffsetShift {
            character: id.clone(),
        },
    );
    timeline.add_event_interval(
        now,
        1,
        1,
        Repeats::Forever,
        Some(shadow_id),
        StepKind::ShadowFollow {
            character: id.clone(),
        },
    );
    timeline.add_event(
        now,
        ticks + 1,
        Some(id.clone()),
        StepKind::HopInvert {
            character: id.clone(),
        },
    );
    timeline.add_event(
        now,
        ticks * 2,
        Some(id.clone()),
        StepKind::HopEnd {
            character: id.clone(),
        },
    );
}

/// Applies the current per-tick offset delta.
pub fn hop_offset_shift(world: &mut WorldState, id: &ThingId) {
    if let Some(character) = world.groups.character_mut(id)
        && let Some(hop) = character.hop
    {
        character.thing.offset_y += hop.dy;
    }
}

/// Inverts the delta at the arc's midpoint: rising becomes falling.
pub fn hop_invert(world: &mut WorldState, id: &ThingId) {
    if let Some(character) = world.groups.character_mut(id)
        && let Some(hop) = character.hop.as_mut()
    {
        hop.dy = -hop.dy;
    }
}

/// Keeps the shadow glued to the ground under its hopping owner.
pub fn shadow_follow(world: &mut WorldState, id: &ThingId) {
    let Some(character) = world.groups.character(id) else {
        return;
    };
    let (owner_bounds, shadow_id) = match character.shadow.clone() {
        Some(shadow_id) => (character.thing.bounds, shadow_id),
        None => return,
    };
    if let Some(shadow) = world.groups.thing_mut(&shadow_id) {
        shadow.bounds.set_mid_x_of(&owner_bounds);
        shadow.bounds.set_bottom(owner_bounds.bottom);
    }
}

/// Lands the hop: restores collision, clears the visual offset, and kills
/// the shadow. Safe to call on a character that is not hopping.
pub fn end_ledge_hop(world: &mut WorldState, env: &Env<'_>, timeline: &mut Timeline, id: &ThingId) {
    let shadow = {
        let Some(character) = world.groups.character_mut(id) else {
            return;
        };
        character.hop = None;
        character.ledge = None;
        character.thing.offset_y = 0;
        character.thing.nocollide = false;
        character.shadow.take()
    };
    if let Some(shadow) = shadow {
        kill_normal(world, env, timeline, &shadow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::geometry::{Bounds, Direction};
    use crate::state::{CharacterState, Tick};

    fn hopping_world() -> (WorldState, ThingId, ThingId) {
        let mut world = WorldState::new(GameConfig::new(), 0);
        let player_id = ThingId::new("player");
        let ledge_id = ThingId::new("ledge");

        let thing = ThingState::new(
            player_id.clone(),
            "player",
            GroupKind::Character,
            Bounds::from_origin(0, 0, 16, 16),
        );
        let mut player = CharacterState::new(thing, 4).into_player();
        player.direction = Direction::Bottom;
        player.walking = true;
        world.groups.insert_character(player);

        let mut ledge = ThingState::new(
            ledge_id.clone(),
            "ledge",
            GroupKind::Solid,
            Bounds::from_origin(0, 16, 16, 8),
        );
        ledge.traits.ledge = true;
        ledge.traits.push_direction = Some(Direction::Bottom);
        world.groups.insert(ledge);

        (world, player_id, ledge_id)
    }

    #[test]
    fn hop_is_idempotent_while_active() {
        let (mut world, player, ledge) = hopping_world();
        let mut timeline = Timeline::new();

        start_ledge_hop(&mut world, &mut timeline, &player, &ledge);
        let scheduled = timeline.len();
        start_ledge_hop(&mut world, &mut timeline, &player, &ledge);

        assert_eq!(timeline.len(), scheduled);
    }

    #[test]
    fn hop_disables_collision_until_landing() {
        let (mut world, player, ledge) = hopping_world();
        let mut timeline = Timeline::new();
        let env = Env::empty();

        start_ledge_hop(&mut world, &mut timeline, &player, &ledge);
        assert!(world.groups.player.as_ref().unwrap().thing.nocollide);

        end_ledge_hop(&mut world, &env, &mut timeline, &player);
        let landed = world.groups.player.as_ref().unwrap();
        assert!(!landed.thing.nocollide);
        assert_eq!(landed.thing.offset_y, 0);
        assert!(landed.hop.is_none());
    }

    #[test]
    fn offset_arc_rises_then_falls_back_to_zero() {
        let (mut world, player, ledge) = hopping_world();
        let mut timeline = Timeline::new();
        let env = Env::empty();

        start_ledge_hop(&mut world, &mut timeline, &player, &ledge);
        let ticks = world.config.ticks_per_block(4);

        for tick in 1..=ticks * 2 {
            for step in timeline.take_due(Tick::new(tick)) {
                match &step.kind {
                    StepKind::HopOffsetShift { character } => {
                        hop_offset_shift(&mut world, character);
                    }
                    StepKind::HopInvert { character } => hop_invert(&mut world, character),
                    StepKind::HopEnd { character } => {
                        let character = character.clone();
                        end_ledge_hop(&mut world, &env, &mut timeline, &character);
                    }
                    StepKind::ShadowFollow { character } => {
                        let character = character.clone();
                        shadow_follow(&mut world, &character);
                    }
                    _ => {}
                }
                timeline.requeue(step);
            }
        }

        let landed = world.groups.player.as_ref().unwrap();
        assert_eq!(landed.thing.offset_y, 0);
        assert!(landed.hop.is_none());
        assert!(landed.shadow.is_none());
    }

    #[test]
    fn landing_kills_the_shadow() {
        let (mut world, player, ledge) = hopping_world();
        let mut timeline = Timeline::new();
        let env = Env::empty();

        start_ledge_hop(&mut world, &mut timeline, &player, &ledge);
        let shadow = ThingId::new("player::shadow");
        assert!(world.groups.thing(&shadow).is_some());

        end_ledge_hop(&mut world, &env, &mut timeline, &player);
        assert!(!world.groups.thing(&shadow).unwrap().alive);
    }
}
