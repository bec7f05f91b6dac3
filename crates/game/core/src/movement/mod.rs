//! The movement state machine: walking segments, direction changes, key
//! intent, and the per-tick shift pass.
//!
//! Characters move continuously in pixels but commit to walking in whole
//! blocks: a started segment runs to the next grid line before intent is
//! re-evaluated. Timing comes from the timeline, never from frame deltas.

pub mod ledges;
pub mod roam;

use crate::battle;
use crate::env::{Env, WorldEvent};
use crate::error::ContentError;
use crate::geometry::{Axis, Direction};
use crate::state::{ThingId, WorldState};
use crate::timeline::{Repeats, StepKind, Timeline};

/// Sprite classes for the four facings. Right reuses the left-facing art
/// mirrored, which is what the flip bookkeeping is for.
fn direction_class(direction: Direction) -> &'static str {
    match direction {
        Direction::Top => "up",
        Direction::Right | Direction::Left => "left",
        Direction::Bottom => "down",
    }
}

/// Turns a character, updating sprite class and mirroring.
pub fn set_direction(world: &mut WorldState, env: &Env<'_>, id: &ThingId, direction: Direction) {
    let Some(character) = world.groups.character_mut(id) else {
        return;
    };
    let previous = character.direction;
    character.direction = direction;
    character.thing.direction = direction;

    let should_flip = direction == Direction::Right;
    let was_flipped = character.flipped;
    character.flipped = should_flip;

    if let Some(graphics) = env.graphics() {
        if previous != direction {
            graphics.remove_class(id, direction_class(previous));
            graphics.add_class(id, direction_class(direction));
        }
        if should_flip && !was_flipped {
            graphics.flip_horiz(id);
        } else if !should_flip && was_flipped {
            graphics.unflip_horiz(id);
        }
    }
}

/// Starts a one-block walking segment in the character's facing direction.
///
/// No-op while the character is talking, frozen, dead, or already walking.
pub fn start_walking(
    world: &mut WorldState,
    env: &Env<'_>,
    timeline: &mut Timeline,
    id: &ThingId,
    direction: Direction,
) {
    let block = world.config.block_px();
    let now = world.clock;

    set_direction(world, env, id, direction);

    let Some(character) = world.groups.character_mut(id) else {
        return;
    };
    if character.walking || !character.may_walk() {
        return;
    }

    let speed = character.speed;
    let ticks = world.config.ticks_per_block(speed);

    character.walking = true;
    character.wants_to_walk = false;
    character.next_direction = None;
    character.distance = block;
    if character.is_player {
        character.can_key_walking = false;
    }

    let bounds = character.thing.bounds;
    match direction {
        Direction::Top => {
            character.yvel = -speed;
            character.xvel = 0;
            character.destination = Some(bounds.top - block);
        }
        Direction::Right => {
            character.xvel = speed;
            character.yvel = 0;
            character.destination = Some(bounds.right + block);
        }
        Direction::Bottom => {
            character.yvel = speed;
            character.xvel = 0;
            character.destination = Some(bounds.bottom + block);
        }
        Direction::Left => {
            character.xvel = -speed;
            character.yvel = 0;
            character.destination = Some(bounds.left - block);
        }
    }

    // Sprite stepping cycle, twice per segment.
    let class_cycle = timeline.add_event_interval(
        now,
        (ticks / 2).max(1),
        (ticks / 2).max(1),
        Repeats::Forever,
        Some(id.clone()),
        StepKind::ClassCycle {
            character: id.clone(),
            classes: vec!["walking".to_owned(), "standing".to_owned()],
            index: 0,
        },
    );

    // Vertical walk cycles mirror the sprite on alternating segments.
    let flip_step = if direction.axis() == Axis::Vertical {
        Some(timeline.add_event_interval(
            now,
            ticks,
            ticks,
            Repeats::Forever,
            Some(id.clone()),
            StepKind::WalkFlipToggle {
                character: id.clone(),
            },
        ))
    } else {
        None
    };

    let walk_step = timeline.add_event_interval(
        now,
        ticks,
        ticks,
        Repeats::Forever,
        Some(id.clone()),
        StepKind::WalkSegmentDone {
            character: id.clone(),
        },
    );

    if let Some(character) = world.groups.character_mut(id) {
        character.class_cycle = Some(class_cycle);
        character.flip_step = flip_step;
        character.walk_step = Some(walk_step);
    }
}

/// Ends walking immediately: zeroes velocity and cancels animation steps.
pub fn stop_walking(world: &mut WorldState, env: &Env<'_>, timeline: &mut Timeline, id: &ThingId) {
    let Some(character) = world.groups.character_mut(id) else {
        return;
    };

    character.walking = false;
    character.xvel = 0;
    character.yvel = 0;
    character.destination = None;
    if character.is_player {
        character.can_key_walking = true;
    }

    for handle in [
        character.class_cycle.take(),
        character.flip_step.take(),
        character.walk_step.take(),
    ]
    .into_iter()
    .flatten()
    {
        timeline.cancel(handle);
    }

    if let Some(graphics) = env.graphics() {
        graphics.remove_class(id, "walking");
        graphics.add_class(id, "standing");
    }
}

/// Advances the sprite stepping cycle; returns the next cycle index.
pub fn class_cycle(
    world: &WorldState,
    env: &Env<'_>,
    id: &ThingId,
    classes: &[String],
    index: usize,
) -> usize {
    if classes.is_empty() || world.groups.character(id).is_none() {
        return index;
    }
    let next = (index + 1) % classes.len();
    if let Some(graphics) = env.graphics() {
        graphics.remove_class(id, &classes[index]);
        graphics.add_class(id, &classes[next]);
    }
    next
}

/// Toggles mid-stride mirroring for vertical walk cycles.
pub fn walk_flip_toggle(world: &mut WorldState, env: &Env<'_>, id: &ThingId) {
    let Some(character) = world.groups.character_mut(id) else {
        return;
    };
    character.flipped = !character.flipped;
    let flipped = character.flipped;
    if let Some(graphics) = env.graphics() {
        if flipped {
            graphics.flip_horiz(id);
        } else {
            graphics.unflip_horiz(id);
        }
    }
}

/// One walking segment finished: snap to the grid line and decide whether
/// to chain into another segment or stop.
///
/// # Errors
///
/// Propagates content errors from the wild-encounter roll.
pub fn on_walk_segment_done(
    world: &mut WorldState,
    env: &Env<'_>,
    timeline: &mut Timeline,
    id: &ThingId,
) -> Result<bool, ContentError> {
    let Some(character) = world.groups.character_mut(id) else {
        return Ok(false);
    };
    if !character.walking {
        return Ok(false);
    }

    // Correct sub-pixel drift: the segment ends exactly on its grid line.
    let direction = character.direction;
    if let Some(destination) = character.destination {
        match direction {
            Direction::Top => character.thing.bounds.set_top(destination),
            Direction::Right => character.thing.bounds.set_right(destination),
            Direction::Bottom => character.thing.bounds.set_bottom(destination),
            Direction::Left => character.thing.bounds.set_left(destination),
        }
    }

    let is_player = character.is_player;
    let hopping = character.hop.is_some();
    let in_grass = character.grass.is_some();
    let keys = character.keys;

    if is_player && in_grass && battle::grass_encounter_check(world, env)? {
        stop_walking(world, env, timeline, id);
        env.fire(WorldEvent::BattleStarted);
        return Ok(false);
    }

    // A hop carries the character over the ledge without re-reading keys.
    if hopping {
        extend_segment(world, id);
        return Ok(true);
    }

    if is_player {
        let next = if keys.holds(direction) {
            Some(direction)
        } else {
            Direction::ALL.into_iter().find(|&held| keys.holds(held))
        };
        match next {
            Some(next) if next == direction => {
                extend_segment(world, id);
                return Ok(true);
            }
            Some(next) => {
                stop_walking(world, env, timeline, id);
                start_walking(world, env, timeline, id, next);
                return Ok(true);
            }
            None => {
                stop_walking(world, env, timeline, id);
                return Ok(false);
            }
        }
    }

    stop_walking(world, env, timeline, id);
    Ok(false)
}

/// Pushes the destination one block further in the current direction.
fn extend_segment(world: &mut WorldState, id: &ThingId) {
    let block = world.config.block_px();
    let Some(character) = world.groups.character_mut(id) else {
        return;
    };
    let bounds = character.thing.bounds;
    character.destination = Some(match character.direction {
        Direction::Top => bounds.top - block,
        Direction::Right => bounds.right + block,
        Direction::Bottom => bounds.bottom + block,
        Direction::Left => bounds.left - block,
    });
}

/// Records a pressed direction key and starts walking when allowed.
pub fn player_key_down(
    world: &mut WorldState,
    env: &Env<'_>,
    timeline: &mut Timeline,
    direction: Direction,
) {
    let in_menu = world.screen.in_menu;
    let delay = world.config.deferred_walk_delay;
    let now = world.clock;

    let Some(player) = world.groups.player.as_mut() else {
        return;
    };
    let id = player.id().clone();
    player.keys.insert(crate::state::DirectionKeys::flag(direction));

    if player.talking || player.frozen {
        return;
    }

    if !player.can_key_walking {
        // Mid-segment: remembered and applied at the next grid line.
        player.next_direction = Some(direction);
        player.wants_to_walk = true;
        return;
    }

    if in_menu {
        player.wants_to_walk = true;
        player.next_direction = Some(direction);
        timeline.add_event(
            now,
            delay,
            Some(id.clone()),
            StepKind::DeferredWalkStart {
                character: id,
                direction,
            },
        );
        return;
    }

    start_walking(world, env, timeline, &id, direction);
}

/// Clears a released direction key. Walking stops at the segment boundary,
/// never mid-block.
pub fn player_key_up(world: &mut WorldState, direction: Direction) {
    if let Some(player) = world.groups.player.as_mut() {
        player.keys.remove(crate::state::DirectionKeys::flag(direction));
        if player.next_direction == Some(direction) {
            player.next_direction = None;
            player.wants_to_walk = false;
        }
    }
}

/// A deferred walk intent fires: start walking if the key is still held
/// and nothing re-blocked the player since.
pub fn on_deferred_walk_start(
    world: &mut WorldState,
    env: &Env<'_>,
    timeline: &mut Timeline,
    id: &ThingId,
    direction: Direction,
) {
    if world.screen.in_menu {
        return;
    }
    let Some(player) = world.groups.character(id) else {
        return;
    };
    if !player.keys.holds(direction) || !player.may_walk() || player.walking {
        return;
    }
    start_walking(world, env, timeline, id, direction);
}

/// The per-tick shift pass: applies velocity to every live character.
///
/// A character bordered in its movement direction does not advance this
/// tick; the flush snap from collision already holds it in place.
pub fn maintain_characters(world: &mut WorldState) {
    for id in world.groups.character_ids() {
        let Some(character) = world.groups.character_mut(&id) else {
            continue;
        };
        if !character.thing.alive || character.frozen {
            continue;
        }

        let direction = character.direction;
        let blocked = character.bordering(direction).is_some();
        if blocked {
            match direction.axis() {
                Axis::Horizontal => character.xvel = 0,
                Axis::Vertical => character.yvel = 0,
            }
        }

        let (xvel, yvel) = (character.xvel, character.yvel);
        if xvel != 0 {
            character.thing.bounds.shift_horiz(xvel);
            character.clear_axis_borders(Axis::Horizontal);
        }
        if yvel != 0 {
            character.thing.bounds.shift_vert(yvel);
            character.clear_axis_borders(Axis::Vertical);
        }
    }
}

/// Keeps the viewport centered on the player along scrollable axes.
pub fn maintain_player(world: &mut WorldState) {
    let Some(player) = world.groups.player.as_ref() else {
        return;
    };
    let (mid_x, mid_y) = (player.bounds().mid_x(), player.bounds().mid_y());
    world.screen.follow_horizontal(mid_x);
    world.screen.follow_vertical(mid_y);
}

/// Kills a thing: marks it dead and non-collidable, hides it, and cancels
/// all of its scheduled steps. Removal happens in the maintenance phase.
pub fn kill_normal(world: &mut WorldState, env: &Env<'_>, timeline: &mut Timeline, id: &ThingId) {
    if let Some(thing) = world.groups.thing_mut(id) {
        thing.alive = false;
        thing.hidden = true;
        thing.nocollide = true;
    } else {
        return;
    }
    timeline.cancel_all_for(id);
    env.fire(WorldEvent::ThingKilled { thing: id.clone() });
}
