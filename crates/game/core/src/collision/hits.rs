//! Contact handlers, one per [`HitBehavior`].
//!
//! Handlers mutate the world through id lookups, taking snapshots of the
//! touched side before borrowing the mover mutably. Every handler tolerates
//! either party having died earlier in the same pass.

use crate::env::{DialogFinish, Env, badge_key};
use crate::error::ContentError;
use crate::geometry::{Bounds, Direction, direction_bordering, is_overlapping_on_axis, is_within_grass};
use crate::movement;
use crate::state::{DirectionKeys, ThingId, WorldState};
use crate::timeline::Timeline;

use super::CollisionSignal;
use super::registry::HitBehavior;

/// The menu dialog and plaque text land in.
pub const DIALOG_MENU: &str = "GeneralText";

pub(super) fn run(
    world: &mut WorldState,
    env: &Env<'_>,
    timeline: &mut Timeline,
    behavior: HitBehavior,
    mover: &ThingId,
    other: &ThingId,
) -> Result<Option<CollisionSignal>, ContentError> {
    match behavior {
        HitBehavior::Character => {
            solid_contact(world, mover, other);
            maybe_open_dialog(world, env, timeline, mover, other);
            Ok(None)
        }
        HitBehavior::Solid => {
            solid_contact(world, mover, other);
            Ok(None)
        }
        HitBehavior::Ledge => {
            ledge_contact(world, env, timeline, mover, other);
            Ok(None)
        }
        HitBehavior::Transporter => transporter_contact(world, mover, other),
        HitBehavior::Dialog => {
            maybe_open_dialog(world, env, timeline, mover, other);
            solid_contact(world, mover, other);
            Ok(None)
        }
        HitBehavior::GymStatue => {
            maybe_open_statue_dialog(world, env, mover, other);
            solid_contact(world, mover, other);
            Ok(None)
        }
        HitBehavior::Grass => {
            grass_contact(world, mover, other);
            Ok(None)
        }
    }
}

/// A contact that only touches at a single corner point carries no useful
/// direction; treating it as a side contact would wedge diagonal movement.
fn corner_degenerate(mover: &Bounds, other: &Bounds, direction: Direction) -> bool {
    match direction {
        Direction::Top | Direction::Bottom => {
            mover.left == other.right || other.left == mover.right
        }
        Direction::Right | Direction::Left => {
            mover.top == other.bottom || other.top == mover.bottom
        }
    }
}

/// Bordering bookkeeping plus the flush snap that prevents tunneling.
fn solid_contact(world: &mut WorldState, mover_id: &ThingId, other_id: &ThingId) {
    let tolerance = world.config.unit;
    let Some(other_bounds) = world.groups.bounds_of(other_id) else {
        return;
    };
    let Some(mover) = world.groups.character_mut(mover_id) else {
        return;
    };

    let bounds = mover.thing.bounds;
    let Some(direction) = direction_bordering(&bounds, &other_bounds, tolerance) else {
        return;
    };
    if corner_degenerate(&bounds, &other_bounds, direction) {
        return;
    }

    mover.set_bordering(direction, other_id.clone());

    if bounds.overlaps(&other_bounds) {
        match direction {
            Direction::Top => mover.thing.bounds.set_top(other_bounds.bottom),
            Direction::Right => mover.thing.bounds.set_right(other_bounds.left),
            Direction::Bottom => mover.thing.bounds.set_bottom(other_bounds.top),
            Direction::Left => mover.thing.bounds.set_left(other_bounds.right),
        }
    }
}

/// Transporters arm on a matching-direction contact and fire once the
/// player lines up with them on the movement axis.
fn transporter_contact(
    world: &mut WorldState,
    mover_id: &ThingId,
    other_id: &ThingId,
) -> Result<Option<CollisionSignal>, ContentError> {
    let tolerance = world.config.unit;
    let Some(other) = world.groups.thing(other_id) else {
        return Ok(None);
    };
    let other_bounds = other.bounds;
    let armed = other.traits.activated;
    let required = other.traits.require_direction;
    let target = other.traits.transport.clone();

    let Some(mover) = world.groups.character(mover_id) else {
        return Ok(None);
    };
    if !mover.is_player {
        return Ok(None);
    }
    let mover_bounds = mover.thing.bounds;
    let mover_direction = mover.direction;

    if armed {
        if is_overlapping_on_axis(&mover_bounds, &other_bounds, mover_direction, tolerance) {
            let target = target.ok_or_else(|| ContentError::MissingTransport(other_id.clone()))?;
            return Ok(Some(CollisionSignal::Transport {
                thing: other_id.clone(),
                target,
            }));
        }
        return Ok(None);
    }

    let direction = direction_bordering(&mover_bounds, &other_bounds, tolerance);
    let matching = match required {
        Some(required) => direction == Some(required),
        None => direction.is_some(),
    };
    if matching
        && let Some(other) = world.groups.thing_mut(other_id)
    {
        other.traits.activated = true;
    }
    Ok(None)
}

/// Opens the touched thing's dialog if the player is free to talk.
///
/// Both sides freeze; they stay frozen until the runtime reports the dialog
/// finished (see [`finish_dialog`]).
fn maybe_open_dialog(
    world: &mut WorldState,
    env: &Env<'_>,
    timeline: &mut Timeline,
    mover_id: &ThingId,
    other_id: &ThingId,
) {
    let Some(menus) = env.menus() else {
        return;
    };
    if menus.active_menu().is_some() {
        return;
    }

    let tolerance = world.config.unit;
    let Some(player) = world.groups.character(mover_id) else {
        return;
    };
    if !player.is_player || player.talking {
        return;
    }
    let player_bounds = player.thing.bounds;

    let Some(other) = world.groups.thing(other_id) else {
        return;
    };
    let Some(table) = other.traits.dialog.clone() else {
        return;
    };
    let switch_direction = other.traits.switch_direction_on_dialog;

    // The table is keyed by the side of the listener the player stands at.
    let Some(approach) = direction_bordering(&other.bounds, &player_bounds, tolerance) else {
        return;
    };
    let Some(lines) = table.for_direction(approach) else {
        return;
    };
    let lines = lines.to_vec();

    if let Some(player) = world.groups.character_mut(mover_id) {
        player.talking = true;
        player.keys = DirectionKeys::empty();
    }

    if world.groups.character(other_id).is_some() {
        movement::stop_walking(world, env, timeline, other_id);
        if let Some(listener) = world.groups.character_mut(other_id) {
            listener.talking = true;
        }
        if switch_direction {
            movement::set_direction(world, env, other_id, approach);
        }
    } else if switch_direction
        && let Some(listener) = world.groups.thing_mut(other_id)
    {
        listener.direction = approach;
    }

    menus.create_menu(DIALOG_MENU);
    menus.add_menu_dialog(
        DIALOG_MENU,
        &lines,
        DialogFinish::EndDialog {
            mover: mover_id.clone(),
            other: other_id.clone(),
        },
    );
    menus.set_active_menu(DIALOG_MENU);
}

/// Gym statues generate their plaque text instead of carrying authored
/// dialog, with an extra line for players holding the gym's badge.
fn maybe_open_statue_dialog(
    world: &mut WorldState,
    env: &Env<'_>,
    mover_id: &ThingId,
    other_id: &ThingId,
) {
    let Some(menus) = env.menus() else {
        return;
    };
    if menus.active_menu().is_some() {
        return;
    }

    let Some(player) = world.groups.character(mover_id) else {
        return;
    };
    if !player.is_player || player.talking {
        return;
    }

    let Some(other) = world.groups.thing(other_id) else {
        return;
    };
    let Some(statue) = other.traits.gym_statue.clone() else {
        return;
    };

    let mut lines = vec![
        statue.gym.clone(),
        format!("LEADER: {}", statue.leader),
    ];
    let has_badge = env
        .store()
        .and_then(|store| store.get(&badge_key(&statue.gym)))
        .is_some();
    if has_badge {
        lines.push(format!("WINNING TRAINERS: {}", statue.leader));
    }

    if let Some(player) = world.groups.character_mut(mover_id) {
        player.talking = true;
        player.keys = DirectionKeys::empty();
    }

    menus.create_menu(DIALOG_MENU);
    menus.add_menu_dialog(
        DIALOG_MENU,
        &lines,
        DialogFinish::EndDialog {
            mover: mover_id.clone(),
            other: other_id.clone(),
        },
    );
    menus.set_active_menu(DIALOG_MENU);
}

/// Ledges hop the mover when pushed from the authored direction; any other
/// approach is a wall.
fn ledge_contact(
    world: &mut WorldState,
    env: &Env<'_>,
    timeline: &mut Timeline,
    mover_id: &ThingId,
    other_id: &ThingId,
) {
    let Some(other) = world.groups.thing(other_id) else {
        return;
    };
    let push = other.traits.push_direction;

    let Some(mover) = world.groups.character(mover_id) else {
        return;
    };
    if mover.ledge.is_some() || mover.hop.is_some() {
        return;
    }

    if mover.walking && push == Some(mover.direction) {
        movement::ledges::start_ledge_hop(world, timeline, mover_id, other_id);
    } else {
        solid_contact(world, mover_id, other_id);
    }
}

/// Grass is walk-through; the contact only records containment so the
/// walking stop can roll for encounters.
fn grass_contact(world: &mut WorldState, mover_id: &ThingId, other_id: &ThingId) {
    let offset = world.config.grass_line_offset;
    let Some(grass_bounds) = world.groups.bounds_of(other_id) else {
        return;
    };
    let Some(mover) = world.groups.character_mut(mover_id) else {
        return;
    };
    if is_within_grass(&mover.thing.bounds, &grass_bounds, offset) {
        mover.grass = Some(other_id.clone());
    } else if mover.grass.as_ref() == Some(other_id) {
        mover.grass = None;
    }
}

/// Re-enters the movement layer once the runtime reports a dialog closed.
///
/// Unfreezes both talkers and restores the listener's preferred facing.
pub fn finish_dialog(
    world: &mut WorldState,
    env: &Env<'_>,
    mover_id: &ThingId,
    other_id: &ThingId,
) {
    if let Some(player) = world.groups.character_mut(mover_id) {
        player.talking = false;
    }

    let preferred = world
        .groups
        .thing(other_id)
        .and_then(|other| other.traits.direction_preferred);

    if world.groups.character(other_id).is_some() {
        if let Some(listener) = world.groups.character_mut(other_id) {
            listener.talking = false;
        }
        if let Some(preferred) = preferred {
            movement::set_direction(world, env, other_id, preferred);
        }
    } else if let Some(preferred) = preferred
        && let Some(listener) = world.groups.thing_mut(other_id)
    {
        listener.direction = preferred;
    }

    env.fire(crate::env::WorldEvent::DialogFinished {
        mover: mover_id.clone(),
        other: other_id.clone(),
    });
}
