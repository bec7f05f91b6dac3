//! The collision engine: candidate pruning, contact classification, and
//! contact handling.
//!
//! Runs once per tick after timeline steps. Characters are the only movers;
//! every contact is (character, thing). The player is processed first, which
//! doubles as the canonical ordering for player-against-character contacts:
//! an NPC never re-processes a pair its player pass already handled.

mod hits;
mod quadrants;
mod registry;

pub use hits::{DIALOG_MENU, finish_dialog};
pub use quadrants::QuadrantGrid;
pub use registry::{HitBehavior, HitRegistry, MoverClass, TouchClass, touch_class};

use crate::env::Env;
use crate::error::ContentError;
use crate::state::{ThingId, TransportTarget, WorldState};
use crate::timeline::Timeline;

/// Side effects a collision pass hands up to the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CollisionSignal {
    /// An armed transporter fired under the player.
    Transport {
        thing: ThingId,
        target: TransportTarget,
    },
}

/// Everything a collision pass produced.
#[derive(Debug, Default)]
pub struct CollisionReport {
    pub signals: Vec<CollisionSignal>,

    /// Contacts abandoned on broken content, with the mover being
    /// processed. The pass continues past each fault.
    pub faults: Vec<(ThingId, ContentError)>,
}

/// Runs one full collision pass over every live character.
pub fn detect(
    world: &mut WorldState,
    env: &Env<'_>,
    timeline: &mut Timeline,
    registry: &HitRegistry,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    let tolerance = world.config.unit;
    let grid = QuadrantGrid::build(&world.groups, world.config.block_px());
    let player_id = world.groups.player.as_ref().map(|player| player.id().clone());

    for mover_id in world.groups.character_ids() {
        let Some(mover) = world.groups.character(&mover_id) else {
            continue;
        };
        if !mover.thing.can_collide() {
            continue;
        }
        let mover_class = if mover.is_player {
            MoverClass::Player
        } else {
            MoverClass::Npc
        };

        let candidates = grid.candidates(mover.bounds(), tolerance);
        for other_id in candidates {
            if other_id == mover_id {
                continue;
            }
            if mover_class == MoverClass::Npc && Some(&other_id) == player_id.as_ref() {
                // The player's pass already handled this pair.
                continue;
            }

            // Refetch the mover each contact: an earlier snap may have
            // moved it, or a handler may have killed it.
            let behavior = {
                let Some(mover) = world.groups.character(&mover_id) else {
                    break;
                };
                if !mover.thing.can_collide() {
                    break;
                }
                let Some(other) = world.groups.thing(&other_id) else {
                    continue;
                };
                if !other.can_collide() {
                    continue;
                }
                if !mover.thing.bounds.touches(&other.bounds) {
                    continue;
                }
                let Some(touch) = touch_class(other) else {
                    continue;
                };
                let Some(behavior) = registry.behavior(mover_class, touch) else {
                    continue;
                };
                behavior
            };

            match hits::run(world, env, timeline, behavior, &mover_id, &other_id) {
                Ok(Some(signal)) => report.signals.push(signal),
                Ok(None) => {}
                Err(error) => report.faults.push((mover_id.clone(), error)),
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::geometry::{Bounds, Direction};
    use crate::state::{CharacterState, GroupKind, ThingState, ThingTraits};

    fn world() -> WorldState {
        WorldState::new(GameConfig::new(), 0)
    }

    fn player_at(left: i32, top: i32) -> CharacterState {
        let thing = ThingState::new(
            ThingId::new("player"),
            "player",
            GroupKind::Character,
            Bounds::from_origin(left, top, 16, 16),
        );
        CharacterState::new(thing, 4).into_player()
    }

    fn solid_at(id: &str, left: i32, top: i32) -> ThingState {
        ThingState::new(
            ThingId::new(id),
            "wall",
            GroupKind::Solid,
            Bounds::from_origin(left, top, 16, 16),
        )
    }

    #[test]
    fn overlapping_solid_snaps_the_mover_flush() {
        let mut world = world();
        let mut player = player_at(0, 0);
        // Walked 2px into the wall on the right.
        player.thing.bounds = Bounds::from_origin(2, 0, 16, 16);
        player.direction = Direction::Right;
        world.groups.insert_character(player);
        world.groups.insert(solid_at("wall", 16, 0));

        let mut timeline = Timeline::new();
        let report = detect(
            &mut world,
            &Env::empty(),
            &mut timeline,
            &HitRegistry::standard(),
        );

        assert!(report.faults.is_empty());
        let player = world.groups.player.as_ref().unwrap();
        assert_eq!(player.bounds().right, 16);
        assert_eq!(
            player.bordering(Direction::Right),
            Some(&ThingId::new("wall"))
        );
    }

    #[test]
    fn transporter_arms_then_fires() {
        let mut world = world();
        let mut player = player_at(0, 16);
        player.direction = Direction::Top;
        world.groups.insert_character(player);

        let door = solid_at("door", 0, 0).with_traits(ThingTraits {
            transport: Some(TransportTarget::Location("Home".into())),
            require_direction: Some(Direction::Top),
            ..ThingTraits::default()
        });
        world.groups.insert(door);

        let mut timeline = Timeline::new();
        let registry = HitRegistry::standard();

        // First contact: player borders the door from below. Arms only.
        let report = detect(&mut world, &Env::empty(), &mut timeline, &registry);
        assert!(report.signals.is_empty());
        assert!(
            world
                .groups
                .thing(&ThingId::new("door"))
                .unwrap()
                .traits
                .activated
        );

        // Step onto the pad: overlapping on the vertical axis fires it.
        world
            .groups
            .player
            .as_mut()
            .unwrap()
            .thing
            .bounds = Bounds::from_origin(0, 0, 16, 16);
        let report = detect(&mut world, &Env::empty(), &mut timeline, &registry);
        assert_eq!(
            report.signals,
            vec![CollisionSignal::Transport {
                thing: ThingId::new("door"),
                target: TransportTarget::Location("Home".into()),
            }]
        );
    }

    #[test]
    fn corner_only_contact_sets_no_bordering() {
        let mut world = world();
        let mut player = player_at(16, 16);
        player.direction = Direction::Top;
        world.groups.insert_character(player);
        world.groups.insert(solid_at("corner", 0, 0));

        let mut timeline = Timeline::new();
        detect(
            &mut world,
            &Env::empty(),
            &mut timeline,
            &HitRegistry::standard(),
        );

        let player = world.groups.player.as_ref().unwrap();
        assert!(player.bordering(Direction::Top).is_none());
        assert!(player.bordering(Direction::Left).is_none());
    }

    #[test]
    fn grass_contact_records_containment_without_snapping() {
        let mut world = world();
        world.groups.insert_character(player_at(0, 0));

        let mut patch = solid_at("patch", 0, 4);
        patch.group = GroupKind::Scenery;
        patch.traits.grass = true;
        world.groups.insert(patch);

        let mut timeline = Timeline::new();
        detect(
            &mut world,
            &Env::empty(),
            &mut timeline,
            &HitRegistry::standard(),
        );

        let player = world.groups.player.as_ref().unwrap();
        assert_eq!(player.grass, Some(ThingId::new("patch")));
        assert_eq!(player.bounds().top, 0);
    }
}
