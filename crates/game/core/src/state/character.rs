//! Character state: the movement state machine's per-thing bookkeeping.

use bitflags::bitflags;

use crate::geometry::{Axis, Bounds, Direction};
use crate::timeline::EventHandle;

use super::{GroupKind, ThingId, ThingState};

bitflags! {
    /// Player directional-intent flags, one bit per held direction key.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct DirectionKeys: u8 {
        const UP = 1 << 0;
        const RIGHT = 1 << 1;
        const DOWN = 1 << 2;
        const LEFT = 1 << 3;
    }
}

impl DirectionKeys {
    /// The flag bit for a direction.
    pub const fn flag(direction: Direction) -> DirectionKeys {
        match direction {
            Direction::Top => DirectionKeys::UP,
            Direction::Right => DirectionKeys::RIGHT,
            Direction::Bottom => DirectionKeys::DOWN,
            Direction::Left => DirectionKeys::LEFT,
        }
    }

    /// Whether the key for `direction` is held.
    pub fn holds(&self, direction: Direction) -> bool {
        self.contains(Self::flag(direction))
    }
}

/// Transient ledge-hop bookkeeping: the per-tick visual offset delta,
/// inverted at the hop's midpoint to form the triangular arc.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HopState {
    pub dy: i32,
}

/// A character: a thing with direction, velocity, and walking state.
///
/// Mutated by the collision engine (bordering, position snaps) and the
/// movement state machine (direction, velocity, walking flags); no other
/// component relocates a character within a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterState {
    pub thing: ThingState,

    pub direction: Direction,
    pub xvel: i32,
    pub yvel: i32,
    pub speed: i32,

    /// Edge coordinate the current walking segment ends at.
    pub destination: Option<i32>,

    /// Pixel length of the current walking segment, kept for chaining.
    pub distance: i32,

    pub walking: bool,

    /// Deferred walk intent, consumed by the maintenance pass.
    pub wants_to_walk: bool,

    /// Direction to walk when the deferred intent fires.
    pub next_direction: Option<Direction>,

    pub talking: bool,
    pub frozen: bool,

    /// Current horizontal sprite mirroring.
    pub flipped: bool,

    /// Weak references to the thing touching each side, re-detected every
    /// tick; slots on the movement axis are cleared after each shift.
    pub bordering: [Option<ThingId>; 4],

    /// Ledge currently being hopped, if any.
    pub ledge: Option<ThingId>,

    /// Transient shadow thing spawned for the hop's duration.
    pub shadow: Option<ThingId>,

    pub hop: Option<HopState>,

    /// Grass patch the character currently stands in.
    pub grass: Option<ThingId>,

    pub is_player: bool,
    pub keys: DirectionKeys,
    pub can_key_walking: bool,

    /// Handles to the walking animation steps, for targeted cancellation.
    pub class_cycle: Option<EventHandle>,
    pub flip_step: Option<EventHandle>,
    pub walk_step: Option<EventHandle>,
}

impl CharacterState {
    pub fn new(thing: ThingState, speed: i32) -> Self {
        debug_assert_eq!(thing.group, GroupKind::Character);
        Self {
            thing,
            direction: Direction::default(),
            xvel: 0,
            yvel: 0,
            speed: speed.max(1),
            destination: None,
            distance: 0,
            walking: false,
            wants_to_walk: false,
            next_direction: None,
            talking: false,
            frozen: false,
            flipped: false,
            bordering: [None, None, None, None],
            ledge: None,
            shadow: None,
            hop: None,
            grass: None,
            is_player: false,
            keys: DirectionKeys::empty(),
            can_key_walking: false,
            class_cycle: None,
            flip_step: None,
            walk_step: None,
        }
    }

    /// Marks this character as the player singleton.
    pub fn into_player(mut self) -> Self {
        self.is_player = true;
        self.can_key_walking = true;
        self
    }

    pub fn id(&self) -> &ThingId {
        &self.thing.id
    }

    pub fn bounds(&self) -> &Bounds {
        &self.thing.bounds
    }

    /// The thing bordering the given side, if still recorded.
    pub fn bordering(&self, direction: Direction) -> Option<&ThingId> {
        self.bordering[direction.index()].as_ref()
    }

    pub fn set_bordering(&mut self, direction: Direction, other: ThingId) {
        self.bordering[direction.index()] = Some(other);
    }

    /// Clears the bordering slots on the axis the character moved along,
    /// ready for re-detection next tick.
    pub fn clear_axis_borders(&mut self, axis: Axis) {
        match axis {
            Axis::Horizontal => {
                self.bordering[Direction::Right.index()] = None;
                self.bordering[Direction::Left.index()] = None;
            }
            Axis::Vertical => {
                self.bordering[Direction::Top.index()] = None;
                self.bordering[Direction::Bottom.index()] = None;
            }
        }
    }

    /// Whether the movement state machine may start a walk right now.
    pub fn may_walk(&self) -> bool {
        self.thing.alive && !self.talking && !self.frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;
    use crate::state::ThingId;

    fn character() -> CharacterState {
        let thing = ThingState::new(
            ThingId::new("test::area::npc::0"),
            "npc",
            GroupKind::Character,
            Bounds::from_origin(0, 0, 16, 16),
        );
        CharacterState::new(thing, 4)
    }

    #[test]
    fn axis_border_clearing_leaves_the_other_axis() {
        let mut character = character();
        character.set_bordering(Direction::Right, ThingId::new("wall"));
        character.set_bordering(Direction::Top, ThingId::new("tree"));

        character.clear_axis_borders(Axis::Horizontal);

        assert!(character.bordering(Direction::Right).is_none());
        assert!(character.bordering(Direction::Top).is_some());
    }

    #[test]
    fn direction_keys_map_to_flags() {
        let mut keys = DirectionKeys::empty();
        keys.insert(DirectionKeys::flag(Direction::Left));

        assert!(keys.holds(Direction::Left));
        assert!(!keys.holds(Direction::Right));
    }
}
