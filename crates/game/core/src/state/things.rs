//! Live thing records and their authored traits.

use crate::geometry::{Bounds, Direction};

use super::{GroupKind, ThingId};

/// Destination of a transporter, in one of the three authored forms.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransportTarget {
    /// A bare location name within the active map.
    Location(String),

    /// A map switch, optionally with an explicit entry location.
    Map {
        map: String,
        location: Option<String>,
    },
}

/// Dialog lines attached to a thing, either uniform or keyed by the side
/// the player approaches from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DialogTable {
    Single(Vec<String>),
    Directional([Option<Vec<String>>; 4]),
}

impl DialogTable {
    /// Lines for an approach from `direction`, if any.
    pub fn for_direction(&self, direction: Direction) -> Option<&[String]> {
        match self {
            Self::Single(lines) => Some(lines),
            Self::Directional(table) => table[direction.index()].as_deref(),
        }
    }
}

/// Detector roles polled against the viewport by the streaming component.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DetectorKind {
    /// Activates an adjacent area's pre-placed things when reached.
    AreaSpawner { map: String, area: String },

    /// Starts a named scene routine.
    Scene(String),

    /// Fires a named broadcast event.
    Event(String),
}

/// Gym statue plaque: dialog is generated from the gym and leader names,
/// with a bonus line for players holding the gym's badge.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GymStatue {
    pub gym: String,
    pub leader: String,
}

/// Authored behavior attached to a thing. Immutable after materialization
/// except for the transporter arming flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThingTraits {
    /// Transporter destination. Activation without one is a content error.
    pub transport: Option<TransportTarget>,

    /// Directional key the player must hold for the transporter to fire.
    pub require_direction: Option<Direction>,

    /// Transporter arming state: armed on first matching-direction contact,
    /// fires on re-entry.
    pub activated: bool,

    /// Dialog opened when the player borders this thing.
    pub dialog: Option<DialogTable>,

    /// Turn to face the player as soon as dialog opens.
    pub switch_direction_on_dialog: bool,

    /// Direction to restore once dialog finishes.
    pub direction_preferred: Option<Direction>,

    /// Gym statue plaque data.
    pub gym_statue: Option<GymStatue>,

    /// This thing is a hoppable ledge; `push_direction` is the only
    /// approach that triggers a hop.
    pub ledge: bool,
    pub push_direction: Option<Direction>,

    /// Walking through this thing can trigger wild encounters.
    pub grass: bool,

    /// Viewport-polled detector role.
    pub detector: Option<DetectorKind>,

    /// NPC wanders on the roam period.
    pub roaming: bool,
}

/// One live rectangle-based game object.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThingState {
    pub id: ThingId,
    pub title: String,
    pub group: GroupKind,
    pub bounds: Bounds,

    /// Facing, also used as the spawn direction for area detectors.
    pub direction: Direction,

    pub alive: bool,
    pub hidden: bool,
    pub nocollide: bool,

    /// Visual-only vertical offset (ledge hops); never affects collision.
    pub offset_y: i32,

    /// Map and area this thing was materialized into.
    pub map_name: String,
    pub area_name: String,

    pub traits: ThingTraits,
}

impl ThingState {
    pub fn new(id: ThingId, title: impl Into<String>, group: GroupKind, bounds: Bounds) -> Self {
        Self {
            id,
            title: title.into(),
            group,
            bounds,
            direction: Direction::default(),
            alive: true,
            hidden: false,
            nocollide: false,
            offset_y: 0,
            map_name: String::new(),
            area_name: String::new(),
            traits: ThingTraits::default(),
        }
    }

    pub fn with_traits(mut self, traits: ThingTraits) -> Self {
        self.traits = traits;
        self
    }

    /// Whether this thing participates in collision this tick.
    #[inline]
    pub fn can_collide(&self) -> bool {
        self.alive && !self.nocollide
    }
}
