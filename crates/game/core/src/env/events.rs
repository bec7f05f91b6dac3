//! Broadcast event sink: notifications the core fires as state changes.

use crate::state::ThingId;

/// Events broadcast to whatever listeners the runtime wires in. Purely
/// informational; the core never reads them back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    ThingKilled { thing: ThingId },
    DialogFinished { mover: ThingId, other: ThingId },
    Knockout { team: BattleSide, actor: String },
    BattleStarted,
    BattleEnded,
    LevelUp { actor: String, level: u8 },
    Evolved { from: String, into: String },
    AreaSpawned { map: String, area: String },
    Transported { location: String },
    Custom { name: String },
}

/// Which side of a battle an event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleSide {
    Player,
    Opponent,
}

impl BattleSide {
    /// The other side.
    pub fn opponent(self) -> BattleSide {
        match self {
            Self::Player => Self::Opponent,
            Self::Opponent => Self::Player,
        }
    }
}

/// Listener surface supplied by the runtime.
pub trait EventSink {
    fn fire(&self, event: &WorldEvent);
}
