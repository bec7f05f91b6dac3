//! Move oracle: schemas for battle moves and their effects.

/// One effect a move applies when it lands.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveEffectSchema {
    /// Standard damage using the move's power.
    Damage { power: u32 },

    /// Shifts a stat stage on the target (or the user when `on_self`).
    StatStage {
        stat: StatKind,
        stages: i8,
        on_self: bool,
    },

    /// Applies a named status condition to the target.
    Status { status: String },
}

/// Stat identifiers targeted by stage effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatKind {
    Attack,
    Defense,
    Special,
    Speed,
}

/// Authored schema for one battle move.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveSchema {
    pub title: String,

    /// Damage base power; zero for pure status moves.
    pub power: u32,

    /// Turn-order priority bracket. Higher acts earlier within move actions.
    pub priority: i8,

    /// Hit chance out of 100. `None` never misses.
    pub accuracy: Option<u8>,

    pub effects: Vec<MoveEffectSchema>,
}

/// Read-only move data for the battle pipeline.
pub trait MoveOracle: Send + Sync {
    fn move_schema(&self, title: &str) -> Option<&MoveSchema>;
}
