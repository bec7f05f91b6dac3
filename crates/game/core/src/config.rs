//! Game configuration constants and tunable parameters.

/// Tunable engine parameters shared by every world instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// One grid unit in pixels. Bordering tolerance is exactly one unit.
    pub unit: i32,

    /// Units per block (one walking segment covers one block).
    pub block_units: i32,

    /// Ticks between roaming pulses for wandering NPCs.
    pub roam_period: u64,

    /// Ticks between viewport-overlap polls for window detectors.
    pub window_poll_period: u64,

    /// Delay in ticks between a queued walk intent and the walk start.
    pub deferred_walk_delay: u64,

    /// Offset in pixels from a character's top edge to its grass line.
    pub grass_line_offset: i32,

    /// Wild encounter chance out of 256 checked at each walking stop in grass.
    pub encounter_rate: u32,
}

impl GameConfig {
    // ===== compile-time capacities used as type parameters =====
    /// Moves a battle actor can know at once.
    pub const MAX_MOVES: usize = 4;
    /// Actors a battle team roster can hold.
    pub const MAX_PARTY: usize = 6;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_UNIT: i32 = 4;
    pub const DEFAULT_BLOCK_UNITS: i32 = 8;
    pub const DEFAULT_ROAM_PERIOD: u64 = 140;
    pub const DEFAULT_WINDOW_POLL_PERIOD: u64 = 7;
    pub const DEFAULT_DEFERRED_WALK_DELAY: u64 = 3;
    pub const DEFAULT_GRASS_LINE_OFFSET: i32 = 8;
    pub const DEFAULT_ENCOUNTER_RATE: u32 = 48;

    /// Inclusive bounds of the damage variance factor, applied over 255.
    pub const DAMAGE_VARIANCE_MIN: u32 = 217;
    pub const DAMAGE_VARIANCE_MAX: u32 = 255;

    pub fn new() -> Self {
        Self {
            unit: Self::DEFAULT_UNIT,
            block_units: Self::DEFAULT_BLOCK_UNITS,
            roam_period: Self::DEFAULT_ROAM_PERIOD,
            window_poll_period: Self::DEFAULT_WINDOW_POLL_PERIOD,
            deferred_walk_delay: Self::DEFAULT_DEFERRED_WALK_DELAY,
            grass_line_offset: Self::DEFAULT_GRASS_LINE_OFFSET,
            encounter_rate: Self::DEFAULT_ENCOUNTER_RATE,
        }
    }

    /// One block in pixels: the distance of a single walking segment.
    pub fn block_px(&self) -> i32 {
        self.unit * self.block_units
    }

    /// Ticks a character needs to cross one block at the given speed.
    pub fn ticks_per_block(&self, speed: i32) -> u64 {
        (self.block_px() / speed.max(1)).max(1) as u64
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
