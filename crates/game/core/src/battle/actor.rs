//! Battle actors and their level-scaled statistics.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::env::{BaseStatistics, SpeciesOracle};
use crate::error::ContentError;

/// A current/maximum pair. Health is the only statistic that routinely
/// diverges from its maximum mid-battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistic {
    pub current: u16,
    pub max: u16,
}

impl Statistic {
    pub fn new(max: u16) -> Self {
        Self { current: max, max }
    }

    /// Subtracts damage, clamping at zero.
    pub fn damage(&mut self, amount: u16) {
        self.current = self.current.saturating_sub(amount);
    }

    /// Adds healing, clamping at the maximum.
    pub fn heal(&mut self, amount: u16) {
        self.current = (self.current + amount).min(self.max);
    }

    /// Raises the maximum while preserving damage already taken.
    pub fn grow_to(&mut self, new_max: u16) {
        let taken = self.max.saturating_sub(self.current);
        self.max = new_max;
        self.current = new_max.saturating_sub(taken);
    }

    pub fn is_zero(&self) -> bool {
        self.current == 0
    }
}

/// The five battle statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatisticSet {
    pub health: Statistic,
    pub attack: Statistic,
    pub defense: Statistic,
    pub special: Statistic,
    pub speed: Statistic,
}

impl StatisticSet {
    /// Computes the full set from base statistics at a level.
    pub fn from_base(base: &BaseStatistics, level: u8) -> Self {
        Self {
            health: Statistic::new(health_value(base.health, level)),
            attack: Statistic::new(stat_value(base.attack, level)),
            defense: Statistic::new(stat_value(base.defense, level)),
            special: Statistic::new(stat_value(base.special, level)),
            speed: Statistic::new(stat_value(base.speed, level)),
        }
    }

    /// Rescales every maximum for a new level, preserving damage taken.
    pub fn grow_from_base(&mut self, base: &BaseStatistics, level: u8) {
        self.health.grow_to(health_value(base.health, level));
        self.attack.grow_to(stat_value(base.attack, level));
        self.defense.grow_to(stat_value(base.defense, level));
        self.special.grow_to(stat_value(base.special, level));
        self.speed.grow_to(stat_value(base.speed, level));
    }
}

fn stat_value(base: u16, level: u8) -> u16 {
    ((u32::from(base) * 2 * u32::from(level)) / 100 + 5) as u16
}

fn health_value(base: u16, level: u8) -> u16 {
    ((u32::from(base) * 2 * u32::from(level)) / 100 + u32::from(level) + 10) as u16
}

/// One known move with its remaining uses.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveSlot {
    pub title: String,
    pub remaining: u8,
    pub total: u8,
}

impl MoveSlot {
    pub fn new(title: impl Into<String>, total: u8) -> Self {
        Self {
            title: title.into(),
            remaining: total,
            total,
        }
    }
}

/// One creature on a battle roster.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleActor {
    pub title: String,
    pub nickname: Option<String>,
    pub level: u8,
    pub experience: u32,
    pub statistics: StatisticSet,
    pub moves: ArrayVec<MoveSlot, { GameConfig::MAX_MOVES }>,
    pub status: Option<String>,
}

impl BattleActor {
    /// Builds a fresh actor of a species at a level.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::UnknownSpecies` if the oracle does not know
    /// the species.
    pub fn from_species(
        species: &dyn SpeciesOracle,
        title: &str,
        level: u8,
    ) -> Result<Self, ContentError> {
        let base = species
            .base_statistics(title)
            .ok_or_else(|| ContentError::UnknownSpecies(title.to_owned()))?;
        let experience = species.experience_to_level(title, level).unwrap_or(0);
        Ok(Self {
            title: title.to_owned(),
            nickname: None,
            level,
            experience,
            statistics: StatisticSet::from_base(&base, level),
            moves: ArrayVec::new(),
            status: None,
        })
    }

    pub fn with_move(mut self, title: impl Into<String>, total: u8) -> Self {
        if !self.moves.is_full() {
            self.moves.push(MoveSlot::new(title, total));
        }
        self
    }

    /// The name shown in battle text.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.title)
    }

    pub fn fainted(&self) -> bool {
        self.statistics.health.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaseStatistics {
        BaseStatistics {
            health: 45,
            attack: 49,
            defense: 49,
            special: 65,
            speed: 45,
        }
    }

    #[test]
    fn statistics_scale_with_level() {
        let at_five = StatisticSet::from_base(&base(), 5);
        let at_fifty = StatisticSet::from_base(&base(), 50);

        assert_eq!(at_five.health.max, 19);
        assert_eq!(at_five.attack.max, 9);
        assert!(at_fifty.health.max > at_five.health.max);
        assert!(at_fifty.speed.max > at_five.speed.max);
    }

    #[test]
    fn growth_preserves_damage_taken() {
        let mut statistics = StatisticSet::from_base(&base(), 5);
        statistics.health.damage(7);
        let taken = statistics.health.max - statistics.health.current;

        statistics.grow_from_base(&base(), 6);

        assert_eq!(statistics.health.max - statistics.health.current, taken);
    }

    #[test]
    fn health_clamps_at_zero_and_max() {
        let mut health = Statistic::new(20);
        health.damage(500);
        assert_eq!(health.current, 0);

        health.heal(500);
        assert_eq!(health.current, 20);
    }
}
