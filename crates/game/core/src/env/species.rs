//! Species oracle: base statistics, growth, and evolution data.

/// Base statistics for a species, before level scaling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStatistics {
    pub health: u16,
    pub attack: u16,
    pub defense: u16,
    pub special: u16,
    pub speed: u16,
}

/// Read-only species data used by battle setup and experience growth.
pub trait SpeciesOracle: Send + Sync {
    /// Base statistics for a species title.
    fn base_statistics(&self, title: &str) -> Option<BaseStatistics>;

    /// Total experience required to reach `level` from scratch.
    fn experience_to_level(&self, title: &str, level: u8) -> Option<u32>;

    /// The species this one evolves into at `level`, if any.
    fn evolution(&self, title: &str, level: u8) -> Option<String>;

    /// Base experience yield when an actor of this species is knocked out.
    fn base_experience(&self, title: &str) -> Option<u32>;
}
