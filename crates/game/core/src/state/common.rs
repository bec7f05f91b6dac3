use std::fmt;

/// Stable identifier for any thing tracked in the live registry.
///
/// Ids are derived from `map::area::title::index` for pre-placed things, or
/// set explicitly by content. All cross-thing references (`bordering`,
/// `ledge`, shadows) are weak lookups by id into the registry, never owning
/// references, so a dead thing can be reclaimed without dangling pointers.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThingId(String);

impl ThingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the conventional scoped id for a pre-placed thing.
    pub fn scoped(map: &str, area: &str, title: &str, index: usize) -> Self {
        Self(format!("{map}::{area}::{title}::{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ThingId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Discrete logical time unit. All scheduling counts ticks, never
/// wall-clock time, so behavior replays deterministically from saved state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;

    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::AddAssign<u64> for Tick {
    fn add_assign(&mut self, rhs: u64) {
        self.0 += rhs;
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Category tag deciding group membership and collision dispatch.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupKind {
    Character,
    Solid,
    Scenery,
    Terrain,
    Text,
}
