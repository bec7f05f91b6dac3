//! Cardinal directions and axes.

/// One of the four cardinal directions, encoded 0-3 clockwise from Top.
///
/// The numeric encoding matches the `bordering` slot layout on characters
/// and the authored content format.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl Direction {
    /// All directions in slot order.
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    /// Slot index of this direction (0-3).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for a slot index, if in range.
    pub const fn from_index(index: usize) -> Option<Direction> {
        match index {
            0 => Some(Direction::Top),
            1 => Some(Direction::Right),
            2 => Some(Direction::Bottom),
            3 => Some(Direction::Left),
            _ => None,
        }
    }

    /// The direction pointing the opposite way.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Right => Direction::Left,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
        }
    }

    /// The axis this direction moves along.
    pub const fn axis(self) -> Axis {
        match self {
            Direction::Top | Direction::Bottom => Axis::Vertical,
            Direction::Right | Direction::Left => Axis::Horizontal,
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Bottom
    }
}

/// Movement axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Horizontal,
    Vertical,
}
