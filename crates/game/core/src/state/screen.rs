//! The viewport: what slice of the active area the player can see.

use crate::geometry::{Bounds, Direction};

use super::world::AreaKey;

/// Which axes the viewport may scroll along, derived from comparing the
/// viewport size with the active area's boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scrollability {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl Scrollability {
    pub fn from_sizes(viewport: &Bounds, area: &Bounds) -> Self {
        let horizontal = area.width() > viewport.width();
        let vertical = area.height() > viewport.height();
        match (horizontal, vertical) {
            (true, true) => Self::Both,
            (true, false) => Self::Horizontal,
            (false, true) => Self::Vertical,
            (false, false) => Self::None,
        }
    }

    pub fn horizontal(&self) -> bool {
        matches!(self, Self::Horizontal | Self::Both)
    }

    pub fn vertical(&self) -> bool {
        matches!(self, Self::Vertical | Self::Both)
    }
}

/// Viewport state plus the active map/area/location names.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapScreen {
    /// World-coordinate window currently visible.
    pub bounds: Bounds,

    /// Union of every spawned area's world-space bounds; scrollability is
    /// derived from it and grows as neighbors stream in.
    pub boundaries: Bounds,

    pub map_name: String,
    pub area_name: String,
    pub location_name: String,

    pub scrollability: Scrollability,

    /// Menu layer is open; overworld input and battle checks pause.
    pub in_menu: bool,

    /// Player facing on last location entry, used for respawn direction.
    pub player_direction: Direction,
}

impl MapScreen {
    pub fn active_area_key(&self) -> AreaKey {
        AreaKey {
            map: self.map_name.clone(),
            area: self.area_name.clone(),
        }
    }

    /// Scrolls the viewport so its horizontal midpoint matches `mid_x`,
    /// if horizontal scrolling is allowed.
    pub fn follow_horizontal(&mut self, mid_x: i32) {
        if self.scrollability.horizontal() {
            let shift = mid_x - self.bounds.mid_x();
            self.bounds.shift_horiz(shift);
        }
    }

    /// Scrolls the viewport so its vertical midpoint matches `mid_y`,
    /// if vertical scrolling is allowed.
    pub fn follow_vertical(&mut self, mid_y: i32) {
        if self.scrollability.vertical() {
            let shift = mid_y - self.bounds.mid_y();
            self.bounds.shift_vert(shift);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrollability_follows_relative_sizes() {
        let viewport = Bounds::from_origin(0, 0, 256, 224);
        let wide = Bounds::from_origin(0, 0, 512, 224);
        let tall = Bounds::from_origin(0, 0, 256, 512);
        let small = Bounds::from_origin(0, 0, 128, 128);

        assert_eq!(
            Scrollability::from_sizes(&viewport, &wide),
            Scrollability::Horizontal
        );
        assert_eq!(
            Scrollability::from_sizes(&viewport, &tall),
            Scrollability::Vertical
        );
        assert_eq!(
            Scrollability::from_sizes(&viewport, &small),
            Scrollability::None
        );
    }

    #[test]
    fn follow_ignores_locked_axes() {
        let mut screen = MapScreen {
            bounds: Bounds::from_origin(0, 0, 256, 224),
            scrollability: Scrollability::Vertical,
            ..MapScreen::default()
        };

        screen.follow_horizontal(500);
        assert_eq!(screen.bounds.left, 0);

        screen.follow_vertical(300);
        assert_eq!(screen.bounds.mid_y(), 300);
    }
}
