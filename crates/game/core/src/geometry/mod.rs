//! Axis-aligned rectangle geometry and bordering predicates.
//!
//! Everything here is a pure function over [`Bounds`] pairs: no state, no
//! error conditions, `None` for "no relation". The collision engine and the
//! movement state machine both build on these predicates.

mod bounds;
mod direction;

pub use bounds::Bounds;
pub use direction::{Axis, Direction};

/// Determines which side of `thing` touches `other`, within `tolerance`
/// pixels (one grid unit in practice).
///
/// Checks run in the fixed order Top, Right, Bottom, Left and the first
/// match wins. That ordering is a deliberate tie-break for corner contacts,
/// not a configuration point.
pub fn direction_bordering(thing: &Bounds, other: &Bounds, tolerance: i32) -> Option<Direction> {
    if (thing.top - other.bottom).abs() < tolerance {
        return Some(Direction::Top);
    }

    if (thing.right - other.left).abs() < tolerance {
        return Some(Direction::Right);
    }

    if (thing.bottom - other.top).abs() < tolerance {
        return Some(Direction::Bottom);
    }

    if (thing.left - other.right).abs() < tolerance {
        return Some(Direction::Left);
    }

    None
}

/// Determines the direction from `thing` to `other`, for pairs that are not
/// necessarily touching.
///
/// Falls back to directional comparison of edges when the pair is not
/// bordering.
pub fn direction_between(thing: &Bounds, other: &Bounds, tolerance: i32) -> Option<Direction> {
    if let Some(direction) = direction_bordering(thing, other, tolerance) {
        return Some(direction);
    }

    if thing.top > other.bottom + tolerance {
        return Some(Direction::Top);
    }

    if thing.right < other.left - tolerance {
        return Some(Direction::Right);
    }

    if thing.bottom < other.top - tolerance {
        return Some(Direction::Bottom);
    }

    if thing.left > other.right + tolerance {
        return Some(Direction::Left);
    }

    None
}

/// Whether `thing` is fully contained within `other`.
pub fn is_within_other(thing: &Bounds, other: &Bounds) -> bool {
    thing.top >= other.top
        && thing.right <= other.right
        && thing.bottom <= other.bottom
        && thing.left >= other.left
}

/// Whether `thing` lines up with `other` along the axis implied by
/// `direction`, within `tolerance` pixels.
///
/// Only the movement axis is checked: vertical movers compare top/bottom
/// edges, horizontal movers compare left/right. This is an intentional
/// simplification that avoids corner jitter on transporter pads.
pub fn is_overlapping_on_axis(
    thing: &Bounds,
    other: &Bounds,
    direction: Direction,
    tolerance: i32,
) -> bool {
    match direction.axis() {
        Axis::Vertical => {
            (thing.top - other.top).abs() < tolerance
                && (thing.bottom - other.bottom).abs() < tolerance
        }
        Axis::Horizontal => {
            (thing.left - other.left).abs() < tolerance
                && (thing.right - other.right).abs() < tolerance
        }
    }
}

/// Whether a character is visually within a grass patch.
///
/// The character counts as in-grass when its grass line (top edge plus
/// `grass_line_offset`) falls inside the patch and the rectangles overlap
/// horizontally.
pub fn is_within_grass(thing: &Bounds, grass: &Bounds, grass_line_offset: i32) -> bool {
    if thing.right <= grass.left {
        return false;
    }

    if thing.left >= grass.right {
        return false;
    }

    let grass_line = thing.top + grass_line_offset;
    grass.top <= grass_line && grass.bottom >= grass_line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(left: i32, top: i32, right: i32, bottom: i32) -> Bounds {
        Bounds {
            top,
            right,
            bottom,
            left,
        }
    }

    #[test]
    fn bordering_is_symmetric_across_a_shared_edge() {
        // a sits directly above b, sharing b's top edge
        let a = rect(0, 0, 16, 16);
        let b = rect(0, 16, 16, 32);

        assert_eq!(direction_bordering(&a, &b, 4), Some(Direction::Bottom));
        assert_eq!(direction_bordering(&b, &a, 4), Some(Direction::Top));
    }

    #[test]
    fn bordering_prefers_top_for_corner_contacts() {
        // Diagonal contact matches both Top and Left; fixed order picks Top.
        let a = rect(16, 16, 32, 32);
        let b = rect(0, 0, 16, 16);

        assert_eq!(direction_bordering(&a, &b, 4), Some(Direction::Top));
    }

    #[test]
    fn bordering_none_when_separated() {
        let a = rect(0, 0, 16, 16);
        let b = rect(100, 100, 116, 116);

        assert_eq!(direction_bordering(&a, &b, 4), None);
    }

    #[test]
    fn between_falls_back_to_edge_comparison() {
        let a = rect(0, 100, 16, 116);
        let b = rect(0, 0, 16, 16);

        assert_eq!(direction_between(&a, &b, 4), Some(Direction::Top));
        assert_eq!(direction_between(&b, &a, 4), Some(Direction::Bottom));
    }

    #[test]
    fn within_other_requires_full_containment() {
        let inner = rect(4, 4, 12, 12);
        let outer = rect(0, 0, 16, 16);

        assert!(is_within_other(&inner, &outer));
        assert!(!is_within_other(&outer, &inner));
    }

    #[test]
    fn axis_overlap_checks_only_the_movement_axis() {
        // Same column, different rows: overlapping for vertical movement only.
        let a = rect(0, 0, 16, 16);
        let b = rect(0, 64, 16, 80);

        assert!(is_overlapping_on_axis(&a, &b, Direction::Right, 4));
        assert!(!is_overlapping_on_axis(&a, &b, Direction::Top, 4));
    }

    #[test]
    fn grass_line_decides_grass_containment() {
        let character = rect(0, 0, 16, 16);
        let patch = rect(0, 4, 16, 20);

        assert!(is_within_grass(&character, &patch, 8));
        assert!(!is_within_grass(&character, &patch, 2));
    }
}
