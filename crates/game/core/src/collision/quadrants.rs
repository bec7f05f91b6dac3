//! Sparse spatial partition used to prune collision candidates.

use std::collections::HashMap;

use crate::geometry::Bounds;
use crate::state::{GroupsState, ThingId};

/// A block-sized grid of cells, rebuilt from the live registry each tick.
///
/// Candidate queries walk the mover's cell range row-major and return each
/// cell's occupants in insertion order, so dispatch order is a pure function
/// of registry order and geometry.
#[derive(Debug, Default)]
pub struct QuadrantGrid {
    cell: i32,
    cells: HashMap<(i32, i32), Vec<ThingId>>,
}

impl QuadrantGrid {
    /// Builds the grid over every collidable thing in the registry.
    pub fn build(groups: &GroupsState, cell: i32) -> Self {
        let mut grid = Self {
            cell: cell.max(1),
            cells: HashMap::new(),
        };
        for thing in groups.all_things() {
            if thing.can_collide() {
                grid.insert(thing.id.clone(), &thing.bounds);
            }
        }
        grid
    }

    fn cell_range(&self, bounds: &Bounds, pad: i32) -> (i32, i32, i32, i32) {
        let col_min = (bounds.left - pad).div_euclid(self.cell);
        let col_max = (bounds.right + pad).div_euclid(self.cell);
        let row_min = (bounds.top - pad).div_euclid(self.cell);
        let row_max = (bounds.bottom + pad).div_euclid(self.cell);
        (col_min, col_max, row_min, row_max)
    }

    fn insert(&mut self, id: ThingId, bounds: &Bounds) {
        let (col_min, col_max, row_min, row_max) = self.cell_range(bounds, 0);
        for row in row_min..=row_max {
            for col in col_min..=col_max {
                self.cells.entry((row, col)).or_default().push(id.clone());
            }
        }
    }

    /// All things whose cells overlap `bounds` padded by `pad` pixels,
    /// deduplicated, in deterministic scan order.
    pub fn candidates(&self, bounds: &Bounds, pad: i32) -> Vec<ThingId> {
        let (col_min, col_max, row_min, row_max) = self.cell_range(bounds, pad);
        let mut found = Vec::new();
        for row in row_min..=row_max {
            for col in col_min..=col_max {
                if let Some(ids) = self.cells.get(&(row, col)) {
                    for id in ids {
                        if !found.contains(id) {
                            found.push(id.clone());
                        }
                    }
                }
            }
        }
        found
    }
}
