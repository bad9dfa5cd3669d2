//! Crafting grid.
//!
//! A fixed N×N matrix of slots, stored row-major. The dimensions are set
//! at construction and never change afterwards.

use gamecraft_common::ItemId;
use serde::{Deserialize, Serialize};

pub use crate::slot::Slot;
use crate::slot::{SlotError, SlotResult};

/// Maximum supported grid dimension.
pub const MAX_GRID_SIZE: usize = 9;

/// Address of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    /// Row, top to bottom
    pub row: usize,
    /// Column, left to right
    pub col: usize,
}

impl GridPos {
    /// Creates a grid position.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A square crafting grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftingGrid {
    /// Side length.
    size: usize,
    /// Slots in row-major order.
    slots: Vec<Slot>,
}

impl CraftingGrid {
    /// Creates an empty grid with the given side length.
    ///
    /// # Panics
    /// Panics if `size` is zero or exceeds `MAX_GRID_SIZE`. Recipe tables
    /// validate their grid size before a grid is built from them.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0 && size <= MAX_GRID_SIZE, "Invalid grid size");
        Self {
            size,
            slots: vec![None; size * size],
        }
    }

    /// Builds a grid from rows. Returns `None` unless the rows form an
    /// exact `size`x`size` square.
    #[must_use]
    pub fn from_rows(size: usize, rows: Vec<Vec<Slot>>) -> Option<Self> {
        if size == 0 || size > MAX_GRID_SIZE || rows.len() != size {
            return None;
        }
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            slots: rows.into_iter().flatten().collect(),
        })
    }

    /// Side length.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    fn index(&self, pos: GridPos) -> SlotResult<usize> {
        if pos.row < self.size && pos.col < self.size {
            Ok(pos.row * self.size + pos.col)
        } else {
            Err(SlotError::GridOutOfRange {
                row: pos.row,
                col: pos.col,
                size: self.size,
            })
        }
    }

    /// Checks that a position lies inside the grid.
    pub fn check(&self, pos: GridPos) -> SlotResult<()> {
        self.index(pos).map(|_| ())
    }

    /// Returns the content of a cell.
    pub fn get(&self, pos: GridPos) -> SlotResult<Option<&ItemId>> {
        let idx = self.index(pos)?;
        Ok(self.slots[idx].as_ref())
    }

    /// Sets the content of a cell.
    pub fn set(&mut self, pos: GridPos, item: Slot) -> SlotResult<()> {
        let idx = self.index(pos)?;
        self.slots[idx] = item;
        Ok(())
    }

    /// Removes and returns the content of a cell.
    pub fn take(&mut self, pos: GridPos) -> SlotResult<Slot> {
        let idx = self.index(pos)?;
        Ok(self.slots[idx].take())
    }

    /// Puts an item into a cell, returning the previous occupant.
    pub fn replace(&mut self, pos: GridPos, item: Slot) -> SlotResult<Slot> {
        let idx = self.index(pos)?;
        Ok(std::mem::replace(&mut self.slots[idx], item))
    }

    /// Swaps the contents of two cells.
    pub fn swap(&mut self, a: GridPos, b: GridPos) -> SlotResult<()> {
        let ia = self.index(a)?;
        let ib = self.index(b)?;
        self.slots.swap(ia, ib);
        Ok(())
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    /// Returns true if every cell is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Cells grouped by row.
    pub fn rows(&self) -> impl Iterator<Item = &[Slot]> + '_ {
        self.slots.chunks(self.size)
    }

    /// Owned copy of the cells grouped by row.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<Slot>> {
        self.rows().map(<[Slot]>::to_vec).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(s: &str) -> Slot {
        Some(ItemId::new(s))
    }

    #[test]
    fn test_crafting_grid_creation() {
        let grid = CraftingGrid::new(3);
        assert_eq!(grid.size(), 3);
        assert_eq!(grid.slots().len(), 9);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_crafting_grid_set_get() {
        let mut grid = CraftingGrid::new(3);
        let pos = GridPos::new(1, 2);

        grid.set(pos, item("wood")).expect("in range");
        assert_eq!(grid.get(pos).expect("in range"), Some(&ItemId::new("wood")));
        assert_eq!(grid.item_count(), 1);

        grid.set(pos, None).expect("in range");
        assert!(grid.is_empty());
    }

    #[test]
    fn test_out_of_range() {
        let mut grid = CraftingGrid::new(3);
        let err = grid.set(GridPos::new(3, 0), item("wood"));
        assert_eq!(
            err,
            Err(SlotError::GridOutOfRange {
                row: 3,
                col: 0,
                size: 3
            })
        );
        assert!(grid.get(GridPos::new(0, 5)).is_err());
        assert!(grid.is_empty());
    }

    #[test]
    fn test_swap_and_replace() {
        let mut grid = CraftingGrid::new(2);
        let a = GridPos::new(0, 0);
        let b = GridPos::new(1, 1);
        grid.set(a, item("wood")).expect("in range");

        grid.swap(a, b).expect("in range");
        assert_eq!(grid.get(a).expect("in range"), None);
        assert_eq!(grid.get(b).expect("in range"), Some(&ItemId::new("wood")));

        let previous = grid.replace(b, item("stone")).expect("in range");
        assert_eq!(previous, item("wood"));
    }

    #[test]
    fn test_from_rows_requires_square() {
        let rows = vec![vec![None, item("a")], vec![None, None]];
        let grid = CraftingGrid::from_rows(2, rows.clone()).expect("square");
        assert_eq!(grid.to_rows(), rows);

        assert!(CraftingGrid::from_rows(3, rows).is_none());
        assert!(CraftingGrid::from_rows(2, vec![vec![None, None], vec![None]]).is_none());
    }

    #[test]
    fn test_clear() {
        let mut grid = CraftingGrid::new(3);
        grid.set(GridPos::new(0, 0), item("a")).expect("in range");
        grid.set(GridPos::new(2, 2), item("b")).expect("in range");
        grid.clear();
        assert!(grid.is_empty());
        assert_eq!(grid.size(), 3);
    }
}
