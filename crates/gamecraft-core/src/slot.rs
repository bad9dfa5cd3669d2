//! Slot type and addressing errors shared by the grid and the inventory.

use thiserror::Error;

use gamecraft_common::ItemId;

/// Slot content: an item id, or `None` for an empty slot. No stacking.
pub type Slot = Option<ItemId>;

/// Slot addressing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    /// Grid cell outside the grid
    #[error("Grid cell ({row}, {col}) out of range for a {size}x{size} grid")]
    GridOutOfRange {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Grid side length
        size: usize,
    },
    /// Inventory index past the end
    #[error("Inventory slot {index} out of range (capacity {capacity})")]
    InventoryOutOfRange {
        /// Requested index
        index: usize,
        /// Current capacity
        capacity: usize,
    },
}

/// Result type for slot operations.
pub type SlotResult<T> = Result<T, SlotError>;
