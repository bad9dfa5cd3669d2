//! Transfer resolver.
//!
//! Applies a resolved drop, `(source zone, destination zone)`, to the game
//! state. The caller's drag layer does all hit-testing; this module only
//! sees zones. Every address is checked before anything is mutated, so an
//! out-of-range request leaves the state untouched.
//!
//! Rules per container pair:
//!
//! | source → destination | behaviour |
//! |----------------------|-----------|
//! | inventory → inventory | swap (same slot: nothing) |
//! | inventory → grid | move, previous grid occupant goes back to the source slot |
//! | grid → inventory | move/swap; if the inventory has no empty slot at all it grows and the item goes to the first new slot |
//! | grid → grid | swap (same cell: nothing) |
//! | resource → inventory | place; occupied target falls back to auto-insert |
//! | resource → grid | place; occupied target rejects the drop |
//! | any → trash | clear the source (resources cannot be deleted) |

use gamecraft_common::ItemId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GameRules;
use crate::crafting_grid::GridPos;
use crate::game_state::GameState;
use crate::slot::SlotResult;

/// An addressable drag source or drop target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Zone {
    /// Palette entry: an infinite supply of one base resource
    Resource {
        /// Resource item
        item: ItemId,
    },
    /// Inventory slot
    Inventory {
        /// Slot index
        index: usize,
    },
    /// Grid cell
    Grid {
        /// Cell address
        pos: GridPos,
    },
    /// Deletes whatever is dropped on it
    Trash,
}

impl Zone {
    /// Palette zone for a resource.
    #[must_use]
    pub fn resource(item: impl Into<ItemId>) -> Self {
        Self::Resource { item: item.into() }
    }

    /// Inventory slot zone.
    #[must_use]
    pub const fn inventory(index: usize) -> Self {
        Self::Inventory { index }
    }

    /// Grid cell zone.
    #[must_use]
    pub const fn grid(row: usize, col: usize) -> Self {
        Self::Grid {
            pos: GridPos::new(row, col),
        }
    }
}

/// What a transfer did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransferOutcome {
    /// Nothing changed
    Ignored,
    /// Item moved into an empty slot
    Moved,
    /// Two occupied slots exchanged contents
    Swapped,
    /// Resource placed into the targeted slot
    Placed,
    /// Item auto-placed into the first empty inventory slot
    Inserted {
        /// Slot that received the item
        index: usize,
    },
    /// Inventory grew to receive the item
    Expanded {
        /// Slot that received the item
        index: usize,
    },
    /// Slot cleared
    Deleted,
}

impl TransferOutcome {
    /// Returns true if the state changed.
    #[must_use]
    pub const fn changed(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Applies move, place and delete requests under the slot-occupancy rules.
#[derive(Debug, Clone, Copy)]
pub struct TransferResolver {
    chunk: usize,
}

impl Default for TransferResolver {
    fn default() -> Self {
        Self::new(&GameRules::default())
    }
}

impl TransferResolver {
    /// Creates a resolver using the rules' expansion chunk.
    #[must_use]
    pub fn new(rules: &GameRules) -> Self {
        Self {
            chunk: rules.inventory_chunk.max(1),
        }
    }

    /// Inserts into the first empty inventory slot, growing when full.
    pub fn insert(&self, state: &mut GameState, item: ItemId) -> TransferOutcome {
        let was_full = state.inventory.is_full();
        let index = state.inventory.insert(item, self.chunk);
        if was_full {
            TransferOutcome::Expanded { index }
        } else {
            TransferOutcome::Inserted { index }
        }
    }

    /// Palette "add" button: puts one resource straight into the inventory.
    pub fn add_to_inventory(&self, state: &mut GameState, item: ItemId) -> TransferOutcome {
        debug!("Quick-adding {} to inventory", item);
        self.insert(state, item)
    }

    /// Swaps two inventory slots.
    pub fn move_inventory_to_inventory(
        &self,
        state: &mut GameState,
        from: usize,
        to: usize,
    ) -> SlotResult<TransferOutcome> {
        state.inventory.check(from)?;
        state.inventory.check(to)?;
        if from == to {
            return Ok(TransferOutcome::Ignored);
        }

        let outcome = swap_outcome(
            state.inventory.get(from)?.is_some(),
            state.inventory.get(to)?.is_some(),
        );
        state.inventory.swap(from, to)?;
        debug!("Inventory {} -> inventory {}: {:?}", from, to, outcome);
        Ok(outcome)
    }

    /// Moves an inventory item onto a grid cell. An occupied cell sends its
    /// item back to the vacated inventory slot.
    pub fn move_inventory_to_grid(
        &self,
        state: &mut GameState,
        from: usize,
        pos: GridPos,
    ) -> SlotResult<TransferOutcome> {
        state.inventory.check(from)?;
        state.grid.check(pos)?;

        let Some(item) = state.inventory.take(from)? else {
            return Ok(TransferOutcome::Ignored);
        };
        let previous = state.grid.replace(pos, Some(item))?;
        let outcome = if previous.is_some() {
            TransferOutcome::Swapped
        } else {
            TransferOutcome::Moved
        };
        state.inventory.set(from, previous)?;

        debug!(
            "Inventory {} -> grid ({}, {}): {:?}",
            from, pos.row, pos.col, outcome
        );
        Ok(outcome)
    }

    /// Moves a grid item into the inventory.
    ///
    /// When the inventory has no empty slot anywhere, it grows and the item
    /// lands in the first new slot instead of swapping with the target.
    pub fn move_grid_to_inventory(
        &self,
        state: &mut GameState,
        pos: GridPos,
        to: usize,
    ) -> SlotResult<TransferOutcome> {
        state.grid.check(pos)?;
        // A full inventory ignores the target slot, so it needs no check.
        let full = state.inventory.is_full();
        if !full {
            state.inventory.check(to)?;
        }

        let Some(item) = state.grid.take(pos)? else {
            return Ok(TransferOutcome::Ignored);
        };

        let outcome = if full {
            let index = state.inventory.expand(self.chunk);
            state.inventory.set(index, Some(item))?;
            TransferOutcome::Expanded { index }
        } else {
            let previous = state.inventory.replace(to, Some(item))?;
            let outcome = if previous.is_some() {
                TransferOutcome::Swapped
            } else {
                TransferOutcome::Moved
            };
            state.grid.set(pos, previous)?;
            outcome
        };

        debug!(
            "Grid ({}, {}) -> inventory {}: {:?}",
            pos.row, pos.col, to, outcome
        );
        Ok(outcome)
    }

    /// Swaps two grid cells.
    pub fn move_grid_to_grid(
        &self,
        state: &mut GameState,
        from: GridPos,
        to: GridPos,
    ) -> SlotResult<TransferOutcome> {
        state.grid.check(from)?;
        state.grid.check(to)?;
        if from == to {
            return Ok(TransferOutcome::Ignored);
        }

        let outcome = swap_outcome(
            state.grid.get(from)?.is_some(),
            state.grid.get(to)?.is_some(),
        );
        state.grid.swap(from, to)?;
        debug!(
            "Grid ({}, {}) -> grid ({}, {}): {:?}",
            from.row, from.col, to.row, to.col, outcome
        );
        Ok(outcome)
    }

    /// Drops a palette resource onto a zone.
    ///
    /// An occupied inventory slot falls back to auto-insert; an occupied
    /// grid cell rejects the drop.
    pub fn place_resource(
        &self,
        state: &mut GameState,
        item: ItemId,
        destination: &Zone,
    ) -> SlotResult<TransferOutcome> {
        let outcome = match *destination {
            Zone::Inventory { index } => {
                if state.inventory.get(index)?.is_none() {
                    state.inventory.set(index, Some(item))?;
                    TransferOutcome::Placed
                } else {
                    self.insert(state, item)
                }
            },
            Zone::Grid { pos } => {
                if state.grid.get(pos)?.is_none() {
                    state.grid.set(pos, Some(item))?;
                    TransferOutcome::Placed
                } else {
                    TransferOutcome::Ignored
                }
            },
            Zone::Resource { .. } | Zone::Trash => TransferOutcome::Ignored,
        };
        debug!("Resource -> {:?}: {:?}", destination, outcome);
        Ok(outcome)
    }

    /// Clears the slot a drag started from. Resources cannot be deleted.
    pub fn delete_from(&self, state: &mut GameState, source: &Zone) -> SlotResult<TransferOutcome> {
        let removed = match *source {
            Zone::Inventory { index } => state.inventory.take(index)?,
            Zone::Grid { pos } => state.grid.take(pos)?,
            Zone::Resource { .. } | Zone::Trash => None,
        };
        let outcome = if removed.is_some() {
            TransferOutcome::Deleted
        } else {
            TransferOutcome::Ignored
        };
        debug!("Delete {:?}: {:?}", source, outcome);
        Ok(outcome)
    }

    /// Single entry point for a finished drag.
    ///
    /// A `None` destination means the drop landed nowhere and is abandoned.
    pub fn resolve_drop(
        &self,
        state: &mut GameState,
        source: &Zone,
        destination: Option<&Zone>,
    ) -> SlotResult<TransferOutcome> {
        let Some(destination) = destination else {
            debug!("Drop from {:?} abandoned", source);
            return Ok(TransferOutcome::Ignored);
        };

        match (source, destination) {
            (_, Zone::Trash) => self.delete_from(state, source),
            (Zone::Resource { item }, _) => self.place_resource(state, item.clone(), destination),
            (Zone::Inventory { index: from }, Zone::Inventory { index: to }) => {
                self.move_inventory_to_inventory(state, *from, *to)
            },
            (Zone::Inventory { index }, Zone::Grid { pos }) => {
                self.move_inventory_to_grid(state, *index, *pos)
            },
            (Zone::Grid { pos }, Zone::Inventory { index }) => {
                self.move_grid_to_inventory(state, *pos, *index)
            },
            (Zone::Grid { pos: from }, Zone::Grid { pos: to }) => {
                self.move_grid_to_grid(state, *from, *to)
            },
            (_, Zone::Resource { .. }) | (Zone::Trash, _) => Ok(TransferOutcome::Ignored),
        }
    }
}

/// Outcome of exchanging two slots given which were occupied.
const fn swap_outcome(source_occupied: bool, target_occupied: bool) -> TransferOutcome {
    match (source_occupied, target_occupied) {
        (false, false) => TransferOutcome::Ignored,
        (true, true) => TransferOutcome::Swapped,
        _ => TransferOutcome::Moved,
    }
}
