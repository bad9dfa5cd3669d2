//! Inventory system.
//!
//! An ordered, growable sequence of single-item slots. Capacity only ever
//! grows, in fixed chunks, and only when an insertion finds no empty slot.

use gamecraft_common::ItemId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::slot::{Slot, SlotError, SlotResult};

/// Default starting capacity.
pub const DEFAULT_INVENTORY_SIZE: usize = 20;

/// Default number of slots added per expansion.
pub const DEFAULT_INVENTORY_CHUNK: usize = 10;

/// An inventory container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    slots: Vec<Slot>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(DEFAULT_INVENTORY_SIZE)
    }
}

impl Inventory {
    /// Creates an empty inventory with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Wraps existing slots as loaded from a snapshot.
    #[must_use]
    pub fn from_slots(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Checks that an index addresses a slot.
    pub fn check(&self, index: usize) -> SlotResult<()> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(SlotError::InventoryOutOfRange {
                index,
                capacity: self.slots.len(),
            })
        }
    }

    /// Returns the content of a slot.
    pub fn get(&self, index: usize) -> SlotResult<Option<&ItemId>> {
        self.check(index)?;
        Ok(self.slots[index].as_ref())
    }

    /// Sets the content of a slot.
    pub fn set(&mut self, index: usize, item: Slot) -> SlotResult<()> {
        self.check(index)?;
        self.slots[index] = item;
        Ok(())
    }

    /// Removes and returns the content of a slot.
    pub fn take(&mut self, index: usize) -> SlotResult<Slot> {
        self.check(index)?;
        Ok(self.slots[index].take())
    }

    /// Puts an item into a slot, returning the previous occupant.
    pub fn replace(&mut self, index: usize, item: Slot) -> SlotResult<Slot> {
        self.check(index)?;
        Ok(std::mem::replace(&mut self.slots[index], item))
    }

    /// Swaps the contents of two slots.
    pub fn swap(&mut self, a: usize, b: usize) -> SlotResult<()> {
        self.check(a)?;
        self.check(b)?;
        self.slots.swap(a, b);
        Ok(())
    }

    /// Index of the first empty slot.
    #[must_use]
    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Returns true if no slot is empty.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.first_empty().is_none()
    }

    /// Appends `chunk` empty slots and returns the first new index.
    pub fn expand(&mut self, chunk: usize) -> usize {
        let start = self.slots.len();
        self.slots.resize(start + chunk, None);
        debug!("Inventory expanded from {} to {} slots", start, self.slots.len());
        start
    }

    /// Places an item in the first empty slot, expanding by `chunk` slots
    /// when every slot is occupied. Always succeeds.
    ///
    /// A `chunk` of zero is treated as one so the insert cannot fail.
    pub fn insert(&mut self, item: ItemId, chunk: usize) -> usize {
        let index = match self.first_empty() {
            Some(index) => index,
            None => self.expand(chunk.max(1)),
        };
        self.slots[index] = Some(item);
        index
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Number of slots holding the given item.
    #[must_use]
    pub fn count(&self, item: &str) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|id| id.as_str() == item)
            .count()
    }

    /// All slots in order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Iterates over occupied slots as `(index, item)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ItemId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|id| (i, id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_inventory(size: usize) -> Inventory {
        Inventory::from_slots((0..size).map(|i| Some(ItemId::new(format!("item{i}")))).collect())
    }

    #[test]
    fn test_inventory_set_get() {
        let mut inv = Inventory::new(5);
        inv.set(2, Some(ItemId::new("wood"))).expect("in range");
        assert_eq!(inv.get(2).expect("in range"), Some(&ItemId::new("wood")));
        assert_eq!(inv.first_empty(), Some(0));
        assert_eq!(inv.item_count(), 1);
    }

    #[test]
    fn test_out_of_range() {
        let mut inv = Inventory::new(3);
        assert_eq!(
            inv.set(3, None),
            Err(SlotError::InventoryOutOfRange {
                index: 3,
                capacity: 3
            })
        );
        assert!(inv.swap(0, 7).is_err());
    }

    #[test]
    fn test_insert_fills_first_empty() {
        let mut inv = Inventory::new(3);
        inv.set(0, Some(ItemId::new("a"))).expect("in range");
        let idx = inv.insert(ItemId::new("b"), DEFAULT_INVENTORY_CHUNK);
        assert_eq!(idx, 1);
        assert_eq!(inv.capacity(), 3);
    }

    #[test]
    fn test_insert_expands_when_full() {
        let mut inv = full_inventory(20);
        let idx = inv.insert(ItemId::new("stone"), 10);
        assert_eq!(idx, 20);
        assert_eq!(inv.capacity(), 30);
        assert_eq!(inv.get(20).expect("in range"), Some(&ItemId::new("stone")));
        assert_eq!(inv.first_empty(), Some(21));
    }

    #[test]
    fn test_expand_returns_start() {
        let mut inv = Inventory::new(4);
        assert_eq!(inv.expand(10), 4);
        assert_eq!(inv.capacity(), 14);
    }

    #[test]
    fn test_insert_zero_chunk_still_succeeds() {
        let mut inv = Inventory::new(0);
        let idx = inv.insert(ItemId::new("a"), 0);
        assert_eq!(idx, 0);
        assert_eq!(inv.capacity(), 1);
    }

    #[test]
    fn test_count() {
        let mut inv = Inventory::new(4);
        inv.insert(ItemId::new("plank"), 10);
        inv.insert(ItemId::new("plank"), 10);
        inv.insert(ItemId::new("wood"), 10);
        assert_eq!(inv.count("plank"), 2);
        assert_eq!(inv.iter().count(), 3);
    }
}
