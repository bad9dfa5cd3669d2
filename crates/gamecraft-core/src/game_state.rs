//! Top-level game state.
//!
//! One value owns the grid, the inventory, the discovered set, the craft
//! log and the win flag. Every engine operation borrows it mutably; nothing
//! keeps a copy of its own.

use std::time::{SystemTime, UNIX_EPOCH};

use gamecraft_common::ItemId;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::GameRules;
use crate::crafting_grid::CraftingGrid;
use crate::discovery::DiscoveredSet;
use crate::inventory::Inventory;
use crate::recipes::RecipeTable;

/// One completed craft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftLogEntry {
    /// Produced item
    pub id: ItemId,
    /// Produced quantity
    pub count: u32,
    /// Unix time in milliseconds
    pub ts: u64,
}

/// Append-only audit trail of completed crafts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CraftLog {
    entries: Vec<CraftLogEntry>,
}

impl CraftLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn record(&mut self, entry: CraftLogEntry) {
        self.entries.push(entry);
    }

    /// Entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[CraftLogEntry] {
        &self.entries
    }

    /// Number of crafts performed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was crafted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of produced counts.
    #[must_use]
    pub fn items_crafted(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.count)).sum()
    }
}

impl From<Vec<CraftLogEntry>> for CraftLog {
    fn from(entries: Vec<CraftLogEntry>) -> Self {
        Self { entries }
    }
}

/// Progress summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    /// Discovered item ids, base resources included
    pub discovered: usize,
    /// Distinct items the recipe table can produce
    pub craftable: usize,
    /// Discovered items that some recipe produces
    pub crafted_kinds: usize,
    /// Crafts performed
    pub crafts: usize,
    /// Items produced over all crafts
    pub items_crafted: u64,
    /// Whether the ultimate item has been made
    pub won: bool,
}

/// The complete mutable game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Crafting grid
    pub grid: CraftingGrid,
    /// Player inventory
    pub inventory: Inventory,
    /// Items ever obtained
    pub discovered: DiscoveredSet,
    /// Completed crafts
    pub crafts: CraftLog,
    /// Set once the ultimate item is first produced
    pub won: bool,
}

impl GameState {
    /// Creates a fresh game: empty grid and inventory, base ids discovered.
    #[must_use]
    pub fn new(grid_size: usize, rules: &GameRules, base: &[ItemId]) -> Self {
        Self {
            grid: CraftingGrid::new(grid_size),
            inventory: Inventory::new(rules.inventory_size),
            discovered: DiscoveredSet::with_base(base),
            crafts: CraftLog::new(),
            won: false,
        }
    }

    /// Resets to a fresh game. The craft log is kept.
    pub fn reset(&mut self, rules: &GameRules, base: &[ItemId]) {
        self.grid.clear();
        self.inventory = Inventory::new(rules.inventory_size);
        self.discovered = DiscoveredSet::with_base(base);
        self.won = false;
        info!("Game reset ({} crafts kept in log)", self.crafts.len());
    }

    /// Every stored item across grid and inventory, sorted.
    #[must_use]
    pub fn stored_items(&self) -> Vec<&ItemId> {
        let mut items: Vec<_> = self
            .grid
            .slots()
            .iter()
            .chain(self.inventory.slots())
            .flatten()
            .collect();
        items.sort_unstable();
        items
    }

    /// Progress summary against a recipe table.
    #[must_use]
    pub fn stats(&self, recipes: &RecipeTable) -> GameStats {
        let mut craftable: Vec<&ItemId> = recipes.recipes().iter().map(|r| &r.result.id).collect();
        craftable.sort_unstable();
        craftable.dedup();
        let crafted_kinds = craftable
            .iter()
            .filter(|id| self.discovered.contains(id.as_str()))
            .count();

        GameStats {
            discovered: self.discovered.len(),
            craftable: craftable.len(),
            crafted_kinds,
            crafts: self.crafts.len(),
            items_crafted: self.crafts.items_crafted(),
            won: self.won,
        }
    }
}

/// Current Unix time in milliseconds.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crafting_grid::GridPos;

    fn base() -> Vec<ItemId> {
        vec![ItemId::new("wood"), ItemId::new("stone")]
    }

    #[test]
    fn test_new_game_defaults() {
        let state = GameState::new(3, &GameRules::default(), &base());
        assert_eq!(state.grid.size(), 3);
        assert!(state.grid.is_empty());
        assert_eq!(state.inventory.capacity(), 20);
        assert_eq!(state.discovered.len(), 2);
        assert!(state.crafts.is_empty());
        assert!(!state.won);
    }

    #[test]
    fn test_reset_keeps_craft_log() {
        let rules = GameRules::default();
        let mut state = GameState::new(3, &rules, &base());
        state.inventory.expand(10);
        state.inventory.insert(ItemId::new("plank"), 10);
        state
            .grid
            .set(GridPos::new(0, 0), Some(ItemId::new("wood")))
            .expect("in range");
        state.discovered.discover(ItemId::new("plank"));
        state.crafts.record(CraftLogEntry {
            id: ItemId::new("plank"),
            count: 2,
            ts: 1,
        });
        state.won = true;

        state.reset(&rules, &base());

        assert!(state.grid.is_empty());
        assert_eq!(state.inventory.capacity(), 20);
        assert_eq!(state.inventory.item_count(), 0);
        assert!(!state.discovered.contains("plank"));
        assert!(state.discovered.contains("wood"));
        assert!(!state.won);
        assert_eq!(state.crafts.len(), 1);
    }

    #[test]
    fn test_stored_items_spans_both_containers() {
        let mut state = GameState::new(2, &GameRules::default(), &base());
        state.inventory.insert(ItemId::new("b"), 10);
        state
            .grid
            .set(GridPos::new(1, 1), Some(ItemId::new("a")))
            .expect("in range");
        let items: Vec<&str> = state.stored_items().iter().map(|i| i.as_str()).collect();
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn test_craft_log_totals() {
        let mut log = CraftLog::new();
        log.record(CraftLogEntry {
            id: ItemId::new("plank"),
            count: 2,
            ts: 10,
        });
        log.record(CraftLogEntry {
            id: ItemId::new("stick"),
            count: 4,
            ts: 20,
        });
        assert_eq!(log.len(), 2);
        assert_eq!(log.items_crafted(), 6);
    }
}
