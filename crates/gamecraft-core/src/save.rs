//! Saved game snapshots.
//!
//! The game persists as five independent keys in a [`KeyValueStore`], each
//! holding a JSON value. Loading never fails: a missing key yields the
//! fresh-game default and a malformed one is normalized or replaced, with
//! every repair recorded in a [`LoadReport`].

use gamecraft_common::ItemId;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::GameRules;
use crate::crafting_grid::CraftingGrid;
use crate::discovery::DiscoveredSet;
use crate::game_state::{CraftLog, CraftLogEntry, GameState};
use crate::inventory::Inventory;
use crate::slot::Slot;
use crate::storage::{KeyValueStore, StorageError, StorageResult};

/// One persisted part of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveKey {
    /// Inventory slots
    Inventory,
    /// Crafting grid rows
    Grid,
    /// Discovered item ids
    Discovered,
    /// Win flag
    Win,
    /// Craft log
    Crafts,
}

impl SaveKey {
    /// Every key, in save order.
    pub const ALL: [Self; 5] = [
        Self::Inventory,
        Self::Grid,
        Self::Discovered,
        Self::Win,
        Self::Crafts,
    ];

    /// Keys touched by moving items between containers.
    pub const CONTAINERS: [Self; 2] = [Self::Inventory, Self::Grid];

    /// Storage key name.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Inventory => "game.inv",
            Self::Grid => "game.grid",
            Self::Discovered => "game.disc",
            Self::Win => "game.win",
            Self::Crafts => "game.crafts",
        }
    }
}

/// How a key was treated during load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    /// Value was read as stored
    Loaded,
    /// Nothing stored; default used
    Missing,
    /// Value was readable but had bad elements that were blanked
    Normalized,
    /// Value could not be used; default substituted
    Replaced,
    /// Store failed to read; default used
    Unreadable,
}

/// Per-key outcome of a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    entries: Vec<(SaveKey, KeyStatus)>,
}

impl LoadReport {
    fn record(&mut self, key: SaveKey, status: KeyStatus) {
        match status {
            KeyStatus::Loaded | KeyStatus::Missing => {
                debug!("{}: {:?}", key.key(), status);
            },
            KeyStatus::Normalized | KeyStatus::Replaced | KeyStatus::Unreadable => {
                warn!("Saved value {} {:?}", key.key(), status);
            },
        }
        self.entries.push((key, status));
    }

    /// Status of one key.
    #[must_use]
    pub fn status(&self, key: SaveKey) -> Option<KeyStatus> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, status)| *status)
    }

    /// All recorded statuses, in load order.
    #[must_use]
    pub fn entries(&self) -> &[(SaveKey, KeyStatus)] {
        &self.entries
    }

    /// Returns true if any key had to be repaired.
    #[must_use]
    pub fn repaired(&self) -> bool {
        self.entries.iter().any(|(_, status)| {
            matches!(status, KeyStatus::Normalized | KeyStatus::Replaced)
        })
    }

    /// Returns true if no key was stored at all.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.entries
            .iter()
            .all(|(_, status)| *status == KeyStatus::Missing)
    }
}

/// Reads a key and parses it as JSON.
fn read_value(store: &dyn KeyValueStore, key: SaveKey) -> Result<Option<Value>, KeyStatus> {
    match store.get(key.key()) {
        Ok(None) => Ok(None),
        Ok(Some(raw)) => serde_json::from_str(&raw).map(Some).map_err(|e| {
            warn!("Failed to parse {}: {e}", key.key());
            KeyStatus::Replaced
        }),
        Err(e) => {
            warn!("Failed to read {} from {} store: {e}", key.key(), store.name());
            Err(KeyStatus::Unreadable)
        },
    }
}

/// Converts a JSON element into a slot. Anything but a non-empty string is
/// an empty slot; the flag reports whether a non-null value was dropped.
fn slot_from_value(value: Value) -> (Slot, bool) {
    match value {
        Value::Null => (None, false),
        Value::String(s) if !s.is_empty() => (Some(ItemId::from(s)), false),
        _ => (None, true),
    }
}

fn slots_from_values(values: Vec<Value>) -> (Vec<Slot>, bool) {
    let mut dirty = false;
    let slots = values
        .into_iter()
        .map(|v| {
            let (slot, dropped) = slot_from_value(v);
            dirty |= dropped;
            slot
        })
        .collect();
    (slots, dirty)
}

fn normalized(dirty: bool) -> KeyStatus {
    if dirty {
        KeyStatus::Normalized
    } else {
        KeyStatus::Loaded
    }
}

fn load_inventory(value: Value, rules: &GameRules) -> (Inventory, KeyStatus) {
    match value {
        Value::Array(values) => {
            let (slots, dirty) = slots_from_values(values);
            (Inventory::from_slots(slots), normalized(dirty))
        },
        _ => (Inventory::new(rules.inventory_size), KeyStatus::Replaced),
    }
}

fn load_grid(value: Value, grid_size: usize) -> (CraftingGrid, KeyStatus) {
    let Value::Array(rows) = value else {
        return (CraftingGrid::new(grid_size), KeyStatus::Replaced);
    };
    if rows.len() != grid_size {
        return (CraftingGrid::new(grid_size), KeyStatus::Replaced);
    }

    let mut dirty = false;
    let mut cells = Vec::with_capacity(grid_size);
    for row in rows {
        match row {
            Value::Array(values) if values.len() == grid_size => {
                let (slots, row_dirty) = slots_from_values(values);
                dirty |= row_dirty;
                cells.push(slots);
            },
            _ => return (CraftingGrid::new(grid_size), KeyStatus::Replaced),
        }
    }

    match CraftingGrid::from_rows(grid_size, cells) {
        Some(grid) => (grid, normalized(dirty)),
        None => (CraftingGrid::new(grid_size), KeyStatus::Replaced),
    }
}

fn load_discovered(value: Value, base: &[ItemId]) -> (DiscoveredSet, KeyStatus) {
    let mut discovered = DiscoveredSet::with_base(base);
    let Value::Array(values) = value else {
        return (discovered, KeyStatus::Replaced);
    };

    let mut dirty = false;
    for value in values {
        match value {
            Value::String(s) if !s.is_empty() => {
                discovered.discover(ItemId::from(s));
            },
            _ => dirty = true,
        }
    }
    (discovered, normalized(dirty))
}

fn load_win(value: &Value) -> (bool, KeyStatus) {
    match value {
        Value::Bool(won) => (*won, KeyStatus::Loaded),
        _ => (false, KeyStatus::Replaced),
    }
}

fn load_crafts(value: Value) -> (CraftLog, KeyStatus) {
    let Value::Array(values) = value else {
        return (CraftLog::new(), KeyStatus::Replaced);
    };

    let total = values.len();
    let entries: Vec<CraftLogEntry> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    let status = normalized(entries.len() != total);
    (CraftLog::from(entries), status)
}

/// Loads a game from a store, repairing whatever is malformed.
///
/// `grid_size` comes from the recipe table, `base` from the catalog. The
/// base resources are always discovered afterwards.
pub fn load(
    store: &dyn KeyValueStore,
    grid_size: usize,
    rules: &GameRules,
    base: &[ItemId],
) -> (GameState, LoadReport) {
    let mut state = GameState::new(grid_size, rules, base);
    let mut report = LoadReport::default();

    for key in SaveKey::ALL {
        let value = match read_value(store, key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                report.record(key, KeyStatus::Missing);
                continue;
            },
            Err(status) => {
                report.record(key, status);
                continue;
            },
        };

        let status = match key {
            SaveKey::Inventory => {
                let (inventory, status) = load_inventory(value, rules);
                state.inventory = inventory;
                status
            },
            SaveKey::Grid => {
                let (grid, status) = load_grid(value, grid_size);
                state.grid = grid;
                status
            },
            SaveKey::Discovered => {
                let (discovered, status) = load_discovered(value, base);
                state.discovered = discovered;
                status
            },
            SaveKey::Win => {
                let (won, status) = load_win(&value);
                state.won = won;
                status
            },
            SaveKey::Crafts => {
                let (crafts, status) = load_crafts(value);
                state.crafts = crafts;
                status
            },
        };
        report.record(key, status);
    }

    info!(
        "Loaded game from {} store: {} slots, {} discovered, {} crafts",
        store.name(),
        state.inventory.capacity(),
        state.discovered.len(),
        state.crafts.len()
    );
    (state, report)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> StorageResult<String> {
    serde_json::to_string(value).map_err(|e| StorageError::Io(e.into()))
}

/// Serialized form of one key.
pub fn encode(state: &GameState, key: SaveKey) -> StorageResult<String> {
    match key {
        SaveKey::Inventory => to_json(&state.inventory),
        SaveKey::Grid => to_json(&state.grid.to_rows()),
        SaveKey::Discovered => to_json(&state.discovered),
        SaveKey::Win => to_json(&state.won),
        SaveKey::Crafts => to_json(&state.crafts),
    }
}

/// Writes the given keys. Every key is attempted; the first failure is
/// returned.
pub fn save_keys(
    state: &GameState,
    store: &dyn KeyValueStore,
    keys: &[SaveKey],
) -> StorageResult<()> {
    let mut first_error = None;
    for &key in keys {
        let result = encode(state, key).and_then(|json| store.set(key.key(), &json));
        if let Err(e) = result {
            warn!("Failed to save {}: {e}", key.key());
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

/// Writes every key.
pub fn save(state: &GameState, store: &dyn KeyValueStore) -> StorageResult<()> {
    save_keys(state, store, &SaveKey::ALL)
}

/// Removes every key. Every key is attempted; the first failure is
/// returned.
pub fn clear(store: &dyn KeyValueStore) -> StorageResult<()> {
    let mut first_error = None;
    for key in SaveKey::ALL {
        if let Err(e) = store.remove(key.key()) {
            warn!("Failed to remove {}: {e}", key.key());
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}
