//! Item catalog.
//!
//! Static lookup of item id to display metadata. The catalog keeps the
//! base resources (the palette the player drags from) apart from the
//! craftable items, both in file order.

use std::fs;
use std::path::Path;

use gamecraft_common::{DataResult, ItemId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Built-in resource definitions.
const BUILTIN_RESOURCES: &str = include_str!("../data/resources.json");

/// Glyph shown for ids missing from the catalog.
pub const UNKNOWN_EMOJI: &str = "❓";

/// Display metadata for one item type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item identifier
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Icon glyph
    #[serde(default)]
    pub emoji: String,
    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Accent color (e.g. `#ffd700`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Item {
    /// Creates an item with a name and glyph.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            emoji: emoji.into(),
            desc: None,
            color: None,
        }
    }
}

/// On-disk layout of the resources file.
#[derive(Debug, Default, Deserialize)]
struct ResourcesFile {
    #[serde(default)]
    base: Vec<Item>,
    #[serde(default)]
    items: Vec<Item>,
}

/// Item id to metadata lookup, load-once and read-only.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: IndexMap<ItemId, Item>,
    base: Vec<ItemId>,
}

impl ItemCatalog {
    /// Builds a catalog from base resources and craftable items.
    ///
    /// A later definition of the same id replaces the earlier one.
    #[must_use]
    pub fn new(base: Vec<Item>, items: Vec<Item>) -> Self {
        let mut catalog = Self::default();
        for item in base {
            if !catalog.base.contains(&item.id) {
                catalog.base.push(item.id.clone());
            }
            catalog.insert(item);
        }
        for item in items {
            catalog.insert(item);
        }
        debug!(
            "Item catalog loaded: {} items, {} base resources",
            catalog.items.len(),
            catalog.base.len()
        );
        catalog
    }

    fn insert(&mut self, item: Item) {
        if let Some(previous) = self.items.insert(item.id.clone(), item) {
            warn!("Duplicate item definition for {}", previous.id);
        }
    }

    /// Parses a catalog from the resources JSON format.
    pub fn from_json(json: &str) -> DataResult<Self> {
        let file: ResourcesFile = serde_json::from_str(json)?;
        Ok(Self::new(file.base, file.items))
    }

    /// Loads a catalog from a resources JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> DataResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> DataResult<Self> {
        Self::from_json(BUILTIN_RESOURCES)
    }

    /// Looks up an item.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Returns true if the id is known.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Base resource ids in palette order.
    #[must_use]
    pub fn base_ids(&self) -> &[ItemId] {
        &self.base
    }

    /// Base resource definitions in palette order.
    pub fn base_items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.base.iter().filter_map(|id| self.items.get(id))
    }

    /// Returns true if the id is a base resource.
    #[must_use]
    pub fn is_base(&self, id: &str) -> bool {
        self.base.iter().any(|b| b.as_str() == id)
    }

    /// Display name, falling back to the raw id.
    #[must_use]
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, |item| item.name.as_str())
    }

    /// Icon glyph, falling back to [`UNKNOWN_EMOJI`].
    #[must_use]
    pub fn emoji(&self, id: &str) -> &str {
        match self.get(id) {
            Some(item) if !item.emoji.is_empty() => &item.emoji,
            _ => UNKNOWN_EMOJI,
        }
    }

    /// Number of known items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no items are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over every item, base resources first.
    pub fn iter(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.values()
    }
}
