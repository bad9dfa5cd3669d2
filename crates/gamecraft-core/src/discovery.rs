//! Discovery tracking and "next craftable" hints.
//!
//! The discovered set only grows during play. Hints are recomputed from
//! scratch on every call; the recipe table is small enough that caching
//! would buy nothing.

use gamecraft_common::{ItemId, RecipeId};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::recipes::{Recipe, RecipeTable};

/// Item ids the player has ever produced or started with, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscoveredSet {
    ids: IndexSet<ItemId>,
}

impl DiscoveredSet {
    /// Creates a set seeded with the base resource ids.
    #[must_use]
    pub fn with_base(base: &[ItemId]) -> Self {
        Self {
            ids: base.iter().cloned().collect(),
        }
    }

    /// Records a discovery. Returns true if the id was new.
    pub fn discover(&mut self, id: ItemId) -> bool {
        self.ids.insert(id)
    }

    /// Returns true if the id has been discovered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of discovered ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing is discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Discovered ids in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemId> + '_ {
        self.ids.iter()
    }
}

impl FromIterator<ItemId> for DiscoveredSet {
    fn from_iter<T: IntoIterator<Item = ItemId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl Extend<ItemId> for DiscoveredSet {
    fn extend<T: IntoIterator<Item = ItemId>>(&mut self, iter: T) {
        self.ids.extend(iter);
    }
}

/// A recipe whose ingredients are all known but whose result is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Recipe that could be tried next
    pub recipe: RecipeId,
    /// Item it would reveal
    pub result: ItemId,
}

/// Returns true if every ingredient is discovered and the result is not.
#[must_use]
pub fn is_suggested(recipe: &Recipe, discovered: &DiscoveredSet) -> bool {
    !discovered.contains(recipe.result.id.as_str())
        && recipe
            .ingredient_ids()
            .into_iter()
            .all(|id| discovered.contains(id.as_str()))
}

/// Recipes worth hinting, in table order.
///
/// The iterator borrows both inputs and can be recreated at any time; two
/// calls with the same discovered set yield the same sequence.
pub fn suggestions<'a>(
    recipes: &'a RecipeTable,
    discovered: &'a DiscoveredSet,
) -> impl Iterator<Item = Suggestion> + 'a {
    recipes
        .recipes()
        .iter()
        .filter(move |recipe| is_suggested(recipe, discovered))
        .map(|recipe| Suggestion {
            recipe: recipe.id.clone(),
            result: recipe.result.id.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "gridSize": 2,
        "recipes": [
            { "id": "r_plank", "ingredients": [["wood", "wood"]], "result": { "id": "plank", "count": 2 } },
            { "id": "r_glass", "ingredients": [["sand", "fire"]], "result": { "id": "glass" } },
            { "id": "r_stick", "ingredients": [["plank", null], ["plank", null]], "result": { "id": "stick" } },
            { "id": "r_torch", "ingredients": [["stick", "fire"]], "result": { "id": "torch" } }
        ]
    }"#;

    fn table() -> RecipeTable {
        RecipeTable::from_json(TABLE).expect("valid table")
    }

    fn base() -> DiscoveredSet {
        DiscoveredSet::with_base(&[ItemId::new("wood"), ItemId::new("fire")])
    }

    fn results(recipes: &RecipeTable, discovered: &DiscoveredSet) -> Vec<String> {
        suggestions(recipes, discovered)
            .map(|s| s.result.to_string())
            .collect()
    }

    #[test]
    fn test_suggestions_need_all_ingredients() {
        let recipes = table();
        // glass needs sand, which is not discovered
        assert_eq!(results(&recipes, &base()), vec!["plank"]);
    }

    #[test]
    fn test_suggestions_skip_discovered_results() {
        let recipes = table();
        let mut discovered = base();
        discovered.discover(ItemId::new("plank"));
        assert_eq!(results(&recipes, &discovered), vec!["stick"]);
    }

    #[test]
    fn test_suggestions_follow_table_order() {
        let recipes = table();
        let mut discovered = base();
        discovered.extend([ItemId::new("sand"), ItemId::new("stick")]);
        assert_eq!(results(&recipes, &discovered), vec!["plank", "glass", "torch"]);
    }

    #[test]
    fn test_suggestions_idempotent() {
        let recipes = table();
        let discovered = base();
        let first: Vec<_> = suggestions(&recipes, &discovered).collect();
        let second: Vec<_> = suggestions(&recipes, &discovered).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_discover_reports_new_ids() {
        let mut discovered = base();
        assert!(discovered.discover(ItemId::new("plank")));
        assert!(!discovered.discover(ItemId::new("plank")));
        assert_eq!(discovered.len(), 3);
        let order: Vec<&str> = discovered.iter().map(ItemId::as_str).collect();
        assert_eq!(order, vec!["wood", "fire", "plank"]);
    }
}
