//! Crafting engine.
//!
//! Matches the grid against the recipe table and performs crafts.
//!
//! # Matching
//!
//! A recipe matches when every cell agrees: an empty recipe cell needs an
//! empty grid cell, a filled one needs exactly that item. Recipes are tried
//! in table order and the first match wins, so a later recipe whose pattern
//! is shadowed by an earlier one can never be crafted.

use gamecraft_common::{ItemId, RecipeId};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::ItemCatalog;
use crate::config::GameRules;
use crate::crafting_grid::CraftingGrid;
use crate::game_state::{now_millis, CraftLogEntry, GameState};
use crate::recipes::{Recipe, RecipeTable};

/// Crafting error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftingError {
    /// The grid satisfies no recipe; nothing was changed
    #[error("No recipe matches the crafting grid")]
    NoRecipeMatched,
}

/// Result type for crafting operations.
pub type CraftingResult<T> = Result<T, CraftingError>;

/// Checks a grid against one recipe, cell by cell.
#[must_use]
pub fn matches(recipe: &Recipe, grid: &CraftingGrid) -> bool {
    if recipe.size() != grid.size() {
        return false;
    }
    recipe
        .pattern()
        .iter()
        .zip(grid.slots())
        .all(|(needed, have)| needed == have)
}

/// What a successful craft did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CraftOutcome {
    /// Recipe that was crafted
    pub recipe: RecipeId,
    /// Produced item
    pub item: ItemId,
    /// Produced quantity
    pub count: u32,
    /// Inventory slots the results landed in
    pub slots: Vec<usize>,
    /// The item was not discovered before
    pub newly_discovered: bool,
    /// The win flag was set
    pub won: bool,
}

/// Result shown in the preview panel while a recipe is satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CraftPreview {
    /// Matched recipe
    pub recipe: RecipeId,
    /// Item it would produce
    pub item: ItemId,
    /// Quantity it would produce
    pub count: u32,
    /// Display name of the item
    pub name: String,
    /// Icon glyph of the item
    pub emoji: String,
    /// Item description, else the recipe's
    pub description: Option<String>,
}

/// Recipe matcher and craft executor over a recipe table.
#[derive(Debug, Clone, Copy)]
pub struct CraftingEngine<'a> {
    recipes: &'a RecipeTable,
    rules: &'a GameRules,
}

impl<'a> CraftingEngine<'a> {
    /// Creates an engine for a table and rule set.
    #[must_use]
    pub const fn new(recipes: &'a RecipeTable, rules: &'a GameRules) -> Self {
        Self { recipes, rules }
    }

    /// First recipe in table order satisfied by the grid.
    #[must_use]
    pub fn match_recipe(&self, grid: &CraftingGrid) -> Option<&'a Recipe> {
        let found = self.recipes.recipes().iter().find(|r| matches(r, grid));
        if let Some(recipe) = found {
            debug!("Grid matches recipe {}", recipe.id);
        }
        found
    }

    /// Preview of the currently matched recipe.
    #[must_use]
    pub fn preview(&self, grid: &CraftingGrid, catalog: &ItemCatalog) -> Option<CraftPreview> {
        let recipe = self.match_recipe(grid)?;
        let id = recipe.result.id.as_str();
        let description = catalog
            .get(id)
            .and_then(|item| item.desc.clone())
            .or_else(|| recipe.desc.clone());

        Some(CraftPreview {
            recipe: recipe.id.clone(),
            item: recipe.result.id.clone(),
            count: recipe.result.count,
            name: catalog.display_name(id).to_string(),
            emoji: catalog.emoji(id).to_string(),
            description,
        })
    }

    /// Crafts the matched recipe, stamping the log with the current time.
    pub fn craft(&self, state: &mut GameState) -> CraftingResult<CraftOutcome> {
        self.craft_at(state, now_millis())
    }

    /// Crafts the matched recipe with an explicit timestamp.
    ///
    /// Clears the grid, inserts the results into the inventory (growing it
    /// as needed), records the discovery, appends to the craft log and sets
    /// the win flag for the ultimate item. Without a match nothing changes.
    pub fn craft_at(&self, state: &mut GameState, ts: u64) -> CraftingResult<CraftOutcome> {
        let recipe = self
            .match_recipe(&state.grid)
            .ok_or(CraftingError::NoRecipeMatched)?;
        let item = recipe.result.id.clone();
        let count = recipe.result.count;

        state.grid.clear();

        let slots = (0..count)
            .map(|_| {
                state
                    .inventory
                    .insert(item.clone(), self.rules.inventory_chunk)
            })
            .collect();

        let newly_discovered = state.discovered.discover(item.clone());

        state.crafts.record(CraftLogEntry {
            id: item.clone(),
            count,
            ts,
        });

        let won = item == self.rules.ultimate_item;
        if won {
            if !state.won {
                info!("Ultimate item {} crafted, game won", item);
            }
            state.won = true;
        }

        info!("Crafted {} x{} via {}", item, count, recipe.id);

        Ok(CraftOutcome {
            recipe: recipe.id.clone(),
            item,
            count,
            slots,
            newly_discovered,
            won,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crafting_grid::GridPos;

    const TABLE: &str = r#"{
        "gridSize": 3,
        "recipes": [
            {
                "id": "r_plank",
                "desc": "Saw the logs",
                "ingredients": [["wood", "wood", null], ["wood", null, null], [null, null, null]],
                "result": { "id": "plank", "count": 2 }
            },
            {
                "id": "r_pebble",
                "ingredients": [["stone", null, null], [null, null, null], [null, null, null]],
                "result": { "id": "pebble" }
            },
            {
                "id": "r_pebble_shadowed",
                "ingredients": [["stone", null, null], [null, null, null], [null, null, null]],
                "result": { "id": "gravel" }
            },
            {
                "id": "r_totem",
                "ingredients": [[null, null, null], [null, "plank", null], [null, null, null]],
                "result": { "id": "ultimate_totem" }
            }
        ]
    }"#;

    fn setup() -> (RecipeTable, GameRules, GameState) {
        let recipes = RecipeTable::from_json(TABLE).expect("valid table");
        let rules = GameRules::default();
        let state = GameState::new(3, &rules, &[ItemId::new("wood"), ItemId::new("stone")]);
        (recipes, rules, state)
    }

    fn place(state: &mut GameState, row: usize, col: usize, item: &str) {
        state
            .grid
            .set(GridPos::new(row, col), Some(ItemId::new(item)))
            .expect("in range");
    }

    fn place_planks_pattern(state: &mut GameState) {
        place(state, 0, 0, "wood");
        place(state, 0, 1, "wood");
        place(state, 1, 0, "wood");
    }

    #[test]
    fn test_match_exact_pattern() {
        let (recipes, rules, mut state) = setup();
        let engine = CraftingEngine::new(&recipes, &rules);
        place_planks_pattern(&mut state);

        let recipe = engine.match_recipe(&state.grid).expect("should match");
        assert_eq!(recipe.id.as_str(), "r_plank");
    }

    #[test]
    fn test_extra_item_rejects_match() {
        let (recipes, rules, mut state) = setup();
        let engine = CraftingEngine::new(&recipes, &rules);
        place_planks_pattern(&mut state);
        place(&mut state, 2, 2, "wood");
        assert!(engine.match_recipe(&state.grid).is_none());
    }

    #[test]
    fn test_shifted_pattern_does_not_match() {
        let (recipes, rules, mut state) = setup();
        let engine = CraftingEngine::new(&recipes, &rules);
        place(&mut state, 1, 1, "wood");
        place(&mut state, 1, 2, "wood");
        place(&mut state, 2, 1, "wood");
        assert!(engine.match_recipe(&state.grid).is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let (recipes, rules, mut state) = setup();
        let engine = CraftingEngine::new(&recipes, &rules);
        place(&mut state, 0, 0, "stone");
        let recipe = engine.match_recipe(&state.grid).expect("should match");
        assert_eq!(recipe.result.id.as_str(), "pebble");
    }

    #[test]
    fn test_empty_grid_matches_nothing() {
        let (recipes, rules, state) = setup();
        let engine = CraftingEngine::new(&recipes, &rules);
        assert!(engine.match_recipe(&state.grid).is_none());
    }

    #[test]
    fn test_craft_plank_scenario() {
        let (recipes, rules, mut state) = setup();
        let engine = CraftingEngine::new(&recipes, &rules);
        place_planks_pattern(&mut state);
        state
            .inventory
            .set(0, Some(ItemId::new("stone")))
            .expect("in range");

        let outcome = engine.craft_at(&mut state, 42).expect("should craft");

        assert!(state.grid.is_empty());
        assert_eq!(outcome.slots, vec![1, 2]);
        assert_eq!(state.inventory.count("plank"), 2);
        assert!(outcome.newly_discovered);
        assert!(state.discovered.contains("plank"));
        assert_eq!(state.discovered.len(), 3);
        assert_eq!(
            state.crafts.entries(),
            &[CraftLogEntry {
                id: ItemId::new("plank"),
                count: 2,
                ts: 42
            }]
        );
        assert!(!state.won);
    }

    #[test]
    fn test_craft_without_match_changes_nothing() {
        let (recipes, rules, mut state) = setup();
        let engine = CraftingEngine::new(&recipes, &rules);
        place(&mut state, 2, 2, "wood");
        let before = state.clone();

        assert_eq!(
            engine.craft_at(&mut state, 1),
            Err(CraftingError::NoRecipeMatched)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_craft_expands_full_inventory() {
        let (recipes, rules, mut state) = setup();
        let engine = CraftingEngine::new(&recipes, &rules);
        for _ in 0..19 {
            state.inventory.insert(ItemId::new("stone"), rules.inventory_chunk);
        }
        place_planks_pattern(&mut state);

        let outcome = engine.craft_at(&mut state, 1).expect("should craft");
        assert_eq!(outcome.slots, vec![19, 20]);
        assert_eq!(state.inventory.capacity(), 30);
    }

    #[test]
    fn test_rediscovery_is_not_new() {
        let (recipes, rules, mut state) = setup();
        let engine = CraftingEngine::new(&recipes, &rules);
        place_planks_pattern(&mut state);
        engine.craft_at(&mut state, 1).expect("should craft");
        place_planks_pattern(&mut state);
        let outcome = engine.craft_at(&mut state, 2).expect("should craft");

        assert!(!outcome.newly_discovered);
        assert_eq!(state.discovered.len(), 3);
        assert_eq!(state.crafts.len(), 2);
    }

    #[test]
    fn test_win_flag_set_and_stays_set() {
        let (recipes, rules, mut state) = setup();
        let engine = CraftingEngine::new(&recipes, &rules);

        place(&mut state, 1, 1, "plank");
        let outcome = engine.craft_at(&mut state, 1).expect("should craft");
        assert!(outcome.won);
        assert!(state.won);

        place(&mut state, 1, 1, "plank");
        engine.craft_at(&mut state, 2).expect("should craft again");
        assert!(state.won);
    }

    #[test]
    fn test_preview_uses_recipe_description_as_fallback() {
        let (recipes, rules, mut state) = setup();
        let engine = CraftingEngine::new(&recipes, &rules);
        let catalog = ItemCatalog::default();
        place_planks_pattern(&mut state);

        let preview = engine
            .preview(&state.grid, &catalog)
            .expect("should preview");
        assert_eq!(preview.item.as_str(), "plank");
        assert_eq!(preview.count, 2);
        assert_eq!(preview.name, "plank");
        assert_eq!(preview.description.as_deref(), Some("Saw the logs"));
    }
}
