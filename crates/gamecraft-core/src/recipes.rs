//! Recipe definitions and the recipe table.
//!
//! This module provides:
//! - Recipe data structures (square ingredient pattern plus result)
//! - The ordered recipe table with its grid size
//! - Loading and validation from the recipes JSON format

use std::fs;
use std::path::Path;

use gamecraft_common::{DataError, DataResult, ItemId, RecipeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crafting_grid::{Slot, MAX_GRID_SIZE};

/// Built-in recipe definitions.
const BUILTIN_RECIPES: &str = include_str!("../data/recipes.json");

/// Grid size used when the table does not declare one.
pub const DEFAULT_GRID_SIZE: usize = 3;

/// What a recipe produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeResult {
    /// Produced item
    pub id: ItemId,
    /// Produced quantity
    #[serde(default = "default_count")]
    pub count: u32,
}

const fn default_count() -> u32 {
    1
}

/// A shaped recipe: every grid cell must match exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Recipe identifier
    pub id: RecipeId,
    /// Optional description shown in the preview
    pub desc: Option<String>,
    /// Pattern side length
    size: usize,
    /// Required cells in row-major order; `None` requires an empty cell.
    pattern: Vec<Slot>,
    /// Result item and count
    pub result: RecipeResult,
}

impl Recipe {
    /// Creates a recipe from pattern rows.
    ///
    /// Missing rows and cells are empty. Ingredients outside the
    /// `size`x`size` square are rejected.
    pub fn new(
        id: impl Into<RecipeId>,
        size: usize,
        rows: &[Vec<Slot>],
        result: RecipeResult,
    ) -> DataResult<Self> {
        let id = id.into();
        if result.count == 0 {
            return Err(DataError::ZeroResultCount {
                recipe: id,
                item: result.id,
            });
        }

        let mut pattern = vec![None; size * size];
        for (row, cells) in rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let Some(item) = cell else { continue };
                if row >= size || col >= size {
                    return Err(DataError::InvalidPattern {
                        recipe: id,
                        size,
                        row,
                        col,
                    });
                }
                pattern[row * size + col] = Some(item.clone());
            }
        }

        Ok(Self {
            id,
            desc: None,
            size,
            pattern,
            result,
        })
    }

    /// Pattern side length.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Required cells in row-major order.
    #[must_use]
    pub fn pattern(&self) -> &[Slot] {
        &self.pattern
    }

    /// Required content of one cell.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&ItemId> {
        if row < self.size && col < self.size {
            self.pattern[row * self.size + col].as_ref()
        } else {
            None
        }
    }

    /// Distinct non-empty ingredient ids, sorted.
    #[must_use]
    pub fn ingredient_ids(&self) -> Vec<&ItemId> {
        let mut ids: Vec<_> = self.pattern.iter().flatten().collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn ingredient_count(&self) -> usize {
        self.pattern.iter().filter(|cell| cell.is_some()).count()
    }
}

/// On-disk layout of a single recipe.
#[derive(Debug, Deserialize)]
struct RecipeDef {
    id: RecipeId,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    ingredients: Vec<Vec<Slot>>,
    result: RecipeResult,
}

/// On-disk layout of the recipes file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipesFile {
    #[serde(default)]
    grid_size: Option<usize>,
    #[serde(default)]
    recipes: Vec<RecipeDef>,
}

/// Ordered recipe list. Order is the tie-break: the first match wins.
#[derive(Debug, Clone)]
pub struct RecipeTable {
    grid_size: usize,
    recipes: Vec<Recipe>,
}

impl Default for RecipeTable {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            recipes: Vec::new(),
        }
    }
}

impl RecipeTable {
    /// Creates an empty table for a grid of the given size.
    pub fn new(grid_size: usize) -> DataResult<Self> {
        if grid_size == 0 || grid_size > MAX_GRID_SIZE {
            return Err(DataError::InvalidGridSize(grid_size));
        }
        Ok(Self {
            grid_size,
            recipes: Vec::new(),
        })
    }

    /// Appends a recipe. Its pattern size must equal the table's grid size.
    pub fn push(&mut self, recipe: Recipe) -> DataResult<()> {
        if recipe.size() != self.grid_size {
            return Err(DataError::InvalidGridSize(recipe.size()));
        }
        debug!(
            "Registered recipe {} with {} ingredients",
            recipe.id,
            recipe.ingredient_count()
        );
        self.recipes.push(recipe);
        Ok(())
    }

    /// Parses a table from the recipes JSON format.
    pub fn from_json(json: &str) -> DataResult<Self> {
        let file: RecipesFile = serde_json::from_str(json)?;
        let mut table = Self::new(file.grid_size.unwrap_or(DEFAULT_GRID_SIZE))?;
        for def in file.recipes {
            let mut recipe = Recipe::new(def.id, table.grid_size, &def.ingredients, def.result)?;
            recipe.desc = def.desc;
            table.push(recipe)?;
        }
        Ok(table)
    }

    /// Loads a table from a recipes JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> DataResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// The table bundled with the crate.
    pub fn builtin() -> DataResult<Self> {
        Self::from_json(BUILTIN_RECIPES)
    }

    /// Grid side length every recipe is written for.
    #[must_use]
    pub const fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Recipes in table order.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Looks up a recipe by id.
    #[must_use]
    pub fn get(&self, id: &RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| &r.id == id)
    }

    /// Number of recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Returns true if the table has no recipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
