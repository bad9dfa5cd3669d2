//! # GameCraft Core
//!
//! Discovery crafting game engine.
//!
//! This crate provides the whole game model without any presentation:
//! - Item catalog and recipe table loading
//! - Crafting grid and growable inventory slot containers
//! - Exact-position recipe matching and craft execution
//! - Drag-and-drop transfer resolution between zones
//! - Discovery tracking and recipe hints
//! - Key-value persistence with validation on load
//! - Game sessions that save after every mutation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod config;
pub mod crafting;
pub mod crafting_grid;
pub mod discovery;
pub mod game_state;
pub mod inventory;
pub mod recipes;
pub mod save;
pub mod session;
pub mod slot;
pub mod storage;
pub mod transfer;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::config::*;
    pub use crate::crafting::*;
    pub use crate::crafting_grid::*;
    pub use crate::discovery::*;
    pub use crate::game_state::*;
    pub use crate::inventory::*;
    pub use crate::recipes::*;
    pub use crate::save::{KeyStatus, LoadReport, SaveKey};
    pub use crate::session::*;
    pub use crate::slot::*;
    pub use crate::storage::*;
    pub use crate::transfer::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_agree() {
        let catalog = ItemCatalog::builtin().expect("builtin catalog");
        let recipes = RecipeTable::builtin().expect("builtin recipes");

        for recipe in recipes.recipes() {
            assert!(
                catalog.contains(recipe.result.id.as_str()),
                "{} produces an unknown item",
                recipe.id
            );
            for id in recipe.ingredient_ids() {
                assert!(catalog.contains(id.as_str()), "{} uses unknown {}", recipe.id, id);
            }
        }
    }

    #[test]
    fn test_ultimate_item_is_craftable() {
        let recipes = RecipeTable::builtin().expect("builtin recipes");
        let rules = GameRules::default();
        assert!(recipes
            .recipes()
            .iter()
            .any(|r| r.result.id == rules.ultimate_item));
    }
}
