//! Error types for loading GameCraft data tables.

use thiserror::Error;

use crate::ids::{ItemId, RecipeId};

/// Errors raised while loading the item catalog or the recipe table.
#[derive(Debug, Error)]
pub enum DataError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse errors
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Grid size outside the supported range
    #[error("Invalid grid size {0}: must be between 1 and 9")]
    InvalidGridSize(usize),

    /// Recipe pattern places an ingredient outside the grid
    #[error("Recipe {recipe} has an ingredient outside the {size}x{size} grid at ({row}, {col})")]
    InvalidPattern {
        /// Offending recipe
        recipe: RecipeId,
        /// Grid size
        size: usize,
        /// Row of the out-of-bounds cell
        row: usize,
        /// Column of the out-of-bounds cell
        col: usize,
    },

    /// Recipe produces nothing
    #[error("Recipe {recipe} produces zero of {item}")]
    ZeroResultCount {
        /// Offending recipe
        recipe: RecipeId,
        /// Result item
        item: ItemId,
    },
}

/// Result type alias for data loading.
pub type DataResult<T> = Result<T, DataError>;
