//! Game configuration.
//!
//! Inventory sizing, the winning item and optional data/save locations.
//! Loaded from a TOML file; a missing or broken file yields defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use gamecraft_common::ItemId;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::inventory::{DEFAULT_INVENTORY_CHUNK, DEFAULT_INVENTORY_SIZE};

/// Configuration file name.
pub const CONFIG_FILE: &str = "gamecraft.toml";

/// Item whose first craft wins the game.
pub const DEFAULT_ULTIMATE_ITEM: &str = "ultimate_totem";

/// Configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Inventory capacity on a fresh game
    pub inventory_size: usize,
    /// Slots added whenever the inventory has to grow
    pub inventory_chunk: usize,
    /// Item whose first craft sets the win flag
    pub ultimate_item: String,
    /// Resources file replacing the built-in catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources_path: Option<PathBuf>,
    /// Recipes file replacing the built-in table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipes_path: Option<PathBuf>,
    /// Directory holding the saved game
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_dir: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            inventory_size: DEFAULT_INVENTORY_SIZE,
            inventory_chunk: DEFAULT_INVENTORY_CHUNK,
            ultimate_item: DEFAULT_ULTIMATE_ITEM.to_string(),
            resources_path: None,
            recipes_path: None,
            save_dir: None,
        }
    }
}

impl GameConfig {
    /// Load configuration from a path.
    /// Returns defaults if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp values to usable ranges.
    pub fn validate(&mut self) {
        self.inventory_size = self.inventory_size.max(1);
        self.inventory_chunk = self.inventory_chunk.max(1);
        if self.ultimate_item.is_empty() {
            self.ultimate_item = DEFAULT_ULTIMATE_ITEM.to_string();
        }
    }

    /// The gameplay rules this configuration selects.
    #[must_use]
    pub fn rules(&self) -> GameRules {
        GameRules {
            inventory_size: self.inventory_size.max(1),
            inventory_chunk: self.inventory_chunk.max(1),
            ultimate_item: ItemId::new(self.ultimate_item.clone()),
        }
    }
}

/// Gameplay constants consumed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRules {
    /// Inventory capacity on a fresh game
    pub inventory_size: usize,
    /// Slots added per inventory expansion
    pub inventory_chunk: usize,
    /// Item whose craft sets the win flag
    pub ultimate_item: ItemId,
}

impl Default for GameRules {
    fn default() -> Self {
        GameConfig::default().rules()
    }
}
