//! Game session.
//!
//! Owns the static tables, the mutable state and the backing store. Every
//! mutating operation writes the keys it touched right away. Storage
//! failures are logged and swallowed; the in-memory game carries on.

use gamecraft_common::ItemId;
use tracing::{info, warn};

use crate::catalog::ItemCatalog;
use crate::config::GameRules;
use crate::crafting::{CraftOutcome, CraftPreview, CraftingEngine, CraftingResult};
use crate::discovery::{suggestions, Suggestion};
use crate::game_state::{GameState, GameStats};
use crate::recipes::{Recipe, RecipeTable};
use crate::save::{self, LoadReport, SaveKey};
use crate::slot::SlotResult;
use crate::storage::KeyValueStore;
use crate::transfer::{TransferOutcome, TransferResolver, Zone};

/// A running game bound to a store.
pub struct GameSession {
    catalog: ItemCatalog,
    recipes: RecipeTable,
    rules: GameRules,
    state: GameState,
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("store", &self.store.name())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Starts a fresh game without reading the store.
    #[must_use]
    pub fn new(
        catalog: ItemCatalog,
        recipes: RecipeTable,
        rules: GameRules,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let state = GameState::new(recipes.grid_size(), &rules, catalog.base_ids());
        Self {
            catalog,
            recipes,
            rules,
            state,
            store,
        }
    }

    /// Opens a session and restores whatever the store holds.
    #[must_use]
    pub fn open(
        catalog: ItemCatalog,
        recipes: RecipeTable,
        rules: GameRules,
        store: Box<dyn KeyValueStore>,
    ) -> (Self, LoadReport) {
        let mut session = Self::new(catalog, recipes, rules, store);
        let report = session.restore();
        (session, report)
    }

    /// Replaces the in-memory game with the stored one.
    pub fn restore(&mut self) -> LoadReport {
        let (state, report) = save::load(
            self.store.as_ref(),
            self.recipes.grid_size(),
            &self.rules,
            self.catalog.base_ids(),
        );
        self.state = state;
        report
    }

    /// Item catalog.
    #[must_use]
    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// Recipe table.
    #[must_use]
    pub fn recipes(&self) -> &RecipeTable {
        &self.recipes
    }

    /// Gameplay rules.
    #[must_use]
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Current game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Backing store name.
    #[must_use]
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    fn engine(&self) -> CraftingEngine<'_> {
        CraftingEngine::new(&self.recipes, &self.rules)
    }

    fn resolver(&self) -> TransferResolver {
        TransferResolver::new(&self.rules)
    }

    fn persist(&self, keys: &[SaveKey]) {
        if let Err(e) = save::save_keys(&self.state, self.store.as_ref(), keys) {
            warn!("Game not saved to {} store: {e}", self.store.name());
        }
    }

    /// Recipe the grid currently satisfies.
    #[must_use]
    pub fn current_match(&self) -> Option<&Recipe> {
        self.engine().match_recipe(&self.state.grid)
    }

    /// Preview of the craft the grid currently allows.
    #[must_use]
    pub fn preview(&self) -> Option<CraftPreview> {
        self.engine().preview(&self.state.grid, &self.catalog)
    }

    /// Resolves a finished drag and saves the containers if anything moved.
    ///
    /// Only palette resources can be dragged out of the resource zone;
    /// any other id is ignored.
    pub fn drop_item(
        &mut self,
        source: &Zone,
        destination: Option<&Zone>,
    ) -> SlotResult<TransferOutcome> {
        if let Zone::Resource { item } = source {
            if !self.catalog.is_base(item.as_str()) {
                warn!("{} is not a base resource", item);
                return Ok(TransferOutcome::Ignored);
            }
        }

        let outcome = self
            .resolver()
            .resolve_drop(&mut self.state, source, destination)?;
        if outcome.changed() {
            self.persist(&SaveKey::CONTAINERS);
        }
        Ok(outcome)
    }

    /// Adds one base resource straight to the inventory.
    ///
    /// Returns `None` for ids that are not base resources.
    pub fn add_resource(&mut self, item: &str) -> Option<TransferOutcome> {
        if !self.catalog.is_base(item) {
            warn!("{} is not a base resource", item);
            return None;
        }
        let outcome = self
            .resolver()
            .add_to_inventory(&mut self.state, ItemId::new(item));
        self.persist(&[SaveKey::Inventory]);
        Some(outcome)
    }

    /// Crafts whatever the grid matches and saves the whole game.
    pub fn craft(&mut self) -> CraftingResult<CraftOutcome> {
        let engine = CraftingEngine::new(&self.recipes, &self.rules);
        let outcome = engine.craft(&mut self.state)?;
        self.persist(&SaveKey::ALL);
        Ok(outcome)
    }

    /// Recipes worth hinting right now.
    pub fn suggestions(&self) -> impl Iterator<Item = Suggestion> + '_ {
        suggestions(&self.recipes, &self.state.discovered)
    }

    /// Progress summary.
    #[must_use]
    pub fn stats(&self) -> GameStats {
        self.state.stats(&self.recipes)
    }

    /// Starts over: clears the saved keys and resets the state.
    ///
    /// The craft log stays in memory and is written again by the next craft.
    pub fn reset(&mut self) {
        if let Err(e) = save::clear(self.store.as_ref()) {
            warn!("Saved game not cleared from {} store: {e}", self.store.name());
        }
        self.state.reset(&self.rules, self.catalog.base_ids());
        info!("New game started");
    }

    /// Writes the whole game.
    pub fn save_all(&self) {
        self.persist(&SaveKey::ALL);
    }
}
