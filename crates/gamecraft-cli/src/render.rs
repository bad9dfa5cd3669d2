//! Plain-text rendering of the board.

use std::fmt::Write;

use gamecraft_core::catalog::ItemCatalog;
use gamecraft_core::crafting::{CraftOutcome, CraftPreview};
use gamecraft_core::game_state::{GameState, GameStats};
use gamecraft_core::session::GameSession;
use gamecraft_core::slot::Slot;
use gamecraft_core::transfer::TransferOutcome;

/// Slots printed per inventory row.
const INVENTORY_ROW: usize = 10;

fn cell(catalog: &ItemCatalog, slot: &Slot) -> String {
    match slot {
        Some(id) => format!("{} {}", catalog.emoji(id.as_str()), id),
        None => "·".to_string(),
    }
}

/// Base resources available for dragging.
pub fn palette(catalog: &ItemCatalog) -> String {
    let entries: Vec<String> = catalog
        .base_items()
        .map(|item| format!("{} {} (res:{})", item.emoji, item.name, item.id))
        .collect();
    format!("Resources: {}", entries.join("  "))
}

/// Crafting grid, one line per row.
pub fn grid(state: &GameState, catalog: &ItemCatalog) -> String {
    let mut out = String::from("Grid:\n");
    for (r, row) in state.grid.rows().enumerate() {
        let cells: Vec<String> = row.iter().map(|slot| cell(catalog, slot)).collect();
        let _ = writeln!(out, "  {r}: [ {} ]", cells.join(" | "));
    }
    out
}

/// Inventory slots with their indices.
pub fn inventory(state: &GameState, catalog: &ItemCatalog) -> String {
    let slots = state.inventory.slots();
    let mut out = format!(
        "Inventory ({}/{}):\n",
        state.inventory.item_count(),
        state.inventory.capacity()
    );
    for (chunk_index, chunk) in slots.chunks(INVENTORY_ROW).enumerate() {
        let start = chunk_index * INVENTORY_ROW;
        let cells: Vec<String> = chunk
            .iter()
            .enumerate()
            .map(|(i, slot)| format!("{}:{}", start + i, cell(catalog, slot)))
            .collect();
        let _ = writeln!(out, "  {}", cells.join("  "));
    }
    out
}

/// Preview panel line.
pub fn preview(preview: Option<&CraftPreview>) -> String {
    match preview {
        Some(p) => {
            let mut line = format!("Craft ready: {} {} x{}", p.emoji, p.name, p.count);
            if let Some(desc) = &p.description {
                let _ = write!(line, " - {desc}");
            }
            line
        },
        None => "No recipe matches the grid".to_string(),
    }
}

/// Full board view.
pub fn board(session: &GameSession) -> String {
    let catalog = session.catalog();
    let state = session.state();
    let mut out = String::new();
    let _ = writeln!(out, "{}", palette(catalog));
    out.push_str(&grid(state, catalog));
    let _ = writeln!(out, "{}", preview(session.preview().as_ref()));
    out.push_str(&inventory(state, catalog));
    let _ = writeln!(out, "Discovered: {} items", state.discovered.len());
    if state.won {
        out.push_str("*** You made the ultimate item. You win! ***\n");
    }
    out
}

/// One-line description of a transfer.
pub fn transfer(outcome: TransferOutcome) -> String {
    match outcome {
        TransferOutcome::Ignored => "Nothing happened".to_string(),
        TransferOutcome::Moved => "Moved".to_string(),
        TransferOutcome::Swapped => "Swapped".to_string(),
        TransferOutcome::Placed => "Placed".to_string(),
        TransferOutcome::Inserted { index } => format!("Added to inventory slot {index}"),
        TransferOutcome::Expanded { index } => {
            format!("Inventory grew; item went to slot {index}")
        },
        TransferOutcome::Deleted => "Deleted".to_string(),
    }
}

/// Summary of a finished craft.
pub fn craft(outcome: &CraftOutcome, catalog: &ItemCatalog) -> String {
    let id = outcome.item.as_str();
    let mut line = format!(
        "Crafted {} {} x{}",
        catalog.emoji(id),
        catalog.display_name(id),
        outcome.count
    );
    if outcome.newly_discovered {
        line.push_str(" (new discovery!)");
    }
    if outcome.won {
        line.push_str("\n*** You made the ultimate item. You win! ***");
    }
    line
}

/// Progress summary.
pub fn stats(stats: &GameStats) -> String {
    format!(
        "Discovered {} items, {}/{} craftable kinds made, {} crafts ({} items){}",
        stats.discovered,
        stats.crafted_kinds,
        stats.craftable,
        stats.crafts,
        stats.items_crafted,
        if stats.won { ", game won" } else { "" }
    )
}

/// Recipes worth trying next.
pub fn hints(session: &GameSession) -> String {
    let catalog = session.catalog();
    let lines: Vec<String> = session
        .suggestions()
        .map(|s| {
            let id = s.result.as_str();
            format!("  {} {} ({})", catalog.emoji(id), catalog.display_name(id), s.recipe)
        })
        .collect();
    if lines.is_empty() {
        "No hints: every reachable item is already known".to_string()
    } else {
        format!("You could try:\n{}", lines.join("\n"))
    }
}

/// Craft log, oldest first.
pub fn log(state: &GameState, catalog: &ItemCatalog) -> String {
    if state.crafts.is_empty() {
        return "Nothing crafted yet".to_string();
    }
    let lines: Vec<String> = state
        .crafts
        .entries()
        .iter()
        .map(|e| {
            format!(
                "  {} {} x{} at {}",
                catalog.emoji(e.id.as_str()),
                catalog.display_name(e.id.as_str()),
                e.count,
                e.ts
            )
        })
        .collect();
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamecraft_core::catalog::Item;

    fn catalog() -> ItemCatalog {
        ItemCatalog::new(vec![Item::new("wood", "Wood", "🪵")], Vec::new())
    }

    #[test]
    fn test_unknown_items_use_fallback_glyph() {
        let catalog = catalog();
        assert_eq!(
            cell(&catalog, &Some("mystery".into())),
            "❓ mystery".to_string()
        );
        assert_eq!(cell(&catalog, &None), "·");
    }

    #[test]
    fn test_palette_lists_base_items() {
        assert_eq!(palette(&catalog()), "Resources: 🪵 Wood (res:wood)");
    }

    #[test]
    fn test_transfer_messages() {
        assert_eq!(
            transfer(TransferOutcome::Expanded { index: 20 }),
            "Inventory grew; item went to slot 20"
        );
        assert_eq!(transfer(TransferOutcome::Ignored), "Nothing happened");
    }
}
