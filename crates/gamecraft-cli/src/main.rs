//! # GameCraft
//!
//! Terminal front-end for the GameCraft discovery crafting game.
//!
//! Drag resources from the palette onto the crafting grid, craft new items
//! and work up to the ultimate item. Progress is saved after every move.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod commands;
mod render;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Logs go to stderr; stdout is the game board
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("gamecraft=info".parse()?))
        .init();

    info!("GameCraft starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    app::run()?;

    info!("GameCraft shutdown complete");
    Ok(())
}
