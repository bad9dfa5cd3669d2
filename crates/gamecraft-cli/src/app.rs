//! Application setup and the interactive loop.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use gamecraft_core::catalog::ItemCatalog;
use gamecraft_core::config::{GameConfig, CONFIG_FILE};
use gamecraft_core::recipes::RecipeTable;
use gamecraft_core::session::GameSession;
use gamecraft_core::storage::{FileStore, KeyValueStore, MemoryStore};
use tracing::{info, warn};

use crate::commands::{self, Command, HELP};
use crate::render;

/// Directory under the user data dir holding config and saves.
const APP_DIR: &str = "gamecraft";

/// Subdirectory of the app dir holding the saved game.
const SAVE_DIR: &str = "saves";

/// Command-line options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Explicit save directory
    pub save_dir: Option<PathBuf>,
    /// Keep the game in memory only
    pub memory: bool,
    /// Print usage and exit
    pub help: bool,
}

/// Usage line for `--help`.
const USAGE: &str = "Usage: gamecraft [--config <file>] [--save-dir <dir>] [--memory]";

impl Options {
    /// Parses arguments, program name excluded.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args.next().context("--config needs a file path")?;
                    options.config = Some(PathBuf::from(path));
                },
                "--save-dir" | "-s" => {
                    let path = args.next().context("--save-dir needs a directory")?;
                    options.save_dir = Some(PathBuf::from(path));
                },
                "--memory" | "-m" => options.memory = true,
                "--help" | "-h" => options.help = true,
                other => bail!("Unknown argument '{other}'\n{USAGE}"),
            }
        }
        Ok(options)
    }
}

/// Per-user application directory.
fn app_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
}

fn load_catalog(path: Option<&Path>) -> Result<ItemCatalog> {
    match path {
        Some(path) => ItemCatalog::from_path(path)
            .with_context(|| format!("Failed to load resources from {}", path.display())),
        None => ItemCatalog::builtin().context("Built-in resources are invalid"),
    }
}

fn load_recipes(path: Option<&Path>) -> Result<RecipeTable> {
    match path {
        Some(path) => RecipeTable::from_path(path)
            .with_context(|| format!("Failed to load recipes from {}", path.display())),
        None => RecipeTable::builtin().context("Built-in recipes are invalid"),
    }
}

/// Builds a session from options and configuration.
pub fn open_session(options: &Options) -> Result<GameSession> {
    let app_dir = app_dir();
    let config_path = options
        .config
        .clone()
        .unwrap_or_else(|| app_dir.join(CONFIG_FILE));
    let config = GameConfig::load_from(&config_path);

    info!("Configuration loaded:");
    info!("  Inventory: {} slots, grows by {}", config.inventory_size, config.inventory_chunk);
    info!("  Ultimate item: {}", config.ultimate_item);

    let catalog = load_catalog(config.resources_path.as_deref())?;
    let recipes = load_recipes(config.recipes_path.as_deref())?;
    info!(
        "Loaded {} items and {} recipes ({}x{} grid)",
        catalog.len(),
        recipes.len(),
        recipes.grid_size(),
        recipes.grid_size()
    );

    let rules = config.rules();
    if !catalog.contains(rules.ultimate_item.as_str()) {
        warn!("Ultimate item {} is not in the catalog", rules.ultimate_item);
    }

    let store: Box<dyn KeyValueStore> = if options.memory {
        Box::new(MemoryStore::new())
    } else {
        let save_dir = options
            .save_dir
            .clone()
            .or(config.save_dir)
            .unwrap_or_else(|| app_dir.join(SAVE_DIR));
        info!("Saving to {}", save_dir.display());
        Box::new(FileStore::new(save_dir))
    };

    let (session, report) = GameSession::open(catalog, recipes, rules, store);
    if report.repaired() {
        warn!("Parts of the saved game were damaged and have been reset");
    }
    Ok(session)
}

/// Result of handling one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn execute(session: &mut GameSession, command: Command, out: &mut impl Write) -> Result<Flow> {
    match command {
        Command::Show => write!(out, "{}", render::board(session))?,
        Command::Add(item) => match session.add_resource(&item) {
            Some(outcome) => {
                writeln!(out, "{}", render::transfer(outcome))?;
                write!(out, "{}", render::inventory(session.state(), session.catalog()))?;
            },
            None => writeln!(out, "'{item}' is not a base resource")?,
        },
        Command::Drag {
            source,
            destination,
        } => match session.drop_item(&source, destination.as_ref()) {
            Ok(outcome) => {
                writeln!(out, "{}", render::transfer(outcome))?;
                if outcome.changed() {
                    write!(out, "{}", render::board(session))?;
                }
            },
            Err(e) => writeln!(out, "{e}")?,
        },
        Command::Craft => match session.craft() {
            Ok(outcome) => {
                writeln!(out, "{}", render::craft(&outcome, session.catalog()))?;
                write!(out, "{}", render::inventory(session.state(), session.catalog()))?;
            },
            Err(e) => writeln!(out, "{e}")?,
        },
        Command::Hints => writeln!(out, "{}", render::hints(session))?,
        Command::Stats => writeln!(out, "{}", render::stats(&session.stats()))?,
        Command::Log => writeln!(out, "{}", render::log(session.state(), session.catalog()))?,
        Command::Reset => {
            session.reset();
            writeln!(out, "New game started")?;
            write!(out, "{}", render::board(session))?;
        },
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Reads commands until `quit` or end of input.
pub fn run_loop(
    session: &mut GameSession,
    input: impl BufRead,
    mut out: impl Write,
) -> Result<()> {
    write!(out, "{}", render::board(session))?;
    writeln!(out, "Type 'help' for commands.")?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        match commands::parse(&line) {
            Ok(Some(command)) => {
                if execute(session, command, &mut out)? == Flow::Quit {
                    break;
                }
            },
            Ok(None) => {},
            Err(e) => writeln!(out, "{e}")?,
        }
        out.flush()?;
    }

    session.save_all();
    info!("Session ended: {:?}", session.stats());
    Ok(())
}

/// Runs the game on the terminal.
pub fn run() -> Result<()> {
    let options = Options::parse(std::env::args().skip(1))?;
    if options.help {
        println!("{USAGE}\n\n{HELP}");
        return Ok(());
    }

    let mut session = open_session(&options)?;
    info!("Using {} store", session.store_name());

    let stdin = std::io::stdin();
    run_loop(&mut session, stdin.lock(), std::io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory session that never reads the user's own config file.
    fn memory_session() -> GameSession {
        let dir = tempfile::tempdir().expect("temp dir");
        open_session(&Options {
            config: Some(dir.path().join(CONFIG_FILE)),
            memory: true,
            ..Options::default()
        })
        .expect("session")
    }

    fn play(session: &mut GameSession, script: &str) -> String {
        let mut out = Vec::new();
        run_loop(session, script.as_bytes(), &mut out).expect("loop");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn test_parse_options() {
        let options = Options::parse(["--memory", "--save-dir", "/tmp/saves"]).expect("parse");
        assert!(options.memory);
        assert_eq!(options.save_dir, Some(PathBuf::from("/tmp/saves")));

        assert!(Options::parse(["--config"]).is_err());
        assert!(Options::parse(["--fast"]).is_err());
    }

    #[test]
    fn test_scripted_plank_craft() {
        let mut session = memory_session();
        let output = play(
            &mut session,
            "drag res:wood grid:0,0\n\
             drag res:wood grid:0,1\n\
             drag res:wood grid:1,0\n\
             craft\n\
             quit\n",
        );

        assert!(output.contains("Craft ready"));
        assert!(output.contains("Crafted"));
        assert!(output.contains("new discovery"));
        assert_eq!(session.state().inventory.count("plank"), 2);
    }

    #[test]
    fn test_bad_input_does_not_stop_the_loop() {
        let mut session = memory_session();
        let output = play(&mut session, "fly\ndrag inv:99 trash\nadd plank\nadd wood\n");

        assert!(output.contains("Unknown command 'fly'"));
        assert!(output.contains("out of range"));
        assert!(output.contains("not a base resource"));
        assert_eq!(session.state().inventory.count("wood"), 1);
    }

    #[test]
    fn test_explicit_config_file_is_used() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config_path = dir.path().join(CONFIG_FILE);
        std::fs::write(&config_path, "inventory_size = 5\n").expect("write config");

        let session = open_session(&Options {
            config: Some(config_path),
            memory: true,
            ..Options::default()
        })
        .expect("session");
        assert_eq!(session.state().inventory.capacity(), 5);
        assert_eq!(session.store_name(), "Memory");
    }

    #[test]
    fn test_craft_log_survives_reset_and_quit() {
        let dir = tempfile::tempdir().expect("temp dir");
        let options = Options {
            config: Some(dir.path().join(CONFIG_FILE)),
            save_dir: Some(dir.path().join("saves")),
            ..Options::default()
        };

        let mut session = open_session(&options).expect("session");
        play(
            &mut session,
            "drag res:wood grid:0,0\n\
             drag res:wood grid:0,1\n\
             drag res:wood grid:1,0\n\
             craft\n\
             reset\n\
             quit\n",
        );

        let reopened = open_session(&options).expect("session");
        assert_eq!(reopened.state().inventory.item_count(), 0);
        assert!(!reopened.state().discovered.contains("plank"));
        assert_eq!(reopened.state().crafts.len(), 1);
    }

    #[test]
    fn test_file_store_session_persists() {
        let dir = tempfile::tempdir().expect("temp dir");
        let options = Options {
            config: Some(dir.path().join(CONFIG_FILE)),
            save_dir: Some(dir.path().join("saves")),
            ..Options::default()
        };

        let mut session = open_session(&options).expect("session");
        play(&mut session, "add water\nadd fire\n");

        let reopened = open_session(&options).expect("session");
        assert_eq!(reopened.state().inventory.item_count(), 2);
    }
}
