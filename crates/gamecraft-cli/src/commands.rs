//! Command-line parsing for the interactive loop.

use gamecraft_core::transfer::Zone;
use thiserror::Error;

/// Errors from parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// First word is not a command
    #[error("Unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    /// Wrong number of arguments
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// Zone address could not be read
    #[error("Invalid zone '{0}': expected res:<item>, inv:<index>, grid:<row>,<col> or trash")]
    InvalidZone(String),
}

/// One parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the whole board
    Show,
    /// Quick-add a base resource to the inventory
    Add(String),
    /// Drag from one zone to another; `None` abandons the drag
    Drag {
        /// Where the drag starts
        source: Zone,
        /// Where it lands
        destination: Option<Zone>,
    },
    /// Craft the matched recipe
    Craft,
    /// List recipes worth trying
    Hints,
    /// Print progress
    Stats,
    /// Print the craft log
    Log,
    /// Start a new game
    Reset,
    /// Print the command list
    Help,
    /// Leave the game
    Quit,
}

/// Text printed by `help`.
pub const HELP: &str = "\
Commands:
  show                      print palette, grid and inventory
  add <item>                add a base resource to the inventory
  drag <from> <to>          move an item; <to> may be 'none' to cancel
  craft                     craft the matched recipe
  hints                     list recipes whose ingredients are all known
  stats                     show progress
  log                       show the craft log
  reset                     start a new game
  help                      show this list
  quit                      save and exit
Zones:
  res:<item>  inv:<index>  grid:<row>,<col>  trash";

/// Parses a zone address.
pub fn parse_zone(text: &str) -> Result<Zone, ParseError> {
    let invalid = || ParseError::InvalidZone(text.to_string());

    if text == "trash" {
        return Ok(Zone::Trash);
    }
    let (kind, rest) = text.split_once(':').ok_or_else(invalid)?;
    match kind {
        "res" if !rest.is_empty() => Ok(Zone::resource(rest)),
        "inv" => rest.parse().map(Zone::inventory).map_err(|_| invalid()),
        "grid" => {
            let (row, col) = rest.split_once(',').ok_or_else(invalid)?;
            let row = row.trim().parse().map_err(|_| invalid())?;
            let col = col.trim().parse().map_err(|_| invalid())?;
            Ok(Zone::grid(row, col))
        },
        _ => Err(invalid()),
    }
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match (name, args) {
        ("show" | "s", []) => Command::Show,
        ("add" | "a", [item]) => Command::Add((*item).to_string()),
        ("add" | "a", _) => return Err(ParseError::Usage("add <item>")),
        ("drag" | "d", [source, destination]) => Command::Drag {
            source: parse_zone(source)?,
            destination: match *destination {
                "none" => None,
                other => Some(parse_zone(other)?),
            },
        },
        ("drag" | "d", _) => return Err(ParseError::Usage("drag <from> <to>")),
        ("craft" | "c", []) => Command::Craft,
        ("hints" | "h", []) => Command::Hints,
        ("stats", []) => Command::Stats,
        ("log", []) => Command::Log,
        ("reset", []) => Command::Reset,
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit" | "q", []) => Command::Quit,
        (
            "show" | "s" | "craft" | "c" | "hints" | "h" | "stats" | "log" | "reset" | "help"
            | "?" | "quit" | "exit" | "q",
            _,
        ) => return Err(ParseError::Usage("command takes no arguments")),
        (other, _) => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}
