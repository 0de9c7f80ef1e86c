//! Slash command parsing.
//!
//! ```text
//! /create [<name> [auto|manual]]
//! /join [<name>] <room>
//! /start
//! /draw
//! /mark <row> <col>        1-based
//! /claim <code|label|1-6>
//! /quit
//! ```
//!
//! A left-out name parses as empty; the [`crate::App`] substitutes its
//! default name, if any.

use tambola_core::CellPos;
use tambola_proto::{ClaimKind, GameMode};

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a room.
    Create {
        /// Display name, empty when left out.
        name: String,
        /// Marking mode, AUTO unless given.
        mode: GameMode,
    },
    /// Join a room.
    Join {
        /// Display name, empty when left out.
        name: String,
        /// Room code.
        room_id: String,
    },
    /// Start the game.
    Start,
    /// Draw a number.
    Draw,
    /// Mark a ticket cell.
    Mark {
        /// Zero-based cell.
        pos: CellPos,
    },
    /// Claim a pattern.
    Claim {
        /// Pattern.
        claim: ClaimKind,
    },
    /// Exit.
    Quit,
    /// Not a known command.
    Unknown {
        /// Raw input.
        input: String,
    },
    /// Known command with bad arguments.
    InvalidArgs {
        /// Command name.
        command: &'static str,
        /// What is wrong.
        error: String,
    },
}

/// Parse one line of input.
pub fn parse(line: &str) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Unknown { input: line.to_string() };
    };

    let parts: Vec<&str> = rest.split_whitespace().collect();
    let args = parts.get(1..).unwrap_or_default();

    match parts.first().copied().unwrap_or("") {
        "create" => parse_create(args),
        "join" => match args {
            [room_id] => Command::Join { name: String::new(), room_id: (*room_id).to_string() },
            [name, room_id] => {
                Command::Join { name: (*name).to_string(), room_id: (*room_id).to_string() }
            },
            _ => invalid("join", "usage: /join [<name>] <room>"),
        },
        "start" => Command::Start,
        "draw" => Command::Draw,
        "mark" => parse_mark(args),
        "claim" => parse_claim(args),
        "quit" | "q" => Command::Quit,
        _ => Command::Unknown { input: line.to_string() },
    }
}

fn parse_create(args: &[&str]) -> Command {
    let (name, mode) = match args {
        [] => (&"", GameMode::Auto),
        [name] => (name, GameMode::Auto),
        [name, mode] => match mode.to_ascii_lowercase().as_str() {
            "auto" => (name, GameMode::Auto),
            "manual" => (name, GameMode::Manual),
            other => return invalid("create", format!("unknown mode '{other}'")),
        },
        _ => return invalid("create", "usage: /create [<name> [auto|manual]]"),
    };
    Command::Create { name: (*name).to_string(), mode }
}

fn parse_mark(args: &[&str]) -> Command {
    let [row, col] = args else {
        return invalid("mark", "usage: /mark <row> <col>");
    };
    match (row.parse::<usize>(), col.parse::<usize>()) {
        (Ok(row), Ok(col)) if row >= 1 && col >= 1 => {
            Command::Mark { pos: CellPos::new(row - 1, col - 1) }
        },
        _ => invalid("mark", "row and column start at 1"),
    }
}

fn parse_claim(args: &[&str]) -> Command {
    if args.is_empty() {
        return invalid("claim", "usage: /claim <code|label|1-6>");
    }
    let text = args.join(" ");

    if let Ok(index) = text.parse::<usize>() {
        return match index.checked_sub(1).and_then(|i| ClaimKind::ALL.get(i)) {
            Some(claim) => Command::Claim { claim: *claim },
            None => invalid("claim", "number must be 1-6"),
        };
    }
    match text.parse::<ClaimKind>() {
        Ok(claim) => Command::Claim { claim },
        Err(e) => invalid("claim", e.to_string()),
    }
}

fn invalid(command: &'static str, error: impl Into<String>) -> Command {
    Command::InvalidArgs { command, error: error.into() }
}
