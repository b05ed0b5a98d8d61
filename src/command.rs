//! Line commands for the headless client.
//!
//! One command per line, whitespace separated:
//!
//! | Command | Event |
//! |---------|-------|
//! | `login <name>` | submit a name |
//! | `down x y` / `move x y` / `up x y` | gesture start / move / end |
//! | `pen` / `eraser` | pick a tool |
//! | `radius n` | set pen radius |
//! | `quit` | tear the session down |

use canvas::input::Tool;

use crate::events::UiEvent;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parse one input line.
///
/// # Errors
///
/// Returns [`CommandError`] for blank lines, unknown commands, and missing or
/// non-numeric arguments.
pub fn parse_command(line: &str) -> Result<UiEvent, CommandError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Err(CommandError::Empty);
    };

    match command {
        "login" => Ok(UiEvent::SubmitName(words.collect::<Vec<_>>().join(" "))),
        "down" => xy(words, "down <x> <y>").map(|(x, y)| UiEvent::GestureStart { x, y }),
        "move" => xy(words, "move <x> <y>").map(|(x, y)| UiEvent::GestureMove { x, y }),
        "up" => xy(words, "up <x> <y>").map(|(x, y)| UiEvent::GestureEnd { x, y }),
        "pen" => Ok(UiEvent::Tool(Tool::Pen)),
        "eraser" => Ok(UiEvent::Tool(Tool::Eraser)),
        "radius" => number(words.next(), "radius <n>").map(UiEvent::PenRadius),
        "quit" | "exit" => Ok(UiEvent::Teardown),
        other => Err(CommandError::Unknown(other.to_owned())),
    }
}

fn xy<'a>(mut words: impl Iterator<Item = &'a str>, usage: &'static str) -> Result<(i32, i32), CommandError> {
    let x = number(words.next(), usage)?;
    let y = number(words.next(), usage)?;
    Ok((x, y))
}

fn number<T: std::str::FromStr>(word: Option<&str>, usage: &'static str) -> Result<T, CommandError> {
    word.and_then(|w| w.parse().ok()).ok_or(CommandError::Usage(usage))
}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
