use std::num::ParseIntError;

use minegrid_core::{Coord2, Difficulty, GameConfig, InputEvent};
use thiserror::Error;

pub(crate) const HELP: &str = "\
commands:
  open X Y       open the square at column X, row Y (also: o)
  flag X Y       toggle the flag at column X, row Y (also: f)
  new [PRESET]   start over, PRESET is beginner, intermediate or expert
  new W H M      start a W x H board with M mines
  pause          stop the timer and hide the board
  resume         continue a paused game
  show           draw the board again
  help           show this text
  quit           leave";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Input(InputEvent),
    Show,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq)]
pub(crate) enum CommandError {
    #[error("Unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("`{0}` expects {1} arguments")]
    Arity(&'static str, &'static str),
    #[error("Invalid number: {0}")]
    Number(#[from] ParseIntError),
    #[error("Unknown preset `{0}`")]
    Preset(String),
}

/// Parses one input line, `None` for blank lines. A bare `new` restarts with `current`.
pub(crate) fn parse(line: &str, current: GameConfig) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match name.to_ascii_lowercase().as_str() {
        "open" | "o" => Command::Input(InputEvent::Open(coords("open", &args)?)),
        "flag" | "f" => Command::Input(InputEvent::ToggleFlag(coords("flag", &args)?)),
        "new" | "n" => Command::Input(InputEvent::NewGame(new_game(&args, current)?)),
        "pause" | "p" => Command::Input(InputEvent::Pause),
        "resume" | "r" => Command::Input(InputEvent::Resume),
        "show" | "s" => Command::Show,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(name.to_owned())),
    };
    Ok(Some(command))
}

fn coords(name: &'static str, args: &[&str]) -> Result<Coord2, CommandError> {
    match args {
        [x, y] => Ok((x.parse()?, y.parse()?)),
        _ => Err(CommandError::Arity(name, "2")),
    }
}

fn new_game(args: &[&str], current: GameConfig) -> Result<GameConfig, CommandError> {
    // the engine validates the config, so no checks here
    match args {
        [] => Ok(current),
        [preset] => preset
            .parse::<Difficulty>()
            .map(Difficulty::config)
            .map_err(|_| CommandError::Preset((*preset).to_owned())),
        [width, height, mines] => Ok(GameConfig::new_unchecked(
            (width.parse()?, height.parse()?),
            mines.parse()?,
        )),
        _ => Err(CommandError::Arity("new", "0, 1 or 3")),
    }
}
