use doubler_core::{Command, Direction, Result};

/// One line of player input, decoded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    /// Wipe every saved record, then start over.
    Reset,
    Help,
    Stats,
    Quit,
}

/// Maps a line to an [`Input`]; blank lines give `None`.
///
/// Besides the direction names this takes the usual keyboard layouts:
/// `w/a/s/d` and `k/h/j/l`.
pub fn parse(line: &str) -> Result<Option<Input>> {
    let word = line.trim().to_ascii_lowercase();
    let input = match word.as_str() {
        "" => return Ok(None),
        "w" | "k" => Input::Command(Command::Move(Direction::Up)),
        "s" | "j" => Input::Command(Command::Move(Direction::Down)),
        "a" | "h" => Input::Command(Command::Move(Direction::Left)),
        "d" | "l" => Input::Command(Command::Move(Direction::Right)),
        "u" | "undo" => Input::Command(Command::Undo),
        "r" | "restart" => Input::Command(Command::Restart),
        "reset" => Input::Reset,
        "?" | "help" => Input::Help,
        "stats" => Input::Stats,
        "q" | "quit" | "exit" => Input::Quit,
        other => Input::Command(Command::Move(other.parse()?)),
    };
    Ok(Some(input))
}
