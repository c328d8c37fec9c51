use doubler_core::{
    GameError, GameState, MoveOutcome, Phase, PhaseTransition, SessionEvent, Statistics,
};

pub const PROMPT: &str = "> ";

pub const HELP: &str = "\
Move with w/a/s/d, h/j/k/l or up/down/left/right.
  u        undo the last move (costs points)
  r        start a new game
  reset    erase saved settings and statistics, then start a new game
  stats    show lifetime statistics
  q        quit";

/// Score line, the grid, and a reminder when the game cannot go on.
pub fn board(state: &GameState) -> String {
    let cells: Vec<Vec<String>> = state
        .grid
        .to_rows()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|value| match value {
                    0 => ".".to_owned(),
                    value => value.to_string(),
                })
                .collect()
        })
        .collect();
    let width = cells.iter().flatten().map(String::len).max().unwrap_or(1);

    let mut lines = vec![format!(
        "Score: {}  Best: {}",
        state.score, state.best_score
    )];
    lines.extend(cells.iter().map(|row| {
        row.iter()
            .map(|cell| format!("{cell:>width$}"))
            .collect::<Vec<_>>()
            .join(" ")
    }));
    match state.phase {
        Phase::Stuck => lines.push("Game over! u undoes the last move, r starts over.".to_owned()),
        Phase::Won if !state.grid.can_move() => {
            lines.push("You won! The board is full, r starts over.".to_owned())
        }
        Phase::Won => lines.push("You won! Playing on.".to_owned()),
        Phase::Playing => {}
    }
    lines.join("\n")
}

/// What to tell the player about an event, beyond the board itself.
pub fn event_message(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::Moved(report) => match report.outcome {
            MoveOutcome::NoMove => Some("Nothing moved.".to_owned()),
            MoveOutcome::Undone => Some(undo_message(report.penalty)),
            MoveOutcome::Moved => report.transition.and_then(transition_message),
        },
        SessionEvent::Undone(report) if report.success => Some(undo_message(report.penalty)),
        SessionEvent::Undone(_) => Some(GameError::NoUndoAvailable.to_string()),
        SessionEvent::Restarted(_) => Some("New game.".to_owned()),
    }
}

fn undo_message(penalty: u32) -> String {
    format!("Undid the last move, -{penalty} points.")
}

fn transition_message(transition: PhaseTransition) -> Option<String> {
    match transition.to {
        Phase::Won => Some("You win!".to_owned()),
        Phase::Stuck => Some("Game over!".to_owned()),
        Phase::Playing => None,
    }
}

pub fn statistics(statistics: &Statistics) -> String {
    format!(
        "Games played: {}\nWins: {}\nMoves: {}\nUndos: {}\nHighest tile: {}",
        statistics.games_played,
        statistics.wins,
        statistics.moves_made,
        statistics.undo_count,
        statistics.highest_tile
    )
}
