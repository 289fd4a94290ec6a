//! Play command - interactive game against the AI
//!
//! The human is always player one (X) and moves first. Input is a
//! position number; during a capture the number names the piece to
//! remove. `skip` resolves a mill with nothing removable, `board`
//! reprints the position map, `quit` resigns.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Args;

use morris_core::{Difficulty, GameEvent, GameSession, GameState, Phase, Player};

#[derive(Args)]
pub struct PlayArgs {
    /// AI difficulty tier
    #[arg(long, default_value = "medium")]
    pub difficulty: Difficulty,
}

const POSITION_MAP: &str = "\
  0-----------1-----------2
  |           |           |
  |   3-------4-------5   |
  |   |       |       |   |
  |   |   6---7---8   |   |
  9--10--11      12--13--14
  |   |  15--16--17   |   |
  |   |       |       |   |
  |  18------19------20   |
  |           |           |
 21----------22----------23";

pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let mut session = match seed {
        Some(s) => GameSession::with_seed(args.difficulty, s),
        None => GameSession::new(args.difficulty),
    };

    println!("Nine men's morris - you are X, the AI ({}) is O", args.difficulty);
    println!("Positions:\n{}\n", POSITION_MAP);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("{}", render_board(session.state()));
        print_status(session.state());

        if session.state().is_game_over() {
            break;
        }

        if session.state().current_player() == Player::One {
            print!("> ");
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                break;
            };
            if !human_turn(&mut session, line?.trim())? {
                println!("Resigned.");
                break;
            }
        } else {
            let events = session.ai_turn()?;
            if events.is_empty() {
                break;
            }
            for event in &events {
                println!("{}", describe_event(event));
            }
        }
    }

    Ok(())
}

/// Handle one line of input. Returns false on quit.
fn human_turn(session: &mut GameSession, input: &str) -> Result<bool> {
    match input {
        "quit" | "q" => return Ok(false),
        "board" | "help" => {
            println!("{}", POSITION_MAP);
            return Ok(true);
        }
        "skip" => match session.skip_capture() {
            Ok(events) => print_events(&events),
            Err(err) => println!("{}", err),
        },
        other => match other.parse::<u8>() {
            Ok(pos) => {
                let result = if session.state().pending_capture().is_some() {
                    session.capture(pos)
                } else {
                    session.click(pos)
                };
                match result {
                    Ok(events) => print_events(&events),
                    Err(err) => println!("{}", err),
                }
            }
            Err(_) => println!("enter a position number, 'skip', 'board' or 'quit'"),
        },
    }
    Ok(true)
}

fn print_events(events: &[GameEvent]) {
    for event in events {
        println!("{}", describe_event(event));
    }
}

fn print_status(state: &GameState) {
    if state.is_game_over() {
        match state.winner() {
            Some(Player::One) => println!("You win!"),
            Some(Player::Two) => println!("The AI wins."),
            None => println!("Game over."),
        }
        return;
    }

    if let Some(removable) = state.pending_capture() {
        if removable.is_empty() {
            println!("Mill! Nothing can be removed; enter 'skip'.");
        } else {
            println!("Mill! Remove an opponent piece: {:?}", removable);
        }
        return;
    }

    let phase = match state.phase() {
        Phase::Placement => "placement",
        Phase::Movement => "movement",
        Phase::Flying => "flying",
    };
    println!(
        "{} to move ({}; in hand X:{} O:{})",
        state.current_player(),
        phase,
        state.pieces_remaining(Player::One),
        state.pieces_remaining(Player::Two),
    );
}

fn describe_event(event: &GameEvent) -> String {
    match event {
        GameEvent::PiecePlaced { player, pos } => format!("{} places at {}", player, pos),
        GameEvent::PieceSelected { pos } => format!("selected {}", pos),
        GameEvent::PieceDeselected { pos } => format!("deselected {}", pos),
        GameEvent::PieceMoved { player, from, to } => {
            format!("{} moves {} -> {}", player, from, to)
        }
        GameEvent::MillFormed { player, removable } => {
            format!("{} forms a mill (removable: {:?})", player, removable)
        }
        GameEvent::CaptureCompleted { player, pos } => {
            format!("{} removes the piece at {}", player, pos)
        }
        GameEvent::CaptureSkipped { player } => format!("{} skips the capture", player),
        GameEvent::PhaseChanged { phase } => format!("phase is now {:?}", phase),
        GameEvent::GameOver { winner } => format!("game over, {} wins", winner),
    }
}

fn render_board(state: &GameState) -> String {
    let g = |pos: u8| match state.cell(pos) {
        Some(Player::One) => 'X',
        Some(Player::Two) => 'O',
        None => '.',
    };
    format!(
        " {0}----------{1}----------{2}
 |          |          |
 |   {3}------{4}------{5}   |
 |   |      |      |   |
 |   |   {6}--{7}--{8}   |   |
 {9}---{10}---{11}     {12}---{13}---{14}
 |   |   {15}--{16}--{17}   |   |
 |   |      |      |   |
 |   {18}------{19}------{20}   |
 |          |          |
 {21}----------{22}----------{23}",
        g(0),
        g(1),
        g(2),
        g(3),
        g(4),
        g(5),
        g(6),
        g(7),
        g(8),
        g(9),
        g(10),
        g(11),
        g(12),
        g(13),
        g(14),
        g(15),
        g(16),
        g(17),
        g(18),
        g(19),
        g(20),
        g(21),
        g(22),
        g(23),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_board_marks_pieces() {
        let mut state = GameState::new();
        state.place(0).unwrap();
        state.place(23).unwrap();
        let rendered = render_board(&state);
        assert!(rendered.starts_with(" X"));
        assert!(rendered.ends_with("O"));
    }

    #[test]
    fn test_render_board_empty_has_no_pieces() {
        let rendered = render_board(&GameState::new());
        assert!(!rendered.contains('X'));
        assert!(!rendered.contains('O'));
    }

    #[test]
    fn test_describe_event() {
        let text = describe_event(&GameEvent::PiecePlaced {
            player: Player::Two,
            pos: 7,
        });
        assert!(text.contains('7'));
    }
}
