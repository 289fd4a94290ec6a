//! Interactive session facade
//!
//! Wraps a [`GameState`] behind the command surface a frontend consumes:
//! position clicks, capture choices, AI turns and reset. Each command
//! reports the notable events it caused so collaborators (rendering,
//! audio, scorekeeping) can react without reaching into the engine.

use crate::ai::{AlphaBetaAI, CompoundMove, Difficulty};
use crate::eval::Heuristics;
use crate::game::{GameState, Move, Phase, Player, RuleError};
use serde::{Deserialize, Serialize};

/// Something a collaborator may want to react to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PiecePlaced { player: Player, pos: u8 },
    PieceSelected { pos: u8 },
    PieceDeselected { pos: u8 },
    PieceMoved { player: Player, from: u8, to: u8 },
    MillFormed { player: Player, removable: Vec<u8> },
    CaptureCompleted { player: Player, pos: u8 },
    CaptureSkipped { player: Player },
    PhaseChanged { phase: Phase },
    GameOver { winner: Player },
}

/// A running game with an attached computer opponent
pub struct GameSession {
    state: GameState,
    ai: AlphaBetaAI,
    difficulty: Difficulty,
}

impl GameSession {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            state: GameState::new(),
            ai: AlphaBetaAI::new(difficulty, Heuristics::default()),
            difficulty,
        }
    }

    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            state: GameState::new(),
            ai: AlphaBetaAI::with_seed(difficulty, Heuristics::default(), seed),
            difficulty,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.ai = AlphaBetaAI::new(difficulty, Heuristics::default());
    }

    /// Start over with a fresh board
    pub fn reset(&mut self) {
        tracing::info!("new game");
        self.state = GameState::new();
    }

    /// Handle a position click: placement places, movement selects,
    /// deselects or moves depending on the current selection
    pub fn click(&mut self, pos: u8) -> Result<Vec<GameEvent>, RuleError> {
        match self.state.phase() {
            Phase::Placement => self.command(Move::Place(pos)),
            Phase::Movement | Phase::Flying => match self.state.selected() {
                None => self.command(Move::Select(pos)),
                Some(sel) if sel == pos => self.command(Move::Select(pos)),
                Some(sel) => self.command(Move::Shift { from: sel, to: pos }),
            },
        }
    }

    /// Remove an opponent piece after a mill
    pub fn capture(&mut self, pos: u8) -> Result<Vec<GameEvent>, RuleError> {
        self.command(Move::Capture(pos))
    }

    /// Resolve a mill with nothing removable
    pub fn skip_capture(&mut self) -> Result<Vec<GameEvent>, RuleError> {
        self.command(Move::SkipCapture)
    }

    /// Let the AI choose and apply its next compound move. Any scheduling
    /// of "thinking time" belongs to the caller, not the search.
    pub fn ai_turn(&mut self) -> Result<Vec<GameEvent>, RuleError> {
        if self.state.is_game_over() {
            return Err(RuleError::GameOver);
        }

        let Some(CompoundMove { base, capture }) = self.ai.choose_move(&self.state) else {
            tracing::warn!(player = %self.state.current_player(), "no move available");
            return Ok(vec![]);
        };

        let mut events = self.command(base)?;
        if let Some(capture_move) = capture {
            events.extend(self.command(capture_move)?);
        }
        Ok(events)
    }

    /// Apply one engine move and translate the state delta into events
    fn command(&mut self, mv: Move) -> Result<Vec<GameEvent>, RuleError> {
        let before = self.state.clone();
        let mover = before.current_player();

        match mv {
            Move::Place(pos) => self.state.place(pos)?,
            Move::Select(pos) => self.state.select(pos)?,
            Move::Shift { from, to } => self.state.shift(from, to)?,
            Move::Capture(pos) => self.state.capture(pos)?,
            Move::SkipCapture => self.state.skip_capture()?,
        }

        let mut events = Vec::new();
        match mv {
            Move::Place(pos) => events.push(GameEvent::PiecePlaced { player: mover, pos }),
            Move::Select(pos) => {
                if self.state.selected() == Some(pos) {
                    events.push(GameEvent::PieceSelected { pos });
                } else {
                    events.push(GameEvent::PieceDeselected { pos });
                }
            }
            Move::Shift { from, to } => {
                events.push(GameEvent::PieceMoved { player: mover, from, to })
            }
            Move::Capture(pos) => events.push(GameEvent::CaptureCompleted { player: mover, pos }),
            Move::SkipCapture => events.push(GameEvent::CaptureSkipped { player: mover }),
        }

        if before.pending_capture().is_none() {
            if let Some(removable) = self.state.pending_capture() {
                events.push(GameEvent::MillFormed {
                    player: mover,
                    removable: removable.to_vec(),
                });
            }
        }
        if self.state.phase() != before.phase() {
            events.push(GameEvent::PhaseChanged {
                phase: self.state.phase(),
            });
        }
        if self.state.is_game_over() && !before.is_game_over() {
            if let Some(winner) = self.state.winner() {
                events.push(GameEvent::GameOver { winner });
            }
        }

        Ok(events)
    }
}
