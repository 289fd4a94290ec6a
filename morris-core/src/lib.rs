//! Morris Core - Nine men's morris engine and AI
//!
//! This crate provides the core game logic for morris:
//! - Board topology (24 positions, adjacency and mill lines)
//! - Game state, phases and move validation
//! - Mill detection and capture resolution
//! - Position evaluation with mobility heuristic
//! - Alpha-beta AI with tunable difficulty
//! - An interactive session facade for frontends

pub mod board;
pub mod game;
pub mod eval;
pub mod ai;
pub mod session;

// Re-exports for convenient access
pub use board::{BOARD_SIZE, FLYING_THRESHOLD, MILLS, NEIGHBORS, PIECES_PER_PLAYER};
pub use game::{GameState, Move, Phase, Player, RuleError};
pub use eval::{evaluate, Heuristics, WIN_VALUE};
pub use ai::{AlphaBetaAI, CompoundMove, Difficulty, DifficultyProfile};
pub use session::{GameEvent, GameSession};
