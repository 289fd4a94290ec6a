//! Alpha-beta computer opponent

use crate::eval::{evaluate, Heuristics};
use crate::game::{GameState, Move, Player, RuleError};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Root-level score perturbation span for the randomized tiers
const NOISE_SPAN: i32 = 60;

/// Move-ordering bonus for a move that closes a mill
const ORDER_MILL_BONUS: i32 = 1_000;

/// Move-ordering bonus for a move that blocks an opponent mill
const ORDER_BLOCK_BONUS: i32 = 400;

// ============================================================================
// DIFFICULTY
// ============================================================================

/// Difficulty tier, lowest to highest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    /// Search parameters for this tier: depth rises, randomness falls
    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                depth: 1,
                blunder_chance: 0.35,
                top_k: 3,
            },
            Difficulty::Medium => DifficultyProfile {
                depth: 2,
                blunder_chance: 0.15,
                top_k: 2,
            },
            Difficulty::Hard => DifficultyProfile {
                depth: 3,
                blunder_chance: 0.0,
                top_k: 1,
            },
            Difficulty::Expert => DifficultyProfile {
                depth: 4,
                blunder_chance: 0.0,
                top_k: 1,
            },
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        };
        write!(f, "{}", name)
    }
}

/// Search configuration as plain data
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Alpha-beta depth bound in compound plies
    pub depth: u32,
    /// Probability of perturbing a candidate's root score
    pub blunder_chance: f64,
    /// Pick uniformly among this many top candidates
    pub top_k: usize,
}

impl DifficultyProfile {
    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let profile = serde_json::from_str(&content)?;
        Ok(profile)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ============================================================================
// COMPOUND MOVES
// ============================================================================

/// A placement or relocation together with the capture (or skip) it
/// triggers, treated as one search ply
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundMove {
    pub base: Move,
    pub capture: Option<Move>,
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Alpha-beta AI player
pub struct AlphaBetaAI {
    pub profile: DifficultyProfile,
    pub heuristics: Heuristics,
    rng: ChaCha8Rng,
}

impl AlphaBetaAI {
    pub fn new(difficulty: Difficulty, heuristics: Heuristics) -> Self {
        Self {
            profile: difficulty.profile(),
            heuristics,
            rng: ChaCha8Rng::seed_from_u64(42),
        }
    }

    pub fn with_seed(difficulty: Difficulty, heuristics: Heuristics, seed: u64) -> Self {
        Self {
            profile: difficulty.profile(),
            heuristics,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Build from an explicit profile, e.g. one loaded from JSON
    pub fn with_profile(profile: DifficultyProfile, heuristics: Heuristics, seed: u64) -> Self {
        Self {
            profile,
            heuristics,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Choose the best compound move for the player on turn.
    /// Works purely on snapshots: the caller's state is never touched.
    pub fn choose_move(&mut self, state: &GameState) -> Option<CompoundMove> {
        if state.is_game_over() {
            return None;
        }

        // A dangling capture is resolved as its own compound move
        if state.pending_capture().is_some() {
            let (_, capture) = self.resolve_capture(state)?;
            return Some(CompoundMove {
                base: capture,
                capture: None,
            });
        }

        let me = state.current_player();
        let mut moves = state.legal_moves();
        if moves.is_empty() {
            return None;
        }
        if moves.len() == 1 {
            return self.expand_compound(state, moves[0]);
        }

        moves.sort_by_key(|mv| std::cmp::Reverse(self.move_order_score(state, *mv)));

        let depth = self.profile.depth;
        let mut scored: Vec<(i32, usize, CompoundMove)> = Vec::with_capacity(moves.len());

        for (index, &mv) in moves.iter().enumerate() {
            let Some((child, compound)) = self.apply_compound(state, mv) else {
                continue;
            };
            let mut score = self.minimax(&child, depth.saturating_sub(1), i32::MIN, i32::MAX, me);

            // Lower tiers misjudge some candidates on purpose
            if self.profile.blunder_chance > 0.0
                && self.rng.gen_bool(self.profile.blunder_chance)
            {
                score += self.rng.gen_range(-NOISE_SPAN..=NOISE_SPAN);
            }

            scored.push((score, index, compound));
        }

        if scored.is_empty() {
            return None;
        }

        // Best first; original generation order breaks ties
        scored.sort_by_key(|&(score, index, _)| (std::cmp::Reverse(score), index));

        let k = self.profile.top_k.clamp(1, scored.len());
        let pick = if k == 1 { 0 } else { self.rng.gen_range(0..k) };

        tracing::debug!(
            candidates = scored.len(),
            score = scored[pick].0,
            "search complete"
        );

        Some(scored[pick].2)
    }

    /// Play a complete game against itself, returning the final state and
    /// the compound moves made
    pub fn play_game(
        &mut self,
        initial: GameState,
        max_plies: usize,
    ) -> (GameState, Vec<CompoundMove>) {
        let mut state = initial;
        let mut history = Vec::new();

        while !state.is_game_over() && history.len() < max_plies {
            let Some(compound) = self.choose_move(&state) else {
                break;
            };
            match apply_compound_to(&state, compound) {
                Ok(next) => {
                    history.push(compound);
                    state = next;
                }
                Err(err) => {
                    // The AI only draws from legal_moves; this is an
                    // engine/generator inconsistency
                    tracing::error!(%err, ?compound, "search produced an illegal move");
                    debug_assert!(false, "search produced an illegal move: {}", err);
                    break;
                }
            }
        }

        (state, history)
    }

    // ========================================================================
    // SEARCH
    // ========================================================================

    fn minimax(
        &mut self,
        state: &GameState,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        me: Player,
    ) -> i32 {
        if depth == 0 || state.is_game_over() {
            return evaluate(state, me, &self.heuristics);
        }

        let mut moves = state.legal_moves();
        if moves.is_empty() {
            return evaluate(state, me, &self.heuristics);
        }
        moves.sort_by_key(|mv| std::cmp::Reverse(self.move_order_score(state, *mv)));

        let maximizing = state.current_player() == me;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for mv in moves {
            let Some((child, _)) = self.apply_compound(state, mv) else {
                continue;
            };
            let score = self.minimax(&child, depth - 1, alpha, beta, me);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }

        best
    }

    /// Apply a base move to a fresh snapshot and resolve any capture it
    /// triggers, greedily maximizing the mover's resulting evaluation
    fn apply_compound(&self, state: &GameState, base: Move) -> Option<(GameState, CompoundMove)> {
        let after_base = match state.apply(base) {
            Ok(next) => next,
            Err(err) => {
                tracing::error!(%err, ?base, "generated move rejected by the engine");
                debug_assert!(false, "generated move rejected: {}", err);
                return None;
            }
        };

        if after_base.pending_capture().is_none() {
            return Some((
                after_base,
                CompoundMove {
                    base,
                    capture: None,
                },
            ));
        }

        let (resolved, capture) = self.resolve_capture(&after_base)?;
        Some((
            resolved,
            CompoundMove {
                base,
                capture: Some(capture),
            },
        ))
    }

    /// Pick the capture (or skip) that leaves the mover best off
    fn resolve_capture(&self, state: &GameState) -> Option<(GameState, Move)> {
        let mover = state.current_player();
        let mut best: Option<(i32, GameState, Move)> = None;

        for mv in state.legal_moves() {
            let Ok(child) = state.apply(mv) else {
                continue;
            };
            let score = evaluate(&child, mover, &self.heuristics);
            if best.as_ref().map_or(true, |(s, _, _)| score > *s) {
                best = Some((score, child, mv));
            }
        }

        best.map(|(_, child, mv)| (child, mv))
    }

    // ========================================================================
    // MOVE ORDERING
    // ========================================================================

    /// Score a move for ordering (higher = search first): immediate mills,
    /// then blocks, then strong positions
    fn move_order_score(&self, state: &GameState, mv: Move) -> i32 {
        let mover = state.current_player();
        let opponent = mover.opponent();

        match mv {
            Move::Place(pos) => {
                let mut score = self.heuristics.position_weights[pos as usize];
                if state.would_close_mill(None, pos, mover) {
                    score += ORDER_MILL_BONUS;
                }
                if state.would_close_mill(None, pos, opponent) {
                    score += ORDER_BLOCK_BONUS;
                }
                score
            }
            Move::Shift { from, to } => {
                let mut score = self.heuristics.position_weights[to as usize];
                if state.would_close_mill(Some(from), to, mover) {
                    score += ORDER_MILL_BONUS;
                }
                if state.would_close_mill(None, to, opponent) {
                    score += ORDER_BLOCK_BONUS;
                }
                score
            }
            Move::Capture(_) => ORDER_MILL_BONUS,
            Move::SkipCapture | Move::Select(_) => 0,
        }
    }

    /// Expand a single forced move into its compound form
    fn expand_compound(&self, state: &GameState, mv: Move) -> Option<CompoundMove> {
        self.apply_compound(state, mv).map(|(_, compound)| compound)
    }
}

/// Apply a compound move to a snapshot, returning the resulting state
pub fn apply_compound_to(
    state: &GameState,
    compound: CompoundMove,
) -> Result<GameState, RuleError> {
    let mut next = state.apply(compound.base)?;
    if let Some(capture) = compound.capture {
        next = next.apply(capture)?;
    }
    Ok(next)
}

// ============================================================================
// TESTS
// ============================================================================
