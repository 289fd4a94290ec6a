//! Position evaluation

use crate::board::{neighbors, BOARD_SIZE, MILLS};
use crate::game::{GameState, Player};
use serde::{Deserialize, Serialize};

/// Win value (strictly dominates any heuristic blend)
pub const WIN_VALUE: i32 = 100_000;

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Heuristics {
    /// Weight per on-board piece of difference
    pub piece_weight: i32,
    /// Weight per completed mill of difference
    pub mill_weight: i32,
    /// Weight per open mill line (two own pieces plus an empty cell)
    pub near_mill_weight: i32,
    /// Weight per reachable empty cell of difference
    pub mobility_weight: i32,
    /// Static value of holding each position
    pub position_weights: [i32; BOARD_SIZE],
}

impl Default for Heuristics {
    fn default() -> Self {
        // Cross points (degree four) dominate, square corners next,
        // three-way junctions last
        let mut weights = [0i32; BOARD_SIZE];
        for (pos, w) in weights.iter_mut().enumerate() {
            *w = match neighbors(pos as u8).len() {
                4 => 8,
                2 => 6,
                _ => 3,
            };
        }

        Self {
            piece_weight: 50,
            mill_weight: 100,
            near_mill_weight: 15,
            mobility_weight: 5,
            position_weights: weights,
        }
    }
}

/// Count mill lines where `player` holds two cells and the third is empty
fn open_mill_lines(state: &GameState, player: Player) -> i32 {
    let mut count = 0;
    for triple in &MILLS {
        let mut own = 0;
        let mut empty = 0;
        for &pos in triple {
            match state.cell(pos) {
                Some(p) if p == player => own += 1,
                None => empty += 1,
                Some(_) => {}
            }
        }
        if own == 2 && empty == 1 {
            count += 1;
        }
    }
    count
}

/// Evaluate a position from `perspective`'s point of view.
/// Positive favors `perspective`.
pub fn evaluate(state: &GameState, perspective: Player, heuristics: &Heuristics) -> i32 {
    if state.is_game_over() {
        return match state.winner() {
            Some(winner) if winner == perspective => WIN_VALUE,
            Some(_) => -WIN_VALUE,
            None => 0,
        };
    }

    let opponent = perspective.opponent();
    let mut score = 0i32;

    score += heuristics.piece_weight
        * (state.pieces_on_board(perspective) as i32 - state.pieces_on_board(opponent) as i32);

    score += heuristics.mill_weight
        * (state.mill_count(perspective) as i32 - state.mill_count(opponent) as i32);

    score += heuristics.near_mill_weight
        * (open_mill_lines(state, perspective) - open_mill_lines(state, opponent));

    for pos in 0..BOARD_SIZE as u8 {
        match state.cell(pos) {
            Some(p) if p == perspective => score += heuristics.position_weights[pos as usize],
            Some(_) => score -= heuristics.position_weights[pos as usize],
            None => {}
        }
    }

    score += heuristics.mobility_weight
        * (state.mobility(perspective) as i32 - state.mobility(opponent) as i32);

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Move;

    #[test]
    fn test_fresh_game_is_balanced() {
        let state = GameState::new();
        let h = Heuristics::default();
        assert_eq!(evaluate(&state, Player::One, &h), 0);
        assert_eq!(evaluate(&state, Player::Two, &h), 0);
    }

    #[test]
    fn test_evaluation_is_antisymmetric() {
        let mut state = GameState::new();
        state.place(4).unwrap();
        state.place(20).unwrap();
        state.place(10).unwrap();
        let h = Heuristics::default();
        assert_eq!(
            evaluate(&state, Player::One, &h),
            -evaluate(&state, Player::Two, &h)
        );
    }

    #[test]
    fn test_material_advantage_counts() {
        let mut state = GameState::new();
        state.place(0).unwrap();
        state.place(15).unwrap();
        state.place(2).unwrap();
        // P1 now has two pieces to P2's one
        let h = Heuristics::default();
        assert!(evaluate(&state, Player::One, &h) > 0);
    }

    #[test]
    fn test_position_weight_ordering() {
        let h = Heuristics::default();
        // Cross points beat corners beat junctions
        assert!(h.position_weights[4] > h.position_weights[0]);
        assert!(h.position_weights[0] > h.position_weights[1]);
        assert_eq!(h.position_weights[4], h.position_weights[19]);
    }

    #[test]
    fn test_terminal_dominates_heuristics() {
        let mut state = GameState::new();
        state.place(0).unwrap();
        let heuristic_bound = evaluate(&state, Player::One, &Heuristics::default()).abs();
        assert!(WIN_VALUE > heuristic_bound * 100);
    }

    #[test]
    fn test_win_returns_win_value() {
        // Drive a quick engineered finish: P1 mills and captures P2 to two
        let mut state = GameState::new();
        for mv in [
            Move::Place(0),
            Move::Place(15),
            Move::Place(1),
            Move::Place(16),
        ] {
            state = state.apply(mv).unwrap();
        }
        state.place(2).unwrap();
        state.capture(15).unwrap();
        // Not over yet (placement pieces remain); just confirm sign logic
        assert!(!state.is_game_over());

        let h = Heuristics::default();
        assert!(evaluate(&state, Player::One, &h) > 0);
    }

    #[test]
    fn test_open_mill_lines() {
        let mut state = GameState::new();
        state.place(0).unwrap(); // P1
        state.place(15).unwrap(); // P2
        state.place(1).unwrap(); // P1: {0,1,2} now open
        assert_eq!(open_mill_lines(&state, Player::One), 1);
        assert_eq!(open_mill_lines(&state, Player::Two), 0);
    }
}
