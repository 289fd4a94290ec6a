//! Integration tests for the morris engine
//!
//! Tests the full stack: board topology, rules engine, AI tiers and the
//! interactive session facade

use morris_core::ai::apply_compound_to;
use morris_core::{
    AlphaBetaAI, Difficulty, GameEvent, GameSession, GameState, Heuristics, Move, Phase, Player,
};
use std::time::Instant;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Fill the board without closing a mill: player one takes the even
/// positions, player two the odd ones. No mill line is all-even or
/// all-odd, so this reaches the movement phase cleanly.
fn play_full_placement(state: &mut GameState) {
    for i in 0..9u8 {
        state.place(2 * i).unwrap();
        state.place(2 * i + 1).unwrap();
    }
}

// ============================================================================
// RULES ENGINE TESTS
// ============================================================================

#[test]
fn test_full_placement_reaches_movement() {
    let mut state = GameState::new();
    assert_eq!(state.phase(), Phase::Placement);

    play_full_placement(&mut state);

    assert_eq!(state.phase(), Phase::Movement);
    assert_eq!(state.pieces_remaining(Player::One), 0);
    assert_eq!(state.pieces_remaining(Player::Two), 0);
    assert_eq!(state.pieces_on_board(Player::One), 9);
    assert_eq!(state.pieces_on_board(Player::Two), 9);
    assert!(!state.legal_moves().is_empty());
}

#[test]
fn test_mill_capture_flow_through_public_api() {
    let mut state = GameState::new();
    // P1 builds toward {0,1,2} while P2 scatters
    for mv in [
        Move::Place(0),
        Move::Place(23),
        Move::Place(1),
        Move::Place(15),
    ] {
        state = state.apply(mv).unwrap();
    }

    state = state.apply(Move::Place(2)).unwrap();
    let removable = state.pending_capture().expect("mill should pend a capture");
    assert_eq!(removable, &[15, 23]);

    state = state.apply(Move::Capture(15)).unwrap();
    assert!(state.pending_capture().is_none());
    assert_eq!(state.pieces_on_board(Player::Two), 1);
    assert_eq!(state.current_player(), Player::Two);
}

#[test]
fn test_apply_leaves_original_untouched() {
    let state = GameState::new();
    let snapshot = state.clone();
    let _ = state.apply(Move::Place(4)).unwrap();
    assert_eq!(state, snapshot);
}

// ============================================================================
// AI TESTS
// ============================================================================

#[test]
fn test_every_tier_completes_a_game() {
    for (i, difficulty) in [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ]
    .into_iter()
    .enumerate()
    {
        let mut ai = AlphaBetaAI::with_seed(difficulty, Heuristics::default(), i as u64 + 1);
        let (final_state, history) = ai.play_game(GameState::new(), 300);

        assert!(!history.is_empty(), "{} made no moves", difficulty);
        assert!(
            final_state.is_game_over() || history.len() == 300,
            "{} stalled mid-game",
            difficulty
        );
    }
}

#[test]
fn test_self_play_moves_stay_legal() {
    // Replay Medium self-play move by move through the rules engine
    let mut ai = AlphaBetaAI::with_seed(Difficulty::Medium, Heuristics::default(), 17);
    let (final_state, history) = ai.play_game(GameState::new(), 300);

    let mut replayed = GameState::new();
    for &compound in &history {
        replayed = apply_compound_to(&replayed, compound).expect("recorded move must be legal");
    }
    assert_eq!(replayed, final_state);
}

#[test]
fn test_expert_beats_easy_over_a_short_series() {
    let mut expert_points = 0;
    let mut easy_points = 0;

    for game in 0..4u64 {
        let expert_is_one = game % 2 == 0;
        let mut expert = AlphaBetaAI::with_seed(Difficulty::Expert, Heuristics::default(), game);
        let mut easy =
            AlphaBetaAI::with_seed(Difficulty::Easy, Heuristics::default(), game + 100);

        let mut state = GameState::new();
        let mut plies = 0;
        while !state.is_game_over() && plies < 300 {
            let on_turn_is_expert = (state.current_player() == Player::One) == expert_is_one;
            let ai = if on_turn_is_expert { &mut expert } else { &mut easy };
            let Some(compound) = ai.choose_move(&state) else {
                break;
            };
            state = apply_compound_to(&state, compound).unwrap();
            plies += 1;
        }

        match state.winner() {
            Some(winner) => {
                if (winner == Player::One) == expert_is_one {
                    expert_points += 2;
                } else {
                    easy_points += 2;
                }
            }
            None => {
                expert_points += 1;
                easy_points += 1;
            }
        }
    }

    assert!(
        expert_points >= easy_points,
        "expert {} vs easy {}",
        expert_points,
        easy_points
    );
}

#[test]
fn test_search_performance() {
    let state = GameState::new();

    for difficulty in [Difficulty::Medium, Difficulty::Expert] {
        let start = Instant::now();
        let mut ai = AlphaBetaAI::with_seed(difficulty, Heuristics::default(), 1);
        let mv = ai.choose_move(&state);
        let elapsed = start.elapsed();
        println!("{}: {:?} -> {:?}", difficulty, elapsed, mv);
        assert!(mv.is_some());
        assert!(elapsed.as_millis() < 30000, "{} took too long", difficulty);
    }
}

// ============================================================================
// SESSION TESTS
// ============================================================================

#[test]
fn test_session_human_vs_ai_game() {
    let mut session = GameSession::with_seed(Difficulty::Easy, 21);
    let mut guard = 0;

    while !session.state().is_game_over() && guard < 400 {
        if session.state().current_player() == Player::One {
            // The "human" plays the engine's first suggestion
            let Some(mv) = session.state().legal_moves().into_iter().next() else {
                break;
            };
            match mv {
                Move::Place(p) => {
                    session.click(p).unwrap();
                }
                Move::Shift { from, to } => {
                    session.click(from).unwrap();
                    session.click(to).unwrap();
                }
                Move::Capture(p) => {
                    session.capture(p).unwrap();
                }
                Move::SkipCapture => {
                    session.skip_capture().unwrap();
                }
                Move::Select(_) => unreachable!("generator never emits bare selections"),
            }
        } else if session.ai_turn().unwrap().is_empty() {
            break;
        }
        guard += 1;
    }

    assert!(guard > 0);
    if session.state().is_game_over() {
        assert!(session.state().winner().is_some());
    }
}

#[test]
fn test_session_reports_game_over_event() {
    // Drive an AI vs AI session and confirm the terminal event fires once
    let mut session = GameSession::with_seed(Difficulty::Medium, 3);
    let mut over_events = 0;

    for _ in 0..300 {
        if session.state().is_game_over() {
            break;
        }
        let events = session.ai_turn().unwrap();
        if events.is_empty() {
            break;
        }
        over_events += events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
    }

    if session.state().is_game_over() {
        assert_eq!(over_events, 1);
        assert!(session.state().winner().is_some());
    } else {
        assert_eq!(over_events, 0);
    }
}
