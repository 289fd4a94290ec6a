//! Match command - AI vs AI series between two contenders
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_contenders(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use morris_core::ai::apply_compound_to;
use morris_core::{AlphaBetaAI, Difficulty, DifficultyProfile, GameState, Heuristics, Player};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// First contender's difficulty tier
    #[arg(long, default_value = "hard")]
    pub first: Difficulty,

    /// Second contender's difficulty tier
    #[arg(long, default_value = "hard")]
    pub second: Difficulty,

    /// Override the first contender with a profile JSON file
    #[arg(long, value_name = "FILE")]
    pub first_profile: Option<PathBuf>,

    /// Override the second contender with a profile JSON file
    #[arg(long, value_name = "FILE")]
    pub second_profile: Option<PathBuf>,

    /// Number of games to play (will alternate colors)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Maximum plies per game before calling a draw
    #[arg(long, default_value = "300")]
    pub max_plies: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    /// Board-side winner, None on a ply-cutoff draw
    winner: Option<Player>,
    /// Which board side the first contender held
    first_played: Player,
    plies: usize,
}

impl GameRecord {
    fn first_won(&self) -> bool {
        self.winner == Some(self.first_played)
    }

    fn second_won(&self) -> bool {
        self.winner == Some(self.first_played.opponent())
    }
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    first_wins: usize,
    second_wins: usize,
    draws: usize,
    avg_plies: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// This function reads like a table of contents:
/// 1. Resolve both contenders' profiles
/// 2. Play the match (multiple games)
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let (first, second) = load_contenders(&args)?;

    tracing::info!(
        "Starting match: depth {} vs depth {} ({} games)",
        first.depth,
        second.depth,
        args.games
    );

    let results = play_match(&first, &second, &args, seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Resolve both contenders: a profile file wins over the tier flag
fn load_contenders(args: &MatchArgs) -> Result<(DifficultyProfile, DifficultyProfile)> {
    let first = match &args.first_profile {
        Some(path) => DifficultyProfile::load(path)
            .with_context(|| format!("Failed to load first profile: {}", path.display()))?,
        None => args.first.profile(),
    };

    let second = match &args.second_profile {
        Some(path) => DifficultyProfile::load(path)
            .with_context(|| format!("Failed to load second profile: {}", path.display()))?,
        None => args.second.profile(),
    };

    Ok((first, second))
}

/// Play all games in the match
fn play_match(
    first: &DifficultyProfile,
    second: &DifficultyProfile,
    args: &MatchArgs,
    seed: Option<u64>,
) -> Result<MatchResults> {
    let mut rng = create_rng(seed);
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        // Alternate colors for fairness
        let first_played = if game_num % 2 == 0 {
            Player::One
        } else {
            Player::Two
        };

        let record = play_single_game(
            first,
            second,
            first_played,
            game_num + 1,
            args.max_plies,
            &mut rng,
        )?;

        tracing::info!(
            "Game {}: {:?} ({} plies)",
            record.game_number,
            record.winner,
            record.plies
        );

        games.push(record);
    }

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play a single game between the two contenders
fn play_single_game(
    first: &DifficultyProfile,
    second: &DifficultyProfile,
    first_played: Player,
    game_number: usize,
    max_plies: usize,
    rng: &mut ChaCha8Rng,
) -> Result<GameRecord> {
    let (one, two) = if first_played == Player::One {
        (first, second)
    } else {
        (second, first)
    };
    let mut ai_one = AlphaBetaAI::with_profile(one.clone(), Heuristics::default(), rng.gen());
    let mut ai_two = AlphaBetaAI::with_profile(two.clone(), Heuristics::default(), rng.gen());

    let mut state = GameState::new();
    let mut plies = 0;

    while !state.is_game_over() && plies < max_plies {
        let ai = if state.current_player() == Player::One {
            &mut ai_one
        } else {
            &mut ai_two
        };
        let Some(compound) = ai.choose_move(&state) else {
            break;
        };
        state = apply_compound_to(&state, compound).context("search produced an illegal move")?;
        plies += 1;
    }

    Ok(GameRecord {
        game_number,
        winner: state.winner(),
        first_played,
        plies,
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let first_wins = games.iter().filter(|g| g.first_won()).count();
    let second_wins = games.iter().filter(|g| g.second_won()).count();
    let draws = games.len() - first_wins - second_wins;

    let total_plies: usize = games.iter().map(|g| g.plies).sum();
    let avg_plies = if games.is_empty() {
        0.0
    } else {
        total_plies as f32 / games.len() as f32
    };

    MatchResults {
        games,
        first_wins,
        second_wins,
        draws,
        avg_plies,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        winner: Option<String>,
        first_played: String,
        plies: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        first_wins: usize,
        second_wins: usize,
        draws: usize,
        avg_plies: f32,
        first_win_rate: f32,
        games: Vec<JsonGame>,
    }

    let total = results.games.len();
    let output = JsonOutput {
        total_games: total,
        first_wins: results.first_wins,
        second_wins: results.second_wins,
        draws: results.draws,
        avg_plies: results.avg_plies,
        first_win_rate: if total > 0 {
            results.first_wins as f32 / total as f32
        } else {
            0.0
        },
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                winner: g.winner.map(|w| w.to_string()),
                first_played: g.first_played.to_string(),
                plies: g.plies,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();
    let rate = |wins: usize| {
        if total > 0 {
            wins as f32 / total as f32 * 100.0
        } else {
            0.0
        }
    };

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!("First wins:  {} ({:.1}%)", results.first_wins, rate(results.first_wins));
    println!("Second wins: {} ({:.1}%)", results.second_wins, rate(results.second_wins));
    println!("Draws:       {} ({:.1}%)", results.draws, rate(results.draws));
    println!("Avg plies:   {:.1}", results.avg_plies);

    println!("\nGame details:");
    for game in &results.games {
        match game.winner {
            Some(winner) => println!(
                "  Game {}: {} wins in {} plies",
                game.game_number, winner, game.plies
            ),
            None => println!("  Game {}: draw at {} plies", game.game_number, game.plies),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics(vec![]);
        assert_eq!(results.first_wins, 0);
        assert_eq!(results.second_wins, 0);
        assert_eq!(results.draws, 0);
        assert_eq!(results.avg_plies, 0.0);
    }

    #[test]
    fn test_compute_match_statistics_attributes_by_side() {
        let games = vec![
            // First contender held One and One won
            GameRecord {
                game_number: 1,
                winner: Some(Player::One),
                first_played: Player::One,
                plies: 40,
            },
            // Colors swapped: One winning means the second contender won
            GameRecord {
                game_number: 2,
                winner: Some(Player::One),
                first_played: Player::Two,
                plies: 60,
            },
            GameRecord {
                game_number: 3,
                winner: None,
                first_played: Player::One,
                plies: 300,
            },
        ];

        let results = compute_match_statistics(games);
        assert_eq!(results.first_wins, 1);
        assert_eq!(results.second_wins, 1);
        assert_eq!(results.draws, 1);
        assert!((results.avg_plies - 400.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }

    #[test]
    fn test_play_single_game_easy() {
        let mut rng = create_rng(Some(7));
        let easy = Difficulty::Easy.profile();
        let record = play_single_game(&easy, &easy, Player::One, 1, 300, &mut rng).unwrap();
        assert!(record.plies > 0);
        assert!(record.plies <= 300);
    }
}
