//! Integration tests for KINGROW
//!
//! Exercise the core crate through its public API together with the CLI
//! command modules, the way the binary drives them.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use kingrow_cli::analyze_cmd::{analyze, load_board};
use kingrow_cli::play_cmd::{build_config, PlayArgs};
use kingrow_cli::selfplay_cmd::{play_matches, SelfPlayArgs};
use kingrow_core::{
    evaluate, playable_squares, Board, Difficulty, MatchConfig, MatchController, MatchObserver,
    MatchStatus, Move, Phase, Piece, Player, SearchConfig, SearchEngine, Square, TurnOutcome,
    WIN_VALUE,
};

// ============================================================================
// FIXTURES
// ============================================================================

/// Random position with the promotion invariant respected: no man sits on
/// its own promotion row.
fn random_board(rng: &mut ChaCha8Rng) -> Board {
    let mut board = Board::empty();
    for sq in playable_squares() {
        let piece = match rng.gen_range(0..10) {
            0 | 1 => Some(Piece::man(Player::White)),
            2 | 3 => Some(Piece::man(Player::Black)),
            4 => Some(Piece::king(Player::White)),
            5 => Some(Piece::king(Player::Black)),
            _ => None,
        };
        let piece = piece.map(|p| {
            if !p.is_king() && sq.row == p.owner.promotion_row() {
                Piece::king(p.owner)
            } else {
                p
            }
        });
        board.set(sq, piece);
    }
    board
}

/// Unpruned minimax with the same terminal rules as the engine
fn full_width(board: &Board, depth: u32, maximizing: bool) -> i32 {
    if depth == 0 {
        return evaluate(board);
    }
    let player = if maximizing { Player::Black } else { Player::White };
    let moves = board.legal_moves(player);
    if moves.is_empty() {
        return if maximizing { -WIN_VALUE } else { WIN_VALUE };
    }
    let scores = moves
        .into_iter()
        .map(|mv| full_width(&board.apply_move(mv), depth - 1, !maximizing));
    if maximizing {
        scores.max().unwrap()
    } else {
        scores.min().unwrap()
    }
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("kingrow-{}-{}", std::process::id(), name))
}

#[derive(Clone, Default)]
struct Recorder {
    rounds: Arc<Mutex<Vec<(Player, u8)>>>,
    matches: Arc<Mutex<Vec<Player>>>,
}

impl MatchObserver for Recorder {
    fn on_round_end(&mut self, winner: Player, loser_hearts_remaining: u8) {
        self.rounds.lock().unwrap().push((winner, loser_hearts_remaining));
    }

    fn on_match_end(&mut self, winner: Player) {
        self.matches.lock().unwrap().push(winner);
    }
}

// ============================================================================
// MOVE GENERATION PROPERTIES
// ============================================================================

#[test]
fn test_moves_stay_on_playable_squares() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    for _ in 0..200 {
        let board = random_board(&mut rng);
        for player in [Player::White, Player::Black] {
            for mv in board.legal_moves(player) {
                assert!(mv.to().is_valid() && mv.to().is_playable(), "{} on\n{}", mv, board);
                assert!(board.get(mv.to()).is_none());
                if let Some(victim) = mv.captured() {
                    let piece = board.get(victim).expect("capture over an empty square");
                    assert_eq!(piece.owner, player.opponent());
                }
            }
        }
    }
}

#[test]
fn test_apply_move_promotes_on_back_rank() {
    let mut rng = ChaCha8Rng::seed_from_u64(12);

    for _ in 0..200 {
        let board = random_board(&mut rng);
        for player in [Player::White, Player::Black] {
            for mv in board.legal_moves(player) {
                let after = board.apply_move(mv);
                let moved = after.get(mv.to()).expect("destination is occupied");
                assert_eq!(moved.owner, player);
                assert!(after.get(mv.from()).is_none());

                if mv.to().row == player.promotion_row() {
                    assert!(moved.is_king(), "{} should promote", mv);
                }
                if let Some(victim) = mv.captured() {
                    assert!(after.get(victim).is_none());
                    assert_eq!(
                        after.piece_count(player.opponent()),
                        board.piece_count(player.opponent()) - 1
                    );
                }
            }
        }
    }
}

#[test]
fn test_random_playout_keeps_pieces_on_dark_squares() {
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    let mut board = Board::new();
    let mut player = Player::White;

    for _ in 0..300 {
        let moves = board.legal_moves(player);
        if moves.is_empty() {
            break;
        }
        board = board.apply_move(moves[rng.gen_range(0..moves.len())]);
        player = player.opponent();

        for (sq, _) in board.pieces() {
            assert!(sq.is_playable());
        }
        assert!(board.piece_count(Player::White) <= 12);
        assert!(board.piece_count(Player::Black) <= 12);
    }
}

// ============================================================================
// SEARCH TESTS
// ============================================================================

#[test]
fn test_alpha_beta_matches_full_width_on_random_boards() {
    let mut rng = ChaCha8Rng::seed_from_u64(21);

    for _ in 0..25 {
        let board = random_board(&mut rng);
        for depth in 1..=3 {
            let mut engine =
                SearchEngine::new(SearchConfig::new(Difficulty::Hard).with_node_budget(None));
            let pruned = engine.minimax(&board, depth, true, i32::MIN, i32::MAX);
            assert_eq!(pruned, full_width(&board, depth, true), "depth {} on\n{}", depth, board);
        }
    }
}

#[test]
fn test_engines_always_return_legal_moves() {
    let mut rng = ChaCha8Rng::seed_from_u64(22);

    for difficulty in [Difficulty::Easy, Difficulty::Medium] {
        let mut engine = SearchEngine::with_seed(difficulty, 7);
        for _ in 0..20 {
            let board = random_board(&mut rng);
            for player in [Player::White, Player::Black] {
                let legal = board.legal_moves(player);
                match engine.choose_move(&board, player) {
                    Some(mv) => assert!(legal.contains(&mv)),
                    None => assert!(legal.is_empty()),
                }
            }
        }
    }
}

// ============================================================================
// MATCH CONTROLLER TESTS
// ============================================================================

#[test]
fn test_white_moving_into_stalemate_loses_round() {
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    let mut checked = 0;

    // White's (3,0)-(2,1) walks into a dead end between three Black men
    let mut dead_end = Board::empty();
    dead_end.set(Square::new(3, 0), Some(Piece::man(Player::White)));
    for (row, col) in [(1, 0), (1, 2), (0, 3)] {
        dead_end.set(Square::new(row, col), Some(Piece::man(Player::Black)));
    }

    let boards = std::iter::once(dead_end).chain((0..300).map(|_| random_board(&mut rng)));
    for board in boards {
        for mv in board.legal_moves(Player::White) {
            let after = board.apply_move(mv);
            let black_alive = after.piece_count(Player::Black) > 0 && after.has_moves(Player::Black);
            if !black_alive || after.has_moves(Player::White) {
                continue;
            }

            let mut config = MatchConfig::new(Difficulty::Easy).with_seed(1);
            config.auto_next_round = false;
            let mut controller = MatchController::from_position(config, board, Player::White);

            assert_eq!(
                controller.submit_human_move(mv),
                TurnOutcome::RoundWon { winner: Player::Black }
            );
            assert_eq!(controller.hearts(Player::White), 2);
            assert_eq!(controller.hearts(Player::Black), 3);
            checked += 1;
        }
    }

    assert!(checked > 0);
}

#[test]
fn test_lost_round_then_manual_next_round() {
    // Black's (4,1) x (5,2) leaves White only the stuck man on (1,0)
    let position = || {
        let mut board = Board::empty();
        board.set(Square::new(1, 0), Some(Piece::man(Player::White)));
        board.set(Square::new(0, 1), Some(Piece::man(Player::Black)));
        board.set(Square::new(5, 2), Some(Piece::man(Player::White)));
        board.set(Square::new(4, 1), Some(Piece::man(Player::Black)));
        board
    };

    let mut config = MatchConfig::new(Difficulty::Easy).with_hearts(2).with_seed(4);
    config.auto_next_round = false;
    let mut controller = MatchController::from_position(config, position(), Player::Black);
    let recorder = Recorder::default();
    controller.subscribe(Box::new(recorder.clone()));

    assert_eq!(controller.step(), TurnOutcome::RoundWon { winner: Player::Black });
    assert_eq!(controller.phase(), Phase::RoundOver);
    assert_eq!(controller.hearts(Player::White), 1);

    assert!(controller.next_round());
    assert_eq!(*controller.board(), Board::new());
    assert_eq!(controller.round_number(), 2);
    assert_eq!(controller.phase(), Phase::AwaitingHumanMove);

    assert_eq!(*recorder.rounds.lock().unwrap(), vec![(Player::Black, 1)]);
    assert!(recorder.matches.lock().unwrap().is_empty());
}

#[test]
fn test_full_match_between_engines() {
    let config = MatchConfig::new(Difficulty::Easy)
        .with_hearts(2)
        .with_seed(99)
        .with_ai_delay_ms(0);
    let mut controller = MatchController::new(config);
    let recorder = Recorder::default();
    controller.subscribe(Box::new(recorder.clone()));

    let mut white = SearchEngine::with_seed(Difficulty::Medium, 100);
    let mut plies = 0;

    while plies < 2000 && controller.phase() != Phase::MatchOver {
        if controller.plies_this_round() >= 300 {
            break;
        }
        let outcome = match controller.phase() {
            Phase::AwaitingHumanMove => {
                let mv: Move = white
                    .choose_move(controller.board(), Player::White)
                    .expect("white has a move while awaiting input");
                controller.submit_human_move(mv)
            }
            Phase::AiThinking => controller.step(),
            Phase::RoundOver | Phase::MatchOver => unreachable!("auto_next_round is on"),
        };
        assert_ne!(outcome, TurnOutcome::Ignored);
        plies += 1;
    }

    // The last heart count reported for each loser is the one it holds now
    let rounds = recorder.rounds.lock().unwrap().clone();
    for player in [Player::White, Player::Black] {
        if let Some((_, remaining)) = rounds.iter().rev().find(|(w, _)| w.opponent() == player) {
            assert_eq!(*remaining, controller.hearts(player));
        }
    }

    if let MatchStatus::MatchOver { winner } = controller.status() {
        assert_eq!(controller.hearts(winner.opponent()), 0);
        assert!(controller.hearts(winner) > 0);
        assert_eq!(*recorder.matches.lock().unwrap(), vec![winner]);
        // Further input is ignored once the match is over
        assert_eq!(controller.step(), TurnOutcome::Ignored);
    } else {
        assert!(recorder.matches.lock().unwrap().is_empty());
    }
}

// ============================================================================
// CLI COMMAND TESTS
// ============================================================================

#[test]
fn test_analyze_diagram_file() {
    let path = temp_path("capture.txt");
    let diagram = "\
........
........
........
........
...b....
..w.....
........
........
";
    std::fs::write(&path, diagram).unwrap();

    let board = load_board(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let analysis = analyze(&board, Player::White, Difficulty::Hard, 3);
    assert_eq!(analysis.scored_moves.len(), 2);

    let capture = Move::Capture {
        from: Square::new(5, 2),
        to: Square::new(3, 4),
        captured: Square::new(4, 3),
    };
    assert!(analysis.scored_moves.contains(&(capture, WIN_VALUE)));
    assert_eq!(analysis.best_move, Some(capture));
}

#[test]
fn test_analyze_rejects_bad_diagram() {
    let path = temp_path("bad.txt");
    std::fs::write(&path, "w.......\n").unwrap();

    let err = load_board(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(format!("{:#}", err).contains("expected 8 rows"));
}

#[test]
fn test_play_config_file_with_overrides() {
    let path = temp_path("match.json");
    MatchConfig::new(Difficulty::Easy)
        .with_hearts(5)
        .with_ai_delay_ms(250)
        .save(&path)
        .unwrap();

    let args = PlayArgs {
        difficulty: Some(Difficulty::Hard),
        hearts: None,
        delay_ms: None,
        config: Some(path.clone()),
    };
    let config = build_config(&args, Some(8)).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.search.difficulty, Difficulty::Hard);
    assert_eq!(config.starting_hearts, 5);
    assert_eq!(config.ai_delay_ms, 250);
    assert_eq!(config.search.seed, Some(8));
}

#[test]
fn test_selfplay_results_serialize() {
    let args = SelfPlayArgs {
        white: Difficulty::Easy,
        black: Difficulty::Easy,
        matches: 3,
        hearts: 1,
        max_plies: 120,
        json: true,
    };

    let results = play_matches(&args, 17, false).unwrap();
    assert_eq!(results.matches.len(), 3);
    assert_eq!(results.white_wins + results.black_wins + results.unfinished, 3);

    let json = serde_json::to_value(&results).unwrap();
    assert_eq!(json["matches"].as_array().unwrap().len(), 3);
    assert_eq!(json["black"], "easy");
}
