//! Terminal-state detection through the game controller.
//!
//! Covers every rule in the order `Game::status` applies them:
//! - Insufficient material
//! - Threefold repetition
//! - Fifty-move rule
//! - Checkmate and stalemate

use chess_core::{Color, DrawReason, Game, GameStatus};

fn status(fen: &str) -> GameStatus {
    Game::from_fen(fen).unwrap().status()
}

fn play(game: &mut Game, moves: &[&str]) {
    for txt in moves {
        game.do_str_move(txt)
            .unwrap_or_else(|e| panic!("{txt} rejected: {e}"));
    }
}

// =============================================================================
// Stalemate Tests
// =============================================================================

#[test]
fn test_stalemate_king_in_corner() {
    let game = Game::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(game.legal_moves().is_empty());
    assert!(!game.board().in_check(Color::Black));
    assert_eq!(game.status(), GameStatus::Draw(DrawReason::Stalemate));
}

#[test]
fn test_stalemate_king_and_pawn_endgame() {
    assert_eq!(
        status("6k1/6P1/6K1/8/8/8/8/8 b - - 0 1"),
        GameStatus::Draw(DrawReason::Stalemate)
    );
}

// =============================================================================
// Fifty-Move Rule Tests
// =============================================================================

#[test]
fn test_fifty_move_rule_at_100_halfmoves() {
    // A rook keeps the material sufficient.
    assert_eq!(
        status("8/8/8/4k3/8/4K3/8/R7 w - - 100 60"),
        GameStatus::Draw(DrawReason::FiftyMoveRule)
    );
}

#[test]
fn test_fifty_move_rule_at_99_halfmoves() {
    let mut game = Game::from_fen("8/8/8/4k3/8/4K3/8/R7 w - - 99 60").unwrap();
    assert_eq!(game.status(), GameStatus::InProgress);
    play(&mut game, &["a1a2"]);
    assert_eq!(game.status(), GameStatus::Draw(DrawReason::FiftyMoveRule));
    game.undo_move().unwrap();
    assert_eq!(game.board().halfmove_clock(), 99);
    assert_eq!(game.status(), GameStatus::InProgress);
}

#[test]
fn test_fifty_move_rule_reset_on_pawn_move() {
    let mut game = Game::from_fen("8/8/8/4k3/8/3K4/4P3/8 w - - 99 60").unwrap();
    play(&mut game, &["e2e3"]);
    assert_eq!(game.board().halfmove_clock(), 0);
    assert_eq!(game.status(), GameStatus::InProgress);
}

// =============================================================================
// Insufficient Material Tests
// =============================================================================

#[test]
fn test_insufficient_material() {
    let cases = [
        "8/8/8/4k3/8/4K3/8/8 w - - 0 1",        // king vs king
        "8/8/8/4k3/8/4KB2/8/8 w - - 0 1",       // king and bishop
        "8/8/8/4k3/8/4KN2/8/8 w - - 0 1",       // king and knight
        "8/8/4b3/4k3/8/4K3/8/8 w - - 0 1",      // black bishop
        "8/8/4n3/4k3/8/4K3/8/8 w - - 0 1",      // black knight
        "5b2/8/8/4k3/8/4K3/8/2B5 w - - 0 1",    // bishops on the same colour
    ];
    for fen in cases {
        assert_eq!(
            status(fen),
            GameStatus::Draw(DrawReason::InsufficientMaterial),
            "{fen}"
        );
    }
}

#[test]
fn test_sufficient_material() {
    let cases = [
        "2b5/8/8/4k3/8/4K3/8/2B5 w - - 0 1",    // bishops on opposite colours
        "8/8/8/4k3/8/4K3/4P3/8 w - - 0 1",      // pawn
        "8/8/8/4k3/8/4K3/8/4R3 w - - 0 1",      // rook
        "8/8/8/4k3/8/4K3/8/4Q3 w - - 0 1",      // queen
        "8/8/8/4k3/8/4K3/3NN3/8 w - - 0 1",     // two knights
        "8/8/4n3/4k3/8/4K3/8/2B5 w - - 0 1",    // knight and bishop on opposite sides
    ];
    for fen in cases {
        assert_eq!(status(fen), GameStatus::InProgress, "{fen}");
    }
}

// =============================================================================
// Repetition Tests
// =============================================================================

#[test]
fn test_threefold_repetition_detection() {
    let mut game = Game::new();
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

    play(&mut game, &shuffle);
    assert_eq!(game.repetitions(), 2);
    assert_eq!(game.status(), GameStatus::InProgress);

    play(&mut game, &shuffle);
    assert_eq!(game.repetitions(), 3);
    assert_eq!(
        game.status(),
        GameStatus::Draw(DrawReason::ThreefoldRepetition)
    );

    game.undo_move().unwrap();
    play(&mut game, &["f6g8"]);
    assert_eq!(game.repetitions(), 3);
    game.undo_move().unwrap();
    assert_eq!(game.status(), GameStatus::InProgress);
}

#[test]
fn test_repetition_stays_drawn_past_the_third() {
    let mut game = Game::new();
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    for _ in 0..3 {
        play(&mut game, &shuffle);
    }
    assert_eq!(game.repetitions(), 4);
    assert_eq!(
        game.status(),
        GameStatus::Draw(DrawReason::ThreefoldRepetition)
    );
}

#[test]
fn test_transposition_reaches_the_same_hash() {
    let mut ruy = Game::new();
    play(&mut ruy, &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5"]);
    let mut transposed = Game::new();
    play(&mut transposed, &["g1f3", "b8c6", "e2e4", "e7e5", "f1b5"]);
    assert_eq!(ruy.hash(), transposed.hash());

    // Midway the orders differ by the en passant file of the last double push.
    let mut a = Game::new();
    play(&mut a, &["e2e4", "e7e5", "g1f3", "b8c6"]);
    let mut b = Game::new();
    play(&mut b, &["g1f3", "b8c6", "e2e4", "e7e5"]);
    assert_ne!(a.hash(), b.hash());
}

// =============================================================================
// Checkmate Tests
// =============================================================================

#[test]
fn test_checkmate_is_not_stalemate() {
    let game =
        Game::from_fen("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4")
            .unwrap();
    assert!(game.board().in_check(Color::Black));
    assert_eq!(game.status(), GameStatus::Checkmate);
    assert_eq!(game.status().value(), Some(-1.0));
}

#[test]
fn test_check_is_not_checkmate() {
    let game =
        Game::from_fen("rnbqkbnr/ppppp1pp/8/5p1Q/4P3/8/PPPP1PPP/RNB1KBNR b KQkq - 1 2").unwrap();
    assert!(game.board().in_check(Color::Black));
    assert_eq!(game.status(), GameStatus::InProgress);
}

#[test]
fn test_fools_mate() {
    let mut game = Game::new();
    play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
    assert_eq!(game.status(), GameStatus::Checkmate);
    assert_eq!(game.team_to_move(), Color::White);
}
