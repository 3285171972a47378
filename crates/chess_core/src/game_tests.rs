use super::*;

#[test]
fn test_new_game_counts_the_start_position() {
    let game = Game::new();
    assert_eq!(game.repetitions(), 1);
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.team_to_move(), Color::White);
    assert_eq!(game.pieces().count(), 32);
}

#[test]
fn test_do_and_undo_str_move() {
    let mut game = Game::new();
    let start = game.hash();
    let mv = game.do_str_move("e2e4").unwrap();
    assert_eq!(mv.to, Square::new(3, 4));
    assert_eq!(game.team_to_move(), Color::Black);
    assert_eq!(game.history().len(), 1);

    assert_eq!(game.undo_move().unwrap(), mv);
    assert_eq!(game.hash(), start);
    assert_eq!(game.undo_move(), Err(ChessError::NoHistory));
}

#[test]
fn test_rejects_moves_not_in_the_legal_list() {
    let mut game = Game::new();
    let bogus = Move::new(Square::new(1, 4), Square::new(4, 4), PieceKind::Pawn);
    assert!(matches!(game.do_move(&bogus), Err(ChessError::IllegalMove(_))));
    assert!(game.history().is_empty());
}

#[test]
fn test_legal_moves_from_square() {
    let game = Game::new();
    let mut targets = game.legal_moves_from(Square::new(1, 4));
    targets.sort();
    assert_eq!(targets, vec![Square::new(2, 4), Square::new(3, 4)]);
    assert!(game.legal_moves_from(Square::new(0, 0)).is_empty());

    // Four promotion moves collapse to one destination.
    let game = Game::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    assert_eq!(game.legal_moves_from(Square::new(6, 1)), vec![Square::new(7, 1)]);
}

#[test]
fn test_is_square_friendly() {
    let mut game = Game::new();
    assert!(game.is_square_friendly(Square::new(0, 0)));
    assert!(!game.is_square_friendly(Square::new(7, 0)));
    assert!(!game.is_square_friendly(Square::new(4, 4)));
    game.do_str_move("e2e4").unwrap();
    assert!(game.is_square_friendly(Square::new(7, 0)));
}

#[test]
fn test_draw_reason_text() {
    assert_eq!(DrawReason::Stalemate.to_string(), "stalemate");
    assert_eq!(
        GameStatus::Draw(DrawReason::ThreefoldRepetition).value(),
        Some(0.0)
    );
    assert_eq!(GameStatus::InProgress.value(), None);
}

#[test]
fn test_planes_follow_side_to_move() {
    let mut game = Game::new();
    let white = game.planes();
    game.do_str_move("g1f3").unwrap();
    game.do_str_move("g8f6").unwrap();
    game.undo_move().unwrap();
    // Black to move: its own pawns fill the friendly pawn plane's second row.
    let black = game.planes();
    assert!((8..16).all(|i| black[i] == 1.0));
    assert_ne!(white, black);
}
