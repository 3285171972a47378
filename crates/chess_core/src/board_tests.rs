use super::*;

fn find(board: &Board, txt: &str) -> Move {
    board
        .legal_moves()
        .iter()
        .copied()
        .find(|m| m.to_string() == txt)
        .unwrap_or_else(|| panic!("{txt} is not legal in {}", board.to_fen()))
}

fn play(board: &mut Board, moves: &[&str]) -> Vec<Undo> {
    moves
        .iter()
        .map(|txt| {
            let mv = find(board, txt);
            board.do_move(&mv, false).unwrap()
        })
        .collect()
}

#[test]
fn test_startpos_has_twenty_moves() {
    let board = Board::startpos();
    assert_eq!(board.legal_moves().len(), 20);
    assert_eq!(board.side_to_move(), Color::White);
    assert_eq!(board.pieces().count(), 32);
    assert_eq!(board.king(Color::White).square, Square::new(0, 4));
    assert_eq!(board.king(Color::Black).square, Square::new(7, 4));
}

#[test]
fn test_is_attacked_probe() {
    let board = Board::from_fen("4k3/8/8/8/8/5n2/3p4/R3K3 w - - 0 1").unwrap();
    // The d2 pawn and the f3 knight both hit e1.
    assert!(board.in_check(Color::White));
    assert!(board.is_attacked(Square::new(0, 6), Color::White, None)); // knight on g1
    assert!(board.is_attacked(Square::new(0, 2), Color::White, None)); // pawn on c1
    assert!(!board.is_attacked(Square::new(1, 4), Color::White, None));
    assert!(!board.in_check(Color::Black));
    // The a1 rook sees up the open a-file.
    assert!(board.is_attacked(Square::new(7, 0), Color::Black, None));
}

#[test]
fn test_vacated_square_is_transparent() {
    let board = Board::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
    // The rook's ray to f1 is blocked by the king itself unless it is vacated.
    assert!(!board.is_attacked(Square::new(0, 5), Color::White, None));
    assert!(board.is_attacked(Square::new(0, 5), Color::White, Some(Square::new(0, 4))));
}

#[test]
fn test_every_legal_move_leaves_king_safe() {
    let mut board =
        Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    let mover = board.side_to_move();
    for mv in board.legal_moves().to_vec() {
        let undo = board.do_move(&mv, false).unwrap();
        assert!(!board.in_check(mover), "{mv} leaves the king in check");
        board.undo_move(&undo, false).unwrap();
    }
}

#[test]
fn test_castling_generated_and_blocked() {
    let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let castles: Vec<_> = board.legal_moves().iter().filter(|m| m.castle.is_some()).collect();
    assert_eq!(castles.len(), 2);

    // A rook on f8 covers f1, so white may only castle queenside.
    let board = Board::from_fen("r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1").unwrap();
    let castles: Vec<_> = board
        .legal_moves()
        .iter()
        .filter_map(|m| m.castle)
        .collect();
    assert_eq!(castles, vec![CastleSide::Queenside]);

    // A knight on b1 blocks queenside castling even though the king never crosses b1.
    let board = Board::from_fen("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1").unwrap();
    let castles: Vec<_> = board
        .legal_moves()
        .iter()
        .filter_map(|m| m.castle)
        .collect();
    assert_eq!(castles, vec![CastleSide::Kingside]);
}

#[test]
fn test_no_castling_out_of_check() {
    let board = Board::from_fen("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1").unwrap();
    assert!(board.legal_moves().iter().all(|m| m.castle.is_none()));
}

#[test]
fn test_queenside_castle_and_undo() {
    let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let before = board.clone();
    let undo = play(&mut board, &["e1c1"]).remove(0);
    assert_eq!(board.piece_at(Square::new(0, 2)).map(|p| p.kind), Some(PieceKind::King));
    assert_eq!(board.piece_at(Square::new(0, 3)).map(|p| p.kind), Some(PieceKind::Rook));
    assert!(board.piece_at(Square::new(0, 0)).is_none());
    assert_eq!(board.castling(Color::White), CastlingRights::NONE);
    assert_eq!(board.castling(Color::Black), CastlingRights::ALL);

    board.undo_move(&undo, false).unwrap();
    assert_eq!(board, before);
}

#[test]
fn test_capturing_a_rook_revokes_the_opponents_right() {
    let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let before = board.clone();
    let undo = play(&mut board, &["a1a8"]).remove(0);
    assert!(!board.castling(Color::White).queenside);
    assert!(!board.castling(Color::Black).queenside);
    assert!(board.castling(Color::Black).kingside);
    board.undo_move(&undo, false).unwrap();
    assert_eq!(board, before);
}

#[test]
fn test_en_passant_lifecycle() {
    let mut board = Board::startpos();
    play(&mut board, &["e2e4", "a7a6", "e4e5", "d7d5"]);
    assert_eq!(board.en_passant_file(), Some(3));
    let ep = find(&board, "e5d6");
    assert!(ep.is_en_passant);
    assert_eq!(ep.capture_square(), Some(Square::new(4, 3)));

    let before = board.clone();
    let undo = board.do_move(&ep, false).unwrap();
    assert!(board.piece_at(Square::new(4, 3)).is_none());
    board.undo_move(&undo, false).unwrap();
    assert_eq!(board, before);

    // Eligibility lasts a single ply.
    play(&mut board, &["h2h3", "h7h6"]);
    assert_eq!(board.en_passant_file(), None);
    assert!(board.legal_moves().iter().all(|m| !m.is_en_passant));
}

#[test]
fn test_promotion_order_and_revert() {
    let mut board = Board::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let promos: Vec<_> = board
        .legal_moves()
        .iter()
        .filter_map(|m| m.promotion)
        .collect();
    assert_eq!(promos, PieceKind::PROMOTIONS.to_vec());

    let before = board.clone();
    let knight = board
        .legal_moves()
        .iter()
        .copied()
        .find(|m| m.promotion == Some(PieceKind::Knight))
        .unwrap();
    let undo = board.do_move(&knight, false).unwrap();
    assert_eq!(board.piece_at(Square::new(7, 1)).map(|p| p.kind), Some(PieceKind::Knight));
    board.undo_move(&undo, false).unwrap();
    assert_eq!(board, before);
}

#[test]
fn test_counters() {
    let mut board = Board::startpos();
    play(&mut board, &["g1f3", "g8f6"]);
    assert_eq!(board.halfmove_clock(), 2);
    assert_eq!(board.ply(), 2);
    play(&mut board, &["e2e4"]);
    assert_eq!(board.halfmove_clock(), 0);
}

#[test]
fn test_incremental_matches_fresh_generation() {
    let mut board = Board::startpos();
    play(
        &mut board,
        &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1g1", "f6e4", "d2d4", "e5d4"],
    );
    let mut fresh = board.clone();
    fresh.refresh().unwrap();
    assert_eq!(board, fresh);
}

#[test]
fn test_test_moves_leave_caches_alone() {
    let mut board = Board::startpos();
    let before = board.clone();
    let mv = find(&board, "e2e4");
    let undo = board.do_move(&mv, true).unwrap();
    assert_eq!(board.legal_moves(), before.legal_moves());
    assert_eq!(board.ply(), 0);
    board.undo_move(&undo, true).unwrap();
    assert_eq!(board, before);
}

#[test]
fn test_missing_piece_is_an_error() {
    let mut board = Board::startpos();
    let bogus = Move::new(Square::new(3, 3), Square::new(4, 3), PieceKind::Pawn);
    assert_eq!(
        board.do_move(&bogus, false),
        Err(ChessError::MissingPiece(Square::new(3, 3)))
    );
    assert_eq!(board, Board::startpos());
}
