use crate::board::Board;
use crate::error::Result;

/// Pure perft node count.
/// Counts all legal positions from the current one down to `depth`.
pub fn perft(board: &mut Board, depth: u8) -> Result<u64> {
    if depth == 0 {
        return Ok(1);
    }
    if depth == 1 {
        return Ok(board.legal_moves().len() as u64);
    }

    let moves = board.legal_moves().to_vec();
    let mut nodes = 0u64;
    for mv in &moves {
        let undo = board.do_move(mv, false)?;
        nodes += perft(board, depth - 1)?;
        board.undo_move(&undo, false)?;
    }
    Ok(nodes)
}

/// Node count per root move, sorted by move text. Handy for bisecting a mismatch
/// against another move generator.
pub fn divide(board: &mut Board, depth: u8) -> Result<Vec<(String, u64)>> {
    let mut out = Vec::new();
    for mv in board.legal_moves().to_vec() {
        let undo = board.do_move(&mv, false)?;
        let nodes = perft(board, depth.saturating_sub(1))?;
        board.undo_move(&undo, false)?;
        out.push((crate::uci::move_to_uci(&mv), nodes));
    }
    out.sort();
    Ok(out)
}
