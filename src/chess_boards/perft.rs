use crate::chess_boards::chess_board::{ChessBoard, Move};

/// Leaf count of the pseudo-legal move tree `depth` plies deep.
pub fn perft(board: &ChessBoard, depth: u8) -> u64 {
    if depth == 0 {
        return 1u64;
    }

    board
        .generate_pseudo_moves(board.current_turn())
        .into_iter()
        .map(|mv| perft(&board.after_move(mv), depth - 1))
        .sum()
}

/// Per-root-move breakdown of [`perft`], sorted by move name.
pub fn divide(board: &ChessBoard, depth: u8) -> Vec<(Move, u64)> {
    let mut result_moves: Vec<(Move, u64)> = board
        .generate_pseudo_moves(board.current_turn())
        .into_iter()
        .map(|mv| (mv, perft(&board.after_move(mv), depth.saturating_sub(1))))
        .collect();
    result_moves.sort_by_key(|(mv, _)| mv.as_algebraic());
    result_moves
}
