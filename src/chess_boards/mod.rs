pub mod chess_board;
pub mod perft;

use chess_board::{ChessBoard, ChessField, Color, Move, Square};

/// The calls a front end makes into the rules: it renders from `piece_at` and
/// `current_turn`, highlights `moves_for`, commits with `apply_move` and shows a
/// notification when `side_in_check` reports an attacked king.
pub trait Board {
    fn setup(&mut self);
    fn piece_at(&self, row: u8, col: u8) -> Square;
    fn moves_for(&self, square: Square, row: u8, col: u8) -> Vec<ChessField>;
    fn apply_move(&mut self, from_row: u8, from_col: u8, to_row: u8, to_col: u8) -> bool;
    fn side_in_check(&self, side: Color) -> bool;
    fn current_turn(&self) -> Color;

    /// All pseudo-legal moves of `color`.
    fn pseudo_moves(&self, color: Color) -> Vec<Move>;
    fn render_to_string(&self) -> String;
}

impl Board for ChessBoard {
    fn setup(&mut self) {
        ChessBoard::setup(self)
    }

    fn piece_at(&self, row: u8, col: u8) -> Square {
        ChessBoard::piece_at(self, row, col)
    }

    fn moves_for(&self, square: Square, row: u8, col: u8) -> Vec<ChessField> {
        ChessBoard::moves_for(self, square, row, col)
    }

    fn apply_move(&mut self, from_row: u8, from_col: u8, to_row: u8, to_col: u8) -> bool {
        ChessBoard::apply_move(self, from_row, from_col, to_row, to_col)
    }

    fn side_in_check(&self, side: Color) -> bool {
        ChessBoard::side_in_check(self, side)
    }

    fn current_turn(&self) -> Color {
        ChessBoard::current_turn(self)
    }

    fn pseudo_moves(&self, color: Color) -> Vec<Move> {
        self.generate_pseudo_moves(color)
    }

    fn render_to_string(&self) -> String {
        ChessBoard::render_to_string(self)
    }
}
