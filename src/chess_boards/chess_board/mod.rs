pub mod fen;
pub mod model;
pub use model::{ChessField, Color, Move, Piece, PieceType, Square};

mod chess_board;
mod move_generation;
#[cfg(test)]
pub mod test_utils;
pub use chess_board::ChessBoard;
