use crate::chess_boards::chess_board::Move;
use crate::chess_boards::Board;

pub mod random;
pub use random::RandomPlayer;

/// Something that picks moves for the side to move.
pub trait Player {
    fn name(&self) -> &str;
    fn choose_move<B: Board>(&mut self, board: &B) -> Option<Move>;
}
