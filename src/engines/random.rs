use super::Player;
use crate::chess_boards::chess_board::Move;
use crate::chess_boards::Board;
use rand::prelude::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing::trace;

/// Plays a uniformly random pseudo-legal move. Seeded, so games are reproducible.
pub struct RandomPlayer {
    rng: Pcg64,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn name(&self) -> &str {
        "Random"
    }

    fn choose_move<B: Board>(&mut self, board: &B) -> Option<Move> {
        let moves = board.pseudo_moves(board.current_turn());
        let choice = moves.choose(&mut self.rng).copied();
        trace!(candidates = moves.len(), choice = ?choice, "random move");
        choice
    }
}
