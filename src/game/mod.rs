//! A headless game session: the selection state machine a front end drives with
//! square clicks, plus the short move log the rules themselves do not keep.

use crate::chess_boards::chess_board::{ChessBoard, ChessField, Color, Move, Piece, Square};
use crate::chess_boards::Board;
use circular_buffer::CircularBuffer;
use std::mem;
use tracing::{debug, info, instrument};

pub const HISTORY_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Selected {
        from: ChessField,
        piece: Piece,
        candidates: Vec<ChessField>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedMove {
    pub mv: Move,
    pub piece: Piece,
    pub captured: Option<Piece>,
    /// The side left in check by this move, if any.
    pub check: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A piece of the side to move was picked up; these are its destinations.
    Selected { from: ChessField, candidates: Vec<ChessField> },
    /// The selection was dropped without touching the board.
    Deselected,
    Moved(PlayedMove),
    Ignored,
}

pub struct Game<B: Board = ChessBoard> {
    board: B,
    selection: Selection,
    history: CircularBuffer<HISTORY_LEN, PlayedMove>,
}

impl Game<ChessBoard> {
    pub fn new() -> Self {
        Self::with_board(ChessBoard::starting_position())
    }
}

impl Default for Game<ChessBoard> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Board> Game<B> {
    pub fn with_board(board: B) -> Self {
        Self {
            board,
            selection: Selection::Idle,
            history: CircularBuffer::new(),
        }
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Most recent moves, oldest first. Only the last [`HISTORY_LEN`] are kept.
    pub fn history(&self) -> impl Iterator<Item = &PlayedMove> {
        self.history.iter()
    }

    pub fn last_move(&self) -> Option<&PlayedMove> {
        self.history.back()
    }

    pub fn reset(&mut self) {
        self.board.setup();
        self.selection = Selection::Idle;
        self.history.clear();
        info!("new game");
    }

    /// Feeds one click on `field` through the selection state machine.
    #[instrument(level = "trace", skip(self))]
    pub fn click(&mut self, field: ChessField) -> ClickOutcome {
        if !field.is_in_bounds() {
            return ClickOutcome::Ignored;
        }

        match mem::take(&mut self.selection) {
            Selection::Idle => self.select(field),
            Selection::Selected { from, .. } if from == field => {
                debug!(%field, "selection cleared");
                ClickOutcome::Deselected
            }
            Selection::Selected {
                from,
                piece,
                candidates,
            } => {
                if !candidates.contains(&field) {
                    debug!(%from, to = %field, "not a candidate, selection dropped");
                    return ClickOutcome::Deselected;
                }
                self.commit(Move::between(from, field), piece)
            }
        }
    }

    /// Plays `mv` as the two clicks a user would make.
    pub fn play(&mut self, mv: Move) -> ClickOutcome {
        self.selection = Selection::Idle;
        match self.click(mv.from) {
            ClickOutcome::Selected { .. } => self.click(mv.to),
            other => other,
        }
    }

    fn select(&mut self, field: ChessField) -> ClickOutcome {
        let square = self.board.piece_at(field.row, field.col);
        let piece = match square {
            Square::Occupied(p) if p.color == self.board.current_turn() => p,
            _ => return ClickOutcome::Ignored,
        };

        let candidates = self.board.moves_for(square, field.row, field.col);
        debug!(%field, %piece, candidates = candidates.len(), "piece selected");
        self.selection = Selection::Selected {
            from: field,
            piece,
            candidates: candidates.clone(),
        };
        ClickOutcome::Selected { from: field, candidates }
    }

    fn commit(&mut self, mv: Move, piece: Piece) -> ClickOutcome {
        let captured = self.board.piece_at(mv.to.row, mv.to.col).piece();
        if !self.board.apply_move(mv.from.row, mv.from.col, mv.to.row, mv.to.col) {
            return ClickOutcome::Deselected;
        }

        let to_move = self.board.current_turn();
        let check = self.board.side_in_check(to_move).then_some(to_move);
        if let Some(side) = check {
            info!(%side, "{} is in check", side);
        }

        let played = PlayedMove {
            mv,
            piece,
            captured,
            check,
        };
        self.history.push_back(played);
        ClickOutcome::Moved(played)
    }
}
