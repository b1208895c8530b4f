use super::{fen, ChessField, Color, Move, Piece, PieceType, Square};
use crate::error::ChessError;
use lazy_static::lazy_static;
use std::collections::HashMap;
use tracing::{debug, trace};

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

lazy_static! {
    static ref GLYPHS: HashMap<Piece, char> = {
        let mut glyphs = HashMap::new();
        for (color, symbols) in [
            (Color::White, ['♙', '♘', '♗', '♖', '♕', '♔']),
            (Color::Black, ['♟', '♞', '♝', '♜', '♛', '♚']),
        ] {
            for (kind, symbol) in [
                PieceType::Pawn,
                PieceType::Knight,
                PieceType::Bishop,
                PieceType::Rook,
                PieceType::Queen,
                PieceType::King,
            ]
            .into_iter()
            .zip(symbols)
            {
                glyphs.insert(Piece { color, kind }, symbol);
            }
        }
        glyphs
    };
}

/// The whole game state: the 8x8 grid and the side to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessBoard {
    pub squares: [[Square; 8]; 8],
    pub active_color: Color,
}

impl Default for ChessBoard {
    fn default() -> Self {
        Self::starting_position()
    }
}

impl ChessBoard {
    /// Creates an empty chess board with white to move.
    pub fn new() -> Self {
        Self {
            squares: [[Square::Empty; 8]; 8],
            active_color: Color::White,
        }
    }

    /// Creates a board in the standard initial position.
    pub fn starting_position() -> Self {
        let mut board = Self::new();
        board.setup();
        board
    }

    /// Resets the board to the standard initial position with white to move.
    pub fn setup(&mut self) {
        self.squares = [[Square::Empty; 8]; 8];
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            self.squares[0][col] = Square::Occupied(Piece::new(Color::Black, kind));
            self.squares[1][col] = Square::Occupied(Piece::new(Color::Black, PieceType::Pawn));
            self.squares[6][col] = Square::Occupied(Piece::new(Color::White, PieceType::Pawn));
            self.squares[7][col] = Square::Occupied(Piece::new(Color::White, kind));
        }
        self.active_color = Color::White;
        debug!("board set up in the initial position");
    }

    /// Delegates FEN parsing to the `fen` module.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        fen::from_fen(fen)
    }

    pub fn to_fen(&self) -> String {
        fen::to_fen(self)
    }

    /// Contents of `(row, col)`; off-board coordinates read as empty.
    pub fn piece_at(&self, row: u8, col: u8) -> Square {
        self.squares
            .get(row as usize)
            .and_then(|rank| rank.get(col as usize))
            .copied()
            .unwrap_or(Square::Empty)
    }

    pub fn square(&self, field: ChessField) -> Square {
        self.piece_at(field.row, field.col)
    }

    /// Puts `square` on `field`, bypassing the rules. Used to build positions.
    pub fn place(&mut self, field: ChessField, square: Square) {
        if field.is_in_bounds() {
            self.squares[field.row as usize][field.col as usize] = square;
        }
    }

    pub fn current_turn(&self) -> Color {
        self.active_color
    }

    /// Returns an iterator over all pieces on the chessboard along with their coordinates,
    /// row by row starting at row 0.
    pub fn pieces_with_coordinates(&self) -> impl Iterator<Item = (ChessField, Piece)> + '_ {
        self.squares.iter().enumerate().flat_map(|(row, rank)| {
            rank.iter().enumerate().filter_map(move |(col, square)| {
                square.piece().map(|piece| (ChessField::new(row as u8, col as u8), piece))
            })
        })
    }

    /// First king of `color` in row-major order, if any.
    pub fn find_king_position(&self, color: Color) -> Option<ChessField> {
        let king = Piece::new(color, PieceType::King);
        self.pieces_with_coordinates()
            .find(|&(_, piece)| piece == king)
            .map(|(field, _)| field)
    }

    /// Whether any pseudo-legal move of the opponent lands on `side`'s king.
    /// A side without a king is never in check.
    pub fn side_in_check(&self, side: Color) -> bool {
        let Some(king) = self.find_king_position(side) else {
            return false;
        };

        let opponent = side.opposite();
        let in_check = self
            .pieces_with_coordinates()
            .filter(|(_, piece)| piece.color == opponent)
            .any(|(field, piece)| self.moves_for(Square::Occupied(piece), field.row, field.col).contains(&king));

        if in_check {
            debug!(%side, king = %king, "king is attacked");
        }
        in_check
    }

    /// Applies a move of the side to move and hands the turn to the opponent.
    ///
    /// Returns `false` without touching the board when the source is off the board,
    /// empty, held by the side not to move, or when the destination is not among the
    /// source piece's generated moves. Whatever stood on the destination is discarded.
    pub fn apply_move(&mut self, from_row: u8, from_col: u8, to_row: u8, to_col: u8) -> bool {
        let from = ChessField::new(from_row, from_col);
        let to = ChessField::new(to_row, to_col);

        let piece = match self.square(from) {
            Square::Occupied(p) if from.is_in_bounds() && p.color == self.active_color => p,
            _ => {
                trace!(%from, %to, "no piece of the side to move on the source square");
                return false;
            }
        };

        if !self.moves_from(from).contains(&to) {
            trace!(%from, %to, piece = %piece, "destination is not a generated move");
            return false;
        }

        self.move_piece(Move::between(from, to));
        debug!(%from, %to, piece = %piece, next = %self.active_color, "move applied");
        true
    }

    /// The position after moving whatever stands on `mv.from` to `mv.to` and
    /// flipping the turn. No rule is checked; `self` is left untouched.
    pub fn after_move(&self, mv: Move) -> ChessBoard {
        let mut board = self.clone();
        board.move_piece(mv);
        board
    }

    fn move_piece(&mut self, mv: Move) {
        let piece = self.square(mv.from);
        self.squares[mv.to.row as usize][mv.to.col as usize] = piece;
        self.squares[mv.from.row as usize][mv.from.col as usize] = Square::Empty;
        self.active_color = self.active_color.opposite();
    }

    pub fn render_to_string(&self) -> String {
        let mut board_representation = String::new();
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");
        board_representation.push_str("  ┌───┬───┬───┬───┬───┬───┬───┬───┐\n");

        for (row, rank) in self.squares.iter().enumerate() {
            let label = 8 - row;
            board_representation.push_str(&format!("{} │", label));
            for square in rank {
                let symbol = match square {
                    Square::Empty => ' ',
                    Square::Occupied(piece) => GLYPHS.get(piece).copied().unwrap_or_else(|| piece.to_char()),
                };
                board_representation.push_str(&format!(" {} │", symbol));
            }
            board_representation.push_str(&format!(" {}\n", label));

            if row < 7 {
                board_representation.push_str("  ├───┼───┼───┼───┼───┼───┼───┼───┤\n");
            }
        }

        board_representation.push_str("  └───┴───┴───┴───┴───┴───┴───┴───┘\n");
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");

        board_representation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    fn field(name: &str) -> ChessField {
        ChessField::from_algebraic(name).unwrap()
    }

    #[test]
    fn test_setup_matches_initial_position() {
        let board = ChessBoard::starting_position();
        let expected = [
            ["br", "bn", "bb", "bq", "bk", "bb", "bn", "br"],
            ["bp", "bp", "bp", "bp", "bp", "bp", "bp", "bp"],
            ["", "", "", "", "", "", "", ""],
            ["", "", "", "", "", "", "", ""],
            ["", "", "", "", "", "", "", ""],
            ["", "", "", "", "", "", "", ""],
            ["wp", "wp", "wp", "wp", "wp", "wp", "wp", "wp"],
            ["wr", "wn", "wb", "wq", "wk", "wb", "wn", "wr"],
        ];
        for row in 0..8u8 {
            for col in 0..8u8 {
                assert_eq!(board.piece_at(row, col).code(), expected[row as usize][col as usize]);
            }
        }
        assert_eq!(board.current_turn(), Color::White);
    }

    #[test]
    fn test_setup_resets_a_played_board() {
        let mut board = ChessBoard::starting_position();
        assert!(board.apply_move(6, 4, 4, 4));
        board.setup();
        assert_eq!(board, ChessBoard::starting_position());
    }

    #[test]
    fn test_apply_move_moves_piece_and_flips_turn() {
        let mut board = ChessBoard::starting_position();
        assert!(board.apply_move(6, 4, 4, 4));
        assert_eq!(board.piece_at(6, 4), Square::Empty);
        assert_eq!(board.piece_at(4, 4), "wp".parse::<Square>().unwrap());
        assert_eq!(board.current_turn(), Color::Black);

        assert!(board.apply_move(1, 3, 3, 3));
        assert_eq!(board.current_turn(), Color::White);

        // Capture discards the black pawn
        assert!(board.apply_move(4, 4, 3, 3));
        assert_eq!(board.piece_at(3, 3), "wp".parse::<Square>().unwrap());
        assert_eq!(board.pieces_with_coordinates().count(), 31);
    }

    #[test]
    fn test_apply_move_rejects_without_mutation() {
        let mut board = ChessBoard::starting_position();
        let before = board.clone();

        // Black piece while white is to move
        assert!(!board.apply_move(1, 4, 3, 4));
        // Empty source
        assert!(!board.apply_move(4, 4, 3, 4));
        // Destination not generated
        assert!(!board.apply_move(6, 4, 3, 4));
        // Off the board
        assert!(!board.apply_move(8, 0, 7, 0));
        assert!(!board.apply_move(6, 0, 6, 9));

        assert_eq!(board, before);
    }

    #[test]
    fn test_rook_on_open_file_gives_check() {
        let mut board = ChessBoard::new();
        board.place(field("e1"), "wk".parse().unwrap());
        board.place(field("a8"), "bk".parse().unwrap());
        assert!(!board.side_in_check(Color::White));

        board.place(field("e8"), "br".parse().unwrap());
        assert!(board.side_in_check(Color::White));
        assert!(!board.side_in_check(Color::Black));

        // Any interposed piece blocks the file
        board.place(field("e4"), "wn".parse().unwrap());
        assert!(!board.side_in_check(Color::White));
        board.place(field("e4"), "bp".parse().unwrap());
        assert!(!board.side_in_check(Color::White));
    }

    #[test]
    fn test_pawn_and_knight_checks() {
        let board = ChessBoard::from_fen("8/8/8/3p4/4K3/8/8/8 w").unwrap();
        assert!(board.side_in_check(Color::White));

        // A pawn straight ahead does not attack
        let board = ChessBoard::from_fen("8/8/8/4p3/4K3/8/8/8 w").unwrap();
        assert!(!board.side_in_check(Color::White));

        let board = ChessBoard::from_fen("8/8/5n2/8/4K3/8/8/8 w").unwrap();
        assert!(board.side_in_check(Color::White));
    }

    #[test]
    fn test_side_without_king_is_not_in_check() {
        let board = ChessBoard::from_fen("8/8/8/8/4Q3/8/8/8 b").unwrap();
        assert!(!board.side_in_check(Color::Black));
        assert!(!ChessBoard::starting_position().side_in_check(Color::White));
    }

    #[test]
    fn test_check_uses_first_king_found() {
        // Two white kings: only the first one in row order is looked at
        let board = ChessBoard::from_fen("K6r/8/8/8/8/8/8/7K w").unwrap();
        assert_eq!(board.find_king_position(Color::White), Some(field("a8")));
        assert!(board.side_in_check(Color::White));

        let board = ChessBoard::from_fen("K7/8/8/8/8/8/7r/7K w").unwrap();
        assert!(!board.side_in_check(Color::White));
    }

    #[test]
    fn test_moves_may_leave_own_king_in_check() {
        // The e2 rook is pinned but its sideways moves are still generated
        let mut board = ChessBoard::from_fen("4r3/8/8/8/8/8/4R3/4K3 w").unwrap();
        assert!(board.moves_from(field("e2")).contains(&field("a2")));
        assert!(board.apply_move(6, 4, 6, 0));
        assert!(board.side_in_check(Color::White));
    }

    #[test]
    fn test_after_move_leaves_source_board_untouched() {
        let board = ChessBoard::starting_position();
        let next = board.after_move(Move::from_algebraic("g1f3").unwrap());
        assert_eq!(board, ChessBoard::starting_position());
        assert_eq!(next.square(field("f3")), "wn".parse::<Square>().unwrap());
        assert_eq!(next.current_turn(), Color::Black);
    }

    #[test]
    fn test_render_uses_glyphs() {
        let rendered = ChessBoard::starting_position().render_to_string();
        assert!(rendered.contains('♔'));
        assert!(rendered.contains('♚'));
        assert!(rendered.lines().nth(2).unwrap_or_default().starts_with("8 │ ♜"));
    }

    #[proptest]
    fn turn_alternates_on_every_applied_move(#[strategy(0usize..200)] pick: usize, #[strategy(1usize..12)] plies: usize) {
        let mut board = ChessBoard::starting_position();
        for ply in 0..plies {
            let moves = board.generate_pseudo_moves(board.current_turn());
            if moves.is_empty() {
                break;
            }
            let mv = moves[(pick + ply) % moves.len()];
            let before = board.current_turn();
            assert!(board.apply_move(mv.from.row, mv.from.col, mv.to.row, mv.to.col));
            assert_eq!(board.current_turn(), before.opposite());
        }
    }
}
