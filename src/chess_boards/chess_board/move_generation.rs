use super::{ChessBoard, ChessField, Color, Move, Piece, PieceType, Square};

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
const KNIGHT_MOVES: [(i8, i8); 8] = [(-2, -1), (-2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2), (2, -1), (2, 1)];
const KING_MOVES: [(i8, i8); 8] = [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

impl ChessBoard {
    /// Pseudo-legal destinations for `square` standing on `(row, col)`.
    ///
    /// The piece is taken from the caller rather than read from the board, so its
    /// side decides the forward direction and which occupants count as enemies.
    /// Moves that leave the mover's own king attacked are *not* removed; a stricter
    /// rules layer can filter this list with [`ChessBoard::after_move`] and
    /// [`ChessBoard::side_in_check`].
    ///
    /// An empty square or an off-board origin yields no moves.
    pub fn moves_for(&self, square: Square, row: u8, col: u8) -> Vec<ChessField> {
        let origin = ChessField::new(row, col);
        match square {
            Square::Occupied(piece) if origin.is_in_bounds() => self.generate_piece_moves(piece, origin),
            _ => Vec::new(),
        }
    }

    /// Pseudo-legal destinations of whatever currently stands on `field`.
    pub fn moves_from(&self, field: ChessField) -> Vec<ChessField> {
        self.moves_for(self.piece_at(field.row, field.col), field.row, field.col)
    }

    /// Every pseudo-legal move of `color`, scanning the board row by row.
    pub fn generate_pseudo_moves(&self, color: Color) -> Vec<Move> {
        let mut all_moves = Vec::with_capacity(64);

        for (field, piece) in self.pieces_with_coordinates() {
            if piece.color == color {
                all_moves.extend(
                    self.generate_piece_moves(piece, field)
                        .into_iter()
                        .map(|to| Move::between(field, to)),
                );
            }
        }

        all_moves
    }

    fn generate_piece_moves(&self, piece: Piece, origin: ChessField) -> Vec<ChessField> {
        match piece.kind {
            PieceType::Pawn => self.generate_pawn_moves(piece, origin),
            PieceType::Knight => self.generate_moves_from_offsets(piece, origin, &KNIGHT_MOVES),
            PieceType::Bishop => self.generate_sliding_moves(piece, origin, &BISHOP_DIRECTIONS),
            PieceType::Rook => self.generate_sliding_moves(piece, origin, &ROOK_DIRECTIONS),
            PieceType::Queen => self.generate_sliding_moves(piece, origin, &QUEEN_DIRECTIONS),
            PieceType::King => self.generate_moves_from_offsets(piece, origin, &KING_MOVES),
        }
    }

    fn generate_pawn_moves(&self, piece: Piece, origin: ChessField) -> Vec<ChessField> {
        let mut moves = Vec::new();
        let forward = piece.color.forward();

        let Some(one_step) = origin.offset(forward, 0) else {
            return moves;
        };

        if self.square(one_step).is_empty() {
            moves.push(one_step);

            // Double step from the start rank, both squares must be free
            if origin.row == piece.color.pawn_start_row() {
                if let Some(two_step) = origin.offset(2 * forward, 0) {
                    if self.square(two_step).is_empty() {
                        moves.push(two_step);
                    }
                }
            }
        }

        for dc in [-1, 1] {
            if let Some(target) = origin.offset(forward, dc) {
                if self.is_enemy(piece, target) {
                    moves.push(target);
                }
            }
        }

        moves
    }

    /// Rays for rook, bishop and queen. Each ray stops at the first occupied
    /// square, which is included only when it holds an enemy.
    fn generate_sliding_moves(&self, piece: Piece, origin: ChessField, directions: &[(i8, i8)]) -> Vec<ChessField> {
        let mut moves = Vec::new();

        for &(dr, dc) in directions {
            let mut current = origin;

            while let Some(next) = current.offset(dr, dc) {
                match self.square(next) {
                    Square::Empty => moves.push(next),
                    Square::Occupied(p) => {
                        if p.is_enemy_of(&piece) {
                            moves.push(next);
                        }
                        break;
                    }
                }
                current = next;
            }
        }

        moves
    }

    /// Knight and king: fixed offsets onto empty or enemy-held squares.
    fn generate_moves_from_offsets(&self, piece: Piece, origin: ChessField, offsets: &[(i8, i8)]) -> Vec<ChessField> {
        offsets
            .iter()
            .filter_map(|&(dr, dc)| origin.offset(dr, dc))
            .filter(|&target| match self.square(target) {
                Square::Empty => true,
                Square::Occupied(p) => p.is_enemy_of(&piece),
            })
            .collect()
    }

    fn is_enemy(&self, piece: Piece, field: ChessField) -> bool {
        matches!(self.square(field), Square::Occupied(p) if p.is_enemy_of(&piece))
    }
}
