use super::ChessBoard;
use super::{Color, Piece, Square};
use crate::error::ChessError;

pub const INITIAL_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w";

/// Parses the placement and active color fields of a FEN string.
///
/// Castling, en passant and the clocks are not modelled, so up to four trailing
/// fields are accepted and ignored.
pub fn from_fen(fen: &str) -> Result<ChessBoard, ChessError> {
    let mut board = ChessBoard::new();
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() < 2 || parts.len() > 6 {
        return Err(ChessError::InvalidFen(format!(
            "expected between 2 and 6 fields, found {}",
            parts.len()
        )));
    }

    let rows: Vec<&str> = parts[0].split('/').collect();
    if rows.len() != 8 {
        return Err(ChessError::InvalidFen(format!("expected 8 rows, found {}", rows.len())));
    }

    // The first FEN row is rank 8, which is row 0 here
    for (row_index, row) in rows.iter().enumerate() {
        let mut col_index = 0;

        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                if skip == 0 {
                    return Err(ChessError::InvalidFen(format!("zero skip in row {}", row_index)));
                }
                col_index += skip as usize;
            } else {
                let piece = Piece::from_char(c)
                    .ok_or_else(|| ChessError::InvalidFen(format!("invalid piece character: {}", c)))?;
                if col_index > 7 {
                    return Err(ChessError::InvalidFen(format!("too many squares in row {}", row_index)));
                }
                board.squares[row_index][col_index] = Square::Occupied(piece);
                col_index += 1;
            }
        }

        if col_index != 8 {
            return Err(ChessError::InvalidFen(format!(
                "row {} covers {} squares instead of 8",
                row_index, col_index
            )));
        }
    }

    board.active_color = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(ChessError::InvalidFen(format!("invalid active color: {}", other))),
    };

    Ok(board)
}

pub fn to_fen(board: &ChessBoard) -> String {
    let mut board_representation = String::new();

    for (row, rank) in board.squares.iter().enumerate() {
        let mut empty_count = 0;

        for square in rank {
            match square {
                Square::Occupied(piece) => {
                    if empty_count > 0 {
                        board_representation.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    board_representation.push(piece.to_char());
                }
                Square::Empty => {
                    empty_count += 1;
                }
            }
        }

        if empty_count > 0 {
            board_representation.push_str(&empty_count.to_string());
        }

        if row < 7 {
            board_representation.push('/');
        }
    }

    format!("{} {}", board_representation, board.active_color.code())
}

#[cfg(test)]
mod test {
    use super::super::PieceType;
    use super::*;

    #[test]
    fn fen_empty_board() {
        let board = ChessBoard::from_fen("8/8/8/8/8/8/8/8 w").expect("Failed to parse FEN");
        assert_eq!(board, ChessBoard::new());
    }

    #[test]
    fn fen_one_pawn() {
        let board = ChessBoard::from_fen("8/8/8/8/8/8/8/P7 w").expect("Failed to parse FEN");
        assert_eq!(
            board.squares[7][0],
            Square::Occupied(Piece {
                color: Color::White,
                kind: PieceType::Pawn
            })
        );
    }

    #[test]
    fn fen_initial_board() {
        let board = ChessBoard::from_fen(INITIAL_POSITION).expect("Failed to parse FEN");
        assert_eq!(board, ChessBoard::starting_position());
    }

    #[test]
    fn fen_trailing_fields_are_ignored() {
        let board = ChessBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1")
            .expect("Failed to parse FEN");
        assert_eq!(board.active_color, Color::Black);
        assert_eq!(board.squares, ChessBoard::starting_position().squares);
    }

    #[test]
    fn fen_invalid_square() {
        assert!(ChessBoard::from_fen("8/8/8/8/8/8/8/X7 w").is_err());
    }

    #[test]
    fn fen_invalid_fen_extra_columns() {
        let fen = "rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w";
        assert!(matches!(ChessBoard::from_fen(fen), Err(ChessError::InvalidFen(_))));
    }

    #[test]
    fn fen_invalid_short_row() {
        assert!(ChessBoard::from_fen("7/8/8/8/8/8/8/8 w").is_err());
    }

    #[test]
    fn fen_missing_parts() {
        assert!(ChessBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").is_err());
        assert!(ChessBoard::from_fen("8/8/8/8/8/8/8/8 x").is_err());
    }

    #[test]
    fn test_to_fen_initial_position() {
        assert_eq!(ChessBoard::starting_position().to_fen(), INITIAL_POSITION);
    }

    #[test]
    fn test_to_fen_custom_position() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b";
        assert_eq!(ChessBoard::from_fen(fen).unwrap().to_fen(), fen);
    }
}
