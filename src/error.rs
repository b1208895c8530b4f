use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("invalid piece code: {0:?}")]
    InvalidPieceCode(String),

    #[error("invalid square: {0:?}")]
    InvalidSquare(String),

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),
}
