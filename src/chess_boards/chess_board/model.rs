use crate::error::ChessError;
use std::fmt;
use std::str::FromStr;

pub const BOARD_SIZE: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The single-letter side tag used in piece codes (`w` or `b`).
    pub fn code(&self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// Row direction a pawn of this side advances in.
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn pawn_start_row(&self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub fn code(&self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "P"),
            PieceType::Knight => write!(f, "N"),
            PieceType::Bishop => write!(f, "B"),
            PieceType::Rook => write!(f, "R"),
            PieceType::Queen => write!(f, "Q"),
            PieceType::King => write!(f, "K"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

impl Piece {
    pub fn new(color: Color, kind: PieceType) -> Self {
        Self { color, kind }
    }

    /// FEN letter: upper case for white, lower case for black.
    pub fn to_char(&self) -> char {
        let c = self.kind.code();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let kind = PieceType::from_code(c.to_ascii_lowercase())?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Self { color, kind })
    }

    /// Two-character piece code, side first (`wp`, `bk`, ...).
    pub fn code(&self) -> String {
        format!("{}{}", self.color.code(), self.kind.code())
    }

    pub fn is_enemy_of(&self, other: &Piece) -> bool {
        self.color != other.color
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.code(), self.kind.code())
    }
}

impl FromStr for Piece {
    type Err = ChessError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let mut chars = code.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(side), Some(kind), None) => match (Color::from_code(side), PieceType::from_code(kind)) {
                (Some(color), Some(kind)) => Ok(Piece { color, kind }),
                _ => Err(ChessError::InvalidPieceCode(code.to_string())),
            },
            _ => Err(ChessError::InvalidPieceCode(code.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Square {
    Occupied(Piece),
    #[default]
    Empty,
}

impl Square {
    pub fn piece(&self) -> Option<Piece> {
        match self {
            Square::Occupied(p) => Some(*p),
            Square::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Square::Empty)
    }

    pub fn is_occupied_by(&self, color: Color) -> bool {
        matches!(self, Square::Occupied(p) if p.color == color)
    }

    /// Piece code of the occupant, or the empty string for an empty square.
    pub fn code(&self) -> String {
        match self {
            Square::Occupied(p) => p.code(),
            Square::Empty => String::new(),
        }
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        if code.is_empty() {
            Ok(Square::Empty)
        } else {
            code.parse().map(Square::Occupied)
        }
    }
}

impl From<Piece> for Square {
    fn from(piece: Piece) -> Self {
        Square::Occupied(piece)
    }
}

/// A board coordinate. Row 0 is the black back rank, row 7 the white one.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct ChessField {
    #[cfg_attr(test, strategy(0u8..8))]
    pub row: u8,
    #[cfg_attr(test, strategy(0u8..8))]
    pub col: u8,
}

impl ChessField {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn is_in_bounds(&self) -> bool {
        is_in_bounds(self.row as i8, self.col as i8)
    }

    /// The field `(dr, dc)` away, if it is still on the board.
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if is_in_bounds(row, col) {
            Some(Self::new(row as u8, col as u8))
        } else {
            None
        }
    }

    pub fn from_algebraic(algebraic: &str) -> Result<Self, ChessError> {
        let invalid = || ChessError::InvalidSquare(algebraic.to_string());
        let bytes = algebraic.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let (file, rank) = (bytes[0], bytes[1]);
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }
        Ok(Self {
            row: b'8' - rank,
            col: file - b'a',
        })
    }

    pub fn as_algebraic(&self) -> String {
        to_algebraic_square(self.row, self.col)
    }
}

impl fmt::Display for ChessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_algebraic())
    }
}

impl FromStr for ChessField {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_algebraic(s)
    }
}

/// A source/destination pair. Move generation itself only yields destinations;
/// collaborators pair them with the square they were generated from.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct Move {
    pub from: ChessField,
    pub to: ChessField,
}

impl Move {
    pub fn new(from_row: u8, from_col: u8, to_row: u8, to_col: u8) -> Self {
        Self {
            from: ChessField::new(from_row, from_col),
            to: ChessField::new(to_row, to_col),
        }
    }

    pub fn between(from: ChessField, to: ChessField) -> Self {
        Self { from, to }
    }

    pub fn as_algebraic(&self) -> String {
        format!("{}{}", self.from.as_algebraic(), self.to.as_algebraic())
    }

    pub fn from_algebraic(algebraic: &str) -> Result<Self, ChessError> {
        if algebraic.len() != 4 || !algebraic.is_ascii() {
            return Err(ChessError::InvalidSquare(algebraic.to_string()));
        }
        Ok(Self {
            from: ChessField::from_algebraic(&algebraic[0..2])?,
            to: ChessField::from_algebraic(&algebraic[2..4])?,
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_algebraic())
    }
}

pub fn is_in_bounds(row: i8, col: i8) -> bool {
    (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col)
}

pub fn to_algebraic_square(row: u8, col: u8) -> String {
    let file = (b'a' + col) as char;
    let rank = BOARD_SIZE - row;
    format!("{}{}", file, rank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[test]
    fn piece_codes_parse() {
        assert_eq!("wp".parse::<Piece>(), Ok(Piece::new(Color::White, PieceType::Pawn)));
        assert_eq!("bk".parse::<Piece>(), Ok(Piece::new(Color::Black, PieceType::King)));
        assert!("wx".parse::<Piece>().is_err());
        assert!("xp".parse::<Piece>().is_err());
        assert!("wpp".parse::<Piece>().is_err());
        assert_eq!("".parse::<Square>(), Ok(Square::Empty));
    }

    #[test]
    fn algebraic_names_follow_board_orientation() {
        assert_eq!(ChessField::from_algebraic("a8"), Ok(ChessField::new(0, 0)));
        assert_eq!(ChessField::from_algebraic("a1"), Ok(ChessField::new(7, 0)));
        assert_eq!(ChessField::from_algebraic("e2"), Ok(ChessField::new(6, 4)));
        assert_eq!(ChessField::new(6, 4).as_algebraic(), "e2");
        assert!(ChessField::from_algebraic("i1").is_err());
        assert!(ChessField::from_algebraic("a9").is_err());
        assert!(ChessField::from_algebraic("a").is_err());
        assert_eq!(Move::from_algebraic("e2e4").map(|m| m.as_algebraic()), Ok("e2e4".to_string()));
    }

    #[test]
    fn offsets_never_leave_the_board() {
        assert_eq!(ChessField::new(0, 0).offset(-1, 0), None);
        assert_eq!(ChessField::new(7, 7).offset(0, 1), None);
        assert_eq!(ChessField::new(3, 3).offset(2, -1), Some(ChessField::new(5, 2)));
    }

    #[proptest]
    fn piece_code_is_accepted_back(p: Piece) {
        assert_eq!(p.code().parse::<Piece>(), Ok(p));
        assert_eq!(Piece::from_char(p.to_char()), Some(p));
    }

    #[proptest]
    fn field_name_is_accepted_back(f: ChessField) {
        assert_eq!(ChessField::from_algebraic(&f.as_algebraic()), Ok(f));
    }

    #[proptest]
    fn color_opposite_is_an_involution(c: Color) {
        assert_ne!(c.opposite(), c);
        assert_eq!(c.opposite().opposite(), c);
    }
}
