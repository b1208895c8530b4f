use super::{ChessBoard, ChessField, Square};

pub fn assert_moves<I: IntoIterator<Item = ChessField>>(generated: I, mut expected: Vec<&str>) {
    let mut generated_converted: Vec<_> = generated.into_iter().map(|f| f.as_algebraic()).collect();
    generated_converted.sort();
    expected.sort();

    assert_eq!(generated_converted, expected);
}

impl ChessBoard {
    pub fn moves_from_algebraic(&self, square: &str) -> Vec<ChessField> {
        self.moves_from(ChessField::from_algebraic(square).unwrap())
    }

    pub fn moves_for_algebraic(&self, code: &str, square: &str) -> Vec<ChessField> {
        let field = ChessField::from_algebraic(square).unwrap();
        self.moves_for(code.parse::<Square>().unwrap(), field.row, field.col)
    }
}
