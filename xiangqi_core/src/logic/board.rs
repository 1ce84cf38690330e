use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;
use std::fmt;
use std::ops::{Index, IndexMut};

pub const ROWS: usize = 10;
pub const COLS: usize = 9;
pub const SQUARES: usize = ROWS * COLS;

/// The side a piece belongs to. Black owns rows 0-4, Red owns rows 5-9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Black => 1,
        }
    }

    /// Row delta of a forward step.
    pub const fn forward(self) -> isize {
        match self {
            Self::Red => -1,
            Self::Black => 1,
        }
    }

    pub const fn owns_row(self, row: usize) -> bool {
        match self {
            Self::Red => row >= 5,
            Self::Black => row <= 4,
        }
    }

    pub const fn in_palace(self, pos: Position) -> bool {
        if pos.col < 3 || pos.col > 5 {
            return false;
        }
        match self {
            Self::Red => pos.row >= 7,
            Self::Black => pos.row <= 2,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => f.pad("Red"),
            Self::Black => f.pad("Black"),
        }
    }
}

/// A pair of values, one per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BySide<T> {
    pub red: T,
    pub black: T,
}

impl<T> Index<Color> for BySide<T> {
    type Output = T;

    fn index(&self, color: Color) -> &T {
        match color {
            Color::Red => &self.red,
            Color::Black => &self.black,
        }
    }
}

impl<T> IndexMut<Color> for BySide<T> {
    fn index_mut(&mut self, color: Color) -> &mut T {
        match color {
            Color::Red => &mut self.red,
            Color::Black => &mut self.black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    #[serde(rename = "king", alias = "general")]
    General = 0,
    Advisor = 1,
    Elephant = 2,
    Horse = 3,
    Chariot = 4,
    Cannon = 5,
    Soldier = 6,
}

impl PieceType {
    pub const fn index(self) -> usize {
        self as usize
    }

    const fn fen_char(self) -> char {
        match self {
            Self::General => 'k',
            Self::Advisor => 'a',
            Self::Elephant => 'b',
            Self::Horse => 'n',
            Self::Chariot => 'r',
            Self::Cannon => 'c',
            Self::Soldier => 'p',
        }
    }

    fn from_fen_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'k' => Some(Self::General),
            'a' => Some(Self::Advisor),
            'b' | 'e' => Some(Self::Elephant),
            'n' | 'h' => Some(Self::Horse),
            'r' => Some(Self::Chariot),
            'c' => Some(Self::Cannon),
            'p' => Some(Self::Soldier),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    #[serde(rename = "type")]
    pub piece_type: PieceType,
    #[serde(rename = "side")]
    pub color: Color,
}

impl Piece {
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Self { piece_type, color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Option<Self> {
        if row < ROWS && col < COLS {
            Some(Self { row, col })
        } else {
            None
        }
    }

    #[must_use]
    pub const fn offset(self, d_row: isize, d_col: isize) -> Option<Self> {
        let row = self.row as isize + d_row;
        let col = self.col as isize + d_col;
        if row < 0 || col < 0 {
            return None;
        }
        Self::new(row as usize, col as usize)
    }

    pub const fn index(self) -> usize {
        self.row * COLS + self.col
    }

    pub const fn from_index(sq: usize) -> Self {
        Self {
            row: sq / COLS,
            col: sq % COLS,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    MissingPlacement,
    WrongRankCount(usize),
    BadRank(usize),
    UnknownPiece(char),
    BadSide(String),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPlacement => write!(f, "FEN has no piece placement field"),
            Self::WrongRankCount(n) => write!(f, "FEN has {n} ranks, expected {ROWS}"),
            Self::BadRank(r) => write!(f, "FEN rank {r} does not describe {COLS} files"),
            Self::UnknownPiece(c) => write!(f, "unknown FEN piece letter '{c}'"),
            Self::BadSide(s) => write!(f, "unknown side to move '{s}'"),
        }
    }
}

impl std::error::Error for FenError {}

/// 10x9 mailbox. Row 0 is Black's back rank, row 9 is Red's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(with = "BigArray")]
    cells: [Option<Piece>; SQUARES],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard opening position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_pieces(Color::Black, 0, 2, 3);
        board.setup_pieces(Color::Red, 9, 7, 6);
        board
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cells: [None; SQUARES],
        }
    }

    fn setup_pieces(&mut self, color: Color, back_row: usize, cannon_row: usize, soldier_row: usize) {
        let back_rank = [
            PieceType::Chariot,
            PieceType::Horse,
            PieceType::Elephant,
            PieceType::Advisor,
            PieceType::General,
            PieceType::Advisor,
            PieceType::Elephant,
            PieceType::Horse,
            PieceType::Chariot,
        ];
        for (col, &pt) in back_rank.iter().enumerate() {
            self.place(back_row, col, Piece::new(pt, color));
        }
        self.place(cannon_row, 1, Piece::new(PieceType::Cannon, color));
        self.place(cannon_row, 7, Piece::new(PieceType::Cannon, color));
        for col in (0..COLS).step_by(2) {
            self.place(soldier_row, col, Piece::new(PieceType::Soldier, color));
        }
    }

    /// Places a piece by raw coordinates, ignoring out-of-range squares.
    pub fn place(&mut self, row: usize, col: usize, piece: Piece) {
        if let Some(pos) = Position::new(row, col) {
            self.set(pos, Some(piece));
        }
    }

    pub fn clear(&mut self) {
        self.cells = [None; SQUARES];
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.cells.get(pos.index()).copied().flatten()
    }

    #[must_use]
    pub fn piece_at(&self, row: usize, col: usize) -> Option<Piece> {
        Position::new(row, col).and_then(|pos| self.get(pos))
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        if let Some(cell) = self.cells.get_mut(pos.index()) {
            *cell = piece;
        }
    }

    /// Relocates whatever sits on `from` to `to` and returns the piece that
    /// was on `to`. The source cell is left empty.
    pub fn move_piece(&mut self, from: Position, to: Position) -> Option<Piece> {
        let moving = self.get(from);
        let captured = self.get(to);
        self.set(from, None);
        self.set(to, moving);
        captured
    }

    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(sq, cell)| match cell {
            Some(piece) if piece.color == color => Some((Position::from_index(sq), *piece)),
            _ => None,
        })
    }

    #[must_use]
    pub fn find_general(&self, color: Color) -> Option<Position> {
        self.pieces(color)
            .find(|(_, piece)| piece.piece_type == PieceType::General)
            .map(|(pos, _)| pos)
    }

    pub fn count(&self, piece: Piece) -> usize {
        self.cells.iter().filter(|cell| **cell == Some(piece)).count()
    }

    pub fn to_fen(&self, turn: Color) -> String {
        let mut fen = String::new();
        for row in 0..ROWS {
            let mut empty_count = 0;
            for col in 0..COLS {
                match self.piece_at(row, col) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        let c = piece.piece_type.fen_char();
                        fen.push(if piece.color == Color::Red {
                            c.to_ascii_uppercase()
                        } else {
                            c
                        });
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if row + 1 < ROWS {
                fen.push('/');
            }
        }
        fen.push(' ');
        fen.push(if turn == Color::Red { 'w' } else { 'b' });
        fen
    }

    /// Parses the placement and side-to-move fields of a Xiangqi FEN.
    /// A missing side field means Red to move.
    pub fn from_fen(fen: &str) -> Result<(Self, Color), FenError> {
        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or(FenError::MissingPlacement)?;
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != ROWS {
            return Err(FenError::WrongRankCount(ranks.len()));
        }

        let mut board = Self::empty();
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as usize;
                    continue;
                }
                let piece_type = PieceType::from_fen_char(c).ok_or(FenError::UnknownPiece(c))?;
                let color = if c.is_ascii_uppercase() {
                    Color::Red
                } else {
                    Color::Black
                };
                if col >= COLS {
                    return Err(FenError::BadRank(row));
                }
                board.place(row, col, Piece::new(piece_type, color));
                col += 1;
            }
            if col != COLS {
                return Err(FenError::BadRank(row));
            }
        }

        let turn = match fields.next() {
            None | Some("w" | "r") => Color::Red,
            Some("b") => Color::Black,
            Some(other) => return Err(FenError::BadSide(other.to_string())),
        };
        Ok((board, turn))
    }
}
