//! Squares, colors, pieces and castling rights

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoordParseError {
    #[error("square must be two chars long")]
    BadLength,
    #[error("bad file {0:?}")]
    BadFile(char),
    #[error("bad rank {0:?}")]
    BadRank(char),
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CastlingRightsParseError {
    #[error("empty castling field")]
    Empty,
    #[error("bad castling char {0:?}")]
    BadChar(char),
    #[error("castling char {0:?} given twice")]
    Repeated(char),
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl File {
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Panics if `val` is not below 8
    pub const fn from_index(val: usize) -> File {
        Self::ALL[val]
    }

    pub fn iter() -> impl Iterator<Item = File> {
        Self::ALL.into_iter()
    }

    pub fn from_char(c: char) -> Option<File> {
        let idx = (c as u32).wrapping_sub('a' as u32) as usize;
        Self::ALL.get(idx).copied()
    }

    pub fn as_char(&self) -> char {
        (b'a' + *self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Board rank, numbered from the top of the board
///
/// Index 0 is the eighth rank, so that square indices grow rank by rank starting from a8.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum Rank {
    R8,
    R7,
    R6,
    R5,
    R4,
    R3,
    R2,
    R1,
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::R8,
        Rank::R7,
        Rank::R6,
        Rank::R5,
        Rank::R4,
        Rank::R3,
        Rank::R2,
        Rank::R1,
    ];

    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Panics if `val` is not below 8
    pub const fn from_index(val: usize) -> Rank {
        Self::ALL[val]
    }

    /// Iterates from the eighth rank down to the first one
    pub fn iter() -> impl Iterator<Item = Rank> {
        Self::ALL.into_iter()
    }

    pub fn from_char(c: char) -> Option<Rank> {
        let idx = ('8' as u32).wrapping_sub(c as u32) as usize;
        Self::ALL.get(idx).copied()
    }

    pub fn as_char(&self) -> char {
        (b'8' - *self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Square on the board
///
/// Squares are numbered from 0 (a8) to 63 (h1), rank by rank.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord(u8);

impl Coord {
    /// Panics if `val` is not below 64
    pub const fn from_index(val: usize) -> Coord {
        assert!(val < 64, "square index out of range");
        Coord(val as u8)
    }

    pub const fn from_parts(file: File, rank: Rank) -> Coord {
        Coord(rank as u8 * 8 + file as u8)
    }

    pub const fn file(&self) -> File {
        File::from_index(self.0 as usize % 8)
    }

    pub const fn rank(&self) -> Rank {
        Rank::from_index(self.0 as usize / 8)
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Adds `delta` to the square index
    ///
    /// Panics if the result is not a valid square. No wrapping across files is detected, use
    /// [`Coord::try_shift`] when it matters.
    pub const fn add(self, delta: isize) -> Coord {
        Coord::from_index((self.index() as isize + delta) as usize)
    }

    /// Moves the square by the given number of files and ranks
    ///
    /// Returns `None` if the result falls off the board. Positive `delta_rank` moves towards the
    /// first rank.
    pub fn try_shift(self, delta_file: isize, delta_rank: isize) -> Option<Coord> {
        let file = self.file().index() as isize + delta_file;
        let rank = self.rank().index() as isize + delta_rank;
        if !(0..8).contains(&file) || !(0..8).contains(&rank) {
            return None;
        }
        Some(Coord::from_parts(
            File::from_index(file as usize),
            Rank::from_index(rank as usize),
        ))
    }

    pub fn iter() -> impl Iterator<Item = Coord> {
        (0..64).map(Coord)
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({})", self)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Coord, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Ok(Coord::from_parts(
                File::from_char(file).ok_or(CoordParseError::BadFile(file))?,
                Rank::from_char(rank).ok_or(CoordParseError::BadRank(rank))?,
            )),
            _ => Err(CoordParseError::BadLength),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const fn index(&self) -> usize {
        *self as usize
    }

    pub const fn inv(&self) -> Color {
        match *self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Letter of the side to move in FEN
    pub fn as_char(&self) -> char {
        match *self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "white",
            Color::Black => "black",
        })
    }
}

/// Piece kind without color
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    pub const COUNT: usize = 6;
    pub const ALL: [Piece; Self::COUNT] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Panics if `val` is not below [`Piece::COUNT`]
    pub const fn from_index(val: usize) -> Piece {
        Self::ALL[val]
    }

    pub fn iter() -> impl Iterator<Item = Piece> {
        Self::ALL.into_iter()
    }

    /// Lowercase letter of the piece, as used in move notation
    pub fn as_char(&self) -> char {
        CELL_CHARS[Piece::COUNT + self.index()] as char
    }
}

const CELL_CHARS: &[u8; Cell::MAX_INDEX] = b"PNBRQKpnbrqk.";

/// Contents of a square: one of the twelve colored pieces or nothing
///
/// White pieces have indices 0 to 5 and black pieces 6 to 11, both in the order of [`Piece`].
/// The empty cell has index 12.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell(u8);

impl Cell {
    pub const EMPTY: Cell = Cell(12);
    /// Number of non-empty cells
    pub const COUNT: usize = 12;
    /// Number of cells, empty one included
    pub const MAX_INDEX: usize = 13;

    pub const fn is_empty(&self) -> bool {
        self.0 == Self::EMPTY.0
    }

    pub const fn is_occupied(&self) -> bool {
        !self.is_empty()
    }

    /// Panics if `val` is not below [`Cell::MAX_INDEX`]
    pub const fn from_index(val: usize) -> Cell {
        assert!(val < Self::MAX_INDEX, "cell index out of range");
        Cell(val as u8)
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    pub const fn from_parts(c: Color, p: Piece) -> Cell {
        Cell((c.index() * Piece::COUNT + p.index()) as u8)
    }

    pub const fn color(&self) -> Option<Color> {
        match self.0 as usize / Piece::COUNT {
            0 => Some(Color::White),
            1 => Some(Color::Black),
            _ => None,
        }
    }

    pub const fn piece(&self) -> Option<Piece> {
        if self.is_empty() {
            None
        } else {
            Some(Piece::from_index(self.0 as usize % Piece::COUNT))
        }
    }

    /// Iterates over all cells, the empty one last
    pub fn iter() -> impl Iterator<Item = Cell> {
        (0..Self::MAX_INDEX as u8).map(Cell)
    }

    /// FEN letter of the piece, or `.` for the empty cell
    pub fn as_char(&self) -> char {
        CELL_CHARS[self.index()] as char
    }

    /// Parses a FEN piece letter, or `.` for the empty cell
    pub fn from_char(c: char) -> Option<Cell> {
        let b = u8::try_from(c).ok()?;
        let idx = CELL_CHARS.iter().position(|&x| x == b)?;
        Some(Cell(idx as u8))
    }
}

impl Default for Cell {
    fn default() -> Cell {
        Cell::EMPTY
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({})", self.as_char())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastlingSide {
    King,
    Queen,
}

/// FEN letters of the castling rights, in bit order
const CASTLING_CHARS: [(char, Color, CastlingSide); 4] = [
    ('K', Color::White, CastlingSide::King),
    ('Q', Color::White, CastlingSide::Queen),
    ('k', Color::Black, CastlingSide::King),
    ('q', Color::Black, CastlingSide::Queen),
];

/// Castling rights packed into four bits
///
/// Bit 0 is white kingside, bit 1 white queenside, bit 2 black kingside and bit 3 black
/// queenside.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const EMPTY: CastlingRights = CastlingRights(0);
    pub const FULL: CastlingRights = CastlingRights(0b1111);

    const fn bit(c: Color, s: CastlingSide) -> u8 {
        1 << (c as u8 * 2 + s as u8)
    }

    pub const fn has(&self, c: Color, s: CastlingSide) -> bool {
        self.0 & Self::bit(c, s) != 0
    }

    pub const fn with(self, c: Color, s: CastlingSide) -> CastlingRights {
        CastlingRights(self.0 | Self::bit(c, s))
    }

    pub fn set(&mut self, c: Color, s: CastlingSide) {
        self.0 |= Self::bit(c, s);
    }

    pub fn unset(&mut self, c: Color, s: CastlingSide) {
        self.0 &= !Self::bit(c, s);
    }

    /// Keeps only the rights whose bits are set in `mask`
    pub fn retain(&mut self, mask: u8) {
        self.0 &= mask;
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastlingRights({})", self)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::EMPTY {
            return f.write_str("-");
        }
        for (ch, c, s) in CASTLING_CHARS {
            if self.has(c, s) {
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}

impl FromStr for CastlingRights {
    type Err = CastlingRightsParseError;

    fn from_str(s: &str) -> Result<CastlingRights, Self::Err> {
        match s {
            "" => return Err(CastlingRightsParseError::Empty),
            "-" => return Ok(CastlingRights::EMPTY),
            _ => {}
        }
        s.chars().try_fold(CastlingRights::EMPTY, |res, ch| {
            let &(_, c, side) = CASTLING_CHARS
                .iter()
                .find(|(x, _, _)| *x == ch)
                .ok_or(CastlingRightsParseError::BadChar(ch))?;
            if res.has(c, side) {
                return Err(CastlingRightsParseError::Repeated(ch));
            }
            Ok(res.with(c, side))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord() {
        let mut coords = Vec::new();
        for rank in Rank::iter() {
            for file in File::iter() {
                let coord = Coord::from_parts(file, rank);
                assert_eq!(coord.file(), file);
                assert_eq!(coord.rank(), rank);
                coords.push(coord);
            }
        }
        assert_eq!(coords, Coord::iter().collect::<Vec<_>>());
        assert_eq!(Coord::from_parts(File::A, Rank::R8).index(), 0);
        assert_eq!(Coord::from_parts(File::H, Rank::R1).index(), 63);

        let e4 = Coord::from_parts(File::E, Rank::R4);
        assert_eq!(e4.add(-8), Coord::from_parts(File::E, Rank::R5));
        assert_eq!(e4.try_shift(1, -2), Some(Coord::from_parts(File::F, Rank::R6)));
        assert_eq!(e4.try_shift(-4, 3), Some(Coord::from_parts(File::A, Rank::R1)));
        assert_eq!(e4.try_shift(-5, 0), None);
        assert_eq!(e4.try_shift(0, 4), None);
        assert_eq!(Coord::from_index(7).try_shift(1, 0), None);
    }

    #[test]
    fn test_file_rank_chars() {
        assert_eq!(File::iter().map(|f| f.as_char()).collect::<String>(), "abcdefgh");
        assert_eq!(Rank::iter().map(|r| r.as_char()).collect::<String>(), "87654321");
        assert_eq!(File::from_char('c'), Some(File::C));
        assert_eq!(File::from_char('i'), None);
        assert_eq!(File::from_char('A'), None);
        assert_eq!(Rank::from_char('1'), Some(Rank::R1));
        assert_eq!(Rank::from_char('0'), None);
        assert_eq!(Rank::from_char('9'), None);
        assert_eq!(Rank::from_index(3), Rank::R5);
    }

    #[test]
    fn test_cell() {
        assert_eq!(Cell::EMPTY.color(), None);
        assert_eq!(Cell::EMPTY.piece(), None);
        assert_eq!(Cell::EMPTY.index(), 12);
        assert_eq!(Cell::default(), Cell::EMPTY);
        let mut cells = Vec::new();
        for color in [Color::White, Color::Black] {
            for piece in Piece::iter() {
                let cell = Cell::from_parts(color, piece);
                assert_eq!(cell.color(), Some(color));
                assert_eq!(cell.piece(), Some(piece));
                cells.push(cell);
            }
        }
        cells.push(Cell::EMPTY);
        assert_eq!(cells, Cell::iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_cell_chars() {
        assert_eq!(
            Cell::iter().map(|c| c.as_char()).collect::<String>(),
            "PNBRQKpnbrqk."
        );
        assert_eq!(
            Piece::iter().map(|p| p.as_char()).collect::<String>(),
            "pnbrqk"
        );
        for cell in Cell::iter() {
            assert_eq!(Cell::from_char(cell.as_char()), Some(cell));
        }
        assert_eq!(Cell::from_char('x'), None);
        assert_eq!(Cell::from_char('♔'), None);
    }

    #[test]
    fn test_color() {
        assert_eq!(Color::White.inv(), Color::Black);
        assert_eq!(Color::from_char('b'), Some(Color::Black));
        assert_eq!(Color::from_char('B'), None);
        assert_eq!(Color::Black.as_char(), 'b');
        assert_eq!(Color::White.to_string(), "white");
    }

    #[test]
    fn test_castling() {
        let empty = CastlingRights::EMPTY;
        for (_, c, s) in CASTLING_CHARS {
            assert!(!empty.has(c, s));
            assert!(CastlingRights::FULL.has(c, s));
        }
        assert_eq!(empty.to_string(), "-");
        assert_eq!(CastlingRights::from_str("-"), Ok(empty));
        assert_eq!(CastlingRights::FULL.to_string(), "KQkq");
        assert_eq!(CastlingRights::from_str("KQkq"), Ok(CastlingRights::FULL));
        assert_eq!(CastlingRights::from_str("qK").unwrap().to_string(), "Kq");

        assert_eq!(CastlingRights::from_str("K").unwrap().index(), 1);
        assert_eq!(CastlingRights::from_str("Q").unwrap().index(), 2);
        assert_eq!(CastlingRights::from_str("k").unwrap().index(), 4);
        assert_eq!(CastlingRights::from_str("q").unwrap().index(), 8);

        let mut rights = CastlingRights::FULL;
        rights.retain(12);
        assert_eq!(rights.to_string(), "kq");
        rights.unset(Color::Black, CastlingSide::King);
        assert_eq!(rights.to_string(), "q");
        rights.set(Color::White, CastlingSide::Queen);
        assert_eq!(rights.to_string(), "Qq");

        assert_eq!(
            CastlingRights::from_str(""),
            Err(CastlingRightsParseError::Empty)
        );
        assert_eq!(
            CastlingRights::from_str("KK"),
            Err(CastlingRightsParseError::Repeated('K'))
        );
        assert_eq!(
            CastlingRights::from_str("Kx"),
            Err(CastlingRightsParseError::BadChar('x'))
        );
    }

    #[test]
    fn test_coord_str() {
        assert_eq!(Coord::from_parts(File::B, Rank::R4).to_string(), "b4");
        assert_eq!(Coord::from_str("a1"), Ok(Coord::from_parts(File::A, Rank::R1)));
        assert_eq!(Coord::from_str("h9"), Err(CoordParseError::BadRank('9')));
        assert_eq!(Coord::from_str("i4"), Err(CoordParseError::BadFile('i')));
        assert_eq!(Coord::from_str("e"), Err(CoordParseError::BadLength));
        assert_eq!(Coord::from_str("e44"), Err(CoordParseError::BadLength));
        assert_eq!(Coord::from_str("é4"), Err(CoordParseError::BadFile('é')));
        for c in Coord::iter() {
            assert_eq!(Coord::from_str(&c.to_string()), Ok(c));
        }
    }
}
