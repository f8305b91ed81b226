//! FEN parsing and formatting
//!
//! The parser produces a [`RawBoard`], a neutral description of the position which is not
//! validated in any way. It is turned into a [`Board`](crate::board::Board) afterwards.

use crate::types::{
    CastlingRights, CastlingRightsParseError, Cell, Color, Coord, CoordParseError, File, Piece,
    Rank,
};

use std::fmt::{self, Display, Write};
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// Field of a FEN record
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Field {
    Placement,
    Side,
    Castling,
    Enpassant,
    HalfMoves,
    FullMoves,
}

impl Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Placement => "piece placement",
            Field::Side => "side to move",
            Field::Castling => "castling",
            Field::Enpassant => "en passant",
            Field::HalfMoves => "half-move clock",
            Field::FullMoves => "full-move number",
        })
    }
}

/// Error in the piece placement field
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PlacementError {
    #[error("expected 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {rank} covers {width} squares instead of 8")]
    RankWidth { rank: Rank, width: usize },
    #[error("bad piece char {0:?}")]
    BadChar(char),
}

/// Error parsing [`RawBoard`] from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawFenParseError {
    #[error("non-ASCII data in FEN")]
    NonAscii,
    #[error("{0} field is missing")]
    Missing(Field),
    #[error("bad piece placement: {0}")]
    Placement(#[from] PlacementError),
    #[error("bad side to move {0:?}")]
    Side(String),
    #[error("bad castling rights: {0}")]
    Castling(#[from] CastlingRightsParseError),
    #[error("bad en passant square: {0}")]
    Enpassant(#[from] CoordParseError),
    #[error("bad {0}: {1}")]
    Counter(Field, ParseIntError),
    #[error("unexpected data after the full-move number")]
    ExtraData,
}

/// Neutral board description
///
/// This is what the FEN parser produces. Unlike [`Board`](crate::board::Board), it holds the
/// position square by square and is not required to be consistent in any way.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RawBoard {
    /// Contents of the board, indexed by [`Coord::index()`]
    pub cells: [Cell; 64],
    /// Side to move
    pub side: Color,
    pub castling: CastlingRights,
    /// En passant target square, i.e. the square a capturing pawn moves to
    pub enpassant: Option<Coord>,
    /// Number of half-moves without pawn moves or captures
    pub half_moves: u16,
    pub full_moves: u16,
}

const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

impl RawBoard {
    /// Returns a board without pieces, white to move
    pub const fn empty() -> RawBoard {
        RawBoard {
            cells: [Cell::EMPTY; 64],
            side: Color::White,
            castling: CastlingRights::EMPTY,
            enpassant: None,
            half_moves: 0,
            full_moves: 1,
        }
    }

    /// Returns a board with the initial position
    pub fn initial() -> RawBoard {
        let mut res = RawBoard {
            castling: CastlingRights::FULL,
            ..RawBoard::empty()
        };
        for (file, piece) in File::iter().zip(BACK_RANK) {
            for (color, back, front) in [
                (Color::White, Rank::R1, Rank::R2),
                (Color::Black, Rank::R8, Rank::R7),
            ] {
                res.put(Coord::from_parts(file, back), Cell::from_parts(color, piece));
                res.put(
                    Coord::from_parts(file, front),
                    Cell::from_parts(color, Piece::Pawn),
                );
            }
        }
        res
    }

    /// Parses a board from FEN
    ///
    /// Fields may be separated by any ASCII whitespace. The half-move clock and the full-move
    /// number may be omitted, they default to 0 and 1.
    pub fn from_fen(fen: &str) -> Result<RawBoard, RawFenParseError> {
        RawBoard::from_str(fen)
    }

    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.cells[c.index()]
    }

    #[inline]
    pub fn put(&mut self, c: Coord, cell: Cell) {
        self.cells[c.index()] = cell;
    }

    /// Wraps the board to allow pretty-printing with the given style
    ///
    /// # Example
    ///
    /// ```
    /// # use magicmove::{RawBoard, fen::PrettyStyle};
    /// #
    /// let r = RawBoard::initial();
    ///
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    /// W|abcdefgh
    /// "#;
    /// assert_eq!(r.pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
    /// ```
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { raw: self, style }
    }

    /// Converts the board into a FEN string
    pub fn as_fen(&self) -> String {
        self.to_string()
    }

    fn ranks(&self) -> impl Iterator<Item = (Rank, &[Cell])> {
        Rank::iter().zip(self.cells.chunks_exact(8))
    }
}

impl Default for RawBoard {
    fn default() -> RawBoard {
        RawBoard::empty()
    }
}

fn parse_placement(s: &str) -> Result<[Cell; 64], PlacementError> {
    let count = s.split('/').count();
    if count != 8 {
        return Err(PlacementError::RankCount(count));
    }

    let mut cells = [Cell::EMPTY; 64];
    for (rank, row) in Rank::iter().zip(s.split('/')) {
        let mut width = 0;
        for ch in row.chars() {
            if let Some(skip @ 1..=8) = ch.to_digit(10) {
                width += skip as usize;
                continue;
            }
            let cell = Cell::from_char(ch)
                .filter(Cell::is_occupied)
                .ok_or(PlacementError::BadChar(ch))?;
            if let Some(&file) = File::ALL.get(width) {
                cells[Coord::from_parts(file, rank).index()] = cell;
            }
            width += 1;
        }
        if width != 8 {
            return Err(PlacementError::RankWidth { rank, width });
        }
    }
    Ok(cells)
}

fn parse_side(s: &str) -> Result<Color, RawFenParseError> {
    let mut chars = s.chars();
    let side = match (chars.next(), chars.next()) {
        (Some(c), None) => Color::from_char(c),
        _ => None,
    };
    side.ok_or_else(|| RawFenParseError::Side(s.to_owned()))
}

fn parse_counter(s: Option<&str>, field: Field, default: u16) -> Result<u16, RawFenParseError> {
    s.map_or(Ok(default), |s| {
        s.parse::<u16>()
            .map_err(|e| RawFenParseError::Counter(field, e))
    })
}

impl FromStr for RawBoard {
    type Err = RawFenParseError;

    fn from_str(s: &str) -> Result<RawBoard, Self::Err> {
        if !s.is_ascii() {
            return Err(RawFenParseError::NonAscii);
        }
        let mut fields = s.split_ascii_whitespace();
        let mut next = |field| fields.next().ok_or(RawFenParseError::Missing(field));

        let cells = parse_placement(next(Field::Placement)?)?;
        let side = parse_side(next(Field::Side)?)?;
        let castling = CastlingRights::from_str(next(Field::Castling)?)?;
        let enpassant = match next(Field::Enpassant)? {
            "-" => None,
            sq => Some(Coord::from_str(sq)?),
        };
        let half_moves = parse_counter(fields.next(), Field::HalfMoves, 0)?;
        let full_moves = parse_counter(fields.next(), Field::FullMoves, 1)?;
        if fields.next().is_some() {
            return Err(RawFenParseError::ExtraData);
        }

        Ok(RawBoard {
            cells,
            side,
            castling,
            enpassant,
            half_moves,
            full_moves,
        })
    }
}

impl Display for RawBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, row) in self.ranks() {
            if rank != Rank::R8 {
                f.write_char('/')?;
            }
            let mut gap = 0;
            for cell in row {
                if cell.is_empty() {
                    gap += 1;
                    continue;
                }
                if gap != 0 {
                    write!(f, "{}", gap)?;
                    gap = 0;
                }
                f.write_char(cell.as_char())?;
            }
            if gap != 0 {
                write!(f, "{}", gap)?;
            }
        }
        write!(f, " {} {} ", self.side.as_char(), self.castling)?;
        match self.enpassant {
            Some(sq) => write!(f, "{}", sq)?,
            None => f.write_char('-')?,
        }
        write!(f, " {} {}", self.half_moves, self.full_moves)
    }
}

/// Style for [`RawBoard::pretty()`] and [`Board::pretty()`](crate::board::Board::pretty)
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Compact grid with rank labels, file letters and the side to move in the corner
    Ascii,
    /// Boxed grid followed by the side to move, castling rights, en passant square and move
    /// number
    Framed,
}

/// Wrapper to pretty-print the board
pub struct Pretty<'a> {
    raw: &'a RawBoard,
    style: PrettyStyle,
}

impl Pretty<'_> {
    fn fmt_ascii(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, row) in self.raw.ranks() {
            write!(f, "{}|", rank)?;
            for cell in row {
                f.write_char(cell.as_char())?;
            }
            writeln!(f)?;
        }
        writeln!(f, "-+--------")?;
        let corner = match self.raw.side {
            Color::White => 'W',
            Color::Black => 'B',
        };
        writeln!(f, "{}|abcdefgh", corner)
    }

    fn fmt_framed(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SEPARATOR: &str = "    +---+---+---+---+---+---+---+---+";
        writeln!(f, "{}", SEPARATOR)?;
        for (rank, row) in self.raw.ranks() {
            write!(f, "  {} |", rank)?;
            for cell in row {
                let ch = if cell.is_empty() { ' ' } else { cell.as_char() };
                write!(f, " {} |", ch)?;
            }
            writeln!(f)?;
            writeln!(f, "{}", SEPARATOR)?;
        }
        writeln!(f, "      a   b   c   d   e   f   g   h")?;
        writeln!(f)?;
        let r = self.raw;
        writeln!(f, "{:>19} {}", "Side to move:", r.side)?;
        writeln!(f, "{:>19} {}", "Castling:", r.castling)?;
        match r.enpassant {
            Some(sq) => writeln!(f, "{:>19} {}", "Enpassant:", sq)?,
            None => writeln!(f, "{:>19} -", "Enpassant:")?,
        }
        writeln!(f, "{:>19} {}", "Full moves:", r.full_moves)
    }
}

impl Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            PrettyStyle::Ascii => self.fmt_ascii(f),
            PrettyStyle::Framed => self.fmt_framed(f),
        }
    }
}
