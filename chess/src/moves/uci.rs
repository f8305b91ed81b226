//! Utilities to work with moves in coordinate notation, as used by UCI

use super::base::{self, PromotePiece};
use crate::attack::AttackTables;
use crate::board::Board;
use crate::movegen;
use crate::types::{Cell, Coord, CoordParseError};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing the textual form of a move
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawParseError {
    /// Bad string length
    #[error("bad string length")]
    BadLength,
    /// Bad source square
    #[error("bad source: {0}")]
    BadSrc(CoordParseError),
    /// Bad destination square
    #[error("bad destination: {0}")]
    BadDst(CoordParseError),
    /// Bad promote character
    #[error("bad promote char {0:?}")]
    BadPromote(char),
}

/// Error parsing a move in the given position
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseError {
    /// Error parsing move
    #[error("cannot parse move: {0}")]
    Parse(#[from] RawParseError),
    /// The move is well-formed, but is not pseudo-legal in the position
    #[error("no such move: {0}")]
    NoSuchMove(Move),
}

/// Parsed move in coordinate notation, not bound to any position
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    /// Source square
    pub src: Coord,
    /// Destination square
    pub dst: Coord,
    /// Piece to promote, if any
    pub promote: Option<PromotePiece>,
}

impl Move {
    /// Finds the corresponding pseudo-legal move in position `b`
    pub fn into_move(self, tables: &AttackTables, b: &Board) -> Result<base::Move, ParseError> {
        let promoted = self.promote.map_or(Cell::EMPTY, |p| p.cell(b.side()));
        movegen::generate(tables, b)
            .search(self.src, self.dst, promoted)
            .ok_or(ParseError::NoSuchMove(self))
    }
}

impl From<base::Move> for Move {
    #[inline]
    fn from(mv: base::Move) -> Move {
        Move {
            src: mv.src(),
            dst: mv.dst(),
            promote: mv
                .promoted()
                .piece()
                .and_then(|p| PromotePiece::try_from(p).ok()),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        if let Some(p) = self.promote {
            write!(f, "{}", p.piece().as_char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = RawParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        if !s.is_ascii() || !matches!(s.len(), 4 | 5) {
            return Err(RawParseError::BadLength);
        }
        let src = Coord::from_str(&s[0..2]).map_err(RawParseError::BadSrc)?;
        let dst = Coord::from_str(&s[2..4]).map_err(RawParseError::BadDst)?;
        let promote = if s.len() == 5 {
            // Either case is accepted, the color is taken from the position.
            Some(match s.as_bytes()[4].to_ascii_lowercase() {
                b'n' => PromotePiece::Knight,
                b'b' => PromotePiece::Bishop,
                b'r' => PromotePiece::Rook,
                b'q' => PromotePiece::Queen,
                _ => return Err(RawParseError::BadPromote(s.as_bytes()[4] as char)),
            })
        } else {
            None
        };
        Ok(Move { src, dst, promote })
    }
}

/// Parses `text` and finds the corresponding pseudo-legal move in position `b`
pub fn parse(text: &str, tables: &AttackTables, b: &Board) -> Result<base::Move, ParseError> {
    Move::from_str(text)?.into_move(tables, b)
}
