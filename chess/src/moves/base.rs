use crate::types::{Cell, Color, Coord, Piece};

use std::fmt;

/// Target piece for promotion
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PromotePiece {
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
}

impl PromotePiece {
    /// Promotions in the order they are generated
    pub const ALL: [PromotePiece; 4] = [
        PromotePiece::Queen,
        PromotePiece::Rook,
        PromotePiece::Bishop,
        PromotePiece::Knight,
    ];

    #[inline]
    pub const fn cell(self, c: Color) -> Cell {
        Cell::from_parts(c, self.piece())
    }

    #[inline]
    pub const fn piece(self) -> Piece {
        match self {
            PromotePiece::Knight => Piece::Knight,
            PromotePiece::Bishop => Piece::Bishop,
            PromotePiece::Rook => Piece::Rook,
            PromotePiece::Queen => Piece::Queen,
        }
    }
}

impl From<PromotePiece> for Piece {
    #[inline]
    fn from(p: PromotePiece) -> Self {
        p.piece()
    }
}

impl TryFrom<Piece> for PromotePiece {
    type Error = ();

    #[inline]
    fn try_from(p: Piece) -> Result<Self, Self::Error> {
        match p {
            Piece::Knight => Ok(PromotePiece::Knight),
            Piece::Bishop => Ok(PromotePiece::Bishop),
            Piece::Rook => Ok(PromotePiece::Rook),
            Piece::Queen => Ok(PromotePiece::Queen),
            _ => Err(()),
        }
    }
}

const SRC_MASK: u32 = 0x3f;
const DST_SHIFT: u32 = 6;
const PIECE_SHIFT: u32 = 12;
const PROMOTED_SHIFT: u32 = 16;
const CAPTURE_BIT: u32 = 1 << 20;
const DOUBLE_PUSH_BIT: u32 = 1 << 21;
const ENPASSANT_BIT: u32 = 1 << 22;
const CASTLING_BIT: u32 = 1 << 23;

/// Chess move packed into 32 bits
///
/// The layout is:
///
/// | bits  | meaning                          |
/// |-------|----------------------------------|
/// | 0-5   | source square                    |
/// | 6-11  | target square                    |
/// | 12-15 | moving piece                     |
/// | 16-19 | promoted piece                   |
/// | 20    | capture flag                     |
/// | 21    | double pawn push flag            |
/// | 22    | en passant flag                  |
/// | 23    | castling flag                    |
///
/// The promoted piece is stored shifted by one, so that zero in this field means no promotion.
///
/// A move is generated for a given position and carries no reference to it. Applying a move to
/// some other position leads to garbage on the board.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    /// Packs a move from its parts
    ///
    /// `promoted` is [`Cell::EMPTY`] for moves which are not promotions.
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub const fn encode(
        src: Coord,
        dst: Coord,
        piece: Cell,
        promoted: Cell,
        capture: bool,
        double_push: bool,
        enpassant: bool,
        castling: bool,
    ) -> Move {
        let promoted = ((promoted.index() + 1) % Cell::MAX_INDEX) as u32;
        Move(
            src.index() as u32
                | (dst.index() as u32) << DST_SHIFT
                | (piece.index() as u32) << PIECE_SHIFT
                | promoted << PROMOTED_SHIFT
                | if capture { CAPTURE_BIT } else { 0 }
                | if double_push { DOUBLE_PUSH_BIT } else { 0 }
                | if enpassant { ENPASSANT_BIT } else { 0 }
                | if castling { CASTLING_BIT } else { 0 },
        )
    }

    /// Quiet move without any flags
    #[inline]
    pub const fn quiet(src: Coord, dst: Coord, piece: Cell) -> Move {
        Move::encode(src, dst, piece, Cell::EMPTY, false, false, false, false)
    }

    /// Plain capture without any other flags
    #[inline]
    pub const fn capture(src: Coord, dst: Coord, piece: Cell) -> Move {
        Move::encode(src, dst, piece, Cell::EMPTY, true, false, false, false)
    }

    #[inline]
    pub const fn as_raw(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn src(&self) -> Coord {
        Coord::from_index((self.0 & SRC_MASK) as usize)
    }

    #[inline]
    pub const fn dst(&self) -> Coord {
        Coord::from_index(((self.0 >> DST_SHIFT) & SRC_MASK) as usize)
    }

    #[inline]
    pub const fn piece(&self) -> Cell {
        Cell::from_index(((self.0 >> PIECE_SHIFT) & 0xf) as usize)
    }

    /// Returns the cell the pawn is promoted to, or [`Cell::EMPTY`] if the move is not a promotion
    #[inline]
    pub const fn promoted(&self) -> Cell {
        match (self.0 >> PROMOTED_SHIFT) & 0xf {
            0 => Cell::EMPTY,
            x => Cell::from_index(x as usize - 1),
        }
    }

    #[inline]
    pub const fn is_promote(&self) -> bool {
        (self.0 >> PROMOTED_SHIFT) & 0xf != 0
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.0 & CAPTURE_BIT != 0
    }

    #[inline]
    pub const fn is_double_push(&self) -> bool {
        self.0 & DOUBLE_PUSH_BIT != 0
    }

    #[inline]
    pub const fn is_enpassant(&self) -> bool {
        self.0 & ENPASSANT_BIT != 0
    }

    #[inline]
    pub const fn is_castling(&self) -> bool {
        self.0 & CASTLING_BIT != 0
    }
}

impl fmt::Display for Move {
    /// Formats the move in coordinate notation, like `e2e4` or `e7e8q`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src(), self.dst())?;
        if let Some(p) = self.promoted().piece() {
            write!(f, "{}", p.as_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Move({}", self)?;
        if self.is_capture() {
            write!(f, ", capture")?;
        }
        if self.is_double_push() {
            write!(f, ", double push")?;
        }
        if self.is_enpassant() {
            write!(f, ", enpassant")?;
        }
        if self.is_castling() {
            write!(f, ", castling")?;
        }
        write!(f, ")")
    }
}
