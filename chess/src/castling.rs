use crate::bitboard::Bitboard;
use crate::geometry;
use crate::types::{CastlingSide, Color, Coord, File};

/// Squares between king and rook, which must be empty
#[inline]
pub const fn pass(c: Color, s: CastlingSide) -> Bitboard {
    let x = match s {
        CastlingSide::King => 0x60,
        CastlingSide::Queen => 0x0e,
    };
    Bitboard::from_raw(match c {
        Color::White => x << 56,
        Color::Black => x,
    })
}

/// Square the king crosses while castling
#[inline]
pub const fn king_cross(c: Color, s: CastlingSide) -> Coord {
    let file = match s {
        CastlingSide::King => File::F,
        CastlingSide::Queen => File::D,
    };
    Coord::from_parts(file, geometry::castling_rank(c))
}

#[inline]
pub const fn king_src(c: Color) -> Coord {
    Coord::from_parts(File::E, geometry::castling_rank(c))
}

#[inline]
pub const fn king_dst(c: Color, s: CastlingSide) -> Coord {
    let file = match s {
        CastlingSide::King => File::G,
        CastlingSide::Queen => File::C,
    };
    Coord::from_parts(file, geometry::castling_rank(c))
}

/// Rook source and destination squares
#[inline]
pub const fn rook_move(c: Color, s: CastlingSide) -> (Coord, Coord) {
    let rank = geometry::castling_rank(c);
    match s {
        CastlingSide::King => (Coord::from_parts(File::H, rank), Coord::from_parts(File::F, rank)),
        CastlingSide::Queen => (Coord::from_parts(File::A, rank), Coord::from_parts(File::D, rank)),
    }
}

/// Finds the castling side by the king destination square
#[inline]
pub fn side_by_king_dst(c: Color, dst: Coord) -> Option<CastlingSide> {
    if dst == king_dst(c, CastlingSide::King) {
        Some(CastlingSide::King)
    } else if dst == king_dst(c, CastlingSide::Queen) {
        Some(CastlingSide::Queen)
    } else {
        None
    }
}

/// Castling rights that survive a move touching the square
///
/// After each move the rights are ANDed with the entries for its source and
/// destination squares.
#[rustfmt::skip]
pub const RIGHTS_MASK: [u8; 64] = [
     7, 15, 15, 15,  3, 15, 15, 11,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    13, 15, 15, 15, 12, 15, 15, 14,
];
