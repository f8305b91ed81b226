//! Attack sets computed directly from board geometry
//!
//! Everything here is slow and is meant to fill lookup tables once, either at
//! startup or from the build script.

use crate::bitboard::Bitboard;
use crate::types::{Color, Coord};

#[rustfmt::skip]
pub const BISHOP_RELEVANT_BITS: [u8; 64] = [
    6, 5, 5, 5, 5, 5, 5, 6,
    5, 5, 5, 5, 5, 5, 5, 5,
    5, 5, 7, 7, 7, 7, 5, 5,
    5, 5, 7, 9, 9, 7, 5, 5,
    5, 5, 7, 9, 9, 7, 5, 5,
    5, 5, 7, 7, 7, 7, 5, 5,
    5, 5, 5, 5, 5, 5, 5, 5,
    6, 5, 5, 5, 5, 5, 5, 6,
];

#[rustfmt::skip]
pub const ROOK_RELEVANT_BITS: [u8; 64] = [
    12, 11, 11, 11, 11, 11, 11, 12,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    12, 11, 11, 11, 11, 11, 11, 12,
];

const KNIGHT_SHIFTS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (2, -1),
    (2, 1),
    (1, -2),
    (1, 2),
];

const KING_SHIFTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

fn leaper_attacks(c: Coord, shifts: &[(isize, isize)]) -> Bitboard {
    let mut bb = Bitboard::EMPTY;
    for &(delta_file, delta_rank) in shifts {
        if let Some(nc) = c.try_shift(delta_file, delta_rank) {
            bb.set(nc);
        }
    }
    bb
}

/// Squares attacked by a pawn of color `color` standing on `c`
///
/// Only diagonal captures are included. White pawns attack towards the eighth rank.
pub fn pawn_attacks(color: Color, c: Coord) -> Bitboard {
    match color {
        Color::White => leaper_attacks(c, &[(-1, -1), (1, -1)]),
        Color::Black => leaper_attacks(c, &[(-1, 1), (1, 1)]),
    }
}

pub fn knight_attacks(c: Coord) -> Bitboard {
    leaper_attacks(c, &KNIGHT_SHIFTS)
}

pub fn king_attacks(c: Coord) -> Bitboard {
    leaper_attacks(c, &KING_SHIFTS)
}

/// Sliding piece which uses magic lookup tables
pub trait Slider {
    const NAME: &'static str;
    const SHIFTS: &'static [(isize, isize)];
    const RELEVANT_BITS: &'static [u8; 64];

    /// Squares whose occupancy affects the attacks from `c`
    ///
    /// These are all the squares on the rays from `c`, except the last square
    /// on each ray. A piece on the board edge blocks nothing behind it.
    fn mask(c: Coord) -> Bitboard {
        let mut res = Bitboard::EMPTY;
        for &(delta_file, delta_rank) in Self::SHIFTS {
            let mut p = c;
            while let Some(new_p) = p.try_shift(delta_file, delta_rank) {
                if new_p.try_shift(delta_file, delta_rank).is_none() {
                    break;
                }
                res.set(new_p);
                p = new_p;
            }
        }
        res
    }

    /// Attacks from `c` when the squares in `blockers` are occupied
    ///
    /// Each ray stops at the first blocker, which is included in the result.
    fn attacks(c: Coord, blockers: Bitboard) -> Bitboard {
        let mut res = Bitboard::EMPTY;
        for &(delta_file, delta_rank) in Self::SHIFTS {
            let mut p = c;
            while let Some(new_p) = p.try_shift(delta_file, delta_rank) {
                res.set(new_p);
                if blockers.has(new_p) {
                    break;
                }
                p = new_p;
            }
        }
        res
    }

    fn relevant_bits(c: Coord) -> usize {
        Self::RELEVANT_BITS[c.index()] as usize
    }
}

pub struct Bishop;
pub struct Rook;

impl Slider for Bishop {
    const NAME: &'static str = "bishop";
    const SHIFTS: &'static [(isize, isize)] = &[(-1, 1), (-1, -1), (1, -1), (1, 1)];
    const RELEVANT_BITS: &'static [u8; 64] = &BISHOP_RELEVANT_BITS;
}

impl Slider for Rook {
    const NAME: &'static str = "rook";
    const SHIFTS: &'static [(isize, isize)] = &[(0, 1), (0, -1), (-1, 0), (1, 0)];
    const RELEVANT_BITS: &'static [u8; 64] = &ROOK_RELEVANT_BITS;
}

/// Builds the `index`-th occupancy subset of `mask`
///
/// Only the lowest `relevant_bits` bits of `index` are taken into account.
pub fn set_occupancy(index: u64, relevant_bits: usize, mask: Bitboard) -> Bitboard {
    let index = if relevant_bits >= 64 {
        index
    } else {
        index & ((1_u64 << relevant_bits) - 1)
    };
    mask.deposit_bits(index)
}
