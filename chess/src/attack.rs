//! Precomputed attack tables
//!
//! [`AttackTables`] is built once and then shared by reference with every routine that needs
//! attacks. Leaper attacks are plain per-square arrays, slider attacks are looked up via magic
//! multiplication.

use crate::bitboard::Bitboard;
use crate::types::{Color, Coord};
use log::debug;
use magicmove_base::rays::{self, Bishop, Rook, Slider};
use thiserror::Error;

include!(concat!(env!("OUT_DIR"), "/magic.rs"));

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("{slider} magic {magic:#018x} for {coord} maps different attacks to one index")]
    Collision {
        slider: &'static str,
        coord: Coord,
        magic: u64,
    },
}

#[derive(Debug, Default, Copy, Clone)]
struct MagicEntry {
    mask: Bitboard,
    magic: u64,
    shift: u32,
    offset: usize,
}

impl MagicEntry {
    #[inline]
    fn index(&self, occupied: Bitboard) -> usize {
        let key = (occupied & self.mask).as_raw().wrapping_mul(self.magic) >> self.shift;
        self.offset + key as usize
    }
}

#[derive(Debug, Clone)]
struct MagicTable {
    entries: [MagicEntry; 64],
    lookup: Vec<Bitboard>,
}

impl MagicTable {
    fn build<S: Slider>(magics: &[u64; 64]) -> Result<Self, TableError> {
        let mut entries = [MagicEntry::default(); 64];
        let mut lookup = Vec::new();
        for c in Coord::iter() {
            let mask = S::mask(c);
            let bits = S::relevant_bits(c);
            let entry = MagicEntry {
                mask,
                magic: magics[c.index()],
                shift: (64 - bits) as u32,
                offset: lookup.len(),
            };
            lookup.resize(entry.offset + (1 << bits), Bitboard::EMPTY);
            for idx in 0..(1_u64 << bits) {
                let occupied = rays::set_occupancy(idx, bits, mask);
                let attack = S::attacks(c, occupied);
                let slot = &mut lookup[entry.index(occupied)];
                // A slider always attacks at least one square, so an empty slot is free.
                if slot.is_empty() {
                    *slot = attack;
                } else if *slot != attack {
                    return Err(TableError::Collision {
                        slider: S::NAME,
                        coord: c,
                        magic: entry.magic,
                    });
                }
            }
            entries[c.index()] = entry;
        }
        Ok(MagicTable { entries, lookup })
    }

    #[inline]
    fn get(&self, coord: Coord, occupied: Bitboard) -> Bitboard {
        unsafe {
            let entry = self.entries.get_unchecked(coord.index());
            // The key is shifted down to `relevant_bits` bits, so it stays inside the slice
            // reserved for this square.
            *self.lookup.get_unchecked(entry.index(occupied))
        }
    }
}

/// Attack tables for all piece kinds
#[derive(Debug, Clone)]
pub struct AttackTables {
    pawn: [[Bitboard; 64]; 2],
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    bishop: MagicTable,
    rook: MagicTable,
}

impl AttackTables {
    /// Builds the tables using the magics embedded at compile time
    pub fn new() -> AttackTables {
        Self::with_magics(&BISHOP_MAGICS, &ROOK_MAGICS)
            .expect("embedded magics passed the collision check of find_magic_number")
    }

    /// Builds the tables using the given magics
    ///
    /// Fails if some magic maps two different attack sets to the same index.
    pub fn with_magics(bishop: &[u64; 64], rook: &[u64; 64]) -> Result<AttackTables, TableError> {
        let mut pawn = [[Bitboard::EMPTY; 64]; 2];
        let mut knight = [Bitboard::EMPTY; 64];
        let mut king = [Bitboard::EMPTY; 64];
        for c in Coord::iter() {
            pawn[Color::White.index()][c.index()] = rays::pawn_attacks(Color::White, c);
            pawn[Color::Black.index()][c.index()] = rays::pawn_attacks(Color::Black, c);
            knight[c.index()] = rays::knight_attacks(c);
            king[c.index()] = rays::king_attacks(c);
        }
        let bishop = MagicTable::build::<Bishop>(bishop)?;
        let rook = MagicTable::build::<Rook>(rook)?;
        debug!(
            "attack tables built: {} bishop and {} rook lookup entries",
            bishop.lookup.len(),
            rook.lookup.len()
        );
        Ok(AttackTables {
            pawn,
            knight,
            king,
            bishop,
            rook,
        })
    }

    /// Squares attacked by a pawn of color `color` standing on `coord`
    #[inline]
    pub fn pawn(&self, color: Color, coord: Coord) -> Bitboard {
        unsafe {
            *self
                .pawn
                .get_unchecked(color.index())
                .get_unchecked(coord.index())
        }
    }

    #[inline]
    pub fn knight(&self, coord: Coord) -> Bitboard {
        unsafe { *self.knight.get_unchecked(coord.index()) }
    }

    #[inline]
    pub fn king(&self, coord: Coord) -> Bitboard {
        unsafe { *self.king.get_unchecked(coord.index()) }
    }

    #[inline]
    pub fn bishop(&self, coord: Coord, occupied: Bitboard) -> Bitboard {
        self.bishop.get(coord, occupied)
    }

    #[inline]
    pub fn rook(&self, coord: Coord, occupied: Bitboard) -> Bitboard {
        self.rook.get(coord, occupied)
    }

    #[inline]
    pub fn queen(&self, coord: Coord, occupied: Bitboard) -> Bitboard {
        self.bishop(coord, occupied) | self.rook(coord, occupied)
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    fn check_slider<S: Slider>(lookup: impl Fn(Coord, Bitboard) -> Bitboard) {
        for c in Coord::iter() {
            let mask = S::mask(c);
            let bits = S::relevant_bits(c);
            for idx in 0..(1_u64 << bits) {
                let occupied = rays::set_occupancy(idx, bits, mask);
                let expected = S::attacks(c, occupied);
                assert_eq!(lookup(c, occupied), expected);
                // Squares outside the mask never change the result.
                assert_eq!(lookup(c, occupied | !mask), S::attacks(c, occupied | !mask));
            }
        }
    }

    #[test]
    fn test_magic_lookup() {
        let tables = AttackTables::new();
        check_slider::<Bishop>(|c, occ| tables.bishop(c, occ));
        check_slider::<Rook>(|c, occ| tables.rook(c, occ));
    }

    #[test]
    fn test_queen() {
        let tables = AttackTables::new();
        let d4 = Coord::from_parts(File::D, Rank::R4);
        assert_eq!(tables.queen(d4, Bitboard::EMPTY).popcount(), 27);
        let occ = Bitboard::from_coord(Coord::from_parts(File::D, Rank::R5));
        assert_eq!(
            tables.queen(d4, occ),
            tables.bishop(d4, occ) | tables.rook(d4, occ)
        );
    }

    #[test]
    fn test_leapers() {
        let tables = AttackTables::new();
        for c in Coord::iter() {
            assert_eq!(tables.knight(c), rays::knight_attacks(c));
            assert_eq!(tables.king(c), rays::king_attacks(c));
            assert_eq!(tables.pawn(Color::White, c), rays::pawn_attacks(Color::White, c));
            assert_eq!(tables.pawn(Color::Black, c), rays::pawn_attacks(Color::Black, c));
        }
    }

    #[test]
    fn test_embedded_magics() {
        assert!(AttackTables::with_magics(&BISHOP_MAGICS, &ROOK_MAGICS).is_ok());
    }

    #[test]
    fn test_bad_magics() {
        let res = AttackTables::with_magics(&BISHOP_MAGICS, &[0; 64]);
        assert!(matches!(
            res,
            Err(TableError::Collision { slider: "rook", .. })
        ));
    }
}
