//! 64-bit square sets
//!
//! Bit `i` of a bitboard stands for the square with index `i`, so bit 0 is a8 and bit 63 is h1.

use crate::types::{Coord, File, Rank};
use derive_more::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};
use std::fmt;

/// Number of set bits in `mask`
#[inline]
pub const fn count_bits(mask: u64) -> u32 {
    mask.count_ones()
}

/// Index of the least significant set bit in `mask`
///
/// `mask` must be nonzero. This is checked only in debug builds; in release
/// builds an empty mask yields 0.
#[inline]
pub fn lsb_index(mask: u64) -> usize {
    debug_assert!(mask != 0, "lsb_index called on an empty mask");
    (mask.trailing_zeros() & 63) as usize
}

/// Set of squares
#[derive(
    Default, Copy, Clone, PartialEq, Eq, Hash, BitAnd, BitAndAssign, BitOr, BitOrAssign, Not,
)]
pub struct Bitboard(u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    #[inline]
    pub const fn from_raw(val: u64) -> Bitboard {
        Bitboard(val)
    }

    #[inline]
    pub const fn from_coord(coord: Coord) -> Bitboard {
        Bitboard::EMPTY.with(coord)
    }

    #[inline]
    pub const fn as_raw(&self) -> u64 {
        self.0
    }

    /// Returns a copy of the bitboard with `coord` added
    #[inline]
    pub const fn with(self, coord: Coord) -> Bitboard {
        Bitboard(self.0 | 1 << coord.index())
    }

    #[inline]
    pub fn set(&mut self, coord: Coord) {
        self.0 |= 1 << coord.index();
    }

    #[inline]
    pub fn unset(&mut self, coord: Coord) {
        self.0 &= !(1 << coord.index());
    }

    #[inline]
    pub const fn has(&self, coord: Coord) -> bool {
        self.0 & 1 << coord.index() != 0
    }

    #[inline]
    pub const fn popcount(&self) -> u32 {
        count_bits(self.0)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_nonempty(&self) -> bool {
        self.0 != 0
    }

    /// Lowest square in the bitboard, or `None` if it is empty
    #[inline]
    pub fn lsb(&self) -> Option<Coord> {
        self.is_nonempty()
            .then(|| Coord::from_index(lsb_index(self.0)))
    }

    /// Removes the lowest square and returns it
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Coord> {
        let res = self.lsb();
        self.0 &= self.0.wrapping_sub(1);
        res
    }

    /// Spreads the low bits of `x` over the squares of `self`
    ///
    /// The `i`-th lowest square of `self` is kept iff bit `i` of `x` is set.
    pub fn deposit_bits(&self, x: u64) -> Bitboard {
        let mut res = Bitboard::EMPTY;
        for (i, coord) in self.into_iter().enumerate() {
            if (x >> i) & 1 != 0 {
                res.set(coord);
            }
        }
        res
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Bitboard({})", self)
    }
}

/// Prints the ranks from 8 to 1 separated by `/`, with `1` for each square in the set
impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            if rank != Rank::R8 {
                write!(f, "/")?;
            }
            for file in File::iter() {
                let bit = self.has(Coord::from_parts(file, rank));
                write!(f, "{}", if bit { '1' } else { '0' })?;
            }
        }
        Ok(())
    }
}

/// Iterator over the squares of a [`Bitboard`], in increasing index order
pub struct Iter(Bitboard);

impl Iterator for Iter {
    type Item = Coord;

    #[inline]
    fn next(&mut self) -> Option<Coord> {
        self.0.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.popcount() as usize;
        (n, Some(n))
    }
}

impl IntoIterator for Bitboard {
    type Item = Coord;
    type IntoIter = Iter;

    #[inline]
    fn into_iter(self) -> Iter {
        Iter(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn bb(squares: &[&str]) -> Bitboard {
        squares
            .iter()
            .map(|s| Coord::from_str(s).unwrap())
            .fold(Bitboard::EMPTY, Bitboard::with)
    }

    #[test]
    fn test_set_get_pop() {
        let mut b = Bitboard::EMPTY;
        let e4 = Coord::from_str("e4").unwrap();
        b.set(e4);
        assert!(b.has(e4));
        assert_eq!(b, Bitboard::from_coord(e4));
        b.set(e4);
        assert_eq!(b.popcount(), 1);
        b.unset(e4);
        assert!(b.is_empty());
        b.unset(e4);
        assert!(b.is_empty());
    }

    #[test]
    fn test_iter() {
        let b = bb(&["e2", "a4", "f3"]);
        let squares: Vec<_> = b.into_iter().map(|c| c.to_string()).collect();
        assert_eq!(squares, ["a4", "f3", "e2"]);
        assert_eq!(b.into_iter().size_hint(), (3, Some(3)));

        let mut b = b;
        assert_eq!(b.pop_lsb().map(|c| c.to_string()).as_deref(), Some("a4"));
        assert_eq!(b, bb(&["e2", "f3"]));
    }

    #[test]
    fn test_bitops() {
        let x = bb(&["a4", "e2"]);
        let y = bb(&["e2", "f3"]);
        assert_eq!(x & y, bb(&["e2"]));
        assert_eq!(x | y, bb(&["a4", "e2", "f3"]));
        assert_eq!((!x).popcount(), 62);
        let mut z = x;
        z &= !y;
        assert_eq!(z, bb(&["a4"]));
        z |= y;
        assert_eq!(z, bb(&["a4", "e2", "f3"]));
    }

    #[test]
    fn test_bit_utils() {
        assert_eq!(count_bits(0), 0);
        assert_eq!(count_bits(0xff00_0000_0000_0001), 9);
        assert_eq!(lsb_index(1), 0);
        assert_eq!(lsb_index(0x8000_0000_0000_0000), 63);
        assert_eq!(lsb_index(0b1011_0000), 4);
        assert_eq!(Bitboard::EMPTY.lsb(), None);
        assert_eq!(
            Bitboard::from_raw(0x0000_1000_0000_0100).lsb(),
            Some(Coord::from_index(8))
        );
    }

    #[test]
    fn test_deposit() {
        let mask = Bitboard::from_raw(0b1010_0110);
        assert_eq!(mask.deposit_bits(0), Bitboard::EMPTY);
        assert_eq!(mask.deposit_bits(0b0001), Bitboard::from_raw(0b0000_0010));
        assert_eq!(mask.deposit_bits(0b0110), Bitboard::from_raw(0b0010_0100));
        assert_eq!(mask.deposit_bits(0b1111), mask);
        assert_eq!(mask.deposit_bits(0b1_0000), Bitboard::EMPTY);
    }

    #[test]
    fn test_format() {
        assert_eq!(
            bb(&["a4", "e2", "f3", "h8"]).to_string(),
            "00000001/00000000/00000000/00000000/10000000/00000100/00001000/00000000"
        );
    }
}
