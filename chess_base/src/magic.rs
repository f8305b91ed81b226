//! Search for magic multipliers
//!
//! A magic for a square maps every occupancy subset of the slider mask to a
//! dense table index via `(subset * magic) >> (64 - relevant_bits)`. Two
//! subsets may share an index only if they produce the same attack set.

use crate::bitboard::Bitboard;
use crate::rays::{set_occupancy, Bishop, Rook, Slider};
use crate::types::Coord;
use log::{trace, warn};
use rand_core::{impls, Error, RngCore, SeedableRng};
use thiserror::Error;

/// Number of candidates tried before the search for a single square gives up
pub const MAX_ATTEMPTS: u64 = 100_000_000;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MagicError {
    #[error("no {slider} magic found for {coord} after {attempts} attempts")]
    Exhausted {
        slider: &'static str,
        coord: Coord,
        attempts: u64,
    },
}

/// 32-bit xorshift generator
///
/// `next_u64` is assembled from the low 16 bits of four consecutive 32-bit
/// outputs, so the stream of magics depends only on the seed.
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub const DEFAULT_SEED: u32 = 1804289383;

    pub const fn new() -> Self {
        Self::with_seed(Self::DEFAULT_SEED)
    }

    /// Zero is a fixed point of xorshift, so it is replaced with the default seed
    pub const fn with_seed(seed: u32) -> Self {
        XorShift32 {
            state: if seed == 0 { Self::DEFAULT_SEED } else { seed },
        }
    }
}

impl Default for XorShift32 {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for XorShift32 {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    fn next_u64(&mut self) -> u64 {
        let n1 = u64::from(self.next_u32() & 0xffff);
        let n2 = u64::from(self.next_u32() & 0xffff);
        let n3 = u64::from(self.next_u32() & 0xffff);
        let n4 = u64::from(self.next_u32() & 0xffff);
        n1 | (n2 << 16) | (n3 << 32) | (n4 << 48)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for XorShift32 {
    type Seed = [u8; 4];

    fn from_seed(seed: [u8; 4]) -> Self {
        Self::with_seed(u32::from_le_bytes(seed))
    }
}

/// Random number with few bits set, which makes a good magic candidate
pub fn gen_sparse<R: RngCore>(r: &mut R) -> u64 {
    r.next_u64() & r.next_u64() & r.next_u64()
}

/// Finds a magic for slider `S` on square `c`
///
/// `relevant_bits` must be equal to the number of bits in `S::mask(c)`.
pub fn find_magic_number<S: Slider, R: RngCore>(
    r: &mut R,
    c: Coord,
    relevant_bits: usize,
) -> Result<u64, MagicError> {
    let mask = S::mask(c);
    debug_assert_eq!(mask.popcount() as usize, relevant_bits);
    let subset_cnt = 1_usize << relevant_bits;
    let occupancies: Vec<Bitboard> = (0..subset_cnt as u64)
        .map(|idx| set_occupancy(idx, relevant_bits, mask))
        .collect();
    let attacks: Vec<Bitboard> = occupancies.iter().map(|&occ| S::attacks(c, occ)).collect();

    // Attack sets are never empty, so EMPTY marks an unused slot.
    let mut used = vec![Bitboard::EMPTY; subset_cnt];
    'candidates: for attempt in 0..MAX_ATTEMPTS {
        let magic = gen_sparse(r);
        if (mask.as_raw().wrapping_mul(magic) & 0xff00_0000_0000_0000).count_ones() < 6 {
            continue;
        }
        used.fill(Bitboard::EMPTY);
        for (occ, &attack) in occupancies.iter().zip(attacks.iter()) {
            let idx = (occ.as_raw().wrapping_mul(magic) >> (64 - relevant_bits)) as usize;
            let slot = &mut used[idx];
            if slot.is_empty() {
                *slot = attack;
            } else if *slot != attack {
                continue 'candidates;
            }
        }
        trace!(
            "found {} magic {:#018x} for {} after {} attempts",
            S::NAME,
            magic,
            c,
            attempt + 1
        );
        return Ok(magic);
    }

    warn!("{} magic search for {} failed", S::NAME, c);
    Err(MagicError::Exhausted {
        slider: S::NAME,
        coord: c,
        attempts: MAX_ATTEMPTS,
    })
}

/// Finds magics for all squares, rooks first and then bishops
///
/// Returns `(bishop, rook)` magic tables.
pub fn find_all_magics<R: RngCore>(r: &mut R) -> Result<([u64; 64], [u64; 64]), MagicError> {
    let mut rook = [0_u64; 64];
    for c in Coord::iter() {
        rook[c.index()] = find_magic_number::<Rook, _>(r, c, Rook::relevant_bits(c))?;
    }
    let mut bishop = [0_u64; 64];
    for c in Coord::iter() {
        bishop[c.index()] = find_magic_number::<Bishop, _>(r, c, Bishop::relevant_bits(c))?;
    }
    Ok((bishop, rook))
}
