use crate::types::{Color, Rank};

pub const fn castling_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

/// Rank from which a pawn of color `c` can make a double push
pub const fn double_push_src_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

/// Rank from which a pawn of color `c` promotes on its next step
pub const fn promote_src_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R7,
        Color::Black => Rank::R2,
    }
}

/// Index delta of a single pawn step for color `c`
///
/// White pawns move towards lower indices, as a8 is square 0.
pub const fn pawn_forward_delta(c: Color) -> isize {
    match c {
        Color::White => -8,
        Color::Black => 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coord, File};

    #[test]
    fn test_pawn_steps() {
        let e2 = Coord::from_parts(File::E, double_push_src_rank(Color::White));
        assert_eq!(e2.add(pawn_forward_delta(Color::White)).to_string(), "e3");
        let d7 = Coord::from_parts(File::D, double_push_src_rank(Color::Black));
        assert_eq!(d7.add(pawn_forward_delta(Color::Black)).to_string(), "d6");
        assert_eq!(promote_src_rank(Color::White), Rank::R7);
        assert_eq!(castling_rank(Color::Black), Rank::R8);
    }
}
