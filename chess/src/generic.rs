use crate::geometry;
use crate::types::{self, Cell, Coord, Piece};

/// Compile-time color, so that move generation is monomorphized per side
pub trait Color {
    const COLOR: types::Color;
    const PAWN: Cell;
    const KING: Cell;
    const PAWN_FORWARD: isize;
    type Inv: Color;

    #[inline]
    fn is_promote_src(c: Coord) -> bool {
        c.rank() == geometry::promote_src_rank(Self::COLOR)
    }

    #[inline]
    fn is_double_push_src(c: Coord) -> bool {
        c.rank() == geometry::double_push_src_rank(Self::COLOR)
    }

    #[inline]
    fn cell(p: Piece) -> Cell {
        Cell::from_parts(Self::COLOR, p)
    }
}

pub struct White;
pub struct Black;

impl Color for White {
    const COLOR: types::Color = types::Color::White;
    const PAWN: Cell = Cell::from_parts(types::Color::White, Piece::Pawn);
    const KING: Cell = Cell::from_parts(types::Color::White, Piece::King);
    const PAWN_FORWARD: isize = geometry::pawn_forward_delta(types::Color::White);
    type Inv = Black;
}

impl Color for Black {
    const COLOR: types::Color = types::Color::Black;
    const PAWN: Cell = Cell::from_parts(types::Color::Black, Piece::Pawn);
    const KING: Cell = Cell::from_parts(types::Color::Black, Piece::King);
    const PAWN_FORWARD: isize = geometry::pawn_forward_delta(types::Color::Black);
    type Inv = White;
}
