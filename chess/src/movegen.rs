//! Pseudo-legal move generation
//!
//! Generated moves obey piece movement rules, but may leave the own king in check. They are
//! filtered by [`make()`](crate::moves::make), which refuses such moves.

use crate::attack::AttackTables;
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::moves::{self, Move, MoveType, PromotePiece};
use crate::types::{CastlingSide, Cell, Color, Coord, Piece};
use crate::{castling, generic};

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

/// Upper bound on the number of moves in a position
pub const MAX_MOVES: usize = 256;

/// List of moves, in the order they were generated
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, MAX_MOVES>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, MAX_MOVES>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = arrayvec::IntoIter<Move, MAX_MOVES>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }

    /// Appends a move
    ///
    /// # Panics
    ///
    /// Panics if the list already holds [`MAX_MOVES`] moves.
    #[inline]
    pub fn add(&mut self, m: Move) {
        self.0.push(m);
    }

    /// Finds the move with the given source, target and promoted cell
    ///
    /// Pass [`Cell::EMPTY`] as `promoted` to look for a move which is not a promotion.
    pub fn search(&self, src: Coord, dst: Coord, promoted: Cell) -> Option<Move> {
        self.0
            .iter()
            .copied()
            .find(|m| m.src() == src && m.dst() == dst && m.promoted() == promoted)
    }

    /// Wraps the list to print it as a table, one move per row
    pub fn table(&self) -> MoveTable<'_> {
        MoveTable(self)
    }
}

/// Wrapper to print a [`MoveList`] as a table
pub struct MoveTable<'a>(&'a MoveList);

impl<'a> fmt::Display for MoveTable<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        writeln!(
            f,
            " source | target | piece | promoted | capture | double push | enpassant | castling"
        )?;
        writeln!(f, "{}", "-".repeat(84))?;
        for m in self.0 {
            let promoted = match m.promoted() {
                Cell::EMPTY => '-',
                c => c.as_char(),
            };
            writeln!(
                f,
                " {:>6} | {:>6} | {:>5} | {:>8} | {:>7} | {:>11} | {:>9} | {:>8}",
                m.src().to_string(),
                m.dst().to_string(),
                m.piece().as_char(),
                promoted,
                u8::from(m.is_capture()),
                u8::from(m.is_double_push()),
                u8::from(m.is_enpassant()),
                u8::from(m.is_castling()),
            )?;
        }
        writeln!(f)?;
        write!(f, "total number of moves: {}", self.0.len())
    }
}

/// Sink for generated moves
pub trait MovePush {
    fn push(&mut self, m: Move);
}

impl<const N: usize> MovePush for ArrayVec<Move, N> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

impl MovePush for MoveList {
    fn push(&mut self, m: Move) {
        self.0.push(m);
    }
}

impl MovePush for Vec<Move> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

struct MoveGenImpl<'a, P, C> {
    tables: &'a AttackTables,
    board: &'a Board,
    dst: &'a mut P,
    _c: PhantomData<C>,
}

impl<'a, P: MovePush, C: generic::Color> MoveGenImpl<'a, P, C> {
    fn new(tables: &'a AttackTables, board: &'a Board, dst: &'a mut P, _c: C) -> Self {
        MoveGenImpl {
            tables,
            board,
            dst,
            _c: PhantomData,
        }
    }

    #[inline]
    fn own(&self) -> Bitboard {
        self.board.color(C::COLOR)
    }

    #[inline]
    fn enemy(&self) -> Bitboard {
        self.board.color(C::COLOR.inv())
    }

    fn add_promotes(&mut self, src: Coord, dst: Coord, capture: bool) {
        for p in PromotePiece::ALL {
            self.dst.push(Move::encode(
                src,
                dst,
                C::PAWN,
                p.cell(C::COLOR),
                capture,
                false,
                false,
                false,
            ));
        }
    }

    fn gen_pawns(&mut self) {
        let all = self.board.all();
        let enemy = self.enemy();
        let enpassant = self.board.enpassant();
        for src in self.board.piece(C::PAWN) {
            let is_promote = C::is_promote_src(src);

            // Pushes
            if let Some(dst) = src.try_shift(0, C::PAWN_FORWARD / 8) {
                if !all.has(dst) {
                    if is_promote {
                        self.add_promotes(src, dst, false);
                    } else {
                        self.dst.push(Move::quiet(src, dst, C::PAWN));
                        if C::is_double_push_src(src) {
                            let dst2 = dst.add(C::PAWN_FORWARD);
                            if !all.has(dst2) {
                                self.dst.push(Move::encode(
                                    src,
                                    dst2,
                                    C::PAWN,
                                    Cell::EMPTY,
                                    false,
                                    true,
                                    false,
                                    false,
                                ));
                            }
                        }
                    }
                }
            }

            // Captures
            let attacks = self.tables.pawn(C::COLOR, src);
            for dst in attacks & enemy {
                if is_promote {
                    self.add_promotes(src, dst, true);
                } else {
                    self.dst.push(Move::capture(src, dst, C::PAWN));
                }
            }

            if let Some(ep) = enpassant {
                if attacks.has(ep) {
                    self.dst.push(Move::encode(
                        src,
                        ep,
                        C::PAWN,
                        Cell::EMPTY,
                        true,
                        false,
                        true,
                        false,
                    ));
                }
            }
        }
    }

    #[inline]
    fn add_targets(&mut self, src: Coord, piece: Cell, targets: Bitboard) {
        let enemy = self.enemy();
        for dst in targets & !self.own() {
            if enemy.has(dst) {
                self.dst.push(Move::capture(src, dst, piece));
            } else {
                self.dst.push(Move::quiet(src, dst, piece));
            }
        }
    }

    fn gen_piece(&mut self, p: Piece) {
        let cell = C::cell(p);
        let all = self.board.all();
        for src in self.board.piece(cell) {
            let targets = match p {
                Piece::Knight => self.tables.knight(src),
                Piece::Bishop => self.tables.bishop(src, all),
                Piece::Rook => self.tables.rook(src, all),
                Piece::Queen => self.tables.queen(src, all),
                Piece::King => self.tables.king(src),
                Piece::Pawn => unreachable!("pawns have their own generator"),
            };
            self.add_targets(src, cell, targets);
        }
    }

    fn gen_castling_side(&mut self, s: CastlingSide) {
        if !self.board.castling().has(C::COLOR, s) {
            return;
        }
        let king_src = castling::king_src(C::COLOR);
        let (rook_src, _) = castling::rook_move(C::COLOR, s);
        if !self.board.piece(C::KING).has(king_src)
            || !self.board.piece(C::cell(Piece::Rook)).has(rook_src)
        {
            return;
        }
        if (castling::pass(C::COLOR, s) & self.board.all()).is_nonempty() {
            return;
        }
        let by = C::COLOR.inv();
        if self.board.is_square_attacked(self.tables, king_src, by)
            || self
                .board
                .is_square_attacked(self.tables, castling::king_cross(C::COLOR, s), by)
        {
            return;
        }
        // The destination square is checked when the move is made.
        self.dst.push(Move::encode(
            king_src,
            castling::king_dst(C::COLOR, s),
            C::KING,
            Cell::EMPTY,
            false,
            false,
            false,
            true,
        ));
    }

    fn gen_castling(&mut self) {
        self.gen_castling_side(CastlingSide::King);
        self.gen_castling_side(CastlingSide::Queen);
    }

    fn gen_for(&mut self, p: Piece) {
        match p {
            Piece::Pawn => self.gen_pawns(),
            Piece::King => {
                self.gen_piece(Piece::King);
                self.gen_castling();
            }
            _ => self.gen_piece(p),
        }
    }

    fn gen_all(&mut self) {
        for p in Piece::iter() {
            self.gen_for(p);
        }
    }
}

/// Generates pseudo-legal moves for the side to move into `dst`
///
/// The moves come grouped by piece kind: pawns, knights, bishops, rooks, queens and kings
/// (castling included).
pub fn generate_into<P: MovePush>(tables: &AttackTables, b: &Board, dst: &mut P) {
    match b.side() {
        Color::White => MoveGenImpl::new(tables, b, dst, generic::White).gen_all(),
        Color::Black => MoveGenImpl::new(tables, b, dst, generic::Black).gen_all(),
    }
}

/// Generates pseudo-legal moves for the side to move
pub fn generate(tables: &AttackTables, b: &Board) -> MoveList {
    let mut res = MoveList::new();
    generate_into(tables, b, &mut res);
    res
}

/// Generates pseudo-legal moves of a single piece kind for the side to move
///
/// King moves include castling.
pub fn generate_piece_into<P: MovePush>(tables: &AttackTables, b: &Board, p: Piece, dst: &mut P) {
    match b.side() {
        Color::White => MoveGenImpl::new(tables, b, dst, generic::White).gen_for(p),
        Color::Black => MoveGenImpl::new(tables, b, dst, generic::Black).gen_for(p),
    }
}

/// Generates legal moves for the side to move
pub fn generate_legal(tables: &AttackTables, b: &Board) -> MoveList {
    let mut res = generate(tables, b);
    res.retain(|mv| {
        let mut copy = *b;
        moves::make(tables, &mut copy, *mv, MoveType::AllMoves)
    });
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::positions;
    use crate::types::{File, Rank};
    use std::collections::BTreeSet;
    use std::str::FromStr;

    fn move_set(ml: &MoveList) -> BTreeSet<String> {
        ml.iter().map(ToString::to_string).collect()
    }

    fn strings(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_initial() {
        let tables = AttackTables::new();
        let ml = generate(&tables, &Board::initial());
        assert_eq!(ml.len(), 20);
        assert_eq!(ml.iter().filter(|m| m.is_double_push()).count(), 8);
        assert!(ml.iter().all(|m| !m.is_capture()));
        // Pawns come first, then knights.
        assert!(ml[..16].iter().all(|m| m.piece().piece() == Some(Piece::Pawn)));
        assert!(ml[16..].iter().all(|m| m.piece().piece() == Some(Piece::Knight)));
    }

    #[test]
    fn test_promotes() {
        let tables = AttackTables::new();
        let b = Board::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mut ml = MoveList::new();
        generate_piece_into(&tables, &b, Piece::Pawn, &mut ml);
        assert_eq!(
            ml.iter().map(ToString::to_string).collect::<Vec<_>>(),
            ["a7a8q", "a7a8r", "a7a8b", "a7a8n", "a7b8q", "a7b8r", "a7b8b", "a7b8n"]
        );
        assert!(ml[4..].iter().all(|m| m.is_capture()));

        let b = Board::from_fen("4k3/8/8/8/8/8/p7/4K3 b - - 0 1").unwrap();
        let mut ml = MoveList::new();
        generate_piece_into(&tables, &b, Piece::Pawn, &mut ml);
        assert_eq!(
            ml.iter().map(|m| m.promoted()).collect::<Vec<_>>(),
            [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight]
                .map(|p| Cell::from_parts(Color::Black, p))
        );
    }

    #[test]
    fn test_enpassant() {
        let tables = AttackTables::new();
        let b = Board::from_fen(positions::ENPASSANT).unwrap();
        let ml = generate(&tables, &b);
        let ep: Vec<_> = ml.iter().filter(|m| m.is_enpassant()).collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to_string(), "f5e6");
        assert!(ep[0].is_capture());
        // The pawn on g7 promotes on g8, f8 and h8.
        assert_eq!(
            ml.iter()
                .filter(|m| m.src() == Coord::from_str("g7").unwrap())
                .count(),
            12
        );
    }

    #[test]
    fn test_castling() {
        let tables = AttackTables::new();
        let b = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let castlings: Vec<_> = generate(&tables, &b)
            .into_iter()
            .filter(|m| m.is_castling())
            .map(|m| m.to_string())
            .collect();
        assert_eq!(castlings, ["e1g1", "e1c1"]);

        // Blocked queenside, attacked kingside passing square.
        let b = Board::from_fen("r3k2r/8/8/8/8/8/5r2/RN2K2R w KQkq - 0 1").unwrap();
        assert!(generate(&tables, &b).iter().all(|m| !m.is_castling()));

        // Attacked destination is left to make().
        let b = Board::from_fen("r3k2r/8/8/8/8/8/6r1/R3K2R w K - 0 1").unwrap();
        let ml = generate(&tables, &b);
        let castling = ml.iter().copied().find(|m| m.is_castling()).unwrap();
        assert_eq!(castling.to_string(), "e1g1");
        let mut copy = b;
        assert!(!moves::make(&tables, &mut copy, castling, MoveType::AllMoves));
        assert_eq!(copy, b);
        assert!(generate_legal(&tables, &b).iter().all(|m| !m.is_castling()));

        // In check
        let b = Board::from_fen("r3k2r/8/8/8/8/8/4r3/R3K2R w KQ - 0 1").unwrap();
        assert!(generate(&tables, &b).iter().all(|m| !m.is_castling()));
    }

    #[test]
    fn test_captures() {
        let tables = AttackTables::new();
        let b = Board::from_fen("4k3/5r2/8/8/3p4/1N3R2/8/4K3 w - - 0 1").unwrap();
        let captures: BTreeSet<_> = generate(&tables, &b)
            .iter()
            .filter(|m| m.is_capture())
            .map(|m| m.to_string())
            .collect();
        assert_eq!(captures, strings(&["b3d4", "f3f7"]));
        let mut ml = MoveList::new();
        generate_piece_into(&tables, &b, Piece::Knight, &mut ml);
        assert_eq!(
            move_set(&ml),
            strings(&["b3a1", "b3c1", "b3d2", "b3d4", "b3a5", "b3c5"])
        );
        assert_eq!(ml.iter().filter(|m| m.is_capture()).count(), 1);
    }

    #[test]
    fn test_search() {
        let tables = AttackTables::new();
        let ml = generate(&tables, &Board::initial());
        let e2 = Coord::from_parts(File::E, Rank::R2);
        let e4 = Coord::from_parts(File::E, Rank::R4);
        let mv = ml.search(e2, e4, Cell::EMPTY).unwrap();
        assert!(mv.is_double_push());
        assert_eq!(ml.search(e2, e2, Cell::EMPTY), None);
        assert_eq!(
            ml.search(e2, e4, Cell::from_parts(Color::White, Piece::Queen)),
            None
        );
    }

    #[test]
    fn test_table() {
        let tables = AttackTables::new();
        let s = generate(&tables, &Board::initial()).table().to_string();
        assert!(s.contains("     e2 |     e4 |     P |        - |       0 |           1 |"));
        assert!(s.ends_with("total number of moves: 20"));
    }

    #[test]
    fn test_legal() {
        let tables = AttackTables::new();
        let b = Board::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1").unwrap();
        assert_eq!(
            move_set(&generate_legal(&tables, &b)),
            strings(&["e1d2", "e1e2", "e1f2"])
        );
    }
}
