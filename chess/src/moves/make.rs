use super::base::{Move, PromotePiece};
use crate::attack::AttackTables;
use crate::board::Board;
use crate::types::{Cell, Coord, Piece};
use crate::{castling, geometry, movegen};

use log::trace;
use thiserror::Error;

/// Which moves [`make()`] accepts
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveType {
    /// Accept all the moves
    #[default]
    AllMoves,
    /// Accept only captures, refusing other moves without touching the board
    OnlyCaptures,
}

/// Error returned when a move leaves the own king under attack
#[derive(Debug, Clone, Error, Eq, PartialEq)]
#[error("move {0} leaves the king under attack")]
pub struct IllegalMove(pub Move);

/// Applies a pseudo-legal move `mv` to `board`
///
/// Returns `true` if the move was made. Otherwise, returns `false` and leaves the board
/// unchanged. A move is refused if it leaves the king of the moving side under attack, or if it
/// is not a capture and `ty` is [`MoveType::OnlyCaptures`].
///
/// The move must be generated for this exact board, otherwise the result is unspecified.
pub fn make(tables: &AttackTables, board: &mut Board, mv: Move, ty: MoveType) -> bool {
    if ty == MoveType::OnlyCaptures && !mv.is_capture() {
        return false;
    }

    let saved = *board;
    let side = board.state.side;
    let xside = board.state.xside;
    let (src, dst) = (mv.src(), mv.dst());
    let piece = mv.piece();

    {
        let pos = &mut board.pos;
        pos.piece_mut(piece).unset(src);
        pos.piece_mut(piece).set(dst);

        if mv.is_capture() {
            for p in Piece::iter() {
                pos.piece_mut(Cell::from_parts(xside, p)).unset(dst);
            }
        }

        if mv.is_promote() {
            pos.piece_mut(piece).unset(dst);
            pos.piece_mut(mv.promoted()).set(dst);
        }

        if mv.is_enpassant() {
            let victim = dst.add(-geometry::pawn_forward_delta(side));
            pos.piece_mut(Cell::from_parts(xside, Piece::Pawn))
                .unset(victim);
        }

        if mv.is_castling() {
            if let Some(s) = castling::side_by_king_dst(side, dst) {
                let (rook_src, rook_dst) = castling::rook_move(side, s);
                let rook = Cell::from_parts(side, Piece::Rook);
                pos.piece_mut(rook).unset(rook_src);
                pos.piece_mut(rook).set(rook_dst);
            }
        }

        pos.update_units();
    }

    let state = &mut board.state;
    state.enpassant = if mv.is_double_push() {
        Some(src.add(geometry::pawn_forward_delta(side)))
    } else {
        None
    };
    state.castling.retain(castling::RIGHTS_MASK[src.index()]);
    state.castling.retain(castling::RIGHTS_MASK[dst.index()]);
    if piece.piece() == Some(Piece::Pawn) || mv.is_capture() {
        state.half_moves = 0;
    } else {
        state.half_moves = state.half_moves.saturating_add(1);
    }
    state.change_side();

    if board.is_opponent_king_attacked(tables) {
        trace!("refusing {:?}: king is left under attack", mv);
        *board = saved;
        return false;
    }

    board.state.full_moves = board.state.full_moves.saturating_add(1);
    true
}

/// Finds the move from `src` to `dst` among the pseudo-legal moves and makes it
///
/// `promote` selects the promotion piece and must be `None` for moves which are not promotions.
/// Returns `false` and leaves the board unchanged if there is no such move or it is illegal.
pub fn make_selected(
    tables: &AttackTables,
    board: &mut Board,
    src: Coord,
    dst: Coord,
    promote: Option<PromotePiece>,
) -> bool {
    let promoted = promote.map_or(Cell::EMPTY, |p| p.cell(board.side()));
    match movegen::generate(tables, board).search(src, dst, promoted) {
        Some(mv) => make(tables, board, mv, MoveType::AllMoves),
        None => false,
    }
}

impl Board {
    /// Returns a new board with move `mv` applied
    ///
    /// `mv` must be a pseudo-legal move generated for this board.
    pub fn make_move(&self, tables: &AttackTables, mv: Move) -> Result<Board, IllegalMove> {
        let mut board = *self;
        if make(tables, &mut board, mv, MoveType::AllMoves) {
            Ok(board)
        } else {
            Err(IllegalMove(mv))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::positions;
    use crate::types::{CastlingRights, CastlingSide, Color, File, Rank};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::str::FromStr;

    fn coord(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    fn find(tables: &AttackTables, b: &Board, s: &str) -> Move {
        movegen::generate(tables, b)
            .into_iter()
            .find(|m| m.to_string() == s)
            .unwrap()
    }

    fn check_invariants(tables: &AttackTables, b: &Board) {
        let pos = b.position();
        let mut seen = crate::bitboard::Bitboard::EMPTY;
        for c in Cell::iter().filter(|c| c.is_occupied()) {
            assert!((seen & pos.piece(c)).is_empty(), "square holds two pieces");
            seen = seen | pos.piece(c);
        }
        assert_eq!(seen, b.all());
        assert_eq!(b.color(Color::White) | b.color(Color::Black), b.all());
        assert!((b.color(Color::White) & b.color(Color::Black)).is_empty());
        assert_eq!(b.xside(), b.side().inv());
        assert!(!b.is_opponent_king_attacked(tables));
        assert_eq!(Board::from_fen(&b.as_fen()).unwrap(), *b);
    }

    #[test]
    fn test_simple() {
        let tables = AttackTables::new();
        let mut b = Board::initial();
        let mv = find(&tables, &b, "e2e4");
        assert!(make(&tables, &mut b, mv, MoveType::AllMoves));
        assert_eq!(
            b.as_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 2"
        );
        let mv = find(&tables, &b, "g8f6");
        assert!(make(&tables, &mut b, mv, MoveType::AllMoves));
        assert_eq!(
            b.as_fen(),
            "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 3"
        );
    }

    #[test]
    fn test_only_captures() {
        let tables = AttackTables::new();
        let b = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let mut copy = b;
        let quiet = find(&tables, &b, "e4e5");
        assert!(!make(&tables, &mut copy, quiet, MoveType::OnlyCaptures));
        assert_eq!(copy, b);
        let capture = find(&tables, &b, "e4d5");
        assert!(make(&tables, &mut copy, capture, MoveType::OnlyCaptures));
        assert_eq!(copy.as_fen(), "4k3/8/8/3P4/8/8/8/4K3 b - - 0 2");
    }

    #[test]
    fn test_enpassant() {
        let tables = AttackTables::new();
        let mut b = Board::from_fen(positions::ENPASSANT).unwrap();
        let mv = find(&tables, &b, "f5e6");
        assert!(mv.is_enpassant());
        assert!(make(&tables, &mut b, mv, MoveType::AllMoves));
        let victim = Coord::from_parts(File::E, Rank::R5);
        assert!(!b.piece2(Color::Black, Piece::Pawn).has(victim));
        assert_eq!(b.get(victim), Cell::EMPTY);
        assert_eq!(
            b.get2(File::E, Rank::R6),
            Cell::from_parts(Color::White, Piece::Pawn)
        );
        assert_eq!(b.enpassant(), None);

        let mut b = Board::from_fen("4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1").unwrap();
        assert!(make_selected(&tables, &mut b, coord("e2"), coord("e4"), None));
        assert_eq!(b.enpassant(), Some(coord("e3")));
        assert!(make_selected(&tables, &mut b, coord("d4"), coord("e3"), None));
        assert_eq!(b.as_fen(), "4k3/8/8/8/8/4p3/8/4K3 w - - 0 3");
    }

    #[test]
    fn test_promote() {
        let tables = AttackTables::new();
        let b = Board::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();

        let mut copy = b;
        assert!(!make_selected(&tables, &mut copy, coord("a7"), coord("b8"), None));
        assert_eq!(copy, b);

        assert!(make_selected(
            &tables,
            &mut copy,
            coord("a7"),
            coord("b8"),
            Some(PromotePiece::Knight)
        ));
        assert_eq!(copy.as_fen(), "1N2k3/8/8/8/8/8/8/4K3 b - - 0 2");
        assert!(b.piece2(Color::Black, Piece::Knight).is_nonempty());
        assert!(copy.piece2(Color::Black, Piece::Knight).is_empty());
        assert!(copy.piece2(Color::White, Piece::Pawn).is_empty());
    }

    #[test]
    fn test_castling() {
        let tables = AttackTables::new();
        let b = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();

        let mut copy = b;
        assert!(make_selected(&tables, &mut copy, coord("e1"), coord("g1"), None));
        assert_eq!(copy.as_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 2");
        assert!(make_selected(&tables, &mut copy, coord("e8"), coord("c8"), None));
        assert_eq!(copy.as_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 2 3");

        // Rook moves and captures revoke the rights for their side only.
        let mut copy = b;
        assert!(make_selected(&tables, &mut copy, coord("a1"), coord("a8"), None));
        assert_eq!(
            copy.castling(),
            CastlingRights::EMPTY
                .with(Color::White, CastlingSide::King)
                .with(Color::Black, CastlingSide::King)
        );
        assert_eq!(copy.half_moves(), 0);
    }

    #[test]
    fn test_illegal() {
        let tables = AttackTables::new();

        // Castling into check
        let b = Board::from_fen("4k3/8/8/8/8/8/6r1/4K2R w K - 0 1").unwrap();
        let mut copy = b;
        assert!(!make_selected(&tables, &mut copy, coord("e1"), coord("g1"), None));
        assert_eq!(copy, b);
        let castling = find(&tables, &b, "e1g1");
        assert_eq!(
            b.make_move(&tables, castling),
            Err(IllegalMove(castling))
        );

        // Pinned piece
        let b = Board::from_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        let mut copy = b;
        assert!(!make_selected(&tables, &mut copy, coord("e2"), coord("d3"), None));
        assert_eq!(copy, b);
        assert!(b.make_move(&tables, find(&tables, &b, "e1d1")).is_ok());
    }

    #[test]
    fn test_random_playouts() {
        let tables = AttackTables::new();
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for fen in positions::ALL {
            let start = Board::from_fen(fen).unwrap();
            for _ in 0..20 {
                let mut b = start;
                for _ in 0..80 {
                    let legal = movegen::generate_legal(&tables, &b);
                    if legal.is_empty() {
                        break;
                    }
                    let mv = legal[rng.gen_range(0..legal.len())];
                    let before = b;
                    assert!(make(&tables, &mut b, mv, MoveType::AllMoves));
                    assert_ne!(b, before);
                    assert_eq!(b.full_moves(), before.full_moves() + 1);
                    check_invariants(&tables, &b);
                }
            }
        }
    }
}
