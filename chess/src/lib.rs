//! # magicmove
//!
//! Bitboard move generation core for chess.
//!
//! Sliding piece attacks are looked up through magic bitboards. The magic numbers are found at
//! build time and embedded into the crate, while the lookup tables themselves live in
//! [`AttackTables`], which is built once and passed by reference to everything that needs it.
//!
//! Move generation is pseudo-legal. Legality is checked by [`moves::make()`], which refuses moves
//! leaving the own king in check and keeps the board untouched in this case.
//!
//! # Example
//!
//! ```
//! use magicmove::{movegen, moves, perft, AttackTables, Board, MoveType};
//!
//! let tables = AttackTables::new();
//! let mut board = Board::initial();
//! assert_eq!(perft::perft(&tables, &mut board, 2), 400);
//!
//! let mv = moves::uci::parse("e2e4", &tables, &board).unwrap();
//! assert!(moves::make(&tables, &mut board, mv, MoveType::AllMoves));
//! assert_eq!(movegen::generate(&tables, &board).len(), 20);
//! ```

pub mod attack;
pub mod board;
pub mod fen;
pub mod movegen;
pub mod moves;
pub mod perft;

mod castling;
mod generic;

pub use magicmove_base::{bitboard, geometry, types};

pub use attack::AttackTables;
pub use bitboard::Bitboard;
pub use board::{Board, CheckValidation};
pub use fen::RawBoard;
pub use movegen::{MoveList, MovePush};
pub use moves::{make, make_selected, Move, MoveType, PromotePiece};
pub use types::{CastlingRights, CastlingSide, Cell, Color, Coord, File, Piece, Rank};
