//! Board and related things

use crate::attack::AttackTables;
use crate::bitboard::Bitboard;
use crate::fen::{Pretty, PrettyStyle, RawBoard, RawFenParseError};
use crate::types::{CastlingRights, Cell, Color, Coord, File, Piece, Rank};

use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

/// Board validation error
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// The side which is not to move has its king under attack
    #[error("opponent's king is attacked")]
    OpponentKingAttacked,
}

/// Error parsing [`Board`] from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FenParseError {
    /// Board cannot be parsed
    #[error("cannot parse fen: {0}")]
    Fen(#[from] RawFenParseError),
    /// Board was parsed, but it's invalid
    #[error("invalid position: {0}")]
    Valid(#[from] ValidateError),
}

/// How strictly a position is checked when a [`Board`] is built
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CheckValidation {
    /// Accept any position
    #[default]
    Skip,
    /// Reject positions where the side which just moved left its king in check
    RejectOpponentInCheck,
}

/// Standard positions, mostly taken from well-known perft suites
pub mod positions {
    pub const EMPTY: &str = "8/8/8/8/8/8/8/8 w - - 0 1";
    pub const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    pub const KIWIPETE: &str =
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    pub const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    pub const POSITION_4: &str =
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    pub const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
    pub const POSITION_6: &str =
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10";
    pub const ENPASSANT: &str =
        "rnbqkb1r/pp1p1pPp/8/2p1pP2/1P1P4/3P3P/P1P1P3/RNBQKBNR w KQkq e6 0 1";

    /// All the positions above, in order
    pub const ALL: [&str; 8] = [
        EMPTY, START, KIWIPETE, POSITION_3, POSITION_4, POSITION_5, POSITION_6, ENPASSANT,
    ];
}

/// Piece placement as bitboards
///
/// Holds one bitboard per colored piece, plus the union of pieces of each color and of both
/// colors. Each square is set in at most one piece bitboard, and the unions must be refreshed
/// with [`Position::update_units()`] after piece bitboards change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) pieces: [Bitboard; Cell::COUNT],
    pub(crate) white: Bitboard,
    pub(crate) black: Bitboard,
    pub(crate) all: Bitboard,
}

impl Position {
    pub const fn empty() -> Position {
        Position {
            pieces: [Bitboard::EMPTY; Cell::COUNT],
            white: Bitboard::EMPTY,
            black: Bitboard::EMPTY,
            all: Bitboard::EMPTY,
        }
    }

    /// Returns the piece on square `c`, scanning piece bitboards from white pawns to black king
    #[inline]
    pub fn piece_on(&self, c: Coord) -> Cell {
        for (idx, bb) in self.pieces.iter().enumerate() {
            if bb.has(c) {
                return Cell::from_index(idx);
            }
        }
        Cell::EMPTY
    }

    /// Recomputes color and total occupancy from piece bitboards
    #[inline]
    pub fn update_units(&mut self) {
        let (white, black) = self.pieces.split_at(Piece::COUNT);
        self.white = white.iter().fold(Bitboard::EMPTY, |acc, &bb| acc | bb);
        self.black = black.iter().fold(Bitboard::EMPTY, |acc, &bb| acc | bb);
        self.all = self.white | self.black;
    }

    #[inline]
    pub fn piece(&self, c: Cell) -> Bitboard {
        self.pieces[c.index()]
    }

    #[inline]
    pub(crate) fn piece_mut(&mut self, c: Cell) -> &mut Bitboard {
        &mut self.pieces[c.index()]
    }

    #[inline]
    pub fn color(&self, c: Color) -> Bitboard {
        match c {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    #[inline]
    pub fn all(&self) -> Bitboard {
        self.all
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::empty()
    }
}

/// Game state beyond piece placement
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct State {
    pub(crate) side: Color,
    pub(crate) xside: Color,
    pub(crate) enpassant: Option<Coord>,
    pub(crate) castling: CastlingRights,
    pub(crate) half_moves: u16,
    pub(crate) full_moves: u16,
}

impl State {
    #[inline]
    pub(crate) fn change_side(&mut self) {
        self.side = self.xside;
        self.xside = self.side.inv();
    }
}

/// Chess board
///
/// The board is a plain value: copying it is cheap, and a copy made before a move is a complete
/// snapshot to restore afterwards.
///
/// No chess rules are enforced on construction, so the board may miss kings or contain pawns on
/// the back ranks. Use [`CheckValidation`] to reject positions where the side not to move is in
/// check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) pos: Position,
    pub(crate) state: State,
}

impl Board {
    /// Returns a board with the initial position
    pub fn initial() -> Board {
        Board::from_raw(&RawBoard::initial())
    }

    /// Parses a board from FEN without validating it
    pub fn from_fen(fen: &str) -> Result<Board, FenParseError> {
        Board::from_str(fen)
    }

    /// Parses a board from FEN and validates it according to `validation`
    pub fn from_fen_with(
        fen: &str,
        tables: &AttackTables,
        validation: CheckValidation,
    ) -> Result<Board, FenParseError> {
        let board = Board::from_fen(fen)?;
        board.validate(tables, validation)?;
        Ok(board)
    }

    /// Builds a board from its raw description
    ///
    /// Never fails, as no validation is performed.
    pub fn from_raw(raw: &RawBoard) -> Board {
        let mut pos = Position::empty();
        for (idx, cell) in raw.cells.iter().enumerate() {
            if cell.is_occupied() {
                pos.piece_mut(*cell).set(Coord::from_index(idx));
            }
        }
        pos.update_units();
        Board {
            pos,
            state: State {
                side: raw.side,
                xside: raw.side.inv(),
                enpassant: raw.enpassant,
                castling: raw.castling,
                half_moves: raw.half_moves,
                full_moves: raw.full_moves,
            },
        }
    }

    /// Checks the board according to `validation`
    pub fn validate(
        &self,
        tables: &AttackTables,
        validation: CheckValidation,
    ) -> Result<(), ValidateError> {
        match validation {
            CheckValidation::Skip => Ok(()),
            CheckValidation::RejectOpponentInCheck => {
                if self.is_opponent_king_attacked(tables) {
                    Err(ValidateError::OpponentKingAttacked)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Converts the board back into the square-by-square representation
    pub fn raw(&self) -> RawBoard {
        let mut cells = [Cell::EMPTY; 64];
        for (idx, bb) in self.pos.pieces.iter().enumerate() {
            for c in *bb {
                cells[c.index()] = Cell::from_index(idx);
            }
        }
        RawBoard {
            cells,
            side: self.state.side,
            castling: self.state.castling,
            enpassant: self.state.enpassant,
            half_moves: self.state.half_moves,
            full_moves: self.state.full_moves,
        }
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.pos
    }

    #[inline]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Returns the contents of the square with coordinate `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.pos.piece_on(c)
    }

    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.get(Coord::from_parts(file, rank))
    }

    /// Returns side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.state.side
    }

    /// Returns the side which is not to move
    #[inline]
    pub fn xside(&self) -> Color {
        self.state.xside
    }

    /// Returns the en passant target square
    #[inline]
    pub fn enpassant(&self) -> Option<Coord> {
        self.state.enpassant
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.state.castling
    }

    #[inline]
    pub fn half_moves(&self) -> u16 {
        self.state.half_moves
    }

    /// Returns the full-move counter
    ///
    /// It is incremented after every move made on the board.
    #[inline]
    pub fn full_moves(&self) -> u16 {
        self.state.full_moves
    }

    /// Returns the bitboard over all the cells equal to `c`
    ///
    /// **Note**: `c` must not be empty.
    #[inline]
    pub fn piece(&self, c: Cell) -> Bitboard {
        self.pos.piece(c)
    }

    #[inline]
    pub fn piece2(&self, c: Color, p: Piece) -> Bitboard {
        self.piece(Cell::from_parts(c, p))
    }

    /// Returns the bitboard over all the pieces with color `c`
    #[inline]
    pub fn color(&self, c: Color) -> Bitboard {
        self.pos.color(c)
    }

    #[inline]
    pub fn all(&self) -> Bitboard {
        self.pos.all
    }

    /// Returns the position of the king of color `c`, if there is one
    #[inline]
    pub fn king_pos(&self, c: Color) -> Option<Coord> {
        self.piece2(c, Piece::King).lsb()
    }

    /// Returns `true` if square `c` is attacked by any piece of color `by`
    pub fn is_square_attacked(&self, tables: &AttackTables, c: Coord, by: Color) -> bool {
        let all = self.pos.all;
        // A pawn of color `by` attacks `c` iff a pawn of the other color on `c` would attack it.
        (tables.pawn(by.inv(), c) & self.piece2(by, Piece::Pawn)).is_nonempty()
            || (tables.knight(c) & self.piece2(by, Piece::Knight)).is_nonempty()
            || (tables.bishop(c, all) & self.piece2(by, Piece::Bishop)).is_nonempty()
            || (tables.rook(c, all) & self.piece2(by, Piece::Rook)).is_nonempty()
            || (tables.queen(c, all) & self.piece2(by, Piece::Queen)).is_nonempty()
            || (tables.king(c) & self.piece2(by, Piece::King)).is_nonempty()
    }

    /// Returns `true` if the side to move is in check
    #[inline]
    pub fn is_in_check(&self, tables: &AttackTables) -> bool {
        match self.king_pos(self.state.side) {
            Some(king) => self.is_square_attacked(tables, king, self.state.xside),
            None => false,
        }
    }

    /// Returns `true` if the king of the side which is not to move is under attack
    ///
    /// This happens right after an illegal move is applied.
    #[inline]
    pub fn is_opponent_king_attacked(&self, tables: &AttackTables) -> bool {
        match self.king_pos(self.state.xside) {
            Some(king) => self.is_square_attacked(tables, king, self.state.side),
            None => false,
        }
    }

    /// Wraps the board to allow pretty-printing with the given style
    ///
    /// See docs for [`RawBoard::pretty()`] for more details.
    pub fn pretty(&self, style: PrettyStyle) -> BoardPretty {
        BoardPretty {
            raw: self.raw(),
            style,
        }
    }

    /// Converts the board into a FEN string
    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl From<&RawBoard> for Board {
    fn from(raw: &RawBoard) -> Board {
        Board::from_raw(raw)
    }
}

impl From<RawBoard> for Board {
    fn from(raw: RawBoard) -> Board {
        Board::from_raw(&raw)
    }
}

impl FromStr for Board {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        Ok(Board::from_raw(&RawBoard::from_str(s)?))
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.raw().fmt(f)
    }
}

/// Owned counterpart of [`Pretty`] for [`Board`]
pub struct BoardPretty {
    raw: RawBoard,
    style: PrettyStyle,
}

impl Display for BoardPretty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let pretty: Pretty<'_> = self.raw.pretty(self.style);
        pretty.fmt(f)
    }
}
