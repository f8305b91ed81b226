//! Perft, i. e. counting the leaf nodes of the legal move tree
//!
//! Perft is the usual correctness oracle for move generators, as the node counts for many
//! positions are well known.

use crate::attack::AttackTables;
use crate::board::Board;
use crate::movegen;
use crate::moves::{self, Move, MoveType};

use std::fmt;
use std::time::{Duration, Instant};

use log::info;

/// Counts the leaf nodes of the legal move tree of depth `depth`
///
/// The board is restored before returning.
pub fn perft(tables: &AttackTables, board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for mv in &movegen::generate(tables, board) {
        let saved = *board;
        if !moves::make(tables, board, *mv, MoveType::AllMoves) {
            continue;
        }
        nodes += perft(tables, board, depth - 1);
        *board = saved;
    }
    nodes
}

/// Result of [`divide()`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerftReport {
    /// Legal root moves with the node counts of their subtrees, in generation order
    pub moves: Vec<(Move, u64)>,
    /// Total number of nodes
    pub nodes: u64,
    /// Time spent
    pub elapsed: Duration,
}

impl fmt::Display for PerftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for (mv, nodes) in &self.moves {
            writeln!(f, "{}: {}", mv, nodes)?;
        }
        writeln!(f)?;
        writeln!(f, "nodes: {}", self.nodes)?;
        write!(f, "time:  {} ms", self.elapsed.as_millis())
    }
}

/// Runs perft of depth `depth`, reporting the node count of each legal root move
///
/// With `depth == 0` the report has no moves and a single node.
pub fn divide(tables: &AttackTables, board: &Board, depth: u32) -> PerftReport {
    let start = Instant::now();
    let mut report = PerftReport {
        moves: Vec::new(),
        nodes: 0,
        elapsed: Duration::ZERO,
    };
    if depth == 0 {
        report.nodes = 1;
    } else {
        for mv in &movegen::generate(tables, board) {
            let mut copy = *board;
            if !moves::make(tables, &mut copy, *mv, MoveType::AllMoves) {
                continue;
            }
            let nodes = perft(tables, &mut copy, depth - 1);
            report.moves.push((*mv, nodes));
            report.nodes += nodes;
        }
    }
    report.elapsed = start.elapsed();
    info!(
        "perft({}) = {} in {} ms",
        depth,
        report.nodes,
        report.elapsed.as_millis()
    );
    report
}
