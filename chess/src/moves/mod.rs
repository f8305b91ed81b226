//! Move representation and application

mod base;

pub mod make;
pub mod uci;

pub use base::*;
pub use make::{make, make_selected, IllegalMove, MoveType};
