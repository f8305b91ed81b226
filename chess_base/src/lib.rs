//! # Base types for magicmove
//!
//! This is an auxiliary crate for `magicmove`, which contains the board types together with the
//! slow attack generators and the magic number search. It is split from the main crate, so
//! everything declared here can be used in the build script for `magicmove`.
//!
//! Normally you don't want to use this crate directly. Use `magicmove` instead.

pub mod bitboard;
pub mod geometry;
pub mod magic;
pub mod rays;
pub mod types;
