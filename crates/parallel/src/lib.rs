//! # pointgrid Parallel
//!
//! Evaluation strategies for filling lattice-shaped grids.
//!
//! This crate provides:
//! - Band-wise grid fill that writes straight into the output
//! - Sequential or Rayon-parallel execution of independent bands

pub mod strategy;
pub mod tiled;

pub use strategy::{ParallelStrategy, ProcessingMode};
pub use tiled::{Tile, TiledProcessor};
