//! postgate Layout - Grid Packing
//!
//! Splits a flat sequence of items into fixed-width rows for grid
//! rendering. The final row is padded with placeholders so every row has
//! the same number of cells and columns stay aligned.
//!
//! **IMPORTANT**: This layer is pure Rust - no I/O, no async, no state.

pub mod grid;

pub use grid::{Cell, GridPacker, LayoutError, Row, pack};
