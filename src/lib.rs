//! A cubie-level model of the 3x3x3 Rubik's cube, with a layer-by-layer solver (cross, F2L,
//! OLL, PLL) whose lookup tables are derived by a bounded search over the cube's state graph.

#![deny(missing_docs)]

pub mod cube333;
pub mod error;
pub mod moves;
