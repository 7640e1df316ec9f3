//! Board construction.
//!
//! - `shuffler`: unbiased pair-sequence generation
//! - `grid`: the `Board` that owns the active level's cards

pub mod grid;
pub mod shuffler;

pub use grid::Board;
pub use shuffler::{generate_pair_sequence, shuffle_in_place};
