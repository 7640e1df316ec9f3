//! Card identity and per-card state.
//!
//! - `ids`: `SymbolId` (face) and `CardIndex` (board position)
//! - `card`: `Card`, the state of one cell

pub mod card;
pub mod ids;

pub use card::Card;
pub use ids::{CardIndex, SymbolId};
