//! Card identification.
//!
//! Two different numbers describe a card:
//! - `SymbolId`: which face the card shows. Exactly two cards per level share it.
//! - `CardIndex`: where the card sits on the board, in row-major cell order.
//!
//! The engine only ever refers to cards by `CardIndex`, never by reference,
//! so nothing it holds can outlive a board rebuild.
//!
//! ```
//! use match_pairs::cards::{CardIndex, SymbolId};
//!
//! let index = CardIndex::new(5);
//! assert_eq!(index.index(), 5);
//! assert_eq!(format!("{}", SymbolId::new(2)), "Symbol(2)");
//! ```

use serde::{Deserialize, Serialize};

/// Symbol (face) identity of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

impl SymbolId {
    /// Create a new symbol ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for SymbolId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Position of a card on the board (row-major cell order).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardIndex(pub u32);

impl CardIndex {
    /// Create a new card index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the index as a `usize` for slice access.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for CardIndex {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for CardIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cell({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_id() {
        let id = SymbolId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(SymbolId::from(7), id);
        assert_eq!(format!("{}", id), "Symbol(7)");
    }

    #[test]
    fn test_card_index() {
        let index = CardIndex::new(3);
        assert_eq!(index.index(), 3);
        assert_eq!(format!("{}", index), "Cell(3)");
        assert!(CardIndex::new(1) < CardIndex::new(2));
    }

    #[test]
    fn test_serialization_is_transparent() {
        let json = serde_json::to_string(&SymbolId(4)).unwrap();
        assert_eq!(json, "4");
        let back: CardIndex = serde_json::from_str("9").unwrap();
        assert_eq!(back, CardIndex(9));
    }
}
