//! Card entity - runtime state of one grid cell.
//!
//! A `Card` is created when a level is generated and is discarded with the
//! whole board; it is never moved between levels.
//!
//! ## Flags
//!
//! - `face_up`: the symbol is currently visible
//! - `matched`: the card has been paired and is no longer flip-eligible
//!
//! Matched cards stay face-up in practice, but only `matched` decides
//! eligibility.

use serde::{Deserialize, Serialize};

use super::ids::SymbolId;

/// State of a single card on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Symbol shown on the front.
    pub symbol: SymbolId,

    /// Is the front currently visible?
    pub face_up: bool,

    /// Has this card been matched with its partner?
    pub matched: bool,
}

impl Card {
    /// Create a face-down, unmatched card.
    #[must_use]
    pub const fn new(symbol: SymbolId) -> Self {
        Self {
            symbol,
            face_up: false,
            matched: false,
        }
    }

    /// Can the player flip this card?
    #[must_use]
    pub const fn is_flippable(&self) -> bool {
        !self.matched && !self.face_up
    }

    /// Turn the card face-up. Returns `true` if it changed.
    pub fn reveal(&mut self) -> bool {
        let changed = !self.face_up;
        self.face_up = true;
        changed
    }

    /// Turn the card face-down. Returns `true` if it changed.
    pub fn hide(&mut self) -> bool {
        let changed = self.face_up;
        self.face_up = false;
        changed
    }

    /// Mark the card as matched and keep it face-up.
    pub fn mark_matched(&mut self) {
        self.matched = true;
        self.face_up = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card_is_hidden() {
        let card = Card::new(SymbolId::new(1));
        assert!(!card.face_up);
        assert!(!card.matched);
        assert!(card.is_flippable());
    }

    #[test]
    fn test_reveal_and_hide_report_changes() {
        let mut card = Card::new(SymbolId::new(0));

        assert!(card.reveal());
        assert!(!card.reveal());
        assert!(!card.is_flippable());

        assert!(card.hide());
        assert!(!card.hide());
    }

    #[test]
    fn test_matched_card_is_never_flippable() {
        let mut card = Card::new(SymbolId::new(2));
        card.mark_matched();
        assert!(card.face_up);
        card.hide();
        assert!(!card.is_flippable());
    }
}
