//! Board: owns the cards of the active level.
//!
//! Cards live in a flat `Vec` in row-major order and are addressed by
//! [`CardIndex`]. The board is rebuilt wholesale for each level; it is never
//! patched card by card across levels.
//!
//! ## Generation token
//!
//! Every `build` and `clear` bumps `generation`. Scheduled work captures the
//! generation when it is queued and is discarded if the board has been
//! rebuilt since.
//!
//! ## Usage
//!
//! ```
//! use match_pairs::board::Board;
//! use match_pairs::cards::{CardIndex, SymbolId};
//! use match_pairs::levels::LevelDefinition;
//!
//! let level = LevelDefinition::new(0, 2, 2, 2);
//! let faces: Vec<SymbolId> = [0, 1, 1, 0].into_iter().map(SymbolId::new).collect();
//!
//! let mut board = Board::new();
//! board.build(&level, &faces).unwrap();
//!
//! assert_eq!(board.len(), 4);
//! assert_eq!(board.index_at(1, 1), Some(CardIndex::new(3)));
//! assert_eq!(board.card(CardIndex::new(3)).unwrap().symbol, SymbolId::new(0));
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardIndex, SymbolId};
use crate::core::error::{GameError, Result};
use crate::levels::LevelDefinition;

/// The active level's cards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Level this board was built from. `None` when cleared.
    level: Option<LevelDefinition>,

    /// Cards in row-major cell order.
    cards: Vec<Card>,

    /// Bumped on every build and clear.
    generation: u64,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that `assignment` can be laid out on `level`.
    ///
    /// Does not touch the board, so a failed check leaves the current
    /// cards in place.
    pub fn check_assignment(level: &LevelDefinition, assignment: &[SymbolId]) -> Result<()> {
        level.validate()?;
        if assignment.len() != level.cell_count() {
            return Err(GameError::AssignmentLength {
                expected: level.cell_count(),
                actual: assignment.len(),
            });
        }
        if let Some(bad) = assignment
            .iter()
            .find(|symbol| symbol.raw() as usize >= level.symbol_count)
        {
            return Err(GameError::SymbolOutOfRange {
                symbol: bad.raw(),
                symbols: level.symbol_count,
            });
        }
        Ok(())
    }

    /// Replace the board with face-down cards showing `assignment` positionally.
    ///
    /// On error the existing board is left untouched.
    pub fn build(&mut self, level: &LevelDefinition, assignment: &[SymbolId]) -> Result<()> {
        if let Err(err) = Self::check_assignment(level, assignment) {
            log::error!("Board generation for level {} aborted: {}", level.index, err);
            return Err(err);
        }

        self.cards = assignment.iter().copied().map(Card::new).collect();
        self.level = Some(*level);
        self.generation += 1;
        log::debug!(
            "Built {}x{} board for level {} (generation {})",
            level.grid_width,
            level.grid_height,
            level.index,
            self.generation
        );
        Ok(())
    }

    /// Discard every card.
    pub fn clear(&mut self) {
        self.cards.clear();
        self.level = None;
        self.generation += 1;
    }

    /// Current generation token.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Level the board was built from.
    #[must_use]
    pub fn level(&self) -> Option<&LevelDefinition> {
        self.level.as_ref()
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Is the board empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Grid width (0 when cleared).
    #[must_use]
    pub fn width(&self) -> usize {
        self.level.map_or(0, |l| l.grid_width)
    }

    /// Grid height (0 when cleared).
    #[must_use]
    pub fn height(&self) -> usize {
        self.level.map_or(0, |l| l.grid_height)
    }

    /// Number of pairs on the board.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    /// Get a card.
    #[must_use]
    pub fn card(&self, index: CardIndex) -> Option<&Card> {
        self.cards.get(index.index())
    }

    pub(crate) fn card_mut(&mut self, index: CardIndex) -> Option<&mut Card> {
        self.cards.get_mut(index.index())
    }

    /// All cards in cell order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Iterate over `(index, card)` pairs in cell order.
    pub fn iter(&self) -> impl Iterator<Item = (CardIndex, &Card)> {
        self.cards
            .iter()
            .enumerate()
            .map(|(i, card)| (CardIndex::new(i as u32), card))
    }

    /// Index of the card at column `x`, row `y`.
    #[must_use]
    pub fn index_at(&self, x: usize, y: usize) -> Option<CardIndex> {
        let (w, h) = (self.width(), self.height());
        (x < w && y < h).then(|| CardIndex::new((y * w + x) as u32))
    }

    /// Column and row of a card.
    #[must_use]
    pub fn position_of(&self, index: CardIndex) -> Option<(usize, usize)> {
        let w = self.width();
        (index.index() < self.cards.len()).then(|| (index.index() % w, index.index() / w))
    }

    /// Number of matched pairs currently on the board.
    #[must_use]
    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|c| c.matched).count() / 2
    }

    /// Turn every card face-up. Returns the cards that changed.
    pub fn reveal_all(&mut self) -> Vec<CardIndex> {
        self.cards
            .iter_mut()
            .enumerate()
            .filter_map(|(i, card)| card.reveal().then_some(CardIndex::new(i as u32)))
            .collect()
    }

    /// Turn every unmatched card face-down. Returns the cards that changed.
    pub fn hide_unmatched(&mut self) -> Vec<CardIndex> {
        self.cards
            .iter_mut()
            .enumerate()
            .filter(|(_, card)| !card.matched)
            .filter_map(|(i, card)| card.hide().then_some(CardIndex::new(i as u32)))
            .collect()
    }
}
