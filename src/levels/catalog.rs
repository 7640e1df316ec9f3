//! Level definitions and the ordered level catalog.
//!
//! Levels are authored content: the engine only reads them. A catalog can be
//! built in code, taken from [`LevelCatalog::standard`], or parsed from TOML:
//!
//! ```
//! use match_pairs::levels::LevelCatalog;
//!
//! let catalog = LevelCatalog::from_toml_str(r#"
//!     [[levels]]
//!     grid_width = 2
//!     grid_height = 2
//!     symbol_count = 2
//!
//!     [[levels]]
//!     grid_width = 4
//!     grid_height = 3
//!     symbol_count = 8
//! "#).unwrap();
//!
//! assert_eq!(catalog.len(), 2);
//! assert_eq!(catalog.get(1).unwrap().pair_count(), 6);
//! assert_eq!(catalog.advance(0), Some(1));
//! assert_eq!(catalog.advance(1), None);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};

/// One level: grid shape and how many distinct symbols the art set offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Position in play order (0-based).
    pub index: usize,

    /// Number of columns.
    pub grid_width: usize,

    /// Number of rows.
    pub grid_height: usize,

    /// Distinct symbol faces available; must cover every pair.
    pub symbol_count: usize,
}

impl LevelDefinition {
    /// Create a level definition. Call [`validate`](Self::validate) before use.
    #[must_use]
    pub const fn new(index: usize, grid_width: usize, grid_height: usize, symbol_count: usize) -> Self {
        Self {
            index,
            grid_width,
            grid_height,
            symbol_count,
        }
    }

    /// Total number of cards on the grid.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Number of pairs on the grid.
    #[must_use]
    pub const fn pair_count(&self) -> usize {
        self.cell_count() / 2
    }

    /// Check the grid is non-empty and even, and that there are enough symbols.
    pub fn validate(&self) -> Result<()> {
        let cells = self.cell_count();
        if cells == 0 || cells % 2 != 0 {
            return Err(GameError::InvalidGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.symbol_count < self.pair_count() {
            return Err(GameError::InsufficientSymbols {
                pairs: self.pair_count(),
                symbols: self.symbol_count,
            });
        }
        Ok(())
    }
}

/// Level entry as written in a TOML catalog; the index comes from its position.
#[derive(Deserialize)]
struct LevelEntry {
    grid_width: usize,
    grid_height: usize,
    symbol_count: usize,
}

#[derive(Deserialize)]
struct CatalogFile {
    levels: Vec<LevelEntry>,
}

/// Ordered list of level definitions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCatalog {
    levels: Vec<LevelDefinition>,
}

impl LevelCatalog {
    /// Build a catalog from `(width, height, symbol_count)` triples in play order.
    #[must_use]
    pub fn new(shapes: impl IntoIterator<Item = (usize, usize, usize)>) -> Self {
        let levels = shapes
            .into_iter()
            .enumerate()
            .map(|(index, (w, h, symbols))| LevelDefinition::new(index, w, h, symbols))
            .collect();
        Self { levels }
    }

    /// Built-in progression from a 2x2 warm-up to a 6x6 grid.
    #[must_use]
    pub fn standard() -> Self {
        Self::new([
            (2, 2, 2),
            (3, 2, 3),
            (4, 3, 6),
            (4, 4, 8),
            (5, 4, 10),
            (6, 5, 15),
            (6, 6, 18),
        ])
    }

    /// Parse a catalog from TOML. Every level is validated eagerly.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(text).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        if file.levels.is_empty() {
            return Err(GameError::InvalidConfig("catalog has no levels".to_string()));
        }

        let catalog = Self::new(
            file.levels
                .into_iter()
                .map(|e| (e.grid_width, e.grid_height, e.symbol_count)),
        );
        for level in &catalog.levels {
            level.validate()?;
        }
        Ok(catalog)
    }

    /// Number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Is the catalog empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get a level by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LevelDefinition> {
        self.levels.get(index)
    }

    /// Get a level by index, or a configuration error.
    pub fn level(&self, index: usize) -> Result<&LevelDefinition> {
        self.levels.get(index).ok_or(GameError::LevelOutOfRange {
            index,
            count: self.levels.len(),
        })
    }

    /// The level after `current`, or `None` if `current` is the last one.
    #[must_use]
    pub fn advance(&self, current: usize) -> Option<usize> {
        let next = current.checked_add(1)?;
        (next < self.levels.len()).then_some(next)
    }

    /// Iterate over all levels in play order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
