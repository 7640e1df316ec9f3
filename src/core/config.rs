//! Engine configuration.
//!
//! Hosts configure the engine at startup by providing:
//! - `Timings`: How long each scheduled phase lasts (peek, preview, banners)
//! - `Scoring`: Match reward and mismatch penalty
//! - `StoreKeys`: Where snapshots and progression live in the key/value store
//! - `EngineConfig`: Combines all configuration
//!
//! Configuration can be built in code with the `with_*` builders or parsed
//! from TOML. Missing TOML fields fall back to the defaults below.
//!
//! ```
//! use match_pairs::core::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     auto_advance = false
//!
//!     [timings]
//!     peek_ms = 750
//! "#).unwrap();
//!
//! assert!(!config.auto_advance);
//! assert_eq!(config.timings.peek().as_millis(), 750);
//! assert_eq!(config.timings.preview().as_millis(), 1500);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};

/// Durations of the engine's scheduled phases, in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// How long both faces of a pair stay visible before resolution.
    pub peek_ms: u64,
    /// How long the combo banner stays up after a match.
    pub combo_banner_ms: u64,
    /// How long every card is shown at level start.
    pub preview_ms: u64,
    /// How long the level-complete banner stays up.
    pub level_banner_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            peek_ms: 1000,
            combo_banner_ms: 500,
            preview_ms: 1500,
            level_banner_ms: 2000,
        }
    }
}

impl Timings {
    #[must_use]
    pub fn peek(&self) -> Duration {
        Duration::from_millis(self.peek_ms)
    }

    #[must_use]
    pub fn combo_banner(&self) -> Duration {
        Duration::from_millis(self.combo_banner_ms)
    }

    #[must_use]
    pub fn preview(&self) -> Duration {
        Duration::from_millis(self.preview_ms)
    }

    #[must_use]
    pub fn level_banner(&self) -> Duration {
        Duration::from_millis(self.level_banner_ms)
    }
}

/// Point values applied on resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scoring {
    /// Base reward per match, multiplied by the combo multiplier.
    pub match_reward: i64,
    /// Points subtracted on a mismatch.
    pub mismatch_penalty: i64,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            match_reward: 10,
            mismatch_penalty: 2,
        }
    }
}

/// Keys used in the persistent key/value store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreKeys {
    /// Key of the serialized in-progress snapshot.
    pub snapshot: String,
    /// Key of the highest unlocked level index.
    pub progression: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            snapshot: "SaveData".to_string(),
            progression: "MaxUnlockedLevel".to_string(),
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub timings: Timings,
    pub scoring: Scoring,
    pub keys: StoreKeys,

    /// Start the next level automatically when the level banner expires.
    pub auto_advance: bool,

    /// Show every card briefly after a level is built.
    pub preview_on_start: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            scoring: Scoring::default(),
            keys: StoreKeys::default(),
            auto_advance: true,
            preview_on_start: true,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would make the engine misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.scoring.match_reward <= 0 {
            return Err(GameError::InvalidConfig(format!(
                "match_reward must be positive, got {}",
                self.scoring.match_reward
            )));
        }
        if self.scoring.mismatch_penalty < 0 {
            return Err(GameError::InvalidConfig(format!(
                "mismatch_penalty must not be negative, got {}",
                self.scoring.mismatch_penalty
            )));
        }
        if self.keys.snapshot.is_empty() || self.keys.progression.is_empty() {
            return Err(GameError::InvalidConfig("store keys must not be empty".to_string()));
        }
        if self.keys.snapshot == self.keys.progression {
            return Err(GameError::InvalidConfig(
                "snapshot and progression keys must differ".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }

    #[must_use]
    pub fn with_keys(mut self, keys: StoreKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Enable or disable automatic advance after the level banner.
    #[must_use]
    pub fn with_auto_advance(mut self, enabled: bool) -> Self {
        self.auto_advance = enabled;
        self
    }

    /// Enable or disable the level-start preview.
    #[must_use]
    pub fn with_preview(mut self, enabled: bool) -> Self {
        self.preview_on_start = enabled;
        self
    }
}
