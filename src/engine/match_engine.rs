//! The match engine: turn state machine, scoring, and level flow.
//!
//! ## Turn cycle
//!
//! 1. `request_flip` on a face-down card moves `Idle` to `OneFlipped`.
//! 2. A second `request_flip` moves to `Resolving` and schedules resolution
//!    after the peek interval. Flips are rejected until it runs.
//! 3. Resolution either matches the pair (streak and combo up, reward
//!    `match_reward * combo`) or hides both cards again (penalty, streak and
//!    combo back to zero), then returns to `Idle`.
//! 4. Matching the last pair enters `LevelComplete` instead, emits
//!    `LevelCompleted` exactly once and raises the unlock gate.
//!
//! ## Time
//!
//! The engine has no clock. Hosts call [`MatchEngine::advance_time`] with
//! elapsed frame time, or [`MatchEngine::settle`] to run everything pending
//! at once. Hosts with their own scheduler can read
//! [`MatchEngine::pending_timers`] and hand tasks back to
//! [`MatchEngine::fire`].
//!
//! ## Example
//!
//! ```
//! use match_pairs::core::{EngineConfig, GameRng};
//! use match_pairs::engine::{FlipOutcome, LevelStart, MatchEngine, Phase};
//! use match_pairs::levels::LevelCatalog;
//! use match_pairs::cards::CardIndex;
//!
//! let config = EngineConfig::new().with_preview(false);
//! let mut engine = MatchEngine::new(config, LevelCatalog::new([(2, 2, 2)]), GameRng::new(7));
//!
//! assert_eq!(engine.new_game().unwrap(), LevelStart::Started(0));
//! assert_eq!(engine.request_flip(CardIndex::new(0)), FlipOutcome::FirstFlipped);
//! assert_eq!(engine.request_flip(CardIndex::new(1)), FlipOutcome::PairPending);
//!
//! engine.settle();
//! assert!(matches!(engine.phase(), Phase::Idle | Phase::LevelComplete));
//! ```

use std::time::Duration;

use crate::board::{generate_pair_sequence, Board};
use crate::cards::{CardIndex, SymbolId};
use crate::core::config::EngineConfig;
use crate::core::error::{GameError, Result};
use crate::core::rng::GameRng;
use crate::levels::{LevelCatalog, LevelDefinition, Progression};

use super::event::EngineEvent;
use super::outcome::{FlipOutcome, IgnoreReason, LevelStart, Resolution};
use super::state::{MatchEngineState, Phase};
use super::timer::{ScheduledTask, TimerKind, TimerQueue};

/// Scalar counters carried by a save.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    pub score: i64,
    pub combo_multiplier: u32,
    pub match_streak: u32,
}

/// The memory-matching game engine.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    config: EngineConfig,
    catalog: LevelCatalog,
    progression: Progression,
    board: Board,
    state: MatchEngineState,
    rng: GameRng,
    timers: TimerQueue,
    events: Vec<EngineEvent>,
    last_resolution: Option<Resolution>,
}

impl MatchEngine {
    /// Create an engine. No board exists until a level is started.
    #[must_use]
    pub fn new(config: EngineConfig, catalog: LevelCatalog, rng: GameRng) -> Self {
        Self {
            config,
            catalog,
            progression: Progression::new(),
            board: Board::new(),
            state: MatchEngineState::new(),
            rng,
            timers: TimerQueue::new(),
            events: Vec::new(),
            last_resolution: None,
        }
    }

    /// Create an engine with a seeded RNG.
    #[must_use]
    pub fn with_seed(config: EngineConfig, catalog: LevelCatalog, seed: u64) -> Self {
        Self::new(config, catalog, GameRng::new(seed))
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn progression(&self) -> Progression {
        self.progression
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn state(&self) -> &MatchEngineState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    #[must_use]
    pub fn score(&self) -> i64 {
        self.state.score
    }

    #[must_use]
    pub fn combo_multiplier(&self) -> u32 {
        self.state.combo_multiplier
    }

    #[must_use]
    pub fn match_streak(&self) -> u32 {
        self.state.match_streak
    }

    #[must_use]
    pub fn matched_pairs(&self) -> u32 {
        self.state.matched_pairs
    }

    #[must_use]
    pub fn current_level(&self) -> usize {
        self.state.current_level
    }

    /// Is a level being played (and therefore worth saving)?
    #[must_use]
    pub fn is_level_in_progress(&self) -> bool {
        self.state.phase.is_in_progress()
    }

    /// Outcome of the most recent pair resolution.
    #[must_use]
    pub fn last_resolution(&self) -> Option<Resolution> {
        self.last_resolution
    }

    /// Take all queued events.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queued events, without taking them.
    #[must_use]
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Pending scheduled tasks in due order.
    #[must_use]
    pub fn pending_timers(&self) -> Vec<ScheduledTask> {
        self.timers.pending()
    }

    /// Engine time, advanced by `advance_time` and `settle`.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Merge a stored unlock gate into the engine's own.
    pub fn restore_progression(&mut self, progression: Progression) {
        self.progression.merge(progression);
    }

    // === Level flow ===

    /// Reset score and streak, then start level 0.
    pub fn new_game(&mut self) -> Result<LevelStart> {
        self.check_level(0)?;
        self.abandon_level();
        self.state.reset();
        self.emit(EngineEvent::ScoreChanged(0));
        self.emit(EngineEvent::ComboChanged(0));
        log::info!("New game");
        self.begin_level(0)
    }

    /// Start a level. Only valid before the first level or after one finished.
    ///
    /// `index == catalog.len()` reports `GameComplete`; larger indices are a
    /// configuration error. Score, streak and combo carry over.
    pub fn start_level(&mut self, index: usize) -> Result<LevelStart> {
        if !self.state.phase.can_start_level() {
            log::debug!("Ignoring start of level {} during {:?}", index, self.state.phase);
            return Ok(LevelStart::Ignored);
        }
        self.begin_level(index)
    }

    /// Start the level after the one just completed.
    pub fn advance_level(&mut self) -> Result<LevelStart> {
        if self.state.phase != Phase::LevelComplete {
            return Ok(LevelStart::Ignored);
        }
        match self.catalog.advance(self.state.current_level) {
            Some(next) => self.begin_level(next),
            None => {
                self.finish_game();
                Ok(LevelStart::GameComplete)
            }
        }
    }

    /// Abandon whatever is in progress and start an unlocked level.
    ///
    /// Keeps the score; resets streak and combo.
    pub fn select_level(&mut self, index: usize) -> Result<LevelStart> {
        self.catalog.level(index)?;
        if !self.progression.is_unlocked(index) {
            return Err(GameError::LevelLocked {
                index,
                max_unlocked: self.progression.max_unlocked_level(),
            });
        }
        self.check_level(index)?;
        self.abandon_level();
        self.reset_streak();
        self.begin_level(index)
    }

    /// Rebuild the current level with a fresh shuffle.
    ///
    /// Keeps the score; resets streak and combo.
    pub fn restart_level(&mut self) -> Result<LevelStart> {
        if self.state.phase == Phase::NotStarted {
            return Ok(LevelStart::Ignored);
        }
        let index = self.state.current_level;
        self.check_level(index)?;
        self.abandon_level();
        self.reset_streak();
        self.begin_level(index)
    }

    /// Show every card briefly, blocking flips until the preview timer fires.
    ///
    /// Only valid between turns. Returns `false` if nothing happened.
    pub fn preview_all(&mut self) -> bool {
        if self.state.phase != Phase::Idle {
            return false;
        }
        self.start_preview();
        true
    }

    // === Turns ===

    /// Flip a card face-up.
    ///
    /// Ignored while previewing or resolving, between levels, for matched
    /// cards and for cards already flipped this turn.
    pub fn request_flip(&mut self, index: CardIndex) -> FlipOutcome {
        if !self.state.phase.accepts_flips() {
            return FlipOutcome::Ignored(IgnoreReason::NotAccepting);
        }
        let Some(card) = self.board.card(index) else {
            log::warn!("Flip request for {} outside a {}-card board", index, self.board.len());
            return FlipOutcome::Ignored(IgnoreReason::OutOfRange);
        };
        if card.matched {
            return FlipOutcome::Ignored(IgnoreReason::Matched);
        }
        if !card.is_flippable() || self.state.is_flipped_this_turn(index) {
            return FlipOutcome::Ignored(IgnoreReason::AlreadyFlipped);
        }

        let outcome = match self.state.phase {
            Phase::Idle => {
                self.state.phase = Phase::OneFlipped { first: index };
                FlipOutcome::FirstFlipped
            }
            Phase::OneFlipped { first } => {
                self.state.phase = Phase::Resolving { first, second: index };
                self.timers.schedule(
                    TimerKind::Resolve { first, second: index },
                    self.config.timings.peek(),
                    self.board.generation(),
                );
                FlipOutcome::PairPending
            }
            _ => return FlipOutcome::Ignored(IgnoreReason::NotAccepting),
        };

        if let Some(card) = self.board.card_mut(index) {
            card.reveal();
        }
        self.emit(EngineEvent::CardFaceChanged { index, face_up: true });
        log::debug!("Flipped {} ({:?})", index, outcome);
        outcome
    }

    // === Time ===

    /// Advance engine time, running every task that falls due.
    pub fn advance_time(&mut self, elapsed: Duration) {
        let target = self.timers.now() + elapsed;
        while let Some(task) = self.timers.pop_due(target) {
            self.run_task(task);
        }
        self.timers.advance_to(target);
    }

    /// Run every pending task now, including ones scheduled while running.
    pub fn settle(&mut self) {
        while let Some(task) = self.timers.pop_next() {
            self.run_task(task);
        }
    }

    /// Run a task obtained from `pending_timers`.
    ///
    /// Returns `true` if the task changed anything. Tasks that already ran,
    /// or that belong to a board since rebuilt, do nothing.
    pub fn fire(&mut self, task: ScheduledTask) -> bool {
        if !self.timers.remove(&task) {
            return false;
        }
        self.run_task(task)
    }

    fn run_task(&mut self, task: ScheduledTask) -> bool {
        if task.kind.is_board_bound() && task.token != self.board.generation() {
            log::debug!("Dropping stale {:?} (token {})", task.kind, task.token);
            return false;
        }

        match task.kind {
            TimerKind::Resolve { first, second } => {
                if self.state.phase != (Phase::Resolving { first, second }) {
                    return false;
                }
                self.resolve(first, second);
                true
            }
            TimerKind::PreviewEnd => {
                if self.state.phase != Phase::Previewing {
                    return false;
                }
                self.end_preview();
                true
            }
            TimerKind::ComboBannerEnd => {
                self.emit(EngineEvent::ComboBannerHidden);
                true
            }
            TimerKind::LevelBannerEnd => {
                if self.state.phase != Phase::LevelComplete || !self.config.auto_advance {
                    return false;
                }
                match self.advance_level() {
                    Ok(_) => true,
                    Err(err) => {
                        log::error!("Could not advance past level {}: {}", self.state.current_level, err);
                        false
                    }
                }
            }
        }
    }

    // === Internals ===

    fn resolve(&mut self, first: CardIndex, second: CardIndex) {
        let symbols = (
            self.board.card(first).map(|c| c.symbol),
            self.board.card(second).map(|c| c.symbol),
        );
        let (Some(a), Some(b)) = symbols else {
            self.state.phase = Phase::Idle;
            return;
        };

        if a == b {
            for index in [first, second] {
                if let Some(card) = self.board.card_mut(index) {
                    card.mark_matched();
                }
                self.emit(EngineEvent::CardMatched { index });
            }

            self.state.matched_pairs += 1;
            self.state.match_streak += 1;
            self.state.combo_multiplier = self.state.match_streak;
            let combo = self.state.combo_multiplier;
            let gained = self.config.scoring.match_reward * i64::from(combo);
            self.state.score += gained;
            self.last_resolution = Some(Resolution::Match { gained, combo });
            log::debug!("Match {}: +{} (combo x{})", a, gained, combo);

            self.emit(EngineEvent::ScoreChanged(self.state.score));
            self.emit(EngineEvent::ComboChanged(combo));
            self.emit(EngineEvent::ComboBannerShown(combo));
            self.timers.schedule(
                TimerKind::ComboBannerEnd,
                self.config.timings.combo_banner(),
                self.board.generation(),
            );

            if self.state.matched_pairs as usize >= self.board.pair_count() {
                self.complete_level();
            } else {
                self.state.phase = Phase::Idle;
            }
        } else {
            for index in [first, second] {
                if let Some(card) = self.board.card_mut(index) {
                    card.hide();
                }
                self.emit(EngineEvent::CardFaceChanged { index, face_up: false });
            }

            let lost = self.config.scoring.mismatch_penalty;
            self.state.score -= lost;
            self.last_resolution = Some(Resolution::Mismatch { lost });
            log::debug!("Mismatch {} / {}: -{}", a, b, lost);

            self.emit(EngineEvent::ScoreChanged(self.state.score));
            self.reset_streak();
            self.state.phase = Phase::Idle;
        }
    }

    fn complete_level(&mut self) {
        let level = self.state.current_level;
        self.state.phase = Phase::LevelComplete;
        if self.progression.record_completion(level) {
            log::info!("Unlocked level {}", self.progression.max_unlocked_level());
        }
        log::info!("Level {} complete, score {}", level, self.state.score);
        self.emit(EngineEvent::LevelCompleted(level));
        self.timers.schedule(
            TimerKind::LevelBannerEnd,
            self.config.timings.level_banner(),
            self.board.generation(),
        );
    }

    fn finish_game(&mut self) {
        if self.state.phase == Phase::GameComplete {
            return;
        }
        self.state.phase = Phase::GameComplete;
        log::info!("Game complete, final score {}", self.state.score);
        self.emit(EngineEvent::GameCompleted);
    }

    fn begin_level(&mut self, index: usize) -> Result<LevelStart> {
        if index == self.catalog.len() {
            self.finish_game();
            return Ok(LevelStart::GameComplete);
        }

        self.check_level(index)?;
        let level = *self.catalog.level(index)?;
        let faces = generate_pair_sequence(level.pair_count(), &mut self.rng);
        self.install_board(&level, &faces)?;

        if self.config.preview_on_start {
            self.start_preview();
        } else {
            self.state.phase = Phase::Idle;
        }
        log::info!("Started level {} ({}x{})", index, level.grid_width, level.grid_height);
        Ok(LevelStart::Started(index))
    }

    /// Fails if `index` cannot be built. The one-past-the-end index is fine.
    fn check_level(&self, index: usize) -> Result<()> {
        if index == self.catalog.len() {
            return Ok(());
        }
        if let Err(err) = self.catalog.level(index)?.validate() {
            log::error!("Level {} is misconfigured: {}", index, err);
            return Err(err);
        }
        Ok(())
    }

    /// Replace the board. Validates first, so a failure changes nothing.
    fn install_board(&mut self, level: &LevelDefinition, faces: &[SymbolId]) -> Result<()> {
        Board::check_assignment(level, faces)?;
        self.abandon_level();
        self.board.build(level, faces)?;
        self.state.matched_pairs = 0;
        self.state.current_level = level.index;
        self.emit(EngineEvent::LevelStarted {
            level: level.index,
            width: level.grid_width,
            height: level.grid_height,
        });
        Ok(())
    }

    fn abandon_level(&mut self) {
        self.board.clear();
        self.state.matched_pairs = 0;
        self.state.phase = Phase::NotStarted;
    }

    fn reset_streak(&mut self) {
        let had_combo = self.state.combo_multiplier != 0;
        self.state.reset_streak();
        if had_combo {
            self.emit(EngineEvent::ComboChanged(0));
        }
    }

    fn start_preview(&mut self) {
        self.state.phase = Phase::Previewing;
        self.emit(EngineEvent::PreviewStarted);
        for index in self.board.reveal_all() {
            self.emit(EngineEvent::CardFaceChanged { index, face_up: true });
        }
        self.timers.schedule(
            TimerKind::PreviewEnd,
            self.config.timings.preview(),
            self.board.generation(),
        );
    }

    fn end_preview(&mut self) {
        for index in self.board.hide_unmatched() {
            self.emit(EngineEvent::CardFaceChanged { index, face_up: false });
        }
        self.state.phase = Phase::Idle;
        self.emit(EngineEvent::PreviewEnded);
    }

    /// Install a restored board: `cards` are `(symbol, matched)` in cell order.
    ///
    /// Matched cards come back face-up, everything else face-down, and the
    /// engine resumes in `Idle`. Validates first, so a failure changes nothing.
    pub(crate) fn install_restored(
        &mut self,
        level_index: usize,
        cards: &[(SymbolId, bool)],
        counters: Counters,
    ) -> Result<()> {
        let level = *self.catalog.level(level_index)?;
        let faces: Vec<SymbolId> = cards.iter().map(|&(symbol, _)| symbol).collect();
        self.install_board(&level, &faces)?;

        for (i, &(_, matched)) in cards.iter().enumerate() {
            let index = CardIndex::new(i as u32);
            if !matched {
                continue;
            }
            if let Some(card) = self.board.card_mut(index) {
                card.mark_matched();
            }
            self.emit(EngineEvent::CardFaceChanged { index, face_up: true });
            self.emit(EngineEvent::CardMatched { index });
        }

        self.state.score = counters.score;
        if counters.combo_multiplier != counters.match_streak {
            log::warn!(
                "Restored combo {} disagrees with streak {}, using the streak",
                counters.combo_multiplier,
                counters.match_streak
            );
        }
        self.state.combo_multiplier = counters.match_streak;
        self.state.match_streak = counters.match_streak;
        self.state.matched_pairs = self.board.matched_pairs() as u32;
        self.state.phase = Phase::Idle;
        self.emit(EngineEvent::ScoreChanged(counters.score));
        self.emit(EngineEvent::ComboChanged(counters.match_streak));
        log::info!(
            "Restored level {} with {}/{} pairs matched",
            level_index,
            self.state.matched_pairs,
            self.board.pair_count()
        );
        Ok(())
    }

    fn emit(&mut self, event: EngineEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(catalog: LevelCatalog) -> MatchEngine {
        let config = EngineConfig::new().with_preview(false).with_auto_advance(false);
        MatchEngine::with_seed(config, catalog, 42)
    }

    /// Find the partner index of `index` on the current board.
    fn partner(engine: &MatchEngine, index: CardIndex) -> CardIndex {
        let symbol = engine.board().card(index).unwrap().symbol;
        engine
            .board()
            .iter()
            .find(|(i, c)| *i != index && c.symbol == symbol)
            .map(|(i, _)| i)
            .unwrap()
    }

    /// Find any card that does not match `index`.
    fn stranger(engine: &MatchEngine, index: CardIndex) -> CardIndex {
        let symbol = engine.board().card(index).unwrap().symbol;
        engine
            .board()
            .iter()
            .find(|(_, c)| c.symbol != symbol && !c.matched)
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn test_flip_before_start_is_ignored() {
        let mut engine = engine_with(LevelCatalog::new([(2, 2, 2)]));
        assert_eq!(
            engine.request_flip(CardIndex::new(0)),
            FlipOutcome::Ignored(IgnoreReason::NotAccepting)
        );
    }

    #[test]
    fn test_duplicate_click_is_noop() {
        let mut engine = engine_with(LevelCatalog::new([(2, 2, 2)]));
        engine.new_game().unwrap();

        let a = CardIndex::new(0);
        assert_eq!(engine.request_flip(a), FlipOutcome::FirstFlipped);
        assert_eq!(
            engine.request_flip(a),
            FlipOutcome::Ignored(IgnoreReason::AlreadyFlipped)
        );
        assert_eq!(engine.phase(), Phase::OneFlipped { first: a });
    }

    #[test]
    fn test_third_flip_rejected_while_resolving() {
        let mut engine = engine_with(LevelCatalog::new([(4, 2, 4)]));
        engine.new_game().unwrap();

        let a = CardIndex::new(0);
        let b = stranger(&engine, a);
        engine.request_flip(a);
        engine.request_flip(b);
        assert!(engine.state().awaiting_resolution());

        let c = (0..8)
            .map(CardIndex::new)
            .find(|&i| i != a && i != b)
            .unwrap();
        assert_eq!(
            engine.request_flip(c),
            FlipOutcome::Ignored(IgnoreReason::NotAccepting)
        );

        // Not resolved until the peek interval passes
        engine.advance_time(Duration::from_millis(999));
        assert!(engine.state().awaiting_resolution());
        engine.advance_time(Duration::from_millis(1));
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_match_scores_with_combo() {
        let mut engine = engine_with(LevelCatalog::new([(4, 2, 4)]));
        engine.new_game().unwrap();

        let a = CardIndex::new(0);
        engine.request_flip(a);
        engine.request_flip(partner(&engine, a));
        engine.settle();

        assert_eq!(engine.score(), 10);
        assert_eq!(engine.combo_multiplier(), 1);
        assert_eq!(engine.match_streak(), 1);
        assert_eq!(engine.matched_pairs(), 1);
        assert!(engine.board().card(a).unwrap().matched);
        assert_eq!(
            engine.last_resolution(),
            Some(Resolution::Match { gained: 10, combo: 1 })
        );
        assert_eq!(
            engine.request_flip(a),
            FlipOutcome::Ignored(IgnoreReason::Matched)
        );
    }

    #[test]
    fn test_mismatch_penalizes_and_resets() {
        let mut engine = engine_with(LevelCatalog::new([(4, 2, 4)]));
        engine.new_game().unwrap();

        let a = CardIndex::new(0);
        engine.request_flip(a);
        engine.request_flip(partner(&engine, a));
        engine.settle();

        let c = engine.board().iter().find(|(_, c)| !c.matched).unwrap().0;
        let d = stranger(&engine, c);
        engine.request_flip(c);
        engine.request_flip(d);
        engine.settle();

        assert_eq!(engine.score(), 8);
        assert_eq!(engine.combo_multiplier(), 0);
        assert_eq!(engine.match_streak(), 0);
        assert!(!engine.board().card(c).unwrap().face_up);
        assert!(!engine.board().card(d).unwrap().face_up);
        assert_eq!(engine.last_resolution(), Some(Resolution::Mismatch { lost: 2 }));
    }

    #[test]
    fn test_level_complete_fires_once() {
        let mut engine = engine_with(LevelCatalog::new([(2, 2, 2), (2, 2, 2)]));
        engine.new_game().unwrap();
        engine.drain_events();

        for _ in 0..2 {
            let a = engine.board().iter().find(|(_, c)| !c.matched).unwrap().0;
            engine.request_flip(a);
            engine.request_flip(partner(&engine, a));
            engine.settle();
        }

        assert_eq!(engine.phase(), Phase::LevelComplete);
        assert_eq!(engine.progression().max_unlocked_level(), 1);

        // Further clicks do nothing
        for i in 0..4 {
            assert!(!engine.request_flip(CardIndex::new(i)).has_update());
        }
        engine.settle();

        let completions = engine
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, EngineEvent::LevelCompleted(_)))
            .count();
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_advance_keeps_score_and_reports_game_complete() {
        let mut engine = engine_with(LevelCatalog::new([(2, 2, 2)]));
        engine.new_game().unwrap();

        let a = CardIndex::new(0);
        engine.request_flip(a);
        engine.request_flip(partner(&engine, a));
        engine.settle();
        let a = engine.board().iter().find(|(_, c)| !c.matched).unwrap().0;
        engine.request_flip(a);
        engine.request_flip(partner(&engine, a));
        engine.settle();

        assert_eq!(engine.score(), 30);
        assert_eq!(engine.advance_level().unwrap(), LevelStart::GameComplete);
        assert_eq!(engine.phase(), Phase::GameComplete);
        assert_eq!(engine.score(), 30);
        assert!(engine.drain_events().contains(&EngineEvent::GameCompleted));

        // Advancing again is a no-op
        assert_eq!(engine.advance_level().unwrap(), LevelStart::Ignored);
    }

    #[test]
    fn test_start_level_rules() {
        let mut engine = engine_with(LevelCatalog::new([(2, 2, 2), (2, 2, 2)]));

        assert_eq!(
            engine.start_level(5),
            Err(GameError::LevelOutOfRange { index: 5, count: 2 })
        );
        assert_eq!(engine.phase(), Phase::NotStarted);

        assert_eq!(engine.start_level(1).unwrap(), LevelStart::Started(1));
        // Mid-level start requests are ignored
        assert_eq!(engine.start_level(0).unwrap(), LevelStart::Ignored);
        assert_eq!(engine.current_level(), 1);
    }

    #[test]
    fn test_start_past_last_level_is_game_complete() {
        let mut engine = engine_with(LevelCatalog::new([(2, 2, 2)]));
        assert_eq!(engine.start_level(1).unwrap(), LevelStart::GameComplete);
        assert_eq!(engine.phase(), Phase::GameComplete);
    }

    #[test]
    fn test_misconfigured_level_leaves_board_intact() {
        let mut engine = engine_with(LevelCatalog::new([(2, 2, 2), (4, 4, 3)]));
        engine.new_game().unwrap();
        let before = engine.board().clone();

        let a = CardIndex::new(0);
        engine.request_flip(a);
        engine.request_flip(partner(&engine, a));
        engine.settle();
        let a = engine.board().iter().find(|(_, c)| !c.matched).unwrap().0;
        engine.request_flip(a);
        engine.request_flip(partner(&engine, a));
        engine.settle();
        let finished = engine.board().clone();
        assert_eq!(finished.generation(), before.generation());

        assert_eq!(
            engine.advance_level(),
            Err(GameError::InsufficientSymbols { pairs: 8, symbols: 3 })
        );
        assert_eq!(engine.board(), &finished);
        assert_eq!(engine.phase(), Phase::LevelComplete);
    }

    #[test]
    fn test_misconfigured_select_leaves_board_intact() {
        let mut engine = engine_with(LevelCatalog::new([(2, 2, 2), (4, 4, 3)]));
        engine.new_game().unwrap();
        engine.request_flip(CardIndex::new(0));
        engine.restore_progression(Progression::with_unlocked(1));
        engine.drain_events();
        let board = engine.board().clone();
        let state = engine.state().clone();

        assert_eq!(
            engine.select_level(1),
            Err(GameError::InsufficientSymbols { pairs: 8, symbols: 3 })
        );
        assert_eq!(engine.board(), &board);
        assert_eq!(engine.state(), &state);
        assert_eq!(engine.phase(), Phase::OneFlipped { first: CardIndex::new(0) });
        assert!(engine.drain_events().is_empty());

        // The turn in progress carries on
        let other = partner(&engine, CardIndex::new(0));
        assert_eq!(engine.request_flip(other), FlipOutcome::PairPending);
    }

    #[test]
    fn test_misconfigured_new_game_leaves_board_intact() {
        let mut engine = engine_with(LevelCatalog::new([(4, 4, 3), (2, 2, 2)]));
        engine.restore_progression(Progression::with_unlocked(1));
        assert_eq!(engine.select_level(1).unwrap(), LevelStart::Started(1));
        let a = CardIndex::new(0);
        engine.request_flip(a);
        engine.request_flip(partner(&engine, a));
        engine.settle();
        engine.drain_events();
        let board = engine.board().clone();
        let state = engine.state().clone();

        assert_eq!(
            engine.new_game(),
            Err(GameError::InsufficientSymbols { pairs: 8, symbols: 3 })
        );
        assert_eq!(engine.board(), &board);
        assert_eq!(engine.state(), &state);
        assert_eq!(engine.score(), 10);
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_select_level_respects_unlock_gate() {
        let mut engine = engine_with(LevelCatalog::new([(2, 2, 2), (2, 2, 2)]));
        assert_eq!(
            engine.select_level(1),
            Err(GameError::LevelLocked { index: 1, max_unlocked: 0 })
        );

        engine.restore_progression(Progression::with_unlocked(1));
        assert_eq!(engine.select_level(1).unwrap(), LevelStart::Started(1));
    }

    #[test]
    fn test_preview_blocks_flips_until_timer() {
        let config = EngineConfig::new().with_auto_advance(false);
        let mut engine = MatchEngine::with_seed(config, LevelCatalog::new([(2, 2, 2)]), 1);
        engine.new_game().unwrap();

        assert_eq!(engine.phase(), Phase::Previewing);
        assert!(engine.board().cards().iter().all(|c| c.face_up));
        assert_eq!(
            engine.request_flip(CardIndex::new(0)),
            FlipOutcome::Ignored(IgnoreReason::NotAccepting)
        );

        engine.advance_time(Duration::from_millis(1500));
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.board().cards().iter().all(|c| !c.face_up));
        assert_eq!(engine.request_flip(CardIndex::new(0)), FlipOutcome::FirstFlipped);
    }

    #[test]
    fn test_preview_all_only_between_turns() {
        let mut engine = engine_with(LevelCatalog::new([(2, 2, 2)]));
        engine.new_game().unwrap();

        engine.request_flip(CardIndex::new(0));
        assert!(!engine.preview_all());

        let mut engine = engine_with(LevelCatalog::new([(2, 2, 2)]));
        engine.new_game().unwrap();
        assert!(engine.preview_all());
        assert_eq!(engine.phase(), Phase::Previewing);
        engine.settle();
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_restart_drops_pending_resolution() {
        let mut engine = engine_with(LevelCatalog::new([(2, 2, 2)]));
        engine.new_game().unwrap();

        let a = CardIndex::new(0);
        engine.request_flip(a);
        engine.request_flip(partner(&engine, a));
        let stale = engine.pending_timers()[0];

        engine.restart_level().unwrap();
        assert_eq!(engine.phase(), Phase::Idle);

        // The old resolution is still queued but targets a dead board
        assert!(!engine.fire(stale));
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.matched_pairs(), 0);
        assert!(engine.board().cards().iter().all(|c| !c.face_up));
    }

    #[test]
    fn test_fire_runs_task_once() {
        let mut engine = engine_with(LevelCatalog::new([(4, 2, 4)]));
        engine.new_game().unwrap();

        let a = CardIndex::new(0);
        engine.request_flip(a);
        engine.request_flip(partner(&engine, a));

        let task = engine.pending_timers()[0];
        assert!(engine.fire(task));
        assert!(!engine.fire(task));
        assert_eq!(engine.score(), 10);
    }

    #[test]
    fn test_auto_advance_after_banner() {
        let config = EngineConfig::new().with_preview(false);
        let mut engine = MatchEngine::with_seed(config, LevelCatalog::new([(2, 2, 2), (2, 2, 2)]), 3);
        engine.new_game().unwrap();

        for _ in 0..2 {
            let a = engine.board().iter().find(|(_, c)| !c.matched).unwrap().0;
            engine.request_flip(a);
            engine.request_flip(partner(&engine, a));
            engine.advance_time(Duration::from_millis(1000));
        }
        assert_eq!(engine.phase(), Phase::LevelComplete);

        engine.advance_time(Duration::from_millis(2000));
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.current_level(), 1);
        assert_eq!(engine.matched_pairs(), 0);
        assert_eq!(engine.score(), 30);
        assert_eq!(engine.match_streak(), 2);
    }

    #[test]
    fn test_combo_banner_events() {
        let mut engine = engine_with(LevelCatalog::new([(4, 2, 4)]));
        engine.new_game().unwrap();
        engine.drain_events();

        let a = CardIndex::new(0);
        engine.request_flip(a);
        engine.request_flip(partner(&engine, a));
        engine.advance_time(Duration::from_millis(1000));
        assert!(engine.drain_events().contains(&EngineEvent::ComboBannerShown(1)));

        engine.advance_time(Duration::from_millis(500));
        assert_eq!(engine.drain_events(), vec![EngineEvent::ComboBannerHidden]);
    }
}
