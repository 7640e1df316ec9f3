//! Scheduled delays.
//!
//! The engine never blocks. Anything that should happen "after a while"
//! (resolving a pair, ending the preview, hiding a banner) is queued here as a
//! [`ScheduledTask`] and runs when the host advances time.
//!
//! ## Tokens
//!
//! Each task captures the board generation it was scheduled against. A task
//! whose token no longer matches the board is stale and must do nothing:
//! the level was rebuilt while it was waiting.
//!
//! ## Ordering
//!
//! Tasks run in due-time order; ties run in scheduling order.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardIndex;

/// What a scheduled task does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Compare the two flipped cards.
    Resolve { first: CardIndex, second: CardIndex },
    /// Flip every card back down and accept flips.
    PreviewEnd,
    /// Hide the combo banner.
    ComboBannerEnd,
    /// Leave the level-complete banner (and maybe start the next level).
    LevelBannerEnd,
}

impl TimerKind {
    /// Does this task touch the board, and so need a matching token?
    #[must_use]
    pub const fn is_board_bound(self) -> bool {
        !matches!(self, Self::ComboBannerEnd)
    }
}

/// A queued task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// What to do.
    pub kind: TimerKind,

    /// Engine time at which the task is due.
    pub due: Duration,

    /// Board generation when the task was scheduled.
    pub token: u64,

    /// Scheduling order, for stable ties.
    seq: u64,
}

/// Pending tasks plus the engine's notion of "now".
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    tasks: SmallVec<[ScheduledTask; 4]>,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current engine time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue a task to run `delay` from now.
    pub fn schedule(&mut self, kind: TimerKind, delay: Duration, token: u64) -> ScheduledTask {
        let task = ScheduledTask {
            kind,
            due: self.now + delay,
            token,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.tasks.push(task);
        task
    }

    /// Remove and return the earliest task due at or before `until`,
    /// moving "now" to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<ScheduledTask> {
        let pos = self.earliest()?;
        if self.tasks[pos].due > until {
            return None;
        }
        let task = self.tasks.remove(pos);
        self.now = self.now.max(task.due);
        Some(task)
    }

    /// Remove and return the earliest task regardless of due time.
    pub fn pop_next(&mut self) -> Option<ScheduledTask> {
        let pos = self.earliest()?;
        let task = self.tasks.remove(pos);
        self.now = self.now.max(task.due);
        Some(task)
    }

    /// Move "now" forward (never backward).
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }

    /// Remove a specific task. Returns `false` if it is not pending.
    pub fn remove(&mut self, task: &ScheduledTask) -> bool {
        match self.tasks.iter().position(|t| t == task) {
            Some(pos) => {
                self.tasks.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Pending tasks in due order.
    #[must_use]
    pub fn pending(&self) -> Vec<ScheduledTask> {
        let mut tasks = self.tasks.to_vec();
        tasks.sort_by_key(|t| (t.due, t.seq));
        tasks
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn earliest(&self) -> Option<usize> {
        self.tasks
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)
    }
}
