use serde::{Deserialize, Serialize};

use crate::*;

/// Cooking stage of a single griddle hole.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoleState {
    Empty,
    Batter,
    Filled,
    Cooking,
    Burnt,
}

impl HoleState {
    /// Whether the cook tick advances this stage.
    pub const fn is_on_griddle(self) -> bool {
        matches!(self, Self::Filled | Self::Cooking)
    }
}

impl Default for HoleState {
    fn default() -> Self {
        Self::Empty
    }
}

/// One hole of the griddle.
///
/// `progress` is meaningful only while on the griddle or burnt: it is held
/// at 0 for `Empty`/`Batter` and pinned at [`BURNT_AT`] for `Burnt`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    state: HoleState,
    progress: Progress,
    flip_count: u32,
}

impl Hole {
    pub const fn state(&self) -> HoleState {
        self.state
    }

    pub const fn progress(&self) -> Progress {
        self.progress
    }

    pub const fn flip_count(&self) -> u32 {
        self.flip_count
    }

    pub fn is_boxable(&self) -> bool {
        self.state.is_on_griddle() && self.progress >= BOXABLE_MIN && self.progress < BURNT_AT
    }

    pub fn is_flippable(&self) -> bool {
        self.state.is_on_griddle() && self.progress > FLIP_MIN
    }

    /// Pour batter into an empty hole.
    pub fn pour(&mut self) -> bool {
        if self.state != HoleState::Empty {
            return false;
        }
        self.state = HoleState::Batter;
        self.progress = 0.0;
        true
    }

    /// Drop the filling into poured batter and start it cooking.
    pub fn fill(&mut self) -> bool {
        if self.state != HoleState::Batter {
            return false;
        }
        self.state = HoleState::Filled;
        self.progress = FILLED_START;
        true
    }

    /// Flip the piece, trading some doneness for not burning.
    ///
    /// Refused while too raw (`progress <= FLIP_MIN`); the result never
    /// drops below [`FLIP_FLOOR`].
    pub fn flip(&mut self) -> bool {
        if !self.is_flippable() {
            return false;
        }
        self.state = HoleState::Cooking;
        self.progress = (self.progress - FLIP_SETBACK).max(FLIP_FLOOR);
        self.flip_count += 1;
        true
    }

    /// Take a finished piece off the griddle.
    ///
    /// Only allowed inside the boxable window; reports whether the piece
    /// was perfect.
    pub fn pack(&mut self) -> Option<bool> {
        if !self.is_boxable() {
            return None;
        }
        let perfect = self.progress >= PERFECT_MIN;
        self.reset();
        Some(perfect)
    }

    /// Scrape a burnt piece out of the hole.
    pub fn scrape(&mut self) -> bool {
        if self.state != HoleState::Burnt {
            return false;
        }
        self.reset();
        true
    }

    /// Advance doneness by one cook step; burning pins progress at
    /// [`BURNT_AT`].
    pub fn advance(&mut self, step: Progress) -> CookOutcome {
        if !self.state.is_on_griddle() {
            return CookOutcome::NoChange;
        }
        let next = self.progress + step;
        if next >= BURNT_AT {
            self.state = HoleState::Burnt;
            self.progress = BURNT_AT;
            CookOutcome::Burnt
        } else {
            self.progress = next;
            CookOutcome::Progressed
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for Hole {
    fn default() -> Self {
        Self {
            state: HoleState::Empty,
            progress: 0.0,
            flip_count: 0,
        }
    }
}
