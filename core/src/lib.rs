#![no_std]

extern crate alloc;

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use hole::*;
pub use types::*;

mod engine;
mod error;
mod hole;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub duration_secs: u32,
}

impl GameConfig {
    pub const fn new_unchecked(duration_secs: u32) -> Self {
        Self { duration_secs }
    }

    pub fn new(duration_secs: u32) -> Self {
        Self::new_unchecked(duration_secs.clamp(1, 3600))
    }

    /// The fixed session length of a regular round.
    pub const fn standard() -> Self {
        Self::new_unchecked(SESSION_SECS)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Outcome of applying the selected tool to a hole.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ToolOutcome {
    NoChange,
    Poured,
    Filled,
    Flipped,
    Packed { perfect: bool },
    Scraped,
}

impl ToolOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use ToolOutcome::*;
        match self {
            NoChange => false,
            Poured => true,
            Filled => true,
            Flipped => true,
            Packed { .. } => true,
            Scraped => true,
        }
    }
}

/// Outcome of changing the selected tool.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SelectOutcome {
    NoChange,
    Changed,
}

impl SelectOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Outcome of one cook tick, merged over all holes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CookOutcome {
    NoChange,
    Progressed,
    Burnt,
}

impl CookOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use CookOutcome::*;
        match self {
            NoChange => false,
            Progressed => true,
            Burnt => true,
        }
    }
}

/// Used to merge per-hole outcomes into the whole-griddle tick outcome
impl BitOr for CookOutcome {
    type Output = CookOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use CookOutcome::*;
        match (self, rhs) {
            // burning has priority
            (Burnt, _) => Burnt,
            (_, Burnt) => Burnt,
            // then plain progress
            (Progressed, _) => Progressed,
            (_, Progressed) => Progressed,
            // and no-change only with both
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// Outcome of one countdown tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CountdownOutcome {
    NoChange,
    Ticked,
    TimeUp,
}

impl CountdownOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use CountdownOutcome::*;
        match self {
            NoChange => false,
            Ticked => true,
            TimeUp => true,
        }
    }
}
