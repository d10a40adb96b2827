use serde::{Deserialize, Serialize};

/// Index of a griddle hole, row-major over the 3×3 plate.
pub type HoleIndex = usize;

/// Cook-doneness metric, 0 (raw batter) to 100 (burnt).
pub type Progress = f32;

pub const GRID_SIDE: usize = 3;
pub const HOLE_COUNT: usize = GRID_SIDE * GRID_SIDE;

/// How many finished pieces the serving tray displays before the oldest
/// one is pushed out.
pub const TRAY_CAPACITY: usize = 8;

pub const SESSION_SECS: u32 = 60;
pub const COOK_TICK_MILLIS: u32 = 100;
pub const COUNTDOWN_TICK_MILLIS: u32 = 1000;

/// Doneness gained per cook tick for every hole on the griddle.
pub const COOK_STEP: Progress = 0.8;
pub const BURNT_AT: Progress = 100.0;
/// A piece can only be packed while `BOXABLE_MIN <= progress < BURNT_AT`.
pub const BOXABLE_MIN: Progress = 75.0;
pub const PERFECT_MIN: Progress = 85.0;
/// Filling a batter hole gives the cook tick some room before burning.
pub const FILLED_START: Progress = 10.0;
/// Flipping is refused at or below this doneness (still too raw).
pub const FLIP_MIN: Progress = 15.0;
pub const FLIP_SETBACK: Progress = 10.0;
/// Post-flip doneness never drops below this, so a flipped piece cannot
/// be cycled forever.
pub const FLIP_FLOOR: Progress = 25.0;

pub const SCORE_PACKED: u32 = 100;
pub const SCORE_PERFECT: u32 = 150;
pub const SCORE_BURNT_PENALTY: u32 = 50;

/// The globally selected action applied by the next hole interaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    /// Pour batter into an empty hole.
    Batter,
    /// Drop a piece of octopus into poured batter.
    Tako,
    /// Flip a cooking piece, or scrape out a burnt one.
    Pick,
    /// Pack a finished piece into the serving tray.
    Pack,
}

impl Default for Tool {
    fn default() -> Self {
        Self::Batter
    }
}
