use alloc::collections::VecDeque;
use core::ops::BitOr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Menu -> Playing
/// - Playing -> Finished
/// - Finished -> Playing
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    /// Initial state, nothing cooking yet
    Menu,
    /// Round in progress, both clocks running
    Playing,
    /// Countdown ran out
    Finished,
}

impl SessionState {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Menu
    }
}

/// A finished piece sitting in the serving tray, display only.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxedItem {
    /// Unique and monotonically increasing, so items render oldest-first.
    pub id: u64,
    pub perfect: bool,
}

/// Represents one stand session from menu through the final whistle.
///
/// All mutation of holes, score, and tray goes through this type; the two
/// clock entry points are phase-guarded so a tick delivered after the
/// session leaves `Playing` is a no-op.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GriddleEngine {
    config: GameConfig,
    holes: [Hole; HOLE_COUNT],
    session: SessionState,
    score: u32,
    time_left: u32,
    selected_tool: Tool,
    tray: VecDeque<BoxedItem>,
    next_box_id: u64,
}

impl GriddleEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            holes: [Hole::default(); HOLE_COUNT],
            session: Default::default(),
            score: 0,
            time_left: config.duration_secs,
            selected_tool: Tool::default(),
            tray: VecDeque::with_capacity(TRAY_CAPACITY),
            next_box_id: 0,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn selected_tool(&self) -> Tool {
        self.selected_tool
    }

    pub fn hole_at(&self, index: HoleIndex) -> Hole {
        self.holes[index]
    }

    pub fn holes(&self) -> &[Hole; HOLE_COUNT] {
        &self.holes
    }

    pub fn boxed_items(&self) -> impl Iterator<Item = &BoxedItem> {
        self.tray.iter()
    }

    /// Begin a fresh round from the menu or the results screen.
    ///
    /// Resets every hole, the score, the countdown, the selected tool, and
    /// the tray. The boxed-item id counter is deliberately not reset so ids
    /// stay unique across rounds.
    pub fn start(&mut self) -> Result<()> {
        if self.session.is_playing() {
            return Err(GameError::AlreadyPlaying);
        }
        self.holes = [Hole::default(); HOLE_COUNT];
        self.score = 0;
        self.time_left = self.config.duration_secs;
        self.selected_tool = Tool::default();
        self.tray.clear();
        self.session = SessionState::Playing;
        log::debug!("session started, {} seconds on the clock", self.time_left);
        Ok(())
    }

    /// Change the globally selected tool.
    pub fn select_tool(&mut self, tool: Tool) -> Result<SelectOutcome> {
        self.check_playing()?;

        if self.selected_tool == tool {
            return Ok(SelectOutcome::NoChange);
        }
        self.selected_tool = tool;
        log::debug!("selected tool: {:?}", tool);
        Ok(SelectOutcome::Changed)
    }

    /// Apply the selected tool to a hole.
    ///
    /// An action the hole's stage does not accept is reported as
    /// `NoChange`; scoring and the tray are only touched on success.
    pub fn interact(&mut self, index: HoleIndex) -> Result<ToolOutcome> {
        use ToolOutcome::*;

        let index = self.validate_index(index)?;
        self.check_playing()?;

        let hole = &mut self.holes[index];
        let outcome = match self.selected_tool {
            Tool::Batter => {
                if hole.pour() {
                    Poured
                } else {
                    NoChange
                }
            }
            Tool::Tako => {
                if hole.fill() {
                    Filled
                } else {
                    NoChange
                }
            }
            // the pick doubles as spatula and scraper
            Tool::Pick => {
                if hole.scrape() {
                    Scraped
                } else if hole.flip() {
                    Flipped
                } else {
                    NoChange
                }
            }
            Tool::Pack => match hole.pack() {
                Some(perfect) => Packed { perfect },
                None => NoChange,
            },
        };

        match outcome {
            Packed { perfect } => {
                let points = if perfect { SCORE_PERFECT } else { SCORE_PACKED };
                self.score = self.score.saturating_add(points);
                self.push_boxed(perfect);
                log::debug!(
                    "packed hole {} (perfect: {}), score: {}",
                    index,
                    perfect,
                    self.score
                );
            }
            Scraped => {
                self.score = self.score.saturating_sub(SCORE_BURNT_PENALTY);
                log::debug!("scraped hole {}, score: {}", index, self.score);
            }
            Flipped => {
                log::trace!(
                    "flipped hole {}, progress: {}",
                    index,
                    self.holes[index].progress()
                );
            }
            _ => {}
        }

        Ok(outcome)
    }

    /// Advance every hole on the griddle by one cook step.
    ///
    /// The sole source of automatic state change; a no-op outside
    /// `Playing`.
    pub fn cook_tick(&mut self) -> CookOutcome {
        if !self.session.is_playing() {
            return CookOutcome::NoChange;
        }

        self.holes
            .iter_mut()
            .map(|hole| hole.advance(COOK_STEP))
            .reduce(BitOr::bitor)
            .unwrap_or(CookOutcome::NoChange)
    }

    /// Count the session clock down one second, finishing the round at
    /// zero. A no-op outside `Playing`.
    pub fn countdown_tick(&mut self) -> CountdownOutcome {
        if !self.session.is_playing() {
            return CountdownOutcome::NoChange;
        }

        if self.time_left <= 1 {
            self.time_left = 0;
            self.session = SessionState::Finished;
            log::debug!("time up, final score: {}", self.score);
            CountdownOutcome::TimeUp
        } else {
            self.time_left -= 1;
            CountdownOutcome::Ticked
        }
    }

    fn push_boxed(&mut self, perfect: bool) {
        if self.tray.len() == TRAY_CAPACITY {
            self.tray.pop_front();
        }
        self.next_box_id += 1;
        self.tray.push_back(BoxedItem {
            id: self.next_box_id,
            perfect,
        });
    }

    fn validate_index(&self, index: HoleIndex) -> Result<HoleIndex> {
        if index < HOLE_COUNT {
            Ok(index)
        } else {
            Err(GameError::InvalidHole)
        }
    }

    fn check_playing(&self) -> Result<()> {
        if self.session.is_playing() {
            Ok(())
        } else {
            Err(GameError::NotPlaying)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn playing(duration_secs: u32) -> GriddleEngine {
        let mut engine = GriddleEngine::new(GameConfig::new(duration_secs));
        engine.start().unwrap();
        engine
    }

    fn pour_and_fill(engine: &mut GriddleEngine, index: HoleIndex) {
        engine.select_tool(Tool::Batter).ok();
        assert_eq!(engine.interact(index).unwrap(), ToolOutcome::Poured);
        engine.select_tool(Tool::Tako).unwrap();
        assert_eq!(engine.interact(index).unwrap(), ToolOutcome::Filled);
    }

    fn cook_until(engine: &mut GriddleEngine, index: HoleIndex, progress: Progress) {
        while engine.hole_at(index).progress() < progress
            && engine.hole_at(index).state() != HoleState::Burnt
        {
            engine.cook_tick();
        }
    }

    fn pack_one(engine: &mut GriddleEngine, index: HoleIndex) -> ToolOutcome {
        pour_and_fill(engine, index);
        cook_until(engine, index, BOXABLE_MIN);
        engine.select_tool(Tool::Pack).ok();
        engine.interact(index).unwrap()
    }

    #[test]
    fn start_resets_holes_score_clock_tool_and_tray() {
        let mut engine = playing(60);
        pack_one(&mut engine, 3);
        engine.countdown_tick();
        assert!(engine.score() > 0);

        while !engine.session().is_finished() {
            engine.countdown_tick();
        }
        engine.start().unwrap();

        assert_eq!(engine.session(), SessionState::Playing);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.time_left(), 60);
        assert_eq!(engine.selected_tool(), Tool::Batter);
        assert_eq!(engine.boxed_items().count(), 0);
        for hole in engine.holes() {
            assert_eq!(hole.state(), HoleState::Empty);
            assert_eq!(hole.progress(), 0.0);
            assert_eq!(hole.flip_count(), 0);
        }
    }

    #[test]
    fn start_is_rejected_while_playing() {
        let mut engine = playing(60);
        assert_eq!(engine.start(), Err(GameError::AlreadyPlaying));
    }

    #[test]
    fn actions_are_rejected_outside_playing() {
        let mut engine = GriddleEngine::new(GameConfig::standard());
        assert_eq!(engine.interact(0), Err(GameError::NotPlaying));
        assert_eq!(engine.select_tool(Tool::Pack), Err(GameError::NotPlaying));

        engine.start().unwrap();
        assert_eq!(engine.interact(HOLE_COUNT), Err(GameError::InvalidHole));
    }

    #[test]
    fn pour_only_lands_in_empty_holes() {
        let mut engine = playing(60);
        assert_eq!(engine.interact(0).unwrap(), ToolOutcome::Poured);
        assert_eq!(engine.hole_at(0).state(), HoleState::Batter);
        assert_eq!(engine.hole_at(0).progress(), 0.0);

        assert_eq!(engine.interact(0).unwrap(), ToolOutcome::NoChange);
    }

    #[test]
    fn fill_only_lands_in_batter() {
        let mut engine = playing(60);
        engine.select_tool(Tool::Tako).unwrap();
        assert_eq!(engine.interact(0).unwrap(), ToolOutcome::NoChange);

        engine.select_tool(Tool::Batter).unwrap();
        engine.interact(0).unwrap();
        engine.select_tool(Tool::Tako).unwrap();
        assert_eq!(engine.interact(0).unwrap(), ToolOutcome::Filled);
        assert_eq!(engine.hole_at(0).state(), HoleState::Filled);
        assert_eq!(engine.hole_at(0).progress(), FILLED_START);

        assert_eq!(engine.interact(0).unwrap(), ToolOutcome::NoChange);
    }

    #[test]
    fn cook_tick_leaves_empty_and_batter_holes_alone() {
        let mut engine = playing(60);
        engine.interact(0).unwrap();

        assert_eq!(engine.cook_tick(), CookOutcome::NoChange);
        assert_eq!(engine.hole_at(0).state(), HoleState::Batter);
        assert_eq!(engine.hole_at(0).progress(), 0.0);
        assert_eq!(engine.hole_at(1).state(), HoleState::Empty);
    }

    #[test]
    fn cook_tick_is_a_noop_outside_playing() {
        let mut engine = GriddleEngine::new(GameConfig::standard());
        assert_eq!(engine.cook_tick(), CookOutcome::NoChange);
        assert_eq!(engine.countdown_tick(), CountdownOutcome::NoChange);
    }

    #[test]
    fn pack_in_window_scores_base_points() {
        // pour, fill, cook into [75, 85), pack
        let mut engine = playing(60);
        pour_and_fill(&mut engine, 0);
        cook_until(&mut engine, 0, BOXABLE_MIN);

        let hole = engine.hole_at(0);
        assert!(hole.is_boxable());
        assert!(hole.progress() < PERFECT_MIN);

        engine.select_tool(Tool::Pack).unwrap();
        assert_eq!(
            engine.interact(0).unwrap(),
            ToolOutcome::Packed { perfect: false }
        );
        assert_eq!(engine.score(), SCORE_PACKED);
        assert_eq!(engine.hole_at(0).state(), HoleState::Empty);
        assert_eq!(engine.hole_at(0).progress(), 0.0);
    }

    #[test]
    fn pack_at_high_doneness_is_perfect() {
        let mut engine = playing(60);
        pour_and_fill(&mut engine, 0);
        cook_until(&mut engine, 0, PERFECT_MIN);
        assert!(engine.hole_at(0).progress() < BURNT_AT);

        engine.select_tool(Tool::Pack).unwrap();
        assert_eq!(
            engine.interact(0).unwrap(),
            ToolOutcome::Packed { perfect: true }
        );
        assert_eq!(engine.score(), SCORE_PERFECT);
    }

    #[test]
    fn pack_outside_window_is_a_noop() {
        let mut engine = playing(60);
        pour_and_fill(&mut engine, 0);

        engine.select_tool(Tool::Pack).unwrap();
        assert_eq!(engine.interact(0).unwrap(), ToolOutcome::NoChange);
        assert_eq!(engine.hole_at(0).state(), HoleState::Filled);

        cook_until(&mut engine, 0, BURNT_AT);
        assert_eq!(engine.interact(0).unwrap(), ToolOutcome::NoChange);
        assert_eq!(engine.hole_at(0).state(), HoleState::Burnt);
    }

    #[test]
    fn overcooking_burns_and_pins_progress() {
        let mut engine = playing(60);
        pour_and_fill(&mut engine, 1);
        cook_until(&mut engine, 1, BURNT_AT);

        let hole = engine.hole_at(1);
        assert_eq!(hole.state(), HoleState::Burnt);
        assert_eq!(hole.progress(), BURNT_AT);

        // further ticks must not move a burnt hole
        engine.cook_tick();
        assert_eq!(engine.hole_at(1).progress(), BURNT_AT);
    }

    #[test]
    fn scraping_burnt_costs_points_with_a_floor_at_zero() {
        let mut engine = playing(60);
        pour_and_fill(&mut engine, 1);
        cook_until(&mut engine, 1, BURNT_AT);

        engine.select_tool(Tool::Pick).unwrap();
        assert_eq!(engine.interact(1).unwrap(), ToolOutcome::Scraped);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.hole_at(1).state(), HoleState::Empty);
        assert_eq!(engine.hole_at(1).flip_count(), 0);
    }

    #[test]
    fn scraping_subtracts_from_a_positive_score() {
        let mut engine = playing(60);
        assert_eq!(
            pack_one(&mut engine, 0),
            ToolOutcome::Packed { perfect: false }
        );
        pour_and_fill(&mut engine, 1);
        cook_until(&mut engine, 1, BURNT_AT);

        engine.select_tool(Tool::Pick).unwrap();
        engine.interact(1).unwrap();
        assert_eq!(engine.score(), SCORE_PACKED - SCORE_BURNT_PENALTY);
    }

    #[test]
    fn flip_sets_back_doneness_with_a_floor() {
        // flipping at ~20 lands on the floor of 25
        let mut engine = playing(60);
        pour_and_fill(&mut engine, 0);
        cook_until(&mut engine, 0, 20.0);
        assert!(engine.hole_at(0).progress() < FLIP_FLOOR);

        engine.select_tool(Tool::Pick).unwrap();
        assert_eq!(engine.interact(0).unwrap(), ToolOutcome::Flipped);

        let hole = engine.hole_at(0);
        assert_eq!(hole.state(), HoleState::Cooking);
        assert_eq!(hole.progress(), FLIP_FLOOR);
        assert_eq!(hole.flip_count(), 1);
    }

    #[test]
    fn flip_is_refused_while_too_raw() {
        let mut engine = playing(60);
        pour_and_fill(&mut engine, 0);
        engine.cook_tick();
        engine.cook_tick();
        engine.cook_tick();
        assert!(engine.hole_at(0).progress() <= FLIP_MIN);

        engine.select_tool(Tool::Pick).unwrap();
        assert_eq!(engine.interact(0).unwrap(), ToolOutcome::NoChange);
        assert_eq!(engine.hole_at(0).state(), HoleState::Filled);
        assert_eq!(engine.hole_at(0).flip_count(), 0);
    }

    #[test]
    fn flip_above_the_floor_subtracts_the_setback() {
        let mut engine = playing(60);
        pour_and_fill(&mut engine, 0);
        cook_until(&mut engine, 0, 90.0);
        let before = engine.hole_at(0).progress();

        engine.select_tool(Tool::Pick).unwrap();
        assert_eq!(engine.interact(0).unwrap(), ToolOutcome::Flipped);

        let after = engine.hole_at(0).progress();
        assert!(after >= FLIP_FLOOR);
        assert!(after < before);
        assert!((before - after - FLIP_SETBACK).abs() < 1e-3);
    }

    #[test]
    fn countdown_finishes_the_session_at_zero() {
        let mut engine = playing(1);
        assert_eq!(engine.countdown_tick(), CountdownOutcome::TimeUp);
        assert_eq!(engine.time_left(), 0);
        assert_eq!(engine.session(), SessionState::Finished);

        // both clocks are dead from here on
        assert_eq!(engine.countdown_tick(), CountdownOutcome::NoChange);
        assert_eq!(engine.cook_tick(), CookOutcome::NoChange);
        assert_eq!(engine.interact(0), Err(GameError::NotPlaying));
    }

    #[test]
    fn countdown_ticks_down_one_second_at_a_time() {
        let mut engine = playing(3);
        assert_eq!(engine.countdown_tick(), CountdownOutcome::Ticked);
        assert_eq!(engine.time_left(), 2);
        assert_eq!(engine.countdown_tick(), CountdownOutcome::Ticked);
        assert_eq!(engine.countdown_tick(), CountdownOutcome::TimeUp);
        assert_eq!(engine.time_left(), 0);
    }

    #[test]
    fn select_tool_reports_changes_only() {
        let mut engine = playing(60);
        assert_eq!(engine.selected_tool(), Tool::Batter);
        assert_eq!(
            engine.select_tool(Tool::Batter).unwrap(),
            SelectOutcome::NoChange
        );
        assert_eq!(
            engine.select_tool(Tool::Pick).unwrap(),
            SelectOutcome::Changed
        );
        assert_eq!(engine.selected_tool(), Tool::Pick);
    }

    #[test]
    fn tray_keeps_the_latest_eight_items() {
        let mut engine = playing(60);
        for _ in 0..(TRAY_CAPACITY + 1) {
            assert!(pack_one(&mut engine, 0).has_update());
        }

        let ids: Vec<u64> = engine.boxed_items().map(|item| item.id).collect();
        assert_eq!(ids.len(), TRAY_CAPACITY);
        // the first boxed piece was evicted, ids stay in insertion order
        assert_eq!(ids[0], 2);
        assert_eq!(ids[ids.len() - 1], (TRAY_CAPACITY + 1) as u64);
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn progress_stays_inside_bounds_over_a_full_round() {
        let mut engine = playing(2);
        pour_and_fill(&mut engine, 0);
        pour_and_fill(&mut engine, 4);
        engine.select_tool(Tool::Pick).unwrap();

        for round in 0..400 {
            engine.cook_tick();
            if round % 40 == 0 {
                engine.interact(4).ok();
            }
            for hole in engine.holes() {
                assert!(hole.progress() >= 0.0);
                assert!(hole.progress() <= BURNT_AT);
                match hole.state() {
                    HoleState::Empty | HoleState::Batter => assert_eq!(hole.progress(), 0.0),
                    HoleState::Burnt => assert_eq!(hole.progress(), BURNT_AT),
                    _ => {}
                }
            }
        }
    }
}
