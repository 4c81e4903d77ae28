//! Creature physics: falling onto the work area of the monitor it is on and
//! wandering left and right along it.
//!
//! Every rule here works in whole ticks. One call to [`Creature::tick`]
//! advances the state by exactly one tick and never blocks.

use glam::IVec2;
use rand::Rng;
use rand::rngs::ThreadRng;
use tracing::{debug, info, warn};

use crate::monitor::{self, Monitor};
use crate::surface::{PresentationSurface, RenderCommand};
use crate::types::{Dimension, Rect};

/// Pixels fallen per tick.
pub const GRAVITY_STEP: i32 = 15;
/// Pixels walked per tick.
pub const WALK_SPEED: i32 = 5;
/// Upper bound (inclusive) of the random pause between two walks.
pub const MAX_WALK_DELAY_TICKS: u64 = 500;
/// Where the creature appears when no start position is configured.
pub const DEFAULT_START: IVec2 = IVec2::new(100, 100);

const FIRST_WALK_TARGET_X: i32 = 100;
const FIRST_WALK_DELAY_TICKS: u64 = 50;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatureState {
    /// Top-left of the sprite.
    pub position: IVec2,
    size: Dimension,
    pub falling: bool,
    pub walking: bool,
    /// Walk destination relative to the work-area origin. Only meaningful
    /// while `walking`.
    pub walk_target_x: i32,
    pub tick_count: u64,
    pub last_walk_start_tick: u64,
    pub next_walk_delay_ticks: u64,
}

impl CreatureState {
    pub fn new(size: Dimension) -> Self {
        Self::at(DEFAULT_START, size)
    }

    /// Starts out walking so the first idle check happens as soon as the
    /// creature stands on something.
    pub fn at(position: IVec2, size: Dimension) -> Self {
        Self {
            position,
            size,
            falling: false,
            walking: true,
            walk_target_x: FIRST_WALK_TARGET_X,
            tick_count: 0,
            last_walk_start_tick: 0,
            next_walk_delay_ticks: FIRST_WALK_DELAY_TICKS,
        }
    }

    pub fn size(&self) -> Dimension {
        self.size
    }

    pub fn rect(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    fn walk_due(&self) -> bool {
        self.tick_count.saturating_sub(self.last_walk_start_tick) >= self.next_walk_delay_ticks
    }
}

/// Pulls the creature towards the floor of `monitor`'s work area. Returns
/// whether the creature was moved down this tick.
///
/// Does nothing when the monitor is unknown, leaving the creature where it
/// is until a monitor shows up under it again.
pub fn apply_gravity<S>(
    state: &mut CreatureState,
    monitor: Option<&Monitor>,
    surface: &mut S,
) -> bool
where
    S: PresentationSurface + ?Sized,
{
    let Some(monitor) = monitor else {
        return false;
    };

    let floor = monitor.floor(state.size.height);
    if state.position.y >= floor {
        state.position.y = floor;
        if state.falling {
            debug!(y = floor, "landed");
        }
        state.falling = false;
        return false;
    }

    // never step past the floor
    state.position.y = (state.position.y + GRAVITY_STEP).min(floor);
    state.falling = state.position.y < floor;
    surface.set_window_position(state.position);

    if !state.falling {
        debug!(y = floor, "landed");
    }
    true
}

/// Starts a new walk once the pause since the previous one has run out.
/// Call only while the creature neither falls nor walks.
pub fn maybe_start_walk<R>(state: &mut CreatureState, monitor: &Monitor, rng: &mut R)
where
    R: Rng,
{
    if !state.walk_due() {
        return;
    }

    let span = monitor.work_area.w - state.size.width;
    state.walk_target_x = if span >= 0 {
        rng.random_range(0..=span)
    } else {
        debug!(
            work_area_width = monitor.work_area.w,
            sprite_width = state.size.width,
            "work area narrower than sprite, walking to its origin"
        );
        0
    };
    state.next_walk_delay_ticks = rng.random_range(0..=MAX_WALK_DELAY_TICKS);
    state.last_walk_start_tick = state.tick_count;
    state.walking = true;

    debug!(
        target = state.walk_target_x + monitor.work_area.x,
        next_delay = state.next_walk_delay_ticks,
        "walk started"
    );
}

/// Moves the creature one step towards its walk target.
///
/// The walk ends without moving when the creature is already close to the
/// target or stands at either edge of the work area. Edges end the walk even
/// if the target was not reached.
pub fn step_walk<S>(state: &mut CreatureState, monitor: &Monitor, surface: &mut S)
where
    S: PresentationSurface + ?Sized,
{
    let xpos = monitor.work_area.x;
    let width = monitor.work_area.w;
    let target = state.walk_target_x + xpos;
    let x = state.position.x;

    let arrived = (target - WALK_SPEED..=target + WALK_SPEED).contains(&x);
    let at_right_edge = x >= xpos + width - state.size.width;
    let at_left_edge = x <= xpos;

    if arrived || at_right_edge || at_left_edge {
        state.walking = false;
        debug!(x, target, arrived, "walk ended");
        return;
    }

    state.position.x += if target < x { -WALK_SPEED } else { WALK_SPEED };
    surface.set_window_position(state.position);
}

/// The creature together with its source of randomness.
pub struct Creature<R = ThreadRng> {
    state: CreatureState,
    rng: R,
    stranded: bool,
}

impl Creature<ThreadRng> {
    pub fn new(size: Dimension) -> Self {
        Self::with_rng(CreatureState::new(size), rand::rng())
    }

    pub fn at(position: IVec2, size: Dimension) -> Self {
        Self::with_rng(CreatureState::at(position, size), rand::rng())
    }
}

impl<R: Rng> Creature<R> {
    pub fn with_rng(state: CreatureState, rng: R) -> Self {
        Self {
            state,
            rng,
            stranded: false,
        }
    }

    pub fn state(&self) -> &CreatureState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CreatureState {
        &mut self.state
    }

    /// Advances one tick and returns where the sprite has to be drawn.
    ///
    /// When no monitor lies under the creature (or the platform reports none
    /// at all) physics is skipped for this tick and tried again on the next.
    pub fn tick<S>(&mut self, surface: &mut S) -> RenderCommand
    where
        S: PresentationSurface + ?Sized,
    {
        let monitors = surface.query_monitors();
        let resolved = monitor::resolve(self.state.rect(), &monitors);

        match &resolved {
            Some(monitor) => {
                if self.stranded {
                    info!(
                        x = monitor.position.x,
                        y = monitor.position.y,
                        "creature is back over a monitor"
                    );
                    self.stranded = false;
                }
                self.advance(monitor, surface);
            }
            None if !self.stranded => {
                let position = self.state.position;
                if monitors.is_empty() {
                    warn!("platform reported no monitors, holding still");
                } else {
                    warn!(
                        x = position.x,
                        y = position.y,
                        monitors = monitors.len(),
                        "creature is not over any monitor, holding still"
                    );
                }
                self.stranded = true;
            }
            None => {}
        }

        let command = RenderCommand {
            position: self.state.position,
            resolved: resolved.is_some(),
        };
        self.state.tick_count = self.state.tick_count.wrapping_add(1);
        command
    }

    fn advance<S>(&mut self, monitor: &Monitor, surface: &mut S)
    where
        S: PresentationSurface + ?Sized,
    {
        // a tick that moved the creature down does nothing else
        if apply_gravity(&mut self.state, Some(monitor), surface) || self.state.falling {
            return;
        }

        if self.state.walking {
            step_walk(&mut self.state, monitor, surface);
        } else {
            maybe_start_walk(&mut self.state, monitor, &mut self.rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[derive(Default)]
    struct Recorder {
        moves: Vec<IVec2>,
    }

    impl PresentationSurface for Recorder {
        fn query_monitors(&self) -> Vec<Monitor> {
            Vec::new()
        }

        fn set_window_position(&mut self, position: IVec2) {
            self.moves.push(position);
        }

        fn present(&mut self, _command: &RenderCommand) -> Result<()> {
            Ok(())
        }
    }

    fn screen() -> Monitor {
        Monitor::new(
            IVec2::ZERO,
            Dimension::new(1920, 1080),
            Rect::new(0, 0, 1920, 1040),
        )
    }

    fn sprite() -> Dimension {
        Dimension::new(64, 64)
    }

    #[test]
    fn gravity_lands_exactly_on_floor() {
        let monitor = screen();
        let floor = monitor.floor(sprite().height);

        for height in [1, 14, 15, 16, 100, 451] {
            let mut state = CreatureState::at(IVec2::new(300, floor - height), sprite());
            let mut surface = Recorder::default();
            let ticks = (height + GRAVITY_STEP - 1) / GRAVITY_STEP;

            for tick in 1..=ticks {
                assert!(apply_gravity(&mut state, Some(&monitor), &mut surface));
                assert!(state.position.y <= floor);
                assert_eq!(state.falling, tick < ticks, "height {height}, tick {tick}");
            }

            assert_eq!(state.position.y, floor, "height {height}");
            assert!(!state.falling, "height {height}");
            assert_eq!(surface.moves.len(), ticks as usize);
        }
    }

    #[test]
    fn new_creature_starts_at_default_position_ready_to_walk() {
        let state = CreatureState::new(sprite());
        assert_eq!(state.position, DEFAULT_START);
        assert_eq!(state.size(), sprite());
        assert_eq!(state.rect(), Rect::new(100, 100, 64, 64));
        assert!(state.walking);
        assert!(!state.falling);
        assert_eq!(state.walk_target_x, FIRST_WALK_TARGET_X);
        assert_eq!(state.tick_count, 0);
        assert_eq!(state.last_walk_start_tick, 0);
        assert_eq!(state.next_walk_delay_ticks, FIRST_WALK_DELAY_TICKS);

        let creature = Creature::new(sprite());
        assert_eq!(creature.state(), &state);
    }

    #[test]
    fn landing_tick_does_not_walk() {
        let monitor = screen();
        let floor = monitor.floor(sprite().height);
        let mut surface = Recorder::default();
        let mut state = CreatureState::at(IVec2::new(800, floor - 5), sprite());
        state.walk_target_x = 1500;
        let mut creature = Creature::with_rng(state, StdRng::seed_from_u64(8));

        creature.advance(&monitor, &mut surface);
        assert_eq!(surface.moves, vec![IVec2::new(800, floor)]);
        assert!(!creature.state().falling);
        assert!(creature.state().walking);

        creature.advance(&monitor, &mut surface);
        assert_eq!(surface.moves.last(), Some(&IVec2::new(805, floor)));
    }

    #[test]
    fn gravity_reports_falling_while_in_the_air() {
        let monitor = screen();
        let mut state = CreatureState::at(IVec2::new(300, 100), sprite());
        let mut surface = Recorder::default();

        assert!(apply_gravity(&mut state, Some(&monitor), &mut surface));
        assert!(state.falling);
        assert_eq!(state.position.y, 100 + GRAVITY_STEP);
        assert_eq!(surface.moves, vec![IVec2::new(300, 115)]);
    }

    #[test]
    fn gravity_clamps_creature_below_floor() {
        let monitor = screen();
        let floor = monitor.floor(sprite().height);
        let mut state = CreatureState::at(IVec2::new(300, floor + 40), sprite());
        let mut surface = Recorder::default();

        assert!(!apply_gravity(&mut state, Some(&monitor), &mut surface));
        assert_eq!(state.position.y, floor);
        assert!(!state.falling);
        assert!(surface.moves.is_empty());
    }

    #[test]
    fn gravity_without_monitor_leaves_creature_alone() {
        let mut state = CreatureState::at(IVec2::new(-10000, -10000), sprite());
        let before = state.clone();
        let mut surface = Recorder::default();

        assert!(!apply_gravity(&mut state, None, &mut surface));
        assert_eq!(state, before);
        assert!(surface.moves.is_empty());
    }

    #[test]
    fn walk_ends_inside_target_band_without_moving() {
        let monitor = screen();
        let mut state = CreatureState::at(IVec2::new(497, 900), sprite());
        state.walk_target_x = 500;
        let mut surface = Recorder::default();

        step_walk(&mut state, &monitor, &mut surface);
        assert!(!state.walking);
        assert_eq!(state.position.x, 497);
        assert!(surface.moves.is_empty());
    }

    #[test]
    fn walk_ends_at_left_edge_even_with_target_far_away() {
        let monitor = screen();
        let mut state = CreatureState::at(IVec2::new(0, 900), sprite());
        state.walk_target_x = 1200;
        let mut surface = Recorder::default();

        step_walk(&mut state, &monitor, &mut surface);
        assert!(!state.walking);
        assert_eq!(state.position.x, 0);
        assert!(surface.moves.is_empty());
    }

    #[test]
    fn walk_ends_at_right_edge() {
        let monitor = screen();
        let mut state = CreatureState::at(IVec2::new(1920 - 64, 900), sprite());
        state.walk_target_x = 10;
        let mut surface = Recorder::default();

        step_walk(&mut state, &monitor, &mut surface);
        assert!(!state.walking);
        assert_eq!(state.position.x, 1920 - 64);
    }

    #[test]
    fn walk_steps_towards_target() {
        let monitor = screen();
        let mut surface = Recorder::default();

        let mut state = CreatureState::at(IVec2::new(800, 900), sprite());
        state.walk_target_x = 200;
        step_walk(&mut state, &monitor, &mut surface);
        assert!(state.walking);
        assert_eq!(state.position.x, 800 - WALK_SPEED);

        state.walk_target_x = 1500;
        step_walk(&mut state, &monitor, &mut surface);
        assert_eq!(state.position.x, 800);
        assert_eq!(
            surface.moves,
            vec![IVec2::new(795, 900), IVec2::new(800, 900)]
        );
    }

    #[test]
    fn walk_target_is_relative_to_work_area_origin() {
        let monitor = Monitor::full(IVec2::new(1920, 0), Dimension::new(1920, 1080));
        let mut state = CreatureState::at(IVec2::new(2400, 900), sprite());
        state.walk_target_x = 480;
        let mut surface = Recorder::default();

        step_walk(&mut state, &monitor, &mut surface);
        assert!(!state.walking);
        assert_eq!(state.position.x, 2400);
    }

    #[test]
    fn planner_waits_for_delay() {
        let monitor = screen();
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = CreatureState::at(IVec2::new(300, 900), sprite());
        state.walking = false;
        state.last_walk_start_tick = 10;
        state.next_walk_delay_ticks = 20;
        state.tick_count = 29;

        maybe_start_walk(&mut state, &monitor, &mut rng);
        assert!(!state.walking);

        state.tick_count = 30;
        maybe_start_walk(&mut state, &monitor, &mut rng);
        assert!(state.walking);
        assert_eq!(state.last_walk_start_tick, 30);
    }

    #[test]
    fn planner_draws_within_bounds() {
        let monitor = screen();
        let mut rng = StdRng::seed_from_u64(42);
        let mut state = CreatureState::at(IVec2::new(300, 900), sprite());

        for tick in 0..2000 {
            state.walking = false;
            state.tick_count = tick;
            state.last_walk_start_tick = 0;
            state.next_walk_delay_ticks = 0;

            maybe_start_walk(&mut state, &monitor, &mut rng);
            assert!(state.walking);
            assert!((0..=1920 - 64).contains(&state.walk_target_x));
            assert!(state.next_walk_delay_ticks <= MAX_WALK_DELAY_TICKS);
        }
    }

    #[test]
    fn planner_targets_origin_when_work_area_is_too_narrow() {
        let monitor = Monitor::full(IVec2::new(50, 0), Dimension::new(40, 1080));
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = CreatureState::at(IVec2::new(50, 900), sprite());
        state.walking = false;
        state.next_walk_delay_ticks = 0;

        maybe_start_walk(&mut state, &monitor, &mut rng);
        assert!(state.walking);
        assert_eq!(state.walk_target_x, 0);
    }
}
