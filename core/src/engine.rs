use alloc::vec;
use core::num::Saturating;
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    NotStarted,
    Playing,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Per-game counters layered on top of a [`Grid`], reset by every new game.
#[derive(Clone, Debug, Default, PartialEq)]
struct Session {
    opened_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    state: EngineState,
    triggered_mine: Option<Coord2>,
}

impl Session {
    fn playing() -> Self {
        Self {
            state: EngineState::Playing,
            ..Default::default()
        }
    }

    fn opened_count(&self) -> CellCount {
        self.opened_count.0
    }

    fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    fn is_over(&self) -> bool {
        self.state.is_finished()
    }

    /// The mine that ended a lost game.
    fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }
}

/// Normalized events coming from whatever input source drives the game.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    NewGame(GameConfig),
    Open(Coord2),
    ToggleFlag(Coord2),
    Pause,
    Resume,
    /// One timer interval elapsed.
    Tick,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EventOutcome {
    Started,
    Reveal(RevealOutcome),
    Flag(FlagOutcome),
    /// Carries the new pause state, `None` when the request did not apply.
    Pause(Option<bool>),
    /// Carries the new step count, `None` when the timer is not running.
    Tick(Option<u32>),
}

/// A single-player game: owns the grid, the session counters and the timer, and pushes every
/// visible change to its renderer.
#[derive(Debug)]
pub struct Game<R> {
    renderer: R,
    rng: SmallRng,
    grid: Option<Grid>,
    session: Session,
    timer: SessionTimer,
    paused: bool,
}

impl<R: Renderer> Game<R> {
    /// Creates an idle engine, `seed` drives the layout of every game it generates.
    pub fn new(renderer: R, seed: u64) -> Self {
        Self {
            renderer,
            rng: SmallRng::seed_from_u64(seed),
            grid: None,
            session: Session::default(),
            timer: SessionTimer::default(),
            paused: false,
        }
    }

    pub fn state(&self) -> EngineState {
        self.session.state
    }

    pub fn is_over(&self) -> bool {
        self.session.is_over()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn opened_count(&self) -> CellCount {
        self.session.opened_count()
    }

    pub fn flagged_count(&self) -> CellCount {
        self.session.flagged_count()
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.session.triggered_mine()
    }

    /// How many mines have not been flagged yet, negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        let mines = self.grid.as_ref().map_or(0, Grid::mine_count);
        (mines as isize) - (self.session.flagged_count() as isize)
    }

    pub fn elapsed_steps(&self) -> u32 {
        self.timer.total_steps()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn handle(&mut self, event: InputEvent) -> Result<EventOutcome> {
        use InputEvent::*;
        Ok(match event {
            NewGame(config) => {
                self.new_game(config)?;
                EventOutcome::Started
            }
            Open(coords) => EventOutcome::Reveal(self.reveal(coords)?),
            ToggleFlag(coords) => EventOutcome::Flag(self.toggle_flag(coords)?),
            Pause => EventOutcome::Pause(self.pause().then_some(true)),
            Resume => EventOutcome::Pause(self.resume().then_some(false)),
            Tick => EventOutcome::Tick(self.tick()),
        })
    }

    /// Generates a fresh random grid for `config` and starts playing on it.
    ///
    /// An invalid config leaves the current game untouched.
    pub fn new_game(&mut self, config: GameConfig) -> Result<()> {
        let config = config.validate()?;
        let seed = self.rng.next_u64();
        let grid = Grid::generate(config, RandomMinefieldGenerator::new(seed))?;
        self.start(grid);
        Ok(())
    }

    /// Starts playing on a prepared grid, replacing any previous game.
    pub fn start(&mut self, mut grid: Grid) {
        self.timer.cancel();
        log::debug!(
            "New {}x{} game with {} mines",
            grid.width(),
            grid.height(),
            grid.mine_count()
        );

        grid.reset_play_state();
        self.renderer.on_board_created(grid.size());
        self.grid = Some(grid);
        self.session = Session::playing();
        self.paused = false;

        self.timer.start();
        self.renderer.on_timer_tick(self.timer.total_steps());
    }

    /// Opens a square, cascading through every connected zero-count region.
    ///
    /// Flagged and already opened squares are left alone, as is everything once the game is
    /// over or paused.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        if !self.accepts_moves() {
            log::debug!("Ignoring reveal at {:?} in state {:?}", coords, self.state());
            return Ok(RevealOutcome::NoChange);
        }
        Ok(self.reveal_from(coords))
    }

    fn reveal_from(&mut self, start: Coord2) -> RevealOutcome {
        let Some(grid) = self.grid.as_mut() else {
            return RevealOutcome::NoChange;
        };

        let safe_squares = grid.safe_square_count();
        let mut outcome = RevealOutcome::NoChange;
        let mut hit_mine = None;
        let mut pending = vec![start];

        while let Some(coords) = pending.pop() {
            let square = grid[coords];
            if square.is_flagged() || square.is_opened() {
                log::trace!("Skipping square at {:?}", coords);
                continue;
            }
            if square.is_mine() {
                hit_mine = Some(coords);
                break;
            }

            grid[coords].open();
            self.session.opened_count += 1;
            let count = grid.count_neighbour_mines(coords);
            self.renderer.on_square_opened(coords, count);
            outcome = RevealOutcome::Revealed;
            log::trace!("Opened square at {:?}, mine count: {}", coords, count);

            if self.session.opened_count.0 >= safe_squares {
                outcome = RevealOutcome::Won;
                break;
            }

            if count == 0 {
                // reversed so squares come off the stack in neighbour order
                let neighbours: SmallVec<[Coord2; 8]> = grid.neighbours(coords).collect();
                pending.extend(neighbours.into_iter().rev());
            }
        }

        if let Some(coords) = hit_mine {
            log::debug!("Hit mine at {:?}", coords);
            self.session.triggered_mine = Some(coords);
            self.end_game(false);
            return RevealOutcome::HitMine;
        }
        if outcome == RevealOutcome::Won {
            self.end_game(true);
        }
        outcome
    }

    /// Flips the flag on an unopened square.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.validate_coords(coords)?;
        if !self.accepts_moves() {
            log::debug!("Ignoring flag at {:?} in state {:?}", coords, self.state());
            return Ok(FlagOutcome::NoChange);
        }
        let grid = self.grid.as_mut().ok_or(GameError::NoGame)?;
        let square = &mut grid[coords];
        if square.is_opened() {
            return Ok(FlagOutcome::NoChange);
        }

        let flagged = square.toggle_flag();
        if flagged {
            self.session.flagged_count += 1;
        } else {
            self.session.flagged_count -= 1;
        }
        self.renderer.on_flag_toggled(coords, flagged);
        Ok(FlagOutcome::Changed(flagged))
    }

    /// Finishes a running game: stops the timer and shows every mine.
    pub fn end_game(&mut self, won: bool) {
        if !self.session.state.is_playing() {
            return;
        }

        self.timer.cancel();
        self.session.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        if won {
            self.session.triggered_mine = None;
        }
        log::debug!(
            "Game {} after {} steps, {} squares opened",
            if won { "won" } else { "lost" },
            self.timer.total_steps(),
            self.session.opened_count()
        );

        let mine_coords = self.grid.as_ref().map(Grid::mine_coords).unwrap_or_default();
        self.renderer.on_game_ended(won, mine_coords);
    }

    /// Stops the timer and input until [`Game::resume`], returns whether anything changed.
    pub fn pause(&mut self) -> bool {
        if !self.accepts_moves() {
            return false;
        }
        self.paused = true;
        self.timer.cancel();
        self.renderer.on_pause_changed(true);
        true
    }

    pub fn resume(&mut self) -> bool {
        if !(self.paused && self.session.state.is_playing()) {
            return false;
        }
        self.paused = false;
        self.timer.resume();
        self.renderer.on_pause_changed(false);
        true
    }

    /// Delivers one timer interval, pushing the new count to the renderer.
    pub fn tick(&mut self) -> Option<u32> {
        let steps = self.timer.tick()?;
        self.renderer.on_timer_tick(steps);
        Some(steps)
    }

    fn accepts_moves(&self) -> bool {
        self.session.state.is_playing() && !self.paused
    }

    fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let grid = self.grid.as_ref().ok_or(GameError::NoGame)?;
        grid.validate_coords(coords).inspect_err(|_| {
            log::warn!(
                "Rejected coordinates {:?} on a {:?} grid",
                coords,
                grid.size()
            )
        })
    }
}
