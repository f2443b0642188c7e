use std::io::{self, BufRead};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use minegrid_core::{EventOutcome, Game, GameConfig, InputEvent, RevealOutcome};
use web_time::Instant;

use command::Command;
use render::{Frontend, JsonRenderer, TextRenderer};

mod command;
mod render;
mod settings;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(version, about = "Terminal minesweeper", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    settings: settings::SettingsArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let settings = settings::Settings::load(&args.settings)?;
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    if settings.json {
        Session::new(JsonRenderer::new(stdout), seed, settings.game).run(stdin)
    } else {
        Session::new(TextRenderer::new(stdout), seed, settings.game).run(stdin)
    }
}

/// Drives one engine from line-based input and the wall clock.
struct Session<F> {
    game: Game<F>,
    config: GameConfig,
    last_tick: Instant,
}

impl<F: Frontend> Session<F> {
    fn new(frontend: F, seed: u64, config: GameConfig) -> Self {
        Self {
            game: Game::new(frontend, seed),
            config,
            last_tick: Instant::now(),
        }
    }

    fn run(&mut self, input: impl BufRead) -> Result<()> {
        self.game
            .new_game(self.config)
            .context("Could not start the first game")?;
        self.last_tick = Instant::now();
        self.show_mines_left();
        self.game.renderer_mut().report(command::HELP)?;
        self.game.renderer_mut().present()?;

        for line in input.lines() {
            let line = line.context("Could not read input")?;
            self.deliver_ticks();

            let parsed = match command::parse(&line, self.config) {
                Ok(Some(parsed)) => parsed,
                Ok(None) => continue,
                Err(err) => {
                    self.game.renderer_mut().report(&err.to_string())?;
                    continue;
                }
            };

            match parsed {
                Command::Quit => break,
                Command::Help => self.game.renderer_mut().report(command::HELP)?,
                Command::Show => self.game.renderer_mut().invalidate(),
                Command::Input(event) => self.apply(event)?,
            }
            self.game.renderer_mut().present()?;
        }

        log::debug!("Leaving after {} steps", self.game.elapsed_steps());
        Ok(())
    }

    fn apply(&mut self, event: InputEvent) -> Result<()> {
        match self.game.handle(event) {
            Ok(EventOutcome::Started) => {
                if let InputEvent::NewGame(config) = event {
                    self.config = config;
                }
                self.last_tick = Instant::now();
                self.show_mines_left();
            }
            Ok(EventOutcome::Reveal(RevealOutcome::HitMine)) => {
                self.game.renderer_mut().report("Boom! Type `new` to play again.")?;
            }
            Ok(EventOutcome::Reveal(RevealOutcome::Won)) => {
                let steps = self.game.elapsed_steps();
                self.game
                    .renderer_mut()
                    .report(&format!("Cleared in {} seconds!", steps))?;
            }
            Ok(EventOutcome::Reveal(outcome)) if !outcome.has_update() => {
                self.game.renderer_mut().report("Nothing to open there.")?;
            }
            Ok(EventOutcome::Flag(outcome)) if outcome.has_update() => self.show_mines_left(),
            Ok(EventOutcome::Flag(_)) => {
                self.game.renderer_mut().report("Nothing to flag there.")?;
            }
            Ok(EventOutcome::Pause(Some(false))) => self.last_tick = Instant::now(),
            Ok(outcome) => log::trace!("{:?} -> {:?}", event, outcome),
            Err(err) => {
                log::debug!("Rejected {:?}: {}", event, err);
                self.game.renderer_mut().report(&err.to_string())?;
            }
        }
        Ok(())
    }

    fn show_mines_left(&mut self) {
        let mines_left = self.game.mines_left();
        self.game.renderer_mut().set_mines_left(mines_left);
    }

    /// Converts the whole seconds since the last tick into timer ticks.
    fn deliver_ticks(&mut self) {
        while self.last_tick.elapsed() >= TICK_INTERVAL {
            self.last_tick += TICK_INTERVAL;
            self.game.tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minegrid_core::{Coord2, Difficulty, EngineState, NullRenderer, RenderEvent, Renderer};
    use std::io::Cursor;

    #[derive(Default)]
    struct Recorder {
        events: Vec<RenderEvent>,
        reports: Vec<String>,
        mines_left: Vec<isize>,
    }

    impl Renderer for Recorder {
        fn on_board_created(&mut self, size: Coord2) {
            self.events.on_board_created(size);
        }

        fn on_game_ended(&mut self, won: bool, mine_coords: &[Coord2]) {
            self.events.on_game_ended(won, mine_coords);
        }
    }

    impl Frontend for Recorder {
        fn present(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn report(&mut self, message: &str) -> io::Result<()> {
            self.reports.push(message.to_owned());
            Ok(())
        }

        fn set_mines_left(&mut self, mines_left: isize) {
            self.mines_left.push(mines_left);
        }
    }

    #[test]
    fn session_plays_scripted_input() {
        let config = GameConfig::new((2, 1), 1).unwrap();

        // same seed, same first layout
        let mut reference = Game::new(NullRenderer, 3);
        reference.new_game(config).unwrap();
        let mine = reference.grid().unwrap().mine_coords()[0];
        let safe_x = 1 - mine.0;

        let mut session = Session::new(Recorder::default(), 3, config);
        let script = format!("open {} 0\n\nbogus\nnew beginner\nquit\nopen 0 0\n", safe_x);
        session.run(Cursor::new(script)).unwrap();

        assert_eq!(session.game.state(), EngineState::Playing);
        assert_eq!(session.config, Difficulty::Beginner.config());

        let recorder = session.game.renderer();
        assert_eq!(
            recorder.events,
            [
                RenderEvent::BoardCreated { size: (2, 1) },
                RenderEvent::GameEnded {
                    won: true,
                    mine_coords: vec![mine],
                },
                RenderEvent::BoardCreated { size: (9, 9) },
            ]
        );
        assert_eq!(recorder.reports.len(), 3);
        assert_eq!(recorder.reports[0], command::HELP);
        assert!(recorder.reports[1].starts_with("Cleared in"));
        assert_eq!(recorder.reports[2], "Unknown command `bogus`, try `help`");
    }

    #[test]
    fn rejected_moves_are_reported() {
        let config = GameConfig::new((2, 2), 1).unwrap();
        let mut session = Session::new(Recorder::default(), 0, config);

        session.run(Cursor::new("open 5 5\nnew 2 2 4\n")).unwrap();

        let reports = &session.game.renderer().reports;
        assert_eq!(reports[1], "Invalid coordinates");
        assert_eq!(reports[2], "Too many mines, at least one square must be safe");
        assert_eq!(session.config, config);
    }

    #[test]
    fn flags_update_mines_left_and_no_ops_are_reported() {
        let config = GameConfig::new((2, 2), 1).unwrap();
        let mut session = Session::new(Recorder::default(), 0, config);
        let mine = {
            let mut reference = Game::new(NullRenderer, 0);
            reference.new_game(config).unwrap();
            reference.grid().unwrap().mine_coords()[0]
        };
        let script = format!(
            "flag {x} {y}\nflag {x} {y}\nflag {x} {y}\nopen {x} {y}\n",
            x = mine.0,
            y = mine.1
        );

        session.run(Cursor::new(script)).unwrap();

        let recorder = session.game.renderer();
        assert_eq!(recorder.mines_left, [1, 0, 1, 0]);
        assert_eq!(recorder.reports[1..], ["Nothing to open there."]);
        assert_eq!(session.game.state(), EngineState::Playing);
    }
}
