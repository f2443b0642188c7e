use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Receiver of the engine's state-change notifications.
///
/// Notifications are fire-and-forget and arrive in the order the engine applies the changes.
/// Every method defaults to doing nothing so a renderer only implements what it draws.
pub trait Renderer {
    /// A new grid is ready, previous squares are gone.
    fn on_board_created(&mut self, _size: Coord2) {}

    /// A square was opened, `neighbour_mines` is in `0..=8`.
    fn on_square_opened(&mut self, _coords: Coord2, _neighbour_mines: u8) {}

    fn on_flag_toggled(&mut self, _coords: Coord2, _flagged: bool) {}

    /// The game is over, input should be disabled and every mine shown.
    fn on_game_ended(&mut self, _won: bool, _mine_coords: &[Coord2]) {}

    fn on_timer_tick(&mut self, _elapsed_steps: u32) {}

    fn on_pause_changed(&mut self, _paused: bool) {}
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn on_board_created(&mut self, size: Coord2) {
        (**self).on_board_created(size)
    }

    fn on_square_opened(&mut self, coords: Coord2, neighbour_mines: u8) {
        (**self).on_square_opened(coords, neighbour_mines)
    }

    fn on_flag_toggled(&mut self, coords: Coord2, flagged: bool) {
        (**self).on_flag_toggled(coords, flagged)
    }

    fn on_game_ended(&mut self, won: bool, mine_coords: &[Coord2]) {
        (**self).on_game_ended(won, mine_coords)
    }

    fn on_timer_tick(&mut self, elapsed_steps: u32) {
        (**self).on_timer_tick(elapsed_steps)
    }

    fn on_pause_changed(&mut self, paused: bool) {
        (**self).on_pause_changed(paused)
    }
}

/// Renderer that ignores everything.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct NullRenderer;

impl Renderer for NullRenderer {}

/// A renderer notification captured as data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RenderEvent {
    BoardCreated {
        size: Coord2,
    },
    SquareOpened {
        coords: Coord2,
        neighbour_mines: u8,
    },
    FlagToggled {
        coords: Coord2,
        flagged: bool,
    },
    GameEnded {
        won: bool,
        mine_coords: Vec<Coord2>,
    },
    TimerTick {
        elapsed_steps: u32,
    },
    PauseChanged {
        paused: bool,
    },
}

impl RenderEvent {
    /// Replays this notification onto another renderer.
    pub fn apply_to(&self, renderer: &mut impl Renderer) {
        use RenderEvent::*;
        match self {
            BoardCreated { size } => renderer.on_board_created(*size),
            SquareOpened {
                coords,
                neighbour_mines,
            } => renderer.on_square_opened(*coords, *neighbour_mines),
            FlagToggled { coords, flagged } => renderer.on_flag_toggled(*coords, *flagged),
            GameEnded { won, mine_coords } => renderer.on_game_ended(*won, mine_coords),
            TimerTick { elapsed_steps } => renderer.on_timer_tick(*elapsed_steps),
            PauseChanged { paused } => renderer.on_pause_changed(*paused),
        }
    }
}

/// Records every notification, in order.
impl Renderer for Vec<RenderEvent> {
    fn on_board_created(&mut self, size: Coord2) {
        self.push(RenderEvent::BoardCreated { size });
    }

    fn on_square_opened(&mut self, coords: Coord2, neighbour_mines: u8) {
        self.push(RenderEvent::SquareOpened {
            coords,
            neighbour_mines,
        });
    }

    fn on_flag_toggled(&mut self, coords: Coord2, flagged: bool) {
        self.push(RenderEvent::FlagToggled { coords, flagged });
    }

    fn on_game_ended(&mut self, won: bool, mine_coords: &[Coord2]) {
        self.push(RenderEvent::GameEnded {
            won,
            mine_coords: mine_coords.to_vec(),
        });
    }

    fn on_timer_tick(&mut self, elapsed_steps: u32) {
        self.push(RenderEvent::TimerTick { elapsed_steps });
    }

    fn on_pause_changed(&mut self, paused: bool) {
        self.push(RenderEvent::PauseChanged { paused });
    }
}
