use std::io::{self, Write};

use minegrid_core::{Coord2, RenderEvent, Renderer, ToNdIndex};
use ndarray::Array2;

/// A renderer that can write what it collected to the terminal.
pub(crate) trait Frontend: Renderer {
    /// Writes out pending changes.
    fn present(&mut self) -> io::Result<()>;

    /// Forces a full redraw on the next [`Frontend::present`].
    fn invalidate(&mut self) {}

    /// Mines not yet flagged, negative when there are more flags than mines.
    fn set_mines_left(&mut self, _mines_left: isize) {}

    fn report(&mut self, message: &str) -> io::Result<()>;
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewSquare {
    Hidden,
    Opened(u8),
    Flagged,
    FoundMine,
    BlownMine,
}

impl ViewSquare {
    fn glyph(self) -> char {
        use ViewSquare::*;
        match self {
            Hidden => '#',
            Opened(0) => '.',
            Opened(count) => char::from(b'0' + count),
            Flagged => 'F',
            FoundMine => '+',
            BlownMine => '*',
        }
    }
}

/// Draws the board as a character grid, columns left to right and rows top to bottom.
pub(crate) struct TextRenderer<W> {
    out: W,
    squares: Array2<ViewSquare>,
    elapsed: u32,
    mines_left: isize,
    paused: bool,
    result: Option<bool>,
    dirty: bool,
}

impl<W: Write> TextRenderer<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            squares: Array2::from_elem([0, 0], ViewSquare::Hidden),
            elapsed: 0,
            mines_left: 0,
            paused: false,
            result: None,
            dirty: false,
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self) -> io::Result<()> {
        let (width, height) = self.squares.dim();
        let status = match self.result {
            Some(true) => "won",
            Some(false) => "lost",
            None if self.paused => "paused",
            None => "playing",
        };
        writeln!(
            self.out,
            "time {:>4}  mines {:>3}  {}",
            self.elapsed, self.mines_left, status
        )?;
        if self.paused {
            return Ok(());
        }

        write!(self.out, "    ")?;
        for x in 0..width {
            write!(self.out, "{:>3}", x)?;
        }
        writeln!(self.out)?;
        for y in 0..height {
            write!(self.out, "{:>3} ", y)?;
            for x in 0..width {
                write!(self.out, "{:>3}", self.squares[[x, y]].glyph())?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn set(&mut self, coords: Coord2, square: ViewSquare) {
        self.squares[coords.to_nd_index()] = square;
        self.dirty = true;
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn on_board_created(&mut self, size: Coord2) {
        self.squares = Array2::from_elem(size.to_nd_index(), ViewSquare::Hidden);
        self.paused = false;
        self.result = None;
        self.dirty = true;
    }

    fn on_square_opened(&mut self, coords: Coord2, neighbour_mines: u8) {
        self.set(coords, ViewSquare::Opened(neighbour_mines));
    }

    fn on_flag_toggled(&mut self, coords: Coord2, flagged: bool) {
        let square = if flagged {
            ViewSquare::Flagged
        } else {
            ViewSquare::Hidden
        };
        self.set(coords, square);
    }

    fn on_game_ended(&mut self, won: bool, mine_coords: &[Coord2]) {
        let mine = if won {
            ViewSquare::FoundMine
        } else {
            ViewSquare::BlownMine
        };
        for &coords in mine_coords {
            self.set(coords, mine);
        }
        self.result = Some(won);
        self.dirty = true;
    }

    // the clock is shown with the next redraw, ticks alone do not redraw
    fn on_timer_tick(&mut self, elapsed_steps: u32) {
        self.elapsed = elapsed_steps;
    }

    fn on_pause_changed(&mut self, paused: bool) {
        self.paused = paused;
        self.dirty = true;
    }
}

impl<W: Write> Frontend for TextRenderer<W> {
    fn present(&mut self) -> io::Result<()> {
        if self.dirty {
            self.dirty = false;
            self.draw()?;
        }
        self.out.flush()
    }

    fn invalidate(&mut self) {
        self.dirty = true;
    }

    fn set_mines_left(&mut self, mines_left: isize) {
        if self.mines_left != mines_left {
            self.mines_left = mines_left;
            self.dirty = true;
        }
    }

    fn report(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message)?;
        self.out.flush()
    }
}

/// Writes every notification as one JSON object per line.
pub(crate) struct JsonRenderer<W> {
    out: W,
    pending: Vec<RenderEvent>,
}

impl<W: Write> JsonRenderer<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            pending: Vec::new(),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn on_board_created(&mut self, size: Coord2) {
        self.pending.on_board_created(size);
    }

    fn on_square_opened(&mut self, coords: Coord2, neighbour_mines: u8) {
        self.pending.on_square_opened(coords, neighbour_mines);
    }

    fn on_flag_toggled(&mut self, coords: Coord2, flagged: bool) {
        self.pending.on_flag_toggled(coords, flagged);
    }

    fn on_game_ended(&mut self, won: bool, mine_coords: &[Coord2]) {
        self.pending.on_game_ended(won, mine_coords);
    }

    fn on_timer_tick(&mut self, elapsed_steps: u32) {
        self.pending.on_timer_tick(elapsed_steps);
    }

    fn on_pause_changed(&mut self, paused: bool) {
        self.pending.on_pause_changed(paused);
    }
}

impl<W: Write> Frontend for JsonRenderer<W> {
    fn present(&mut self) -> io::Result<()> {
        for event in self.pending.drain(..) {
            serde_json::to_writer(&mut self.out, &event)?;
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    fn report(&mut self, message: &str) -> io::Result<()> {
        let line = serde_json::json!({ "event": "message", "text": message });
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }
}
