use serde::{Deserialize, Serialize};

/// State of a single square on the grid.
///
/// Opening is one-way: once opened a square is never flagged or opened again, and its mine
/// flag is only ever set while the grid is being generated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    is_mine: bool,
    is_flagged: bool,
    is_opened: bool,
}

impl Square {
    pub const fn is_mine(self) -> bool {
        self.is_mine
    }

    pub const fn is_flagged(self) -> bool {
        self.is_flagged
    }

    pub const fn is_opened(self) -> bool {
        self.is_opened
    }

    pub(crate) fn set_mine(&mut self) {
        self.is_mine = true;
    }

    /// Flips the flag and returns the new value, opened squares keep no flag.
    pub(crate) fn toggle_flag(&mut self) -> bool {
        if !self.is_opened {
            self.is_flagged = !self.is_flagged;
        }
        self.is_flagged
    }

    /// Hides the square again, keeping only its mine.
    pub(crate) fn cover(&mut self) {
        self.is_flagged = false;
        self.is_opened = false;
    }

    /// Opens a hidden, unflagged square. Returns whether it was safe.
    pub(crate) fn open(&mut self) -> bool {
        debug_assert!(!self.is_flagged, "flagged squares are never opened");
        self.is_opened = true;
        !self.is_mine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_square_is_blank() {
        let square = Square::default();
        assert!(!square.is_mine());
        assert!(!square.is_flagged());
        assert!(!square.is_opened());
    }

    #[test]
    fn flag_toggles_back_and_forth() {
        let mut square = Square::default();
        assert!(square.toggle_flag());
        assert!(square.is_flagged());
        assert!(!square.toggle_flag());
        assert!(!square.is_flagged());
    }

    #[test]
    fn opened_square_cannot_be_flagged() {
        let mut square = Square::default();
        assert!(square.open());
        assert!(!square.toggle_flag());
        assert!(square.is_opened());
    }

    #[test]
    fn opening_a_mine_reports_unsafe() {
        let mut square = Square::default();
        square.set_mine();
        assert!(!square.open());
    }
}
