use alloc::vec::Vec;
use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::Serialize;

use crate::*;

/// The board: a `width × height` array of squares plus the cached list of mined coordinates.
///
/// Exactly the squares listed in [`Grid::mine_coords`] are mines, each listed once. The shape
/// never changes after construction, a new game builds a new grid.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Grid {
    squares: Array2<Square>,
    mine_coords: Vec<Coord2>,
}

impl Grid {
    /// Builds a grid for `config`, letting `generator` decide where the mines go.
    pub fn generate(config: GameConfig, generator: impl MinefieldGenerator) -> Result<Self> {
        let config = config.validate()?;
        let grid = generator.generate(config);
        log::debug!(
            "Generated {}x{} grid with {} mines",
            grid.width(),
            grid.height(),
            grid.mine_count()
        );
        Ok(grid)
    }

    /// Builds a grid with mines at exactly `mine_coords`, duplicates are counted once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidSize);
        }

        let mut grid = Self::empty(size);
        for &coords in mine_coords {
            let coords = grid.validate_coords(coords)?;
            grid.place_mine(coords);
        }

        if grid.mine_count() >= grid.total_squares() {
            return Err(GameError::TooManyMines);
        }
        Ok(grid)
    }

    pub(crate) fn empty(size: Coord2) -> Self {
        Self {
            squares: Array2::default(size.to_nd_index()),
            mine_coords: Vec::new(),
        }
    }

    /// Marks a mine and records it, returns `false` if the square was already mined.
    pub(crate) fn place_mine(&mut self, coords: Coord2) -> bool {
        let square = &mut self[coords];
        if square.is_mine() {
            return false;
        }
        square.set_mine();
        self.mine_coords.push(coords);
        true
    }

    /// Closes every square and drops every flag, the mines stay where they are.
    pub fn reset_play_state(&mut self) {
        self.squares.iter_mut().for_each(Square::cover);
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        (self.width(), self.height())
    }

    pub fn width(&self) -> Coord {
        self.squares.dim().0.try_into().unwrap_or(Coord::MAX)
    }

    pub fn height(&self) -> Coord {
        self.squares.dim().1.try_into().unwrap_or(Coord::MAX)
    }

    pub fn total_squares(&self) -> CellCount {
        mult(self.width(), self.height())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_coords.len().try_into().unwrap_or(CellCount::MAX)
    }

    /// Number of squares that have to be opened to win.
    pub fn safe_square_count(&self) -> CellCount {
        self.total_squares() - self.mine_count()
    }

    /// Mined coordinates in placement order.
    pub fn mine_coords(&self) -> &[Coord2] {
        &self.mine_coords
    }

    /// Panics if `coords` is outside the grid.
    pub fn square(&self, coords: Coord2) -> Square {
        self[coords]
    }

    pub fn neighbours(&self, coords: Coord2) -> NeighborIter {
        self.squares.iter_neighbors(coords)
    }

    pub fn count_neighbour_mines(&self, coords: Coord2) -> u8 {
        let count = self
            .neighbours(coords)
            .filter(|&pos| self[pos].is_mine())
            .count();
        // at most 8 neighbours
        count as u8
    }
}

impl Index<Coord2> for Grid {
    type Output = Square;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.squares[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Grid {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.squares[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeSet;

    #[test]
    fn from_mine_coords_marks_exactly_listed_squares() {
        let grid = Grid::from_mine_coords((3, 2), &[(2, 0), (0, 1)]).unwrap();

        assert_eq!(grid.size(), (3, 2));
        assert_eq!(grid.mine_count(), 2);
        assert_eq!(grid.mine_coords(), &[(2, 0), (0, 1)]);
        assert!(grid.square((2, 0)).is_mine());
        assert!(grid.square((0, 1)).is_mine());
        assert!(!grid.square((1, 1)).is_mine());
        assert_eq!(grid.safe_square_count(), 4);
    }

    #[test]
    fn from_mine_coords_ignores_duplicates() {
        let grid = Grid::from_mine_coords((2, 2), &[(1, 1), (1, 1)]).unwrap();

        assert_eq!(grid.mine_count(), 1);
        assert_eq!(grid.mine_coords(), &[(1, 1)]);
    }

    #[test]
    fn from_mine_coords_rejects_bad_layouts() {
        assert_eq!(
            Grid::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
        assert_eq!(Grid::from_mine_coords((0, 2), &[]), Err(GameError::InvalidSize));
        assert_eq!(
            Grid::from_mine_coords((1, 2), &[(0, 0), (0, 1)]),
            Err(GameError::TooManyMines)
        );
    }

    #[test]
    fn reset_play_state_keeps_only_mines() {
        let mut grid = Grid::from_mine_coords((2, 2), &[(1, 1)]).unwrap();
        grid[(0, 0)].open();
        grid[(1, 1)].toggle_flag();

        grid.reset_play_state();

        assert_eq!(grid, Grid::from_mine_coords((2, 2), &[(1, 1)]).unwrap());
    }

    #[test]
    fn serialized_grid_lists_mines() {
        let grid = Grid::from_mine_coords((2, 2), &[(1, 1), (0, 1)]).unwrap();
        let value = serde_json::to_value(&grid).unwrap();

        assert_eq!(value["mine_coords"], serde_json::json!([[1, 1], [0, 1]]));
        assert_eq!(value["squares"]["dim"], serde_json::json!([2, 2]));
    }

    #[test]
    fn generate_places_requested_distinct_mines() {
        for seed in 0..20 {
            let config = GameConfig::new((9, 9), 10).unwrap();
            let grid = Grid::generate(config, RandomMinefieldGenerator::new(seed)).unwrap();

            let mined: BTreeSet<Coord2> = (0..9u8)
                .flat_map(|x| (0..9u8).map(move |y| (x, y)))
                .filter(|&coords| grid[coords].is_mine())
                .collect();
            let cached: BTreeSet<Coord2> = grid.mine_coords().iter().copied().collect();

            assert_eq!(grid.mine_count(), 10);
            assert_eq!(cached.len(), 10, "duplicate in mine cache for seed {}", seed);
            assert_eq!(mined, cached);
        }
    }

    #[test]
    fn generate_rejects_invalid_config() {
        let config = GameConfig::new_unchecked((2, 2), 4);
        assert_eq!(
            Grid::generate(config, RandomMinefieldGenerator::new(0)),
            Err(GameError::TooManyMines)
        );
    }

    #[test]
    fn neighbour_counts_match_layout() {
        // * . .
        // . . .
        // . . *
        let grid = Grid::from_mine_coords((3, 3), &[(0, 0), (2, 2)]).unwrap();

        assert_eq!(grid.count_neighbour_mines((1, 1)), 2);
        assert_eq!(grid.count_neighbour_mines((1, 0)), 1);
        assert_eq!(grid.count_neighbour_mines((2, 0)), 0);
        assert_eq!(grid.count_neighbour_mines((0, 2)), 0);
        assert_eq!(grid.count_neighbour_mines((2, 1)), 1);
    }

    #[test]
    fn neighbour_count_reaches_eight() {
        let ring = [
            (0, 0),
            (1, 0),
            (2, 0),
            (0, 1),
            (2, 1),
            (0, 2),
            (1, 2),
            (2, 2),
        ];
        let grid = Grid::from_mine_coords((3, 3), &ring).unwrap();
        assert_eq!(grid.count_neighbour_mines((1, 1)), 8);
    }

    #[test]
    fn neighbours_are_in_bounds_everywhere() {
        let grid = Grid::from_mine_coords((4, 3), &[]).unwrap();
        for x in 0..4 {
            for y in 0..3 {
                let neighbours: alloc::vec::Vec<_> = grid.neighbours((x, y)).collect();
                assert!((3..=8).contains(&neighbours.len()));
                for pos in neighbours {
                    assert!(grid.validate_coords(pos).is_ok());
                }
            }
        }
    }
}
