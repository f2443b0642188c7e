use rand::rngs::SmallRng;
use rand::seq::index;
use rand::SeedableRng;

use super::*;

/// Purely random placement: every `mines`-sized subset of the squares is equally likely.
///
/// Mines are drawn as distinct row-major linear indices with a partial shuffle, so the cost
/// stays bounded by the board area even on nearly full boards.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Grid {
        let (width, _) = config.size;
        let total_squares = config.total_squares();
        let mut grid = Grid::empty(config.size);

        let mines = config.mines.min(total_squares);
        if mines < config.mines {
            log::warn!(
                "Minefield too small, requested {} mines but only fits {}",
                config.mines,
                total_squares
            );
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        for linear in index::sample(&mut rng, total_squares.into(), mines.into()) {
            // sampled below total_squares, which is a CellCount
            let coords = from_linear_index(linear as CellCount, width);
            let placed = grid.place_mine(coords);
            debug_assert!(placed, "index sample yielded {:?} twice", coords);
        }

        log::trace!(
            "Placed mines with seed {}: {:?}",
            self.seed,
            grid.mine_coords()
        );
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_layout() {
        let config = Difficulty::Intermediate.config();
        let a = RandomMinefieldGenerator::new(7).generate(config);
        let b = RandomMinefieldGenerator::new(7).generate(config);

        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let config = Difficulty::Expert.config();
        let a = RandomMinefieldGenerator::new(1).generate(config);
        let b = RandomMinefieldGenerator::new(2).generate(config);

        assert_ne!(a.mine_coords(), b.mine_coords());
    }

    #[test]
    fn nearly_full_board_keeps_one_safe_square() {
        let config = GameConfig::new((16, 16), 255).unwrap();
        let grid = RandomMinefieldGenerator::new(3).generate(config);

        assert_eq!(grid.mine_count(), 255);
        assert_eq!(grid.safe_square_count(), 1);
    }

    #[test]
    fn zero_mines_leaves_board_empty() {
        let config = GameConfig::new((5, 4), 0).unwrap();
        let grid = RandomMinefieldGenerator::new(11).generate(config);

        assert_eq!(grid.mine_count(), 0);
        assert!(grid.mine_coords().is_empty());
    }

    #[test]
    fn every_square_can_be_chosen() {
        // a single mine on a 3x3 board lands everywhere given enough seeds
        let config = GameConfig::new((3, 3), 1).unwrap();
        let mut seen = [[false; 3]; 3];
        for seed in 0..500 {
            let grid = RandomMinefieldGenerator::new(seed).generate(config);
            let (x, y) = grid.mine_coords()[0];
            seen[x as usize][y as usize] = true;
        }
        assert!(seen.iter().flatten().all(|&hit| hit));
    }
}
