use crate::*;
pub use random::*;

mod random;

/// Strategy deciding where the mines of a new grid go.
///
/// Implementations receive an already validated config and must place exactly
/// `config.mines` distinct mines.
pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> Grid;
}
