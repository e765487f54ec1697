use rand::{rngs::StdRng, seq::IteratorRandom, Rng, SeedableRng};

use super::BoardView;
use crate::{
    board::Coord,
    game_interface::{BoardSetup, Bot},
};

/// Picks uniformly among the cells it knows to be free, so it never plays an illegal move
/// as long as it is told about every move.
pub struct SmartRandomBot {
    rng: StdRng,
    view: BoardView,
}

impl SmartRandomBot {
    /// A bot seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A reproducible bot.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        SmartRandomBot {
            rng,
            view: BoardView::default(),
        }
    }
}

impl Default for SmartRandomBot {
    fn default() -> Self {
        Self::new()
    }
}

impl Bot for SmartRandomBot {
    fn init_board(&mut self, setup: &BoardSetup<'_>) -> anyhow::Result<()> {
        self.view = BoardView::new(setup);
        Ok(())
    }

    fn choose_move(&mut self, _time_remaining_ms: i64) -> anyhow::Result<Coord> {
        if let Some(c) = self.view.free_cells().choose(&mut self.rng) {
            return Ok(c);
        }
        // nothing free, should not happen
        let x = self.rng.gen_range(0..self.view.width.max(1));
        let y = self.rng.gen_range(0..self.view.height.max(1));
        Ok(Coord::new(x as i64, y as i64))
    }

    fn on_move_made(&mut self, _player_index: usize, coord: Coord) -> anyhow::Result<()> {
        self.view.take(coord);
        Ok(())
    }
}
