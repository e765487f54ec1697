use anyhow::bail;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    board::Coord,
    game_interface::{BoardSetup, Bot},
};

/// Plays a uniformly random coordinate of the board, without looking at what is there.
/// Sooner or later it hits an obstacle or a taken cell and gets eliminated.
pub struct RandomBot {
    rng: StdRng,
    width: usize,
    height: usize,
}

impl RandomBot {
    /// A bot seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A reproducible bot.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        RandomBot {
            rng,
            width: 0,
            height: 0,
        }
    }
}

impl Default for RandomBot {
    fn default() -> Self {
        Self::new()
    }
}

impl Bot for RandomBot {
    fn init_board(&mut self, setup: &BoardSetup<'_>) -> anyhow::Result<()> {
        self.width = setup.width;
        self.height = setup.height;
        Ok(())
    }

    fn choose_move(&mut self, _time_remaining_ms: i64) -> anyhow::Result<Coord> {
        if self.width == 0 || self.height == 0 {
            bail!("board was never initialized");
        }
        let x = self.rng.gen_range(0..self.width);
        let y = self.rng.gen_range(0..self.height);
        Ok(Coord::new(x as i64, y as i64))
    }

    fn on_move_made(&mut self, _player_index: usize, _coord: Coord) -> anyhow::Result<()> {
        Ok(())
    }
}
