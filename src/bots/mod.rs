//! Built-in bots.
//!
//! Simple strategies, mostly useful as sparring partners and to check that a tournament
//! setup works end to end.

use crate::{
    agent::{bot_factory, BotFactory},
    board::Coord,
    game_interface::BoardSetup,
};

mod random;
mod scan;
mod smart_random;

pub use random::RandomBot;
pub use scan::ScanBot;
pub use smart_random::SmartRandomBot;

/// Every built-in bot with its registry name, in registration order.
pub fn builtin() -> Vec<(&'static str, BotFactory)> {
    vec![
        ("RandomBot", bot_factory(|_| RandomBot::new())),
        ("SmartRandomBot", bot_factory(|_| SmartRandomBot::new())),
        ("ScanBot", bot_factory(|_| ScanBot::new())),
    ]
}

/// A bot's own picture of the board: which cells are still free.
#[derive(Debug, Clone, Default)]
struct BoardView {
    width: usize,
    height: usize,
    free: Vec<bool>,
}

impl BoardView {
    fn new(setup: &BoardSetup<'_>) -> Self {
        let mut view = BoardView {
            width: setup.width,
            height: setup.height,
            free: vec![true; setup.width * setup.height],
        };
        for &obstacle in setup.obstacles {
            view.take(obstacle);
        }
        view
    }

    fn index(&self, c: Coord) -> Option<usize> {
        let (x, y) = (usize::try_from(c.x).ok()?, usize::try_from(c.y).ok()?);
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    fn take(&mut self, c: Coord) {
        if let Some(i) = self.index(c) {
            self.free[i] = false;
        }
    }

    /// Free cells in row-major order.
    fn free_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.free
            .iter()
            .enumerate()
            .filter(|(_, free)| **free)
            .map(|(i, _)| Coord::new((i % self.width) as i64, (i / self.width) as i64))
    }
}
