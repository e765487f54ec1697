use anyhow::Context;

use super::BoardView;
use crate::{
    board::Coord,
    game_interface::{BoardSetup, Bot},
};

/// Plays the first free cell in row-major order.
#[derive(Debug, Default)]
pub struct ScanBot {
    view: BoardView,
}

impl ScanBot {
    /// A scanner with no board yet.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Bot for ScanBot {
    fn init_board(&mut self, setup: &BoardSetup<'_>) -> anyhow::Result<()> {
        self.view = BoardView::new(setup);
        Ok(())
    }

    fn choose_move(&mut self, _time_remaining_ms: i64) -> anyhow::Result<Coord> {
        self.view.free_cells().next().context("no free cell left")
    }

    fn on_move_made(&mut self, _player_index: usize, coord: Coord) -> anyhow::Result<()> {
        self.view.take(coord);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scans_row_major() {
        let obstacles = [Coord::new(0, 0)];
        let setup = BoardSetup {
            width: 3,
            height: 2,
            win_length: 3,
            obstacles: &obstacles,
            time_budget_ms: 100,
        };
        let mut bot = ScanBot::new();
        bot.init_board(&setup).unwrap();
        assert_eq!(bot.choose_move(100).unwrap(), Coord::new(1, 0));
        bot.on_move_made(0, Coord::new(1, 0)).unwrap();
        bot.on_move_made(1, Coord::new(2, 0)).unwrap();
        assert_eq!(bot.choose_move(100).unwrap(), Coord::new(0, 1));
    }
}
