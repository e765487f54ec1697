//! Module defining the trait every player has to implement

use crate::board::Coord;

/// Everything a bot is told about the board before the first move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSetup<'a> {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Contiguous cells needed to win.
    pub win_length: usize,
    /// Permanently blocked cells.
    pub obstacles: &'a [Coord],
    /// Time budget for the whole match, in milliseconds.
    pub time_budget_ms: u64,
}

/// What a player should implement.
///
/// A bot only ever learns about the game through these three calls and has to keep its own
/// view of the board. Any `Err` (or panic) is a fault: in [`init_board`](Bot::init_board) and
/// [`choose_move`](Bot::choose_move) it eliminates the bot, in
/// [`on_move_made`](Bot::on_move_made) it is only logged.
pub trait Bot {
    /// Called once per match, before any move.
    fn init_board(&mut self, setup: &BoardSetup<'_>) -> anyhow::Result<()>;

    /// Called on the bot's turn. `time_remaining_ms` is what is left of its budget; the time
    /// spent in this call is charged to it afterwards.
    fn choose_move(&mut self, time_remaining_ms: i64) -> anyhow::Result<Coord>;

    /// Called after every accepted move, including the bot's own.
    fn on_move_made(&mut self, player_index: usize, coord: Coord) -> anyhow::Result<()>;
}

impl<B: Bot + ?Sized> Bot for Box<B> {
    fn init_board(&mut self, setup: &BoardSetup<'_>) -> anyhow::Result<()> {
        (**self).init_board(setup)
    }

    fn choose_move(&mut self, time_remaining_ms: i64) -> anyhow::Result<Coord> {
        (**self).choose_move(time_remaining_ms)
    }

    fn on_move_made(&mut self, player_index: usize, coord: Coord) -> anyhow::Result<()> {
        (**self).on_move_made(player_index, coord)
    }
}
