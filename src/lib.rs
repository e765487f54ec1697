//! # Line Tournament
//!
//! A referee and tournament runner for N-in-a-row games on rectangular boards with
//! obstacles, played by pluggable bots.
//!
//! It provides:
//! - The rules of one match, enforced by the [`Arbiter`](crate::arbiter::Arbiter)
//! - Match scheduling and execution (`Evaluator`)
//! - Tournament logic via the `TournamentStrategy` trait, with the built-in `RoundRobinTournament`
//! - A few built-in bots to play against
//!
//! A bot that fails in any way (error, panic, timeout, illegal move) is eliminated from the
//! match it plays and nothing else happens to the run. Only a badly set up tournament, such as
//! a board with more seats than there are bots, stops it.
//!
//! # Documentation Overview
//!
//! - For the rules of a match and how faults are handled, see the [`arbiter`] module.
//! - For running a whole tournament, see the [`server`] module.
//! - For configuring evaluation behavior, see [`Configuration`](crate::configuration::Configuration).
//! - To understand match scheduling and scoring, see the [`TournamentStrategy`](crate::tournament_strategy::TournamentStrategy) trait.
//! - For implementing bots, check out the [`Bot`](crate::game_interface::Bot) trait.
//!
//! # Usage Example
//!
//! ```no_run
//! use line_tournament::prelude::*;
//!
//! struct FirstCorner;
//!
//! impl Bot for FirstCorner {
//!     fn init_board(&mut self, _setup: &BoardSetup<'_>) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//!
//!     fn choose_move(&mut self, _time_remaining_ms: i64) -> anyhow::Result<Coord> {
//!         Ok(Coord::new(0, 0))
//!     }
//!
//!     fn on_move_made(&mut self, _player_index: usize, _coord: Coord) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut bots = BotRegistry::builtin();
//!     bots.register("FirstCorner", bot_factory(|_seat| FirstCorner))?;
//!
//!     let boards = BoardRegistry::from_dir("boards")?;
//!
//!     let config = Configuration::new().with_log_dir("logs");
//!     let ranking = Evaluator::new(config).evaluate(&bots, &boards, RoundRobinTournament::new())?;
//!     println!("{ranking}");
//!     Ok(())
//! }
//! ```
#![warn(missing_docs)]

pub use anyhow;
pub mod agent;
pub mod arbiter;
pub mod board;
pub mod bots;
pub mod configuration;
pub mod error;
pub mod game_interface;
pub mod logger;
pub mod match_log;
mod match_runner;
pub mod registry;
pub mod server;
mod tournament_scheduler;
pub mod tournament_strategy;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use line_tournament::prelude::*;
/// ```
///
/// Includes:
/// - [`Configuration`](crate::configuration::Configuration)
/// - [`Evaluator`](crate::server::Evaluator)
/// - the [`Bot`](crate::game_interface::Bot) trait and what it deals with
/// - the registries
/// - all built-in [`Tournament strategies`](crate::tournament_strategy)
pub mod prelude {
    pub use crate::agent::{bot_factory, BotFactory};
    pub use crate::board::{BoardConfig, Coord};
    pub use crate::configuration::{Configuration, Verbosity};
    pub use crate::error::ConfigurationError;
    pub use crate::game_interface::{BoardSetup, Bot};
    pub use crate::registry::{BoardRegistry, BotRegistry};
    pub use crate::server::Evaluator;
    pub use crate::tournament_strategy::*;
}
