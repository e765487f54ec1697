//! Core evaluation logic for running bot tournaments.
//!
//! This module defines the [`Evaluator`] type, which orchestrates tournament execution.
//! Its responsibilities include:
//!
//! - Preparing the match log directory
//! - Planning every match of every board with a user-chosen [`TournamentStrategy`]
//! - Running matches, possibly several at a time, and folding their results
//! - Returning the final ranking
//!
//! # Behavior & Configuration
//!
//! Behavior is controlled by a [`Configuration`] object:
//!
//! - With a log directory, each match is narrated into its own file there. The directory is
//!   created if needed and, unless disabled, emptied of plain files first.
//! - `parallel_matches` bounds how many matches run at the same time. Each match runs on its
//!   own thread; bots are created on that thread.
//!
//! A board with more seats than there are bots aborts the run before any match is played.
//! With a log directory, the reason is also written to `ERROR__<board>.log`.
//!
//! # Example
//!
//! See crate-level documentation for an example on how to use the `Evaluator`.

use crate::configuration::Configuration;
use crate::error::ConfigurationError;
use crate::match_log::{prepare_log_dir, write_error_log};
use crate::match_runner::{run_match, MatchSettings, RunnerResult};
use crate::registry::{BoardRegistry, BotRegistry};
use crate::tournament_scheduler::TournamentScheduler;
use crate::tournament_strategy::{Ranking, TournamentStrategy};

use anyhow::{anyhow, Context};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use tracing::{error, info, instrument, trace, warn};

/// The main type for running bot tournaments.
///
/// It schedules matches, runs them and collects the final ranking.
#[derive(Debug, Clone)]
pub struct Evaluator {
    config: Configuration,
}

impl Evaluator {
    #[instrument(skip_all)]
    /// Create an [`Evaluator`] with the given [`Configuration`]
    pub fn new(config: Configuration) -> Evaluator {
        trace!(?config);
        Evaluator { config }
    }

    /// Plays the tournament between `bots` on every board of `boards`.
    ///
    /// # Returns
    /// The ranking of every bot, including those that never scored.
    ///
    /// # Errors
    /// Returns an error if the log directory cannot be prepared, a board needs more bots than
    /// available ([`ConfigurationError::NotEnoughBots`]), or a match log cannot be written.
    pub fn evaluate<T: TournamentStrategy>(
        &self,
        bots: &BotRegistry,
        boards: &BoardRegistry,
        strategy: T,
    ) -> anyhow::Result<Ranking> {
        // 1. log directory
        if let Some(dir) = self.config.log_dir() {
            prepare_log_dir(dir, self.config.clean_log_dir)?;
        }

        // 2. what takes part
        info!(
            "Boards: {}",
            boards
                .boards()
                .iter()
                .map(|b| b.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        info!(
            "Bots: {}",
            bots.agents()
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        if boards.is_empty() || bots.is_empty() {
            warn!("Nothing to play: no boards or no bots");
            return Ok(Ranking::default());
        }

        // 3. plan every match
        let mut scheduler =
            match TournamentScheduler::new(bots.agents().to_vec(), boards.boards(), strategy) {
                Ok(scheduler) => scheduler,
                Err(e) => return Err(self.abort(e)),
            };
        info!("{} matches to play", scheduler.planned());

        // 4. run them
        let capacity = self.config.parallel_matches;
        let (tx_result, rx_result) = mpsc::channel();
        for m in scheduler.advance(capacity) {
            self.launch_match(m, tx_result.clone());
        }
        while !scheduler.is_finished() {
            // not finished <=> match running <=> result to receive
            let result = rx_result
                .recv()
                .context("match worker disappeared without sending a result")??;
            for new_match in scheduler.on_result(result, capacity) {
                self.launch_match(new_match, tx_result.clone());
            }
        }

        // 5. summary
        let ranking = scheduler.ranking();
        info!("=== Tournament summary ===");
        for line in ranking.to_string().lines() {
            info!("{line}");
        }
        Ok(ranking)
    }

    fn abort(&self, e: ConfigurationError) -> anyhow::Error {
        error!("{e}");
        if let (Some(dir), ConfigurationError::NotEnoughBots { board, .. }) =
            (self.config.log_dir(), &e)
        {
            if let Err(write_err) = write_error_log(dir, board, &format!("ERROR: {e}")) {
                error!("{write_err:#}");
            }
        }
        e.into()
    }

    fn launch_match(
        &self,
        match_settings: MatchSettings,
        tx_result: Sender<anyhow::Result<RunnerResult>>,
    ) {
        info!("Starting {match_settings}");
        let config = self.config.clone();
        std::thread::spawn(move || {
            let label = match_settings.to_string();
            let result = catch_unwind(AssertUnwindSafe(|| run_match(match_settings, &config)))
                .unwrap_or_else(|_| Err(anyhow!("match {label} panicked")));

            match &result {
                Ok(r) => info!("{label}: {}", r.result),
                Err(e) => error!("{label}: {e:#}"),
            }
            // the receiver is gone only if the tournament already failed
            let _ = tx_result.send(result);
        });
    }
}
