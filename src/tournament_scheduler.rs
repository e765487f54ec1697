use tracing::trace;

use crate::agent::Agent;
use crate::board::BoardConfig;
use crate::error::ConfigurationError;
use crate::match_runner::{MatchSettings, RunnerResult};
use crate::tournament_strategy::{Ranking, TournamentStrategy};
use std::collections::VecDeque;
use std::sync::Arc;

/// Hands out the matches of a tournament and folds their results.
///
/// Every match is planned at construction time, so match numbers do not depend on the
/// order in which results come back.
pub struct TournamentScheduler<S: TournamentStrategy> {
    pending_matches: VecDeque<MatchSettings>,
    strategy: S,
    running_matches: usize,
    planned: usize,
}

impl<S: TournamentStrategy> TournamentScheduler<S> {
    /// Plan every board, in order, numbering matches from 1.
    ///
    /// # Errors
    /// [`ConfigurationError::NotEnoughBots`] for the first board with more seats than there
    /// are bots. Nothing is planned in that case.
    pub fn new(
        agents: Vec<Arc<Agent>>,
        boards: &[Arc<BoardConfig>],
        mut strategy: S,
    ) -> Result<Self, ConfigurationError> {
        let available = agents.len();
        strategy.add_agents(agents);

        let mut pending_matches = VecDeque::new();
        for board in boards {
            if available < board.num_players() {
                return Err(ConfigurationError::NotEnoughBots {
                    board: board.name().to_owned(),
                    required: board.num_players(),
                    available,
                });
            }
            for ordered_player in strategy.lineups(board) {
                pending_matches.push_back(MatchSettings {
                    match_number: pending_matches.len() + 1,
                    board: board.clone(),
                    ordered_player,
                });
            }
        }
        trace!(matches = pending_matches.len(), "planned");

        Ok(TournamentScheduler {
            planned: pending_matches.len(),
            pending_matches,
            strategy,
            running_matches: 0,
        })
    }

    /// Matches to start now, keeping at most `capacity` running at the same time.
    pub fn advance(&mut self, capacity: usize) -> Vec<MatchSettings> {
        let free = capacity.max(1).saturating_sub(self.running_matches);
        let n = free.min(self.pending_matches.len());
        let matches_to_run = self.pending_matches.drain(..n).collect::<Vec<_>>();
        self.running_matches += matches_to_run.len();
        matches_to_run
    }

    /// Record a finished match and return the matches that can start in its place.
    pub fn on_result(&mut self, result: RunnerResult, capacity: usize) -> Vec<MatchSettings> {
        self.strategy
            .record(&result.settings.ordered_player, &result.result);
        self.running_matches = self.running_matches.saturating_sub(1);
        self.advance(capacity)
    }

    /// All tournament matches ran and finished
    pub fn is_finished(&self) -> bool {
        self.pending_matches.is_empty() && self.running_matches == 0
    }

    /// Number of matches planned at construction.
    pub fn planned(&self) -> usize {
        self.planned
    }

    /// Current standings.
    pub fn ranking(&self) -> Ranking {
        self.strategy.ranking()
    }
}
