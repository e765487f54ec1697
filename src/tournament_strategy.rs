//! Tournament strategies used by the evaluator to schedule bot lineups and score them.
//!
//! This module defines the [`TournamentStrategy`] trait and the built-in
//! [`RoundRobinTournament`].
//!
//! # Implementing a Custom Strategy
//! The evaluator calls `add_agents` once, then `lineups` for every board (in registry order)
//! before the first match starts. Every finished match is handed to `record`, in no
//! particular order. Once all matches ran, `ranking` produces the final table.

use std::{collections::HashMap, fmt::Display, sync::Arc};

use itertools::Itertools;
use tracing::debug;

use crate::{agent::Agent, arbiter::MatchResult, board::BoardConfig};

/// Points for a win.
pub const WIN_POINTS: u32 = 2;
/// Points for each surviving participant of a drawn match.
pub const DRAW_POINTS: u32 = 1;

/// A trait defining how bots are seated and scored in a tournament.
pub trait TournamentStrategy {
    /// Receives every bot identity taking part, in registry order.
    fn add_agents(&mut self, agents: Vec<Arc<Agent>>);

    /// The matches to play on `board`. Each lineup has `board.num_players()` entries, and the
    /// position in the lineup is the player index.
    fn lineups(&self, board: &BoardConfig) -> Vec<Vec<Arc<Agent>>>;

    /// Fold the result of one match played by `lineup`.
    fn record(&mut self, lineup: &[Arc<Agent>], result: &MatchResult);

    /// The standings so far.
    fn ranking(&self) -> Ranking;
}

/// Accumulated score of one bot identity.
#[derive(PartialEq, Eq, PartialOrd, Ord, Default, Debug, Clone, Copy)]
pub struct BotScore {
    /// 2 per win, 1 per draw survived.
    pub points: u32,
    /// Matches taken part in, whatever the outcome.
    pub games_played: u32,
    /// Matches taken part in that ended without a winner.
    pub draws: u32,
}

impl Display for BotScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} points in {} games ({} draws)",
            self.points, self.games_played, self.draws
        )
    }
}

/// One line of the final table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingEntry {
    /// Bot identity.
    pub name: String,
    /// Accumulated score.
    pub score: BotScore,
}

/// Final standings, sorted by points (descending) then name (ascending).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ranking {
    /// Table lines, best first.
    pub entries: Vec<RankingEntry>,
    /// Matches played in the whole run.
    pub total_games: u32,
    /// Matches without a winner.
    pub total_draws: u32,
}

impl Ranking {
    /// Sorts `scores` into a ranking.
    pub fn new(
        scores: impl IntoIterator<Item = (String, BotScore)>,
        total_games: u32,
        total_draws: u32,
    ) -> Self {
        let mut entries = scores
            .into_iter()
            .map(|(name, score)| RankingEntry { name, score })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| {
            b.score
                .points
                .cmp(&a.score.points)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ranking {
            entries,
            total_games,
            total_draws,
        }
    }

    /// Sum of all points awarded.
    pub fn total_points(&self) -> u32 {
        self.entries.iter().map(|e| e.score.points).sum()
    }

    /// Score of the bot called `name`.
    pub fn get(&self, name: &str) -> Option<&BotScore> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.score)
    }
}

impl Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total games played: {}", self.total_games)?;
        writeln!(f, "Total points awarded: {}", self.total_points())?;
        writeln!(f, "Draw games: {}", self.total_draws)?;
        if !self.entries.is_empty() {
            writeln!(f)?;
            writeln!(f, "Per-bot statistics:")?;
        }
        for entry in &self.entries {
            writeln!(
                f,
                "  {}: {} points in {} games",
                entry.name, entry.score.points, entry.score.games_played
            )?;
        }
        Ok(())
    }
}

/// Every ordered selection of distinct bots, for every board.
///
/// For `n` bots and a `k`-player board that is `n! / (n - k)!` matches: each bot meets every
/// other combination of bots from every seat.
#[derive(Debug, Default)]
pub struct RoundRobinTournament {
    agents: Vec<Arc<Agent>>,
    scores: HashMap<Arc<Agent>, BotScore>,
    total_games: u32,
    total_draws: u32,
}

impl RoundRobinTournament {
    /// Creates an empty round robin.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TournamentStrategy for RoundRobinTournament {
    fn add_agents(&mut self, agents: Vec<Arc<Agent>>) {
        for agent in &agents {
            self.scores.entry(agent.clone()).or_default();
        }
        self.agents = agents;
    }

    fn lineups(&self, board: &BoardConfig) -> Vec<Vec<Arc<Agent>>> {
        let lineups = self
            .agents
            .iter()
            .cloned()
            .permutations(board.num_players())
            .collect::<Vec<_>>();
        debug!(board = board.name(), count = lineups.len(), "lineups");
        lineups
    }

    fn record(&mut self, lineup: &[Arc<Agent>], result: &MatchResult) {
        self.total_games += 1;
        for agent in lineup {
            self.scores.entry(agent.clone()).or_default().games_played += 1;
        }

        match result.winner {
            Some(winner) => {
                let agent = &lineup[winner];
                self.scores.entry(agent.clone()).or_default().points += WIN_POINTS;
            }
            None => {
                self.total_draws += 1;
                for (idx, agent) in lineup.iter().enumerate() {
                    let score = self.scores.entry(agent.clone()).or_default();
                    score.draws += 1;
                    if !result.is_eliminated(idx) {
                        score.points += DRAW_POINTS;
                    }
                }
            }
        }
        debug!(board = %result.board_name, "recorded: {result}");
    }

    fn ranking(&self) -> Ranking {
        Ranking::new(
            self.scores
                .iter()
                .map(|(agent, score)| (agent.name.clone(), *score)),
            self.total_games,
            self.total_draws,
        )
    }
}
