//! Referee for a single match.
//!
//! An [`Arbiter`] owns the grid and the per-player state of one match and drives the bots
//! turn by turn until somebody wins, the board is full, or eliminations leave at most one
//! player standing.
//!
//! ```text
//! Initializing -> AwaitingMove(p) -> Evaluating(p, move) -> AwaitingMove(next) | GameOver
//! ```
//!
//! Every fault of a bot (error or panic in `init_board`/`choose_move`, exceeded time budget,
//! illegal move) eliminates it; faults in `on_move_made` are only narrated.

use std::{
    any::Any,
    fmt::Display,
    panic::{self, AssertUnwindSafe},
    time::Instant,
};

use anyhow::anyhow;
use tracing::{debug, instrument, trace};

use crate::{
    board::{BoardConfig, Cell, Coord, Grid},
    error::ConfigurationError,
    game_interface::{BoardSetup, Bot},
    match_log::MatchSink,
};

/// Why a player left the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EliminationReason {
    /// `init_board` failed.
    InitFailure,
    /// `choose_move` failed.
    Crash,
    /// The time budget went negative.
    Timeout,
    /// The move was outside of the board.
    OutsideBoard,
    /// The move targeted an obstacle.
    BlockedCell,
    /// The move targeted a cell that was already taken.
    OccupiedCell,
}

impl Display for EliminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EliminationReason::InitFailure => "init failure",
            EliminationReason::Crash => "crash",
            EliminationReason::Timeout => "timeout",
            EliminationReason::OutsideBoard => "illegal move: outside board",
            EliminationReason::BlockedCell => "illegal move: blocked cell",
            EliminationReason::OccupiedCell => "illegal move: occupied cell",
        };
        f.write_str(s)
    }
}

/// One elimination, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elimination {
    /// Player index.
    pub player: usize,
    /// Why the player was removed.
    pub reason: EliminationReason,
}

/// Outcome of a finished match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Index of the winner; `None` is a draw.
    pub winner: Option<usize>,
    /// Name of the board the match was played on.
    pub board_name: String,
    /// Participant names, in player-index order.
    pub player_names: Vec<String>,
    /// Indices of the eliminated players, ascending.
    pub eliminated: Vec<usize>,
    /// Eliminations in the order they happened.
    pub eliminations: Vec<Elimination>,
    /// Number of accepted moves.
    pub moves: usize,
}

impl MatchResult {
    /// No winner.
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    /// Whether `player` was eliminated.
    pub fn is_eliminated(&self, player: usize) -> bool {
        self.eliminated.contains(&player)
    }

    /// Name of the winner, if any.
    pub fn winner_name(&self) -> Option<&str> {
        self.winner
            .and_then(|w| self.player_names.get(w))
            .map(String::as_str)
    }
}

impl Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.winner_name() {
            Some(name) => write!(f, "{name} wins"),
            None => write!(f, "draw"),
        }
    }
}

/// Where a match currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArbiterState {
    /// Bots have not been set up yet.
    Initializing,
    /// Waiting for this player's move.
    AwaitingMove(usize),
    /// This player's move is being checked and applied.
    Evaluating(usize, Coord),
    /// The match is decided.
    GameOver,
}

/// A seat of a match: the identity name and the bot instance playing for it.
pub struct Participant {
    /// Identity name, used in narration and results.
    pub name: String,
    /// The instance playing this match.
    pub bot: Box<dyn Bot>,
}

impl Participant {
    /// Seat `bot` under the identity `name`.
    pub fn new(name: impl Into<String>, bot: Box<dyn Bot>) -> Self {
        Participant {
            name: name.into(),
            bot,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PlayerState {
    time_left_ms: i64,
    eliminated: Option<EliminationReason>,
}

/// Runs exactly one match. See the [module documentation](self).
pub struct Arbiter<'c> {
    config: &'c BoardConfig,
    grid: Grid,
    participants: Vec<Participant>,
    players: Vec<PlayerState>,
    eliminations: Vec<Elimination>,
    winner: Option<usize>,
    state: ArbiterState,
    moves: usize,
    narrate: bool,
}

impl<'c> Arbiter<'c> {
    /// Set up a match of `config` between `participants`, seated in the given order.
    ///
    /// # Errors
    /// [`ConfigurationError::PlayerCountMismatch`] if there are not exactly
    /// `config.num_players()` participants.
    pub fn new(
        config: &'c BoardConfig,
        participants: Vec<Participant>,
    ) -> Result<Self, ConfigurationError> {
        if participants.len() != config.num_players() {
            return Err(ConfigurationError::PlayerCountMismatch {
                board: config.name().to_owned(),
                expected: config.num_players(),
                got: participants.len(),
            });
        }
        let budget = i64::try_from(config.time_ms()).unwrap_or(i64::MAX);
        let players = vec![
            PlayerState {
                time_left_ms: budget,
                eliminated: None,
            };
            participants.len()
        ];
        Ok(Arbiter {
            config,
            grid: Grid::from_config(config),
            participants,
            players,
            eliminations: vec![],
            winner: None,
            state: ArbiterState::Initializing,
            moves: 0,
            narrate: true,
        })
    }

    /// Enable or disable per-move narration (board drawings, moves). Faults and the final
    /// result are always narrated.
    pub fn with_narration(mut self, value: bool) -> Self {
        self.narrate = value;
        self
    }

    /// Current state.
    pub fn state(&self) -> ArbiterState {
        self.state
    }

    /// Read-only view of the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Remaining budget of `player` in milliseconds.
    pub fn time_left_ms(&self, player: usize) -> i64 {
        self.players[player].time_left_ms
    }

    /// Whether `player` has been eliminated.
    pub fn is_eliminated(&self, player: usize) -> bool {
        self.players[player].eliminated.is_some()
    }

    /// Play the match to the end, narrating into `sink`.
    ///
    /// Calling it again on a finished match returns the same result without calling any bot.
    #[instrument(skip_all, fields(board = %self.config.name()))]
    pub fn run(&mut self, sink: &mut dyn MatchSink) -> MatchResult {
        loop {
            let next = match self.state {
                ArbiterState::Initializing => self.initialize(sink),
                ArbiterState::AwaitingMove(player) => self.request_move(player, sink),
                ArbiterState::Evaluating(player, coord) => self.evaluate(player, coord, sink),
                ArbiterState::GameOver => break,
            };
            trace!(from = ?self.state, to = ?next, "transition");
            self.state = next;
        }
        self.result()
    }

    /// The result, once the match is over.
    pub fn outcome(&self) -> Option<MatchResult> {
        (self.state == ArbiterState::GameOver).then(|| self.result())
    }

    fn result(&self) -> MatchResult {
        let eliminated = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.eliminated.is_some())
            .map(|(i, _)| i)
            .collect();
        MatchResult {
            winner: self.winner,
            board_name: self.config.name().to_owned(),
            player_names: self.participants.iter().map(|p| p.name.clone()).collect(),
            eliminated,
            eliminations: self.eliminations.clone(),
            moves: self.moves,
        }
    }

    fn initialize(&mut self, sink: &mut dyn MatchSink) -> ArbiterState {
        if self.narrate {
            self.write_header(sink);
        }
        let config = self.config;
        let setup = BoardSetup {
            width: config.width(),
            height: config.height(),
            win_length: config.win_length(),
            obstacles: config.obstacles(),
            time_budget_ms: config.time_ms(),
        };
        for player in 0..self.participants.len() {
            let bot = &mut self.participants[player].bot;
            if let Err(e) = guarded(|| bot.init_board(&setup)) {
                let name = &self.participants[player].name;
                sink.line(&format!("  Bot P{player} ({name}) failed in init_board: {e}"));
                if self.eliminate(player, EliminationReason::InitFailure, sink) {
                    if self.narrate {
                        sink.line("=== Game over (during initialization) ===");
                    }
                    return ArbiterState::GameOver;
                }
            }
        }
        self.turn_of(0)
    }

    /// Turn for `candidate`, or for the next active player if `candidate` is out.
    fn turn_of(&self, candidate: usize) -> ArbiterState {
        if !self.is_eliminated(candidate) {
            return ArbiterState::AwaitingMove(candidate);
        }
        if self.active_players().len() <= 1 {
            return ArbiterState::GameOver;
        }
        ArbiterState::AwaitingMove(self.next_active_player(candidate))
    }

    fn request_move(&mut self, player: usize, sink: &mut dyn MatchSink) -> ArbiterState {
        let time_left = self.players[player].time_left_ms;
        if self.narrate {
            self.write_board(sink);
            sink.line(&format!(
                "P{player} ({}) to move. Time left: {time_left} ms",
                self.participants[player].name
            ));
        }

        let bot = &mut self.participants[player].bot;
        let start = Instant::now();
        let answer = guarded(|| bot.choose_move(time_left));
        let spent_ms = i64::try_from(start.elapsed().as_millis()).unwrap_or(i64::MAX);

        let coord = match answer {
            Ok(coord) => coord,
            Err(e) => {
                sink.line(&format!(
                    "  Bot P{player} ({}) crashed: {e}",
                    self.participants[player].name
                ));
                return self.after_fault(player, EliminationReason::Crash, sink);
            }
        };

        let state = &mut self.players[player];
        state.time_left_ms = state.time_left_ms.saturating_sub(spent_ms);
        if state.time_left_ms < 0 {
            sink.line(&format!(
                "  Bot P{player} ({}) exceeded its time budget.",
                self.participants[player].name
            ));
            return self.after_fault(player, EliminationReason::Timeout, sink);
        }
        ArbiterState::Evaluating(player, coord)
    }

    fn evaluate(&mut self, player: usize, coord: Coord, sink: &mut dyn MatchSink) -> ArbiterState {
        if self.narrate {
            sink.line(&format!("  Bot P{player} -> move {coord}"));
        }

        let illegal = match self.grid.get(coord) {
            None => Some(EliminationReason::OutsideBoard),
            Some(Cell::Blocked) => Some(EliminationReason::BlockedCell),
            Some(Cell::Occupied(_)) => Some(EliminationReason::OccupiedCell),
            Some(Cell::Empty) => None,
        };
        if let Some(reason) = illegal {
            sink.line(&format!("  Illegal move: {}.", illegal_detail(reason)));
            return self.after_fault(player, reason, sink);
        }

        self.grid.place(coord, player);
        self.moves += 1;
        debug!(player, %coord, "move accepted");
        self.broadcast(player, coord, sink);

        if self.grid.longest_line(coord, player) >= self.config.win_length() {
            self.winner = Some(player);
            if self.narrate {
                sink.line("");
                self.write_board(sink);
            }
            sink.line(&format!(
                "Winner: P{player} ({})",
                self.participants[player].name
            ));
            return ArbiterState::GameOver;
        }

        if self.grid.is_full() {
            self.winner = None;
            if self.narrate {
                sink.line("");
                self.write_board(sink);
            }
            sink.line("Board full: draw among remaining players.");
            return ArbiterState::GameOver;
        }

        if self.narrate {
            sink.line("");
        }
        ArbiterState::AwaitingMove(self.next_active_player(player))
    }

    /// `on_move_made` for every active bot, in player order. Failures are narrated and
    /// otherwise ignored: the recipient stays in the match.
    fn broadcast(&mut self, mover: usize, coord: Coord, sink: &mut dyn MatchSink) {
        for (idx, participant) in self.participants.iter_mut().enumerate() {
            if self.players[idx].eliminated.is_some() {
                continue;
            }
            let bot = &mut participant.bot;
            if let Err(e) = guarded(|| bot.on_move_made(mover, coord)) {
                debug!(player = idx, "on_move_made failed: {e}");
                sink.line(&format!(
                    "  on_move_made raised for P{idx} ({}): {e}",
                    participant.name
                ));
            }
        }
    }

    fn after_fault(
        &mut self,
        player: usize,
        reason: EliminationReason,
        sink: &mut dyn MatchSink,
    ) -> ArbiterState {
        if self.eliminate(player, reason, sink) {
            return ArbiterState::GameOver;
        }
        if self.narrate {
            sink.line("");
        }
        ArbiterState::AwaitingMove(self.next_active_player(player))
    }

    /// Remove `player` from the match. Returns true when this decides the match: nobody left
    /// is a draw, a single survivor wins.
    fn eliminate(
        &mut self,
        player: usize,
        reason: EliminationReason,
        sink: &mut dyn MatchSink,
    ) -> bool {
        if self.players[player].eliminated.is_some() {
            return false;
        }
        sink.line(&format!(
            "  Bot P{player} ({}) is ELIMINATED: {reason}",
            self.participants[player].name
        ));
        debug!(player, %reason, "eliminated");
        self.players[player].eliminated = Some(reason);
        self.eliminations.push(Elimination { player, reason });

        match self.active_players().as_slice() {
            [] => {
                self.winner = None;
                sink.line("All players eliminated: no winner.");
                true
            }
            [last] => {
                self.winner = Some(*last);
                sink.line(&format!(
                    "Winner: P{last} ({}) is the last player standing",
                    self.participants[*last].name
                ));
                true
            }
            _ => false,
        }
    }

    fn active_players(&self) -> Vec<usize> {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.eliminated.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// First active player after `current`, cyclically. `current` itself if nobody else is.
    fn next_active_player(&self, current: usize) -> usize {
        let n = self.players.len();
        (1..=n)
            .map(|offset| (current + offset) % n)
            .find(|&idx| self.players[idx].eliminated.is_none())
            .unwrap_or(current)
    }

    fn write_header(&self, sink: &mut dyn MatchSink) {
        let c = self.config;
        sink.line(&format!("=== Game on board '{}' ===", c.name()));
        sink.line(&format!(
            "Board: {}x{}, win length: {}, players: {}",
            c.width(),
            c.height(),
            c.win_length(),
            c.num_players()
        ));
        sink.line("Players (in order):");
        for (i, p) in self.participants.iter().enumerate() {
            sink.line(&format!("  P{i}: {}", p.name));
        }
        sink.line("");
    }

    fn write_board(&self, sink: &mut dyn MatchSink) {
        for line in self.grid.render() {
            sink.line(&line);
        }
        sink.line("");
    }
}

fn illegal_detail(reason: EliminationReason) -> &'static str {
    match reason {
        EliminationReason::OutsideBoard => "outside of board",
        EliminationReason::BlockedCell => "blocked cell",
        _ => "occupied cell",
    }
}

/// Runs a bot call, turning a panic into an error.
fn guarded<T>(call: impl FnOnce() -> anyhow::Result<T>) -> anyhow::Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(res) => res,
        Err(payload) => Err(anyhow!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
