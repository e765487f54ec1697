//! Running one scheduled match, from bot instantiation to the flushed match log.

use std::{fmt::Display, sync::Arc};

use tracing::{debug, instrument};

use crate::{
    agent::Agent,
    arbiter::{Arbiter, MatchResult, Participant},
    board::BoardConfig,
    configuration::Configuration,
    match_log::{match_log_file_name, FileSink, MatchSink, NullSink},
};

/// A match as planned by the scheduler.
#[derive(Debug, Clone)]
pub struct MatchSettings {
    /// Position in the tournament, starting at 1.
    pub match_number: usize,
    /// Board the match is played on.
    pub board: Arc<BoardConfig>,
    /// Bots in seat order: `ordered_player[i]` plays as player `i`.
    pub ordered_player: Vec<Arc<Agent>>,
}

impl MatchSettings {
    /// File name of this match's log.
    pub fn log_file_name(&self) -> String {
        match_log_file_name(
            self.match_number,
            self.board.name(),
            self.ordered_player.iter().map(|a| a.name.as_str()),
        )
    }
}

impl PartialEq for MatchSettings {
    fn eq(&self, other: &Self) -> bool {
        self.match_number == other.match_number
    }
}

impl Display for MatchSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .ordered_player
            .iter()
            .fold(String::new(), |acu, agent| {
                if acu.is_empty() {
                    acu + &agent.name
                } else {
                    acu + " VS " + &agent.name
                }
            });
        write!(f, "#{} {} [{s}]", self.match_number, self.board.name())
    }
}

/// What a worker sends back once a match is over.
#[derive(Debug)]
pub struct RunnerResult {
    /// The match that was played.
    pub settings: MatchSettings,
    /// How it ended.
    pub result: MatchResult,
}

/// Play `settings` to the end.
///
/// With a log directory configured, the match is narrated into its own file there;
/// otherwise narration is dropped.
///
/// # Errors
/// When the match log cannot be created or written, or the lineup does not fit the board.
#[instrument(skip_all, fields(game = settings.match_number))]
pub fn run_match(settings: MatchSettings, config: &Configuration) -> anyhow::Result<RunnerResult> {
    let participants = settings
        .ordered_player
        .iter()
        .enumerate()
        .map(|(seat, agent)| Participant::new(agent.name.clone(), agent.spawn(seat)))
        .collect::<Vec<_>>();
    let board = settings.board.clone();
    let mut arbiter = Arbiter::new(&board, participants)?
        .with_narration(config.verbosity().narrates_moves());

    let result = match config.log_dir() {
        Some(dir) => {
            let mut sink = FileSink::create(dir.join(settings.log_file_name()))?;
            debug!(log = %sink.path().display(), "narrating {settings}");
            let result = play(&mut arbiter, &mut sink);
            sink.finish()?;
            result
        }
        None => play(&mut arbiter, &mut NullSink),
    };
    debug!("{settings}: {result}");

    Ok(RunnerResult { settings, result })
}

fn play(arbiter: &mut Arbiter<'_>, sink: &mut dyn MatchSink) -> MatchResult {
    let result = arbiter.run(sink);
    sink.line(&format!("Result: {result}."));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::bot_factory;
    use crate::bots::ScanBot;

    fn settings(board: BoardConfig) -> MatchSettings {
        let agents = ["first bot", "Second"]
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                Arc::new(Agent::new(
                    name.to_owned(),
                    i as u32 + 1,
                    bot_factory(|_| ScanBot::new()),
                ))
            })
            .collect();
        MatchSettings {
            match_number: 4,
            board: Arc::new(board),
            ordered_player: agents,
        }
    }

    fn classic() -> BoardConfig {
        BoardConfig::new("classic".to_owned(), 3, 3, 3, 2, vec![], 1000).unwrap()
    }

    #[test]
    fn test_display_and_file_name() {
        let s = settings(classic());
        assert_eq!(s.to_string(), "#4 classic [first bot VS Second]");
        assert_eq!(s.log_file_name(), "game_004__classic__first_bot__Second.log");
    }

    #[test]
    fn test_scan_bots_without_log_dir() {
        // P0 fills (0,0) (2,0) (1,1) (0,2): the anti-diagonal completes on its fourth move
        let outcome = run_match(settings(classic()), &Configuration::new()).unwrap();
        assert_eq!(outcome.result.winner, Some(0));
        assert_eq!(outcome.result.moves, 7);
        assert_eq!(outcome.settings.match_number, 4);
    }

    #[test]
    fn test_match_log_is_written() {
        let dir = std::env::temp_dir().join(format!("line-tournament-runner-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = Configuration::new().with_log_dir(&dir);
        let s = settings(classic());
        let path = dir.join(s.log_file_name());

        run_match(s, &config).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("=== Game on board 'classic' ==="));
        assert!(text.ends_with("Result: first bot wins.\n"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
