//! Configuration faults.
//!
//! Everything a bot does wrong during a match is handled by eliminating it. The errors in
//! this module are the other kind: the tournament itself was set up wrong, and the run
//! cannot continue.

use std::path::PathBuf;

/// A fatal problem with boards, bots or their combination.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// An arbiter was given a number of players that does not match its board.
    #[error("board '{board}' expects {expected} players, but got {got}")]
    PlayerCountMismatch {
        /// Board name.
        board: String,
        /// `num_players` of the board.
        expected: usize,
        /// Number of participants handed to the arbiter.
        got: usize,
    },

    /// There are fewer distinct bots than seats on a board.
    #[error("board '{board}' requires {required} players, but only {available} bots are available")]
    NotEnoughBots {
        /// Board name.
        board: String,
        /// `num_players` of the board.
        required: usize,
        /// Number of registered bots.
        available: usize,
    },

    /// An obstacle lies outside of the board.
    #[error("board '{board}': obstacle ({x}, {y}) is outside of the board")]
    ObstacleOutOfBounds {
        /// Board name.
        board: String,
        /// Column of the obstacle.
        x: i64,
        /// Row of the obstacle.
        y: i64,
    },

    /// Geometry or player count that no game can be played on.
    #[error("board '{board}': {reason}")]
    InvalidBoard {
        /// Board name.
        board: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Two bots were registered under the same name.
    #[error("a bot named '{0}' is already registered")]
    DuplicateBot(String),

    /// Two boards share a name.
    #[error("a board named '{0}' is already registered")]
    DuplicateBoard(String),

    /// A bot was selected by a name that is not registered.
    #[error("unknown bot '{0}'")]
    UnknownBot(String),

    /// The boards directory does not exist.
    #[error("'{}' is not a valid directory", .0.display())]
    NotADirectory(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_enough_bots_display() {
        let err = ConfigurationError::NotEnoughBots {
            board: "triple".to_owned(),
            required: 3,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "board 'triple' requires 3 players, but only 2 bots are available"
        );
    }

    #[test]
    fn test_obstacle_display() {
        let err = ConfigurationError::ObstacleOutOfBounds {
            board: "tiny".to_owned(),
            x: 5,
            y: -1,
        };
        assert_eq!(
            err.to_string(),
            "board 'tiny': obstacle (5, -1) is outside of the board"
        );
    }
}
