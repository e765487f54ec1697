//! Board variants described by TOML files.
//!
//! ```toml
//! name = "cross"
//! width = 7
//! height = 7
//! win_length = 4
//! num_players = 2
//! time_ms = 2000
//! obstacles = [[3, 3], [0, 6]]
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    board::{BoardConfig, Coord},
    error::ConfigurationError,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BoardFile {
    name: String,
    width: usize,
    height: usize,
    win_length: usize,
    num_players: usize,
    time_ms: u64,
    #[serde(default)]
    obstacles: Vec<(i64, i64)>,
}

impl TryFrom<BoardFile> for BoardConfig {
    type Error = ConfigurationError;

    fn try_from(file: BoardFile) -> Result<Self, Self::Error> {
        BoardConfig::new(
            file.name,
            file.width,
            file.height,
            file.win_length,
            file.num_players,
            file.obstacles.into_iter().map(Coord::from).collect(),
            file.time_ms,
        )
    }
}

pub(super) fn load_boards(dir: &Path) -> anyhow::Result<Vec<BoardConfig>> {
    if !dir.is_dir() {
        return Err(ConfigurationError::NotADirectory(dir.to_owned()).into());
    }

    let mut files = vec![];
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("cannot read boards directory '{}'", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        } else {
            warn!("Skipping '{}': not a .toml board file", path.display());
        }
    }
    files.sort();

    files.iter().map(|path| load_board(path)).collect()
}

fn load_board(path: &Path) -> anyhow::Result<BoardConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read '{}'", path.display()))?;
    let file: BoardFile =
        toml::from_str(&content).with_context(|| format!("cannot parse '{}'", path.display()))?;
    let config = BoardConfig::try_from(file)
        .with_context(|| format!("invalid board file '{}'", path.display()))?;
    info!("Loaded board {config} from {}", path.display());
    Ok(config)
}
