#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use line_tournament::prelude::*;
use tracing::{Level, Metadata};
use tracing_subscriber::{
    fmt,
    layer::{Context, Filter, SubscriberExt},
    Layer, Registry,
};

struct CustomLevelFilter;
impl<S> Filter<S> for CustomLevelFilter {
    fn enabled(&self, meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        meta.level() <= &Level::DEBUG
    }
}

/// Test output with thread names, so parallel matches can be told apart.
pub fn init_debug_logger() {
    let format = fmt::format()
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_target(false);

    let reg = Registry::default().with(
        fmt::layer()
            .event_format(format)
            .with_test_writer()
            .with_filter(CustomLevelFilter),
    );

    let _ = tracing::subscriber::set_global_default(reg);
}

/// Always answers with a cell that is not on any board.
pub struct Outsider;

impl Bot for Outsider {
    fn init_board(&mut self, _setup: &BoardSetup<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn choose_move(&mut self, _time_remaining_ms: i64) -> anyhow::Result<Coord> {
        Ok(Coord::new(99, 99))
    }

    fn on_move_made(&mut self, _player_index: usize, _coord: Coord) -> anyhow::Result<()> {
        Ok(())
    }
}

/// A `ScanBot` factory counting how many instances it built.
pub fn counting_scan_bot(counter: Arc<AtomicUsize>) -> BotFactory {
    bot_factory(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        line_tournament::bots::ScanBot::new()
    })
}

pub fn scan_bot() -> BotFactory {
    bot_factory(|_| line_tournament::bots::ScanBot::new())
}

pub fn board(name: &str, width: usize, height: usize, win: usize, players: usize) -> BoardConfig {
    BoardConfig::new(name, width, height, win, players, vec![], 1000).unwrap()
}

/// An empty directory unique to this process and `name`.
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "line-tournament-{name}-{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Sorted file names in `dir`.
pub fn file_names(dir: &std::path::Path) -> Vec<String> {
    let mut names = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();
    names
}
