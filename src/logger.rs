//! Process-wide `tracing` subscriber.

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::Context;
use time::{
    format_description::{self, parse},
    OffsetDateTime,
};
use tracing::subscriber::set_global_default;
use tracing_subscriber::{fmt::time::OffsetTime, FmtSubscriber};

use crate::configuration::Verbosity;

/// Install the global subscriber: compact console output filtered by `verbosity`, or, with
/// `log_dir`, a timestamped file in that directory (returned).
///
/// # Errors
/// When the log file cannot be created, or a subscriber is already installed.
pub fn init_logger(verbosity: Verbosity, log_dir: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    let Some(dir) = log_dir else {
        let format = tracing_subscriber::fmt::format()
            .with_target(false)
            .without_time()
            .compact();
        let subscriber = FmtSubscriber::builder()
            .with_max_level(verbosity.level_filter())
            .event_format(format)
            .with_writer(std::io::stderr)
            .finish();
        set_global_default(subscriber)
            .context("could not set global default tracing subscriber")?;
        return Ok(None);
    };

    let path = dir.join(get_log_file_name()?);
    let file = File::create(&path)
        .with_context(|| format!("cannot create log file '{}'", path.display()))?;
    let local_offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = OffsetTime::new(
        local_offset,
        format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")?,
    );

    let subscriber = FmtSubscriber::builder()
        .with_max_level(verbosity.level_filter())
        .with_ansi(false)
        .with_timer(timer)
        .with_writer(Mutex::new(file))
        .finish();

    set_global_default(subscriber).context(
        "could not set global default tracing subscriber, consider disabling file logs if you already set one",
    )?;
    Ok(Some(path))
}

fn get_log_file_name() -> anyhow::Result<String> {
    let format = parse("[year]-[month]-[day]_[hour]-[minute]-[second]_tournament.log")?;
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    Ok(now.format(&format)?)
}
