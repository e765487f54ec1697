use std::path::PathBuf;

use clap::Parser;
use line_tournament::logger::init_logger;
use line_tournament::match_log::prepare_log_dir;
use line_tournament::prelude::*;
use tracing::info;

/// Run a round-robin N-in-a-row tournament between the built-in bots.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory holding the board files (*.toml)
    #[arg(long, default_value = "boards")]
    boards: PathBuf,

    /// Comma-separated names of the bots taking part (default: all built-in bots)
    #[arg(long, value_delimiter = ',')]
    bots: Vec<String>,

    /// Directory receiving one log file per match [default: logs]
    #[arg(long)]
    logs: Option<PathBuf>,

    /// One of "debug", "info", "warning", "error" [default: info]
    #[arg(short, long)]
    verbose: Option<Verbosity>,

    /// How many matches may run at the same time
    #[arg(short, long)]
    parallel: Option<usize>,

    /// Also write the process log to a timestamped file in the log directory
    #[arg(long, default_value_t = false)]
    log_file: bool,

    /// Do not remove old files from the log directory
    #[arg(long, default_value_t = false)]
    keep_logs: bool,
}

impl Args {
    /// Command-line values take precedence over the environment.
    fn configuration(&self) -> anyhow::Result<Configuration> {
        let mut config = Configuration::from_env()?;
        if let Some(verbosity) = self.verbose {
            config = config.with_verbosity(verbosity);
        }
        match (&self.logs, config.log_dir()) {
            (Some(dir), _) => config = config.with_log_dir(dir),
            (None, None) => config = config.with_log_dir("logs"),
            (None, Some(_)) => {}
        }
        if let Some(n) = self.parallel {
            config = config.with_parallel_matches(n);
        }
        if self.log_file {
            config = config.with_log(true);
        }
        if self.keep_logs {
            config = config.with_clean_log_dir(false);
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = args.configuration()?;

    // clean before the process log file is opened in the same directory
    let log_dir = config.log_dir().filter(|_| config.log()).map(PathBuf::from);
    if let Some(dir) = &log_dir {
        prepare_log_dir(dir, config.clean_log_dir())?;
        config = config.with_clean_log_dir(false);
    }
    if let Some(path) = init_logger(config.verbosity(), log_dir.as_deref())? {
        println!("Process log: {}", path.display());
    }
    info!(?args);

    let mut bots = BotRegistry::builtin();
    if !args.bots.is_empty() {
        bots = bots.select(&args.bots)?;
    }
    let boards = BoardRegistry::from_dir(&args.boards)?;

    let ranking = Evaluator::new(config).evaluate(&bots, &boards, RoundRobinTournament::new())?;
    println!("{ranking}");
    Ok(())
}
