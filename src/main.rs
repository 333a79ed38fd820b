use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, subscriber::set_global_default};
use tracing_log::LogTracer;
use tracing_subscriber::{prelude::*, registry::Registry, EnvFilter};

use turtle_mines::{
    turtle::{generate_path, StrategyKind, StrategyRegistry, TrialConfig},
    TrialRunner,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Stop at the wall
    Clip,
    /// Rebound one cell off the wall
    Bounce,
    /// Stop at the wall and turn left
    TurnLeft,
}

impl From<Strategy> for StrategyKind {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Clip => StrategyKind::Clip,
            Strategy::Bounce => StrategyKind::Bounce,
            Strategy::TurnLeft => StrategyKind::TurnLeft,
        }
    }
}

#[derive(Parser)]
#[command(name = "turtle_mines")]
#[command(about = "Walk a turtle across a mined board", long_about = None)]
struct Cli {
    /// Trial configuration file
    file: PathBuf,

    /// What happens when the turtle runs into the edge of the board
    #[arg(long, value_enum, default_value = "clip")]
    strategy: Strategy,

    /// Reject unknown command symbols instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Report every visited position
    #[arg(long, short)]
    verbose: bool,

    /// Append this many random command strings to the trial
    #[arg(long, default_value_t = 0)]
    random_moves: usize,

    /// Length of each random command string
    #[arg(long, default_value_t = 20)]
    random_length: usize,

    /// Seed for the random command strings
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs)?;

    let text = fs::read_to_string(&cli.file)
        .with_context(|| format!("cannot read {}", cli.file.display()))?;
    let mut config: TrialConfig = text
        .parse()
        .with_context(|| format!("{} does not contain a valid trial", cli.file.display()))?;

    if cli.random_moves > 0 {
        let mut rng = fastrand::Rng::with_seed(cli.seed);
        for _ in 0..cli.random_moves {
            config.add_moves(generate_path(&mut rng, cli.random_length));
        }
        info!("{} random command strings added", cli.random_moves);
    }

    let registry = StrategyRegistry::new();
    let strategy = registry.get(cli.strategy.into())?;

    TrialRunner::new(&config, strategy)
        .strict(cli.strict)
        .verbose(cli.verbose)
        .run(|line| println!("{}", line));

    Ok(())
}

fn init_tracing(json: bool) -> Result<()> {
    LogTracer::init()?;

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("OFF,turtle_mines=INFO"))?;
    let subscriber = Registry::default().with(filter_layer);

    if json {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr);
        set_global_default(subscriber.with(fmt_layer))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        set_global_default(subscriber.with(fmt_layer))?;
    }

    Ok(())
}
