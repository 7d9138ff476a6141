//! Command-line front end for the move engine and the self-play trainer.

use std::cmp::max;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

use gomoku::{
    AIEngine, Board, Difficulty, EngineConfig, SelfPlayTrainer, Side, TrainerConfig,
    TrainingScheduler,
};

/// Five-in-a-row move engine.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[clap(flatten)]
    global_opts: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Args)]
struct GlobalOpts {
    /// Enable debug logging, including every engine decision.
    #[arg(global = true, long, default_value_t = false)]
    debug: bool,

    /// Set the log level.
    #[arg(global = true, long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decide a move for a board read from a file or stdin.
    Decide(DecideArgs),
    /// Play self-play games now and optionally store them.
    SelfPlay(SelfPlayArgs),
    /// Run the background self-play scheduler for a while.
    Train(TrainArgs),
    /// Print statistics of a stored training log.
    Stats(StatsArgs),
}

#[derive(Args, Debug)]
struct DecideArgs {
    /// Board file: 15 lines of `.`, `X`, `O`. Reads stdin when omitted.
    board: Option<PathBuf>,

    /// Side to move; inferred from stone counts when omitted.
    #[arg(long)]
    side: Option<Side>,

    #[arg(long, default_value_t = Difficulty::Hard)]
    difficulty: Difficulty,

    /// Alpha-beta depth override (1-6).
    #[arg(long)]
    depth: Option<i8>,

    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct SelfPlayArgs {
    /// Number of games.
    #[arg(short = 'n', long, default_value_t = 1)]
    games: usize,

    #[arg(long, default_value_t = Difficulty::Medium)]
    black: Difficulty,

    #[arg(long, default_value_t = Difficulty::Hard)]
    white: Difficulty,

    #[arg(long)]
    ply_cap: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// JSON training log to extend.
    #[arg(long)]
    store: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Trainer configuration as JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON training log to load and save.
    #[arg(long)]
    store: PathBuf,

    /// How long to run, in seconds.
    #[arg(long, default_value_t = 60)]
    duration: u64,

    /// Interval between games in milliseconds, overriding the config.
    #[arg(long)]
    interval_ms: Option<u64>,
}

#[derive(Args, Debug)]
struct StatsArgs {
    store: PathBuf,
}

fn init_logging(opts: GlobalOpts) -> Result<()> {
    let level = if opts.debug {
        max(LevelFilter::Debug, opts.log_level)
    } else {
        opts.log_level
    };

    let mut config_builder = simplelog::ConfigBuilder::new();
    config_builder.set_time_level(LevelFilter::Off);
    config_builder.set_target_level(LevelFilter::Off);
    if opts.debug {
        config_builder.set_thread_level(LevelFilter::Error);
    } else {
        config_builder.set_thread_level(LevelFilter::Off);
    }

    TermLogger::init(
        level,
        config_builder.build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;
    Ok(())
}

fn read_board(path: Option<&Path>) -> Result<Board> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading board from {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("reading board from stdin")?;
            text
        }
    };
    Ok(Board::parse(&text)?)
}

fn decide(args: DecideArgs) -> Result<()> {
    let board = read_board(args.board.as_deref())?;
    let side = args.side.unwrap_or_else(|| board.side_to_move());

    let mut config = EngineConfig::for_difficulty(args.difficulty);
    if let Some(depth) = args.depth {
        config = config.with_depth(depth);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let result = AIEngine::with_config(config).try_decide(&board, side)?;
    match result.best_move {
        Some(pos) => {
            println!("{pos} ({}, {})", pos.row, pos.col);
            println!(
                "{}: {} [score {}, {} nodes, {}ms]",
                result.search_type, result.rationale, result.score, result.nodes, result.time_ms
            );
        }
        None => println!("no move: {}", result.rationale),
    }
    Ok(())
}

fn load_trainer(config: TrainerConfig, store: Option<&Path>) -> SelfPlayTrainer {
    match store {
        Some(path) => SelfPlayTrainer::load_from_path(config, path),
        None => SelfPlayTrainer::new(config),
    }
}

fn self_play(args: SelfPlayArgs) -> Result<()> {
    let mut config = TrainerConfig::default()
        .with_matchup(args.black, args.white)
        .with_alternate_colors(false);
    if let Some(cap) = args.ply_cap {
        config = config.with_ply_cap(cap);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let trainer = load_trainer(config, args.store.as_deref());
    for record in trainer.run_games(args.games) {
        println!(
            "game {}: {} vs {} -> {:?} by {} in {} plies (quality {})",
            record.id,
            record.black,
            record.white,
            record.outcome,
            record.end.name(),
            record.len(),
            record.quality
        );
    }
    println!("{}", serde_json::to_string_pretty(&trainer.stats())?);

    if let Some(path) = &args.store {
        trainer.save_to_path(path)?;
    }
    Ok(())
}

fn train(args: TrainArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading trainer config {}", path.display()))?;
            serde_json::from_str::<TrainerConfig>(&text)
                .with_context(|| format!("parsing trainer config {}", path.display()))?
        }
        None => TrainerConfig::default(),
    };
    if let Some(ms) = args.interval_ms {
        config = config.with_interval(Duration::from_millis(ms));
    }

    let interval = config.interval();
    let trainer = Arc::new(load_trainer(config, Some(&args.store)));
    let scheduler = TrainingScheduler::start(Arc::clone(&trainer), interval)
        .context("starting self-play scheduler")?;

    std::thread::sleep(Duration::from_secs(args.duration));
    scheduler.shutdown();

    trainer.save_to_path(&args.store)?;
    println!("{}", serde_json::to_string_pretty(&trainer.stats())?);
    Ok(())
}

fn stats(args: StatsArgs) -> Result<()> {
    let trainer = SelfPlayTrainer::load_from_path(TrainerConfig::default(), &args.store);
    println!("{}", serde_json::to_string_pretty(&trainer.stats())?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.global_opts)?;
    log::debug!("Parsed arguments: {args:?}");

    match args.command {
        Commands::Decide(args) => decide(args),
        Commands::SelfPlay(args) => self_play(args),
        Commands::Train(args) => train(args),
        Commands::Stats(args) => stats(args),
    }
}
