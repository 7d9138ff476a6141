//! Self-play training log.
//!
//! The engine plays itself at configurable strengths and the finished games
//! are kept for statistics. Nothing here feeds back into evaluation or
//! search.
//!
//! ## Overview
//!
//! - **GameRecord**: moves, outcome, quality and tags of one game
//! - **GameLog**: bounded log of the most recent games
//! - **TrainingStatistics**: rolling aggregates recomputed from the log
//! - **SelfPlayTrainer**: plays one game at a time and owns the log
//! - **TrainingScheduler**: runs the trainer on a background thread
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use gomoku::config::TrainerConfig;
//! use gomoku::training::{SelfPlayTrainer, TrainingScheduler};
//!
//! let config = TrainerConfig::default();
//! let trainer = Arc::new(SelfPlayTrainer::load_from_path(config.clone(), "training.json"));
//! let scheduler = TrainingScheduler::start(Arc::clone(&trainer), config.interval()).unwrap();
//!
//! // ... later
//! scheduler.shutdown();
//! println!("{:?}", trainer.stats());
//! trainer.save_to_path("training.json").unwrap();
//! ```

pub mod persist;
pub mod record;
pub mod scheduler;
pub mod self_play;

pub use persist::{load_log, TrainingSnapshot, SNAPSHOT_VERSION};
pub use record::{EndReason, GameLog, GameRecord, Outcome, TrainingStatistics};
pub use scheduler::TrainingScheduler;
pub use self_play::{play_game, run_self_play_game, SelfPlayTrainer};
