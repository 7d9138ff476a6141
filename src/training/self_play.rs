//! Self-play games and the trainer that owns the game log.
//!
//! Both sides are played by [`AIEngine`] instances built from difficulty
//! presets. Results only feed the game log and its statistics; engines are
//! never tuned from them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::board::{Board, Side, TOTAL_CELLS};
use crate::config::{Difficulty, EngineConfig, TrainerConfig};
use crate::engine::AIEngine;
use crate::error::EngineError;
use crate::opening::OpeningBook;
use crate::rules::find_five_line_at_pos;

use super::record::{EndReason, GameLog, GameRecord, Outcome, TrainingStatistics};

fn engine_for(difficulty: Difficulty, seed: Option<u64>) -> AIEngine {
    let config = EngineConfig::for_difficulty(difficulty);
    AIEngine::with_config(match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

/// Play one game between two difficulty presets.
///
/// Stops on a five, a full board or after `config.ply_cap` plies. Returns
/// `Ok(None)` if `cancel` was raised between plies; the partial game is
/// dropped.
pub fn play_game(
    id: u64,
    (black, white): (Difficulty, Difficulty),
    config: &TrainerConfig,
    cancel: &AtomicBool,
    book: &OpeningBook,
) -> Result<Option<GameRecord>, EngineError> {
    // Game n plays with seeds base + 2n (Black) and base + 2n + 1 (White).
    let base = config.seed.map(|s| s.wrapping_add(id.wrapping_mul(2)));
    let mut engines = [
        engine_for(black, base),
        engine_for(white, base.map(|s| s.wrapping_add(1))),
    ];

    let mut board = Board::new();
    let mut moves = Vec::new();
    let mut ending = None;

    for ply in 0..config.ply_cap.min(TOTAL_CELLS) {
        if cancel.load(Ordering::Acquire) {
            info!("self-play game {id} cancelled after {ply} plies");
            return Ok(None);
        }

        let side = Side::for_ply(ply);
        let engine = &mut engines[side.index()];
        let Some(pos) = engine.try_decide(&board, side)?.best_move else {
            ending = Some((Outcome::Draw, EndReason::BoardFull, None));
            break;
        };
        board.apply(pos, side)?;
        moves.push(pos);

        if let Some((dir, _)) = find_five_line_at_pos(&board, pos, side.stone()) {
            ending = Some((Outcome::win_for(side), EndReason::Five, Some(dir)));
            break;
        }
        if board.is_full() {
            ending = Some((Outcome::Draw, EndReason::BoardFull, None));
            break;
        }
    }

    let (outcome, end, line) = ending.unwrap_or((Outcome::Draw, EndReason::PlyCap, None));
    let record = GameRecord::new(id, (black, white), moves, outcome, end, line, book);
    debug!(
        "self-play game {id}: {black} vs {white} -> {:?} by {} in {} plies",
        record.outcome,
        record.end.name(),
        record.len()
    );
    Ok(Some(record))
}

/// Play a single game, `a` as Black and `b` as White, with default limits.
pub fn run_self_play_game(a: Difficulty, b: Difficulty) -> Result<GameRecord, EngineError> {
    play_to_end((a, b), &AtomicBool::new(false))
}

fn play_to_end(
    matchup: (Difficulty, Difficulty),
    cancel: &AtomicBool,
) -> Result<GameRecord, EngineError> {
    let config = TrainerConfig::default().with_matchup(matchup.0, matchup.1);
    play_game(0, matchup, &config, cancel, &OpeningBook::default())?
        .ok_or(EngineError::Cancelled)
}

/// Clears the busy flag when a run ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the game log and runs one self-play game at a time.
///
/// Shared between threads behind an `Arc`; every method takes `&self`.
pub struct SelfPlayTrainer {
    config: TrainerConfig,
    book: OpeningBook,
    log: Mutex<GameLog>,
    busy: AtomicBool,
    cancelled: AtomicBool,
}

impl SelfPlayTrainer {
    pub fn new(config: TrainerConfig) -> Self {
        let log = GameLog::new(config.retention);
        Self::with_log(config, log)
    }

    /// Trainer continuing from an existing log.
    pub fn with_log(config: TrainerConfig, log: GameLog) -> Self {
        Self {
            config,
            book: OpeningBook::with_standard_openings(),
            log: Mutex::new(log),
            busy: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    // A panic mid-push cannot leave the log half-updated, so a poisoned
    // lock is still usable.
    pub(crate) fn log(&self) -> MutexGuard<'_, GameLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Play and record one game.
    ///
    /// Returns `None` without playing if another run is in progress, and
    /// `None` if the game was cancelled or aborted.
    pub fn try_run(&self) -> Option<GameRecord> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("self-play run skipped: previous game still running");
            return None;
        }
        let _guard = BusyGuard(&self.busy);

        let id = self.log().next_id();
        let matchup = self.config.matchup_for(id);
        match play_game(id, matchup, &self.config, &self.cancelled, &self.book) {
            Ok(Some(record)) => {
                info!(
                    "self-play game {} finished: {:?} by {} after {} plies",
                    record.id,
                    record.outcome,
                    record.end.name(),
                    record.len()
                );
                self.log().push(record.clone());
                Some(record)
            }
            Ok(None) => None,
            Err(err) => {
                warn!("self-play game {id} aborted ({}): {err}", err.kind());
                None
            }
        }
    }

    /// Play up to `count` games back to back, stopping early on cancel.
    pub fn run_games(&self, count: usize) -> Vec<GameRecord> {
        let mut played = Vec::with_capacity(count);
        for _ in 0..count {
            if self.is_cancelled() {
                break;
            }
            if let Some(record) = self.try_run() {
                played.push(record);
            }
        }
        played
    }

    /// Current statistics over the configured window.
    pub fn stats(&self) -> TrainingStatistics {
        self.log().statistics(self.config.stats_window)
    }

    /// Retained games, oldest first.
    pub fn records(&self) -> Vec<GameRecord> {
        self.log().to_vec()
    }

    /// Forget every recorded game.
    pub fn reset(&self) {
        self.log().clear();
        info!("training log reset");
    }

    /// Abort the in-flight game at its next ply and refuse new ones until
    /// [`SelfPlayTrainer::resume`].
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn resume(&self) {
        self.cancelled.store(false, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for SelfPlayTrainer {
    fn default() -> Self {
        Self::new(TrainerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> TrainerConfig {
        TrainerConfig::default()
            .with_matchup(Difficulty::Easy, Difficulty::Medium)
            .with_ply_cap(60)
            .with_seed(11)
    }

    #[test]
    fn test_play_game_terminates_within_cap() {
        let config = quick_config();
        let never = AtomicBool::new(false);
        let matchup = (Difficulty::Easy, Difficulty::Medium);
        let record = play_game(0, matchup, &config, &never, &OpeningBook::default())
            .unwrap()
            .unwrap();
        assert!(record.len() <= 60);
        assert!(record.validate().is_ok(), "{:?}", record.validate());
        assert_eq!(record.black, Difficulty::Easy);
        assert_eq!(record.moves[0], crate::board::Pos::center());
    }

    #[test]
    fn test_ply_cap_ends_in_draw() {
        let config = quick_config().with_ply_cap(4);
        let never = AtomicBool::new(false);
        let matchup = (Difficulty::Easy, Difficulty::Easy);
        let record = play_game(5, matchup, &config, &never, &OpeningBook::default())
            .unwrap()
            .unwrap();
        assert_eq!(record.len(), 4);
        assert_eq!(record.end, EndReason::PlyCap);
        assert_eq!(record.outcome, Outcome::Draw);
        assert_eq!(record.id, 5);
        assert!(record.tags.contains("end:ply-cap"));
    }

    #[test]
    fn test_cancelled_game_is_dropped() {
        let cancel = AtomicBool::new(true);
        let matchup = (Difficulty::Easy, Difficulty::Easy);
        let result = play_game(0, matchup, &quick_config(), &cancel, &OpeningBook::default());
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_seeded_games_repeat() {
        let config = quick_config();
        let never = AtomicBool::new(false);
        let book = OpeningBook::default();
        let matchup = (Difficulty::Easy, Difficulty::Easy);
        let a = play_game(2, matchup, &config, &never, &book).unwrap().unwrap();
        let b = play_game(2, matchup, &config, &never, &book).unwrap().unwrap();
        assert_eq!(a.moves, b.moves);
        assert_eq!(a.outcome, b.outcome);
    }

    #[test]
    fn test_trainer_records_games() {
        let trainer = SelfPlayTrainer::new(quick_config());
        let first = trainer.try_run().expect("first run plays");
        assert_eq!(first.id, 0);
        assert_eq!((first.black, first.white), (Difficulty::Easy, Difficulty::Medium));

        let second = trainer.try_run().expect("second run plays");
        assert_eq!(second.id, 1);
        assert_eq!((second.black, second.white), (Difficulty::Medium, Difficulty::Easy));

        let stats = trainer.stats();
        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.window, 2);
        assert_eq!(trainer.records().len(), 2);
        assert!(!trainer.is_busy());
    }

    #[test]
    fn test_busy_trainer_skips_run() {
        let trainer = SelfPlayTrainer::new(quick_config());
        trainer.busy.store(true, Ordering::Release);
        assert!(trainer.try_run().is_none());
        assert!(trainer.records().is_empty());
        assert!(trainer.is_busy(), "skipped run must not clear the flag");
    }

    #[test]
    fn test_cancel_and_resume() {
        let trainer = SelfPlayTrainer::new(quick_config());
        trainer.cancel();
        assert!(trainer.try_run().is_none());
        assert!(trainer.run_games(3).is_empty());
        assert!(trainer.records().is_empty());

        trainer.resume();
        assert_eq!(trainer.run_games(2).len(), 2);
    }

    #[test]
    fn test_reset_clears_log() {
        let trainer = SelfPlayTrainer::new(quick_config().with_ply_cap(6));
        trainer.run_games(2);
        assert_eq!(trainer.stats().games_played, 2);
        trainer.reset();
        assert_eq!(trainer.stats(), TrainingStatistics::default());
        assert_eq!(trainer.try_run().map(|r| r.id), Some(0));
    }

    #[test]
    fn test_run_self_play_game() {
        let record = run_self_play_game(Difficulty::Easy, Difficulty::Easy).unwrap();
        assert!(record.len() <= TrainerConfig::default().ply_cap);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_cancelled_single_game_reports_cancel() {
        let cancel = AtomicBool::new(true);
        let err = play_to_end((Difficulty::Easy, Difficulty::Easy), &cancel).unwrap_err();
        assert!(matches!(err, EngineError::Cancelled), "{err}");
        assert_eq!(err.kind(), "cancelled");
    }
}
