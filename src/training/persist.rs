//! Versioned JSON snapshots of the game log.
//!
//! A snapshot stores the records and, for readers' convenience, the
//! statistics at save time. Loading ignores those statistics and recomputes
//! them from the records. Anything unreadable resets the log to empty.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::TrainerConfig;
use crate::error::EngineError;

use super::record::{GameLog, GameRecord};
use super::self_play::SelfPlayTrainer;

/// Current snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSnapshot {
    pub version: u32,
    pub records: Vec<GameRecord>,
    /// Informational only; any shape is accepted on load
    #[serde(default)]
    pub stats: Option<serde_json::Value>,
}

impl TrainingSnapshot {
    pub fn capture(log: &GameLog, stats_window: usize) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            records: log.to_vec(),
            stats: serde_json::to_value(log.statistics(stats_window)).ok(),
        }
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), EngineError> {
        serde_json::to_writer_pretty(writer, self).map_err(std::io::Error::from)?;
        Ok(())
    }

    /// Parse and validate a snapshot.
    pub fn read_from<R: Read>(reader: R) -> Result<Self, EngineError> {
        let snapshot: Self = serde_json::from_reader(reader)
            .map_err(|e| EngineError::corrupted(format!("unreadable snapshot: {e}")))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(EngineError::corrupted(format!(
                "snapshot version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            )));
        }
        for record in &snapshot.records {
            record.validate()?;
        }
        Ok(snapshot)
    }

    pub fn into_log(self, retention: usize) -> GameLog {
        GameLog::from_records(self.records, retention)
    }
}

/// Load a log, falling back to an empty one on any corruption.
pub fn load_log<R: Read>(reader: R, retention: usize) -> GameLog {
    match TrainingSnapshot::read_from(reader) {
        Ok(snapshot) => snapshot.into_log(retention),
        Err(err) => {
            warn!("discarding training data ({}): {err}", err.kind());
            GameLog::new(retention)
        }
    }
}

impl SelfPlayTrainer {
    pub fn snapshot(&self) -> TrainingSnapshot {
        TrainingSnapshot::capture(&self.log(), self.config().stats_window)
    }

    pub fn save<W: Write>(&self, writer: W) -> Result<(), EngineError> {
        self.snapshot().write_to(writer)
    }

    /// Trainer restored from `reader`; corrupted data gives an empty log.
    pub fn load<R: Read>(config: TrainerConfig, reader: R) -> Self {
        let log = load_log(reader, config.retention);
        Self::with_log(config, log)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        info!("saved {} games to {}", self.log().len(), path.display());
        Ok(())
    }

    /// Trainer restored from `path`. A missing file starts a fresh log;
    /// an unreadable one is discarded with a warning.
    pub fn load_from_path(config: TrainerConfig, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => Self::load(config, BufReader::new(file)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("no training data at {}, starting fresh", path.display());
                Self::new(config)
            }
            Err(err) => {
                warn!("cannot open training data at {}: {err}", path.display());
                Self::new(config)
            }
        }
    }
}
