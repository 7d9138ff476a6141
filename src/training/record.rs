//! Game records, the bounded game log and the statistics derived from it.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::board::{Board, Direction, Pos, Side};
use crate::config::Difficulty;
use crate::error::EngineError;
use crate::opening::OpeningBook;

/// Final result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    BlackWin,
    WhiteWin,
    Draw,
}

impl Outcome {
    pub fn win_for(side: Side) -> Self {
        match side {
            Side::Black => Outcome::BlackWin,
            Side::White => Outcome::WhiteWin,
        }
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::BlackWin => Some(Side::Black),
            Outcome::WhiteWin => Some(Side::White),
            Outcome::Draw => None,
        }
    }
}

/// How the game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Five,
    BoardFull,
    PlyCap,
}

impl EndReason {
    pub fn name(self) -> &'static str {
        match self {
            EndReason::Five => "five",
            EndReason::BoardFull => "board-full",
            EndReason::PlyCap => "ply-cap",
        }
    }
}

/// One finished self-play game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Monotonically increasing game number
    pub id: u64,
    pub black: Difficulty,
    pub white: Difficulty,
    /// Moves in play order, Black first
    pub moves: Vec<Pos>,
    pub outcome: Outcome,
    pub end: EndReason,
    /// Coarse 0-100 interest score
    pub quality: u8,
    pub tags: BTreeSet<String>,
    /// Unix seconds
    pub finished_at: u64,
}

impl GameRecord {
    /// Build a record for a finished game, deriving quality and tags.
    ///
    /// `winning_line` is the orientation of the five when `end` is
    /// [`EndReason::Five`].
    pub fn new(
        id: u64,
        (black, white): (Difficulty, Difficulty),
        moves: Vec<Pos>,
        outcome: Outcome,
        end: EndReason,
        winning_line: Option<Direction>,
        book: &OpeningBook,
    ) -> Self {
        let mut tags = BTreeSet::new();
        let opening = book.identify(&moves).map_or("freestyle", |entry| entry.name);
        tags.insert(format!("opening:{opening}"));
        tags.insert(format!("end:{}", end.name()));
        tags.insert(format!("matchup:{black}-vs-{white}"));
        if let Some(dir) = winning_line {
            tags.insert(format!("winning-line:{}", dir.name()));
        }

        let quality = Self::score_quality(moves.len(), end);
        Self {
            id,
            black,
            white,
            moves,
            outcome,
            end,
            quality,
            tags,
            finished_at: unix_now(),
        }
    }

    /// Decisive, longer games score higher; capped games score lowest.
    fn score_quality(plies: usize, end: EndReason) -> u8 {
        match end {
            EndReason::Five => {
                let length_bonus = u8::try_from(plies.min(50)).unwrap_or(50);
                50 + length_bonus
            }
            EndReason::BoardFull => 40,
            EndReason::PlyCap => 20,
        }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Replay the moves and check that they agree with the stated ending.
    pub fn validate(&self) -> Result<(), EngineError> {
        let bad = |what: String| EngineError::corrupted(format!("game {}: {what}", self.id));

        if self.id == u64::MAX {
            return Err(bad("id leaves no room for a next game".into()));
        }
        if self.quality > 100 {
            return Err(bad(format!("quality {} out of range", self.quality)));
        }

        let mut board = Board::new();
        let mut five_by = None;
        for (ply, &pos) in self.moves.iter().enumerate() {
            if five_by.is_some() {
                return Err(bad(format!("move {ply} played after the game was won")));
            }
            let side = Side::for_ply(ply);
            board
                .apply(pos, side)
                .map_err(|err| bad(format!("move {ply}: {err}")))?;
            if board.has_five(pos, side) {
                five_by = Some(side);
            }
        }

        match (self.end, five_by) {
            (EndReason::Five, Some(side)) if self.outcome == Outcome::win_for(side) => Ok(()),
            (EndReason::Five, _) => Err(bad("outcome does not match the final five".into())),
            (_, Some(_)) => Err(bad(format!("ended by {} but has a five", self.end.name()))),
            (EndReason::BoardFull, None) if !board.is_full() => {
                Err(bad("ended by a full board that is not full".into()))
            }
            (_, None) if self.outcome != Outcome::Draw => {
                Err(bad("decided without a five".into()))
            }
            _ => Ok(()),
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Aggregates over the game log. Always recomputed from records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingStatistics {
    /// Games finished since the log was created
    pub games_played: u64,
    /// Games the rates and average length cover
    pub window: usize,
    pub black_win_rate: f64,
    pub white_win_rate: f64,
    pub draw_rate: f64,
    /// Mean plies per game over the window
    pub average_length: f64,
    /// Distinct tags over all retained games
    pub distinct_patterns: usize,
    /// Finish time of the newest game, Unix seconds
    pub last_trained_at: Option<u64>,
}

impl TrainingStatistics {
    /// Statistics over `records` (oldest first), with rates over the last
    /// `window` games.
    pub fn from_records<'a, I>(records: I, window: usize) -> Self
    where
        I: IntoIterator<Item = &'a GameRecord>,
    {
        let records: Vec<&GameRecord> = records.into_iter().collect();
        if records.is_empty() {
            return Self::default();
        }

        let recent = &records[records.len().saturating_sub(window.max(1))..];
        let n = recent.len() as f64;
        let count = |outcome: Outcome| recent.iter().filter(|r| r.outcome == outcome).count() as f64;

        let tags: HashSet<&str> = records
            .iter()
            .flat_map(|r| r.tags.iter().map(String::as_str))
            .collect();

        Self {
            games_played: records
                .iter()
                .map(|r| r.id.saturating_add(1))
                .max()
                .unwrap_or(0),
            window: recent.len(),
            black_win_rate: count(Outcome::BlackWin) / n,
            white_win_rate: count(Outcome::WhiteWin) / n,
            draw_rate: count(Outcome::Draw) / n,
            average_length: recent.iter().map(|r| r.len() as f64).sum::<f64>() / n,
            distinct_patterns: tags.len(),
            last_trained_at: records.iter().map(|r| r.finished_at).max(),
        }
    }
}

/// Append-only game log keeping the most recent `retention` games.
#[derive(Debug, Clone)]
pub struct GameLog {
    records: VecDeque<GameRecord>,
    retention: usize,
    next_id: u64,
}

impl GameLog {
    pub fn new(retention: usize) -> Self {
        let retention = retention.max(1);
        Self {
            records: VecDeque::with_capacity(retention),
            retention,
            next_id: 0,
        }
    }

    /// Rebuild a log from stored records, keeping the newest `retention`.
    pub fn from_records(mut records: Vec<GameRecord>, retention: usize) -> Self {
        records.sort_by_key(|r| r.id);
        let mut log = Self::new(retention);
        for record in records {
            log.push(record);
        }
        log
    }

    /// Add a game; the oldest is evicted when the log is full.
    pub fn push(&mut self, record: GameRecord) {
        if self.records.len() >= self.retention {
            self.records.pop_front();
        }
        self.next_id = self.next_id.max(record.id.saturating_add(1));
        self.records.push_back(record);
    }

    /// Id for the next game.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameRecord> {
        self.records.iter()
    }

    /// Copy of the records, oldest first.
    pub fn to_vec(&self) -> Vec<GameRecord> {
        self.records.iter().cloned().collect()
    }

    /// Drop every record and restart numbering.
    pub fn clear(&mut self) {
        self.records.clear();
        self.next_id = 0;
    }

    pub fn statistics(&self, window: usize) -> TrainingStatistics {
        TrainingStatistics::from_records(&self.records, window)
    }
}

impl Default for GameLog {
    fn default() -> Self {
        Self::new(200)
    }
}
