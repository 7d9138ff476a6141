//! Engine and trainer configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::search::{CANDIDATE_RADIUS, MAX_DEPTH};

/// Playing strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Attacks on any open three, short book
    Easy,
    /// Attacks on strong threats, full book
    Medium,
    /// Adds alpha-beta search
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(EngineError::invalid_board(format!(
                "unknown difficulty '{other}'"
            ))),
        }
    }
}

/// Decision procedure parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub difficulty: Difficulty,

    /// Alpha-beta depth in plies, used at Hard only (1..=6).
    pub search_depth: i8,

    /// Moves expanded per search node, best quick score first.
    pub top_k: usize,

    /// Candidate cells lie within this distance of a stone.
    pub candidate_radius: i32,

    /// Minimum own cell score for the attack step.
    pub attack_threshold: i32,

    /// The opening book is consulted while fewer than this many stones are down.
    pub opening_ply_limit: usize,

    /// Seed for tie-breaking; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::Medium)
    }
}

impl EngineConfig {
    /// Preset for a difficulty level.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let base = Self {
            difficulty,
            search_depth: 4,
            top_k: 12,
            candidate_radius: CANDIDATE_RADIUS,
            attack_threshold: 20_000,
            opening_ply_limit: 10,
            seed: None,
        };
        match difficulty {
            Difficulty::Easy => Self {
                attack_threshold: 10_000,
                opening_ply_limit: 4,
                ..base
            },
            Difficulty::Medium => base,
            Difficulty::Hard => Self {
                attack_threshold: 100_000,
                ..base
            },
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Search depth, clamped to the supported range.
    pub fn with_depth(mut self, depth: i8) -> Self {
        self.search_depth = depth.clamp(1, MAX_DEPTH);
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn with_attack_threshold(mut self, threshold: i32) -> Self {
        self.attack_threshold = threshold;
        self
    }

    pub fn with_opening_ply_limit(mut self, plies: usize) -> Self {
        self.opening_ply_limit = plies;
        self
    }

    #[inline]
    pub fn uses_search(&self) -> bool {
        self.difficulty == Difficulty::Hard
    }

    /// Depth actually used by the searcher.
    #[inline]
    pub fn effective_depth(&self) -> i8 {
        self.search_depth.clamp(1, MAX_DEPTH)
    }
}

/// Self-play trainer parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Difficulty playing Black
    pub black: Difficulty,

    /// Difficulty playing White
    pub white: Difficulty,

    /// Swap colors on every other game.
    pub alternate_colors: bool,

    /// Time between scheduled games, in milliseconds.
    pub interval_ms: u64,

    /// Hard cap on plies per game.
    pub ply_cap: usize,

    /// Most recent games kept in the log.
    pub retention: usize,

    /// Games the rolling statistics are computed over.
    pub stats_window: usize,

    /// Base seed; game `n` plays with `seed + n`.
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            black: Difficulty::Medium,
            white: Difficulty::Hard,
            alternate_colors: true,
            interval_ms: 60_000,
            ply_cap: 120,
            retention: 200,
            stats_window: 50,
            seed: None,
        }
    }
}

impl TrainerConfig {
    pub fn with_matchup(mut self, black: Difficulty, white: Difficulty) -> Self {
        self.black = black;
        self.white = white;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_ply_cap(mut self, plies: usize) -> Self {
        self.ply_cap = plies.max(1);
        self
    }

    pub fn with_retention(mut self, games: usize) -> Self {
        self.retention = games.max(1);
        self
    }

    pub fn with_stats_window(mut self, games: usize) -> Self {
        self.stats_window = games.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_alternate_colors(mut self, alternate: bool) -> Self {
        self.alternate_colors = alternate;
        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// (black, white) difficulties for game number `game_id`.
    pub fn matchup_for(&self, game_id: u64) -> (Difficulty, Difficulty) {
        if self.alternate_colors && game_id % 2 == 1 {
            (self.white, self.black)
        } else {
            (self.black, self.white)
        }
    }
}
