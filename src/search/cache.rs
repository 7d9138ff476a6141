//! Evaluation cache for a single search call
//!
//! Memoizes static evaluations by Zobrist key. A `Searcher` allocates a
//! fresh cache for every call, so keys never alias positions from another
//! game or an earlier move.
//!
//! # Example
//!
//! ```
//! use gomoku::search::EvalCache;
//!
//! let mut cache = EvalCache::new(1024);
//! cache.store(0x1234_5678_9ABC_DEF0, 42);
//! assert_eq!(cache.probe(0x1234_5678_9ABC_DEF0), Some(42));
//! assert_eq!(cache.probe(0x0FED_CBA9_8765_4321), None);
//! ```

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    hash: u64,
    score: i32,
}

/// Direct-mapped table: each hash maps to exactly one slot, newer entries
/// replace older ones.
pub struct EvalCache {
    entries: Vec<Option<CacheEntry>>,
    size: usize,
    hits: u64,
    misses: u64,
}

impl EvalCache {
    /// Create a cache with `slots` entries (at least 1024).
    #[must_use]
    pub fn new(slots: usize) -> Self {
        let size = slots.max(1024);
        Self {
            entries: vec![None; size],
            size,
            hits: 0,
            misses: 0,
        }
    }

    #[inline]
    fn slot(&self, hash: u64) -> usize {
        (hash % self.size as u64) as usize
    }

    /// Cached evaluation for `hash`, if present.
    pub fn probe(&mut self, hash: u64) -> Option<i32> {
        match self.entries[self.slot(hash)] {
            Some(entry) if entry.hash == hash => {
                self.hits += 1;
                Some(entry.score)
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn store(&mut self, hash: u64, score: i32) {
        let idx = self.slot(hash);
        self.entries[idx] = Some(CacheEntry { hash, score });
    }

    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
