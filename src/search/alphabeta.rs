//! Depth-limited alpha-beta search
//!
//! Negamax formulation of minimax with alpha-beta pruning. Each node
//! expands at most `top_k` candidate cells (empty cells near existing
//! stones), ordered by a quick attack + defense score. Leaf positions are
//! scored with the static evaluation, memoized by Zobrist key in a cache
//! that lives for one `search` call only.
//!
//! The board is cloned once per call into a scratch buffer; every node
//! places its move on that buffer and removes it again before returning.
//!
//! # Example
//!
//! ```
//! use gomoku::board::{Board, Pos, Side};
//! use gomoku::search::Searcher;
//!
//! let searcher = Searcher::new(12);
//! let mut board = Board::new();
//! board.apply(Pos::center(), Side::Black).unwrap();
//!
//! let result = searcher.search(&board, Side::White, 2);
//! assert!(result.best_move.is_some());
//! ```

use crate::board::{Board, Pos, Side};
use crate::eval::evaluate;
use crate::rules::has_five_at_pos;

use super::cache::EvalCache;
use super::threat::{candidate_cells, quick_score, CANDIDATE_RADIUS};
use super::ZobristTable;

/// Score of a won position. Wins found earlier in the tree score higher:
/// a five completed with `d` plies of depth left is worth `WIN_SCORE + d`.
pub const WIN_SCORE: i32 = 1_000_000_000;

/// Infinity score for alpha-beta bounds
const INF: i32 = WIN_SCORE + 1_000;

/// Deepest supported search
pub const MAX_DEPTH: i8 = 6;

/// Default evaluation cache size (slots)
const CACHE_SLOTS: usize = 1 << 16;

/// Whether `score` is a proven win or loss.
#[inline]
pub fn is_win_score(score: i32) -> bool {
    score.abs() >= WIN_SCORE
}

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes visited, root included
    pub nodes: u64,
    /// Static evaluations requested at the horizon
    pub leaf_evals: u64,
    /// Leaf evaluations answered by the cache
    pub cache_hits: u64,
    /// Total beta cutoffs (fail-high)
    pub beta_cutoffs: u64,
}

impl SearchStats {
    /// Cache hit rate in percent
    pub fn cache_hit_rate(&self) -> f64 {
        if self.leaf_evals == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.leaf_evals as f64 * 100.0
        }
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found, `None` only when there is no empty cell
    pub best_move: Option<Pos>,
    /// Value of the best move for the side to move
    pub score: i32,
    /// Depth searched
    pub depth: i8,
    /// Total nodes searched
    pub nodes: u64,
    pub stats: SearchStats,
}

/// Per-call search state: the evaluation cache and counters.
struct SearchContext<'a> {
    zobrist: &'a ZobristTable,
    cache: EvalCache,
    stats: SearchStats,
    top_k: usize,
    radius: i32,
    prune: bool,
}

impl SearchContext<'_> {
    /// Candidate moves, best quick score first, ties by position.
    fn ordered_moves(&self, board: &Board, side: Side) -> Vec<Pos> {
        let mut scored: Vec<(Pos, i32)> = candidate_cells(board, self.radius)
            .into_iter()
            .map(|pos| (pos, quick_score(board, pos, side)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(self.top_k);
        scored.into_iter().map(|(pos, _)| pos).collect()
    }

    fn leaf(&mut self, board: &Board, side: Side, hash: u64) -> i32 {
        self.stats.leaf_evals += 1;
        if let Some(score) = self.cache.probe(hash) {
            self.stats.cache_hits += 1;
            return score;
        }
        let score = evaluate(board, side).clamp(-(WIN_SCORE - 1), WIN_SCORE - 1);
        self.cache.store(hash, score);
        score
    }

    /// Negamax value of the position for `side`, who is to move.
    /// `last_move` is the opponent's stone placed just before this node.
    #[allow(clippy::too_many_arguments)]
    fn negamax(
        &mut self,
        board: &mut Board,
        side: Side,
        depth: i8,
        mut alpha: i32,
        beta: i32,
        hash: u64,
        last_move: Pos,
    ) -> i32 {
        self.stats.nodes += 1;

        // Terminal: opponent just won
        if has_five_at_pos(board, last_move, side.opponent().stone()) {
            return -(WIN_SCORE + i32::from(depth));
        }
        if board.is_full() {
            return 0;
        }
        if depth <= 0 {
            return self.leaf(board, side, hash);
        }

        let moves = self.ordered_moves(board, side);
        if moves.is_empty() {
            return self.leaf(board, side, hash);
        }

        let mut best = -INF;
        for mov in moves {
            debug_assert!(board.is_empty(mov), "search generated occupied cell {mov}");
            board.place_stone(mov, side.stone());
            let child_hash = self.zobrist.update_place(hash, mov, side);
            let score = -self.negamax(board, side.opponent(), depth - 1, -beta, -alpha, child_hash, mov);
            board.remove_stone(mov);

            best = best.max(score);
            alpha = alpha.max(score);
            if self.prune && alpha >= beta {
                self.stats.beta_cutoffs += 1;
                break;
            }
        }
        best
    }

    fn root(&mut self, board: &mut Board, side: Side, depth: i8) -> (Option<Pos>, i32) {
        self.stats.nodes += 1;
        let hash = self.zobrist.hash(board, side);
        let moves = self.ordered_moves(board, side);

        let mut best_move = None;
        let mut best_score = -INF;
        let mut alpha = -INF;
        let beta = INF;

        for mov in moves {
            board.place_stone(mov, side.stone());
            let child_hash = self.zobrist.update_place(hash, mov, side);
            let score = -self.negamax(board, side.opponent(), depth - 1, -beta, -alpha, child_hash, mov);
            board.remove_stone(mov);

            if score > best_score {
                best_score = score;
                best_move = Some(mov);
            }
            alpha = alpha.max(score);
        }

        if best_move.is_none() {
            best_score = 0;
        }
        (best_move, best_score)
    }
}

/// Alpha-beta move searcher.
///
/// Holds only immutable tables; all per-search state is created inside
/// `search`, so one searcher can serve any number of games.
pub struct Searcher {
    zobrist: ZobristTable,
    top_k: usize,
    radius: i32,
    cache_slots: usize,
}

impl Searcher {
    /// Create a searcher expanding at most `top_k` moves per node.
    #[must_use]
    pub fn new(top_k: usize) -> Self {
        Self {
            zobrist: ZobristTable::new(),
            top_k: top_k.max(1),
            radius: CANDIDATE_RADIUS,
            cache_slots: CACHE_SLOTS,
        }
    }

    /// Override the candidate radius around existing stones.
    #[must_use]
    pub fn with_radius(mut self, radius: i32) -> Self {
        self.radius = radius.max(1);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Search `depth` plies (clamped to `1..=MAX_DEPTH`) for `side`.
    #[must_use]
    pub fn search(&self, board: &Board, side: Side, depth: i8) -> SearchResult {
        self.run(board, side, depth, true)
    }

    /// Same search with pruning disabled. Visits the full `top_k` tree;
    /// used to verify that pruning never changes the result.
    #[must_use]
    pub fn search_unpruned(&self, board: &Board, side: Side, depth: i8) -> SearchResult {
        self.run(board, side, depth, false)
    }

    fn run(&self, board: &Board, side: Side, depth: i8, prune: bool) -> SearchResult {
        let depth = depth.clamp(1, MAX_DEPTH);
        let mut ctx = SearchContext {
            zobrist: &self.zobrist,
            cache: EvalCache::new(self.cache_slots),
            stats: SearchStats::default(),
            top_k: self.top_k,
            radius: self.radius,
            prune,
        };

        let mut work_board = board.clone();
        let (best_move, score) = ctx.root(&mut work_board, side, depth);
        debug_assert_eq!(&work_board, board, "search must restore its scratch board");

        SearchResult {
            best_move,
            score,
            depth,
            nodes: ctx.stats.nodes,
            stats: ctx.stats,
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(12)
    }
}
