//! Top-level move decision
//!
//! The engine runs a fixed priority list; the first step that yields a move
//! wins:
//!
//! 1. **Center**: empty board
//! 2. **Immediate win**: a cell completing five for the side to move
//! 3. **Block five**: a cell completing five for the opponent
//! 4. **Block open three**: a cell where the opponent would make an open four
//! 5. **Attack**: best own cell if its score clears the threshold
//! 6. **Opening book**: early plies only
//! 7. **Alpha-beta** (Hard)
//! 8. **Greedy**: best own cell from step 5, random tie-break
//!
//! Difficulty scales the attack threshold, the book length and whether
//! step 7 runs; the order of the steps never changes.
//!
//! # Example
//!
//! ```
//! use gomoku::{AIEngine, Board, Difficulty, Pos, Side};
//!
//! let mut engine = AIEngine::for_difficulty(Difficulty::Medium);
//! let mut board = Board::new();
//! board.apply(Pos::new(7, 7), Side::Black).unwrap();
//!
//! let result = engine.get_move_with_stats(&board, Side::White);
//! println!("{:?} via {:?}: {}", result.best_move, result.search_type, result.rationale);
//! ```

use std::fmt;
use std::time::Instant;

use log::{debug, error};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::board::{Board, Pos, Side};
use crate::config::{Difficulty, EngineConfig};
use crate::error::EngineError;
use crate::opening::OpeningBook;
use crate::search::{
    candidate_cells, evaluate_cell, quick_score, scan_threats, SearchResult, Searcher,
    WIN_SCORE,
};

/// Which step of the decision procedure produced the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Empty board, center stone
    Center,
    /// Completes five
    ImmediateWin,
    /// Stops an opponent five
    BlockFive,
    /// Stops an opponent open three from becoming an open four
    BlockOpenThree,
    /// Strong own threat above the attack threshold
    Attack,
    /// Opening book line
    OpeningBook,
    /// Alpha-beta search result
    AlphaBeta,
    /// Best single-cell heuristic score
    Greedy,
    /// Board is full
    NoMove,
}

impl SearchType {
    pub fn name(self) -> &'static str {
        match self {
            SearchType::Center => "center",
            SearchType::ImmediateWin => "immediate-win",
            SearchType::BlockFive => "block-five",
            SearchType::BlockOpenThree => "block-open-three",
            SearchType::Attack => "attack",
            SearchType::OpeningBook => "opening-book",
            SearchType::AlphaBeta => "alpha-beta",
            SearchType::Greedy => "greedy",
            SearchType::NoMove => "no-move",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a move decision with diagnostics.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// Chosen move; `None` only on a full board
    pub best_move: Option<Pos>,
    /// Score reported by the deciding step
    pub score: i32,
    pub search_type: SearchType,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Nodes visited by alpha-beta, 1 for the direct steps
    pub nodes: u64,
    /// Short explanation for display
    pub rationale: String,
}

impl MoveResult {
    #[inline]
    fn direct(pos: Pos, score: i32, search_type: SearchType, rationale: String) -> Self {
        Self {
            best_move: Some(pos),
            score,
            search_type,
            time_ms: 0,
            nodes: 1,
            rationale,
        }
    }

    fn center(pos: Pos) -> Self {
        Self::direct(pos, 0, SearchType::Center, format!("empty board, take the center {pos}"))
    }

    fn immediate_win(pos: Pos) -> Self {
        Self::direct(pos, WIN_SCORE, SearchType::ImmediateWin, format!("{pos} completes five"))
    }

    fn block_five(pos: Pos, opponent: Side) -> Self {
        Self::direct(
            pos,
            0,
            SearchType::BlockFive,
            format!("{pos} stops {opponent} from completing five"),
        )
    }

    fn block_open_three(pos: Pos, score: i32, opponent: Side) -> Self {
        Self::direct(
            pos,
            score,
            SearchType::BlockOpenThree,
            format!("{pos} blocks an open three of {opponent}"),
        )
    }

    fn attack(pos: Pos, score: i32, pattern: &str) -> Self {
        Self::direct(
            pos,
            score,
            SearchType::Attack,
            format!("{pos} makes {pattern} (cell score {score})"),
        )
    }

    fn opening(pos: Pos, line: &str) -> Self {
        Self::direct(pos, 0, SearchType::OpeningBook, format!("{pos} follows the {line} opening"))
    }

    fn from_alphabeta(result: &SearchResult, pos: Pos) -> Self {
        Self {
            best_move: Some(pos),
            score: result.score,
            search_type: SearchType::AlphaBeta,
            time_ms: 0,
            nodes: result.nodes,
            rationale: format!(
                "{pos} is best at depth {} (score {}, {} nodes)",
                result.depth, result.score, result.nodes
            ),
        }
    }

    fn greedy(pos: Pos, score: i32, ties: usize) -> Self {
        Self::direct(
            pos,
            score,
            SearchType::Greedy,
            format!("{pos} has the best cell score {score} ({ties} tied)"),
        )
    }

    fn no_move() -> Self {
        Self {
            best_move: None,
            score: 0,
            search_type: SearchType::NoMove,
            time_ms: 0,
            nodes: 0,
            rationale: "board is full".to_string(),
        }
    }

    fn with_elapsed(mut self, start: Instant) -> Self {
        self.time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        self
    }
}

/// Move decision engine.
///
/// Holds its configuration, a searcher, the opening book and the RNG used
/// for tie-breaks. Each engine is independent; nothing is shared between
/// instances.
///
/// ```
/// use gomoku::{AIEngine, Board, Difficulty, Pos, Side};
///
/// let mut engine = AIEngine::for_difficulty(Difficulty::Easy);
/// let mut board = Board::new();
/// board.apply(Pos::new(9, 9), Side::Black).unwrap();
/// if let Some(pos) = engine.get_move(&board, Side::White) {
///     println!("Play at {pos}");
/// }
/// ```
pub struct AIEngine {
    config: EngineConfig,
    searcher: Searcher,
    book: OpeningBook,
    rng: StdRng,
}

impl AIEngine {
    /// Engine with the Medium preset.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::with_config(EngineConfig::for_difficulty(difficulty))
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            searcher: Searcher::new(config.top_k).with_radius(config.candidate_radius),
            book: OpeningBook::with_standard_openings(),
            config,
            rng,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    /// Best move for `side`, or `None` on a full board.
    ///
    /// Internal faults are logged and also yield `None`; use
    /// [`AIEngine::try_decide`] to see them.
    #[must_use]
    pub fn get_move(&mut self, board: &Board, side: Side) -> Option<Pos> {
        self.get_move_with_stats(board, side).best_move
    }

    /// Best move with diagnostics.
    #[must_use]
    pub fn get_move_with_stats(&mut self, board: &Board, side: Side) -> MoveResult {
        match self.try_decide(board, side) {
            Ok(result) => result,
            Err(err) => {
                error!("decision aborted ({}): {}", err.kind(), err);
                MoveResult::no_move()
            }
        }
    }

    /// Run the decision procedure.
    ///
    /// A full board is `Ok` with no move. An `Err` means a step proposed
    /// an illegal cell; the call is aborted instead of returning it.
    pub fn try_decide(&mut self, board: &Board, side: Side) -> Result<MoveResult, EngineError> {
        let start = Instant::now();
        let result = self.decide(board, side).with_elapsed(start);

        if let Some(pos) = result.best_move {
            debug_assert!(board.is_empty(pos), "{} proposed occupied {pos}", result.search_type);
            board.check_legal(pos)?;
        }

        debug!(
            "decide {} {}: {} via {} score={} nodes={} {}ms",
            self.config.difficulty,
            side,
            result
                .best_move
                .map_or_else(|| "-".to_string(), |p| p.to_string()),
            result.search_type,
            result.score,
            result.nodes,
            result.time_ms
        );
        Ok(result)
    }

    fn decide(&mut self, board: &Board, side: Side) -> MoveResult {
        if board.is_full() {
            return MoveResult::no_move();
        }
        if board.is_board_empty() {
            return MoveResult::center(Pos::center());
        }

        let opponent = side.opponent();
        let report = scan_threats(board, side);

        if let Some(pos) = report.winning_cells().next() {
            return MoveResult::immediate_win(pos);
        }
        if let Some(pos) = report.forced_blocks().next() {
            return MoveResult::block_five(pos, opponent);
        }

        let candidates = {
            let near = candidate_cells(board, self.config.candidate_radius);
            if near.is_empty() {
                board.empty_cells().collect()
            } else {
                near
            }
        };

        // Either end of an open three is acceptable; prefer the one that
        // also helps the side to move.
        let block = report
            .open_three_blocks()
            .map(|pos| (pos, quick_score(board, pos, side)))
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)));
        if let Some((pos, score)) = block {
            return MoveResult::block_open_three(pos, score, opponent);
        }

        let mut scored: Vec<(Pos, i32)> = candidates
            .iter()
            .map(|&pos| (pos, evaluate_cell(board, pos, side).score))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        if let Some(&(pos, score)) = scored.first() {
            if score >= self.config.attack_threshold {
                let pattern = evaluate_cell(board, pos, side).pattern;
                return MoveResult::attack(pos, score, pattern.name());
            }
        }

        let plies = board.stone_count() as usize;
        if plies < self.config.opening_ply_limit {
            if let Some((entry, pos)) = self.book.lookup_entry(board, plies) {
                return MoveResult::opening(pos, entry.name);
            }
        }

        if self.config.uses_search() {
            let result = self.searcher.search(board, side, self.config.effective_depth());
            if let Some(pos) = result.best_move {
                return MoveResult::from_alphabeta(&result, pos);
            }
        }

        self.greedy(&scored)
    }

    /// Random pick among the cells tied for the best attack score.
    ///
    /// `scored` is sorted best first.
    fn greedy(&mut self, scored: &[(Pos, i32)]) -> MoveResult {
        let Some(&(_, best)) = scored.first() else {
            return MoveResult::no_move();
        };
        let ties = scored.iter().take_while(|(_, s)| *s == best).count();

        match scored[..ties].choose(&mut self.rng) {
            Some(&(pos, score)) => MoveResult::greedy(pos, score, ties),
            None => MoveResult::no_move(),
        }
    }
}

impl Default for AIEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Stone, BOARD_SIZE};

    fn setup_board(setup: &[(u8, u8, Stone)]) -> Board {
        let mut board = Board::new();
        for &(r, c, stone) in setup {
            board.place_stone(Pos::new(r, c), stone);
        }
        board
    }

    fn seeded(difficulty: Difficulty) -> AIEngine {
        AIEngine::with_config(EngineConfig::for_difficulty(difficulty).with_seed(42))
    }

    #[test]
    fn test_engine_empty_board() {
        for d in Difficulty::ALL {
            let mut engine = seeded(d);
            let result = engine.get_move_with_stats(&Board::new(), Side::Black);
            assert_eq!(result.best_move, Some(Pos::new(7, 7)));
            assert_eq!(result.search_type, SearchType::Center);
        }
    }

    #[test]
    fn test_engine_finds_immediate_win() {
        let board = setup_board(&[
            (9, 0, Stone::Black),
            (9, 1, Stone::Black),
            (9, 2, Stone::Black),
            (9, 3, Stone::Black),
            (3, 3, Stone::White),
            (3, 4, Stone::White),
            (3, 5, Stone::White),
            (3, 6, Stone::White),
        ]);

        for d in Difficulty::ALL {
            let mut engine = seeded(d);
            let result = engine.get_move_with_stats(&board, Side::Black);
            assert_eq!(result.best_move, Some(Pos::new(9, 4)), "{d}");
            assert_eq!(result.search_type, SearchType::ImmediateWin);
        }
    }

    #[test]
    fn test_engine_blocks_opponent_win() {
        let board = setup_board(&[
            (9, 0, Stone::White),
            (9, 1, Stone::White),
            (9, 2, Stone::White),
            (9, 3, Stone::White),
            (10, 5, Stone::Black),
        ]);

        for d in Difficulty::ALL {
            let mut engine = seeded(d);
            let result = engine.get_move_with_stats(&board, Side::Black);
            assert_eq!(result.best_move, Some(Pos::new(9, 4)), "{d}");
            assert_eq!(result.search_type, SearchType::BlockFive);
        }
    }

    #[test]
    fn test_engine_blocks_open_three() {
        let board = setup_board(&[
            (7, 6, Stone::White),
            (7, 7, Stone::White),
            (7, 8, Stone::White),
            (2, 2, Stone::Black),
            (12, 12, Stone::Black),
        ]);

        let mut engine = seeded(Difficulty::Medium);
        let result = engine.get_move_with_stats(&board, Side::Black);
        assert_eq!(result.search_type, SearchType::BlockOpenThree);
        let m = result.best_move.unwrap();
        assert!(
            m == Pos::new(7, 5) || m == Pos::new(7, 9),
            "expected an open end, got {m}"
        );
    }

    #[test]
    fn test_every_difficulty_blocks_open_three() {
        let board = setup_board(&[
            (7, 6, Stone::White),
            (7, 7, Stone::White),
            (7, 8, Stone::White),
            (2, 2, Stone::Black),
        ]);
        for d in Difficulty::ALL {
            for seed in 0..20 {
                let config = EngineConfig::for_difficulty(d).with_seed(seed);
                let result = AIEngine::with_config(config).get_move_with_stats(&board, Side::Black);
                assert_eq!(result.search_type, SearchType::BlockOpenThree, "{d} seed {seed}");
                let m = result.best_move.unwrap();
                assert!(
                    m == Pos::new(7, 5) || m == Pos::new(7, 9),
                    "{d} seed {seed}: expected an open end, got {m}"
                );
            }
        }
    }

    #[test]
    fn test_easy_attacks_with_open_three() {
        let board = setup_board(&[
            (7, 6, Stone::Black),
            (7, 7, Stone::Black),
            (2, 2, Stone::White),
            (12, 12, Stone::White),
            (2, 12, Stone::White),
        ]);
        let result = seeded(Difficulty::Easy).get_move_with_stats(&board, Side::Black);
        assert_eq!(result.search_type, SearchType::Attack);
        assert!(result.score >= 10_000, "score {}", result.score);

        let medium = seeded(Difficulty::Medium).get_move_with_stats(&board, Side::Black);
        assert_ne!(medium.search_type, SearchType::Attack, "below the Medium threshold");
    }

    #[test]
    fn test_engine_attacks_with_open_three() {
        let board = setup_board(&[
            (7, 6, Stone::Black),
            (7, 7, Stone::Black),
            (7, 8, Stone::Black),
            (2, 2, Stone::White),
            (12, 12, Stone::White),
            (2, 12, Stone::White),
        ]);
        let mut engine = seeded(Difficulty::Medium);
        let result = engine.get_move_with_stats(&board, Side::Black);
        assert_eq!(result.search_type, SearchType::Attack);
        assert!(result.score >= 20_000);
        let m = result.best_move.unwrap();
        assert!(m == Pos::new(7, 5) || m == Pos::new(7, 9), "got {m}");
    }

    #[test]
    fn test_engine_uses_opening_book() {
        let board = setup_board(&[(7, 7, Stone::Black)]);
        let mut engine = seeded(Difficulty::Medium);
        let result = engine.get_move_with_stats(&board, Side::White);
        assert_eq!(result.search_type, SearchType::OpeningBook);
        assert_eq!(result.best_move, Some(Pos::new(6, 7)));
        assert!(result.rationale.contains("direct-flower"), "{}", result.rationale);
    }

    #[test]
    fn test_hard_runs_alphabeta() {
        let config = EngineConfig::for_difficulty(Difficulty::Hard)
            .with_opening_ply_limit(0)
            .with_depth(2)
            .with_seed(1);
        let mut engine = AIEngine::with_config(config);
        let board = setup_board(&[(7, 7, Stone::Black)]);
        let result = engine.get_move_with_stats(&board, Side::White);
        assert_eq!(result.search_type, SearchType::AlphaBeta);
        assert!(result.nodes > 1);
        let m = result.best_move.unwrap();
        assert!(board.is_empty(m));
    }

    #[test]
    fn test_full_board_returns_no_move() {
        let mut board = Board::new();
        for r in 0..BOARD_SIZE as u8 {
            for c in 0..BOARD_SIZE as u8 {
                let stone = if ((r / 2) + (c / 2)) % 2 == 0 {
                    Stone::Black
                } else {
                    Stone::White
                };
                board.place_stone(Pos::new(r, c), stone);
            }
        }
        assert!(board.is_full());

        let mut engine = seeded(Difficulty::Hard);
        let result = engine.try_decide(&board, Side::Black).unwrap();
        assert_eq!(result.best_move, None);
        assert_eq!(result.search_type, SearchType::NoMove);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let board = setup_board(&[(7, 7, Stone::Black), (6, 8, Stone::White)]);
        let a = seeded(Difficulty::Easy).get_move(&board, Side::Black);
        let b = seeded(Difficulty::Easy).get_move(&board, Side::Black);
        assert_eq!(a, b);
    }

    #[test]
    fn test_greedy_picks_only_tied_best_cells() {
        let board = setup_board(&[(7, 7, Stone::Black), (6, 8, Stone::White)]);
        let scored: Vec<(Pos, i32)> = candidate_cells(&board, 2)
            .into_iter()
            .map(|p| (p, evaluate_cell(&board, p, Side::Black).score))
            .collect();
        let best = scored.iter().map(|&(_, s)| s).max().unwrap();
        let tied: Vec<Pos> = scored.iter().filter(|&&(_, s)| s == best).map(|&(p, _)| p).collect();

        for d in [Difficulty::Easy, Difficulty::Medium] {
            for seed in 0..10 {
                let config = EngineConfig::for_difficulty(d)
                    .with_opening_ply_limit(0)
                    .with_seed(seed);
                let result = AIEngine::with_config(config).get_move_with_stats(&board, Side::Black);
                assert_eq!(result.search_type, SearchType::Greedy, "{d} seed {seed}");
                assert_eq!(result.score, best);
                let m = result.best_move.unwrap();
                assert!(tied.contains(&m), "{d} seed {seed}: {m} not in {tied:?}");
            }
        }
    }

    #[test]
    fn test_engine_alternating_colors() {
        let mut board = Board::new();
        let mut engine = seeded(Difficulty::Medium);
        for ply in 0..8 {
            let side = Side::for_ply(ply);
            let m = engine.get_move(&board, side).expect("board is not full");
            board.apply(m, side).unwrap();
        }
        assert_eq!(board.stone_count(), 8);
    }

    #[test]
    fn test_move_result_types() {
        let pos = Pos::new(7, 7);
        assert_eq!(MoveResult::immediate_win(pos).score, WIN_SCORE);
        assert_eq!(MoveResult::center(pos).search_type, SearchType::Center);
        assert_eq!(
            MoveResult::block_five(pos, Side::White).search_type,
            SearchType::BlockFive
        );
        let none = MoveResult::no_move();
        assert!(none.best_move.is_none());
        assert_eq!(none.search_type, SearchType::NoMove);
        assert_eq!(SearchType::OpeningBook.to_string(), "opening-book");
    }
}
