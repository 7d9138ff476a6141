//! Property tests for the board, the decision procedure, the search and
//! self-play.

use proptest::prelude::*;

use gomoku::board::TOTAL_CELLS;
use gomoku::rules::has_five_at_pos;
use gomoku::search::Searcher;
use gomoku::training::play_game;
use gomoku::{
    AIEngine, Board, Difficulty, Direction, EngineConfig, OpeningBook, Pos, Side, Stone,
    TrainerConfig, BOARD_SIZE,
};

/// Play `order` alternately from Black, skipping cells that would complete
/// a five, until `plies` stones are down.
fn reachable_board(order: &[usize], plies: usize) -> Board {
    let mut board = Board::new();
    let mut side = Side::Black;
    for &idx in order {
        if board.stone_count() as usize >= plies {
            break;
        }
        let pos = Pos::from_index(idx);
        if has_five_at_pos(&board, pos, side.stone()) {
            continue;
        }
        board.apply(pos, side).unwrap();
        side = side.opponent();
    }
    board
}

/// Brute-force five detection over the whole board.
fn any_five(board: &Board, stone: Stone) -> bool {
    let n = BOARD_SIZE as i32;
    for r in 0..n {
        for c in 0..n {
            for dir in Direction::ALL {
                let (dr, dc) = dir.delta();
                let all = (0..5).all(|k| {
                    let (rr, cc) = (r + dr * k, c + dc * k);
                    Pos::is_valid(rr, cc) && board.get(Pos::new(rr as u8, cc as u8)) == stone
                });
                if all {
                    return true;
                }
            }
        }
    }
    false
}

fn shuffled_cells() -> impl Strategy<Value = Vec<usize>> {
    Just((0..TOTAL_CELLS).collect::<Vec<_>>()).prop_shuffle()
}

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Medium),
        Just(Difficulty::Hard),
    ]
}

/// Engine with a shallow search so Hard stays fast.
fn engine(difficulty: Difficulty, seed: u64) -> AIEngine {
    AIEngine::with_config(
        EngineConfig::for_difficulty(difficulty)
            .with_depth(2)
            .with_top_k(6)
            .with_seed(seed),
    )
}

/// Four `side` stones along `dir` from `start`, with the fifth cell empty.
fn four_line() -> impl Strategy<Value = (Pos, Direction)> {
    (2u8..13, 2u8..13, 0usize..4).prop_filter_map("line leaves the board", |(r, c, d)| {
        let dir = Direction::ALL[d];
        let (dr, dc) = dir.delta();
        let start = Pos::new(r, c);
        start.offset(dr, dc, 4).map(|_| (start, dir))
    })
}

fn place_four(board: &mut Board, start: Pos, dir: Direction, stone: Stone) -> Pos {
    let (dr, dc) = dir.delta();
    for k in 0..4 {
        if let Some(p) = start.offset(dr, dc, k) {
            board.place_stone(p, stone);
        }
    }
    start.offset(dr, dc, 4).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_has_five_on_completed_line(
        r in 0u8..15,
        c in 0u8..15,
        d in 0usize..4,
        len in 5i32..7,
        black in any::<bool>(),
    ) {
        let dir = Direction::ALL[d];
        let (dr, dc) = dir.delta();
        let start = Pos::new(r, c);
        prop_assume!(start.offset(dr, dc, len - 1).is_some());

        let side = if black { Side::Black } else { Side::White };
        let mut board = Board::new();
        for k in 0..len {
            board.place_stone(start.offset(dr, dc, k).unwrap(), side.stone());
        }
        let end = start.offset(dr, dc, len - 1).unwrap();
        prop_assert!(board.has_five(end, side));
        prop_assert!(board.has_five(start, side));
        prop_assert!(!board.has_five(end, side.opponent()));
    }

    #[test]
    fn prop_has_five_agrees_with_brute_force(order in shuffled_cells(), plies in 0usize..60) {
        let mut board = Board::new();
        for (i, &idx) in order.iter().take(plies).enumerate() {
            board.place_stone(Pos::from_index(idx), Side::for_ply(i).stone());
        }
        for side in [Side::Black, Side::White] {
            let anchored = board
                .stones(side)
                .iter_ones()
                .any(|p| board.has_five(p, side));
            prop_assert_eq!(anchored, any_five(&board, side.stone()));
        }
    }

    #[test]
    fn prop_apply_then_undo_restores(order in shuffled_cells(), plies in 0usize..40, extra in 0usize..TOTAL_CELLS) {
        let mut board = reachable_board(&order, plies);
        let before = board.clone();
        let pos = Pos::from_index(extra);
        prop_assume!(board.is_empty(pos));

        let side = board.side_to_move();
        board.apply(pos, side).unwrap();
        prop_assert_eq!(board.undo(pos).unwrap(), side.stone());
        prop_assert_eq!(board.to_cells(), before.to_cells());
        prop_assert_eq!(board, before);
    }

    #[test]
    fn prop_decide_returns_legal_move(
        order in shuffled_cells(),
        plies in 0usize..30,
        difficulty in difficulty(),
        seed in any::<u64>(),
    ) {
        let board = reachable_board(&order, plies);
        let side = board.side_to_move();
        let result = engine(difficulty, seed).try_decide(&board, side).unwrap();
        let pos = result.best_move.expect("board has empty cells");
        prop_assert!(pos.in_bounds());
        prop_assert!(board.is_empty(pos), "{} is occupied", pos);
    }

    #[test]
    fn prop_win_in_one_is_taken(
        (start, dir) in four_line(),
        difficulty in difficulty(),
        seed in any::<u64>(),
    ) {
        let mut board = Board::new();
        let fifth = place_four(&mut board, start, dir, Stone::Black);
        prop_assume!(board.is_empty(fifth));

        let pos = engine(difficulty, seed).get_move(&board, Side::Black).unwrap();
        prop_assert!(board.is_empty(pos));
        prop_assert!(has_five_at_pos(&board, pos, Stone::Black), "{} does not win", pos);
    }

    #[test]
    fn prop_opponent_five_is_blocked(
        (start, dir) in four_line(),
        difficulty in difficulty(),
        seed in any::<u64>(),
    ) {
        let mut board = Board::new();
        place_four(&mut board, start, dir, Stone::White);
        let far = if start.row < 7 { Pos::new(14, 0) } else { Pos::new(0, 14) };
        prop_assume!(board.is_empty(far));
        board.place_stone(far, Stone::Black);

        let pos = engine(difficulty, seed).get_move(&board, Side::Black).unwrap();
        prop_assert!(
            has_five_at_pos(&board, pos, Stone::White),
            "{} does not stop White's five",
            pos
        );
    }

    #[test]
    fn prop_empty_board_plays_center(difficulty in difficulty(), seed in any::<u64>()) {
        let pos = engine(difficulty, seed).get_move(&Board::new(), Side::Black);
        prop_assert_eq!(pos, Some(Pos::new(7, 7)));
    }

    #[test]
    fn prop_book_moves_are_legal(order in shuffled_cells(), plies in 0usize..6) {
        let board = reachable_board(&order, plies);
        let book = OpeningBook::with_standard_openings();
        if let Some(pos) = book.lookup(&board, board.stone_count() as usize) {
            prop_assert!(board.is_empty(pos));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn prop_pruning_preserves_value(
        cells in prop::collection::vec((5u8..10, 5u8..10), 2..8),
        depth in 1i8..=3,
    ) {
        let mut board = Board::new();
        for (i, (r, c)) in cells.into_iter().enumerate() {
            let pos = Pos::new(r, c);
            let side = Side::for_ply(i);
            if board.is_empty(pos) && !has_five_at_pos(&board, pos, side.stone()) {
                board.place_stone(pos, side.stone());
            }
        }
        let side = board.side_to_move();
        let searcher = Searcher::new(6);
        let pruned = searcher.search(&board, side, depth);
        let full = searcher.search_unpruned(&board, side, depth);
        prop_assert_eq!(pruned.score, full.score);
        prop_assert!(pruned.nodes <= full.nodes);
    }

    #[test]
    fn prop_self_play_respects_ply_cap(cap in 1usize..40, seed in any::<u64>()) {
        let config = TrainerConfig::default()
            .with_matchup(Difficulty::Easy, Difficulty::Medium)
            .with_ply_cap(cap)
            .with_seed(seed);
        let never = std::sync::atomic::AtomicBool::new(false);
        let matchup = (Difficulty::Easy, Difficulty::Medium);
        let record = play_game(0, matchup, &config, &never, &OpeningBook::default())
            .unwrap()
            .expect("not cancelled");
        prop_assert!(record.len() <= cap);
        prop_assert!(record.validate().is_ok());
    }
}
