use super::*;

#[test]
fn test_stone_opponent() {
    assert_eq!(Stone::Black.opponent(), Stone::White);
    assert_eq!(Stone::White.opponent(), Stone::Black);
    assert_eq!(Stone::Empty.opponent(), Stone::Empty);
}

#[test]
fn test_player_id_sentinel() {
    assert_eq!(Stone::Empty.player_id(), 0);
    assert_eq!(Stone::from_player_id(1), Some(Stone::Black));
    assert_eq!(Stone::from_player_id(2), Some(Stone::White));
    assert_eq!(Stone::from_player_id(3), None);
    assert_eq!(Stone::Empty.side(), None);
}

#[test]
fn test_side_for_ply() {
    assert_eq!(Side::for_ply(0), Side::Black);
    assert_eq!(Side::for_ply(1), Side::White);
    assert_eq!(Side::for_ply(10), Side::Black);
    assert_eq!(Side::Black.opponent(), Side::White);
}

#[test]
fn test_pos_conversion() {
    let pos = Pos::new(7, 7); // Center
    assert_eq!(pos.to_index(), 7 * 15 + 7);
    assert_eq!(pos.to_index(), 112);

    let pos2 = Pos::from_index(112);
    assert_eq!(pos2, Pos::center());
}

#[test]
fn test_pos_validity() {
    assert!(Pos::is_valid(0, 0));
    assert!(Pos::is_valid(14, 14));
    assert!(!Pos::is_valid(-1, 0));
    assert!(!Pos::is_valid(0, -1));
    assert!(!Pos::is_valid(15, 0));
    assert!(!Pos::is_valid(0, 15));
    assert!(Pos::try_new(15, 3).is_err());
}

#[test]
fn test_board_constants() {
    assert_eq!(BOARD_SIZE, 15);
    assert_eq!(TOTAL_CELLS, 225);
    assert_eq!(CENTER, 7);
}

#[test]
fn test_pos_ordering() {
    let pos1 = Pos::new(0, 0);
    let pos2 = Pos::new(0, 1);
    let pos3 = Pos::new(1, 0);

    assert!(pos1 < pos2);
    assert!(pos2 < pos3);
    assert!(pos1 < pos3);
}

#[test]
fn test_pos_corner_indices() {
    assert_eq!(Pos::new(0, 0).to_index(), 0);
    assert_eq!(Pos::new(0, 14).to_index(), 14);
    assert_eq!(Pos::new(14, 0).to_index(), 210);
    assert_eq!(Pos::new(14, 14).to_index(), 224);
}

#[test]
fn test_pos_notation() {
    assert_eq!(Pos::center().to_string(), "h8");
    assert_eq!(Pos::new(0, 0).to_string(), "a15");
    assert_eq!("h8".parse::<Pos>().unwrap(), Pos::center());
    assert_eq!("3, 4".parse::<Pos>().unwrap(), Pos::new(3, 4));
    assert!("z99".parse::<Pos>().is_err());
}

#[test]
fn test_apply_rejects_occupied() {
    let mut board = Board::new();
    board.apply(Pos::center(), Side::Black).unwrap();
    let err = board.apply(Pos::center(), Side::White).unwrap_err();
    assert!(matches!(err, crate::error::EngineError::IllegalMove { .. }));
}

#[test]
fn test_apply_rejects_out_of_range() {
    let mut board = Board::new();
    let bad = Pos { row: 15, col: 0 };
    assert!(board.apply(bad, Side::Black).is_err());
}

#[test]
fn test_apply_then_undo_restores_board() {
    let mut board = Board::new();
    board.apply(Pos::new(3, 3), Side::Black).unwrap();
    board.apply(Pos::new(4, 4), Side::White).unwrap();
    let before = board.clone();

    board.apply(Pos::new(5, 5), Side::Black).unwrap();
    assert_ne!(board, before);
    assert_eq!(board.undo(Pos::new(5, 5)).unwrap(), Stone::Black);
    assert_eq!(board, before);
}

#[test]
fn test_undo_empty_cell_fails() {
    let mut board = Board::new();
    assert!(board.undo(Pos::center()).is_err());
}

#[test]
fn test_side_to_move() {
    let mut board = Board::new();
    assert_eq!(board.side_to_move(), Side::Black);
    board.apply(Pos::center(), Side::Black).unwrap();
    assert_eq!(board.side_to_move(), Side::White);
}

#[test]
fn test_is_full() {
    let mut board = Board::new();
    assert!(!board.is_full());
    for idx in 0..TOTAL_CELLS {
        let side = Side::for_ply(idx);
        board.place_stone(Pos::from_index(idx), side.stone());
    }
    assert!(board.is_full());
    assert_eq!(board.empty_cells().count(), 0);
}

#[test]
fn test_display_parse_round_trip() {
    let mut board = Board::new();
    board.apply(Pos::center(), Side::Black).unwrap();
    board.apply(Pos::new(6, 8), Side::White).unwrap();

    let text = board.to_string();
    assert_eq!(text.lines().count(), BOARD_SIZE);
    assert_eq!(Board::parse(&text).unwrap(), board);
}

#[test]
fn test_parse_rejects_bad_rows() {
    assert!(Board::parse("...").is_err());
    let mut text = String::new();
    for _ in 0..BOARD_SIZE {
        text.push_str("..............?\n");
    }
    assert!(Board::parse(&text).is_err());
}

#[test]
fn test_cells_round_trip() {
    let mut board = Board::new();
    board.apply(Pos::new(1, 2), Side::White).unwrap();
    let cells = board.to_cells();
    assert_eq!(cells[1][2], Stone::White);
    assert_eq!(Board::from_cells(&cells), board);
}
