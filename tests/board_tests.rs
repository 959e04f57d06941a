//! Board tests - occupancy, swaps, completed rows and gravity

use rowmatch::core::Board;
use rowmatch::types::{GridPos, GroupId, ItemId, Tile, TileId, Token};

fn tile(id: u32, group: u16) -> Tile {
    Tile {
        id: TileId(id),
        token: Token::new(GroupId(group), ItemId(id as u16)),
        pos: GridPos::new(0, 0),
    }
}

/// Column contents bottom to top as tile ids (0 = empty).
fn column(board: &Board, x: i8) -> Vec<u32> {
    (0..board.height() as i8)
        .map(|y| board.get(x, y).map_or(0, |t| t.id.0))
        .collect()
}

#[test]
fn test_board_new_is_empty() {
    let board = Board::new(4, 5);
    assert_eq!(board.width(), 4);
    assert_eq!(board.height(), 5);
    assert!(board.is_empty());
    assert_eq!(board.cells().len(), 20);
    assert!(board.completed_rows().is_empty());
}

#[test]
fn test_out_of_bounds_reads_empty_and_writes_are_noops() {
    let mut board = Board::new(3, 2);
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(3, 0), None);
    assert_eq!(board.get(0, 2), None);

    assert!(!board.set(3, 0, Some(tile(1, 0))));
    assert!(!board.set(0, -1, Some(tile(1, 0))));
    assert!(board.is_empty());
    assert_eq!(board.clear(7, 7), None);
}

#[test]
fn test_set_records_position() {
    let mut board = Board::new(3, 3);
    assert!(board.set(2, 1, Some(tile(4, 0))));
    assert_eq!(board.get(2, 1).map(|t| t.pos), Some(GridPos::new(2, 1)));
    board.debug_check_positions();
}

#[test]
fn test_swap_any_two_cells_updates_positions() {
    let mut board = Board::new(4, 3);
    board.set(0, 0, Some(tile(1, 0)));
    board.set(3, 2, Some(tile(2, 1)));

    // far apart on purpose: adjacency is not required
    assert!(board.swap(GridPos::new(0, 0), GridPos::new(3, 2)));
    assert_eq!(board.get(0, 0).map(|t| t.id), Some(TileId(2)));
    assert_eq!(board.get(3, 2).map(|t| t.pos), Some(GridPos::new(3, 2)));
    board.debug_check_positions();
}

#[test]
fn test_swap_with_empty_cell_moves_tile() {
    let mut board = Board::new(2, 2);
    board.set(0, 0, Some(tile(1, 0)));
    assert!(board.swap(GridPos::new(0, 0), GridPos::new(1, 1)));
    assert_eq!(board.get(0, 0), None);
    assert_eq!(board.get(1, 1).map(|t| t.pos), Some(GridPos::new(1, 1)));
}

#[test]
fn test_swap_out_of_bounds_changes_nothing() {
    let mut board = Board::new(2, 2);
    board.set(0, 0, Some(tile(1, 0)));
    let before = board.clone();
    assert!(!board.swap(GridPos::new(0, 0), GridPos::new(2, 0)));
    assert_eq!(board, before);
}

#[test]
fn test_row_with_one_empty_cell_never_completes() {
    let mut board = Board::new(3, 1);
    board.set(0, 0, Some(tile(1, 5)));
    board.set(1, 0, Some(tile(2, 5)));
    assert!(!board.is_row_complete(0));

    board.set(2, 0, Some(tile(3, 5)));
    assert!(board.is_row_complete(0));
    assert_eq!(board.row_group(0), Some(GroupId(5)));
}

#[test]
fn test_mixed_row_is_not_complete() {
    let mut board = Board::new(2, 1);
    board.set(0, 0, Some(tile(1, 0)));
    board.set(1, 0, Some(tile(2, 1)));
    assert_eq!(board.row_group(0), None);
}

#[test]
fn test_completed_rows_are_listed_bottom_first() {
    let mut board = Board::new(2, 3);
    for (x, y, id, group) in [(0, 0, 1, 0), (1, 0, 2, 0), (0, 2, 3, 1), (1, 2, 4, 1), (0, 1, 5, 2)] {
        board.set(x, y, Some(tile(id, group)));
    }
    assert_eq!(board.completed_rows().as_slice(), &[0, 2]);
}

#[test]
fn test_zero_width_board_has_no_complete_rows() {
    let board = Board::new(0, 3);
    assert!(board.completed_rows().is_empty());
    assert!(board.is_empty());
}

#[test]
fn test_collapse_keeps_column_order() {
    // bottom to top: [empty, T1, empty, T2] -> [T1, T2, empty, empty]
    let mut board = Board::new(1, 4);
    board.set(0, 1, Some(tile(1, 0)));
    board.set(0, 3, Some(tile(2, 0)));

    let moves = board.collapse();
    assert_eq!(column(&board, 0), vec![1, 2, 0, 0]);
    assert_eq!(moves.len(), 2);
    assert_eq!(moves[0].from, GridPos::new(0, 1));
    assert_eq!(moves[0].to, GridPos::new(0, 0));
    assert_eq!(moves[1].from, GridPos::new(0, 3));
    assert_eq!(moves[1].to, GridPos::new(0, 1));
    board.debug_check_positions();
}

#[test]
fn test_collapse_reports_only_moved_tiles() {
    let mut board = Board::new(2, 3);
    board.set(0, 0, Some(tile(1, 0)));
    board.set(1, 2, Some(tile(2, 0)));

    let moves = board.collapse();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].tile.id, TileId(2));
    assert_eq!(moves[0].tile.pos, GridPos::new(1, 0));
    assert_eq!(column(&board, 0), vec![1, 0, 0]);
}

#[test]
fn test_scan_order_is_bottom_up_left_to_right() {
    let board = Board::new(2, 2);
    let order: Vec<GridPos> = board.scan_order().collect();
    assert_eq!(
        order,
        vec![
            GridPos::new(0, 0),
            GridPos::new(1, 0),
            GridPos::new(0, 1),
            GridPos::new(1, 1)
        ]
    );
}

#[test]
fn test_tiles_and_empty_cells_follow_scan_order() {
    let mut board = Board::new(2, 2);
    board.set(1, 1, Some(tile(9, 0)));
    board.set(0, 0, Some(tile(8, 0)));
    let ids: Vec<u32> = board.tiles().iter().map(|t| t.id.0).collect();
    assert_eq!(ids, vec![8, 9]);
    assert_eq!(board.empty_cells(), vec![GridPos::new(1, 0), GridPos::new(0, 1)]);
    assert_eq!(board.occupied_count(), 2);
}
