use super::*;

fn matrix(rows: Vec<Vec<u8>>) -> BoardMatrix {
    BoardMatrix::from_rows(rows).expect("matrix")
}

// =============================================================
// Snapshots
// =============================================================

#[test]
fn snapshot_replaces_every_cell() {
    let mut board = BoardState::new(2, 2);
    board.apply_points(&[Point::new(0, 0, Pen::Ink)], 1);

    board.apply_snapshot(matrix(vec![vec![0, 1], vec![1, 0]])).expect("apply");

    assert_eq!(board.matrix().rows(), vec![vec![0, 1], vec![1, 0]]);
}

#[test]
fn snapshot_is_idempotent() {
    let snapshot = matrix(vec![vec![1, 0, 1], vec![0, 1, 0]]);
    let mut once = BoardState::new(3, 2);
    once.apply_snapshot(snapshot.clone()).expect("apply");
    let mut twice = once.clone();
    twice.apply_snapshot(snapshot).expect("apply");
    assert_eq!(once, twice);
}

#[test]
fn snapshot_with_other_dimensions_is_rejected() {
    let mut board = BoardState::new(2, 2);
    board.apply_points(&[Point::new(1, 1, Pen::Ink)], 1);
    let before = board.clone();

    let err = board.apply_snapshot(matrix(vec![vec![0, 0, 0]])).expect_err("mismatch");

    assert_eq!(
        err,
        BoardError::DimensionMismatch { expected_width: 2, expected_height: 2, width: 3, height: 1 }
    );
    assert_eq!(board, before);
}

#[test]
fn reset_adopts_new_dimensions() {
    let mut board = BoardState::new(2, 2);
    board.reset(matrix(vec![vec![0, 0, 1]]));
    assert_eq!(board.bounds(), Bounds::new(3, 1));
    assert_eq!(board.cell(Cell::new(0, 2)), Some(Pen::Ink));
}

// =============================================================
// Deltas
// =============================================================

#[test]
fn delta_sets_cell_at_row_y_col_x() {
    let mut board = BoardState::new(4, 3);
    board.apply_points(&[Point::new(3, 1, Pen::Ink)], 1);
    assert_eq!(board.cell(Cell::new(1, 3)), Some(Pen::Ink));
    assert_eq!(board.cell(Cell::new(3, 1)), None);
}

#[test]
fn later_point_on_same_cell_wins() {
    let mut board = BoardState::new(2, 2);
    let changed = board.apply_points(&[Point::new(1, 0, Pen::Ink), Point::new(1, 0, Pen::Erase)], 1);
    assert_eq!(board.cell(Cell::new(0, 1)), Some(Pen::Erase));
    assert_eq!(changed, vec![(Cell::new(0, 1), Pen::Ink), (Cell::new(0, 1), Pen::Erase)]);
}

#[test]
fn unchanged_cells_are_not_reported() {
    let mut board = BoardState::new(2, 2);
    let changed = board.apply_points(&[Point::new(0, 0, Pen::Erase)], 1);
    assert!(changed.is_empty());
}

#[test]
fn delta_leaves_other_cells_alone() {
    let mut board = BoardState::new(2, 2);
    board.apply_points(&[Point::new(0, 0, Pen::Ink), Point::new(1, 1, Pen::Ink)], 1);
    assert_eq!(board.matrix().rows(), vec![vec![1, 0], vec![0, 1]]);
}

#[test]
fn out_of_range_points_clamp_to_edge() {
    let mut board = BoardState::new(3, 2);
    board.apply_points(&[Point::new(10, -4, Pen::Ink)], 1);
    assert_eq!(board.cell(Cell::new(0, 2)), Some(Pen::Ink));
}

#[test]
fn points_on_empty_board_are_ignored() {
    let mut board = BoardState::default();
    assert!(board.apply_points(&[Point::new(0, 0, Pen::Ink)], 1).is_empty());
}

#[test]
fn wide_radius_paints_the_disk() {
    let mut board = BoardState::new(5, 5);
    let changed = board.apply_points(&[Point::new(2, 2, Pen::Ink)], 2);
    assert_eq!(changed.len(), 9);
    assert_eq!(board.ink_cells().count(), 9);
}
