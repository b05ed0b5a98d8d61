use super::*;

fn board() -> Bounds {
    Bounds::new(4, 3)
}

// =============================================================
// to_cell / to_point
// =============================================================

#[test]
fn point_x_is_column_and_y_is_row() {
    let cell = board().to_cell(&Point::new(2, 1, Pen::Ink)).expect("cell");
    assert_eq!(cell, Cell::new(1, 2));
}

#[test]
fn to_point_swaps_back() {
    let point = to_point(Cell::new(1, 2), Pen::Erase);
    assert_eq!(point, Point::new(2, 1, Pen::Erase));
}

#[test]
fn negative_coordinates_clamp_to_zero() {
    let cell = board().cell_at(-5, -1).expect("cell");
    assert_eq!(cell, Cell::new(0, 0));
}

#[test]
fn coordinates_past_the_edge_clamp_to_last_cell() {
    let cell = board().cell_at(40, 3).expect("cell");
    assert_eq!(cell, Cell::new(2, 3));
}

#[test]
fn empty_board_has_no_cells() {
    assert_eq!(Bounds::new(0, 0).cell_at(0, 0), None);
    assert_eq!(Bounds::new(5, 0).cell_at(1, 0), None);
    assert!(Bounds::new(0, 3).is_empty());
}

#[test]
fn point_at_clamps_and_keeps_pen() {
    let point = board().point_at(9, -2, Pen::Ink).expect("point");
    assert_eq!(point, Point::new(3, 0, Pen::Ink));
}

#[test]
fn cell_point_cell_is_identity_on_every_in_range_cell() {
    let bounds = board();
    for row in 0..bounds.height {
        for col in 0..bounds.width {
            let cell = Cell::new(row, col);
            let back = bounds.to_cell(&to_point(cell, Pen::Ink)).expect("cell");
            assert_eq!(back, cell);
        }
    }
}

#[test]
fn normalizing_twice_is_stable_for_out_of_range_input() {
    let bounds = board();
    for (x, y) in [(-3, 7), (100, -100), (2, 2), (4, 3), (i32::MIN, i32::MAX)] {
        let first = bounds.cell_at(x, y).expect("cell");
        let second = bounds.to_cell(&to_point(first, Pen::Ink)).expect("cell");
        assert_eq!(first, second);
    }
}

// =============================================================
// disk
// =============================================================

#[test]
fn radius_one_covers_only_the_center() {
    assert_eq!(board().disk(Cell::new(1, 1), 1), vec![Cell::new(1, 1)]);
}

#[test]
fn radius_zero_behaves_like_one() {
    assert_eq!(board().disk(Cell::new(1, 1), 0), vec![Cell::new(1, 1)]);
}

#[test]
fn radius_two_covers_the_surrounding_block() {
    let cells = board().disk(Cell::new(1, 1), 2);
    assert_eq!(cells.len(), 9);
    assert!(cells.contains(&Cell::new(0, 0)));
    assert!(cells.contains(&Cell::new(2, 2)));
}

#[test]
fn radius_three_excludes_the_far_corners() {
    let bounds = Bounds::new(9, 9);
    let cells = bounds.disk(Cell::new(4, 4), 3);
    assert!(cells.contains(&Cell::new(2, 3)));
    assert!(cells.contains(&Cell::new(6, 6)));
    assert!(!cells.contains(&Cell::new(4, 7)));
}

#[test]
fn disk_skips_cells_off_the_board() {
    let cells = board().disk(Cell::new(0, 0), 2);
    assert_eq!(cells.len(), 4);
    assert!(cells.iter().all(|c| board().contains(*c)));
}

#[test]
fn large_disk_is_bounded_by_the_board() {
    let bounds = board();
    let cells = bounds.disk(Cell::new(1, 1), 50);
    assert_eq!(cells.len(), bounds.width * bounds.height);
}
