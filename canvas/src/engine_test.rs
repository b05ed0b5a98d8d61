use super::*;

// =============================================================
// Helpers
// =============================================================

fn engine() -> EngineCore {
    EngineCore::with_size(4, 3)
}

fn flushes(actions: &[Action]) -> Vec<Vec<Point>> {
    actions
        .iter()
        .filter_map(|action| match action {
            Action::Flush(points) => Some(points.clone()),
            _ => None,
        })
        .collect()
}

fn renders(actions: &[Action]) -> Vec<(Cell, bool)> {
    actions
        .iter()
        .filter_map(|action| match action {
            Action::Render { cell, pen_on } => Some((*cell, *pen_on)),
            _ => None,
        })
        .collect()
}

// =============================================================
// Gestures
// =============================================================

#[test]
fn stroke_flushes_one_batch_in_input_order() {
    let mut engine = engine();
    assert!(flushes(&engine.on_gesture_start(0, 0)).is_empty());
    assert!(flushes(&engine.on_gesture_move(1, 0)).is_empty());
    assert!(flushes(&engine.on_gesture_move(2, 1)).is_empty());
    let actions = engine.on_gesture_end(3, 1);

    assert_eq!(
        flushes(&actions),
        vec![vec![
            Point::new(0, 0, Pen::Ink),
            Point::new(1, 0, Pen::Ink),
            Point::new(2, 1, Pen::Ink),
            Point::new(3, 1, Pen::Ink),
        ]]
    );
    assert!(!engine.is_drawing());
}

#[test]
fn local_points_are_painted_immediately() {
    let mut engine = engine();
    let actions = engine.on_gesture_start(2, 1);
    assert_eq!(renders(&actions), vec![(Cell::new(1, 2), true)]);
    assert_eq!(engine.board.cell(Cell::new(1, 2)), Some(Pen::Ink));
}

#[test]
fn eraser_points_carry_pen_zero() {
    let mut engine = engine();
    engine.board.apply_points(&[Point::new(1, 1, Pen::Ink)], 1);
    engine.set_tool(Tool::Eraser);

    engine.on_gesture_start(1, 1);
    let actions = engine.on_gesture_end(1, 1);

    assert_eq!(flushes(&actions), vec![vec![Point::new(1, 1, Pen::Erase), Point::new(1, 1, Pen::Erase)]]);
    assert_eq!(engine.board.cell(Cell::new(1, 1)), Some(Pen::Erase));
}

#[test]
fn move_and_end_without_start_do_nothing() {
    let mut engine = engine();
    assert!(engine.on_gesture_move(1, 1).is_empty());
    assert!(engine.on_gesture_end(1, 1).is_empty());
    assert_eq!(engine.board.ink_cells().count(), 0);
}

#[test]
fn gesture_points_clamp_to_board() {
    let mut engine = engine();
    engine.on_gesture_start(-10, 50);
    let actions = engine.on_gesture_end(99, -1);
    assert_eq!(flushes(&actions), vec![vec![Point::new(0, 2, Pen::Ink), Point::new(3, 0, Pen::Ink)]]);
}

#[test]
fn gestures_on_empty_board_are_ignored() {
    let mut engine = EngineCore::new();
    assert!(engine.on_gesture_start(0, 0).is_empty());
    assert!(!engine.is_drawing());
    assert!(engine.on_gesture_end(0, 0).is_empty());
}

#[test]
fn wider_pen_paints_disk_but_sends_sample_points() {
    let mut engine = EngineCore::with_size(5, 5);
    engine.set_pen_radius(2);
    engine.on_gesture_start(2, 2);
    let actions = engine.on_gesture_end(2, 2);
    assert_eq!(engine.board.ink_cells().count(), 9);
    assert_eq!(flushes(&actions)[0].len(), 2);
}

#[test]
fn pen_radius_is_clamped() {
    let mut engine = engine();
    engine.set_pen_radius(0);
    assert_eq!(engine.pen_radius(), 1);
    engine.set_pen_radius(51);
    assert_eq!(engine.pen_radius(), 50);
}

// =============================================================
// Server data
// =============================================================

#[test]
fn snapshot_requests_repaint() {
    let mut engine = EngineCore::with_size(2, 2);
    let matrix = BoardMatrix::from_rows(vec![vec![1, 0], vec![0, 1]]).expect("matrix");
    let actions = engine.load_snapshot(matrix).expect("snapshot");
    assert_eq!(actions, vec![Action::Repaint]);
    assert_eq!(engine.board.ink_cells().collect::<Vec<_>>(), vec![Cell::new(0, 0), Cell::new(1, 1)]);
}

#[test]
fn mismatched_snapshot_is_rejected() {
    let mut engine = EngineCore::with_size(2, 2);
    let matrix = BoardMatrix::from_rows(vec![vec![1, 0, 1]]).expect("matrix");
    assert!(engine.load_snapshot(matrix).is_err());
    assert_eq!(engine.board.ink_cells().count(), 0);
}

#[test]
fn start_board_adopts_dimensions_and_cancels_stroke() {
    let mut engine = engine();
    engine.on_gesture_start(0, 0);
    let matrix = BoardMatrix::from_rows(vec![vec![0, 1]]).expect("matrix");
    assert_eq!(engine.start_board(matrix), vec![Action::Repaint]);
    assert!(!engine.is_drawing());
    assert_eq!(engine.board.bounds().width, 2);
}

#[test]
fn deltas_render_changed_cells_only() {
    let mut engine = EngineCore::with_size(2, 2);
    let actions = engine.apply_points(&[Point::new(0, 0, Pen::Ink), Point::new(1, 1, Pen::Ink)]);
    assert_eq!(renders(&actions), vec![(Cell::new(0, 0), true), (Cell::new(1, 1), true)]);
    assert_eq!(engine.board.matrix().rows(), vec![vec![1, 0], vec![0, 1]]);

    let again = engine.apply_points(&[Point::new(0, 0, Pen::Ink)]);
    assert!(again.is_empty());
}

#[test]
fn remote_delta_during_local_stroke_keeps_buffer() {
    let mut engine = engine();
    engine.on_gesture_start(0, 0);
    engine.apply_points(&[Point::new(3, 2, Pen::Ink)]);
    let actions = engine.on_gesture_end(1, 0);
    assert_eq!(flushes(&actions), vec![vec![Point::new(0, 0, Pen::Ink), Point::new(1, 0, Pen::Ink)]]);
}
