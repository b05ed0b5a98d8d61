use super::*;

fn ink(x: i32, y: i32) -> Point {
    Point::new(x, y, Pen::Ink)
}

// =============================================================
// Tool / UiState
// =============================================================

#[test]
fn tool_maps_to_pen_value() {
    assert_eq!(Tool::Pen.pen(), Pen::Ink);
    assert_eq!(Tool::Eraser.pen(), Pen::Erase);
    assert_eq!(Tool::default(), Tool::Pen);
}

#[test]
fn ui_defaults_to_single_cell_pen() {
    let ui = UiState::default();
    assert_eq!(ui.tool, Tool::Pen);
    assert_eq!(ui.pen_radius(), DEFAULT_PEN_RADIUS);
}

#[test]
fn pen_radius_is_clamped() {
    let mut ui = UiState::default();
    ui.set_pen_radius(0);
    assert_eq!(ui.pen_radius(), MIN_PEN_RADIUS);
    ui.set_pen_radius(500);
    assert_eq!(ui.pen_radius(), MAX_PEN_RADIUS);
    ui.set_pen_radius(12);
    assert_eq!(ui.pen_radius(), 12);
}

// =============================================================
// Gesture state machine
// =============================================================

#[test]
fn idle_by_default() {
    assert!(!GestureState::default().is_drawing());
}

#[test]
fn begin_records_first_point() {
    let mut state = GestureState::default();
    state.begin(ink(1, 1));
    assert_eq!(state, GestureState::Drawing { buffer: StrokeBuffer::start(ink(1, 1)) });
}

#[test]
fn full_stroke_yields_points_in_order() {
    let mut state = GestureState::default();
    state.begin(ink(1, 1));
    assert!(state.extend(ink(2, 1)));
    assert!(state.extend(ink(3, 2)));
    let batch = state.finish(ink(4, 2)).expect("batch");
    assert_eq!(batch, vec![ink(1, 1), ink(2, 1), ink(3, 2), ink(4, 2)]);
    assert_eq!(state, GestureState::Idle);
}

#[test]
fn start_then_end_yields_two_points() {
    let mut state = GestureState::default();
    state.begin(ink(0, 0));
    let batch = state.finish(ink(0, 0)).expect("batch");
    assert_eq!(batch.len(), 2);
}

#[test]
fn move_while_idle_is_ignored() {
    let mut state = GestureState::default();
    assert!(!state.extend(ink(1, 1)));
    assert_eq!(state, GestureState::Idle);
}

#[test]
fn end_while_idle_yields_nothing() {
    let mut state = GestureState::default();
    assert_eq!(state.finish(ink(1, 1)), None);
}

#[test]
fn batch_is_taken_once() {
    let mut state = GestureState::default();
    state.begin(ink(0, 0));
    assert!(state.finish(ink(1, 0)).is_some());
    assert_eq!(state.finish(ink(2, 0)), None);
}

#[test]
fn restart_discards_previous_stroke() {
    let mut state = GestureState::default();
    state.begin(ink(0, 0));
    state.extend(ink(1, 0));
    state.begin(ink(5, 5));
    let batch = state.finish(ink(6, 5)).expect("batch");
    assert_eq!(batch, vec![ink(5, 5), ink(6, 5)]);
}

#[test]
fn cancel_returns_to_idle() {
    let mut state = GestureState::default();
    state.begin(ink(0, 0));
    state.cancel();
    assert!(!state.is_drawing());
    assert_eq!(state.finish(ink(0, 0)), None);
}
