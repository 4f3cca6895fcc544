//! Controller tests - pointer selection, keyboard navigation, copy, errors

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{cell_point, grid, gutter_point, people, PointerClock, RecordingProvider};
use gridview::clipboard::{MemoryClipboard, UnavailableClipboard};
use gridview::controller::{GridController, KeyCode, KeyEvent, Modifiers};
use gridview::error::GridError;
use gridview::grid::{RenderDirtyLevel, SelectionRange};

fn with_clipboard(grid: &mut GridController) -> MemoryClipboard {
    let clipboard = MemoryClipboard::new();
    grid.set_clipboard(Box::new(clipboard.clone()));
    clipboard
}

fn key(grid: &mut GridController, code: KeyCode, modifiers: Modifiers) -> bool {
    grid.key_down(KeyEvent::new(code, modifiers)).unwrap()
}

// ========================================================================
// Pointer selection
// ========================================================================

#[test]
fn test_drag_selection_normalizes_and_copies_as_tsv() {
    let mut grid = grid(people(), 400, 300);
    let clipboard = with_clipboard(&mut grid);
    let mut clock = PointerClock::new();

    let down = clock.at(cell_point(&grid, 2, 1));
    assert!(grid.pointer_down(down).unwrap());
    let moved = clock.at(cell_point(&grid, 0, 0));
    assert!(grid.pointer_move(moved).unwrap());
    grid.pointer_up(clock.at(cell_point(&grid, 0, 0))).unwrap();

    assert!(!grid.selection().is_dragging());
    assert_eq!(grid.selection().normalized(), Some(SelectionRange::new(0, 0, 2, 1)));

    assert!(key(&mut grid, KeyCode::Char('c'), Modifiers::CTRL));
    let text = clipboard.contents().unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| l.split('\t').count() == 2));
    assert_eq!(lines, vec!["alpha\t1,500", "beta\t20", "gamma\t"]);
}

#[test]
fn test_drag_past_the_data_area_clamps_to_last_cell() {
    let mut grid = grid(people(), 400, 300);
    let mut clock = PointerClock::new();

    grid.pointer_down(clock.at(cell_point(&grid, 1, 1))).unwrap();
    grid.pointer_move(clock.at((399.0, 299.0))).unwrap();
    grid.pointer_up(clock.at((399.0, 299.0))).unwrap();

    assert_eq!(grid.selection().normalized(), Some(SelectionRange::new(1, 1, 4, 2)));
}

#[test]
fn test_shift_click_extends_from_anchor() {
    let mut grid = grid(people(), 400, 300);
    let mut clock = PointerClock::new();

    grid.pointer_down(clock.at(cell_point(&grid, 3, 2))).unwrap();
    grid.pointer_up(clock.at(cell_point(&grid, 3, 2))).unwrap();
    let extend = clock.at(cell_point(&grid, 1, 0)).with_modifiers(Modifiers::SHIFT);
    grid.pointer_down(extend).unwrap();

    assert_eq!(grid.selection().normalized(), Some(SelectionRange::new(1, 0, 3, 2)));
}

#[test]
fn test_corner_click_selects_headers_gutter_and_data() {
    let mut grid = grid(people(), 400, 300);
    let clipboard = with_clipboard(&mut grid);
    let mut clock = PointerClock::new();

    assert!(grid.pointer_down(clock.at((1.0, 1.0))).unwrap());
    let range = grid.selection().normalized().unwrap();
    assert!(range.includes_header());
    assert!(range.includes_gutter());
    assert_eq!(range, SelectionRange::new(-1, -1, 4, 2));

    grid.copy_selection().unwrap();
    let text = clipboard.contents().unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("#\tname\tcount\tjoined"));
    assert_eq!(lines.next(), Some("1\talpha\t1,500\t2024-01-05"));
    assert_eq!(text.lines().count(), 6);
}

#[test]
fn test_row_header_click_pins_row_without_touching_range() {
    let mut grid = grid(people(), 400, 300);
    let mut clock = PointerClock::new();

    grid.pointer_down(clock.at(cell_point(&grid, 0, 0))).unwrap();
    grid.pointer_up(clock.at(cell_point(&grid, 0, 0))).unwrap();
    grid.flush().unwrap();

    assert!(grid.pointer_down(clock.at(gutter_point(&grid, 3))).unwrap());
    assert!(grid.selection().selected_rows().contains(&3));
    assert_eq!(grid.selection().range(), Some(SelectionRange::cell(0, 0)));
    assert_eq!(grid.dirty_level(), RenderDirtyLevel::Cells);
}

#[test]
fn test_pointer_moves_are_throttled() {
    let mut grid = grid(people(), 400, 300);
    let mut clock = PointerClock::new();

    let first = clock.at(cell_point(&grid, 0, 0));
    assert!(grid.pointer_move(first).unwrap());
    assert_eq!(grid.hovered_cell(), Some((0, 0)));

    // 5ms later: dropped
    let mut early = first;
    early.x = cell_point(&grid, 1, 1).0;
    early.y = cell_point(&grid, 1, 1).1;
    early.time += std::time::Duration::from_millis(5);
    assert!(!grid.pointer_move(early).unwrap());
    assert_eq!(grid.hovered_cell(), Some((0, 0)));

    assert!(grid.pointer_move(clock.at(cell_point(&grid, 1, 1))).unwrap());
    assert_eq!(grid.hovered_cell(), Some((1, 1)));
}

#[test]
fn test_selection_callback_receives_normalized_range() {
    let mut grid = grid(people(), 400, 300);
    let seen: Rc<RefCell<Vec<Option<SelectionRange>>>> = Rc::default();
    let sink = Rc::clone(&seen);
    grid.set_on_selection_change(Box::new(move |range| sink.borrow_mut().push(range)));
    let mut clock = PointerClock::new();

    grid.pointer_down(clock.at(cell_point(&grid, 2, 2))).unwrap();
    grid.pointer_move(clock.at(cell_point(&grid, 1, 0))).unwrap();
    key(&mut grid, KeyCode::Escape, Modifiers::NONE);

    let seen = seen.borrow();
    assert_eq!(seen.first(), Some(&Some(SelectionRange::cell(2, 2))));
    assert_eq!(seen.get(1), Some(&Some(SelectionRange::new(1, 0, 2, 2))));
    assert_eq!(seen.last(), Some(&None));
}

// ========================================================================
// Keyboard
// ========================================================================

#[test]
fn test_arrows_move_and_shift_extends() {
    let mut grid = grid(people(), 400, 300);

    key(&mut grid, KeyCode::Down, Modifiers::NONE);
    key(&mut grid, KeyCode::Down, Modifiers::NONE);
    assert_eq!(grid.selection().active_cell(), Some((2, 0)));

    key(&mut grid, KeyCode::Right, Modifiers::SHIFT);
    assert_eq!(grid.selection().normalized(), Some(SelectionRange::new(2, 0, 2, 1)));

    // Clamped at the edges
    for _ in 0..10 {
        key(&mut grid, KeyCode::Up, Modifiers::NONE);
    }
    assert_eq!(grid.selection().active_cell(), Some((0, 1)));
}

#[test]
fn test_home_end_and_ctrl_variants() {
    let mut grid = grid(people(), 400, 300);

    key(&mut grid, KeyCode::Down, Modifiers::NONE);
    key(&mut grid, KeyCode::End, Modifiers::NONE);
    assert_eq!(grid.selection().active_cell(), Some((1, 2)));
    key(&mut grid, KeyCode::Home, Modifiers::NONE);
    assert_eq!(grid.selection().active_cell(), Some((1, 0)));

    key(&mut grid, KeyCode::End, Modifiers::CTRL);
    assert_eq!(grid.selection().active_cell(), Some((4, 2)));
    key(&mut grid, KeyCode::Home, Modifiers::META);
    assert_eq!(grid.selection().active_cell(), Some((0, 0)));
}

#[test]
fn test_select_all_covers_data_only() {
    let mut grid = grid(people(), 400, 300);
    let clipboard = with_clipboard(&mut grid);

    assert!(key(&mut grid, KeyCode::Char('a'), Modifiers::CTRL));
    let range = grid.selection().normalized().unwrap();
    assert_eq!(range, SelectionRange::new(0, 0, 4, 2));
    assert!(!range.includes_header());

    key(&mut grid, KeyCode::Char('C'), Modifiers::META);
    let text = clipboard.contents().unwrap();
    assert_eq!(text.lines().count(), 5);
    assert_eq!(text.lines().nth(3), Some("delta\t7\t"));
}

#[test]
fn test_escape_clears_selection_and_pins() {
    let mut grid = grid(people(), 400, 300);
    key(&mut grid, KeyCode::Down, Modifiers::NONE);
    grid.flush().unwrap();

    assert!(key(&mut grid, KeyCode::Escape, Modifiers::NONE));
    assert_eq!(grid.selection().range(), None);
    assert!(grid.take_stats_rebind());
    // Nothing left to clear
    assert!(!key(&mut grid, KeyCode::Escape, Modifiers::NONE));
}

#[test]
fn test_copy_without_selection_is_not_handled() {
    let mut grid = grid(people(), 400, 300);
    let clipboard = with_clipboard(&mut grid);
    assert!(!grid.copy_selection().unwrap());
    assert_eq!(clipboard.contents(), None);
}

#[test]
fn test_clipboard_failure_is_not_an_error() {
    let mut grid = grid(people(), 400, 300);
    grid.set_clipboard(Box::new(UnavailableClipboard));
    key(&mut grid, KeyCode::Down, Modifiers::NONE);
    assert!(grid.copy_selection().unwrap());
}

#[test]
fn test_value_readout_prefers_hover_over_active_cell() {
    let mut grid = grid(people(), 400, 300);
    assert_eq!(grid.value_readout().unwrap(), None);

    key(&mut grid, KeyCode::Down, Modifiers::NONE);
    key(&mut grid, KeyCode::Right, Modifiers::NONE);
    assert_eq!(grid.value_readout().unwrap().as_deref(), Some("count: 20"));

    let mut clock = PointerClock::new();
    grid.pointer_move(clock.at(cell_point(&grid, 0, 0))).unwrap();
    assert_eq!(grid.value_readout().unwrap().as_deref(), Some("name: alpha"));
}

// ========================================================================
// Provider failures
// ========================================================================

#[test]
fn test_initialize_propagates_metadata_failure() {
    let provider = RecordingProvider::new(people());
    provider.set_fail_metadata(true);
    let mut grid = GridController::headless(Box::new(provider), 400, 300);

    assert!(matches!(grid.initialize(), Err(GridError::Metadata(_))));
    assert!(!grid.is_initialized());
    // Input before a successful initialize is ignored
    let mut clock = PointerClock::new();
    assert!(!grid.pointer_down(clock.at((100.0, 100.0))).unwrap());
    assert!(!grid.key_down(KeyEvent::plain(KeyCode::Down)).unwrap());
}

#[test]
fn test_failed_flush_keeps_dirty_tier_for_retry() {
    let provider = RecordingProvider::new(people());
    let mut grid = grid(provider.clone(), 400, 300);

    provider.set_fail_fetch(true);
    grid.invalidate();
    assert!(matches!(grid.flush(), Err(GridError::Fetch { .. })));
    assert_eq!(grid.dirty_level(), RenderDirtyLevel::Cells);

    provider.set_fail_fetch(false);
    let pass = grid.flush().unwrap();
    assert!(pass.base);
    assert_eq!(grid.dirty_level(), RenderDirtyLevel::None);
}

#[test]
fn test_copy_propagates_fetch_failure() {
    let provider = RecordingProvider::new(people());
    let mut grid = grid(provider.clone(), 400, 300);
    with_clipboard(&mut grid);
    key(&mut grid, KeyCode::Char('a'), Modifiers::CTRL);

    provider.set_fail_fetch(true);
    assert!(grid.copy_selection().is_err());
}

#[test]
fn test_release_sets_the_drag_end_even_when_moves_are_throttled() {
    let mut grid = grid(people(), 400, 300);
    let mut clock = PointerClock::new();

    grid.pointer_down(clock.at(cell_point(&grid, 2, 1))).unwrap();
    let first = clock.at(cell_point(&grid, 1, 1));
    assert!(grid.pointer_move(first).unwrap());

    // 8ms after the last accepted move: held back
    let (x, y) = cell_point(&grid, 0, 2);
    let mut quick = first;
    quick.x = x;
    quick.y = y;
    quick.time += std::time::Duration::from_millis(8);
    assert!(!grid.pointer_move(quick).unwrap());
    assert!(grid.has_pending_pointer());

    let mut up = quick;
    up.time += std::time::Duration::from_millis(1);
    assert!(grid.pointer_up(up).unwrap());

    assert!(!grid.has_pending_pointer());
    assert_eq!(grid.selection().normalized(), Some(SelectionRange::new(0, 1, 2, 2)));
}

#[test]
fn test_held_back_move_lands_on_the_next_flush() {
    let mut grid = grid(people(), 400, 300);
    let mut clock = PointerClock::new();

    let first = clock.at(cell_point(&grid, 0, 0));
    assert!(grid.pointer_move(first).unwrap());

    let (x, y) = cell_point(&grid, 3, 2);
    let mut quick = first;
    quick.x = x;
    quick.y = y;
    quick.time += std::time::Duration::from_millis(5);
    assert!(!grid.pointer_move(quick).unwrap());
    assert_eq!(grid.hovered_cell(), Some((0, 0)));

    // Pointer rests; the next frame picks up where it stopped
    let pass = grid.flush().unwrap();
    assert!(pass.hover);
    assert_eq!(grid.hovered_cell(), Some((3, 2)));
    assert!(!grid.has_pending_pointer());
}
