//! Benchmarks for layer painting per dirty tier
//!
//! Run with: cargo bench rendering

use gridview::controller::{GridController, PointerEvent, WheelEvent};
use gridview::data::{CellValue, Column, DataType, InMemoryProvider};
use gridview::grid::SelectionRange;
use std::time::{Duration, Instant};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn dataset(rows: usize) -> InMemoryProvider {
    let columns = vec![
        Column::new("id", DataType::Integer),
        Column::new("name", DataType::String),
        Column::new("amount", DataType::Float),
        Column::new("active", DataType::Boolean),
        Column::new("score", DataType::Float),
        Column::new("note", DataType::String),
    ];
    let data = (0..rows)
        .map(|i| {
            vec![
                CellValue::Int(i as i64),
                CellValue::Text(format!("row {}", i)),
                CellValue::Float(i as f64 * 1.25),
                CellValue::Bool(i % 3 == 0),
                if i % 7 == 0 {
                    CellValue::Null
                } else {
                    CellValue::Float((i % 100) as f64 / 3.0)
                },
                CellValue::Text("lorem ipsum dolor".to_string()),
            ]
        })
        .collect();
    InMemoryProvider::new("bench", columns, data)
}

fn grid(width: u32, height: u32) -> GridController {
    let mut grid = GridController::headless(Box::new(dataset(100_000)), width, height);
    grid.initialize().ok();
    grid
}

// ============================================================================
// Full repaints
// ============================================================================

#[divan::bench(args = [800, 1280, 1920, 2560])]
fn full_repaint(bencher: divan::Bencher, width: u32) {
    let height = width * 9 / 16;
    let mut grid = grid(width, height);
    bencher.bench_local(|| {
        grid.invalidate();
        divan::black_box(grid.flush().ok());
    });
}

#[divan::bench]
fn scroll_and_repaint(bencher: divan::Bencher) {
    let mut grid = grid(1280, 720);
    let mut down = true;
    bencher.bench_local(|| {
        let delta = if down { 400.0 } else { -400.0 };
        if !grid.wheel(WheelEvent::new(0.0, delta)).unwrap_or(false) {
            down = !down;
        }
        divan::black_box(grid.flush().ok());
    });
}

// ============================================================================
// Overlay-only repaints
// ============================================================================

#[divan::bench]
fn selection_repaint(bencher: divan::Bencher) {
    let mut grid = grid(1280, 720);
    let mut end = 1i64;
    bencher.bench_local(|| {
        end = end % 20 + 1;
        grid.select_range(SelectionRange::new(0, 0, end, 3));
        divan::black_box(grid.flush().ok());
    });
}

#[divan::bench]
fn hover_repaint(bencher: divan::Bencher) {
    let mut grid = grid(1280, 720);
    let mut time = Instant::now();
    let mut y = 40.0;
    bencher.bench_local(|| {
        time += Duration::from_millis(20);
        y = if y > 600.0 { 40.0 } else { y + 25.0 };
        grid.pointer_move(PointerEvent::new(300.0, y, time)).ok();
        divan::black_box(grid.flush().ok());
    });
}

#[divan::bench(args = [1280, 2560])]
fn compose_layers(bencher: divan::Bencher, width: u32) {
    let mut grid = grid(width, width * 9 / 16);
    bencher.bench_local(|| {
        divan::black_box(grid.frame().len());
    });
}
