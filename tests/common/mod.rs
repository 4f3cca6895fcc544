//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use gridview::controller::{GridController, PointerEvent};
use gridview::data::{
    CellValue, Column, DataProvider, DataType, DatasetMetadata, InMemoryProvider, ProviderWindow,
    ValueBlock,
};
use gridview::error::{GridError, Result};

/// Wraps an in-memory provider, recording every fetched window and
/// optionally failing metadata or fetch calls
#[derive(Clone)]
pub struct RecordingProvider {
    inner: InMemoryProvider,
    fetches: Rc<RefCell<Vec<ProviderWindow>>>,
    fail_metadata: Rc<Cell<bool>>,
    fail_fetch: Rc<Cell<bool>>,
}

impl RecordingProvider {
    pub fn new(inner: InMemoryProvider) -> Self {
        Self {
            inner,
            fetches: Rc::default(),
            fail_metadata: Rc::default(),
            fail_fetch: Rc::default(),
        }
    }

    /// Windows fetched so far, oldest first
    pub fn fetches(&self) -> Vec<ProviderWindow> {
        self.fetches.borrow().clone()
    }

    pub fn clear_fetches(&self) {
        self.fetches.borrow_mut().clear();
    }

    pub fn set_fail_metadata(&self, fail: bool) {
        self.fail_metadata.set(fail);
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.set(fail);
    }
}

impl DataProvider for RecordingProvider {
    fn metadata(&self) -> Result<DatasetMetadata> {
        if self.fail_metadata.get() {
            return Err(GridError::Metadata("backend offline".to_string()));
        }
        self.inner.metadata()
    }

    fn fetch(&self, window: ProviderWindow) -> Result<ValueBlock> {
        self.fetches.borrow_mut().push(window);
        if self.fail_fetch.get() {
            return Err(GridError::Fetch {
                window,
                message: "backend offline".to_string(),
            });
        }
        self.inner.fetch(window)
    }
}

fn date(y: i32, m: u32, d: u32) -> CellValue {
    NaiveDate::from_ymd_opt(y, m, d)
        .map(CellValue::Date)
        .unwrap_or_default()
}

/// Five people with a string, an integer and a date column
pub fn people() -> InMemoryProvider {
    let columns = vec![
        Column::new("name", DataType::String),
        Column::new("count", DataType::Integer),
        Column::new("joined", DataType::Date),
    ];
    let rows = vec![
        vec!["alpha".into(), CellValue::Int(1500), date(2024, 1, 5)],
        vec!["beta".into(), CellValue::Int(20), date(2024, 2, 10)],
        vec!["gamma".into(), CellValue::Null, date(2024, 3, 15)],
        vec!["delta".into(), CellValue::Int(7), CellValue::Null],
        vec!["epsilon".into(), CellValue::Int(123_456), date(2024, 5, 20)],
    ];
    InMemoryProvider::new("people", columns, rows)
}

/// `rows` x `cols` integers where cell (r, c) holds `r * 100 + c`
pub fn numbers(name: &str, rows: usize, cols: usize) -> InMemoryProvider {
    let columns = (0..cols)
        .map(|c| Column::new(format!("column {}", c), DataType::Integer))
        .collect();
    let data = (0..rows)
        .map(|r| (0..cols).map(|c| CellValue::Int((r * 100 + c) as i64)).collect())
        .collect();
    InMemoryProvider::new(name, columns, data)
}

/// Initialized headless controller
pub fn grid(provider: impl DataProvider + 'static, width: u32, height: u32) -> GridController {
    let mut grid = GridController::headless(Box::new(provider), width, height);
    grid.initialize().unwrap();
    grid
}

/// Surface point at the center of data cell (row, col) at the current scroll
pub fn cell_point(grid: &GridController, row: usize, col: usize) -> (f32, f32) {
    let geometry = grid.geometry();
    let scroll = grid.scroll();
    let x = geometry.col_left(grid.layout(), col, scroll.x()) + grid.layout().width(col) as f32 / 2.0;
    let y = geometry.row_top(row, scroll.y()) + geometry.row_height / 2.0;
    (x, y)
}

/// Surface point at the center of column `col`'s header
pub fn header_point(grid: &GridController, col: usize) -> (f32, f32) {
    let geometry = grid.geometry();
    let x = geometry.col_left(grid.layout(), col, grid.scroll().x()) + grid.layout().width(col) as f32 / 2.0;
    (x, geometry.header_height / 2.0)
}

/// Surface point inside the row-index gutter for `row`
pub fn gutter_point(grid: &GridController, row: usize) -> (f32, f32) {
    let geometry = grid.geometry();
    let y = geometry.row_top(row, grid.scroll().y()) + geometry.row_height / 2.0;
    (geometry.gutter_width / 2.0, y)
}

/// Hands out pointer timestamps far enough apart to pass the move throttle
pub struct PointerClock {
    now: Instant,
}

impl PointerClock {
    pub fn new() -> Self {
        Self { now: Instant::now() }
    }

    pub fn at(&mut self, (x, y): (f32, f32)) -> PointerEvent {
        self.now += Duration::from_millis(20);
        PointerEvent::new(x, y, self.now)
    }
}
