//! Grid controller: one dataset's interaction state and redraw wiring
//!
//! Input handlers mutate scroll, selection and hover state and raise the
//! minimal dirty tier. Nothing is painted until [`GridController::flush`],
//! which the host calls once per tick.
//!
//! ```text
//! pointer/wheel/key ──▶ handler ──▶ Scroll/Selection/Hover ──▶ DirtyTracker
//!                                                                  │
//!                     RenderEngine ◀── DataProvider window ◀── flush()
//! ```

mod input;

pub use input::{KeyCode, KeyEvent, Modifiers, PointerEvent, WheelEvent};

use std::ops::Range;
use std::time::{Duration, Instant};

use crate::clipboard::{Clipboard, SystemClipboard};
use crate::config::GridConfig;
use crate::data::{CellValue, DataProvider, DatasetMetadata, ProviderWindow, ValueBlock};
use crate::error::{GridError, Result};
use crate::export::{self, ExportFormat, ExportOptions, SelectedValues};
use crate::format::{plain_text, FormatPipeline};
use crate::grid::{
    gutter_width, hit_test, Axis, ColumnLayout, DirtyTracker, GridGeometry, HitTarget,
    HoverModel, RenderDirtyLevel, ScrollModel, ScrollbarPart, SelectionModel, SelectionRange,
    HEADER,
};
use crate::render::{text_renderer_for, BlockText, RenderEngine, RenderInput, RenderPass, TextRenderer};
use crate::theme::Theme;

/// Called with the normalized range whenever the selection or pins change
pub type SelectionCallback = Box<dyn FnMut(Option<SelectionRange>)>;

/// Label used for the row-index gutter when it is part of an export
const GUTTER_LABEL: &str = "#";

pub struct GridController {
    provider: Box<dyn DataProvider>,
    config: GridConfig,
    theme: Theme,
    engine: RenderEngine,
    clipboard: Box<dyn Clipboard>,

    metadata: Option<DatasetMetadata>,
    pipeline: Option<FormatPipeline>,

    geometry: GridGeometry,
    layout: ColumnLayout,
    scroll: ScrollModel,
    selection: SelectionModel,
    hover: HoverModel,
    dirty: DirtyTracker,

    font_size: f32,
    pointer_interval: Duration,
    last_pointer_move: Option<Instant>,
    /// Latest move dropped by the throttle, applied on the next flush
    pending_move: Option<PointerEvent>,
    /// Last known pointer position over the surface
    pointer_at: Option<(f32, f32)>,
    stats_rebind: bool,
    on_selection_change: Option<SelectionCallback>,
}

impl GridController {
    pub fn new(
        provider: Box<dyn DataProvider>,
        config: GridConfig,
        theme: Theme,
        text: Box<dyn TextRenderer>,
        width: u32,
        height: u32,
    ) -> Self {
        let scroll = ScrollModel::new(
            config.scrollbar_thickness as f32,
            config.min_thumb_length as f32,
        );
        Self {
            provider,
            engine: RenderEngine::new(width as usize, height as usize, text),
            clipboard: Box::new(SystemClipboard::new()),
            metadata: None,
            pipeline: None,
            geometry: GridGeometry::default(),
            layout: ColumnLayout::default(),
            scroll,
            selection: SelectionModel::new(config.multi_select_columns),
            hover: HoverModel::default(),
            dirty: DirtyTracker::default(),
            font_size: config.clamp_font_size(config.font_size),
            pointer_interval: Duration::from_millis(config.pointer_move_interval_ms),
            last_pointer_move: None,
            pending_move: None,
            pointer_at: None,
            stats_rebind: false,
            on_selection_change: None,
            theme,
            config,
        }
    }

    /// Controller using the configured font (or block glyphs if none loads)
    pub fn with_config(provider: Box<dyn DataProvider>, config: GridConfig, theme: Theme, width: u32, height: u32) -> Self {
        let text = text_renderer_for(config.font_path.as_deref());
        Self::new(provider, config, theme, text, width, height)
    }

    /// Default config and light theme with block glyphs; no font files touched
    pub fn headless(provider: Box<dyn DataProvider>, width: u32, height: u32) -> Self {
        Self::new(
            provider,
            GridConfig::default(),
            Theme::light(),
            Box::new(BlockText),
            width,
            height,
        )
    }

    pub fn set_clipboard(&mut self, clipboard: Box<dyn Clipboard>) {
        self.clipboard = clipboard;
    }

    pub fn set_on_selection_change(&mut self, callback: SelectionCallback) {
        self.on_selection_change = Some(callback);
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Fetch metadata, lay out columns and paint the first full frame
    pub fn initialize(&mut self) -> Result<()> {
        let metadata = self.provider.metadata()?;
        tracing::info!(
            dataset = %metadata.name,
            rows = metadata.total_rows,
            columns = metadata.total_columns,
            "grid initialized"
        );
        self.pipeline = Some(FormatPipeline::new(
            self.config.format.clone(),
            self.theme.clone(),
            &metadata.columns,
        ));
        self.metadata = Some(metadata);
        self.selection = SelectionModel::new(self.config.multi_select_columns);
        self.hover = HoverModel::default();
        self.scroll.scroll_to(0.0, 0.0);
        self.relayout();
        self.dirty.raise(RenderDirtyLevel::Cells);
        self.flush()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.metadata.is_some()
    }

    /// Resize the surface. Returns false (and does nothing) if unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self.engine.resize(width as usize, height as usize) {
            return false;
        }
        self.relayout();
        self.dirty.raise(RenderDirtyLevel::Cells);
        true
    }

    /// Recompute layout and repaint everything on the next flush
    pub fn invalidate(&mut self) {
        self.relayout();
        self.dirty.raise(RenderDirtyLevel::Cells);
    }

    fn row_height(&self) -> f32 {
        self.config.row_height_for(self.font_size) as f32
    }

    fn relayout(&mut self) {
        let Some(metadata) = self.metadata.as_ref() else {
            return;
        };
        let (width, height) = self.engine.dimensions();
        let row_height = self.row_height();
        let padding = self.config.cell_padding as f64;
        let min_width = self.config.min_column_width as f64;
        let font_size = self.font_size;
        let engine = &self.engine;
        let measure = |s: &str| engine.measure_text(s, font_size);

        let gutter = gutter_width(metadata.total_rows, measure, padding) as f32;
        let headers: Vec<&str> = metadata.columns.iter().map(|c| c.header_text()).collect();
        let (geometry, layout) = GridGeometry::resolve(
            width as f32,
            height as f32,
            row_height,
            gutter,
            row_height,
            self.config.scrollbar_thickness as f32,
            metadata.total_rows,
            |available| ColumnLayout::compute(&headers, measure, min_width, padding, available),
        );
        let content_height = metadata.total_rows as f64 * row_height as f64;
        self.scroll
            .set_extent(layout.total_width(), content_height, geometry.data_rect());
        self.geometry = geometry;
        self.layout = layout;
        self.refresh_hover();
    }

    /// Paint the layers implied by the accumulated dirty tier.
    ///
    /// On a provider failure the tier is kept so the next flush retries.
    pub fn flush(&mut self) -> Result<RenderPass> {
        if let Some(event) = self.pending_move.take() {
            self.apply_move(event);
        }
        let level = self.dirty.take();
        if level == RenderDirtyLevel::None {
            return Ok(RenderPass::default());
        }
        let (Some(metadata), Some(pipeline)) = (self.metadata.as_ref(), self.pipeline.as_ref())
        else {
            return Ok(RenderPass::default());
        };
        let input = RenderInput {
            metadata,
            geometry: &self.geometry,
            layout: &self.layout,
            scroll: &self.scroll,
            selection: &self.selection,
            hover: self.hover.cell(),
            pipeline,
            font_size: self.font_size,
            cell_padding: self.config.cell_padding as f32,
            border_width: self.config.border_width as f32,
        };
        match self.engine.render(&input, self.provider.as_ref(), level) {
            Ok(pass) => Ok(pass),
            Err(e) => {
                self.dirty.raise(level);
                Err(e)
            }
        }
    }

    /// Composited ARGB pixels of the last painted layers
    pub fn frame(&mut self) -> &[u32] {
        self.engine.compose()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn metadata(&self) -> Option<&DatasetMetadata> {
        self.metadata.as_ref()
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn engine(&self) -> &RenderEngine {
        &self.engine
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn scroll(&self) -> &ScrollModel {
        &self.scroll
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn hovered_cell(&self) -> Option<(i64, i64)> {
        self.hover.cell()
    }

    pub fn dirty_level(&self) -> RenderDirtyLevel {
        self.dirty.level()
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    fn require_metadata(&self) -> Result<&DatasetMetadata> {
        self.metadata.as_ref().ok_or(GridError::NotInitialized)
    }

    fn totals(&self) -> Option<(usize, usize)> {
        self.metadata
            .as_ref()
            .map(|m| (m.total_rows, m.columns.len()))
            .filter(|&(rows, cols)| rows > 0 && cols > 0)
    }

    /// Key of the pinned column the stats panel should show
    pub fn primary_column_key(&self) -> Option<String> {
        let metadata = self.metadata.as_ref()?;
        let col = self.selection.primary_column()?;
        metadata.columns.get(col).map(|c| c.key.clone())
    }

    /// Whether column pins changed since the last call
    pub fn take_stats_rebind(&mut self) -> bool {
        std::mem::take(&mut self.stats_rebind)
    }

    fn notify_selection(&mut self) {
        let range = self.selection.normalized();
        if let Some(callback) = self.on_selection_change.as_mut() {
            callback(range);
        }
    }

    // =========================================================================
    // Pointer
    // =========================================================================

    fn axis_coord(axis: Axis, event: &PointerEvent) -> f32 {
        match axis {
            Axis::Horizontal => event.x,
            Axis::Vertical => event.y,
        }
    }

    fn hit(&self, x: f32, y: f32) -> HitTarget {
        let total_rows = self.metadata.as_ref().map_or(0, |m| m.total_rows);
        hit_test(&self.geometry, &self.layout, &self.scroll, total_rows, x, y)
    }

    pub fn pointer_down(&mut self, event: PointerEvent) -> Result<bool> {
        let Some((total_rows, total_cols)) = self.totals() else {
            return Ok(false);
        };
        self.pending_move = None;
        self.pointer_at = Some((event.x, event.y));
        match self.hit(event.x, event.y) {
            HitTarget::Scrollbar(axis, ScrollbarPart::Thumb) => {
                self.scroll.begin_drag(axis, Self::axis_coord(axis, &event));
                self.dirty.raise(RenderDirtyLevel::Cells);
            }
            HitTarget::Scrollbar(axis, _) => {
                if self.scroll.page_toward(axis, Self::axis_coord(axis, &event)) {
                    self.dirty.raise(RenderDirtyLevel::Cells);
                    self.refresh_hover();
                }
            }
            HitTarget::Corner => {
                self.selection.set_range(SelectionRange::new(
                    HEADER,
                    HEADER,
                    total_rows as i64 - 1,
                    total_cols as i64 - 1,
                ));
                self.dirty.raise(RenderDirtyLevel::Selection);
                self.notify_selection();
            }
            HitTarget::ColumnHeader(col) => {
                self.selection.toggle_column(col);
                self.stats_rebind = true;
                // Pinned headers are painted on the base layer
                self.dirty.raise(RenderDirtyLevel::Cells);
                self.notify_selection();
            }
            HitTarget::RowHeader(row) => {
                self.selection.toggle_row(row);
                self.dirty.raise(RenderDirtyLevel::Cells);
                self.notify_selection();
            }
            HitTarget::Cell { row, col } => {
                let (row, col) = (row as i64, col as i64);
                if event.modifiers.shift() && self.selection.range().is_some() {
                    self.selection.move_to(row, col, true);
                } else {
                    self.selection.begin_drag(row, col);
                }
                self.dirty.raise(RenderDirtyLevel::Selection);
                self.notify_selection();
            }
            HitTarget::None => return Ok(false),
        }
        Ok(true)
    }

    /// Nearest data cell to a point, clamping into the data area
    fn cell_near(&self, x: f32, y: f32) -> Option<(i64, i64)> {
        let (total_rows, total_cols) = self.totals()?;
        let data = self.geometry.data_rect();
        if data.is_empty() {
            return None;
        }
        let x = x.clamp(data.x, data.right() - 1.0);
        let y = y.clamp(data.y, data.bottom() - 1.0);
        let row = self
            .geometry
            .row_at(y, self.scroll.y(), total_rows)
            .unwrap_or(total_rows - 1);
        let col = self
            .geometry
            .col_at(&self.layout, x, self.scroll.x())
            .unwrap_or(total_cols - 1);
        Some((row as i64, col as i64))
    }

    /// Throttled to one move per configured interval.
    ///
    /// A move inside the interval is held back, not lost: the latest one is
    /// applied by the next [`flush`](Self::flush) or pointer-up.
    pub fn pointer_move(&mut self, event: PointerEvent) -> Result<bool> {
        if let Some(last) = self.last_pointer_move {
            if event.time.saturating_duration_since(last) < self.pointer_interval {
                self.pending_move = Some(event);
                return Ok(false);
            }
        }
        self.pending_move = None;
        Ok(self.apply_move(event))
    }

    /// Whether a throttled move is waiting for the next flush
    pub fn has_pending_pointer(&self) -> bool {
        self.pending_move.is_some()
    }

    fn apply_move(&mut self, event: PointerEvent) -> bool {
        self.last_pointer_move = Some(event.time);
        self.pointer_at = Some((event.x, event.y));

        if let Some(axis) = self.scroll.drag_axis() {
            if self.scroll.drag_to(Self::axis_coord(axis, &event)) {
                self.dirty.raise(RenderDirtyLevel::Cells);
            }
            return true;
        }

        if self.selection.is_dragging() {
            self.drag_selection_to(event.x, event.y);
            return true;
        }

        let level = self.hover.set(self.hit(event.x, event.y).grid_position());
        self.dirty.raise(level);
        level != RenderDirtyLevel::None
    }

    fn drag_selection_to(&mut self, x: f32, y: f32) {
        if let Some((row, col)) = self.cell_near(x, y) {
            if self.selection.update_drag(row, col) {
                self.dirty.raise(RenderDirtyLevel::Selection);
                self.notify_selection();
            }
        }
    }

    /// Re-run the hover hit-test at the last pointer position after the
    /// content moved underneath it
    fn refresh_hover(&mut self) {
        if self.selection.is_dragging() || self.scroll.is_dragging() {
            return;
        }
        let Some((x, y)) = self.pointer_at else {
            return;
        };
        let level = self.hover.set(self.hit(x, y).grid_position());
        self.dirty.raise(level);
    }

    /// Ends any drag. A selection drag takes its final end anchor from the
    /// release position.
    pub fn pointer_up(&mut self, event: PointerEvent) -> Result<bool> {
        self.pending_move = None;
        self.pointer_at = Some((event.x, event.y));
        let mut handled = false;
        if let Some(axis) = self.scroll.drag_axis() {
            self.scroll.drag_to(Self::axis_coord(axis, &event));
            self.scroll.end_drag();
            self.dirty.raise(RenderDirtyLevel::Cells);
            handled = true;
        }
        if self.selection.is_dragging() {
            self.drag_selection_to(event.x, event.y);
            self.selection.end_drag();
            handled = true;
        }
        self.refresh_hover();
        Ok(handled)
    }

    /// Pointer left the surface
    pub fn pointer_leave(&mut self) -> bool {
        self.pending_move = None;
        self.pointer_at = None;
        let level = self.hover.clear();
        self.dirty.raise(level);
        level != RenderDirtyLevel::None
    }

    // =========================================================================
    // Wheel and zoom
    // =========================================================================

    /// Cmd/Ctrl zooms; Shift turns vertical motion horizontal
    pub fn wheel(&mut self, event: WheelEvent) -> Result<bool> {
        if !self.is_initialized() {
            return Ok(false);
        }
        if event.modifiers.has_cmd() {
            let step = if event.delta_y < 0.0 {
                1.0
            } else if event.delta_y > 0.0 {
                -1.0
            } else {
                return Ok(false);
            };
            return Ok(self.set_font_size(self.font_size + step));
        }
        let (dx, dy) = if event.modifiers.shift() && event.delta_x == 0.0 {
            (event.delta_y, 0.0)
        } else {
            (event.delta_x, event.delta_y)
        };
        if self.scroll.scroll_by(dx as f64, dy as f64) {
            self.dirty.raise(RenderDirtyLevel::Cells);
            self.refresh_hover();
            return Ok(true);
        }
        Ok(false)
    }

    /// Change the font size within the configured range and relayout.
    /// Returns false if the clamped size is unchanged.
    pub fn set_font_size(&mut self, size: f32) -> bool {
        let size = self.config.clamp_font_size(size);
        if size == self.font_size {
            return false;
        }
        tracing::debug!(from = self.font_size, to = size, "zoom");
        self.font_size = size;
        self.relayout();
        self.dirty.raise(RenderDirtyLevel::Cells);
        true
    }

    /// Programmatic scroll, clamped. Returns true if the offset changed.
    pub fn scroll_to(&mut self, x: f64, y: f64) -> bool {
        let before = (self.scroll.x(), self.scroll.y());
        self.scroll.scroll_to(x, y);
        let changed = before != (self.scroll.x(), self.scroll.y());
        if changed {
            self.dirty.raise(RenderDirtyLevel::Cells);
            self.refresh_hover();
        }
        changed
    }

    /// Programmatic selection, as if dragged from start to end anchor
    pub fn select_range(&mut self, range: SelectionRange) {
        self.selection.set_range(range);
        self.dirty.raise(RenderDirtyLevel::Selection);
        self.notify_selection();
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    fn page_rows(&self) -> i64 {
        if self.geometry.row_height <= 0.0 {
            return 1;
        }
        ((self.scroll.viewport_height() / self.geometry.row_height as f64).floor() as i64).max(1)
    }

    pub fn key_down(&mut self, event: KeyEvent) -> Result<bool> {
        let Some((total_rows, total_cols)) = self.totals() else {
            return Ok(false);
        };
        let mods = event.modifiers;
        let extend = mods.shift();
        let last_row = total_rows as i64 - 1;
        let last_col = total_cols as i64 - 1;

        let delta = match event.key {
            KeyCode::Up => Some((-1, 0)),
            KeyCode::Down => Some((1, 0)),
            KeyCode::Left => Some((0, -1)),
            KeyCode::Right => Some((0, 1)),
            KeyCode::PageUp => Some((-self.page_rows(), 0)),
            KeyCode::PageDown => Some((self.page_rows(), 0)),
            KeyCode::Home if !mods.has_cmd() => Some((0, -last_col - 1)),
            KeyCode::End if !mods.has_cmd() => Some((0, last_col + 1)),
            _ => None,
        };

        let target = match (event.key, delta) {
            (_, Some((d_row, d_col))) => {
                self.selection
                    .move_active(d_row, d_col, extend, total_rows, total_cols)
            }
            (KeyCode::Home, None) => {
                self.selection.move_to(0, 0, extend);
                Some((0, 0))
            }
            (KeyCode::End, None) => {
                self.selection.move_to(last_row, last_col, extend);
                Some((last_row, last_col))
            }
            (KeyCode::Escape, None) => {
                let changed = self.selection.clear();
                if changed {
                    self.stats_rebind = true;
                    self.dirty.raise(RenderDirtyLevel::Cells);
                    self.notify_selection();
                }
                return Ok(changed);
            }
            (KeyCode::Char('a'), None) if mods.has_cmd() => {
                if self.selection.select_all(total_rows, total_cols) {
                    self.dirty.raise(RenderDirtyLevel::Selection);
                    self.notify_selection();
                }
                return Ok(true);
            }
            (KeyCode::Char('c'), None) if mods.has_cmd() => return self.copy_selection(),
            _ => return Ok(false),
        };

        let Some((row, col)) = target else {
            return Ok(false);
        };
        self.ensure_visible(row.max(0) as usize, col.max(0) as usize);
        self.dirty.raise(RenderDirtyLevel::Selection);
        self.notify_selection();
        Ok(true)
    }

    /// Scroll so the cell is on screen, centering it on each axis where it
    /// was off screen. Returns true if the scroll offset changed.
    pub fn ensure_visible(&mut self, row: usize, col: usize) -> bool {
        let row_height = self.geometry.row_height as f64;
        let viewport_h = self.scroll.viewport_height();
        let viewport_w = self.scroll.viewport_width();
        let (mut x, mut y) = (self.scroll.x(), self.scroll.y());

        let top = row as f64 * row_height;
        if top < y || top + row_height > y + viewport_h {
            y = top - viewport_h / 2.0;
        }
        if col < self.layout.len() {
            let left = self.layout.offset(col);
            let right = left + self.layout.width(col);
            if left < x || right > x + viewport_w {
                x = left - viewport_w / 2.0;
            }
        }

        let before = (self.scroll.x(), self.scroll.y());
        self.scroll.scroll_to(x, y);
        let changed = before != (self.scroll.x(), self.scroll.y());
        if changed {
            self.dirty.raise(RenderDirtyLevel::Cells);
            self.refresh_hover();
        }
        changed
    }

    // =========================================================================
    // Data access and export
    // =========================================================================

    fn fetch_range(&self, rows: Range<usize>, cols: Range<usize>) -> Result<Option<ValueBlock>> {
        let window = ProviderWindow::new(rows.start, rows.end, cols.start, cols.end);
        if window.is_empty() {
            return Ok(None);
        }
        self.provider.fetch(window).map(Some)
    }

    /// Normalized selection clipped to the dataset, plus its fetched values
    fn selection_window(&self) -> Result<Option<SelectionWindow>> {
        let Some(range) = self.selection.normalized() else {
            return Ok(None);
        };
        let metadata = self.require_metadata()?;
        let rows = clip(range.data_rows(), metadata.total_rows);
        let cols = clip(range.data_cols(), metadata.columns.len());
        let block = self.fetch_range(rows.clone(), cols.clone())?;
        Ok(Some(SelectionWindow {
            range,
            rows,
            cols,
            block,
        }))
    }

    /// Header labels and pipeline-formatted rows for the current selection
    pub fn get_selected_formatted_values(&self) -> Result<SelectedValues> {
        let Some(SelectionWindow {
            range,
            rows,
            cols,
            block,
        }) = self.selection_window()?
        else {
            return Ok(SelectedValues::default());
        };
        let metadata = self.require_metadata()?;
        let pipeline = self.pipeline.as_ref().ok_or(GridError::NotInitialized)?;
        let gutter = range.includes_gutter();

        let mut headers = Vec::with_capacity(cols.len() + 1);
        if gutter {
            headers.push(GUTTER_LABEL.to_string());
        }
        headers.extend(cols.clone().map(|c| metadata.columns[c].header_text().to_string()));

        let null = CellValue::Null;
        let values = rows
            .map(|row| {
                let mut line = Vec::with_capacity(cols.len() + 1);
                if gutter {
                    line.push((row + 1).to_string());
                }
                for col in cols.clone() {
                    let value = block.as_ref().and_then(|b| b.get(row, col)).unwrap_or(&null);
                    line.push(pipeline.format(value, col).text);
                }
                line
            })
            .collect();

        Ok(SelectedValues {
            headers,
            rows: values,
        })
    }

    /// Tab-separated plain text for the clipboard: raw values with locale
    /// number grouping, not the column-typed pipeline
    pub fn selection_plain_text(&self) -> Result<Option<String>> {
        let Some(SelectionWindow {
            range,
            rows,
            cols,
            block,
        }) = self.selection_window()?
        else {
            return Ok(None);
        };
        let metadata = self.require_metadata()?;
        let locale = self
            .pipeline
            .as_ref()
            .ok_or(GridError::NotInitialized)?
            .locale();
        let gutter = range.includes_gutter();

        let mut lines = Vec::with_capacity(rows.len() + 1);
        if range.includes_header() {
            let mut fields: Vec<&str> = Vec::with_capacity(cols.len() + 1);
            if gutter {
                fields.push(GUTTER_LABEL);
            }
            fields.extend(cols.clone().map(|c| metadata.columns[c].header_text()));
            lines.push(fields.join("\t"));
        }
        let null = CellValue::Null;
        for row in rows {
            let mut fields = Vec::with_capacity(cols.len() + 1);
            if gutter {
                fields.push((row + 1).to_string());
            }
            for col in cols.clone() {
                let value = block.as_ref().and_then(|b| b.get(row, col)).unwrap_or(&null);
                fields.push(plain_text(value, locale));
            }
            lines.push(fields.join("\t"));
        }
        Ok(Some(lines.join("\n")))
    }

    /// Copy the selection as plain TSV. Clipboard failures are logged and
    /// still count as handled; provider failures propagate.
    pub fn copy_selection(&mut self) -> Result<bool> {
        let Some(text) = self.selection_plain_text()? else {
            return Ok(false);
        };
        match self.clipboard.set_text(&text) {
            Ok(()) => tracing::debug!(bytes = text.len(), "copied selection"),
            Err(e) => tracing::warn!("Failed to copy selection: {}", e),
        }
        Ok(true)
    }

    pub fn export(&self, format: ExportFormat, options: ExportOptions) -> Result<String> {
        let values = self.get_selected_formatted_values()?;
        export::export(&values, format, options)
    }

    /// Every value of one column, for statistics
    pub fn get_column_values(&self, key: &str) -> Result<Vec<CellValue>> {
        let metadata = self.require_metadata()?;
        let col = metadata
            .column_index(key)
            .ok_or_else(|| GridError::UnknownColumn(key.to_string()))?;
        let Some(block) = self.fetch_range(0..metadata.total_rows, col..col + 1)? else {
            return Ok(Vec::new());
        };
        Ok(block
            .rows
            .into_iter()
            .map(|mut row| if row.is_empty() { CellValue::Null } else { row.swap_remove(0) })
            .collect())
    }

    /// `"<header>: <formatted value>"` for the hovered data cell, or the
    /// active cell when nothing is hovered
    pub fn value_readout(&self) -> Result<Option<String>> {
        let (Some(metadata), Some(pipeline)) = (self.metadata.as_ref(), self.pipeline.as_ref())
        else {
            return Ok(None);
        };
        let hovered = self.hover.cell().filter(|&(r, c)| r >= 0 && c >= 0);
        let Some((row, col)) = hovered.or_else(|| self.selection.active_cell()) else {
            return Ok(None);
        };
        if row < 0 || col < 0 {
            return Ok(None);
        }
        let (row, col) = (row as usize, col as usize);
        let Some(column) = metadata.columns.get(col) else {
            return Ok(None);
        };
        if row >= metadata.total_rows {
            return Ok(None);
        }
        let block = self.fetch_range(row..row + 1, col..col + 1)?;
        let null = CellValue::Null;
        let value = block.as_ref().and_then(|b| b.get(row, col)).unwrap_or(&null);
        Ok(Some(format!(
            "{}: {}",
            column.header_text(),
            pipeline.format(value, col).text
        )))
    }
}

struct SelectionWindow {
    range: SelectionRange,
    rows: Range<usize>,
    cols: Range<usize>,
    block: Option<ValueBlock>,
}

fn clip(range: Range<usize>, len: usize) -> Range<usize> {
    range.start.min(len)..range.end.min(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::data::{Column, DataType, InMemoryProvider};

    fn provider(rows: usize) -> InMemoryProvider {
        let columns = vec![
            Column::new("name", DataType::String),
            Column::new("qty", DataType::Integer),
        ];
        let data = (0..rows)
            .map(|i| vec![CellValue::Text(format!("item {}", i)), CellValue::Int(i as i64 * 1000)])
            .collect();
        InMemoryProvider::new("items", columns, data)
    }

    fn controller(rows: usize) -> GridController {
        let mut grid = GridController::headless(Box::new(provider(rows)), 400, 300);
        grid.initialize().unwrap();
        grid
    }

    #[test]
    fn test_initialize_paints_everything() {
        let grid = controller(10);
        assert!(grid.is_initialized());
        assert_eq!(grid.dirty_level(), RenderDirtyLevel::None);
        assert_eq!(grid.layout().len(), 2);
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut grid = controller(10);
        assert!(!grid.resize(400, 300));
        assert!(grid.resize(500, 300));
        assert_eq!(grid.dirty_level(), RenderDirtyLevel::Cells);
    }

    #[test]
    fn test_plain_copy_uses_locale_grouping() {
        let mut grid = controller(5);
        let clipboard = MemoryClipboard::new();
        grid.set_clipboard(Box::new(clipboard.clone()));
        grid.selection.set_range(SelectionRange::new(1, 0, 2, 1));
        assert!(grid.copy_selection().unwrap());
        assert_eq!(
            clipboard.contents().as_deref(),
            Some("item 1\t1,000\nitem 2\t2,000")
        );
    }

    #[test]
    fn test_column_values_for_unknown_key() {
        let grid = controller(3);
        assert!(matches!(
            grid.get_column_values("missing"),
            Err(GridError::UnknownColumn(_))
        ));
        assert_eq!(grid.get_column_values("qty").unwrap().len(), 3);
    }

    #[test]
    fn test_zoom_clamps_to_range() {
        let mut grid = controller(3);
        assert!(grid.set_font_size(30.0));
        assert_eq!(grid.font_size(), 24.0);
        assert!(!grid.set_font_size(99.0));
    }
}
