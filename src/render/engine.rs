//! Layered grid painter
//!
//! Three independently clearable layers, composited base → selection → hover:
//!
//! - base: headers, row-index gutter, cell backgrounds, text, grid lines,
//!   scrollbar tracks and thumbs
//! - selection: the cell range plus pinned column/row bands
//! - hover: a single cell, or a column/row band
//!
//! A pass repaints only the layers the dirty tier implies. The visible
//! window is fetched from the provider for each base repaint and dropped
//! when the pass ends.

use std::collections::BTreeSet;

use super::frame::{composite_over, Frame};
use super::text::TextRenderer;
use crate::data::{DataProvider, DatasetMetadata};
use crate::error::Result;
use crate::format::{FormatPipeline, TextAlign};
use crate::grid::{
    Axis, ColumnLayout, GridGeometry, Rect, RenderDirtyLevel, ScrollModel, SelectionModel, HEADER,
};

/// One ARGB pixel buffer sized to the surface
#[derive(Debug, Clone, Default)]
pub struct Layer {
    pixels: Vec<u32>,
    width: usize,
    height: usize,
}

impl Layer {
    fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
        }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            0
        }
    }

    fn frame(&mut self) -> Frame<'_> {
        Frame::new(&mut self.pixels, self.width, self.height)
    }

    /// Clear to fully transparent
    fn clear(&mut self) {
        self.pixels.fill(0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Base,
    Selection,
    Hover,
}

/// Which layers a pass painted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderPass {
    pub base: bool,
    pub selection: bool,
    pub hover: bool,
}

impl RenderPass {
    pub fn painted_anything(&self) -> bool {
        self.base || self.selection || self.hover
    }
}

/// Everything a pass reads, borrowed from the controller
pub struct RenderInput<'a> {
    pub metadata: &'a DatasetMetadata,
    pub geometry: &'a GridGeometry,
    pub layout: &'a ColumnLayout,
    pub scroll: &'a ScrollModel,
    pub selection: &'a SelectionModel,
    pub hover: Option<(i64, i64)>,
    pub pipeline: &'a FormatPipeline,
    pub font_size: f32,
    pub cell_padding: f32,
    pub border_width: f32,
}

impl RenderInput<'_> {
    /// Baseline for text vertically centered in a row starting at `top`
    fn baseline(&self, top: f32, height: f32) -> f32 {
        top + (height + self.font_size * 0.7) / 2.0
    }

    fn col_rect(&self, col: usize, top: f32, height: f32) -> Rect {
        Rect::new(
            self.geometry.col_left(self.layout, col, self.scroll.x()),
            top,
            self.layout.width(col) as f32,
            height,
        )
    }

    fn row_rect(&self, row: usize, left: f32, width: f32) -> Rect {
        Rect::new(
            left,
            self.geometry.row_top(row, self.scroll.y()),
            width,
            self.geometry.row_height,
        )
    }
}

pub struct RenderEngine {
    base: Layer,
    selection: Layer,
    hover: Layer,
    composed: Vec<u32>,
    width: usize,
    height: usize,
    text: Box<dyn TextRenderer>,
}

impl RenderEngine {
    pub fn new(width: usize, height: usize, text: Box<dyn TextRenderer>) -> Self {
        Self {
            base: Layer::new(width, height),
            selection: Layer::new(width, height),
            hover: Layer::new(width, height),
            composed: vec![0; width * height],
            width,
            height,
            text,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Reallocate layers. Returns false if the size is unchanged.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        if (width, height) == (self.width, self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        self.base = Layer::new(width, height);
        self.selection = Layer::new(width, height);
        self.hover = Layer::new(width, height);
        self.composed = vec![0; width * height];
        true
    }

    pub fn measure_text(&self, text: &str, size: f32) -> f32 {
        self.text.measure(text, size)
    }

    pub fn layer(&self, kind: LayerKind) -> &Layer {
        match kind {
            LayerKind::Base => &self.base,
            LayerKind::Selection => &self.selection,
            LayerKind::Hover => &self.hover,
        }
    }

    /// Repaint the layers implied by `level`
    pub fn render(
        &mut self,
        input: &RenderInput,
        provider: &dyn DataProvider,
        level: RenderDirtyLevel,
    ) -> Result<RenderPass> {
        let mut pass = RenderPass::default();
        if level.paints_base() {
            self.paint_base(input, provider)?;
            pass.base = true;
        }
        if level.paints_selection() {
            self.paint_selection(input);
            pass.selection = true;
        }
        if level.paints_hover() {
            self.paint_hover(input);
            pass.hover = true;
        }
        #[cfg(feature = "layer-debug")]
        self.outline_repainted(input, pass);
        Ok(pass)
    }

    /// Outline the data area on each layer this pass repainted, inset per
    /// layer so the three outlines stay distinguishable
    #[cfg(feature = "layer-debug")]
    fn outline_repainted(&mut self, input: &RenderInput, pass: RenderPass) {
        let data = input.geometry.data_rect();
        let outlines = [
            (pass.base, &mut self.base, 0xFFFF_0000),
            (pass.selection, &mut self.selection, 0xFF00_C000),
            (pass.hover, &mut self.hover, 0xFF00_60FF),
        ];
        for (i, (painted, layer, color)) in outlines.into_iter().enumerate() {
            if painted {
                let mut frame = layer.frame();
                frame.stroke_rect(inset_rect(data, i as f32 * 3.0), 1.0, color);
            }
        }
        tracing::trace!(?pass, "layer repaint");
    }

    /// Base with both overlays composited on top
    pub fn compose(&mut self) -> &[u32] {
        self.composed.copy_from_slice(&self.base.pixels);
        composite_over(&mut self.composed, &self.selection.pixels);
        composite_over(&mut self.composed, &self.hover.pixels);
        &self.composed
    }

    fn paint_base(&mut self, input: &RenderInput, provider: &dyn DataProvider) -> Result<()> {
        let theme = input.pipeline.theme();
        let geometry = input.geometry;
        let total_rows = input.metadata.total_rows;
        let visible = geometry.visible(input.layout, input.scroll.x(), input.scroll.y(), total_rows);
        let block = if visible.is_empty() {
            None
        } else {
            Some(provider.fetch(visible.window())?)
        };

        let text = self.text.as_mut();
        let mut frame = self.base.frame();
        frame.clear(theme.background.to_argb_u32());

        let inset = input.border_width;
        let grid_line = theme.grid_line.to_argb_u32();
        let data = geometry.data_rect();

        // Cells
        frame.set_clip(data);
        for row in visible.rows.clone() {
            let top = geometry.row_top(row, input.scroll.y());
            for col in visible.cols.clone() {
                let cell = input.col_rect(col, top, geometry.row_height);
                let value = block.as_ref().and_then(|b| b.get(row, col));
                let formatted = match value {
                    Some(v) => input.pipeline.format(v, col),
                    None => input.pipeline.format(&Default::default(), col),
                };
                frame.set_clip(data);
                frame.fill_rect(cell, formatted.style.background.to_argb_u32());
                frame.fill_rect(
                    Rect::new(cell.right() - inset, cell.y, inset, cell.height),
                    grid_line,
                );
                frame.fill_rect(
                    Rect::new(cell.x, cell.bottom() - inset, cell.width, inset),
                    grid_line,
                );
                paint_cell_text(
                    text,
                    &mut frame,
                    input,
                    cell,
                    data,
                    &formatted.text,
                    formatted.style.align,
                    formatted.style.foreground.to_argb_u32(),
                );
            }
        }

        // Column headers
        let header = geometry.header_rect();
        frame.set_clip(header);
        let header_bg = theme.header.background.to_argb_u32();
        let header_sel = theme.header.selected_background.to_argb_u32();
        let header_fg = theme.header.foreground.to_argb_u32();
        let header_border = theme.header.border.to_argb_u32();
        frame.fill_rect(header, header_bg);
        for col in visible.cols.clone() {
            let cell = input.col_rect(col, 0.0, geometry.header_height);
            let pinned = input.selection.selected_cols().contains(&col);
            frame.set_clip(header);
            frame.fill_rect(cell, if pinned { header_sel } else { header_bg });
            frame.fill_rect(
                Rect::new(cell.right() - inset, cell.y, inset, cell.height),
                header_border,
            );
            let label = input.metadata.columns[col].header_text();
            paint_cell_text(text, &mut frame, input, cell, header, label, TextAlign::Left, header_fg);
        }
        frame.set_clip(header);
        frame.fill_rect(
            Rect::new(header.x, header.bottom() - inset, header.width, inset),
            header_border,
        );

        // Row-index gutter
        let gutter = geometry.gutter_rect();
        frame.set_clip(gutter);
        let gutter_bg = theme.gutter.background.to_argb_u32();
        let gutter_fg = theme.gutter.foreground.to_argb_u32();
        frame.fill_rect(gutter, gutter_bg);
        for row in visible.rows.clone() {
            let cell = input.row_rect(row, 0.0, geometry.gutter_width);
            let pinned = input.selection.selected_rows().contains(&row);
            frame.set_clip(gutter);
            if pinned {
                frame.fill_rect(cell, header_sel);
            }
            frame.fill_rect(
                Rect::new(cell.x, cell.bottom() - inset, cell.width, inset),
                header_border,
            );
            let label = (row + 1).to_string();
            paint_cell_text(text, &mut frame, input, cell, gutter, &label, TextAlign::Right, gutter_fg);
        }
        frame.set_clip(gutter);
        frame.fill_rect(
            Rect::new(gutter.right() - inset, gutter.y, inset, gutter.height),
            header_border,
        );

        // Corner
        let corner = geometry.corner_rect();
        frame.clear_clip();
        frame.fill_rect(corner, header_bg);
        frame.stroke_rect(corner, inset, header_border);

        // Scrollbars
        for axis in [Axis::Vertical, Axis::Horizontal] {
            let Some(track) = input.scroll.track(axis) else {
                continue;
            };
            frame.fill_rect(track, theme.scrollbar.track.to_argb_u32());
            if let Some(thumb) = input.scroll.thumb(axis) {
                let active = input.scroll.drag_axis() == Some(axis);
                let color = if active {
                    theme.scrollbar.thumb_active
                } else {
                    theme.scrollbar.thumb
                };
                frame.fill_rect(inset_rect(thumb, 2.0), color.to_argb_u32());
            }
        }

        Ok(())
    }

    fn paint_selection(&mut self, input: &RenderInput) {
        self.selection.clear();
        let overlay = &input.pipeline.theme().overlay;
        let geometry = input.geometry;
        let data = geometry.data_rect();
        let total_rows = input.metadata.total_rows;
        let visible = geometry.visible(input.layout, input.scroll.x(), input.scroll.y(), total_rows);
        let mut frame = self.selection.frame();

        let band = overlay.selection_band.to_argb_u32();
        paint_column_bands(&mut frame, input, input.selection.selected_cols(), &visible.cols, band);
        paint_row_bands(&mut frame, input, input.selection.selected_rows(), &visible.rows, band);

        let Some(range) = input.selection.normalized() else {
            return;
        };
        let rows = range.data_rows();
        let cols = range.data_cols();
        if rows.is_empty() && cols.is_empty() {
            return;
        }
        let fill = overlay.selection_fill.to_argb_u32();
        let border = overlay.selection_border.to_argb_u32();

        let left = geometry.col_left(input.layout, cols.start, input.scroll.x());
        let right = geometry.col_left(input.layout, cols.end, input.scroll.x());
        let top = geometry.row_top(rows.start, input.scroll.y());
        let bottom = geometry.row_top(rows.end, input.scroll.y());
        let rect = Rect::new(left, top, right - left, bottom - top);

        frame.set_clip(data);
        frame.fill_rect(rect, fill);
        frame.stroke_rect(rect, 2.0, border);

        // Header/gutter labels that are part of the range
        if range.includes_header() {
            frame.set_clip(geometry.header_rect());
            frame.fill_rect(Rect::new(left, 0.0, right - left, geometry.header_height), fill);
        }
        if range.includes_gutter() {
            frame.set_clip(geometry.gutter_rect());
            frame.fill_rect(Rect::new(0.0, top, geometry.gutter_width, bottom - top), fill);
        }
    }

    fn paint_hover(&mut self, input: &RenderInput) {
        self.hover.clear();
        let Some((row, col)) = input.hover else {
            return;
        };
        let overlay = &input.pipeline.theme().overlay;
        let geometry = input.geometry;
        let data = geometry.data_rect();
        let mut frame = self.hover.frame();
        let band = overlay.hover_band.to_argb_u32();
        let cell = overlay.hover_cell.to_argb_u32();

        match (row, col) {
            (HEADER, HEADER) => {
                frame.fill_rect(geometry.corner_rect(), cell);
            }
            (HEADER, col) => {
                let col = col as usize;
                frame.set_clip(Rect::new(data.x, 0.0, data.width, data.bottom()));
                frame.fill_rect(input.col_rect(col, 0.0, data.bottom()), band);
            }
            (row, HEADER) => {
                let row = row as usize;
                frame.set_clip(Rect::new(0.0, data.y, data.right(), data.height));
                frame.fill_rect(input.row_rect(row, 0.0, data.right()), band);
            }
            (row, col) => {
                let top = geometry.row_top(row as usize, input.scroll.y());
                frame.set_clip(data);
                frame.fill_rect(input.col_rect(col as usize, top, geometry.row_height), cell);
            }
        }
    }
}

fn inset_rect(rect: Rect, by: f32) -> Rect {
    let dx = by.min(rect.width / 2.0);
    let dy = by.min(rect.height / 2.0);
    Rect::new(rect.x + dx, rect.y + dy, rect.width - 2.0 * dx, rect.height - 2.0 * dy)
}

fn intersect(a: Rect, b: Rect) -> Rect {
    let x = a.x.max(b.x);
    let y = a.y.max(b.y);
    let right = a.right().min(b.right());
    let bottom = a.bottom().min(b.bottom());
    Rect::new(x, y, (right - x).max(0.0), (bottom - y).max(0.0))
}

/// Text clipped to the cell interior (inset by the border), aligned
/// horizontally, centered vertically
#[allow(clippy::too_many_arguments)]
fn paint_cell_text(
    text: &mut dyn TextRenderer,
    frame: &mut Frame,
    input: &RenderInput,
    cell: Rect,
    region: Rect,
    label: &str,
    align: TextAlign,
    color: u32,
) {
    if label.is_empty() {
        return;
    }
    let interior = inset_rect(cell, input.border_width);
    let clip = intersect(interior, region);
    if clip.is_empty() {
        return;
    }
    let width = text.measure(label, input.font_size);
    let padding = input.cell_padding;
    let x = match align {
        TextAlign::Left => cell.x + padding,
        TextAlign::Right => cell.right() - padding - width,
        TextAlign::Center => cell.x + (cell.width - width) / 2.0,
    };
    frame.set_clip(clip);
    text.draw(frame, x, input.baseline(cell.y, cell.height), label, input.font_size, color);
}

fn paint_column_bands(
    frame: &mut Frame,
    input: &RenderInput,
    cols: &BTreeSet<usize>,
    visible: &std::ops::Range<usize>,
    color: u32,
) {
    let data = input.geometry.data_rect();
    frame.set_clip(data);
    for &col in cols.range(visible.clone()) {
        frame.fill_rect(input.col_rect(col, data.y, data.height), color);
    }
}

fn paint_row_bands(
    frame: &mut Frame,
    input: &RenderInput,
    rows: &BTreeSet<usize>,
    visible: &std::ops::Range<usize>,
    color: u32,
) {
    let data = input.geometry.data_rect();
    frame.set_clip(data);
    for &row in rows.range(visible.clone()) {
        frame.fill_rect(input.row_rect(row, data.x, data.width), color);
    }
}
