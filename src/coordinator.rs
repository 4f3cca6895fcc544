//! Multi-dataset tabs sharing one stats panel and value readout
//!
//! Tabs are keyed by unique dataset name and kept in insertion order.
//! Exactly one tab is active while any exist; only the active grid holds
//! focus and receives input.

use crate::config::GridConfig;
use crate::controller::GridController;
use crate::data::DataProvider;
use crate::error::{GridError, Result};
use crate::focus::{FocusContext, Focusable, GridFocusAdapter, InputEvent};
use crate::render::{text_renderer_for, BlockText, RenderPass, TextRenderer};
use crate::stats::ColumnStats;
use crate::theme::Theme;

/// Builds the text backend for each new grid
pub type TextFactory = Box<dyn Fn() -> Box<dyn TextRenderer>>;

/// Shared statistics side panel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsPanel {
    bound_key: Option<String>,
    stats: Option<ColumnStats>,
    visible: bool,
}

impl StatsPanel {
    pub fn bound_key(&self) -> Option<&str> {
        self.bound_key.as_deref()
    }

    pub fn stats(&self) -> Option<&ColumnStats> {
        self.stats.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn hide(&mut self) {
        *self = Self::default();
    }
}

struct Tab {
    name: String,
    grid: GridFocusAdapter,
}

pub struct MultiGridCoordinator {
    tabs: Vec<Tab>,
    active: Option<usize>,
    focus: FocusContext,
    stats: StatsPanel,
    config: GridConfig,
    theme: Theme,
    text_factory: TextFactory,
    width: u32,
    height: u32,
}

impl MultiGridCoordinator {
    pub fn new(config: GridConfig, theme: Theme, width: u32, height: u32) -> Self {
        let font_path = config.font_path.clone();
        let factory: TextFactory = Box::new(move || text_renderer_for(font_path.as_deref()));
        Self::with_text_factory(config, theme, width, height, factory)
    }

    /// Default config, light theme and block glyphs
    pub fn headless(width: u32, height: u32) -> Self {
        Self::with_text_factory(
            GridConfig::default(),
            Theme::light(),
            width,
            height,
            Box::new(|| Box::new(BlockText)),
        )
    }

    pub fn with_text_factory(
        config: GridConfig,
        theme: Theme,
        width: u32,
        height: u32,
        text_factory: TextFactory,
    ) -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            focus: FocusContext::new(),
            stats: StatsPanel::default(),
            config,
            theme,
            text_factory,
            width,
            height,
        }
    }

    // =========================================================================
    // Tabs
    // =========================================================================

    fn index_of(&self, name: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Tab names in display order
    pub fn tab_names(&self) -> Vec<&str> {
        self.tabs.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.map(|i| self.tabs[i].name.as_str())
    }

    pub fn active_grid(&self) -> Option<&GridController> {
        self.active.map(|i| self.tabs[i].grid.grid())
    }

    pub fn active_grid_mut(&mut self) -> Option<&mut GridController> {
        match self.active {
            Some(i) => Some(self.tabs[i].grid.grid_mut()),
            None => None,
        }
    }

    pub fn grid(&self, name: &str) -> Option<&GridController> {
        self.index_of(name).map(|i| self.tabs[i].grid.grid())
    }

    pub fn stats_panel(&self) -> &StatsPanel {
        &self.stats
    }

    /// Create, initialize and (if first) activate a grid for `provider`.
    ///
    /// Returns false without touching `provider` if the name is taken.
    /// An initialization failure propagates and adds no tab.
    pub fn add_dataset(&mut self, name: impl Into<String>, provider: Box<dyn DataProvider>) -> Result<bool> {
        let name = name.into();
        if self.contains(&name) {
            tracing::debug!(dataset = %name, "dataset already open");
            return Ok(false);
        }
        let mut grid = GridController::new(
            provider,
            self.config.clone(),
            self.theme.clone(),
            (self.text_factory)(),
            self.width,
            self.height,
        );
        grid.initialize()?;
        let id = self.focus.allocate_id();
        self.tabs.push(Tab {
            name: name.clone(),
            grid: GridFocusAdapter::new(id, grid),
        });
        tracing::info!(dataset = %name, tabs = self.tabs.len(), "dataset added");
        if self.active.is_none() {
            self.activate(&name)?;
        }
        Ok(true)
    }

    /// Make `name` the active tab: focus moves, layout and paint are forced
    /// and the stats panel follows the new grid's pinned column
    pub fn activate(&mut self, name: &str) -> Result<()> {
        let index = self
            .index_of(name)
            .ok_or_else(|| GridError::UnknownDataset(name.to_string()))?;
        self.activate_index(index)
    }

    fn activate_index(&mut self, index: usize) -> Result<()> {
        if let Some(previous) = self.active.filter(|&p| p != index) {
            self.focus.release(&mut self.tabs[previous].grid);
        }
        self.active = Some(index);
        let tab = &mut self.tabs[index];
        self.focus.set_focus(&mut tab.grid);
        tab.grid.grid_mut().invalidate();
        tracing::debug!(dataset = %tab.name, "tab activated");
        self.rebind_stats()
    }

    /// Close a tab. Closing the active one promotes the next tab, else the
    /// previous one, else leaves nothing active.
    pub fn close(&mut self, name: &str) -> Result<()> {
        let index = self
            .index_of(name)
            .ok_or_else(|| GridError::UnknownDataset(name.to_string()))?;
        let mut tab = self.tabs.remove(index);
        self.focus.release(&mut tab.grid);
        tracing::info!(dataset = %tab.name, "dataset closed");

        match self.active {
            Some(active) if active == index => {
                self.active = None;
                if self.tabs.is_empty() {
                    self.stats.hide();
                    self.focus.clear();
                    return Ok(());
                }
                // The next tab slid into `index`; if none did, take the last
                let promoted = index.min(self.tabs.len() - 1);
                self.activate_index(promoted)
            }
            Some(active) if active > index => {
                self.active = Some(active - 1);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub fn close_active(&mut self) -> Result<()> {
        match self.active_name().map(str::to_string) {
            Some(name) => self.close(&name),
            None => Ok(()),
        }
    }

    /// Activate the next tab, wrapping around
    pub fn next_tab(&mut self) -> Result<()> {
        match self.active {
            Some(i) if self.tabs.len() > 1 => self.activate_index((i + 1) % self.tabs.len()),
            _ => Ok(()),
        }
    }

    /// Activate the previous tab, wrapping around
    pub fn prev_tab(&mut self) -> Result<()> {
        match self.active {
            Some(i) if self.tabs.len() > 1 => {
                self.activate_index((i + self.tabs.len() - 1) % self.tabs.len())
            }
            _ => Ok(()),
        }
    }

    // =========================================================================
    // Input and drawing
    // =========================================================================

    /// Route an event to the active grid, then rebind the stats panel if
    /// its column pins changed
    pub fn handle_input(&mut self, event: InputEvent) -> Result<bool> {
        let Some(index) = self.active else {
            return Ok(false);
        };
        let adapter = &mut self.tabs[index].grid;
        let handled = self.focus.route(adapter, event)?;
        if adapter.grid_mut().take_stats_rebind() {
            self.rebind_stats()?;
        }
        Ok(handled)
    }

    /// Resize every grid's container
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        for tab in &mut self.tabs {
            tab.grid.grid_mut().resize(width, height);
        }
    }

    pub fn flush(&mut self) -> Result<RenderPass> {
        match self.active_grid_mut() {
            Some(grid) => grid.flush(),
            None => Ok(RenderPass::default()),
        }
    }

    // =========================================================================
    // Shared panels
    // =========================================================================

    /// Bind the stats panel to the active grid's pinned column, hiding it
    /// when there is none
    pub fn rebind_stats(&mut self) -> Result<()> {
        let Some(grid) = self.active_grid() else {
            self.stats.hide();
            return Ok(());
        };
        let Some(key) = grid.primary_column_key() else {
            self.stats.hide();
            return Ok(());
        };
        let column = grid
            .metadata()
            .and_then(|m| m.column_index(&key).map(|i| m.columns[i].clone()))
            .ok_or_else(|| GridError::UnknownColumn(key.clone()))?;
        let values = grid.get_column_values(&key)?;
        let stats = ColumnStats::compute(&column, &values);
        tracing::debug!(column = %key, count = stats.count, "stats panel rebound");
        self.stats = StatsPanel {
            bound_key: Some(key),
            stats: Some(stats),
            visible: true,
        };
        Ok(())
    }

    /// Readout bar text for the active grid
    pub fn value_readout(&self) -> Result<Option<String>> {
        match self.active_grid() {
            Some(grid) => grid.value_readout(),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CellValue, Column, DataType, InMemoryProvider};

    fn provider(name: &str) -> Box<dyn DataProvider> {
        let columns = vec![Column::new("v", DataType::Integer)];
        let rows = (0..4).map(|i| vec![CellValue::Int(i)]).collect();
        Box::new(InMemoryProvider::new(name, columns, rows))
    }

    #[test]
    fn test_first_dataset_activates() {
        let mut c = MultiGridCoordinator::headless(300, 200);
        assert!(c.add_dataset("a", provider("a")).unwrap());
        assert!(c.add_dataset("b", provider("b")).unwrap());
        assert_eq!(c.active_name(), Some("a"));
        assert!(!c.add_dataset("a", provider("a")).unwrap());
        assert_eq!(c.tab_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_next_tab_wraps() {
        let mut c = MultiGridCoordinator::headless(300, 200);
        c.add_dataset("a", provider("a")).unwrap();
        c.add_dataset("b", provider("b")).unwrap();
        c.next_tab().unwrap();
        assert_eq!(c.active_name(), Some("b"));
        c.next_tab().unwrap();
        assert_eq!(c.active_name(), Some("a"));
        c.prev_tab().unwrap();
        assert_eq!(c.active_name(), Some("b"));
    }
}
