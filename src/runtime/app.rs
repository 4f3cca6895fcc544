use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use softbuffer::{Context, Surface};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::ModifiersState;
use winit::window::Window;

use gridview::config::GridConfig;
use gridview::controller::{PointerEvent, WheelEvent};
use gridview::coordinator::MultiGridCoordinator;
use gridview::data::{DataProvider, InMemoryProvider};
use gridview::focus::InputEvent;
use gridview::grid::RenderDirtyLevel;
use gridview::theme::Theme;

use super::input::{key_event_from_winit, modifiers_from_winit, tab_action, wheel_pixels, TabAction};

const INITIAL_WIDTH: u32 = 1024;
const INITIAL_HEIGHT: u32 = 640;

pub struct App {
    coordinator: MultiGridCoordinator,
    /// Datasets waiting for the window, added on first resume
    pending: Vec<InMemoryProvider>,
    background: u32,
    wheel_line_height: f32,
    window: Option<Rc<Window>>,
    context: Option<Context<Rc<Window>>>,
    surface: Option<Surface<Rc<Window>, Rc<Window>>>,
    modifiers: ModifiersState,
    mouse_position: (f32, f32),
}

impl App {
    pub fn new(config: GridConfig, theme: Theme, datasets: Vec<InMemoryProvider>) -> Self {
        let background = theme.background.to_argb_u32();
        let wheel_line_height = config.wheel_line_height;
        Self {
            coordinator: MultiGridCoordinator::new(config, theme, INITIAL_WIDTH, INITIAL_HEIGHT),
            pending: datasets,
            background,
            wheel_line_height,
            window: None,
            context: None,
            surface: None,
            modifiers: ModifiersState::empty(),
            mouse_position: (0.0, 0.0),
        }
    }

    fn init_surface(&mut self, window: Rc<Window>, context: &Context<Rc<Window>>) -> Result<()> {
        let size = window.inner_size();
        let mut surface = Surface::new(context, Rc::clone(&window))
            .map_err(|e| anyhow!("Failed to create surface: {}", e))?;
        resize_surface(&mut surface, size.width, size.height)?;
        self.coordinator.resize(size.width.max(1), size.height.max(1));
        self.surface = Some(surface);
        Ok(())
    }

    fn load_pending(&mut self) {
        for provider in std::mem::take(&mut self.pending) {
            let name = match provider.metadata() {
                Ok(meta) => meta.name,
                Err(e) => {
                    tracing::error!("Skipping dataset: {}", e);
                    continue;
                }
            };
            if let Err(e) = self.coordinator.add_dataset(name.clone(), Box::new(provider)) {
                tracing::error!("Failed to open {}: {}", name, e);
            }
        }
    }

    fn update_title(&self) {
        let Some(window) = &self.window else { return };
        let mut title = match self.coordinator.active_name() {
            Some(name) => format!("{} - gridview", name),
            None => "gridview".to_string(),
        };
        if self.coordinator.len() > 1 {
            title.push_str(&format!(" [{} tabs]", self.coordinator.len()));
        }
        match self.coordinator.value_readout() {
            Ok(Some(readout)) => title.push_str(&format!("  |  {}", readout)),
            Ok(None) => {}
            Err(e) => tracing::warn!("Readout failed: {}", e),
        }
        if let Some(stats) = self.coordinator.stats_panel().stats() {
            title.push_str(&format!("  |  {}", stats));
        }
        window.set_title(&title);
    }

    fn pointer(&self) -> PointerEvent {
        let (x, y) = self.mouse_position;
        PointerEvent::new(x, y, Instant::now()).with_modifiers(modifiers_from_winit(self.modifiers))
    }

    /// Route to the active grid; returns whether a redraw is needed
    fn dispatch(&mut self, event: InputEvent) -> bool {
        if let Err(e) = self.coordinator.handle_input(event) {
            tracing::error!("Input handler failed: {}", e);
        }
        self.coordinator
            .active_grid()
            .is_some_and(|g| g.dirty_level() != RenderDirtyLevel::None || g.has_pending_pointer())
    }

    fn handle_tab_action(&mut self, action: TabAction) -> bool {
        let result = match action {
            TabAction::Next => self.coordinator.next_tab(),
            TabAction::Prev => self.coordinator.prev_tab(),
            TabAction::Close => self.coordinator.close_active(),
        };
        if let Err(e) = result {
            tracing::error!("Tab action {:?} failed: {}", action, e);
        }
        true
    }

    fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::Resized(size) => {
                if let Some(surface) = self.surface.as_mut() {
                    if let Err(e) = resize_surface(surface, size.width, size.height) {
                        tracing::error!("{}", e);
                    }
                }
                self.coordinator.resize(size.width.max(1), size.height.max(1));
                true
            }
            WindowEvent::ModifiersChanged(mods) => {
                self.modifiers = mods.state();
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = (position.x as f32, position.y as f32);
                let redraw = self.dispatch(InputEvent::PointerMove(self.pointer()));
                self.update_title();
                redraw
            }
            WindowEvent::CursorLeft { .. } => self
                .coordinator
                .active_grid_mut()
                .is_some_and(|g| g.pointer_leave()),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let pointer = self.pointer();
                let event = match state {
                    ElementState::Pressed => InputEvent::PointerDown(pointer),
                    ElementState::Released => InputEvent::PointerUp(pointer),
                };
                let redraw = self.dispatch(event);
                self.update_title();
                redraw
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = wheel_pixels(*delta, self.wheel_line_height);
                let wheel =
                    WheelEvent::new(dx, dy).with_modifiers(modifiers_from_winit(self.modifiers));
                self.dispatch(InputEvent::Wheel(wheel))
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                let Some(key) = key_event_from_winit(&event.logical_key, self.modifiers) else {
                    return false;
                };
                if let Some(action) = tab_action(&key) {
                    let redraw = self.handle_tab_action(action);
                    self.update_title();
                    return redraw;
                }
                let redraw = self.dispatch(InputEvent::KeyDown(key));
                self.update_title();
                redraw
            }
            _ => false,
        }
    }

    fn render(&mut self) -> Result<()> {
        self.coordinator.flush()?;
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        let mut buffer = surface
            .buffer_mut()
            .map_err(|e| anyhow!("Failed to get surface buffer: {}", e))?;
        match self.coordinator.active_grid_mut() {
            Some(grid) => {
                let frame = grid.frame();
                if frame.len() == buffer.len() {
                    buffer.copy_from_slice(frame);
                } else {
                    buffer.fill(self.background);
                }
            }
            None => buffer.fill(self.background),
        }
        buffer
            .present()
            .map_err(|e| anyhow!("Failed to present buffer: {}", e))?;
        Ok(())
    }
}

fn resize_surface(surface: &mut Surface<Rc<Window>, Rc<Window>>, width: u32, height: u32) -> Result<()> {
    let (Some(w), Some(h)) = (NonZeroU32::new(width.max(1)), NonZeroU32::new(height.max(1))) else {
        return Ok(());
    };
    surface
        .resize(w, h)
        .map_err(|e| anyhow!("Failed to resize surface: {}", e))
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes()
            .with_title("gridview")
            .with_inner_size(LogicalSize::new(INITIAL_WIDTH, INITIAL_HEIGHT));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Rc::new(window),
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        let context = match Context::new(Rc::clone(&window)) {
            Ok(context) => context,
            Err(e) => {
                tracing::error!("Failed to create graphics context: {}", e);
                event_loop.exit();
                return;
            }
        };
        if let Err(e) = self.init_surface(Rc::clone(&window), &context) {
            tracing::error!("{}", e);
            event_loop.exit();
            return;
        }
        self.window = Some(window);
        self.context = Some(context);

        self.load_pending();
        self.update_title();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };
        if window_id != window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    tracing::error!("Render failed: {}", e);
                }
            }
            other => {
                if self.handle_event(&other) {
                    window.request_redraw();
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
    }
}
