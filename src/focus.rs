//! Focusable-component contract and input routing
//!
//! A host shell routes global input to whichever component holds focus.
//! Components implement only the handlers they care about; the defaults
//! report "not handled".
//!
//! ```text
//! host event ──▶ FocusContext::route ──▶ focused component ──▶ on_<kind>()
//! ```

use std::fmt;

use crate::controller::{GridController, KeyEvent, PointerEvent, WheelEvent};
use crate::error::Result;

/// Stable identifier for a focusable component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component-{}", self.0)
    }
}

/// One input event of any kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    Wheel(WheelEvent),
    KeyDown(KeyEvent),
}

pub trait Focusable {
    fn component_id(&self) -> ComponentId;

    fn can_receive_focus(&self) -> bool {
        true
    }

    fn focus(&mut self);
    fn blur(&mut self);
    fn is_focused(&self) -> bool;

    fn on_pointer_down(&mut self, _event: PointerEvent) -> Result<bool> {
        Ok(false)
    }

    fn on_pointer_move(&mut self, _event: PointerEvent) -> Result<bool> {
        Ok(false)
    }

    fn on_pointer_up(&mut self, _event: PointerEvent) -> Result<bool> {
        Ok(false)
    }

    fn on_wheel(&mut self, _event: WheelEvent) -> Result<bool> {
        Ok(false)
    }

    fn on_key_down(&mut self, _event: KeyEvent) -> Result<bool> {
        Ok(false)
    }
}

/// Invoke the handler for the event's kind
pub fn dispatch(component: &mut dyn Focusable, event: InputEvent) -> Result<bool> {
    match event {
        InputEvent::PointerDown(e) => component.on_pointer_down(e),
        InputEvent::PointerMove(e) => component.on_pointer_move(e),
        InputEvent::PointerUp(e) => component.on_pointer_up(e),
        InputEvent::Wheel(e) => component.on_wheel(e),
        InputEvent::KeyDown(e) => component.on_key_down(e),
    }
}

/// Gives a [`GridController`] focusability by delegation
pub struct GridFocusAdapter {
    id: ComponentId,
    focused: bool,
    grid: GridController,
}

impl GridFocusAdapter {
    pub fn new(id: ComponentId, grid: GridController) -> Self {
        Self {
            id,
            focused: false,
            grid,
        }
    }

    pub fn grid(&self) -> &GridController {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridController {
        &mut self.grid
    }
}

impl Focusable for GridFocusAdapter {
    fn component_id(&self) -> ComponentId {
        self.id
    }

    fn can_receive_focus(&self) -> bool {
        self.grid.is_initialized()
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
        // Hover belongs to the focused grid only
        self.grid.pointer_leave();
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn on_pointer_down(&mut self, event: PointerEvent) -> Result<bool> {
        self.grid.pointer_down(event)
    }

    fn on_pointer_move(&mut self, event: PointerEvent) -> Result<bool> {
        self.grid.pointer_move(event)
    }

    fn on_pointer_up(&mut self, event: PointerEvent) -> Result<bool> {
        self.grid.pointer_up(event)
    }

    fn on_wheel(&mut self, event: WheelEvent) -> Result<bool> {
        self.grid.wheel(event)
    }

    fn on_key_down(&mut self, event: KeyEvent) -> Result<bool> {
        self.grid.key_down(event)
    }
}

/// Per-application focus state. Owned by the composing layer.
#[derive(Debug, Default)]
pub struct FocusContext {
    focused: Option<ComponentId>,
    next_id: u64,
}

impl FocusContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_id(&mut self) -> ComponentId {
        self.next_id += 1;
        ComponentId(self.next_id)
    }

    pub fn focused(&self) -> Option<ComponentId> {
        self.focused
    }

    /// Move focus to `component`. Returns false if it refuses focus.
    pub fn set_focus(&mut self, component: &mut dyn Focusable) -> bool {
        if !component.can_receive_focus() {
            return false;
        }
        component.focus();
        self.focused = Some(component.component_id());
        tracing::debug!(component = %component.component_id(), "focus");
        true
    }

    /// Blur `component`, clearing focus if it held it
    pub fn release(&mut self, component: &mut dyn Focusable) {
        component.blur();
        if self.focused == Some(component.component_id()) {
            self.focused = None;
        }
    }

    pub fn clear(&mut self) {
        self.focused = None;
    }

    /// Dispatch to `component` only if it holds focus
    pub fn route(&self, component: &mut dyn Focusable, event: InputEvent) -> Result<bool> {
        if self.focused != Some(component.component_id()) || !component.is_focused() {
            return Ok(false);
        }
        dispatch(component, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{KeyCode, Modifiers};

    /// Handles keys only
    struct KeyOnly {
        id: ComponentId,
        focused: bool,
        keys: usize,
    }

    impl Focusable for KeyOnly {
        fn component_id(&self) -> ComponentId {
            self.id
        }
        fn focus(&mut self) {
            self.focused = true;
        }
        fn blur(&mut self) {
            self.focused = false;
        }
        fn is_focused(&self) -> bool {
            self.focused
        }
        fn on_key_down(&mut self, _event: KeyEvent) -> Result<bool> {
            self.keys += 1;
            Ok(true)
        }
    }

    #[test]
    fn test_missing_handlers_are_not_handled() {
        let mut ctx = FocusContext::new();
        let mut c = KeyOnly {
            id: ctx.allocate_id(),
            focused: false,
            keys: 0,
        };
        assert!(ctx.set_focus(&mut c));
        let key = InputEvent::KeyDown(KeyEvent::new(KeyCode::Down, Modifiers::NONE));
        assert!(ctx.route(&mut c, key).unwrap());
        let wheel = InputEvent::Wheel(WheelEvent::new(0.0, 10.0));
        assert!(!ctx.route(&mut c, wheel).unwrap());
        assert_eq!(c.keys, 1);
    }

    #[test]
    fn test_unfocused_component_gets_nothing() {
        let mut ctx = FocusContext::new();
        let mut a = KeyOnly {
            id: ctx.allocate_id(),
            focused: false,
            keys: 0,
        };
        ctx.set_focus(&mut a);
        ctx.release(&mut a);
        assert_eq!(ctx.focused(), None);
        let key = InputEvent::KeyDown(KeyEvent::plain(KeyCode::Up));
        assert!(!ctx.route(&mut a, key).unwrap());
        assert_eq!(a.keys, 0);
    }
}
