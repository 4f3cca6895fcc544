//! winit event translation
//!
//! Maps winit keys, modifiers and wheel deltas onto the grid's
//! host-neutral input types, and recognizes the tab shortcuts the host
//! handles itself.

use winit::event::MouseScrollDelta;
use winit::keyboard::{Key, ModifiersState, NamedKey};

use gridview::controller::{KeyCode, KeyEvent, Modifiers};

/// Shortcuts handled by the host rather than the focused grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabAction {
    Next,
    Prev,
    Close,
}

pub fn modifiers_from_winit(state: ModifiersState) -> Modifiers {
    Modifiers::new(
        state.control_key(),
        state.shift_key(),
        state.alt_key(),
        state.super_key(),
    )
}

/// Returns None for keys the grid has no use for
pub fn key_from_winit(key: &Key) -> Option<KeyCode> {
    match key {
        Key::Named(named) => match named {
            NamedKey::ArrowUp => Some(KeyCode::Up),
            NamedKey::ArrowDown => Some(KeyCode::Down),
            NamedKey::ArrowLeft => Some(KeyCode::Left),
            NamedKey::ArrowRight => Some(KeyCode::Right),
            NamedKey::Home => Some(KeyCode::Home),
            NamedKey::End => Some(KeyCode::End),
            NamedKey::PageUp => Some(KeyCode::PageUp),
            NamedKey::PageDown => Some(KeyCode::PageDown),
            NamedKey::Escape => Some(KeyCode::Escape),
            NamedKey::Tab => Some(KeyCode::Tab),
            _ => None,
        },
        Key::Character(s) => s.chars().next().map(KeyCode::Char),
        _ => None,
    }
}

pub fn key_event_from_winit(key: &Key, state: ModifiersState) -> Option<KeyEvent> {
    key_from_winit(key).map(|code| KeyEvent::new(code, modifiers_from_winit(state)))
}

/// Ctrl+Tab / Ctrl+Shift+Tab switch tabs, Ctrl/Cmd+W closes one
pub fn tab_action(event: &KeyEvent) -> Option<TabAction> {
    let mods = event.modifiers;
    match event.key {
        KeyCode::Tab if mods.ctrl() && mods.shift() => Some(TabAction::Prev),
        KeyCode::Tab if mods.ctrl() => Some(TabAction::Next),
        KeyCode::Char('w') if mods.has_cmd() => Some(TabAction::Close),
        _ => None,
    }
}

/// Wheel delta in pixels, positive = content moves up (scroll down)
pub fn wheel_pixels(delta: MouseScrollDelta, line_height: f32) -> (f32, f32) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (-x * line_height, -y * line_height),
        MouseScrollDelta::PixelDelta(pos) => (-pos.x as f32, -pos.y as f32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_named_and_character_keys() {
        assert_eq!(key_from_winit(&Key::Named(NamedKey::ArrowUp)), Some(KeyCode::Up));
        assert_eq!(key_from_winit(&Key::Character("C".into())), Some(KeyCode::Char('C')));
        assert_eq!(key_from_winit(&Key::Named(NamedKey::F1)), None);
    }

    #[test]
    fn test_tab_shortcuts() {
        let next = KeyEvent::new(KeyCode::Tab, Modifiers::CTRL);
        let prev = KeyEvent::new(KeyCode::Tab, Modifiers::CTRL | Modifiers::SHIFT);
        let close = KeyEvent::new(KeyCode::Char('W'), Modifiers::CTRL);
        assert_eq!(tab_action(&next), Some(TabAction::Next));
        assert_eq!(tab_action(&prev), Some(TabAction::Prev));
        assert_eq!(tab_action(&close), Some(TabAction::Close));
        assert_eq!(tab_action(&KeyEvent::plain(KeyCode::Tab)), None);
    }

    #[test]
    fn test_wheel_lines_scale_by_line_height() {
        assert_eq!(wheel_pixels(MouseScrollDelta::LineDelta(0.0, -2.0), 40.0), (0.0, 80.0));
        let pixels = MouseScrollDelta::PixelDelta(PhysicalPosition::new(5.0, 12.0));
        assert_eq!(wheel_pixels(pixels, 40.0), (-5.0, -12.0));
    }
}
