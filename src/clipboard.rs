//! Clipboard access
//!
//! The controller writes through the [`Clipboard`] trait so tests and
//! headless hosts can capture copies. [`SystemClipboard`] wraps arboard.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{GridError, Result};

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The OS clipboard. The arboard handle is opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| GridError::Clipboard(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        match self.inner.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text)
                .map_err(|e| GridError::Clipboard(e.to_string())),
            None => Err(GridError::Clipboard("clipboard unavailable".to_string())),
        }
    }
}

/// In-process clipboard; clones share the same contents
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        *self.contents.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

/// A clipboard that always fails, for exercising the logged-failure path
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    fn set_text(&mut self, _text: &str) -> Result<()> {
        Err(GridError::Clipboard("no clipboard in this session".to_string()))
    }
}
