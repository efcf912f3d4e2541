use std::cell::RefCell;

use rewire_hooks::{ClipboardError, ClipboardWrite};

/// System clipboard via arboard.
pub struct SystemClipboard {
    inner: RefCell<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let inner = arboard::Clipboard::new()
            .map_err(|err| ClipboardError::Unavailable(err.to_string()))?;
        Ok(Self {
            inner: RefCell::new(inner),
        })
    }
}

impl ClipboardWrite for SystemClipboard {
    fn write(&self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .borrow_mut()
            .set_text(text.to_owned())
            .map_err(|err| ClipboardError::Write(err.to_string()))
    }
}
