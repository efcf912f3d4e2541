//! Clipboard writes with a self-clearing copied flag.
//!
//! `just_copied` holds for [`HOLD`] after the most recent successful copy;
//! each copy restamps the window. The flag is cleared by `tick()` reading
//! the hook clock rather than by a detached timer, so a torn-down hook
//! cannot be flipped by a late callback.

use std::cell::Cell;
use std::rc::Rc;

use rewire_core::{Signal, clock, signal};
use web_time::{Duration, Instant};

/// How long `just_copied` stays set after a copy.
pub const HOLD: Duration = Duration::from_millis(2000);

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// System clipboard seam; `rewire-platform` provides the real one.
pub trait ClipboardWrite {
    fn write(&self, text: &str) -> Result<(), ClipboardError>;
}

pub struct Clipboard {
    writer: Rc<dyn ClipboardWrite>,
    just_copied: Signal<bool>,
    copied_at: Cell<Option<Instant>>,
}

impl Clipboard {
    pub fn new(writer: Rc<dyn ClipboardWrite>) -> Self {
        Self {
            writer,
            just_copied: signal(false),
            copied_at: Cell::new(None),
        }
    }

    /// Writes `text` to the clipboard.
    ///
    /// Failure is logged and returned to the caller; the copied flag only
    /// reacts to successful writes.
    pub fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        match self.writer.write(text) {
            Ok(()) => {
                self.copied_at.set(Some(clock::now()));
                self.just_copied.set(true);
                Ok(())
            }
            Err(err) => {
                log::warn!("failed to write text to clipboard: {err}");
                Err(err)
            }
        }
    }

    pub fn just_copied(&self) -> bool {
        self.just_copied.get()
    }

    /// Clears the copied flag once [`HOLD`] has elapsed since the last copy.
    pub fn tick(&self) {
        if let Some(at) = self.copied_at.get()
            && clock::now().saturating_duration_since(at) >= HOLD
        {
            self.copied_at.set(None);
            self.just_copied.set(false);
        }
    }

    pub fn signal(&self) -> &Signal<bool> {
        &self.just_copied
    }
}

pub fn use_clipboard(writer: Rc<dyn ClipboardWrite>) -> Clipboard {
    Clipboard::new(writer)
}
