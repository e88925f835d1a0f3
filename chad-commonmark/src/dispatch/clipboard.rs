//! Clipboard access for the copy buttons.
use std::{
  cell::{Cell, RefCell},
  future::Future,
};

/// Errors a clipboard write can fail with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
  #[error("Clipboard access was denied")]
  PermissionDenied,
  #[error("No clipboard is available")]
  Unavailable,
  #[error("Clipboard write failed: {0}")]
  WriteFailed(String),
}

/// An asynchronous, text-only clipboard.
pub trait Clipboard {
  /// Replace the clipboard contents with `text`.
  fn write_text(
    &self,
    text: &str,
  ) -> impl Future<Output = Result<(), ClipboardError>>;
}

/// Clipboard that keeps its contents in memory.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
  contents: RefCell<Option<String>>,
  writes:   Cell<usize>,
}

impl MemoryClipboard {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Last text written, if any.
  #[must_use]
  pub fn contents(&self) -> Option<String> {
    self.contents.borrow().clone()
  }

  #[must_use]
  pub fn write_count(&self) -> usize {
    self.writes.get()
  }
}

impl Clipboard for MemoryClipboard {
  #[allow(
    clippy::future_not_send,
    reason = "Clipboard writes run on the local task set"
  )]
  async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
    *self.contents.borrow_mut() = Some(text.to_string());
    self.writes.set(self.writes.get() + 1);
    Ok(())
  }
}

/// Clipboard for environments without one; every write fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
  async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
    Err(ClipboardError::Unavailable)
  }
}
