//! Click handling for rendered chat messages.
//!
//! A [`ChatView`] owns the DOM of one mounted message list and a
//! [`ClickDispatcher`] that lives exactly as long as the mount. Clicks are
//! resolved to the nearest copy or navigation control:
//!
//! - copy buttons decode their `data-code` payload and write it to the
//!   [`Clipboard`] on a local task; block buttons then show `✓ Copied!` for
//!   [`COPY_FEEDBACK`] before restoring their original content,
//! - navigation buttons publish a [`NavigationEvent`] on the injected
//!   [`EventBus`],
//! - anything else is ignored.
//!
//! Each dispatcher owns a [`LocalSet`] that clipboard writes and feedback
//! timers are spawned onto, so a click never needs an ambient runtime
//! context. The tasks make progress while the host drives the view through
//! [`ChatView::run_until`] on a tokio runtime with the `time` driver.
pub mod clipboard;
pub mod dom;

use std::{cell::RefCell, future::Future, rc::Rc, time::Duration};

pub use clipboard::{
  Clipboard,
  ClipboardError,
  MemoryClipboard,
  UnavailableClipboard,
};
use kuchikikiki::{NodeRef, parse_html};
use log::{debug, trace};
use tendril::TendrilSink;
use tokio::{
  task::{JoinHandle, LocalSet},
  time,
};

use self::dom::{
  add_class,
  attribute,
  closest_with_class,
  has_class,
  remove_class,
  replace_children,
  take_children,
};
use crate::{bus::EventBus, render::decode_payload, types::NavigationEvent};

/// How long a block copy button shows its confirmation.
pub const COPY_FEEDBACK: Duration = Duration::from_millis(2000);

/// Confirmation text shown on a block copy button.
pub const COPIED_LABEL: &str = "✓ Copied!";

/// Class added to a block copy button while it shows its confirmation.
pub const COPIED_CLASS: &str = "copied";

pub const COPY_BLOCK_CLASS: &str = "copy-code-button";
pub const COPY_INLINE_CLASS: &str = "copy-inline-code-button";
pub const NAV_BUTTON_CLASS: &str = "pdf-nav-button";

/// Which kind of copy button was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyVariant {
  Block,
  Inline,
}

/// What a click resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
  /// A clipboard write of `text` was started.
  Copy { variant: CopyVariant, text: String },
  /// `event` was published and reached `deliveries` subscribers.
  Navigate {
    event:      NavigationEvent,
    deliveries: usize,
  },
  /// The click did not hit a usable control.
  Ignored,
}

/// Turns clicks into clipboard writes or navigation events.
pub struct ClickDispatcher<C: Clipboard + 'static> {
  clipboard: Rc<C>,
  bus:       EventBus<NavigationEvent>,
  feedback:  Duration,
  tasks:     LocalSet,
  pending:   RefCell<Vec<JoinHandle<()>>>,
}

impl<C: Clipboard + 'static> ClickDispatcher<C> {
  #[must_use]
  pub fn new(clipboard: Rc<C>, bus: EventBus<NavigationEvent>) -> Self {
    Self {
      clipboard,
      bus,
      feedback: COPY_FEEDBACK,
      tasks: LocalSet::new(),
      pending: RefCell::new(Vec::new()),
    }
  }

  /// Override how long copy feedback stays visible.
  #[must_use]
  pub fn with_feedback(mut self, feedback: Duration) -> Self {
    self.feedback = feedback;
    self
  }

  /// Handle a click on `target`.
  ///
  /// Copy work is queued on the dispatcher's task set and runs the next time
  /// it is driven with [`Self::run_until`].
  pub fn dispatch(&self, target: &NodeRef) -> ClickOutcome {
    if let Some(button) =
      closest_with_class(target, &[COPY_BLOCK_CLASS, COPY_INLINE_CLASS])
    {
      return self.copy(&button);
    }
    if let Some(button) = closest_with_class(target, &[NAV_BUTTON_CLASS]) {
      return self.navigate(&button);
    }
    trace!("Click did not hit a copy or navigation control");
    ClickOutcome::Ignored
  }

  /// Run `future` to completion while driving queued clipboard writes and
  /// feedback timers.
  #[allow(
    clippy::future_not_send,
    reason = "Copy tasks are local to the view"
  )]
  pub async fn run_until<F: Future>(&self, future: F) -> F::Output {
    self.tasks.run_until(future).await
  }

  /// Number of clipboard writes or feedback timers still running.
  #[must_use]
  pub fn pending_tasks(&self) -> usize {
    self
      .pending
      .borrow()
      .iter()
      .filter(|handle| !handle.is_finished())
      .count()
  }

  /// Abort every pending clipboard write and feedback timer.
  pub fn stop(&self) {
    let handles = std::mem::take(&mut *self.pending.borrow_mut());
    if !handles.is_empty() {
      debug!("Aborting {} pending copy task(s)", handles.len());
    }
    for handle in handles {
      handle.abort();
    }
  }

  fn copy(&self, button: &NodeRef) -> ClickOutcome {
    let variant = if has_class(button, COPY_BLOCK_CLASS) {
      CopyVariant::Block
    } else {
      CopyVariant::Inline
    };
    let Some(text) =
      attribute(button, "data-code").and_then(|payload| decode_payload(&payload))
    else {
      debug!("Copy button without a usable data-code payload");
      return ClickOutcome::Ignored;
    };

    let clipboard = Rc::clone(&self.clipboard);
    let button = button.clone();
    let feedback = self.feedback;
    let payload = text.clone();
    let handle = self.tasks.spawn_local(async move {
      if let Err(e) = clipboard.write_text(&payload).await {
        debug!("Failed to copy code: {e}");
        return;
      }
      if variant == CopyVariant::Block {
        show_copied(&button, feedback).await;
      }
    });

    let mut pending = self.pending.borrow_mut();
    pending.retain(|handle| !handle.is_finished());
    pending.push(handle);

    ClickOutcome::Copy { variant, text }
  }

  fn navigate(&self, button: &NodeRef) -> ClickOutcome {
    let Some(pdf_id) =
      attribute(button, "data-pdf-id").filter(|id| !id.is_empty())
    else {
      debug!("Navigation button without a PDF id");
      return ClickOutcome::Ignored;
    };
    let Some(page_number) = attribute(button, "data-page-number")
      .and_then(|page| page.trim().parse::<u32>().ok())
    else {
      debug!("Navigation button for {pdf_id} without a valid page number");
      return ClickOutcome::Ignored;
    };

    let event = NavigationEvent {
      pdf_id,
      page_number,
    };
    let deliveries = self.bus.publish(&event);
    debug!(
      "Requested page {} of {} ({deliveries} subscriber(s))",
      event.page_number, event.pdf_id
    );
    ClickOutcome::Navigate { event, deliveries }
  }
}

impl<C: Clipboard + 'static> Drop for ClickDispatcher<C> {
  fn drop(&mut self) {
    self.stop();
  }
}

/// Show the copied state on `button` for `duration`, unless it is already
/// showing it.
async fn show_copied(button: &NodeRef, duration: Duration) {
  if has_class(button, COPIED_CLASS) {
    trace!("Copy feedback already visible");
    return;
  }

  let original = take_children(button);
  add_class(button, COPIED_CLASS);
  button.append(NodeRef::new_text(COPIED_LABEL));

  time::sleep(duration).await;

  replace_children(button, original);
  remove_class(button, COPIED_CLASS);
}

/// A mounted list of rendered messages.
pub struct ChatView<C: Clipboard + 'static> {
  document:   NodeRef,
  dispatcher: Option<ClickDispatcher<C>>,
}

impl<C: Clipboard + 'static> ChatView<C> {
  /// Parse `html` and start dispatching clicks on it.
  #[must_use]
  pub fn mount(
    html: &str,
    clipboard: Rc<C>,
    bus: EventBus<NavigationEvent>,
  ) -> Self {
    Self::with_dispatcher(html, ClickDispatcher::new(clipboard, bus))
  }

  /// Mount with a preconfigured dispatcher.
  #[must_use]
  pub fn with_dispatcher(html: &str, dispatcher: ClickDispatcher<C>) -> Self {
    Self {
      document:   parse_html().one(html),
      dispatcher: Some(dispatcher),
    }
  }

  #[must_use]
  pub const fn document(&self) -> &NodeRef {
    &self.document
  }

  /// First element matching a CSS selector.
  #[must_use]
  pub fn select_first(&self, selector: &str) -> Option<NodeRef> {
    self
      .document
      .select_first(selector)
      .ok()
      .map(|element| element.as_node().clone())
  }

  /// Every element matching a CSS selector, in document order.
  #[must_use]
  pub fn select_all(&self, selector: &str) -> Vec<NodeRef> {
    self
      .document
      .select(selector)
      .map(|elements| elements.map(|e| e.as_node().clone()).collect())
      .unwrap_or_default()
  }

  /// Deliver a click on `target`. Ignored once unmounted.
  pub fn click(&self, target: &NodeRef) -> ClickOutcome {
    self
      .dispatcher
      .as_ref()
      .map_or(ClickOutcome::Ignored, |dispatcher| dispatcher.dispatch(target))
  }

  /// Run `future` while driving the view's copy tasks. Once unmounted the
  /// future simply runs on its own.
  #[allow(
    clippy::future_not_send,
    reason = "Copy tasks are local to the view"
  )]
  pub async fn run_until<F: Future>(&self, future: F) -> F::Output {
    match &self.dispatcher {
      Some(dispatcher) => dispatcher.run_until(future).await,
      None => future.await,
    }
  }

  #[must_use]
  pub const fn is_mounted(&self) -> bool {
    self.dispatcher.is_some()
  }

  #[must_use]
  pub fn pending_tasks(&self) -> usize {
    self
      .dispatcher
      .as_ref()
      .map_or(0, ClickDispatcher::pending_tasks)
  }

  /// Stop dispatching and abort pending feedback timers.
  pub fn unmount(&mut self) {
    if let Some(dispatcher) = self.dispatcher.take() {
      dispatcher.stop();
      debug!("Chat view unmounted");
    }
  }
}
