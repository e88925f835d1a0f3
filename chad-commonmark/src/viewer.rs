//! PDF viewer side of navigation.
//!
//! [`PdfNavigator`] subscribes to [`NavigationEvent`]s and keeps track of
//! which of the conversation's PDFs is open and which page it should show.
//! It is the consumer that validates page numbers: the dispatcher publishes
//! whatever a button carries.
use std::{cell::RefCell, num::NonZeroU32, rc::Rc};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
  bus::{EventBus, SubscriptionToken},
  types::NavigationEvent,
};

/// A PDF attached to the current conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfMeta {
  pub id:         String,
  pub name:       String,
  /// Number of pages, when known.
  pub page_count: Option<u32>,
}

/// Result of handling one navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationResult {
  /// The PDF at `index` was selected and will show `page`.
  Opened { index: usize, page: NonZeroU32 },
  /// No PDF with that id belongs to the conversation.
  UnknownPdf,
  /// The page number was `0`.
  InvalidPage,
}

#[derive(Debug, Default)]
struct NavigatorState {
  pdfs:         Vec<PdfMeta>,
  selected:     Option<usize>,
  target_page:  Option<NonZeroU32>,
  last_warning: Option<String>,
}

impl NavigatorState {
  fn navigate(&mut self, event: &NavigationEvent) -> NavigationResult {
    let Some(page) = event.target_page() else {
      let message = format!("Invalid page number 0 for PDF {}.", event.pdf_id);
      warn!("{message}");
      self.last_warning = Some(message);
      return NavigationResult::InvalidPage;
    };

    let Some(index) = self.pdfs.iter().position(|pdf| pdf.id == event.pdf_id)
    else {
      let message =
        format!("PDF with ID {} not found in this conversation.", event.pdf_id);
      warn!("{message}");
      self.last_warning = Some(message);
      return NavigationResult::UnknownPdf;
    };

    let page = match self.pdfs[index].page_count.and_then(NonZeroU32::new) {
      Some(count) if page > count => {
        debug!(
          "Clamping page {page} to {count} for {}",
          self.pdfs[index].name
        );
        count
      },
      _ => page,
    };

    self.selected = Some(index);
    self.target_page = Some(page);
    NavigationResult::Opened { index, page }
  }
}

/// Tracks the open PDF and target page for one conversation.
#[derive(Debug, Default)]
pub struct PdfNavigator {
  state:        Rc<RefCell<NavigatorState>>,
  subscription: Option<(EventBus<NavigationEvent>, SubscriptionToken)>,
}

impl PdfNavigator {
  #[must_use]
  pub fn new(pdfs: Vec<PdfMeta>) -> Self {
    Self {
      state:        Rc::new(RefCell::new(NavigatorState {
        pdfs,
        ..NavigatorState::default()
      })),
      subscription: None,
    }
  }

  /// Subscribe to `bus`, replacing any earlier subscription.
  pub fn attach(&mut self, bus: &EventBus<NavigationEvent>) {
    self.detach();
    let state = Rc::clone(&self.state);
    let token = bus.subscribe(move |event: &NavigationEvent| {
      state.borrow_mut().navigate(event);
    });
    self.subscription = Some((bus.clone(), token));
  }

  /// Stop receiving events. Returns whether a subscription was removed.
  pub fn detach(&mut self) -> bool {
    self
      .subscription
      .take()
      .is_some_and(|(bus, token)| bus.unsubscribe(token))
  }

  #[must_use]
  pub const fn is_attached(&self) -> bool {
    self.subscription.is_some()
  }

  /// Handle a navigation request directly.
  pub fn navigate(&self, event: &NavigationEvent) -> NavigationResult {
    self.state.borrow_mut().navigate(event)
  }

  /// The selected PDF, if any.
  #[must_use]
  pub fn selected(&self) -> Option<PdfMeta> {
    let state = self.state.borrow();
    state.selected.and_then(|index| state.pdfs.get(index).cloned())
  }

  #[must_use]
  pub fn selected_index(&self) -> Option<usize> {
    self.state.borrow().selected
  }

  #[must_use]
  pub fn target_page(&self) -> Option<NonZeroU32> {
    self.state.borrow().target_page
  }

  /// The most recent warning meant for the user.
  #[must_use]
  pub fn last_warning(&self) -> Option<String> {
    self.state.borrow().last_warning.clone()
  }

  /// Replace the conversation's PDFs.
  ///
  /// The selection follows the open PDF's id to its new position, and is
  /// cleared when that PDF is gone.
  pub fn set_pdfs(&self, pdfs: Vec<PdfMeta>) {
    let mut state = self.state.borrow_mut();
    let selected_id = state
      .selected
      .and_then(|index| state.pdfs.get(index))
      .map(|pdf| pdf.id.clone());
    state.pdfs = pdfs;

    let selected = selected_id
      .and_then(|id| state.pdfs.iter().position(|pdf| pdf.id == id));
    state.selected = selected;
    if selected.is_none() {
      state.target_page = None;
    }
  }

  /// Close the open PDF.
  pub fn clear_selection(&self) {
    let mut state = self.state.borrow_mut();
    state.selected = None;
    state.target_page = None;
  }
}

impl Drop for PdfNavigator {
  fn drop(&mut self) {
    self.detach();
  }
}
