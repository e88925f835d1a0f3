//! Types for the chad-commonmark public API.
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::{bus::Event, grammar::NavigationDirective};

/// A code span or code block found while rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeSnippet {
  /// Exact source text of the code, as the copy button will deliver it.
  pub content:  String,
  /// Language tag from the fence info string, if any.
  pub language: Option<String>,
  /// Whether this came from inline code rather than a block.
  pub inline:   bool,
}

/// Result of rendering one message or summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderedDocument {
  /// Rendered HTML fragment.
  pub html: String,

  /// Navigation directives that were turned into buttons, in document order.
  pub navigation: Vec<NavigationDirective>,

  /// Code snippets that received copy affordances, in document order.
  pub snippets: Vec<CodeSnippet>,
}

/// Request to show a page of a PDF, published when a navigation button is
/// clicked.
///
/// Serializes as `{ "pdfId": ..., "pageNumber": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
  pub pdf_id:      String,
  pub page_number: u32,
}

impl NavigationEvent {
  /// The page to open, or `None` for the nonsensical page `0`.
  #[must_use]
  pub const fn target_page(&self) -> Option<NonZeroU32> {
    NonZeroU32::new(self.page_number)
  }
}

impl Event for NavigationEvent {
  const TOPIC: &'static str = "NAVIGATE_TO_PDF";
}

impl From<&NavigationDirective> for NavigationEvent {
  fn from(directive: &NavigationDirective) -> Self {
    Self {
      pdf_id:      directive.pdf_id.clone(),
      page_number: directive.page_number,
    }
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn test_navigation_event_wire_format() {
    let event = NavigationEvent {
      pdf_id:      "abc123".to_string(),
      page_number: 3,
    };
    let json = serde_json::to_string(&event).expect("serializes");
    assert_eq!(json, r#"{"pdfId":"abc123","pageNumber":3}"#);
    assert_eq!(NavigationEvent::TOPIC, "NAVIGATE_TO_PDF");
  }

  #[test]
  fn test_page_zero_has_no_target() {
    let event = NavigationEvent {
      pdf_id:      "x".to_string(),
      page_number: 0,
    };
    assert!(event.target_page().is_none());
  }
}
