//! # chad-commonmark - Markdown rendering for PDF chat messages
//!
//! Turns assistant and user messages into interactive HTML: code gets copy
//! buttons (and syntax highlighting), math is left to a client-side
//! typesetter, and `pdfnav` comments become buttons that open a PDF at a
//! given page.
//!
//! ## Quick Start
//!
//! ```rust
//! use chad_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let processor = MarkdownProcessor::new(MarkdownOptions::chat());
//! let result = processor.render(
//!   r#"See <!-- pdfnav: name="report.pdf" page=3 id=abc123 --> for details."#,
//! );
//!
//! assert!(result.html.contains(r#"data-pdf-id="abc123""#));
//! assert_eq!(result.navigation[0].label(), "report.pdf, Page 3");
//! ```
//!
//! ## Pipeline
//!
//! - [`grammar`]: recognizes `<!-- pdfnav: name=".." page=N id=.. -->`
//!   inline and as a block
//! - [`render`]: the [`RenderChain`](render::RenderChain) of stages that
//!   format code and navigation fragments
//! - [`processor`]: parsing, AST passes, presets and panic recovery
//! - [`dispatch`]: click handling for a mounted view
//! - [`bus`]: the typed event bus navigation events travel on
//! - [`viewer`]: the navigation subscriber for the PDF viewer
//! - [`speech`]: plain text for text-to-speech

pub mod bus;
pub mod dispatch;
pub mod grammar;
pub mod processor;
pub mod render;
pub mod speech;
pub mod syntax;
mod types;
pub mod utils;
pub mod viewer;

pub use crate::{
  bus::{Event, EventBus, SubscriptionToken},
  dispatch::{ChatView, ClickDispatcher, ClickOutcome, Clipboard},
  grammar::{NavToken, NavigationDirective},
  processor::{
    MarkdownOptions,
    MarkdownOptionsBuilder,
    MarkdownProcessor,
    ProcessorPreset,
  },
  types::{CodeSnippet, NavigationEvent, RenderedDocument},
};
