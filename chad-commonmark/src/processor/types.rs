//! Type definitions for the Markdown processor.
//!
//! Contains the configuration options ([`MarkdownOptions`]) with their
//! builder, the processor itself ([`MarkdownProcessor`]) and the
//! [`AstTransformer`] trait implemented by the AST passes.
//!
//! # Examples
//!
//! ```
//! use chad_commonmark::{MarkdownOptionsBuilder, MarkdownProcessor};
//!
//! let options = MarkdownOptionsBuilder::new()
//!   .highlight_code(false)
//!   .navigation_directives(true)
//!   .build();
//!
//! let processor = MarkdownProcessor::new(options);
//! let rendered = processor.render("Hello `world`");
//! assert!(rendered.html.contains("inline-code-wrapper"));
//! ```

use std::sync::Arc;

use comrak::nodes::AstNode;

use crate::{render::RenderChain, syntax::SyntaxManager};

/// Options for configuring the Markdown processor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct MarkdownOptions {
  /// Enable GitHub Flavored Markdown tables, strikethrough, task lists and
  /// footnotes.
  pub gfm: bool,

  /// Recognize `$..$`, `$$..$$` and `` $`..`$ `` math.
  pub math: bool,

  /// Render soft line breaks as `<br />`.
  pub breaks: bool,

  /// Turn bare URLs into links.
  pub linkify: bool,

  /// Smart quotes, dashes and ellipses.
  pub typographer: bool,

  /// Enable syntax highlighting for fenced code blocks.
  pub highlight_code: bool,

  /// Optional: syntax highlighting theme used for the stylesheet.
  pub highlight_theme: Option<String>,

  /// Wrap code with copy-to-clipboard buttons.
  pub copy_buttons: bool,

  /// Turn `pdfnav` comments into navigation buttons.
  pub navigation_directives: bool,
}

impl MarkdownOptions {
  /// Every option enabled, matching the chat message renderer.
  #[must_use]
  pub const fn chat() -> Self {
    Self {
      gfm:                   true,
      math:                  true,
      breaks:                true,
      linkify:               true,
      typographer:           true,
      highlight_code:        cfg!(feature = "syntect"),
      highlight_theme:       None,
      copy_buttons:          true,
      navigation_directives: true,
    }
  }

  /// Plain CommonMark with raw HTML passed through and nothing else.
  #[must_use]
  pub const fn plain() -> Self {
    Self {
      gfm:                   false,
      math:                  false,
      breaks:                false,
      linkify:               false,
      typographer:           false,
      highlight_code:        false,
      highlight_theme:       None,
      copy_buttons:          false,
      navigation_directives: false,
    }
  }
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self::chat()
  }
}

/// Main Markdown processor.
///
/// Cheap to clone: render stages and the syntax manager are shared.
#[derive(Debug, Clone)]
pub struct MarkdownProcessor {
  pub(crate) options:        MarkdownOptions,
  pub(crate) chain:          RenderChain,
  pub(crate) syntax_manager: Option<Arc<SyntaxManager>>,
}

/// Trait for AST transformations applied between parsing and HTML output.
pub trait AstTransformer {
  fn transform<'a>(&self, node: &'a AstNode<'a>);
}

/// Builder for constructing `MarkdownOptions` with method chaining.
#[derive(Debug, Clone)]
pub struct MarkdownOptionsBuilder {
  options: MarkdownOptions,
}

impl MarkdownOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self {
      options: MarkdownOptions::default(),
    }
  }

  /// Start from existing options.
  #[must_use]
  pub const fn from_options(options: MarkdownOptions) -> Self {
    Self { options }
  }

  /// Enable or disable GitHub Flavored Markdown.
  #[must_use]
  pub const fn gfm(mut self, enabled: bool) -> Self {
    self.options.gfm = enabled;
    self
  }

  #[must_use]
  pub const fn math(mut self, enabled: bool) -> Self {
    self.options.math = enabled;
    self
  }

  #[must_use]
  pub const fn breaks(mut self, enabled: bool) -> Self {
    self.options.breaks = enabled;
    self
  }

  #[must_use]
  pub const fn linkify(mut self, enabled: bool) -> Self {
    self.options.linkify = enabled;
    self
  }

  #[must_use]
  pub const fn typographer(mut self, enabled: bool) -> Self {
    self.options.typographer = enabled;
    self
  }

  /// Enable or disable syntax highlighting.
  #[must_use]
  pub const fn highlight_code(mut self, enabled: bool) -> Self {
    self.options.highlight_code = enabled;
    self
  }

  /// Set the syntax highlighting theme.
  #[must_use]
  pub fn highlight_theme<S: Into<String>>(mut self, theme: Option<S>) -> Self {
    self.options.highlight_theme = theme.map(Into::into);
    self
  }

  /// Enable or disable copy buttons on code.
  #[must_use]
  pub const fn copy_buttons(mut self, enabled: bool) -> Self {
    self.options.copy_buttons = enabled;
    self
  }

  /// Enable or disable `pdfnav` directive recognition.
  #[must_use]
  pub const fn navigation_directives(mut self, enabled: bool) -> Self {
    self.options.navigation_directives = enabled;
    self
  }

  /// Build the final `MarkdownOptions`.
  #[must_use]
  pub fn build(self) -> MarkdownOptions {
    self.options
  }
}

impl Default for MarkdownOptionsBuilder {
  fn default() -> Self {
    Self::new()
  }
}
