//! Core implementation of the Markdown processor.
//!
//! Rendering is a single pass: comrak parses the text, the AST transformers
//! hand directive and code nodes to the render chain, and comrak formats the
//! result. Nothing is cached between calls.
use std::sync::Arc;

use comrak::{
  Arena,
  nodes::{AstNode, NodeValue},
  options::Options,
  parse_document,
};
use log::{debug, error};

use super::{
  transform::{CodeTransformer, DirectiveTransformer},
  types::{AstTransformer, MarkdownOptions, MarkdownProcessor},
};
#[cfg(feature = "syntect")]
use crate::render::HighlightStage;
use crate::{
  render::{CopyButtonStage, RenderChain},
  syntax::{SyntaxManager, create_default_manager},
  types::RenderedDocument,
};

/// Features a processor can be queried for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorFeature {
  Gfm,
  Math,
  SyntaxHighlighting,
  CopyButtons,
  NavigationDirectives,
}

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor`, building the render chain from the
  /// options.
  #[must_use]
  pub fn new(options: MarkdownOptions) -> Self {
    let syntax_manager = if options.highlight_code {
      match create_default_manager() {
        Ok(manager) => Some(Arc::new(manager)),
        Err(e) => {
          debug!("Syntax highlighting disabled: {e}");
          None
        },
      }
    } else {
      None
    };

    let chain = default_chain(&options, syntax_manager.as_ref());
    Self {
      options,
      chain,
      syntax_manager,
    }
  }

  /// Create a processor with a caller-supplied render chain.
  #[must_use]
  pub const fn with_chain(options: MarkdownOptions, chain: RenderChain) -> Self {
    Self {
      options,
      chain,
      syntax_manager: None,
    }
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  #[must_use]
  pub const fn render_chain(&self) -> &RenderChain {
    &self.chain
  }

  /// Check if a specific feature is enabled.
  #[must_use]
  pub const fn has_feature(&self, feature: ProcessorFeature) -> bool {
    match feature {
      ProcessorFeature::Gfm => self.options.gfm,
      ProcessorFeature::Math => self.options.math,
      ProcessorFeature::SyntaxHighlighting => self.syntax_manager.is_some(),
      ProcessorFeature::CopyButtons => self.options.copy_buttons,
      ProcessorFeature::NavigationDirectives => {
        self.options.navigation_directives
      },
    }
  }

  /// Stylesheet for the configured highlight theme, when highlighting is on.
  #[must_use]
  pub fn highlight_stylesheet(&self) -> Option<String> {
    let manager = self.syntax_manager.as_ref()?;
    manager
      .stylesheet(self.options.highlight_theme.as_deref())
      .inspect_err(|e| error!("Failed to build highlight stylesheet: {e}"))
      .ok()
  }

  /// Render Markdown to HTML, collecting the directives and code it holds.
  #[must_use]
  pub fn render(&self, markdown: &str) -> RenderedDocument {
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, markdown, &options);

    let navigation = if self.options.navigation_directives {
      let directives = DirectiveTransformer::new(&self.chain);
      directives.transform(root);
      directives.into_directives()
    } else {
      Vec::new()
    };

    let code = CodeTransformer::new(&self.chain);
    code.transform(root);
    let snippets = code.into_snippets();

    let mut html = String::new();
    if let Err(e) = comrak::format_html(root, &options, &mut html) {
      error!("Failed to format HTML: {e}");
    }

    RenderedDocument {
      html,
      navigation,
      snippets,
    }
  }

  /// Render Markdown and return only the HTML.
  #[must_use]
  pub fn render_html(&self, markdown: &str) -> String {
    self.render(markdown).html
  }

  /// Build comrak options from `MarkdownOptions`.
  pub(crate) fn comrak_options(&self) -> Options<'static> {
    comrak_options_for(&self.options)
  }
}

pub(crate) fn comrak_options_for(markdown: &MarkdownOptions) -> Options<'static> {
  let mut options = Options::default();
  if markdown.gfm {
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
  }
  if markdown.math {
    options.extension.math_dollars = true;
    options.extension.math_code = true;
  }
  options.extension.autolink = markdown.linkify;
  options.parse.smart = markdown.typographer;
  options.render.hardbreaks = markdown.breaks;
  // Directives and model output rely on raw HTML passing through.
  options.render.r#unsafe = true;
  options
}

fn default_chain(
  options: &MarkdownOptions,
  syntax_manager: Option<&Arc<SyntaxManager>>,
) -> RenderChain {
  let mut chain = RenderChain::new();
  if options.copy_buttons {
    chain = chain.with_stage(CopyButtonStage);
  }
  #[cfg(feature = "syntect")]
  {
    if let Some(manager) = syntax_manager {
      chain = chain.with_stage(HighlightStage::new(Arc::clone(manager)));
    }
  }
  #[cfg(not(feature = "syntect"))]
  let _ = syntax_manager;
  chain
}

/// Extract all inline text from a heading, paragraph or table cell node.
#[must_use]
pub fn extract_inline_text<'a>(node: &'a AstNode<'a>) -> String {
  let mut text = String::new();
  for child in node.children() {
    match &child.data.borrow().value {
      NodeValue::Text(t) => text.push_str(t),
      NodeValue::Code(t) => text.push_str(&t.literal),
      NodeValue::Math(m) => text.push_str(&m.literal),
      NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
      NodeValue::Link(..)
      | NodeValue::Emph
      | NodeValue::Strong
      | NodeValue::Strikethrough
      | NodeValue::FootnoteReference(..) => {
        text.push_str(&extract_inline_text(child));
      },
      _ => {},
    }
  }
  text
}

#[cfg(test)]
mod tests {
  use super::*;

  fn plain_processor() -> MarkdownProcessor {
    MarkdownProcessor::new(MarkdownOptions::plain())
  }

  #[test]
  fn test_plain_code_is_base_rendered() {
    let html = plain_processor().render_html("```rust\nlet x = 1;\n```\n");
    assert_eq!(
      html,
      "<pre><code class=\"language-rust\">let x = 1;\n</code></pre>\n"
    );
  }

  #[test]
  fn test_ordinary_comment_passes_through() {
    let html = plain_processor().render_html("a <!-- note --> b\n");
    assert_eq!(html, "<p>a <!-- note --> b</p>\n");
  }

  #[test]
  fn test_has_feature() {
    let processor = MarkdownProcessor::new(MarkdownOptions {
      highlight_code: false,
      ..MarkdownOptions::chat()
    });
    assert!(processor.has_feature(ProcessorFeature::Gfm));
    assert!(processor.has_feature(ProcessorFeature::NavigationDirectives));
    assert!(!processor.has_feature(ProcessorFeature::SyntaxHighlighting));
    assert!(!plain_processor().has_feature(ProcessorFeature::CopyButtons));
    assert_eq!(processor.render_chain().stage_names(), vec!["copy-button"]);
  }

  #[test]
  fn test_snippets_are_collected_in_order() {
    let processor = MarkdownProcessor::new(MarkdownOptions {
      highlight_code: false,
      ..MarkdownOptions::chat()
    });
    let rendered =
      processor.render("Use `ls`.\n\n```sh\necho hi\n```\n\n    indented\n");
    let contents: Vec<_> = rendered
      .snippets
      .iter()
      .map(|s| (s.content.as_str(), s.language.as_deref(), s.inline))
      .collect();
    assert_eq!(contents, vec![
      ("ls", None, true),
      ("echo hi\n", Some("sh"), false),
      ("indented\n", None, false),
    ]);
  }

  #[test]
  fn test_math_is_delegated() {
    let processor = MarkdownProcessor::new(MarkdownOptions {
      highlight_code: false,
      ..MarkdownOptions::chat()
    });
    let html = processor.render_html("Euler: $e^{i\\pi} + 1 = 0$\n");
    assert!(html.contains("data-math-style=\"inline\""));
    assert!(!html.contains("inline-code-wrapper"));
  }

  #[test]
  fn test_breaks_and_linkify() {
    let processor = MarkdownProcessor::new(MarkdownOptions {
      highlight_code: false,
      ..MarkdownOptions::chat()
    });
    let html = processor.render_html("line one\nsee https://example.com\n");
    assert!(html.contains("<br />"));
    assert!(html.contains("<a href=\"https://example.com\">"));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_highlight_stylesheet() {
    let processor = MarkdownProcessor::new(MarkdownOptions::chat());
    assert!(processor.highlight_stylesheet().is_some());
    assert!(plain_processor().highlight_stylesheet().is_none());
  }
}
