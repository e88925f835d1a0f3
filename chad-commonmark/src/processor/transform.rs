//! AST passes that hand code and directive nodes to the render chain.
//!
//! Both passes replace a node's value in place with raw HTML produced by the
//! [`RenderChain`]; comrak then emits that HTML verbatim.
use std::cell::RefCell;

use comrak::nodes::{AstNode, NodeHtmlBlock, NodeValue};
use log::trace;

use super::types::AstTransformer;
use crate::{
  grammar::{DirectiveRule, EmbeddedDirective, NavigationDirective},
  render::{CodeFragment, Display, Fragment, RenderChain},
  types::CodeSnippet,
};

/// Replaces `pdfnav` comments with navigation buttons.
///
/// Inline HTML nodes are tried with [`DirectiveRule::Inline`], HTML blocks
/// with [`DirectiveRule::Block`]. An HTML block holding a directive next to
/// other text keeps that text, with each directive comment swapped for an
/// inline button. Nodes without a directive are left alone.
pub struct DirectiveTransformer<'c> {
  chain:      &'c RenderChain,
  directives: RefCell<Vec<NavigationDirective>>,
}

impl<'c> DirectiveTransformer<'c> {
  #[must_use]
  pub const fn new(chain: &'c RenderChain) -> Self {
    Self {
      chain,
      directives: RefCell::new(Vec::new()),
    }
  }

  /// Directives replaced so far, in document order.
  #[must_use]
  pub fn into_directives(self) -> Vec<NavigationDirective> {
    self.directives.into_inner()
  }
}

impl DirectiveTransformer<'_> {
  fn render(&self, directive: &NavigationDirective, display: Display) -> String {
    trace!(
      "Rendering navigation to {} page {}",
      directive.pdf_id, directive.page_number
    );
    let tokens = directive.tokens();
    self.chain.render(&Fragment::Navigation {
      tokens: &tokens,
      display,
    })
  }

  /// Replace each directive comment inside a raw HTML block with an inline
  /// button, keeping the rest of the literal as it is.
  fn splice(
    &self,
    literal: &str,
    found: Vec<EmbeddedDirective>,
  ) -> Option<(String, Vec<NavigationDirective>)> {
    if found.is_empty() {
      return None;
    }

    let mut html = String::with_capacity(literal.len());
    let mut directives = Vec::with_capacity(found.len());
    let mut last = 0;
    for EmbeddedDirective { span, directive } in found {
      html.push_str(&literal[last..span.start]);
      html.push_str(&self.render(&directive, Display::Inline));
      last = span.end;
      directives.push(directive);
    }
    html.push_str(&literal[last..]);
    Some((html, directives))
  }
}

impl AstTransformer for DirectiveTransformer<'_> {
  fn transform<'a>(&self, node: &'a AstNode<'a>) {
    for descendant in node.descendants() {
      let mut data = descendant.data.borrow_mut();
      let value = &data.value;
      let replacement = match value {
        NodeValue::HtmlInline(_) => {
          DirectiveRule::Inline.apply(value).map(|directive| {
            let html = self.render(&directive, Display::Inline);
            (NodeValue::HtmlInline(html), vec![directive])
          })
        },
        NodeValue::HtmlBlock(block) => {
          if let Some(directive) = DirectiveRule::Block.apply(value) {
            let html = self.render(&directive, Display::Block);
            Some((
              NodeValue::HtmlBlock(NodeHtmlBlock {
                block_type: 0,
                literal:    html,
              }),
              vec![directive],
            ))
          } else {
            let found = DirectiveRule::Block.embedded(value);
            self.splice(&block.literal, found).map(|(literal, directives)| {
              (
                NodeValue::HtmlBlock(NodeHtmlBlock {
                  block_type: block.block_type,
                  literal,
                }),
                directives,
              )
            })
          }
        },
        _ => continue,
      };
      let Some((value, directives)) = replacement else {
        continue;
      };

      data.value = value;
      self.directives.borrow_mut().extend(directives);
    }
  }
}

/// Renders code blocks and code spans through the render chain.
pub struct CodeTransformer<'c> {
  chain:    &'c RenderChain,
  snippets: RefCell<Vec<CodeSnippet>>,
}

impl<'c> CodeTransformer<'c> {
  #[must_use]
  pub const fn new(chain: &'c RenderChain) -> Self {
    Self {
      chain,
      snippets: RefCell::new(Vec::new()),
    }
  }

  /// Code seen so far, in document order.
  #[must_use]
  pub fn into_snippets(self) -> Vec<CodeSnippet> {
    self.snippets.into_inner()
  }
}

impl AstTransformer for CodeTransformer<'_> {
  fn transform<'a>(&self, node: &'a AstNode<'a>) {
    for descendant in node.descendants() {
      let mut data = descendant.data.borrow_mut();
      let (html, snippet) = match &data.value {
        NodeValue::CodeBlock(block) => {
          let fragment = CodeFragment::block(&block.literal, &block.info);
          let snippet = CodeSnippet {
            content:  block.literal.clone(),
            language: fragment.language().map(ToString::to_string),
            inline:   false,
          };
          (self.chain.render(&Fragment::Code(fragment)), snippet)
        },
        NodeValue::Code(code) => {
          let fragment = CodeFragment::inline(&code.literal);
          let snippet = CodeSnippet {
            content:  code.literal.clone(),
            language: None,
            inline:   true,
          };
          (self.chain.render(&Fragment::Code(fragment)), snippet)
        },
        _ => continue,
      };

      data.value = if snippet.inline {
        NodeValue::HtmlInline(html)
      } else {
        NodeValue::HtmlBlock(NodeHtmlBlock {
          block_type: 0,
          literal:    html,
        })
      };
      self.snippets.borrow_mut().push(snippet);
    }
  }
}
