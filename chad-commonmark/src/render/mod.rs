//! Render post-processing chain.
//!
//! Code and navigation fragments are not rendered by comrak directly. They
//! are handed to a [`RenderChain`]: an ordered list of [`RenderStage`]s, each
//! of which may call the next stage and decorate or replace its output. The
//! innermost step is the base renderer, which produces the plain markup a
//! CommonMark renderer would.
//!
//! Stages are applied outermost first, so a chain built as
//!
//! ```
//! use chad_commonmark::render::{CopyButtonStage, RenderChain};
//!
//! let chain = RenderChain::new().with_stage(CopyButtonStage);
//! assert_eq!(chain.stage_names(), vec!["copy-button"]);
//! ```
//!
//! wraps whatever the stages after it return.

mod copy;
#[cfg(feature = "syntect")] mod highlight;

use std::{fmt, sync::Arc};

pub use copy::{
  COPY_BUTTON_CSS,
  CopyButtonStage,
  decode_payload,
  encode_payload,
};
#[cfg(feature = "syntect")]
pub use highlight::HighlightStage;
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::grammar::NavToken;

/// Whether a fragment sits inside a paragraph or stands on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
  Inline,
  Block,
}

/// A code span or code block about to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFragment<'a> {
  /// Exact source text.
  pub source:  &'a str,
  /// Fence info string, empty for indented and inline code.
  pub info:    &'a str,
  pub display: Display,
  /// Pre-rendered inner markup (for example highlighted spans). When `None`
  /// the base renderer escapes `source`.
  pub markup:  Option<String>,
}

impl<'a> CodeFragment<'a> {
  #[must_use]
  pub const fn block(source: &'a str, info: &'a str) -> Self {
    Self {
      source,
      info,
      display: Display::Block,
      markup: None,
    }
  }

  #[must_use]
  pub const fn inline(source: &'a str) -> Self {
    Self {
      source,
      info: "",
      display: Display::Inline,
      markup: None,
    }
  }

  /// Language tag: the first word of the info string.
  #[must_use]
  pub fn language(&self) -> Option<&'a str> {
    self.info.split_whitespace().next()
  }
}

/// Something a render stage can format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment<'a> {
  Code(CodeFragment<'a>),
  Navigation {
    tokens:  &'a [NavToken],
    display: Display,
  },
}

/// One decorator in a [`RenderChain`].
pub trait RenderStage: Send + Sync {
  /// Short identifier, used in logs and diagnostics.
  fn name(&self) -> &'static str;

  /// Render `fragment`, usually by calling `next.run(fragment)` and
  /// decorating the result.
  fn render(&self, fragment: &Fragment<'_>, next: Next<'_>) -> String;
}

/// The remainder of the chain after the current stage.
#[derive(Clone, Copy)]
pub struct Next<'c> {
  stages: &'c [Arc<dyn RenderStage>],
}

impl Next<'_> {
  /// Render `fragment` with the remaining stages and the base renderer.
  #[must_use]
  pub fn run(self, fragment: &Fragment<'_>) -> String {
    match self.stages.split_first() {
      Some((stage, rest)) => stage.render(fragment, Next { stages: rest }),
      None => base_render(fragment),
    }
  }
}

/// Ordered list of render stages around the base renderer.
#[derive(Clone, Default)]
pub struct RenderChain {
  stages: Vec<Arc<dyn RenderStage>>,
}

impl RenderChain {
  /// A chain with no stages, rendering exactly like the base renderer.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a stage. Stages added later run inside the earlier ones.
  #[must_use]
  pub fn with_stage<S: RenderStage + 'static>(mut self, stage: S) -> Self {
    self.stages.push(Arc::new(stage));
    self
  }

  /// Append an already shared stage.
  #[must_use]
  pub fn with_shared_stage(mut self, stage: Arc<dyn RenderStage>) -> Self {
    self.stages.push(stage);
    self
  }

  #[must_use]
  pub fn stage_names(&self) -> Vec<&'static str> {
    self.stages.iter().map(|stage| stage.name()).collect()
  }

  #[must_use]
  pub fn render(&self, fragment: &Fragment<'_>) -> String {
    Next {
      stages: &self.stages,
    }
    .run(fragment)
  }
}

impl fmt::Debug for RenderChain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RenderChain")
      .field("stages", &self.stage_names())
      .finish()
  }
}

/// Markup produced when no stage intervenes.
#[must_use]
pub fn base_render(fragment: &Fragment<'_>) -> String {
  match fragment {
    Fragment::Code(code) => base_code(code),
    Fragment::Navigation { tokens, display } => {
      let buttons = navigation_markup(tokens);
      match display {
        Display::Inline => buttons,
        Display::Block => {
          format!("<div class=\"pdf-nav-block\">{buttons}</div>\n")
        },
      }
    },
  }
}

fn base_code(code: &CodeFragment<'_>) -> String {
  let inner = code
    .markup
    .clone()
    .unwrap_or_else(|| encode_text(code.source).into_owned());

  match code.display {
    Display::Inline => format!("<code>{inner}</code>"),
    Display::Block => {
      match code.language() {
        Some(lang) => {
          format!(
            "<pre><code class=\"language-{}\">{inner}</code></pre>\n",
            encode_double_quoted_attribute(lang)
          )
        },
        None => format!("<pre><code>{inner}</code></pre>\n"),
      }
    },
  }
}

fn navigation_markup(tokens: &[NavToken]) -> String {
  let mut html = String::new();
  for token in tokens {
    match token {
      NavToken::Open {
        pdf_id,
        page_number,
      } => {
        html.push_str(&format!(
          "<button type=\"button\" class=\"pdf-nav-button\" \
           data-pdf-id=\"{}\" data-page-number=\"{page_number}\">",
          encode_double_quoted_attribute(pdf_id)
        ));
      },
      NavToken::Text(label) => html.push_str(&encode_text(label)),
      NavToken::Close => html.push_str("</button>"),
    }
  }
  html
}
