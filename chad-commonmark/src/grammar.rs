//! PDF navigation directive grammar.
//!
//! Assistant answers cite PDF pages with HTML comments shaped like
//!
//! ```text
//! <!-- pdfnav: name="report.pdf" page=3 id=abc123 -->
//! ```
//!
//! Comrak already parses these as raw HTML: an inline HTML node when the
//! comment sits inside a paragraph, an HTML block when a line starts with it.
//! The two [`DirectiveRule`]s recognize those shapes and turn a match into a
//! [`NavigationDirective`], which then expands into semantic [`NavToken`]s
//! for the render chain to format. An HTML block that also carries other
//! text (`<!-- pdfnav: ... --> see here.`) is scanned with
//! [`NavigationDirective::find_all`] so each comment in it still becomes a
//! button. Anything that does not match is left to the default comment
//! handling.
//!
//! # Examples
//!
//! ```
//! use chad_commonmark::grammar::NavigationDirective;
//!
//! let directive = NavigationDirective::parse(
//!   r#"<!-- pdfnav: name="report.pdf" page=3 id=abc123 -->"#,
//! )
//! .expect("well-formed directive");
//!
//! assert_eq!(directive.pdf_id, "abc123");
//! assert_eq!(directive.page_number, 3);
//! assert_eq!(directive.label(), "report.pdf, Page 3");
//!
//! // Ordinary comments are not directives.
//! assert!(NavigationDirective::parse("<!-- just a note -->").is_none());
//! ```
use std::{ops::Range, sync::LazyLock};

use comrak::nodes::NodeValue;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::never_matching_regex;

/// Prefix that marks an HTML comment as a navigation directive.
pub const DIRECTIVE_PREFIX: &str = "pdfnav:";

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?:^|\s)name="([^"]+)""#).unwrap_or_else(|e| {
    log::error!("Failed to compile NAME_RE regex: {e}");
    never_matching_regex()
  })
});

static PAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?:^|\s)page=(\d+)").unwrap_or_else(|e| {
    log::error!("Failed to compile PAGE_RE regex: {e}");
    never_matching_regex()
  })
});

static ID_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?:^|\s)id=(\S+)").unwrap_or_else(|e| {
    log::error!("Failed to compile ID_RE regex: {e}");
    never_matching_regex()
  })
});

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?s)<!--.*?-->").unwrap_or_else(|e| {
    log::error!("Failed to compile COMMENT_RE regex: {e}");
    never_matching_regex()
  })
});

/// A parsed `pdfnav` directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationDirective {
  /// Identifier of the PDF inside the conversation.
  pub pdf_id:       String,
  /// Target page. The grammar only guarantees digits, so this may be `0`.
  pub page_number:  u32,
  /// File name shown on the button.
  pub display_name: String,
}

impl NavigationDirective {
  /// Parse a complete HTML comment (`<!-- ... -->`) as a directive.
  ///
  /// Surrounding whitespace is ignored. Returns `None` when the input is not
  /// a single comment, when its trimmed content does not start with
  /// [`DIRECTIVE_PREFIX`], or when any of `name`, `page` or `id` is missing.
  #[must_use]
  pub fn parse(comment: &str) -> Option<Self> {
    let inner = comment
      .trim()
      .strip_prefix("<!--")?
      .strip_suffix("-->")?
      .trim();

    // A literal holding several comments is not a single directive.
    if inner.contains("-->") {
      return None;
    }

    Self::from_attributes(inner.strip_prefix(DIRECTIVE_PREFIX)?)
  }

  /// Find every directive comment inside a piece of raw HTML, with the byte
  /// range each one covers. Other comments are skipped.
  #[must_use]
  pub fn find_all(html: &str) -> Vec<EmbeddedDirective> {
    COMMENT_RE
      .find_iter(html)
      .filter_map(|comment| {
        Some(EmbeddedDirective {
          span:      comment.range(),
          directive: Self::parse(comment.as_str())?,
        })
      })
      .collect()
  }

  /// Extract the three directive attributes from the text following the
  /// `pdfnav:` prefix.
  #[must_use]
  pub fn from_attributes(attributes: &str) -> Option<Self> {
    let name = NAME_RE.captures(attributes)?;
    let name_span = name.get(0)?;
    let display_name = name.get(1)?.as_str().to_string();

    // The quoted file name may itself contain `page=` or `id=`.
    let rest = format!(
      "{} {}",
      &attributes[..name_span.start()],
      &attributes[name_span.end()..]
    );

    let page_number = PAGE_RE
      .captures(&rest)?
      .get(1)?
      .as_str()
      .parse::<u32>()
      .ok()?;
    let pdf_id = ID_RE.captures(&rest)?.get(1)?.as_str().to_string();

    Some(Self {
      pdf_id,
      page_number,
      display_name,
    })
  }

  /// Visible button text, `"<name>, Page <page>"`.
  #[must_use]
  pub fn label(&self) -> String {
    format!("{}, Page {}", self.display_name, self.page_number)
  }

  /// Expand the directive into its open, text and close tokens.
  #[must_use]
  pub fn tokens(&self) -> [NavToken; 3] {
    [
      NavToken::Open {
        pdf_id:      self.pdf_id.clone(),
        page_number: self.page_number,
      },
      NavToken::Text(self.label()),
      NavToken::Close,
    ]
  }

  /// Render the directive back to its comment form.
  #[must_use]
  pub fn to_comment(&self) -> String {
    format!(
      "<!-- {DIRECTIVE_PREFIX} name=\"{}\" page={} id={} -->",
      self.display_name, self.page_number, self.pdf_id
    )
  }
}

/// A directive found inside a larger run of raw HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedDirective {
  /// Byte range of the whole `<!-- ... -->` comment.
  pub span:      Range<usize>,
  pub directive: NavigationDirective,
}

/// Semantic tokens a directive expands to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavToken {
  /// Opens a navigation button.
  Open { pdf_id: String, page_number: u32 },
  /// Button label.
  Text(String),
  /// Closes the innermost navigation button.
  Close,
}

/// The two places a directive may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveRule {
  /// Mid-paragraph, parsed by comrak as inline HTML.
  Inline,
  /// At the start of a line, parsed by comrak as an HTML block.
  Block,
}

impl DirectiveRule {
  /// Try this rule against an AST node value.
  ///
  /// Both rules share [`NavigationDirective::parse`]; they only differ in the
  /// node kind they accept. A block only matches when the directive is its
  /// whole content; see [`DirectiveRule::embedded`] for the rest.
  #[must_use]
  pub fn apply(self, value: &NodeValue) -> Option<NavigationDirective> {
    match (self, value) {
      (Self::Inline, NodeValue::HtmlInline(html)) => {
        NavigationDirective::parse(html)
      },
      (Self::Block, NodeValue::HtmlBlock(block)) => {
        NavigationDirective::parse(&block.literal)
      },
      _ => None,
    }
  }

  /// Directives sharing an HTML block with other text.
  ///
  /// Comrak opens an HTML block at any line starting with `<!--`, even
  /// inside a paragraph, and keeps the rest of that line in the block.
  /// Only [`DirectiveRule::Block`] scans, and only when [`Self::apply`]
  /// declined the node.
  #[must_use]
  pub fn embedded(self, value: &NodeValue) -> Vec<EmbeddedDirective> {
    match (self, value) {
      (Self::Block, NodeValue::HtmlBlock(block)) => {
        NavigationDirective::find_all(&block.literal)
      },
      _ => Vec::new(),
    }
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn test_parse_well_formed() {
    let directive = NavigationDirective::parse(
      r#"<!-- pdfnav: name="report.pdf" page=3 id=abc123 -->"#,
    )
    .expect("directive should parse");
    assert_eq!(directive, NavigationDirective {
      pdf_id:       "abc123".to_string(),
      page_number:  3,
      display_name: "report.pdf".to_string(),
    });
  }

  #[test]
  fn test_attribute_order_does_not_matter() {
    let directive = NavigationDirective::parse(
      r#"<!--pdfnav: id=x-9 page=12 name="Annual Report 2024.pdf"-->"#,
    )
    .expect("directive should parse");
    assert_eq!(directive.pdf_id, "x-9");
    assert_eq!(directive.page_number, 12);
    assert_eq!(directive.display_name, "Annual Report 2024.pdf");
  }

  #[test]
  fn test_missing_attributes_decline() {
    for comment in [
      r#"<!-- pdfnav: page=3 id=abc -->"#,
      r#"<!-- pdfnav: name="a.pdf" id=abc -->"#,
      r#"<!-- pdfnav: name="a.pdf" page=3 -->"#,
      r#"<!-- pdfnav: name="a.pdf" page=three id=abc -->"#,
      r#"<!-- pdfnav: name=a.pdf page=3 id=abc -->"#,
      r#"<!-- pdfnav: name="" page=3 id=abc -->"#,
    ] {
      assert!(
        NavigationDirective::parse(comment).is_none(),
        "{comment} should not parse"
      );
    }
  }

  #[test]
  fn test_requires_prefix() {
    assert!(
      NavigationDirective::parse(r#"<!-- name="a.pdf" page=3 id=abc -->"#)
        .is_none()
    );
    assert!(
      NavigationDirective::parse(
        r#"<!-- note pdfnav: name="a.pdf" page=3 id=abc -->"#
      )
      .is_none()
    );
  }

  #[test]
  fn test_not_a_comment() {
    assert!(
      NavigationDirective::parse(r#"pdfnav: name="a.pdf" page=3 id=abc"#)
        .is_none()
    );
    assert!(
      NavigationDirective::parse(
        r#"<!-- pdfnav: name="a.pdf" page=3 id=abc --> <!-- other -->"#
      )
      .is_none()
    );
  }

  #[test]
  fn test_page_zero_is_grammatical() {
    let directive =
      NavigationDirective::parse(r#"<!-- pdfnav: name="a.pdf" page=0 id=a -->"#)
        .expect("page 0 is still digits");
    assert_eq!(directive.page_number, 0);
  }

  #[test]
  fn test_page_overflow_declines() {
    assert!(
      NavigationDirective::parse(
        r#"<!-- pdfnav: name="a.pdf" page=99999999999 id=a -->"#
      )
      .is_none()
    );
  }

  #[test]
  fn test_name_cannot_smuggle_attributes() {
    let directive = NavigationDirective::parse(
      r#"<!-- pdfnav: name="page=9 id=evil.pdf" page=2 id=real -->"#,
    )
    .expect("directive should parse");
    assert_eq!(directive.page_number, 2);
    assert_eq!(directive.pdf_id, "real");
    assert_eq!(directive.display_name, "page=9 id=evil.pdf");
  }

  #[test]
  fn test_attributes_must_stand_alone() {
    let directive = NavigationDirective::parse(
      r#"<!-- pdfnav: data-id=zzz subpage=9 name="a.pdf" page=2 id=real -->"#,
    )
    .expect("directive should parse");
    assert_eq!(directive.pdf_id, "real");
    assert_eq!(directive.page_number, 2);

    assert!(
      NavigationDirective::parse(
        r#"<!-- pdfnav: name="a.pdf" page=2 data-id=x -->"#
      )
      .is_none()
    );
  }

  #[test]
  fn test_find_all_in_raw_html() {
    let html = "<!-- pdfnav: name=\"a.pdf\" page=3 id=a --> see <!-- note \
                --> and <!-- pdfnav: name=\"b.pdf\" page=1 id=b -->.\n";
    let found = NavigationDirective::find_all(html);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].span.start, 0);
    assert_eq!(
      &html[found[0].span.clone()],
      r#"<!-- pdfnav: name="a.pdf" page=3 id=a -->"#
    );
    assert_eq!(found[1].directive.pdf_id, "b");
    assert_eq!(&html[found[1].span.end..], ".\n");
  }

  #[test]
  fn test_block_rule_scans_mixed_blocks() {
    let block = NodeValue::HtmlBlock(comrak::nodes::NodeHtmlBlock {
      block_type: 2,
      literal:    "<!-- pdfnav: name=\"a.pdf\" page=3 id=a --> trailing\n"
        .to_string(),
    });
    assert!(DirectiveRule::Block.apply(&block).is_none());
    assert_eq!(DirectiveRule::Block.embedded(&block).len(), 1);
    assert!(DirectiveRule::Inline.embedded(&block).is_empty());
  }

  #[test]
  fn test_tokens_and_label() {
    let directive = NavigationDirective {
      pdf_id:       "doc1".to_string(),
      page_number:  5,
      display_name: "notes.pdf".to_string(),
    };
    assert_eq!(directive.tokens(), [
      NavToken::Open {
        pdf_id:      "doc1".to_string(),
        page_number: 5,
      },
      NavToken::Text("notes.pdf, Page 5".to_string()),
      NavToken::Close,
    ]);
  }

  #[test]
  fn test_comment_form_parses_back() {
    let directive = NavigationDirective {
      pdf_id:       "doc1".to_string(),
      page_number:  5,
      display_name: "notes.pdf".to_string(),
    };
    assert_eq!(
      NavigationDirective::parse(&directive.to_comment()),
      Some(directive)
    );
  }

  #[test]
  fn test_rules_only_accept_their_node_kind() {
    let comment = r#"<!-- pdfnav: name="a.pdf" page=1 id=a -->"#;
    let inline = NodeValue::HtmlInline(comment.to_string());
    assert!(DirectiveRule::Inline.apply(&inline).is_some());
    assert!(DirectiveRule::Block.apply(&inline).is_none());
    assert!(DirectiveRule::Inline.apply(&NodeValue::Paragraph).is_none());
  }
}
