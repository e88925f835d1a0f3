//! Plain text for speech synthesis.
//!
//! Text-to-speech engines read markup literally, so messages are flattened
//! first: navigation directives and comments disappear, code is announced
//! with a `Code:` prefix, list items get a bullet and tables are read row by
//! row as `header: cell` pairs.
use std::sync::LazyLock;

use comrak::{
  Arena,
  nodes::{AstNode, NodeValue},
  parse_document,
};
use kuchikikiki::parse_html;
use regex::Regex;
use tendril::TendrilSink;

use crate::{
  processor::{MarkdownOptions, core::comrak_options_for},
  utils::never_matching_regex,
};

static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"[ \t]*\n\s*\n").unwrap_or_else(|e| {
    log::error!("Failed to compile BLANK_LINES_RE regex: {e}");
    never_matching_regex()
  })
});

/// Flatten a Markdown message into text suitable for speech synthesis.
///
/// # Examples
///
/// ```
/// use chad_commonmark::speech::to_speech_text;
///
/// let text = to_speech_text(
///   "Run `ls` <!-- pdfnav: name=\"a.pdf\" page=2 id=x -->\n\n- one\n- two\n",
/// );
/// assert_eq!(text, "Run Code: ls\n\n• one\n• two");
/// ```
#[must_use]
pub fn to_speech_text(markdown: &str) -> String {
  let arena = Arena::new();
  let options = comrak_options_for(&MarkdownOptions {
    gfm: true,
    math: true,
    ..MarkdownOptions::plain()
  });
  let root = parse_document(&arena, markdown, &options);

  let mut text = String::new();
  write_block(root, &mut text);
  BLANK_LINES_RE.replace_all(&text, "\n\n").trim().to_string()
}

fn write_block<'a>(node: &'a AstNode<'a>, out: &mut String) {
  let value = node.data.borrow().value.clone();
  match value {
    NodeValue::Paragraph | NodeValue::Heading(_) => {
      write_inline_children(node, out);
      out.push_str("\n\n");
    },
    NodeValue::Item(_) | NodeValue::TaskItem(_) => {
      out.push_str("• ");
      for child in node.children() {
        if matches!(child.data.borrow().value, NodeValue::Paragraph) {
          write_inline_children(child, out);
          out.push('\n');
        } else {
          write_block(child, out);
        }
      }
    },
    NodeValue::List(_) => {
      for child in node.children() {
        write_block(child, out);
      }
      out.push('\n');
    },
    NodeValue::CodeBlock(block) => {
      out.push_str("Code: ");
      out.push_str(block.literal.trim_end());
      out.push_str("\n\n");
    },
    NodeValue::HtmlBlock(block) => {
      // Comments, directives included, carry no text content.
      let text = parse_html().one(block.literal.as_str()).text_contents();
      let text = text.trim();
      if !text.is_empty() {
        out.push_str(text);
        out.push_str("\n\n");
      }
    },
    NodeValue::Table(_) => write_table(node, out),
    NodeValue::ThematicBreak => out.push('\n'),
    _ => {
      for child in node.children() {
        write_block(child, out);
      }
    },
  }
}

fn write_inline_children<'a>(node: &'a AstNode<'a>, out: &mut String) {
  for child in node.children() {
    write_inline(child, out);
  }
}

fn write_inline<'a>(node: &'a AstNode<'a>, out: &mut String) {
  match &node.data.borrow().value {
    NodeValue::Text(text) => out.push_str(text),
    NodeValue::Code(code) => {
      out.push_str("Code: ");
      out.push_str(&code.literal);
    },
    NodeValue::Math(math) => out.push_str(&math.literal),
    NodeValue::SoftBreak | NodeValue::LineBreak => out.push('\n'),
    NodeValue::HtmlInline(_) | NodeValue::FootnoteReference(_) => {},
    _ => write_inline_children(node, out),
  }
}

fn write_table<'a>(table: &'a AstNode<'a>, out: &mut String) {
  let mut rows = table.children().map(|row| {
    row
      .children()
      .map(|cell| {
        let mut text = String::new();
        write_inline_children(cell, &mut text);
        text.trim().to_string()
      })
      .collect::<Vec<_>>()
  });

  let headers = rows.next().unwrap_or_default();
  out.push_str("Table:\n");
  for row in rows {
    let line = headers
      .iter()
      .zip(&row)
      .map(|(header, cell)| format!("{header}: {cell}"))
      .collect::<Vec<_>>()
      .join(", ");
    out.push_str(&line);
    out.push('\n');
  }
  out.push('\n');
}
