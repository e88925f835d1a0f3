//! Copy-to-clipboard affordances.
use log::warn;
use percent_encoding::{
  AsciiSet,
  NON_ALPHANUMERIC,
  percent_decode_str,
  utf8_percent_encode,
};

use super::{Display, Fragment, Next, RenderStage};

/// Characters escaped by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'-')
  .remove(b'_')
  .remove(b'.')
  .remove(b'!')
  .remove(b'~')
  .remove(b'*')
  .remove(b'\'')
  .remove(b'(')
  .remove(b')');

/// Rules for the copy affordances. The inline trigger stays hidden until
/// its code span is hovered, and a block button turns green while it shows
/// its confirmation.
pub const COPY_BUTTON_CSS: &str = r".code-block-wrapper {
  position: relative;
  margin-bottom: 16px;
  border-radius: 6px;
  overflow: hidden;
  border: 1px solid #e1e4e8;
}

.code-block-wrapper pre {
  border: none;
  margin-bottom: 0;
}

.code-block-header {
  display: flex;
  justify-content: space-between;
  align-items: center;
  background-color: #f1f1f1;
  padding: 6px 12px;
  font-size: 12px;
  border-bottom: 1px solid #e1e4e8;
}

.code-language {
  color: #666;
  font-size: 12px;
}

.copy-code-button {
  background-color: transparent;
  border: 1px solid #d1d5da;
  border-radius: 4px;
  padding: 2px 8px;
  font-size: 12px;
  cursor: pointer;
  display: flex;
  align-items: center;
  gap: 4px;
}

.copy-code-button:hover {
  background-color: #e1e4e8;
}

.copy-code-button.copied {
  background-color: #28a745;
  color: white;
  border-color: #28a745;
}

.inline-code-wrapper {
  position: relative;
  display: inline-flex;
  align-items: center;
  margin: 0 2px;
}

.inline-code-wrapper .copy-inline-code-button {
  visibility: hidden;
  position: absolute;
  right: -16px;
  top: -10px;
  background: transparent;
  border: none;
  cursor: pointer;
}

.inline-code-wrapper:hover .copy-inline-code-button {
  visibility: visible;
}

.copy-icon,
.copy-icon-small {
  display: inline-block;
  font-size: 12px;
}
";

/// Percent-encode code for a `data-code` attribute.
///
/// The result contains no quotes, angle brackets, ampersands or whitespace,
/// so it can be placed in an attribute verbatim.
#[must_use]
pub fn encode_payload(source: &str) -> String {
  utf8_percent_encode(source, COMPONENT).to_string()
}

/// Decode a `data-code` payload back to the original source.
///
/// Returns `None` when the payload does not decode to UTF-8.
#[must_use]
pub fn decode_payload(payload: &str) -> Option<String> {
  match percent_decode_str(payload).decode_utf8() {
    Ok(text) => Some(text.into_owned()),
    Err(e) => {
      warn!("Discarding copy payload that is not UTF-8: {e}");
      None
    },
  }
}

/// Wraps code output with copy buttons carrying the encoded source.
///
/// Navigation fragments pass through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyButtonStage;

impl RenderStage for CopyButtonStage {
  fn name(&self) -> &'static str {
    "copy-button"
  }

  fn render(&self, fragment: &Fragment<'_>, next: Next<'_>) -> String {
    let inner = next.run(fragment);
    let Fragment::Code(code) = fragment else {
      return inner;
    };
    let payload = encode_payload(code.source);

    match code.display {
      Display::Block => {
        let language = code
          .language()
          .map(|lang| {
            format!(
              "<span class=\"code-language\">{}</span>",
              html_escape::encode_text(lang)
            )
          })
          .unwrap_or_default();
        format!(
          "<div class=\"code-block-wrapper\"><div \
           class=\"code-block-header\">{language}<button type=\"button\" \
           class=\"copy-code-button\" data-code=\"{payload}\"><span \
           class=\"copy-icon\">📋</span> Copy</button></div>{inner}</div>\n"
        )
      },
      Display::Inline => {
        format!(
          "<span class=\"inline-code-wrapper\">{inner}<button type=\"button\" \
           class=\"copy-inline-code-button\" data-code=\"{payload}\"><span \
           class=\"copy-icon-small\">📋</span></button></span>"
        )
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::render::{CodeFragment, RenderChain};

  #[test]
  fn test_inline_trigger_is_hidden_until_hover() {
    assert!(COPY_BUTTON_CSS.contains(
      ".inline-code-wrapper .copy-inline-code-button {\n  visibility: hidden;"
    ));
    assert!(COPY_BUTTON_CSS.contains(
      ".inline-code-wrapper:hover .copy-inline-code-button {\n  visibility: \
       visible;"
    ));
    assert!(COPY_BUTTON_CSS.contains(".copy-code-button.copied"));
  }

  #[test]
  fn test_encoding_matches_encode_uri_component() {
    assert_eq!(
      encode_payload("a b\"<>&\n'()*!~-_."),
      "a%20b%22%3C%3E%26%0A'()*!~-_."
    );
    assert_eq!(encode_payload("é"), "%C3%A9");
  }

  #[test]
  fn test_payload_round_trip() {
    let source = "fn main() {\n  println!(\"<hi> & 'bye'\");\n}\n";
    assert_eq!(
      decode_payload(&encode_payload(source)).as_deref(),
      Some(source)
    );
  }

  #[test]
  fn test_invalid_utf8_payload() {
    assert_eq!(decode_payload("%FF%FE"), None);
  }

  #[test]
  fn test_block_wrapper() {
    let chain = RenderChain::new().with_stage(CopyButtonStage);
    let html = chain.render(&Fragment::Code(CodeFragment::block("x = 1\n", "py")));
    assert_eq!(
      html,
      "<div class=\"code-block-wrapper\"><div \
       class=\"code-block-header\"><span class=\"code-language\">py</span>\
       <button type=\"button\" class=\"copy-code-button\" \
       data-code=\"x%20%3D%201%0A\"><span class=\"copy-icon\">📋</span> \
       Copy</button></div><pre><code class=\"language-py\">x = \
       1\n</code></pre>\n</div>\n"
    );
  }

  #[test]
  fn test_block_without_language_has_no_label() {
    let chain = RenderChain::new().with_stage(CopyButtonStage);
    let html = chain.render(&Fragment::Code(CodeFragment::block("x\n", "")));
    assert!(!html.contains("code-language"));
    assert!(html.contains("copy-code-button"));
  }

  #[test]
  fn test_inline_wrapper() {
    let chain = RenderChain::new().with_stage(CopyButtonStage);
    let html = chain.render(&Fragment::Code(CodeFragment::inline("a\"b")));
    assert_eq!(
      html,
      "<span class=\"inline-code-wrapper\"><code>a\"b</code><button \
       type=\"button\" class=\"copy-inline-code-button\" \
       data-code=\"a%22b\"><span \
       class=\"copy-icon-small\">📋</span></button></span>"
    );
  }
}
