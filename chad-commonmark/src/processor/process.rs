//! Main processing functions for Markdown content.
use std::{
  fs,
  io::Error,
  panic::{AssertUnwindSafe, catch_unwind},
  path::{Path, PathBuf},
};

use log::error;

use super::types::{MarkdownOptions, MarkdownProcessor};
use crate::types::RenderedDocument;

/// Render markdown content, degrading to an escaped paragraph if rendering
/// panics.
///
/// The fallback carries no navigation directives or snippets, so a message
/// that cannot be rendered never produces interactive controls.
#[must_use]
pub fn process_with_recovery(
  processor: &MarkdownProcessor,
  content: &str,
) -> RenderedDocument {
  match catch_unwind(AssertUnwindSafe(|| processor.render(content))) {
    Ok(result) => result,
    Err(panic_err) => {
      if let Some(message) = panic_err.downcast_ref::<String>() {
        error!("Panic during markdown processing: {message}");
      } else if let Some(message) = panic_err.downcast_ref::<&str>() {
        error!("Panic during markdown processing: {message}");
      } else {
        error!("Unknown panic during markdown processing");
      }
      RenderedDocument {
        html:       format!("<p>{}</p>\n", html_escape::encode_text(content)),
        navigation: Vec::new(),
        snippets:   Vec::new(),
      }
    },
  }
}

/// Process a batch of markdown files with consistent error handling.
///
/// Returns `(path, result)` pairs in input order; a file that cannot be read
/// yields an `Err` with the reason.
pub fn process_batch<I, F>(
  processor: &MarkdownProcessor,
  files: I,
  read_file_fn: F,
) -> Vec<(PathBuf, Result<RenderedDocument, String>)>
where
  I: Iterator<Item = PathBuf>,
  F: Fn(&Path) -> Result<String, Error>,
{
  files
    .map(|path| {
      let result = match read_file_fn(&path) {
        Ok(content) => Ok(process_with_recovery(processor, &content)),
        Err(e) => Err(format!("Failed to read file: {e}")),
      };
      (path, result)
    })
    .collect()
}

/// Preset configurations for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorPreset {
  /// Everything the chat view renders: GFM, math, breaks, linkify,
  /// typographer, highlighting, copy buttons and navigation directives.
  Chat,
  /// CommonMark only, with raw HTML passed through.
  Plain,
}

impl ProcessorPreset {
  #[must_use]
  pub const fn options(self) -> MarkdownOptions {
    match self {
      Self::Chat => MarkdownOptions::chat(),
      Self::Plain => MarkdownOptions::plain(),
    }
  }
}

/// Create a processor from a preset.
#[must_use]
pub fn create_processor(preset: ProcessorPreset) -> MarkdownProcessor {
  MarkdownProcessor::new(preset.options())
}

/// Create a processor and render `content` with it in one call.
#[must_use]
pub fn process_markdown_string(
  content: &str,
  preset: ProcessorPreset,
) -> RenderedDocument {
  let processor = create_processor(preset);
  process_with_recovery(&processor, content)
}

/// Read and render a markdown file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn process_markdown_file(
  file_path: &Path,
  preset: ProcessorPreset,
) -> Result<RenderedDocument, String> {
  let content = fs::read_to_string(file_path).map_err(|e| {
    format!("Failed to read file {}: {}", file_path.display(), e)
  })?;

  let processor = create_processor(preset);
  Ok(process_with_recovery(&processor, &content))
}
