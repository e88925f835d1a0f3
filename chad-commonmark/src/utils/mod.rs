use std::path::{Path, PathBuf};

use log::trace;
use walkdir::WalkDir;

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a regex fails to compile, so that
/// a broken pattern degrades to "no match" instead of aborting a render.
///
/// # Panics
///
/// Panics if the fallback regex pattern `r"^\b$"` fails to compile, which
/// should never happen.
#[must_use]
pub fn never_matching_regex() -> regex::Regex {
  regex::Regex::new(r"[^\s\S]").unwrap_or_else(|_| {
    #[allow(
      clippy::unwrap_used,
      reason = "This pattern is guaranteed to be valid"
    )]
    regex::Regex::new(r"^\b$").unwrap()
  })
}

/// Collect all Markdown files below `input_dir`, sorted by path.
#[must_use]
pub fn collect_markdown_files(input_dir: &Path) -> Vec<PathBuf> {
  let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
    .follow_links(true)
    .into_iter()
    .filter_map(Result::ok)
    .map(walkdir::DirEntry::into_path)
    .filter(|path| {
      path.is_file()
        && path
          .extension()
          .is_some_and(|ext| ext == "md" || ext == "markdown")
    })
    .collect();
  files.sort();

  trace!("Found {} markdown files to render", files.len());
  files
}
