//! File, directory and stdin rendering for the `render` and `speech`
//! subcommands, and the `theme-css` stylesheet.
use std::{
  collections::BTreeMap,
  fs,
  io::{self, Read},
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chad_commonmark::{
  MarkdownProcessor,
  NavigationDirective,
  RenderedDocument,
  processor::process_with_recovery,
  render::COPY_BUTTON_CSS,
  syntax::create_default_manager,
  utils::collect_markdown_files,
};
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::config::Config;

/// Read `input`, or standard input when it is `None` or `-`.
///
/// # Errors
///
/// Returns an error if the file or standard input cannot be read.
pub fn read_input(input: Option<&Path>) -> Result<String> {
  match input {
    Some(path) if path != Path::new("-") => {
      fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))
    },
    _ => {
      let mut content = String::new();
      io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read standard input")?;
      Ok(content)
    },
  }
}

/// Where rendered HTML for `source` lands below `output_dir`.
#[must_use]
pub fn output_path(input_dir: &Path, source: &Path, output_dir: &Path) -> PathBuf {
  let relative = source.strip_prefix(input_dir).unwrap_or(source);
  output_dir.join(relative).with_extension("html")
}

/// Render every Markdown file below `input_dir` into `output_dir` in
/// parallel, preserving the directory structure.
///
/// Files that fail to render are logged and skipped. Returns the rendered
/// documents keyed by source path.
///
/// # Errors
///
/// Returns an error if the thread pool cannot be built or the output
/// directory cannot be created.
pub fn render_directory(
  config: &Config,
  processor: &MarkdownProcessor,
  input_dir: &Path,
  output_dir: &Path,
) -> Result<BTreeMap<PathBuf, RenderedDocument>> {
  let files = collect_markdown_files(input_dir);
  info!(
    "Rendering {} file(s) from {} into {}",
    files.len(),
    input_dir.display(),
    output_dir.display()
  );

  fs::create_dir_all(output_dir).with_context(|| {
    format!("Failed to create output directory: {}", output_dir.display())
  })?;

  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(config.jobs.unwrap_or(0))
    .build()
    .context("Failed to build rendering thread pool")?;

  let results: Vec<(PathBuf, Result<RenderedDocument>)> = pool.install(|| {
    files
      .par_iter()
      .map(|source| {
        let result = render_one(processor, input_dir, source, output_dir);
        (source.clone(), result)
      })
      .collect()
  });

  let mut rendered = BTreeMap::new();
  for (source, result) in results {
    match result {
      Ok(document) => {
        rendered.insert(source, document);
      },
      Err(e) => warn!("Skipping {}: {e:#}", source.display()),
    }
  }

  info!("Rendered {} file(s)", rendered.len());
  Ok(rendered)
}

fn render_one(
  processor: &MarkdownProcessor,
  input_dir: &Path,
  source: &Path,
  output_dir: &Path,
) -> Result<RenderedDocument> {
  let content = fs::read_to_string(source)
    .with_context(|| format!("Failed to read {}", source.display()))?;
  let document = process_with_recovery(processor, &content);

  let target = output_path(input_dir, source, output_dir);
  if let Some(parent) = target.parent() {
    fs::create_dir_all(parent).with_context(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
  }
  fs::write(&target, &document.html)
    .with_context(|| format!("Failed to write {}", target.display()))?;

  debug!("{} -> {}", source.display(), target.display());
  Ok(document)
}

/// Serialize directives as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn directives_json(directives: &[NavigationDirective]) -> Result<String> {
  serde_json::to_string_pretty(directives)
    .context("Failed to serialize navigation directives")
}

/// Serialize the directives of a directory render, keyed by the source path
/// relative to `input_dir`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn batch_directives_json(
  input_dir: &Path,
  rendered: &BTreeMap<PathBuf, RenderedDocument>,
) -> Result<String> {
  let by_file: BTreeMap<String, &[NavigationDirective]> = rendered
    .iter()
    .map(|(source, document)| {
      let relative = source.strip_prefix(input_dir).unwrap_or(source);
      (
        relative.display().to_string(),
        document.navigation.as_slice(),
      )
    })
    .collect();
  serde_json::to_string_pretty(&by_file)
    .context("Failed to serialize navigation directives")
}

/// Stylesheet for rendered messages: the highlight theme's rules followed by
/// the copy button rules.
///
/// # Errors
///
/// Returns an error if no highlighting backend is built in or the theme is
/// unknown.
pub fn theme_stylesheet(theme: Option<&str>) -> Result<String> {
  let manager = create_default_manager()?;
  let mut css = manager.stylesheet(theme)?;
  if !css.ends_with('\n') {
    css.push('\n');
  }
  css.push('\n');
  css.push_str(COPY_BUTTON_CSS);
  Ok(css)
}
