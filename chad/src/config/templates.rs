use thiserror::Error;

/// Error type for configuration templates.
#[derive(Debug, Error)]
pub enum TemplateError {
  /// The requested configuration format is not supported.
  #[error("Unsupported config format: {0}")]
  UnsupportedFormat(String),
}

/// Default configuration in TOML, commented so a new user can find their
/// way around.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# chad configuration file

# Output directory used when rendering a directory without --output
# output_dir = "build"

# Number of threads for directory rendering (defaults to one per CPU)
# jobs = 4

[markdown]
# Tables, strikethrough, task lists and footnotes
gfm = true

# $inline$ and $$display$$ math, left for a client-side typesetter
math = true

# Render single newlines as <br />
breaks = true

# Turn bare URLs into links
linkify = true

# Smart quotes, dashes and ellipses
typographer = true

# Syntax highlighting for fenced code blocks
highlight_code = true

# Theme used by `chad theme-css` (see `chad theme-css --list`)
# highlight_theme = "InspiredGitHub"

# Copy-to-clipboard buttons on code
copy_buttons = true

# Turn <!-- pdfnav: ... --> comments into PDF navigation buttons
navigation_directives = true
"#;

/// Default configuration in JSON.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "output_dir": "build",
  "markdown": {
    "gfm": true,
    "math": true,
    "breaks": true,
    "linkify": true,
    "typographer": true,
    "highlight_code": true,
    "highlight_theme": "InspiredGitHub",
    "copy_buttons": true,
    "navigation_directives": true
  }
}
"#;

/// Get the configuration template for the requested format.
///
/// # Errors
///
/// Returns [`TemplateError::UnsupportedFormat`] for anything but `toml` and
/// `json`.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}
