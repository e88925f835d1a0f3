//! Core types and traits for syntax highlighting.

use std::collections::HashMap;

use super::error::{SyntaxError, SyntaxResult};

/// Trait for syntax highlighting backends.
///
/// Backends emit class-based markup: every token becomes a `<span>` whose
/// classes name its scope, and colours come from a separate stylesheet
/// produced by [`SyntaxHighlighter::stylesheet`]. The highlighted markup is
/// therefore independent of the theme.
pub trait SyntaxHighlighter: Send + Sync {
  /// Get the name of this highlighter backend
  fn name(&self) -> &'static str;

  /// Get a list of supported languages
  fn supported_languages(&self) -> Vec<String>;

  /// Get a list of available themes
  fn available_themes(&self) -> Vec<String>;

  /// Check if a language is supported
  fn supports_language(&self, language: &str) -> bool {
    self
      .supported_languages()
      .iter()
      .any(|lang| lang.eq_ignore_ascii_case(language))
  }

  /// Check if a theme is available
  fn has_theme(&self, theme: &str) -> bool {
    self
      .available_themes()
      .iter()
      .any(|t| t.eq_ignore_ascii_case(theme))
  }

  /// Highlight `code` as `language`, returning the inner markup of a
  /// `<code>` element.
  ///
  /// # Errors
  ///
  /// Returns an error if the language is unknown or highlighting fails.
  fn highlight(&self, code: &str, language: &str) -> SyntaxResult<String>;

  /// CSS rules colouring the classes emitted by [`Self::highlight`].
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::ThemeNotFound`] for an unknown theme.
  fn stylesheet(&self, theme: &str) -> SyntaxResult<String>;

  /// Detect language from a file extension
  fn language_from_extension(&self, extension: &str) -> Option<String>;
}

/// Configuration for syntax highlighting
#[derive(Debug, Clone)]
pub struct SyntaxConfig {
  /// Theme used for the stylesheet when none is requested
  pub default_theme: String,

  /// Language aliases for mapping common names to supported languages
  pub language_aliases: HashMap<String, String>,

  /// Whether to highlight unknown languages as plain text instead of
  /// reporting them as unsupported
  pub fallback_to_plain: bool,
}

impl Default for SyntaxConfig {
  fn default() -> Self {
    let language_aliases = [
      ("js", "javascript"),
      ("jsx", "javascript"),
      ("ts", "typescript"),
      ("py", "python"),
      ("rb", "ruby"),
      ("rs", "rust"),
      ("sh", "bash"),
      ("shell", "bash"),
      ("zsh", "bash"),
      ("yml", "yaml"),
      ("md", "markdown"),
      ("c++", "cpp"),
      ("cs", "c#"),
      ("csharp", "c#"),
      ("golang", "go"),
    ]
    .into_iter()
    .map(|(alias, language)| (alias.to_string(), language.to_string()))
    .collect();

    Self {
      default_theme: "InspiredGitHub".to_string(),
      language_aliases,
      fallback_to_plain: false,
    }
  }
}

/// High-level syntax highlighting manager.
///
/// Owns a backend plus the alias table, and is shared by every render chain
/// that highlights code.
pub struct SyntaxManager {
  highlighter: Box<dyn SyntaxHighlighter>,
  config:      SyntaxConfig,
}

impl SyntaxManager {
  /// Create a new syntax manager with the given highlighter and config
  #[must_use]
  pub fn new(
    highlighter: Box<dyn SyntaxHighlighter>,
    config: SyntaxConfig,
  ) -> Self {
    Self {
      highlighter,
      config,
    }
  }

  /// Create a new syntax manager with the default configuration
  #[must_use]
  pub fn with_highlighter(highlighter: Box<dyn SyntaxHighlighter>) -> Self {
    Self::new(highlighter, SyntaxConfig::default())
  }

  /// Get the underlying highlighter
  #[must_use]
  pub fn highlighter(&self) -> &dyn SyntaxHighlighter {
    self.highlighter.as_ref()
  }

  #[must_use]
  pub const fn config(&self) -> &SyntaxConfig {
    &self.config
  }

  pub fn set_config(&mut self, config: SyntaxConfig) {
    self.config = config;
  }

  /// Resolve a language name using aliases
  #[must_use]
  pub fn resolve_language(&self, language: &str) -> String {
    let lowered = language.to_ascii_lowercase();
    self
      .config
      .language_aliases
      .get(&lowered)
      .cloned()
      .unwrap_or(lowered)
  }

  /// Highlight code with alias resolution and optional plain-text fallback.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::UnsupportedLanguage`] when the language is
  /// unknown and plain-text fallback is disabled, or any backend error.
  pub fn highlight_code(
    &self,
    code: &str,
    language: &str,
  ) -> SyntaxResult<String> {
    let resolved_language = self.resolve_language(language);

    if self.highlighter.supports_language(&resolved_language) {
      return self.highlighter.highlight(code, &resolved_language);
    }

    if self.config.fallback_to_plain
      && self.highlighter.supports_language("plain text")
    {
      return self.highlighter.highlight(code, "plain text");
    }

    Err(SyntaxError::UnsupportedLanguage(resolved_language))
  }

  /// Stylesheet for `theme`, or for the configured default theme.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::ThemeNotFound`] for an unknown theme.
  pub fn stylesheet(&self, theme: Option<&str>) -> SyntaxResult<String> {
    self
      .highlighter
      .stylesheet(theme.unwrap_or(&self.config.default_theme))
  }
}

impl std::fmt::Debug for SyntaxManager {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SyntaxManager")
      .field("highlighter", &self.highlighter.name())
      .field("config", &self.config)
      .finish()
  }
}
