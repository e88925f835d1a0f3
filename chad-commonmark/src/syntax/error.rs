//! Errors raised while highlighting code or building theme CSS.

pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Why a code block could not be highlighted.
///
/// None of these reach the rendered message: the highlight stage logs them
/// and keeps the unhighlighted code.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
  #[error("No syntax definition for language '{0}'")]
  UnsupportedLanguage(String),
  #[error("Unknown highlight theme '{0}'")]
  ThemeNotFound(String),
  #[error("Highlighting failed: {0}")]
  HighlightingFailed(String),
  #[error("Built without a highlighting backend; enable the 'syntect' feature")]
  NoBackendAvailable,
}
