//! Trait-based syntax highlighting with pluggable backends.
//!
//! The only bundled backend is **Syntect**, using Sublime Text syntax
//! definitions extended by two-face. It is enabled by the default `syntect`
//! feature; without it [`create_default_manager`] reports
//! [`SyntaxError::NoBackendAvailable`] and code is rendered unhighlighted.

pub mod error;
pub mod types;

pub use error::{SyntaxError, SyntaxResult};
pub use types::{SyntaxConfig, SyntaxHighlighter, SyntaxManager};

#[cfg(feature = "syntect")] mod syntect;
#[cfg(feature = "syntect")] pub use syntect::*;

/// Create the default syntax manager based on available features.
///
/// # Errors
///
/// Returns [`SyntaxError::NoBackendAvailable`] if no backend feature is
/// enabled.
pub fn create_default_manager() -> SyntaxResult<SyntaxManager> {
  #[cfg(feature = "syntect")]
  {
    Ok(create_syntect_manager())
  }

  #[cfg(not(feature = "syntect"))]
  {
    Err(SyntaxError::NoBackendAvailable)
  }
}
