use std::sync::Arc;

use log::debug;

use super::{Display, Fragment, Next, RenderStage};
use crate::syntax::SyntaxManager;

/// Highlights fenced code that names a language.
///
/// On any failure the fragment is passed on unchanged, so the code renders
/// as plain escaped text.
#[derive(Debug, Clone)]
pub struct HighlightStage {
  manager: Arc<SyntaxManager>,
}

impl HighlightStage {
  #[must_use]
  pub const fn new(manager: Arc<SyntaxManager>) -> Self {
    Self { manager }
  }
}

impl RenderStage for HighlightStage {
  fn name(&self) -> &'static str {
    "highlight"
  }

  fn render(&self, fragment: &Fragment<'_>, next: Next<'_>) -> String {
    let Fragment::Code(code) = fragment else {
      return next.run(fragment);
    };
    if code.display != Display::Block || code.markup.is_some() {
      return next.run(fragment);
    }
    let Some(language) = code.language() else {
      return next.run(fragment);
    };

    match self.manager.highlight_code(code.source, language) {
      Ok(markup) => {
        let mut highlighted = code.clone();
        highlighted.markup = Some(markup);
        next.run(&Fragment::Code(highlighted))
      },
      Err(e) => {
        debug!("Leaving {language} code unhighlighted: {e}");
        next.run(fragment)
      },
    }
  }
}
