//! Markdown processing.
//!
//! - [`core`]: the processor and its rendering pipeline
//! - [`transform`]: AST passes feeding directives and code to the render
//!   chain
//! - [`process`]: high-level entry points with panic recovery
//! - [`types`]: options, builder and the processor type
pub mod core;
pub mod process;
pub mod transform;
pub mod types;

pub use core::{ProcessorFeature, extract_inline_text};

pub use process::{
  ProcessorPreset,
  create_processor,
  process_batch,
  process_markdown_file,
  process_markdown_string,
  process_with_recovery,
};
pub use transform::{CodeTransformer, DirectiveTransformer};
pub use types::{
  AstTransformer,
  MarkdownOptions,
  MarkdownOptionsBuilder,
  MarkdownProcessor,
};
