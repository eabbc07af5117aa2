#![deny(missing_docs)]
//! litdoc core: language registry, section parsing, and highlight correlation.

/// Error and diagnostic types.
pub mod error;
/// Whole-file highlighting and resegmentation.
pub mod highlight;
/// Language descriptors and the extension registry.
pub mod language;
/// Section-splitting parsers.
pub mod parse;
/// Markdown rendering for section prose.
pub mod prose;
/// Section records.
pub mod section;

pub use error::{HighlightFailure, LitdocError, RenderDiagnostics, RenderFallback};
pub use highlight::{
    HIGHLIGHT_END, HIGHLIGHT_START, HighlightedFile, Highlighter, Pygmentize, highlight_sections,
    join_code, split_highlighted,
};
pub use language::{CommentStyle, LanguageDescriptor, LanguageRegistry, default_registry};
pub use prose::{GfmMarkdown, MarkdownRenderer, escape_fallback};
pub use parse::{parse_blocks, parse_lines, parse_sections};
pub use section::{HighlightedSection, Section};
