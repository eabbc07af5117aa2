use std::time::Duration;
use thiserror::Error;

/// Errors that abort documentation of a single source file.
#[derive(Debug, Error)]
pub enum LitdocError {
    /// The file's extension has no registered language.
    #[error("no language registered for '{path}'")]
    UnsupportedLanguage {
        /// Path whose extension failed to resolve.
        path: String,
    },
    /// The external highlighter could not be run to completion.
    #[error("highlighter failed for {language}: {reason}")]
    HighlightProcessFailure {
        /// Lexer name the highlighter was invoked with.
        language: String,
        /// What went wrong.
        reason: HighlightFailure,
    },
    /// The highlighter output did not split back into one fragment per section.
    #[error("expected {expected} highlighted fragments, found {found}")]
    SectionAlignmentFailure {
        /// Number of parsed sections.
        expected: usize,
        /// Number of fragments recovered from the highlighter output.
        found: usize,
    },
    /// IO error while reading a source or writing a page.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LitdocError {
    /// Stable name of the failure kind, used in per-file diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            LitdocError::UnsupportedLanguage { .. } => "UnsupportedLanguage",
            LitdocError::HighlightProcessFailure { .. } => "HighlightProcessFailure",
            LitdocError::SectionAlignmentFailure { .. } => "SectionAlignmentFailure",
            LitdocError::Io(_) => "Io",
        }
    }

    /// Create a highlighter failure for the given lexer.
    pub fn highlight(language: impl Into<String>, reason: HighlightFailure) -> Self {
        Self::HighlightProcessFailure {
            language: language.into(),
            reason,
        }
    }
}

/// Reasons an external highlighter invocation fails.
#[derive(Debug, Error)]
pub enum HighlightFailure {
    /// The process could not be started.
    #[error("could not spawn '{program}': {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying OS error.
        source: std::io::Error,
    },
    /// Writing stdin or draining stdout/stderr failed.
    #[error("pipe error: {0}")]
    Pipe(#[source] std::io::Error),
    /// The process exited unsuccessfully.
    #[error("exited with {status}: {stderr}")]
    Exit {
        /// Exit status as reported by the OS.
        status: String,
        /// Captured standard error.
        stderr: String,
    },
    /// Standard output was not valid UTF-8.
    #[error("output is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
    /// The process did not finish in time and was killed.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// A section whose Markdown failed to render and was replaced by escaped text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFallback {
    /// Zero-based index of the section.
    pub section: usize,
    /// Message reported by the renderer.
    pub message: String,
}

impl std::fmt::Display for RenderFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "section {}: markdown rendering failed, using escaped text: {}",
            self.section + 1,
            self.message
        )
    }
}

/// Non-fatal diagnostics collected while highlighting one file.
#[derive(Debug, Clone, Default)]
pub struct RenderDiagnostics {
    /// Sections that fell back to escaped text.
    pub fallbacks: Vec<RenderFallback>,
}

impl RenderDiagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rendering fallback for a section.
    pub fn add_fallback(&mut self, section: usize, message: impl Into<String>) {
        self.fallbacks.push(RenderFallback {
            section,
            message: message.into(),
        });
    }

    /// Check if any section fell back
    pub fn has_fallbacks(&self) -> bool {
        !self.fallbacks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_stable() {
        let err = LitdocError::SectionAlignmentFailure {
            expected: 3,
            found: 2,
        };
        assert_eq!(err.kind(), "SectionAlignmentFailure");
        assert_eq!(err.to_string(), "expected 3 highlighted fragments, found 2");

        let err = LitdocError::highlight("python", HighlightFailure::Timeout(Duration::from_secs(5)));
        assert_eq!(err.kind(), "HighlightProcessFailure");
        assert_eq!(err.to_string(), "highlighter failed for python: timed out after 5s");
    }

    #[test]
    fn fallback_display_is_one_based() {
        let mut diagnostics = RenderDiagnostics::new();
        assert!(!diagnostics.has_fallbacks());
        diagnostics.add_fallback(0, "boom");
        assert!(diagnostics.has_fallbacks());
        assert_eq!(
            diagnostics.fallbacks[0].to_string(),
            "section 1: markdown rendering failed, using escaped text: boom"
        );
    }
}
