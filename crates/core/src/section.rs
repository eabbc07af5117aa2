/// One comment block and the code that follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    /// Comment prose with comment markers removed.
    pub docs_text: String,
    /// Code exactly as it appears in the source.
    pub code_text: String,
}

impl Section {
    /// Create a section from its two text halves.
    pub fn new(docs_text: impl Into<String>, code_text: impl Into<String>) -> Self {
        Self {
            docs_text: docs_text.into(),
            code_text: code_text.into(),
        }
    }
}

/// A section after highlighting, with both HTML halves filled in.
///
/// Only the highlight correlator constructs these, and only for a whole file
/// at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedSection {
    /// Comment prose with comment markers removed.
    pub docs_text: String,
    /// Code exactly as it appears in the source.
    pub code_text: String,
    /// Rendered Markdown of `docs_text`.
    pub docs_html: String,
    /// Highlighted markup of `code_text`, wrapper included.
    pub code_html: String,
}
