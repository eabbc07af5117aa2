//! Markdown rendering for section prose.

/// Renders the prose half of a section to an HTML fragment.
pub trait MarkdownRenderer {
    /// Render `text`, or report why it could not be rendered.
    fn render(&self, text: &str) -> Result<String, String>;
}

impl<F> MarkdownRenderer for F
where
    F: Fn(&str) -> Result<String, String>,
{
    fn render(&self, text: &str) -> Result<String, String> {
        (self)(text)
    }
}

/// GitHub Flavored Markdown via markdown-rs.
pub struct GfmMarkdown {
    options: markdown::Options,
}

impl GfmMarkdown {
    /// GFM with raw HTML escaped.
    pub fn new() -> Self {
        Self {
            options: markdown::Options::gfm(),
        }
    }

    /// GFM that passes raw HTML in comments through unchanged.
    pub fn with_raw_html() -> Self {
        let mut options = markdown::Options::gfm();
        options.compile.allow_dangerous_html = true;
        Self { options }
    }
}

impl Default for GfmMarkdown {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for GfmMarkdown {
    fn render(&self, text: &str) -> Result<String, String> {
        markdown::to_html_with_options(text, &self.options).map_err(|message| message.to_string())
    }
}

/// Escaped-text substitute for prose that failed to render.
pub fn escape_fallback(text: &str) -> String {
    format!("<pre>{}</pre>", html_escape::encode_text(text))
}
