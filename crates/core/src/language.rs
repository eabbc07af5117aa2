//! Language descriptors keyed by file extension.
//!
//! A descriptor carries everything the parser and the highlight correlator
//! need for one language: the comment symbol, the patterns derived from it,
//! and the divider token used to batch a whole file through the highlighter.

use crate::LitdocError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

/// Which section-splitting strategy a language uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// Only line-prefixed comments (`# ...`) delimit documentation.
    Line,
    /// `/* ... */` block comments delimit documentation.
    Block,
}

/// Immutable per-language record.
#[derive(Debug, Clone)]
pub struct LanguageDescriptor {
    /// Lexer name passed to the highlighter.
    pub name: String,
    /// Line comment symbol (e.g. `#`, `//`).
    pub symbol: String,
    /// Parsing strategy.
    pub style: CommentStyle,
    /// Matches a line that begins with the comment symbol.
    pub comment_matcher: Regex,
    /// Matches lines that look like comments but are not (shebangs, `#{`).
    pub comment_filter: Regex,
    /// Token inserted between sections before highlighting.
    pub divider_text: String,
    /// The divider as it appears in highlighter output.
    pub divider_pattern: Regex,
}

static COMMENT_FILTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^#![/]|^\s*#\{)").expect("comment filter pattern is valid"));

impl LanguageDescriptor {
    /// Build a descriptor, deriving the matchers and divider from `symbol`.
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, style: CommentStyle) -> Self {
        let symbol = symbol.into();
        let escaped = regex::escape(&symbol);

        let comment_matcher = Regex::new(&format!(r"^\s*{escaped}\s?"))
            .expect("escaped symbol forms a valid pattern");
        // Highlighters tag single-line comments as `c1` in most lexers and `c` in some.
        let divider_pattern = Regex::new(&format!(
            r#"\n*<span class="c1?">{escaped}DIVIDER</span>\n*"#
        ))
        .expect("escaped symbol forms a valid pattern");

        Self {
            name: name.into(),
            divider_text: format!("\n{symbol}DIVIDER\n"),
            symbol,
            style,
            comment_matcher,
            comment_filter: COMMENT_FILTER.clone(),
            divider_pattern,
        }
    }

    /// Whether `line` is a documentation comment line.
    pub fn is_comment_line(&self, line: &str) -> bool {
        self.comment_matcher.is_match(line) && !self.comment_filter.is_match(line)
    }

    /// Strip the leading comment marker (and one following space) from `line`.
    pub fn strip_comment<'a>(&self, line: &'a str) -> &'a str {
        match self.comment_matcher.find(line) {
            Some(m) => &line[m.end()..],
            None => line,
        }
    }
}

/// Mapping from file extension to language descriptor.
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    languages: HashMap<String, LanguageDescriptor>,
}

static BUILTIN: Lazy<LanguageRegistry> = Lazy::new(|| {
    let mut registry = LanguageRegistry::new();
    registry
        .register(".coffee", "coffee-script", "#", CommentStyle::Line)
        .register(".js", "javascript", "//", CommentStyle::Block)
        .register(".rb", "ruby", "#", CommentStyle::Line)
        .register(".py", "python", "#", CommentStyle::Line)
        .register(".tex", "tex", "%", CommentStyle::Line)
        .register(".latex", "tex", "%", CommentStyle::Line);
    registry
});

/// The built-in registry, constructed once per process.
pub fn default_registry() -> &'static LanguageRegistry {
    &BUILTIN
}

impl LanguageRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            languages: HashMap::new(),
        }
    }

    /// Register (or replace) the language for `extension`.
    ///
    /// The extension may be given with or without its leading dot.
    pub fn register(
        &mut self,
        extension: &str,
        name: &str,
        symbol: &str,
        style: CommentStyle,
    ) -> &mut Self {
        let key = normalize_extension(extension);
        self.languages
            .insert(key, LanguageDescriptor::new(name, symbol, style));
        self
    }

    /// Descriptor for a bare extension.
    pub fn get(&self, extension: &str) -> Option<&LanguageDescriptor> {
        self.languages.get(&normalize_extension(extension))
    }

    /// Resolve the descriptor for `path` from its extension.
    pub fn lookup(&self, path: &Path) -> Result<&LanguageDescriptor, LitdocError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.get(ext))
            .ok_or_else(|| LitdocError::UnsupportedLanguage {
                path: path.display().to_string(),
            })
    }

    /// Registered extensions, sorted, without leading dots.
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_string()
}
