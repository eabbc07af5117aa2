//! Whole-file syntax highlighting and per-section resegmentation.
//!
//! All of a file's code goes through the highlighter in one invocation, with
//! the language's divider token between sections. The divider comes back as a
//! highlighted comment, and splitting on it recovers one fragment per section.

use crate::{
    HighlightFailure, HighlightedSection, LanguageDescriptor, LitdocError, MarkdownRenderer,
    RenderDiagnostics, Section, escape_fallback,
};
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

/// Opening wrapper the highlighter emits around a code block.
pub const HIGHLIGHT_START: &str = r#"<div class="highlight"><pre>"#;
/// Closing wrapper the highlighter emits around a code block.
pub const HIGHLIGHT_END: &str = "</pre></div>";
/// Emitted after the opening wrapper by newer Pygments releases.
const EMPTY_SPAN: &str = "<span></span>";

/// An external syntax highlighter producing HTML.
pub trait Highlighter {
    /// Highlight `code` written in the lexer `language`.
    fn highlight(
        &self,
        language: &str,
        code: &str,
    ) -> impl Future<Output = Result<String, LitdocError>> + Send;
}

/// Highlights through a `pygmentize` process.
#[derive(Debug, Clone)]
pub struct Pygmentize {
    program: String,
    tab_size: u32,
    timeout: Option<Duration>,
}

impl Pygmentize {
    /// `pygmentize` from `PATH`, tab size 2, 30 second timeout.
    pub fn new() -> Self {
        Self {
            program: "pygmentize".to_string(),
            tab_size: 2,
            timeout: Some(Duration::from_secs(30)),
        }
    }

    /// Use a different executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the tab width passed to the formatter.
    pub fn with_tab_size(mut self, tab_size: u32) -> Self {
        self.tab_size = tab_size;
        self
    }

    /// Set (or disable, with `None`) the per-file time limit.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn args(&self, language: &str) -> Vec<String> {
        vec![
            "-l".to_string(),
            language.to_string(),
            "-f".to_string(),
            "html".to_string(),
            "-O".to_string(),
            format!("encoding=utf-8,tabsize={}", self.tab_size),
        ]
    }

    async fn run(&self, language: &str, code: &str) -> Result<String, LitdocError> {
        let pipe = |err: io::Error| LitdocError::highlight(language, HighlightFailure::Pipe(err));

        let mut child = Command::new(&self.program)
            .args(self.args(language))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                LitdocError::highlight(
                    language,
                    HighlightFailure::Spawn {
                        program: self.program.clone(),
                        source,
                    },
                )
            })?;

        let (Some(mut stdin), Some(mut stdout), Some(mut stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            return Err(pipe(io::Error::other("child pipes were not captured")));
        };

        let write = async move {
            stdin.write_all(code.as_bytes()).await?;
            stdin.shutdown().await
        };
        let mut out = Vec::new();
        let mut err = Vec::new();
        // stderr is drained alongside stdout so neither pipe can fill up
        let (written, read_out, read_err) = tokio::join!(
            write,
            stdout.read_to_end(&mut out),
            stderr.read_to_end(&mut err)
        );
        read_out.map_err(pipe)?;
        read_err.map_err(pipe)?;
        let status = child.wait().await.map_err(pipe)?;

        let diagnostics = String::from_utf8_lossy(&err);
        for line in diagnostics.lines().filter(|line| !line.trim().is_empty()) {
            log::warn!("{}: {}", self.program, line);
        }
        if !status.success() {
            return Err(LitdocError::highlight(
                language,
                HighlightFailure::Exit {
                    status: status.to_string(),
                    stderr: diagnostics.trim().to_string(),
                },
            ));
        }
        written.map_err(pipe)?;

        String::from_utf8(out).map_err(|err| LitdocError::highlight(language, err.into()))
    }
}

impl Default for Pygmentize {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for Pygmentize {
    async fn highlight(&self, language: &str, code: &str) -> Result<String, LitdocError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(language, code))
                .await
                .map_err(|_| LitdocError::highlight(language, HighlightFailure::Timeout(limit)))?,
            None => self.run(language, code).await,
        }
    }
}

/// A file's sections with both HTML halves filled in.
#[derive(Debug, Clone)]
pub struct HighlightedFile {
    /// Sections in source order.
    pub sections: Vec<HighlightedSection>,
    /// Sections whose prose fell back to escaped text.
    pub diagnostics: RenderDiagnostics,
}

/// Join every section's code with the language's divider token.
pub fn join_code(sections: &[Section], language: &LanguageDescriptor) -> String {
    sections
        .iter()
        .map(|section| section.code_text.as_str())
        .collect::<Vec<_>>()
        .join(&language.divider_text)
}

/// Remove the block wrapper from whole-file highlighter output.
fn unwrap_block(output: &str) -> &str {
    let body = output.strip_prefix(HIGHLIGHT_START).unwrap_or(output);
    let body = body.strip_prefix(EMPTY_SPAN).unwrap_or(body);
    body.trim_end_matches(['\r', '\n'])
        .strip_suffix(HIGHLIGHT_END)
        .unwrap_or(body)
}

/// Split whole-file highlighter output back into `expected` wrapped fragments.
///
/// Fails with [`LitdocError::SectionAlignmentFailure`] when the divider count
/// does not line up with the sections, e.g. when the source itself contains
/// the divider text.
pub fn split_highlighted(
    output: &str,
    language: &LanguageDescriptor,
    expected: usize,
) -> Result<Vec<String>, LitdocError> {
    let fragments: Vec<&str> = language.divider_pattern.split(unwrap_block(output)).collect();
    if fragments.len() != expected {
        return Err(LitdocError::SectionAlignmentFailure {
            expected,
            found: fragments.len(),
        });
    }

    Ok(fragments
        .into_iter()
        .map(|fragment| format!("{HIGHLIGHT_START}{fragment}{HIGHLIGHT_END}"))
        .collect())
}

/// Highlight a file's sections in one highlighter call and render their prose.
///
/// Either every section comes back with both HTML fields, or the file fails.
/// A Markdown fault only affects its own section, which gets escaped text and
/// an entry in the returned diagnostics.
pub async fn highlight_sections<H, M>(
    sections: Vec<Section>,
    language: &LanguageDescriptor,
    highlighter: &H,
    markdown: &M,
) -> Result<HighlightedFile, LitdocError>
where
    H: Highlighter,
    M: MarkdownRenderer,
{
    let blob = join_code(&sections, language);
    let output = highlighter.highlight(&language.name, &blob).await?;
    let fragments = split_highlighted(&output, language, sections.len())?;

    let mut diagnostics = RenderDiagnostics::new();
    let sections = sections
        .into_iter()
        .zip(fragments)
        .enumerate()
        .map(|(index, (section, code_html))| {
            let docs_html = match markdown.render(&section.docs_text) {
                Ok(html) => html,
                Err(message) => {
                    diagnostics.add_fallback(index, message);
                    escape_fallback(&section.docs_text)
                }
            };
            HighlightedSection {
                docs_text: section.docs_text,
                code_text: section.code_text,
                docs_html,
                code_html,
            }
        })
        .collect();

    Ok(HighlightedFile {
        sections,
        diagnostics,
    })
}
