//! Batch driver: documents a list of source files into an output directory.
//!
//! Failures are scoped to the file that caused them. Every file gets an
//! outcome, reported in listing order.

use futures_util::stream::{self, StreamExt};
use litdoc_core::{
    Highlighter, LanguageRegistry, LitdocError, MarkdownRenderer, highlight_sections,
    parse_sections,
};
use litdoc_page::{Page, STYLESHEET, STYLESHEET_NAME, destination, page_file_name, render_page};
use std::path::{Path, PathBuf};

/// Shared, read-only state for a run.
pub struct Context<'a, H, M> {
    /// Extension to language mapping.
    pub registry: &'a LanguageRegistry,
    /// Highlighter used for every file.
    pub highlighter: H,
    /// Markdown renderer used for every section.
    pub markdown: M,
    /// Flat directory pages are written into.
    pub output_dir: PathBuf,
    /// Files processed concurrently; 1 processes strictly one after another.
    ///
    /// Above 1, sources sharing a file stem may write their page at the
    /// same time and leave mixed content behind.
    pub jobs: usize,
}

/// Result of documenting one source file.
#[derive(Debug)]
pub struct FileOutcome {
    /// Source path as given.
    pub source: PathBuf,
    /// Path of the written page, or why none was written.
    pub result: Result<PathBuf, LitdocError>,
}

/// Outcomes of a run, in listing order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// One entry per source.
    pub outcomes: Vec<FileOutcome>,
}

impl BatchSummary {
    /// Outcomes that produced a page.
    pub fn succeeded(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.result.is_ok())
    }

    /// Outcomes that produced no page.
    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.result.is_err())
    }

    /// Whether every file produced a page.
    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Document every file in `sources`.
///
/// The list is sorted and frozen before any file starts, since every page
/// links to all of them. Only setting up the output directory can fail the
/// whole run.
pub async fn run_batch<H, M>(
    mut sources: Vec<PathBuf>,
    context: &Context<'_, H, M>,
) -> Result<BatchSummary, LitdocError>
where
    H: Highlighter,
    M: MarkdownRenderer,
{
    sources.sort();
    sources.dedup();

    tokio::fs::create_dir_all(&context.output_dir).await?;
    tokio::fs::write(context.output_dir.join(STYLESHEET_NAME), STYLESHEET).await?;

    let listing = sources.as_slice();
    let outcomes = stream::iter(listing)
        .map(move |source| async move {
            FileOutcome {
                source: source.clone(),
                result: document_file(source, listing, context).await,
            }
        })
        .buffered(context.jobs.max(1))
        .inspect(|outcome| {
            if let Err(err) = &outcome.result {
                log::error!("{}: {}: {}", outcome.source.display(), err.kind(), err);
            }
        })
        .collect::<Vec<_>>()
        .await;

    Ok(BatchSummary { outcomes })
}

/// Parse, highlight, render, and write the page for one source file.
pub async fn document_file<H, M>(
    source: &Path,
    listing: &[PathBuf],
    context: &Context<'_, H, M>,
) -> Result<PathBuf, LitdocError>
where
    H: Highlighter,
    M: MarkdownRenderer,
{
    let language = context.registry.lookup(source)?;
    let code = tokio::fs::read_to_string(source).await?;

    let sections = parse_sections(&code, language);
    log::debug!(
        "{}: {} sections as {}",
        source.display(),
        sections.len(),
        language.name
    );

    let highlighted =
        highlight_sections(sections, language, &context.highlighter, &context.markdown).await?;
    for fallback in &highlighted.diagnostics.fallbacks {
        log::warn!("{}: {}", source.display(), fallback);
    }

    let title = source
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let html = render_page(
        &Page {
            title: &title,
            sections: &highlighted.sections,
            sources: listing,
        },
        page_file_name,
    );

    let dest = destination(&context.output_dir, source);
    tokio::fs::write(&dest, html).await?;
    log::info!("litdoc: {} -> {}", source.display(), dest.display());
    Ok(dest)
}
