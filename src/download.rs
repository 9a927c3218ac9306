//! High-level pipeline: list → fetch → convert → save for one space.
//!
//! This module drives the whole download for a configured space:
//!   - Lists every page via the injected [`PageSource`]
//!   - Skips pages whose PDF already exists on disk (idempotent re-runs)
//!   - Runs the export cascade for the rest, rendering HTML bodies to PDF
//!     through the injected [`PdfRender`], with a raw-HTML fallback
//!   - Writes each result and aggregates a [`DownloadReport`]
//!
//! Per-page failures are tallied and never abort the run; the only fatal
//! error is failing to create the output directory.
//!
//! # Callable From
//! - The CLI (`lib::run`) with the real client and renderer
//! - Integration tests with mock implementations of either trait

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::ExportConfig;
use crate::contract::{ExportAttempt, PageSource, PdfRender};
use crate::html_to_pdf::RenderError;
use crate::storage::{self, Payload};

/// Aggregate outcome of one run.
#[derive(Debug)]
pub struct DownloadReport {
    pub successful: usize,
    pub failed: usize,
    /// Absolute path of the space's output directory.
    pub output_dir: PathBuf,
}

#[derive(Debug)]
pub enum DownloadError {
    /// The output directory could not be created.
    Filesystem(std::io::Error),
}

impl std::fmt::Display for DownloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloadError::Filesystem(e) => write!(f, "failed to prepare output directory: {e}"),
        }
    }
}

impl std::error::Error for DownloadError {}

/// Entrypoint: download all pages of the configured space.
pub async fn run<S, R>(
    config: &ExportConfig,
    source: &S,
    renderer: &R,
) -> Result<DownloadReport, DownloadError>
where
    S: PageSource,
    R: PdfRender,
{
    let space_dir = config.space_dir();
    if let Err(e) = fs::create_dir_all(&space_dir) {
        error!(error = ?e, path = %space_dir.display(), "Failed to create output directory");
        return Err(DownloadError::Filesystem(e));
    }
    info!(
        space_key = %config.space_key,
        path = %space_dir.display(),
        "Starting download of all pages"
    );

    let pages = source.list_pages(&config.space_key).await;
    if pages.is_empty() {
        info!(space_key = %config.space_key, "No pages found, nothing to do");
    }

    let page_delay = Duration::from_millis(config.page_delay_ms);
    let total = pages.len();
    let mut successful = 0usize;
    let mut failed = 0usize;
    let mut warned_render_unavailable = false;

    for (index, page) in pages.iter().enumerate() {
        info!(
            page = index + 1,
            total = total,
            title = %page.title,
            page_id = %page.id,
            "Processing page"
        );

        if let Some(existing) = storage::existing_pdf(&space_dir, &page.title, &page.id) {
            info!(path = %existing.display(), title = %page.title, page_id = %page.id, "File already exists, skipping");
            successful += 1;
            continue;
        }

        // Request-rate control before hitting the export endpoints.
        tokio::time::sleep(page_delay).await;

        let payload = match source.fetch_page(&page.id).await {
            ExportAttempt::Pdf(bytes) => Payload::Pdf(bytes),
            ExportAttempt::Html(html) => {
                info!(title = %page.title, page_id = %page.id, "PDF export not available, converting HTML");
                let titled = format!("<div class=\"page-title\">{}</div>{}", page.title, html);
                match renderer.render(&titled) {
                    Ok(bytes) => Payload::Pdf(bytes),
                    Err(RenderError::Unavailable) => {
                        if !warned_render_unavailable {
                            warn!("PDF rendering engine unavailable, saving raw HTML instead");
                            warned_render_unavailable = true;
                        }
                        Payload::Html(html)
                    }
                    Err(e) => {
                        error!(error = %e, title = %page.title, page_id = %page.id, "HTML rendering failed, saving raw HTML instead");
                        Payload::Html(html)
                    }
                }
            }
            ExportAttempt::Unavailable => {
                error!(title = %page.title, page_id = %page.id, "Failed to download page");
                failed += 1;
                continue;
            }
        };

        match storage::write_page(&space_dir, &page.id, &page.title, &payload) {
            Ok(path) => {
                info!(path = %path.display(), title = %page.title, page_id = %page.id, "Saved page");
                successful += 1;
            }
            Err(e) => {
                error!(error = ?e, title = %page.title, page_id = %page.id, "Error saving page");
                failed += 1;
            }
        }
    }

    let output_dir = fs::canonicalize(&space_dir).unwrap_or(space_dir);
    info!(
        successful = successful,
        failed = failed,
        path = %output_dir.display(),
        "Download completed"
    );

    Ok(DownloadReport {
        successful,
        failed,
        output_dir,
    })
}
