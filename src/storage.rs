//! Filename derivation and page persistence.
//!
//! A page's output name is `{sanitized-title}_{page-id}.{pdf|html}`. The
//! presence of a non-empty file at the `.pdf` path is the sole resume marker
//! across runs.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Characters replaced with `_` in page titles before use as filenames.
const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const MAX_FILENAME_LEN: usize = 200;

/// Payload handed to the writer after the fetch/render steps.
#[derive(Debug, Clone)]
pub enum Payload {
    /// PDF bytes, native or locally rendered. Written as `.pdf`.
    Pdf(Vec<u8>),
    /// Raw exportable HTML. Written as `.html` with a title heading prepended.
    Html(String),
}

/// Replaces filesystem-unsafe characters and interior spaces with
/// underscores, trims surrounding whitespace and caps the length.
pub fn sanitize_filename(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| if INVALID_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect();
    replaced
        .trim()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .take(MAX_FILENAME_LEN)
        .collect()
}

pub fn page_file_name(title: &str, page_id: &str, extension: &str) -> String {
    format!("{}_{}.{}", sanitize_filename(title), page_id, extension)
}

/// Returns the path of an existing PDF for this page, if one is present.
///
/// A zero-length file is treated as absent (a truncated prior write) and the
/// page is downloaded again; any non-empty file is trusted without content
/// validation.
pub fn existing_pdf(dir: &Path, title: &str, page_id: &str) -> Option<PathBuf> {
    let path = dir.join(page_file_name(title, page_id, "pdf"));
    match fs::metadata(&path) {
        Ok(meta) if meta.len() > 0 => Some(path),
        Ok(_) => {
            warn!(path = %path.display(), "Existing PDF is empty, downloading again");
            None
        }
        Err(_) => None,
    }
}

/// Writes the page payload to its derived path and returns it.
///
/// The write is a single open-write-close operation; no partial content is
/// left behind on interrupt beyond what the filesystem itself permits.
pub fn write_page(
    dir: &Path,
    page_id: &str,
    title: &str,
    payload: &Payload,
) -> std::io::Result<PathBuf> {
    match payload {
        Payload::Pdf(bytes) => {
            let path = dir.join(page_file_name(title, page_id, "pdf"));
            fs::write(&path, bytes)?;
            Ok(path)
        }
        Payload::Html(html) => {
            let path = dir.join(page_file_name(title, page_id, "html"));
            fs::write(&path, format!("<h1>{}</h1>{}", title, html))?;
            Ok(path)
        }
    }
}
