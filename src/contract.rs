//! # contract: shared types and trait seams for the export pipeline
//!
//! This module defines the data carried between pipeline stages and the two
//! traits the orchestrator is generic over:
//!
//! - [`PageSource`]: enumerates the pages of a space and fetches a renderable
//!   representation of a single page (native PDF export or exportable HTML).
//! - [`PdfRender`]: converts an HTML fragment into PDF bytes.
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall` so the orchestrator can be
//!   exercised against deterministic mocks in integration tests.
//!
//! ## Error contract
//! - `PageSource` methods do not return errors: transport failures are
//!   logged inside the implementation and surface as partial listings or
//!   [`ExportAttempt::Unavailable`]. The per-page failure tally belongs to
//!   the orchestrator.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::html_to_pdf::RenderError;

/// Metadata record identifying one page within a space, as returned by the
/// content-listing endpoint.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PageDescriptor {
    /// Opaque page identifier, unique within the instance.
    pub id: String,
    /// Display title; becomes the output filename after sanitization.
    pub title: String,
    /// Passthrough metadata, kept verbatim for downstream consumers.
    #[serde(default)]
    pub space: Option<serde_json::Value>,
    #[serde(default)]
    pub version: Option<serde_json::Value>,
    #[serde(default)]
    pub ancestors: Option<serde_json::Value>,
}

/// Outcome of the export cascade for a single page.
#[derive(Debug, Clone)]
pub enum ExportAttempt {
    /// A ready-made PDF byte stream from one of the native export endpoints.
    Pdf(Vec<u8>),
    /// The page's exportable HTML body, to be rendered locally.
    Html(String),
    /// Every step of the cascade failed; nothing to write.
    Unavailable,
}

/// Trait for listing and fetching pages from the remote wiki.
/// Implemented by the real API client and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait PageSource: Send + Sync {
    /// List every page in the given space, preserving remote ordering.
    ///
    /// Returns whatever was accumulated when a transport failure interrupts
    /// pagination; an empty vector is a valid "nothing to do" outcome.
    async fn list_pages(&self, space_key: &str) -> Vec<PageDescriptor>;

    /// Run the export cascade for one page: native PDF export variants first,
    /// then the exportable HTML body.
    async fn fetch_page(&self, page_id: &str) -> ExportAttempt;
}

/// Trait for rendering an HTML fragment into a PDF byte stream.
///
/// Implementations must be pure: the same fragment (plus whatever base URL
/// the implementation was constructed with) yields equivalent output.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait PdfRender: Send + Sync {
    fn render(&self, html_fragment: &str) -> Result<Vec<u8>, RenderError>;
}
