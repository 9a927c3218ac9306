//! HTML-fragment-to-PDF conversion via printpdf's embedded HTML layout engine.
//!
//! The fragment is wrapped in a fixed document template whose stylesheet is
//! tuned for Confluence export views: constrained body typography and wide
//! tables shrunk to fit the page. Relative references inside the fragment are
//! resolved against the instance base URL before layout.
//!
//! Built without the `pdf-render` feature the engine is absent and every
//! render reports [`RenderError::Unavailable`]; callers fall back to saving
//! raw HTML.

use regex::Regex;
use url::Url;

#[cfg(feature = "pdf-render")]
use tracing::debug;

use crate::contract::PdfRender;

#[derive(Debug)]
pub enum RenderError {
    /// The crate was built without the embedded layout engine.
    Unavailable,
    /// Malformed input or a layout failure inside the engine.
    Layout(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Unavailable => {
                write!(f, "PDF rendering engine not available (pdf-render feature disabled)")
            }
            RenderError::Layout(msg) => write!(f, "PDF layout failed: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Stylesheet applied to every rendered page. Tables get a fixed narrow font
/// and a proportional shrink transform so wide Confluence tables fit the page
/// width; overflowing cell text is truncated visually.
const PAGE_STYLESHEET: &str = r#"
    body { font-family: Arial, sans-serif; line-height: 1.6; }
    .page-title { font-size: 24px; font-weight: bold; margin-bottom: 20px; }
    .content { max-width: 100%; }
    img { max-width: 100%; height: auto; }
    .table-wrapper {
        width: 100%;
        overflow-x: auto;
        margin-bottom: 1em;
        display: block;
    }
    table {
        border-collapse: collapse;
        width: 100%;
        font-size: 8px;
        table-layout: fixed;
        min-width: 600px;
        max-width: 100vw;
        overflow-x: auto;
        display: block;
        transform: scale(0.7);
        transform-origin: left top;
    }
    th, td {
        border: 1px solid #ddd;
        padding: 2px 4px;
        text-align: left;
        word-break: break-all;
        white-space: pre-line;
        max-width: 100px;
        overflow: hidden;
        text-overflow: ellipsis;
    }
    th {
        background-color: #f2f2f2;
        font-size: 8px;
    }
"#;

/// Renderer for one instance. Pure: the same fragment and base URL always
/// produce equivalent output.
pub struct HtmlToPdf {
    base_url: Url,
    attr_re: Regex,
    scheme_re: Regex,
}

impl HtmlToPdf {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            attr_re: Regex::new(r#"(?i)\b(src|href)\s*=\s*"([^"]*)""#).unwrap(),
            scheme_re: Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap(),
        })
    }

    /// Rewrites relative `src`/`href` values to absolute URLs against the
    /// base address. Already-absolute references and bare fragments are left
    /// untouched.
    pub fn absolutize(&self, fragment: &str) -> String {
        self.attr_re
            .replace_all(fragment, |caps: &regex::Captures<'_>| {
                let value = &caps[2];
                if value.is_empty() || value.starts_with('#') || self.scheme_re.is_match(value) {
                    return caps[0].to_string();
                }
                match self.base_url.join(value) {
                    Ok(abs) => format!("{}=\"{}\"", &caps[1], abs),
                    Err(_) => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Wraps the fragment in the full document template with the fixed
    /// stylesheet, after resolving relative references.
    pub fn wrap_document(&self, fragment: &str) -> String {
        let body = self.absolutize(fragment);
        format!(
            concat!(
                "<html>\n<head>\n<meta charset=\"UTF-8\">\n<style>{stylesheet}</style>\n</head>\n",
                "<body>\n<div class=\"content\"><div class=\"table-wrapper\">{body}</div></div>\n</body>\n</html>\n"
            ),
            stylesheet = PAGE_STYLESHEET,
            body = body,
        )
    }

    #[cfg(feature = "pdf-render")]
    fn render_document(&self, document: &str) -> Result<Vec<u8>, RenderError> {
        use printpdf::{GeneratePdfOptions, PdfDocument, PdfSaveOptions};
        use std::collections::BTreeMap;

        let mut warnings = Vec::new();
        let doc = PdfDocument::from_html(
            document,
            &BTreeMap::new(),
            &BTreeMap::new(),
            &GeneratePdfOptions::default(),
            &mut warnings,
        )
        .map_err(RenderError::Layout)?;
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "PDF layout produced warnings");
        }
        Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
    }
}

impl PdfRender for HtmlToPdf {
    fn render(&self, html_fragment: &str) -> Result<Vec<u8>, RenderError> {
        #[cfg(feature = "pdf-render")]
        {
            let document = self.wrap_document(html_fragment);
            self.render_document(&document)
        }
        #[cfg(not(feature = "pdf-render"))]
        {
            let _ = html_fragment;
            Err(RenderError::Unavailable)
        }
    }
}
