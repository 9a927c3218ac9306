//! Confluence REST client: paginated space listing plus the per-page export
//! cascade (native PDF export variants, then the exportable HTML body).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::config::ExportConfig;
use crate::contract::{ExportAttempt, PageDescriptor, PageSource};

const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Authenticated client for one Confluence instance.
///
/// Holds the shared HTTP session, the target space key (one export endpoint
/// is space-scoped) and the listing/pacing parameters from [`ExportConfig`].
pub struct ConfluenceClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    api_token: String,
    space_key: String,
    page_size: usize,
    max_pages: Option<usize>,
    list_delay: Duration,
}

#[derive(Deserialize)]
struct ContentList {
    #[serde(default)]
    results: Vec<PageDescriptor>,
}

impl ConfluenceClient {
    pub fn new(config: &ExportConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(), // avoid "//"
            username: config.username.clone(),
            api_token: config.api_token.clone(),
            space_key: config.space_key.clone(),
            page_size: config.page_size.max(1),
            max_pages: config.max_pages,
            list_delay: Duration::from_millis(config.list_delay_ms),
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .basic_auth(self.username.clone(), Some(self.api_token.clone()))
    }

    /// Accepts the response only on HTTP success with a PDF content type.
    async fn pdf_body(resp: reqwest::Response) -> Result<Option<Vec<u8>>, reqwest::Error> {
        if !resp.status().is_success() {
            return Ok(None);
        }
        let is_pdf = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with(PDF_MEDIA_TYPE))
            .unwrap_or(false);
        if !is_pdf {
            return Ok(None);
        }
        Ok(Some(resp.bytes().await?.to_vec()))
    }

    /// Cloud PDF export, space-scoped URL shape.
    async fn export_pdf_action(&self, page_id: &str) -> Result<Option<Vec<u8>>, reqwest::Error> {
        let url = format!(
            "{}/wiki/spaces/{}/pdfpageexport.action",
            self.base_url, self.space_key
        );
        let resp = self.get(&url).query(&[("pageId", page_id)]).send().await?;
        Self::pdf_body(resp).await
    }

    /// Alternative export URL shape; same acceptance rule.
    async fn export_word(&self, page_id: &str) -> Result<Option<Vec<u8>>, reqwest::Error> {
        let url = format!("{}/wiki/exportword", self.base_url);
        let resp = self
            .get(&url)
            .query(&[("pageId", page_id), ("exportType", "PDF")])
            .send()
            .await?;
        Self::pdf_body(resp).await
    }

    /// Fetches the page's exportable HTML body. `Ok(None)` on an error status,
    /// empty string when the nested body field is absent.
    async fn export_view_html(&self, page_id: &str) -> Result<Option<String>, reqwest::Error> {
        let url = format!("{}/wiki/rest/api/content/{}", self.base_url, page_id);
        let resp = self
            .get(&url)
            .query(&[("expand", "body.export_view,space,version,ancestors")])
            .send()
            .await?;
        if !resp.status().is_success() {
            debug!(page_id = %page_id, status = %resp.status(), "Content retrieval returned error status");
            return Ok(None);
        }
        let json = resp.json::<serde_json::Value>().await?;
        let html = json
            .get("body")
            .and_then(|b| b.get("export_view"))
            .and_then(|v| v.get("value"))
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        Ok(Some(html))
    }
}

#[async_trait]
impl PageSource for ConfluenceClient {
    async fn list_pages(&self, space_key: &str) -> Vec<PageDescriptor> {
        let url = format!("{}/wiki/rest/api/content", self.base_url);
        let limit = self.page_size.to_string();
        let mut pages: Vec<PageDescriptor> = Vec::new();
        let mut start = 0usize;

        loop {
            let start_param = start.to_string();
            let resp = self
                .get(&url)
                .query(&[
                    ("spaceKey", space_key),
                    ("type", "page"),
                    ("status", "current"),
                    ("limit", limit.as_str()),
                    ("start", start_param.as_str()),
                    ("expand", "space,version,ancestors"),
                ])
                .send()
                .await;

            let batch = match resp {
                Ok(r) if r.status().is_success() => match r.json::<ContentList>().await {
                    Ok(list) => list.results,
                    Err(e) => {
                        error!(error = ?e, url = %url, start = start, "Failed to parse content listing");
                        break;
                    }
                },
                Ok(r) => {
                    error!(status = %r.status(), url = %url, start = start, "Content listing returned error");
                    break;
                }
                Err(e) => {
                    error!(error = ?e, url = %url, start = start, "Error fetching pages");
                    break;
                }
            };

            let size = batch.len();
            pages.extend(batch);
            info!(fetched = size, total = pages.len(), "Fetched listing batch");

            if let Some(cap) = self.max_pages {
                if pages.len() >= cap {
                    pages.truncate(cap);
                    info!(cap = cap, "Page cap reached, stopping listing");
                    break;
                }
            }
            // Fewer results than requested means the last batch was reached.
            if size < self.page_size {
                break;
            }
            start += self.page_size;
            tokio::time::sleep(self.list_delay).await;
        }

        info!(total = pages.len(), space_key = %space_key, "Total pages found");
        pages
    }

    async fn fetch_page(&self, page_id: &str) -> ExportAttempt {
        match self.export_pdf_action(page_id).await {
            Ok(Some(bytes)) => {
                info!(page_id = %page_id, size = bytes.len(), "Native PDF export succeeded");
                return ExportAttempt::Pdf(bytes);
            }
            Ok(None) => debug!(page_id = %page_id, "PDF export method 1 declined"),
            Err(e) => debug!(page_id = %page_id, error = ?e, "PDF export method 1 failed"),
        }

        match self.export_word(page_id).await {
            Ok(Some(bytes)) => {
                info!(page_id = %page_id, size = bytes.len(), "Alternative PDF export succeeded");
                return ExportAttempt::Pdf(bytes);
            }
            Ok(None) => debug!(page_id = %page_id, "PDF export method 2 declined"),
            Err(e) => debug!(page_id = %page_id, error = ?e, "PDF export method 2 failed"),
        }

        match self.export_view_html(page_id).await {
            Ok(Some(html)) => {
                info!(page_id = %page_id, size = html.len(), "Fetched exportable HTML body");
                return ExportAttempt::Html(html);
            }
            Ok(None) => {}
            Err(e) => error!(page_id = %page_id, error = ?e, "Error fetching HTML content"),
        }

        ExportAttempt::Unavailable
    }
}
