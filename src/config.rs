use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Fully validated run configuration. Constructed by `load_config`; the
/// pipeline itself never reads the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Instance URL, e.g. `https://yourcompany.atlassian.net`. No trailing slash.
    pub base_url: String,
    /// Username or email for basic auth.
    pub username: String,
    /// API token or password paired with `username`.
    pub api_token: String,
    /// Short key of the space to download.
    pub space_key: String,
    /// Root directory for downloads; pages land in `confluence_{space_key}/` below it.
    pub output_dir: PathBuf,
    /// Listing batch size per request.
    pub page_size: usize,
    /// Optional cap on the total number of pages fetched.
    pub max_pages: Option<usize>,
    /// Pause between listing batches, in milliseconds.
    pub list_delay_ms: u64,
    /// Pause before each page fetch (skipped pages excluded), in milliseconds.
    pub page_delay_ms: u64,
}

pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const DEFAULT_LIST_DELAY_MS: u64 = 500;
pub const DEFAULT_PAGE_DELAY_MS: u64 = 1_000;

impl ExportConfig {
    /// Directory all page files for this space are written to.
    pub fn space_dir(&self) -> PathBuf {
        self.output_dir.join(format!("confluence_{}", self.space_key))
    }

    pub fn trace_loaded(&self) {
        info!(
            base_url = %self.base_url,
            username = %self.username,
            api_token_len = self.api_token.len(),
            space_key = %self.space_key,
            output_dir = %self.output_dir.display(),
            page_size = self.page_size,
            "Loaded ExportConfig"
        );
        debug!(max_pages = ?self.max_pages, "ExportConfig page cap");
    }
}
