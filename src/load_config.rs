use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tracing::{error, info};

use crate::config::{
    ExportConfig, DEFAULT_LIST_DELAY_MS, DEFAULT_OUTPUT_DIR, DEFAULT_PAGE_DELAY_MS,
    DEFAULT_PAGE_SIZE,
};

/// CLI-level overrides applied on top of the environment.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub space_key: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub max_pages: Option<usize>,
}

/// Resolves the full run configuration: required values from the environment,
/// falling back to an interactive prompt when `interactive` is set (the
/// caller decides, typically from whether stdin is a terminal). Returns a
/// fully validated ExportConfig or an error naming the missing value.
pub fn load_config(overrides: &ConfigOverrides, interactive: bool) -> Result<ExportConfig> {
    let base_url = required(
        "CONFLUENCE_URL",
        "Confluence URL (e.g. https://yourcompany.atlassian.net)",
        interactive,
    )?;
    let username = required("CONFLUENCE_USERNAME", "username/email", interactive)?;
    let api_token = required("CONFLUENCE_API_TOKEN", "API token/password", interactive)?;
    let space_key = match overrides.space_key.clone() {
        Some(key) => key,
        None => required("CONFLUENCE_SPACE_KEY", "space key", interactive)?,
    };

    let max_pages = match overrides.max_pages {
        Some(limit) => Some(limit),
        None => match env_var_nonempty("CONFLUENCE_PAGE_LIMIT") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(limit) => Some(limit),
                Err(e) => {
                    error!(error = ?e, value = %raw, "CONFLUENCE_PAGE_LIMIT must be a valid integer");
                    anyhow::bail!("CONFLUENCE_PAGE_LIMIT must be a valid integer: {e}");
                }
            },
            None => None,
        },
    };

    let config = ExportConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        username,
        api_token,
        space_key,
        output_dir: overrides
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        page_size: DEFAULT_PAGE_SIZE,
        max_pages,
        list_delay_ms: DEFAULT_LIST_DELAY_MS,
        page_delay_ms: DEFAULT_PAGE_DELAY_MS,
    };
    config.trace_loaded();
    Ok(config)
}

fn required(var: &str, prompt_label: &str, interactive: bool) -> Result<String> {
    if let Some(value) = env_var_nonempty(var) {
        info!(var = var, "Using value from environment");
        return Ok(value);
    }
    // Interactive fallback only; piped/headless invocations fail fast.
    if interactive {
        let value = prompt(prompt_label)?;
        if !value.is_empty() {
            return Ok(value);
        }
    }
    error!(var = var, "Required configuration value not set");
    anyhow::bail!("{var} must be set (environment variable or interactive prompt)")
}

fn env_var_nonempty(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn prompt(label: &str) -> Result<String> {
    print!("Enter {label}: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
