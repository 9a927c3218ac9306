#![doc = "confluence-export: download a Confluence space as PDF files."]

//! This crate downloads every page of a Confluence space and persists each
//! one as a PDF on local disk, falling back to HTML when no PDF can be
//! produced. Re-runs are idempotent: pages whose PDF already exists are
//! skipped.
//!
//! # Usage
//! The binary drives [`run`]; integration tests call it (or the pipeline in
//! [`download`]) directly with injected sources and renderers.

pub mod client;
pub mod config;
pub mod contract;
pub mod download;
pub mod html_to_pdf;
pub mod load_config;
pub mod storage;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

use client::ConfluenceClient;
use html_to_pdf::HtmlToPdf;
use load_config::{load_config, ConfigOverrides};

#[derive(Parser)]
#[clap(
    name = "confluence-export",
    version,
    about = "Download every page of a Confluence space as PDF (with HTML fallback)"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download all pages of the configured space to the output directory
    Download {
        /// Space key; overrides CONFLUENCE_SPACE_KEY
        #[clap(long)]
        space_key: Option<String>,
        /// Root output directory (default: data)
        #[clap(long)]
        output_dir: Option<PathBuf>,
        /// Stop after this many pages; overrides CONFLUENCE_PAGE_LIMIT
        #[clap(long)]
        max_pages: Option<usize>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Download {
            space_key,
            output_dir,
            max_pages,
        } => {
            let overrides = ConfigOverrides {
                space_key,
                output_dir,
                max_pages,
            };
            let interactive = std::io::stdin().is_terminal();
            let config = load_config(&overrides, interactive)?;
            let client = ConfluenceClient::new(&config)
                .map_err(|e| anyhow::anyhow!("failed to construct API client: {e}"))?;
            let renderer = HtmlToPdf::new(&config.base_url)?;

            println!("Download starting...");
            match download::run(&config, &client, &renderer).await {
                Ok(report) => {
                    println!("Download complete.\nReport:");
                    println!("{:#?}", report);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Download failed: {}", e);
                    Err(anyhow::Error::new(e))
                }
            }
        }
    }
}
