use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pageload_core::config;

/// Top-level CLI for page-loader.
#[derive(Debug, Parser)]
#[command(name = "page-loader", version)]
#[command(about = "Loads content of page by URL", long_about = None)]
pub struct Cli {
    /// Absolute http(s) URL of the page to save.
    #[arg(value_name = "PAGE_URL")]
    pub page_url: String,

    /// Directory to write the page and its resources into (must exist).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        let cfg = config::load_or_init().unwrap_or_else(|e| {
            tracing::warn!("config unavailable ({:#}); using defaults", e);
            config::LoaderConfig::default()
        });
        tracing::debug!("loaded config: {:?}", cfg);

        let output = match cli.output {
            Some(dir) => dir,
            None => std::env::current_dir().context("cannot determine current directory")?,
        };

        let report = pageload_core::load_page(&cli.page_url, &output, &cfg).await?;

        println!("Page saved to {}", report.page_file.display());
        for resource in &report.resources {
            tracing::info!("{} -> {} ({} bytes)", resource.url, resource.path.display(), resource.bytes);
        }
        println!("Success!");
        Ok(())
    }
}
