//! `pkgrab fetch <url>` – download an archive without extracting it.

use anyhow::{Context, Result};
use pkgrab_core::config::PkgrabConfig;
use pkgrab_core::fetch::{self, FetchOptions};
use pkgrab_core::url_model;
use std::path::PathBuf;

pub async fn run_fetch(cfg: &PkgrabConfig, url: &str, output: Option<PathBuf>) -> Result<()> {
    let dest = match output {
        Some(path) => path,
        None => cfg
            .effective_download_dir()?
            .join(url_model::archive_file_name(url)?),
    };
    let bytes = fetch::fetch(url, &dest, FetchOptions::from(&cfg.transfer))
        .await
        .with_context(|| format!("download of {url} failed"))?;
    println!("Saved {} ({} bytes)", dest.display(), bytes);
    Ok(())
}
