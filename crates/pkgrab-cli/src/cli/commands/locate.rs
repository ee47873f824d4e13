//! `pkgrab locate` – print the download link found on the vendor page.

use anyhow::{Context, Result};
use pkgrab_core::config::PkgrabConfig;
use pkgrab_core::locate::{locate_on_task, WebDriverLocator};
use std::sync::Arc;

pub async fn run_locate(cfg: &PkgrabConfig, start_url: Option<String>) -> Result<()> {
    let start_url = start_url.unwrap_or_else(|| cfg.start_url.clone());
    let locator = Arc::new(WebDriverLocator::new(&cfg.browser, cfg.link_pattern.clone()));
    let link = locate_on_task(locator, start_url.clone())
        .await
        .with_context(|| format!("no download link found on {start_url}"))?;
    println!("{}", link.url);
    Ok(())
}
