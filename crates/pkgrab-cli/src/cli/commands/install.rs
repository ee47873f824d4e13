//! `pkgrab install` – locate, fetch and extract in one go.

use anyhow::{Context, Result};
use pkgrab_core::config::PkgrabConfig;
use pkgrab_core::install::{install, InstallPlan};
use pkgrab_core::locate::WebDriverLocator;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI overrides applied on top of the config file.
#[derive(Debug, Default)]
pub struct InstallArgs {
    pub url: Option<String>,
    pub extract_to: Option<PathBuf>,
    pub download_dir: Option<PathBuf>,
    pub archiver: Option<PathBuf>,
}

pub fn build_plan(cfg: &PkgrabConfig, args: InstallArgs) -> Result<InstallPlan> {
    let mut plan = InstallPlan::from_config(cfg)?;
    plan.direct_url = args.url;
    if let Some(dir) = args.extract_to {
        plan.extract_dir = dir;
    }
    if let Some(dir) = args.download_dir {
        plan.download_dir = dir;
    }
    if args.archiver.is_some() {
        plan.archiver = args.archiver;
    }
    Ok(plan)
}

pub async fn run_install(cfg: &PkgrabConfig, args: InstallArgs) -> Result<()> {
    let plan = build_plan(cfg, args)?;
    let locator = Arc::new(WebDriverLocator::new(&cfg.browser, cfg.link_pattern.clone()));

    if plan.direct_url.is_none() {
        println!("Looking for the download link on {} ...", plan.start_url);
    }
    let report = install(&plan, locator)
        .await
        .context("install did not complete")?;

    println!("Downloaded {} ({} bytes)", report.url, report.bytes);
    println!("Installed into {}", report.extract_dir.display());
    Ok(())
}
