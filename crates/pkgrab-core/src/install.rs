//! The locate → fetch → extract pipeline.
//!
//! Stages run once, in order; the first failure is logged and returned and
//! nothing after it runs.

use crate::config::PkgrabConfig;
use crate::error::InstallError;
use crate::extract::Archiver;
use crate::fetch::{self, FetchOptions};
use crate::locate::{self, LinkLocator};
use crate::url_model;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything one install run needs, resolved from config and CLI overrides.
#[derive(Debug, Clone)]
pub struct InstallPlan {
    pub start_url: String,
    /// Skip discovery and download this URL directly.
    pub direct_url: Option<String>,
    pub download_dir: PathBuf,
    pub extract_dir: PathBuf,
    pub archiver: Option<PathBuf>,
    pub fetch: FetchOptions,
}

impl InstallPlan {
    pub fn from_config(cfg: &PkgrabConfig) -> Result<Self, InstallError> {
        let download_dir = cfg
            .effective_download_dir()
            .map_err(InstallError::io("."))?;
        Ok(Self {
            start_url: cfg.start_url.clone(),
            direct_url: None,
            download_dir,
            extract_dir: cfg.extract_dir.clone(),
            archiver: cfg.archiver.clone(),
            fetch: FetchOptions::from(&cfg.transfer),
        })
    }
}

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub url: String,
    /// Where the archive was downloaded (already deleted by extraction).
    pub archive: PathBuf,
    pub extract_dir: PathBuf,
    pub bytes: u64,
}

pub async fn install<L: LinkLocator>(
    plan: &InstallPlan,
    locator: Arc<L>,
) -> Result<InstallReport, InstallError> {
    let url = match &plan.direct_url {
        Some(url) => {
            tracing::info!(%url, "using provided download URL, skipping discovery");
            url.clone()
        }
        None => {
            locate::locate_on_task(locator, plan.start_url.clone())
                .await
                .inspect_err(|e| tracing::error!("could not find the archive link: {}", e))?
                .url
        }
    };

    let name = url_model::archive_file_name(&url)?;
    let archive = plan.download_dir.join(&name);
    tracing::info!(file = %name, "archive file name");

    // Resolved up front so a missing tool does not cost a full download.
    let archiver = Archiver::discover(plan.archiver.as_deref())
        .inspect_err(|e| tracing::error!("extraction failed: {}", e))?;

    let bytes = fetch::fetch(&url, &archive, plan.fetch)
        .await
        .inspect_err(|e| tracing::error!("download failed: {}", e))?;

    archiver
        .extract(&archive, &plan.extract_dir)
        .await
        .inspect_err(|e| tracing::error!("extraction failed: {}", e))?;

    tracing::info!(dest = %plan.extract_dir.display(), "install complete");
    Ok(InstallReport {
        url,
        archive,
        extract_dir: plan.extract_dir.clone(),
        bytes,
    })
}
