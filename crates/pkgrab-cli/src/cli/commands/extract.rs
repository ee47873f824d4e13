//! `pkgrab extract <archive>` – unpack with the external archiver.

use anyhow::{Context, Result};
use pkgrab_core::config::PkgrabConfig;
use pkgrab_core::extract::Archiver;
use std::path::{Path, PathBuf};

pub async fn run_extract(
    cfg: &PkgrabConfig,
    archive: &Path,
    to: Option<PathBuf>,
    archiver: Option<PathBuf>,
) -> Result<()> {
    let dest = to.unwrap_or_else(|| cfg.extract_dir.clone());
    let archiver = Archiver::discover(archiver.as_deref().or(cfg.archiver.as_deref()))?;
    archiver
        .extract(archive, &dest)
        .await
        .with_context(|| format!("extracting {}", archive.display()))?;
    println!("Extracted {} into {}", archive.display(), dest.display());
    Ok(())
}
