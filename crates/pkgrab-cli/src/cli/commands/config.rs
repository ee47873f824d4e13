//! `pkgrab config` – show where the config lives and what is in effect.

use anyhow::Result;
use pkgrab_core::config::{self, PkgrabConfig};

pub fn run_config(cfg: &PkgrabConfig) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
