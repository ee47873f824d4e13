//! CLI for pkgrab.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pkgrab_core::config;
use std::path::PathBuf;

use commands::{run_config, run_extract, run_fetch, run_install, run_locate, InstallArgs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pkgrab")]
#[command(about = "pkgrab: find, download and unpack a vendor's release archive", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Locate the download link, fetch the archive and extract it.
    Install {
        /// Download this URL instead of discovering it on the vendor page.
        #[arg(long)]
        url: Option<String>,
        /// Extract into DIR instead of the configured extract_dir.
        #[arg(long, value_name = "DIR")]
        extract_to: Option<PathBuf>,
        /// Save the archive in DIR instead of the current directory.
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
        /// Path to a 7-Zip compatible executable.
        #[arg(long, value_name = "PATH")]
        archiver: Option<PathBuf>,
    },

    /// Only discover the download link and print it.
    Locate {
        /// Page to search instead of the configured start_url.
        #[arg(long, value_name = "URL")]
        start_url: Option<String>,
    },

    /// Only download an archive.
    Fetch {
        /// Direct HTTP/HTTPS URL of the archive.
        url: String,
        /// Output file (default: last URL path segment in the current directory).
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Only extract an archive (the archive is deleted on success).
    Extract {
        /// Path to the archive.
        archive: PathBuf,
        /// Destination directory (default: configured extract_dir).
        #[arg(long, value_name = "DIR")]
        to: Option<PathBuf>,
        /// Path to a 7-Zip compatible executable.
        #[arg(long, value_name = "PATH")]
        archiver: Option<PathBuf>,
    },

    /// Show the config file path and effective settings.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Install {
                url,
                extract_to,
                download_dir,
                archiver,
            } => {
                let args = InstallArgs {
                    url,
                    extract_to,
                    download_dir,
                    archiver,
                };
                run_install(&cfg, args).await?
            }
            CliCommand::Locate { start_url } => run_locate(&cfg, start_url).await?,
            CliCommand::Fetch { url, output } => run_fetch(&cfg, &url, output).await?,
            CliCommand::Extract {
                archive,
                to,
                archiver,
            } => run_extract(&cfg, &archive, to, archiver).await?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
