//! Failure classes of the locate → fetch → extract pipeline.
//!
//! Each stage returns `InstallError` so callers (and tests) can tell which
//! stage stopped the run. The CLI wraps it in `anyhow` for display.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    /// The WebDriver session could not be created.
    #[error("cannot start browser session via {endpoint}: {source}")]
    Browser {
        endpoint: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    /// A WebDriver command failed after the session was up.
    #[error("browser command failed: {0}")]
    BrowserCommand(#[from] fantoccini::error::CmdError),

    /// No anchor matched the pattern within the wait bound.
    #[error("no link matching {pattern} on {page} within {wait_secs}s")]
    LinkNotFound {
        page: String,
        pattern: String,
        wait_secs: u64,
    },

    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("cannot derive an archive file name from {0}")]
    NoFileName(String),

    /// libcurl transport failure (DNS, connect, timeout, TLS, ...).
    #[error("transfer failed: {0}")]
    Transfer(#[from] curl::Error),

    #[error("GET {url} returned HTTP {code}")]
    Http { url: String, code: u32 },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no 7-Zip compatible archiver on PATH (tried {0})")]
    ArchiverNotFound(String),

    #[error("archiver not found at {}", .0.display())]
    ArchiverMissing(PathBuf),

    #[error("archive not found at {}", .0.display())]
    ArchiveMissing(PathBuf),

    #[error("cannot start {}: {source}", .program.display())]
    ArchiverSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("archiver exited with {}: {}", exit_label(.code), .stderr.trim())]
    ArchiverFailed { code: Option<i32>, stderr: String },

    #[error("stage task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl InstallError {
    /// Adapter for `map_err` that tags an I/O error with the path involved.
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| InstallError::Io { path, source }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("code {c}"),
        None => "no code (terminated by signal)".to_string(),
    }
}
