//! Single-stream archive transfer.
//!
//! One libcurl GET, redirects followed, body written sequentially into
//! `<dest>.part` and renamed to `dest` once the transfer completes. Non-2xx
//! bodies are never written. There is no resume: a transfer that fails midway
//! leaves the `.part` file behind as-is.

use crate::config::TransferConfig;
use crate::error::InstallError;
use std::cell::Cell;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Suffix of the file the body is streamed into before the final rename.
pub const PART_SUFFIX: &str = ".part";

/// libcurl knobs for the transfer.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// Total duration ceiling for the whole transfer.
    pub timeout: Duration,
    /// Receive buffer and write chunk size.
    pub chunk_size: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&TransferConfig::default())
    }
}

impl From<&TransferConfig> for FetchOptions {
    fn from(cfg: &TransferConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            chunk_size: cfg.chunk_size.max(1),
        }
    }
}

/// `file.7z` → `file.7z.part`.
pub fn part_path(dest: &Path) -> PathBuf {
    let mut o = dest.as_os_str().to_owned();
    o.push(PART_SUFFIX);
    PathBuf::from(o)
}

/// Status code from an HTTP status line (`HTTP/1.1 302 Found`), if `line` is one.
fn parse_status_line(line: &[u8]) -> Option<u32> {
    let line = std::str::from_utf8(line).ok()?;
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}

/// Downloads `url` to `dest`, returning the number of body bytes written.
/// Blocks the calling thread; use [`fetch`] from async code.
///
/// The `.part` file is only opened once the final response turned out 2xx;
/// an error page is discarded and nothing is left on disk.
pub fn fetch_to_file(url: &str, dest: &Path, opts: FetchOptions) -> Result<u64, InstallError> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(InstallError::io(parent))?;
    }
    let part = part_path(dest);
    // Status of the response currently being received (redirect hops included).
    let status = Cell::new(0u32);
    let mut writer: Option<BufWriter<File>> = None;
    let mut written: u64 = 0;
    let mut write_err: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    easy.buffer_size(opts.chunk_size)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|line| {
            if let Some(code) = parse_status_line(line) {
                status.set(code);
            }
            true
        })?;
        transfer.write_function(|data| {
            if !(200..300).contains(&status.get()) {
                return Ok(data.len());
            }
            if writer.is_none() {
                match File::create(&part) {
                    Ok(f) => writer = Some(BufWriter::with_capacity(opts.chunk_size, f)),
                    Err(e) => {
                        write_err = Some(e);
                        return Ok(0);
                    }
                }
            }
            let Some(w) = writer.as_mut() else {
                return Ok(0);
            };
            match w.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // short write aborts the transfer
                }
            }
        })?;
        let performed = transfer.perform();
        drop(transfer);
        if let Some(e) = write_err.take() {
            return Err(InstallError::Io { path: part, source: e });
        }
        performed?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(InstallError::Http {
            url: url.to_string(),
            code,
        });
    }

    let file = match writer {
        Some(w) => w.into_inner().map_err(|e| InstallError::Io {
            path: part.clone(),
            source: e.into_error(),
        })?,
        // 2xx with an empty body.
        None => File::create(&part).map_err(InstallError::io(&part))?,
    };
    file.sync_all().map_err(InstallError::io(&part))?;
    drop(file);
    fs::rename(&part, dest).map_err(InstallError::io(dest))?;

    tracing::debug!(bytes = written, dest = %dest.display(), "transfer complete");
    Ok(written)
}

/// Async wrapper: runs [`fetch_to_file`] on the blocking pool and awaits it.
pub async fn fetch(url: &str, dest: &Path, opts: FetchOptions) -> Result<u64, InstallError> {
    tracing::info!(%url, dest = %dest.display(), "downloading archive");
    let url = url.to_string();
    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || fetch_to_file(&url, &dest, opts)).await?
}
