//! Archive extraction through an external 7-Zip compatible tool.
//!
//! Order of checks matters: the tool path is validated before anything is
//! spawned, the destination is created before the tool runs, and the source
//! archive is deleted only when the tool exits with status 0.

use crate::error::InstallError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Executable names searched on PATH, in order.
pub const ARCHIVER_CANDIDATES: [&str; 2] = ["7z", "7za"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archiver {
    program: PathBuf,
}

impl Archiver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Picks the archiver: `configured` if given (bare names resolved on PATH),
    /// else the first of [`ARCHIVER_CANDIDATES`] found on PATH.
    ///
    /// A configured tool that does not resolve to a file is `ArchiverMissing`.
    pub fn discover(configured: Option<&Path>) -> Result<Self, InstallError> {
        if let Some(p) = configured {
            let program = which::which(p).unwrap_or_else(|_| p.to_path_buf());
            if !program.is_file() {
                return Err(InstallError::ArchiverMissing(program));
            }
            return Ok(Self::new(program));
        }
        ARCHIVER_CANDIDATES
            .iter()
            .find_map(|name| which::which(name).ok())
            .map(Self::new)
            .ok_or_else(|| InstallError::ArchiverNotFound(ARCHIVER_CANDIDATES.join(", ")))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// `x <archive> -o<dest> -aoa`: extract with full paths into `dest`, overwrite all.
    pub fn args(&self, archive: &Path, dest: &Path) -> Vec<OsString> {
        let mut out_dir = OsString::from("-o");
        out_dir.push(dest);
        vec![
            OsString::from("x"),
            archive.as_os_str().to_owned(),
            out_dir,
            OsString::from("-aoa"),
        ]
    }

    /// Extracts `archive` into `dest` and removes `archive` on success.
    pub async fn extract(&self, archive: &Path, dest: &Path) -> Result<(), InstallError> {
        tracing::info!(
            archiver = %self.program.display(),
            archive = %archive.display(),
            dest = %dest.display(),
            "extracting archive"
        );

        if !self.program.is_file() {
            return Err(InstallError::ArchiverMissing(self.program.clone()));
        }
        if !archive.is_file() {
            return Err(InstallError::ArchiveMissing(archive.to_path_buf()));
        }
        tokio::fs::create_dir_all(dest)
            .await
            .map_err(InstallError::io(dest))?;

        let output = Command::new(&self.program)
            .args(self.args(archive, dest))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| InstallError::ArchiverSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(InstallError::ArchiverFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        tracing::debug!("archiver output:\n{}", String::from_utf8_lossy(&output.stdout));
        tokio::fs::remove_file(archive)
            .await
            .map_err(InstallError::io(archive))?;
        tracing::info!(dest = %dest.display(), "archive extracted and removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(name: &str) -> Archiver {
        Archiver::new(which::which(name).expect("coreutils tool on PATH"))
    }

    #[test]
    fn args_follow_7z_convention() {
        let a = Archiver::new("/usr/bin/7z");
        let args = a.args(Path::new("/tmp/app.7z"), Path::new("/opt/app"));
        assert_eq!(
            args,
            vec![
                OsString::from("x"),
                OsString::from("/tmp/app.7z"),
                OsString::from("-o/opt/app"),
                OsString::from("-aoa"),
            ]
        );
    }

    #[test]
    fn discover_rejects_missing_configured_path() {
        let err = Archiver::discover(Some(Path::new("/nonexistent/7z"))).unwrap_err();
        match err {
            InstallError::ArchiverMissing(p) => assert_eq!(p, PathBuf::from("/nonexistent/7z")),
            other => panic!("expected ArchiverMissing, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn discover_resolves_configured_bare_name() {
        let a = Archiver::discover(Some(Path::new("true"))).unwrap();
        assert_eq!(a.program(), which::which("true").unwrap());
    }

    #[tokio::test]
    async fn missing_archiver_detected_before_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("app.7z");
        std::fs::write(&archive, b"7z").unwrap();
        let dest = dir.path().join("out");

        let err = Archiver::new(dir.path().join("no-such-7z"))
            .extract(&archive, &dest)
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::ArchiverMissing(_)), "got {err:?}");
        assert!(archive.exists());
        assert!(!dest.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_archive_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = tool("true")
            .extract(&dir.path().join("gone.7z"), &dir.path().join("out"))
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::ArchiveMissing(_)), "got {err:?}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn success_creates_dest_and_removes_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("app.7z");
        std::fs::write(&archive, b"7z").unwrap();
        let dest = dir.path().join("nested").join("out");

        tool("true").extract(&archive, &dest).await.unwrap();
        assert!(dest.is_dir());
        assert!(!archive.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failure_keeps_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("app.7z");
        std::fs::write(&archive, b"7z").unwrap();
        let dest = dir.path().join("out");

        let err = tool("false").extract(&archive, &dest).await.unwrap_err();
        match err {
            InstallError::ArchiverFailed { code, .. } => assert_eq!(code, Some(1)),
            other => panic!("expected ArchiverFailed, got {other:?}"),
        }
        assert!(archive.exists());
        assert!(dest.is_dir());
    }
}
