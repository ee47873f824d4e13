use crate::locate::LinkPattern;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Vendor page the download link is discovered on.
pub const DEFAULT_START_URL: &str = "https://rpcs3.net/quickstart";

/// Browser driven over WebDriver for link discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    /// geckodriver (default WebDriver port 4444).
    #[default]
    Firefox,
    /// chromedriver (start it with `--port=4444` or set `webdriver_url`).
    Chrome,
}

impl BrowserKind {
    /// Capability key holding browser-specific launch options.
    pub fn options_key(self) -> &'static str {
        match self {
            BrowserKind::Firefox => "moz:firefoxOptions",
            BrowserKind::Chrome => "goog:chromeOptions",
        }
    }

    pub fn headless_arg(self) -> &'static str {
        match self {
            BrowserKind::Firefox => "-headless",
            BrowserKind::Chrome => "--headless=new",
        }
    }
}

/// `[browser]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// WebDriver server endpoint.
    pub webdriver_url: String,
    pub browser: BrowserKind,
    pub headless: bool,
    /// How long to wait for the download link to appear on the page.
    pub wait_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            browser: BrowserKind::Firefox,
            headless: true,
            wait_secs: 10,
        }
    }
}

/// `[transfer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    pub connect_timeout_secs: u64,
    /// Ceiling on the whole archive transfer.
    pub timeout_secs: u64,
    /// Receive buffer / write chunk size in bytes.
    pub chunk_size: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            chunk_size: 8192,
        }
    }
}

/// Global configuration loaded from `~/.config/pkgrab/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PkgrabConfig {
    /// Page to load when looking for the download link.
    pub start_url: String,
    /// Where the archive is unpacked.
    pub extract_dir: PathBuf,
    /// Where the archive is saved before extraction; current directory when unset.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Archiver executable; `7z`/`7za` on PATH when unset.
    #[serde(default)]
    pub archiver: Option<PathBuf>,
    #[serde(default)]
    pub link_pattern: LinkPattern,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
}

impl Default for PkgrabConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            extract_dir: default_extract_dir().unwrap_or_else(|_| PathBuf::from("rpcs3")),
            download_dir: None,
            archiver: None,
            link_pattern: LinkPattern::default(),
            browser: BrowserConfig::default(),
            transfer: TransferConfig::default(),
        }
    }
}

impl PkgrabConfig {
    /// Download directory, falling back to the process working directory.
    pub fn effective_download_dir(&self) -> std::io::Result<PathBuf> {
        match &self.download_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir(),
        }
    }
}

/// `~/.local/share/pkgrab/rpcs3`.
pub fn default_extract_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pkgrab")?;
    Ok(xdg_dirs.get_data_home().join("pkgrab").join("rpcs3"))
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pkgrab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PkgrabConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PkgrabConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PkgrabConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = PkgrabConfig::default();
        assert_eq!(cfg.start_url, "https://rpcs3.net/quickstart");
        assert_eq!(cfg.link_pattern.href_contains, vec!["win64", ".7z"]);
        assert_eq!(cfg.browser.wait_secs, 10);
        assert_eq!(cfg.browser.browser, BrowserKind::Firefox);
        assert!(cfg.browser.headless);
        assert_eq!(cfg.transfer.timeout_secs, 3600);
        assert_eq!(cfg.transfer.chunk_size, 8192);
        assert!(cfg.archiver.is_none());
        assert!(cfg.download_dir.is_none());
        assert!(cfg.extract_dir.ends_with("rpcs3"));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = PkgrabConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: PkgrabConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.start_url, cfg.start_url);
        assert_eq!(parsed.extract_dir, cfg.extract_dir);
        assert_eq!(parsed.link_pattern, cfg.link_pattern);
        assert_eq!(parsed.browser.webdriver_url, cfg.browser.webdriver_url);
    }

    #[test]
    fn config_toml_minimal_uses_section_defaults() {
        let toml = r#"
            start_url = "https://vendor.example.com/downloads"
            extract_dir = "/opt/vendor-app"
        "#;
        let cfg: PkgrabConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.start_url, "https://vendor.example.com/downloads");
        assert_eq!(cfg.extract_dir, PathBuf::from("/opt/vendor-app"));
        assert_eq!(cfg.link_pattern, LinkPattern::default());
        assert_eq!(cfg.browser.wait_secs, 10);
        assert_eq!(cfg.transfer.connect_timeout_secs, 30);
    }

    #[test]
    fn config_toml_custom_sections() {
        let toml = r#"
            start_url = "https://vendor.example.com/"
            extract_dir = "/srv/app"
            download_dir = "/tmp/dl"
            archiver = "/usr/bin/7za"

            [link_pattern]
            href_contains = ["linux", ".tar.xz"]

            [browser]
            browser = "chrome"
            webdriver_url = "http://127.0.0.1:9515"
            headless = false
            wait_secs = 30

            [transfer]
            timeout_secs = 600
            chunk_size = 65536
        "#;
        let cfg: PkgrabConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.download_dir, Some(PathBuf::from("/tmp/dl")));
        assert_eq!(cfg.archiver, Some(PathBuf::from("/usr/bin/7za")));
        assert_eq!(cfg.link_pattern.href_contains, vec!["linux", ".tar.xz"]);
        assert_eq!(cfg.browser.browser, BrowserKind::Chrome);
        assert_eq!(cfg.browser.webdriver_url, "http://127.0.0.1:9515");
        assert!(!cfg.browser.headless);
        assert_eq!(cfg.browser.wait_secs, 30);
        assert_eq!(cfg.transfer.timeout_secs, 600);
        assert_eq!(cfg.transfer.chunk_size, 65536);
        assert_eq!(cfg.transfer.connect_timeout_secs, 30);
    }

    #[test]
    fn effective_download_dir_prefers_configured() {
        let cfg = PkgrabConfig {
            download_dir: Some(PathBuf::from("/tmp/dl")),
            ..PkgrabConfig::default()
        };
        assert_eq!(cfg.effective_download_dir().unwrap(), PathBuf::from("/tmp/dl"));
    }
}
