//! Which anchor counts as "the download link".

use crate::error::InstallError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An anchor matches when its `href` contains every one of `href_contains`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPattern {
    pub href_contains: Vec<String>,
}

impl Default for LinkPattern {
    fn default() -> Self {
        Self {
            href_contains: vec!["win64".to_string(), ".7z".to_string()],
        }
    }
}

impl LinkPattern {
    pub fn new<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            href_contains: needles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, href: &str) -> bool {
        self.href_contains.iter().all(|n| href.contains(n.as_str()))
    }

    /// XPath selecting the first anchor whose `href` contains all needles.
    ///
    /// An empty pattern selects any anchor with an `href`.
    pub fn xpath(&self) -> String {
        if self.href_contains.is_empty() {
            return "//a[@href]".to_string();
        }
        let conditions: Vec<String> = self
            .href_contains
            .iter()
            .map(|n| format!("contains(@href, {})", xpath_literal(n)))
            .collect();
        format!("//a[{}]", conditions.join(" and "))
    }
}

impl fmt::Display for LinkPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "href containing [{}]", self.href_contains.join(", "))
    }
}

/// Quotes `s` as an XPath 1.0 string literal. XPath has no escapes, so a
/// value holding both quote kinds is split and joined with `concat()`.
fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{s}'");
    }
    if !s.contains('"') {
        return format!("\"{s}\"");
    }
    let parts: Vec<String> = s.split('\'').map(|p| format!("'{p}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// Resolves `href` against the page it was found on. Absolute hrefs are returned as-is.
pub fn resolve_href(base: &str, href: &str) -> Result<String, InstallError> {
    let href = href.trim();
    let base = url::Url::parse(base).map_err(|source| InstallError::InvalidUrl {
        url: base.to_string(),
        source,
    })?;
    let joined = base.join(href).map_err(|source| InstallError::InvalidUrl {
        url: href.to_string(),
        source,
    })?;
    Ok(joined.into())
}
