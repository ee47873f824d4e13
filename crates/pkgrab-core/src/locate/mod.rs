//! Download link discovery.
//!
//! The pipeline only depends on the `LinkLocator` trait; the headless browser
//! driver is one implementation of it (tests use a stub).

mod pattern;
mod webdriver;

pub use pattern::{resolve_href, LinkPattern};
pub use webdriver::WebDriverLocator;

use crate::error::InstallError;
use std::future::Future;
use std::sync::Arc;

/// Absolute URL of the archive found on the vendor page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedLink {
    pub url: String,
}

/// Turns a start page into the URL of the archive to download.
pub trait LinkLocator: Send + Sync + 'static {
    fn locate(
        &self,
        start_url: &str,
    ) -> impl Future<Output = Result<LocatedLink, InstallError>> + Send;
}

/// Runs `locator` on its own task so page loading does not hold up the caller's task.
/// The caller still awaits the result before moving on.
pub async fn locate_on_task<L: LinkLocator>(
    locator: Arc<L>,
    start_url: String,
) -> Result<LocatedLink, InstallError> {
    tokio::spawn(async move { locator.locate(&start_url).await }).await?
}
