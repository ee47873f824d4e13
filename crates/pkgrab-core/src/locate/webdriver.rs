//! Headless browser link discovery over the WebDriver protocol.
//!
//! Talks to an already running WebDriver server (geckodriver or
//! chromedriver). The page is loaded, the first anchor matching the
//! `LinkPattern` is awaited for a bounded time, and its resolved `href` is
//! returned. The session is closed on every path out.

use super::{resolve_href, LinkLocator, LinkPattern, LocatedLink};
use crate::config::{BrowserConfig, BrowserKind};
use crate::error::InstallError;
use fantoccini::error::CmdError;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WebDriverLocator {
    endpoint: String,
    browser: BrowserKind,
    headless: bool,
    wait: Duration,
    pattern: LinkPattern,
}

impl WebDriverLocator {
    pub fn new(browser: &BrowserConfig, pattern: LinkPattern) -> Self {
        Self {
            endpoint: browser.webdriver_url.clone(),
            browser: browser.browser,
            headless: browser.headless,
            wait: Duration::from_secs(browser.wait_secs),
            pattern,
        }
    }

    fn capabilities(&self) -> Capabilities {
        let args: Vec<&str> = if self.headless {
            vec![self.browser.headless_arg()]
        } else {
            Vec::new()
        };
        let mut caps = Capabilities::new();
        caps.insert(
            self.browser.options_key().to_string(),
            json!({ "args": args }),
        );
        caps
    }

    async fn find_link(&self, client: &Client, start_url: &str) -> Result<LocatedLink, InstallError> {
        client.goto(start_url).await?;
        tracing::info!(url = start_url, "page loaded");

        let xpath = self.pattern.xpath();
        let element = match client
            .wait()
            .at_most(self.wait)
            .for_element(Locator::XPath(&xpath))
            .await
        {
            Ok(el) => el,
            Err(CmdError::WaitTimeout) => return Err(self.not_found(start_url)),
            Err(e) => return Err(e.into()),
        };

        // The DOM property is already absolute; the attribute may be relative.
        let href = match element.prop("href").await? {
            Some(h) if !h.trim().is_empty() => h,
            _ => element.attr("href").await?.unwrap_or_default(),
        };
        let page_url = client.current_url().await?;
        let link = self.accept_href(start_url, page_url.as_str(), &href)?;
        tracing::info!(url = %link.url, "download link found");
        Ok(link)
    }

    /// Resolves `href` against the page and checks it still satisfies the
    /// pattern once absolute; anything else counts as not found.
    fn accept_href(
        &self,
        start_url: &str,
        page_url: &str,
        href: &str,
    ) -> Result<LocatedLink, InstallError> {
        if href.trim().is_empty() {
            return Err(self.not_found(start_url));
        }
        let url = resolve_href(page_url, href)?;
        if !self.pattern.matches(&url) {
            tracing::debug!(%url, pattern = %self.pattern, "resolved link no longer matches");
            return Err(self.not_found(start_url));
        }
        Ok(LocatedLink { url })
    }

    fn not_found(&self, start_url: &str) -> InstallError {
        InstallError::LinkNotFound {
            page: start_url.to_string(),
            pattern: self.pattern.to_string(),
            wait_secs: self.wait.as_secs(),
        }
    }
}

impl LinkLocator for WebDriverLocator {
    fn locate(
        &self,
        start_url: &str,
    ) -> impl Future<Output = Result<LocatedLink, InstallError>> + Send {
        async move {
            tracing::info!(
                endpoint = %self.endpoint,
                browser = ?self.browser,
                headless = self.headless,
                "starting browser session"
            );
            let client = ClientBuilder::native()
                .capabilities(self.capabilities())
                .connect(&self.endpoint)
                .await
                .map_err(|source| InstallError::Browser {
                    endpoint: self.endpoint.clone(),
                    source,
                })?;

            let result = self.find_link(&client, start_url).await;

            if let Err(e) = client.close().await {
                tracing::warn!("closing browser session failed: {}", e);
            }
            tracing::info!("browser closed");

            if let Err(e) = &result {
                tracing::error!("link discovery failed: {}", e);
            }
            result
        }
    }
}
