//! Headless Chrome backend over the DevTools protocol (chromiumoxide).

use crate::browser::{BrowserSession, ListingPage};
use crate::config::Config;
use crate::error::ScrapeError;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A launched Chrome process plus the task pumping its CDP events.
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    timeout_ms: u64,
    network_idle_ms: u64,
}

impl ChromeSession {
    /// Launches Chrome with the given configuration.
    pub async fn launch(config: &Config) -> Result<Self> {
        let mut builder = BrowserConfig::builder();

        if !config.headless {
            builder = builder.with_head();
        }
        if config.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &config.chrome_executable {
            debug!("Using Chrome executable: {}", path.display());
            builder = builder.chrome_executable(path);
        }

        let browser_config =
            builder.build().map_err(|e| anyhow!("Invalid browser configuration: {}", e))?;

        info!("Launching Chrome (headless: {})", config.headless);
        let (browser, mut handler) =
            Browser::launch(browser_config).await.context("Failed to launch Chrome")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("Browser event error: {}", e);
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            timeout_ms: config.timeout_ms,
            network_idle_ms: config.network_idle_ms,
        })
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    type Page = ChromePage;

    async fn new_page(&self) -> Result<ChromePage> {
        let page = self.browser.new_page("about:blank").await.context("Failed to open a page")?;

        Ok(ChromePage { page, timeout_ms: self.timeout_ms, network_idle_ms: self.network_idle_ms })
    }

    async fn close(&mut self) -> Result<()> {
        debug!("Closing Chrome");
        let closed = self.browser.close().await.map(|_| ()).context("Failed to close Chrome");

        if let Err(e) = self.browser.wait().await {
            debug!("Chrome process wait failed: {}", e);
        }
        self.handler.abort();

        closed
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// One Chrome tab.
pub struct ChromePage {
    page: Page,
    timeout_ms: u64,
    network_idle_ms: u64,
}

#[derive(Debug, Deserialize)]
struct NodeText {
    found: bool,
    text: Option<String>,
}

impl ChromePage {
    /// Evaluates `script` in the page and deserializes its return value.
    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T> {
        let params = EvaluateParams::builder()
            .expression(script)
            .return_by_value(true)
            .build()
            .map_err(|e| anyhow!("Invalid evaluation: {}", e))?;

        self.page
            .evaluate_expression(params)
            .await
            .context("Script evaluation failed")?
            .into_value()
            .context("Unexpected script result")
    }
}

/// Network requests started and not yet finished or failed.
#[derive(Debug, Default)]
struct InFlight {
    requests: HashSet<String>,
}

impl InFlight {
    fn started(&mut self, request_id: &str) {
        self.requests.insert(request_id.to_string());
    }

    fn settled(&mut self, request_id: &str) {
        self.requests.remove(request_id);
    }

    fn is_idle(&self) -> bool {
        self.requests.is_empty()
    }

    fn len(&self) -> usize {
        self.requests.len()
    }
}

#[async_trait]
impl ListingPage for ChromePage {
    /// Navigates, then waits until no request has been in flight for the
    /// idle window (`networkidle0`).
    async fn goto(&self, address: &str) -> Result<()> {
        info!("Opening {}", address);

        // Subscribe before navigating so no request goes unseen
        let mut started = self
            .page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .context("Failed to watch network requests")?;
        let mut finished = self
            .page
            .event_listener::<EventLoadingFinished>()
            .await
            .context("Failed to watch network requests")?;
        let mut failed = self
            .page
            .event_listener::<EventLoadingFailed>()
            .await
            .context("Failed to watch network requests")?;

        self.page
            .goto(address)
            .await
            .with_context(|| format!("Failed to navigate to {}", address))?;

        let idle = Duration::from_millis(self.network_idle_ms);
        let deadline = Instant::now() + Duration::from_millis(self.timeout_ms);
        let mut in_flight = InFlight::default();

        loop {
            tokio::select! {
                Some(event) = started.next() => in_flight.started(event.request_id.inner()),
                Some(event) = finished.next() => in_flight.settled(event.request_id.inner()),
                Some(event) = failed.next() => in_flight.settled(event.request_id.inner()),
                _ = sleep(idle), if in_flight.is_idle() => {
                    debug!("Network idle");
                    return Ok(());
                }
                _ = sleep_until(deadline) => {
                    return Err(ScrapeError::Timeout {
                        what: format!("network idle ({} requests in flight)", in_flight.len()),
                        ms: self.timeout_ms,
                    }
                    .into());
                }
            }
        }
    }

    async fn title(&self) -> Result<String> {
        let title = self.page.get_title().await.context("Failed to read page title")?;
        Ok(title.unwrap_or_default())
    }

    async fn text(&self, selector: &str) -> Result<Option<String>> {
        let node: NodeText = self.eval(scripts::text(selector)?).await?;
        if !node.found {
            return Err(ScrapeError::ElementNotFound(selector.to_string()).into());
        }
        Ok(node.text)
    }

    async fn texts(&self, selector: &str) -> Result<Vec<Option<String>>> {
        self.eval(scripts::texts(selector)?).await
    }

    async fn child_texts(&self, selector: &str) -> Result<Vec<Vec<Option<String>>>> {
        self.eval(scripts::child_texts(selector)?).await
    }

    async fn wait_for_visible(&self, selector: &str) -> Result<()> {
        let deadline = Instant::now() + Duration::from_millis(self.timeout_ms);
        let script = scripts::visible(selector)?;

        loop {
            if self.eval::<bool>(script.clone()).await? {
                debug!("Selector visible: {}", selector);
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ScrapeError::Timeout {
                    what: format!("selector `{}`", selector),
                    ms: self.timeout_ms,
                }
                .into());
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, selector: &str) -> Result<()> {
        debug!("Clicking {}", selector);
        let clicked: bool = self.eval(scripts::click(selector)?).await?;
        if !clicked {
            return Err(ScrapeError::ElementNotFound(selector.to_string()).into());
        }
        Ok(())
    }
}

/// In-page scripts. Selectors are embedded as JSON string literals.
mod scripts {
    use anyhow::Result;

    fn literal(selector: &str) -> Result<String> {
        Ok(serde_json::to_string(selector)?)
    }

    pub fn text(selector: &str) -> Result<String> {
        Ok(format!(
            "(() => {{ const el = document.querySelector({}); \
             return el ? {{ found: true, text: el.textContent }} : {{ found: false, text: null }}; }})()",
            literal(selector)?
        ))
    }

    pub fn texts(selector: &str) -> Result<String> {
        Ok(format!(
            "Array.from(document.querySelectorAll({}), el => el.textContent)",
            literal(selector)?
        ))
    }

    pub fn child_texts(selector: &str) -> Result<String> {
        Ok(format!(
            "Array.from(document.querySelectorAll({}), \
             section => Array.from(section.childNodes, n => n.textContent))",
            literal(selector)?
        ))
    }

    pub fn visible(selector: &str) -> Result<String> {
        Ok(format!(
            "(() => {{ const el = document.querySelector({}); if (!el) return false; \
             const rect = el.getBoundingClientRect(); \
             return window.getComputedStyle(el).visibility !== 'hidden' \
             && rect.width > 0 && rect.height > 0; }})()",
            literal(selector)?
        ))
    }

    pub fn click(selector: &str) -> Result<String> {
        Ok(format!(
            "(() => {{ const el = document.querySelector({}); if (!el) return false; \
             el.click(); return true; }})()",
            literal(selector)?
        ))
    }
}
