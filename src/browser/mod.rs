//! Browser capability interface and its backends.
//!
//! Extraction only ever talks to [`BrowserSession`] and [`ListingPage`], so a
//! live Chrome, a saved HTML page, or a test double can sit behind it.

pub mod chrome;
pub mod snapshot;

pub use chrome::{ChromePage, ChromeSession};
pub use snapshot::{SnapshotPage, SnapshotSession};

use anyhow::Result;
use async_trait::async_trait;

/// A browser that can open pages. Closed exactly once by its owner.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Page: ListingPage;

    /// Opens a new blank page.
    async fn new_page(&self) -> Result<Self::Page>;

    /// Shuts the browser down.
    async fn close(&mut self) -> Result<()>;
}

/// Operations the extractors need from a live page.
#[async_trait]
pub trait ListingPage: Send + Sync {
    /// Navigates to `address` and waits until the network goes idle.
    async fn goto(&self, address: &str) -> Result<()>;

    /// Returns the document title (empty when the page has none).
    async fn title(&self) -> Result<String>;

    /// Text content of the first node matching `selector`.
    ///
    /// Fails with `ScrapeError::ElementNotFound` when nothing matches;
    /// `None` means the node exists but has no text content.
    async fn text(&self, selector: &str) -> Result<Option<String>>;

    /// Text content of every node matching `selector`, in document order.
    async fn texts(&self, selector: &str) -> Result<Vec<Option<String>>>;

    /// Text content of the child nodes of every node matching `selector`.
    async fn child_texts(&self, selector: &str) -> Result<Vec<Vec<Option<String>>>>;

    /// Waits until a node matching `selector` is visible.
    async fn wait_for_visible(&self, selector: &str) -> Result<()>;

    /// Clicks the first node matching `selector`.
    async fn click(&self, selector: &str) -> Result<()>;
}
