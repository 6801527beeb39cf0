//! Offline backend: runs the same queries against a saved HTML page.
//!
//! The snapshot is taken as already rendered, so navigation and clicks do not
//! change it. Save the page after opening the amenities dialog to capture the
//! amenity lists.

use crate::browser::{BrowserSession, ListingPage};
use crate::error::ScrapeError;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Node, Selector};
use std::path::Path;
use tracing::debug;

/// Serves pages built from one saved HTML document.
#[derive(Debug)]
pub struct SnapshotSession {
    html: String,
}

impl SnapshotSession {
    /// Creates a session from HTML source.
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Loads a saved page from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading snapshot from: {}", path.display());

        let html = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        Ok(Self::new(html))
    }
}

#[async_trait]
impl BrowserSession for SnapshotSession {
    type Page = SnapshotPage;

    async fn new_page(&self) -> Result<SnapshotPage> {
        Ok(SnapshotPage { html: self.html.clone() })
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A page over a fixed HTML document.
///
/// The source is re-parsed per query; `scraper::Html` is not `Send`.
#[derive(Debug)]
pub struct SnapshotPage {
    html: String,
}

impl SnapshotPage {
    fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }

    fn title_text(&self) -> Result<String> {
        let document = self.document();
        Ok(document
            .select(&parse("title")?)
            .next()
            .map(|e| e.text().collect::<String>())
            .unwrap_or_default())
    }

    fn first_text(&self, selector: &str) -> Result<String> {
        let document = self.document();
        let element = document
            .select(&parse(selector)?)
            .next()
            .ok_or_else(|| ScrapeError::ElementNotFound(selector.to_string()))?;
        Ok(element.text().collect())
    }

    fn all_texts(&self, selector: &str) -> Result<Vec<Option<String>>> {
        let document = self.document();
        let selector = parse(selector)?;
        Ok(document.select(&selector).map(|e| Some(e.text().collect())).collect())
    }

    fn all_child_texts(&self, selector: &str) -> Result<Vec<Vec<Option<String>>>> {
        let document = self.document();
        let selector = parse(selector)?;

        let sections = document
            .select(&selector)
            .map(|section| {
                section
                    .children()
                    .map(|child| match child.value() {
                        Node::Text(text) => Some(text.to_string()),
                        Node::Comment(comment) => Some(comment.to_string()),
                        Node::Element(_) => ElementRef::wrap(child).map(|e| e.text().collect()),
                        _ => None,
                    })
                    .collect()
            })
            .collect();

        Ok(sections)
    }

    fn require(&self, selector: &str) -> Result<()> {
        let document = self.document();
        if document.select(&parse(selector)?).next().is_none() {
            return Err(ScrapeError::ElementNotFound(selector.to_string()).into());
        }
        Ok(())
    }
}

fn parse(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("Invalid selector '{}': {}", selector, e))
}

#[async_trait]
impl ListingPage for SnapshotPage {
    async fn goto(&self, address: &str) -> Result<()> {
        debug!("Snapshot stands in for {}", address);
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        self.title_text()
    }

    async fn text(&self, selector: &str) -> Result<Option<String>> {
        self.first_text(selector).map(Some)
    }

    async fn texts(&self, selector: &str) -> Result<Vec<Option<String>>> {
        self.all_texts(selector)
    }

    async fn child_texts(&self, selector: &str) -> Result<Vec<Vec<Option<String>>>> {
        self.all_child_texts(selector)
    }

    // Nothing renders later in a snapshot: present means visible.
    async fn wait_for_visible(&self, selector: &str) -> Result<()> {
        self.require(selector)
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.require(selector)
    }
}
