//! Listing scrape command implementation.

use crate::airbnb::{open_listing, Extractor, Listing};
use crate::browser::{BrowserSession, ChromeSession, SnapshotSession};
use crate::config::Config;
use crate::error::ScrapeError;
use crate::format::Formatter;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Scrapes one listing and renders it.
pub struct ListingCommand {
    config: Config,
}

impl ListingCommand {
    /// Creates a new listing command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Scrapes `address` with headless Chrome and returns formatted output.
    pub async fn execute(&self, address: Option<&str>) -> Result<String> {
        let address = Self::require_address(address)?;
        self.config.selectors.validate()?;

        let mut session =
            ChromeSession::launch(&self.config).await.context("Failed to start the browser")?;

        self.execute_with_session(&mut session, address).await
    }

    /// Runs the same extraction against a saved HTML page.
    pub async fn execute_snapshot(&self, path: &Path, address: Option<&str>) -> Result<String> {
        let address = Self::require_address(address)?;
        self.config.selectors.validate()?;

        let mut session = SnapshotSession::from_file(path)?;
        self.execute_with_session(&mut session, address).await
    }

    /// Scrapes with a provided session, closing it on every path.
    pub async fn execute_with_session<S: BrowserSession>(
        &self,
        session: &mut S,
        address: &str,
    ) -> Result<String> {
        let result = self.scrape(session, address).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close browser: {:#}", e);
        }

        let listing = result?;
        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_listing(&listing))
    }

    async fn scrape<S: BrowserSession>(&self, session: &S, address: &str) -> Result<Listing> {
        info!("Scraping listing: {}", address);

        let page = open_listing(session, address).await?;
        let extractor = Extractor::new(self.config.selectors.clone());
        extractor.listing(&page).await
    }

    fn require_address(address: Option<&str>) -> Result<&str> {
        match address.map(str::trim) {
            Some(address) if !address.is_empty() => Ok(address),
            _ => Err(ScrapeError::MissingAddress.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    const LISTING_HTML: &str = r#"<html>
        <head><title>Cosy flat - Flats for Rent in Edinburgh</title></head>
        <body>
            <h1 class="i1pmzyw7"> Cosy flat </h1>
            <div class="toieuka"><h1>Flat in Edinburgh</h1></div>
            <div class="o1kjrihn"><ol><li>2 guests</li><li>1 bedroom</li><li>1 bed</li><li>1 bathroom</li></ol></div>
            <div class="b9672i7"><button>Show all 12 amenities</button></div>
            <ul class="_2f5j8p"><li>Hair Dryer</li><li>Shampoo</li><li>Unavailable: Towels</li></ul>
        </body>
    </html>"#;

    const NOT_FOUND_HTML: &str = "<html><head><title>404</title></head><body></body></html>";

    /// Session wrapper counting close calls.
    struct CountingSession {
        inner: SnapshotSession,
        closed: usize,
    }

    impl CountingSession {
        fn new(html: &str) -> Self {
            Self { inner: SnapshotSession::new(html), closed: 0 }
        }
    }

    #[async_trait::async_trait]
    impl BrowserSession for CountingSession {
        type Page = crate::browser::SnapshotPage;

        async fn new_page(&self) -> Result<Self::Page> {
            self.inner.new_page().await
        }

        async fn close(&mut self) -> Result<()> {
            self.closed += 1;
            anyhow::ensure!(self.closed == 1, "browser closed twice");
            Ok(())
        }
    }

    fn make_command(format: OutputFormat) -> ListingCommand {
        ListingCommand::new(Config { format, ..Config::default() })
    }

    #[tokio::test]
    async fn test_missing_address() {
        let cmd = make_command(OutputFormat::Table);

        let err = cmd.execute(None).await.unwrap_err();
        assert_eq!(err.to_string(), "Please provide a valid URL of a property on AirBnb.");
        assert_eq!(err.downcast_ref::<ScrapeError>(), Some(&ScrapeError::MissingAddress));
    }

    #[tokio::test]
    async fn test_blank_address() {
        let cmd = make_command(OutputFormat::Table);

        let err = cmd.execute(Some("   ")).await.unwrap_err();
        assert_eq!(err.downcast_ref::<ScrapeError>(), Some(&ScrapeError::MissingAddress));
    }

    #[tokio::test]
    async fn test_missing_address_checked_before_snapshot_load() {
        let cmd = make_command(OutputFormat::Table);

        let err = cmd.execute_snapshot(Path::new("/nonexistent.html"), None).await.unwrap_err();
        assert_eq!(err.downcast_ref::<ScrapeError>(), Some(&ScrapeError::MissingAddress));
    }

    #[tokio::test]
    async fn test_success_report() {
        let cmd = make_command(OutputFormat::Table);
        let mut session = CountingSession::new(LISTING_HTML);

        let output = cmd.execute_with_session(&mut session, "https://airbnb.co.uk/rooms/1").await;
        assert_eq!(
            output.unwrap(),
            "Property Name: Cosy flat\n\
             Property Type: Flat\n\
             No. of bedrooms: 1\n\
             No. of bathrooms: 1\n\
             Amenities:\n \
             - Hair Dryer\n \
             - Shampoo"
        );
        assert_eq!(session.closed, 1);
    }

    #[tokio::test]
    async fn test_not_found_closes_session() {
        let cmd = make_command(OutputFormat::Table);
        let mut session = CountingSession::new(NOT_FOUND_HTML);

        let err = cmd.execute_with_session(&mut session, "test-url").await.unwrap_err();
        assert_eq!(err.to_string(), "This room does not exist.");
        assert_eq!(session.closed, 1);
    }

    #[tokio::test]
    async fn test_extraction_error_closes_session() {
        let cmd = make_command(OutputFormat::Table);
        let mut session = CountingSession::new("<html><head><title>Flat</title></head></html>");

        let err = cmd.execute_with_session(&mut session, "test-url").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScrapeError>(),
            Some(ScrapeError::ElementNotFound(_))
        ));
        assert_eq!(session.closed, 1);
    }

    #[tokio::test]
    async fn test_json_format() {
        let cmd = make_command(OutputFormat::Json);
        let mut session = CountingSession::new(LISTING_HTML);

        let output = cmd.execute_with_session(&mut session, "test-url").await.unwrap();
        assert!(output.starts_with('{'));
        assert!(output.contains("\"type\": \"Flat\""));
    }

    #[tokio::test]
    async fn test_invalid_selector_fails_before_browser() {
        let mut config = Config::default();
        config.selectors.amenities_list = "ul[[".to_string();
        let cmd = ListingCommand::new(config);

        let err = cmd.execute(Some("https://airbnb.co.uk/rooms/1")).await.unwrap_err();
        assert!(err.to_string().contains("amenities_list"));
    }
}
