//! Field extraction from a live listing page.

use crate::airbnb::models::Listing;
use crate::airbnb::normalize::{available_amenities, bathroom_count, bedroom_count, listing_type};
use crate::airbnb::selectors::Selectors;
use crate::browser::{BrowserSession, ListingPage};
use crate::error::ScrapeError;
use anyhow::Result;
use tracing::{debug, info};

/// Opens `address` in a new page of `session`.
///
/// AirBnb serves missing rooms with HTTP 200 and a "404" title, so the title
/// is the not-found signal.
pub async fn open_listing<S: BrowserSession>(session: &S, address: &str) -> Result<S::Page> {
    let page = session.new_page().await?;
    page.goto(address).await?;

    let title = page.title().await?;
    debug!("Page title: {}", title);
    if title.contains("404") {
        return Err(ScrapeError::NotFound.into());
    }

    Ok(page)
}

/// Extracts listing fields from a page using a fixed selector set.
pub struct Extractor {
    selectors: Selectors,
}

impl Extractor {
    /// Creates an extractor for the given selectors.
    pub fn new(selectors: Selectors) -> Self {
        Self { selectors }
    }

    /// Listing title, trimmed.
    pub async fn name(&self, page: &impl ListingPage) -> Result<String> {
        let text = page.text(&self.selectors.name).await?;
        Ok(text.as_deref().map(str::trim).unwrap_or_default().to_string())
    }

    /// Property type without the location suffix.
    pub async fn kind(&self, page: &impl ListingPage) -> Result<String> {
        let text = page.text(&self.selectors.kind).await?;
        Ok(text.as_deref().map(listing_type).unwrap_or_default())
    }

    /// Specification fragments in page order, skipping nodes without text.
    pub async fn specification(&self, page: &impl ListingPage) -> Result<Vec<String>> {
        let texts = page.texts(&self.selectors.specification).await?;
        Ok(texts.into_iter().flatten().collect())
    }

    /// Reveals the amenities dialog and returns the available amenities.
    pub async fn amenities(&self, page: &impl ListingPage) -> Result<Vec<String>> {
        page.click(&self.selectors.amenities_button).await?;
        page.wait_for_visible(&self.selectors.amenities_list).await?;

        let sections = page.child_texts(&self.selectors.amenities_list).await?;
        debug!("Found {} amenity sections", sections.len());

        Ok(available_amenities(sections))
    }

    /// Extracts the full listing. Steps run in order on the same page.
    pub async fn listing(&self, page: &impl ListingPage) -> Result<Listing> {
        let name = self.name(page).await?;
        let kind = self.kind(page).await?;
        let specification = self.specification(page).await?;
        let bedrooms = bedroom_count(&specification);
        let bathrooms = bathroom_count(&specification);
        let amenities = self.amenities(page).await?;

        info!("Extracted \"{}\" with {} amenities", name, amenities.len());

        Ok(Listing { name, kind, bedrooms, bathrooms, amenities })
    }
}
