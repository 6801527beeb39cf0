//! Data model for a scraped listing.

use serde::{Deserialize, Serialize};

/// Structured record of one AirBnb listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Listing title
    pub name: String,
    /// Property type, e.g. "Flat" (location suffix dropped)
    #[serde(rename = "type")]
    pub kind: String,
    /// Digits only, or empty when the page has no bedroom fragment
    pub bedrooms: String,
    /// Digits only, "1 (shared)", or empty
    pub bathrooms: String,
    /// Available amenities in page order
    pub amenities: Vec<String>,
}
