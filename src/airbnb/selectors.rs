//! CSS selectors for AirBnb listing pages.
//!
//! These bind the extractors to the site's generated class names and break
//! whenever AirBnb ships new markup. They can be overridden under
//! `[selectors]` in the config file without a rebuild.
//!
//! **Update process**: When extraction fails, save the page with the browser,
//! update selectors, and refresh `tests/fixtures/listing.html`.

use anyhow::{anyhow, Result};
use scraper::Selector;
use serde::{Deserialize, Serialize};

/// Selector set used by the extractors. Read-only once the run starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Listing title heading.
    pub name: String,

    /// Heading holding "<type> in <location>".
    pub kind: String,

    /// Items of the guests/bedrooms/beds/bathrooms line.
    pub specification: String,

    /// "Show all amenities" control.
    pub amenities_button: String,

    /// Amenity section lists inside the revealed dialog.
    pub amenities_list: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            name: "h1.i1pmzyw7".to_string(),
            kind: ".toieuka h1".to_string(),
            specification: ".o1kjrihn li".to_string(),
            amenities_button: ".b9672i7 button".to_string(),
            amenities_list: "ul._2f5j8p".to_string(),
        }
    }
}

impl Selectors {
    /// Checks that every selector parses as CSS.
    pub fn validate(&self) -> Result<()> {
        for (field, selector) in self.entries() {
            Selector::parse(selector)
                .map_err(|e| anyhow!("Invalid `{}` selector '{}': {}", field, selector, e))?;
        }
        Ok(())
    }

    fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("name", &self.name),
            ("kind", &self.kind),
            ("specification", &self.specification),
            ("amenities_button", &self.amenities_button),
            ("amenities_list", &self.amenities_list),
        ]
    }
}
