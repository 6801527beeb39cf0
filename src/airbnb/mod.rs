//! AirBnb listing extraction: selectors, normalization, and data models.

pub mod extract;
pub mod models;
pub mod normalize;
pub mod selectors;

pub use extract::{open_listing, Extractor};
pub use models::Listing;
pub use selectors::Selectors;
