//! listing-scraper - Extract an AirBnb listing with a headless browser
//!
//! Drives Chrome through a small capability interface, then normalizes the
//! page's free text into a structured [`Listing`].

pub mod airbnb;
pub mod browser;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;

pub use airbnb::{Listing, Selectors};
pub use config::Config;
pub use error::ScrapeError;
