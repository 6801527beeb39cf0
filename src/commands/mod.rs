//! CLI command implementations.

pub mod listing;

pub use listing::ListingCommand;
