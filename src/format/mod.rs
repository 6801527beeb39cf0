//! Output formatting for a listing (table, JSON, markdown, CSV).

use crate::airbnb::Listing;
use crate::config::OutputFormat;

/// Formats a listing for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single listing.
    pub fn format_listing(&self, listing: &Listing) -> String {
        match self.format {
            OutputFormat::Json => self.json(listing),
            OutputFormat::Table => self.table(listing),
            OutputFormat::Markdown => self.markdown(listing),
            OutputFormat::Csv => self.csv(listing),
        }
    }

    // JSON formatting

    fn json(&self, listing: &Listing) -> String {
        serde_json::to_string_pretty(listing).unwrap_or_else(|_| "{}".to_string())
    }

    // Table formatting

    fn table(&self, listing: &Listing) -> String {
        let mut lines = vec![
            format!("Property Name: {}", listing.name),
            format!("Property Type: {}", listing.kind),
            format!("No. of bedrooms: {}", listing.bedrooms),
            format!("No. of bathrooms: {}", listing.bathrooms),
            "Amenities:".to_string(),
        ];

        lines.extend(listing.amenities.iter().map(|amenity| format!(" - {}", amenity)));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown(&self, listing: &Listing) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", listing.name));
        lines.push(String::new());

        lines.push(format!("- **Type:** {}", listing.kind));
        lines.push(format!("- **Bedrooms:** {}", listing.bedrooms));
        lines.push(format!("- **Bathrooms:** {}", listing.bathrooms));

        if !listing.amenities.is_empty() {
            lines.push(String::new());
            lines.push("### Amenities".to_string());
            lines.push(String::new());
            lines.extend(listing.amenities.iter().map(|amenity| format!("- {}", amenity)));
        }

        lines.join("\n")
    }

    // CSV formatting

    fn csv(&self, listing: &Listing) -> String {
        let row = [
            Self::csv_escape(&listing.name),
            Self::csv_escape(&listing.kind),
            Self::csv_escape(&listing.bedrooms),
            Self::csv_escape(&listing.bathrooms),
            Self::csv_escape(&listing.amenities.join("; ")),
        ];

        format!("name,type,bedrooms,bathrooms,amenities\n{}", row.join(","))
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}
