//! Pure text normalization for listing fragments.

/// Bathroom count reported for a shared bathroom.
pub const SHARED_BATHROOM: &str = "1 (shared)";

const TYPE_SEPARATOR: &str = " in ";
const NOT_INCLUDED: &str = "Not included";
const UNAVAILABLE_MARKER: &str = "Unavailable:";

/// Bedroom count from the first fragment mentioning a bedroom or a bed.
///
/// Returns the fragment's digits, or an empty string when no fragment matches.
pub fn bedroom_count<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments
        .iter()
        .map(|f| f.as_ref())
        .find(|f| f.contains("bedroom") || f.contains("bed"))
        .map(digits)
        .unwrap_or_default()
}

/// Bathroom count from the first fragment mentioning a bathroom.
///
/// A "Shared" bathroom always counts as [`SHARED_BATHROOM`], whatever digits
/// the fragment carries.
pub fn bathroom_count<S: AsRef<str>>(fragments: &[S]) -> String {
    match fragments.iter().map(|f| f.as_ref()).find(|f| f.contains("bathroom")) {
        Some(f) if f.contains("Shared") => SHARED_BATHROOM.to_string(),
        Some(f) => digits(f),
        None => String::new(),
    }
}

/// Property type from a "<type> in <location>" heading.
pub fn listing_type(heading: &str) -> String {
    heading.trim().split(TYPE_SEPARATOR).next().unwrap_or_default().to_string()
}

/// Flattens amenity sections into the available amenity names.
///
/// Each inner vector holds the text of one section's child nodes (`None` for
/// a node without text). Blank nodes, "Not included" placeholders and
/// "Unavailable:" items are dropped; duplicates across sections are kept.
pub fn available_amenities(sections: Vec<Vec<Option<String>>>) -> Vec<String> {
    sections
        .into_iter()
        .flatten()
        .flatten()
        .filter(|text| {
            let name = text.trim();
            !name.is_empty() && name != NOT_INCLUDED && !text.contains(UNAVAILABLE_MARKER)
        })
        .map(|text| text.trim().to_string())
        .collect()
}

// "3-4 bedrooms" yields "34"; ranges are not interpreted.
fn digits(fragment: &str) -> String {
    fragment.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(items: &[&str]) -> Vec<Option<String>> {
        items.iter().map(|s| Some(s.to_string())).collect()
    }

    #[test]
    fn test_bedroom_count() {
        assert_eq!(bedroom_count(&["3 bedrooms"]), "3");
    }

    #[test]
    fn test_bedroom_count_from_beds() {
        assert_eq!(bedroom_count(&["1 bed"]), "1");
    }

    #[test]
    fn test_bedroom_count_first_match_wins() {
        let spec = ["2 guests", "2 beds", "1 bedroom", "1 bathroom"];
        assert_eq!(bedroom_count(&spec), "2");
    }

    #[test]
    fn test_bedroom_count_missing() {
        assert_eq!(bedroom_count(&["1 bathroom"]), "");
        assert_eq!(bedroom_count::<&str>(&[]), "");
    }

    #[test]
    fn test_bedroom_count_strips_all_non_digits() {
        assert_eq!(bedroom_count(&["3-4 bedrooms"]), "34");
        assert_eq!(bedroom_count(&["Studio bed"]), "");
    }

    #[test]
    fn test_bathroom_count() {
        assert_eq!(bathroom_count(&["3 bathrooms"]), "3");
    }

    #[test]
    fn test_bathroom_count_shared() {
        assert_eq!(bathroom_count(&["Shared bathroom"]), "1 (shared)");
        assert_eq!(bathroom_count(&["2 Shared bathrooms"]), "1 (shared)");
    }

    #[test]
    fn test_bathroom_count_shared_is_case_sensitive() {
        assert_eq!(bathroom_count(&["1 shared bathroom"]), "1");
    }

    #[test]
    fn test_bathroom_count_missing() {
        assert_eq!(bathroom_count(&["1 bedroom"]), "");
    }

    #[test]
    fn test_bathroom_count_scans_whole_list() {
        let spec: Vec<String> =
            ["4 guests", "2 bedrooms", "1.5 baths", "2 bathrooms"].map(String::from).to_vec();
        assert_eq!(bathroom_count(&spec), "2");
    }

    #[test]
    fn test_counts_have_valid_shape() {
        let spec = ["10 guests", "5 bedrooms", "7 beds", "Shared half-bathroom"];
        let bedrooms = bedroom_count(&spec);
        let bathrooms = bathroom_count(&spec);

        assert!(bedrooms.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(bathrooms, SHARED_BATHROOM);
    }

    #[test]
    fn test_listing_type() {
        assert_eq!(listing_type("  Flat in Edinburgh  "), "Flat");
        assert_eq!(listing_type("Entire home"), "Entire home");
        assert_eq!(listing_type(""), "");
    }

    #[test]
    fn test_listing_type_first_separator_only() {
        assert_eq!(listing_type("Room in hotel in Lisbon"), "Room");
    }

    #[test]
    fn test_available_amenities_drops_unavailable() {
        let sections = vec![section(&[
            "Hair Dryer",
            "Shampoo",
            "Body Soap",
            "Shower gel",
            "Hot water",
            "Unavailable: Towels",
        ])];

        let amenities = available_amenities(sections);
        assert_eq!(amenities, vec!["Hair Dryer", "Shampoo", "Body Soap", "Shower gel", "Hot water"]);
        assert!(!amenities.contains(&"Towels".to_string()));
    }

    #[test]
    fn test_available_amenities_drops_not_included() {
        let sections = vec![
            section(&["Wifi", "  Kitchen  "]),
            section(&["Not included", "Unavailable: Smoke alarm", "Unavailable: TV"]),
        ];

        assert_eq!(available_amenities(sections), vec!["Wifi", "Kitchen"]);
    }

    #[test]
    fn test_available_amenities_keeps_duplicates_and_order() {
        let sections = vec![section(&["Wifi", "Heating"]), section(&["Wifi"])];

        assert_eq!(available_amenities(sections), vec!["Wifi", "Heating", "Wifi"]);
    }

    #[test]
    fn test_available_amenities_not_included_matched_after_trim() {
        let sections = vec![section(&["  Not included \n", "Not included: Pool", "Wifi"])];

        assert_eq!(available_amenities(sections), vec!["Not included: Pool", "Wifi"]);
    }

    #[test]
    fn test_available_amenities_drops_blank_nodes() {
        let sections = vec![vec![
            Some("\n    ".to_string()),
            Some("Iron".to_string()),
            None,
            Some(String::new()),
            Some("\n  ".to_string()),
        ]];

        assert_eq!(available_amenities(sections), vec!["Iron"]);
    }

    #[test]
    fn test_available_amenities_empty() {
        assert!(available_amenities(Vec::new()).is_empty());
        assert!(available_amenities(vec![Vec::new()]).is_empty());
    }
}
