//! US state name / postal abbreviation table.
//!
//! Covers the 50 states. The District of Columbia and territories are
//! deliberately absent: the boundary file's features for them stay
//! unmatched and render with a zero count.

/// `(full name, postal abbreviation)` for the 50 US states.
pub const STATES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Maps a full state name (as found in `properties.NAME`) to its postal
/// abbreviation. Matching is exact.
#[must_use]
pub fn name_to_abbr(name: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, abbr)| *abbr)
}

/// Maps a postal abbreviation to the full state name (case-insensitive).
#[must_use]
pub fn abbr_to_name(abbr: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(_, a)| a.eq_ignore_ascii_case(abbr))
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn state_count() {
        assert_eq!(STATES.len(), 50);
    }

    #[test]
    fn abbreviations_are_unique() {
        let abbrs: BTreeSet<&str> = STATES.iter().map(|(_, a)| *a).collect();
        assert_eq!(abbrs.len(), STATES.len());
    }

    #[test]
    fn name_roundtrip() {
        for (name, abbr) in STATES {
            assert_eq!(name_to_abbr(name), Some(*abbr));
            assert_eq!(abbr_to_name(abbr), Some(*name));
        }
    }

    #[test]
    fn unknown_names() {
        assert_eq!(name_to_abbr("District of Columbia"), None);
        assert_eq!(name_to_abbr("california"), None);
        assert_eq!(abbr_to_name("XX"), None);
    }

    #[test]
    fn case_insensitive_abbr_to_name() {
        assert_eq!(abbr_to_name("ca"), Some("California"));
        assert_eq!(abbr_to_name("Ca"), Some("California"));
    }
}
