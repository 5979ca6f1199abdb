//! AWS region identifier validation.

use once_cell::sync::Lazy;
use regex::Regex;

/// Commercial, GovCloud, China and ISO partitions: `us-east-1`, `us-gov-west-1`,
/// `cn-north-1`, `us-isob-east-1`, `eu-central-2`...
static REGION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z]{2}(-gov|-iso[a-z]?)?-(north|south|east|west|central|northeast|northwest|southeast|southwest)-[0-9]{1,2}$")
        .expect("region pattern is valid")
});

/// Region used when nothing is configured
pub const DEFAULT_REGION: &str = "us-east-1";

/// Check that `region` looks like an AWS region identifier.
///
/// This is a syntactic check only; an unknown but well-formed region is accepted and
/// will fail at request time.
pub fn is_valid_region(region: &str) -> bool {
    REGION_PATTERN.is_match(region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_regions() {
        for region in [
            "us-east-1",
            "eu-west-3",
            "ap-southeast-2",
            "us-gov-west-1",
            "cn-northwest-1",
            "us-isob-east-1",
            "me-central-1",
            DEFAULT_REGION,
        ] {
            assert!(is_valid_region(region), "{} should be valid", region);
        }
    }

    #[test]
    fn test_invalid_regions() {
        for region in ["", "us-east", "US-EAST-1", "us-east-1a", "useast1", " us-east-1", "mars-north-1"] {
            assert!(!is_valid_region(region), "{:?} should be invalid", region);
        }
    }
}
