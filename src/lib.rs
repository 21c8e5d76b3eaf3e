//! Grant Scout - grant opportunity extraction and matching service
//!
//! This library pulls requirements, eligibility, deadlines and scoring criteria out of
//! grant text and scores grants against an organization profile on five weighted
//! dimensions.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{build_web_grant, extract_fields, Extractor, Matcher};
pub use crate::models::{
    ExtractedFields, GrantRecord, MatchBreakdown, MatchResult, OrganizationProfile, ScoringWeights,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let fields = extract_fields("Deadline: 6/30/2025\n");
        assert_eq!(fields.deadlines.len(), 1);

        let matcher = Matcher::new(ScoringWeights::default());
        assert_eq!(matcher.score(&GrantRecord::default(), &OrganizationProfile::default()), 0);
    }
}
