use rayon::prelude::*;

use crate::core::scoring::calculate_match_breakdown;
use crate::models::{GrantRecord, MatchBreakdown, MatchResult, OrganizationProfile, ScoringWeights};

/// Main matching orchestrator - scores grants against an organization profile
///
/// # Sub-scores
/// 1. Mission alignment
/// 2. Eligibility
/// 3. Funding fit
/// 4. Geography
/// 5. Timeline
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a grant for an organization (0-100); an empty profile scores 0
    pub fn score(&self, grant: &GrantRecord, org: &OrganizationProfile) -> u8 {
        self.score_breakdown(grant, org).match_score
    }

    /// Score a grant and keep the sub-scores behind the total
    pub fn score_breakdown(&self, grant: &GrantRecord, org: &OrganizationProfile) -> MatchBreakdown {
        if org.is_empty() {
            return MatchBreakdown::default();
        }

        let breakdown = calculate_match_breakdown(grant, org, &self.weights);

        tracing::debug!(
            "Scored '{}': {} (mission {:.2}, eligibility {:.2}, funding {:.2}, geography {:.2}, timeline {:.2})",
            grant.title,
            breakdown.match_score,
            breakdown.sub_scores.mission,
            breakdown.sub_scores.eligibility,
            breakdown.sub_scores.funding,
            breakdown.sub_scores.geography,
            breakdown.sub_scores.timeline
        );

        breakdown
    }

    /// Rank grants for an organization
    ///
    /// Grants are scored in parallel; results are sorted by score (descending) and keep
    /// their discovery order on ties.
    ///
    /// # Arguments
    /// * `grants` - Grants in discovery order
    /// * `org` - The organization being matched
    ///
    /// # Returns
    /// Every grant wrapped in a MatchResult, best first
    pub fn rank(&self, grants: Vec<GrantRecord>, org: &OrganizationProfile) -> Vec<MatchResult> {
        let total_grants = grants.len();

        let mut results: Vec<MatchResult> = grants
            .into_par_iter()
            .map(|grant| {
                let breakdown = self.score_breakdown(&grant, org);
                MatchResult {
                    grant,
                    match_score: breakdown.match_score,
                    sub_scores: breakdown.sub_scores,
                }
            })
            .collect();

        // Stable sort preserves discovery order among equal scores
        results.sort_by(|a, b| b.match_score.cmp(&a.match_score));

        tracing::debug!(
            "Ranked {} grants (top score: {})",
            total_grants,
            results.first().map(|r| r.match_score).unwrap_or(0)
        );

        results
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FundingPreferences;

    fn create_grant(title: &str, focus: &[&str], geography: &[&str]) -> GrantRecord {
        GrantRecord {
            title: title.to_string(),
            amount: 50_000,
            focus_areas: focus.iter().map(|f| f.to_string()).collect(),
            geography: geography.iter().map(|g| g.to_string()).collect(),
            ..Default::default()
        }
    }

    fn create_org() -> OrganizationProfile {
        OrganizationProfile {
            mission_statement: "Arts education for rural youth".to_string(),
            focus_areas: vec!["arts".to_string(), "education".to_string()],
            is_501c3: true,
            is_nonprofit: true,
            service_areas: vec!["Montana".to_string()],
            ideal_funding: Some(FundingPreferences {
                min_amount: 10_000,
                max_amount: Some(90_000),
                optimal_amount: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_profile_scores_zero() {
        let matcher = Matcher::with_default_weights();
        let grant = create_grant("Any", &["arts"], &["Montana"]);

        assert_eq!(matcher.score(&grant, &OrganizationProfile::default()), 0);
    }

    #[test]
    fn test_empty_grant_does_not_panic() {
        let matcher = Matcher::with_default_weights();
        let breakdown = matcher.score_breakdown(&GrantRecord::default(), &create_org());

        assert_eq!(breakdown.sub_scores.mission, 0.0);
        assert_eq!(breakdown.sub_scores.eligibility, 1.0);
        assert_eq!(breakdown.sub_scores.funding, 0.5);
        assert_eq!(breakdown.sub_scores.geography, 0.5);
        assert_eq!(breakdown.sub_scores.timeline, 0.5);
        // 25 + 10 + 7.5 + 5
        assert!((47..=48).contains(&breakdown.match_score));
    }

    #[test]
    fn test_rank_sorted_by_score() {
        let matcher = Matcher::with_default_weights();
        let grants = vec![
            create_grant("Weak", &["climate"], &["Texas"]),
            create_grant("Strong", &["arts", "education"], &["Montana"]),
            create_grant("Middle", &["arts", "climate"], &["Montana"]),
        ];

        let results = matcher.rank(grants, &create_org());

        let titles: Vec<&str> = results.iter().map(|r| r.grant.title.as_str()).collect();
        assert_eq!(titles, vec!["Strong", "Middle", "Weak"]);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let matcher = Matcher::with_default_weights();
        let grants: Vec<GrantRecord> = (0..20)
            .map(|i| create_grant(&format!("Grant {}", i), &["arts"], &["Montana"]))
            .collect();

        let results = matcher.rank(grants, &create_org());

        assert_eq!(results.len(), 20);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.grant.title, format!("Grant {}", i));
        }
    }

    #[test]
    fn test_custom_weights() {
        let matcher = Matcher::new(ScoringWeights {
            mission: 1.0,
            eligibility: 0.0,
            funding: 0.0,
            geography: 0.0,
            timeline: 0.0,
        });
        let grant = create_grant("Arts", &["arts"], &[]);

        assert_eq!(matcher.score(&grant, &create_org()), 100);
    }
}
