use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use crate::core::eligibility::calculate_eligibility_score;
use crate::models::{GrantRecord, MatchBreakdown, OrganizationProfile, ScoringWeights, SubScores};

/// Score used when a dimension has no data to compare
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Timeline score for any parseable deadline when capacity is known.
/// Capacity periods are carried on the profile but not compared yet.
pub const TIMELINE_PLACEHOLDER_SCORE: f64 = 0.7;

/// Base score for an amount inside the preferred range, before the proximity bonus
const IN_RANGE_BASE: f64 = 0.7;
const PROXIMITY_BONUS: f64 = 0.3;

static RE_US_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap());

/// Calculate a match score (0-100) and its sub-scores for a grant and organization
///
/// Scoring formula:
/// score = (
///     mission_score * 0.30 +       # Grant focus areas covered by the org
///     eligibility_score * 0.25 +   # Share of eligibility clauses met
///     funding_score * 0.20 +       # Amount against the org's ideal range
///     geography_score * 0.15 +     # Grant regions served by the org
///     timeline_score * 0.10        # Deadline against org capacity
/// ) * 100
pub fn calculate_match_breakdown(
    grant: &GrantRecord,
    org: &OrganizationProfile,
    weights: &ScoringWeights,
) -> MatchBreakdown {
    let sub_scores = SubScores {
        mission: calculate_mission_score(grant, org).clamp(0.0, 1.0),
        eligibility: calculate_eligibility_score(grant, org).clamp(0.0, 1.0),
        funding: calculate_funding_score(grant, org).clamp(0.0, 1.0),
        geography: calculate_geography_score(grant, org).clamp(0.0, 1.0),
        timeline: calculate_timeline_score(grant, org).clamp(0.0, 1.0),
    };

    let total_score = (sub_scores.mission * weights.mission
        + sub_scores.eligibility * weights.eligibility
        + sub_scores.funding * weights.funding
        + sub_scores.geography * weights.geography
        + sub_scores.timeline * weights.timeline)
        * 100.0;

    MatchBreakdown {
        match_score: total_score.round_ties_even().clamp(0.0, 100.0) as u8,
        sub_scores,
    }
}

/// Calculate mission alignment (0-1)
///
/// 70% from grant focus areas matching an org focus area, 30% from grant focus areas
/// mentioned in the mission statement.
pub fn calculate_mission_score(grant: &GrantRecord, org: &OrganizationProfile) -> f64 {
    if grant.focus_areas.is_empty() {
        return 0.0;
    }

    let mission = org.mission_statement.to_lowercase();
    let org_areas: Vec<String> = org.focus_areas.iter().map(|a| a.to_lowercase()).collect();
    if mission.trim().is_empty() && org_areas.is_empty() {
        return 0.0;
    }

    let grant_areas: Vec<String> = grant.focus_areas.iter().map(|a| a.to_lowercase()).collect();
    let total = grant_areas.len() as f64;

    let direct_matches = grant_areas
        .iter()
        .filter(|area| org_areas.iter().any(|org_area| terms_overlap(area, org_area)))
        .count() as f64;

    let mission_mentions = grant_areas
        .iter()
        .filter(|area| !area.trim().is_empty() && mission.contains(area.as_str()))
        .count() as f64;

    0.7 * (direct_matches / total) + 0.3 * (mission_mentions / total)
}

/// Calculate funding fit (0-1)
///
/// Below the minimum decays linearly from 0.5, above a finite maximum decays from 0.5 by
/// the relative overshoot, and inside the range scores 0.7 plus up to 0.3 for closeness
/// to the optimal amount.
pub fn calculate_funding_score(grant: &GrantRecord, org: &OrganizationProfile) -> f64 {
    let prefs = match org.ideal_funding {
        Some(prefs) if grant.amount > 0 => prefs,
        _ => return NEUTRAL_SCORE,
    };

    let amount = grant.amount as f64;
    let min = prefs.min_amount as f64;

    if amount < min {
        return (amount / min * 0.5).max(0.0);
    }

    if let Some(max) = prefs.max_amount {
        if grant.amount > max {
            if max == 0 {
                return 0.0;
            }
            let max = max as f64;
            return (0.5 - (amount - max) / max * 0.5).max(0.0);
        }
    }

    let optimal = prefs.optimal() as f64;
    // A derived optimal sits inside the range, so deviation is measured against its
    // distance from the minimum; an explicit optimal is measured against itself.
    let scale = match prefs.optimal_amount {
        Some(_) => optimal,
        None => optimal - min,
    };

    let proximity = if scale > 0.0 {
        1.0 - ((amount - optimal).abs() / scale).min(1.0)
    } else if amount == optimal {
        1.0
    } else {
        0.0
    };

    IN_RANGE_BASE + PROXIMITY_BONUS * proximity
}

/// Calculate geographic fit (0-1)
///
/// Share of grant regions that match a service area by equality or containment.
pub fn calculate_geography_score(grant: &GrantRecord, org: &OrganizationProfile) -> f64 {
    if grant.geography.is_empty() || org.service_areas.is_empty() {
        return NEUTRAL_SCORE;
    }

    let service_areas: Vec<String> = org.service_areas.iter().map(|a| a.to_lowercase()).collect();

    let matched = grant
        .geography
        .iter()
        .map(|region| region.to_lowercase())
        .filter(|region| service_areas.iter().any(|area| terms_overlap(region, area)))
        .count() as f64;

    matched / grant.geography.len() as f64
}

/// Calculate timeline fit (0-1)
pub fn calculate_timeline_score(grant: &GrantRecord, org: &OrganizationProfile) -> f64 {
    if org.capacity.is_none() || parse_deadline(&grant.deadline).is_none() {
        return NEUTRAL_SCORE;
    }

    // TODO: score overlap between the deadline and capacity.available_periods
    TIMELINE_PLACEHOLDER_SCORE
}

/// Parse an `M/D/YYYY` deadline into a calendar date
pub fn parse_deadline(deadline: &str) -> Option<NaiveDate> {
    let caps = RE_US_DATE.captures(deadline.trim())?;
    let month = caps[1].parse().ok()?;
    let day = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Case-folded terms match when equal or when either contains the other.
/// Blank terms never match.
#[inline]
pub(crate) fn terms_overlap(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || a.contains(b) || b.contains(a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Capacity, FundingPreferences};

    fn create_test_grant() -> GrantRecord {
        GrantRecord {
            title: "Youth Education Fund".to_string(),
            funder: "Community Foundation".to_string(),
            amount: 50_000,
            deadline: "6/1/2025".to_string(),
            focus_areas: vec!["education".to_string()],
            eligibility: vec!["Must be a 501(c)(3) nonprofit".to_string()],
            geography: vec!["California".to_string()],
            ..Default::default()
        }
    }

    fn create_test_org() -> OrganizationProfile {
        OrganizationProfile {
            mission_statement: "We expand access to education for youth".to_string(),
            focus_areas: vec!["education".to_string(), "youth".to_string()],
            is_501c3: true,
            is_nonprofit: true,
            years_of_operation: 8,
            annual_budget: 750_000,
            service_areas: vec!["California".to_string()],
            ideal_funding: Some(FundingPreferences {
                min_amount: 20_000,
                max_amount: Some(100_000),
                optimal_amount: None,
            }),
            capacity: None,
        }
    }

    fn prefs(min: u64, max: Option<u64>, optimal: Option<u64>) -> OrganizationProfile {
        OrganizationProfile {
            ideal_funding: Some(FundingPreferences {
                min_amount: min,
                max_amount: max,
                optimal_amount: optimal,
            }),
            ..Default::default()
        }
    }

    fn grant_with_amount(amount: u64) -> GrantRecord {
        GrantRecord {
            amount,
            ..Default::default()
        }
    }

    #[test]
    fn test_calculate_match_breakdown() {
        let breakdown = calculate_match_breakdown(
            &create_test_grant(),
            &create_test_org(),
            &ScoringWeights::default(),
        );

        assert_eq!(breakdown.sub_scores.mission, 1.0);
        assert_eq!(breakdown.sub_scores.eligibility, 1.0);
        assert_eq!(breakdown.sub_scores.geography, 1.0);
        assert_eq!(breakdown.sub_scores.timeline, NEUTRAL_SCORE);
        assert!(breakdown.sub_scores.funding > 0.9);
        assert!(breakdown.match_score >= 85 && breakdown.match_score <= 96);
    }

    #[test]
    fn test_mission_score() {
        let org = create_test_org();

        let mut grant = create_test_grant();
        grant.focus_areas = vec!["Education".to_string(), "Climate".to_string()];
        // one of two matches directly, one of two is in the mission text
        let score = calculate_mission_score(&grant, &org);
        assert!((score - 0.5).abs() < 1e-9);

        grant.focus_areas.clear();
        assert_eq!(calculate_mission_score(&grant, &org), 0.0);
    }

    #[test]
    fn test_mission_score_substring_match() {
        let org = OrganizationProfile {
            focus_areas: vec!["Early Childhood Education".to_string()],
            ..Default::default()
        };
        let grant = GrantRecord {
            focus_areas: vec!["education".to_string()],
            ..Default::default()
        };

        assert!((calculate_mission_score(&grant, &org) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_funding_score_neutral_without_data() {
        assert_eq!(calculate_funding_score(&grant_with_amount(0), &prefs(1, None, None)), NEUTRAL_SCORE);
        assert_eq!(
            calculate_funding_score(&grant_with_amount(5_000), &OrganizationProfile::default()),
            NEUTRAL_SCORE
        );
    }

    #[test]
    fn test_funding_score_at_minimum() {
        let org = prefs(20_000, Some(100_000), None);
        let score = calculate_funding_score(&grant_with_amount(20_000), &org);
        assert!((score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_funding_score_at_optimal() {
        let org = prefs(20_000, Some(100_000), None);
        let score = calculate_funding_score(&grant_with_amount(60_000), &org);
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_funding_score_below_minimum() {
        let org = prefs(20_000, Some(100_000), None);
        let score = calculate_funding_score(&grant_with_amount(10_000), &org);
        assert!((score - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_funding_score_above_maximum() {
        let org = prefs(20_000, Some(100_000), None);

        let score = calculate_funding_score(&grant_with_amount(150_000), &org);
        assert!((score - 0.25).abs() < 1e-9);

        // Far above the maximum bottoms out at zero
        assert_eq!(calculate_funding_score(&grant_with_amount(500_000), &org), 0.0);
    }

    #[test]
    fn test_funding_score_unbounded_maximum() {
        let org = prefs(20_000, None, None);

        // Optimal defaults to twice the minimum
        let score = calculate_funding_score(&grant_with_amount(40_000), &org);
        assert!((score - 1.0).abs() < 1e-9);

        let score = calculate_funding_score(&grant_with_amount(1_000_000), &org);
        assert!((score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_funding_score_huge_range_does_not_overflow() {
        let org = prefs(u64::MAX - 10, Some(u64::MAX), None);
        let score = calculate_funding_score(&grant_with_amount(u64::MAX - 5), &org);
        assert!((0.7..=1.0).contains(&score), "got {}", score);
    }

    #[test]
    fn test_funding_score_explicit_optimal() {
        let org = prefs(20_000, Some(100_000), Some(80_000));
        let score = calculate_funding_score(&grant_with_amount(60_000), &org);
        // 1 - 20k/80k = 0.75 proximity
        assert!((score - (0.7 + 0.3 * 0.75)).abs() < 1e-9);
    }

    #[test]
    fn test_geography_score() {
        let org = create_test_org();
        let mut grant = create_test_grant();

        grant.geography = vec!["CALIFORNIA".to_string(), "Nevada".to_string()];
        assert!((calculate_geography_score(&grant, &org) - 0.5).abs() < 1e-9);

        grant.geography = vec!["Northern California".to_string()];
        assert_eq!(calculate_geography_score(&grant, &org), 1.0);

        grant.geography.clear();
        assert_eq!(calculate_geography_score(&grant, &org), NEUTRAL_SCORE);
    }

    #[test]
    fn test_timeline_score() {
        let mut org = create_test_org();
        let mut grant = create_test_grant();

        // Capacity missing
        assert_eq!(calculate_timeline_score(&grant, &org), NEUTRAL_SCORE);

        org.capacity = Some(Capacity {
            available_periods: vec!["Q3 2025".to_string()],
        });
        assert_eq!(calculate_timeline_score(&grant, &org), TIMELINE_PLACEHOLDER_SCORE);

        grant.deadline = "rolling".to_string();
        assert_eq!(calculate_timeline_score(&grant, &org), NEUTRAL_SCORE);

        grant.deadline = "13/45/2025".to_string();
        assert_eq!(calculate_timeline_score(&grant, &org), NEUTRAL_SCORE);
    }

    #[test]
    fn test_parse_deadline() {
        assert_eq!(parse_deadline("6/1/2025"), NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(parse_deadline(" 12/31/2024 "), NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(parse_deadline("2025-06-01"), None);
        assert_eq!(parse_deadline(""), None);
    }

    #[test]
    fn test_terms_overlap() {
        assert!(terms_overlap("education", "education"));
        assert!(terms_overlap("education", "adult education"));
        assert!(terms_overlap("adult education", "education"));
        assert!(!terms_overlap("", "education"));
        assert!(!terms_overlap("arts", "health"));
    }
}
