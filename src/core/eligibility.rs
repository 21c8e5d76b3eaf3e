use regex::Regex;
use std::sync::LazyLock;

use crate::models::{GrantRecord, OrganizationProfile};

/// Credit for a requirement whose wording no check recognizes.
/// Unrecognized clauses are assumed half met rather than failed.
pub const ASSUMED_MET_CREDIT: f64 = 0.5;

static RE_YEARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*\+?\s*(?:or more\s+)?years?").unwrap());
static RE_BUDGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(under|over|at least|maximum|minimum)?\s*(?:of\s+)?\$\s*(\d[\d,]*)(\.\d+)?\s*(million|thousand|m|k)?\b",
    )
    .unwrap()
});

/// Which organization attribute an eligibility clause is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementKind {
    TaxExempt,
    Nonprofit,
    YearsOfOperation,
    Budget,
    Location,
    Unrecognized,
}

impl RequirementKind {
    /// Classify by the first keyword family found in the clause
    pub fn classify(requirement: &str) -> Self {
        let text = requirement.to_lowercase();

        if contains_any(&text, &["501(c)(3)", "501c3", "501 (c)(3)", "tax-exempt", "tax exempt"]) {
            RequirementKind::TaxExempt
        } else if contains_any(&text, &["nonprofit", "non-profit", "not for profit", "not-for-profit"]) {
            RequirementKind::Nonprofit
        } else if contains_any(&text, &["years", "established", "history"]) {
            RequirementKind::YearsOfOperation
        } else if contains_any(&text, &["budget", "revenue", "income"]) {
            RequirementKind::Budget
        } else if contains_any(&text, &["located", "location", "area", "region"]) {
            RequirementKind::Location
        } else {
            RequirementKind::Unrecognized
        }
    }
}

#[inline]
fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Direction of a budget bound in a requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetBound {
    AtMost(u64),
    AtLeast(u64),
}

impl BudgetBound {
    pub fn admits(&self, annual_budget: u64) -> bool {
        match *self {
            BudgetBound::AtMost(limit) => annual_budget <= limit,
            BudgetBound::AtLeast(limit) => annual_budget >= limit,
        }
    }
}

/// Calculate the share of eligibility clauses the organization meets (0-1)
///
/// A grant without clauses is met vacuously.
pub fn calculate_eligibility_score(grant: &GrantRecord, org: &OrganizationProfile) -> f64 {
    if grant.eligibility.is_empty() {
        return 1.0;
    }

    let met: f64 = grant
        .eligibility
        .iter()
        .map(|requirement| requirement_credit(requirement, org))
        .sum();

    met / grant.eligibility.len() as f64
}

/// Credit (0, 0.5 or 1) earned by one clause
pub fn requirement_credit(requirement: &str, org: &OrganizationProfile) -> f64 {
    let met = match RequirementKind::classify(requirement) {
        RequirementKind::TaxExempt => org.is_501c3,
        RequirementKind::Nonprofit => org.is_nonprofit,
        RequirementKind::YearsOfOperation => match parse_required_years(requirement) {
            Some(years) => org.years_of_operation >= years,
            None => true,
        },
        RequirementKind::Budget => match parse_budget_bound(requirement) {
            Some(bound) => bound.admits(org.annual_budget),
            None => true,
        },
        RequirementKind::Location => {
            let text = requirement.to_lowercase();
            org.service_areas.iter().any(|area| {
                let area = area.trim().to_lowercase();
                !area.is_empty() && text.contains(&area)
            })
        }
        RequirementKind::Unrecognized => return ASSUMED_MET_CREDIT,
    };

    if met {
        1.0
    } else {
        0.0
    }
}

/// Parse "N years" out of a clause
pub fn parse_required_years(requirement: &str) -> Option<u32> {
    RE_YEARS
        .captures(requirement)
        .and_then(|caps| caps[1].parse().ok())
}

/// Parse a directional dollar figure such as "under $500,000"; "at least" when undirected
pub fn parse_budget_bound(requirement: &str) -> Option<BudgetBound> {
    let caps = RE_BUDGET.captures(requirement)?;
    let whole = caps[2].replace(',', "");
    let base: u64 = whole.parse().ok()?;

    let multiplier: u64 = match caps.get(4).map(|m| m.as_str().to_lowercase()).as_deref() {
        Some("million") | Some("m") => 1_000_000,
        Some("thousand") | Some("k") => 1_000,
        _ => 1,
    };

    // Cents are dropped; a fraction before a scale suffix is kept
    let amount = match caps.get(3) {
        Some(fraction) if multiplier > 1 => {
            let scaled: f64 = format!("{}{}", whole, fraction.as_str()).parse().ok()?;
            (scaled * multiplier as f64).round() as u64
        }
        _ => base.saturating_mul(multiplier),
    };

    let bound = match caps.get(1).map(|m| m.as_str().to_lowercase()).as_deref() {
        Some("under") | Some("maximum") => BudgetBound::AtMost(amount),
        _ => BudgetBound::AtLeast(amount),
    };
    Some(bound)
}
