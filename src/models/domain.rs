use serde::{Deserialize, Serialize};

/// Where a grant record was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantSource {
    #[default]
    Api,
    DirectUrl,
}

/// Structured description of a funding opportunity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrantRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub funder: String,
    /// Award amount in whole currency units, 0 when unknown
    #[serde(default)]
    pub amount: u64,
    /// Free-form deadline text, usually `M/D/YYYY`
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub eligibility: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(rename = "focusAreas", alias = "focus_areas", default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub geography: Vec<String>,
    #[serde(default)]
    pub source: GrantSource,
}

/// Funding range an organization is looking for
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FundingPreferences {
    #[serde(rename = "minAmount", alias = "min_amount", default)]
    pub min_amount: u64,
    /// `None` means the range is unbounded above
    #[serde(rename = "maxAmount", alias = "max_amount", default)]
    pub max_amount: Option<u64>,
    #[serde(rename = "optimalAmount", alias = "optimal_amount", default)]
    pub optimal_amount: Option<u64>,
}

impl FundingPreferences {
    /// Explicit optimal amount, else the midpoint of the range, else twice the minimum
    pub fn optimal(&self) -> u64 {
        match (self.optimal_amount, self.max_amount) {
            (Some(optimal), _) => optimal,
            (None, Some(max)) => {
                self.min_amount / 2 + max / 2 + (self.min_amount % 2 + max % 2) / 2
            }
            (None, None) => self.min_amount.saturating_mul(2),
        }
    }
}

/// Periods in which the organization can take on new work
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Capacity {
    #[serde(rename = "availablePeriods", alias = "available_periods", default)]
    pub available_periods: Vec<String>,
}

/// Applicant description used to evaluate fit against a grant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationProfile {
    #[serde(rename = "missionStatement", alias = "mission_statement", default)]
    pub mission_statement: String,
    #[serde(rename = "focusAreas", alias = "focus_areas", default)]
    pub focus_areas: Vec<String>,
    #[serde(rename = "is501c3", alias = "is_501c3", default)]
    pub is_501c3: bool,
    #[serde(rename = "isNonprofit", alias = "is_nonprofit", default)]
    pub is_nonprofit: bool,
    #[serde(rename = "yearsOfOperation", alias = "years_of_operation", default)]
    pub years_of_operation: u32,
    #[serde(rename = "annualBudget", alias = "annual_budget", default)]
    pub annual_budget: u64,
    #[serde(rename = "serviceAreas", alias = "service_areas", default)]
    pub service_areas: Vec<String>,
    #[serde(rename = "idealFunding", alias = "ideal_funding", default)]
    pub ideal_funding: Option<FundingPreferences>,
    #[serde(default)]
    pub capacity: Option<Capacity>,
}

impl OrganizationProfile {
    /// True when no field carries any information
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The five 0-1 dimensions of match quality
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub mission: f64,
    pub eligibility: f64,
    pub funding: f64,
    pub geography: f64,
    pub timeline: f64,
}

/// Sub-scores plus the combined 0-100 score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    #[serde(rename = "subScores")]
    pub sub_scores: SubScores,
}

/// A grant record augmented with its score against one organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub grant: GrantRecord,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    #[serde(rename = "subScores")]
    pub sub_scores: SubScores,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub mission: f64,
    pub eligibility: f64,
    pub funding: f64,
    pub geography: f64,
    pub timeline: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            mission: 0.30,
            eligibility: 0.25,
            funding: 0.20,
            geography: 0.15,
            timeline: 0.10,
        }
    }
}

/// Per-category caps applied to extracted snippets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionLimits {
    pub requirements: usize,
    pub eligibility: usize,
    pub deadlines: usize,
    pub scoring_criteria: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            requirements: 10,
            eligibility: 5,
            deadlines: 3,
            scoring_criteria: 5,
        }
    }
}

/// Snippets pulled from raw grant text, grouped by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub requirements: Vec<String>,
    pub eligibility: Vec<String>,
    pub deadlines: Vec<String>,
    #[serde(rename = "scoringCriteria")]
    pub scoring_criteria: Vec<String>,
}

/// A heading plus the HTML block that follows it, isolated upstream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldFragment {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub html: String,
}

/// Per-field fragments of a grant web page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebGrantPage {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub funder: Option<FieldFragment>,
    #[serde(default)]
    pub amount: Option<FieldFragment>,
    #[serde(default)]
    pub deadline: Option<FieldFragment>,
    #[serde(default)]
    pub description: Option<FieldFragment>,
    #[serde(default)]
    pub eligibility: Option<FieldFragment>,
    #[serde(default)]
    pub requirements: Option<FieldFragment>,
    #[serde(rename = "focusAreas", alias = "focus_areas", default)]
    pub focus_areas: Option<FieldFragment>,
    #[serde(default)]
    pub geography: Option<FieldFragment>,
}
