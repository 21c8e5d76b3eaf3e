use regex::Regex;
use std::sync::LazyLock;

use crate::models::{ExtractedFields, ExtractionLimits};

/// Obligation phrasing, captured up to the next period
const REQUIREMENT_PATTERNS: &[&str] = &[
    r"(?i)(?:must|should|shall|required to) ([^\.]+)",
    r"(?i)requirements?:?\s*([^\.]+)",
    r"(?i)applicants must ([^\.]+)",
];

const ELIGIBILITY_PATTERNS: &[&str] = &[
    r"(?i)eligibility:\s*([^\.]+)",
    r"(?i)eligible (?:organizations|applicants|entities)\s*([^\.]+)",
    r"(?i)who can apply:\s*([^\.]+)",
];

/// Deadlines run to end-of-line: dates rarely end a sentence with a period
const DEADLINE_PATTERNS: &[&str] = &[
    r"(?i)deadline:\s*([^\n]+)",
    r"(?i)due (?:date|by):?\s*([^\n]+)",
    r"(?i)submissions? due:?\s*([^\n]+)",
];

const SCORING_CRITERIA_PATTERNS: &[&str] = &[
    r"(?i)scoring criteria:\s*([^\.]+)",
    r"(?i)evaluation criteria:\s*([^\.]+)",
    r"(?i)(?:proposals|applications) will be (?:evaluated|judged|scored) (?:based on|according to):?\s*([^\.]+)",
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

static RE_REQUIREMENTS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(REQUIREMENT_PATTERNS));
static RE_ELIGIBILITY: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(ELIGIBILITY_PATTERNS));
static RE_DEADLINES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(DEADLINE_PATTERNS));
static RE_SCORING_CRITERIA: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(SCORING_CRITERIA_PATTERNS));

/// Rule-based extractor for raw grant/RFP text
///
/// Every category is scanned with an ordered pattern list. Candidates are the full
/// matched spans, collected pattern by pattern and in text order within a pattern,
/// then cut to the category cap. The same snippet may appear twice when two patterns
/// overlap; callers that need unique entries dedupe downstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    limits: ExtractionLimits,
}

impl Extractor {
    pub fn new(limits: ExtractionLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> ExtractionLimits {
        self.limits
    }

    /// Extract requirements, eligibility, deadlines and scoring criteria from `text`
    pub fn extract(&self, text: &str) -> ExtractedFields {
        let fields = ExtractedFields {
            requirements: collect_matches(&RE_REQUIREMENTS, text, self.limits.requirements),
            eligibility: collect_matches(&RE_ELIGIBILITY, text, self.limits.eligibility),
            deadlines: collect_matches(&RE_DEADLINES, text, self.limits.deadlines),
            scoring_criteria: collect_matches(
                &RE_SCORING_CRITERIA,
                text,
                self.limits.scoring_criteria,
            ),
        };

        tracing::debug!(
            "Extracted {} requirements, {} eligibility, {} deadlines, {} scoring criteria from {} chars",
            fields.requirements.len(),
            fields.eligibility.len(),
            fields.deadlines.len(),
            fields.scoring_criteria.len(),
            text.len()
        );

        fields
    }
}

/// Extract all categories with the default caps
pub fn extract_fields(text: &str) -> ExtractedFields {
    Extractor::default().extract(text)
}

fn collect_matches(patterns: &[Regex], text: &str, cap: usize) -> Vec<String> {
    patterns
        .iter()
        .flat_map(|re| re.find_iter(text))
        .map(|m| m.as_str().trim().to_string())
        .take(cap)
        .collect()
}
