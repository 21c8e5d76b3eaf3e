// Core algorithm exports
pub mod eligibility;
pub mod extractor;
pub mod fragments;
pub mod matcher;
pub mod scoring;

pub use eligibility::{calculate_eligibility_score, requirement_credit, RequirementKind};
pub use extractor::{extract_fields, Extractor};
pub use fragments::{build_web_grant, extract_amount, extract_deadline, extract_list, extract_text};
pub use matcher::Matcher;
pub use scoring::calculate_match_breakdown;
