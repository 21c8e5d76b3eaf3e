use serde::{Deserialize, Serialize};
use crate::models::domain::{ExtractedFields, MatchBreakdown, MatchResult};

/// Response for the extract endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    #[serde(flatten)]
    pub fields: ExtractedFields,
}

/// Outcome of analyzing one document
///
/// Failures are reported in-band with `success = false` and empty categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub success: bool,
    #[serde(flatten)]
    pub fields: ExtractedFields,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl DocumentAnalysis {
    pub fn succeeded(fields: ExtractedFields) -> Self {
        Self {
            success: true,
            fields,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            fields: ExtractedFields::default(),
            error: Some(message.into()),
        }
    }
}

/// Response for the score endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    pub breakdown: MatchBreakdown,
}

/// Response for the rank and discover endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankResponse {
    pub matches: Vec<MatchResult>,
    pub total_results: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
