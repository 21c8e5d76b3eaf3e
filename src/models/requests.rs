use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{GrantRecord, OrganizationProfile};

/// Request to extract categories from raw grant text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub text: String,
}

/// Request to analyze an RFP document, given inline or by path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeDocumentRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(alias = "filePath", rename = "file_path", default)]
    pub file_path: Option<String>,
}

/// Request to score one grant against one organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub grant: GrantRecord,
    #[serde(default)]
    pub organization: Option<OrganizationProfile>,
}

/// Request to rank a batch of grants for one organization
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankRequest {
    #[serde(default)]
    pub grants: Vec<GrantRecord>,
    #[serde(default)]
    pub organization: OrganizationProfile,
    #[validate(range(min = 1, max = 500))]
    #[serde(default = "default_limit")]
    pub limit: u16,
}

/// Request to search the grants directory and rank the results
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiscoverRequest {
    #[validate(length(min = 1))]
    pub keywords: String,
    #[serde(default)]
    pub organization: OrganizationProfile,
    #[validate(range(min = 1, max = 500))]
    #[serde(default = "default_limit")]
    pub limit: u16,
}

fn default_limit() -> u16 {
    50
}
