// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Capacity, ExtractedFields, ExtractionLimits, FieldFragment, FundingPreferences, GrantRecord,
    GrantSource, MatchBreakdown, MatchResult, OrganizationProfile, ScoringWeights, SubScores,
    WebGrantPage,
};
pub use requests::{AnalyzeDocumentRequest, DiscoverRequest, ExtractRequest, RankRequest, ScoreRequest};
pub use responses::{DocumentAnalysis, ErrorResponse, ExtractResponse, HealthResponse, RankResponse, ScoreResponse};
