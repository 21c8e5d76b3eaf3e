use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{build_web_grant, Extractor, Matcher};
use crate::models::{
    AnalyzeDocumentRequest, DiscoverRequest, ErrorResponse, ExtractRequest, ExtractResponse,
    HealthResponse, MatchBreakdown, RankRequest, RankResponse, ScoreRequest, ScoreResponse,
    WebGrantPage,
};
use crate::services::{DirectoryError, DocumentAnalyzer, GrantsDirectoryClient};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub extractor: Extractor,
    pub analyzer: DocumentAnalyzer,
    pub directory: Arc<GrantsDirectoryClient>,
    pub directory_page_size: usize,
}

/// Configure all grant-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/extract", web::post().to(extract))
        .route("/documents/analyze", web::post().to(analyze_document))
        .route("/grants/web", web::post().to(web_grant))
        .route("/grants/score", web::post().to(score_grant))
        .route("/grants/rank", web::post().to(rank_grants))
        .route("/grants/discover", web::post().to(discover_grants));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Extract requirement, eligibility, deadline and scoring snippets from raw text
///
/// POST /api/v1/extract
async fn extract(state: web::Data<AppState>, req: web::Json<ExtractRequest>) -> impl Responder {
    let fields = state.extractor.extract(&req.text);
    HttpResponse::Ok().json(ExtractResponse { fields })
}

/// Analyze an RFP document
///
/// POST /api/v1/documents/analyze
///
/// Request body:
/// ```json
/// {
///   "content": "string",
///   "file_path": "string"
/// }
/// ```
async fn analyze_document(
    state: web::Data<AppState>,
    req: web::Json<AnalyzeDocumentRequest>,
) -> impl Responder {
    let analysis = state.analyzer.analyze(&req).await;

    if analysis.success {
        HttpResponse::Ok().json(analysis)
    } else {
        HttpResponse::UnprocessableEntity().json(analysis)
    }
}

/// Build a grant record from fragments scraped off a grant web page
///
/// POST /api/v1/grants/web
async fn web_grant(req: web::Json<WebGrantPage>) -> impl Responder {
    let grant = build_web_grant(&req);
    tracing::debug!("Built web grant '{}' from {}", grant.title, req.url);
    HttpResponse::Ok().json(grant)
}

/// Score one grant against an organization
///
/// POST /api/v1/grants/score
///
/// A missing organization scores 0.
async fn score_grant(state: web::Data<AppState>, req: web::Json<ScoreRequest>) -> impl Responder {
    let breakdown = match &req.organization {
        Some(org) => state.matcher.score_breakdown(&req.grant, org),
        None => MatchBreakdown::default(),
    };

    HttpResponse::Ok().json(ScoreResponse {
        match_score: breakdown.match_score,
        breakdown,
    })
}

/// Rank a batch of grants for an organization
///
/// POST /api/v1/grants/rank
///
/// Request body:
/// ```json
/// {
///   "grants": [],
///   "organization": {},
///   "limit": 50
/// }
/// ```
async fn rank_grants(state: web::Data<AppState>, req: web::Json<RankRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank request: {:?}", errors);
        return validation_error(errors);
    }

    let RankRequest { grants, organization, limit } = req.into_inner();
    let total_results = grants.len();

    let mut matches = state.matcher.rank(grants, &organization);
    matches.truncate(limit as usize);

    tracing::info!("Returning {} of {} ranked grants", matches.len(), total_results);

    HttpResponse::Ok().json(RankResponse { matches, total_results })
}

/// Search the grants directory and rank what it returns
///
/// POST /api/v1/grants/discover
async fn discover_grants(
    state: web::Data<AppState>,
    req: web::Json<DiscoverRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for discover request: {:?}", errors);
        return validation_error(errors);
    }

    let DiscoverRequest { keywords, organization, limit } = req.into_inner();
    let limit = limit as usize;

    tracing::info!("Discovering grants for keywords: {}", keywords);

    let grants = match state
        .directory
        .search(&keywords, state.directory_page_size.max(limit))
        .await
    {
        Ok(grants) => grants,
        Err(e) => {
            tracing::error!("Grants directory search failed for '{}': {}", keywords, e);
            return directory_error(e);
        }
    };

    let total_results = grants.len();
    let mut matches = state.matcher.rank(grants, &organization);
    matches.truncate(limit);

    HttpResponse::Ok().json(RankResponse { matches, total_results })
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Per-record failures are skipped inside the search, so anything left is upstream
fn directory_error(e: DirectoryError) -> HttpResponse {
    HttpResponse::BadGateway().json(ErrorResponse {
        error: "Grants directory unavailable".to_string(),
        message: e.to_string(),
        status_code: 502,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    fn create_state() -> AppState {
        AppState {
            matcher: Matcher::with_default_weights(),
            extractor: Extractor::default(),
            analyzer: DocumentAnalyzer::default().with_root(std::env::temp_dir()),
            directory: Arc::new(
                GrantsDirectoryClient::new("http://127.0.0.1:9".to_string(), None, 1).unwrap(),
            ),
            directory_page_size: 100,
        }
    }

    macro_rules! init_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(create_state()))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = init_app!();
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_extract_endpoint() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/extract")
            .set_json(json!({"text": "Applicants must be nonprofits. Deadline: 3/1/2025\n"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["deadlines"], json!(["Deadline: 3/1/2025"]));
        assert!(body["scoringCriteria"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_analyze_failure_is_unprocessable() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/documents/analyze")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Either file_path or content must be provided");
    }

    #[actix_web::test]
    async fn test_analyze_rejects_paths_outside_document_root() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/documents/analyze")
            .set_json(json!({"file_path": "/etc/hostname"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Document path must be relative to the document root"));
    }

    #[actix_web::test]
    async fn test_score_without_organization_is_zero() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/grants/score")
            .set_json(json!({"grant": {"title": "Arts Access", "amount": 20000}}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["matchScore"], 0);
    }

    #[actix_web::test]
    async fn test_rank_truncates_to_limit() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/grants/rank")
            .set_json(json!({
                "grants": [
                    {"title": "A", "focusAreas": ["climate"]},
                    {"title": "B", "focusAreas": ["arts"]},
                    {"title": "C"}
                ],
                "organization": {"focusAreas": ["arts"]},
                "limit": 1
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total_results"], 3);
        assert_eq!(body["matches"].as_array().unwrap().len(), 1);
        assert_eq!(body["matches"][0]["title"], "B");
    }

    #[actix_web::test]
    async fn test_rank_rejects_zero_limit() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/grants/rank")
            .set_json(json!({"grants": [], "limit": 0}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_discover_reports_unreachable_directory() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/grants/discover")
            .set_json(json!({"keywords": "rural health", "organization": {"focusAreas": ["health"]}}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
