use crate::core::fragments::extract_amount;
use crate::models::{GrantRecord, GrantSource};
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the grants directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid grant record: {0}")]
    InvalidRecord(String),
}

/// Grants directory API client
///
/// Issues a single search request and normalizes the loosely shaped records the
/// directory returns into [`GrantRecord`]s.
pub struct GrantsDirectoryClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl GrantsDirectoryClient {
    /// Create a new directory client
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    /// Search the directory and return normalized grants in discovery order
    ///
    /// Records that cannot be normalized are skipped.
    pub async fn search(&self, keywords: &str, limit: usize) -> Result<Vec<GrantRecord>, DirectoryError> {
        let url = format!(
            "{}/grants/search?keywords={}&limit={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(keywords),
            limit
        );

        tracing::debug!("Searching grants directory: {}", url);

        let mut request = self.client.get(&url);
        if let Some(api_key) = &self.api_key {
            request = request.header("X-Api-Key", api_key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Grants directory search failed: {} - {}", status, body);
            return Err(DirectoryError::ApiError(format!(
                "Failed to search grants: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        let records = match &json {
            Value::Array(records) => records,
            _ => json
                .get("data")
                .and_then(|d| d.as_array())
                .ok_or_else(|| DirectoryError::InvalidResponse("Missing data array".into()))?,
        };

        let grants: Vec<GrantRecord> = records
            .iter()
            .filter_map(|record| match normalize_record(record) {
                Ok(grant) => Some(grant),
                Err(e) => {
                    tracing::warn!("Skipping directory record: {}", e);
                    None
                }
            })
            .take(limit)
            .collect();

        tracing::debug!("Normalized {} of {} directory records", grants.len(), records.len());

        Ok(grants)
    }
}

/// Normalize one directory record into a grant
///
/// Field names vary between directories, so each field accepts a few aliases. Lists
/// may arrive as arrays or comma-separated strings; amounts as numbers or `$` strings.
pub fn normalize_record(record: &Value) -> Result<GrantRecord, DirectoryError> {
    let obj = record
        .as_object()
        .ok_or_else(|| DirectoryError::InvalidRecord("expected a JSON object".into()))?;

    let title = first_string(obj, &["title", "name", "opportunity_title"]);
    if title.is_empty() {
        return Err(DirectoryError::InvalidRecord("missing title".into()));
    }

    Ok(GrantRecord {
        title,
        funder: first_string(obj, &["funder", "agency", "agency_name"]),
        amount: first_amount(obj, &["amount", "award_ceiling", "award_amount"]),
        deadline: first_string(obj, &["deadline", "close_date", "due_date"]),
        description: first_string(obj, &["description", "synopsis", "summary"]),
        url: first_string(obj, &["url", "link"]),
        eligibility: first_list(obj, &["eligibility", "eligible_applicants"]),
        requirements: first_list(obj, &["requirements"]),
        focus_areas: first_list(obj, &["focus_areas", "focusAreas", "categories", "category"]),
        geography: first_list(obj, &["geography", "locations", "location"]),
        source: GrantSource::Api,
    })
}

fn first_value<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> String {
    match first_value(obj, keys) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn first_amount(obj: &Map<String, Value>, keys: &[&str]) -> u64 {
    match first_value(obj, keys) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) if s.contains('$') => extract_amount(s),
        Some(Value::String(s)) => s
            .trim()
            .replace(',', "")
            .split('.')
            .next()
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0),
        _ => 0,
    }
}

fn first_list(obj: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    let entries: Vec<String> = match first_value(obj, keys) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(|item| item.trim().to_string())
            .collect(),
        Some(Value::String(s)) => s.split(',').map(|part| part.trim().to_string()).collect(),
        _ => Vec::new(),
    };

    entries.into_iter().filter(|entry| !entry.is_empty()).collect()
}
