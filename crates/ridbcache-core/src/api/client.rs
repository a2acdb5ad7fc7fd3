//! HTTP client for the RIDB REST API.
//!
//! `RidbClient` implements [`RemoteCatalog`] on top of reqwest. It builds
//! request URLs, injects the API key header, maps non-success statuses to
//! `ApiError`, and decodes RIDB's JSON payloads into model records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde::Deserialize;
use tracing::debug;

use super::{ApiError, CampsitePage, RemoteCatalog};
use crate::config::Config;
use crate::models::{null_as_default, CampsiteRecord, FacilityRecord};

// ============================================================================
// Constants
// ============================================================================

/// Base URL of the public RIDB API
pub const DEFAULT_BASE_URL: &str = "https://ridb.recreation.gov/api/v1";

/// Header RIDB reads the API key from
const API_KEY_HEADER: &str = "apikey";

/// RIDB client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct RidbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RidbClient {
    /// Create a client against `base_url`, failing any request that takes
    /// longer than `timeout`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?;
        Ok(Self::new(
            &config.base_url,
            api_key,
            config.request_timeout(),
        )?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let mut key =
            header::HeaderValue::from_str(&self.api_key).map_err(|_| ApiError::InvalidApiKey)?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        Ok(headers)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    fn facility_url(&self, facility_id: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&format!("facilities/{}", facility_id))?;
        url.query_pairs_mut().append_pair("full", "true");
        Ok(url)
    }

    fn campsite_page_url(
        &self,
        facility_id: &str,
        offset: usize,
        limit: usize,
        query: Option<&str>,
    ) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&format!("facilities/{}/campsites", facility_id))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("offset", &offset.to_string())
                .append_pair("limit", &limit.to_string());
            if let Some(query) = query.filter(|q| !q.is_empty()) {
                pairs.append_pair("query", query);
            }
        }
        Ok(url)
    }

    fn campsite_url(&self, campsite_id: &str, query: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&format!("campsites/{}", campsite_id))?;
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.query_pairs_mut().append_pair("query", query);
        }
        Ok(url)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get_text(&self, url: Url) -> Result<String, ApiError> {
        debug!(url = %url, "RIDB request");

        let response = self
            .client
            .get(url)
            .headers(self.auth_headers()?)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl RemoteCatalog for RidbClient {
    async fn fetch_facility(&self, facility_id: &str) -> Result<FacilityRecord, ApiError> {
        let text = self.get_text(self.facility_url(facility_id)?).await?;
        parse_facility(facility_id, &text)
    }

    async fn fetch_campsite_page(
        &self,
        facility_id: &str,
        offset: usize,
        limit: usize,
        query: Option<&str>,
    ) -> Result<CampsitePage, ApiError> {
        let url = self.campsite_page_url(facility_id, offset, limit, query)?;
        let text = self.get_text(url).await?;
        parse_campsite_page(&text)
    }

    async fn fetch_campsite(
        &self,
        campsite_id: &str,
        query: Option<&str>,
    ) -> Result<CampsiteRecord, ApiError> {
        let text = self.get_text(self.campsite_url(campsite_id, query)?).await?;
        parse_campsite(campsite_id, &text)
    }
}

// ============================================================================
// Response parsing
// ============================================================================

fn parse_facility(facility_id: &str, text: &str) -> Result<FacilityRecord, ApiError> {
    let record: FacilityRecord =
        serde_json::from_str(text).map_err(|e| ApiError::decode("facility", e))?;

    // Unknown ids come back as `{}` with a 200
    if record.id.is_empty() {
        return Err(ApiError::NotFound(format!("facility {}", facility_id)));
    }
    Ok(record)
}

fn parse_campsite(campsite_id: &str, text: &str) -> Result<CampsiteRecord, ApiError> {
    // The campsite endpoint usually wraps the record in a one-element array
    if let Ok(mut records) = serde_json::from_str::<Vec<CampsiteRecord>>(text) {
        if records.is_empty() {
            return Err(ApiError::NotFound(format!("campsite {}", campsite_id)));
        }
        return Ok(records.swap_remove(0));
    }

    let record: CampsiteRecord =
        serde_json::from_str(text).map_err(|e| ApiError::decode("campsite", e))?;
    if record.id.is_empty() {
        return Err(ApiError::NotFound(format!("campsite {}", campsite_id)));
    }
    Ok(record)
}

fn parse_campsite_page(text: &str) -> Result<CampsitePage, ApiError> {
    let response: CampsitesResponse =
        serde_json::from_str(text).map_err(|e| ApiError::decode("campsite page", e))?;

    if let Some(ref params) = response.metadata.search_parameters {
        debug!(
            offset = ?params.offset,
            limit = ?params.limit,
            query = ?params.query,
            total = response.metadata.results.total_count,
            "Campsite page received"
        );
    }

    Ok(CampsitePage {
        total_count: response.metadata.results.total_count,
        current_count: response.metadata.results.current_count,
        items: response.recdata,
    })
}

// Internal API response types for parsing

#[derive(Debug, Deserialize)]
struct CampsitesResponse {
    #[serde(rename = "METADATA")]
    metadata: Metadata,
    #[serde(rename = "RECDATA", default, deserialize_with = "null_as_default")]
    recdata: Vec<CampsiteRecord>,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    #[serde(rename = "RESULTS")]
    results: ResultCounts,
    #[serde(rename = "SEARCH_PARAMETERS", default)]
    search_parameters: Option<SearchParameters>,
}

#[derive(Debug, Deserialize)]
struct ResultCounts {
    #[serde(rename = "CURRENT_COUNT", default)]
    current_count: usize,
    #[serde(rename = "TOTAL_COUNT", default)]
    total_count: usize,
}

#[derive(Debug, Deserialize)]
struct SearchParameters {
    #[serde(rename = "LIMIT", default)]
    limit: Option<usize>,
    #[serde(rename = "OFFSET", default)]
    offset: Option<usize>,
    #[serde(rename = "QUERY", default)]
    query: Option<String>,
}
