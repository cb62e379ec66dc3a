//! postcodes.io API client
//!
//! This module provides the HTTP client for the public postcodes.io service
//! and the `PostcodeApi` trait through which the lookup layer consumes its
//! two remote operations.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Base URL for the postcodes.io API
const POSTCODES_IO_BASE_URL: &str = "https://api.postcodes.io";

/// Ceiling on any single request, so a hung service cannot block the CLI
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when talking to the postcode service
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP request could not be completed
    #[error("request to postcode service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("postcode service returned status {status}")]
    Status { status: u16 },

    /// The service authoritatively reported zero results
    #[error("no matching postcodes found")]
    NoMatches,

    /// The response body could not be parsed
    #[error("failed to parse postcode service response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The remote operations consumed by the lookup layer
///
/// Abstracting them behind a trait lets tests substitute a counting fake
/// for the HTTP client.
#[allow(async_fn_in_trait)]
pub trait PostcodeApi {
    /// Asks the service whether `postcode` is a valid postcode
    async fn validate(&self, postcode: &str) -> Result<bool, ApiError>;

    /// Asks the service for postcodes starting with `prefix`
    ///
    /// Returns `ApiError::NoMatches` when the service explicitly reports
    /// zero results, which is distinct from a transport failure.
    async fn autocomplete(&self, prefix: &str) -> Result<Vec<String>, ApiError>;
}

/// Details returned by the service for a single postcode
///
/// Only the commonly used subset of fields; everything but the postcode
/// itself is optional in the service's responses.
#[derive(Debug, Clone, Deserialize)]
pub struct PostcodeInfo {
    /// The canonical postcode
    pub postcode: String,
    /// Country the postcode lies in
    pub country: Option<String>,
    /// Region the postcode lies in
    pub region: Option<String>,
    /// Administrative district
    pub admin_district: Option<String>,
    /// Longitude of the postcode centroid
    pub longitude: Option<f64>,
    /// Latitude of the postcode centroid
    pub latitude: Option<f64>,
}

/// One entry of a bulk lookup response, pairing a query with its result
#[derive(Debug, Clone, Deserialize)]
pub struct BulkLookupResult {
    /// The postcode as submitted
    pub query: String,
    /// Details for the postcode, or `None` if the service did not know it
    pub result: Option<PostcodeInfo>,
}

/// Body of the bulk lookup POST request
#[derive(Debug, Serialize)]
struct BulkLookupRequest<'a> {
    postcodes: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    result: bool,
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    result: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    result: Option<Vec<PostcodeInfo>>,
}

#[derive(Debug, Deserialize)]
struct BulkLookupResponse {
    result: Option<Vec<BulkLookupResult>>,
}

fn parse_validate(body: &str) -> Result<bool, ApiError> {
    let response: ValidateResponse = serde_json::from_str(body)?;
    Ok(response.result)
}

fn parse_autocomplete(body: &str) -> Result<Vec<String>, ApiError> {
    let response: AutocompleteResponse = serde_json::from_str(body)?;
    // A null result is the service's authoritative "no matches" answer.
    response.result.ok_or(ApiError::NoMatches)
}

fn parse_reverse_geocode(body: &str) -> Result<Vec<PostcodeInfo>, ApiError> {
    let response: ReverseGeocodeResponse = serde_json::from_str(body)?;
    response.result.ok_or(ApiError::NoMatches)
}

fn parse_bulk_lookup(body: &str) -> Result<Vec<BulkLookupResult>, ApiError> {
    let response: BulkLookupResponse = serde_json::from_str(body)?;
    response.result.ok_or(ApiError::NoMatches)
}

/// Client for the postcodes.io API
#[derive(Debug, Clone)]
pub struct PostcodeClient {
    http: Client,
    base_url: String,
}

impl PostcodeClient {
    /// Creates a client against the public postcodes.io service
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(POSTCODES_IO_BASE_URL)
    }

    /// Creates a client pointed at a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Issues a GET and returns the body of a successful response
    async fn get_success(&self, url: &str) -> Result<String, ApiError> {
        debug!(%url, "requesting postcode service");
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    /// Looks up the postcodes nearest to a longitude/latitude pair
    ///
    /// Returns `ApiError::NoMatches` if no postcode covers the location.
    pub async fn reverse_geocode(
        &self,
        lon: f64,
        lat: f64,
    ) -> Result<Vec<PostcodeInfo>, ApiError> {
        let url = format!("{}/postcodes?lon={}&lat={}", self.base_url, lon, lat);
        let body = self.get_success(&url).await?;
        parse_reverse_geocode(&body)
    }

    /// Looks up details for several postcodes in a single request
    pub async fn bulk_lookup(
        &self,
        postcodes: &[String],
    ) -> Result<Vec<BulkLookupResult>, ApiError> {
        let url = format!("{}/postcodes", self.base_url);
        debug!(%url, count = postcodes.len(), "bulk postcode lookup");

        let response = self
            .http
            .post(&url)
            .json(&BulkLookupRequest { postcodes })
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_bulk_lookup(&body)
    }
}

impl PostcodeApi for PostcodeClient {
    async fn validate(&self, postcode: &str) -> Result<bool, ApiError> {
        let url = format!("{}/postcodes/{}/validate", self.base_url, postcode);
        let body = self.get_success(&url).await?;
        parse_validate(&body)
    }

    async fn autocomplete(&self, prefix: &str) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/postcodes/{}/autocomplete", self.base_url, prefix);
        let body = self.get_success(&url).await?;
        parse_autocomplete(&body)
    }
}
