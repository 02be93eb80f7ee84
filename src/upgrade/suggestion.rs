//! Remote version suggestion service

#[cfg(test)]
use mockall::automock;

use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::USER_AGENT;
use crate::error::SuggestionError;

/// Code the service returns when it knows a version for the package
pub const MATCH_FOUND: &str = "match-found";

/// Outcome code attached to a suggestion
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SuggestionCode {
    MatchFound,
    /// Any other code, kept verbatim
    Other(String),
}

impl From<String> for SuggestionCode {
    fn from(code: String) -> Self {
        if code == MATCH_FOUND {
            Self::MatchFound
        } else {
            Self::Other(code)
        }
    }
}

/// One suggestion returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SuggestionRecord {
    pub package: String,
    /// Absent or null when the service has no match for the package
    #[serde(default)]
    pub version: Option<String>,
    pub code: SuggestionCode,
}

/// The service answers a single-package query with a bare object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SuggestionResponse {
    Many(Vec<SuggestionRecord>),
    One(SuggestionRecord),
}

/// Normalize a response body into a list of records
///
/// A bare object is only accepted when exactly one package was queried.
pub fn parse_suggestions(
    body: &str,
    queried: usize,
) -> Result<Vec<SuggestionRecord>, SuggestionError> {
    let response: SuggestionResponse = serde_json::from_str(body).map_err(|e| {
        warn!("Failed to parse suggestion response: {}", e);
        SuggestionError::InvalidResponse(e.to_string())
    })?;

    match response {
        SuggestionResponse::Many(records) => Ok(records),
        SuggestionResponse::One(record) if queried == 1 => Ok(vec![record]),
        SuggestionResponse::One(_) => Err(SuggestionError::InvalidResponse(format!(
            "single object returned for {} packages",
            queried
        ))),
    }
}

/// Trait for querying version suggestions
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait SuggestionService: Send + Sync {
    /// Ask which versions of `packages` are suitable for `host_version`
    ///
    /// # Returns
    /// * `Ok(Vec<SuggestionRecord>)` - Records in the order the service returned them
    /// * `Err(SuggestionError)` - On any transport, status or format failure
    async fn suggest(
        &self,
        host_version: &str,
        packages: &[String],
    ) -> Result<Vec<SuggestionRecord>, SuggestionError>;
}

/// HTTP client for the suggestion endpoint
///
/// Sends one `GET <endpoint>?version=<host>&package=<name>...` per check.
pub struct HttpSuggestionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSuggestionClient {
    pub fn new(endpoint: &str) -> Result<Self, SuggestionError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Build the query URL with the host version and one `package` pair per name
    pub fn query_url(
        &self,
        host_version: &str,
        packages: &[String],
    ) -> Result<Url, SuggestionError> {
        let params = std::iter::once(("version", host_version))
            .chain(packages.iter().map(|name| ("package", name.as_str())));

        Url::parse_with_params(&self.endpoint, params).map_err(|e| {
            SuggestionError::InvalidEndpoint {
                url: self.endpoint.clone(),
                reason: e.to_string(),
            }
        })
    }
}

#[async_trait::async_trait]
impl SuggestionService for HttpSuggestionClient {
    async fn suggest(
        &self,
        host_version: &str,
        packages: &[String],
    ) -> Result<Vec<SuggestionRecord>, SuggestionError> {
        let url = self.query_url(host_version, packages)?;
        debug!("Querying suggestions for {} packages", packages.len());

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Suggestion service returned status {}: {}", status, url);
            return Err(SuggestionError::Status(status));
        }

        let body = response.text().await?;
        parse_suggestions(&body, packages.len())
    }
}
