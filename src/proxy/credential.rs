//! Managed identity token acquisition.
//!
//! Uses the App Service identity endpoint when the host exposes one and the
//! instance metadata service otherwise. Tokens are cached until shortly
//! before they expire.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::ProxyError;

/// OAuth resource for blob storage.
pub const STORAGE_RESOURCE: &str = "https://storage.azure.com/";

const IMDS_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";
const IMDS_API_VERSION: &str = "2018-02-01";
const APP_SERVICE_API_VERSION: &str = "2019-08-01";

/// Refresh this long before the reported expiry.
const REFRESH_MARGIN_SECS: i64 = 300;

/// Where tokens come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitySource {
    AppService { endpoint: String, header: String },
    Imds,
}

impl IdentitySource {
    /// Detect the source from the process environment.
    pub fn from_env() -> Self {
        match (
            std::env::var("IDENTITY_ENDPOINT"),
            std::env::var("IDENTITY_HEADER"),
        ) {
            (Ok(endpoint), Ok(header)) if !endpoint.is_empty() => {
                IdentitySource::AppService { endpoint, header }
            }
            _ => IdentitySource::Imds,
        }
    }
}

/// Bearer token with its expiry.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_on: DateTime<Utc>,
}

impl AccessToken {
    /// Whether the token is still good at `now`, leaving a refresh margin.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_on - chrono::Duration::seconds(REFRESH_MARGIN_SECS) > now
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_on: ExpiresOn,
}

/// Both endpoints send epoch seconds, as a string or a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExpiresOn {
    Number(i64),
    Text(String),
}

impl ExpiresOn {
    fn to_datetime(&self) -> Result<DateTime<Utc>, ProxyError> {
        let secs = match self {
            ExpiresOn::Number(n) => *n,
            ExpiresOn::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|e| ProxyError::Credential(format!("bad expires_on {:?}: {}", s, e)))?,
        };
        Utc.timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| ProxyError::Credential(format!("expires_on out of range: {}", secs)))
    }
}

/// Token provider backed by the host's managed identity.
#[derive(Clone)]
pub struct ManagedIdentityCredential {
    http: reqwest::Client,
    source: IdentitySource,
    /// User-assigned identity, if configured
    client_id: Option<String>,
    cached: Arc<RwLock<Option<AccessToken>>>,
}

impl ManagedIdentityCredential {
    pub fn new(http: reqwest::Client, source: IdentitySource) -> Self {
        Self {
            http,
            source,
            client_id: None,
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Credential for the current environment.
    pub fn from_env(http: reqwest::Client) -> Self {
        let mut credential = Self::new(http, IdentitySource::from_env());
        credential.client_id = std::env::var("AZURE_CLIENT_ID").ok().filter(|s| !s.is_empty());
        credential
    }

    pub fn source(&self) -> &IdentitySource {
        &self.source
    }

    /// A bearer token for blob storage, from cache when still fresh.
    pub async fn token(&self) -> Result<String, ProxyError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
                return Ok(token.token.clone());
            }
        }

        let fresh = self.request_token().await?;
        let value = fresh.token.clone();
        tracing::debug!("Acquired storage token, expires {}", fresh.expires_on);
        *self.cached.write().await = Some(fresh);
        Ok(value)
    }

    async fn request_token(&self) -> Result<AccessToken, ProxyError> {
        let mut request = match &self.source {
            IdentitySource::AppService { endpoint, header } => self
                .http
                .get(endpoint)
                .header("X-IDENTITY-HEADER", header)
                .query(&[
                    ("api-version", APP_SERVICE_API_VERSION),
                    ("resource", STORAGE_RESOURCE),
                ]),
            IdentitySource::Imds => self
                .http
                .get(IMDS_ENDPOINT)
                .header("Metadata", "true")
                .query(&[
                    ("api-version", IMDS_API_VERSION),
                    ("resource", STORAGE_RESOURCE),
                ]),
        };
        if let Some(client_id) = &self.client_id {
            request = request.query(&[("client_id", client_id.as_str())]);
        }

        let response = request
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| ProxyError::Credential(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProxyError::Credential(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProxyError::Credential(e.to_string()))?;

        Ok(AccessToken {
            token: parsed.access_token,
            expires_on: parsed.expires_on.to_datetime()?,
        })
    }
}
