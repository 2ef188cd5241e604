//! Azure Blob Storage client.
//!
//! Downloads blobs with a managed identity bearer token and turns storage
//! service failures into [`ProxyError::Storage`].

use std::time::Duration;

use axum::body::Body;
use quick_xml::de::from_str;
use serde::Deserialize;

use super::credential::ManagedIdentityCredential;
use super::{BlobDownload, BlobSource, ProxyError};

/// Storage REST API version sent with every request.
pub const STORAGE_API_VERSION: &str = "2021-08-06";

/// Error body the storage service sends on failure.
#[derive(Debug, Deserialize)]
struct StorageErrorBody {
    #[serde(rename = "Code")]
    code: Option<String>,
    #[serde(rename = "Message")]
    message: Option<String>,
}

/// Blob reader for one container.
#[derive(Clone)]
pub struct AzureBlobClient {
    http: reqwest::Client,
    credential: ManagedIdentityCredential,
    account: String,
    container: String,
}

impl AzureBlobClient {
    pub fn new(
        http: reqwest::Client,
        credential: ManagedIdentityCredential,
        account: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            http,
            credential,
            account: account.into(),
            container: container.into(),
        }
    }

    /// Client for `account`/`container` using the host's managed identity.
    pub fn from_env(account: &str, container: &str) -> Result<Self, ProxyError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ProxyError::Http(e.to_string()))?;
        let credential = ManagedIdentityCredential::from_env(http.clone());
        tracing::debug!("Using identity source {:?}", credential.source());
        Ok(Self::new(http, credential, account, container))
    }

    /// URL of a blob in the configured container.
    pub fn blob_url(&self, name: &str) -> String {
        format!(
            "https://{}.blob.core.windows.net/{}/{}",
            self.account,
            self.container,
            encode_blob_name(name)
        )
    }
}

impl BlobSource for AzureBlobClient {
    async fn fetch(&self, name: &str) -> Result<BlobDownload, ProxyError> {
        let token = self.credential.token().await?;

        let response = self
            .http
            .get(self.blob_url(name))
            .bearer_auth(token)
            .header("x-ms-version", STORAGE_API_VERSION)
            .send()
            .await
            .map_err(|e| ProxyError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let header_code = response
                .headers()
                .get("x-ms-error-code")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await.unwrap_or_default();
            return Err(storage_error(status.as_u16(), header_code, &body));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(BlobDownload {
            content_type,
            body: Body::from_stream(response.bytes_stream()),
        })
    }
}

/// Build the error for a failed storage call.
///
/// The header code wins over the one in the XML body.
fn storage_error(status: u16, header_code: Option<String>, body: &str) -> ProxyError {
    let parsed: Option<StorageErrorBody> = from_str(body.trim_start_matches('\u{feff}')).ok();
    let (body_code, body_message) = match parsed {
        Some(parsed) => (parsed.code, parsed.message),
        None => (None, None),
    };

    let message = body_message
        .map(|m| m.lines().next().unwrap_or_default().trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Storage request failed with status {}", status));

    ProxyError::Storage {
        status,
        code: header_code.or(body_code),
        message,
    }
}

/// Percent-encode a blob name for the URL path, keeping `/` separators.
fn encode_blob_name(name: &str) -> String {
    let mut encoded = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
