//! Image proxy server.
//!
//! Streams images out of a blob storage container over a small REST API and
//! serves the static front-end files.

pub mod azure;
pub mod content_type;
pub mod credential;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::StatusCode;
use axum::Router;
use thiserror::Error;
use tower_http::services::ServeDir;

use crate::storage::config::ProxySettings;

pub use azure::AzureBlobClient;
pub use credential::ManagedIdentityCredential;
pub use routes::router;

/// A blob ready to be streamed to the client.
pub struct BlobDownload {
    /// Content type recorded in the blob's properties
    pub content_type: Option<String>,
    pub body: Body,
}

/// Source of blobs, by name.
pub trait BlobSource: Send + Sync + 'static {
    fn fetch(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<BlobDownload, ProxyError>> + Send;
}

/// Shared handler state.
pub struct ProxyState<B> {
    pub blobs: Arc<B>,
    pub settings: Arc<ProxySettings>,
}

impl<B> Clone for ProxyState<B> {
    fn clone(&self) -> Self {
        Self {
            blobs: Arc::clone(&self.blobs),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<B: BlobSource> ProxyState<B> {
    pub fn new(blobs: B, settings: ProxySettings) -> Self {
        Self {
            blobs: Arc::new(blobs),
            settings: Arc::new(settings),
        }
    }
}

/// Proxy errors.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("{message}")]
    Storage {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl ProxyError {
    /// Status returned to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Storage { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code, when the storage service reported one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ProxyError::Storage { code, .. } => code.as_deref(),
            ProxyError::Credential(_) => Some("CredentialUnavailable"),
            _ => None,
        }
    }
}

/// API routes plus the static front-end, when its directory exists.
pub fn app<B: BlobSource>(state: ProxyState<B>) -> Router {
    let static_dir = state.settings.static_dir.clone();
    let app = router(state);

    if static_dir.exists() {
        tracing::info!(static_dir = %static_dir.display(), "serving static files");
        app.fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
    } else {
        tracing::info!(static_dir = %static_dir.display(), "static directory not found, API-only mode");
        app
    }
}

/// Bind and serve until the process exits.
pub async fn serve<B: BlobSource>(settings: ProxySettings, blobs: B) -> Result<(), ProxyError> {
    let addr: SocketAddr = format!("{}:{}", settings.bind, settings.port)
        .parse()
        .map_err(|e| ProxyError::Server(format!("invalid bind address: {}", e)))?;

    let account = settings.storage_account.clone();
    let app = app(ProxyState::new(blobs, settings));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ProxyError::Server(e.to_string()))?;

    tracing::info!(addr = %addr, "Server running");
    tracing::info!("Managed Identity enabled for {}", account);

    axum::serve(listener, app)
        .await
        .map_err(|e| ProxyError::Server(e.to_string()))
}
