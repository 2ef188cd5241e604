//! HTTP route handlers for the proxy API.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use super::content_type::resolve_content_type;
use super::{BlobSource, ProxyError, ProxyState};

/// Build the router with `/api` routes and state applied.
pub fn router<B: BlobSource>(state: ProxyState<B>) -> Router {
    let api = Router::new()
        .route("/image/{name}", get(get_image::<B>))
        .route("/health", get(health::<B>));

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

    Router::new()
        .nest("/api", api)
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: Option<String>,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
            code: self.code().map(str::to_string),
        };
        (status, Json(body)).into_response()
    }
}

/// GET /api/image/{name} - stream a blob from the container.
pub(crate) async fn get_image<B: BlobSource>(
    State(state): State<ProxyState<B>>,
    Path(name): Path<String>,
) -> Response {
    tracing::info!("Fetching image: {}", name);

    match state.blobs.fetch(&name).await {
        Ok(download) => {
            let content_type = resolve_content_type(&name, download.content_type.as_deref());
            let cache_control = format!("public, max-age={}", state.settings.cache_max_age_secs);
            tracing::info!("Streaming {} as {}", name, content_type);

            (
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CACHE_CONTROL, cache_control),
                ],
                download.body,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch {}: {} (code: {:?})", name, e, e.code());
            e.into_response()
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HealthBody {
    status: &'static str,
    storage_account: String,
    container: String,
    managed_identity: &'static str,
}

/// GET /api/health
pub(crate) async fn health<B: BlobSource>(State(state): State<ProxyState<B>>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "OK",
        storage_account: state.settings.storage_account.clone(),
        container: state.settings.container.clone(),
        managed_identity: "enabled",
    })
}
