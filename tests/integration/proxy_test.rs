//! Image proxy over a real socket with an in-memory blob source.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::body::Body;
use mapty::proxy::{self, BlobDownload, BlobSource, ProxyError, ProxyState};
use mapty::storage::ProxySettings;
use tempfile::tempdir;

#[derive(Default)]
struct InMemoryBlobs {
    blobs: HashMap<String, (Option<String>, Vec<u8>)>,
}

impl InMemoryBlobs {
    fn with(mut self, name: &str, content_type: Option<&str>, data: &[u8]) -> Self {
        self.blobs.insert(
            name.to_string(),
            (content_type.map(str::to_string), data.to_vec()),
        );
        self
    }
}

impl BlobSource for InMemoryBlobs {
    async fn fetch(&self, name: &str) -> Result<BlobDownload, ProxyError> {
        if name == "forbidden.png" {
            return Err(ProxyError::Storage {
                status: 403,
                code: Some("AuthorizationPermissionMismatch".to_string()),
                message: "This request is not authorized to perform this operation.".to_string(),
            });
        }
        if name == "offline.png" {
            return Err(ProxyError::Credential("token endpoint unreachable".to_string()));
        }

        let (content_type, data) = self.blobs.get(name).ok_or_else(|| ProxyError::Storage {
            status: 404,
            code: Some("BlobNotFound".to_string()),
            message: "The specified blob does not exist.".to_string(),
        })?;
        Ok(BlobDownload {
            content_type: content_type.clone(),
            body: Body::from(data.clone()),
        })
    }
}

async fn spawn_server(blobs: InMemoryBlobs, static_dir: PathBuf) -> SocketAddr {
    let settings = ProxySettings {
        static_dir,
        cache_max_age_secs: 600,
        ..ProxySettings::default()
    };
    let app = proxy::app(ProxyState::new(blobs, settings));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn sample_blobs() -> InMemoryBlobs {
    InMemoryBlobs::default()
        .with("logo.svg", None, b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>")
        .with("photo.jpg", Some("image/jpeg"), &[0xff, 0xd8, 0xff])
}

#[tokio::test]
async fn test_image_streams_with_cache_headers() {
    let addr = spawn_server(sample_blobs(), PathBuf::from("does-not-exist")).await;

    let response = reqwest::get(format!("http://{}/api/image/photo.jpg", addr))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()["content-type"], "image/jpeg");
    assert_eq!(response.headers()["cache-control"], "public, max-age=600");
    assert_eq!(&response.bytes().await.unwrap()[..], &[0xff, 0xd8, 0xff]);
}

#[tokio::test]
async fn test_image_without_metadata_uses_extension() {
    let addr = spawn_server(sample_blobs(), PathBuf::from("does-not-exist")).await;

    let response = reqwest::get(format!("http://{}/api/image/logo.svg", addr))
        .await
        .unwrap();

    assert_eq!(response.headers()["content-type"], "image/svg+xml");
}

#[tokio::test]
async fn test_storage_errors_are_forwarded_as_json() {
    let addr = spawn_server(sample_blobs(), PathBuf::from("does-not-exist")).await;

    for (name, status, code) in [
        ("missing.png", 404, serde_json::json!("BlobNotFound")),
        ("forbidden.png", 403, serde_json::json!("AuthorizationPermissionMismatch")),
        ("offline.png", 500, serde_json::json!("CredentialUnavailable")),
    ] {
        let response = reqwest::get(format!("http://{}/api/image/{}", addr, name))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), status, "{}", name);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["code"], code, "{}", name);
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }
}

#[tokio::test]
async fn test_health() {
    let addr = spawn_server(sample_blobs(), PathBuf::from("does-not-exist")).await;

    let body: serde_json::Value = reqwest::get(format!("http://{}/api/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body,
        serde_json::json!({
            "status": "OK",
            "storageAccount": "storageaccnt1228545",
            "container": "quill-imgs",
            "managedIdentity": "enabled"
        })
    );
}

#[tokio::test]
async fn test_static_files_are_served_when_present() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Mapty</h1>").unwrap();
    let addr = spawn_server(sample_blobs(), dir.path().to_path_buf()).await;

    let index = reqwest::get(format!("http://{}/", addr)).await.unwrap();
    assert_eq!(index.status().as_u16(), 200);
    assert_eq!(index.text().await.unwrap(), "<h1>Mapty</h1>");

    // API routes still win over the static fallback
    let health = reqwest::get(format!("http://{}/api/health", addr)).await.unwrap();
    assert_eq!(health.status().as_u16(), 200);
}

#[tokio::test]
async fn test_api_only_without_static_dir() {
    let addr = spawn_server(sample_blobs(), PathBuf::from("does-not-exist")).await;

    let response = reqwest::get(format!("http://{}/index.html", addr)).await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}
