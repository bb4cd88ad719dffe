//! HTTP handlers for the admin console data plane.
//!
//! Implements:
//! - GET /health, GET /api/status - liveness and session state
//! - GET/PUT /api/content, POST /api/content/reset, POST /api/content/reload
//! - POST /api/sections, GET /api/sections/kinds, PUT /api/sections/order
//! - PUT/DELETE /api/sections/{id}, POST /api/sections/{id}/reset
//!
//! Every write route is refused with RELOAD_REQUIRED while the session is
//! latched on a version conflict; POST /api/content/reload is the way out.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

use sitedoc_store_core::{
    display_name, known_kinds, ClientStatus, ContentClient, ContentDocument, SectionKind,
};

use crate::error::{ApiError, Result};

/// Application state shared across handlers. The lock serializes writes for
/// this process; cross-process races are the store's compare-and-swap's job.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<RwLock<ContentClient>>,
}

impl AppState {
    pub fn new(client: ContentClient) -> Self {
        Self {
            client: Arc::new(RwLock::new(client)),
        }
    }
}

/// Build the admin API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/status", get(status_handler))
        .route(
            "/api/content",
            get(get_content_handler).put(put_content_handler),
        )
        .route("/api/content/reset", post(reset_content_handler))
        .route("/api/content/reload", post(reload_handler))
        .route("/api/sections", post(add_section_handler))
        .route("/api/sections/kinds", get(section_kinds_handler))
        .route("/api/sections/order", put(reorder_handler))
        .route(
            "/api/sections/{id}",
            put(replace_section_handler).delete(remove_section_handler),
        )
        .route("/api/sections/{id}/reset", post(reset_section_handler))
        .with_state(state)
}

// =============================================================================
// Request/response types
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: &'static str,
    pub store: &'static str,
}

/// Everything the console needs to render the editor.
#[derive(Serialize)]
pub struct ContentResponse {
    pub content: ContentDocument,
    pub status: ClientStatus,
}

#[derive(Deserialize)]
pub struct AddSectionRequest {
    pub kind: SectionKind,
}

#[derive(Serialize)]
pub struct AddSectionResponse {
    pub id: String,
    pub content: ContentDocument,
    pub status: ClientStatus,
}

#[derive(Deserialize)]
pub struct ReorderRequest {
    pub order: Vec<String>,
}

/// Catalog entry for the "add section" picker.
#[derive(Serialize)]
pub struct KindInfo {
    pub kind: SectionKind,
    pub name: String,
}

fn content_response(client: &ContentClient) -> ContentResponse {
    ContentResponse {
        content: client.document().clone(),
        status: client.status(),
    }
}

/// Writes are refused while the session is latched on a conflict.
fn ensure_not_latched(client: &ContentClient) -> Result<()> {
    if client.is_conflicted() {
        return Err(ApiError::ReloadRequired);
    }
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /health - Health check endpoint.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let client = state.client.read().await;
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
        store: client.status().store,
    })
}

/// GET /api/status - Capability, degradation warning, and conflict flag.
pub async fn status_handler(State(state): State<AppState>) -> Json<ClientStatus> {
    Json(state.client.read().await.status())
}

/// GET /api/content - The working document plus session state.
pub async fn get_content_handler(State(state): State<AppState>) -> Json<ContentResponse> {
    let client = state.client.read().await;
    Json(content_response(&client))
}

/// PUT /api/content - Replace the whole document.
pub async fn put_content_handler(
    State(state): State<AppState>,
    Json(content): Json<ContentDocument>,
) -> Result<Json<ContentResponse>> {
    let mut client = state.client.write().await;
    ensure_not_latched(&client)?;
    client.replace_document(content).await?;
    Ok(Json(content_response(&client)))
}

/// POST /api/content/reset - Back to the built-in default document.
pub async fn reset_content_handler(
    State(state): State<AppState>,
) -> Result<Json<ContentResponse>> {
    let mut client = state.client.write().await;
    ensure_not_latched(&client)?;
    client.reset_document().await?;
    info!("Content reset to defaults");
    Ok(Json(content_response(&client)))
}

/// POST /api/content/reload - Drop session state and load fresh. Clears the
/// conflict latch.
pub async fn reload_handler(State(state): State<AppState>) -> Result<Json<ContentResponse>> {
    let mut client = state.client.write().await;
    client
        .reload()
        .await
        .map_err(|e| ApiError::ReloadFailed(e.to_string()))?;
    info!("Session reloaded from {} store", client.status().store);
    Ok(Json(content_response(&client)))
}

/// POST /api/sections - Add a section of the given kind with its default
/// payload. Returns the id it was assigned.
pub async fn add_section_handler(
    State(state): State<AppState>,
    Json(request): Json<AddSectionRequest>,
) -> Result<Json<AddSectionResponse>> {
    let mut client = state.client.write().await;
    ensure_not_latched(&client)?;
    let id = client.add_section(request.kind).await?;
    Ok(Json(AddSectionResponse {
        id,
        content: client.document().clone(),
        status: client.status(),
    }))
}

/// GET /api/sections/kinds - The catalog for the "add section" picker.
pub async fn section_kinds_handler() -> Json<Vec<KindInfo>> {
    Json(
        known_kinds()
            .iter()
            .map(|kind| KindInfo {
                kind: kind.clone(),
                name: display_name(kind),
            })
            .collect(),
    )
}

/// PUT /api/sections/order - Reorder sections. The body must list every
/// current section id exactly once.
pub async fn reorder_handler(
    State(state): State<AppState>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<ContentResponse>> {
    let mut client = state.client.write().await;
    ensure_not_latched(&client)?;
    client.reorder_sections(&request.order).await?;
    Ok(Json(content_response(&client)))
}

/// PUT /api/sections/{id} - Replace one section's payload.
pub async fn replace_section_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(content): Json<Value>,
) -> Result<Json<ContentResponse>> {
    let mut client = state.client.write().await;
    ensure_not_latched(&client)?;
    client.replace_section(&id, content).await?;
    Ok(Json(content_response(&client)))
}

/// DELETE /api/sections/{id} - Remove a section.
pub async fn remove_section_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContentResponse>> {
    let mut client = state.client.write().await;
    ensure_not_latched(&client)?;
    client.remove_section(&id).await?;
    Ok(Json(content_response(&client)))
}

/// POST /api/sections/{id}/reset - Put a section back to its kind's default.
pub async fn reset_section_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContentResponse>> {
    let mut client = state.client.write().await;
    ensure_not_latched(&client)?;
    client.reset_section(&id).await?;
    Ok(Json(content_response(&client)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::json;
    use sitedoc_store_memory::MemoryStore;
    use tower::ServiceExt;

    async fn setup() -> (Arc<MemoryStore>, Router) {
        let store = Arc::new(MemoryStore::new());
        let client = ContentClient::connect(store.clone()).await.unwrap();
        (store, router(AppState::new(client)))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (_store, app) = setup().await;
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["healthy"], json!(true));
        assert_eq!(body["store"], json!("memory"));
    }

    #[tokio::test]
    async fn test_get_content() {
        let (_store, app) = setup().await;
        let response = app.oneshot(get("/api/content")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["content"]["header"]["siteName"], json!("Ari Deville Fitness"));
        assert_eq!(body["status"]["capability"], json!("versioned"));
        assert_eq!(body["status"]["conflicted"], json!(false));
        assert!(body["status"]["version"].is_string());
    }

    #[tokio::test]
    async fn test_put_content_persists() {
        let (store, app) = setup().await;

        let response = app.clone().oneshot(get("/api/content")).await.unwrap();
        let mut body = body_json(response).await;
        body["content"]["header"]["siteName"] = json!("Renamed Gym");

        let response = app
            .oneshot(json_request("PUT", "/api/content", body["content"].clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(store.content().unwrap().header.site_name, "Renamed Gym");
    }

    #[tokio::test]
    async fn test_section_lifecycle() {
        let (store, app) = setup().await;

        // Add a video section from the catalog.
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/sections", json!({ "kind": "video" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let id = body["id"].as_str().unwrap().to_string();
        assert!(id.starts_with("video-"));

        // Edit its payload.
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/sections/{id}"),
                json!({ "headline": "Watch", "videoId": "abc123" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            store.content().unwrap().section(&id).unwrap().content["videoId"],
            json!("abc123")
        );

        // Reset it back to the catalog default.
        let response = app
            .clone()
            .oneshot(empty_request("POST", &format!("/api/sections/{id}/reset")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            store.content().unwrap().section(&id).unwrap().content["videoId"],
            json!("g_tea8ZN-ZE")
        );

        // Remove it.
        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &format!("/api/sections/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!store.content().unwrap().has_section(&id));
    }

    #[tokio::test]
    async fn test_unknown_kind_is_unprocessable() {
        let (_store, app) = setup().await;
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/sections",
                json!({ "kind": "blogRoll" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["code"], json!("UNKNOWN_SECTION_KIND"));
    }

    #[tokio::test]
    async fn test_unknown_section_is_not_found() {
        let (_store, app) = setup().await;
        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/sections/no-such-id",
                json!({ "headline": "x" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], json!("SECTION_NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_reorder_validation_and_success() {
        let (store, app) = setup().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/sections/order",
                json!({ "order": ["hero", "about"] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["code"], json!("INVALID_SECTION_ORDER"));

        let mut order: Vec<String> = store
            .content()
            .unwrap()
            .section_ids()
            .iter()
            .map(|s| s.to_string())
            .collect();
        order.reverse();
        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/sections/order",
                json!({ "order": order }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            store.content().unwrap().section_ids(),
            order.iter().map(|s| s.as_str()).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_conflict_latch_gates_writes_until_reload() {
        let (store, app) = setup().await;

        // Another session wins a save behind this process's back.
        let mut other = ContentClient::connect(store.clone()).await.unwrap();
        other
            .replace_section("hero", json!({ "headline1": "From other" }))
            .await
            .unwrap();

        // First write loses the race: VERSION_CONFLICT.
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/sections/hero",
                json!({ "headline1": "From api" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["code"], json!("VERSION_CONFLICT"));

        // Every further write is refused up front: RELOAD_REQUIRED.
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/sections/about",
                json!({ "headline1": "Still latched" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["code"], json!("RELOAD_REQUIRED"));

        // Reads still work while latched, and report the flag.
        let response = app.clone().oneshot(get("/api/status")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["conflicted"], json!(true));

        // Reload clears the latch and adopts the other session's content.
        let response = app
            .clone()
            .oneshot(empty_request("POST", "/api/content/reload"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"]["conflicted"], json!(false));
        assert_eq!(
            body["content"]["sections"][0]["content"]["headline1"],
            json!("From other")
        );

        // And the retried edit now goes through.
        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/sections/hero",
                json!({ "headline1": "From api" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            store.content().unwrap().section("hero").unwrap().content["headline1"],
            json!("From api")
        );
    }

    #[tokio::test]
    async fn test_store_outage_maps_to_bad_gateway() {
        let (store, app) = setup().await;
        store.set_offline(true);

        // A write against the dead store: STORE_ERROR, no latch.
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/sections/hero",
                json!({ "headline1": "Lost" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["code"], json!("STORE_ERROR"));

        // Reload fails too, with its own code.
        let response = app
            .clone()
            .oneshot(empty_request("POST", "/api/content/reload"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["code"], json!("RELOAD_FAILED"));

        // Once the store is back, the same requests succeed.
        store.set_offline(false);
        let response = app
            .clone()
            .oneshot(empty_request("POST", "/api/content/reload"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/sections/hero",
                json!({ "headline1": "Recovered" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            store.content().unwrap().section("hero").unwrap().content["headline1"],
            json!("Recovered")
        );
    }

    #[tokio::test]
    async fn test_reset_content() {
        let (store, app) = setup().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/sections/hero",
                json!({ "headline1": "Edited" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(empty_request("POST", "/api/content/reset"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            store.content().unwrap(),
            sitedoc_store_core::default_document()
        );
    }

    #[tokio::test]
    async fn test_kind_catalog() {
        let (_store, app) = setup().await;
        let response = app.oneshot(get("/api/sections/kinds")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let kinds = body.as_array().unwrap();
        assert_eq!(kinds.len(), 9);
        assert!(kinds.contains(&json!({
            "kind": "writeSuccessStory",
            "name": "Write Success Story Section"
        })));
    }
}
