use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use sitedoc_store_core::{
    ContentDocument, DocumentRow, DocumentStore, StoreError, VersionToken,
};

use crate::config::PostgrestConfig;

/// Single-object responses instead of one-element arrays.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

// =============================================================================
// Error classification
// =============================================================================

// SQLSTATEs and PostgREST codes this backend recognizes. Everything else that
// parses as a PostgREST error is a plain rejection.
const SQLSTATE_UNDEFINED_COLUMN: &str = "42703";
const SQLSTATE_UNDEFINED_FUNCTION: &str = "42883";
const SQLSTATE_SERIALIZATION_FAILURE: &str = "40001";
const PGRST_NO_SINGLE_ROW: &str = "PGRST116";
const PGRST_FUNCTION_NOT_FOUND: &str = "PGRST202";

/// PostgREST error body: `{"code": "...", "message": "...", ...}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

fn error_code(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body).ok().map(|e| e.code)
}

/// Map a failed response onto the core error taxonomy. Unparseable bodies
/// (gateway pages, truncated reads) count as transport failures.
fn classify_error(status: StatusCode, body: &str) -> StoreError {
    let Ok(err) = serde_json::from_str::<ErrorBody>(body) else {
        return StoreError::Transport(format!("HTTP {status}: {body}"));
    };
    let detail = format!("{}: {}", err.code, err.message);
    match err.code.as_str() {
        SQLSTATE_UNDEFINED_COLUMN => StoreError::UndefinedColumn(detail),
        SQLSTATE_UNDEFINED_FUNCTION | PGRST_FUNCTION_NOT_FOUND => {
            StoreError::UndefinedProcedure(detail)
        }
        SQLSTATE_SERIALIZATION_FAILURE => StoreError::Conflict(detail),
        _ => StoreError::Rejected(detail),
    }
}

// =============================================================================
// Wire types
// =============================================================================

/// Row shape shared by the table reads and the swap RPC. `updated_at` is
/// absent on `select=content` reads and NULL on pre-migration rows.
#[derive(Debug, Deserialize)]
struct ContentRow {
    content: Value,
    #[serde(default)]
    updated_at: Option<String>,
}

fn into_document_row(raw: ContentRow) -> Result<DocumentRow, StoreError> {
    let content = serde_json::from_value(raw.content)
        .map_err(|e| StoreError::Serialization(format!("invalid content document: {e}")))?;
    Ok(DocumentRow {
        content,
        version: raw.updated_at.map(VersionToken::new),
    })
}

// =============================================================================
// Store
// =============================================================================

/// `DocumentStore` over a PostgREST endpoint.
pub struct PostgrestStore {
    http: HttpClient,
    config: PostgrestConfig,
}

impl PostgrestStore {
    pub fn new(config: PostgrestConfig) -> Self {
        Self {
            http: HttpClient::new(),
            config,
        }
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.table
        )
    }

    fn rpc_url(&self) -> String {
        format!(
            "{}/rest/v1/rpc/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.swap_function
        )
    }

    fn row_filter(&self) -> String {
        format!("eq.{}", self.config.row_id)
    }

    /// Auth headers Supabase expects on every request.
    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
    }
}

#[async_trait]
impl DocumentStore for PostgrestStore {
    fn store_name(&self) -> &'static str {
        "postgrest"
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch(&self) -> Result<Option<DocumentRow>, StoreError> {
        let response = self
            .authed(self.http.get(self.table_url()))
            .query(&[
                ("id", self.row_filter().as_str()),
                ("select", "content,updated_at"),
            ])
            .header("Accept", SINGLE_OBJECT)
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("fetch request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if error_code(&text).as_deref() == Some(PGRST_NO_SINGLE_ROW) {
                debug!("No content row yet");
                return Ok(None);
            }
            return Err(classify_error(status, &text));
        }

        let raw: ContentRow = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(format!("unreadable fetch response: {e}")))?;
        let row = into_document_row(raw)?;
        debug!(
            "Fetched content row (token {})",
            row.version.as_ref().map(VersionToken::as_str).unwrap_or("none")
        );
        Ok(Some(row))
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_without_version(&self) -> Result<Option<ContentDocument>, StoreError> {
        let response = self
            .authed(self.http.get(self.table_url()))
            .query(&[("id", self.row_filter().as_str()), ("select", "content")])
            .header("Accept", SINGLE_OBJECT)
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("fetch request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if error_code(&text).as_deref() == Some(PGRST_NO_SINGLE_ROW) {
                return Ok(None);
            }
            return Err(classify_error(status, &text));
        }

        let raw: ContentRow = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(format!("unreadable fetch response: {e}")))?;
        Ok(Some(into_document_row(raw)?.content))
    }

    #[instrument(skip(self, content), level = "debug")]
    async fn seed(&self, content: &ContentDocument) -> Result<(), StoreError> {
        let body = serde_json::json!({ "id": self.config.row_id, "content": content });
        let response = self
            .authed(self.http.post(self.table_url()))
            .header("Prefer", "return=minimal")
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("seed request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_error(status, &text));
        }
        debug!("Seeded content row {}", self.config.row_id);
        Ok(())
    }

    #[instrument(skip(self, content), level = "debug")]
    async fn overwrite(&self, content: &ContentDocument) -> Result<(), StoreError> {
        let body = serde_json::json!({ "content": content });
        let response = self
            .authed(self.http.patch(self.table_url()))
            .query(&[("id", self.row_filter().as_str())])
            .header("Prefer", "return=minimal")
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("overwrite request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_error(status, &text));
        }
        debug!("Overwrote content row {}", self.config.row_id);
        Ok(())
    }

    #[instrument(skip(self, content, expected), level = "debug")]
    async fn compare_and_swap(
        &self,
        content: &ContentDocument,
        expected: Option<&VersionToken>,
    ) -> Result<DocumentRow, StoreError> {
        let body = serde_json::json!({
            "new_content": content,
            "expected_version": expected.map(VersionToken::as_str),
            "row_id": self.config.row_id,
        });
        let response = self
            .authed(self.http.post(self.rpc_url()))
            .header("Accept", SINGLE_OBJECT)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("swap request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_error(status, &text));
        }

        let raw: ContentRow = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(format!("unreadable swap response: {e}")))?;
        let row = into_document_row(raw)?;
        debug!(
            "Swap accepted, new token {}",
            row.version.as_ref().map(VersionToken::as_str).unwrap_or("none")
        );
        Ok(row)
    }
}
