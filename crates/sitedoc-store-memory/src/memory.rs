use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use sitedoc_store_core::{ContentDocument, DocumentRow, DocumentStore, StoreError, VersionToken};

// Logical-clock tokens start here so they read like real timestamps.
const TOKEN_EPOCH: i64 = 1_700_000_000;

#[derive(Debug, Clone, Copy)]
struct Schema {
    version_column: bool,
    swap_procedure: bool,
}

struct StoredRow {
    content: ContentDocument,
    updated_at: Option<VersionToken>,
}

#[derive(Default)]
struct State {
    row: Option<StoredRow>,
    offline: bool,
    writes: u64,
    swap_attempts: u64,
    clock: i64,
}

/// Single-row in-memory store.
///
/// Mirrors the remote store's observable semantics: seeding an existing row
/// is rejected, overwriting a missing row matches nothing and still succeeds,
/// and the swap compares tokens atomically. Tokens are RFC 3339 timestamps
/// driven by a logical clock, so back-to-back writes always get distinct,
/// strictly increasing tokens.
pub struct MemoryStore {
    schema: Schema,
    state: Mutex<State>,
}

impl MemoryStore {
    /// Store with the full schema: version column and swap procedure.
    pub fn new() -> Self {
        Self::with_schema(Schema {
            version_column: true,
            swap_procedure: true,
        })
    }

    /// Store whose table predates the version column (and the procedure).
    pub fn without_version_column() -> Self {
        Self::with_schema(Schema {
            version_column: false,
            swap_procedure: false,
        })
    }

    /// Store with the version column but no swap procedure installed.
    pub fn without_swap_procedure() -> Self {
        Self::with_schema(Schema {
            version_column: true,
            swap_procedure: false,
        })
    }

    fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            state: Mutex::new(State::default()),
        }
    }

    /// Simulate the backend being unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    /// Drop the stored token, as on a row written before the version column
    /// was added to the schema.
    pub fn clear_version(&self) {
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.row.as_mut() {
            row.updated_at = None;
        }
    }

    /// Writes the store has accepted (seed, applied overwrite, won swap).
    pub fn write_count(&self) -> u64 {
        self.state.lock().unwrap().writes
    }

    /// Times the swap procedure was invoked, whether or not it succeeded.
    pub fn swap_attempts(&self) -> u64 {
        self.state.lock().unwrap().swap_attempts
    }

    /// Currently stored document, if any.
    pub fn content(&self) -> Option<ContentDocument> {
        let state = self.state.lock().unwrap();
        state.row.as_ref().map(|row| row.content.clone())
    }

    /// Currently stored token, if any.
    pub fn version(&self) -> Option<VersionToken> {
        let state = self.state.lock().unwrap();
        state.row.as_ref().and_then(|row| row.updated_at.clone())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_online(state: &State) -> Result<(), StoreError> {
    if state.offline {
        return Err(StoreError::Transport("memory store is offline".to_string()));
    }
    Ok(())
}

fn next_token(state: &mut State) -> VersionToken {
    state.clock += 1;
    let at = DateTime::<Utc>::from_timestamp(TOKEN_EPOCH + state.clock, 0).unwrap_or_default();
    VersionToken::new(at.to_rfc3339_opts(SecondsFormat::Micros, true))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn store_name(&self) -> &'static str {
        "memory"
    }

    async fn fetch(&self) -> Result<Option<DocumentRow>, StoreError> {
        let state = self.state.lock().unwrap();
        ensure_online(&state)?;
        if !self.schema.version_column {
            return Err(StoreError::UndefinedColumn(
                "updated_at column not in schema".to_string(),
            ));
        }
        Ok(state.row.as_ref().map(|row| DocumentRow {
            content: row.content.clone(),
            version: row.updated_at.clone(),
        }))
    }

    async fn fetch_without_version(&self) -> Result<Option<ContentDocument>, StoreError> {
        let state = self.state.lock().unwrap();
        ensure_online(&state)?;
        Ok(state.row.as_ref().map(|row| row.content.clone()))
    }

    async fn seed(&self, content: &ContentDocument) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        ensure_online(&state)?;
        if state.row.is_some() {
            return Err(StoreError::Rejected("row already exists".to_string()));
        }
        let updated_at = self
            .schema
            .version_column
            .then(|| next_token(&mut state));
        state.row = Some(StoredRow {
            content: content.clone(),
            updated_at,
        });
        state.writes += 1;
        debug!("Seeded memory store");
        Ok(())
    }

    async fn overwrite(&self, content: &ContentDocument) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        ensure_online(&state)?;
        let next = self
            .schema
            .version_column
            .then(|| next_token(&mut state));
        let applied = match state.row.as_mut() {
            Some(row) => {
                row.content = content.clone();
                row.updated_at = next;
                true
            }
            // Filtered update on a missing row matches nothing; still a success.
            None => false,
        };
        if applied {
            state.writes += 1;
        }
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        content: &ContentDocument,
        expected: Option<&VersionToken>,
    ) -> Result<DocumentRow, StoreError> {
        let mut state = self.state.lock().unwrap();
        ensure_online(&state)?;
        state.swap_attempts += 1;
        if !self.schema.swap_procedure {
            return Err(StoreError::UndefinedProcedure(
                "swap function not in schema".to_string(),
            ));
        }

        let stored = match state.row.as_ref() {
            Some(row) => row.updated_at.clone(),
            None => {
                return Err(StoreError::Conflict("row does not exist".to_string()));
            }
        };
        if stored.as_ref() != expected {
            return Err(StoreError::Conflict(format!(
                "expected {:?}, stored {:?}",
                expected.map(VersionToken::as_str),
                stored.as_ref().map(VersionToken::as_str)
            )));
        }

        let next = next_token(&mut state);
        if let Some(row) = state.row.as_mut() {
            row.content = content.clone();
            row.updated_at = Some(next.clone());
        }
        state.writes += 1;
        debug!("Swap accepted, new token {}", next);
        Ok(DocumentRow {
            content: content.clone(),
            version: Some(next),
        })
    }
}
