use async_trait::async_trait;

use crate::document::{ContentDocument, DocumentRow, VersionToken};
use crate::error::StoreError;

/// Backend abstraction over the single content row.
///
/// A backend holds exactly one logical document. All methods classify their
/// raw failures into `StoreError`; schema gaps surface as `UndefinedColumn`
/// (version column absent) and `UndefinedProcedure` (swap procedure absent)
/// so the layer above can degrade instead of dying.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the backend identifier (e.g., "memory", "postgrest").
    fn store_name(&self) -> &'static str;

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetch the row including its version token. `Ok(None)` when the row
    /// does not exist yet.
    async fn fetch(&self) -> Result<Option<DocumentRow>, StoreError>;

    /// Fallback read for stores whose schema lacks the version column.
    async fn fetch_without_version(&self) -> Result<Option<ContentDocument>, StoreError>;

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert the initial row. Fails with `Rejected` if a row already exists.
    async fn seed(&self, content: &ContentDocument) -> Result<(), StoreError>;

    /// Unguarded write: replace the content regardless of its version.
    async fn overwrite(&self, content: &ContentDocument) -> Result<(), StoreError>;

    /// Guarded write: atomically compare `expected` against the stored token
    /// and, on match, persist `content` and return the fresh row with its new
    /// token. On mismatch fail with `Conflict` and change nothing.
    ///
    /// `None` means "no recorded version" and matches a row whose token is
    /// NULL (written before the version column existed).
    async fn compare_and_swap(
        &self,
        content: &ContentDocument,
        expected: Option<&VersionToken>,
    ) -> Result<DocumentRow, StoreError>;
}
