use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::DocumentRow;
use crate::error::{LoadError, StoreError};
use crate::store::DocumentStore;

/// What the store's schema supports, decided once per load.
///
/// A session can downgrade (`Versioned` to `MissingProcedure` when the first
/// guarded write finds the procedure absent) but never upgrades itself; only
/// a fresh load re-probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Version column and swap procedure in place; saves are guarded.
    Versioned,
    /// No version column. Saves are plain overwrites, last write wins.
    MissingColumn,
    /// Version column present but no swap procedure. Saves are plain
    /// overwrites, last write wins.
    MissingProcedure,
}

impl Capability {
    /// Whether saves go through the atomic compare-and-swap.
    pub fn is_guarded(&self) -> bool {
        matches!(self, Self::Versioned)
    }

    /// Operator-facing warning for degraded modes.
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            Self::Versioned => None,
            Self::MissingColumn => Some(
                "store has no version column; concurrent edits will silently overwrite each other",
            ),
            Self::MissingProcedure => Some(
                "store has no swap procedure; concurrent edits will silently overwrite each other",
            ),
        }
    }
}

/// What a probe learned: the capability plus the row it read on the way.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub capability: Capability,
    pub row: Option<DocumentRow>,
}

/// Probe a store with a versioned read, falling back to an unversioned read
/// when the schema lacks the version column.
///
/// One round trip in the common case, two on the fallback path. A missing
/// swap procedure cannot be seen from here; the first guarded write discovers
/// it and the client records the downgrade.
pub async fn probe(store: &dyn DocumentStore) -> Result<ProbeReport, LoadError> {
    match store.fetch().await {
        Ok(row) => Ok(ProbeReport {
            capability: Capability::Versioned,
            row,
        }),
        Err(StoreError::UndefinedColumn(detail)) => {
            warn!(
                "Version column missing on {} store ({}); saves will be unguarded",
                store.store_name(),
                detail
            );
            let content = store
                .fetch_without_version()
                .await
                .map_err(LoadError::Fetch)?;
            Ok(ProbeReport {
                capability: Capability::MissingColumn,
                row: content.map(|content| DocumentRow {
                    content,
                    version: None,
                }),
            })
        }
        Err(err) => Err(LoadError::Fetch(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_serializes_snake_case() {
        let value = serde_json::to_value(Capability::MissingProcedure).unwrap();
        assert_eq!(value, serde_json::json!("missing_procedure"));
    }

    #[test]
    fn test_only_versioned_is_guarded() {
        assert!(Capability::Versioned.is_guarded());
        assert!(Capability::Versioned.warning().is_none());
        for degraded in [Capability::MissingColumn, Capability::MissingProcedure] {
            assert!(!degraded.is_guarded());
            assert!(degraded.warning().is_some());
        }
    }
}
