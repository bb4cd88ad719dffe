//! Capability detection against in-memory stores with full, reduced, and
//! unreachable schemas.

use sitedoc_store_core::{
    default_document, probe, Capability, DocumentStore, LoadError, StoreError,
};
use sitedoc_store_memory::MemoryStore;

#[tokio::test]
async fn test_probe_full_schema_is_versioned() {
    let store = MemoryStore::new();
    store.seed(&default_document()).await.unwrap();

    let report = probe(&store).await.unwrap();
    assert_eq!(report.capability, Capability::Versioned);
    assert!(report.capability.is_guarded());
    assert!(report.capability.warning().is_none());

    let row = report.row.unwrap();
    assert!(row.version.is_some());
}

#[tokio::test]
async fn test_probe_empty_store_reports_no_row() {
    let store = MemoryStore::new();
    let report = probe(&store).await.unwrap();
    assert_eq!(report.capability, Capability::Versioned);
    assert!(report.row.is_none());
}

#[tokio::test]
async fn test_probe_falls_back_when_column_missing() {
    let store = MemoryStore::without_version_column();
    store.seed(&default_document()).await.unwrap();

    let report = probe(&store).await.unwrap();
    assert_eq!(report.capability, Capability::MissingColumn);
    assert!(report.capability.warning().is_some());

    // Content still loads; there is just no token to hold.
    let row = report.row.unwrap();
    assert!(row.version.is_none());
    assert!(!row.content.sections.is_empty());
}

#[tokio::test]
async fn test_probe_propagates_transport_errors() {
    let store = MemoryStore::new();
    store.set_offline(true);

    let err = probe(&store).await.unwrap_err();
    assert!(matches!(err, LoadError::Fetch(StoreError::Transport(_))));
}
