use thiserror::Error;

use crate::document::SectionKind;

/// Errors reported by a `DocumentStore` backend.
///
/// Backends classify their raw failures (HTTP statuses, SQLSTATEs, PostgREST
/// codes) into these variants; nothing above the trait ever sees a
/// backend-specific error shape.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Network-level failure or an unreadable response. Nothing can be said
    /// about whether the store applied the write.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The version column is absent from the schema.
    #[error("Version column missing: {0}")]
    UndefinedColumn(String),

    /// The atomic swap procedure is absent from the schema.
    #[error("Swap procedure missing: {0}")]
    UndefinedProcedure(String),

    /// The expected version token did not match the stored one. The store
    /// changed nothing.
    #[error("Version conflict: {0}")]
    Conflict(String),

    /// The store understood the request and refused it (constraint violation,
    /// permission denial, and the like).
    #[error("Rejected by store: {0}")]
    Rejected(String),
}

/// Fatal errors while establishing a session. There is no degraded mode for
/// these: an unreachable or unseedable store is a configuration problem.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to load content: {0}")]
    Fetch(#[source] StoreError),

    #[error("Failed to seed initial content: {0}")]
    Seed(#[source] StoreError),
}

/// Outcome of a single save action.
#[derive(Error, Debug)]
pub enum SaveError {
    /// Another session saved first. The client is latched until reloaded.
    #[error("Version conflict: content was changed by another session; reload required")]
    Conflict,

    /// The store failed this action. Local state is untouched and the same
    /// action may simply be issued again.
    #[error("Store error: {0}")]
    Store(String),

    /// No section with this id exists. Nothing was sent to the store.
    #[error("Unknown section id: {0}")]
    UnknownSection(String),

    /// The kind has no default payload in the catalog. Nothing was sent to
    /// the store.
    #[error("Section kind not in catalog: {0}")]
    UnregisteredKind(SectionKind),

    /// The requested order is not a permutation of the current section ids.
    /// Nothing was sent to the store.
    #[error("Invalid section order: {0}")]
    InvalidOrder(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_self_describing() {
        let err = StoreError::Conflict("expected 2025-01-01T00:00:00Z".to_string());
        assert!(err.to_string().contains("Version conflict"));

        let err = LoadError::Fetch(StoreError::Transport("connection refused".to_string()));
        assert!(err.to_string().contains("Failed to load content"));

        let err = SaveError::UnregisteredKind(SectionKind::Other("blogRoll".to_string()));
        assert!(err.to_string().contains("blogRoll"));
    }
}
