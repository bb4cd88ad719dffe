use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::document::{ContentDocument, Section, SectionKind, VersionToken};
use crate::error::{LoadError, SaveError, StoreError};
use crate::probe::{probe, Capability};
use crate::registry;
use crate::store::DocumentStore;

/// A session over the content store.
///
/// Holds the working copy of the document, the version token it was read at,
/// the probed capability, and the conflict latch. Write methods take
/// `&mut self`, so one client can never have two saves in flight;
/// cross-session ordering is enforced by the store's compare-and-swap alone.
pub struct ContentClient {
    store: Arc<dyn DocumentStore>,
    document: ContentDocument,
    version: Option<VersionToken>,
    capability: Capability,
    conflicted: bool,
}

/// Point-in-time view of a client, for status surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct ClientStatus {
    pub store: &'static str,
    pub capability: Capability,
    pub warning: Option<&'static str>,
    pub conflicted: bool,
    pub version: Option<String>,
}

impl ContentClient {
    /// Establish a session: probe the store, then adopt the existing row or
    /// seed the built-in default document into an empty store.
    ///
    /// Seeding happens at most once per empty store; after the seed the row
    /// is re-fetched so the first save already carries a token.
    pub async fn connect(store: Arc<dyn DocumentStore>) -> Result<Self, LoadError> {
        let report = probe(store.as_ref()).await?;
        let capability = report.capability;

        let (document, version) = match report.row {
            Some(row) => (row.content, row.version),
            None => {
                let document = registry::default_document();
                store.seed(&document).await.map_err(LoadError::Seed)?;
                info!("Seeded {} store with default content", store.store_name());
                if capability.is_guarded() {
                    match store.fetch().await.map_err(LoadError::Fetch)? {
                        Some(row) => (row.content, row.version),
                        None => (document, None),
                    }
                } else {
                    (document, None)
                }
            }
        };

        Ok(Self {
            store,
            document,
            version,
            capability,
            conflicted: false,
        })
    }

    /// Throw away all session state and load fresh from the store. The only
    /// way out of the conflict latch. On failure the latched state stays put.
    #[instrument(skip(self), level = "debug")]
    pub async fn reload(&mut self) -> Result<(), LoadError> {
        *self = Self::connect(Arc::clone(&self.store)).await?;
        Ok(())
    }

    // =========================================================================
    // Saving
    // =========================================================================

    /// Replace the whole document. The single write primitive every other
    /// mutation goes through.
    ///
    /// Guarded mode issues a compare-and-swap with the held token; a conflict
    /// latches the client and changes nothing locally. Degraded modes
    /// overwrite unconditionally and cannot conflict (deliberate last write
    /// wins). Transport failures leave all state untouched; re-invoking the
    /// action is the retry.
    #[instrument(skip(self, document), level = "debug")]
    pub async fn replace_document(&mut self, document: ContentDocument) -> Result<(), SaveError> {
        if self.capability.is_guarded() {
            match self
                .store
                .compare_and_swap(&document, self.version.as_ref())
                .await
            {
                Ok(row) => {
                    self.document = row.content;
                    self.version = row.version;
                    return Ok(());
                }
                Err(StoreError::Conflict(detail)) => {
                    warn!(
                        "Version conflict on {} store: {}",
                        self.store.store_name(),
                        detail
                    );
                    self.conflicted = true;
                    return Err(SaveError::Conflict);
                }
                Err(StoreError::UndefinedProcedure(detail)) => {
                    warn!(
                        "Swap procedure missing on {} store ({}); continuing with unguarded saves",
                        self.store.store_name(),
                        detail
                    );
                    // Downgrade sticks for the rest of the session; only a
                    // reload re-probes. Fall through to the plain overwrite.
                    self.capability = Capability::MissingProcedure;
                }
                Err(err) => return Err(SaveError::Store(err.to_string())),
            }
        }

        self.store
            .overwrite(&document)
            .await
            .map_err(|err| SaveError::Store(err.to_string()))?;
        self.document = document;
        Ok(())
    }

    // =========================================================================
    // Section operations
    // =========================================================================

    /// Swap one section's payload and save.
    pub async fn replace_section(&mut self, id: &str, content: Value) -> Result<(), SaveError> {
        let mut document = self.document.clone();
        match document.section_mut(id) {
            Some(section) => section.content = content,
            None => return Err(SaveError::UnknownSection(id.to_string())),
        }
        self.replace_document(document).await
    }

    /// Append a new section of `kind` with its catalog default payload and
    /// save. Returns the id the section was given.
    pub async fn add_section(&mut self, kind: SectionKind) -> Result<String, SaveError> {
        let content = registry::default_content(&kind)
            .ok_or_else(|| SaveError::UnregisteredKind(kind.clone()))?;
        let mut document = self.document.clone();
        let id = document.fresh_section_id(&kind);
        document.sections.push(Section {
            id: id.clone(),
            kind,
            content,
        });
        self.replace_document(document).await?;
        Ok(id)
    }

    /// Remove a section by id and save.
    pub async fn remove_section(&mut self, id: &str) -> Result<(), SaveError> {
        let mut document = self.document.clone();
        let Some(pos) = document.sections.iter().position(|s| s.id == id) else {
            return Err(SaveError::UnknownSection(id.to_string()));
        };
        document.sections.remove(pos);
        self.replace_document(document).await
    }

    /// Reorder sections and save. `order` must be an exact permutation of the
    /// current ids; anything else is rejected before the store is involved.
    pub async fn reorder_sections(&mut self, order: &[String]) -> Result<(), SaveError> {
        if order.len() != self.document.sections.len() {
            return Err(SaveError::InvalidOrder(format!(
                "expected {} section ids, got {}",
                self.document.sections.len(),
                order.len()
            )));
        }

        let mut document = self.document.clone();
        let mut remaining = std::mem::take(&mut document.sections);
        let mut reordered = Vec::with_capacity(order.len());
        for id in order {
            match remaining.iter().position(|s| &s.id == id) {
                Some(pos) => reordered.push(remaining.remove(pos)),
                None if self.document.has_section(id) => {
                    return Err(SaveError::InvalidOrder(format!(
                        "duplicate section id: {id}"
                    )));
                }
                None => {
                    return Err(SaveError::InvalidOrder(format!("unknown section id: {id}")));
                }
            }
        }
        document.sections = reordered;
        self.replace_document(document).await
    }

    /// Replace everything with the built-in default document and save.
    pub async fn reset_document(&mut self) -> Result<(), SaveError> {
        self.replace_document(registry::default_document()).await
    }

    /// Put one section back to its kind's default payload and save.
    pub async fn reset_section(&mut self, id: &str) -> Result<(), SaveError> {
        let kind = match self.document.section(id) {
            Some(section) => section.kind.clone(),
            None => return Err(SaveError::UnknownSection(id.to_string())),
        };
        let content = registry::default_content(&kind)
            .ok_or_else(|| SaveError::UnregisteredKind(kind))?;
        self.replace_section(id, content).await
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The working copy as of the last successful load or save.
    pub fn document(&self) -> &ContentDocument {
        &self.document
    }

    pub fn version(&self) -> Option<&VersionToken> {
        self.version.as_ref()
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Whether a save lost a race. Once set, only `reload` clears it.
    pub fn is_conflicted(&self) -> bool {
        self.conflicted
    }

    pub fn status(&self) -> ClientStatus {
        ClientStatus {
            store: self.store.store_name(),
            capability: self.capability,
            warning: self.capability.warning(),
            conflicted: self.conflicted,
            version: self.version.as_ref().map(|v| v.as_str().to_string()),
        }
    }
}
