//! Core model and save protocol for the sitedoc content store.
//!
//! This crate defines everything shared between store backends and consumers:
//! - `ContentDocument` / `Section`: the single JSON document a site renders from
//! - `DocumentStore`: the backend seam (fetch, seed, overwrite, compare-and-swap)
//! - `probe`: capability detection against stores with incomplete schemas
//! - `ContentClient`: the stateful session that performs guarded saves and
//!   latches on version conflicts until reloaded

mod client;
mod document;
mod error;
mod probe;
mod registry;
mod store;

pub use client::{ClientStatus, ContentClient};
pub use document::{
    ContentDocument, DocumentRow, FooterContact, FooterContent, FooterLinks, FooterServices,
    HeaderContent, NavLink, Section, SectionKind, VersionToken,
};
pub use error::{LoadError, SaveError, StoreError};
pub use probe::{probe, Capability, ProbeReport};
pub use registry::{default_content, default_document, display_name, known_kinds};
pub use store::DocumentStore;
