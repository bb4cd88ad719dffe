//! In-memory `DocumentStore` used by tests and the dev-mode admin server.
//!
//! Constructors simulate the schema stages a real deployment moves through:
//! full schema, missing version column, missing swap procedure. Fault
//! injection (`set_offline`) stands in for an unreachable backend.

mod memory;

pub use memory::MemoryStore;
