//! PostgREST (Supabase-compatible) backend for the sitedoc content store.
//!
//! Speaks plain PostgREST conventions: single-object reads via the
//! `vnd.pgrst.object+json` Accept header, writes with `Prefer: return=minimal`,
//! and the atomic swap as an `/rpc/` call. Schema gaps and conflicts are
//! recognized from SQLSTATE and PostgREST error codes and re-expressed in the
//! core error taxonomy; no raw code leaves this crate.
//!
//! `schema.sql` at the crate root creates the table and the swap function.

mod config;
mod store;

pub use config::PostgrestConfig;
pub use store::PostgrestStore;
