//! `connectlife-store` — the document store collaborator.
//!
//! An in-memory document store over the domain entities, exposing exactly the
//! queries the HTTP handlers need. Requests are independent and stateless;
//! concurrent writes to the same document are not serialized beyond the store
//! locks — last write wins, per the system's concurrency model. The one
//! multi-step mutation with an ordering requirement (event replacement) runs
//! under a single write guard, so it cannot be observed half-done.

pub mod documents;
pub mod error;

pub use documents::Documents;
pub use error::StoreError;
