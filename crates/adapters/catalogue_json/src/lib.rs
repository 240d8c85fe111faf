//! # devmeta-adapter-catalogue-json
//!
//! In-memory catalogue backed by a JSON snapshot file.
//!
//! ## Responsibilities
//! - Load and parse the catalogue snapshot (aspects, functions, device types)
//! - Compute the aspect closure on load
//! - Implement the repository port traits defined in `devmeta-app::ports::storage`
//!
//! ## Dependency rule
//! Depends on `devmeta-app` (for port traits) and `devmeta-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod catalogue;
pub mod error;
pub mod store;

pub use catalogue::{Catalogue, Config};
pub use error::CatalogueError;
pub use store::CatalogueStore;
