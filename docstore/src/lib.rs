//! Main docstore crate providing a thin CRUD adapter over document database drivers.
//!
//! This crate is the primary entry point for users of the docstore framework.
//! It re-exports the core types from the sub-crates and provides convenient
//! access to the available drivers.
//!
//! # Features
//!
//! - **Nine CRUD operations** - create, remove, removeById, update, updateById,
//!   find, findById, replace, replaceById
//! - **Stable result shapes** - normalized responses independent of driver
//!   version quirks
//! - **Pluggable drivers** - in-memory and MongoDB drivers behind one trait
//! - **Per-operation configuration** - driver flags scoped per operation,
//!   resolved once at construction
//!
//! # Quick Start
//!
//! ```ignore
//! use docstore::{prelude::*, memory::MemoryDriver};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = DocumentStoreAdapter::new(MemoryDriver::new());
//!
//!     // Insert one record
//!     let created = store
//!         .create(Payload::One(doc! { "name": "Alice" }))
//!         .await
//!         .unwrap();
//!
//!     // Query it back
//!     let found = store
//!         .find(doc! { "name": "Alice" }, None)
//!         .await
//!         .unwrap();
//!
//!     println!("created {:?}, found {:?}", created, found.result);
//! }
//! ```
//!
//! # Embedding
//!
//! Hosts that receive wire-level requests can use the single dispatch entry
//! point instead of the typed operation methods:
//!
//! ```ignore
//! use docstore::{prelude::*, memory::MemoryDriver};
//!
//! let store = DocumentStoreAdapter::new(MemoryDriver::new());
//! let response = store.dispatch(Operation::Find, request).await?;
//! ```
//!
//! # Drivers
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB driver (requires the `mongodb` feature)

pub mod prelude;

pub use docstore_core::{adapter, driver, error, options, request, response};

// Re-export BSON types for convenience
pub use bson;

/// In-memory driver implementation.
pub mod memory {
    pub use docstore_memory::MemoryDriver;
}

/// MongoDB driver implementation.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use docstore_mongodb::{MongoDriver, MongoDriverBuilder};
}
