//! In-memory document driver for docstore.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `DocumentDriver` trait. It keeps records in insertion order behind an
//! async-aware read-write lock and is ideal for development and testing.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Deterministic ordering** - Records keep their insertion order
//! - **Query matching** - Equality and comparison-operator filters
//! - **Update operators** - `$set`, `$unset` and `$inc` application
//!
//! # Quick Start
//!
//! ```ignore
//! use docstore::{adapter::DocumentStoreAdapter, memory::MemoryDriver, request::Payload};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStoreAdapter::new(MemoryDriver::new());
//!
//!     store.create(Payload::One(doc! { "name": "Alice" })).await?;
//!     let found = store.find(doc! { "name": "Alice" }, None).await?;
//!     assert_eq!(found.result.len(), 1);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docstore_memory;

pub mod driver;
pub mod matcher;

pub use driver::MemoryDriver;
