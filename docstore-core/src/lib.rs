//! A thin CRUD adapter layer that normalizes requests and responses between a caller
//! and a document database driver.
//!
//! This crate is the core of the docstore project and provides:
//!
//! - **Driver abstraction** ([`driver`]) - The capability interface adapters depend on
//! - **The store adapter** ([`adapter`]) - Nine CRUD operations with stable result shapes
//! - **Request types** ([`request`]) - Wire-level request payloads and find options
//! - **Response types** ([`response`]) - Normalized, driver-independent result shapes
//! - **Per-operation options** ([`options`]) - Resolved driver configuration per operation
//! - **Error handling** ([`error`]) - Comprehensive error types and result types
//!
//! # Example
//!
//! ```ignore
//! use docstore_core::{adapter::DocumentStoreAdapter, request::Payload};
//! use bson::doc;
//!
//! let store = DocumentStoreAdapter::new(driver);
//! let created = store.create(Payload::One(doc! { "name": "Alice" })).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as docstore_core;

pub mod adapter;
pub mod driver;
pub mod error;
pub mod options;
pub mod request;
pub mod response;
