//! Convenient re-exports of commonly used types from docstore.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use docstore::prelude::*;
//! ```
//!
//! This provides access to:
//! - The store adapter and driver traits
//! - Request and find-option types
//! - Normalized result shapes
//! - Per-operation configuration
//! - Error types

pub use docstore_core::{
    adapter::DocumentStoreAdapter,
    driver::{DocumentDriver, DriverBuilder},
    error::{StoreError, StoreResult},
    options::{AdapterOptions, Operation, StoreOptions},
    request::{FindOptions, Payload, Request},
    response::{CreateResult, FindResult, RemoveResult, UpdateSummary},
};
