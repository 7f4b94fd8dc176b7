//! Driver abstraction the store adapter depends on.
//!
//! This module defines the capability interface between the adapter and a
//! concrete document database driver. The adapter issues exactly one driver
//! call per operation and leaves connection management, pooling, timeouts and
//! cancellation to the driver implementation.
//!
//! # Overview
//!
//! [`DocumentDriver`] covers the low-level operations the nine CRUD
//! operations are built from: single and bulk insert, multi-delete,
//! find-and-modify variants, multi-update and cursor-style find. Identifier
//! construction is part of the interface as well: the adapter never guesses
//! how a driver represents record identifiers, it delegates through
//! [`DocumentDriver::native_id`].
//!
//! # Options
//!
//! Every call receives the per-operation configuration document resolved at
//! adapter construction. A driver interprets the flags it recognizes and
//! ignores the rest.
//!
//! # Error Handling
//!
//! Operations return [`StoreResult<T>`](crate::error::StoreResult). Driver
//! failures are reported as [`StoreError::Driver`](crate::error::StoreError)
//! with the driver's message carried through unchanged.

use async_trait::async_trait;
use bson::{Bson, Document};
use std::fmt::Debug;

use crate::{
    error::StoreResult,
    request::FindOptions,
    response::UpdateSummary,
};

/// Abstract interface for document database drivers.
///
/// Implementers provide the concrete wire operations for one collection of
/// records. All implementations must be thread-safe (`Send + Sync`); each
/// method is a single request/response round trip with no intermediate state.
#[async_trait]
pub trait DocumentDriver: Send + Sync + Debug {
    /// Converts an opaque identifier into the driver's native representation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidId`](crate::error::StoreError) if the
    /// identifier cannot be represented natively.
    fn native_id(&self, id: &str) -> StoreResult<Bson>;

    /// Inserts a single record and returns its identifier.
    async fn insert_one(&self, data: Document, options: &Document) -> StoreResult<Bson>;

    /// Inserts an ordered batch of records in one driver call.
    ///
    /// # Returns
    ///
    /// The inserted identifiers, in input order regardless of how the driver
    /// represents them internally.
    async fn insert_many(&self, data: Vec<Document>, options: &Document)
        -> StoreResult<Vec<Bson>>;

    /// Deletes every record matching the query and returns the deleted count.
    async fn delete_many(&self, query: Document, options: &Document) -> StoreResult<u64>;

    /// Returns the first record matching the query, if any.
    async fn find_one(&self, query: Document, options: &Document)
        -> StoreResult<Option<Document>>;

    /// Atomically deletes the first record matching the query.
    ///
    /// # Returns
    ///
    /// The deleted record, or `None` if nothing matched.
    async fn find_one_and_delete(
        &self,
        query: Document,
        options: &Document,
    ) -> StoreResult<Option<Document>>;

    /// Atomically updates the first record matching the query.
    ///
    /// # Returns
    ///
    /// The updated record, or `None` if nothing matched. Drivers honoring a
    /// `returnDocument: "before"` flag may return the pre-image instead.
    async fn find_one_and_update(
        &self,
        query: Document,
        update: Document,
        options: &Document,
    ) -> StoreResult<Option<Document>>;

    /// Atomically replaces the first record matching the query.
    ///
    /// # Returns
    ///
    /// The replaced record, or `None` if nothing matched.
    async fn find_one_and_replace(
        &self,
        query: Document,
        replacement: Document,
        options: &Document,
    ) -> StoreResult<Option<Document>>;

    /// Updates every record matching the query.
    ///
    /// # Returns
    ///
    /// A normalized [`UpdateSummary`], independent of how the driver names its
    /// matched/modified/upserted counters.
    async fn update_many(
        &self,
        query: Document,
        update: Document,
        options: &Document,
    ) -> StoreResult<UpdateSummary>;

    /// Queries records matching `query` and materializes them into a sequence.
    ///
    /// Each find option is applied only when present, in the fixed order
    /// limit, offset, fields, orderBy.
    async fn find(
        &self,
        query: Document,
        options: &Document,
        find_options: &FindOptions,
    ) -> StoreResult<Vec<Document>>;
}

/// Factory trait for constructing driver instances.
#[async_trait]
pub trait DriverBuilder {
    type Driver: DocumentDriver;

    async fn build(self) -> StoreResult<Self::Driver>;
}

#[async_trait]
impl<D> DocumentDriver for &D
where
    D: DocumentDriver,
{
    fn native_id(&self, id: &str) -> StoreResult<Bson> {
        (*self).native_id(id)
    }

    async fn insert_one(&self, data: Document, options: &Document) -> StoreResult<Bson> {
        (*self).insert_one(data, options).await
    }

    async fn insert_many(
        &self,
        data: Vec<Document>,
        options: &Document,
    ) -> StoreResult<Vec<Bson>> {
        (*self).insert_many(data, options).await
    }

    async fn delete_many(&self, query: Document, options: &Document) -> StoreResult<u64> {
        (*self).delete_many(query, options).await
    }

    async fn find_one(
        &self,
        query: Document,
        options: &Document,
    ) -> StoreResult<Option<Document>> {
        (*self).find_one(query, options).await
    }

    async fn find_one_and_delete(
        &self,
        query: Document,
        options: &Document,
    ) -> StoreResult<Option<Document>> {
        (*self)
            .find_one_and_delete(query, options)
            .await
    }

    async fn find_one_and_update(
        &self,
        query: Document,
        update: Document,
        options: &Document,
    ) -> StoreResult<Option<Document>> {
        (*self)
            .find_one_and_update(query, update, options)
            .await
    }

    async fn find_one_and_replace(
        &self,
        query: Document,
        replacement: Document,
        options: &Document,
    ) -> StoreResult<Option<Document>> {
        (*self)
            .find_one_and_replace(query, replacement, options)
            .await
    }

    async fn update_many(
        &self,
        query: Document,
        update: Document,
        options: &Document,
    ) -> StoreResult<UpdateSummary> {
        (*self)
            .update_many(query, update, options)
            .await
    }

    async fn find(
        &self,
        query: Document,
        options: &Document,
        find_options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        (*self)
            .find(query, options, find_options)
            .await
    }
}
