//! The store adapter: nine CRUD operations over a [`DocumentDriver`].
//!
//! [`DocumentStoreAdapter`] translates each named CRUD request into exactly
//! one driver call and normalizes the driver's reply into a stable result
//! shape. It holds the driver handle and the per-operation configuration
//! resolved at construction, and no other state between invocations.
//!
//! Error policy is identical across all operations: the first driver error
//! aborts the operation and is surfaced to the caller unchanged. There are no
//! retries and no partial results.
//!
//! # Example
//!
//! ```ignore
//! use docstore_core::{adapter::DocumentStoreAdapter, request::Payload};
//! use bson::doc;
//!
//! let store = DocumentStoreAdapter::new(driver);
//!
//! store.create(Payload::One(doc! { "name": "Alice" })).await?;
//! let found = store.find(doc! { "name": "Alice" }, None).await?;
//! ```

use bson::{Bson, Document, ser::serialize_to_bson};
use tracing::debug;

use crate::{
    driver::DocumentDriver,
    error::StoreResult,
    options::{AdapterOptions, Operation},
    request::{FindOptions, Payload, Request},
    response::{CreateResult, FindResult, RemoveResult, UpdateSummary},
};

/// A CRUD adapter bound to a specific driver implementation.
///
/// The adapter is long-lived: construct it once per collection and share it
/// freely, every operation takes `&self`. The resolved configuration is
/// read-only after construction; operations that need to force a flag merge
/// it into a fresh per-call copy.
#[derive(Debug)]
pub struct DocumentStoreAdapter<D: DocumentDriver> {
    driver: D,
    options: AdapterOptions,
}

impl<D: DocumentDriver> DocumentStoreAdapter<D> {
    /// Creates an adapter with default (empty) configuration.
    pub fn new(driver: D) -> Self {
        Self::with_options(driver, AdapterOptions::default())
    }

    /// Creates an adapter with the given configuration.
    ///
    /// Missing per-operation entries resolve to empty documents, so every one
    /// of the nine operations always has a configuration to pass downstream.
    pub fn with_options(driver: D, options: AdapterOptions) -> Self {
        Self { driver, options }
    }

    /// Returns the underlying driver handle.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Returns the resolved adapter configuration.
    pub fn options(&self) -> &AdapterOptions {
        &self.options
    }

    fn operation_options(&self, operation: Operation) -> &Document {
        self.options.store.operation(operation)
    }

    /// Inserts one record or an ordered batch of records.
    ///
    /// A batch issues a single bulk driver call, not one call per record.
    ///
    /// # Returns
    ///
    /// [`CreateResult::Many`] with one identifier per record for a batch, or
    /// [`CreateResult::One`] with the stringified identifier for a single
    /// record.
    pub async fn create(&self, data: Payload) -> StoreResult<CreateResult> {
        let options = self.operation_options(Operation::Create);

        match data {
            Payload::Many(documents) => {
                let ids = self
                    .driver
                    .insert_many(documents, options)
                    .await?;

                Ok(CreateResult::Many { ids })
            }
            Payload::One(document) => {
                let id = self.driver.insert_one(document, options).await?;

                Ok(CreateResult::One { id: id_string(&id) })
            }
        }
    }

    /// Deletes every record matching the query.
    pub async fn remove(&self, query: Document) -> StoreResult<RemoveResult> {
        let deleted_count = self
            .driver
            .delete_many(query, self.operation_options(Operation::Remove))
            .await?;

        Ok(RemoveResult { deleted_count })
    }

    /// Deletes the record with the given identifier.
    ///
    /// # Returns
    ///
    /// The deleted record, or `None` if no record matched.
    pub async fn remove_by_id(&self, id: &str) -> StoreResult<Option<Document>> {
        self.driver
            .find_one_and_delete(
                self.id_query(id)?,
                self.operation_options(Operation::RemoveById),
            )
            .await
    }

    /// Updates the first record matching the query.
    ///
    /// # Returns
    ///
    /// The updated record, or `None` if no record matched.
    pub async fn update(&self, query: Document, data: Document) -> StoreResult<Option<Document>> {
        self.driver
            .find_one_and_update(query, data, self.operation_options(Operation::Update))
            .await
    }

    /// Updates the record with the given identifier.
    ///
    /// # Returns
    ///
    /// The updated record, or `None` if no record matched.
    pub async fn update_by_id(&self, id: &str, data: Document) -> StoreResult<Option<Document>> {
        self.driver
            .find_one_and_update(
                self.id_query(id)?,
                data,
                self.operation_options(Operation::UpdateById),
            )
            .await
    }

    /// Queries records matching the query, with optional limit, offset,
    /// projection and sort.
    ///
    /// # Returns
    ///
    /// The matching records plus an echo of the find options applied.
    pub async fn find(
        &self,
        query: Document,
        options: Option<FindOptions>,
    ) -> StoreResult<FindResult> {
        let find_options = options.unwrap_or_default();
        let result = self
            .driver
            .find(
                query,
                self.operation_options(Operation::Find),
                &find_options,
            )
            .await?;

        Ok(FindResult {
            result,
            options: find_options,
        })
    }

    /// Returns the record with the given identifier, passed through unmodified.
    ///
    /// A non-matching identifier yields `Ok(None)`, not an error.
    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<Document>> {
        self.driver
            .find_one(
                self.id_query(id)?,
                self.operation_options(Operation::FindById),
            )
            .await
    }

    /// Updates every record matching the query, inserting one when nothing
    /// matches (upsert is always forced on).
    ///
    /// The upsert flag is merged into a fresh copy of the configured replace
    /// options on every call; the stored configuration is never mutated.
    pub async fn replace(&self, query: Document, data: Document) -> StoreResult<UpdateSummary> {
        let mut options = self.operation_options(Operation::Replace).clone();
        options.insert("upsert", true);

        self.driver
            .update_many(query, data, &options)
            .await
    }

    /// Replaces the record with the given identifier.
    ///
    /// # Returns
    ///
    /// The replaced record, or `None` if no record matched.
    pub async fn replace_by_id(&self, id: &str, data: Document) -> StoreResult<Option<Document>> {
        self.driver
            .find_one_and_replace(
                self.id_query(id)?,
                data,
                self.operation_options(Operation::ReplaceById),
            )
            .await
    }

    /// Dispatches a wire-level [`Request`] to the named operation and
    /// serializes its normalized result.
    ///
    /// This is the fixed operation-set surface an embedding host plugs into:
    /// one entry point, nine operations, BSON in and BSON out.
    pub async fn dispatch(&self, operation: Operation, request: Request) -> StoreResult<Bson> {
        debug!(%operation, "dispatching store request");

        match operation {
            Operation::Create => serialized(&self.create(request.payload()?).await?),
            Operation::Remove => serialized(&self.remove(request.query()?).await?),
            Operation::RemoveById => serialized(&self.remove_by_id(request.id()?).await?),
            Operation::Update => {
                serialized(&self.update(request.query()?, request.document()?).await?)
            }
            Operation::UpdateById => {
                serialized(&self.update_by_id(request.id()?, request.document()?).await?)
            }
            Operation::Find => {
                serialized(&self.find(request.query()?, request.options.clone()).await?)
            }
            Operation::FindById => serialized(&self.find_by_id(request.id()?).await?),
            Operation::Replace => {
                serialized(&self.replace(request.query()?, request.document()?).await?)
            }
            Operation::ReplaceById => {
                serialized(&self.replace_by_id(request.id()?, request.document()?).await?)
            }
        }
    }

    fn id_query(&self, id: &str) -> StoreResult<Document> {
        let mut query = Document::new();
        query.insert("_id", self.driver.native_id(id)?);

        Ok(query)
    }
}

/// Renders a native identifier as the string form handed back to callers.
fn id_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn serialized<T: serde::Serialize>(value: &T) -> StoreResult<Bson> {
    Ok(serialize_to_bson(value)?)
}
