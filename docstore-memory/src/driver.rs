//! In-memory driver implementation.
//!
//! This module provides a thread-safe, single-collection [`DocumentDriver`]
//! that stores records in insertion order behind an async-aware read-write
//! lock. It is intended for development and testing; queries scan the whole
//! collection.

use std::sync::Arc;

use async_trait::async_trait;
use bson::{Bson, Document, oid::ObjectId};
use mea::rwlock::RwLock;
use tracing::debug;

use docstore_core::{
    driver::DocumentDriver,
    error::{StoreError, StoreResult},
    request::FindOptions,
    response::UpdateSummary,
};

use crate::matcher::{QueryMatcher, sort_records};

/// Thread-safe in-memory record storage for one collection.
///
/// `MemoryDriver` is cloneable and uses an `Arc`-wrapped internal state, so
/// clones share the same underlying records. Records keep their insertion
/// order, which makes offset/limit behavior deterministic.
///
/// Identifiers are BSON ObjectIds by default: inserts without an `_id` get a
/// fresh one, and [`DocumentDriver::native_id`] parses 24-hex strings back
/// into ObjectIds. Identifiers that are not valid ObjectIds stay plain
/// strings, so lookups with arbitrary ids miss instead of failing.
///
/// # Example
///
/// ```ignore
/// use docstore_memory::MemoryDriver;
/// use docstore_core::adapter::DocumentStoreAdapter;
///
/// let store = DocumentStoreAdapter::new(MemoryDriver::new());
/// ```
#[derive(Default, Clone, Debug)]
pub struct MemoryDriver {
    records: Arc<RwLock<Vec<Document>>>,
}

impl MemoryDriver {
    /// Creates a new empty in-memory driver.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Returns a snapshot of all stored records, in insertion order.
    pub async fn records(&self) -> Vec<Document> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl DocumentDriver for MemoryDriver {
    fn native_id(&self, id: &str) -> StoreResult<Bson> {
        // Arbitrary strings stay as-is so a non-matching lookup misses
        // instead of erroring.
        Ok(match ObjectId::parse_str(id) {
            Ok(oid) => Bson::ObjectId(oid),
            Err(_) => Bson::String(id.to_string()),
        })
    }

    async fn insert_one(&self, data: Document, _options: &Document) -> StoreResult<Bson> {
        let mut records = self.records.write().await;
        let record = with_id(data);
        let id = record
            .get("_id")
            .cloned()
            .unwrap_or(Bson::Null);

        records.push(record);

        Ok(id)
    }

    async fn insert_many(
        &self,
        data: Vec<Document>,
        _options: &Document,
    ) -> StoreResult<Vec<Bson>> {
        let mut records = self.records.write().await;
        let mut ids = Vec::with_capacity(data.len());

        for document in data {
            let record = with_id(document);
            ids.push(
                record
                    .get("_id")
                    .cloned()
                    .unwrap_or(Bson::Null),
            );
            records.push(record);
        }

        Ok(ids)
    }

    async fn delete_many(&self, query: Document, _options: &Document) -> StoreResult<u64> {
        let matcher = QueryMatcher::new(&query);
        let mut records = self.records.write().await;
        let mut kept = Vec::with_capacity(records.len());
        let mut deleted = 0;

        for record in records.drain(..) {
            if matcher.matches(&record)? {
                deleted += 1;
            } else {
                kept.push(record);
            }
        }

        *records = kept;
        debug!(deleted, "deleted records");

        Ok(deleted)
    }

    async fn find_one(
        &self,
        query: Document,
        _options: &Document,
    ) -> StoreResult<Option<Document>> {
        let matcher = QueryMatcher::new(&query);
        let records = self.records.read().await;

        for record in records.iter() {
            if matcher.matches(record)? {
                return Ok(Some(record.clone()));
            }
        }

        Ok(None)
    }

    async fn find_one_and_delete(
        &self,
        query: Document,
        _options: &Document,
    ) -> StoreResult<Option<Document>> {
        let matcher = QueryMatcher::new(&query);
        let mut records = self.records.write().await;

        for index in 0..records.len() {
            if matcher.matches(&records[index])? {
                return Ok(Some(records.remove(index)));
            }
        }

        Ok(None)
    }

    async fn find_one_and_update(
        &self,
        query: Document,
        update: Document,
        options: &Document,
    ) -> StoreResult<Option<Document>> {
        let matcher = QueryMatcher::new(&query);
        let mut records = self.records.write().await;

        for record in records.iter_mut() {
            if matcher.matches(record)? {
                let before = record.clone();
                *record = apply_update(&before, &update)?;

                return Ok(Some(if return_before(options) {
                    before
                } else {
                    record.clone()
                }));
            }
        }

        Ok(None)
    }

    async fn find_one_and_replace(
        &self,
        query: Document,
        replacement: Document,
        options: &Document,
    ) -> StoreResult<Option<Document>> {
        let matcher = QueryMatcher::new(&query);
        let mut records = self.records.write().await;

        for record in records.iter_mut() {
            if matcher.matches(record)? {
                let before = record.clone();
                let mut replaced = replacement.clone();

                // A replacement never changes the record's identifier.
                if let Some(id) = before.get("_id") {
                    replaced.insert("_id", id.clone());
                }
                *record = replaced;

                return Ok(Some(if return_before(options) {
                    before
                } else {
                    record.clone()
                }));
            }
        }

        Ok(None)
    }

    async fn update_many(
        &self,
        query: Document,
        update: Document,
        options: &Document,
    ) -> StoreResult<UpdateSummary> {
        let matcher = QueryMatcher::new(&query);
        let mut records = self.records.write().await;
        let mut summary = UpdateSummary::default();

        for record in records.iter_mut() {
            if matcher.matches(record)? {
                summary.matched_count += 1;
                let updated = apply_update(record, &update)?;

                if updated != *record {
                    summary.modified_count += 1;
                    *record = updated;
                }
            }
        }

        if summary.matched_count == 0 && upsert_requested(options) {
            let record = with_id(apply_update(&equality_fields(&query), &update)?);
            let id = record
                .get("_id")
                .cloned()
                .unwrap_or(Bson::Null);

            records.push(record);
            summary.upserted_count = 1;
            summary.upserted_id = Some(id);
        }

        Ok(summary)
    }

    async fn find(
        &self,
        query: Document,
        _options: &Document,
        find_options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let matcher = QueryMatcher::new(&query);
        let records = self.records.read().await;
        let mut matched = Vec::new();

        for record in records.iter() {
            if matcher.matches(record)? {
                matched.push(record.clone());
            }
        }

        if let Some(order_by) = &find_options.order_by {
            sort_records(&mut matched, order_by);
        }

        let mut result = matched
            .into_iter()
            .skip(find_options.effective_offset().unwrap_or(0) as usize)
            .take(
                find_options
                    .effective_limit()
                    .map(|limit| limit as usize)
                    .unwrap_or(usize::MAX),
            )
            .collect::<Vec<_>>();

        if let Some(fields) = &find_options.fields {
            result = result
                .iter()
                .map(|record| project(record, fields))
                .collect();
        }

        Ok(result)
    }
}

fn with_id(mut record: Document) -> Document {
    if !record.contains_key("_id") {
        record.insert("_id", ObjectId::new());
    }

    record
}

fn return_before(options: &Document) -> bool {
    matches!(options.get("returnDocument"), Some(Bson::String(s)) if s == "before")
}

fn upsert_requested(options: &Document) -> bool {
    matches!(options.get("upsert"), Some(Bson::Boolean(true)))
}

/// Applies an update document (`$set`, `$unset`, `$inc`) to a record.
///
/// A plain replacement document in an update position is rejected, matching
/// server behavior.
fn apply_update(record: &Document, update: &Document) -> StoreResult<Document> {
    let mut updated = record.clone();

    for (operator, operand) in update {
        let fields = operand
            .as_document()
            .ok_or_else(|| {
                StoreError::Driver(format!("{operator} requires a document operand"))
            })?;

        match operator.as_str() {
            "$set" => {
                for (field, value) in fields {
                    updated.insert(field, value.clone());
                }
            }
            "$unset" => {
                for field in fields.keys() {
                    updated.remove(field);
                }
            }
            "$inc" => {
                for (field, amount) in fields {
                    let incremented = increment(updated.get(field), amount)?;
                    updated.insert(field, incremented);
                }
            }
            other if other.starts_with('$') => {
                return Err(StoreError::Driver(format!(
                    "unsupported update operator {other}"
                )));
            }
            _ => {
                return Err(StoreError::Driver(
                    "update document must only contain update operators".to_string(),
                ));
            }
        }
    }

    Ok(updated)
}

fn increment(current: Option<&Bson>, amount: &Bson) -> StoreResult<Bson> {
    match (current.unwrap_or(&Bson::Int32(0)), amount) {
        (Bson::Int32(a), Bson::Int32(b)) => Ok(Bson::Int32(a + b)),
        (Bson::Int32(a), Bson::Int64(b)) => Ok(Bson::Int64(*a as i64 + b)),
        (Bson::Int64(a), Bson::Int32(b)) => Ok(Bson::Int64(a + *b as i64)),
        (Bson::Int64(a), Bson::Int64(b)) => Ok(Bson::Int64(a + b)),
        (a, b) => match (as_f64(a), as_f64(b)) {
            (Some(a), Some(b)) => Ok(Bson::Double(a + b)),
            _ => Err(StoreError::Driver(
                "$inc requires numeric values".to_string(),
            )),
        },
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(*v as f64),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

/// The plain equality fields of a query, used as the seed record for upserts.
fn equality_fields(query: &Document) -> Document {
    query
        .iter()
        .filter(|(field, condition)| {
            !field.starts_with('$')
                && !matches!(
                    condition,
                    Bson::Document(doc) if doc.keys().next().is_some_and(|k| k.starts_with('$'))
                )
        })
        .map(|(field, condition)| (field.clone(), condition.clone()))
        .collect()
}

/// Applies a projection specification to a record.
///
/// A specification with any truthy value is an inclusion projection (listed
/// fields plus `_id` unless explicitly excluded); an all-falsy specification
/// removes the listed fields.
fn project(record: &Document, fields: &Document) -> Document {
    let truthy = |value: &Bson| !matches!(value, Bson::Int32(0) | Bson::Int64(0) | Bson::Boolean(false) | Bson::Double(0.0));
    let inclusion = fields.values().any(truthy);

    if inclusion {
        record
            .iter()
            .filter(|(field, _)| {
                fields.get(field.as_str()).is_some_and(truthy)
                    || (field.as_str() == "_id"
                        && !fields.get("_id").is_some_and(|v| !truthy(v)))
            })
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    } else {
        record
            .iter()
            .filter(|(field, _)| !fields.contains_key(field.as_str()))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }
}
