//! Wire-level request payloads accepted by the store adapter.
//!
//! A [`Request`] is the transport-agnostic shape an embedding host hands to the
//! adapter: an optional filter `query`, an opaque `id`, a `data` payload (one
//! document or an ordered batch) and optional [`FindOptions`]. The typed
//! accessors fail fast with [`StoreError::InvalidData`] when a required field
//! is absent, instead of silently dispatching an incomplete driver call.

use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// A CRUD request as received from an embedding host.
///
/// All fields are optional at the wire level; each operation extracts the
/// fields it needs through the typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Request {
    /// Filter criteria, mapping field names to match conditions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Document>,
    /// Opaque identifier, converted to the driver's native representation before use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// A single record or an ordered sequence of records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bson>,
    /// Query-time options for `find`, distinct from per-operation driver config.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<FindOptions>,
}

impl Request {
    /// Returns the filter criteria.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidData`] if the request carries no query.
    pub fn query(&self) -> StoreResult<Document> {
        self.query
            .clone()
            .ok_or_else(|| StoreError::InvalidData("request is missing a query".into()))
    }

    /// Returns the record identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidData`] if the request carries no id.
    pub fn id(&self) -> StoreResult<&str> {
        self.id
            .as_deref()
            .ok_or_else(|| StoreError::InvalidData("request is missing an id".into()))
    }

    /// Returns the data payload as one record or an ordered batch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidData`] if the request carries no data, or
    /// if the data is neither a document nor an array of documents.
    pub fn payload(&self) -> StoreResult<Payload> {
        self.data
            .clone()
            .ok_or_else(|| StoreError::InvalidData("request is missing data".into()))
            .and_then(Payload::try_from)
    }

    /// Returns the data payload as a single record.
    ///
    /// Used by the update and replace operations, which act on exactly one
    /// record shape.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidData`] if the data is absent or not a
    /// single document.
    pub fn document(&self) -> StoreResult<Document> {
        match self.payload()? {
            Payload::One(document) => Ok(document),
            Payload::Many(_) => Err(StoreError::InvalidData(
                "expected a single record, got a sequence".into(),
            )),
        }
    }
}

/// The data payload of a create request: a single record or an ordered batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    /// An ordered sequence of records for bulk insert.
    Many(Vec<Document>),
    /// A single record.
    One(Document),
}

impl TryFrom<Bson> for Payload {
    type Error = StoreError;

    /// Converts a raw BSON value into a payload.
    ///
    /// Anything that is neither a document nor an array of documents is
    /// rejected outright, so a malformed create request fails fast instead of
    /// performing no driver call at all.
    fn try_from(value: Bson) -> StoreResult<Self> {
        match value {
            Bson::Document(document) => Ok(Payload::One(document)),
            Bson::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Bson::Document(document) => Ok(document),
                    other => Err(StoreError::InvalidData(format!(
                        "bulk data must contain only records, got {:?}",
                        other.element_type()
                    ))),
                })
                .collect::<StoreResult<Vec<Document>>>()
                .map(Payload::Many),
            other => Err(StoreError::InvalidData(format!(
                "data must be a record or a sequence of records, got {:?}",
                other.element_type()
            ))),
        }
    }
}

/// Query-time options for the `find` operation.
///
/// Each option is applied only when present; the adapter echoes the options it
/// applied back in the find result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FindOptions {
    /// Maximum number of records to return. Zero means unlimited, same as absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    /// Number of records to skip before collecting results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Projection specification, restricting the fields of returned records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Document>,
    /// Sort specification, mapping field names to a direction (`1` or `-1`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<Document>,
}

impl FindOptions {
    /// Returns the limit if it is present and non-zero.
    pub fn effective_limit(&self) -> Option<i64> {
        self.limit.filter(|limit| *limit > 0)
    }

    /// Returns the offset if it is present and non-zero.
    pub fn effective_offset(&self) -> Option<u64> {
        self.offset.filter(|offset| *offset > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn payload_accepts_a_single_record() {
        let payload = Payload::try_from(Bson::Document(doc! { "name": "a" })).unwrap();

        assert_eq!(payload, Payload::One(doc! { "name": "a" }));
    }

    #[test]
    fn payload_accepts_an_ordered_sequence() {
        let payload = Payload::try_from(Bson::Array(vec![
            doc! { "n": 1 }.into(),
            doc! { "n": 2 }.into(),
        ]))
        .unwrap();

        assert_eq!(payload, Payload::Many(vec![doc! { "n": 1 }, doc! { "n": 2 }]));
    }

    #[test]
    fn payload_rejects_scalars() {
        let err = Payload::try_from(Bson::Int32(7)).unwrap_err();

        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[test]
    fn payload_rejects_mixed_sequences() {
        let err = Payload::try_from(Bson::Array(vec![
            doc! { "n": 1 }.into(),
            Bson::String("stray".into()),
        ]))
        .unwrap_err();

        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[test]
    fn accessors_fail_fast_on_missing_fields() {
        let request = Request::default();

        assert!(matches!(request.query(), Err(StoreError::InvalidData(_))));
        assert!(matches!(request.id(), Err(StoreError::InvalidData(_))));
        assert!(matches!(request.payload(), Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn find_options_use_wire_names() {
        let options: FindOptions = serde_json::from_value(serde_json::json!({
            "limit": 2,
            "offset": 1,
            "orderBy": { "name": 1 }
        }))
        .unwrap();

        assert_eq!(options.limit, Some(2));
        assert_eq!(options.offset, Some(1));
        assert_eq!(options.order_by, Some(doc! { "name": 1 }));
        assert_eq!(options.fields, None);
    }

    #[test]
    fn zero_limit_and_offset_are_treated_as_absent() {
        let options = FindOptions {
            limit: Some(0),
            offset: Some(0),
            ..Default::default()
        };

        assert_eq!(options.effective_limit(), None);
        assert_eq!(options.effective_offset(), None);
    }
}
