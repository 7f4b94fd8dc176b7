//! Normalized, driver-independent result shapes returned to callers.
//!
//! The adapter never hands a raw driver response back to the caller. Every
//! operation maps its driver reply into one of the shapes in this module, so
//! callers see the same fields regardless of driver version quirks (such as
//! differing names for inserted/updated/deleted counts).

use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::request::FindOptions;

/// Result of a `create` operation.
///
/// Bulk inserts yield the ordered identifiers of every inserted record; a
/// single insert yields its identifier in stringified form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreateResult {
    /// Identifiers of a bulk insert, in input order.
    Many { ids: Vec<Bson> },
    /// Stringified identifier of a single insert.
    One { id: String },
}

/// Result of a `remove` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveResult {
    /// Number of records the delete matched and removed.
    pub deleted_count: u64,
}

/// Normalized summary of a multi-record write.
///
/// This is both the driver-side reply shape for `update_many` and the result
/// of the `replace` operation. It always serializes to exactly these four
/// keys; `upserted_id` stays present as `null` when no upsert happened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
    /// Number of records the filter matched.
    pub matched_count: u64,
    /// Number of records actually modified.
    pub modified_count: u64,
    /// Number of records inserted through upsert (zero or one).
    pub upserted_count: u64,
    /// Identifier of the upserted record, if any.
    pub upserted_id: Option<Bson>,
}

/// Result of a `find` operation: the matching records plus an echo of the
/// find options that were applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindResult {
    /// Records matching the query, in driver order.
    pub result: Vec<Document>,
    /// The find options this query ran with, echoed back to the caller.
    #[serde(flatten)]
    pub options: FindOptions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn update_summary_serializes_to_exactly_four_keys() {
        let summary = UpdateSummary {
            matched_count: 3,
            modified_count: 2,
            upserted_count: 0,
            upserted_id: None,
        };

        let value = serde_json::to_value(&summary).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 4);
        assert_eq!(object["matchedCount"], 3);
        assert_eq!(object["modifiedCount"], 2);
        assert_eq!(object["upsertedCount"], 0);
        assert!(object["upsertedId"].is_null());
    }

    #[test]
    fn create_results_take_distinct_shapes() {
        let one = serde_json::to_value(CreateResult::One { id: "abc".into() }).unwrap();
        let many = serde_json::to_value(CreateResult::Many {
            ids: vec![Bson::Int32(1), Bson::Int32(2)],
        })
        .unwrap();

        assert_eq!(one, serde_json::json!({ "id": "abc" }));
        assert_eq!(many, serde_json::json!({ "ids": [1, 2] }));
    }

    #[test]
    fn find_result_echoes_applied_options() {
        let result = FindResult {
            result: vec![doc! { "n": 2 }],
            options: FindOptions {
                limit: Some(2),
                offset: Some(1),
                ..Default::default()
            },
        };

        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["limit"], 2);
        assert_eq!(value["offset"], 1);
        assert_eq!(value["result"], serde_json::json!([{ "n": 2 }]));
        assert!(value.get("fields").is_none());
    }
}
