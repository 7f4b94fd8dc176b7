//! Per-operation driver configuration for the store adapter.
//!
//! Callers may supply driver-specific flags (write concern, projection, and so on)
//! scoped to a single CRUD operation. After construction every one of the nine
//! operation names resolves to a concrete configuration document, even when the
//! caller supplied none, so a driver call never sees a missing config.
//!
//! Option values are read-only after construction. Operations that need to force
//! a flag (such as `replace` forcing `upsert`) compute a fresh merged document
//! per call instead of writing back into the stored configuration.

use bson::Document;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The nine CRUD operations exposed by a store adapter.
///
/// Serialized names use the camelCase wire form (`removeById`, `orderBy`-style)
/// so the enum doubles as the key type in configuration files and RPC payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Create,
    Remove,
    RemoveById,
    Update,
    UpdateById,
    Find,
    FindById,
    Replace,
    ReplaceById,
}

impl Operation {
    /// All nine operations, in their canonical order.
    pub const ALL: [Operation; 9] = [
        Operation::Create,
        Operation::Remove,
        Operation::RemoveById,
        Operation::Update,
        Operation::UpdateById,
        Operation::Find,
        Operation::FindById,
        Operation::Replace,
        Operation::ReplaceById,
    ];

    /// Returns the camelCase wire name of this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Remove => "remove",
            Operation::RemoveById => "removeById",
            Operation::Update => "update",
            Operation::UpdateById => "updateById",
            Operation::Find => "find",
            Operation::FindById => "findById",
            Operation::Replace => "replace",
            Operation::ReplaceById => "replaceById",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Driver configuration scoped per CRUD operation.
///
/// Each field holds the driver-specific flags for one operation. Every field
/// defaults to an empty document, so deserializing a partial configuration
/// (or none at all) still yields a config entry for all nine operations.
///
/// # Example
///
/// ```ignore
/// use docstore_core::options::{Operation, StoreOptions};
/// use bson::doc;
///
/// let options = StoreOptions {
///     find: doc! { "maxTimeMS": 500 },
///     ..Default::default()
/// };
/// assert!(options.operation(Operation::Create).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreOptions {
    pub create: Document,
    pub remove: Document,
    pub remove_by_id: Document,
    pub update: Document,
    pub update_by_id: Document,
    pub find: Document,
    pub find_by_id: Document,
    pub replace: Document,
    pub replace_by_id: Document,
}

impl StoreOptions {
    /// Returns the configuration for the given operation.
    ///
    /// Every operation has a configuration entry; an operation the caller never
    /// configured yields an empty document.
    pub fn operation(&self, operation: Operation) -> &Document {
        match operation {
            Operation::Create => &self.create,
            Operation::Remove => &self.remove,
            Operation::RemoveById => &self.remove_by_id,
            Operation::Update => &self.update,
            Operation::UpdateById => &self.update_by_id,
            Operation::Find => &self.find,
            Operation::FindById => &self.find_by_id,
            Operation::Replace => &self.replace,
            Operation::ReplaceById => &self.replace_by_id,
        }
    }
}

/// Top-level adapter configuration with two optional namespaces.
///
/// `driver` carries driver-level flags (connection tuning and the like) and is
/// interpreted by the driver implementation. `store` carries the per-operation
/// configuration passed through on each call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterOptions {
    pub driver: Document,
    pub store: StoreOptions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn every_operation_has_a_config_after_default_construction() {
        let options = StoreOptions::default();

        for operation in Operation::ALL {
            assert!(
                options.operation(operation).is_empty(),
                "expected empty config for {operation}",
            );
        }
    }

    #[test]
    fn partial_deserialization_fills_missing_operations() {
        let options: StoreOptions = serde_json::from_value(serde_json::json!({
            "removeById": { "maxTimeMS": 200 }
        }))
        .unwrap();

        assert_eq!(
            options.operation(Operation::RemoveById),
            &doc! { "maxTimeMS": 200 }
        );
        assert!(options.operation(Operation::Replace).is_empty());
        assert!(options.operation(Operation::Create).is_empty());
    }

    #[test]
    fn operation_wire_names_are_camel_case() {
        assert_eq!(
            serde_json::to_value(Operation::RemoveById).unwrap(),
            serde_json::json!("removeById")
        );
        assert_eq!(Operation::ReplaceById.as_str(), "replaceById");
        assert_eq!(Operation::ALL.len(), 9);
    }

    #[test]
    fn adapter_options_namespaces_default_to_empty() {
        let options: AdapterOptions = serde_json::from_value(serde_json::json!({})).unwrap();

        assert!(options.driver.is_empty());
        assert_eq!(options.store, StoreOptions::default());
    }
}
