//! Query matching for in-memory record filtering.
//!
//! This module evaluates MongoDB-style query documents against stored
//! records: plain fields match by equality, operator documents support the
//! comparison subset (`$eq`, `$ne`, `$gt`, `$gte`, `$lt`, `$lte`, `$in`,
//! `$nin`, `$exists`), and top-level fields combine with an implicit AND.

use std::{cmp::Ordering, collections::HashMap};

use bson::{Bson, Document, datetime::DateTime, oid::ObjectId};

use docstore_core::error::{StoreError, StoreResult};

/// Type-erased, comparable representation of BSON values.
///
/// Wraps BSON values for equality and ordering during query evaluation.
/// Numeric types are normalized to f64 so mixed-width comparisons behave.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value (all integers and floats normalized to f64)
    Number(f64),
    /// DateTime value
    DateTime(DateTime),
    /// Record identifier
    ObjectId(&'a ObjectId),
    /// String value
    String(&'a str),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
    /// Map/Object of comparable values
    Map(HashMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::ObjectId(value) => Comparable::ObjectId(value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr.iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>(),
            ),
            Bson::Document(doc) => Comparable::Map(
                doc.iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>(),
            ),
            _ => Comparable::Null, // Other types are not comparable
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Evaluates a query document against stored records.
pub(crate) struct QueryMatcher<'a> {
    query: &'a Document,
}

impl<'a> QueryMatcher<'a> {
    pub fn new(query: &'a Document) -> Self {
        Self { query }
    }

    /// Returns whether the record satisfies every top-level query field.
    pub fn matches(&self, record: &Document) -> StoreResult<bool> {
        for (field, condition) in self.query {
            if !Self::matches_field(record.get(field), condition)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn matches_field(value: Option<&Bson>, condition: &Bson) -> StoreResult<bool> {
        match condition {
            Bson::Document(operators) if is_operator_document(operators) => {
                for (operator, operand) in operators {
                    if !Self::matches_operator(value, operator, operand)? {
                        return Ok(false);
                    }
                }

                Ok(true)
            }
            expected => Ok(match value {
                Some(actual) => Comparable::from(actual) == Comparable::from(expected),
                None => matches!(expected, Bson::Null),
            }),
        }
    }

    fn matches_operator(value: Option<&Bson>, operator: &str, operand: &Bson) -> StoreResult<bool> {
        if operator == "$exists" {
            return Ok(value.is_some() == operand.as_bool().unwrap_or(true));
        }

        let Some(actual) = value else {
            // A missing field fails every comparison except inequality.
            return Ok(matches!(operator, "$ne" | "$nin"));
        };

        match operator {
            "$eq" => Ok(Comparable::from(actual) == Comparable::from(operand)),
            "$ne" => Ok(Comparable::from(actual) != Comparable::from(operand)),
            "$gt" | "$gte" | "$lt" | "$lte" => {
                match Comparable::from(actual).partial_cmp(&Comparable::from(operand)) {
                    Some(ordering) => Ok(match operator {
                        "$gt" => ordering == Ordering::Greater,
                        "$gte" => ordering != Ordering::Less,
                        "$lt" => ordering == Ordering::Less,
                        "$lte" => ordering != Ordering::Greater,
                        _ => unreachable!(),
                    }),
                    None => Ok(false),
                }
            }
            "$in" => match operand {
                Bson::Array(candidates) => Ok(candidates
                    .iter()
                    .any(|candidate| Comparable::from(actual) == Comparable::from(candidate))),
                _ => Err(StoreError::Driver(
                    "$in requires an array operand".to_string(),
                )),
            },
            "$nin" => match operand {
                Bson::Array(candidates) => Ok(!candidates
                    .iter()
                    .any(|candidate| Comparable::from(actual) == Comparable::from(candidate))),
                _ => Err(StoreError::Driver(
                    "$nin requires an array operand".to_string(),
                )),
            },
            unsupported => Err(StoreError::Driver(format!(
                "unsupported query operator {unsupported}"
            ))),
        }
    }
}

fn is_operator_document(document: &Document) -> bool {
    document
        .keys()
        .next()
        .is_some_and(|key| key.starts_with('$'))
}

/// Sorts records in place by the fields of a sort specification.
///
/// Directions follow the wire convention: a negative value sorts descending,
/// anything else ascending. Fields compare in specification order.
pub(crate) fn sort_records(records: &mut [Document], order_by: &Document) {
    records.sort_by(|a, b| {
        for (field, direction) in order_by {
            let left = a
                .get(field)
                .map(Comparable::from)
                .unwrap_or(Comparable::Null);
            let right = b
                .get(field)
                .map(Comparable::from)
                .unwrap_or(Comparable::Null);

            let ordering = match descending(direction) {
                false => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
                true => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
            };

            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        Ordering::Equal
    });
}

fn descending(direction: &Bson) -> bool {
    match direction {
        Bson::Int32(value) => *value < 0,
        Bson::Int64(value) => *value < 0,
        Bson::Double(value) => *value < 0.0,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn matches(query: &Document, record: &Document) -> bool {
        QueryMatcher::new(query).matches(record).unwrap()
    }

    #[test]
    fn plain_fields_match_by_equality() {
        let record = doc! { "name": "Alice", "age": 30 };

        assert!(matches(&doc! { "name": "Alice" }, &record));
        assert!(matches(&doc! { "name": "Alice", "age": 30 }, &record));
        assert!(!matches(&doc! { "name": "Bob" }, &record));
        assert!(!matches(&doc! { "missing": 1 }, &record));
    }

    #[test]
    fn numeric_comparison_crosses_integer_widths() {
        let record = doc! { "age": Bson::Int64(30) };

        assert!(matches(&doc! { "age": 30 }, &record));
        assert!(matches(&doc! { "age": { "$gte": 30.0 } }, &record));
        assert!(matches(&doc! { "age": { "$lt": 31 } }, &record));
        assert!(!matches(&doc! { "age": { "$gt": 30 } }, &record));
    }

    #[test]
    fn object_ids_compare_by_value() {
        let id = ObjectId::new();
        let record = doc! { "_id": id };

        assert!(matches(&doc! { "_id": id }, &record));
        assert!(!matches(&doc! { "_id": ObjectId::new() }, &record));
    }

    #[test]
    fn in_and_nin_check_membership() {
        let record = doc! { "state": "open" };

        assert!(matches(&doc! { "state": { "$in": ["open", "closed"] } }, &record));
        assert!(!matches(&doc! { "state": { "$nin": ["open"] } }, &record));
    }

    #[test]
    fn exists_checks_field_presence() {
        let record = doc! { "name": "Alice" };

        assert!(matches(&doc! { "name": { "$exists": true } }, &record));
        assert!(matches(&doc! { "email": { "$exists": false } }, &record));
        assert!(!matches(&doc! { "email": { "$exists": true } }, &record));
    }

    #[test]
    fn unsupported_operators_are_rejected() {
        let result = QueryMatcher::new(&doc! { "name": { "$regex": "^A" } })
            .matches(&doc! { "name": "Alice" });

        assert!(matches!(result, Err(StoreError::Driver(_))));
    }

    #[test]
    fn sort_orders_by_direction() {
        let mut records = vec![doc! { "n": 2 }, doc! { "n": 3 }, doc! { "n": 1 }];

        sort_records(&mut records, &doc! { "n": 1 });
        assert_eq!(records[0], doc! { "n": 1 });

        sort_records(&mut records, &doc! { "n": -1 });
        assert_eq!(records[0], doc! { "n": 3 });
    }
}
