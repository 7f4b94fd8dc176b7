use bson::{Bson, Document, doc, oid::ObjectId};

use docstore_core::{driver::DocumentDriver, error::StoreError, request::FindOptions};
use docstore_memory::MemoryDriver;

fn none() -> Document {
    Document::new()
}

async fn seed(driver: &MemoryDriver, count: i32) -> Vec<Bson> {
    let data = (1..=count)
        .map(|n| doc! { "n": n, "parity": n % 2 })
        .collect();

    driver.insert_many(data, &none()).await.unwrap()
}

#[tokio::test]
async fn insert_assigns_object_ids_in_input_order() {
    let driver = MemoryDriver::new();
    let ids = seed(&driver, 3).await;

    assert_eq!(ids.len(), 3);
    assert!(ids.iter().all(|id| matches!(id, Bson::ObjectId(_))));

    let records = driver.records().await;
    assert_eq!(records[0].get("n"), Some(&Bson::Int32(1)));
    assert_eq!(records[2].get("n"), Some(&Bson::Int32(3)));
}

#[tokio::test]
async fn insert_keeps_caller_supplied_ids() {
    let driver = MemoryDriver::new();
    let id = ObjectId::new();

    let inserted = driver
        .insert_one(doc! { "_id": id, "n": 1 }, &none())
        .await
        .unwrap();

    assert_eq!(inserted, Bson::ObjectId(id));
}

#[tokio::test]
async fn update_many_counts_matched_and_modified() {
    let driver = MemoryDriver::new();
    seed(&driver, 4).await;

    let summary = driver
        .update_many(
            doc! { "parity": 0 },
            doc! { "$set": { "flagged": true } },
            &none(),
        )
        .await
        .unwrap();

    assert_eq!(summary.matched_count, 2);
    assert_eq!(summary.modified_count, 2);
    assert_eq!(summary.upserted_count, 0);
    assert_eq!(summary.upserted_id, None);

    // Re-applying the same update matches but modifies nothing.
    let summary = driver
        .update_many(
            doc! { "parity": 0 },
            doc! { "$set": { "flagged": true } },
            &none(),
        )
        .await
        .unwrap();

    assert_eq!(summary.matched_count, 2);
    assert_eq!(summary.modified_count, 0);
}

#[tokio::test]
async fn update_many_upserts_when_nothing_matches() {
    let driver = MemoryDriver::new();

    let summary = driver
        .update_many(
            doc! { "name": "ghost" },
            doc! { "$set": { "seen": 1 } },
            &doc! { "upsert": true },
        )
        .await
        .unwrap();

    assert_eq!(summary.matched_count, 0);
    assert_eq!(summary.upserted_count, 1);
    let id = summary.upserted_id.expect("upserted id");

    let record = driver
        .find_one(doc! { "_id": id }, &none())
        .await
        .unwrap()
        .expect("upserted record");

    assert_eq!(record.get("name"), Some(&Bson::String("ghost".into())));
    assert_eq!(record.get("seen"), Some(&Bson::Int32(1)));
}

#[tokio::test]
async fn plain_replacement_in_update_position_is_rejected() {
    let driver = MemoryDriver::new();
    seed(&driver, 1).await;

    let result = driver
        .update_many(doc! { "n": 1 }, doc! { "n": 9 }, &none())
        .await;

    assert!(matches!(result, Err(StoreError::Driver(_))));
}

#[tokio::test]
async fn find_applies_sort_offset_limit_and_projection() {
    let driver = MemoryDriver::new();
    seed(&driver, 5).await;

    let options = FindOptions {
        limit: Some(2),
        offset: Some(1),
        fields: Some(doc! { "n": 1, "_id": 0 }),
        order_by: Some(doc! { "n": -1 }),
    };

    let result = driver
        .find(doc! {}, &none(), &options)
        .await
        .unwrap();

    // Descending 5..1, skip one, take two, n only.
    assert_eq!(result, vec![doc! { "n": 4 }, doc! { "n": 3 }]);
}

#[tokio::test]
async fn find_one_and_update_returns_pre_image_on_request() {
    let driver = MemoryDriver::new();
    seed(&driver, 1).await;

    let before = driver
        .find_one_and_update(
            doc! { "n": 1 },
            doc! { "$inc": { "n": 10 } },
            &doc! { "returnDocument": "before" },
        )
        .await
        .unwrap()
        .expect("matched record");

    assert_eq!(before.get("n"), Some(&Bson::Int32(1)));

    let after = driver
        .find_one(doc! { "n": 11 }, &none())
        .await
        .unwrap();
    assert!(after.is_some());
}

#[tokio::test]
async fn find_one_and_replace_preserves_the_identifier() {
    let driver = MemoryDriver::new();
    let ids = seed(&driver, 1).await;

    let replaced = driver
        .find_one_and_replace(doc! { "n": 1 }, doc! { "name": "fresh" }, &none())
        .await
        .unwrap()
        .expect("matched record");

    assert_eq!(replaced.get("_id"), Some(&ids[0]));
    assert_eq!(replaced.get("name"), Some(&Bson::String("fresh".into())));
    assert!(replaced.get("n").is_none());
}

#[tokio::test]
async fn delete_many_removes_only_matching_records() {
    let driver = MemoryDriver::new();
    seed(&driver, 5).await;

    let deleted = driver
        .delete_many(doc! { "n": { "$lte": 2 } }, &none())
        .await
        .unwrap();

    assert_eq!(deleted, 2);
    assert_eq!(driver.records().await.len(), 3);
}
