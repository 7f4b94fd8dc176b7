use async_trait::async_trait;
use bson::{Bson, Document, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection,
    options::{
        ClientOptions, DeleteOptions, FindOneAndDeleteOptions, FindOneAndReplaceOptions,
        FindOneAndUpdateOptions, FindOneOptions, FindOptions as MongoFindOptions, UpdateOptions,
    },
};
use tracing::debug;

use docstore_core::{
    driver::{DocumentDriver, DriverBuilder},
    error::{StoreError, StoreResult},
    request::FindOptions,
    response::UpdateSummary,
};

use crate::options::DriverConfig;

/// MongoDB-backed driver for one collection.
#[derive(Debug)]
pub struct MongoDriver {
    collection: Collection<Document>,
}

impl MongoDriver {
    pub fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }

    pub fn builder(dsn: &str, database: &str, collection: &str) -> MongoDriverBuilder {
        MongoDriverBuilder::new(dsn, database, collection)
    }
}

fn driver_err(err: mongodb::error::Error) -> StoreError {
    StoreError::Driver(err.to_string())
}

#[async_trait]
impl DocumentDriver for MongoDriver {
    fn native_id(&self, id: &str) -> StoreResult<Bson> {
        Ok(Bson::ObjectId(
            ObjectId::parse_str(id).map_err(|e| StoreError::InvalidId(e.to_string()))?,
        ))
    }

    async fn insert_one(&self, data: Document, _options: &Document) -> StoreResult<Bson> {
        Ok(self
            .collection
            .insert_one(data)
            .await
            .map_err(driver_err)?
            .inserted_id)
    }

    async fn insert_many(
        &self,
        data: Vec<Document>,
        _options: &Document,
    ) -> StoreResult<Vec<Bson>> {
        // The driver reports inserted ids keyed by input index; callers get
        // them back as an input-ordered sequence.
        let mut ids = self
            .collection
            .insert_many(data)
            .await
            .map_err(driver_err)?
            .inserted_ids
            .into_iter()
            .collect::<Vec<(usize, Bson)>>();
        ids.sort_by_key(|(index, _)| *index);

        Ok(ids.into_iter().map(|(_, id)| id).collect())
    }

    async fn delete_many(&self, query: Document, _options: &Document) -> StoreResult<u64> {
        let result = self
            .collection
            .delete_many(query)
            .with_options(DeleteOptions::default())
            .await
            .map_err(driver_err)?;
        debug!(deleted = result.deleted_count, "deleted records");

        Ok(result.deleted_count)
    }

    async fn find_one(
        &self,
        query: Document,
        options: &Document,
    ) -> StoreResult<Option<Document>> {
        let config = DriverConfig::new(options);

        self.collection
            .find_one(query)
            .with_options(
                FindOneOptions::builder()
                    .projection(config.projection())
                    .sort(config.sort())
                    .build(),
            )
            .await
            .map_err(driver_err)
    }

    async fn find_one_and_delete(
        &self,
        query: Document,
        options: &Document,
    ) -> StoreResult<Option<Document>> {
        let config = DriverConfig::new(options);

        self.collection
            .find_one_and_delete(query)
            .with_options(
                FindOneAndDeleteOptions::builder()
                    .projection(config.projection())
                    .sort(config.sort())
                    .build(),
            )
            .await
            .map_err(driver_err)
    }

    async fn find_one_and_update(
        &self,
        query: Document,
        update: Document,
        options: &Document,
    ) -> StoreResult<Option<Document>> {
        let config = DriverConfig::new(options);

        self.collection
            .find_one_and_update(query, update)
            .with_options(
                FindOneAndUpdateOptions::builder()
                    .upsert(config.upsert())
                    .projection(config.projection())
                    .sort(config.sort())
                    .return_document(config.return_document())
                    .build(),
            )
            .await
            .map_err(driver_err)
    }

    async fn find_one_and_replace(
        &self,
        query: Document,
        replacement: Document,
        options: &Document,
    ) -> StoreResult<Option<Document>> {
        let config = DriverConfig::new(options);

        self.collection
            .find_one_and_replace(query, replacement)
            .with_options(
                FindOneAndReplaceOptions::builder()
                    .upsert(config.upsert())
                    .projection(config.projection())
                    .sort(config.sort())
                    .return_document(config.return_document())
                    .build(),
            )
            .await
            .map_err(driver_err)
    }

    async fn update_many(
        &self,
        query: Document,
        update: Document,
        options: &Document,
    ) -> StoreResult<UpdateSummary> {
        let config = DriverConfig::new(options);

        let result = self
            .collection
            .update_many(query, update)
            .with_options(UpdateOptions::builder().upsert(config.upsert()).build())
            .await
            .map_err(driver_err)?;

        // This driver version reports no upserted count; derive it from the
        // upserted id so callers always see the same summary shape.
        Ok(UpdateSummary {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: result.upserted_id.is_some() as u64,
            upserted_id: result.upserted_id,
        })
    }

    async fn find(
        &self,
        query: Document,
        options: &Document,
        find_options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let config = DriverConfig::new(options);

        // Request-level find options take precedence over the configured
        // projection and sort.
        let cursor_options = MongoFindOptions::builder()
            .limit(find_options.effective_limit())
            .skip(find_options.effective_offset())
            .projection(find_options.fields.clone().or(config.projection()))
            .sort(find_options.order_by.clone().or(config.sort()))
            .build();

        self.collection
            .find(query)
            .with_options(cursor_options)
            .await
            .map_err(driver_err)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(driver_err)
    }
}

/// Builder for [`MongoDriver`] instances connecting by DSN.
pub struct MongoDriverBuilder {
    dsn: String,
    database: String,
    collection: String,
    config: Document,
}

impl MongoDriverBuilder {
    pub fn new(dsn: &str, database: &str, collection: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
            collection: collection.to_string(),
            config: Document::new(),
        }
    }

    /// Sets driver-level configuration applied to the client connection.
    pub fn with_config(mut self, config: Document) -> Self {
        self.config = config;
        self
    }
}

#[async_trait]
impl DriverBuilder for MongoDriverBuilder {
    type Driver = MongoDriver;

    async fn build(self) -> StoreResult<Self::Driver> {
        let mut client_options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| StoreError::Initialization(e.to_string()))?;

        if let Some(Bson::String(app_name)) = self.config.get("appName") {
            client_options.app_name = Some(app_name.clone());
        }

        let client = Client::with_options(client_options)
            .map_err(|e| StoreError::Initialization(e.to_string()))?;

        Ok(MongoDriver::new(
            client
                .database(&self.database)
                .collection(&self.collection),
        ))
    }
}
