//! MongoDB-backed [`VesselStore`].
//!
//! One `vessels` collection uniquely indexed on `vessel_id`, plus an
//! optional `vessel_events` collection uniquely indexed on
//! `(vessel_id, id)`. All writes are upserts or insert-only, so the store
//! handle can be shared freely across worker tasks.

use async_trait::async_trait;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, IndexModel, Namespace};
use seatrace_tracking_models::EventRecord;

use crate::{StoreError, VesselDoc, VesselStore};

/// Collection holding one summary document per vessel.
const VESSELS_COLLECTION: &str = "vessels";

/// Collection holding individual event documents, when enabled.
const EVENTS_COLLECTION: &str = "vessel_events";

/// Server selection timeout; a store that cannot be reached fails the
/// vessel task instead of stalling the run.
const SERVER_SELECTION_TIMEOUT_SECS: u64 = 10;

/// MongoDB implementation of [`VesselStore`].
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    vessels: mongodb::Collection<Document>,
    events: Option<mongodb::Collection<Document>>,
}

impl MongoStore {
    /// Connects to the store and binds the collections.
    ///
    /// The events collection handle is only created when
    /// `with_events_collection` is set; without it [`upsert_events`]
    /// writes nothing and reports zero.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Mongo`] if the URI is invalid or the client
    /// cannot be constructed.
    ///
    /// [`upsert_events`]: VesselStore::upsert_events
    pub async fn connect(
        uri: &str,
        db_name: &str,
        with_events_collection: bool,
    ) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_selection_timeout = Some(std::time::Duration::from_secs(
            SERVER_SELECTION_TIMEOUT_SECS,
        ));

        let client = Client::with_options(options)?;
        let db = client.database(db_name);
        let vessels = db.collection::<Document>(VESSELS_COLLECTION);
        let events = with_events_collection.then(|| db.collection::<Document>(EVENTS_COLLECTION));

        Ok(Self {
            client,
            vessels,
            events,
        })
    }

    /// Builds the event document: the raw entry at the top level with the
    /// dataset tag and vessel identity merged in, mirroring the vessel
    /// summary's field names.
    fn event_document(
        vessel_id: &str,
        name: Option<&str>,
        event: &EventRecord,
        now: mongodb::bson::DateTime,
    ) -> Result<Document, StoreError> {
        let mut doc = match mongodb::bson::to_bson(&event.fields)? {
            Bson::Document(doc) => doc,
            other => doc! { "payload": other },
        };
        doc.insert("dataset_id", &event.dataset_id);
        doc.insert("vessel_id", vessel_id);
        doc.insert("name", name.map_or(Bson::Null, |n| Bson::String(n.to_owned())));
        doc.insert("updated_at", now);
        Ok(doc)
    }

    /// Builds one unordered-bulk write model per event.
    fn event_write_models(
        namespace: &Namespace,
        vessel_id: &str,
        name: Option<&str>,
        events: &[EventRecord],
    ) -> Result<Vec<mongodb::options::WriteModel>, StoreError> {
        use mongodb::options::{UpdateOneModel, WriteModel};

        let now = mongodb::bson::DateTime::now();
        let mut models = Vec::with_capacity(events.len());

        for event in events {
            let doc = Self::event_document(vessel_id, name, event, now)?;

            let model = if let Some(event_id) = event.event_id.as_deref() {
                UpdateOneModel::builder()
                    .namespace(namespace.clone())
                    .filter(doc! { "vessel_id": vessel_id, "id": event_id })
                    .update(doc! { "$set": doc })
                    .upsert(true)
                    .build()
            } else {
                // No stable id: a fresh disambiguator makes the filter
                // unmatchable, so the upsert always inserts and repeated
                // runs never merge distinct anonymous events.
                let rand = uuid::Uuid::new_v4().simple().to_string();
                UpdateOneModel::builder()
                    .namespace(namespace.clone())
                    .filter(doc! { "vessel_id": vessel_id, "id": Bson::Null, "_rand": rand })
                    .update(doc! { "$setOnInsert": doc })
                    .upsert(true)
                    .build()
            };

            models.push(WriteModel::UpdateOne(model));
        }

        Ok(models)
    }
}

#[async_trait]
impl VesselStore for MongoStore {
    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.vessels
            .create_indexes(vec![
                IndexModel::builder()
                    .keys(doc! { "vessel_id": 1 })
                    .options(
                        IndexOptions::builder()
                            .unique(true)
                            .name("vessel_id_unique".to_owned())
                            .build(),
                    )
                    .build(),
                IndexModel::builder()
                    .keys(doc! { "name": 1 })
                    .options(IndexOptions::builder().name("name".to_owned()).build())
                    .build(),
            ])
            .await?;

        if let Some(events) = &self.events {
            events
                .create_indexes(vec![
                    IndexModel::builder()
                        .keys(doc! { "vessel_id": 1, "id": 1 })
                        .options(
                            IndexOptions::builder()
                                .unique(true)
                                .name("vessel_event_unique".to_owned())
                                .build(),
                        )
                        .build(),
                    IndexModel::builder()
                        .keys(doc! { "vessel_id": 1 })
                        .options(IndexOptions::builder().name("vessel_id".to_owned()).build())
                        .build(),
                ])
                .await?;
        }

        Ok(())
    }

    async fn upsert_vessel(&self, doc: &VesselDoc) -> Result<(), StoreError> {
        let mut update = mongodb::bson::to_document(doc)?;
        update.insert("updated_at", mongodb::bson::DateTime::now());

        self.vessels
            .update_one(
                doc! { "vessel_id": &doc.vessel_id },
                doc! { "$set": update },
            )
            .upsert(true)
            .await?;

        Ok(())
    }

    async fn upsert_events(
        &self,
        vessel_id: &str,
        name: Option<&str>,
        events: &[EventRecord],
    ) -> Result<u64, StoreError> {
        let Some(collection) = &self.events else {
            return Ok(0);
        };
        if events.is_empty() {
            return Ok(0);
        }

        let namespace = collection.namespace();
        let models = Self::event_write_models(&namespace, vessel_id, name, events)?;

        match self.client.bulk_write(models).ordered(false).await {
            Ok(result) => {
                Ok(result.upserted_count.unsigned_abs() + result.modified_count.unsigned_abs())
            }
            Err(error) => {
                if matches!(*error.kind, mongodb::error::ErrorKind::BulkWrite(_)) {
                    // Partial batch failure (e.g. a uniqueness race with a
                    // concurrent run). Exact per-item outcomes are not
                    // recoverable here; report the attempted count.
                    log::warn!(
                        "[{vessel_id}] partial bulk write failure, reporting attempted count \
                         of {}: {error}",
                        events.len()
                    );
                    Ok(events.len() as u64)
                } else {
                    Err(error.into())
                }
            }
        }
    }
}
