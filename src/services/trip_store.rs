//! Trip Store
//!
//! Thin persistence layer over the `Trips` collection. Trips are stored as
//! whole documents with their itinerary embedded, so every update is a full
//! replace: load, mutate through the itinerary manager, save.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Client, Collection};

use crate::models::trip::{Trip, TripStatus};

const DATABASE: &str = "FindMyTravel";
const COLLECTION: &str = "Trips";
const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 100;

#[derive(Debug)]
pub enum StoreError {
    /// The trip was never inserted, so there is no document to replace.
    MissingId,
    Database(mongodb::error::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::MissingId => write!(f, "trip has no id yet; insert it first"),
            StoreError::Database(err) => write!(f, "database error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Database(err)
    }
}

#[derive(Debug, Default)]
pub struct TripFilter {
    pub status: Option<TripStatus>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Clone)]
pub struct TripStore {
    client: Arc<Client>,
}

impl TripStore {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    fn collection(&self) -> Collection<Trip> {
        self.client.database(DATABASE).collection(COLLECTION)
    }

    /// Insert a new trip, assigning an id and timestamps. The returned trip
    /// is the stored document.
    pub async fn insert(&self, mut trip: Trip) -> Result<Trip, StoreError> {
        if trip.id.is_none() {
            trip.id = Some(ObjectId::new());
        }
        let now = Utc::now();
        trip.created_at = Some(now);
        trip.updated_at = Some(now);
        self.collection().insert_one(&trip).await?;
        Ok(trip)
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Trip>, StoreError> {
        Ok(self.collection().find_one(doc! { "_id": id }).await?)
    }

    /// Replace the stored document with this trip and bump `updated_at`.
    pub async fn save(&self, trip: &mut Trip) -> Result<(), StoreError> {
        let id = trip.id.ok_or(StoreError::MissingId)?;
        trip.updated_at = Some(Utc::now());
        self.collection()
            .replace_one(doc! { "_id": id }, &*trip)
            .await?;
        Ok(())
    }

    /// List trips, newest first. `search` matches name or destination as a
    /// case-insensitive substring.
    pub async fn list(&self, filter: TripFilter) -> Result<Vec<Trip>, StoreError> {
        let mut query = doc! {};
        if let Some(status) = filter.status {
            query.insert("status", status.as_str());
        }
        if let Some(search) = filter.search.as_deref() {
            let trimmed = search.trim();
            if !trimmed.is_empty() {
                let pattern = regex::escape(trimmed);
                query.insert(
                    "$or",
                    vec![
                        doc! { "name": { "$regex": &pattern, "$options": "i" } },
                        doc! { "destination": { "$regex": &pattern, "$options": "i" } },
                    ],
                );
            }
        }
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);

        let cursor = self
            .collection()
            .find(query)
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Delete a trip. Returns false when no document matched.
    pub async fn delete(&self, id: ObjectId) -> Result<bool, StoreError> {
        let result = self.collection().delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
