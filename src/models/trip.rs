use std::collections::HashMap;

use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::itinerary::ItineraryItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum TripStatus {
    #[serde(rename = "planning")]
    Planning,
    #[serde(rename = "ongoing")]
    Ongoing,
    #[serde(rename = "completed")]
    Completed,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Planning => "planning",
            TripStatus::Ongoing => "ongoing",
            TripStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "planning" => Some(TripStatus::Planning),
            "ongoing" => Some(TripStatus::Ongoing),
            "completed" => Some(TripStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Collaborator {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A trip document. The itinerary is embedded: every item of every day lives
/// in `items`, and `day_labels` maps day numbers (as strings, for BSON) to
/// user-chosen names like "Arrival day".
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Trip {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TripStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_budget: Option<f64>,
    #[serde(default)]
    pub collaborators: Vec<Collaborator>,
    #[serde(default)]
    pub day_labels: HashMap<String, String>,
    #[serde(default)]
    pub items: Vec<ItineraryItem>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Trip {
    /// Inclusive day count: a trip from the 10th to the 12th lasts 3 days.
    pub fn duration_days(&self) -> u32 {
        (self.end_date - self.start_date).num_days().max(0) as u32 + 1
    }
}

/// Payload for creating a trip.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TripDraft {
    pub name: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TripStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_budget: Option<f64>,
    #[serde(default)]
    pub collaborators: Vec<Collaborator>,
}

impl TripDraft {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("trip name is required".to_string());
        }
        if self.destination.trim().is_empty() {
            return Err("destination is required".to_string());
        }
        if self.end_date < self.start_date {
            return Err("end_date must not be before start_date".to_string());
        }
        if let Some(budget) = self.total_budget {
            if budget <= 0.0 {
                return Err("total_budget must be positive".to_string());
            }
        }
        Ok(())
    }

    pub fn into_trip(self) -> Trip {
        Trip {
            id: None,
            name: self.name,
            destination: self.destination,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status.unwrap_or(TripStatus::Planning),
            total_budget: self.total_budget,
            collaborators: self.collaborators,
            day_labels: HashMap::new(),
            items: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// Payload for updating trip metadata. Absent fields are left untouched.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TripUpdate {
    pub name: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<TripStatus>,
    pub total_budget: Option<f64>,
    pub collaborators: Option<Vec<Collaborator>>,
}

impl TripUpdate {
    /// Apply the update in place. Rejected without mutating when the result
    /// would leave existing items on days past the new trip length.
    pub fn apply_to(&self, trip: &mut Trip) -> Result<(), String> {
        let start = self.start_date.unwrap_or(trip.start_date);
        let end = self.end_date.unwrap_or(trip.end_date);
        if end < start {
            return Err("end_date must not be before start_date".to_string());
        }
        let new_duration = (end - start).num_days() as u32 + 1;
        if let Some(max_day) = trip.items.iter().map(|i| i.day).max() {
            if max_day > new_duration {
                return Err(format!(
                    "trip cannot be shortened to {} days: day {} still has items",
                    new_duration, max_day
                ));
            }
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("trip name is required".to_string());
            }
        }
        if let Some(destination) = &self.destination {
            if destination.trim().is_empty() {
                return Err("destination is required".to_string());
            }
        }
        if let Some(budget) = self.total_budget {
            if budget <= 0.0 {
                return Err("total_budget must be positive".to_string());
            }
        }

        trip.start_date = start;
        trip.end_date = end;
        if let Some(name) = &self.name {
            trip.name = name.clone();
        }
        if let Some(destination) = &self.destination {
            trip.destination = destination.clone();
        }
        if let Some(budget) = self.total_budget {
            trip.total_budget = Some(budget);
        }
        if let Some(status) = self.status {
            trip.status = status;
        }
        if let Some(collaborators) = &self.collaborators {
            trip.collaborators = collaborators.clone();
        }
        Ok(())
    }
}
