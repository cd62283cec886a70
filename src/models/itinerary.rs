use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::location::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ItemKind {
    #[serde(rename = "attraction")]
    Attraction,
    #[serde(rename = "restaurant")]
    Restaurant,
    #[serde(rename = "hotel")]
    Hotel,
    #[serde(rename = "transport")]
    Transport,
    #[serde(rename = "other")]
    Other,
}

impl ItemKind {
    /// Best-effort mapping from a free-text activity category (as emitted by
    /// the recommendation provider) onto a display kind.
    pub fn from_category(category: &str) -> Self {
        let lowered = category.to_lowercase();
        if lowered.contains("hotel") || lowered.contains("lodging") || lowered.contains("accommodation") {
            ItemKind::Hotel
        } else if lowered.contains("restaurant") || lowered.contains("food") || lowered.contains("dining") {
            ItemKind::Restaurant
        } else if lowered.contains("transport") || lowered.contains("transfer") || lowered.contains("flight") {
            ItemKind::Transport
        } else if lowered.contains("attraction") || lowered.contains("sightseeing") || lowered.contains("tour") {
            ItemKind::Attraction
        } else {
            ItemKind::Other
        }
    }
}

/// One expense recorded against an itinerary item.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemExpense {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    pub paid_by: String,
    pub date: DateTime<Utc>,
}

/// A scheduled entry on one day of a trip. Items are embedded in their trip
/// document; `order` is the 0-based position within the item's day.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItineraryItem {
    pub id: Uuid,
    pub trip_id: String,
    pub day: u32,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub order: u32,
    #[serde(default)]
    pub expenses: Vec<ItemExpense>,
}

impl ItineraryItem {
    pub fn expense_total(&self) -> f64 {
        self.expenses.iter().map(|e| e.amount).sum()
    }
}

/// Client-supplied fields for creating or editing an item. Day and order are
/// never taken from here; placement is decided by the itinerary manager.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemDraft {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}
