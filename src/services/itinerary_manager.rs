//! Itinerary Manager
//!
//! The single mutation point for a trip's embedded itinerary. Route handlers
//! load a trip, run exactly one operation here, and persist the result; the
//! manager itself performs no I/O, so every rule about ordering, day ranges
//! and expenses can be tested without a database.
//!
//! Invariant maintained by every operation: within one day, `order` values
//! are contiguous from 0 with no gaps or duplicates. Operations validate
//! first and mutate only after all checks pass.

use std::fmt;

use chrono::{NaiveTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::itinerary::{ItemDraft, ItemExpense, ItemKind, ItineraryItem};
use crate::models::location::Location;
use crate::models::recommendation::DestinationRecommendation;
use crate::models::trip::Trip;
use crate::services::route_optimization_service::RouteOptimizer;

#[derive(Debug)]
pub enum ItineraryError {
    Validation(String),
    ItemNotFound(Uuid),
    DayOutOfRange { day: u32, duration: u32 },
    PositionOutOfRange { index: usize, len: usize },
    InvalidExpenseAmount(f64),
    InvalidTimeWindow { start: String, end: String },
}

impl fmt::Display for ItineraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItineraryError::Validation(msg) => write!(f, "{}", msg),
            ItineraryError::ItemNotFound(id) => write!(f, "itinerary item {} not found", id),
            ItineraryError::DayOutOfRange { day, duration } => write!(
                f,
                "day {} is outside the trip (1 to {})",
                day, duration
            ),
            ItineraryError::PositionOutOfRange { index, len } => write!(
                f,
                "position {} is out of range for a day with {} items",
                index, len
            ),
            ItineraryError::InvalidExpenseAmount(amount) => {
                write!(f, "expense amount must be positive, got {}", amount)
            }
            ItineraryError::InvalidTimeWindow { start, end } => {
                write!(f, "end time {} must be after start time {}", end, start)
            }
        }
    }
}

impl std::error::Error for ItineraryError {}

/// Per-day projection served to clients: the day's items in display order
/// plus its label and expense total.
#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub day: u32,
    pub label: String,
    pub items: Vec<ItineraryItem>,
    pub item_count: usize,
    pub total_expenses: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayTotal {
    pub day: u32,
    pub label: String,
    pub item_count: usize,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetSummary {
    pub total_budget: Option<f64>,
    pub total_spent: f64,
    /// Budget minus spend. Negative means the trip is over budget; absent
    /// when no budget was set.
    pub remaining_budget: Option<f64>,
    pub days: Vec<DayTotal>,
}

pub struct ItineraryManager {
    trip: Trip,
}

impl ItineraryManager {
    pub fn new(trip: Trip) -> Self {
        Self { trip }
    }

    pub fn trip(&self) -> &Trip {
        &self.trip
    }

    pub fn into_trip(self) -> Trip {
        self.trip
    }

    /// Append an item to the end of a day.
    pub fn add_item(&mut self, day: u32, draft: ItemDraft) -> Result<ItineraryItem, ItineraryError> {
        self.check_day(day)?;
        validate_draft(&draft)?;

        let order = self.day_indices(day).len() as u32;
        let item = ItineraryItem {
            id: Uuid::new_v4(),
            trip_id: self.trip_id_hex(),
            day,
            kind: draft.kind,
            name: draft.name,
            description: draft.description,
            location: draft.location,
            start_time: draft.start_time,
            end_time: draft.end_time,
            order,
            expenses: Vec::new(),
        };
        self.trip.items.push(item.clone());
        Ok(item)
    }

    /// Replace an item's editable fields. Day, order and recorded expenses
    /// are kept as they are.
    pub fn edit_item(&mut self, item_id: Uuid, draft: ItemDraft) -> Result<ItineraryItem, ItineraryError> {
        validate_draft(&draft)?;
        let idx = self.index_of(item_id)?;

        let item = &mut self.trip.items[idx];
        item.kind = draft.kind;
        item.name = draft.name;
        item.description = draft.description;
        item.location = draft.location;
        item.start_time = draft.start_time;
        item.end_time = draft.end_time;
        Ok(item.clone())
    }

    /// Remove an item and close the gap in its day's ordering.
    pub fn remove_item(&mut self, item_id: Uuid) -> Result<ItineraryItem, ItineraryError> {
        let idx = self.index_of(item_id)?;
        let removed = self.trip.items.remove(idx);
        self.renumber_day(removed.day);
        Ok(removed)
    }

    /// Move the item at `from_index` of a day to `to_index`, shifting the
    /// items in between. Indices are positions in the day's current order.
    pub fn reorder(&mut self, day: u32, from_index: usize, to_index: usize) -> Result<(), ItineraryError> {
        self.check_day(day)?;
        let mut indices = self.day_indices(day);
        let len = indices.len();
        if from_index >= len {
            return Err(ItineraryError::PositionOutOfRange { index: from_index, len });
        }
        if to_index >= len {
            return Err(ItineraryError::PositionOutOfRange { index: to_index, len });
        }

        let moved = indices.remove(from_index);
        indices.insert(to_index, moved);
        for (position, &item_idx) in indices.iter().enumerate() {
            self.trip.items[item_idx].order = position as u32;
        }
        Ok(())
    }

    /// Record an expense against an item.
    pub fn add_expense(
        &mut self,
        item_id: Uuid,
        description: String,
        amount: f64,
        paid_by: String,
    ) -> Result<ItemExpense, ItineraryError> {
        if !(amount > 0.0) {
            return Err(ItineraryError::InvalidExpenseAmount(amount));
        }
        let idx = self.index_of(item_id)?;

        let expense = ItemExpense {
            id: Uuid::new_v4(),
            description,
            amount,
            paid_by,
            date: Utc::now(),
        };
        self.trip.items[idx].expenses.push(expense.clone());
        Ok(expense)
    }

    /// Rename a day. An empty label clears the custom name so the day falls
    /// back to its default "Day N" form.
    pub fn set_day_label(&mut self, day: u32, label: &str) -> Result<(), ItineraryError> {
        self.check_day(day)?;
        let trimmed = label.trim();
        if trimmed.is_empty() {
            self.trip.day_labels.remove(&day.to_string());
        } else {
            self.trip.day_labels.insert(day.to_string(), trimmed.to_string());
        }
        Ok(())
    }

    /// Run the nearest-neighbor pass over one day and renumber it with the
    /// resulting sequence. Days with fewer than two items are left alone.
    pub fn optimize_day(&mut self, day: u32) -> Result<(), ItineraryError> {
        self.check_day(day)?;
        if self.day_indices(day).len() <= 1 {
            return Ok(());
        }

        let items = std::mem::take(&mut self.trip.items);
        let mut day_items = Vec::new();
        let mut rest = Vec::new();
        for item in items {
            if item.day == day {
                day_items.push(item);
            } else {
                rest.push(item);
            }
        }
        day_items.sort_by_key(|item| item.order);

        let mut routed = RouteOptimizer::nearest_neighbor_order(day_items);
        for (position, item) in routed.iter_mut().enumerate() {
            item.order = position as u32;
        }
        rest.extend(routed);
        self.trip.items = rest;
        Ok(())
    }

    /// Seed the itinerary from an accepted recommendation: every planned
    /// activity becomes an item on its day, in the order proposed. Locations
    /// start unresolved; day titles become labels.
    pub fn ingest_recommendation(&mut self, recommendation: &DestinationRecommendation) {
        let trip_id = self.trip_id_hex();
        for plan in &recommendation.itinerary {
            if !plan.title.trim().is_empty() {
                self.trip
                    .day_labels
                    .insert(plan.day.to_string(), plan.title.trim().to_string());
            }
            for activity in &plan.activities {
                let order = self.day_indices(plan.day).len() as u32;
                self.trip.items.push(ItineraryItem {
                    id: Uuid::new_v4(),
                    trip_id: trip_id.clone(),
                    day: plan.day,
                    kind: ItemKind::from_category(&activity.category),
                    name: activity.name.clone(),
                    description: activity.description.clone(),
                    location: Location::unresolved(),
                    start_time: if activity.time.trim().is_empty() {
                        None
                    } else {
                        Some(activity.time.clone())
                    },
                    end_time: None,
                    order,
                    expenses: Vec::new(),
                });
            }
        }
    }

    pub fn day_view(&self, day: u32) -> Result<DayView, ItineraryError> {
        self.check_day(day)?;
        let mut items: Vec<ItineraryItem> = self
            .trip
            .items
            .iter()
            .filter(|item| item.day == day)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.order);
        Ok(DayView {
            day,
            label: self.day_label(day),
            item_count: items.len(),
            total_expenses: self.day_total(day),
            items,
        })
    }

    pub fn day_label(&self, day: u32) -> String {
        self.trip
            .day_labels
            .get(&day.to_string())
            .cloned()
            .unwrap_or_else(|| format!("Day {}", day))
    }

    /// Sum of all expenses recorded on the given day. Days without items
    /// simply total zero.
    pub fn day_total(&self, day: u32) -> f64 {
        self.trip
            .items
            .iter()
            .filter(|item| item.day == day)
            .map(|item| item.expense_total())
            .sum()
    }

    pub fn total_spent(&self) -> f64 {
        self.trip.items.iter().map(|item| item.expense_total()).sum()
    }

    /// Budget minus everything spent so far. Negative when over budget,
    /// `None` when the trip has no budget set.
    pub fn remaining_budget(&self) -> Option<f64> {
        self.trip.total_budget.map(|budget| budget - self.total_spent())
    }

    pub fn budget_summary(&self) -> BudgetSummary {
        let days = (1..=self.trip.duration_days())
            .map(|day| DayTotal {
                day,
                label: self.day_label(day),
                item_count: self.trip.items.iter().filter(|i| i.day == day).count(),
                total: self.day_total(day),
            })
            .collect();
        BudgetSummary {
            total_budget: self.trip.total_budget,
            total_spent: self.total_spent(),
            remaining_budget: self.remaining_budget(),
            days,
        }
    }

    fn trip_id_hex(&self) -> String {
        self.trip.id.map(|id| id.to_hex()).unwrap_or_default()
    }

    fn check_day(&self, day: u32) -> Result<(), ItineraryError> {
        let duration = self.trip.duration_days();
        if day == 0 || day > duration {
            return Err(ItineraryError::DayOutOfRange { day, duration });
        }
        Ok(())
    }

    fn index_of(&self, item_id: Uuid) -> Result<usize, ItineraryError> {
        self.trip
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or(ItineraryError::ItemNotFound(item_id))
    }

    /// Positions into `trip.items` for one day, sorted by the day's order.
    fn day_indices(&self, day: u32) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.trip.items.len())
            .filter(|&i| self.trip.items[i].day == day)
            .collect();
        indices.sort_by_key(|&i| self.trip.items[i].order);
        indices
    }

    fn renumber_day(&mut self, day: u32) {
        let indices = self.day_indices(day);
        for (position, &item_idx) in indices.iter().enumerate() {
            self.trip.items[item_idx].order = position as u32;
        }
    }
}

fn validate_draft(draft: &ItemDraft) -> Result<(), ItineraryError> {
    if draft.name.trim().is_empty() {
        return Err(ItineraryError::Validation("item name is required".to_string()));
    }
    let start = parse_time(draft.start_time.as_deref(), "start_time")?;
    let end = parse_time(draft.end_time.as_deref(), "end_time")?;
    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            return Err(ItineraryError::InvalidTimeWindow {
                start: draft.start_time.clone().unwrap_or_default(),
                end: draft.end_time.clone().unwrap_or_default(),
            });
        }
    }
    Ok(())
}

fn parse_time(value: Option<&str>, field: &str) -> Result<Option<NaiveTime>, ItineraryError> {
    match value {
        None => Ok(None),
        Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M")
            .map(Some)
            .map_err(|_| {
                ItineraryError::Validation(format!("{} must be a valid HH:MM time, got '{}'", field, raw))
            }),
    }
}
