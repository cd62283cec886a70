use serde::{Deserialize, Serialize};

/// One activity inside a proposed day plan. Narrative text straight from the
/// provider; only the shape is guaranteed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlannedActivity {
    #[serde(default)]
    pub time: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DayPlan {
    pub day: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub activities: Vec<PlannedActivity>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DestinationRecommendation {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub why_recommended: String,
    #[serde(default)]
    pub match_score: u32,
    #[serde(default)]
    pub estimated_cost: f64,
    #[serde(default)]
    pub best_time_to_visit: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub itinerary: Vec<DayPlan>,
}

impl DestinationRecommendation {
    /// Shape check applied to provider output and to recommendations posted
    /// back by clients before they are turned into a trip.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("recommendation is missing a destination name".to_string());
        }
        for plan in &self.itinerary {
            if plan.day == 0 {
                return Err(format!(
                    "recommendation '{}' uses day 0; days are numbered from 1",
                    self.name
                ));
            }
            for activity in &plan.activities {
                if activity.name.trim().is_empty() {
                    return Err(format!(
                        "recommendation '{}' has an unnamed activity on day {}",
                        self.name, plan.day
                    ));
                }
            }
        }
        Ok(())
    }

    /// Highest day number mentioned in the proposed itinerary.
    pub fn planned_days(&self) -> u32 {
        self.itinerary.iter().map(|plan| plan.day).max().unwrap_or(0)
    }
}

/// Full provider reply: candidate destinations plus a short overall note.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecommendationSet {
    pub destinations: Vec<DestinationRecommendation>,
    #[serde(default)]
    pub analysis_insights: String,
}
