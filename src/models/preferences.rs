use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Current preference schema. Bump when the form shape changes so stored
/// payloads from older clients are rejected instead of misread.
pub const PREFERENCES_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum BudgetKind {
    #[serde(rename = "total")]
    Total,
    #[serde(rename = "per-person")]
    PerPerson,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TravelBudget {
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: BudgetKind,
}

impl TravelBudget {
    /// Budget normalized to a whole-group total.
    pub fn total_for(&self, travelers: u32) -> f64 {
        match self.kind {
            BudgetKind::Total => self.amount,
            BudgetKind::PerPerson => self.amount * travelers as f64,
        }
    }
}

/// When the user wants to travel: concrete dates, or a month plus a length.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum TravelWindow {
    #[serde(rename = "dates")]
    Dates {
        departure_date: NaiveDate,
        return_date: NaiveDate,
    },
    #[serde(rename = "month")]
    Month { month: String, duration_days: u32 },
}

impl TravelWindow {
    pub fn duration_days(&self) -> u32 {
        match self {
            TravelWindow::Dates {
                departure_date,
                return_date,
            } => (*return_date - *departure_date).num_days().max(0) as u32 + 1,
            TravelWindow::Month { duration_days, .. } => *duration_days,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Companion {
    pub name: String,
    #[serde(default)]
    pub relation: String,
}

/// Extra questions shown when the traveler picked beach destinations.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BeachPreferences {
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub sea_temperature: String,
    #[serde(default)]
    pub sea_type: String,
    #[serde(default)]
    pub sea_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beachfront: Option<String>,
}

/// The "help me choose" questionnaire: no destination yet, the provider is
/// asked to propose some.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TravelMatchForm {
    pub departure_city: String,
    #[serde(default)]
    pub trip_types: Vec<String>,
    #[serde(default)]
    pub company: String,
    pub number_of_travelers: u32,
    #[serde(default)]
    pub companions: Vec<Companion>,
    #[serde(default)]
    pub destination_types: Vec<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beach: Option<BeachPreferences>,
    #[serde(default)]
    pub accommodation: Vec<String>,
    pub travel_window: TravelWindow,
    pub budget: TravelBudget,
}

/// The "I know where I'm going" form: destinations are fixed, the provider
/// only plans the days.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KnownDestinationForm {
    pub destinations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_date: Option<NaiveDate>,
    pub duration_days: u32,
    pub travelers: u32,
    #[serde(default)]
    pub activities: Vec<String>,
    pub budget: TravelBudget,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "form")]
pub enum PreferenceForm {
    #[serde(rename = "travel-match")]
    TravelMatch(TravelMatchForm),
    #[serde(rename = "known-destination")]
    KnownDestination(KnownDestinationForm),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TravelPreferences {
    pub schema_version: u32,
    #[serde(flatten)]
    pub form: PreferenceForm,
}

impl TravelPreferences {
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != PREFERENCES_SCHEMA_VERSION {
            return Err(format!(
                "unsupported preferences schema version {} (expected {})",
                self.schema_version, PREFERENCES_SCHEMA_VERSION
            ));
        }
        match &self.form {
            PreferenceForm::TravelMatch(form) => form.validate(),
            PreferenceForm::KnownDestination(form) => form.validate(),
        }
    }

    pub fn travelers(&self) -> u32 {
        match &self.form {
            PreferenceForm::TravelMatch(form) => form.number_of_travelers,
            PreferenceForm::KnownDestination(form) => form.travelers,
        }
    }
}

impl TravelMatchForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.departure_city.trim().is_empty() {
            return Err("departure_city is required".to_string());
        }
        if self.number_of_travelers == 0 {
            return Err("number_of_travelers must be at least 1".to_string());
        }
        if self.budget.amount <= 0.0 {
            return Err("budget amount must be positive".to_string());
        }
        match &self.travel_window {
            TravelWindow::Dates {
                departure_date,
                return_date,
            } => {
                if return_date < departure_date {
                    return Err("return_date must not be before departure_date".to_string());
                }
            }
            TravelWindow::Month {
                month,
                duration_days,
            } => {
                if month.trim().is_empty() {
                    return Err("travel month is required".to_string());
                }
                if *duration_days == 0 {
                    return Err("duration_days must be at least 1".to_string());
                }
            }
        }
        Ok(())
    }
}

impl KnownDestinationForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.destinations.is_empty() || self.destinations.iter().all(|d| d.trim().is_empty()) {
            return Err("at least one destination is required".to_string());
        }
        if self.duration_days == 0 {
            return Err("duration_days must be at least 1".to_string());
        }
        if self.travelers == 0 {
            return Err("travelers must be at least 1".to_string());
        }
        if self.budget.amount <= 0.0 {
            return Err("budget amount must be positive".to_string());
        }
        Ok(())
    }
}
