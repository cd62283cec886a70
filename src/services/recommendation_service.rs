//! Destination Recommendation Service
//!
//! Boundary client for the chat-completions provider that turns a traveler's
//! preference form into destination candidates with day-by-day plans. The
//! provider is held to a strict JSON contract (see `system_prompt`); replies
//! are fence-stripped, decoded and shape-checked before anything downstream
//! sees them. Calling this service never touches a trip: accepting one of
//! the returned candidates is a separate, explicit step.

use std::env;
use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::preferences::{
    BudgetKind, KnownDestinationForm, PreferenceForm, TravelMatchForm, TravelPreferences,
    TravelWindow,
};
use crate::models::recommendation::RecommendationSet;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const MAX_TIMEOUT_SECS: u64 = 120;
const MAX_RESPONSE_TOKENS: u32 = 4000;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug)]
pub enum RecommendationError {
    EnvironmentError(String),
    RequestError(reqwest::Error),
    /// The provider did not answer within the allowed window.
    Timeout(u64),
    ProviderError { status: u16, message: String },
    MalformedResponse(String),
}

impl fmt::Display for RecommendationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendationError::EnvironmentError(msg) => write!(f, "{}", msg),
            RecommendationError::RequestError(err) => {
                write!(f, "request to recommendation provider failed: {}", err)
            }
            RecommendationError::Timeout(secs) => {
                write!(f, "recommendation provider did not answer within {}s", secs)
            }
            RecommendationError::ProviderError { status, message } => {
                write!(f, "recommendation provider returned {}: {}", status, message)
            }
            RecommendationError::MalformedResponse(msg) => {
                write!(f, "unusable provider reply: {}", msg)
            }
        }
    }
}

impl std::error::Error for RecommendationError {}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: Option<ProviderErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

pub struct RecommendationService {
    client: Client,
    api_key: String,
    model: String,
    default_timeout: Duration,
}

impl RecommendationService {
    pub fn from_env() -> Result<Self, RecommendationError> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            RecommendationError::EnvironmentError(
                "OPENAI_API_KEY environment variable not set".to_string(),
            )
        })?;
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let default_timeout = env::var("RECOMMENDATION_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(clamp_timeout)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            client: Client::new(),
            api_key,
            model,
            default_timeout: Duration::from_secs(default_timeout),
        })
    }

    /// Ask the provider for destination candidates. `timeout_secs` overrides
    /// the configured timeout for this one call, capped at two minutes.
    pub async fn recommend(
        &self,
        preferences: &TravelPreferences,
        timeout_secs: Option<u64>,
    ) -> Result<RecommendationSet, RecommendationError> {
        let timeout = timeout_secs
            .map(clamp_timeout)
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(),
                },
                ChatMessage {
                    role: "user",
                    content: build_analysis_prompt(preferences),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_RESPONSE_TOKENS,
            response_format: ResponseFormat { kind: "json_object" },
        };

        log::debug!(
            "requesting recommendations from {} (model {}, timeout {}s)",
            CHAT_COMPLETIONS_URL,
            self.model,
            timeout.as_secs()
        );

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    RecommendationError::Timeout(timeout.as_secs())
                } else {
                    RecommendationError::RequestError(err)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecommendationError::ProviderError {
                status: status.as_u16(),
                message: normalize_provider_error(status.as_u16(), &body),
            });
        }

        let completion: ChatResponse = response.json().await.map_err(|err| {
            RecommendationError::MalformedResponse(format!("could not decode completion: {}", err))
        })?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                RecommendationError::MalformedResponse(
                    "completion carried no message content".to_string(),
                )
            })?;

        parse_recommendations(&content)
    }
}

fn clamp_timeout(secs: u64) -> u64 {
    secs.clamp(1, MAX_TIMEOUT_SECS)
}

/// Decode and shape-check a provider reply. Also used when clients post a
/// previously returned recommendation back to be accepted.
pub fn parse_recommendations(content: &str) -> Result<RecommendationSet, RecommendationError> {
    let cleaned = strip_code_fences(content);
    let set: RecommendationSet = serde_json::from_str(cleaned).map_err(|err| {
        RecommendationError::MalformedResponse(format!(
            "reply is not the agreed JSON shape: {}",
            err
        ))
    })?;
    if set.destinations.is_empty() {
        return Err(RecommendationError::MalformedResponse(
            "reply lists no destinations".to_string(),
        ));
    }
    for destination in &set.destinations {
        destination
            .validate()
            .map_err(RecommendationError::MalformedResponse)?;
    }
    Ok(set)
}

/// Models sometimes wrap the JSON in a markdown code fence despite the
/// response_format instruction. Strip it before decoding.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

fn normalize_provider_error(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<ProviderErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error);
    let code = detail
        .as_ref()
        .and_then(|d| d.code.as_deref())
        .unwrap_or_default();

    if code == "invalid_api_key" || status == 401 {
        return "the configured provider API key was rejected".to_string();
    }
    if code == "insufficient_quota" {
        return "the provider account is out of quota".to_string();
    }
    if code == "rate_limit_exceeded" || status == 429 {
        return "the provider is rate limiting requests, try again shortly".to_string();
    }
    detail
        .and_then(|d| d.message)
        .unwrap_or_else(|| format!("unexpected provider response ({} bytes)", body.len()))
}

fn system_prompt() -> String {
    r#"You are a seasoned travel planner. Reply with a single JSON object and nothing else, using exactly this shape:
{
  "destinations": [
    {
      "name": "City or region",
      "country": "Country",
      "description": "Two or three sentences about the destination",
      "why_recommended": "Why it fits these travelers",
      "match_score": 87,
      "estimated_cost": 2500,
      "best_time_to_visit": "May to September",
      "warnings": ["optional caveats such as visa or season issues"],
      "itinerary": [
        {
          "day": 1,
          "title": "Theme of the day",
          "activities": [
            { "time": "09:00", "name": "Activity name", "description": "One sentence", "category": "sightseeing" }
          ]
        }
      ]
    }
  ],
  "analysis_insights": "One short paragraph about the overall match"
}
Number days from 1 with no gaps and cover every day of the trip. Pick categories from: sightseeing, food, accommodation, transport, nightlife, shopping, nature, culture."#
        .to_string()
}

/// Render the preference form as the user prompt. Every answered question
/// becomes one line so the provider sees the full picture.
pub fn build_analysis_prompt(preferences: &TravelPreferences) -> String {
    match &preferences.form {
        PreferenceForm::TravelMatch(form) => travel_match_prompt(form),
        PreferenceForm::KnownDestination(form) => known_destination_prompt(form),
    }
}

fn travel_match_prompt(form: &TravelMatchForm) -> String {
    let mut prompt = String::from(
        "Suggest exactly 3 destinations for the following travelers and plan every day of the trip.\n\n",
    );
    prompt.push_str(&format!("Departure city: {}\n", form.departure_city));
    if !form.trip_types.is_empty() {
        prompt.push_str(&format!("Trip styles: {}\n", form.trip_types.join(", ")));
    }
    if !form.company.is_empty() {
        prompt.push_str(&format!("Traveling as: {}\n", form.company));
    }
    prompt.push_str(&format!("Number of travelers: {}\n", form.number_of_travelers));
    if !form.companions.is_empty() {
        let companions: Vec<String> = form
            .companions
            .iter()
            .map(|c| {
                if c.relation.is_empty() {
                    c.name.clone()
                } else {
                    format!("{} ({})", c.name, c.relation)
                }
            })
            .collect();
        prompt.push_str(&format!("Companions: {}\n", companions.join(", ")));
    }
    if !form.destination_types.is_empty() {
        prompt.push_str(&format!(
            "Preferred destination types: {}\n",
            form.destination_types.join(", ")
        ));
    }
    if !form.activities.is_empty() {
        prompt.push_str(&format!("Wanted activities: {}\n", form.activities.join(", ")));
    }
    if let Some(beach) = &form.beach {
        prompt.push_str("Beach preferences:\n");
        if !beach.activities.is_empty() {
            prompt.push_str(&format!("  - activities: {}\n", beach.activities.join(", ")));
        }
        if !beach.sea_temperature.is_empty() {
            prompt.push_str(&format!("  - sea temperature: {}\n", beach.sea_temperature));
        }
        if !beach.sea_type.is_empty() {
            prompt.push_str(&format!("  - sea type: {}\n", beach.sea_type));
        }
        if !beach.sea_color.is_empty() {
            prompt.push_str(&format!("  - sea color: {}\n", beach.sea_color));
        }
        if let Some(beachfront) = &beach.beachfront {
            prompt.push_str(&format!("  - beachfront lodging: {}\n", beachfront));
        }
    }
    if !form.accommodation.is_empty() {
        prompt.push_str(&format!(
            "Accommodation styles: {}\n",
            form.accommodation.join(", ")
        ));
    }
    match &form.travel_window {
        TravelWindow::Dates {
            departure_date,
            return_date,
        } => {
            prompt.push_str(&format!(
                "Travel dates: {} to {} ({} days)\n",
                departure_date,
                return_date,
                form.travel_window.duration_days()
            ));
        }
        TravelWindow::Month {
            month,
            duration_days,
        } => {
            prompt.push_str(&format!(
                "Travel month: {} for about {} days\n",
                month, duration_days
            ));
        }
    }
    prompt.push_str(&budget_line(&form.budget.kind, form.budget.amount, form.number_of_travelers));
    prompt.push_str(&format!(
        "\nEach itinerary must cover all {} days.\n",
        form.travel_window.duration_days()
    ));
    prompt
}

fn known_destination_prompt(form: &KnownDestinationForm) -> String {
    let mut prompt = String::from(
        "The travelers already chose where to go. Return one destinations entry per place below, with a complete day-by-day plan. Do not invent other destinations.\n\n",
    );
    prompt.push_str(&format!("Destinations: {}\n", form.destinations.join(", ")));
    if let Some(date) = form.travel_date {
        prompt.push_str(&format!("Start date: {}\n", date));
    }
    prompt.push_str(&format!("Trip length: {} days\n", form.duration_days));
    prompt.push_str(&format!("Number of travelers: {}\n", form.travelers));
    if !form.activities.is_empty() {
        prompt.push_str(&format!("Wanted activities: {}\n", form.activities.join(", ")));
    }
    prompt.push_str(&budget_line(&form.budget.kind, form.budget.amount, form.travelers));
    prompt.push_str(&format!(
        "\nEach itinerary must cover all {} days.\n",
        form.duration_days
    ));
    prompt
}

fn budget_line(kind: &BudgetKind, amount: f64, travelers: u32) -> String {
    match kind {
        BudgetKind::Total => format!("Budget: {} total for the whole group\n", amount),
        BudgetKind::PerPerson => format!(
            "Budget: {} per person ({} for the group)\n",
            amount,
            amount * travelers as f64
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::preferences::{TravelBudget, PREFERENCES_SCHEMA_VERSION};

    fn minimal_reply() -> &'static str {
        r#"{
            "destinations": [
                {
                    "name": "Lagos",
                    "country": "Portugal",
                    "description": "Cliffs and beaches.",
                    "why_recommended": "Warm water in July.",
                    "match_score": 91,
                    "estimated_cost": 1800,
                    "best_time_to_visit": "June to September",
                    "itinerary": [
                        {
                            "day": 1,
                            "title": "Arrival",
                            "activities": [
                                { "time": "10:00", "name": "Check in", "description": "", "category": "accommodation" }
                            ]
                        }
                    ]
                }
            ],
            "analysis_insights": "Beach-first trip."
        }"#
    }

    #[test]
    fn parses_a_wellformed_reply() {
        let set = parse_recommendations(minimal_reply()).unwrap();
        assert_eq!(set.destinations.len(), 1);
        assert_eq!(set.destinations[0].name, "Lagos");
        assert_eq!(set.destinations[0].planned_days(), 1);
    }

    #[test]
    fn strips_markdown_fences_before_decoding() {
        let fenced = format!("```json\n{}\n```", minimal_reply());
        assert!(parse_recommendations(&fenced).is_ok());
        let bare_fence = format!("```\n{}\n```", minimal_reply());
        assert!(parse_recommendations(&bare_fence).is_ok());
    }

    #[test]
    fn rejects_replies_without_destinations() {
        let err = parse_recommendations(r#"{ "destinations": [] }"#).unwrap_err();
        assert!(matches!(err, RecommendationError::MalformedResponse(_)));
    }

    #[test]
    fn rejects_day_zero_plans() {
        let reply = r#"{
            "destinations": [
                { "name": "Nowhere", "country": "", "itinerary": [ { "day": 0, "activities": [] } ] }
            ]
        }"#;
        let err = parse_recommendations(reply).unwrap_err();
        assert!(err.to_string().contains("day 0"));
    }

    #[test]
    fn rejects_non_json_replies() {
        assert!(parse_recommendations("here are my three favourite beaches").is_err());
    }

    #[test]
    fn timeout_is_capped() {
        assert_eq!(clamp_timeout(30), 30);
        assert_eq!(clamp_timeout(900), MAX_TIMEOUT_SECS);
        assert_eq!(clamp_timeout(0), 1);
    }

    #[test]
    fn match_prompt_carries_the_answers() {
        let prefs = TravelPreferences {
            schema_version: PREFERENCES_SCHEMA_VERSION,
            form: PreferenceForm::TravelMatch(TravelMatchForm {
                departure_city: "Porto".to_string(),
                trip_types: vec!["relaxing".to_string()],
                company: "family".to_string(),
                number_of_travelers: 4,
                companions: vec![],
                destination_types: vec!["beach".to_string()],
                activities: vec!["surfing".to_string()],
                beach: None,
                accommodation: vec!["resort".to_string()],
                travel_window: TravelWindow::Month {
                    month: "August".to_string(),
                    duration_days: 10,
                },
                budget: TravelBudget {
                    amount: 800.0,
                    kind: BudgetKind::PerPerson,
                },
            }),
        };
        let prompt = build_analysis_prompt(&prefs);
        assert!(prompt.contains("Departure city: Porto"));
        assert!(prompt.contains("August"));
        assert!(prompt.contains("800 per person (3200 for the group)"));
        assert!(prompt.contains("cover all 10 days"));
    }

    #[test]
    fn known_destination_prompt_pins_the_places() {
        let prefs = TravelPreferences {
            schema_version: PREFERENCES_SCHEMA_VERSION,
            form: PreferenceForm::KnownDestination(KnownDestinationForm {
                destinations: vec!["Kyoto".to_string(), "Osaka".to_string()],
                travel_date: None,
                duration_days: 6,
                travelers: 2,
                activities: vec!["temples".to_string()],
                budget: TravelBudget {
                    amount: 4000.0,
                    kind: BudgetKind::Total,
                },
            }),
        };
        let prompt = build_analysis_prompt(&prefs);
        assert!(prompt.contains("Kyoto, Osaka"));
        assert!(prompt.contains("Do not invent other destinations"));
        assert!(prompt.contains("4000 total"));
    }

    #[test]
    fn provider_errors_are_normalized() {
        let body = r#"{"error":{"code":"invalid_api_key","message":"Incorrect API key provided"}}"#;
        assert_eq!(
            normalize_provider_error(401, body),
            "the configured provider API key was rejected"
        );
        let quota = r#"{"error":{"code":"insufficient_quota","message":"You exceeded your quota"}}"#;
        assert!(normalize_provider_error(429, quota).contains("out of quota"));
        assert!(normalize_provider_error(429, "{}").contains("rate limiting"));
        let other = r#"{"error":{"code":"server_error","message":"upstream blew up"}}"#;
        assert_eq!(normalize_provider_error(500, other), "upstream blew up");
    }
}
