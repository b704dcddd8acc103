use std::sync::OnceLock;

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::schemas::{schema_type_name, CompletionSchema, SchemaHandle};

/// Validated itinerary returned to the presentation/export collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDocument {
    /// Creative title for the trip, matched to the trip type
    pub trip_title: String,
    /// Personalized opening paragraph addressed to the traveler
    pub greeting: String,
    /// Two to three sentence overview of the trip vibe
    pub summary: String,
    /// Estimated cost range in USD per person (e.g. "$2,500 - $3,000 per person")
    pub total_estimated_cost: String,
    /// Key inclusions: private transport, entry tickets, domestic flights, meet & greet
    pub price_includes: Vec<String>,
    /// Headline experiences across the trip
    pub highlights: Vec<String>,
    /// Day-by-day plan covering the full duration
    pub days: Vec<DayPlan>,
    /// Two to three accommodation candidates matched to budget and party
    pub accommodation_options: Vec<AccommodationOption>,
    /// Practical Egypt travel tips
    pub travel_tips: Vec<String>,
}

/// One itinerary day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// 1-based day counter
    pub day: u32,
    /// Theme for the day (e.g. "Day 1: Ancient Wonders of Giza")
    pub title: String,
    /// Activities in chronological order, never empty
    pub activities: Vec<String>,
    /// Evening recommendation or dining tip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One accommodation candidate (hotel or cruise archetype).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationOption {
    /// Property or vessel name
    pub name: String,
    /// e.g. "5-Star Hotel", "Luxury Nile Cruise", "Dahabiya Cruise"
    pub r#type: String,
    /// Description including schedule or inclusion notes where relevant
    pub description: String,
}

impl CompletionSchema for ItineraryDocument {
    fn schema() -> &'static SchemaHandle {
        static HANDLE: OnceLock<SchemaHandle> = OnceLock::new();
        HANDLE.get_or_init(|| {
            SchemaHandle::from_root_schema::<ItineraryDocument>(
                "ItineraryDocument",
                schema_type_name::<ItineraryDocument>(),
                schema_for!(ItineraryDocument),
            )
        })
    }
}
