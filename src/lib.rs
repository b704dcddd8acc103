//! nile-itinerary-rs: rules-driven travel itinerary generation with
//! multi-backend LLM failover and schema-validated output.
//!
//! Trip preferences go through a deterministic rule engine (routing, tone,
//! budget, accommodation selection), get compiled into a single generation
//! request with a strict output schema, and are then run against an ordered
//! registry of generative backends with failure classification and fallback.
//! The returned document is schema-checked (with one bounded repair attempt)
//! before anyone downstream sees it.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use nile_itinerary::{GeminiClient, ItineraryPlanner, TripForm};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_key = std::env::var("GEMINI_API_KEY")?;
//!     let registry = GeminiClient::new(api_key)
//!         .registry(&["gemini-2.5-flash", "gemini-2.5-flash-lite"]);
//!     let planner = ItineraryPlanner::new(registry);
//!
//!     let form: TripForm = serde_json::from_str(r#"{
//!         "name": "Ada", "email": "ada@example.com", "country": "UK",
//!         "startDate": "2026-10-01", "duration": "10",
//!         "budgetRange": "Premium", "travelStyle": ["Culture"],
//!         "tripType": "Couple", "groupSize": 2
//!     }"#)?;
//!
//!     let itinerary = planner.plan(&form).await?;
//!     println!("{}", itinerary.trip_title);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod planner;
pub mod rules;
pub mod schemas;
pub mod services;
pub mod types;

pub use config::{AccommodationKind, DurationBucket, RulesConfig};
pub use core::{GenerationOrchestrator, GenerationRequest, OrchestratorOptions, RequestCompiler};
pub use error::{PlannerError, Result};
pub use planner::ItineraryPlanner;
pub use rules::{RouteConstraint, RuleEngine, RuleSet, TransferMode};
pub use schemas::{schema_type_name, CompletionSchema, DocumentValidator, SchemaHandle};
pub use services::{BackendRegistry, GeminiBackend, GeminiClient, GenerationBackend};
pub use types::{
    AccommodationOption, BudgetTier, DayPlan, ItineraryDocument, TravelStyle, TripForm,
    TripSpecification, TripType,
};

#[cfg(feature = "cli")]
pub mod cli;
