use serde::{Deserialize, Serialize};

use crate::{
    config::{BudgetBand, DurationBucket, RulesConfig},
    error::{PlannerError, Result},
    rules::routing::RouteConstraint,
    types::TripSpecification,
};

/// Quoting guidance: the per-person range plus the fixed inclusion lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetGuidance {
    pub band: BudgetBand,
    /// Rendered range, e.g. "$4,000 - $7,000 per person"
    pub display_range: String,
    pub always_included: Vec<String>,
    pub never_included: Vec<String>,
}

pub fn resolve_budget(
    spec: &TripSpecification,
    route: &RouteConstraint,
    config: &RulesConfig,
) -> Result<BudgetGuidance> {
    let bucket = DurationBucket::from_days(spec.duration_days);
    let band = *config.band(spec.budget_tier, bucket).ok_or_else(|| {
        PlannerError::Config(format!(
            "no budget band configured for {} / {:?}",
            spec.budget_tier, bucket
        ))
    })?;

    let mut always_included = vec![
        "Private Air-Conditioned Transportation for all ground transfers".to_string(),
        "All Entry Tickets to sites and museums".to_string(),
        "Private Egyptologist Guide for all touring days".to_string(),
        "VIP Meet & Greet at the airport upon arrival".to_string(),
    ];
    // Domestic flight inclusions reflect the compiled route, never a
    // Luxor-Aswan flight (that leg cannot be a flight).
    for leg in route.flight_legs() {
        always_included.push(format!("Domestic Flight: {} to {}", leg.from, leg.to));
    }

    let never_included = vec![
        "International flights".to_string(),
        "Visa fees".to_string(),
        "Gratuities and tips".to_string(),
        "Personal expenses".to_string(),
        "Optional experiences not listed in the itinerary".to_string(),
    ];

    Ok(BudgetGuidance {
        band,
        display_range: band.display_range(),
        always_included,
        never_included,
    })
}
