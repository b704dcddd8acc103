//! Deterministic domain rules: trip preferences in, itinerary constraints out.
//!
//! Everything here is pure and synchronous. Routing, tone, style bias,
//! budget, and accommodation selection each live in their own module; the
//! [`RuleEngine`] stitches them into one [`RuleSet`].

pub mod accommodation;
pub mod budget;
pub mod routing;
pub mod styles;
pub mod tone;

use serde::{Deserialize, Serialize};

pub use accommodation::AccommodationCandidate;
pub use budget::BudgetGuidance;
pub use routing::{City, RouteConstraint, RouteLeg, TransferMode};
pub use styles::{StyleBias, StylePlan};
pub use tone::ToneDirective;

use crate::{config::RulesConfig, error::Result, types::TripSpecification};

/// Compiled itinerary constraints for one trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub route: RouteConstraint,
    pub tone: ToneDirective,
    pub styles: StylePlan,
    pub budget: BudgetGuidance,
    pub accommodations: Vec<AccommodationCandidate>,
}

/// Pure mapping from a validated [`TripSpecification`] to a [`RuleSet`].
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: RulesConfig,
}

impl RuleEngine {
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Compile the full rule set. No I/O; deterministic for a given spec and
    /// config. A spec that cannot be routed fails with `RuleConflict` before
    /// any backend is reached.
    pub fn compile(&self, spec: &TripSpecification) -> Result<RuleSet> {
        let route = routing::resolve_route(spec, &self.config)?;
        let tone = tone::resolve_tone(spec.trip_type, &self.config)?;
        let styles = styles::resolve_styles(spec);
        let budget = budget::resolve_budget(spec, &route, &self.config)?;
        let accommodations = accommodation::select_accommodations(spec, &route, &self.config)?;
        Ok(RuleSet {
            route,
            tone,
            styles,
            budget,
            accommodations,
        })
    }
}
