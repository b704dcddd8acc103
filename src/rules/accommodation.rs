use serde::{Deserialize, Serialize};

use crate::{
    config::{AccommodationKind, AccommodationRow, RulesConfig},
    error::{PlannerError, Result},
    rules::routing::RouteConstraint,
    types::TripSpecification,
};

/// One selected accommodation archetype, ready for the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccommodationCandidate {
    pub kind: AccommodationKind,
    pub name: String,
    pub type_label: String,
    pub description: String,
}

impl From<&AccommodationRow> for AccommodationCandidate {
    fn from(row: &AccommodationRow) -> Self {
        Self {
            kind: row.kind,
            name: row.name.clone(),
            type_label: row.type_label.clone(),
            description: row.description.clone(),
        }
    }
}

const MAX_CANDIDATES: usize = 3;

/// Walk the decision table and pick 2-3 candidates for this trip.
///
/// Cruise archetypes are only eligible when the compiled route actually has
/// a cruise leg; Cairo-only trips therefore come back hotels-only. When a
/// cruise leg exists the selection keeps one hotel for the city nights and
/// fills the rest with the best-matching cruises, boutique first.
pub fn select_accommodations(
    spec: &TripSpecification,
    route: &RouteConstraint,
    config: &RulesConfig,
) -> Result<Vec<AccommodationCandidate>> {
    let cruise_possible = route.has_cruise_leg();

    let mut eligible: Vec<&AccommodationRow> = config
        .accommodations
        .iter()
        .filter(|row| row_matches(row, spec, cruise_possible))
        .collect();

    // Boutique first, then standard cruises, then hotels; richer tiers ahead
    // within each group.
    eligible.sort_by_key(|row| {
        let kind_rank = match row.kind {
            AccommodationKind::DahabiyaCruise => 0,
            AccommodationKind::StandardCruise => 1,
            AccommodationKind::Hotel => 2,
        };
        (kind_rank, std::cmp::Reverse(row.min_tier))
    });

    let mut picked: Vec<AccommodationCandidate> = Vec::new();
    if cruise_possible {
        // Guarantee a hotel for the Cairo nights before the cruise slots
        // crowd the list out.
        if let Some(hotel) = eligible
            .iter()
            .find(|r| r.kind == AccommodationKind::Hotel)
        {
            picked.push((*hotel).into());
        }
    }
    for row in &eligible {
        if picked.len() >= MAX_CANDIDATES {
            break;
        }
        if picked.iter().any(|c| c.name == row.name) {
            continue;
        }
        picked.push((*row).into());
    }

    if picked.is_empty() {
        return Err(PlannerError::Config(format!(
            "accommodation table has no row for {} / {} (party of {})",
            spec.trip_type, spec.budget_tier, spec.party_size
        )));
    }
    Ok(picked)
}

fn row_matches(row: &AccommodationRow, spec: &TripSpecification, cruise_possible: bool) -> bool {
    if row.kind != AccommodationKind::Hotel && !cruise_possible {
        return false;
    }
    if spec.budget_tier < row.min_tier {
        return false;
    }
    if let Some(max_tier) = row.max_tier {
        if spec.budget_tier > max_tier {
            return false;
        }
    }
    if !row.trip_types.is_empty() && !row.trip_types.contains(&spec.trip_type) {
        return false;
    }
    if let Some(children) = row.children {
        if children != spec.has_children {
            return false;
        }
    }
    if let Some(max_party) = row.max_party {
        if spec.party_size > max_party {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::routing::resolve_route;
    use crate::types::TripForm;

    fn spec(
        duration: u32,
        tier: &str,
        trip_type: &str,
        group_size: u32,
        has_children: bool,
    ) -> TripSpecification {
        TripForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            country: "UK".into(),
            start_date: "2026-10-01".into(),
            duration: duration.to_string(),
            budget_range: tier.into(),
            travel_style: vec!["Culture".into()],
            trip_type: trip_type.into(),
            group_size,
            has_children,
            additional_notes: String::new(),
        }
        .validate()
        .unwrap()
    }

    fn select(spec: &TripSpecification) -> Vec<AccommodationCandidate> {
        let config = RulesConfig::default();
        let route = resolve_route(spec, &config).unwrap();
        select_accommodations(spec, &route, &config).unwrap()
    }

    #[test]
    fn cairo_only_trip_gets_hotels_only() {
        let picked = select(&spec(5, "Essential", "Family", 4, true));
        assert!(!picked.is_empty());
        assert!(picked
            .iter()
            .all(|c| c.kind == AccommodationKind::Hotel));
    }

    #[test]
    fn ultra_luxury_couple_gets_a_dahabiya_option() {
        let picked = select(&spec(10, "Ultra-Luxury", "Couple", 2, false));
        assert!(picked.len() >= 2 && picked.len() <= 3);
        assert!(picked
            .iter()
            .any(|c| c.kind == AccommodationKind::DahabiyaCruise));
        assert!(picked
            .iter()
            .any(|c| c.kind == AccommodationKind::Hotel));
    }

    #[test]
    fn family_with_children_gets_the_family_cruise() {
        let picked = select(&spec(9, "Essential", "Family", 4, true));
        assert!(picked.iter().any(|c| c.name == "Sonesta St. George"));
        assert!(!picked
            .iter()
            .any(|c| c.kind == AccommodationKind::DahabiyaCruise));
    }

    #[test]
    fn large_groups_do_not_fit_a_dahabiya() {
        let picked = select(&spec(10, "Premium", "Group", 14, false));
        assert!(!picked
            .iter()
            .any(|c| c.kind == AccommodationKind::DahabiyaCruise));
    }

    #[test]
    fn never_more_than_three_candidates() {
        for tier in ["Essential", "Premium", "Ultra-Luxury"] {
            for trip_type in ["Couple", "Family", "Group", "Solo"] {
                let picked = select(&spec(10, tier, trip_type, 2, false));
                assert!((1..=3).contains(&picked.len()), "{tier}/{trip_type}");
            }
        }
    }
}
