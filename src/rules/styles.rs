use serde::{Deserialize, Serialize};

use crate::types::{TravelStyle, TripSpecification};

/// Activity bias contributed by one selected style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleBias {
    pub style: TravelStyle,
    /// Categories to lean into
    pub emphasize: Vec<String>,
    /// Categories to keep out or downplay
    pub avoid: Vec<String>,
    /// Framing note applied without removing headline sights
    pub framing: Option<String>,
}

/// Combined bias for all selected styles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylePlan {
    pub biases: Vec<StyleBias>,
    /// Present when more than one style is selected: alternate emphasis
    /// across days instead of cramming everything into each day.
    pub balancing_note: Option<String>,
}

pub fn resolve_styles(spec: &TripSpecification) -> StylePlan {
    let biases: Vec<StyleBias> = spec.travel_styles.iter().map(|s| bias_for(*s)).collect();
    let balancing_note = if biases.len() > 1 {
        Some(
            "Multiple styles selected: balance them by alternating emphasis \
             across days with a logical flow; do not cram every interest into \
             every day."
                .to_string(),
        )
    } else {
        None
    };
    StylePlan {
        biases,
        balancing_note,
    }
}

fn bias_for(style: TravelStyle) -> StyleBias {
    let (emphasize, avoid, framing): (&[&str], &[&str], Option<&str>) = match style {
        TravelStyle::Historical => (
            &[
                "Egyptologist-guided tours with archaeological depth",
                "lesser-known sites such as Dendera and Abydos when time permits",
            ],
            &["rushed photo stops without context"],
            None,
        ),
        TravelStyle::Nature => (
            &[
                "Aswan botanical gardens and Nile bird watching",
                "sunset felucca sailing",
                "Luxor hot air balloon at dawn and village cycling",
            ],
            &["long indoor museum blocks back to back"],
            Some(
                "Keep the headline monuments; frame Giza and the temples as \
                 open-air landscape experiences rather than dropping them.",
            ),
        ),
        TravelStyle::Active => (
            &[
                "hiking, biking, snorkeling, and desert safaris",
                "quad biking or camel rides near the pyramids",
            ],
            &["sedentary full-day coach touring"],
            None,
        ),
        TravelStyle::Beach => (
            &[
                "Red Sea time when duration allows",
                "pool afternoons and felucca rides on shorter trips",
            ],
            &["overpacked sightseeing on coast days"],
            None,
        ),
        TravelStyle::Culture => (
            &[
                "markets, village visits, and food tours",
                "Nubian village visits in Aswan",
                "traditional performances such as Tanoura",
            ],
            &[],
            None,
        ),
        TravelStyle::Relaxation => (
            &[
                "a slower pace: start after 9 AM, finish by 3 PM",
                "daily spa, pool, or free time",
                "sunset experiences such as rooftop dining",
            ],
            &["early-morning starts on consecutive days"],
            None,
        ),
    };
    StyleBias {
        style,
        emphasize: emphasize.iter().map(|s| s.to_string()).collect(),
        avoid: avoid.iter().map(|s| s.to_string()).collect(),
        framing: framing.map(|s| s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TripForm;

    fn spec_with_styles(styles: &[&str]) -> TripSpecification {
        TripForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            country: "UK".into(),
            start_date: "2026-10-01".into(),
            duration: "7".into(),
            budget_range: "Premium".into(),
            travel_style: styles.iter().map(|s| s.to_string()).collect(),
            trip_type: "Solo".into(),
            group_size: 1,
            has_children: false,
            additional_notes: String::new(),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn single_style_has_no_balancing_note() {
        let plan = resolve_styles(&spec_with_styles(&["Historical"]));
        assert_eq!(plan.biases.len(), 1);
        assert!(plan.balancing_note.is_none());
    }

    #[test]
    fn multiple_styles_union_with_balancing_note() {
        let plan = resolve_styles(&spec_with_styles(&["Historical", "Nature", "Culture"]));
        assert_eq!(plan.biases.len(), 3);
        assert!(plan.balancing_note.is_some());
    }

    #[test]
    fn nature_bias_keeps_headline_monuments() {
        let plan = resolve_styles(&spec_with_styles(&["Nature"]));
        let framing = plan.biases[0].framing.as_deref().unwrap();
        assert!(framing.contains("headline monuments"));
    }

    #[test]
    fn duplicate_selections_collapse() {
        // Set semantics on the spec side: the same style twice is one bias.
        let plan = resolve_styles(&spec_with_styles(&["Nature", "Nature & Outdoors"]));
        assert_eq!(plan.biases.len(), 1);
    }
}
