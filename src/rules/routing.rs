use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    config::RulesConfig,
    error::{PlannerError, Result},
    types::{BudgetTier, TripSpecification},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum City {
    Cairo,
    Luxor,
    Aswan,
    AbuSimbel,
    Hurghada,
}

impl City {
    pub fn label(&self) -> &'static str {
        match self {
            City::Cairo => "Cairo",
            City::Luxor => "Luxor",
            City::Aswan => "Aswan",
            City::AbuSimbel => "Abu Simbel",
            City::Hurghada => "Hurghada",
        }
    }

    pub fn is_upper_egypt(&self) -> bool {
        matches!(self, City::Luxor | City::Aswan | City::AbuSimbel)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferMode {
    Flight,
    Road,
    Cruise,
}

impl TransferMode {
    pub fn label(&self) -> &'static str {
        match self {
            TransferMode::Flight => "flight",
            TransferMode::Road => "road",
            TransferMode::Cruise => "cruise",
        }
    }
}

/// Ground-only modes for the Luxor-Aswan corridor. There is no scheduled
/// flight on that route, so the type makes a flight leg unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorridorMode {
    Road,
    Cruise,
}

impl From<CorridorMode> for TransferMode {
    fn from(mode: CorridorMode) -> Self {
        match mode {
            CorridorMode::Road => TransferMode::Road,
            CorridorMode::Cruise => TransferMode::Cruise,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub from: City,
    pub to: City,
    pub mode: TransferMode,
}

impl RouteLeg {
    fn new(from: City, to: City, mode: TransferMode) -> Self {
        Self { from, to, mode }
    }
}

impl fmt::Display for RouteLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.mode.label())
    }
}

/// Resolved travel legs plus the day allocation that justified them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConstraint {
    pub legs: Vec<RouteLeg>,
    /// First Upper-Egypt city, when the trip goes south.
    pub upper_egypt_start: Option<City>,
    pub cairo_days: u32,
    pub upper_egypt_days: u32,
    pub red_sea_days: u32,
    /// Abu Simbel is a same-day excursion out of Aswan, not a routing leg;
    /// it never appears in `legs`.
    pub includes_abu_simbel: bool,
}

impl RouteConstraint {
    pub fn visits(&self, city: City) -> bool {
        self.legs.iter().any(|l| l.from == city || l.to == city)
    }

    pub fn has_cruise_leg(&self) -> bool {
        self.legs.iter().any(|l| l.mode == TransferMode::Cruise)
    }

    pub fn flight_legs(&self) -> impl Iterator<Item = &RouteLeg> {
        self.legs
            .iter()
            .filter(|l| l.mode == TransferMode::Flight)
    }
}

/// Resolve the route for a validated specification.
///
/// City-set derivation: 3-5 days stay in Cairo; 6-7 add Luxor round trip;
/// 8+ cover both Luxor and Aswan in a one-way flow. Beach-leaning trips of
/// 12+ days extend to the Red Sea after the Upper-Egypt portion, which flips
/// the southern flow to start in Aswan so Luxor is the last cultural stop
/// before the coast.
pub fn resolve_route(spec: &TripSpecification, config: &RulesConfig) -> Result<RouteConstraint> {
    let duration = spec.duration_days;
    let red_sea = spec.wants_beach() && duration >= 12;
    let (visit_luxor, visit_aswan) = match duration {
        0..=5 => (false, false),
        6..=7 => (true, false),
        _ => (true, true),
    };
    let includes_abu_simbel = visit_aswan && duration >= 8;

    let stays = &config.min_stays;
    let mut required = stays.cairo;
    if visit_luxor {
        required += stays.luxor;
    }
    if visit_aswan {
        required += stays.aswan;
    }
    if red_sea {
        required += stays.red_sea;
    }
    if required > duration {
        return Err(PlannerError::RuleConflict(format!(
            "{duration}-day trip cannot cover the derived stops: minimum stays total {required} days"
        )));
    }

    let red_sea_days = if red_sea {
        if duration >= 14 {
            stays.red_sea + 1
        } else {
            stays.red_sea
        }
    } else {
        0
    };
    let (cairo_days, upper_egypt_days) = if visit_luxor || visit_aswan {
        let cairo =
            (if duration >= 7 { 3 } else { 2 }).min(duration.saturating_sub(red_sea_days));
        (cairo, duration.saturating_sub(cairo + red_sea_days))
    } else {
        (duration.saturating_sub(red_sea_days), 0)
    };

    let mut legs = Vec::new();
    let mut upper_egypt_start = None;

    match (visit_luxor, visit_aswan) {
        (false, false) => {}
        (true, false) => {
            upper_egypt_start = Some(City::Luxor);
            legs.push(RouteLeg::new(City::Cairo, City::Luxor, TransferMode::Flight));
            legs.push(RouteLeg::new(City::Luxor, City::Cairo, TransferMode::Flight));
        }
        both => {
            debug_assert!(matches!(both, (true, true)));
            let corridor = corridor_mode(upper_egypt_days, spec.budget_tier);
            if red_sea {
                // Cairo -> Aswan -> Luxor -> Hurghada -> Cairo
                upper_egypt_start = Some(City::Aswan);
                legs.push(RouteLeg::new(City::Cairo, City::Aswan, TransferMode::Flight));
                legs.push(RouteLeg::new(City::Aswan, City::Luxor, corridor.into()));
                let coast_mode = if spec.budget_tier == BudgetTier::UltraLuxury {
                    TransferMode::Flight
                } else {
                    TransferMode::Road
                };
                legs.push(RouteLeg::new(City::Luxor, City::Hurghada, coast_mode));
                legs.push(RouteLeg::new(
                    City::Hurghada,
                    City::Cairo,
                    TransferMode::Flight,
                ));
            } else {
                // Cairo -> Luxor -> Aswan -> Cairo
                upper_egypt_start = Some(City::Luxor);
                legs.push(RouteLeg::new(City::Cairo, City::Luxor, TransferMode::Flight));
                legs.push(RouteLeg::new(City::Luxor, City::Aswan, corridor.into()));
                legs.push(RouteLeg::new(City::Aswan, City::Cairo, TransferMode::Flight));
            }
        }
    }

    Ok(RouteConstraint {
        legs,
        upper_egypt_start,
        cairo_days,
        upper_egypt_days,
        red_sea_days,
        includes_abu_simbel,
    })
}

/// Road by default; cruise once the southern portion is long enough to make
/// the sailing worthwhile, or for Premium budgets and above.
fn corridor_mode(upper_egypt_days: u32, tier: BudgetTier) -> CorridorMode {
    if upper_egypt_days >= 4 || tier >= BudgetTier::Premium {
        CorridorMode::Cruise
    } else {
        CorridorMode::Road
    }
}

/// How the Abu Simbel day trip travels out of Aswan.
pub fn abu_simbel_mode(tier: BudgetTier) -> TransferMode {
    if tier == BudgetTier::UltraLuxury {
        TransferMode::Flight
    } else {
        TransferMode::Road
    }
}
