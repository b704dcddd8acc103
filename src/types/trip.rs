use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Budget tier selected on the form. Ordered: routing rules compare tiers
/// (e.g. cruise upgrades kick in at `Premium` and above).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BudgetTier {
    Essential,
    Premium,
    #[serde(rename = "Ultra-Luxury", alias = "UltraLuxury")]
    UltraLuxury,
}

impl BudgetTier {
    /// Per-day per-person USD band shown next to the tier on the form.
    pub fn daily_rate_usd(&self) -> (u32, u32) {
        match self {
            BudgetTier::Essential => (300, 500),
            BudgetTier::Premium => (700, 1_200),
            BudgetTier::UltraLuxury => (1_600, 2_500),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetTier::Essential => "Essential",
            BudgetTier::Premium => "Premium",
            BudgetTier::UltraLuxury => "Ultra-Luxury",
        }
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Travel style tags. Stored in a `BTreeSet` for set semantics and a
/// deterministic iteration order when prompts are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TravelStyle {
    #[serde(alias = "Historical & Archaeological Sites")]
    Historical,
    #[serde(alias = "Nature & Outdoors")]
    Nature,
    #[serde(alias = "Active Vacation")]
    Active,
    #[serde(alias = "Beaches, Relaxation & Sun")]
    Beach,
    #[serde(alias = "Experience Culture & Local Life")]
    Culture,
    Relaxation,
}

impl TravelStyle {
    pub fn label(&self) -> &'static str {
        match self {
            TravelStyle::Historical => "Historical & Archaeological Sites",
            TravelStyle::Nature => "Nature & Outdoors",
            TravelStyle::Active => "Active Vacation",
            TravelStyle::Beach => "Beaches, Relaxation & Sun",
            TravelStyle::Culture => "Experience Culture & Local Life",
            TravelStyle::Relaxation => "Relaxation & Leisure",
        }
    }

    /// Styles that pull the itinerary toward the Red Sea coast.
    pub fn is_beach_leaning(&self) -> bool {
        matches!(self, TravelStyle::Beach | TravelStyle::Relaxation)
    }
}

impl fmt::Display for TravelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trip composition, drives the tone directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripType {
    #[serde(alias = "Couple/Honeymoon")]
    Couple,
    Family,
    Group,
    Solo,
}

impl TripType {
    pub fn label(&self) -> &'static str {
        match self {
            TripType::Couple => "Couple/Honeymoon",
            TripType::Family => "Family",
            TripType::Group => "Group",
            TripType::Solo => "Solo",
        }
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Untrusted inbound shape from the form collaborator. Everything is
/// re-validated here; the caller's own validation is not trusted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TripForm {
    pub name: String,
    pub email: String,
    pub country: String,
    /// ISO `YYYY-MM-DD`
    pub start_date: String,
    /// Kept as text because the form widget submits text
    pub duration: String,
    pub budget_range: String,
    pub travel_style: Vec<String>,
    pub trip_type: String,
    pub group_size: u32,
    pub has_children: bool,
    pub additional_notes: String,
}

const MIN_DURATION_DAYS: u32 = 3;
const MAX_DURATION_DAYS: u32 = 30;

impl TripForm {
    /// Validate and normalize into an immutable [`TripSpecification`].
    pub fn validate(&self) -> Result<TripSpecification> {
        let traveler_name = required_text("name", &self.name)?;
        let origin_country = required_text("country", &self.country)?;

        let traveler_email = required_text("email", &self.email)?;
        if !traveler_email.contains('@') || !traveler_email.contains('.') {
            return Err(PlannerError::Specification(format!(
                "email `{traveler_email}` is not a plausible address"
            )));
        }

        let start_date = required_text("startDate", &self.start_date)?;
        check_iso_date(&start_date)?;

        let duration_days: u32 = self.duration.trim().parse().map_err(|_| {
            PlannerError::Specification(format!("duration `{}` is not a number", self.duration))
        })?;
        if !(MIN_DURATION_DAYS..=MAX_DURATION_DAYS).contains(&duration_days) {
            return Err(PlannerError::Specification(format!(
                "duration must be {MIN_DURATION_DAYS}-{MAX_DURATION_DAYS} days, got {duration_days}"
            )));
        }

        let budget_tier = parse_labeled("budgetRange", &self.budget_range)?;
        let trip_type = parse_labeled("tripType", &self.trip_type)?;

        if self.travel_style.is_empty() {
            return Err(PlannerError::Specification(
                "at least one travel style must be selected".to_string(),
            ));
        }
        let mut travel_styles = BTreeSet::new();
        for raw in &self.travel_style {
            let style: TravelStyle = parse_labeled("travelStyle", raw)?;
            travel_styles.insert(style);
        }

        if self.group_size < 1 {
            return Err(PlannerError::Specification(
                "party size must be at least 1".to_string(),
            ));
        }
        if self.has_children && self.group_size == 1 && trip_type != TripType::Family {
            return Err(PlannerError::Specification(
                "hasChildren requires a party larger than 1 or a Family trip".to_string(),
            ));
        }

        let additional_notes = match self.additional_notes.trim() {
            "" => None,
            notes => Some(notes.to_string()),
        };

        Ok(TripSpecification {
            traveler_name,
            traveler_email,
            origin_country,
            start_date,
            duration_days,
            budget_tier,
            travel_styles,
            trip_type,
            party_size: self.group_size,
            has_children: self.has_children,
            additional_notes,
        })
    }
}

fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::Specification(format!(
            "required field `{field}` is empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn parse_labeled<T: serde::de::DeserializeOwned>(field: &str, raw: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_string())).map_err(|_| {
        PlannerError::Specification(format!("`{raw}` is not a recognized value for `{field}`"))
    })
}

/// Structural date check only; the value is passed through to the prompt as-is.
fn check_iso_date(date: &str) -> Result<()> {
    let bad = || PlannerError::Specification(format!("startDate `{date}` is not YYYY-MM-DD"));
    let parts: Vec<&str> = date.split('-').collect();
    if parts.len() != 3 || parts[0].len() != 4 || parts[1].len() != 2 || parts[2].len() != 2 {
        return Err(bad());
    }
    let _year: u32 = parts[0].parse().map_err(|_| bad())?;
    let month: u32 = parts[1].parse().map_err(|_| bad())?;
    let day: u32 = parts[2].parse().map_err(|_| bad())?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(bad());
    }
    Ok(())
}

/// Validated, normalized trip preferences. Immutable once compiled; every
/// downstream component takes it by shared reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSpecification {
    pub traveler_name: String,
    pub traveler_email: String,
    pub origin_country: String,
    pub start_date: String,
    pub duration_days: u32,
    pub budget_tier: BudgetTier,
    pub travel_styles: BTreeSet<TravelStyle>,
    pub trip_type: TripType,
    pub party_size: u32,
    pub has_children: bool,
    pub additional_notes: Option<String>,
}

impl TripSpecification {
    pub fn has_style(&self, style: TravelStyle) -> bool {
        self.travel_styles.contains(&style)
    }

    pub fn wants_beach(&self) -> bool {
        self.travel_styles.iter().any(|s| s.is_beach_leaning())
    }
}
