//! Business-data tables consumed by the rule engine.
//!
//! Budget bands, the cruise/hotel selection matrix, tone lexicons, and
//! minimum city stays are product data, not logic. They deserialize from
//! JSON so product can swap them without touching rule code;
//! [`RulesConfig::default`] carries the current production values.

use serde::{Deserialize, Serialize};

use crate::types::{BudgetTier, TripType};

/// Coarse duration partition used for quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationBucket {
    /// 3-5 days
    Short,
    /// 6-10 days
    Standard,
    /// 11+ days
    Extended,
}

impl DurationBucket {
    pub fn from_days(days: u32) -> Self {
        match days {
            0..=5 => DurationBucket::Short,
            6..=10 => DurationBucket::Standard,
            _ => DurationBucket::Extended,
        }
    }
}

/// Per-person USD quote range for one (tier, bucket) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetBand {
    pub tier: BudgetTier,
    pub bucket: DurationBucket,
    pub min_usd: u32,
    pub max_usd: u32,
    /// Render the upper bound with a trailing "+"
    #[serde(default)]
    pub open_ended: bool,
}

impl BudgetBand {
    pub fn display_range(&self) -> String {
        let plus = if self.open_ended { "+" } else { "" };
        format!(
            "${} - ${}{} per person",
            group_thousands(self.min_usd),
            group_thousands(self.max_usd),
            plus
        )
    }
}

fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Accommodation archetypes the matrix can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccommodationKind {
    Hotel,
    StandardCruise,
    DahabiyaCruise,
}

/// One row of the accommodation decision table. A row applies when every
/// predicate field matches the trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccommodationRow {
    pub kind: AccommodationKind,
    pub name: String,
    pub type_label: String,
    pub description: String,
    /// Trip types this row serves; empty means any.
    #[serde(default)]
    pub trip_types: Vec<TripType>,
    pub min_tier: BudgetTier,
    #[serde(default)]
    pub max_tier: Option<BudgetTier>,
    /// Some(true): only with children; Some(false): only without.
    #[serde(default)]
    pub children: Option<bool>,
    /// Upper bound on party size, e.g. Dahabiya charters.
    #[serde(default)]
    pub max_party: Option<u32>,
}

/// Tone lexicon for one trip type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneRow {
    pub trip_type: TripType,
    pub register: String,
    pub encouraged: Vec<String>,
    pub forbidden: Vec<String>,
}

/// Minimum nights a routed city needs to be worth visiting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MinStays {
    pub cairo: u32,
    pub luxor: u32,
    pub aswan: u32,
    pub red_sea: u32,
}

/// The full swappable table set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    pub budget_bands: Vec<BudgetBand>,
    pub accommodations: Vec<AccommodationRow>,
    pub tones: Vec<ToneRow>,
    pub min_stays: MinStays,
}

impl RulesConfig {
    pub fn band(&self, tier: BudgetTier, bucket: DurationBucket) -> Option<&BudgetBand> {
        self.budget_bands
            .iter()
            .find(|b| b.tier == tier && b.bucket == bucket)
    }

    pub fn tone(&self, trip_type: TripType) -> Option<&ToneRow> {
        self.tones.iter().find(|t| t.trip_type == trip_type)
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            budget_bands: default_budget_bands(),
            accommodations: default_accommodations(),
            tones: default_tones(),
            min_stays: MinStays {
                cairo: 2,
                luxor: 2,
                aswan: 1,
                red_sea: 3,
            },
        }
    }
}

fn default_budget_bands() -> Vec<BudgetBand> {
    use BudgetTier::*;
    use DurationBucket::*;
    let band = |tier, bucket, min_usd, max_usd, open_ended| BudgetBand {
        tier,
        bucket,
        min_usd,
        max_usd,
        open_ended,
    };
    vec![
        band(Essential, Short, 1_500, 2_500, false),
        band(Essential, Standard, 2_500, 4_000, false),
        band(Essential, Extended, 3_500, 5_500, false),
        band(Premium, Short, 4_000, 7_000, false),
        band(Premium, Standard, 7_000, 12_000, false),
        band(Premium, Extended, 10_000, 16_000, false),
        band(UltraLuxury, Short, 8_000, 15_000, false),
        band(UltraLuxury, Standard, 15_000, 25_000, true),
        band(UltraLuxury, Extended, 20_000, 35_000, true),
    ]
}

fn default_tones() -> Vec<ToneRow> {
    let row = |trip_type, register: &str, encouraged: &[&str], forbidden: &[&str]| ToneRow {
        trip_type,
        register: register.to_string(),
        encouraged: encouraged.iter().map(|s| s.to_string()).collect(),
        forbidden: forbidden.iter().map(|s| s.to_string()).collect(),
    };
    vec![
        row(
            TripType::Couple,
            "romantic",
            &[
                "Romantic Dinner",
                "Sunset Felucca",
                "Intimate Moments",
                "Couples' Experience",
            ],
            &[],
        ),
        row(
            TripType::Family,
            "family-safe",
            &[
                "Family Adventure",
                "Interactive Tour",
                "Educational Experience",
                "Kid-Friendly",
            ],
            // The family register must never borrow couple vocabulary.
            &["romantic", "couple", "honeymoon", "intimate"],
        ),
        row(
            TripType::Solo,
            "personal-discovery",
            &[
                "Personal Discovery",
                "Cultural Immersion",
                "Flexible Pace",
            ],
            &[],
        ),
        row(
            TripType::Group,
            "group-camaraderie",
            &[
                "Shared Experiences",
                "Group Dynamics",
                "Camaraderie",
            ],
            &[],
        ),
    ]
}

fn default_accommodations() -> Vec<AccommodationRow> {
    use AccommodationKind::*;
    use BudgetTier::*;
    use TripType::*;

    let row = |kind,
               name: &str,
               type_label: &str,
               description: &str,
               trip_types: &[TripType],
               min_tier,
               max_tier,
               children,
               max_party| AccommodationRow {
        kind,
        name: name.to_string(),
        type_label: type_label.to_string(),
        description: description.to_string(),
        trip_types: trip_types.to_vec(),
        min_tier,
        max_tier,
        children,
        max_party,
    };

    vec![
        // Hotels
        row(
            Hotel,
            "Steigenberger Pyramids Cairo",
            "4-Star Hotel",
            "Reliable comfort with pyramid views, close to the Giza plateau.",
            &[],
            Essential,
            Some(Essential),
            None,
            None,
        ),
        row(
            Hotel,
            "Marriott Mena House Cairo",
            "5-Star Hotel",
            "Historic palace hotel in the shadow of the Great Pyramid.",
            &[],
            Premium,
            Some(Premium),
            None,
            None,
        ),
        row(
            Hotel,
            "Sofitel Winter Palace Luxor",
            "5-Star Heritage Hotel",
            "Victorian-era grande dame on the Luxor corniche.",
            &[],
            Premium,
            None,
            None,
            None,
        ),
        row(
            Hotel,
            "The Ritz-Carlton Cairo",
            "5-Star Hotel",
            "Nile-front luxury in the heart of downtown Cairo.",
            &[],
            UltraLuxury,
            None,
            None,
            None,
        ),
        // Standard cruises: fixed departure schedules, premium drinks upsold.
        row(
            StandardCruise,
            "MS Mayfair",
            "Nile Cruise",
            "Stunning design and good value; 4-night sailings with fixed \
             departures (Luxor Saturdays, Aswan Mondays). Premium drinks and \
             some excursions are charged on board.",
            &[],
            Essential,
            Some(Premium),
            None,
            None,
        ),
        row(
            StandardCruise,
            "Sonesta St. George",
            "Nile Cruise",
            "Spacious family suites and a large pool; fixed departure \
             schedule, premium drinks upsold on board.",
            &[Family, Group],
            Essential,
            None,
            Some(true),
            None,
        ),
        row(
            StandardCruise,
            "Mövenpick Royal Lily",
            "Luxury Nile Cruise",
            "Renovated and refined with best-in-class dining; fixed \
             departures (Luxor Saturdays, Aswan Mondays), premium alcohol \
             charged separately.",
            &[Couple, Solo, Family],
            Premium,
            None,
            None,
            None,
        ),
        row(
            StandardCruise,
            "Oberoi Zahra",
            "Luxury Nile Cruise",
            "Impeccable service and spacious suites; the most refined of the \
             standard fleet, on a fixed itinerary.",
            &[Couple, Solo, Family],
            UltraLuxury,
            None,
            None,
            None,
        ),
        // Dahabiya: boutique sail charter, everything included.
        row(
            DahabiyaCruise,
            "Nebyt Dahabiya",
            "Dahabiya Cruise",
            "Private sail-powered boutique vessel with 8-12 cabins; flexible \
             itinerary, slower pace, and fully inclusive: all meals, drinks, \
             and excursions.",
            &[Couple, Group, Solo],
            Premium,
            None,
            None,
            Some(8),
        ),
    ]
}
