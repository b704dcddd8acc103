use serde::{Deserialize, Serialize};

use crate::{
    config::RulesConfig,
    error::{PlannerError, Result},
    types::TripType,
};

/// Language register the generated itinerary must adopt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneDirective {
    pub register: String,
    pub encouraged: Vec<String>,
    /// Vocabulary the register must not use (e.g. romantic terms for Family).
    pub forbidden: Vec<String>,
}

impl ToneDirective {
    pub fn forbids(&self, term: &str) -> bool {
        let needle = term.to_ascii_lowercase();
        self.forbidden
            .iter()
            .any(|f| f.to_ascii_lowercase() == needle)
    }
}

pub fn resolve_tone(trip_type: TripType, config: &RulesConfig) -> Result<ToneDirective> {
    let row = config.tone(trip_type).ok_or_else(|| {
        PlannerError::Config(format!("no tone lexicon configured for {trip_type}"))
    })?;
    Ok(ToneDirective {
        register: row.register.clone(),
        encouraged: row.encouraged.clone(),
        forbidden: row.forbidden.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_tone_forbids_romantic_vocabulary() {
        let tone = resolve_tone(TripType::Family, &RulesConfig::default()).unwrap();
        assert_eq!(tone.register, "family-safe");
        for term in ["romantic", "couple", "honeymoon", "intimate"] {
            assert!(tone.forbids(term), "{term} should be forbidden");
        }
    }

    #[test]
    fn couple_tone_is_romantic() {
        let tone = resolve_tone(TripType::Couple, &RulesConfig::default()).unwrap();
        assert_eq!(tone.register, "romantic");
        assert!(tone.forbidden.is_empty());
    }
}
