//! The itinerary request: the four trip parameters a user submits.
//!
//! A request is built once at submit time and never mutated afterwards; the
//! session hands it to the prompt builder by reference and drops it when the
//! generation call resolves.

use crate::error::ItineraryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Travel style, passed to the prompt verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifestyle {
    Luxury,
    Comfort,
    Budget,
    Backpacker,
}

impl Lifestyle {
    /// All categories, in the order a picker would list them.
    pub const ALL: [Lifestyle; 4] = [
        Lifestyle::Luxury,
        Lifestyle::Comfort,
        Lifestyle::Budget,
        Lifestyle::Backpacker,
    ];

    /// Lowercase wire name (`"luxury"`, `"comfort"`, …).
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifestyle::Luxury => "luxury",
            Lifestyle::Comfort => "comfort",
            Lifestyle::Budget => "budget",
            Lifestyle::Backpacker => "backpacker",
        }
    }
}

impl fmt::Display for Lifestyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lifestyle {
    type Err = ItineraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Lifestyle::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ItineraryError::UnknownLifestyle {
                value: s.to_string(),
            })
    }
}

/// Trip parameters for one generation.
///
/// Free-text fields are stored trimmed. Construction fails when any of them
/// is blank, which is the only validation the form ever performed.
/// Deserialization goes through the same check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRequest")]
pub struct ItineraryRequest {
    destination: String,
    budget: String,
    lifestyle: Lifestyle,
    duration: String,
}

impl ItineraryRequest {
    pub fn new(
        destination: impl Into<String>,
        budget: impl Into<String>,
        lifestyle: Lifestyle,
        duration: impl Into<String>,
    ) -> Result<Self, ItineraryError> {
        Ok(Self {
            destination: required("destination", destination.into())?,
            budget: required("budget", budget.into())?,
            lifestyle,
            duration: required("duration", duration.into())?,
        })
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn budget(&self) -> &str {
        &self.budget
    }

    pub fn lifestyle(&self) -> Lifestyle {
        self.lifestyle
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }
}

#[derive(Deserialize)]
struct RawRequest {
    destination: String,
    budget: String,
    lifestyle: Lifestyle,
    duration: String,
}

impl TryFrom<RawRequest> for ItineraryRequest {
    type Error = ItineraryError;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        ItineraryRequest::new(raw.destination, raw.budget, raw.lifestyle, raw.duration)
    }
}

fn required(field: &'static str, value: String) -> Result<String, ItineraryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ItineraryError::InvalidRequest { field });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifestyle_parses_case_insensitively() {
        assert_eq!("Luxury".parse::<Lifestyle>().unwrap(), Lifestyle::Luxury);
        assert_eq!(" backpacker ".parse::<Lifestyle>().unwrap(), Lifestyle::Backpacker);
        assert!(matches!(
            "glamping".parse::<Lifestyle>(),
            Err(ItineraryError::UnknownLifestyle { .. })
        ));
    }

    #[test]
    fn lifestyle_serialises_lowercase() {
        let json = serde_json::to_string(&Lifestyle::Comfort).unwrap();
        assert_eq!(json, "\"comfort\"");
        assert_eq!(Lifestyle::Budget.to_string(), "budget");
    }

    #[test]
    fn deserialization_validates_fields() {
        let ok: ItineraryRequest = serde_json::from_str(
            r#"{"destination": " Tokyo ", "budget": "¥150,000", "lifestyle": "budget", "duration": "5 days"}"#,
        )
        .unwrap();
        assert_eq!(ok.destination(), "Tokyo");

        let err = serde_json::from_str::<ItineraryRequest>(
            r#"{"destination": "   ", "budget": "¥150,000", "lifestyle": "budget", "duration": "5 days"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("'destination' is required"));
    }

    #[test]
    fn request_trims_fields() {
        let req = ItineraryRequest::new("  Lisbon ", "€900", Lifestyle::Comfort, "3 days\n").unwrap();
        assert_eq!(req.destination(), "Lisbon");
        assert_eq!(req.duration(), "3 days");
    }

    #[test]
    fn blank_field_is_rejected() {
        let err = ItineraryRequest::new("Tokyo, Japan", "   ", Lifestyle::Budget, "5 days")
            .unwrap_err();
        assert!(matches!(err, ItineraryError::InvalidRequest { field: "budget" }));
    }
}
