//! Prompt construction for itinerary generation.
//!
//! Every instruction the model sees lives here so that prompt regressions are
//! caught by unit tests without a network call. The request is embedded as a
//! pretty-printed JSON block; the layout instructions that follow it are the
//! contract the post-processing rules in
//! [`crate::pipeline::postprocess`] are written against (`# Day X`,
//! `## Morning`, …, `## Extra Remarks`).

use crate::request::{ItineraryRequest, Lifestyle};
use serde::Serialize;

/// Content every itinerary must cover, sent to the model inside the JSON block.
pub const MUST_INCLUDE: [&str; 5] = [
    "daily activities with times",
    "estimated costs",
    "local transportation",
    "restaurant recommendations",
    "must-see attractions",
];

const PREAMBLE: &str = "As an expert travel planner with over 20 years of experience, create a \
detailed itinerary based on these specifications. The budget provided is in the native currency \
of the destination:";

/// Fixed formatting instructions appended after the request block.
pub const FORMAT_INSTRUCTIONS: &str = r#"Format the response in pure Markdown. For each day, use exactly this structure:

# Day X

## Morning (e.g., 9:00 AM - 12:00 PM)
- Activity - Location - **Estimated Cost**

## Afternoon (e.g., 1:00 PM - 4:00 PM)
- Activity - Location - **Estimated Cost**

## Evening (e.g., 7:00 PM - 10:00 PM)
- Activity - Location - **Estimated Cost**

Include:
* Specific time slots for each activity
* Exact locations (not just general areas)
* Realistic cost estimates in local currency
* Transportation details between locations
* Meal recommendations at local restaurants
* Cultural insights and travel tips

Make sure the itinerary:
1. Matches the specified lifestyle preference
2. Stays within the budget
3. Includes local authentic experiences
4. Considers realistic travel times between locations
5. Balances tourist attractions with local experiences

At the end of the itinerary, include:

## Extra Remarks
- Add any additional insights or travel tips.

Do not use redundant # symbols or include HTML tags. Use only valid Markdown syntax."#;

#[derive(Serialize)]
struct StructuredPrompt<'a> {
    destination: &'a str,
    budget: &'a str,
    lifestyle: Lifestyle,
    duration: &'a str,
    requirements: Requirements,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Requirements {
    must_include: [&'static str; 5],
    format: &'static str,
}

/// Build the full prompt for one request.
pub fn build_prompt(request: &ItineraryRequest) -> String {
    let structured = StructuredPrompt {
        destination: request.destination(),
        budget: request.budget(),
        lifestyle: request.lifestyle(),
        duration: request.duration(),
        requirements: Requirements {
            must_include: MUST_INCLUDE,
            format: "structured daily itinerary",
        },
    };
    // Only &str, enum and array fields: serialisation cannot fail.
    let block = serde_json::to_string_pretty(&structured).unwrap_or_default();

    format!("{PREAMBLE}\n\n{block}\n\n{FORMAT_INSTRUCTIONS}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokyo() -> ItineraryRequest {
        ItineraryRequest::new("Tokyo, Japan", "₹50,000", Lifestyle::Budget, "5 days").unwrap()
    }

    #[test]
    fn prompt_embeds_request_fields() {
        let prompt = build_prompt(&tokyo());
        assert!(prompt.contains("Tokyo, Japan"));
        assert!(prompt.contains("₹50,000"));
        assert!(prompt.contains("\"lifestyle\": \"budget\""));
        assert!(prompt.contains("5 days"));
    }

    #[test]
    fn prompt_carries_layout_markers() {
        let prompt = build_prompt(&tokyo());
        assert!(prompt.contains("# Day X"));
        assert!(prompt.contains("## Morning"));
        assert!(prompt.contains("## Afternoon"));
        assert!(prompt.contains("## Evening"));
        assert!(prompt.contains("## Extra Remarks"));
    }

    #[test]
    fn prompt_lists_requirements() {
        let prompt = build_prompt(&tokyo());
        for item in MUST_INCLUDE {
            assert!(prompt.contains(item), "missing requirement: {item}");
        }
        assert!(prompt.contains("\"mustInclude\""));
    }
}
