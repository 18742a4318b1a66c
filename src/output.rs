//! Result records returned by generation and export.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One successful itinerary generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutput {
    /// Itinerary after the bold-to-heading pre-pass. This is what the session
    /// stores and later normalizes for display.
    pub itinerary: String,
    /// Text exactly as the model returned it.
    pub raw_text: String,
    pub stats: GenerationStats,
}

/// Bookkeeping for a generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub model: String,
    /// From `usageMetadata.promptTokenCount`; 0 when the service omits it.
    pub prompt_tokens: u32,
    /// From `usageMetadata.candidatesTokenCount`; 0 when omitted.
    pub output_tokens: u32,
    pub finish_reason: Option<String>,
    pub duration_ms: u64,
}

/// Where an exported PDF landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReport {
    pub path: PathBuf,
    pub pages: usize,
    pub bytes: usize,
}
