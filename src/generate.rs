//! One-shot entry points: request in, itinerary Markdown out.
//!
//! These skip the session bookkeeping (no form state, no notifications).
//! Use [`crate::session::ItineraryGenerator`] when you need the fallback
//! message and toasts.

use crate::client::{GeminiClient, GenerationClient};
use crate::config::GenerationConfig;
use crate::error::ItineraryError;
use crate::output::GenerationOutput;
use crate::pipeline::llm::request_itinerary;
use crate::prompts::build_prompt;
use crate::request::ItineraryRequest;
use std::path::Path;
use tracing::info;

/// Generate an itinerary with the Gemini API.
///
/// Reads the API key from `config.api_key` or the `config.api_key_env`
/// environment variable (default `GEMINI_API_KEY`).
pub async fn generate_itinerary(
    request: &ItineraryRequest,
    config: &GenerationConfig,
) -> Result<GenerationOutput, ItineraryError> {
    generate_itinerary_with(&GeminiClient::new(), request, config).await
}

/// Generate an itinerary with any [`GenerationClient`].
pub async fn generate_itinerary_with(
    client: &dyn GenerationClient,
    request: &ItineraryRequest,
    config: &GenerationConfig,
) -> Result<GenerationOutput, ItineraryError> {
    info!(
        "Generating {}-style itinerary for {} ({}) with {}",
        request.lifestyle(),
        request.destination(),
        request.duration(),
        config.model
    );
    let prompt = build_prompt(request);
    let output = request_itinerary(client, &prompt, config).await?;
    info!(
        "Itinerary ready: {} chars in {} ms",
        output.itinerary.len(),
        output.stats.duration_ms
    );
    Ok(output)
}

/// Blocking wrapper around [`generate_itinerary`].
///
/// Creates a temporary tokio runtime; do not call from inside one.
pub fn generate_itinerary_sync(
    request: &ItineraryRequest,
    config: &GenerationConfig,
) -> Result<GenerationOutput, ItineraryError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ItineraryError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate_itinerary(request, config))
}

/// Generate an itinerary and write its Markdown to `output_path`.
///
/// Parent directories are created as needed.
pub async fn generate_to_file(
    request: &ItineraryRequest,
    output_path: impl AsRef<Path>,
    config: &GenerationConfig,
) -> Result<GenerationOutput, ItineraryError> {
    let output = generate_itinerary(request, config).await?;
    write_markdown(output_path.as_ref(), &output.itinerary).await?;
    Ok(output)
}

/// Write itinerary Markdown to `path`, creating parent directories.
pub async fn write_markdown(path: &Path, markdown: &str) -> Result<(), ItineraryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ItineraryError::OutputWriteFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }
    tokio::fs::write(path, markdown)
        .await
        .map_err(|e| ItineraryError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}
