//! Model interaction: send one prompt, time it, apply the pre-pass.
//!
//! Thin on purpose. Prompt wording lives in [`crate::prompts`] and the wire
//! protocol in [`crate::client`]; this stage only ties them together and
//! records [`GenerationStats`]. There is no retry: a failed call surfaces as
//! a single [`ItineraryError::GenerationFailed`] and the caller decides.

use crate::client::GenerationClient;
use crate::config::GenerationConfig;
use crate::error::ItineraryError;
use crate::output::{GenerationOutput, GenerationStats};
use crate::pipeline::postprocess::preprocess;
use std::time::Instant;
use tracing::{debug, warn};

/// Generate itinerary Markdown for `prompt`.
pub async fn request_itinerary(
    client: &dyn GenerationClient,
    prompt: &str,
    config: &GenerationConfig,
) -> Result<GenerationOutput, ItineraryError> {
    let start = Instant::now();

    let generation = client.generate(prompt, config).await.inspect_err(|_| {
        debug!("{} call failed after {:?}", client.name(), start.elapsed());
    })?;

    let duration = start.elapsed();
    debug!(
        "{}: {} prompt tokens, {} output tokens, {:?}",
        client.name(),
        generation.prompt_tokens,
        generation.output_tokens,
        duration
    );
    if generation.finish_reason.as_deref() == Some("MAX_TOKENS") {
        warn!(
            "Itinerary hit the {}-token output limit and may be cut short",
            config.max_output_tokens
        );
    }

    Ok(GenerationOutput {
        itinerary: preprocess(&generation.text),
        stats: GenerationStats {
            model: config.model.clone(),
            prompt_tokens: generation.prompt_tokens,
            output_tokens: generation.output_tokens,
            finish_reason: generation.finish_reason,
            duration_ms: duration.as_millis() as u64,
        },
        raw_text: generation.text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Generation;
    use async_trait::async_trait;

    struct Canned(Result<&'static str, &'static str>);

    #[async_trait]
    impl GenerationClient for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(
            &self,
            _prompt: &str,
            _config: &GenerationConfig,
        ) -> Result<Generation, ItineraryError> {
            match self.0 {
                Ok(text) => Ok(Generation {
                    text: text.to_string(),
                    prompt_tokens: 10,
                    output_tokens: 20,
                    finish_reason: Some("STOP".into()),
                }),
                Err(detail) => Err(ItineraryError::generation(detail)),
            }
        }
    }

    #[tokio::test]
    async fn success_applies_pre_pass() {
        let client = Canned(Ok("**Day 1**\nSome **bold** text"));
        let out = request_itinerary(&client, "p", &GenerationConfig::default())
            .await
            .unwrap();
        assert_eq!(out.itinerary, "# Day 1\nSome # bold text");
        assert_eq!(out.raw_text, "**Day 1**\nSome **bold** text");
        assert_eq!(out.stats.model, "gemini-1.5-flash");
        assert_eq!(out.stats.output_tokens, 20);
    }

    #[tokio::test]
    async fn failure_is_passed_through() {
        let client = Canned(Err("HTTP 500"));
        let err = request_itinerary(&client, "p", &GenerationConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.generation_detail(), Some("HTTP 500"));
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn failure_is_not_logged_at_warn_or_above() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let client = Canned(Err("HTTP 500"));
        request_itinerary(&client, "p", &GenerationConfig::default())
            .await
            .unwrap_err();

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.is_empty(), "unexpected logs: {logs}");
    }
}
