//! The itinerary session: one request in, one itinerary (or the fallback) out.
//!
//! [`ItineraryGenerator`] holds what a planner form holds: the last request,
//! the current itinerary text and an explicit [`FormState`]. `submit` takes
//! `&mut self`, so a second submission cannot start while one is in flight.

use crate::client::GenerationClient;
use crate::config::{ExportOptions, GenerationConfig};
use crate::error::ItineraryError;
use crate::export;
use crate::notify::Notifier;
use crate::output::{ExportReport, GenerationOutput};
use crate::pipeline::llm::request_itinerary;
use crate::pipeline::pdf::PdfWriter;
use crate::pipeline::render::{render_itinerary, RenderedItinerary};
use crate::prompts::build_prompt;
use crate::request::ItineraryRequest;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// Shown in place of the itinerary when generation fails.
pub const FALLBACK_MESSAGE: &str =
    "Sorry, there was an error generating your itinerary. Please try again.";

pub const GENERATION_SUCCESS_MESSAGE: &str = "Itinerary generated successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

pub struct ItineraryGenerator {
    client: Arc<dyn GenerationClient>,
    config: GenerationConfig,
    notifier: Arc<dyn Notifier>,
    state: FormState,
    request: Option<ItineraryRequest>,
    itinerary: String,
    last_output: Option<GenerationOutput>,
}

impl ItineraryGenerator {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        config: GenerationConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            client,
            config,
            notifier,
            state: FormState::Idle,
            request: None,
            itinerary: String::new(),
            last_output: None,
        }
    }

    /// Generate an itinerary for `request`.
    ///
    /// On failure the itinerary becomes [`FALLBACK_MESSAGE`], one error
    /// notification is raised and the error is returned.
    pub async fn submit(&mut self, request: ItineraryRequest) -> Result<(), ItineraryError> {
        self.state = FormState::Loading;
        info!(
            destination = request.destination(),
            lifestyle = %request.lifestyle(),
            duration = request.duration(),
            "Generating itinerary"
        );

        let prompt = build_prompt(&request);
        self.request = Some(request);

        match request_itinerary(self.client.as_ref(), &prompt, &self.config).await {
            Ok(output) => {
                self.itinerary = output.itinerary.clone();
                self.last_output = Some(output);
                self.state = FormState::Success;
                self.notifier.success(GENERATION_SUCCESS_MESSAGE);
                Ok(())
            }
            Err(e) => {
                error!(
                    "Itinerary generation failed: {}",
                    e.generation_detail().unwrap_or("unknown cause")
                );
                self.itinerary = FALLBACK_MESSAGE.to_string();
                self.last_output = None;
                self.state = FormState::Error;
                self.notifier.error(FALLBACK_MESSAGE);
                Err(e)
            }
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == FormState::Loading
    }

    /// Current itinerary text: pre-processed model output, the fallback
    /// message, or empty before the first submission.
    pub fn itinerary(&self) -> &str {
        &self.itinerary
    }

    pub fn request(&self) -> Option<&ItineraryRequest> {
        self.request.as_ref()
    }

    /// Output of the last successful submission.
    pub fn last_output(&self) -> Option<&GenerationOutput> {
        self.last_output.as_ref()
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// The rendered itinerary region, or `None` while there is nothing to show.
    pub fn display(&self) -> Option<RenderedItinerary> {
        render_itinerary(&self.itinerary)
    }

    /// Export the current itinerary region as a PDF into `out_dir`.
    pub async fn export_pdf(
        &self,
        out_dir: &Path,
        options: &ExportOptions,
        writer: Arc<dyn PdfWriter>,
    ) -> Result<ExportReport, ItineraryError> {
        let region = self.display().unwrap_or_else(|| RenderedItinerary {
            title: crate::pipeline::render::ITINERARY_TITLE.to_string(),
            blocks: Vec::new(),
        });
        export::export_pdf(&region, out_dir, options, writer, self.notifier.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Generation;
    use crate::notify::{NotificationKind, ToastQueue};
    use crate::request::Lifestyle;
    use async_trait::async_trait;

    struct Stub(Option<&'static str>);

    #[async_trait]
    impl GenerationClient for Stub {
        fn name(&self) -> &str {
            "stub"
        }

        async fn generate(
            &self,
            _prompt: &str,
            _config: &GenerationConfig,
        ) -> Result<Generation, ItineraryError> {
            match self.0 {
                Some(text) => Ok(Generation {
                    text: text.to_string(),
                    prompt_tokens: 1,
                    output_tokens: 1,
                    finish_reason: Some("STOP".into()),
                }),
                None => Err(ItineraryError::generation("stubbed failure")),
            }
        }
    }

    fn tokyo() -> ItineraryRequest {
        ItineraryRequest::new("Tokyo, Japan", "₹50,000", Lifestyle::Budget, "5 days").unwrap()
    }

    fn session(reply: Option<&'static str>) -> (ItineraryGenerator, Arc<ToastQueue>) {
        let toasts = Arc::new(ToastQueue::new());
        let generator =
            ItineraryGenerator::new(Arc::new(Stub(reply)), GenerationConfig::default(), toasts.clone());
        (generator, toasts)
    }

    #[test]
    fn nothing_displayed_before_submit() {
        let (generator, _) = session(Some("# Day 1"));
        assert_eq!(generator.state(), FormState::Idle);
        assert!(generator.display().is_none());
        assert!(generator.request().is_none());
    }

    #[tokio::test]
    async fn success_stores_preprocessed_itinerary() {
        let (mut generator, toasts) = session(Some("**Day 1**\n## Morning\n- Temple"));
        generator.submit(tokyo()).await.unwrap();

        assert_eq!(generator.state(), FormState::Success);
        assert_eq!(generator.itinerary(), "# Day 1\n## Morning\n- Temple");
        assert!(generator.last_output().is_some());
        assert_eq!(toasts.count(NotificationKind::Success), 1);
        assert_eq!(toasts.count(NotificationKind::Error), 0);
        assert!(generator.display().is_some());
    }

    #[tokio::test]
    async fn failure_shows_fallback_and_one_error() {
        let (mut generator, toasts) = session(None);
        let err = generator.submit(tokyo()).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to generate itinerary");
        assert_eq!(generator.state(), FormState::Error);
        assert_eq!(generator.itinerary(), FALLBACK_MESSAGE);
        assert!(generator.last_output().is_none());
        assert_eq!(toasts.count(NotificationKind::Error), 1);
        assert_eq!(toasts.history()[0].message, FALLBACK_MESSAGE);

        // The fallback is itself rendered in the region.
        let region = generator.display().unwrap();
        assert!(region.plain_text().contains("Please try again."));
    }
}
