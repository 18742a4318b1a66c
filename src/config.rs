//! Configuration types for itinerary generation and PDF export.
//!
//! Generation knobs live in [`GenerationConfig`], export knobs in
//! [`ExportOptions`]; both are built through a builder whose setters clamp
//! obviously-wrong values and whose `build()` rejects the rest. The defaults
//! match the web planner's request settings and its A4 export.

use crate::error::ItineraryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default Gemini REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable the API key is read from at call time.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default file name for the exported PDF.
pub const DEFAULT_PDF_FILENAME: &str = "travel-itinerary.pdf";

// ── Generation ───────────────────────────────────────────────────────────

/// Parameters for a single `generateContent` call.
///
/// # Example
/// ```rust
/// use wanderlens::GenerationConfig;
///
/// let config = GenerationConfig::builder()
///     .model("gemini-1.5-pro")
///     .temperature(0.4)
///     .build()
///     .unwrap();
/// assert_eq!(config.top_k, 40);
/// ```
#[derive(Clone)]
pub struct GenerationConfig {
    /// Gemini model identifier. Default: `gemini-1.5-flash`.
    pub model: String,

    /// Sampling temperature. Default: 0.7.
    pub temperature: f32,

    /// Top-k sampling cut-off. Default: 40.
    pub top_k: u32,

    /// Nucleus-sampling threshold. Default: 0.95.
    pub top_p: f32,

    /// Output length cap in tokens. Default: 2048.
    pub max_output_tokens: u32,

    /// Safety thresholds sent with the request. Empty means "omit the field".
    pub safety_settings: Vec<SafetySetting>,

    /// Explicit API key. When `None` the key is read from `api_key_env` at
    /// call time.
    pub api_key: Option<String>,

    /// Name of the environment variable holding the API key.
    pub api_key_env: String,

    /// REST base URL, without a trailing slash.
    pub base_url: String,

    /// Optional per-request timeout. `None` inherits the transport default.
    pub request_timeout_secs: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
            safety_settings: SafetySetting::defaults(),
            api_key: None,
            api_key_env: API_KEY_ENV.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("top_k", &self.top_k)
            .field("top_p", &self.top_p)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("safety_settings", &self.safety_settings)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_env", &self.api_key_env)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl GenerationConfig {
    /// Create a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GenerationConfig`].
#[derive(Debug)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn top_k(mut self, k: u32) -> Self {
        self.config.top_k = k.max(1);
        self
    }

    pub fn top_p(mut self, p: f32) -> Self {
        self.config.top_p = p.clamp(0.0, 1.0);
        self
    }

    pub fn max_output_tokens(mut self, n: u32) -> Self {
        self.config.max_output_tokens = n.max(1);
        self
    }

    pub fn safety_settings(mut self, settings: Vec<SafetySetting>) -> Self {
        self.config.safety_settings = settings;
        self
    }

    /// Send no safety settings; the service applies its own defaults.
    pub fn without_safety_settings(mut self) -> Self {
        self.config.safety_settings.clear();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_key_env(mut self, var: impl Into<String>) -> Self {
        self.config.api_key_env = var.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerationConfig, ItineraryError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(ItineraryError::InvalidConfig("model must not be empty".into()));
        }
        if !c.base_url.starts_with("http://") && !c.base_url.starts_with("https://") {
            return Err(ItineraryError::InvalidConfig(format!(
                "base URL must be http(s), got '{}'",
                c.base_url
            )));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(ItineraryError::InvalidConfig(
                "request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Harm category understood by the Gemini safety filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

/// Blocking threshold for a [`HarmCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

/// One `{category, threshold}` pair of the request's `safetySettings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    /// Harassment and hate speech blocked at medium probability and above.
    pub fn defaults() -> Vec<SafetySetting> {
        vec![
            SafetySetting {
                category: HarmCategory::Harassment,
                threshold: HarmBlockThreshold::BlockMediumAndAbove,
            },
            SafetySetting {
                category: HarmCategory::HateSpeech,
                threshold: HarmBlockThreshold::BlockMediumAndAbove,
            },
        ]
    }
}

// ── Export ───────────────────────────────────────────────────────────────

/// Unit the page margins are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Mm,
    Pt,
    In,
}

impl LengthUnit {
    /// Convert `value` in this unit to millimetres.
    pub fn to_mm(self, value: f32) -> f32 {
        match self {
            LengthUnit::Mm => value,
            LengthUnit::Pt => value * 25.4 / 72.0,
            LengthUnit::In => value * 25.4,
        }
    }
}

/// Paper size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperFormat {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
}

impl PaperFormat {
    /// Portrait `(width, height)` in millimetres.
    pub fn size_mm(self) -> (f32, f32) {
        match self {
            PaperFormat::A4 => (210.0, 297.0),
            PaperFormat::A5 => (148.0, 210.0),
            PaperFormat::Letter => (215.9, 279.4),
            PaperFormat::Legal => (215.9, 355.6),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page description: unit for margins, paper format and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageOptions {
    pub unit: LengthUnit,
    pub format: PaperFormat,
    pub orientation: Orientation,
}

/// Encoding of captured page images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    #[default]
    Jpeg,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageOptions {
    #[serde(rename = "type")]
    pub kind: ImageType,
    /// Encoder quality in (0, 1]. Default: 0.98.
    pub quality: f32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            kind: ImageType::Jpeg,
            quality: 0.98,
        }
    }
}

/// Raster capture settings. Present means "flatten each page to an image".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterOptions {
    /// Capture scale relative to 72 DPI page size. Default: 2.
    pub scale: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { scale: 2.0 }
    }
}

/// Options for [`crate::export::export_pdf`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// `[vertical, horizontal]` margins in `page.unit`. Default: `[10, 10]`.
    pub margin: [f32; 2],
    /// Output file name. Default: `travel-itinerary.pdf`.
    pub filename: String,
    pub image: ImageOptions,
    /// `None` writes vector text pages without raster capture.
    pub raster: Option<RasterOptions>,
    pub page: PageOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            margin: [10.0, 10.0],
            filename: DEFAULT_PDF_FILENAME.to_string(),
            image: ImageOptions::default(),
            raster: Some(RasterOptions::default()),
            page: PageOptions::default(),
        }
    }
}

impl ExportOptions {
    /// Create a new builder for `ExportOptions`.
    pub fn builder() -> ExportOptionsBuilder {
        ExportOptionsBuilder {
            options: Self::default(),
        }
    }

    /// Page `(width, height)` in millimetres, orientation applied.
    pub fn page_size_mm(&self) -> (f32, f32) {
        let (w, h) = self.page.format.size_mm();
        match self.page.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// `(vertical, horizontal)` margins in millimetres.
    pub fn margins_mm(&self) -> (f32, f32) {
        (
            self.page.unit.to_mm(self.margin[0]),
            self.page.unit.to_mm(self.margin[1]),
        )
    }
}

/// Builder for [`ExportOptions`].
#[derive(Debug)]
pub struct ExportOptionsBuilder {
    options: ExportOptions,
}

impl ExportOptionsBuilder {
    pub fn margin(mut self, vertical: f32, horizontal: f32) -> Self {
        self.options.margin = [vertical, horizontal];
        self
    }

    pub fn filename(mut self, name: impl Into<String>) -> Self {
        self.options.filename = name.into();
        self
    }

    pub fn image_quality(mut self, quality: f32) -> Self {
        self.options.image.quality = quality;
        self
    }

    pub fn raster_scale(mut self, scale: f32) -> Self {
        self.options.raster = Some(RasterOptions { scale });
        self
    }

    /// Skip raster capture and keep the drawn text as vector content.
    pub fn vector(mut self) -> Self {
        self.options.raster = None;
        self
    }

    pub fn unit(mut self, unit: LengthUnit) -> Self {
        self.options.page.unit = unit;
        self
    }

    pub fn format(mut self, format: PaperFormat) -> Self {
        self.options.page.format = format;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.options.page.orientation = orientation;
        self
    }

    /// Build the options, validating constraints.
    pub fn build(self) -> Result<ExportOptions, ItineraryError> {
        let o = &self.options;
        if o.filename.trim().is_empty() {
            return Err(ItineraryError::InvalidConfig("filename must not be empty".into()));
        }
        if !(o.image.quality > 0.0 && o.image.quality <= 1.0) {
            return Err(ItineraryError::InvalidConfig(format!(
                "image quality must be in (0, 1], got {}",
                o.image.quality
            )));
        }
        if let Some(raster) = o.raster {
            if !(0.5..=4.0).contains(&raster.scale) {
                return Err(ItineraryError::InvalidConfig(format!(
                    "raster scale must be 0.5–4, got {}",
                    raster.scale
                )));
            }
        }
        let (mv, mh) = o.margins_mm();
        let (w, h) = o.page_size_mm();
        if mv < 0.0 || mh < 0.0 {
            return Err(ItineraryError::InvalidConfig("margins must be ≥ 0".into()));
        }
        if 2.0 * mv >= h || 2.0 * mh >= w {
            return Err(ItineraryError::InvalidConfig(format!(
                "margins {mv}×{mh} mm leave no room on a {w}×{h} mm page"
            )));
        }
        Ok(self.options)
    }
}
