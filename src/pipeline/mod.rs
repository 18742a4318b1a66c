//! Pipeline stages for itinerary generation and export.
//!
//! Each submodule implements one transformation step and is testable on its
//! own.
//!
//! ## Data Flow
//!
//! ```text
//!  prompt ──▶ llm ──▶ postprocess::preprocess ──▶ (stored itinerary)
//!
//!  stored ──▶ postprocess::normalize ──▶ render ──▶ layout ──▶ pdf (+ encode)
//!                                          │
//!                                          └──▶ HTML / plain text
//! ```
//!
//! 1. [`llm`]    — the generation call; the only stage with network I/O
//! 2. [`postprocess`] — deterministic Markdown cleanup rules
//! 3. [`render`] — Markdown → display tree → styled HTML
//! 4. [`layout`] — display tree → positioned lines on pages
//! 5. [`pdf`]    — pages → PDF bytes via pdfium; blocking, run in
//!    `spawn_blocking`
//! 6. [`encode`] — JPEG encoding for raster page capture

pub mod encode;
pub mod layout;
pub mod llm;
pub mod pdf;
pub mod postprocess;
pub mod render;
