//! Document digests beyond question answering: structured insights and
//! spoken summaries.
//!
//! Both pipelines reuse the [`papyrus_rag::CompletionModel`] seam, so
//! any completion backend wired into the retrieval pipeline also powers
//! digests. Speech synthesis plugs in behind [`SpeechSynthesizer`]; the
//! `gemini` feature provides a TTS-backed implementation.

pub mod audio;
pub mod error;
pub mod insight;

pub use audio::{AudioDigest, AudioSummarizer, SpeechSynthesizer};
#[cfg(feature = "gemini")]
pub use audio::GeminiSpeechSynthesizer;
pub use error::{DigestError, Result};
pub use insight::{DocumentInsights, InsightGenerator, DEFAULT_CHAR_BUDGET};
