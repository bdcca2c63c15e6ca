//! Text-to-Speech Conversion Pipeline
//!
//! Sends message text to the configured TTS endpoint and streams the audio
//! response into a per-job scratch file.

mod client;
mod error;
mod job;
mod scratch;

pub use client::{SpeechSynthesizer, TtsClient, AUDIO_FORMAT};
pub use error::ConversionError;
pub use job::{ConversionJob, JobState};
pub use scratch::{ScratchDir, ScratchFile};

#[cfg(test)]
pub use client::MockSpeechSynthesizer;
#[cfg(test)]
pub(crate) use client::truncated_audio_endpoint;
