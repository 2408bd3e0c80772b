//! sublingua - translated subtitles straight from a video file
//!
//! Extracts the audio track, segments it on detected silence, transcribes
//! each chunk, translates the transcript, and writes a time-aligned SRT.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod lang;
pub mod pipeline;
pub mod progress;
pub mod services;
pub mod subtitle;
pub mod translate;

// Service seams
pub use services::{LanguageClassifier, Services, Transcriber, Translator};

// Pipeline
pub use pipeline::SubtitleJob;
pub use progress::{ProgressSink, Stage, StatusSink};

// Error handling
pub use error::{Result, SublinguaError};

// Config
pub use config::{Config, JobOptions};

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
