//! Error types for sublingua.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SublinguaError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio extraction / decoding errors
    #[error("Audio extraction failed: {message}")]
    Extraction { message: String },

    #[error("Failed to decode audio: {message}")]
    AudioDecode { message: String },

    #[error("No speech detected in the audio track")]
    NoSpeech,

    // External service errors
    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    #[error("Translation failed: {message}")]
    Translation { message: String },

    #[error("Language detection failed: {message}")]
    LanguageDetection { message: String },

    // Job control
    #[error("Job cancelled")]
    Cancelled,

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, SublinguaError>;
