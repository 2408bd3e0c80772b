use crate::defaults;
use crate::error::{Result, SublinguaError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub translation: TranslationConfig,
    pub job: JobOptions,
}

/// Language selection for a job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    /// Target language code for the subtitles.
    pub target_lang: String,
    /// Source language override; `None` means detect from the transcript.
    pub source_lang: Option<String>,
}

/// Tunables for one subtitle job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JobOptions {
    /// Minimum silence gap that splits chunks (ms).
    pub min_silence_ms: u64,
    /// Maximum duration of a transcription chunk (ms).
    pub max_chunk_ms: u64,
    /// Maximum duration of a translation phrase group (ms).
    pub max_phrase_ms: u64,
    /// Maximum characters per subtitle line.
    pub max_chars_per_line: usize,
    /// Maximum segments grouped for translation context; 0 disables grouping.
    pub context_window: u32,
    /// Maximum display duration of one cue (ms).
    pub max_cue_ms: u64,
    /// Fixed silence threshold (dBFS); `None` runs calibration.
    pub silence_threshold_db: Option<f32>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            target_lang: defaults::FALLBACK_LANGUAGE.to_string(),
            source_lang: None,
        }
    }
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            min_silence_ms: defaults::MIN_SILENCE_MS,
            max_chunk_ms: defaults::MAX_CHUNK_MS,
            max_phrase_ms: defaults::MAX_PHRASE_MS,
            max_chars_per_line: defaults::MAX_CHARS_PER_LINE,
            context_window: defaults::CONTEXT_WINDOW,
            max_cue_ms: defaults::MAX_CUE_MS,
            silence_threshold_db: None,
        }
    }
}

impl JobOptions {
    /// Check every tunable against its valid range.
    pub fn validate(&self) -> Result<()> {
        if self.min_silence_ms == 0 {
            return Err(invalid("job.min_silence_ms", "must be greater than zero"));
        }
        if self.max_chunk_ms < 1000 {
            return Err(invalid("job.max_chunk_ms", "must be at least 1000"));
        }
        if self.max_phrase_ms < self.max_chunk_ms {
            return Err(invalid(
                "job.max_phrase_ms",
                "must be at least job.max_chunk_ms",
            ));
        }
        if self.max_chars_per_line < 10 {
            return Err(invalid("job.max_chars_per_line", "must be at least 10"));
        }
        if self.context_window > defaults::CONTEXT_WINDOW_MAX {
            return Err(invalid("job.context_window", "must be at most 10"));
        }
        if self.max_cue_ms == 0 {
            return Err(invalid("job.max_cue_ms", "must be greater than zero"));
        }
        if let Some(db) = self.silence_threshold_db
            && !(-90.0..0.0).contains(&db)
        {
            return Err(invalid(
                "job.silence_threshold_db",
                "must be between -90 and 0 dBFS",
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> SublinguaError {
    SublinguaError::ConfigInvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is missing or contains invalid TOML.
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SublinguaError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                SublinguaError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.job.validate()?;
        Ok(config)
    }

    /// Load from a file, falling back to defaults only when the file is
    /// missing. Invalid TOML or values still fail.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(SublinguaError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - SUBLINGUA_TARGET_LANG → translation.target_lang
    /// - SUBLINGUA_SOURCE_LANG → translation.source_lang
    /// - SUBLINGUA_MIN_SILENCE_MS → job.min_silence_ms
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(lang) = std::env::var("SUBLINGUA_TARGET_LANG")
            && !lang.is_empty()
        {
            self.translation.target_lang = lang;
        }

        if let Ok(lang) = std::env::var("SUBLINGUA_SOURCE_LANG")
            && !lang.is_empty()
        {
            self.translation.source_lang = Some(lang);
        }

        if let Ok(ms) = std::env::var("SUBLINGUA_MIN_SILENCE_MS")
            && let Ok(parsed) = ms.parse::<u64>()
        {
            self.job.min_silence_ms = parsed;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/sublingua/config.toml on Linux
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sublingua").join("config.toml"))
    }
}
