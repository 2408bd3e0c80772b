//! Whisper-based speech-to-text transcription.
//!
//! Local [`Transcriber`] backed by whisper-rs, for fully offline
//! transcription. Requires the `whisper` feature and cmake to build:
//!
//! ```bash
//! cargo build --features whisper
//! ```

use crate::error::{Result, SublinguaError};
use crate::services::Transcriber;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Mutex, Once};
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, install_logging_hooks,
};

static LOGGING_HOOKS_INSTALLED: Once = Once::new();

/// Configuration for the Whisper transcriber.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Path to the ggml model file.
    pub model_path: PathBuf,
    /// Source language hint (e.g. "en", "pt"); `None` lets the model detect.
    pub language: Option<String>,
    /// Inference thread count (`None` = auto-detect).
    pub threads: Option<usize>,
}

/// Speech-to-text via a local Whisper model.
///
/// The WhisperContext is wrapped in a Mutex: chunks are transcribed
/// sequentially, and whisper states are created per call.
pub struct WhisperTranscriber {
    context: Mutex<WhisperContext>,
    config: WhisperConfig,
}

impl std::fmt::Debug for WhisperTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperTranscriber")
            .field("config", &self.config)
            .field("context", &"<WhisperContext>")
            .finish()
    }
}

impl WhisperTranscriber {
    /// Load the model at `config.model_path`.
    pub fn new(config: WhisperConfig) -> Result<Self> {
        // Suppress whisper.cpp's own stderr chatter (once per process)
        LOGGING_HOOKS_INSTALLED.call_once(|| {
            install_logging_hooks();
        });

        if !config.model_path.exists() {
            return Err(SublinguaError::Transcription {
                message: format!("model file not found: {}", config.model_path.display()),
            });
        }

        let mut context_params = WhisperContextParameters::default();
        // Fused attention kernels avoid the standalone softmax CUDA kernel,
        // which crashes on Blackwell GPUs (sm_120) with ggml <= 1.7.6
        context_params.flash_attn(true);
        let context = WhisperContext::new_with_params(
            config.model_path.to_str().ok_or_else(|| {
                SublinguaError::Transcription {
                    message: "invalid UTF-8 in model path".to_string(),
                }
            })?,
            context_params,
        )
        .map_err(|e| SublinguaError::Transcription {
            message: format!("failed to load Whisper model: {}", e),
        })?;

        Ok(Self {
            context: Mutex::new(context),
            config,
        })
    }

    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }

    /// Convert 16-bit PCM to the normalized f32 format whisper expects.
    fn convert_audio(samples: &[i16]) -> Vec<f32> {
        samples
            .iter()
            .map(|&sample| sample as f32 / 32768.0)
            .collect()
    }

    fn run_inference(&self, samples: &[i16]) -> Result<String> {
        let audio_f32 = Self::convert_audio(samples);

        let context = self
            .context
            .lock()
            .map_err(|e| SublinguaError::Transcription {
                message: format!("failed to acquire context lock: {}", e),
            })?;

        let mut state = context
            .create_state()
            .map_err(|e| SublinguaError::Transcription {
                message: format!("failed to create Whisper state: {}", e),
            })?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(self.config.language.as_deref());
        if let Some(threads) = self.config.threads {
            params.set_n_threads(threads as i32);
        }
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, &audio_f32)
            .map_err(|e| SublinguaError::Transcription {
                message: format!("Whisper inference failed: {}", e),
            })?;

        let mut transcription = String::new();
        for segment in state.as_iter() {
            transcription.push_str(&segment.to_string());
        }

        Ok(transcription.trim().to_string())
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, samples: &[i16]) -> Result<String> {
        // Inference is CPU/GPU bound; keep it off the async worker threads.
        tokio::task::block_in_place(|| self.run_inference(samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_fails_fast() {
        let config = WhisperConfig {
            model_path: PathBuf::from("/nonexistent/model.bin"),
            language: Some("en".to_string()),
            threads: None,
        };

        let result = WhisperTranscriber::new(config);

        match result {
            Err(SublinguaError::Transcription { message }) => {
                assert!(message.contains("/nonexistent/model.bin"));
            }
            _ => panic!("expected Transcription error"),
        }
    }

    #[test]
    fn convert_audio_normalizes_to_unit_range() {
        let samples = vec![0i16, 16384, -16384, 32767, -32768];
        let converted = WhisperTranscriber::convert_audio(&samples);

        assert_eq!(converted.len(), samples.len());
        assert_eq!(converted[0], 0.0);
        assert!((converted[1] - 0.5).abs() < 0.01);
        assert!((converted[2] + 0.5).abs() < 0.01);
        assert!((converted[3] - 1.0).abs() < 0.01);
        assert_eq!(converted[4], -1.0);
    }

    #[test]
    fn convert_audio_empty() {
        assert!(WhisperTranscriber::convert_audio(&[]).is_empty());
    }
}
