//! Audio track extraction from video containers.
//!
//! Shells out to ffmpeg to pull the audio track into a temporary 16kHz mono
//! PCM WAV. The temp file is owned by the returned guard and removed when it
//! drops, on success and failure paths alike.

use crate::defaults::SAMPLE_RATE;
use crate::error::{Result, SublinguaError};
use std::path::Path;
use std::process::Stdio;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

/// Extract the audio track of `video` to a temporary WAV file.
///
/// Returns the temp-file guard; the decoded waveform is loaded separately so
/// the caller controls when the file is released.
pub async fn extract_audio(video: &Path) -> Result<NamedTempFile> {
    which::which("ffmpeg").map_err(|_| SublinguaError::Extraction {
        message: "ffmpeg not found on PATH".to_string(),
    })?;

    if !video.exists() {
        return Err(SublinguaError::Extraction {
            message: format!("video file not found: {}", video.display()),
        });
    }

    let temp_wav = tempfile::Builder::new()
        .prefix("sublingua-audio-")
        .suffix(".wav")
        .tempfile()?;

    debug!(
        video = %video.display(),
        output = %temp_wav.path().display(),
        "extracting audio track"
    );

    let status = Command::new("ffmpeg")
        .args([
            "-i",
            &video.to_string_lossy(),
            "-vn", // No video
            "-ar",
            &SAMPLE_RATE.to_string(),
            "-ac",
            "1", // Mono
            "-acodec",
            "pcm_s16le",
            "-y", // Overwrite
            &temp_wav.path().to_string_lossy(),
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| SublinguaError::Extraction {
            message: format!("failed to spawn ffmpeg: {}", e),
        })?;

    if !status.success() {
        return Err(SublinguaError::Extraction {
            message: format!("ffmpeg exited with code {:?}", status.code()),
        });
    }

    let metadata = tokio::fs::metadata(temp_wav.path()).await?;
    if metadata.len() == 0 {
        return Err(SublinguaError::Extraction {
            message: "ffmpeg produced an empty audio file".to_string(),
        });
    }

    debug!(output_size = metadata.len(), "audio extraction complete");
    Ok(temp_wav)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_video_is_an_extraction_error() {
        if which::which("ffmpeg").is_err() {
            return; // Environment without ffmpeg: the PATH check fires first
        }

        let result = extract_audio(Path::new("/nonexistent/video.mp4")).await;

        match result {
            Err(SublinguaError::Extraction { message }) => {
                assert!(message.contains("not found"), "unexpected: {}", message);
            }
            other => panic!("expected Extraction error, got {:?}", other.map(|_| ())),
        }
    }
}
