//! Decoded audio buffer with millisecond addressing.

use crate::defaults::SAMPLE_RATE;
use crate::error::{Result, SublinguaError};
use std::io::Read;
use std::path::Path;

/// Decoded audio samples for one pipeline run.
///
/// Always 16kHz mono i16; stereo input is downmixed on load. The struct owns
/// the samples outright — the temporary WAV file it was decoded from can be
/// removed as soon as loading succeeds.
#[derive(Debug, Clone)]
pub struct Waveform {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl Waveform {
    /// Wrap raw 16kHz mono samples.
    pub fn from_samples(samples: Vec<i16>) -> Self {
        Self {
            samples,
            sample_rate: SAMPLE_RATE,
        }
    }

    /// Load a WAV file, downmixing stereo to mono.
    ///
    /// The extractor always produces 16kHz mono, so no resampling is done
    /// here; a mismatched rate is an error rather than a silent correction.
    pub fn from_wav_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(Box::new(file))
    }

    /// Load WAV data from any reader.
    pub fn from_reader(reader: Box<dyn Read + Send>) -> Result<Self> {
        let mut wav_reader =
            hound::WavReader::new(reader).map_err(|e| SublinguaError::AudioDecode {
                message: format!("Failed to parse WAV data: {}", e),
            })?;

        let spec = wav_reader.spec();
        if spec.sample_rate != SAMPLE_RATE {
            return Err(SublinguaError::AudioDecode {
                message: format!(
                    "Expected {}Hz audio, got {}Hz",
                    SAMPLE_RATE, spec.sample_rate
                ),
            });
        }

        let raw_samples: Vec<i16> = wav_reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| SublinguaError::AudioDecode {
                message: format!("Failed to read WAV samples: {}", e),
            })?;

        let samples = if spec.channels == 2 {
            raw_samples
                .chunks_exact(2)
                .map(|pair| {
                    let left = pair[0] as i32;
                    let right = pair[1] as i32;
                    ((left + right) / 2) as i16
                })
                .collect()
        } else {
            raw_samples
        };

        Ok(Self {
            samples,
            sample_rate: SAMPLE_RATE,
        })
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Total duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        (self.samples.len() as u64 * 1000) / self.sample_rate as u64
    }

    /// Samples covering `[start_ms, end_ms)`, clamped to the waveform end.
    pub fn slice_ms(&self, start_ms: u64, end_ms: u64) -> &[i16] {
        let start = self.sample_index(start_ms).min(self.samples.len());
        let end = self.sample_index(end_ms).min(self.samples.len());
        &self.samples[start..end.max(start)]
    }

    fn sample_index(&self, ms: u64) -> usize {
        ((ms * self.sample_rate as u64) / 1000) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
