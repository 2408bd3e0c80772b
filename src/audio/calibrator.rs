//! Silence threshold calibration.
//!
//! Source loudness varies per recording (microphone, compression, background
//! noise), so no fixed dBFS cutoff separates speech from silence reliably.
//! The calibrator searches for a threshold whose non-silent:silent duration
//! ratio lands near a target tuned for spoken-word content. The mapping from
//! threshold to ratio is noisy and non-monotonic in real recordings, so this
//! is a heuristic local search with a shrinking step, not a closed form.

use crate::audio::loudness::detect_nonsilent;
use crate::audio::waveform::Waveform;
use crate::defaults;
use tracing::debug;

/// A calibrated loudness cutoff, immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceThreshold {
    /// Loudness cutoff in dBFS; frames at or below this count as silent.
    pub threshold_db: f32,
    /// The non-silent:silent duration ratio this threshold achieved.
    pub ratio: f32,
}

/// Configuration for the calibration search.
#[derive(Debug, Clone, Copy)]
pub struct CalibratorConfig {
    /// How much of the waveform to inspect, from the start (ms).
    pub window_ms: u64,
    /// Target non-silent:silent duration ratio.
    pub target_ratio: f32,
    /// Consecutive non-improving iterations before stopping.
    pub max_stalls: u32,
    /// Threshold the search starts from (dBFS).
    pub initial_threshold_db: f32,
    /// Initial step size (dB); shrinks as the search converges.
    pub initial_step_db: f32,
    /// Hard iteration cap, guarding against oscillation.
    pub max_iterations: u32,
}

impl Default for CalibratorConfig {
    fn default() -> Self {
        Self {
            window_ms: defaults::CALIBRATION_WINDOW_MS,
            target_ratio: defaults::TARGET_SOUND_SILENCE_RATIO,
            max_stalls: defaults::CALIBRATION_MAX_STALLS,
            initial_threshold_db: -24.0,
            initial_step_db: 8.0,
            max_iterations: 40,
        }
    }
}

/// Valid threshold range; outside this the search range is exhausted.
const THRESHOLD_MIN_DB: f32 = -85.0;
const THRESHOLD_MAX_DB: f32 = -5.0;

/// Search for a silence threshold on an early window of the waveform.
///
/// Returns the best threshold found, or the documented default
/// ([`defaults::SILENCE_THRESHOLD_DB`]) when no candidate ever produced a
/// measurable speech/silence split.
pub fn calibrate(
    waveform: &Waveform,
    min_silence_ms: u64,
    config: &CalibratorConfig,
) -> SilenceThreshold {
    let window_end_ms = config.window_ms.min(waveform.duration_ms());
    if window_end_ms == 0 {
        return SilenceThreshold {
            threshold_db: defaults::SILENCE_THRESHOLD_DB,
            ratio: 0.0,
        };
    }

    let mut threshold = config.initial_threshold_db;
    let mut step = config.initial_step_db;
    let mut best: Option<SilenceThreshold> = None;
    let mut best_error = f32::INFINITY;
    let mut stalls = 0u32;

    for iteration in 0..config.max_iterations {
        let ratio = measure_ratio(waveform, window_end_ms, threshold, min_silence_ms);

        let error = match ratio {
            Some(r) => (r - config.target_ratio).abs(),
            None => f32::INFINITY,
        };

        debug!(
            iteration,
            threshold_db = threshold,
            ratio = ?ratio,
            "calibration probe"
        );

        if let Some(r) = ratio
            && error < best_error
        {
            best = Some(SilenceThreshold {
                threshold_db: threshold,
                ratio: r,
            });
            best_error = error;
            stalls = 0;
        } else {
            stalls += 1;
            if stalls >= config.max_stalls {
                break;
            }
        }

        // Pick a direction, scaling the step by how far off target we are:
        // aggressive while far away, conservative as the ratio closes in.
        let next = match ratio {
            // Nothing crossed the threshold: it sits above all speech.
            None => threshold - step,
            // No silence at all: the threshold sits below the noise floor.
            Some(r) if r.is_infinite() => threshold + step,
            Some(r) => {
                let distance = ((r - config.target_ratio).abs() / config.target_ratio)
                    .clamp(0.25, 1.0);
                if r > config.target_ratio {
                    // Too much counted as speech: raise the cutoff.
                    threshold + step * distance
                } else {
                    threshold - step * distance
                }
            }
        };

        if !(THRESHOLD_MIN_DB..=THRESHOLD_MAX_DB).contains(&next) {
            break;
        }
        threshold = next;
        step = (step * 0.85).max(0.5);
    }

    best.unwrap_or(SilenceThreshold {
        threshold_db: defaults::SILENCE_THRESHOLD_DB,
        ratio: 0.0,
    })
}

/// Non-silent:silent duration ratio at `threshold_db` over the window.
///
/// `None` when no non-silent interval was detected at all; infinite when
/// silence is entirely absent.
fn measure_ratio(
    waveform: &Waveform,
    window_end_ms: u64,
    threshold_db: f32,
    min_silence_ms: u64,
) -> Option<f32> {
    let intervals = detect_nonsilent(waveform, 0, window_end_ms, threshold_db, min_silence_ms);
    if intervals.is_empty() {
        return None;
    }

    let nonsilent_ms: u64 = intervals.iter().map(|i| i.duration_ms()).sum();
    let silent_ms = window_end_ms - nonsilent_ms.min(window_end_ms);

    if silent_ms == 0 {
        Some(f32::INFINITY)
    } else {
        Some(nonsilent_ms as f32 / silent_ms as f32)
    }
}
