//! Default configuration constants for sublingua.
//!
//! Every value here is a tunable default, not an invariant. The silence
//! ratio and duration constants in particular are empirical; they are tuned
//! for typical spoken-word content and should be validated against
//! representative audio before being trusted for other material.

/// Audio sample rate in Hz used throughout the pipeline.
///
/// 16kHz mono is the standard input format for speech recognition and keeps
/// waveform buffers small (one minute of audio is under 2 MB).
pub const SAMPLE_RATE: u32 = 16000;

/// Default minimum silence duration in milliseconds.
///
/// A quiet span shorter than this is treated as part of the surrounding
/// speech, not as a split point. 400ms tolerates breaths and word gaps
/// while still catching sentence boundaries.
pub const MIN_SILENCE_MS: u64 = 400;

/// Default maximum chunk duration in milliseconds.
///
/// Non-silent intervals longer than this are split into fixed-size
/// sub-chunks so a single unbroken monologue never becomes one unwieldy
/// transcription unit.
pub const MAX_CHUNK_MS: u64 = 10_000;

/// Default maximum phrase duration in milliseconds.
///
/// Consecutive transcript segments are grouped up to this cumulative
/// duration and translated together for fluency.
pub const MAX_PHRASE_MS: u64 = 60_000;

/// Default maximum characters per subtitle line.
pub const MAX_CHARS_PER_LINE: usize = 50;

/// Default context window: how many consecutive segments may share one
/// phrase group (0 = translate each segment alone). Valid range 0-10.
pub const CONTEXT_WINDOW: u32 = 2;

/// Maximum allowed context window size.
pub const CONTEXT_WINDOW_MAX: u32 = 10;

/// Default maximum duration for a single multi-line cue in milliseconds.
///
/// Chunks longer than this are split into one cue per wrapped line.
pub const MAX_CUE_MS: u64 = 3_000;

/// Fallback silence threshold in dBFS when calibration finds nothing usable.
pub const SILENCE_THRESHOLD_DB: f32 = -40.0;

/// Target non-silent:silent duration ratio for threshold calibration.
///
/// Empirically ~18:1 matches typical spoken-word recordings (speech with
/// short breath pauses). Recordings with long quiet stretches will calibrate
/// to a different threshold to approach this ratio.
pub const TARGET_SOUND_SILENCE_RATIO: f32 = 18.0;

/// How much of the waveform the calibrator inspects, in milliseconds.
///
/// Calibrating on an early window keeps the search fast on long videos; the
/// loudness profile of the first ~50s is assumed representative.
pub const CALIBRATION_WINDOW_MS: u64 = 50_000;

/// Consecutive non-improving calibration iterations before giving up.
pub const CALIBRATION_MAX_STALLS: u32 = 5;

/// Maximum translation attempts before falling back to the original text.
pub const TRANSLATION_MAX_ATTEMPTS: u32 = 3;

/// Randomized backoff range between translation retries, in milliseconds.
pub const BACKOFF_MIN_MS: u64 = 2_000;
pub const BACKOFF_MAX_MS: u64 = 5_000;

/// Language code assumed when detection fails or the transcript is empty.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Maximum transcript characters sampled for language detection.
pub const LANGUAGE_SAMPLE_CHARS: usize = 2_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_range_is_ordered() {
        assert!(BACKOFF_MIN_MS < BACKOFF_MAX_MS);
    }

    #[test]
    fn context_window_default_within_range() {
        assert!(CONTEXT_WINDOW <= CONTEXT_WINDOW_MAX);
    }
}
