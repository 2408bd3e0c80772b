//! Frame loudness measurement and non-silent interval detection.
//!
//! The shared primitive under both the threshold calibrator and the
//! segmenter: slice the waveform into short frames, measure each frame's
//! RMS loudness in dBFS, and merge the frame labels into millisecond
//! intervals. Silence only counts when it persists for at least the
//! minimum silence duration; shorter dips stay inside the surrounding
//! non-silent interval.

use crate::audio::waveform::Waveform;

/// Frame length for loudness analysis in milliseconds.
pub const FRAME_MS: u64 = 10;

/// dBFS value reported for an all-zero (or empty) frame.
pub const SILENCE_FLOOR_DB: f32 = -90.0;

/// A non-silent time span, `[start_ms, end_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Interval {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

/// Root Mean Square of audio samples, normalized to 0.0..=1.0.
pub fn calculate_rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = samples
        .iter()
        .map(|&sample| {
            let normalized = sample as f64 / i16::MAX as f64;
            normalized * normalized
        })
        .sum();

    let mean_square = sum_squares / samples.len() as f64;
    mean_square.sqrt() as f32
}

/// RMS loudness in dBFS (0 dB = full-scale), floored at [`SILENCE_FLOOR_DB`].
pub fn dbfs(samples: &[i16]) -> f32 {
    let rms = calculate_rms(samples);
    if rms <= 0.0 {
        return SILENCE_FLOOR_DB;
    }
    (20.0 * rms.log10()).max(SILENCE_FLOOR_DB)
}

/// Detect non-silent intervals in `[window_start_ms, window_end_ms)`.
///
/// A span counts as silent only when its loudness stays at or below
/// `threshold_db` for at least `min_silence_ms`; everything else is merged
/// into non-silent intervals. Returned intervals are ordered, non-empty and
/// non-overlapping, with offsets absolute to the waveform start.
pub fn detect_nonsilent(
    waveform: &Waveform,
    window_start_ms: u64,
    window_end_ms: u64,
    threshold_db: f32,
    min_silence_ms: u64,
) -> Vec<Interval> {
    let window_end_ms = window_end_ms.min(waveform.duration_ms());
    if window_start_ms >= window_end_ms {
        return Vec::new();
    }

    // Label each frame silent/loud.
    let mut frame_loud = Vec::new();
    let mut cursor = window_start_ms;
    while cursor < window_end_ms {
        let frame_end = (cursor + FRAME_MS).min(window_end_ms);
        let frame = waveform.slice_ms(cursor, frame_end);
        frame_loud.push(dbfs(frame) > threshold_db);
        cursor = frame_end;
    }

    // Merge frame labels into intervals, treating silent runs shorter than
    // min_silence_ms as part of the surrounding speech.
    let min_silence_frames = (min_silence_ms / FRAME_MS).max(1) as usize;
    let mut intervals = Vec::new();
    let mut open_start: Option<usize> = None;
    let mut silent_run = 0usize;

    for (i, &loud) in frame_loud.iter().enumerate() {
        if loud {
            if open_start.is_none() {
                open_start = Some(i);
            }
            silent_run = 0;
        } else if let Some(start) = open_start {
            silent_run += 1;
            if silent_run >= min_silence_frames {
                let end = i + 1 - silent_run;
                if end > start {
                    intervals.push(frame_span_to_interval(
                        start,
                        end,
                        window_start_ms,
                        window_end_ms,
                    ));
                }
                open_start = None;
                silent_run = 0;
            }
        }
    }

    if let Some(start) = open_start {
        // Trailing silence shorter than the minimum stays attached.
        let end = frame_loud.len() - silent_run;
        if end > start {
            intervals.push(frame_span_to_interval(
                start,
                end,
                window_start_ms,
                window_end_ms,
            ));
        }
    }

    intervals
}

fn frame_span_to_interval(
    start_frame: usize,
    end_frame: usize,
    window_start_ms: u64,
    window_end_ms: u64,
) -> Interval {
    Interval {
        start_ms: window_start_ms + start_frame as u64 * FRAME_MS,
        end_ms: (window_start_ms + end_frame as u64 * FRAME_MS).min(window_end_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::SAMPLE_RATE;

    fn ms_to_samples(ms: u64) -> usize {
        (ms * SAMPLE_RATE as u64 / 1000) as usize
    }

    /// Build a waveform from (duration_ms, amplitude) spans.
    pub(crate) fn make_waveform(spans: &[(u64, i16)]) -> Waveform {
        let mut samples = Vec::new();
        for &(ms, amplitude) in spans {
            samples.extend(std::iter::repeat_n(amplitude, ms_to_samples(ms)));
        }
        Waveform::from_samples(samples)
    }

    #[test]
    fn rms_silence_is_zero() {
        assert_eq!(calculate_rms(&vec![0i16; 1000]), 0.0);
    }

    #[test]
    fn rms_max_amplitude() {
        let rms = calculate_rms(&vec![i16::MAX; 1000]);
        assert!((rms - 1.0).abs() < 0.001, "RMS should be ~1.0, got {}", rms);
    }

    #[test]
    fn dbfs_silence_is_floored() {
        assert_eq!(dbfs(&[0i16; 100]), SILENCE_FLOOR_DB);
        assert_eq!(dbfs(&[]), SILENCE_FLOOR_DB);
    }

    #[test]
    fn dbfs_full_scale_is_near_zero() {
        let db = dbfs(&vec![i16::MAX; 1000]);
        assert!(db.abs() < 0.1, "Full-scale should be ~0 dBFS, got {}", db);
    }

    #[test]
    fn dbfs_half_scale_is_about_minus_six() {
        let db = dbfs(&vec![i16::MAX / 2; 1000]);
        assert!((db + 6.0).abs() < 0.3, "Expected ~-6 dBFS, got {}", db);
    }

    #[test]
    fn detects_single_speech_span() {
        // 500ms silence, 1000ms speech, 500ms silence
        let waveform = make_waveform(&[(500, 0), (1000, 8000), (500, 0)]);

        let intervals = detect_nonsilent(&waveform, 0, waveform.duration_ms(), -40.0, 200);

        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start_ms, 500);
        assert_eq!(intervals[0].end_ms, 1500);
    }

    #[test]
    fn short_dip_does_not_split() {
        // 100ms dip inside speech, below the 400ms minimum silence
        let waveform = make_waveform(&[(1000, 8000), (100, 0), (1000, 8000)]);

        let intervals = detect_nonsilent(&waveform, 0, waveform.duration_ms(), -40.0, 400);

        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start_ms, 0);
        assert_eq!(intervals[0].end_ms, 2100);
    }

    #[test]
    fn long_gap_splits_intervals() {
        let waveform = make_waveform(&[(1000, 8000), (600, 0), (1000, 8000)]);

        let intervals = detect_nonsilent(&waveform, 0, waveform.duration_ms(), -40.0, 400);

        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0], Interval { start_ms: 0, end_ms: 1000 });
        assert_eq!(
            intervals[1],
            Interval {
                start_ms: 1600,
                end_ms: 2600
            }
        );
    }

    #[test]
    fn all_silence_yields_nothing() {
        let waveform = make_waveform(&[(2000, 0)]);
        let intervals = detect_nonsilent(&waveform, 0, waveform.duration_ms(), -40.0, 400);
        assert!(intervals.is_empty());
    }

    #[test]
    fn all_speech_yields_one_interval() {
        let waveform = make_waveform(&[(2000, 8000)]);
        let intervals = detect_nonsilent(&waveform, 0, waveform.duration_ms(), -40.0, 400);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].duration_ms(), 2000);
    }

    #[test]
    fn window_bounds_are_respected() {
        let waveform = make_waveform(&[(1000, 8000), (600, 0), (1000, 8000)]);

        // Only look at the first second
        let intervals = detect_nonsilent(&waveform, 0, 1000, -40.0, 400);

        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].end_ms, 1000);
    }

    #[test]
    fn empty_window_yields_nothing() {
        let waveform = make_waveform(&[(1000, 8000)]);
        assert!(detect_nonsilent(&waveform, 500, 500, -40.0, 400).is_empty());
        assert!(detect_nonsilent(&waveform, 2000, 3000, -40.0, 400).is_empty());
    }

    #[test]
    fn threshold_controls_classification() {
        // -12 dBFS speech (quarter scale is ~-12dB)
        let waveform = make_waveform(&[(1000, i16::MAX / 4)]);

        // Lenient threshold: everything is loud
        assert_eq!(
            detect_nonsilent(&waveform, 0, 1000, -40.0, 200).len(),
            1
        );
        // Strict threshold above the signal level: everything is silent
        assert!(detect_nonsilent(&waveform, 0, 1000, -6.0, 200).is_empty());
    }
}
