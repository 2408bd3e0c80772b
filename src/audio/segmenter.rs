//! Silence-bounded audio segmentation.
//!
//! Applies a calibrated (or caller-supplied) silence threshold to the full
//! waveform, producing the ordered chunk sequence the transcriber consumes.
//! Silence gaps found by the detector are the intended splice points and are
//! never bridged; intervals longer than the chunk cap are split into
//! fixed-size sub-chunks instead.

use crate::audio::loudness::detect_nonsilent;
use crate::audio::waveform::Waveform;

/// A bounded-duration unit of audio carved from a non-silent interval.
///
/// Chunks are produced in non-decreasing start order, never overlap, and
/// never exceed the configured maximum duration.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Absolute start offset in the source waveform (ms).
    pub start_ms: u64,
    /// Absolute end offset in the source waveform (ms).
    pub end_ms: u64,
    /// The chunk's samples (16kHz mono).
    pub samples: Vec<i16>,
}

impl AudioChunk {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

/// Segment the waveform into transcription chunks.
///
/// `on_progress` receives the fraction of waveform time processed, in
/// non-decreasing order ending at 1.0.
pub fn segment(
    waveform: &Waveform,
    threshold_db: f32,
    min_silence_ms: u64,
    max_chunk_ms: u64,
    mut on_progress: impl FnMut(f64),
) -> Vec<AudioChunk> {
    let total_ms = waveform.duration_ms();
    if total_ms == 0 {
        on_progress(1.0);
        return Vec::new();
    }

    let intervals = detect_nonsilent(waveform, 0, total_ms, threshold_db, min_silence_ms);

    let mut chunks = Vec::new();
    for interval in &intervals {
        // Split over-long intervals into max-size sub-chunks; the remainder
        // (or a short interval) is emitted as-is.
        let mut start = interval.start_ms;
        while interval.end_ms - start > max_chunk_ms {
            let end = start + max_chunk_ms;
            chunks.push(make_chunk(waveform, start, end));
            start = end;
        }
        if interval.end_ms > start {
            chunks.push(make_chunk(waveform, start, interval.end_ms));
        }

        on_progress(interval.end_ms as f64 / total_ms as f64);
    }

    on_progress(1.0);
    chunks
}

fn make_chunk(waveform: &Waveform, start_ms: u64, end_ms: u64) -> AudioChunk {
    AudioChunk {
        start_ms,
        end_ms,
        samples: waveform.slice_ms(start_ms, end_ms).to_vec(),
    }
}
