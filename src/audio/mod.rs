//! Audio handling: extraction, decoding, loudness analysis, segmentation.

pub mod calibrator;
pub mod extractor;
pub mod loudness;
pub mod segmenter;
pub mod waveform;
