//! Job progress reporting.
//!
//! The overall percentage is partitioned into fixed per-stage bands, so a
//! consumer driving a progress bar sees one monotone 0–100 scale no matter
//! how long any individual stage runs.

/// Receives the overall percentage, 0–100.
pub type ProgressSink = Box<dyn Fn(u8) + Send + Sync>;

/// Receives human-readable status lines ("Transcribing segment 3/12").
pub type StatusSink = Box<dyn Fn(&str) + Send + Sync>;

/// Pipeline stages in execution order, each owning a band of the 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extraction,
    Calibration,
    Segmentation,
    Transcription,
    Translation,
    Synthesis,
}

impl Stage {
    /// The `[start, end]` percentage band this stage spans.
    pub fn band(&self) -> (u8, u8) {
        match self {
            Stage::Extraction => (0, 10),
            Stage::Calibration => (10, 20),
            Stage::Segmentation => (20, 30),
            Stage::Transcription => (30, 65),
            Stage::Translation => (65, 95),
            Stage::Synthesis => (95, 100),
        }
    }
}

/// Maps per-stage fractions onto the overall scale and enforces monotonicity.
///
/// Stages may report out of order or repeat a fraction; the reporter never
/// lets the emitted percentage move backwards.
pub struct ProgressReporter {
    sink: Option<ProgressSink>,
    last: u8,
}

impl ProgressReporter {
    pub fn new(sink: Option<ProgressSink>) -> Self {
        Self { sink, last: 0 }
    }

    /// Report `fraction` (0.0–1.0) of `stage` as complete.
    pub fn report(&mut self, stage: Stage, fraction: f64) {
        let (start, end) = stage.band();
        let span = (end - start) as f64;
        let percent = start as f64 + span * fraction.clamp(0.0, 1.0);
        self.emit(percent.floor() as u8);
    }

    /// Mark `stage` fully complete.
    pub fn finish_stage(&mut self, stage: Stage) {
        self.emit(stage.band().1);
    }

    /// Mark the whole job complete.
    pub fn complete(&mut self) {
        self.emit(100);
    }

    fn emit(&mut self, percent: u8) {
        let percent = percent.min(100);
        if percent <= self.last {
            return;
        }
        self.last = percent;
        if let Some(sink) = &self.sink {
            sink(percent);
        }
    }
}
