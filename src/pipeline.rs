//! The subtitle job pipeline.
//!
//! Runs the full chain: extract audio, calibrate the silence threshold,
//! segment, transcribe, detect the source language, translate, and write the
//! SRT file. The output document is rendered fully in memory and written in
//! one final step, so a failure at any stage leaves no partial file.

use crate::audio::calibrator::{CalibratorConfig, calibrate};
use crate::audio::extractor::extract_audio;
use crate::audio::segmenter::segment;
use crate::audio::waveform::Waveform;
use crate::config::Config;
use crate::error::{Result, SublinguaError};
use crate::lang::{detect_dominant_language, normalize_lang};
use crate::progress::{ProgressReporter, ProgressSink, Stage, StatusSink};
use crate::services::Services;
use crate::subtitle::srt;
use crate::subtitle::timing::{TimingOptions, synthesize};
use crate::translate::phrase::{PhraseOptions, TranscriptSegment, translate_transcript};
use crate::translate::retry::{RetryPolicy, TokioDelay};
use std::path::Path;
use tokio::sync::watch;
use tracing::info;

/// A configured video-to-subtitles job. One-shot: `run` consumes it.
pub struct SubtitleJob {
    services: Services,
    config: Config,
    progress: Option<ProgressSink>,
    status: Option<StatusSink>,
    cancel: Option<watch::Receiver<bool>>,
}

impl SubtitleJob {
    /// Create a job, validating the tunables up front.
    pub fn new(services: Services, config: Config) -> Result<Self> {
        config.job.validate()?;
        Ok(Self {
            services,
            config,
            progress: None,
            status: None,
            cancel: None,
        })
    }

    /// Receive overall progress, 0–100.
    pub fn on_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Receive human-readable status lines.
    pub fn on_status(mut self, sink: StatusSink) -> Self {
        self.status = Some(sink);
        self
    }

    /// Observe a cancellation flag; the job stops at the next checkpoint
    /// after the flag turns true.
    pub fn with_cancel(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Run the full pipeline on a video file.
    pub async fn run(self, video: &Path, output: &Path) -> Result<()> {
        self.check_cancelled()?;
        self.report_status("Extracting audio track");

        let temp_wav = extract_audio(video).await?;
        let waveform = Waveform::from_wav_file(temp_wav.path())?;
        drop(temp_wav);

        self.run_on_waveform(&waveform, output, Stage::Extraction)
            .await
    }

    /// Run the pipeline on already-decoded audio. The entry point for tests
    /// and callers that bring their own extraction.
    pub async fn run_on_audio(self, waveform: &Waveform, output: &Path) -> Result<()> {
        self.run_on_waveform(waveform, output, Stage::Extraction)
            .await
    }

    async fn run_on_waveform(
        self,
        waveform: &Waveform,
        output: &Path,
        completed: Stage,
    ) -> Result<()> {
        let mut progress = ProgressReporter::new(self.progress);
        progress.finish_stage(completed);

        let options = &self.config.job;
        let status = &self.status;
        let cancel = &self.cancel;

        // Calibration
        check_cancelled(cancel)?;
        let threshold_db = match options.silence_threshold_db {
            Some(db) => {
                info!(threshold_db = db, "using fixed silence threshold");
                db
            }
            None => {
                report_status(status, "Calibrating silence threshold");
                let calibrated = calibrate(
                    waveform,
                    options.min_silence_ms,
                    &CalibratorConfig::default(),
                );
                info!(
                    threshold_db = calibrated.threshold_db,
                    ratio = calibrated.ratio,
                    "silence threshold calibrated"
                );
                calibrated.threshold_db
            }
        };
        progress.finish_stage(Stage::Calibration);

        // Segmentation
        check_cancelled(cancel)?;
        report_status(status, "Segmenting audio");
        let chunks = segment(
            waveform,
            threshold_db,
            options.min_silence_ms,
            options.max_chunk_ms,
            |fraction| progress.report(Stage::Segmentation, fraction),
        );
        if chunks.is_empty() {
            return Err(SublinguaError::NoSpeech);
        }
        info!(chunks = chunks.len(), "audio segmented");

        // Transcription
        let mut segments = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            check_cancelled(cancel)?;
            report_status(
                status,
                &format!("Transcribing segment {}/{}", i + 1, chunks.len()),
            );
            let text = self.services.transcriber.transcribe(&chunk.samples).await?;
            segments.push(TranscriptSegment {
                start_ms: chunk.start_ms,
                end_ms: chunk.end_ms,
                text,
            });
            progress.report(Stage::Transcription, (i + 1) as f64 / chunks.len() as f64);
        }

        // Language detection
        check_cancelled(cancel)?;
        let source = match &self.config.translation.source_lang {
            Some(lang) => normalize_lang(lang),
            None => {
                report_status(status, "Detecting source language");
                detect_dominant_language(&segments, self.services.classifier.as_ref()).await
            }
        };
        let target = normalize_lang(&self.config.translation.target_lang);
        info!(source = %source, target = %target, "languages resolved");

        // Translation
        check_cancelled(cancel)?;
        report_status(status, "Translating transcript");
        let phrase_options = PhraseOptions {
            max_phrase_ms: options.max_phrase_ms,
            context_window: options.context_window,
            retry: RetryPolicy::default(),
        };
        let translated = translate_transcript(
            &segments,
            self.services.translator.as_ref(),
            &TokioDelay,
            &phrase_options,
            &source,
            &target,
            cancel.as_ref(),
            |fraction| progress.report(Stage::Translation, fraction),
        )
        .await?;

        // Synthesis
        check_cancelled(cancel)?;
        let cues = synthesize(
            &translated,
            &TimingOptions {
                min_silence_ms: options.min_silence_ms,
                max_cue_ms: options.max_cue_ms,
                max_chars_per_line: options.max_chars_per_line,
            },
        );
        srt::write(&cues, output)?;
        progress.complete();

        report_status(
            status,
            &format!("Wrote {} cues to {}", cues.len(), output.display()),
        );
        info!(cues = cues.len(), output = %output.display(), "subtitle job complete");
        Ok(())
    }

    fn check_cancelled(&self) -> Result<()> {
        check_cancelled(&self.cancel)
    }

    fn report_status(&self, message: &str) {
        report_status(&self.status, message);
    }
}

fn check_cancelled(cancel: &Option<watch::Receiver<bool>>) -> Result<()> {
    if let Some(rx) = cancel
        && *rx.borrow()
    {
        return Err(SublinguaError::Cancelled);
    }
    Ok(())
}

fn report_status(status: &Option<StatusSink>, message: &str) {
    if let Some(sink) = status {
        sink(message);
    }
}
