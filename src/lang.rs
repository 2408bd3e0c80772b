//! Language code normalization and whole-transcript language detection.

use crate::defaults;
use crate::services::LanguageClassifier;
use crate::translate::phrase::TranscriptSegment;
use tracing::{debug, warn};

/// Normalize a language code to the canonical form the translator expects.
///
/// Lowercases, collapses regional variants of Chinese and Portuguese-adjacent
/// codes, and maps a few legacy ISO codes to their modern spellings.
pub fn normalize_lang(code: &str) -> String {
    let lower = code.trim().to_lowercase();
    match lower.as_str() {
        "zh-cn" | "zh-tw" | "zh-hans" | "zh-hant" => "zh".to_string(),
        "pt-br" | "pt-pt" => "pt".to_string(),
        "iw" => "he".to_string(),
        "in" => "id".to_string(),
        "ji" => "yi".to_string(),
        _ => lower,
    }
}

/// Detect the dominant language across the whole transcript.
///
/// Classification runs once over a bounded sample of concatenated segment
/// text, not per chunk: short chunks individually misclassify easily, and the
/// whole recording is assumed monolingual. Falls back to
/// [`defaults::FALLBACK_LANGUAGE`] when the transcript is empty or the
/// classifier fails.
pub async fn detect_dominant_language(
    segments: &[TranscriptSegment],
    classifier: &dyn LanguageClassifier,
) -> String {
    let sample = build_sample(segments, defaults::LANGUAGE_SAMPLE_CHARS);
    if sample.is_empty() {
        debug!("transcript is empty, using fallback language");
        return defaults::FALLBACK_LANGUAGE.to_string();
    }

    match classifier.classify(&sample).await {
        Ok(code) => {
            let normalized = normalize_lang(&code);
            debug!(detected = %code, normalized = %normalized, "language detected");
            normalized
        }
        Err(e) => {
            warn!(error = %e, "language detection failed, using fallback");
            defaults::FALLBACK_LANGUAGE.to_string()
        }
    }
}

/// Concatenate segment text up to `max_chars`, splitting on whole segments.
fn build_sample(segments: &[TranscriptSegment], max_chars: usize) -> String {
    let mut sample = String::new();
    for segment in segments {
        let text = segment.text.trim();
        if text.is_empty() {
            continue;
        }
        if !sample.is_empty() {
            sample.push(' ');
        }
        sample.push_str(text);
        if sample.len() >= max_chars {
            break;
        }
    }
    sample
}
