//! Phrase-grouped translation with proportional word redistribution.
//!
//! Translating chunk transcripts one at a time loses cross-chunk context and
//! produces choppy output. Segments are therefore grouped into phrases,
//! translated as a unit, and the translated words are then redistributed back
//! onto the original segments in proportion to each segment's share of the
//! source words, so every segment keeps its exact original timing.

use crate::error::{Result, SublinguaError};
use crate::services::Translator;
use crate::translate::retry::{Delay, RetryPolicy, translate_with_retry};
use tokio::sync::watch;
use tracing::{debug, warn};

/// One transcribed chunk: original timing plus source-language text.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

/// A transcript segment after translation. Timing is untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedChunk {
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

/// Grouping and retry knobs for a translation pass.
#[derive(Debug, Clone, Copy)]
pub struct PhraseOptions {
    /// Maximum total duration of one phrase group (ms).
    pub max_phrase_ms: u64,
    /// Maximum segments per phrase group; 0 translates each segment alone.
    pub context_window: u32,
    pub retry: RetryPolicy,
}

/// Translate the transcript from `source` to `target`.
///
/// When the languages match the text passes through unchanged. Every input
/// segment yields exactly one output chunk with identical timing; segments
/// whose transcript is empty stay empty.
///
/// `on_progress` receives the fraction of phrase groups completed. The
/// cancellation flag, when supplied, is checked between phrase groups.
pub async fn translate_transcript(
    segments: &[TranscriptSegment],
    translator: &dyn Translator,
    delay: &dyn Delay,
    options: &PhraseOptions,
    source: &str,
    target: &str,
    cancel: Option<&watch::Receiver<bool>>,
    mut on_progress: impl FnMut(f64),
) -> Result<Vec<TranslatedChunk>> {
    if source == target {
        debug!(language = %source, "source matches target, passing transcript through");
        on_progress(1.0);
        return Ok(segments.iter().map(pass_through).collect());
    }

    let groups = group_segments(segments, options.max_phrase_ms, options.context_window);
    let group_count = groups.len().max(1);

    let mut chunks = Vec::with_capacity(segments.len());
    for (index, group) in groups.iter().enumerate() {
        if let Some(rx) = cancel
            && *rx.borrow()
        {
            return Err(SublinguaError::Cancelled);
        }
        let group_segments = &segments[group.clone()];
        chunks.extend(
            translate_group(group_segments, translator, delay, &options.retry, source, target)
                .await?,
        );
        on_progress((index + 1) as f64 / group_count as f64);
    }

    on_progress(1.0);
    Ok(chunks)
}

fn pass_through(segment: &TranscriptSegment) -> TranslatedChunk {
    TranslatedChunk {
        start_ms: segment.start_ms,
        end_ms: segment.end_ms,
        text: segment.text.clone(),
    }
}

/// Partition segments into contiguous phrase groups.
///
/// A group closes when adding the next segment would push its total duration
/// past `max_phrase_ms` or its size past the context window cap.
fn group_segments(
    segments: &[TranscriptSegment],
    max_phrase_ms: u64,
    context_window: u32,
) -> Vec<std::ops::Range<usize>> {
    let cap = (context_window as usize).max(1);
    let mut groups = Vec::new();
    let mut start = 0;
    let mut duration = 0u64;

    for (i, segment) in segments.iter().enumerate() {
        let segment_ms = segment.end_ms - segment.start_ms;
        let size = i - start;
        if size > 0 && (size >= cap || duration + segment_ms > max_phrase_ms) {
            groups.push(start..i);
            start = i;
            duration = 0;
        }
        duration += segment_ms;
    }
    if start < segments.len() {
        groups.push(start..segments.len());
    }
    groups
}

/// Translate one phrase group and map the result back onto its segments.
async fn translate_group(
    group: &[TranscriptSegment],
    translator: &dyn Translator,
    delay: &dyn Delay,
    retry: &RetryPolicy,
    source: &str,
    target: &str,
) -> Result<Vec<TranslatedChunk>> {
    // Word counts of the non-empty segments drive the redistribution.
    let counts: Vec<usize> = group
        .iter()
        .map(|s| s.text.split_whitespace().count())
        .collect();

    if counts.iter().all(|&c| c == 0) {
        return Ok(group.iter().map(pass_through).collect());
    }

    let joined = group
        .iter()
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let mut translated = String::new();
    for sentence in split_sentences(&joined) {
        let result =
            translate_with_retry(translator, delay, retry, &sentence, source, target).await;
        let text = match result {
            Ok(t) => t,
            Err(e) => {
                // Keep the source text rather than dropping the cue.
                warn!(error = %e, "translation exhausted retries, keeping original text");
                sentence
            }
        };
        if !translated.is_empty() && !translated.ends_with(' ') {
            translated.push(' ');
        }
        translated.push_str(text.trim());
    }

    let words: Vec<&str> = translated.split_whitespace().collect();
    let texts = redistribute(&words, &counts);

    Ok(group
        .iter()
        .zip(texts)
        .map(|(segment, text)| TranslatedChunk {
            start_ms: segment.start_ms,
            end_ms: segment.end_ms,
            text,
        })
        .collect())
}

/// Split text into sentences on terminal punctuation, keeping the terminator.
fn split_sentences(text: &str) -> Vec<String> {
    const TERMINATORS: [char; 6] = ['.', '!', '?', '。', '！', '？'];

    let mut sentences = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        current.push(ch);
        if TERMINATORS.contains(&ch) {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    sentences
}

/// Distribute translated words over segments proportionally to the original
/// word counts.
///
/// Each non-empty segment receives at least one word when enough words exist;
/// the last non-empty segment absorbs any remainder. Segments with an empty
/// transcript receive no words.
fn redistribute(words: &[&str], counts: &[usize]) -> Vec<String> {
    let total_orig: usize = counts.iter().sum();
    let nonempty = counts.iter().filter(|&&c| c > 0).count();
    let last_nonempty = counts.iter().rposition(|&c| c > 0);

    let mut texts = Vec::with_capacity(counts.len());
    let mut cursor = 0usize;
    let mut seen_nonempty = 0usize;

    for (i, &count) in counts.iter().enumerate() {
        if count == 0 {
            texts.push(String::new());
            continue;
        }
        seen_nonempty += 1;

        let take = if Some(i) == last_nonempty {
            words.len() - cursor
        } else {
            let budget = ((words.len() as f64 * count as f64 / total_orig as f64).round()
                as usize)
                .max(1);
            // Reserve one word for each non-empty segment still to come.
            let reserve = nonempty - seen_nonempty;
            let available = (words.len() - cursor).saturating_sub(reserve);
            budget.min(available).max(usize::from(available > 0))
        };

        texts.push(words[cursor..cursor + take].join(" "));
        cursor += take;
    }
    texts
}
