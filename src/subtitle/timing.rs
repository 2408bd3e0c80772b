//! Cue synthesis from translated chunks.
//!
//! Chunk boundaries land exactly where the audio was spliced, so readers can
//! be left with cues that vanish just before the speaker pauses. Short gaps
//! below the silence floor are therefore annexed onto the preceding cue, and
//! over-long chunks are split into one cue per wrapped line so no cue lingers
//! past the reading window.

use crate::subtitle::{SubtitleCue, wrap_lines};
use crate::translate::phrase::TranslatedChunk;

/// Cue shaping knobs.
#[derive(Debug, Clone, Copy)]
pub struct TimingOptions {
    /// Gaps shorter than this are not real pauses; the cue extends over them.
    pub min_silence_ms: u64,
    /// Maximum display duration of one cue (ms).
    pub max_cue_ms: u64,
    /// Maximum characters per display line.
    pub max_chars_per_line: usize,
}

/// Build the cue sequence for the translated transcript.
///
/// Chunks with empty text keep their place in the gap calculation but emit no
/// cue. Indices are 1-based and consecutive over the emitted cues.
pub fn synthesize(chunks: &[TranslatedChunk], options: &TimingOptions) -> Vec<SubtitleCue> {
    let mut cues = Vec::new();
    let mut index = 1u32;

    for (i, chunk) in chunks.iter().enumerate() {
        if chunk.text.trim().is_empty() {
            continue;
        }

        // A sub-silence gap to the next chunk is display dead air, not a
        // pause; stretch this cue to meet the next one.
        let mut end_ms = chunk.end_ms;
        if let Some(next) = chunks.get(i + 1) {
            let gap = next.start_ms.saturating_sub(chunk.end_ms);
            if gap > 0 && gap < options.min_silence_ms {
                end_ms = next.start_ms;
            }
        }

        let lines = wrap_lines(&chunk.text, options.max_chars_per_line);
        let duration = end_ms - chunk.start_ms;

        if duration <= options.max_cue_ms || lines.len() <= 1 {
            cues.push(SubtitleCue {
                index,
                start_ms: chunk.start_ms,
                end_ms,
                lines,
            });
            index += 1;
        } else {
            // One cue per line, splitting the chunk's time evenly; the last
            // line is pinned to the chunk end so no time is lost to rounding.
            let per_line = duration / lines.len() as u64;
            let line_count = lines.len();
            for (line_index, line) in lines.into_iter().enumerate() {
                let start = chunk.start_ms + line_index as u64 * per_line;
                let end = if line_index + 1 == line_count {
                    end_ms
                } else {
                    start + per_line
                };
                cues.push(SubtitleCue {
                    index,
                    start_ms: start,
                    end_ms: end,
                    lines: vec![line],
                });
                index += 1;
            }
        }
    }

    cues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(start_ms: u64, end_ms: u64, text: &str) -> TranslatedChunk {
        TranslatedChunk {
            start_ms,
            end_ms,
            text: text.to_string(),
        }
    }

    fn options() -> TimingOptions {
        TimingOptions {
            min_silence_ms: 500,
            max_cue_ms: 3000,
            max_chars_per_line: 50,
        }
    }

    #[test]
    fn short_chunk_is_one_cue() {
        let cues = synthesize(&[chunk(1000, 3000, "hello world")], &options());

        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].index, 1);
        assert_eq!(cues[0].start_ms, 1000);
        assert_eq!(cues[0].end_ms, 3000);
        assert_eq!(cues[0].lines, vec!["hello world"]);
    }

    #[test]
    fn sub_silence_gap_extends_cue_to_next_start() {
        let cues = synthesize(
            &[chunk(1000, 5000, "first"), chunk(5300, 7000, "second")],
            &options(),
        );

        assert_eq!(cues[0].end_ms, 5300);
        assert_eq!(cues[1].start_ms, 5300);
    }

    #[test]
    fn real_pause_is_not_bridged() {
        let cues = synthesize(
            &[chunk(1000, 5000, "first"), chunk(6000, 7000, "second")],
            &options(),
        );

        assert_eq!(cues[0].end_ms, 5000);
    }

    #[test]
    fn touching_chunks_are_left_alone() {
        let cues = synthesize(
            &[chunk(1000, 5000, "first"), chunk(5000, 7000, "second")],
            &options(),
        );

        assert_eq!(cues[0].end_ms, 5000);
    }

    #[test]
    fn long_chunk_splits_into_one_cue_per_line() {
        let text = "first part of the sentence here and then the second part follows after";
        let cues = synthesize(&[chunk(0, 9000, text)], &options());

        assert!(cues.len() > 1);
        for cue in &cues {
            assert_eq!(cue.lines.len(), 1);
        }
        // Time is contiguous and pinned at the chunk boundaries
        assert_eq!(cues[0].start_ms, 0);
        assert_eq!(cues.last().unwrap().end_ms, 9000);
        for pair in cues.windows(2) {
            assert_eq!(pair[0].end_ms, pair[1].start_ms);
        }
    }

    #[test]
    fn long_duration_single_line_stays_one_cue() {
        let cues = synthesize(&[chunk(0, 9000, "short text")], &options());
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].end_ms, 9000);
    }

    #[test]
    fn within_max_cue_keeps_multiline() {
        let text = "a line that wraps because it is longer than the fifty character limit";
        let cues = synthesize(&[chunk(0, 2500, text)], &options());

        assert_eq!(cues.len(), 1);
        assert!(cues[0].lines.len() > 1);
    }

    #[test]
    fn empty_chunks_emit_no_cue_but_count_for_gaps() {
        let cues = synthesize(
            &[
                chunk(0, 1000, "first"),
                chunk(1200, 2000, ""),
                chunk(2100, 3000, "third"),
            ],
            &options(),
        );

        assert_eq!(cues.len(), 2);
        // Gap to the empty chunk still triggers the extension
        assert_eq!(cues[0].end_ms, 1200);
        assert_eq!(cues[1].lines, vec!["third"]);
    }

    #[test]
    fn indices_are_consecutive_from_one() {
        let text = "first part of the sentence here and then the second part follows after";
        let cues = synthesize(
            &[chunk(0, 9000, text), chunk(10_000, 11_000, "tail")],
            &options(),
        );

        for (i, cue) in cues.iter().enumerate() {
            assert_eq!(cue.index, i as u32 + 1);
        }
    }

    #[test]
    fn no_chunks_no_cues() {
        assert!(synthesize(&[], &options()).is_empty());
    }
}
