//! SRT rendering.

use crate::error::Result;
use crate::subtitle::SubtitleCue;
use std::path::Path;

/// Format a millisecond offset as an SRT timestamp, `HH:MM:SS,mmm`.
pub fn format_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Render the cue sequence as a complete SRT document.
pub fn render(cues: &[SubtitleCue]) -> String {
    let mut out = String::new();
    for cue in cues {
        out.push_str(&cue.index.to_string());
        out.push('\n');
        out.push_str(&format_timestamp(cue.start_ms));
        out.push_str(" --> ");
        out.push_str(&format_timestamp(cue.end_ms));
        out.push('\n');
        for line in &cue.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Render and write the cues to `path` in one shot.
///
/// The document is built fully in memory first, so a failed job never leaves
/// a partial file behind.
pub fn write(cues: &[SubtitleCue], path: &Path) -> Result<()> {
    let document = render(cues);
    std::fs::write(path, document)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(index: u32, start_ms: u64, end_ms: u64, lines: &[&str]) -> SubtitleCue {
        SubtitleCue {
            index,
            start_ms,
            end_ms,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn timestamp_zero() {
        assert_eq!(format_timestamp(0), "00:00:00,000");
    }

    #[test]
    fn timestamp_with_all_fields() {
        // 1h 2m 3s 456ms
        assert_eq!(format_timestamp(3_723_456), "01:02:03,456");
    }

    #[test]
    fn timestamp_pads_milliseconds() {
        assert_eq!(format_timestamp(1005), "00:00:01,005");
    }

    #[test]
    fn timestamp_hours_beyond_a_day_keep_counting() {
        assert_eq!(format_timestamp(90_000_000), "25:00:00,000");
    }

    #[test]
    fn renders_single_cue() {
        let cues = vec![cue(1, 1000, 3500, &["hello world"])];

        assert_eq!(
            render(&cues),
            "1\n00:00:01,000 --> 00:00:03,500\nhello world\n\n"
        );
    }

    #[test]
    fn renders_multiline_cue() {
        let cues = vec![cue(1, 0, 2000, &["first line", "second line"])];

        assert_eq!(
            render(&cues),
            "1\n00:00:00,000 --> 00:00:02,000\nfirst line\nsecond line\n\n"
        );
    }

    #[test]
    fn renders_cues_in_sequence() {
        let cues = vec![
            cue(1, 0, 1000, &["one"]),
            cue(2, 1500, 2500, &["two"]),
        ];

        let rendered = render(&cues);
        let blocks: Vec<&str> = rendered.trim_end().split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("1\n"));
        assert!(blocks[1].starts_with("2\n"));
    }

    #[test]
    fn empty_cue_list_renders_empty_document() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");
        let cues = vec![cue(1, 0, 1000, &["hello"])];

        write(&cues, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "1\n00:00:00,000 --> 00:00:01,000\nhello\n\n");
    }
}
