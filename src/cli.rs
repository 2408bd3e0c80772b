//! Command-line interface for sublingua
//!
//! Provides argument parsing using clap derive macros.

use clap::Parser;
use std::path::PathBuf;

/// Generate translated subtitles from a video file
#[derive(Parser, Debug)]
#[command(
    name = "sublingua",
    version,
    about = "Generate translated SRT subtitles from a video's audio track"
)]
pub struct Cli {
    /// Video file to subtitle
    pub video: PathBuf,

    /// Output SRT path (default: the video path with an .srt extension)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Target language code for the subtitles (e.g., en, pt, de)
    #[arg(long, value_name = "LANG")]
    pub to: Option<String>,

    /// Source language code (default: detect from the transcript)
    #[arg(long, value_name = "LANG")]
    pub from: Option<String>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress status output (quiet mode)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output (-v: info, -vv: full diagnostics)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Minimum silence gap that splits chunks. Examples: 400, 400ms, 1s
    #[arg(long, value_name = "DURATION", value_parser = parse_ms)]
    pub min_silence: Option<u64>,

    /// Maximum transcription chunk duration. Examples: 10s, 8000
    #[arg(long, value_name = "DURATION", value_parser = parse_ms)]
    pub max_chunk: Option<u64>,

    /// Maximum display duration of one subtitle cue. Examples: 3s, 2500
    #[arg(long, value_name = "DURATION", value_parser = parse_ms)]
    pub max_cue: Option<u64>,

    /// Maximum characters per subtitle line
    #[arg(long, value_name = "CHARS")]
    pub max_chars: Option<usize>,

    /// Segments grouped per translation request (0 disables grouping)
    #[arg(long, value_name = "N")]
    pub context_window: Option<u32>,

    /// Fixed silence threshold in dBFS, skipping calibration. Example: -40
    #[arg(long, value_name = "DB", allow_hyphen_values = true)]
    pub threshold_db: Option<f32>,

    /// Path to a local Whisper ggml model for offline transcription
    #[cfg(feature = "whisper")]
    #[arg(long, value_name = "PATH")]
    pub whisper_model: Option<PathBuf>,
}

/// Parse a duration string into milliseconds.
///
/// Bare numbers are milliseconds; otherwise any format accepted by
/// `humantime` works (`400ms`, `1s`, `2m30s`).
fn parse_ms(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if let Ok(ms) = s.parse::<u64>() {
        return Ok(ms);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_millis() as u64)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_invocation() {
        let cli = Cli::try_parse_from(["sublingua", "video.mp4"]).unwrap();
        assert_eq!(cli.video, PathBuf::from("video.mp4"));
        assert!(cli.output.is_none());
        assert!(cli.to.is_none());
        assert!(cli.from.is_none());
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn video_argument_is_required() {
        let result = Cli::try_parse_from(["sublingua"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_languages_and_output() {
        let cli = Cli::try_parse_from([
            "sublingua",
            "talk.mkv",
            "--to",
            "pt",
            "--from",
            "en",
            "-o",
            "talk.srt",
        ])
        .unwrap();

        assert_eq!(cli.to.as_deref(), Some("pt"));
        assert_eq!(cli.from.as_deref(), Some("en"));
        assert_eq!(cli.output, Some(PathBuf::from("talk.srt")));
    }

    #[test]
    fn parses_tunables() {
        let cli = Cli::try_parse_from([
            "sublingua",
            "v.mp4",
            "--min-silence",
            "600ms",
            "--max-chunk",
            "8s",
            "--max-cue",
            "2500",
            "--max-chars",
            "42",
            "--context-window",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.min_silence, Some(600));
        assert_eq!(cli.max_chunk, Some(8000));
        assert_eq!(cli.max_cue, Some(2500));
        assert_eq!(cli.max_chars, Some(42));
        assert_eq!(cli.context_window, Some(3));
    }

    #[test]
    fn parses_negative_threshold() {
        let cli = Cli::try_parse_from(["sublingua", "v.mp4", "--threshold-db", "-35.5"]).unwrap();
        assert_eq!(cli.threshold_db, Some(-35.5));
    }

    #[test]
    fn parses_verbose_count() {
        let cli = Cli::try_parse_from(["sublingua", "v.mp4", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn parses_quiet_short_flag() {
        let cli = Cli::try_parse_from(["sublingua", "v.mp4", "-q"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn parse_ms_bare_number_is_milliseconds() {
        assert_eq!(parse_ms("400").unwrap(), 400);
        assert_eq!(parse_ms("0").unwrap(), 0);
    }

    #[test]
    fn parse_ms_humantime_formats() {
        assert_eq!(parse_ms("400ms").unwrap(), 400);
        assert_eq!(parse_ms("1s").unwrap(), 1000);
        assert_eq!(parse_ms("2m30s").unwrap(), 150_000);
    }

    #[test]
    fn parse_ms_rejects_garbage() {
        assert!(parse_ms("abc").is_err());
        assert!(parse_ms("10x").is_err());
        assert!(parse_ms("").is_err());
    }
}
