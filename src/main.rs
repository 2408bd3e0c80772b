use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use sublingua::cli::Cli;
use sublingua::config::Config;
use sublingua::pipeline::SubtitleJob;
use sublingua::services::Services;
use sublingua::services::google::GoogleWebTranslator;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.video.with_extension("srt"));

    let services = build_services(&cli)?;
    let quiet = cli.quiet;

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    let mut job = SubtitleJob::new(services, config)?.with_cancel(cancel_rx);
    if !quiet {
        job = job
            .on_status(Box::new(|message| eprintln!("{}", message)))
            .on_progress(Box::new(|percent| eprint!("\r[{:3}%] ", percent)));
    }

    job.run(&cli.video, &output).await?;
    if !quiet {
        eprintln!();
    }
    println!("{}", output.display());
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "sublingua=warn",
        1 => "sublingua=info",
        _ => "sublingua=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Layer config sources: file, then environment, then CLI flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => Config::default(),
        },
    };
    config = config.with_env_overrides();

    if let Some(lang) = &cli.to {
        config.translation.target_lang = lang.clone();
    }
    if let Some(lang) = &cli.from {
        config.translation.source_lang = Some(lang.clone());
    }
    if let Some(ms) = cli.min_silence {
        config.job.min_silence_ms = ms;
    }
    if let Some(ms) = cli.max_chunk {
        config.job.max_chunk_ms = ms;
    }
    if let Some(ms) = cli.max_cue {
        config.job.max_cue_ms = ms;
    }
    if let Some(chars) = cli.max_chars {
        config.job.max_chars_per_line = chars;
    }
    if let Some(window) = cli.context_window {
        config.job.context_window = window;
    }
    if let Some(db) = cli.threshold_db {
        config.job.silence_threshold_db = Some(db);
    }

    config.job.validate()?;
    Ok(config)
}

fn build_services(cli: &Cli) -> Result<Services> {
    let google = Arc::new(GoogleWebTranslator::new()?);

    let transcriber = build_transcriber(cli)?;

    Ok(Services {
        transcriber,
        translator: google.clone(),
        classifier: google,
    })
}

#[cfg(feature = "whisper")]
fn build_transcriber(cli: &Cli) -> Result<Arc<dyn sublingua::services::Transcriber>> {
    use sublingua::services::whisper::{WhisperConfig, WhisperTranscriber};

    let model_path: std::path::PathBuf = match &cli.whisper_model {
        Some(path) => path.clone(),
        None => default_model_path()
            .filter(|p| p.exists())
            .context("no Whisper model found; pass --whisper-model PATH")?,
    };

    let transcriber = WhisperTranscriber::new(WhisperConfig {
        model_path,
        language: cli.from.clone(),
        threads: None,
    })?;
    Ok(Arc::new(transcriber))
}

#[cfg(feature = "whisper")]
fn default_model_path() -> Option<std::path::PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("sublingua/models/ggml-base.bin"))
}

#[cfg(not(feature = "whisper"))]
fn build_transcriber(_cli: &Cli) -> Result<Arc<dyn sublingua::services::Transcriber>> {
    anyhow::bail!(
        "this binary was built without speech recognition; \
         rebuild with: cargo build --release --features whisper"
    );
}
