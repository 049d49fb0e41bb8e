//! webgrid - speech/keyboard grid acquisition game
//!
//! Terminal front-end: wires the 1 Hz ticker, a keyboard reader thread,
//! and the configured transcription feeder into the single-consumer game
//! loop, and repaints the screen after every event.

use std::io::Write as _;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

use webgrid::config::{Config, SttConfig, SttMode};
use webgrid::errors::GameError;
use webgrid::events::{self, EventSender, GameEvent, Key};
use webgrid::runtime::{self, GameLoop};
use webgrid::session::Session;
use webgrid::stt::http::HttpTranscriber;
use webgrid::stt::stream::StreamingTranscriber;
use webgrid::stt::{wav, Transcriber};
use webgrid::ui;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the game screen.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("webgrid=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load("webgrid.toml").context("failed to load config")?;
    info!(
        grid_size = config.grid_size,
        session_secs = config.session_secs,
        "starting webgrid"
    );

    let (tx, rx) = events::channel(64);
    let cancel = CancellationToken::new();
    let tracker = TaskTracker::new();

    tracker.spawn(runtime::ticker(tx.clone(), cancel.clone()));
    spawn_keyboard_reader(tx.clone(), cancel.clone());
    spawn_voice_feeder(&config, &tracker, tx.clone(), cancel.clone()).await;
    drop(tx);

    let session = Session::new(
        config.grid_size,
        config.session_secs,
        config.metric_policy,
        config.timing_source,
    );

    let raw = RawMode::enable().context("failed to enable raw mode")?;
    let mut stdout = std::io::stdout();
    let final_session = GameLoop::new(session)
        .run(rx, |game| {
            let frame = ui::render_frame(game);
            let _ = stdout.write_all(frame.as_bytes());
            let _ = stdout.flush();
        })
        .await;
    drop(raw);

    cancel.cancel();
    tracker.close();
    tracker.wait().await;

    info!(
        score = final_session.score,
        total_bits = final_session.total_bits,
        "session ended"
    );
    println!(
        "Final score: {}, total bits: {}",
        final_session.score, final_session.total_bits
    );
    Ok(())
}

/// Raw-mode guard: restored on every exit path, including panics.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

/// Dedicated thread for crossterm's blocking event read. Polls so the
/// cancellation token is observed within 100ms.
fn spawn_keyboard_reader(tx: EventSender, cancel: CancellationToken) {
    std::thread::spawn(move || loop {
        if cancel.is_cancelled() {
            break;
        }
        match crossterm::event::poll(Duration::from_millis(100)) {
            Ok(false) => continue,
            Ok(true) => {
                if let Ok(Event::Key(key)) = crossterm::event::read() {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if let Some(key) = map_key(key.code) {
                        if tx.blocking_send(GameEvent::Key(key)).is_err() {
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                warn!("keyboard read failed: {}", e);
                break;
            }
        }
    });
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}

/// Start the configured transcription feeder, if any. Misconfiguration
/// surfaces one `RecognitionUnavailable` and the game stays keyboard-only.
async fn spawn_voice_feeder(
    config: &Config,
    tracker: &TaskTracker,
    tx: EventSender,
    cancel: CancellationToken,
) {
    let stt = config.stt.clone();
    match stt.mode {
        SttMode::Off => {}
        SttMode::Http | SttMode::Stream => {
            let (endpoint, pcm_path) = match (stt.endpoint.clone(), stt.pcm_path.clone()) {
                (Some(endpoint), Some(pcm_path)) => (endpoint, pcm_path),
                _ => {
                    warn!("voice mode selected but stt.endpoint or stt.pcm_path missing");
                    let _ = tx
                        .send(GameEvent::SttError(GameError::RecognitionUnavailable(
                            "stt.endpoint and stt.pcm_path must both be set".into(),
                        )))
                        .await;
                    return;
                }
            };

            if stt.mode == SttMode::Http {
                let transcriber = HttpTranscriber::new(endpoint, config.stt_api_key());
                tracker.spawn(http_feeder(transcriber, stt, pcm_path, tx, cancel));
            } else {
                tracker.spawn(stream_feeder(endpoint, stt, pcm_path, tx, cancel));
            }
        }
    }
}

/// Read PCM16 chunks from the configured path, WAV-wrap each one, POST
/// it, and emit the resulting transcript or error.
async fn http_feeder(
    transcriber: HttpTranscriber,
    stt: SttConfig,
    pcm_path: String,
    tx: EventSender,
    cancel: CancellationToken,
) {
    use tokio::io::AsyncReadExt;

    let mut source = match tokio::fs::File::open(&pcm_path).await {
        Ok(file) => file,
        Err(e) => {
            let _ = tx
                .send(GameEvent::SttError(GameError::RecognitionUnavailable(
                    format!("cannot open {}: {}", pcm_path, e),
                )))
                .await;
            return;
        }
    };

    let chunk_bytes = wav::pcm16_bytes_for_ms(stt.chunk_ms, stt.sample_rate_hz, stt.channels);
    let mut chunk = vec![0u8; chunk_bytes];
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            result = source.read_exact(&mut chunk) => {
                if result.is_err() {
                    // Audio source exhausted or closed.
                    break;
                }
                let audio = wav::encode_pcm16(&chunk, stt.sample_rate_hz, stt.channels);
                let event = match transcriber.transcribe(&audio).await {
                    Ok(t) => GameEvent::Transcript { text: t.text, is_final: t.is_final },
                    Err(e) => GameEvent::SttError(e),
                };
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Pipe PCM16 chunks up the persistent streaming connection; its reader
/// task delivers partial and final transcripts directly.
async fn stream_feeder(
    endpoint: String,
    stt: SttConfig,
    pcm_path: String,
    tx: EventSender,
    cancel: CancellationToken,
) {
    use tokio::io::AsyncReadExt;

    let transcriber = match StreamingTranscriber::connect(&endpoint, tx.clone(), cancel.clone())
        .await
    {
        Ok(t) => t,
        Err(e) => {
            let _ = tx
                .send(GameEvent::SttError(GameError::RecognitionUnavailable(
                    e.to_string(),
                )))
                .await;
            return;
        }
    };

    let mut source = match tokio::fs::File::open(&pcm_path).await {
        Ok(file) => file,
        Err(e) => {
            let _ = tx
                .send(GameEvent::SttError(GameError::RecognitionUnavailable(
                    format!("cannot open {}: {}", pcm_path, e),
                )))
                .await;
            return;
        }
    };

    let chunk_bytes = wav::pcm16_bytes_for_ms(stt.chunk_ms, stt.sample_rate_hz, stt.channels);
    let mut chunk = vec![0u8; chunk_bytes];
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            result = source.read_exact(&mut chunk) => {
                if result.is_err() {
                    break;
                }
                if let Err(e) = transcriber.send_audio(&chunk).await {
                    let _ = tx
                        .send(GameEvent::SttError(GameError::TranscriptionRequestFailed(
                            e.to_string(),
                        )))
                        .await;
                    break;
                }
            }
        }
    }
}
