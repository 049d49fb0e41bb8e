//! Streaming transcription over a persistent connection
//!
//! Wire format: a 4-byte big-endian length prefix followed by the
//! payload. Client frames carry raw audio bytes; server frames carry
//! JSON `Transcript` events with an `is_final` flag. A reader task
//! forwards transcript events into the game channel until the connection
//! closes or the cancellation token fires.

use std::io;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::Transcript;
use crate::errors::GameError;
use crate::events::{EventSender, GameEvent};

/// Maximum allowed frame size (1 MB). Protects against unbounded
/// allocation from malformed length prefixes; audio chunks and
/// transcript JSON are far smaller.
pub const MAX_FRAME_SIZE: u32 = 1024 * 1024;

/// Write a length-delimited frame: 4-byte big-endian length, then payload.
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> io::Result<()> {
    let len = payload.len();
    if len > MAX_FRAME_SIZE as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("frame too large: {len} bytes (max {MAX_FRAME_SIZE})"),
        ));
    }
    writer.write_all(&(len as u32).to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await
}

/// Read a length-delimited frame. Returns `UnexpectedEof` on clean close
/// and `InvalidData` when the length exceeds `MAX_FRAME_SIZE`.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_FRAME_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame too large: {len} bytes (max {MAX_FRAME_SIZE})"),
        ));
    }
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf).await?;
    Ok(buf)
}

/// Write half of a live transcription connection. The read half lives in
/// a spawned task that pumps transcript events into the game channel.
pub struct StreamingTranscriber {
    writer: Mutex<OwnedWriteHalf>,
}

impl StreamingTranscriber {
    /// Connect to `addr` and spawn the reader task. Transcript and error
    /// events land on `tx`; the task stops when `cancel` fires, the
    /// server closes the connection, or the channel closes.
    pub async fn connect(addr: &str, tx: EventSender, cancel: CancellationToken) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("failed to connect to transcription stream at {addr}"))?;
        info!(%addr, "transcription stream connected");

        let (read_half, write_half) = stream.into_split();
        tokio::spawn(reader_task(read_half, tx, cancel));

        Ok(Self {
            writer: Mutex::new(write_half),
        })
    }

    /// Send one chunk of raw audio upstream.
    pub async fn send_audio(&self, chunk: &[u8]) -> io::Result<()> {
        let mut writer = self.writer.lock().await;
        write_frame(&mut *writer, chunk).await
    }
}

async fn reader_task(mut reader: OwnedReadHalf, tx: EventSender, cancel: CancellationToken) {
    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => break,
            result = read_frame(&mut reader) => match result {
                Ok(frame) => frame,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    debug!("transcription stream closed");
                    break;
                }
                Err(e) => {
                    let _ = tx
                        .send(GameEvent::SttError(GameError::TranscriptionRequestFailed(
                            e.to_string(),
                        )))
                        .await;
                    break;
                }
            },
        };

        match serde_json::from_slice::<Transcript>(&frame) {
            Ok(transcript) => {
                debug!(text = %transcript.text, is_final = transcript.is_final, "stream transcript");
                let event = GameEvent::Transcript {
                    text: transcript.text,
                    is_final: transcript.is_final,
                };
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = tx
                    .send(GameEvent::SttError(GameError::TranscriptionRequestFailed(
                        format!("bad transcript frame: {}", e),
                    )))
                    .await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_frame_roundtrip() {
        let mut buf = Vec::new();
        write_frame(&mut buf, b"hello, relay!").await.unwrap();

        let mut cursor = Cursor::new(buf);
        let recovered = read_frame(&mut cursor).await.unwrap();
        assert_eq!(recovered, b"hello, relay!");
    }

    #[tokio::test]
    async fn test_empty_frame_roundtrip() {
        let mut buf = Vec::new();
        write_frame(&mut buf, b"").await.unwrap();

        let mut cursor = Cursor::new(buf);
        assert!(read_frame(&mut cursor).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_oversized_length_prefix() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(MAX_FRAME_SIZE + 1).to_be_bytes());
        let mut cursor = Cursor::new(buf);
        let err = read_frame(&mut cursor).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_rejects_oversized_write() {
        let big = vec![0u8; MAX_FRAME_SIZE as usize + 1];
        let mut buf = Vec::new();
        let err = write_frame(&mut buf, &big).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_truncated_frame_is_eof() {
        let mut buf = Vec::new();
        write_frame(&mut buf, b"full frame").await.unwrap();
        buf.truncate(buf.len() - 3);

        let mut cursor = Cursor::new(buf);
        let err = read_frame(&mut cursor).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
