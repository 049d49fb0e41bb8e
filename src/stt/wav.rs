//! Minimal WAV container encoding
//!
//! The HTTP relay expects `audio/wav` bodies; this wraps raw
//! little-endian PCM16 samples in the standard 44-byte RIFF/WAVE header.

/// Wrap raw PCM16 samples in a RIFF/WAVE header.
pub fn encode_pcm16(pcm: &[u8], sample_rate_hz: u32, channels: u16) -> Vec<u8> {
    let bytes_per_sample: u16 = 2;
    let block_align = channels * bytes_per_sample;
    let byte_rate = sample_rate_hz * block_align as u32;
    let data_len = pcm.len() as u32;

    let mut out = Vec::with_capacity(44 + pcm.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes()); // fmt chunk size
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM, uncompressed
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate_hz.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(pcm);
    out
}

/// Bytes of raw PCM16 covering `ms` milliseconds of audio.
pub fn pcm16_bytes_for_ms(ms: u32, sample_rate_hz: u32, channels: u16) -> usize {
    (sample_rate_hz as u64 * channels as u64 * 2 * ms as u64 / 1000) as usize
}
