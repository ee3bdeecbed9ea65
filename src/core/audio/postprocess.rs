use std::io::Cursor;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

use super::{AudioEncoding, SynthesizedAudio};

/// Bytes per sample for 16-bit PCM.
const BYTES_PER_SAMPLE: usize = 2;

/// Longest silence pad accepted, in milliseconds.
pub const MAX_SILENCE_PAD_MS: u32 = 10_000;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("PCM buffer of {len} bytes is not aligned to {frame} byte frames")]
    MisalignedPcm { len: usize, frame: usize },

    #[error("Silence pad of {0}ms exceeds the {MAX_SILENCE_PAD_MS}ms limit")]
    PadTooLong(u32),

    #[error("Invalid PCM layout: sample_rate={sample_rate}, channels={channels}")]
    InvalidLayout { sample_rate: u32, channels: u16 },

    #[error("WAV encoding failed: {0}")]
    Wav(#[from] hound::Error),
}

fn check_layout(pcm: &[u8], sample_rate: u32, channels: u16) -> Result<usize, AudioError> {
    if sample_rate == 0 || channels == 0 {
        return Err(AudioError::InvalidLayout {
            sample_rate,
            channels,
        });
    }
    let frame = BYTES_PER_SAMPLE * channels as usize;
    if pcm.len() % frame != 0 {
        return Err(AudioError::MisalignedPcm {
            len: pcm.len(),
            frame,
        });
    }
    Ok(frame)
}

/// Prepend `duration_ms` of zero-valued 16-bit samples to a PCM buffer.
///
/// The original bytes follow the pad verbatim. A zero duration returns the input
/// untouched.
pub fn prepend_silence(
    pcm: &Bytes,
    duration_ms: u32,
    sample_rate: u32,
    channels: u16,
) -> Result<Bytes, AudioError> {
    if duration_ms == 0 {
        return Ok(pcm.clone());
    }
    if duration_ms > MAX_SILENCE_PAD_MS {
        return Err(AudioError::PadTooLong(duration_ms));
    }
    let frame = check_layout(pcm, sample_rate, channels)?;

    let pad_frames = (duration_ms as u64 * sample_rate as u64 / 1000) as usize;
    let pad_len = pad_frames * frame;

    let mut out = Vec::with_capacity(pad_len + pcm.len());
    out.resize(pad_len, 0);
    out.extend_from_slice(pcm);
    Ok(Bytes::from(out))
}

/// Wrap 16-bit little-endian PCM in a RIFF/WAV container.
pub fn wrap_pcm_as_wav(pcm: &[u8], sample_rate: u32, channels: u16) -> Result<Bytes, AudioError> {
    check_layout(pcm, sample_rate, channels)?;

    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(pcm.len() + 64));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for sample in pcm.chunks_exact(BYTES_PER_SAMPLE) {
            writer.write_sample(i16::from_le_bytes([sample[0], sample[1]]))?;
        }
        writer.finalize()?;
    }
    Ok(Bytes::from(cursor.into_inner()))
}

/// Byte-level post-processing between synthesis and upload.
///
/// Raw PCM gets a leading silence pad so playback devices have time to wake up
/// before speech starts, then a WAV header so the stored object is playable.
/// Compressed encodings pass through untouched.
#[derive(Debug, Clone, Copy)]
pub struct AudioPostProcessor {
    silence_pad_ms: u32,
}

impl AudioPostProcessor {
    pub fn new(silence_pad_ms: u32) -> Self {
        Self { silence_pad_ms }
    }

    /// Pad PCM audio with `duration_ms` of silence.
    ///
    /// Never fails: on an internal error the input is logged and returned as is.
    pub fn postprocess(&self, audio: &Bytes, encoding: AudioEncoding, duration_ms: u32) -> Bytes {
        let AudioEncoding::Pcm { sample_rate } = encoding else {
            return audio.clone();
        };

        match prepend_silence(audio, duration_ms, sample_rate, 1) {
            Ok(padded) => padded,
            Err(e) => {
                warn!(error = %e, "Silence padding failed, keeping original audio");
                audio.clone()
            }
        }
    }

    /// Apply the configured pad and container wrapping to synthesized audio.
    pub fn process(&self, audio: SynthesizedAudio) -> SynthesizedAudio {
        let AudioEncoding::Pcm { sample_rate } = audio.encoding else {
            return audio;
        };

        let padded = self.postprocess(&audio.bytes, audio.encoding, self.silence_pad_ms);
        match wrap_pcm_as_wav(&padded, sample_rate, 1) {
            Ok(wav) => {
                debug!(
                    provider = audio.provider,
                    pcm_bytes = padded.len(),
                    wav_bytes = wav.len(),
                    "Wrapped PCM audio as WAV"
                );
                SynthesizedAudio {
                    bytes: wav,
                    encoding: AudioEncoding::Wav,
                    provider: audio.provider,
                }
            }
            Err(e) => {
                warn!(error = %e, "WAV wrapping failed, storing raw PCM");
                SynthesizedAudio {
                    bytes: padded,
                    ..audio
                }
            }
        }
    }
}
