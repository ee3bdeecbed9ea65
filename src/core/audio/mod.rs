//! Audio buffers flowing between synthesis and storage.

mod format;
mod postprocess;

use bytes::Bytes;

pub use format::{AudioEncoding, DEFAULT_SNIFFED_FORMAT, SniffedFormat, sniff_audio_format};
pub use postprocess::{
    AudioError, AudioPostProcessor, MAX_SILENCE_PAD_MS, prepend_silence, wrap_pcm_as_wav,
};

/// Audio returned by a synthesis provider.
///
/// Content type and extension are both derived from `encoding`, so they always agree.
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub bytes: Bytes,
    pub encoding: AudioEncoding,
    /// Name of the provider that produced the audio
    pub provider: &'static str,
}

impl SynthesizedAudio {
    pub fn new(bytes: Bytes, encoding: AudioEncoding, provider: &'static str) -> Self {
        Self {
            bytes,
            encoding,
            provider,
        }
    }

    #[inline]
    pub fn content_type(&self) -> &'static str {
        self.encoding.mime_type()
    }

    #[inline]
    pub fn extension(&self) -> &'static str {
        self.encoding.extension()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
