//! Audio encodings produced by synthesis providers, and magic-byte sniffing for
//! audio downloaded from arbitrary URLs.

/// Encoding of a synthesized audio buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEncoding {
    Mp3,
    /// Opus in an Ogg container
    Opus,
    Aac,
    Flac,
    Wav,
    /// Raw 16-bit little-endian mono PCM
    Pcm { sample_rate: u32 },
}

impl AudioEncoding {
    /// MIME type reported to storage and to the caller.
    #[inline]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Opus => "audio/ogg",
            Self::Aac => "audio/aac",
            Self::Flac => "audio/flac",
            Self::Wav => "audio/wav",
            Self::Pcm { .. } => "audio/pcm",
        }
    }

    /// File extension used in object keys.
    #[inline]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Opus => "ogg",
            Self::Aac => "aac",
            Self::Flac => "flac",
            Self::Wav => "wav",
            Self::Pcm { .. } => "pcm",
        }
    }
}

impl std::fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pcm { sample_rate } => write!(f, "pcm_{sample_rate}"),
            other => f.write_str(other.extension()),
        }
    }
}

/// Container format detected from leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SniffedFormat {
    pub mime_type: &'static str,
    pub extension: &'static str,
}

/// Used when no signature matches. Voice notes from messaging apps are Ogg/Opus.
pub const DEFAULT_SNIFFED_FORMAT: SniffedFormat = SniffedFormat {
    mime_type: "audio/ogg",
    extension: "ogg",
};

const fn sniffed(mime_type: &'static str, extension: &'static str) -> SniffedFormat {
    SniffedFormat {
        mime_type,
        extension,
    }
}

/// Detect the audio container from its magic bytes.
///
/// Returns `None` when the buffer is too short or carries no known signature.
pub fn sniff_audio_format(data: &[u8]) -> Option<SniffedFormat> {
    if data.len() < 4 {
        return None;
    }

    if data.starts_with(b"ID3") || (data[0] == 0xFF && (data[1] & 0xE0) == 0xE0) {
        return Some(sniffed("audio/mpeg", "mp3"));
    }
    if data.starts_with(b"OggS") {
        return Some(sniffed("audio/ogg", "ogg"));
    }
    if data.starts_with(b"fLaC") {
        return Some(sniffed("audio/flac", "flac"));
    }
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WAVE" {
        return Some(sniffed("audio/wav", "wav"));
    }
    if data.len() >= 8 && &data[4..8] == b"ftyp" {
        return Some(sniffed("audio/mp4", "m4a"));
    }
    if data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some(sniffed("audio/webm", "webm"));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_mime_matches_extension() {
        assert_eq!(AudioEncoding::Mp3.mime_type(), "audio/mpeg");
        assert_eq!(AudioEncoding::Mp3.extension(), "mp3");
        assert_eq!(AudioEncoding::Wav.mime_type(), "audio/wav");
        assert_eq!(AudioEncoding::Opus.extension(), "ogg");
        let pcm = AudioEncoding::Pcm { sample_rate: 16000 };
        assert_eq!(pcm.to_string(), "pcm_16000");
        assert_eq!(pcm.mime_type(), "audio/pcm");
    }

    #[test]
    fn test_sniff_mp3() {
        assert_eq!(sniff_audio_format(b"ID3\x04\x00\x00").unwrap().extension, "mp3");
        assert_eq!(
            sniff_audio_format(&[0xFF, 0xFB, 0x90, 0x00]).unwrap().mime_type,
            "audio/mpeg"
        );
    }

    #[test]
    fn test_sniff_containers() {
        assert_eq!(sniff_audio_format(b"OggS\x00\x02").unwrap().extension, "ogg");
        assert_eq!(sniff_audio_format(b"fLaC\x00\x00").unwrap().extension, "flac");
        assert_eq!(
            sniff_audio_format(b"RIFF\x24\x00\x00\x00WAVEfmt ").unwrap().extension,
            "wav"
        );
        assert_eq!(
            sniff_audio_format(b"\x00\x00\x00\x20ftypM4A ").unwrap().extension,
            "m4a"
        );
    }

    #[test]
    fn test_sniff_unknown() {
        assert_eq!(sniff_audio_format(b"hello world"), None);
        assert_eq!(sniff_audio_format(b"ab"), None);
        assert_eq!(DEFAULT_SNIFFED_FORMAT.extension, "ogg");
    }
}
