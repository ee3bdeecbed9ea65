//! Audio Test Fixtures
//!
//! Programmatically generated audio so tests have no file dependencies.
//! Raw PCM fixtures are 16-bit signed little-endian mono at 16kHz, the fallback
//! synthesis format.

use std::f32::consts::PI;
use std::io::Cursor;

/// Sample rate of the PCM fallback output (16kHz)
pub const SAMPLE_RATE: u32 = 16000;

/// 100ms at 16kHz
pub const MS_100: usize = 1600;

/// Generate a sine wave tone
pub fn generate_sine_wave(frequency: f32, duration_samples: usize, amplitude: f32) -> Vec<i16> {
    let max_amplitude = amplitude * i16::MAX as f32;
    (0..duration_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            (max_amplitude * (2.0 * PI * frequency * t).sin()) as i16
        })
        .collect()
}

/// Convert samples to little-endian bytes
pub fn samples_to_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// 440Hz tone as raw PCM bytes
pub fn pcm_tone_bytes(duration_samples: usize) -> Vec<u8> {
    samples_to_bytes(&generate_sine_wave(440.0, duration_samples, 0.5))
}

/// Bytes that sniff as MP3 (ID3v2 header followed by filler)
pub fn fake_mp3_bytes() -> Vec<u8> {
    let mut bytes = b"ID3\x04\x00\x00\x00\x00\x00\x00".to_vec();
    bytes.extend(std::iter::repeat_n(0x55u8, 128));
    bytes
}

/// Bytes that sniff as Ogg
pub fn fake_ogg_bytes() -> Vec<u8> {
    let mut bytes = b"OggS\x00\x02".to_vec();
    bytes.extend(std::iter::repeat_n(0x11u8, 64));
    bytes
}

/// Read a WAV file back into samples
pub fn read_wav(bytes: &[u8]) -> (hound::WavSpec, Vec<i16>) {
    let mut reader = hound::WavReader::new(Cursor::new(bytes)).expect("valid wav");
    let spec = reader.spec();
    let samples = reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .expect("readable samples");
    (spec, samples)
}
