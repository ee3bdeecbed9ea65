//! HTTP request handlers
//!
//! - `api` - Health check endpoint
//! - `tts` - Text-to-speech (`POST /tts`)
//! - `stt` - Speech-to-text from an audio URL (`POST /stt`)

pub mod api;
pub mod stt;
pub mod tts;
