//! OpenAI Speech-to-Text (Whisper) API integration.
//!
//! OpenAI transcription is a REST batch API: the whole file is uploaded in one
//! multipart request and the transcript comes back in the response body.
//!
//! - [`config`]: `OpenAISTTConfig`, `OpenAISTTModel`
//! - [`messages`]: response and error bodies
//! - [`client`]: the `OpenAISTT` client
//!
//! # API Reference
//!
//! - API Endpoint: `POST https://api.openai.com/v1/audio/transcriptions`
//! - Max file size: 25MB
//! - Supported formats: mp3, mp4, mpeg, mpga, m4a, ogg, wav, webm, flac
//! - Documentation: <https://platform.openai.com/docs/api-reference/audio/createTranscription>

mod client;
mod config;
mod messages;

pub use client::OpenAISTT;
pub use config::{OpenAISTTConfig, OpenAISTTModel};
pub use messages::{OpenAIError, OpenAIErrorResponse, TranscriptionResponse};
