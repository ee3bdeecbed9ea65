pub mod audio;
pub mod pipeline;
pub mod rewrite;
pub mod storage;
pub mod stt;
pub mod tts;

pub use audio::{AudioEncoding, AudioPostProcessor, SynthesizedAudio};
pub use pipeline::{SpeechError, SpeechOutput, SpeechPipeline};
pub use rewrite::TextNormalizer;
pub use storage::{AudioStore, StorageError, StoredAudioRef};
pub use stt::{STTError, STTResult, Transcriber};
pub use tts::{TTSError, TTSResult, VoiceSynthesizer};
