pub mod text;
pub mod url_validation;
pub use url_validation::{UrlValidationError, validate_audio_url};
