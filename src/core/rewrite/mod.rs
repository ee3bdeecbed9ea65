//! Text rewriting for spoken delivery.
//!
//! [`TextNormalizer`] asks an OpenAI chat model to rephrase text so it reads well
//! through a TTS voice. The step is cosmetic and fails open: any error leaves the
//! original text in place.

mod prompt;

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::utils::text::{ERROR_BODY_LOG_LIMIT, truncate_for_log};

pub use prompt::{SYSTEM_PROMPT, build_user_prompt};

/// Sampling temperature for rewrites
pub const REWRITE_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("rewrite request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("rewrite service returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("rewrite response had no choices")]
    NoChoices,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Connection settings for the rewriting model.
#[derive(Debug, Clone)]
pub struct RewriteSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Drop for RewriteSettings {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.api_key.zeroize();
    }
}

pub struct TextNormalizer {
    client: Client,
    settings: Option<RewriteSettings>,
}

impl TextNormalizer {
    /// `None` settings produce a passthrough normalizer.
    pub fn new(client: Client, settings: Option<RewriteSettings>) -> Self {
        Self { client, settings }
    }

    pub fn passthrough() -> Self {
        Self::new(Client::new(), None)
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.is_some()
    }

    /// Rewrite `text` for speech, or return it unchanged on any failure.
    pub async fn normalize(&self, text: &str) -> String {
        let Some(settings) = &self.settings else {
            return text.to_string();
        };

        match self.try_rewrite(settings, text).await {
            Ok(rewritten) if !rewritten.is_empty() => {
                debug!(original = %text, rewritten = %rewritten, "Text rewritten for speech");
                rewritten
            }
            Ok(_) => {
                debug!("Rewrite returned empty text, keeping original");
                text.to_string()
            }
            Err(e) => {
                warn!(error = %e, "Text rewrite failed, keeping original");
                text.to_string()
            }
        }
    }

    async fn try_rewrite(
        &self,
        settings: &RewriteSettings,
        text: &str,
    ) -> Result<String, RewriteError> {
        let user_prompt = build_user_prompt(text);
        let request = ChatRequest {
            model: &settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: REWRITE_TEMPERATURE,
        };

        let url = format!(
            "{}/chat/completions",
            settings.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&settings.api_key)
            .timeout(settings.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RewriteError::Upstream {
                status: status.as_u16(),
                body: truncate_for_log(&body, ERROR_BODY_LOG_LIMIT).into_owned(),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let choice = parsed.choices.into_iter().next().ok_or(RewriteError::NoChoices)?;
        Ok(choice
            .message
            .content
            .map(|c| c.trim().to_string())
            .unwrap_or_default())
    }
}
