use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::settings::AiSettings;

/// External text-generation service: prompt in, free-form text out.
///
/// The answer is expected, not guaranteed, to be JSON.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AppError>;
}

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiCompatibleGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiCompatibleGenerator {
    pub fn new(settings: &AiSettings) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        if !settings.api_key.is_empty() {
            let mut auth = HeaderValue::from_str(&format!("Bearer {}", settings.api_key))
                .map_err(|e| AppError::Internal(format!("Invalid AI api key: {e}")))?;
            auth.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, auth);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

fn completion_text(completion: ChatCompletion) -> Result<String, AppError> {
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Upstream("no choices in response".into()))?;

    if let Some(refusal) = choice.message.refusal {
        return Err(AppError::Upstream(format!("model refused: {refusal}")));
    }

    choice
        .message
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::Upstream("empty completion".into()))
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("status {status}: {body}")));
        }

        let completion = response
            .json::<ChatCompletion>()
            .await
            .map_err(|e| AppError::Upstream(format!("unreadable response: {e}")))?;

        completion_text(completion)
    }
}
