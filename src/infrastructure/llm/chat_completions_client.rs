use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, LlmClientError};
use crate::presentation::config::{LlmProvider, LlmSettings};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Generation over any OpenAI-compatible `/chat/completions` endpoint
/// (OpenAI, Gemini's compatibility layer, LM Studio).
pub struct ChatCompletionsClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: usize,
    temperature: f32,
    top_p: f32,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: usize,
    temperature: f32,
    top_p: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsClient {
    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmClientError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
        };

        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request_body);
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmClientError::InvalidResponse("empty choices".to_string()))
    }
}

/// Builds the client for the configured provider. Hosted providers require an API key;
/// LM Studio requires an explicit base URL.
pub fn create_chat_completions_client(
    settings: &LlmSettings,
) -> Result<ChatCompletionsClient, LlmClientError> {
    let api_key = settings.api_key.clone().filter(|k| !k.trim().is_empty());
    let configured_url = settings
        .base_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .map(|u| u.trim_end_matches('/').to_string());

    let base_url = match settings.provider {
        LlmProvider::OpenAi | LlmProvider::Gemini if api_key.is_none() => {
            return Err(LlmClientError::Misconfigured(format!(
                "api_key required for {} provider",
                settings.provider
            )));
        }
        LlmProvider::OpenAi => configured_url.unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
        LlmProvider::Gemini => configured_url.unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
        LlmProvider::LmStudio => configured_url.ok_or_else(|| {
            LlmClientError::Misconfigured("base_url required for lmstudio provider".to_string())
        })?,
    };

    Ok(ChatCompletionsClient {
        client: Client::new(),
        base_url,
        api_key,
        model: settings.chat_model.clone(),
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
        top_p: settings.top_p,
    })
}
