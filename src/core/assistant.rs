//! Route Q&A against a hosted language model
//!
//! Prompts are built by pure functions from the optimized [`RouteView`]; the
//! model itself is reached through [`LanguageModel`]. [`GroqChat`] talks to
//! Groq's OpenAI-compatible chat completions endpoint.

use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};
use crate::core::provider::LanguageModel;
use crate::core::route_view::RouteView;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com";
pub const DEFAULT_LLM_MODEL: &str = "llama3-8b-8192";

const CHAT_COMPLETIONS_PATH: &str = "/openai/v1/chat/completions";

/// Canned questions offered next to the map
pub const SUGGESTED_QUESTIONS: [&str; 5] = [
    "What is the total distance of the optimized route?",
    "How long will it take to complete this route?",
    "Are there notable landmarks or attractions along this route?",
    "Are there traffic hotspots along this route?",
    "Can I customize this route by adding or removing stops?",
];

/// Question prompt about `route`
pub fn qa_prompt(route: &RouteView, question: &str) -> String {
    format!(
        "Route:\n{}\n\nQ: {}\nA:",
        route.ordered_addresses.join("\n"),
        question
    )
}

/// Free-form chat prompt, passed to the model as typed
pub fn chat_prompt(query: &str) -> String {
    query.to_string()
}

/// Reject blank questions before spending a model call on them
pub fn require_text(text: &str, what: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::ValidationError(format!("Please type a {what} first.")));
    }
    Ok(trimmed.to_string())
}

/// Ask `question` about the optimized route of a comparison
pub async fn ask_about_route<L: LanguageModel>(
    model: &L,
    route: &RouteView,
    question: &str,
) -> Result<String> {
    let question = require_text(question, "question")?;
    model.answer(&qa_prompt(route, &question)).await
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorPayload {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// [`LanguageModel`] backed by Groq chat completions
pub struct GroqChat {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GroqChat {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, model, DEFAULT_LLM_BASE_URL)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(format!("routewise/{}", env!("ROUTEWISE_VERSION")))
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl LanguageModel for GroqChat {
    async fn answer(&self, prompt: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH);
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        log::debug!("[LLM] {} prompt of {} chars", self.model, prompt.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                log::error!("Failed to send chat request to {}: {}", url, e);
                Error::from(e)
            })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            if let Ok(payload) = serde_json::from_str::<ApiErrorPayload>(&text) {
                return Err(Error::ProviderError(format!(
                    "HTTP {status}: {}",
                    payload.error.message
                )));
            }
            log::error!("Chat API returned {}. Body: {}", status, text);
            return Err(Error::ProviderError(format!("HTTP {status}: {text}")));
        }

        let body: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!("Failed to parse ChatResponse: {}. Body: {}", e, text);
            Error::ProviderError(format!("unreadable model response: {e}"))
        })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| Error::ProviderError("model returned no answer".to_string()))
    }
}
