//! OpenAI-compatible implementation of the text-extraction capability.
//!
//! Calls a chat-completions endpoint with a fixed extraction instruction and
//! parses the reply as draft-field JSON. The HTTP client carries a bounded
//! timeout so intake never blocks its transaction indefinitely; every
//! failure maps to an [`ExtractorError`] the intake stage recovers from.

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::config::ExtractorConfig;
use crate::ports::{ExtractedFields, ExtractorError, TextExtractor};

const EXTRACTION_INSTRUCTION: &str =
    "Extract a structured ticket draft with fields: problem, environment, reproduction, \
     impact, userIntent, confidence, evidence. Output JSON only. Raw input: ";

/// Text extractor backed by an OpenAI-compatible chat-completions API.
pub struct OpenAiExtractor {
    client: reqwest::Client,
    endpoint: String,
    api_key: Secret<String>,
    model: String,
    temperature: f32,
}

impl OpenAiExtractor {
    /// Builds the extractor when an API key is configured, `None` otherwise.
    pub fn from_config(config: &ExtractorConfig) -> Option<Self> {
        let api_key = config.api_key.clone().filter(|k| !k.is_empty())?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .ok()?;

        Some(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: Secret::new(api_key),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

fn parse_content(content: &str) -> Result<ExtractedFields, ExtractorError> {
    serde_json::from_str(content.trim())
        .map_err(|e| ExtractorError::MalformedOutput(e.to_string()))
}

#[async_trait]
impl TextExtractor for OpenAiExtractor {
    async fn extract(&self, raw_text: &str) -> Result<ExtractedFields, ExtractorError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: format!("{}{}", EXTRACTION_INSTRUCTION, raw_text),
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractorError::Timeout
                } else {
                    ExtractorError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractorError::Request(format!(
                "Extraction endpoint returned {}",
                status
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ExtractorError::MalformedOutput(e.to_string()))?;

        let content = body
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| ExtractorError::MalformedOutput("No choices in reply".to_string()))?;

        parse_content(content)
    }
}
