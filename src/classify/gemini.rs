//! Gemini `generateContent` classifier
//!
//! Sends the prompt for a page and reads back a single-character label.

use crate::classify::prompt::build_prompt;
use crate::classify::Topic;
use crate::config::{read_api_key, ClassifierConfig};
use crate::pipeline::{ClassifyError, Classifier};
use crate::state::Label;
use crate::SieveError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout for one classification request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error body kept in a `ClassifyError::Status`
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Classifier backed by the Gemini REST API
///
/// Built once at startup and shared by every worker task. The underlying
/// reqwest client pools connections and is safe for concurrent use.
pub struct GeminiClassifier {
    client: Client,
    endpoint: String,
    api_key: String,
    temperature: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiClassifier {
    /// Creates a classifier with an explicit API key
    ///
    /// # Arguments
    ///
    /// * `config` - Model, endpoint and sampling settings
    /// * `api_key` - The API key sent with every request
    pub fn new(config: &ClassifierConfig, api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.api_base_url.trim_end_matches('/'),
                config.model
            ),
            api_key: api_key.into(),
            temperature: config.temperature,
        })
    }

    /// Creates a classifier reading the API key from the configured variable
    ///
    /// A missing key is a startup configuration error.
    pub fn from_env(config: &ClassifierConfig) -> Result<Self, SieveError> {
        let api_key = read_api_key(&config.api_key_env)?;
        Ok(Self::new(config, api_key)?)
    }

    /// Returns the full generateContent URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one prompt and returns the concatenated reply text
    async fn generate(&self, prompt: &str) -> Result<String, ClassifyError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: 1,
                response_mime_type: "text/plain",
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClassifyError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifyError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ClassifyError::MalformedResponse(e.to_string()))?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .ok_or_else(|| ClassifyError::MalformedResponse("no candidates in response".to_string()))?;

        Ok(text)
    }
}

#[async_trait]
impl Classifier for GeminiClassifier {
    async fn classify(&self, text: &str, topic: &Topic) -> Result<Label, ClassifyError> {
        let prompt = build_prompt(topic, text);
        let reply = self.generate(&prompt).await?;
        parse_reply(&reply)
    }
}

/// Reads a label from the model's reply
///
/// Only the first non-whitespace character counts. Anything other than
/// `h`, `u` or `i` is an error rather than a guess.
pub fn parse_reply(reply: &str) -> Result<Label, ClassifyError> {
    let trimmed = reply.trim();
    trimmed
        .chars()
        .next()
        .and_then(Label::from_char)
        .ok_or_else(|| ClassifyError::UnexpectedReply(trimmed.chars().take(20).collect()))
}
