//! Gemini generative-language backend implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use notarium_core::{defaults, Error, KeyCheck, NoteContext, QueryBackend, Result};

/// Default generative-language endpoint.
pub const DEFAULT_BASE_URL: &str = defaults::GEMINI_BASE_URL;

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = defaults::GEN_MODEL;

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = defaults::GEN_TIMEOUT_SECS;

/// Gemini query backend.
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    /// Create a backend with default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_GEN_MODEL.to_string(),
            api_key.into(),
        )
    }

    /// Create a backend with custom configuration.
    pub fn with_config(base_url: String, model: String, api_key: String) -> Self {
        let timeout = std::env::var("NOTARIUM_GEN_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(GEN_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .expect("Failed to create HTTP client");

        info!(
            "Initializing Gemini backend: url={}, model={}",
            base_url, model
        );

        Self {
            client,
            base_url,
            model,
            api_key,
        }
    }

    /// Create from environment variables.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `GEMINI_API_KEY` | — (required) | API key |
    /// | `NOTARIUM_GEMINI_BASE` | production endpoint | Base URL |
    /// | `NOTARIUM_GEN_MODEL` | `gemini-2.5-flash` | Generation model |
    /// | `NOTARIUM_GEN_TIMEOUT_SECS` | `60` | Request timeout |
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| Error::Config("GEMINI_API_KEY not set".into()))?;
        let base_url = std::env::var("NOTARIUM_GEMINI_BASE")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("NOTARIUM_GEN_MODEL").unwrap_or_else(|_| DEFAULT_GEN_MODEL.to_string());
        Ok(Self::with_config(base_url, model, api_key))
    }

    fn generate_url(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateRequest {
    fn prompt(text: impl Into<String>, config: Option<GenerationConfig>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: text.into() }],
            }],
            generation_config: config,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: defaults::GEN_MAX_OUTPUT_TOKENS,
            temperature: defaults::GEN_TEMPERATURE,
            top_p: defaults::GEN_TOP_P,
            top_k: defaults::GEN_TOP_K,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorEnvelope {
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiError {
    message: Option<String>,
}

async fn api_error_message(response: reqwest::Response, fallback: &str) -> String {
    let envelope: ApiErrorEnvelope = response.json().await.unwrap_or_default();
    envelope
        .error
        .and_then(|e| e.message)
        .unwrap_or_else(|| fallback.to_string())
}

// ---------------------------------------------------------------------------
// Prompt assembly
// ---------------------------------------------------------------------------

/// Answer only from the provided notes; this exact sentence is the refusal
/// the UI matches on.
const REFUSAL_LINE: &str = "I cannot find this information in the provided notes.";

fn truncate_content(content: &str) -> String {
    let max = defaults::NOTE_CONTEXT_MAX_CHARS;
    if content.chars().count() <= max {
        content.to_string()
    } else {
        let mut truncated: String = content.chars().take(max).collect();
        truncated.push_str("...");
        truncated
    }
}

/// Assemble the notes-grounded prompt sent to the model.
pub fn build_prompt(question: &str, notes: &[NoteContext]) -> String {
    let context = notes
        .iter()
        .map(|note| format!("Note: {}\nContent: {}", note.title, truncate_content(&note.content)))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are a helpful assistant that answers questions using only the provided notes.\n\n\
         Context Notes:\n{context}\n\n\
         Question: {question}\n\n\
         If the answer is not contained in the notes, respond with:\n\"{REFUSAL_LINE}\""
    )
}

// ---------------------------------------------------------------------------
// QueryBackend implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl QueryBackend for GeminiBackend {
    async fn test_key(&self) -> Result<KeyCheck> {
        let body = GenerateRequest::prompt("Hello", None);
        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(KeyCheck::valid())
        } else {
            let message = api_error_message(response, "Invalid API key").await;
            warn!(
                subsystem = "inference",
                component = "gemini",
                op = "test_key",
                message = %message,
                "key rejected"
            );
            Ok(KeyCheck::invalid(message))
        }
    }

    async fn query_with_notes(&self, question: &str, notes: &[NoteContext]) -> Result<String> {
        let start = Instant::now();
        let prompt = build_prompt(question, notes);
        debug!(
            subsystem = "inference",
            component = "gemini",
            op = "query",
            model = %self.model,
            prompt_len = prompt.len(),
            context_notes = notes.len(),
        );

        let body = GenerateRequest::prompt(prompt, Some(GenerationConfig::default()));
        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let fallback = format!("API request failed: {}", response.status());
            return Err(Error::Inference(api_error_message(response, &fallback).await));
        }

        let data: GenerateResponse = response.json().await?;
        let answer = data
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| Error::Inference("No response received from model".into()))?;

        info!(
            subsystem = "inference",
            component = "gemini",
            op = "query",
            duration_ms = start.elapsed().as_millis() as u64,
            response_len = answer.len(),
        );
        Ok(answer)
    }
}
