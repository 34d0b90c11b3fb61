use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model response contained no text: {body}")]
    Empty { body: String },
}

/// Abstraction over a prompt-completion backend.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String, SummarizeError>;
}

// Backends can be handed to a pipeline by reference.
#[async_trait]
impl<T: Summarizer + ?Sized> Summarizer for &T {
    async fn summarize(&self, prompt: &str) -> Result<String, SummarizeError> {
        (**self).summarize(prompt).await
    }
}

// ── Generative Language API backend ──────────────────────────────────────────

pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, prompt: &str) -> Result<String, SummarizeError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        debug!(model = %self.model, "requesting receipt summary");
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(SummarizeError::Status { status: status.as_u16(), body: text });
        }
        first_candidate_text(&text)
    }
}

// The subset of the generateContent response this crate reads.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: Option<String>,
}

/// Concatenate the text parts of the first candidate.
fn first_candidate_text(body: &str) -> Result<String, SummarizeError> {
    let Ok(parsed) = serde_json::from_str::<GenerateResponse>(body) else {
        return Err(SummarizeError::Empty { body: body.to_string() });
    };
    let Some(candidate) = parsed.candidates.first() else {
        return Err(SummarizeError::Empty { body: body.to_string() });
    };

    let mut full = String::new();
    for part in &candidate.content.parts {
        if let Some(text) = &part.text {
            full.push_str(text);
        }
    }
    if full.is_empty() {
        return Err(SummarizeError::Empty { body: body.to_string() });
    }
    Ok(full)
}

// ── Mock backend (used for tests) ─────────────────────────────────────────────

/// Returns a pre-set reply and records every prompt it is given, so tests
/// can assert both on invocation count and on prompt content.
pub struct MockSummarizer {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl MockSummarizer {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), prompts: Mutex::new(Vec::new()) }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, SummarizeError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}
