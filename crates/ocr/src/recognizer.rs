use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::debug;

use crate::types::OcrSpaceResponse;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("OCR service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("OCR response lacks usable ParsedResults: {body}")]
    MissingResults { body: String },
    #[error("OCR service reported a processing failure: {message}")]
    Failed { message: String },
}

/// Abstraction over a text-recognition backend.
/// Implementations accept raw JPEG/PNG image bytes and return the
/// recognized text.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    async fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError>;
}

// Backends can be handed to a pipeline by reference.
#[async_trait]
impl<T: OcrBackend + ?Sized> OcrBackend for &T {
    async fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        (**self).recognize(image_bytes).await
    }
}

// ── OCR.space backend ─────────────────────────────────────────────────────────

pub struct OcrSpaceClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    language: String,
}

impl OcrSpaceClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            language: language.into(),
        }
    }
}

#[async_trait]
impl OcrBackend for OcrSpaceClient {
    async fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        let file = Part::bytes(image_bytes.to_vec())
            .file_name("receipt.jpg")
            .mime_str("image/jpeg")?;
        // Engine 2 handles receipts better than the default; table mode and
        // orientation detection keep column totals readable.
        let form = Form::new()
            .text("apikey", self.api_key.clone())
            .text("language", self.language.clone())
            .text("isTable", "true")
            .text("OCREngine", "2")
            .text("detectOrientation", "true")
            .part("file", file);

        debug!(bytes = image_bytes.len(), endpoint = %self.endpoint, "submitting image for OCR");
        let response = self.http.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != reqwest::StatusCode::OK {
            return Err(OcrError::Status { status: status.as_u16(), body });
        }
        parsed_text_from_body(&body)
    }
}

/// Pull `ParsedResults[0].ParsedText` out of a 200 body.
fn parsed_text_from_body(body: &str) -> Result<String, OcrError> {
    let Ok(parsed) = serde_json::from_str::<OcrSpaceResponse>(body) else {
        return Err(OcrError::MissingResults { body: body.to_string() });
    };
    if parsed.is_errored_on_processing {
        return Err(OcrError::Failed { message: parsed.error_text() });
    }
    match parsed.parsed_results.as_deref() {
        Some([first, ..]) => Ok(first.parsed_text.clone()),
        _ => Err(OcrError::MissingResults { body: body.to_string() }),
    }
}

// ── Mock backend (used for tests) ─────────────────────────────────────────────

/// Returns a pre-set string — lets the pipeline be exercised without a
/// network connection or an API key.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl OcrBackend for MockRecognizer {
    async fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }
}
