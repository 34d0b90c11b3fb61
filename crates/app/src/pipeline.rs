use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use makbuz_core::{ReceiptSummary, SummaryError};
use makbuz_ocr::preprocess::{self, PreprocessError};
use makbuz_ocr::{OcrBackend, OcrError};
use makbuz_summarize::{build_receipt_prompt, SummarizeError, Summarizer};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error(transparent)]
    Ocr(#[from] OcrError),
    #[error(transparent)]
    Summarize(#[from] SummarizeError),
    #[error("Model response failed validation: {source}")]
    Summary {
        /// The model's answer, kept so it can still be shown verbatim.
        raw: String,
        source: SummaryError,
    },
}

/// The result of a single receipt scan.
#[derive(Debug)]
pub struct ScanReport {
    pub resized_width: u32,
    pub resized_height: u32,
    /// Raw OCR text as recognized by the backend.
    pub ocr_text: String,
    /// The model's answer, verbatim.
    pub raw_summary: String,
    /// The validated, amount-normalized form of the answer.
    pub summary: ReceiptSummary,
}

/// Orchestrates: preprocess → OCR → prompt → summarize → validate.
///
/// Single attempt, strictly sequential — the summarization call depends on
/// the OCR text, and no step is retried.
pub struct ScanPipeline<R: OcrBackend, S: Summarizer> {
    recognizer: R,
    summarizer: S,
    resized_path: PathBuf,
}

impl<R: OcrBackend, S: Summarizer> ScanPipeline<R, S> {
    pub fn new(recognizer: R, summarizer: S, resized_path: PathBuf) -> Self {
        Self { recognizer, summarizer, resized_path }
    }

    pub async fn run(&self, image_path: &Path) -> Result<ScanReport, ScanError> {
        let resized = preprocess::shrink_to_half(image_path, &self.resized_path)?;
        info!(width = resized.width, height = resized.height, "resized receipt image");

        let ocr_text = self.recognizer.recognize(&resized.bytes).await?;
        info!(chars = ocr_text.len(), "recognized receipt text");
        debug!(text = %ocr_text, "full OCR text");

        let prompt = build_receipt_prompt(&ocr_text);
        let raw_summary = self.summarizer.summarize(&prompt).await?;

        let summary = ReceiptSummary::from_model_text(&raw_summary)
            .map_err(|source| ScanError::Summary { raw: raw_summary.clone(), source })?;

        Ok(ScanReport {
            resized_width: resized.width,
            resized_height: resized.height,
            ocr_text,
            raw_summary,
            summary,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{ImageBuffer, Rgb, RgbImage};
    use makbuz_ocr::MockRecognizer;
    use makbuz_summarize::MockSummarizer;

    const OCR_FIXTURE: &str = "MARKET X\n12.03.2024 14:20\nTOTAL 45,90";

    const MODEL_REPLY: &str = r#"```json
{
  "market": "MARKET X",
  "date": "12.03.2024",
  "time": "14:20",
  "city": "Ankara",
  "total": "45,90",
  "items": [{"name": "PEYNIR", "price": "45.90"}]
}
```"#;

    /// Write a receipt-sized test image and return (input, resized) paths.
    fn receipt_fixture(dir: &tempfile::TempDir, width: u32, height: u32) -> (PathBuf, PathBuf) {
        let input = dir.path().join("receipt.png");
        let img: RgbImage = ImageBuffer::from_fn(width, height, |_, _| Rgb([240, 240, 235]));
        img.save(&input).unwrap();
        (input, dir.path().join("resized_image.jpg"))
    }

    enum FailWith {
        Status,
        Missing,
    }

    struct FailingRecognizer(FailWith);

    #[async_trait]
    impl OcrBackend for FailingRecognizer {
        async fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
            Err(match self.0 {
                FailWith::Status => OcrError::Status { status: 403, body: "forbidden".into() },
                FailWith::Missing => OcrError::MissingResults { body: "{}".into() },
            })
        }
    }

    #[tokio::test]
    async fn end_to_end_scan_with_mock_backends() {
        let dir = tempfile::tempdir().unwrap();
        let (input, resized_path) = receipt_fixture(&dir, 800, 600);

        let recognizer = MockRecognizer::new(OCR_FIXTURE);
        let summarizer = MockSummarizer::new(MODEL_REPLY);
        let pipeline = ScanPipeline::new(&recognizer, &summarizer, resized_path.clone());

        let report = pipeline.run(&input).await.unwrap();

        // Dimensions halve by integer division.
        assert_eq!((report.resized_width, report.resized_height), (400, 300));
        let on_disk = image::open(&resized_path).unwrap();
        assert_eq!((on_disk.width(), on_disk.height()), (400, 300));

        // The prompt embeds the recognized text verbatim.
        let prompts = summarizer.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(OCR_FIXTURE));

        // The model's answer is preserved verbatim alongside the parsed form.
        assert_eq!(report.raw_summary, MODEL_REPLY);
        assert_eq!(report.summary.market, "MARKET X");
        assert_eq!(report.summary.total, "45.90 TL");
        assert_eq!(report.ocr_text, OCR_FIXTURE);
    }

    #[tokio::test]
    async fn ocr_status_failure_skips_summarization() {
        let dir = tempfile::tempdir().unwrap();
        let (input, resized_path) = receipt_fixture(&dir, 100, 100);

        let summarizer = MockSummarizer::new(MODEL_REPLY);
        let pipeline =
            ScanPipeline::new(FailingRecognizer(FailWith::Status), &summarizer, resized_path);

        let err = pipeline.run(&input).await.unwrap_err();
        assert!(matches!(err, ScanError::Ocr(OcrError::Status { status: 403, .. })));
        assert_eq!(summarizer.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_parsed_results_skips_summarization() {
        let dir = tempfile::tempdir().unwrap();
        let (input, resized_path) = receipt_fixture(&dir, 100, 100);

        let summarizer = MockSummarizer::new(MODEL_REPLY);
        let pipeline =
            ScanPipeline::new(FailingRecognizer(FailWith::Missing), &summarizer, resized_path);

        let err = pipeline.run(&input).await.unwrap_err();
        assert!(matches!(err, ScanError::Ocr(OcrError::MissingResults { .. })));
        assert_eq!(summarizer.call_count(), 0);
    }

    #[tokio::test]
    async fn invalid_model_answer_keeps_the_raw_text() {
        let dir = tempfile::tempdir().unwrap();
        let (input, resized_path) = receipt_fixture(&dir, 100, 100);

        let recognizer = MockRecognizer::new(OCR_FIXTURE);
        let summarizer = MockSummarizer::new("Sorry, I cannot read this receipt.");
        let pipeline = ScanPipeline::new(&recognizer, &summarizer, resized_path);

        match pipeline.run(&input).await.unwrap_err() {
            ScanError::Summary { raw, source } => {
                assert_eq!(raw, "Sorry, I cannot read this receipt.");
                assert!(matches!(source, SummaryError::NoJson));
            }
            other => panic!("expected Summary error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreadable_image_fails_before_any_backend_call() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.jpg");

        let summarizer = MockSummarizer::new(MODEL_REPLY);
        let recognizer = MockRecognizer::new(OCR_FIXTURE);
        let pipeline =
            ScanPipeline::new(&recognizer, &summarizer, dir.path().join("resized.jpg"));

        let err = pipeline.run(&input).await.unwrap_err();
        assert!(matches!(err, ScanError::Preprocess(PreprocessError::Load(_))));
        assert_eq!(summarizer.call_count(), 0);
    }
}
