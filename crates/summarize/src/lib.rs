pub mod gemini;
pub mod prompt;

pub use gemini::{GeminiClient, MockSummarizer, SummarizeError, Summarizer};
pub use prompt::build_receipt_prompt;
