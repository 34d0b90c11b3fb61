pub mod preprocess;
pub mod recognizer;
pub mod types;

pub use preprocess::{shrink_from_bytes, shrink_to_half, PreprocessError, ResizedImage};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, OcrSpaceClient};
pub use types::{OcrSpaceResponse, ParsedResult};
