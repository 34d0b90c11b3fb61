use serde::Deserialize;

/// Response document of the OCR.space `parse/image` endpoint — the subset
/// this crate reads. Field names follow the service's PascalCase wire
/// format.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrSpaceResponse {
    #[serde(rename = "ParsedResults")]
    pub parsed_results: Option<Vec<ParsedResult>>,
    #[serde(rename = "OCRExitCode")]
    pub ocr_exit_code: Option<i64>,
    #[serde(rename = "IsErroredOnProcessing", default)]
    pub is_errored_on_processing: bool,
    /// A string or an array of strings, depending on the failure.
    #[serde(rename = "ErrorMessage")]
    pub error_message: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsedResult {
    #[serde(rename = "ParsedText", default)]
    pub parsed_text: String,
    #[serde(rename = "FileParseExitCode")]
    pub file_parse_exit_code: Option<i64>,
    #[serde(rename = "ErrorMessage")]
    pub error_message: Option<String>,
}

impl OcrSpaceResponse {
    /// Flatten the service's error message(s) into one diagnostic line.
    pub fn error_text(&self) -> String {
        match &self.error_message {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            Some(other) => other.to_string(),
            None => "unknown error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_success_body() {
        let body = r#"{
            "ParsedResults": [{
                "ParsedText": "MARKET X\r\n12.03.2024 14:20",
                "FileParseExitCode": 1,
                "ErrorMessage": ""
            }],
            "OCRExitCode": 1,
            "IsErroredOnProcessing": false,
            "ProcessingTimeInMilliseconds": "312"
        }"#;
        let r: OcrSpaceResponse = serde_json::from_str(body).unwrap();
        assert!(!r.is_errored_on_processing);
        let results = r.parsed_results.unwrap();
        assert!(results[0].parsed_text.starts_with("MARKET X"));
    }

    #[test]
    fn missing_parsed_results_deserializes_to_none() {
        let body = r#"{"OCRExitCode": 99, "IsErroredOnProcessing": true,
                       "ErrorMessage": ["Unable to recognize the file type"]}"#;
        let r: OcrSpaceResponse = serde_json::from_str(body).unwrap();
        assert!(r.parsed_results.is_none());
        assert!(r.is_errored_on_processing);
        assert_eq!(r.error_text(), "Unable to recognize the file type");
    }

    #[test]
    fn error_text_accepts_a_plain_string() {
        let body = r#"{"ErrorMessage": "API key missing"}"#;
        let r: OcrSpaceResponse = serde_json::from_str(body).unwrap();
        assert_eq!(r.error_text(), "API key missing");
    }
}
