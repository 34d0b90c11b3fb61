use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::amount::normalize_amount;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("model response contained no JSON object")]
    NoJson,
    #[error("model response does not match the receipt schema: {0}")]
    SchemaMismatch(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub price: String,
}

/// The six-field summary the model is asked to produce, plus the optional
/// receipt-holder name when the receipt carries one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptSummary {
    pub market: String,
    pub date: String,
    pub time: String,
    pub city: String,
    pub total: String,
    pub items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,
}

impl ReceiptSummary {
    /// Parse and validate a model answer.
    ///
    /// Models routinely wrap their JSON in a Markdown code fence or lead
    /// with prose; everything outside the outermost `{...}` is discarded
    /// before parsing. `total` and each item price must contain a
    /// recognizable amount and are normalized with [`normalize_amount`].
    pub fn from_model_text(raw: &str) -> Result<Self, SummaryError> {
        let json = extract_json(raw).ok_or(SummaryError::NoJson)?;
        let mut summary: ReceiptSummary = serde_json::from_str(json)
            .map_err(|e| SummaryError::SchemaMismatch(e.to_string()))?;

        summary.total = normalize_amount(&summary.total).ok_or_else(|| {
            SummaryError::SchemaMismatch(format!("total is not an amount: {:?}", summary.total))
        })?;
        for item in &mut summary.items {
            item.price = normalize_amount(&item.price).ok_or_else(|| {
                SummaryError::SchemaMismatch(format!(
                    "price of {:?} is not an amount: {:?}",
                    item.name, item.price
                ))
            })?;
        }
        Ok(summary)
    }
}

/// The span from the first `{` to the last `}` — tolerant of fences and
/// surrounding prose without a full Markdown parse.
fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end >= start).then(|| &raw[start..=end])
}
