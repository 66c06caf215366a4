use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

const EXPENSE_TYPE_KEYS: &[&str] = &["Expense Type", "expenseType", "expense_type"];
const DESCRIPTION_KEYS: &[&str] = &["Description", "description"];
const TOTAL_AMOUNT_KEYS: &[&str] = &["Total Amount", "totalAmount", "total_amount"];

const FAILED_DESCRIPTION: &str = "Receipt processing failed: manual entry required";

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("valid fenced block pattern")
});
static EXPENSE_TYPE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""Expense Type":\s*"([^"]+)""#).expect("valid expense type pattern")
});
static DESCRIPTION_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""Description":\s*"([^"]+)""#).expect("valid description pattern")
});
static TOTAL_AMOUNT_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""Total Amount":\s*"([^"]+)""#).expect("valid total amount pattern")
});

/// Best-effort fields returned by the receipt extraction service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedReceiptData {
    pub total_amount: Option<String>,
    pub description: Option<String>,
    pub expense_type: Option<String>,
    /// Raw model output, kept only when nothing usable could be read from it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ExtractedReceiptData {
    /// Reads the known key spellings from a JSON object; anything else yields empty data.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };
        let field = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| object.get(*key))
                .and_then(text_value)
        };

        Self {
            total_amount: field(TOTAL_AMOUNT_KEYS),
            description: field(DESCRIPTION_KEYS),
            expense_type: field(EXPENSE_TYPE_KEYS),
            text: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_amount.is_none() && self.description.is_none() && self.expense_type.is_none()
    }

    fn processing_failed(raw: &str) -> Self {
        Self {
            total_amount: Some(String::new()),
            description: Some(FAILED_DESCRIPTION.to_string()),
            expense_type: Some("Other".to_string()),
            text: Some(raw.to_string()),
        }
    }
}

/// Parse the raw text the extraction service answered with.
///
/// Model output is often wrapped in a markdown fence or is not quite JSON, so
/// this falls back to pulling individual fields out with patterns and finally
/// to a placeholder asking for manual entry. It never fails.
pub fn parse_extraction_response(raw: &str) -> ExtractedReceiptData {
    let trimmed = raw.trim();
    let body = FENCED_BLOCK
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
        .map_or(trimmed, |inner| inner.as_str().trim());

    match serde_json::from_str::<Value>(body) {
        Ok(value) if value.is_object() => {
            tracing::debug!("Parsed extraction response as JSON");
            return ExtractedReceiptData::from_value(&value);
        }
        Ok(_) => tracing::warn!("Extraction response is JSON but not an object"),
        Err(error) => tracing::warn!(error = %error, "Extraction response is not valid JSON"),
    }

    let recovered = ExtractedReceiptData {
        total_amount: capture_field(&TOTAL_AMOUNT_FIELD, body),
        description: capture_field(&DESCRIPTION_FIELD, body),
        expense_type: capture_field(&EXPENSE_TYPE_FIELD, body),
        text: None,
    };
    if !recovered.is_empty() {
        tracing::debug!("Recovered extraction fields by pattern");
        return recovered;
    }

    tracing::warn!("Extraction response unusable, requesting manual entry");
    ExtractedReceiptData::processing_failed(raw)
}

fn capture_field(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|found| found.as_str().to_string())
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
