use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::AppError;
use crate::services::catalog::CategorySeed;
use crate::services::expense_draft::RecurringPeriod;

pub fn validate_input<T: Validate>(input: &T) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|errors| AppError::UnprocessableEntity(format!("Validation failed: {errors}")))
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InferCategoryInput {
    #[serde(default, alias = "expenseType")]
    #[validate(length(max = 512))]
    pub expense_type: String,
    /// Replaces the configured catalog for this request only.
    #[validate(length(min = 1, max = 200))]
    pub catalog: Option<Vec<CategorySeed>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReceiptDraftInput {
    pub extracted: Option<Value>,
    #[serde(alias = "rawText")]
    #[validate(length(max = 65536))]
    pub raw_text: Option<String>,
    #[serde(alias = "recurringPeriod")]
    pub recurring_period: Option<RecurringPeriod>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{validate_input, InferCategoryInput, ReceiptDraftInput};
    use crate::error::AppError;
    use crate::services::expense_draft::RecurringPeriod;

    #[test]
    fn infer_input_accepts_camel_case_and_missing_type() {
        let input: InferCategoryInput =
            serde_json::from_value(json!({ "expenseType": "Taxi" })).unwrap();
        assert_eq!(input.expense_type, "Taxi");
        assert!(validate_input(&input).is_ok());

        let empty: InferCategoryInput = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.expense_type, "");
        assert!(empty.catalog.is_none());
    }

    #[test]
    fn rejects_oversized_or_empty_catalog_override() {
        let input: InferCategoryInput =
            serde_json::from_value(json!({ "expense_type": "x", "catalog": [] })).unwrap();
        assert!(matches!(
            validate_input(&input),
            Err(AppError::UnprocessableEntity(_))
        ));

        let long: InferCategoryInput =
            serde_json::from_value(json!({ "expense_type": "a".repeat(513) })).unwrap();
        assert!(validate_input(&long).is_err());
    }

    #[test]
    fn draft_input_parses_recurring_period() {
        let input: ReceiptDraftInput = serde_json::from_value(json!({
            "raw_text": "{}",
            "recurring_period": "3 months"
        }))
        .unwrap();
        assert_eq!(input.recurring_period, Some(RecurringPeriod::Quarterly));
        assert!(input.extracted.is_none());
    }
}
