use serde::{Deserialize, Serialize};

use crate::services::catalog::CategoryCatalog;
use crate::services::expense_categorization::{infer_category, KeywordTable, MatchRule};
use crate::services::receipt::ExtractedReceiptData;

/// Recurrence options offered by the expense form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurringPeriod {
    #[serde(rename = "1 day")]
    Daily,
    #[serde(rename = "1 week")]
    Weekly,
    #[serde(rename = "1 month")]
    Monthly,
    #[serde(rename = "2 months")]
    BiMonthly,
    #[serde(rename = "3 months")]
    Quarterly,
    #[serde(rename = "6 months")]
    SemiAnnual,
    #[serde(rename = "1 year")]
    Yearly,
}

/// Pre-filled expense handed back to the user for review before submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub amount: Option<f64>,
    pub amount_text: String,
    pub description: String,
    pub category: String,
    pub matched_by: MatchRule,
    pub is_recurring: bool,
    pub recurring_period: Option<RecurringPeriod>,
}

pub fn build_expense_draft(
    extracted: &ExtractedReceiptData,
    catalog: &CategoryCatalog,
    keywords: &KeywordTable,
    recurring_period: Option<RecurringPeriod>,
) -> ExpenseDraft {
    let matched = infer_category(
        extracted.expense_type.as_deref().unwrap_or_default(),
        catalog,
        keywords,
    );
    let amount_text = extracted
        .total_amount
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    tracing::debug!(
        category = %matched.name(),
        matched_by = ?matched.rule,
        "Built expense draft"
    );

    ExpenseDraft {
        amount: parse_amount(&amount_text),
        amount_text,
        description: extracted
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        category: matched.name().to_string(),
        matched_by: matched.rule,
        is_recurring: recurring_period.is_some(),
        recurring_period,
    }
}

/// Parse a receipt total such as "$1,234.56", "12,50 €" or "1.234,56".
///
/// The last separator followed by at most two digits is the decimal point;
/// every other separator is a thousands mark. Returns `None` for anything
/// that is not a positive finite amount.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    if kept.is_empty() {
        return None;
    }

    let normalized = match kept.rfind(['.', ',']) {
        Some(index) => {
            let digits_after = kept.len() - index - 1;
            let (whole, fraction) = kept.split_at(index);
            let whole: String = whole.chars().filter(|c| !matches!(c, '.' | ',')).collect();
            let single_separator = kept.matches(['.', ',']).count() == 1;
            let leading_zero = whole.is_empty() || whole == "0";
            if digits_after <= 2 || leading_zero || (single_separator && digits_after != 3) {
                format!("{whole}.{}", &fraction[1..])
            } else {
                format!("{whole}{}", &fraction[1..])
            }
        }
        None => kept,
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount > 0.0)
}
