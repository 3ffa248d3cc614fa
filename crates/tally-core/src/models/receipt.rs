//! Canonical receipt record and extraction outcome.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Merchant name used when no evidence names one.
pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// A receipt assembled from recognition evidence.
///
/// Absent fields serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    /// Merchant or store name.
    pub merchant_name: String,

    /// Bill/invoice number exactly as matched.
    pub bill_number: Option<String>,

    /// Date substring exactly as matched or located.
    pub date: Option<String>,

    /// Time substring exactly as matched or located.
    pub time: Option<String>,

    /// Grand total.
    pub total_amount: Option<Amount>,

    /// Tax amount.
    pub tax_amount: Option<Amount>,

    /// Itemized lines. Reserved; extraction leaves this empty.
    #[serde(default)]
    pub items: Vec<LineItem>,

    /// Audit trail: OCR lines, or the pretty-printed document tree.
    pub raw_text: Vec<String>,
}

impl ReceiptRecord {
    /// Record with every field at its default.
    pub fn empty(raw_text: Vec<String>) -> Self {
        Self {
            merchant_name: UNKNOWN_MERCHANT.to_string(),
            bill_number: None,
            date: None,
            time: None,
            total_amount: None,
            tax_amount: None,
            items: Vec::new(),
            raw_text,
        }
    }

    /// Names of the optional fields that were not resolved.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.bill_number.is_none() {
            missing.push("bill_number");
        }
        if self.date.is_none() {
            missing.push("date");
        }
        if self.time.is_none() {
            missing.push("time");
        }
        if self.total_amount.is_none() {
            missing.push("total_amount");
        }
        if self.tax_amount.is_none() {
            missing.push("tax_amount");
        }
        missing
    }
}

/// A resolved amount.
///
/// Normally a number. When none of the matched strings could be converted
/// the raw matched text is kept instead, so callers must handle both shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    #[serde(with = "rust_decimal::serde::float")]
    Number(Decimal),
    Raw(String),
}

impl Amount {
    /// The numeric value, if conversion succeeded.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Amount::Number(d) => Some(*d),
            Amount::Raw(_) => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Amount::Number(_))
    }
}

impl From<Decimal> for Amount {
    fn from(d: Decimal) -> Self {
        Amount::Number(d)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(d) => write!(f, "{:.2}", d),
            Amount::Raw(s) => f.write_str(s),
        }
    }
}

/// Itemized receipt line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item description.
    pub description: String,

    /// Quantity, if printed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,

    /// Line price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Amount>,
}

/// Result of one extraction call.
///
/// Serializes either as the record itself or as `{"error": "<message>"}`.
/// The presence of the `error` key is the only failure signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractionOutcome {
    Failed { error: String },
    Record(ReceiptRecord),
}

impl ExtractionOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        ExtractionOutcome::Failed {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ExtractionOutcome::Failed { .. })
    }

    /// The record, if extraction succeeded.
    pub fn record(&self) -> Option<&ReceiptRecord> {
        match self {
            ExtractionOutcome::Record(record) => Some(record),
            ExtractionOutcome::Failed { .. } => None,
        }
    }

    /// The error message, if extraction failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            ExtractionOutcome::Failed { error } => Some(error),
            ExtractionOutcome::Record(_) => None,
        }
    }

    pub fn into_result(self) -> Result<ReceiptRecord, String> {
        match self {
            ExtractionOutcome::Record(record) => Ok(record),
            ExtractionOutcome::Failed { error } => Err(error),
        }
    }

    /// Serialize to the JSON wire shape.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<ReceiptRecord> for ExtractionOutcome {
    fn from(record: ReceiptRecord) -> Self {
        ExtractionOutcome::Record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_record_wire_shape() {
        let mut record = ReceiptRecord::empty(vec!["SuperMart".to_string()]);
        record.merchant_name = "SuperMart".to_string();
        record.total_amount = Some(Amount::Number(Decimal::from_str("123.45").unwrap()));

        let json: serde_json::Value =
            serde_json::to_value(ExtractionOutcome::from(record)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "merchant_name": "SuperMart",
                "bill_number": null,
                "date": null,
                "time": null,
                "total_amount": 123.45,
                "tax_amount": null,
                "items": [],
                "raw_text": ["SuperMart"],
            })
        );
    }

    #[test]
    fn test_error_wire_shape() {
        let outcome = ExtractionOutcome::failed("boom");
        assert_eq!(outcome.to_json().unwrap(), r#"{"error":"boom"}"#);
        assert!(outcome.is_error());
        assert!(outcome.record().is_none());
    }

    #[test]
    fn test_raw_amount_serializes_as_string() {
        let amount = Amount::Raw("12,50".to_string());
        assert_eq!(serde_json::to_string(&amount).unwrap(), r#""12,50""#);
        assert_eq!(amount.as_decimal(), None);
        assert_eq!(amount.to_string(), "12,50");
    }

    #[test]
    fn test_missing_fields() {
        let mut record = ReceiptRecord::empty(Vec::new());
        record.date = Some("01/02/2023".to_string());
        assert_eq!(
            record.missing_fields(),
            vec!["bill_number", "time", "total_amount", "tax_amount"]
        );
    }

    #[test]
    fn test_outcome_parses_back() {
        let outcome: ExtractionOutcome =
            serde_json::from_str(r#"{"error": "bad image"}"#).unwrap();
        assert_eq!(outcome.error(), Some("bad image"));
    }
}
