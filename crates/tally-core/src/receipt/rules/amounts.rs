//! Amount extraction and resolution.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{TAX_AMOUNT, TOTAL_AMOUNT};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::receipt::Amount;
use crate::models::tree::StructuredValue;

/// Which keyword family an [`AmountExtractor`] looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountKind {
    /// Total, Amount, Grand Total, Net Amount.
    Total,
    /// Tax, GST, VAT.
    Tax,
}

impl AmountKind {
    fn pattern(self) -> &'static Regex {
        match self {
            AmountKind::Total => &*TOTAL_AMOUNT,
            AmountKind::Tax => &*TAX_AMOUNT,
        }
    }
}

/// Keyword-anchored amount extractor.
///
/// Values are the matched figures as text; conversion happens in
/// [`resolve_amount`].
pub struct AmountExtractor {
    kind: AmountKind,
}

impl AmountExtractor {
    pub fn new(kind: AmountKind) -> Self {
        Self { kind }
    }

    pub fn total() -> Self {
        Self::new(AmountKind::Total)
    }

    pub fn tax() -> Self {
        Self::new(AmountKind::Tax)
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.kind
            .pattern()
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                let figure = caps.get(1)?;
                Some(
                    ExtractionMatch::new(figure.as_str().to_string(), full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

/// Resolve several matched figures into one amount.
///
/// The largest convertible figure wins: receipts repeat amount lines
/// (subtotal, discount, final total) and the grand total is usually the
/// largest. This is a heuristic and can pick a mislabeled figure. When no
/// figure converts, the last raw match is returned as text.
pub fn resolve_amount(matches: &[ExtractionMatch<String>]) -> Option<Amount> {
    let last = matches.last()?;

    let max = matches.iter().filter_map(|m| parse_amount(&m.value)).max();

    Some(match max {
        Some(value) => Amount::Number(value),
        None => Amount::Raw(last.value.clone()),
    })
}

/// Resolved total amount from raw text.
pub fn extract_total(text: &str) -> Option<Amount> {
    resolve_amount(&AmountExtractor::total().extract_all(text))
}

/// Resolved tax amount from raw text.
pub fn extract_tax(text: &str) -> Option<Amount> {
    resolve_amount(&AmountExtractor::tax().extract_all(text))
}

/// Parse a matched money figure (e.g. "1,234.56", "1234.56" or "12,50").
///
/// A separator followed by exactly two digits at the end is the decimal
/// point; every other separator is a thousands separator and is dropped.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let normalized = match cleaned.rfind([',', '.']) {
        Some(pos) if cleaned.len() - pos == 3 => {
            let (integer_part, decimal_part) = cleaned.split_at(pos);
            format!("{}.{}", integer_part.replace([',', '.'], ""), &decimal_part[1..])
        }
        _ => cleaned.replace([',', '.'], ""),
    };

    Decimal::from_str(&normalized).ok()
}

/// Parse an amount reported by a document model.
///
/// Everything except ASCII digits and `.` is stripped before parsing, so
/// currency symbols and grouping commas disappear. Containers and null have
/// no amount.
pub fn parse_structured_amount(value: &StructuredValue) -> Option<Decimal> {
    let text = match value {
        StructuredValue::Number(n) => n.to_string(),
        StructuredValue::String(s) => s.clone(),
        _ => return None,
    };

    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    Decimal::from_str(&cleaned).ok()
}
