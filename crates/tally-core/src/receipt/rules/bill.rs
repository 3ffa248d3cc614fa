//! Bill number extraction.

use super::patterns::BILL_NUMBER;
use super::{ExtractionMatch, FieldExtractor};

/// Bill/invoice number extractor.
///
/// Only the token after the keyword is captured, exactly as printed.
pub struct BillNumberExtractor;

impl BillNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BillNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BillNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        BILL_NUMBER
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                let token = caps.get(1)?;
                Some(
                    ExtractionMatch::new(token.as_str().to_string(), full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

/// First bill number in the text.
pub fn extract_bill_number(text: &str) -> Option<String> {
    BillNumberExtractor::new().extract(text).map(|m| m.value)
}
