//! Regex fallback bank for receipt fields.
//!
//! Every matcher runs over raw text only: joined OCR lines, or the decoded
//! token sequence of a document model.

pub mod amounts;
pub mod bill;
pub mod dates;
pub mod patterns;

pub use amounts::{
    extract_tax, extract_total, parse_amount, parse_structured_amount, resolve_amount,
    AmountExtractor, AmountKind,
};
pub use bill::{extract_bill_number, BillNumberExtractor};
pub use dates::{extract_date, extract_time, DateExtractor, TimeExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value matched in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position of the whole match in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

impl ExtractionMatch<String> {
    /// Match whose value is the matched text itself.
    pub(crate) fn verbatim(m: regex::Match<'_>) -> Self {
        Self::new(m.as_str().to_string(), m.as_str()).with_position(m.start(), m.end())
    }
}
