//! Date and time matchers.
//!
//! Matches are returned verbatim; nothing here parses them into calendar
//! values.

use super::patterns::{DATE_NUMERIC, DATE_TEXTUAL, TIME};
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
///
/// The numeric pattern has priority: the textual pattern is only consulted
/// when the text holds no numeric date at all.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        DATE_NUMERIC
            .find(text)
            .or_else(|| DATE_TEXTUAL.find(text))
            .map(ExtractionMatch::verbatim)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let numeric: Vec<_> = DATE_NUMERIC
            .find_iter(text)
            .map(ExtractionMatch::verbatim)
            .collect();
        if !numeric.is_empty() {
            return numeric;
        }

        DATE_TEXTUAL
            .find_iter(text)
            .map(ExtractionMatch::verbatim)
            .collect()
    }
}

/// Time field extractor.
pub struct TimeExtractor;

impl TimeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TimeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TimeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        TIME.find(text).map(ExtractionMatch::verbatim)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        TIME.find_iter(text).map(ExtractionMatch::verbatim).collect()
    }
}

/// First date in the text, as matched.
pub fn extract_date(text: &str) -> Option<String> {
    DateExtractor::new().extract(text).map(|m| m.value)
}

/// First time in the text, as matched.
pub fn extract_time(text: &str) -> Option<String> {
    TimeExtractor::new().extract(text).map(|m| m.value)
}
