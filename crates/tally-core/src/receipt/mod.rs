//! Receipt field extraction module.

mod assembler;
pub mod locator;
pub mod rules;

pub use assembler::ReceiptAssembler;
pub use locator::FieldLocator;

use std::borrow::Cow;

use crate::engine::DocumentParse;
use crate::models::receipt::ExtractionOutcome;
use crate::models::tree::StructuredValue;

/// Evidence produced by one of the two front-ends.
#[derive(Debug, Clone, PartialEq)]
pub enum Evidence {
    /// Recognized lines from an OCR engine, in reading order.
    FlatText { lines: Vec<String> },

    /// Field tree plus decoded token text from a document model.
    Structured {
        tree: StructuredValue,
        sequence: String,
    },
}

impl Evidence {
    /// Flat-text evidence from recognized lines.
    pub fn flat<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Evidence::FlatText {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Flat-text evidence from a blob of text, one line per `\n`.
    pub fn from_text(text: &str) -> Self {
        Self::flat(text.lines())
    }

    /// Structured evidence from a document tree and its token text.
    pub fn structured(tree: StructuredValue, sequence: impl Into<String>) -> Self {
        Evidence::Structured {
            tree,
            sequence: sequence.into(),
        }
    }

    /// Text searched by the regex fallback.
    pub fn search_text(&self) -> Cow<'_, str> {
        match self {
            Evidence::FlatText { lines } => Cow::Owned(lines.join("\n")),
            Evidence::Structured { sequence, .. } => Cow::Borrowed(sequence),
        }
    }

    /// Front-end name, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Evidence::FlatText { .. } => "flat-text",
            Evidence::Structured { .. } => "structured",
        }
    }
}

impl From<DocumentParse> for Evidence {
    fn from(parse: DocumentParse) -> Self {
        Evidence::structured(parse.tree, parse.sequence)
    }
}

impl From<Vec<String>> for Evidence {
    fn from(lines: Vec<String>) -> Self {
        Evidence::FlatText { lines }
    }
}

/// Trait for receipt extractors.
///
/// Extraction never fails outward: faults are reported through
/// [`ExtractionOutcome::Failed`].
pub trait ReceiptExtractor {
    /// Extract a receipt from front-end evidence.
    fn extract(&self, evidence: &Evidence) -> ExtractionOutcome;

    /// Extract a receipt from OCR lines.
    fn extract_lines(&self, lines: &[String]) -> ExtractionOutcome {
        self.extract(&Evidence::flat(lines.iter().cloned()))
    }

    /// Extract a receipt from a document tree and its token text.
    fn extract_structured(&self, tree: &StructuredValue, sequence: &str) -> ExtractionOutcome {
        self.extract(&Evidence::structured(tree.clone(), sequence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_splits_lines() {
        let evidence = Evidence::from_text("SuperMart\r\nTotal: 1.00\n");
        assert_eq!(
            evidence,
            Evidence::flat(["SuperMart", "Total: 1.00"])
        );
        assert_eq!(evidence.search_text(), "SuperMart\nTotal: 1.00");
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert_eq!(Evidence::from_text(""), Evidence::FlatText { lines: Vec::new() });
    }

    #[test]
    fn test_structured_search_text_is_sequence() {
        let parse = DocumentParse::new(StructuredValue::Null, "TOTAL 9.00");
        let evidence = Evidence::from(parse);
        assert_eq!(evidence.kind(), "structured");
        assert_eq!(evidence.search_text(), "TOTAL 9.00");
    }
}
