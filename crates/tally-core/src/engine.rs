//! Handles for the recognition collaborators.
//!
//! OCR engines and document-understanding models live outside this crate.
//! They are loaded once by the host process and passed into extraction calls
//! by reference; the core never keeps one in global state.

use crate::error::EngineError;
use crate::models::tree::StructuredValue;

/// OCR collaborator: image bytes to recognized lines in reading order.
///
/// Implementations are shared read-only between extraction calls, so they
/// must be `Send + Sync` and handle their own internal locking.
pub trait TextRecognizer: Send + Sync {
    /// Recognize text lines in an encoded image.
    fn recognize(&self, image: &[u8]) -> Result<Vec<String>, EngineError>;
}

/// Document-understanding collaborator: image bytes to a field tree.
pub trait DocumentModel: Send + Sync {
    /// Parse an encoded image into a value tree and its decoded token text.
    fn parse(&self, image: &[u8]) -> Result<DocumentParse, EngineError>;
}

/// Output of a [`DocumentModel`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentParse {
    /// Semi-structured fields.
    pub tree: StructuredValue,

    /// Raw decoded token sequence, searched by the regex fallback.
    pub sequence: String,
}

impl DocumentParse {
    pub fn new(tree: StructuredValue, sequence: impl Into<String>) -> Self {
        Self {
            tree,
            sequence: sequence.into(),
        }
    }
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for &T {
    fn recognize(&self, image: &[u8]) -> Result<Vec<String>, EngineError> {
        (**self).recognize(image)
    }
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for std::sync::Arc<T> {
    fn recognize(&self, image: &[u8]) -> Result<Vec<String>, EngineError> {
        (**self).recognize(image)
    }
}

impl<T: DocumentModel + ?Sized> DocumentModel for &T {
    fn parse(&self, image: &[u8]) -> Result<DocumentParse, EngineError> {
        (**self).parse(image)
    }
}

impl<T: DocumentModel + ?Sized> DocumentModel for std::sync::Arc<T> {
    fn parse(&self, image: &[u8]) -> Result<DocumentParse, EngineError> {
        (**self).parse(image)
    }
}
