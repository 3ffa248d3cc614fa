//! Core library for receipt field extraction.
//!
//! This crate provides:
//! - A structured value tree for document-model output
//! - Synonym-key field lookup over that tree
//! - A regex fallback bank for dates, times, amounts and bill numbers
//! - The receipt assembler fusing both sources into one [`ReceiptRecord`]
//!
//! OCR engines and document models are external collaborators; they plug in
//! through the traits in [`engine`].

pub mod engine;
pub mod error;
pub mod models;
pub mod receipt;

pub use engine::{DocumentModel, DocumentParse, TextRecognizer};
pub use error::{EngineError, ExtractionError, Result, TallyError};
pub use models::config::ExtractionConfig;
pub use models::receipt::{Amount, ExtractionOutcome, LineItem, ReceiptRecord};
pub use models::tree::StructuredValue;
pub use receipt::{Evidence, ReceiptAssembler, ReceiptExtractor};
