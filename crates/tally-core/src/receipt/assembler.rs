//! Receipt assembler fusing document-tree fields with regex fallbacks.

use tracing::{debug, info, warn};

use crate::engine::{DocumentModel, TextRecognizer};
use crate::error::{ExtractionError, TallyError};
use crate::models::config::ExtractionConfig;
use crate::models::receipt::{Amount, ExtractionOutcome, ReceiptRecord};
use crate::models::tree::StructuredValue;

use super::locator::FieldLocator;
use super::rules::{
    extract_bill_number, extract_date, extract_tax, extract_time, extract_total,
    parse_structured_amount,
};
use super::{Evidence, ReceiptExtractor};

/// Assembles a [`ReceiptRecord`] from either front-end.
///
/// Structured evidence is searched first; every field it leaves unset is
/// filled from the raw text by the regex fallback bank. Each call is
/// independent, so one assembler can serve many threads.
#[derive(Debug, Clone, Default)]
pub struct ReceiptAssembler {
    config: ExtractionConfig,
}

/// Optional fields resolved so far.
#[derive(Debug, Default)]
struct ResolvedFields {
    bill_number: Option<String>,
    date: Option<String>,
    time: Option<String>,
    total_amount: Option<Amount>,
    tax_amount: Option<Amount>,
}

impl ResolvedFields {
    /// Run the regex fallback for every field still unset.
    fn fill_from_text(&mut self, text: &str) {
        if self.bill_number.is_none() {
            self.bill_number = extract_bill_number(text);
            log_fallback("bill_number", self.bill_number.is_some());
        }
        if self.date.is_none() {
            self.date = extract_date(text);
            log_fallback("date", self.date.is_some());
        }
        if self.time.is_none() {
            self.time = extract_time(text);
            log_fallback("time", self.time.is_some());
        }
        if self.total_amount.is_none() {
            self.total_amount = extract_total(text);
            log_fallback("total_amount", self.total_amount.is_some());
        }
        if self.tax_amount.is_none() {
            self.tax_amount = extract_tax(text);
            log_fallback("tax_amount", self.tax_amount.is_some());
        }
    }

    fn into_record(self, merchant_name: String, raw_text: Vec<String>) -> ReceiptRecord {
        ReceiptRecord {
            merchant_name,
            bill_number: self.bill_number,
            date: self.date,
            time: self.time,
            total_amount: self.total_amount,
            tax_amount: self.tax_amount,
            items: Vec::new(),
            raw_text,
        }
    }
}

fn log_fallback(field: &str, found: bool) {
    if found {
        debug!("Resolved {} from raw text", field);
    } else {
        debug!("No raw-text match for {}", field);
    }
}

impl ReceiptAssembler {
    /// Create an assembler with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an assembler with a custom configuration.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Create an assembler after validating the configuration.
    pub fn from_config(config: ExtractionConfig) -> Result<Self, ExtractionError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Assemble a record, reporting faults as errors.
    ///
    /// [`ReceiptExtractor::extract`] wraps this and folds any error into an
    /// error outcome.
    pub fn assemble(&self, evidence: &Evidence) -> Result<ReceiptRecord, ExtractionError> {
        let text = evidence.search_text();
        info!(
            "Assembling receipt from {} evidence ({} bytes of text)",
            evidence.kind(),
            text.len()
        );
        self.check_input_size(&text)?;

        let record = match evidence {
            Evidence::FlatText { lines } => self.assemble_flat(lines, &text),
            Evidence::Structured { tree, sequence } => self.assemble_structured(tree, sequence)?,
        };

        debug!(
            "Assembled receipt for {:?}; missing fields: {:?}",
            record.merchant_name,
            record.missing_fields()
        );

        Ok(record)
    }

    /// Run an OCR engine on an encoded image, then assemble its lines.
    pub fn scan_image<R>(&self, engine: &R, image: &[u8]) -> ExtractionOutcome
    where
        R: TextRecognizer + ?Sized,
    {
        let result = engine
            .recognize(image)
            .map_err(TallyError::from)
            .and_then(|lines| {
                self.assemble(&Evidence::flat(lines))
                    .map_err(TallyError::from)
            });
        self.finish(result)
    }

    /// Run a document model on an encoded image, then assemble its output.
    pub fn scan_document<M>(&self, model: &M, image: &[u8]) -> ExtractionOutcome
    where
        M: DocumentModel + ?Sized,
    {
        let result = model
            .parse(image)
            .map_err(TallyError::from)
            .and_then(|parse| {
                self.assemble(&Evidence::from(parse))
                    .map_err(TallyError::from)
            });
        self.finish(result)
    }

    fn finish(&self, result: crate::Result<ReceiptRecord>) -> ExtractionOutcome {
        match result {
            Ok(record) => ExtractionOutcome::Record(record),
            Err(e) => {
                warn!("Receipt extraction failed: {}", e);
                ExtractionOutcome::failed(e.to_string())
            }
        }
    }

    fn check_input_size(&self, text: &str) -> Result<(), ExtractionError> {
        let limit = self.config.max_input_chars;
        if limit == 0 {
            return Ok(());
        }

        let len = text.chars().count();
        if len > limit {
            return Err(ExtractionError::InputTooLarge { len, limit });
        }
        Ok(())
    }

    fn assemble_flat(&self, lines: &[String], text: &str) -> ReceiptRecord {
        let mut fields = ResolvedFields::default();
        fields.fill_from_text(text);

        // The first recognized line is usually the store header.
        let merchant_name = lines
            .first()
            .filter(|line| !line.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| self.config.default_merchant.clone());

        fields.into_record(merchant_name, lines.to_vec())
    }

    fn assemble_structured(
        &self,
        tree: &StructuredValue,
        sequence: &str,
    ) -> Result<ReceiptRecord, ExtractionError> {
        let pretty = tree.to_pretty_json()?;
        debug!("Document model output:\n{}", pretty);

        let synonyms = &self.config.synonyms;
        let locator = FieldLocator::new(&synonyms.containers);
        let locate = |keys: &[String]| -> Result<Option<String>, ExtractionError> {
            let text = locator.find(tree, keys).map(StructuredValue::to_text).transpose()?;
            Ok(text.flatten())
        };

        let merchant_name = locate(&synonyms.merchant)?;
        let mut fields = ResolvedFields {
            bill_number: locate(&synonyms.bill_number)?,
            date: locate(&synonyms.date)?,
            time: locate(&synonyms.time)?,
            total_amount: structured_amount(tree, &self.config.amounts.total),
            tax_amount: structured_amount(tree, &self.config.amounts.tax),
        };
        debug!(
            "Document tree supplied: merchant={} bill_number={} date={} time={} total={} tax={}",
            merchant_name.is_some(),
            fields.bill_number.is_some(),
            fields.date.is_some(),
            fields.time.is_some(),
            fields.total_amount.is_some(),
            fields.tax_amount.is_some()
        );

        fields.fill_from_text(sequence);

        let merchant_name =
            merchant_name.unwrap_or_else(|| self.config.default_merchant.clone());

        Ok(fields.into_record(merchant_name, vec![pretty]))
    }

}

/// Amount at the first usable path. A value that does not parse leaves the
/// field to the regex fallback.
fn structured_amount(tree: &StructuredValue, paths: &[Vec<String>]) -> Option<Amount> {
    let value = FieldLocator::find_path(tree, paths)?;
    let amount = parse_structured_amount(value);
    if amount.is_none() {
        debug!("Unparseable structured amount {:?}", value);
    }
    amount.map(Amount::Number)
}

impl ReceiptExtractor for ReceiptAssembler {
    fn extract(&self, evidence: &Evidence) -> ExtractionOutcome {
        self.finish(self.assemble(evidence).map_err(TallyError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DocumentParse;
    use crate::error::EngineError;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Amount {
        Amount::Number(Decimal::from_str(s).unwrap())
    }

    fn tree(json: &str) -> StructuredValue {
        json.parse().unwrap()
    }

    struct FixedOcr(Vec<&'static str>);

    impl TextRecognizer for FixedOcr {
        fn recognize(&self, _image: &[u8]) -> Result<Vec<String>, EngineError> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct BrokenOcr;

    impl TextRecognizer for BrokenOcr {
        fn recognize(&self, _image: &[u8]) -> Result<Vec<String>, EngineError> {
            Err(EngineError::Decode("cannot identify image file".to_string()))
        }
    }

    struct FixedModel(&'static str, &'static str);

    impl DocumentModel for FixedModel {
        fn parse(&self, _image: &[u8]) -> Result<DocumentParse, EngineError> {
            Ok(DocumentParse::new(tree(self.0), self.1))
        }
    }

    #[test]
    fn test_flat_text_receipt() {
        let assembler = ReceiptAssembler::new();
        let record = assembler
            .assemble(&Evidence::from_text(
                "Corner Cafe\nInvoice No: C-88\n12/05/2024 08:15 AM\nSubtotal 10.00\nVAT 2.00\nTotal 12.00",
            ))
            .unwrap();

        assert_eq!(record.merchant_name, "Corner Cafe");
        assert_eq!(record.bill_number.as_deref(), Some("C-88"));
        assert_eq!(record.date.as_deref(), Some("12/05/2024"));
        assert_eq!(record.time.as_deref(), Some("08:15 AM"));
        assert_eq!(record.total_amount, Some(dec("12.00")));
        assert_eq!(record.tax_amount, Some(dec("2.00")));
        assert!(record.items.is_empty());
        assert_eq!(record.raw_text.len(), 6);
    }

    #[test]
    fn test_blank_first_line_uses_default_merchant() {
        let record = ReceiptAssembler::new()
            .assemble(&Evidence::flat(["   ", "Total 1.00"]))
            .unwrap();
        assert_eq!(record.merchant_name, "Unknown Merchant");
    }

    #[test]
    fn test_structured_fields_win_over_text() {
        let t = tree(
            r#"{"store_name": "ABC Store", "date": "2024-01-02", "total_price": "99.99",
                "tax_price": "9.00", "invoice_no": "X1"}"#,
        );
        let sequence = "ABC Store 05/06/2020 Total 150.00 Tax 15.00 Bill No 777";
        let record = ReceiptAssembler::new()
            .assemble(&Evidence::structured(t, sequence))
            .unwrap();

        assert_eq!(record.merchant_name, "ABC Store");
        assert_eq!(record.date.as_deref(), Some("2024-01-02"));
        assert_eq!(record.bill_number.as_deref(), Some("X1"));
        assert_eq!(record.total_amount, Some(dec("99.99")));
        assert_eq!(record.tax_amount, Some(dec("9.00")));
    }

    #[test]
    fn test_structured_gaps_filled_from_sequence() {
        let t = tree(r#"{"menu": [{"nm": "Tea", "price": "5.00"}], "total": {"cashprice": "10.00"}}"#);
        let sequence = "Tea 5.00 TOTAL 5.00 Tax 0.50 13:45 02-03-2024 Inv#A-9";
        let record = ReceiptAssembler::new()
            .assemble(&Evidence::structured(t, sequence))
            .unwrap();

        assert_eq!(record.merchant_name, "Unknown Merchant");
        assert_eq!(record.total_amount, Some(dec("5.00")));
        assert_eq!(record.tax_amount, Some(dec("0.50")));
        assert_eq!(record.time.as_deref(), Some("13:45"));
        assert_eq!(record.date.as_deref(), Some("02-03-2024"));
        assert_eq!(record.bill_number.as_deref(), Some("A-9"));
    }

    #[test]
    fn test_nested_amount_paths() {
        let t = tree(
            r#"{"total": {"total_price": "45,500"}, "sub_total": {"tax_price": "4,136"}}"#,
        );
        let record = ReceiptAssembler::new()
            .assemble(&Evidence::structured(t, ""))
            .unwrap();
        assert_eq!(record.total_amount, Some(dec("45500")));
        assert_eq!(record.tax_amount, Some(dec("4136")));
    }

    #[test]
    fn test_unparseable_structured_total_falls_back() {
        let t = tree(r#"{"total_price": "free"}"#);
        let record = ReceiptAssembler::new()
            .assemble(&Evidence::structured(t, "Amount: 3.10"))
            .unwrap();
        assert_eq!(record.total_amount, Some(dec("3.10")));
    }

    #[test]
    fn test_false_tree_values_fall_back_to_text() {
        let t = tree(r#"{"date": false, "invoice_no": false}"#);
        let record = ReceiptAssembler::new()
            .assemble(&Evidence::structured(t, "Date 01/02/2023 Bill No 77"))
            .unwrap();
        assert_eq!(record.date.as_deref(), Some("01/02/2023"));
        assert_eq!(record.bill_number.as_deref(), Some("77"));
    }

    #[test]
    fn test_numeric_located_values_render_as_text() {
        let t = tree(r#"{"receipt": {"id": 20931, "time": "18:02"}}"#);
        let record = ReceiptAssembler::new()
            .assemble(&Evidence::structured(t, ""))
            .unwrap();
        assert_eq!(record.bill_number.as_deref(), Some("20931"));
        assert_eq!(record.time.as_deref(), Some("18:02"));
    }

    #[test]
    fn test_structured_raw_text_is_pretty_tree() {
        let t = tree(r#"{"store_name": "ABC"}"#);
        let record = ReceiptAssembler::new()
            .assemble(&Evidence::structured(t, ""))
            .unwrap();
        assert_eq!(record.raw_text, vec!["{\n  \"store_name\": \"ABC\"\n}".to_string()]);
    }

    #[test]
    fn test_oversize_input_becomes_error_outcome() {
        let mut config = ExtractionConfig::default();
        config.max_input_chars = 8;
        let assembler = ReceiptAssembler::with_config(config);

        let outcome = assembler.extract(&Evidence::from_text("Total: 123.45"));
        assert_eq!(
            outcome,
            ExtractionOutcome::failed(
                "extraction error: input of 13 characters exceeds limit of 8"
            )
        );
    }

    #[test]
    fn test_default_config_has_no_size_limit() {
        let text = format!("Big Store\n{}\nTotal: 5.00", "x".repeat(2 << 20));
        let outcome = ReceiptAssembler::new().extract(&Evidence::from_text(&text));
        assert!(!outcome.is_error());
        assert_eq!(outcome.record().unwrap().total_amount, Some(dec("5.00")));
    }

    #[test]
    fn test_custom_synonyms() {
        let mut config = ExtractionConfig::default();
        config.synonyms.merchant = vec!["toko".to_string()];
        let assembler = ReceiptAssembler::from_config(config).unwrap();

        let t = tree(r#"{"toko": "Warung Sari", "store_name": "ignored"}"#);
        let record = assembler.assemble(&Evidence::structured(t, "")).unwrap();
        assert_eq!(record.merchant_name, "Warung Sari");
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = ExtractionConfig::default();
        config.synonyms.date.clear();
        assert!(ReceiptAssembler::from_config(config).is_err());
    }

    #[test]
    fn test_scan_image() {
        let engine = FixedOcr(vec!["SuperMart", "Total: 123.45"]);
        let outcome = ReceiptAssembler::new().scan_image(&engine, b"jpeg");
        let record = outcome.record().unwrap();
        assert_eq!(record.merchant_name, "SuperMart");
        assert_eq!(record.total_amount, Some(dec("123.45")));
    }

    #[test]
    fn test_engine_failure_becomes_error_outcome() {
        let outcome = ReceiptAssembler::new().scan_image(&BrokenOcr, b"");
        assert_eq!(
            outcome.error(),
            Some("engine error: failed to decode image: cannot identify image file")
        );
    }

    #[test]
    fn test_scan_document_through_dyn_handle() {
        let model: std::sync::Arc<dyn DocumentModel> =
            std::sync::Arc::new(FixedModel(r#"{"store_name": "ABC Store"}"#, "TOTAL 7.00"));
        let outcome = ReceiptAssembler::new().scan_document(model.as_ref(), b"png");
        let record = outcome.record().unwrap();
        assert_eq!(record.merchant_name, "ABC Store");
        assert_eq!(record.total_amount, Some(dec("7.00")));
    }
}
