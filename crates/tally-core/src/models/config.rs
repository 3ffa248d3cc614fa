//! Configuration for receipt extraction.

use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Result, TallyError};
use crate::models::receipt::UNKNOWN_MERCHANT;

/// Extraction configuration: synonym tables, structured amount paths and
/// per-call limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Field-name synonyms searched in the document tree.
    pub synonyms: SynonymConfig,

    /// Key paths holding structured amounts.
    pub amounts: AmountPathConfig,

    /// Merchant name used when the document tree names none.
    pub default_merchant: String,

    /// Maximum characters of input text per call. Off (0) unless a host opts in.
    pub max_input_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            synonyms: SynonymConfig::default(),
            amounts: AmountPathConfig::default(),
            default_merchant: UNKNOWN_MERCHANT.to_string(),
            max_input_chars: 0,
        }
    }
}

/// Synonym tables, each in priority order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynonymConfig {
    /// Keys naming the merchant.
    pub merchant: Vec<String>,

    /// Keys naming the bill or invoice number.
    pub bill_number: Vec<String>,

    /// Keys naming the receipt date.
    pub date: Vec<String>,

    /// Keys naming the receipt time.
    pub time: Vec<String>,

    /// Sub-mappings searched one level below the root.
    pub containers: Vec<String>,
}

impl Default for SynonymConfig {
    fn default() -> Self {
        Self {
            merchant: keys(&["store_name", "merchant_name", "name", "merchant", "store_addr"]),
            bill_number: keys(&["invoice_no", "receipt_id", "id", "serial_no"]),
            date: keys(&[
                "date",
                "receipt_date",
                "create_date",
                "issue_date",
                "bill_date",
                "purchase_date",
                "txn_date",
            ]),
            time: keys(&["time", "receipt_time", "create_time", "bill_time"]),
            containers: keys(&["receipt", "store_info"]),
        }
    }
}

/// Ordered key paths for amounts reported by the document model.
///
/// Dedicated root keys come first, generic containers after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountPathConfig {
    pub total: Vec<Vec<String>>,
    pub tax: Vec<Vec<String>>,
}

impl Default for AmountPathConfig {
    fn default() -> Self {
        Self {
            total: vec![keys(&["total_price"]), keys(&["total", "total_price"])],
            tax: vec![keys(&["tax_price"]), keys(&["sub_total", "tax_price"])],
        }
    }
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl ExtractionConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            TallyError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| TallyError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that every synonym table and amount path is usable.
    pub fn validate(&self) -> std::result::Result<(), ExtractionError> {
        let tables = [
            ("merchant", &self.synonyms.merchant),
            ("bill_number", &self.synonyms.bill_number),
            ("date", &self.synonyms.date),
            ("time", &self.synonyms.time),
        ];
        for (name, table) in tables {
            if table.is_empty() {
                return Err(ExtractionError::InvalidConfig(format!(
                    "synonym table '{}' is empty",
                    name
                )));
            }
            if table.iter().any(|k| k.is_empty()) {
                return Err(ExtractionError::InvalidConfig(format!(
                    "synonym table '{}' contains an empty key",
                    name
                )));
            }
        }

        let paths = self.amounts.total.iter().chain(&self.amounts.tax);
        for path in paths {
            if path.is_empty() || path.iter().any(|k| k.is_empty()) {
                return Err(ExtractionError::InvalidConfig(format!(
                    "invalid amount path {:?}",
                    path
                )));
            }
        }

        Ok(())
    }
}
