//! Common regex patterns for receipt extraction.
//!
//! All patterns use leftmost-first semantics: the earliest match in the text
//! wins, and within one position the first alternative that matches wins.

use lazy_static::lazy_static;
use regex::Regex;

/// Two-decimal money figure. Comma-grouped thousands are tried first so that
/// `1,234.56` is not cut at the first comma. ASCII digits only, matching
/// what [`parse_amount`](super::amounts::parse_amount) can convert.
const MONEY: &str = r"([0-9]{1,3}(?:,[0-9]{3})+\.[0-9]{2}|[0-9]+[.,][0-9]{2})";

lazy_static! {
    // Numeric dates: DD/MM/YY(YY), DD-MM-YYYY, YYYY-MM-DD, YYYY/MM/DD
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{4}[/-]\d{1,2}[/-]\d{1,2}"
    ).unwrap();

    // Textual dates: 12 Jan 2023, 12-Jan-2023, 5 September, 2023
    pub static ref DATE_TEXTUAL: Regex = Regex::new(
        r"(?i)\d{1,2}[\s/.\-](?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*[\s/.\-,]*\d{2,4}"
    ).unwrap();

    // HH:MM, HH:MM:SS, with optional AM/PM marker
    pub static ref TIME: Regex = Regex::new(
        r"\d{1,2}:\d{2}(?::\d{2})?(?:\s?(?i:AM|PM))?"
    ).unwrap();

    // Total amounts
    pub static ref TOTAL_AMOUNT: Regex = Regex::new(&format!(
        r"(?i)(?:Total|Amount|Grand Total|Net Amount)[\s:]*?{}",
        MONEY
    )).unwrap();

    // Tax amounts
    pub static ref TAX_AMOUNT: Regex = Regex::new(&format!(
        r"(?i)(?:Tax|GST|VAT)[\s:]*?{}",
        MONEY
    )).unwrap();

    // Bill number: "Bill No", "Invoice #", "Inv. Num: ..."
    pub static ref BILL_NUMBER: Regex = Regex::new(
        r"(?i)(?:Bill|Invoice|Inv)[\s.]*(?:No|Num|#)?\.?[\s:]*([A-Za-z0-9-]+)"
    ).unwrap();
}
