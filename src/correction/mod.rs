//! Dictionary-based spelling correction
//!
//! Exact, case-insensitive substitution of known misspellings. The
//! confidence is a fixed score telling whether a substitution happened.

mod table;

pub use table::{CorrectionTable, TableError};

/// Confidence reported when the table rewrote the input
pub const CONFIDENCE_CORRECTED: f64 = 0.99;
/// Confidence reported when the input was returned as-is
pub const CONFIDENCE_UNCHANGED: f64 = 0.85;

/// Result of correcting one value
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub corrected: String,
    pub confidence: f64,
}

/// Correct `name` using the `category` mapping of `table`.
///
/// Unknown names are returned unmodified, case preserved.
pub fn correct(table: &CorrectionTable, category: Option<&str>, name: &str) -> Correction {
    let corrected = table.lookup(category, name).unwrap_or(name);
    let confidence = if corrected == name {
        CONFIDENCE_UNCHANGED
    } else {
        CONFIDENCE_CORRECTED
    };

    Correction {
        corrected: corrected.to_string(),
        confidence,
    }
}
