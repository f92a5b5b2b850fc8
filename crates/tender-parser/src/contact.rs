//! Administrative contact parser
//!
//! Classifies the lines of a free-text contact block into name, email, mobile
//! and landline. The heuristic is lossy on purpose and this is accepted
//! behavior: each line lands in exactly one category, only the first line of
//! each category is kept, and everything else is discarded.

use once_cell::sync::Lazy;
use regex::Regex;
use tender_core::ContactRecord;

// Moroccan numbers: 06/07 mobile, 05 landline, or the same after a 212 country code
static MOBILE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\d])(?:(?:\+|00)?212[\s.\-]?[67]|0[67])(?:[\s.\-]?\d){7,}").unwrap()
});

static LANDLINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\d])(?:(?:\+|00)?212[\s.\-]?5|05)(?:[\s.\-]?\d){7,}").unwrap()
});

/// Category of one contact line, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactLineKind {
    Email,
    Mobile,
    Landline,
    Other,
}

impl ContactLineKind {
    /// Classify a single trimmed line
    pub fn classify(line: &str) -> Self {
        if line.contains('@') {
            ContactLineKind::Email
        } else if MOBILE_PATTERN.is_match(line) {
            ContactLineKind::Mobile
        } else if LANDLINE_PATTERN.is_match(line) {
            ContactLineKind::Landline
        } else {
            ContactLineKind::Other
        }
    }
}

/// Contact block parser
pub struct ContactParser;

impl ContactParser {
    /// Parse a multi-line contact block
    pub fn parse(text: &str) -> ContactRecord {
        let mut record = ContactRecord::default();

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let slot = match ContactLineKind::classify(line) {
                ContactLineKind::Email => &mut record.email,
                ContactLineKind::Mobile => &mut record.mobile,
                ContactLineKind::Landline => &mut record.institution_phone,
                ContactLineKind::Other => &mut record.name,
            };
            if slot.is_none() {
                *slot = Some(line.to_string());
            }
        }

        record
    }
}
