//! Monetary amount parsing and display formatting
//!
//! Amounts arrive as free text such as `"500 000,00"`, `"1.250.000,50 DH"` or
//! `"1,250,000.50"`. They are reduced to an `f64` and rendered back with a
//! configurable thousands/decimal style.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

const GROUP_SPACES: [char; 3] = [' ', '\u{a0}', '\u{202f}'];

// Largest magnitude below which every integer is exactly representable in an f64
const MAX_EXACT_SCALED: f64 = 9_007_199_254_740_992.0;

/// Parse the first numeric amount found in `text`
///
/// Thousands separators (spaces, narrow spaces, apostrophes, and dots or commas in
/// grouping position) are dropped and a decimal comma is converted to a dot.
pub fn parse_amount(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let run: String = text[start..]
        .chars()
        .take_while(|c| {
            c.is_ascii_digit() || matches!(*c, ',' | '.' | '\'') || GROUP_SPACES.contains(c)
        })
        .filter(|c| !GROUP_SPACES.contains(c) && *c != '\'')
        .collect();
    let run = run.trim_end_matches(|c: char| c == ',' || c == '.');

    let normalized = match (run.rfind(','), run.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => run.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => run.replace(',', ""),
        (Some(comma), None) => {
            let decimals = run.len() - comma - 1;
            if run.matches(',').count() == 1 && decimals != 3 {
                run.replace(',', ".")
            } else {
                run.replace(',', "")
            }
        }
        (None, Some(_)) if run.matches('.').count() > 1 => run.replace('.', ""),
        _ => run.to_string(),
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Display style for monetary amounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountFormat {
    /// Separator between groups of three integer digits
    pub thousands_separator: char,

    /// Separator before the fractional digits
    pub decimal_separator: char,

    /// Number of fractional digits rendered
    pub fraction_digits: u32,

    /// Currency label used when the source provides none
    pub default_currency: String,
}

impl AmountFormat {
    /// Largest supported number of fractional digits
    pub const MAX_FRACTION_DIGITS: u32 = 6;

    /// Create the default format (`15 000,00 DH`)
    pub fn new() -> Self {
        Self {
            thousands_separator: ' ',
            decimal_separator: ',',
            fraction_digits: 2,
            default_currency: "DH".to_string(),
        }
    }

    /// Set the separators
    pub fn with_separators(mut self, thousands: char, decimal: char) -> Self {
        self.thousands_separator = thousands;
        self.decimal_separator = decimal;
        self
    }

    /// Set the default currency label
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    /// Check the format can render unambiguous amounts
    pub fn validate(&self) -> Result<()> {
        if self.thousands_separator == self.decimal_separator {
            return Err(CoreError::InvalidFormat(format!(
                "thousands and decimal separators are both '{}'",
                self.decimal_separator
            )));
        }
        if self.thousands_separator.is_ascii_digit() || self.decimal_separator.is_ascii_digit() {
            return Err(CoreError::InvalidFormat("separators cannot be digits".to_string()));
        }
        if self.fraction_digits > Self::MAX_FRACTION_DIGITS {
            return Err(CoreError::InvalidFormat(format!(
                "at most {} fraction digits are supported, got {}",
                Self::MAX_FRACTION_DIGITS,
                self.fraction_digits
            )));
        }
        if self.default_currency.trim().is_empty() {
            return Err(CoreError::InvalidValue("default currency is blank".to_string()));
        }
        Ok(())
    }

    /// Render `amount` followed by `currency`, or the default currency when absent
    ///
    /// Returns `None` when the amount cannot be rendered exactly at the configured
    /// precision: non-finite values, or magnitudes whose scaled form exceeds 2^53.
    pub fn format(&self, amount: f64, currency: Option<&str>) -> Option<String> {
        let digits = self.fraction_digits.min(Self::MAX_FRACTION_DIGITS);
        let scale = 10u128.pow(digits);
        let scaled = (amount.abs() * scale as f64).round();
        if !scaled.is_finite() || scaled >= MAX_EXACT_SCALED {
            log::debug!("Amount {} is out of the exact formatting range", amount);
            return None;
        }
        let scaled = scaled as u128;
        let integer = (scaled / scale).to_string();
        let fraction = scaled % scale;

        let mut out = String::new();
        if amount < 0.0 && scaled != 0 {
            out.push('-');
        }
        for (i, c) in integer.chars().enumerate() {
            if i > 0 && (integer.len() - i) % 3 == 0 {
                out.push(self.thousands_separator);
            }
            out.push(c);
        }
        if digits > 0 {
            out.push(self.decimal_separator);
            out.push_str(&format!("{:0width$}", fraction, width = digits as usize));
        }

        let label = currency
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(self.default_currency.as_str());
        Some(format!("{} {}", out, label))
    }
}

impl Default for AmountFormat {
    fn default() -> Self {
        Self::new()
    }
}
