//! Builder pattern for TenderReconciler

use crate::config::ReconcilerConfig;
use crate::error::Result;
use crate::reconciler::TenderReconciler;
use tender_core::AmountFormat;

/// Builder for TenderReconciler
///
/// # Example
///
/// ```rust,ignore
/// use tender_sdk::TenderReconcilerBuilder;
///
/// let reconciler = TenderReconcilerBuilder::new()
///     .default_currency("MAD")
///     .max_unwrap_depth(8)
///     .build()?;
///
/// let view = reconciler.reconcile(&input);
/// ```
pub struct TenderReconcilerBuilder {
    config: ReconcilerConfig,
}

impl TenderReconcilerBuilder {
    /// Create a new builder with the default configuration
    pub fn new() -> Self {
        Self {
            config: ReconcilerConfig::new(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ReconcilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the maximum unwrap depth
    pub fn max_unwrap_depth(mut self, depth: usize) -> Self {
        self.config.max_unwrap_depth = depth;
        self
    }

    /// Set the amount format
    pub fn amount_format(mut self, amount_format: AmountFormat) -> Self {
        self.config.amount_format = amount_format;
        self
    }

    /// Set the currency label used when the estimate carries none
    pub fn default_currency(mut self, currency: impl Into<String>) -> Self {
        self.config.amount_format.default_currency = currency.into();
        self
    }

    /// Set the thousands and decimal separators of derived amounts
    pub fn separators(mut self, thousands: char, decimal: char) -> Self {
        self.config.amount_format.thousands_separator = thousands;
        self.config.amount_format.decimal_separator = decimal;
        self
    }

    /// Enable or disable reading the contact block from the avis metadata
    pub fn contact_fallback(mut self, enable: bool) -> Self {
        self.config.contact_fallback = enable;
        self
    }

    /// Validate the configuration and build the reconciler
    pub fn build(self) -> Result<TenderReconciler> {
        self.config.validate()?;
        Ok(TenderReconciler::new(self.config))
    }
}

impl Default for TenderReconcilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
