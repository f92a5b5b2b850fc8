//! Configuration types for TenderReconciler

use crate::error::{Result, SdkError};
use serde::{Deserialize, Serialize};
use tender_core::{AmountFormat, MAX_UNWRAP_DEPTH};

/// Reconciler configuration
///
/// Every field has a default, so a YAML document only needs the keys it changes:
///
/// ```yaml
/// max_unwrap_depth: 8
/// amount_format:
///   default_currency: MAD
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Maximum number of `{value: ...}` wrappers peeled per leaf
    pub max_unwrap_depth: usize,

    /// Display style of derived amounts
    pub amount_format: AmountFormat,

    /// Read the contact block from the avis metadata when none is supplied
    pub contact_fallback: bool,
}

impl ReconcilerConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self {
            max_unwrap_depth: MAX_UNWRAP_DEPTH,
            amount_format: AmountFormat::default(),
            contact_fallback: true,
        }
    }

    /// Parse and validate a YAML configuration document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the unwrap depth
    pub fn with_max_unwrap_depth(mut self, depth: usize) -> Self {
        self.max_unwrap_depth = depth;
        self
    }

    /// Set the amount format
    pub fn with_amount_format(mut self, amount_format: AmountFormat) -> Self {
        self.amount_format = amount_format;
        self
    }

    /// Enable or disable the avis contact fallback
    pub fn with_contact_fallback(mut self, enable: bool) -> Self {
        self.contact_fallback = enable;
        self
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.max_unwrap_depth == 0 {
            return Err(SdkError::ConfigError(
                "max_unwrap_depth must be at least 1".to_string(),
            ));
        }
        self.amount_format.validate()?;
        Ok(())
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self::new()
    }
}
