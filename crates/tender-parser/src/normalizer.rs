//! Tender metadata normalizer
//!
//! Reconciles avis metadata produced by either extraction schema generation, or
//! a mix of both, into a [`CanonicalTenderMetadata`]. Fallback is per field: a
//! record may take its reference from a legacy alias and its subject from the
//! current field.

use crate::json_parser::JsonParser;
use crate::schema::{FieldMapping, FieldPath, LOTS_PATH, LOT_FIELDS, METADATA_FIELDS};
use serde_json::Value;
use tender_core::{CanonicalTenderMetadata, Lot, MAX_UNWRAP_DEPTH};

/// Schema reconciler for avis metadata
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    max_depth: usize,
}

impl FieldNormalizer {
    /// Create a normalizer with the default unwrap depth
    pub fn new() -> Self {
        Self {
            max_depth: MAX_UNWRAP_DEPTH,
        }
    }

    /// Set the maximum number of `{value: ...}` wrappers peeled per leaf
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Normalize raw avis metadata
    ///
    /// Returns `None` only when `raw` is absent or JSON `null`; any other input
    /// gives a fully shaped record whose unknown leaves are `None`.
    pub fn normalize(&self, raw: Option<&Value>) -> Option<CanonicalTenderMetadata> {
        let raw = raw.filter(|v| !v.is_null())?;

        let mut metadata = CanonicalTenderMetadata::default();
        for mapping in METADATA_FIELDS {
            *mapping.field.slot(&mut metadata) = self.resolve(raw, mapping);
        }

        metadata.lots = JsonParser::get_array(raw, LOTS_PATH, self.max_depth)
            .iter()
            .map(|lot| self.normalize_lot(lot))
            .collect();

        log::debug!(
            "Normalized tender metadata: reference={:?}, {} lot(s)",
            metadata.reference,
            metadata.lots.len()
        );

        Some(metadata)
    }

    /// Normalize one Phase-1 lot object
    pub fn normalize_lot(&self, raw: &Value) -> Lot {
        let raw = JsonParser::peel(raw, self.max_depth);
        let mut lot = Lot::default();
        for mapping in LOT_FIELDS {
            *mapping.field.slot(&mut lot) = self.resolve(raw, mapping);
        }
        lot
    }

    /// First source of `mapping` that yields a non-blank string
    fn resolve<F: Copy>(&self, raw: &Value, mapping: &FieldMapping<F>) -> Option<String> {
        mapping
            .sources()
            .find_map(|path: FieldPath| JsonParser::get_text(raw, path, self.max_depth))
    }
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
