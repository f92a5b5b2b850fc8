//! TenderReconciler - composes the reconciliation layer
//!
//! Takes the raw outputs of both extraction phases and returns one
//! presentation-ready [`TenderView`]. Every call recomputes from its inputs;
//! callers that re-render often should memoize on the raw inputs.

use crate::config::ReconcilerConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tender_core::{
    CanonicalTenderMetadata, ContactRecord, ContractDetails, LotItemGroup, MergedLot,
    TotalEstimate,
};
use tender_parser::{
    BordereauAccumulator, BordereauParser, BordereauSummary, ContactParser, ContractDerivation, FieldNormalizer,
    JsonExtractor, JsonParser, LotArticleMerger, MergeReport,
};

/// Location of the website contact block inside the avis metadata
const CONTACT_PATH: &[&str] = &["website_extended", "contact_administratif"];

/// Raw inputs of one tender, borrowed from the caller
#[derive(Debug, Clone, Copy, Default)]
pub struct TenderInput<'a> {
    /// Phase-1 avis metadata
    pub avis: Option<&'a Value>,
    /// Phase-2 bordereau des prix
    pub bordereau: Option<&'a Value>,
    /// Contract details extracted from CPS/RC
    pub contract: Option<&'a Value>,
    /// Free-text administrative contact block
    pub contact_text: Option<&'a str>,
}

impl<'a> TenderInput<'a> {
    /// Create an input from the avis metadata alone
    pub fn new(avis: &'a Value) -> Self {
        Self {
            avis: Some(avis),
            ..Default::default()
        }
    }

    pub fn with_bordereau(mut self, bordereau: &'a Value) -> Self {
        self.bordereau = Some(bordereau);
        self
    }

    pub fn with_contract(mut self, contract: &'a Value) -> Self {
        self.contract = Some(contract);
        self
    }

    pub fn with_contact_text(mut self, text: &'a str) -> Self {
        self.contact_text = Some(text);
        self
    }
}

/// Presentation-ready view of one tender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderView {
    pub metadata: CanonicalTenderMetadata,
    /// Phase-1 lots with their Phase-2 items
    pub lots: Vec<MergedLot>,
    /// Phase-2 lot numbers matching no Phase-1 lot
    pub orphan_groups: Vec<String>,
    /// Phase-2 lot numbers present more than once
    pub duplicate_groups: Vec<String>,
    pub bordereau: BordereauSummary,
    pub contract: ContractDetails,
    /// `None` when no contact text was available
    pub contact: Option<ContactRecord>,
    /// Required metadata fields that are missing
    pub missing_fields: Vec<String>,
}

impl TenderView {
    /// Whether every required metadata field is present
    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }
}

/// Reconciliation facade
#[derive(Debug, Clone)]
pub struct TenderReconciler {
    config: ReconcilerConfig,
    normalizer: FieldNormalizer,
    bordereau_parser: BordereauParser,
    contract_derivation: ContractDerivation,
}

impl TenderReconciler {
    /// Create a reconciler from an already validated configuration
    ///
    /// Use [`TenderReconcilerBuilder`](crate::TenderReconcilerBuilder) to validate.
    pub fn new(config: ReconcilerConfig) -> Self {
        let depth = config.max_unwrap_depth;
        Self {
            normalizer: FieldNormalizer::new().with_max_depth(depth),
            bordereau_parser: BordereauParser::new().with_max_depth(depth),
            contract_derivation: ContractDerivation::new()
                .with_max_depth(depth)
                .with_amount_format(config.amount_format.clone()),
            config,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Reconcile every input of a tender
    ///
    /// Returns `None` only when the avis metadata is absent.
    pub fn reconcile(&self, input: &TenderInput<'_>) -> Option<TenderView> {
        let metadata = self.normalize_metadata(input.avis)?;
        let groups = self.bordereau_parser.parse_groups(input.bordereau);
        let report = LotArticleMerger::merge_with_report(&metadata.lots, &groups);
        let bordereau = BordereauSummary::from_raw(input.bordereau, &groups);
        let contract = self.derive_contract(input.contract, &metadata.total_estimate);

        let contact_text = input
            .contact_text
            .map(str::to_string)
            .or_else(|| self.contact_text_from_avis(input.avis));
        let contact = contact_text.map(|text| ContactParser::parse(&text));

        if !report.is_clean() {
            tracing::warn!(
                orphans = ?report.orphan_groups,
                duplicates = ?report.duplicate_keys,
                "Priced items did not join cleanly with the notice lots"
            );
        }
        tracing::debug!(
            reference = ?metadata.reference,
            lots = report.merged.len(),
            articles = bordereau.total_articles,
            "Reconciled tender"
        );

        let missing_fields = metadata
            .missing_required_fields()
            .into_iter()
            .map(str::to_string)
            .collect();

        Some(TenderView {
            metadata,
            lots: report.merged,
            orphan_groups: report.orphan_groups,
            duplicate_groups: report.duplicate_keys,
            bordereau,
            contract,
            contact,
            missing_fields,
        })
    }

    /// Normalize raw avis metadata
    pub fn normalize_metadata(&self, raw: Option<&Value>) -> Option<CanonicalTenderMetadata> {
        self.normalizer.normalize(raw)
    }

    /// Extract the JSON payload of a Phase-1 response and normalize it
    pub fn normalize_response(&self, response: &str) -> Result<Option<CanonicalTenderMetadata>> {
        let raw = JsonExtractor::extract_object(response)?;
        Ok(self.normalize_metadata(Some(&raw)))
    }

    /// Join the metadata lots with the priced items of a raw bordereau
    pub fn merge_lots(
        &self,
        metadata: &CanonicalTenderMetadata,
        raw_bordereau: Option<&Value>,
    ) -> MergeReport {
        let groups = self.bordereau_parser.parse_groups(raw_bordereau);
        LotArticleMerger::merge_with_report(&metadata.lots, &groups)
    }

    /// Combine several bordereau extraction passes into one set of lot groups
    ///
    /// When no pass yields an article, the notice lots come back as empty groups.
    pub fn accumulate_bordereau(
        &self,
        passes: &[Value],
        metadata: &CanonicalTenderMetadata,
    ) -> Vec<LotItemGroup> {
        let mut accumulator = BordereauAccumulator::new();
        for pass in passes {
            accumulator.add_raw(&self.bordereau_parser, pass);
        }
        accumulator.into_groups_with_lots(&metadata.lot_numbers())
    }

    /// Derive contract terms against a total estimate
    pub fn derive_contract(
        &self,
        raw: Option<&Value>,
        estimate: &TotalEstimate,
    ) -> ContractDetails {
        self.contract_derivation.derive(raw, estimate)
    }

    /// Contact block stored by the scraper under `website_extended`
    pub fn contact_text_from_avis(&self, avis: Option<&Value>) -> Option<String> {
        if !self.config.contact_fallback {
            return None;
        }
        avis.and_then(|a| JsonParser::get_text(a, CONTACT_PATH, self.config.max_unwrap_depth))
    }
}

impl Default for TenderReconciler {
    fn default() -> Self {
        Self::new(ReconcilerConfig::default())
    }
}
