//! Canonical tender metadata

use super::lot::Lot;
use serde::{Deserialize, Serialize};

/// Tender notice metadata reconciled from either extraction schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalTenderMetadata {
    pub reference: Option<String>,
    pub procedure_type: Option<String>,
    pub issuing_institution: Option<String>,
    pub execution_location: Option<String>,
    pub submission_deadline: SubmissionDeadline,
    pub bid_opening_location: Option<String>,
    pub subject: Option<String>,
    pub total_estimate: TotalEstimate,
    pub lots: Vec<Lot>,
}

/// Bid submission deadline; date and time are resolved independently
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDeadline {
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Total estimate as displayed in the source, with its currency label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalEstimate {
    pub amount: Option<String>,
    pub currency: Option<String>,
}

impl CanonicalTenderMetadata {
    /// Names of the fields a usable tender record must carry but this one lacks
    ///
    /// Required: reference, issuing institution, subject and submission date.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let required = [
            ("reference", self.reference.is_some()),
            ("issuingInstitution", self.issuing_institution.is_some()),
            ("subject", self.subject.is_some()),
            ("submissionDeadline.date", self.submission_deadline.date.is_some()),
        ];

        required
            .iter()
            .filter(|(_, present)| !present)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Whether every required field is present
    pub fn is_complete(&self) -> bool {
        self.missing_required_fields().is_empty()
    }

    /// Lot numbers in document order, skipping lots without one
    pub fn lot_numbers(&self) -> Vec<&str> {
        self.lots
            .iter()
            .filter_map(|lot| lot.lot_number.as_deref())
            .collect()
    }
}
