//! Derived contract terms

use serde::{Deserialize, Serialize};

/// Contract terms normalized from CPS/RC extraction output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDetails {
    /// Canonical delay such as `"30 Jours"` or `"3 Mois"`
    pub execution_delay: Option<String>,
    pub late_penalty: LatePenalty,
    pub award_mode: Option<String>,
    pub final_guarantee: FinalGuarantee,
}

/// Late-delivery penalty (pénalité de retard)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatePenalty {
    /// Daily rate, in percent of the contract amount
    pub daily_rate_percent: Option<f64>,
    /// Cap, in percent of the contract amount
    pub cap_percent: Option<f64>,
}

/// Final performance guarantee (caution définitive)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalGuarantee {
    pub rate_percent: Option<f64>,
    /// Formatted amount, present only when both estimate and rate parsed
    pub estimated_amount: Option<String>,
}
