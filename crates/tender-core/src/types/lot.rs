//! Lot and priced item types

use serde::{Deserialize, Serialize};

/// Phase-1 lot from the tender notice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    /// Business key shared with Phase-2 data
    pub lot_number: Option<String>,
    pub subject: Option<String>,
    pub estimate: Option<String>,
    pub provisional_guarantee: Option<String>,
}

impl Lot {
    /// Create a lot carrying only its number
    pub fn with_number(lot_number: impl Into<String>) -> Self {
        Self {
            lot_number: Some(lot_number.into()),
            ..Default::default()
        }
    }
}

/// One line of the priced schedule (bordereau des prix)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedItem {
    pub price_number: Option<String>,
    pub designation: Option<String>,
    pub unit: Option<String>,
    pub quantity: Option<String>,
}

/// Phase-2 priced items of one lot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotItemGroup {
    /// Join key, compared by exact string equality
    pub lot_number: String,
    pub items: Vec<PricedItem>,
}

impl LotItemGroup {
    /// Create a group
    pub fn new(lot_number: impl Into<String>, items: Vec<PricedItem>) -> Self {
        Self {
            lot_number: lot_number.into(),
            items,
        }
    }
}

/// A Phase-1 lot with the Phase-2 items that matched its number
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedLot {
    #[serde(flatten)]
    pub lot: Lot,

    /// `None` when no group matched; omitted from serialized output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<PricedItem>>,
}
