//! Tender SDK
//!
//! High-level API composing the reconciliation layer: schema normalization,
//! lot/article merging, contract derivation and contact parsing, driven by a
//! validated configuration.

pub mod builder;
pub mod config;
pub mod error;
pub mod reconciler;

// Re-export main types
pub use builder::TenderReconcilerBuilder;
pub use config::ReconcilerConfig;
pub use error::{Result, SdkError};
pub use reconciler::{TenderInput, TenderReconciler, TenderView};

// Re-export commonly used types from dependencies
pub use tender_core::{
    AmountFormat, CanonicalTenderMetadata, ContactRecord, ContractDetails, Lot, LotItemGroup,
    MergedLot, PricedItem,
};
pub use tender_parser::{BordereauSummary, MergeReport};
