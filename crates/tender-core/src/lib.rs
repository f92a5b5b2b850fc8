//! Tender Core - Canonical types for the tender reconciliation layer
//!
//! This crate provides the fundamental types shared by the parser and SDK crates:
//! - Canonical tender records (metadata, lots, priced items, contacts, contract terms)
//! - The `{value: X}` unwrapping convention used by AI-produced JSON
//! - Amount parsing and display formatting
//! - Error types

pub mod amount;
pub mod error;
pub mod leaf;
pub mod types;

// Re-export commonly used types
pub use amount::{parse_amount, AmountFormat};
pub use error::CoreError;
pub use leaf::{unwrap_value, unwrap_value_with_depth, Leaf, MAX_UNWRAP_DEPTH};
pub use types::{
    CanonicalTenderMetadata, ContactRecord, ContractDetails, FinalGuarantee, LatePenalty, Lot,
    LotItemGroup, MergedLot, PricedItem, SubmissionDeadline, TotalEstimate,
};
