//! Canonical record types
//!
//! These are the presentation-ready shapes handed to rendering code:
//! - Tender metadata with its Phase-1 lots
//! - Phase-2 priced items grouped by lot, and the merged lot view
//! - Administrative contact
//! - Derived contract terms
//!
//! Every text leaf is either a non-empty string or `None`.

pub mod contact;
pub mod contract;
pub mod lot;
pub mod metadata;

pub use contact::ContactRecord;
pub use contract::{ContractDetails, FinalGuarantee, LatePenalty};
pub use lot::{Lot, LotItemGroup, MergedLot, PricedItem};
pub use metadata::{CanonicalTenderMetadata, SubmissionDeadline, TotalEstimate};
