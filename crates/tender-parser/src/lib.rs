//! Tender Parser - Raw extraction JSON to canonical tender records
//!
//! This crate turns the semi-structured output of the extraction pipeline into
//! the canonical types of `tender-core`. Every reconciliation entry point is
//! total: malformed or partial input degrades to `None` leaves and empty
//! sequences, never to an error or a panic.

pub mod bordereau;
pub mod contact;
pub mod contract;
pub mod error;
pub mod json_extractor;
pub mod json_parser;
pub mod merger;
pub mod normalizer;
pub mod schema;

// Re-export main parser types
pub use bordereau::{BordereauAccumulator, BordereauParser, BordereauSummary};
pub use contact::{ContactLineKind, ContactParser};
pub use contract::{
    normalize_delay, parse_penalty_rate, parse_percentage, ContractDerivation, DelayUnit,
};
pub use error::{ParseError, Result};
pub use json_extractor::JsonExtractor;
pub use json_parser::JsonParser;
pub use merger::{LotArticleMerger, MergeReport};
pub use normalizer::FieldNormalizer;
