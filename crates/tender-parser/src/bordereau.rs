//! Phase-2 bordereau des prix decoding
//!
//! The extraction backend emits priced items as
//! `{ "lots_articles": [{ "numero_lot": ..., "articles": [...] }], "_completeness": {...} }`,
//! possibly over several passes on different documents. This module decodes that
//! shape into [`LotItemGroup`]s, accumulates passes, and summarizes completeness.

use crate::json_parser::JsonParser;
use crate::schema::{GROUP_ITEMS_PATHS, GROUP_LOT_NUMBER_PATHS, ITEM_FIELDS, LOT_GROUPS_PATH};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tender_core::{LotItemGroup, PricedItem, MAX_UNWRAP_DEPTH};

/// Lot number assumed for a group that names none (single-lot tenders)
pub const DEFAULT_LOT_NUMBER: &str = "1";

/// Decoder for raw bordereau objects
#[derive(Debug, Clone)]
pub struct BordereauParser {
    max_depth: usize,
}

impl BordereauParser {
    /// Create a parser with the default unwrap depth
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

    /// Decode every lot group of a raw bordereau, in source order
    pub fn parse_groups(&self, raw: Option<&Value>) -> Vec<LotItemGroup> {
        let Some(raw) = raw else {
            return Vec::new();
        };

        JsonParser::get_array(raw, LOT_GROUPS_PATH, self.max_depth)
            .iter()
            .map(|group| self.parse_group(group))
            .collect()
    }

    /// Decode one `{numero_lot, articles}` entry
    pub fn parse_group(&self, raw: &Value) -> LotItemGroup {
        let raw = JsonParser::peel(raw, self.max_depth);
        let lot_number = GROUP_LOT_NUMBER_PATHS
            .iter()
            .find_map(|path| JsonParser::get_text(raw, path, self.max_depth))
            .unwrap_or_else(|| DEFAULT_LOT_NUMBER.to_string());

        let items = GROUP_ITEMS_PATHS
            .iter()
            .map(|path| JsonParser::get_array(raw, path, self.max_depth))
            .find(|items| !items.is_empty())
            .unwrap_or(&[])
            .iter()
            .map(|item| self.parse_item(item))
            .collect();

        LotItemGroup { lot_number, items }
    }

    /// Decode one article
    pub fn parse_item(&self, raw: &Value) -> PricedItem {
        let raw = JsonParser::peel(raw, self.max_depth);
        let mut item = PricedItem::default();
        for mapping in ITEM_FIELDS {
            *mapping.field.slot(&mut item) = mapping
                .sources()
                .find_map(|path| JsonParser::get_text(raw, path, self.max_depth));
        }
        item
    }
}

impl Default for BordereauParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Merges the groups produced by several extraction passes
///
/// Groups are keyed by lot number. Within a lot, an article whose price number
/// was already seen is skipped; articles without a price number are always kept.
#[derive(Debug, Default)]
pub struct BordereauAccumulator {
    lots: HashMap<String, Vec<PricedItem>>,
    seen: HashMap<String, HashSet<String>>,
}

impl BordereauAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the groups of one pass, returning how many articles were new
    pub fn add_groups(&mut self, groups: Vec<LotItemGroup>) -> usize {
        let mut added = 0;
        for group in groups {
            let items = self.lots.entry(group.lot_number.clone()).or_default();
            let seen = self.seen.entry(group.lot_number).or_default();
            for item in group.items {
                if let Some(number) = &item.price_number {
                    if !seen.insert(number.clone()) {
                        continue;
                    }
                }
                items.push(item);
                added += 1;
            }
        }
        added
    }

    /// Decode a raw bordereau pass and add its groups
    pub fn add_raw(&mut self, parser: &BordereauParser, raw: &Value) -> usize {
        let added = self.add_groups(parser.parse_groups(Some(raw)));
        log::debug!("Bordereau pass added {} article(s), {} total", added, self.total_items());
        added
    }

    /// Number of articles accumulated so far
    pub fn total_items(&self) -> usize {
        self.lots.values().map(Vec::len).sum()
    }

    /// Consume the accumulator into groups ordered by lot number
    ///
    /// Numeric lot numbers sort numerically and come before non-numeric ones.
    pub fn into_groups(self) -> Vec<LotItemGroup> {
        let mut groups: Vec<LotItemGroup> = self
            .lots
            .into_iter()
            .map(|(lot_number, items)| LotItemGroup { lot_number, items })
            .collect();
        groups.sort_by(|a, b| lot_sort_key(&a.lot_number).cmp(&lot_sort_key(&b.lot_number)));
        groups
    }

    /// Consume the accumulator, keeping the notice lots visible when no pass found articles
    ///
    /// With at least one article this is [`into_groups`](Self::into_groups). Otherwise
    /// each of `known_lots` (typically
    /// [`CanonicalTenderMetadata::lot_numbers`](tender_core::CanonicalTenderMetadata::lot_numbers))
    /// becomes an empty group, in the given order without repeats.
    pub fn into_groups_with_lots(self, known_lots: &[&str]) -> Vec<LotItemGroup> {
        if self.total_items() > 0 || known_lots.is_empty() {
            return self.into_groups();
        }

        log::debug!(
            "No article found in any pass, keeping {} notice lot(s) as empty groups",
            known_lots.len()
        );
        let mut seen = HashSet::new();
        known_lots
            .iter()
            .filter(|lot| seen.insert(**lot))
            .map(|lot| LotItemGroup::new(*lot, Vec::new()))
            .collect()
    }
}

fn lot_sort_key(lot_number: &str) -> (u64, &str) {
    (lot_number.trim().parse::<u64>().unwrap_or(u64::MAX), lot_number)
}

/// Completeness figures of a bordereau extraction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BordereauSummary {
    pub is_complete: bool,
    pub total_articles: usize,
    pub lots_count: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCompleteness {
    is_complete: Option<bool>,
    total_articles: Option<usize>,
    lots_count: Option<usize>,
}

impl BordereauSummary {
    /// Compute the summary from decoded groups
    pub fn from_groups(groups: &[LotItemGroup]) -> Self {
        let total_articles = groups.iter().map(|g| g.items.len()).sum();
        Self {
            is_complete: total_articles > 0,
            total_articles,
            lots_count: groups.len(),
        }
    }

    /// Read `_completeness` from the raw bordereau, computing missing figures from `groups`
    pub fn from_raw(raw: Option<&Value>, groups: &[LotItemGroup]) -> Self {
        let computed = Self::from_groups(groups);
        let reported = raw
            .and_then(|r| r.get("_completeness"))
            .and_then(|c| serde_json::from_value::<RawCompleteness>(c.clone()).ok())
            .unwrap_or_default();

        Self {
            is_complete: reported.is_complete.unwrap_or(computed.is_complete),
            total_articles: reported.total_articles.unwrap_or(computed.total_articles),
            lots_count: reported.lots_count.unwrap_or(computed.lots_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn numbered(number: &str) -> PricedItem {
        PricedItem {
            price_number: Some(number.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_groups() {
        let raw = json!({
            "lots_articles": [
                {
                    "numero_lot": 2,
                    "articles": [
                        { "numero_prix": "1", "designation": "Ciment CPJ45", "unite": "T", "quantite": 40 },
                        { "price_number": { "value": "2" }, "description": "Sable", "unit": "m3" }
                    ]
                },
                { "articles": [] }
            ]
        });
        let groups = BordereauParser::new().parse_groups(Some(&raw));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].lot_number, "2");
        assert_eq!(groups[0].items[0].quantity.as_deref(), Some("40"));
        assert_eq!(groups[0].items[1].price_number.as_deref(), Some("2"));
        assert_eq!(groups[0].items[1].designation.as_deref(), Some("Sable"));
        assert_eq!(groups[0].items[1].quantity, None);
        assert_eq!(groups[1].lot_number, DEFAULT_LOT_NUMBER);
        assert!(groups[1].items.is_empty());
    }

    #[test]
    fn test_parse_groups_malformed() {
        let parser = BordereauParser::new();
        assert!(parser.parse_groups(None).is_empty());
        assert!(parser.parse_groups(Some(&json!({ "lots_articles": "none" }))).is_empty());
        assert!(parser.parse_groups(Some(&json!([1, 2]))).is_empty());
    }

    #[test]
    fn test_accumulator_dedups_by_price_number() {
        let mut acc = BordereauAccumulator::new();
        let first = acc.add_groups(vec![LotItemGroup::new(
            "1",
            vec![numbered("1"), numbered("2")],
        )]);
        let second = acc.add_groups(vec![LotItemGroup::new(
            "1",
            vec![numbered("2"), numbered("3"), PricedItem::default(), PricedItem::default()],
        )]);
        assert_eq!(first, 2);
        assert_eq!(second, 3);
        assert_eq!(acc.total_items(), 5);
    }

    #[test]
    fn test_accumulator_orders_lots() {
        let mut acc = BordereauAccumulator::new();
        acc.add_groups(vec![
            LotItemGroup::new("10", vec![numbered("1")]),
            LotItemGroup::new("B", vec![numbered("1")]),
            LotItemGroup::new("2", vec![numbered("1")]),
        ]);
        let order: Vec<String> = acc.into_groups().into_iter().map(|g| g.lot_number).collect();
        assert_eq!(order, vec!["2", "10", "B"]);
    }

    #[test]
    fn test_accumulator_falls_back_to_notice_lots() {
        let mut acc = BordereauAccumulator::new();
        acc.add_groups(vec![LotItemGroup::new("1", vec![])]);
        let groups = acc.into_groups_with_lots(&["1", "2", "1"]);
        assert_eq!(
            groups,
            vec![LotItemGroup::new("1", vec![]), LotItemGroup::new("2", vec![])]
        );

        let summary = BordereauSummary::from_groups(&groups);
        assert!(!summary.is_complete);
        assert_eq!(summary.total_articles, 0);
        assert_eq!(summary.lots_count, 2);
    }

    #[test]
    fn test_accumulator_keeps_found_articles_over_notice_lots() {
        let mut acc = BordereauAccumulator::new();
        acc.add_groups(vec![LotItemGroup::new("2", vec![numbered("1")])]);
        let groups = acc.into_groups_with_lots(&["1", "2"]);
        assert_eq!(groups, vec![LotItemGroup::new("2", vec![numbered("1")])]);

        assert!(BordereauAccumulator::new().into_groups_with_lots(&[]).is_empty());
    }

    #[test]
    fn test_accumulator_add_raw() {
        let parser = BordereauParser::new();
        let mut acc = BordereauAccumulator::new();
        let pass = json!({
            "lots_articles": [{ "numero_lot": "1", "articles": [{ "numero_prix": "1" }] }]
        });
        assert_eq!(acc.add_raw(&parser, &pass), 1);
        assert_eq!(acc.add_raw(&parser, &pass), 0);
    }

    #[test]
    fn test_summary_prefers_reported_figures() {
        let groups = vec![LotItemGroup::new("1", vec![numbered("1")])];
        let raw = json!({ "_completeness": { "is_complete": false, "total_articles": 12 } });
        let summary = BordereauSummary::from_raw(Some(&raw), &groups);
        assert!(!summary.is_complete);
        assert_eq!(summary.total_articles, 12);
        assert_eq!(summary.lots_count, 1);
    }

    #[test]
    fn test_summary_computed() {
        let summary = BordereauSummary::from_raw(None, &[]);
        assert_eq!(summary, BordereauSummary::default());

        let groups = vec![
            LotItemGroup::new("1", vec![numbered("1"), numbered("2")]),
            LotItemGroup::new("2", vec![]),
        ];
        let summary = BordereauSummary::from_groups(&groups);
        assert!(summary.is_complete);
        assert_eq!(summary.total_articles, 2);
        assert_eq!(summary.lots_count, 2);
    }
}
