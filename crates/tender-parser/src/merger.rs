//! Lot / article merger
//!
//! Joins Phase-1 lots with Phase-2 priced item groups on the lot number. The
//! join is exact string equality: `"01"` and `"1"` are different lots.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tender_core::{Lot, LotItemGroup, MergedLot, PricedItem};

/// Merge output together with reconciliation diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// One entry per input lot, in input order
    pub merged: Vec<MergedLot>,

    /// Group keys matching no Phase-1 lot, sorted
    pub orphan_groups: Vec<String>,

    /// Group keys present more than once, sorted; the last group won
    pub duplicate_keys: Vec<String>,
}

impl MergeReport {
    /// Whether the Phase-2 data joined cleanly
    pub fn is_clean(&self) -> bool {
        self.orphan_groups.is_empty() && self.duplicate_keys.is_empty()
    }
}

/// Lot / article merger
pub struct LotArticleMerger;

impl LotArticleMerger {
    /// Attach matching Phase-2 items to each lot
    ///
    /// The output always has one entry per input lot. Lots without a number never
    /// receive items; groups matching no lot are dropped; on duplicate group keys
    /// the later group wins.
    pub fn merge(lots: &[Lot], groups: &[LotItemGroup]) -> Vec<MergedLot> {
        Self::merge_with_report(lots, groups).merged
    }

    /// Same as [`merge`](Self::merge), also reporting orphan and duplicate group keys
    pub fn merge_with_report(lots: &[Lot], groups: &[LotItemGroup]) -> MergeReport {
        let mut index: HashMap<&str, &[PricedItem]> = HashMap::with_capacity(groups.len());
        let mut duplicates = BTreeSet::new();

        for group in groups {
            if index
                .insert(group.lot_number.as_str(), group.items.as_slice())
                .is_some()
            {
                log::warn!(
                    "Duplicate lot number '{}' in priced items, keeping the last group",
                    group.lot_number
                );
                duplicates.insert(group.lot_number.clone());
            }
        }

        let merged: Vec<MergedLot> = lots
            .iter()
            .map(|lot| MergedLot {
                lot: lot.clone(),
                items: lot
                    .lot_number
                    .as_deref()
                    .and_then(|number| index.get(number))
                    .map(|items| items.to_vec()),
            })
            .collect();

        let known: HashSet<&str> = lots
            .iter()
            .filter_map(|lot| lot.lot_number.as_deref())
            .collect();
        let orphans: BTreeSet<String> = index
            .keys()
            .filter(|key| !known.contains(*key))
            .map(|key| key.to_string())
            .collect();
        for orphan in &orphans {
            log::warn!("Priced items for lot '{}' match no lot of the notice", orphan);
        }

        MergeReport {
            merged,
            orphan_groups: orphans.into_iter().collect(),
            duplicate_keys: duplicates.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(number: &str) -> PricedItem {
        PricedItem {
            price_number: Some(number.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_join_correctness() {
        let lots = vec![Lot::with_number("1"), Lot::with_number("2"), Lot::default()];
        let groups = vec![LotItemGroup::new("1", vec![item("a"), item("b")])];

        let merged = LotArticleMerger::merge(&lots, &groups);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].items, Some(vec![item("a"), item("b")]));
        assert_eq!(merged[1].items, None);
        assert_eq!(merged[2].items, None);
        assert_eq!(merged[2].lot, Lot::default());
    }

    #[test]
    fn test_no_groups() {
        let lots = vec![Lot::with_number("1"), Lot::with_number("2")];
        let merged = LotArticleMerger::merge(&lots, &[]);
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|m| m.items.is_none()));
    }

    #[test]
    fn test_no_lots() {
        let groups = vec![LotItemGroup::new("1", vec![item("a")])];
        assert!(LotArticleMerger::merge(&[], &groups).is_empty());
    }

    #[test]
    fn test_exact_key_match() {
        let lots = vec![Lot::with_number("01"), Lot::with_number(" 2")];
        let groups = vec![
            LotItemGroup::new("1", vec![item("a")]),
            LotItemGroup::new("2", vec![item("b")]),
        ];
        let report = LotArticleMerger::merge_with_report(&lots, &groups);
        assert!(report.merged.iter().all(|m| m.items.is_none()));
        assert_eq!(report.orphan_groups, vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_duplicate_keys_last_write_wins() {
        let lots = vec![Lot::with_number("1")];
        let groups = vec![
            LotItemGroup::new("1", vec![item("old")]),
            LotItemGroup::new("1", vec![item("new")]),
        ];
        let report = LotArticleMerger::merge_with_report(&lots, &groups);
        assert_eq!(report.merged[0].items, Some(vec![item("new")]));
        assert_eq!(report.duplicate_keys, vec!["1".to_string()]);
        assert!(report.orphan_groups.is_empty());
        assert!(!report.is_clean());
    }

    #[test]
    fn test_empty_group_still_attaches() {
        let lots = vec![Lot::with_number("1")];
        let groups = vec![LotItemGroup::new("1", vec![])];
        let merged = LotArticleMerger::merge(&lots, &groups);
        assert_eq!(merged[0].items, Some(vec![]));
    }
}
