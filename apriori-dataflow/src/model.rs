//! The wire-level data model for the Apriori pipeline: items, itemsets, transactions,
//! and the two record shapes (`F_k`, `C_k`) that flow between jobs.
//!
//! Every itemset constructed through this module is canonical (sorted, deduplicated)
//! by construction: there is no other way to build an `Itemset` than through
//! [`Itemset::canonical`] or parsing, so the sort invariant never needs re-checking
//! downstream.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single opaque item. Non-empty, contains no whitespace.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Item(String);

impl Item {
    /// Builds an item, rejecting empty strings or strings containing whitespace.
    pub fn new(raw: impl Into<String>) -> Option<Item> {
        let raw = raw.into();
        if raw.is_empty() || raw.chars().any(char::is_whitespace) {
            return None;
        }
        Some(Item(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A finite, non-empty, canonically-sorted, deduplicated set of items.
///
/// `Itemset` can only be constructed already-canonical: there is no setter that lets
/// callers insert items out of order, so every `Itemset` in the system satisfies I1
/// by construction rather than by later validation.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Itemset(Vec<Item>);

impl Itemset {
    /// Builds the canonical form of a (possibly unsorted, possibly duplicated)
    /// collection of items. Returns `None` for an empty input — itemsets are never
    /// empty.
    pub fn canonical(items: impl IntoIterator<Item = Item>) -> Option<Itemset> {
        let mut items: Vec<Item> = items.into_iter().collect();
        items.sort();
        items.dedup();
        if items.is_empty() {
            return None;
        }
        Some(Itemset(items))
    }

    /// Parses the canonical wire form: items separated by single spaces.
    pub fn parse(s: &str) -> Option<Itemset> {
        let items = s
            .split_whitespace()
            .map(Item::new)
            .collect::<Option<Vec<_>>>()?;
        Itemset::canonical(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.0
    }

    /// True iff every item of `self` is also in `other` (subset test, `S ⊆ T`).
    ///
    /// Both sides are sorted, so this runs in `O(|self| + |other|)` via a merge scan
    /// rather than a hash lookup per item.
    pub fn is_subset(&self, other: &Itemset) -> bool {
        let mut other_iter = other.0.iter();
        'outer: for item in &self.0 {
            for candidate in other_iter.by_ref() {
                if candidate == item {
                    continue 'outer;
                }
                if candidate > item {
                    return false;
                }
            }
            return false;
        }
        true
    }

    /// The first `len - 1` items, in order — the "prefix" of a canonically-sorted
    /// itemset.
    pub fn prefix(&self) -> &[Item] {
        &self.0[..self.0.len() - 1]
    }

    /// The last item — the "postfix" of a canonically-sorted itemset.
    pub fn postfix(&self) -> &Item {
        &self.0[self.0.len() - 1]
    }

    /// Builds a new canonical itemset from a prefix slice plus extra items.
    pub fn from_prefix_and_extra(prefix: &[Item], extra: impl IntoIterator<Item = Item>) -> Itemset {
        let mut items: Vec<Item> = prefix.to_vec();
        items.extend(extra);
        items.sort();
        items.dedup();
        Itemset(items)
    }

    /// Drops the item at `index`, returning the resulting (k-1)-itemset.
    pub fn without_index(&self, index: usize) -> Itemset {
        let mut items = self.0.clone();
        items.remove(index);
        Itemset(items)
    }

    pub fn to_wire(&self) -> String {
        self.0
            .iter()
            .map(Item::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

/// A transaction: an opaque id plus the itemset it contains.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    pub tid: String,
    pub items: Itemset,
}

impl Transaction {
    /// Parses a `<tid>\t<item1 item2 ...>` line. Returns `None` (silently skipped by
    /// callers) on any malformed input: wrong tab-field count, empty tid, or an
    /// itemset that fails to parse.
    pub fn parse_line(line: &str) -> Option<Transaction> {
        let mut fields = line.splitn(3, '\t');
        let tid = fields.next()?.trim();
        let rest = fields.next()?;
        if fields.next().is_some() {
            return None;
        }
        if tid.is_empty() {
            return None;
        }
        let items = Itemset::parse(rest.trim())?;
        Some(Transaction {
            tid: tid.to_string(),
            items,
        })
    }
}

/// A frequent-itemset record: a canonical itemset plus its exact support count.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrequentItemset {
    pub itemset: Itemset,
    pub support: u64,
}

impl FrequentItemset {
    /// Parses `"<sorted items>\t<support>"`. Malformed lines (not exactly two
    /// tab-fields, non-integer support) are skipped by returning `None`.
    pub fn parse_line(line: &str) -> Option<FrequentItemset> {
        let mut fields = line.splitn(3, '\t');
        let itemset_str = fields.next()?;
        let support_str = fields.next()?;
        if fields.next().is_some() {
            return None;
        }
        let itemset = Itemset::parse(itemset_str)?;
        let support: u64 = support_str.trim().parse().ok()?;
        Some(FrequentItemset { itemset, support })
    }

    pub fn to_wire(&self) -> String {
        format!("{}\t{}", self.itemset.to_wire(), self.support)
    }
}

/// Minimum-support threshold, always resolved to an absolute transaction count before
/// any job sees it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub struct MinSupport(pub u64);

impl MinSupport {
    /// `⌊p · n⌋`, the contract of the Support Converter job.
    pub fn from_decimal(p: f64, n: u64) -> MinSupport {
        MinSupport(((p * n as f64).floor()) as u64)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_rejects_whitespace_and_empty() {
        assert!(Item::new("").is_none());
        assert!(Item::new("a b").is_none());
        assert!(Item::new("a\tb").is_none());
        assert_eq!(Item::new("hotdogs").unwrap().as_str(), "hotdogs");
    }

    #[test]
    fn itemset_canonical_sorts_and_dedups() {
        let items = vec![
            Item::new("c").unwrap(),
            Item::new("a").unwrap(),
            Item::new("a").unwrap(),
            Item::new("b").unwrap(),
        ];
        let itemset = Itemset::canonical(items).unwrap();
        assert_eq!(itemset.to_wire(), "a b c");
        assert_eq!(itemset.len(), 3);
    }

    #[test]
    fn itemset_rejects_empty() {
        assert!(Itemset::canonical(Vec::new()).is_none());
    }

    #[test]
    fn itemset_parse_roundtrips() {
        let itemset = Itemset::parse("c a b").unwrap();
        assert_eq!(itemset.to_wire(), "a b c");
    }

    #[test]
    fn is_subset_basic() {
        let small = Itemset::parse("a c").unwrap();
        let big = Itemset::parse("a b c d").unwrap();
        assert!(small.is_subset(&big));
        assert!(!big.is_subset(&small));
        assert!(small.is_subset(&small));
    }

    #[test]
    fn prefix_and_postfix() {
        let itemset = Itemset::parse("a b c").unwrap();
        assert_eq!(
            itemset.prefix().iter().map(Item::as_str).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert_eq!(itemset.postfix().as_str(), "c");
    }

    #[test]
    fn without_index_drops_one_item() {
        let itemset = Itemset::parse("a b c").unwrap();
        assert_eq!(itemset.without_index(1).to_wire(), "a c");
    }

    #[test]
    fn transaction_parse_line_well_formed() {
        let t = Transaction::parse_line("t1\ta b c").unwrap();
        assert_eq!(t.tid, "t1");
        assert_eq!(t.items.to_wire(), "a b c");
    }

    #[test]
    fn transaction_parse_line_malformed_is_skipped() {
        assert!(Transaction::parse_line("garbage_no_tab").is_none());
        assert!(Transaction::parse_line("\t\t").is_none());
        assert!(Transaction::parse_line("\t").is_none());
    }

    #[test]
    fn transaction_parse_line_rejects_extra_tab_field() {
        assert!(Transaction::parse_line("t1\ta b\tc").is_none());
    }

    #[test]
    fn frequent_itemset_parse_and_wire() {
        let f = FrequentItemset::parse_line("a b\t3").unwrap();
        assert_eq!(f.itemset.to_wire(), "a b");
        assert_eq!(f.support, 3);
        assert_eq!(f.to_wire(), "a b\t3");
    }

    #[test]
    fn frequent_itemset_parse_line_rejects_extra_tab_field() {
        assert!(FrequentItemset::parse_line("a b\t3\t4").is_none());
    }

    #[test]
    fn min_support_from_decimal_floors() {
        assert_eq!(MinSupport::from_decimal(0.0, 4).get(), 0);
        assert_eq!(MinSupport::from_decimal(1.0, 4).get(), 4);
        assert_eq!(MinSupport::from_decimal(0.5, 4).get(), 2);
        assert_eq!(MinSupport::from_decimal(0.5, 0).get(), 0);
    }
}
