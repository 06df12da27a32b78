//! Candidate Generator for level `k ≥ 3`: given every frequent `k`-itemset, produce
//! every `(k+1)`-candidate whose `k`-subsets are all frequent.
//!
//! Three chained shuffle-reduce stages, each one feeding the next directly since
//! [`runtime::shuffle_reduce`] already returns a stream shaped as the next stage's
//! `(key, value)` input:
//!
//! 1. Group frequent itemsets by their `(k-1)`-item prefix. Within a group, every pair
//!    of distinct postfixes forms a `(k+1)`-candidate (prefix + two postfixes), and
//!    every `k`-subset of that candidate is re-keyed as a probe for the next stage.
//!    Each original itemset's own support is also re-emitted, keyed by itself, so the
//!    next stage can recognize it as frequent.
//! 2. Group probes by subset. A subset is frequent iff one of the group's entries is
//!    that itemset's own (known) support; every candidate waiting on this subset then
//!    receives either that support or `None`.
//! 3. Group by candidate. A candidate survives iff it received at least one subset
//!    answer and none of them were `None` (every required subset is frequent).
//!
//! This is a direct re-expression of the three-`MRStep` pipeline in
//! `candidate_generator.py` (`prefix_mapper` → `checking_subsets_generating_reducer` →
//! `identical_mapper` → `subset_validating_reducer` → `identical_mapper` →
//! `candidate_pruning_reducer`), using a typed `SubsetProbe` enum in place of the
//! string-packed `"item:support"` records and the `UNEXISTED_SUPPORT = -1` sentinel.
//! The Python source special-cases a one-item prefix (processing `F_2` into `C_3`) to
//! skip generating sub-prefix combinations; that special case and the general formula
//! produce identical output (choosing 0 elements from a 1-item prefix yields exactly
//! one empty combination either way), so this version does not need the branch.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use timely::dataflow::operators::ToStream;

use crate::error::JobError;
use crate::model::{FrequentItemset, Item, Itemset};
use crate::runtime::{self, Runner};

#[derive(Clone, Debug)]
enum SubsetProbe {
    /// This itemset is itself one of the frequent itemsets given as input.
    Known { support: u64 },
    /// `candidate` requires the key itemset to be frequent.
    Needs { candidate: Itemset },
}

/// Generates `C_{level+1}` from the frequent `level`-itemsets in `input_files`.
pub fn generate_candidate_itemsets(
    input_files: &[PathBuf],
    runner: Runner,
) -> Result<Vec<Itemset>, JobError> {
    let files = input_files.to_vec();
    let records = runtime::run_job(runner, move |worker| {
        let index = worker.index();
        let peers = worker.peers();

        let mut stage1_input: Vec<(Itemset, (Item, u64))> = Vec::new();
        for path in &files {
            if let Ok(lines) = runtime::read_lines_for_worker(path, index, peers) {
                for line in lines {
                    if let Some(frequent) = FrequentItemset::parse_line(&line) {
                        if frequent.itemset.len() < 2 {
                            continue;
                        }
                        let prefix = Itemset::canonical(frequent.itemset.prefix().to_vec())
                            .expect("a frequent itemset of length >= 2 has a non-empty prefix");
                        let postfix = frequent.itemset.postfix().clone();
                        stage1_input.push((prefix, (postfix, frequent.support)));
                    }
                }
            }
        }

        let sink = Rc::new(RefCell::new(Vec::new()));
        let sink_handle = Rc::clone(&sink);
        worker.dataflow::<usize, _, _>(|scope| {
            let stream1 = stage1_input.to_stream(scope);

            let stream2 = runtime::shuffle_reduce(&stream1, "candgen-prefix-join", |prefix, values| {
                prefix_join(prefix, values)
            });

            let stream3 =
                runtime::shuffle_reduce(&stream2, "candgen-validate-subsets", |subset, values| {
                    validate_subset(subset, values)
                });

            let final_stream =
                runtime::shuffle_reduce(&stream3, "candgen-prune", |candidate, values| {
                    prune_candidate(candidate, values)
                });

            runtime::capture_into(&final_stream, sink_handle);
        });
        runtime::run_to_completion(worker);

        sink.borrow().clone()
    })?;

    Ok(records)
}

/// Stage 1: given the frequent itemsets sharing `prefix`, emit each one's own support
/// (re-keyed by itself) plus, for every pair of distinct postfixes, a probe for each
/// `k`-subset the resulting candidate needs validated.
fn prefix_join(prefix: &Itemset, values: Vec<(Item, u64)>) -> Vec<(Itemset, SubsetProbe)> {
    let prefix_items = prefix.items().to_vec();
    let mut out = Vec::new();

    for (postfix, support) in &values {
        let original =
            Itemset::from_prefix_and_extra(&prefix_items, std::iter::once(postfix.clone()));
        out.push((original, SubsetProbe::Known { support: *support }));
    }

    let mut postfixes: Vec<Item> = values.into_iter().map(|(postfix, _)| postfix).collect();
    postfixes.sort();
    postfixes.dedup();
    if postfixes.len() < 2 {
        return out;
    }

    let sub_prefixes = combinations(&prefix_items, prefix_items.len() - 1);
    for i in 0..postfixes.len() {
        for j in (i + 1)..postfixes.len() {
            let extra = [postfixes[i].clone(), postfixes[j].clone()];
            let candidate = Itemset::from_prefix_and_extra(&prefix_items, extra.clone());
            for sub_prefix in &sub_prefixes {
                let subset = Itemset::from_prefix_and_extra(sub_prefix, extra.clone());
                out.push((
                    subset,
                    SubsetProbe::Needs {
                        candidate: candidate.clone(),
                    },
                ));
            }
        }
    }
    out
}

/// Stage 2: resolve whether `subset` is itself frequent, and propagate that answer to
/// every candidate that named it as a required subset.
fn validate_subset(_subset: &Itemset, values: Vec<SubsetProbe>) -> Vec<(Itemset, Option<u64>)> {
    let mut found_support: Option<u64> = None;
    let mut waiting_candidates = Vec::new();
    for probe in values {
        match probe {
            SubsetProbe::Known { support } => found_support = Some(support),
            SubsetProbe::Needs { candidate } => waiting_candidates.push(candidate),
        }
    }
    waiting_candidates
        .into_iter()
        .map(|candidate| (candidate, found_support))
        .collect()
}

/// Stage 3: a candidate survives iff every one of its required subsets resolved to
/// `Some` support, and at least one subset check actually happened.
fn prune_candidate(candidate: &Itemset, values: Vec<Option<u64>>) -> Vec<Itemset> {
    if values.is_empty() || values.iter().any(Option::is_none) {
        Vec::new()
    } else {
        vec![candidate.clone()]
    }
}

/// Every `r`-combination of `items`, preserving order. `r == 0` yields exactly one
/// (empty) combination, matching the conventional definition used by `prefix_join` when
/// a `(k-1)`-prefix has only one item.
fn combinations(items: &[Item], r: usize) -> Vec<Vec<Item>> {
    if r == 0 {
        return vec![Vec::new()];
    }
    if r > items.len() {
        return Vec::new();
    }
    let mut result = Vec::new();
    let mut combo = Vec::with_capacity(r);
    fn helper(items: &[Item], r: usize, start: usize, combo: &mut Vec<Item>, result: &mut Vec<Vec<Item>>) {
        if combo.len() == r {
            result.push(combo.clone());
            return;
        }
        for i in start..items.len() {
            combo.push(items[i].clone());
            helper(items, r, i + 1, combo, result);
            combo.pop();
        }
    }
    helper(items, r, 0, &mut combo, &mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_frequent(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[test]
    fn combinations_of_zero_yields_one_empty_set() {
        let items = vec![Item::new("a").unwrap()];
        assert_eq!(combinations(&items, 0), vec![Vec::<Item>::new()]);
    }

    #[test]
    fn generates_three_itemset_with_all_frequent_subsets() {
        // F_2: {a,b}, {a,c}, {b,c} all frequent -> {a,b,c} is a valid C_3 candidate.
        let file = write_frequent(&["a b\t5", "a c\t4", "b c\t3"]);
        let candidates =
            generate_candidate_itemsets(&[file.path().to_path_buf()], Runner::Inline).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].to_wire(), "a b c");
    }

    #[test]
    fn prunes_candidate_with_a_non_frequent_subset() {
        // F_2 is missing {b,c}, so {a,b,c} must be pruned (downward closure).
        let file = write_frequent(&["a b\t5", "a c\t4"]);
        let candidates =
            generate_candidate_itemsets(&[file.path().to_path_buf()], Runner::Inline).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn generates_four_itemset_candidates_from_frequent_triples() {
        // F_3 sharing prefix {a,b}: {a,b,c}, {a,b,d}; both 2-subsets beyond the shared
        // prefix ({a,c},{a,d},{b,c},{b,d},{c,d}) must be frequent for {a,b,c,d}.
        let file = write_frequent(&[
            "a b c\t5",
            "a b d\t5",
            "a c d\t4",
            "b c d\t4",
        ]);
        let candidates =
            generate_candidate_itemsets(&[file.path().to_path_buf()], Runner::Inline).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].to_wire(), "a b c d");
    }
}
