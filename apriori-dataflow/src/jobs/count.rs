//! Support Counter: two modes over the same shuffle-reduce shape.
//!
//! - Singleton mode (level 1): counts every distinct item across all transactions.
//! - Candidate mode (level ≥ 2): counts only the itemsets named in a candidate file,
//!   loaded once per worker and checked against every transaction with
//!   `Itemset::is_subset`.
//!
//! Grounded on `itemset_support_counter.py`'s `ItemsetSupportCounter`: the mapper emits
//! `(key, 1)` per match, the combiner locally pre-sums (here via
//! `differential_dataflow::consolidation::consolidate`, the crate's one safe, fully
//! generic utility function), and the reducer sums across workers and filters by
//! `min_support`.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use differential_dataflow::consolidation;
use timely::dataflow::operators::ToStream;

use crate::error::JobError;
use crate::model::{FrequentItemset, Item, Itemset, MinSupport, Transaction};
use crate::runtime::{self, Runner};

/// Loads a candidate file, one itemset per line. A missing file is an empty candidate
/// set rather than an error: the first level has no candidate file yet, and that's
/// expected.
pub fn load_candidate_file(path: &Path) -> Result<Vec<Itemset>, JobError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content.lines().filter_map(Itemset::parse).collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(JobError::io(path, e)),
    }
}

/// Level-1 mode: counts individual items across every transaction.
pub fn count_singletons(
    input_files: &[PathBuf],
    min_support: MinSupport,
    runner: Runner,
) -> Result<Vec<FrequentItemset>, JobError> {
    let files = input_files.to_vec();
    let records = runtime::run_job(runner, move |worker| {
        let index = worker.index();
        let peers = worker.peers();

        let mut local_counts: Vec<(Item, i64)> = Vec::new();
        for path in &files {
            if let Ok(lines) = runtime::read_lines_for_worker(path, index, peers) {
                for line in lines {
                    if let Some(txn) = Transaction::parse_line(&line) {
                        for item in txn.items.items() {
                            local_counts.push((item.clone(), 1));
                        }
                    }
                }
            }
        }
        consolidation::consolidate(&mut local_counts);

        let sink = Rc::new(RefCell::new(Vec::new()));
        let sink_handle = Rc::clone(&sink);
        worker.dataflow::<usize, _, _>(|scope| {
            let stream = local_counts.to_stream(scope);
            let reduced = runtime::shuffle_reduce(
                &stream,
                "count-singletons",
                move |item: &Item, values: Vec<i64>| {
                    let total: i64 = values.into_iter().sum();
                    if total >= min_support.get() as i64 {
                        let itemset = Itemset::canonical(std::iter::once(item.clone()))
                            .expect("a single item is never empty");
                        vec![FrequentItemset {
                            itemset,
                            support: total as u64,
                        }]
                    } else {
                        Vec::new()
                    }
                },
            );
            runtime::capture_into(&reduced, sink_handle);
        });
        runtime::run_to_completion(worker);

        sink.borrow().clone()
    })?;

    Ok(records)
}

/// Level-≥2 mode: counts only the given candidate itemsets.
pub fn count_candidates(
    input_files: &[PathBuf],
    candidates: &[Itemset],
    min_support: MinSupport,
    runner: Runner,
) -> Result<Vec<FrequentItemset>, JobError> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let files = input_files.to_vec();
    let candidates_owned = candidates.to_vec();
    let zero_support_mode = min_support.get() == 0;

    let records = runtime::run_job(runner, move |worker| {
        let index = worker.index();
        let peers = worker.peers();

        let mut local_counts: Vec<(Itemset, i64)> = Vec::new();
        for path in &files {
            if let Ok(lines) = runtime::read_lines_for_worker(path, index, peers) {
                for line in lines {
                    if let Some(txn) = Transaction::parse_line(&line) {
                        for candidate in &candidates_owned {
                            if candidate.is_subset(&txn.items) {
                                local_counts.push((candidate.clone(), 1));
                            }
                        }
                    }
                }
            }
        }
        // When min_support is 0 every candidate is frequent regardless of whether it
        // ever occurred: worker 0 seeds an explicit zero so a candidate with no
        // occurrences at all still survives the reduce instead of being absent
        // entirely.
        if zero_support_mode && index == 0 {
            for candidate in &candidates_owned {
                local_counts.push((candidate.clone(), 0));
            }
        }
        consolidation::consolidate(&mut local_counts);

        let sink = Rc::new(RefCell::new(Vec::new()));
        let sink_handle = Rc::clone(&sink);
        worker.dataflow::<usize, _, _>(|scope| {
            let stream = local_counts.to_stream(scope);
            let reduced = runtime::shuffle_reduce(
                &stream,
                "count-candidates",
                move |itemset: &Itemset, values: Vec<i64>| {
                    let total: i64 = values.into_iter().sum();
                    if total >= min_support.get() as i64 {
                        vec![FrequentItemset {
                            itemset: itemset.clone(),
                            support: total as u64,
                        }]
                    } else {
                        Vec::new()
                    }
                },
            );
            runtime::capture_into(&reduced, sink_handle);
        });
        runtime::run_to_completion(worker);

        sink.borrow().clone()
    })?;

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_transactions(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[test]
    fn singleton_mode_counts_and_filters() {
        let file = write_transactions(&[
            "t01\thotdogs buns ketchup",
            "t02\thotdogs buns",
            "t03\tketchup",
        ]);
        let mut results = count_singletons(
            &[file.path().to_path_buf()],
            MinSupport(2),
            Runner::Inline,
        )
        .unwrap();
        results.sort_by(|a, b| a.itemset.to_wire().cmp(&b.itemset.to_wire()));
        let wire: Vec<String> = results.iter().map(FrequentItemset::to_wire).collect();
        assert_eq!(wire, vec!["buns\t2", "hotdogs\t2", "ketchup\t2"]);
    }

    #[test]
    fn candidate_mode_counts_subsets() {
        let file = write_transactions(&[
            "t01\thotdogs buns ketchup",
            "t02\thotdogs buns",
            "t03\tketchup",
        ]);
        let candidates = vec![
            Itemset::parse("hotdogs buns").unwrap(),
            Itemset::parse("buns ketchup").unwrap(),
        ];
        let results = count_candidates(
            &[file.path().to_path_buf()],
            &candidates,
            MinSupport(2),
            Runner::Inline,
        )
        .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].itemset.to_wire(), "buns hotdogs");
        assert_eq!(results[0].support, 2);
    }

    #[test]
    fn candidate_mode_with_zero_min_support_keeps_absent_candidates() {
        let file = write_transactions(&["t01\thotdogs buns"]);
        let candidates = vec![Itemset::parse("chips soda").unwrap()];
        let results = count_candidates(
            &[file.path().to_path_buf()],
            &candidates,
            MinSupport(0),
            Runner::Inline,
        )
        .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].support, 0);
    }

    #[test]
    fn missing_candidate_file_is_empty_set() {
        let candidates = load_candidate_file(Path::new("/nonexistent/path/does-not-exist.txt")).unwrap();
        assert!(candidates.is_empty());
    }
}
