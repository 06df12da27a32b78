//! Support Converter: counts valid transactions across every input file so the driver
//! can materialize `⌊p · N⌋` once `N` is known.
//!
//! Grounded on `decimal_support_converter.py`'s `DecimalSupportConverter`: the mapper
//! emits one `("total_transactions", 1)` per well-formed line, the combiner/reducer sum
//! those counts, and the driver (not this job) multiplies by the decimal support and
//! floors. We keep that split: this job only counts transactions; `MinSupport::from_decimal`
//! does the multiply-and-floor (`model.rs`).

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use timely::dataflow::operators::ToStream;

use crate::error::JobError;
use crate::model::Transaction;
use crate::runtime::{self, Runner};

/// Counts the number of well-formed transaction lines across `input_files`. Malformed
/// lines are silently skipped, matching the mapper's `len(parts) != 2` guard.
pub fn count_transactions(input_files: &[PathBuf], runner: Runner) -> Result<u64, JobError> {
    let files = input_files.to_vec();
    let per_worker = runtime::run_job(runner, move |worker| {
        let index = worker.index();
        let peers = worker.peers();

        let mut local_count: u64 = 0;
        for path in &files {
            if let Ok(lines) = runtime::read_lines_for_worker(path, index, peers) {
                for line in lines {
                    if Transaction::parse_line(&line).is_some() {
                        local_count += 1;
                    }
                }
            }
        }

        let sink = Rc::new(RefCell::new(Vec::new()));
        let sink_handle = Rc::clone(&sink);
        worker.dataflow::<usize, _, _>(|scope| {
            let stream = vec![((), local_count)].to_stream(scope);
            let reduced = runtime::shuffle_reduce(&stream, "count-transactions", |_key: &(), values: Vec<u64>| {
                vec![values.into_iter().sum::<u64>()]
            });
            runtime::capture_into(&reduced, sink_handle);
        });
        runtime::run_to_completion(worker);

        sink.borrow().clone()
    })?;

    // Every worker routes its local count to the same single reducer (the exchange key
    // is the unit key `()`), so exactly one worker's vector is non-empty.
    Ok(per_worker.into_iter().sum())
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
    fn counts_only_well_formed_lines() {
        let file = write_transactions(&[
            "t01\tbread milk eggs",
            "t02\tbread butter",
            "not_a_transaction_line",
            "t03\tmilk",
        ]);
        let count = count_transactions(&[file.path().to_path_buf()], Runner::Inline).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn empty_input_counts_zero() {
        let file = write_transactions(&[]);
        let count = count_transactions(&[file.path().to_path_buf()], Runner::Inline).unwrap();
        assert_eq!(count, 0);
    }
}
