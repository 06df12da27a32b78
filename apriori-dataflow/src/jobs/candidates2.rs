//! 2-Candidate Generator: plain combinatorial pairing over `F_1`, no `timely` involved
//! — single-host work, no shuffle needed.
//!
//! Grounded on `apriori_core.py`'s `generate_candidate_2_itemsets`: load every `F_1`
//! file, cross-check that the same item never carries two different support counts
//! across files, then emit every 2-combination of the surviving items in sorted order.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::JobError;
use crate::model::{FrequentItemset, Item, Itemset};

/// Generates every `C_2` candidate from one or more `F_1` files.
///
/// Returns [`JobError::InconsistentSupport`] if the same item appears with two
/// different support counts across `input_files` — frequent-itemset files for the same
/// level are expected to agree, and a mismatch signals a corrupted or stale run rather
/// than something safe to silently resolve.
pub fn generate_candidate_2_itemsets(input_files: &[PathBuf]) -> Result<Vec<Itemset>, JobError> {
    if input_files.is_empty() {
        return Err(JobError::InvalidConfig(
            "at least one input path must be provided".to_string(),
        ));
    }

    let mut supports: HashMap<Item, u64> = HashMap::new();
    for path in input_files {
        let content = std::fs::read_to_string(path).map_err(|e| JobError::io(path, e))?;
        for line in content.lines() {
            let Some(frequent) = FrequentItemset::parse_line(line) else {
                continue;
            };
            if frequent.itemset.len() != 1 {
                continue;
            }
            let item = frequent.itemset.items()[0].clone();
            match supports.get(&item) {
                Some(&existing) if existing != frequent.support => {
                    return Err(JobError::InconsistentSupport {
                        item,
                        a: existing,
                        b: frequent.support,
                    });
                }
                _ => {
                    supports.insert(item, frequent.support);
                }
            }
        }
    }

    let mut items: Vec<Item> = supports.into_keys().collect();
    items.sort();

    let mut candidates = Vec::with_capacity(items.len() * items.len().saturating_sub(1) / 2);
    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            let pair = Itemset::canonical(vec![items[i].clone(), items[j].clone()])
                .expect("two distinct items always form a non-empty itemset");
            candidates.push(pair);
        }
    }
    Ok(candidates)
}
